use clap::Args;
use common::crypto::CodecConfig;

use crate::state::{AppConfig, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Random salt length in bytes for newly sealed secrets
    #[arg(long, default_value_t = common::crypto::DEFAULT_SALT_LENGTH)]
    pub salt_length: usize,

    /// PBKDF2 iteration count
    #[arg(long, default_value_t = common::crypto::DEFAULT_KEY_DERIVATION_ITERATIONS)]
    pub iterations: u32,

    /// Environment variable holding the shared encryption secret
    #[arg(long, default_value = crate::state::DEFAULT_SECRET_ENV)]
    pub secret_env: String,

    /// Environment variable holding the webhook signing secret
    #[arg(long, default_value = crate::state::DEFAULT_WEBHOOK_SECRET_ENV)]
    pub webhook_secret_env: String,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            codec: CodecConfig {
                salt_length: self.salt_length,
                key_derivation_iterations: self.iterations,
            },
            secret_env: self.secret_env.clone(),
            webhook_secret_env: self.webhook_secret_env.clone(),
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let output = format!(
            "Initialized tokenseal directory at: {}\n\
             - Config: {}\n\
             - Tokens: {}\n\
             - Salt length: {} bytes\n\
             - Key derivation iterations: {}\n\
             - Encryption secret: ${}\n\
             - Webhook secret: ${}",
            state.dir.display(),
            state.config_path.display(),
            state.tokens_path.display(),
            state.config.codec.salt_length,
            state.config.codec.key_derivation_iterations,
            state.config.secret_env,
            state.config.webhook_secret_env,
        );

        Ok(output)
    }
}
