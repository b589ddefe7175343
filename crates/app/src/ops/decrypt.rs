use clap::Args;
use common::crypto::CodecError;

use crate::state::StateError;

#[derive(Args, Debug, Clone)]
pub struct Decrypt {
    /// Hex encoded secret (read from stdin when omitted)
    pub encoded: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum DecryptError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("failed to read encoded secret from stdin: {0}")]
    Stdin(#[from] std::io::Error),
}

#[async_trait::async_trait]
impl crate::op::Op for Decrypt {
    type Error = DecryptError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let codec = ctx.state_or_default()?.codec()?;
        let encoded = super::value_or_stdin(self.encoded.as_deref()).await?;

        codec.decrypt(encoded.trim()).map_err(|e| {
            if e == CodecError::Authentication {
                tracing::warn!("encoded secret failed authentication");
            }
            e.into()
        })
    }
}
