use clap::Args;
use common::crypto::CodecError;

use crate::state::StateError;

#[derive(Args, Debug, Clone)]
pub struct Encrypt {
    /// Plaintext to seal (read from stdin when omitted)
    pub value: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum EncryptError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("failed to read plaintext from stdin: {0}")]
    Stdin(#[from] std::io::Error),
}

#[async_trait::async_trait]
impl crate::op::Op for Encrypt {
    type Error = EncryptError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let codec = ctx.state_or_default()?.codec()?;
        let plaintext = super::value_or_stdin(self.value.as_deref()).await?;
        Ok(codec.encrypt(&plaintext)?)
    }
}
