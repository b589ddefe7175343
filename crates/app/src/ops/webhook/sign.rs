use std::path::PathBuf;

use clap::Args;

use super::WebhookOpError;

#[derive(Args, Debug, Clone)]
pub struct Sign {
    /// File holding the raw request body
    #[arg(long)]
    pub payload: PathBuf,
}

#[async_trait::async_trait]
impl crate::op::Op for Sign {
    type Error = WebhookOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let verifier = ctx.state_or_default()?.webhook_verifier()?;
        let body = super::read_payload(&self.payload).await?;
        Ok(verifier.sign(&body))
    }
}
