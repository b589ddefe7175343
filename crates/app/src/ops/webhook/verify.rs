use std::path::PathBuf;

use clap::Args;
use common::webhook::SIGNATURE_HEADER;

use super::WebhookOpError;

#[derive(Args, Debug, Clone)]
pub struct Verify {
    /// File holding the raw request body
    #[arg(long)]
    pub payload: PathBuf,

    /// Value of the signature header, e.g. `sha256=<hex>`
    #[arg(long)]
    pub signature: Option<String>,
}

#[async_trait::async_trait]
impl crate::op::Op for Verify {
    type Error = WebhookOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let verifier = ctx.state_or_default()?.webhook_verifier()?;
        let body = super::read_payload(&self.payload).await?;

        verifier.verify(&body, self.signature.as_deref())?;
        Ok(format!(
            "{} OK ({} bytes)",
            SIGNATURE_HEADER,
            body.len()
        ))
    }
}
