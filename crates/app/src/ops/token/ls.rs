use clap::Args;
use common::token_store::TokenStore;

use super::TokenOpError;

#[derive(Args, Debug, Clone)]
pub struct Ls;

#[async_trait::async_trait]
impl crate::op::Op for Ls {
    type Error = TokenOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let store = ctx.state()?.token_store()?;
        let slots = store.slots().await?;

        if slots.is_empty() {
            return Ok("No tokens stored".to_string());
        }
        Ok(slots
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
