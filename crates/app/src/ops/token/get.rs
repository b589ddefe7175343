use clap::Args;
use common::token_store::TokenSlot;

use super::TokenOpError;

#[derive(Args, Debug, Clone)]
pub struct Get {
    /// Slot to read
    pub slot: TokenSlot,
}

#[async_trait::async_trait]
impl crate::op::Op for Get {
    type Error = TokenOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let tokens = ctx.state()?.tokens()?;

        tokens
            .load(&self.slot)
            .await?
            .ok_or_else(|| TokenOpError::NotFound(self.slot.to_string()))
    }
}
