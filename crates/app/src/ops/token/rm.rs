use clap::Args;
use common::token_store::{TokenSlot, TokenStore};

use super::TokenOpError;

#[derive(Args, Debug, Clone)]
pub struct Rm {
    /// Slot to delete
    pub slot: TokenSlot,
}

#[async_trait::async_trait]
impl crate::op::Op for Rm {
    type Error = TokenOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let store = ctx.state()?.token_store()?;

        if store.delete(&self.slot).await? {
            Ok(format!("Removed {}", self.slot))
        } else {
            Err(TokenOpError::NotFound(self.slot.to_string()))
        }
    }
}
