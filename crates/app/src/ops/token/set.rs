use clap::Args;
use common::token_store::TokenSlot;

use super::TokenOpError;

#[derive(Args, Debug, Clone)]
pub struct Set {
    /// Slot to write, e.g. `user/<id>/pat` or `installation/<account>`
    pub slot: TokenSlot,

    /// Token value (read from stdin when omitted)
    pub value: Option<String>,
}

#[async_trait::async_trait]
impl crate::op::Op for Set {
    type Error = TokenOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let tokens = ctx.state()?.tokens()?;
        let value = crate::ops::value_or_stdin(self.value.as_deref()).await?;

        tokens.store(&self.slot, &value).await?;
        Ok(format!("Sealed token stored in {}", self.slot))
    }
}
