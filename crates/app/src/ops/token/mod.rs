use clap::{Args, Subcommand};
use common::token_store::{FileTokenStoreError, SealedTokensError};

pub mod get;
pub mod ls;
pub mod rm;
pub mod set;

use crate::op::Op;
use crate::state::StateError;

crate::command_enum! {
    (Set, set::Set),
    (Get, get::Get),
    (Rm, rm::Rm),
    (Ls, ls::Ls),
}

// Rename the generated Command to TokenCommand for clarity
pub type TokenCommand = Command;

/// Error shared by every token subcommand
#[derive(Debug, thiserror::Error)]
pub enum TokenOpError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Tokens(#[from] SealedTokensError<FileTokenStoreError>),
    #[error("token store error: {0}")]
    Store(#[from] FileTokenStoreError),
    #[error("failed to read token from stdin: {0}")]
    Stdin(#[from] std::io::Error),
    #[error("no token stored for {0}")]
    NotFound(String),
}

#[derive(Args, Debug, Clone)]
pub struct Token {
    #[command(subcommand)]
    pub command: TokenCommand,
}

#[async_trait::async_trait]
impl Op for Token {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}
