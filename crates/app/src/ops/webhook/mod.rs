use clap::{Args, Subcommand};
use common::webhook::WebhookError;

pub mod sign;
pub mod verify;

use crate::op::Op;
use crate::state::StateError;

crate::command_enum! {
    (Sign, sign::Sign),
    (Verify, verify::Verify),
}

// Rename the generated Command to WebhookCommand for clarity
pub type WebhookCommand = Command;

#[derive(Debug, thiserror::Error)]
pub enum WebhookOpError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Webhook(#[from] WebhookError),
    #[error("failed to read payload {path}: {source}")]
    Payload {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Read the raw delivery body exactly as received
async fn read_payload(path: &std::path::Path) -> Result<Vec<u8>, WebhookOpError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| WebhookOpError::Payload {
            path: path.display().to_string(),
            source,
        })
}

#[derive(Args, Debug, Clone)]
pub struct Webhook {
    #[command(subcommand)]
    pub command: WebhookCommand,
}

#[async_trait::async_trait]
impl Op for Webhook {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}
