use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tokenseal")]
#[command(about = "Seal GitHub credentials for storage and verify webhook deliveries")]
#[command(version)]
pub struct Args {
    /// Path to the tokenseal config directory (defaults to ~/.tokenseal)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Log level for stderr output (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: crate::Command,
}
