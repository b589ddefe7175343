// CLI modules
mod args;
mod logging;
mod op;
mod ops;
mod state;

use args::Args;
use clap::{Parser, Subcommand};
use op::Op;
use ops::{Decrypt, Encrypt, Init, Token, Version, Webhook};

command_enum! {
    (Init, Init),
    (Encrypt, Encrypt),
    (Decrypt, Decrypt),
    (Token, Token),
    (Webhook, Webhook),
    (Version, Version),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let log_guard = logging::init_logging(args.log_level);
    let ctx = op::OpContext::new(args.config_path);

    let code = match args.command.execute(&ctx).await {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("Error: {}", e);
            1
        }
    };

    // flush buffered log lines before exiting
    drop(log_guard);
    std::process::exit(code);
}
