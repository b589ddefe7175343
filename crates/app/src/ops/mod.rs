pub mod decrypt;
pub mod encrypt;
pub mod init;
pub mod token;
pub mod version;
pub mod webhook;

pub use decrypt::Decrypt;
pub use encrypt::Encrypt;
pub use init::Init;
pub use token::Token;
pub use version::Version;
pub use webhook::Webhook;

use tokio::io::AsyncReadExt;

/// Use the value given on the command line, or read it from stdin.
///
/// A single trailing newline from stdin is dropped so `echo token |` works.
pub async fn value_or_stdin(value: Option<&str>) -> std::io::Result<String> {
    if let Some(value) = value {
        return Ok(value.to_string());
    }

    let mut buf = String::new();
    tokio::io::stdin().read_to_string(&mut buf).await?;
    Ok(strip_trailing_newline(buf))
}

fn strip_trailing_newline(mut value: String) -> String {
    if value.ends_with('\n') {
        value.pop();
        if value.ends_with('\r') {
            value.pop();
        }
    }
    value
}
