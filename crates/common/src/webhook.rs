//! Webhook signature verification
//!
//! GitHub signs each delivery with HMAC-SHA256 over the raw request body,
//! keyed by the webhook secret, and sends the result as
//! `X-Hub-Signature-256: sha256=<hex>`. Payloads must be checked before any
//! of their contents are trusted.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the delivery signature (lowercase, as normalised by HTTP/2)
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";
/// Algorithm prefix on the signature value
pub const SIGNATURE_PREFIX: &str = "sha256=";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WebhookError {
    #[error("invalid webhook configuration: {0}")]
    Configuration(String),
    #[error("missing {} header", SIGNATURE_HEADER)]
    MissingSignature,
    #[error("malformed signature: {0}")]
    MalformedSignature(String),
    #[error("signature does not match payload")]
    SignatureMismatch,
}

/// Checks inbound webhook deliveries against a shared webhook secret.
///
/// The webhook secret is independent from the secret used by
/// [`SecretCodec`](crate::crypto::SecretCodec).
#[derive(Clone)]
pub struct WebhookVerifier {
    mac: HmacSha256,
}

impl fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl WebhookVerifier {
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, WebhookError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(WebhookError::Configuration(
                "webhook secret must not be empty".to_string(),
            ));
        }
        let mac = HmacSha256::new_from_slice(secret)
            .map_err(|e| WebhookError::Configuration(e.to_string()))?;
        Ok(Self { mac })
    }

    /// Produce the header value GitHub would send for `body`.
    pub fn sign(&self, body: &[u8]) -> String {
        let mut mac = self.mac.clone();
        mac.update(body);
        format!(
            "{}{}",
            SIGNATURE_PREFIX,
            hex::encode(mac.finalize().into_bytes())
        )
    }

    /// Verify `body` against the value of the signature header.
    ///
    /// The comparison runs in constant time.
    pub fn verify(&self, body: &[u8], signature: Option<&str>) -> Result<(), WebhookError> {
        let signature = signature.ok_or(WebhookError::MissingSignature)?.trim();

        let hex_digest = signature.strip_prefix(SIGNATURE_PREFIX).ok_or_else(|| {
            WebhookError::MalformedSignature(format!("expected '{}' prefix", SIGNATURE_PREFIX))
        })?;
        let expected = hex::decode(hex_digest)
            .map_err(|e| WebhookError::MalformedSignature(format!("invalid hex: {}", e)))?;

        let mut mac = self.mac.clone();
        mac.update(body);
        mac.verify_slice(&expected).map_err(|_| {
            tracing::warn!(body_len = body.len(), "webhook signature mismatch");
            WebhookError::SignatureMismatch
        })
    }
}
