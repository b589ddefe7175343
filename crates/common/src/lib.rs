/**
 * Credential encryption.
 *  - Secret codec (PBKDF2-SHA512 + AES-256-GCM)
 *  - Fixed-offset encoded secret layout
 */
pub mod crypto;
/**
 * Sealed credential storage keyed by
 *  the owning record, with memory and
 *  file backed stores.
 */
pub mod token_store;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;
/**
 * Inbound webhook signature checks.
 */
pub mod webhook;

pub mod prelude {
    pub use crate::crypto::{CodecConfig, CodecError, SecretCodec};
    pub use crate::token_store::{SealedTokens, TokenSlot, TokenStore};
    pub use crate::version::build_info;
    pub use crate::webhook::{WebhookError, WebhookVerifier};
}
