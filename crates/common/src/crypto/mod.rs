//! Cryptographic primitives for tokenseal
//!
//! This module protects credentials that have to live in an ordinary,
//! plaintext-readable datastore column: GitHub App installation IDs,
//! personal access tokens and the like.
//!
//! # Security Model
//!
//! ## Shared Secret
//! A single long-lived secret is supplied once, from process configuration,
//! when a [`SecretCodec`] is constructed. It is never written into the
//! encoded output.
//!
//! ## Per-call Keys
//! Every encryption draws a fresh random salt and IV. The AES-256 key is
//! derived from (shared secret, salt, iteration count) with
//! PBKDF2-HMAC-SHA512, used once and wiped. Identical plaintexts therefore
//! never produce identical outputs.
//!
//! ## Integrity
//! AES-256-GCM authenticates the ciphertext. Opening a value that was
//! modified, or sealed under another secret or configuration, fails with
//! [`CodecError::Authentication`] rather than returning garbage.
//!
//! ## Encoded Format
//! `hex(salt || iv (16) || tag (16) || ciphertext)`; see [`EncodedLayout`].

mod codec;
mod kdf;
mod layout;

pub use codec::{
    CodecConfig, CodecError, SecretCodec, DEFAULT_KEY_DERIVATION_ITERATIONS, DEFAULT_SALT_LENGTH,
};
pub use kdf::{derive_key, KEY_SIZE};
pub use layout::{EncodedLayout, SealedParts, IV_SIZE, TAG_SIZE};
