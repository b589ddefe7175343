//! Authenticated encryption of short secret strings
//!
//! A [`SecretCodec`] holds a long-lived shared secret and turns plaintext
//! tokens into self-contained hex strings that can sit in an ordinary text
//! column. Every call draws a fresh salt and IV, derives a one-off AES-256
//! key with PBKDF2-HMAC-SHA512 and seals the plaintext with AES-256-GCM.
//!
//! The encoded form is `hex(salt || iv || tag || ciphertext)`, see
//! [`EncodedLayout`](super::layout::EncodedLayout).

use std::fmt;

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, Key, Nonce, Tag};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, Zeroizing};

use super::kdf::derive_key;
use super::layout::{EncodedLayout, SealedParts, IV_SIZE};

/// AES-256-GCM with a 16 byte IV
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Default salt length in bytes
pub const DEFAULT_SALT_LENGTH: usize = 64;
/// Default PBKDF2 iteration count
pub const DEFAULT_KEY_DERIVATION_ITERATIONS: u32 = 100_000;

/// Errors produced by the secret codec.
///
/// `Decoding` and `Authentication` are deliberately separate: the former
/// means the stored text is malformed, the latter that it was tampered
/// with or sealed under a different secret or configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("invalid codec configuration: {0}")]
    Configuration(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to decode encoded secret: {0}")]
    Decoding(String),
    #[error("authentication failed: encoded secret was tampered with or sealed under a different secret")]
    Authentication,
    #[error("failed to gather randomness: {0}")]
    Randomness(String),
}

/// Tunables for the codec.
///
/// Both values are part of the stored format: a secret sealed under one
/// configuration only opens under the same one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Length of the random per-call salt in bytes
    #[serde(default = "default_salt_length")]
    pub salt_length: usize,
    /// PBKDF2 iteration count
    #[serde(default = "default_key_derivation_iterations")]
    pub key_derivation_iterations: u32,
}

fn default_salt_length() -> usize {
    DEFAULT_SALT_LENGTH
}

fn default_key_derivation_iterations() -> u32 {
    DEFAULT_KEY_DERIVATION_ITERATIONS
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            salt_length: default_salt_length(),
            key_derivation_iterations: default_key_derivation_iterations(),
        }
    }
}

impl CodecConfig {
    fn validate(&self) -> Result<(), CodecError> {
        if self.salt_length == 0 {
            return Err(CodecError::Configuration(
                "salt length must be at least 1 byte".to_string(),
            ));
        }
        if self.key_derivation_iterations == 0 {
            return Err(CodecError::Configuration(
                "key derivation iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Encrypts and decrypts secret strings under a shared secret.
///
/// The codec is immutable after construction and holds no per-call state,
/// so a single instance can be shared freely across threads and tasks.
///
/// # Examples
///
/// ```ignore
/// let codec = SecretCodec::new("test-secret-value")?;
/// let sealed = codec.encrypt("ghp_exampletoken123")?;
/// assert_eq!(codec.decrypt(&sealed)?, "ghp_exampletoken123");
/// ```
#[derive(Clone)]
pub struct SecretCodec {
    secret: Zeroizing<String>,
    config: CodecConfig,
    layout: EncodedLayout,
}

impl fmt::Debug for SecretCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretCodec")
            .field("secret", &"<redacted>")
            .field("config", &self.config)
            .finish()
    }
}

impl SecretCodec {
    /// Create a codec with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Configuration`] if `secret` is empty.
    pub fn new(secret: impl Into<String>) -> Result<Self, CodecError> {
        Self::with_config(secret, CodecConfig::default())
    }

    /// Create a codec with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Configuration`] if `secret` is empty or either
    /// configuration value is zero.
    pub fn with_config(secret: impl Into<String>, config: CodecConfig) -> Result<Self, CodecError> {
        let secret = Zeroizing::new(secret.into());
        if secret.is_empty() {
            return Err(CodecError::Configuration(
                "shared secret must not be empty".to_string(),
            ));
        }
        config.validate()?;

        Ok(Self {
            secret,
            config,
            layout: EncodedLayout::new(config.salt_length),
        })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn layout(&self) -> &EncodedLayout {
        &self.layout
    }

    /// Seal `plaintext` into a lowercase hex string.
    ///
    /// Two calls with the same plaintext never return the same output.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CodecError> {
        let mut salt = vec![0u8; self.layout.salt_length()];
        getrandom::getrandom(&mut salt).map_err(|e| CodecError::Randomness(e.to_string()))?;
        let mut iv = [0u8; IV_SIZE];
        getrandom::getrandom(&mut iv).map_err(|e| CodecError::Randomness(e.to_string()))?;

        let key = derive_key(
            self.secret.as_bytes(),
            &salt,
            self.config.key_derivation_iterations,
        );
        let cipher = Aes256Gcm16::new(Key::<Aes256Gcm16>::from_slice(key.as_slice()));

        let mut buffer = plaintext.as_bytes().to_vec();
        let tag = cipher
            .encrypt_in_place_detached(Nonce::<U16>::from_slice(&iv), b"", &mut buffer)
            .map_err(|_| CodecError::InvalidInput("plaintext too long to encrypt".to_string()))?;

        let encoded = self.layout.join(&SealedParts {
            salt: &salt,
            iv: &iv,
            tag: tag.as_slice(),
            ciphertext: &buffer,
        });

        tracing::trace!(
            plaintext_len = plaintext.len(),
            encoded_len = encoded.len(),
            "sealed secret"
        );

        Ok(hex::encode(encoded))
    }

    /// Open a string produced by [`Self::encrypt`] under the same secret and
    /// configuration.
    ///
    /// # Errors
    ///
    /// - [`CodecError::Decoding`] if the input is not hex, is too short to
    ///   hold the fixed-size fields, or opens to bytes that are not UTF-8
    /// - [`CodecError::Authentication`] if the tag does not verify
    pub fn decrypt(&self, encoded: &str) -> Result<String, CodecError> {
        let bytes =
            hex::decode(encoded).map_err(|e| CodecError::Decoding(format!("invalid hex: {}", e)))?;
        let parts = self.layout.split(&bytes)?;

        let key = derive_key(
            self.secret.as_bytes(),
            parts.salt,
            self.config.key_derivation_iterations,
        );
        let cipher = Aes256Gcm16::new(Key::<Aes256Gcm16>::from_slice(key.as_slice()));

        let mut buffer = parts.ciphertext.to_vec();
        cipher
            .decrypt_in_place_detached(
                Nonce::<U16>::from_slice(parts.iv),
                b"",
                &mut buffer,
                Tag::from_slice(parts.tag),
            )
            .map_err(|_| CodecError::Authentication)?;

        String::from_utf8(buffer).map_err(|e| {
            e.into_bytes().zeroize();
            CodecError::Decoding("decrypted secret is not valid UTF-8".to_string())
        })
    }

    /// [`Self::encrypt`] for values read from a nullable source.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidInput`] if `plaintext` is `None`.
    pub fn encrypt_opt(&self, plaintext: Option<&str>) -> Result<String, CodecError> {
        match plaintext {
            Some(plaintext) => self.encrypt(plaintext),
            None => Err(CodecError::InvalidInput(
                "plaintext must not be null".to_string(),
            )),
        }
    }

    /// [`Self::decrypt`] for values read from a nullable source.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidInput`] if `encoded` is `None`.
    pub fn decrypt_opt(&self, encoded: Option<&str>) -> Result<String, CodecError> {
        match encoded {
            Some(encoded) => self.decrypt(encoded),
            None => Err(CodecError::InvalidInput(
                "encoded secret must not be null".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::crypto::layout::TAG_SIZE;

    fn fast_config() -> CodecConfig {
        CodecConfig {
            salt_length: DEFAULT_SALT_LENGTH,
            key_derivation_iterations: 1_000,
        }
    }

    fn codec(secret: &str) -> SecretCodec {
        SecretCodec::with_config(secret, fast_config()).unwrap()
    }

    #[test]
    fn test_round_trip_default_config() {
        let codec = SecretCodec::new("test-secret-value").unwrap();
        let plaintext = "ghp_exampletoken123";

        let encoded = codec.encrypt(plaintext).unwrap();
        assert_eq!(
            encoded.len(),
            2 * (64 + 16 + 16) + 2 * plaintext.len()
        );
        assert!(encoded
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));

        assert_eq!(codec.decrypt(&encoded).unwrap(), plaintext);
    }

    #[test]
    fn test_round_trip_edge_strings() {
        let codec = codec("test-secret-value");
        for plaintext in ["", "héllo wörld ✓ 🔐", "nul\0inside\0", "12345"] {
            let encoded = codec.encrypt(plaintext).unwrap();
            assert_eq!(codec.decrypt(&encoded).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_empty_plaintext_has_minimum_length() {
        let codec = codec("test-secret-value");
        let encoded = codec.encrypt("").unwrap();
        assert_eq!(encoded.len(), 2 * codec.layout().min_len());
        assert_eq!(codec.decrypt(&encoded).unwrap(), "");
    }

    #[test]
    fn test_encryption_is_not_deterministic() {
        let codec = codec("test-secret-value");
        let a = codec.encrypt("same input").unwrap();
        let b = codec.encrypt("same input").unwrap();
        assert_ne!(a, b);

        // salt and iv both differ
        let layout = codec.layout();
        let a_bytes = hex::decode(&a).unwrap();
        let b_bytes = hex::decode(&b).unwrap();
        let a_parts = layout.split(&a_bytes).unwrap();
        let b_parts = layout.split(&b_bytes).unwrap();
        assert_ne!(a_parts.salt, b_parts.salt);
        assert_ne!(a_parts.iv, b_parts.iv);

        assert_eq!(codec.decrypt(&a).unwrap(), "same input");
        assert_eq!(codec.decrypt(&b).unwrap(), "same input");
    }

    #[test]
    fn test_tampered_tag_and_ciphertext_rejected() {
        let codec = codec("test-secret-value");
        let encoded = codec.encrypt("ghp_exampletoken123").unwrap();
        let bytes = hex::decode(&encoded).unwrap();
        let tag_start = codec.layout().min_len() - TAG_SIZE;

        for i in tag_start..bytes.len() {
            let mut tampered = bytes.clone();
            tampered[i] ^= 0x01;
            let result = codec.decrypt(&hex::encode(&tampered));
            assert_eq!(result, Err(CodecError::Authentication), "byte {}", i);
        }
    }

    #[test]
    fn test_tampered_salt_and_iv_rejected() {
        let codec = codec("test-secret-value");
        let encoded = codec.encrypt("ghp_exampletoken123").unwrap();
        let mut bytes = hex::decode(&encoded).unwrap();
        bytes[0] ^= 0x80;
        assert_eq!(
            codec.decrypt(&hex::encode(&bytes)),
            Err(CodecError::Authentication)
        );

        let mut bytes = hex::decode(&encoded).unwrap();
        bytes[DEFAULT_SALT_LENGTH] ^= 0x80;
        assert_eq!(
            codec.decrypt(&hex::encode(&bytes)),
            Err(CodecError::Authentication)
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let a = codec("secret-a");
        let b = codec("secret-b");
        let encoded = a.encrypt("ghp_exampletoken123").unwrap();
        assert_eq!(b.decrypt(&encoded), Err(CodecError::Authentication));
    }

    #[test]
    fn test_changed_salt_length_rejected() {
        let a = codec("test-secret-value");
        let b = SecretCodec::with_config(
            "test-secret-value",
            CodecConfig {
                salt_length: 32,
                ..fast_config()
            },
        )
        .unwrap();
        let encoded = a.encrypt("ghp_exampletoken123").unwrap();
        assert_eq!(b.decrypt(&encoded), Err(CodecError::Authentication));
    }

    #[test]
    fn test_changed_iterations_rejected() {
        let a = codec("test-secret-value");
        let b = SecretCodec::with_config(
            "test-secret-value",
            CodecConfig {
                key_derivation_iterations: 1_001,
                ..fast_config()
            },
        )
        .unwrap();
        let encoded = a.encrypt("token").unwrap();
        assert_eq!(b.decrypt(&encoded), Err(CodecError::Authentication));
    }

    #[test]
    fn test_short_input_is_decoding_error() {
        let codec = codec("test-secret-value");
        let too_short = hex::encode(vec![0u8; DEFAULT_SALT_LENGTH + 31]);
        assert!(matches!(
            codec.decrypt(&too_short),
            Err(CodecError::Decoding(_))
        ));
        assert!(matches!(codec.decrypt(""), Err(CodecError::Decoding(_))));
    }

    #[test]
    fn test_minimum_length_garbage_is_authentication_error() {
        let codec = codec("test-secret-value");
        let garbage = hex::encode(vec![0u8; DEFAULT_SALT_LENGTH + 32]);
        assert_eq!(codec.decrypt(&garbage), Err(CodecError::Authentication));
    }

    #[test]
    fn test_non_hex_is_decoding_error() {
        let codec = codec("test-secret-value");
        assert!(matches!(
            codec.decrypt("not hex at all"),
            Err(CodecError::Decoding(_))
        ));
        // odd length
        assert!(matches!(codec.decrypt("abc"), Err(CodecError::Decoding(_))));
        // base64 from the old fallback path
        assert!(matches!(
            codec.decrypt("Z2hwX2V4YW1wbGV0b2tlbjEyMw=="),
            Err(CodecError::Decoding(_))
        ));
    }

    #[test]
    fn test_uppercase_hex_is_accepted() {
        let codec = codec("test-secret-value");
        let encoded = codec.encrypt("token").unwrap().to_uppercase();
        assert_eq!(codec.decrypt(&encoded).unwrap(), "token");
    }

    #[test]
    fn test_configuration_errors() {
        assert!(matches!(
            SecretCodec::new(""),
            Err(CodecError::Configuration(_))
        ));
        assert!(matches!(
            SecretCodec::with_config(
                "secret",
                CodecConfig {
                    salt_length: 0,
                    ..CodecConfig::default()
                }
            ),
            Err(CodecError::Configuration(_))
        ));
        assert!(matches!(
            SecretCodec::with_config(
                "secret",
                CodecConfig {
                    key_derivation_iterations: 0,
                    ..CodecConfig::default()
                }
            ),
            Err(CodecError::Configuration(_))
        ));
    }

    #[test]
    fn test_null_inputs_are_invalid() {
        let codec = codec("test-secret-value");
        assert!(matches!(
            codec.encrypt_opt(None),
            Err(CodecError::InvalidInput(_))
        ));
        assert!(matches!(
            codec.decrypt_opt(None),
            Err(CodecError::InvalidInput(_))
        ));

        let encoded = codec.encrypt_opt(Some("token")).unwrap();
        assert_eq!(codec.decrypt_opt(Some(&encoded)).unwrap(), "token");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let codec = codec("super-sensitive");
        let debug = format!("{:?}", codec);
        assert!(!debug.contains("super-sensitive"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_config_from_partial_document_uses_defaults() {
        let config: CodecConfig = serde_json::from_str(r#"{"salt_length": 16}"#).unwrap();
        assert_eq!(config.salt_length, 16);
        assert_eq!(
            config.key_derivation_iterations,
            DEFAULT_KEY_DERIVATION_ITERATIONS
        );
    }
}
