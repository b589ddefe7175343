//! Key derivation for the secret codec
//!
//! PBKDF2 over HMAC-SHA512, producing a 256-bit AES key. The key lives in a
//! [`Zeroizing`] buffer and is wiped as soon as the caller drops it.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha512;
use zeroize::Zeroizing;

/// Size of the derived AES-256 key in bytes
pub const KEY_SIZE: usize = 32;

/// Derive the per-call encryption key from the shared secret and a salt.
///
/// Deterministic in `(secret, salt, iterations)`.
pub fn derive_key(secret: &[u8], salt: &[u8], iterations: u32) -> Zeroizing<[u8; KEY_SIZE]> {
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    pbkdf2_hmac::<Sha512>(secret, salt, iterations, key.as_mut());
    key
}
