//! Byte layout of an encoded secret
//!
//! ```text
//! | salt (salt_length) | iv (16) | tag (16) | ciphertext (remainder) |
//! ```
//!
//! Offsets are computed once from the configured salt length so that
//! encoding and decoding always agree on where each field starts.

use super::codec::CodecError;

/// Size of the AES-GCM initialization vector in bytes
pub const IV_SIZE: usize = 16;
/// Size of the AES-GCM authentication tag in bytes
pub const TAG_SIZE: usize = 16;

/// Named offsets into an encoded secret for a given salt length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedLayout {
    salt_length: usize,
    iv_offset: usize,
    tag_offset: usize,
    ciphertext_offset: usize,
}

/// Borrowed view over the four fields of an encoded secret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SealedParts<'a> {
    pub salt: &'a [u8],
    pub iv: &'a [u8],
    pub tag: &'a [u8],
    pub ciphertext: &'a [u8],
}

impl EncodedLayout {
    pub fn new(salt_length: usize) -> Self {
        let iv_offset = salt_length;
        let tag_offset = iv_offset + IV_SIZE;
        let ciphertext_offset = tag_offset + TAG_SIZE;
        Self {
            salt_length,
            iv_offset,
            tag_offset,
            ciphertext_offset,
        }
    }

    pub fn salt_length(&self) -> usize {
        self.salt_length
    }

    /// Smallest valid encoded secret (an empty ciphertext)
    pub fn min_len(&self) -> usize {
        self.ciphertext_offset
    }

    /// Total encoded length for a ciphertext of `ciphertext_len` bytes
    pub fn encoded_len(&self, ciphertext_len: usize) -> usize {
        self.ciphertext_offset + ciphertext_len
    }

    /// Split raw bytes into their fields.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Decoding`] if `bytes` is shorter than [`Self::min_len`].
    pub fn split<'a>(&self, bytes: &'a [u8]) -> Result<SealedParts<'a>, CodecError> {
        if bytes.len() < self.min_len() {
            return Err(CodecError::Decoding(format!(
                "encoded secret too short, expected at least {} bytes, got {}",
                self.min_len(),
                bytes.len()
            )));
        }

        Ok(SealedParts {
            salt: &bytes[..self.iv_offset],
            iv: &bytes[self.iv_offset..self.tag_offset],
            tag: &bytes[self.tag_offset..self.ciphertext_offset],
            ciphertext: &bytes[self.ciphertext_offset..],
        })
    }

    /// Concatenate the fields back into a single buffer.
    ///
    /// Callers must pass a salt of the configured length and fixed-size
    /// iv/tag; the layout does not pad or truncate.
    pub fn join(&self, parts: &SealedParts<'_>) -> Vec<u8> {
        debug_assert_eq!(parts.salt.len(), self.salt_length);
        debug_assert_eq!(parts.iv.len(), IV_SIZE);
        debug_assert_eq!(parts.tag.len(), TAG_SIZE);

        let mut out = Vec::with_capacity(self.encoded_len(parts.ciphertext.len()));
        out.extend_from_slice(parts.salt);
        out.extend_from_slice(parts.iv);
        out.extend_from_slice(parts.tag);
        out.extend_from_slice(parts.ciphertext);
        out
    }
}
