//! Sealed credential storage
//!
//! [`TokenStore`] is the persistence seam: it keeps opaque text keyed by the
//! owning record ([`TokenSlot`]). [`SealedTokens`] wraps any store and runs
//! every value through a [`SecretCodec`](crate::crypto::SecretCodec), so the
//! backing store only ever holds encoded secrets.

mod file;
mod memory;
mod provider;
mod sealed;
mod slot;

pub use file::{FileTokenStore, FileTokenStoreError};
pub use memory::{MemoryTokenStore, MemoryTokenStoreError};
pub use provider::TokenStore;
pub use sealed::{SealedTokens, SealedTokensError};
pub use slot::{TokenSlot, TokenSlotError};
