use std::fmt::Debug;

use async_trait::async_trait;

use super::slot::TokenSlot;

/// Persistence seam for sealed credentials.
///
/// Implementations store opaque text keyed by [`TokenSlot`]. They never see
/// plaintext: values arrive already sealed by
/// [`SealedTokens`](super::SealedTokens) and are handed back unchanged.
#[async_trait]
pub trait TokenStore: Send + Sync + Debug + Clone + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Get the stored value for a slot
    ///
    /// # Returns
    /// * `Ok(None)` - Nothing is stored for the slot
    /// * `Ok(Some(value))` - The value exactly as it was written
    async fn get(&self, slot: &TokenSlot) -> Result<Option<String>, Self::Error>;

    /// Write a value for a slot, replacing any existing value
    async fn put(&self, slot: &TokenSlot, value: String) -> Result<(), Self::Error>;

    /// Delete the value for a slot
    ///
    /// # Returns
    /// * `Ok(true)` - A value was present and has been removed
    /// * `Ok(false)` - Nothing was stored for the slot
    async fn delete(&self, slot: &TokenSlot) -> Result<bool, Self::Error>;

    /// List every slot that currently holds a value, in sorted order
    async fn slots(&self) -> Result<Vec<TokenSlot>, Self::Error>;
}
