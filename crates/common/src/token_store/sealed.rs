use std::sync::Arc;

use super::provider::TokenStore;
use super::slot::TokenSlot;
use crate::crypto::{CodecError, SecretCodec};

#[derive(Debug, thiserror::Error)]
pub enum SealedTokensError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("token store error: {0}")]
    Store(#[source] E),
}

/// Credential store that seals every value before it reaches the backing
/// [`TokenStore`] and opens it on the way out.
///
/// This is the only path by which credentials are written; there is no
/// unsealed or encoded-only mode.
///
/// `store` and `load` run key derivation inline on the calling task. Servers
/// handling many requests should call them from `tokio::task::spawn_blocking`
/// or a dedicated thread so PBKDF2 does not stall the executor.
#[derive(Debug, Clone)]
pub struct SealedTokens<S> {
    codec: Arc<SecretCodec>,
    store: S,
}

impl<S: TokenStore> SealedTokens<S> {
    pub fn new(codec: SecretCodec, store: S) -> Self {
        Self {
            codec: Arc::new(codec),
            store,
        }
    }

    pub fn codec(&self) -> &SecretCodec {
        &self.codec
    }

    /// The backing store, holding sealed values only
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Seal `plaintext` and write it to `slot`
    pub async fn store(
        &self,
        slot: &TokenSlot,
        plaintext: &str,
    ) -> Result<(), SealedTokensError<S::Error>> {
        let sealed = self.codec.encrypt(plaintext)?;
        self.store
            .put(slot, sealed)
            .await
            .map_err(SealedTokensError::Store)?;

        tracing::debug!(%slot, "stored sealed token");
        Ok(())
    }

    /// Read and open the value for `slot`
    ///
    /// # Errors
    ///
    /// An authentication failure means the stored value was modified or
    /// sealed under a different secret; it is logged as a possible integrity
    /// incident and returned to the caller.
    pub async fn load(
        &self,
        slot: &TokenSlot,
    ) -> Result<Option<String>, SealedTokensError<S::Error>> {
        let Some(sealed) = self.store.get(slot).await.map_err(SealedTokensError::Store)? else {
            return Ok(None);
        };

        match self.codec.decrypt(&sealed) {
            Ok(plaintext) => Ok(Some(plaintext)),
            Err(CodecError::Authentication) => {
                tracing::warn!(%slot, "stored token failed authentication, possible tampering");
                Err(CodecError::Authentication.into())
            }
            Err(e) => {
                tracing::warn!(%slot, error = %e, "stored token could not be decoded");
                Err(e.into())
            }
        }
    }

    /// Delete the value for `slot`, returning whether one was present
    pub async fn remove(&self, slot: &TokenSlot) -> Result<bool, SealedTokensError<S::Error>> {
        let removed = self
            .store
            .delete(slot)
            .await
            .map_err(SealedTokensError::Store)?;
        if removed {
            tracing::debug!(%slot, "removed sealed token");
        }
        Ok(removed)
    }

    pub async fn slots(&self) -> Result<Vec<TokenSlot>, SealedTokensError<S::Error>> {
        self.store.slots().await.map_err(SealedTokensError::Store)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::crypto::CodecConfig;
    use crate::token_store::MemoryTokenStore;

    fn sealed() -> SealedTokens<MemoryTokenStore> {
        let codec = SecretCodec::with_config(
            "test-secret-value",
            CodecConfig {
                key_derivation_iterations: 1_000,
                ..CodecConfig::default()
            },
        )
        .unwrap();
        SealedTokens::new(codec, MemoryTokenStore::new())
    }

    #[tokio::test]
    async fn test_store_and_load() {
        let tokens = sealed();
        let slot = TokenSlot::personal_access_token("u1").unwrap();

        tokens.store(&slot, "ghp_exampletoken123").await.unwrap();
        assert_eq!(
            tokens.load(&slot).await.unwrap(),
            Some("ghp_exampletoken123".to_string())
        );

        let raw = tokens.inner().get(&slot).await.unwrap().unwrap();
        assert!(!raw.contains("ghp_exampletoken123"));
        assert_ne!(raw, hex::encode("ghp_exampletoken123"));
    }

    #[tokio::test]
    async fn test_load_missing_is_none() {
        let tokens = sealed();
        let slot = TokenSlot::installation("acme").unwrap();
        assert_eq!(tokens.load(&slot).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_tampered_value_is_authentication_error() {
        let tokens = sealed();
        let slot = TokenSlot::installation("acme").unwrap();
        tokens.store(&slot, "12345678").await.unwrap();

        let raw = tokens.inner().get(&slot).await.unwrap().unwrap();
        let mut bytes = hex::decode(&raw).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        tokens
            .inner()
            .put(&slot, hex::encode(bytes))
            .await
            .unwrap();

        assert!(matches!(
            tokens.load(&slot).await,
            Err(SealedTokensError::Codec(CodecError::Authentication))
        ));
    }

    #[tokio::test]
    async fn test_legacy_base64_value_is_decoding_error() {
        let tokens = sealed();
        let slot = TokenSlot::personal_access_token("u1").unwrap();
        tokens
            .inner()
            .put(&slot, "Z2hwX2V4YW1wbGV0b2tlbjEyMw==".to_string())
            .await
            .unwrap();

        assert!(matches!(
            tokens.load(&slot).await,
            Err(SealedTokensError::Codec(CodecError::Decoding(_)))
        ));
    }

    #[tokio::test]
    async fn test_remove_and_slots() {
        let tokens = sealed();
        let slot = TokenSlot::personal_access_token("u1").unwrap();
        tokens.store(&slot, "t").await.unwrap();
        assert_eq!(tokens.slots().await.unwrap(), vec![slot.clone()]);
        assert!(tokens.remove(&slot).await.unwrap());
        assert!(!tokens.remove(&slot).await.unwrap());
        assert!(tokens.slots().await.unwrap().is_empty());
    }
}
