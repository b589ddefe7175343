//! Shared test utilities for codec and token store integration tests
#![allow(dead_code)]

use ::common::crypto::{CodecConfig, SecretCodec};
use ::common::token_store::{FileTokenStore, SealedTokens};
use tempfile::TempDir;

pub const SHARED_SECRET: &str = "test-secret-value";

/// Route `tracing` output through the test harness; safe to call repeatedly
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Default salt length with a low iteration count to keep tests quick
pub fn fast_config() -> CodecConfig {
    CodecConfig {
        key_derivation_iterations: 1_000,
        ..CodecConfig::default()
    }
}

pub fn fast_codec(secret: &str) -> SecretCodec {
    SecretCodec::with_config(secret, fast_config()).unwrap()
}

/// Set up sealed tokens backed by a file in a fresh temp directory
pub fn setup_file_tokens() -> (SealedTokens<FileTokenStore>, TempDir) {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let store = FileTokenStore::new(temp_dir.path().join("tokens.json"));
    (SealedTokens::new(fast_codec(SHARED_SECRET), store), temp_dir)
}
