use std::io::Write;
use std::{fs, path::PathBuf};

use common::crypto::{CodecConfig, CodecError, SecretCodec};
use common::token_store::{FileTokenStore, SealedTokens};
use common::webhook::{WebhookError, WebhookVerifier};
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "tokenseal";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const TOKENS_FILE_NAME: &str = "tokens.json";
pub const DEFAULT_SECRET_ENV: &str = "TOKENSEAL_SECRET";
pub const DEFAULT_WEBHOOK_SECRET_ENV: &str = "TOKENSEAL_WEBHOOK_SECRET";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Codec tunables; changing these makes existing tokens unreadable
    #[serde(default)]
    pub codec: CodecConfig,
    /// Environment variable holding the shared encryption secret
    #[serde(default = "default_secret_env")]
    pub secret_env: String,
    /// Environment variable holding the webhook signing secret
    #[serde(default = "default_webhook_secret_env")]
    pub webhook_secret_env: String,
}

fn default_secret_env() -> String {
    DEFAULT_SECRET_ENV.to_string()
}

fn default_webhook_secret_env() -> String {
    DEFAULT_WEBHOOK_SECRET_ENV.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            codec: CodecConfig::default(),
            secret_env: default_secret_env(),
            webhook_secret_env: default_webhook_secret_env(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the tokenseal directory (~/.tokenseal)
    pub dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Path to the sealed token file
    pub tokens_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the tokenseal directory path (custom or default ~/.tokenseal)
    pub fn dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    fn at(dir: PathBuf, config: AppConfig) -> Self {
        Self {
            config_path: dir.join(CONFIG_FILE_NAME),
            tokens_path: dir.join(TOKENS_FILE_NAME),
            dir,
            config,
        }
    }

    /// Initialize a new tokenseal state directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let dir = Self::dir(custom_path)?;

        if dir.join(CONFIG_FILE_NAME).exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&dir)?;

        let state = Self::at(dir, config.unwrap_or_default());

        let config_toml = toml::to_string_pretty(&state.config)?;
        fs::write(&state.config_path, config_toml)?;
        write_if_absent(&state.tokens_path, "{}\n")?;

        tracing::info!(dir = %state.dir.display(), "initialized tokenseal directory");
        Ok(state)
    }

    /// Load existing state from the tokenseal directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let dir = Self::dir(custom_path)?;

        if !dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let config_path = dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        tracing::debug!(config = %config_path.display(), "loaded configuration");
        Ok(Self::at(dir, config))
    }

    /// Load state if the directory has been initialized, otherwise fall back
    /// to the default configuration without touching the filesystem
    pub fn load_or_default(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        match Self::load(custom_path.clone()) {
            Err(StateError::NotInitialized) => {
                tracing::debug!("no tokenseal directory, using default configuration");
                Ok(Self::at(Self::dir(custom_path)?, AppConfig::default()))
            }
            other => other,
        }
    }

    /// Build the secret codec from the configured environment variable.
    ///
    /// The secret is read once here and handed to the codec; nothing else
    /// looks it up.
    pub fn codec(&self) -> Result<SecretCodec, StateError> {
        let secret = read_env_secret(&self.config.secret_env)?;
        Ok(SecretCodec::with_config(secret, self.config.codec)?)
    }

    pub fn webhook_verifier(&self) -> Result<WebhookVerifier, StateError> {
        let secret = read_env_secret(&self.config.webhook_secret_env)?;
        Ok(WebhookVerifier::new(secret)?)
    }

    /// The raw token file, holding sealed values only; requires an
    /// initialized directory
    pub fn token_store(&self) -> Result<FileTokenStore, StateError> {
        if !self.config_path.exists() {
            return Err(StateError::NotInitialized);
        }
        Ok(FileTokenStore::new(&self.tokens_path))
    }

    /// Sealed tokens backed by the token file
    pub fn tokens(&self) -> Result<SealedTokens<FileTokenStore>, StateError> {
        let store = self.token_store()?;
        Ok(SealedTokens::new(self.codec()?, store))
    }
}

/// Create `path` with `contents` unless it already exists
fn write_if_absent(path: &std::path::Path, contents: &str) -> Result<(), StateError> {
    match fs::OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => {
            file.write_all(contents.as_bytes())?;
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            tracing::info!(path = %path.display(), "keeping existing token file");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn read_env_secret(var: &str) -> Result<String, StateError> {
    match std::env::var(var) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(StateError::MissingSecret(var.to_string())),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("tokenseal directory not initialized. Run 'tokenseal init' first")]
    NotInitialized,

    #[error("tokenseal directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("secret not set: export {0}")]
    MissingSecret(String),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Webhook(#[from] WebhookError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ts");
        let config = AppConfig {
            codec: CodecConfig {
                salt_length: 32,
                key_derivation_iterations: 2_000,
            },
            ..AppConfig::default()
        };

        let state = AppState::init(Some(path.clone()), Some(config.clone())).unwrap();
        assert!(state.config_path.exists());
        assert!(state.tokens_path.exists());

        let loaded = AppState::load(Some(path)).unwrap();
        assert_eq!(loaded.config, config);
    }

    #[test]
    fn test_init_twice_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ts");
        AppState::init(Some(path.clone()), None).unwrap();
        assert!(matches!(
            AppState::init(Some(path), None),
            Err(StateError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_init_keeps_existing_tokens() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ts");
        fs::create_dir_all(&path).unwrap();
        let existing = r#"{"installation/acme":"abcd"}"#;
        fs::write(path.join(TOKENS_FILE_NAME), existing).unwrap();

        let state = AppState::init(Some(path), None).unwrap();
        assert!(state.config_path.exists());
        assert_eq!(fs::read_to_string(&state.tokens_path).unwrap(), existing);
    }

    #[test]
    fn test_load_missing_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent");
        assert!(matches!(
            AppState::load(Some(path.clone())),
            Err(StateError::NotInitialized)
        ));

        let state = AppState::load_or_default(Some(path.clone())).unwrap();
        assert_eq!(state.config, AppConfig::default());
        assert!(!path.exists());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig = toml::from_str("[codec]\nsalt_length = 16\n").unwrap();
        assert_eq!(config.codec.salt_length, 16);
        assert_eq!(
            config.codec.key_derivation_iterations,
            common::crypto::DEFAULT_KEY_DERIVATION_ITERATIONS
        );
        assert_eq!(config.secret_env, DEFAULT_SECRET_ENV);
    }

    #[test]
    fn test_codec_reads_configured_env() {
        let dir = tempdir().unwrap();
        let mut state = AppState::load_or_default(Some(dir.path().join("x"))).unwrap();
        state.config.secret_env = "TOKENSEAL_TEST_STATE_CODEC_SECRET".to_string();
        state.config.codec.key_derivation_iterations = 1_000;

        assert!(matches!(
            state.codec(),
            Err(StateError::MissingSecret(_))
        ));

        std::env::set_var("TOKENSEAL_TEST_STATE_CODEC_SECRET", "from-env");
        let codec = state.codec().unwrap();
        let encoded = codec.encrypt("value").unwrap();
        assert_eq!(codec.decrypt(&encoded).unwrap(), "value");
    }

    #[test]
    fn test_tokens_require_init() {
        let dir = tempdir().unwrap();
        let state = AppState::load_or_default(Some(dir.path().join("x"))).unwrap();
        assert!(matches!(state.tokens(), Err(StateError::NotInitialized)));
    }
}
