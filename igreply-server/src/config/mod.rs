//! Configuration module for igreply-server.
//!
//! Handles loading configuration from the TOML file, CLI arguments and
//! environment variables, and validating it into the runtime types used by
//! `igreply-core`.

pub mod file;

use crate::config::file::FileConfig;
use igreply_core::config::{
    AccountId, AccountRegistry, DEFAULT_VERIFY_TOKEN, GraphConfig, InvalidAccountId,
    WebhookConfig,
};
use igreply_core::env::ReadEnv;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Environment variable holding the handshake verify token.
pub const VERIFY_TOKEN_ENV: &str = "WEBHOOK_VERIFY_TOKEN";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("invalid graph base url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    InvalidAccount(#[from] InvalidAccountId),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Server configuration with runtime values.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The address and port to listen on.
    pub listen: SocketAddr,
    /// Largest webhook body read in full, in bytes.
    pub max_body_bytes: usize,
}

/// Loaded configuration result containing all parts.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub webhook: WebhookConfig,
    pub graph: GraphConfig,
    pub accounts: AccountRegistry,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    listen_override: Option<SocketAddr>,
    log_dir_override: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(
        config_path: impl AsRef<Path>,
        listen_override: Option<SocketAddr>,
        log_dir_override: Option<PathBuf>,
    ) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
            log_dir_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file (defaults if it does not exist)
    /// 2. Apply CLI overrides
    /// 3. Validate the configuration
    /// 4. Read the verify token from the environment
    pub fn load(&self, env: &impl ReadEnv) -> Result<LoadedConfig, ConfigError> {
        let mut file_config = match std::fs::read_to_string(&self.config_path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    path = %self.config_path.display(),
                    "Config file not found, using defaults"
                );
                FileConfig::default()
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }
        if let Some(log_dir) = &self.log_dir_override {
            file_config.webhook.log_dir = log_dir.clone();
        }

        let accounts = self.validate(&file_config)?;
        let verify_token = read_verify_token(env);

        Ok(LoadedConfig {
            server: ServerConfig {
                listen: file_config.server.listen,
                max_body_bytes: file_config.server.max_body_bytes,
            },
            webhook: WebhookConfig {
                verify_token,
                log_dir: file_config.webhook.log_dir,
                reply_text: file_config.webhook.reply_text,
            },
            graph: GraphConfig {
                base_url: Url::parse(&file_config.graph.base_url)?,
                api_version: file_config.graph.api_version,
                timeout: Duration::from_secs(file_config.graph.timeout_secs),
                max_concurrent_sends: file_config.graph.max_concurrent_sends,
            },
            accounts,
        })
    }

    fn validate(&self, config: &FileConfig) -> Result<AccountRegistry, ConfigError> {
        if config.server.max_body_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "server.max_body_bytes must be greater than zero".into(),
            ));
        }
        if config.graph.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "graph.timeout_secs must be greater than zero".into(),
            ));
        }
        if config.graph.max_concurrent_sends == 0 {
            return Err(ConfigError::ValidationError(
                "graph.max_concurrent_sends must be greater than zero".into(),
            ));
        }
        if config.graph.api_version.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "graph.api_version must not be empty".into(),
            ));
        }
        if config.webhook.reply_text.is_empty() {
            return Err(ConfigError::ValidationError(
                "webhook.reply_text must not be empty".into(),
            ));
        }

        let mut seen = HashSet::new();
        for raw in &config.accounts {
            let account = AccountId::parse(raw)?;
            if !seen.insert(account.clone()) {
                return Err(ConfigError::ValidationError(format!(
                    "account {account} is listed more than once"
                )));
            }
        }
        if seen.is_empty() {
            tracing::warn!("No accounts configured, inbound messages will not be answered");
        }
        Ok(AccountRegistry::new(seen))
    }
}

fn read_verify_token(env: &impl ReadEnv) -> String {
    match env.var(VERIFY_TOKEN_ENV) {
        Ok(token) if !token.is_empty() => token,
        _ => {
            tracing::warn!(
                "{VERIFY_TOKEN_ENV} is not set, falling back to the insecure default verify token"
            );
            DEFAULT_VERIFY_TOKEN.to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use igreply_core::env::MemEnv;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("igreply.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader::new(dir.path().join("absent.toml"), None, None);

        let config = loader.load(&MemEnv::new()).unwrap();
        assert_eq!(config.server.listen.port(), 3000);
        assert!(config.accounts.is_empty());
        assert!(config.webhook.uses_default_verify_token());
        assert_eq!(config.graph.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_loads_accounts_and_env_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), r#"accounts = ["17841401533576017"]"#);
        let env = MemEnv::new().with(VERIFY_TOKEN_ENV, "hunter2");

        let config = ConfigLoader::new(&path, None, None).load(&env).unwrap();
        assert!(config.accounts.contains("17841401533576017"));
        assert_eq!(config.webhook.verify_token, "hunter2");
        assert!(!config.webhook.uses_default_verify_token());
    }

    #[test]
    fn test_cli_overrides_win() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "[server]\nlisten = \"127.0.0.1:1\"\n[webhook]\nlog_dir = \"a\"\n",
        );
        let listen: SocketAddr = "127.0.0.1:9000".parse().unwrap();

        let config = ConfigLoader::new(&path, Some(listen), Some(PathBuf::from("b")))
            .load(&MemEnv::new())
            .unwrap();
        assert_eq!(config.server.listen, listen);
        assert_eq!(config.webhook.log_dir, PathBuf::from("b"));
    }

    #[test]
    fn test_rejects_bad_account_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), r#"accounts = ["not-a-number"]"#);
        let err = ConfigLoader::new(&path, None, None)
            .load(&MemEnv::new())
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAccount(_)));
    }

    #[test]
    fn test_rejects_duplicate_account() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), r#"accounts = ["1", " 1"]"#);
        let err = ConfigLoader::new(&path, None, None)
            .load(&MemEnv::new())
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[graph]\ntimeout_secs = 0\n");
        let err = ConfigLoader::new(&path, None, None)
            .load(&MemEnv::new())
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_rejects_zero_body_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[server]\nmax_body_bytes = 0\n");
        let err = ConfigLoader::new(&path, None, None)
            .load(&MemEnv::new())
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[graph]\nbase_url = \"not a url\"\n");
        let err = ConfigLoader::new(&path, None, None)
            .load(&MemEnv::new())
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl(_)));
    }
}
