//! Configuration resolution.
//!
//! Implements the resolution order:
//! 1. Explicit CLI overrides
//! 2. `LOGTRIAGE_*` environment variables
//! 3. Built-in defaults

use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

const ENV_INGEST_ROOT: &str = "LOGTRIAGE_INGEST_ROOT";
const ENV_PUBLIC_DIR: &str = "LOGTRIAGE_PUBLIC_DIR";
const ENV_LISTEN: &str = "LOGTRIAGE_LISTEN";
const ENV_BACKEND_URL: &str = "LOGTRIAGE_BACKEND_URL";
const ENV_MODEL: &str = "LOGTRIAGE_MODEL";

const DEFAULT_INGEST_ROOT: &str = "/srv/logtriage/ingest";
const DEFAULT_PUBLIC_DIR: &str = "/srv/logtriage/public";
const DEFAULT_LISTEN: &str = "0.0.0.0:8080";
const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:11434/api/generate";
const DEFAULT_MODEL: &str = "gemma3";

/// Errors raised by configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The listen address does not parse as `host:port`.
    #[error("invalid listen address '{0}': {1}")]
    InvalidListen(String, std::net::AddrParseError),

    /// The backend URL is not an http(s) endpoint.
    #[error("invalid backend URL '{0}': expected http:// or https://")]
    InvalidBackendUrl(String),

    /// The model identifier is empty.
    #[error("model identifier is empty")]
    EmptyModel,
}

/// Optional overrides supplied by the CLI layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub ingest_root: Option<PathBuf>,
    pub public_dir: Option<PathBuf>,
    pub listen: Option<String>,
    pub backend_url: Option<String>,
    pub model: Option<String>,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory holding the `uploads`, `reports` and `archive` roots.
    pub ingest_root: PathBuf,
    /// Directory holding static assets, pages and the site template.
    pub public_dir: PathBuf,
    /// Listen address for the HTTP front end.
    pub listen: String,
    /// Generate endpoint of the external text-generation service.
    pub backend_url: String,
    /// Model identifier submitted with every generation request.
    pub model: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ingest_root: PathBuf::from(DEFAULT_INGEST_ROOT),
            public_dir: PathBuf::from(DEFAULT_PUBLIC_DIR),
            listen: DEFAULT_LISTEN.to_string(),
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl Config {
    /// Resolve configuration from CLI overrides, environment and defaults.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Config, ConfigError> {
        let config = resolve_from(overrides, |name| env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parsed listen address.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listen
            .parse()
            .map_err(|err| ConfigError::InvalidListen(self.listen.clone(), err))
    }

    /// Check semantic validity of the resolved values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.listen_addr()?;
        if !self.backend_url.starts_with("http://") && !self.backend_url.starts_with("https://") {
            return Err(ConfigError::InvalidBackendUrl(self.backend_url.clone()));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }
        Ok(())
    }
}

fn resolve_from<F>(overrides: ConfigOverrides, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = Config::default();
    Config {
        ingest_root: overrides
            .ingest_root
            .or_else(|| lookup(ENV_INGEST_ROOT).map(PathBuf::from))
            .unwrap_or(defaults.ingest_root),
        public_dir: overrides
            .public_dir
            .or_else(|| lookup(ENV_PUBLIC_DIR).map(PathBuf::from))
            .unwrap_or(defaults.public_dir),
        listen: overrides
            .listen
            .or_else(|| lookup(ENV_LISTEN))
            .unwrap_or(defaults.listen),
        backend_url: overrides
            .backend_url
            .or_else(|| lookup(ENV_BACKEND_URL))
            .unwrap_or(defaults.backend_url),
        model: overrides
            .model
            .or_else(|| lookup(ENV_MODEL))
            .unwrap_or(defaults.model),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_without_overrides_or_env() {
        let config = resolve_from(ConfigOverrides::default(), |_| None);
        assert_eq!(config.ingest_root, PathBuf::from(DEFAULT_INGEST_ROOT));
        assert_eq!(config.listen, DEFAULT_LISTEN);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_beats_default() {
        let config = resolve_from(ConfigOverrides::default(), |name| match name {
            ENV_BACKEND_URL => Some("http://backend:11434/api/generate".to_string()),
            ENV_MODEL => Some("llama3".to_string()),
            _ => None,
        });
        assert_eq!(config.backend_url, "http://backend:11434/api/generate");
        assert_eq!(config.model, "llama3");
    }

    #[test]
    fn test_override_beats_env() {
        let overrides = ConfigOverrides {
            model: Some("mistral".to_string()),
            ..Default::default()
        };
        let config = resolve_from(overrides, |name| match name {
            ENV_MODEL => Some("llama3".to_string()),
            _ => None,
        });
        assert_eq!(config.model, "mistral");
    }

    #[test]
    fn test_validate_rejects_bad_listen() {
        let config = Config {
            listen: "not-an-address".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidListen(_, _))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_backend_url() {
        let config = Config {
            backend_url: "ftp://backend".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBackendUrl(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_model() {
        let config = Config {
            model: "  ".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyModel)));
    }
}
