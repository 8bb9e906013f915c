//! Configuration.
//!
//! Layers, later ones winning:
//! 1. built-in defaults
//! 2. a TOML file (optional)
//! 3. a `.env` file in the working directory (optional)
//! 4. `PINAX_*` environment variables
//!
//! ```toml
//! addr = "127.0.0.1:8080"
//! store = "document"
//! database_uri = "file:///var/lib/pinax"
//! redact_errors = true
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const ENV_PREFIX: &str = "PINAX_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to load .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),

    #[error("invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Which store backs the resources.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Memory,
    Document,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Listen address.
    pub addr: SocketAddr,
    /// Default filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Shared secret the auth gate expects, also what `/test-routes/login` hands out.
    pub auth_token: String,
    pub auth_header: String,
    pub store: StoreKind,
    /// Only read when `store = "document"`.
    pub database_uri: String,
    /// Start in-memory stores with the fixture records.
    pub seed: bool,
    /// Delete the matched record and its successor (compatibility mode).
    pub legacy_pair_delete: bool,
    /// Replace 5xx error descriptions with a fixed string.
    pub redact_errors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            log_level: "info".to_owned(),
            auth_token: "mysecrettoken".to_owned(),
            auth_header: "authorization".to_owned(),
            store: StoreKind::Memory,
            database_uri: "file://./data".to_owned(),
            seed: true,
            legacy_pair_delete: false,
            redact_errors: false,
        }
    }
}

/// Builds a [`Config`] layer by layer.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: Config,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound { path: path.to_owned() });
        }
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_owned(), source })?;
        self.with_toml(&content)
    }

    /// Replaces the current layer with `content`; keys it omits fall back to
    /// defaults.
    pub fn with_toml(mut self, content: &str) -> Result<Self, ConfigError> {
        self.config = toml::from_str(content)?;
        Ok(self)
    }

    /// Loads `.env` into the process environment if one exists.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(e.into()),
        }
    }

    /// Applies `PINAX_*` variables from the process environment.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_vars(std::env::vars())
    }

    /// Applies `PINAX_*` entries from `vars`; other keys are ignored.
    pub fn with_vars<I>(mut self, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if let Some(field) = key.strip_prefix(ENV_PREFIX) {
                self.apply(&key, field, value)?;
            }
        }
        Ok(self)
    }

    pub fn load(self) -> Config {
        self.config
    }

    fn apply(&mut self, var: &str, field: &str, value: String) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidValue { var: var.to_owned(), reason };
        let c = &mut self.config;
        match field {
            "ADDR" => c.addr = value.parse().map_err(|e| invalid(format!("{e}")))?,
            "LOG_LEVEL" => c.log_level = value,
            "AUTH_TOKEN" => c.auth_token = value,
            "AUTH_HEADER" => c.auth_header = value,
            "STORE" => {
                c.store = match value.to_ascii_lowercase().as_str() {
                    "memory" => StoreKind::Memory,
                    "document" => StoreKind::Document,
                    other => return Err(invalid(format!("unknown store `{other}`"))),
                }
            }
            "DATABASE_URI" => c.database_uri = value,
            "SEED" => c.seed = parse_bool(&value).ok_or_else(|| invalid(value.clone()))?,
            "LEGACY_PAIR_DELETE" => {
                c.legacy_pair_delete = parse_bool(&value).ok_or_else(|| invalid(value.clone()))?;
            }
            "REDACT_ERRORS" => c.redact_errors = parse_bool(&value).ok_or_else(|| invalid(value.clone()))?,
            _ => {}
        }
        Ok(())
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
    }

    #[test]
    fn defaults() {
        let config = ConfigLoader::new().load();
        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.auth_token, "mysecrettoken");
        assert_eq!(config.store, StoreKind::Memory);
        assert!(config.seed);
        assert!(!config.legacy_pair_delete);
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = ConfigLoader::new()
            .with_toml("store = \"document\"\nredact_errors = true\n")
            .unwrap()
            .load();
        assert_eq!(config.store, StoreKind::Document);
        assert!(config.redact_errors);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn unknown_toml_keys_are_rejected() {
        assert!(matches!(
            ConfigLoader::new().with_toml("colour = \"blue\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn env_overrides_toml() {
        let config = ConfigLoader::new()
            .with_toml("auth_token = \"from-file\"")
            .unwrap()
            .with_vars(vars(&[
                ("PINAX_AUTH_TOKEN", "from-env"),
                ("PINAX_ADDR", "127.0.0.1:9000"),
                ("PINAX_SEED", "off"),
                ("PINAX_STORE", "Document"),
                ("HOME", "/root"),
            ]))
            .unwrap()
            .load();
        assert_eq!(config.auth_token, "from-env");
        assert_eq!(config.addr.port(), 9000);
        assert!(!config.seed);
        assert_eq!(config.store, StoreKind::Document);
    }

    #[test]
    fn bad_env_values_name_the_variable() {
        let err = ConfigLoader::new()
            .with_vars(vars(&[("PINAX_REDACT_ERRORS", "maybe")]))
            .unwrap_err();
        assert!(err.to_string().contains("PINAX_REDACT_ERRORS"));

        let err = ConfigLoader::new()
            .with_vars(vars(&[("PINAX_ADDR", "nowhere")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = ConfigLoader::new().with_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }
}
