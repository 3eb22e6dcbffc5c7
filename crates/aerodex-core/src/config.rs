//! Configuration types for Aerodex components.
//!
//! Values are layered: built-in defaults, then the optional TOML file at
//! [`default_config_path`] (or an explicit `--config` path), then environment
//! variables and command-line flags, which the CLI resolves on top of the
//! [`FileConfig`] returned here.
//!
//! ```toml
//! [database]
//! max_connections = 10
//!
//! [upstream]
//! base_url = "https://api.aviationapi.com/v1"
//! timeout_secs = 30
//!
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! request_timeout_secs = 90
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::AppError;

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub max_connections: u32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self { max_connections: 5 }
    }
}

/// HTTP client configuration for the upstream registry.
///
/// A reconciliation run makes a single attempt and surfaces any failure to its
/// caller, so there is no retry setting.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
        }
    }
}

/// Contents of the optional `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub database: DatabaseSection,
    #[serde(default)]
    pub upstream: UpstreamSection,
    #[serde(default)]
    pub server: ServerSection,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DatabaseSection {
    pub url: Option<String>,
    pub max_connections: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct UpstreamSection {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub request_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Pool settings with file overrides applied to the defaults.
    pub fn db_config(&self) -> DbConfig {
        let defaults = DbConfig::default();
        DbConfig {
            max_connections: self
                .database
                .max_connections
                .unwrap_or(defaults.max_connections),
        }
    }

    /// Upstream client settings with file overrides applied to the defaults.
    pub fn http_config(&self) -> HttpConfig {
        match self.upstream.timeout_secs {
            Some(secs) => HttpConfig {
                timeout: Duration::from_secs(secs),
            },
            None => HttpConfig::default(),
        }
    }
}

/// Returns `<config dir>/aerodex/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("aerodex").join("config.toml"))
}

/// Loads the configuration file.
///
/// With `Some(path)` the file must exist. With `None` the default location is
/// tried and a missing file yields [`FileConfig::default`].
///
/// # Errors
///
/// Returns `AppError::Config` if the file cannot be read or is not valid TOML.
pub fn load_config(path: Option<&Path>) -> Result<FileConfig, AppError> {
    let (path, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => match default_config_path() {
            Some(p) => (p, false),
            None => return Ok(FileConfig::default()),
        },
    };

    if !required && !path.exists() {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        return Ok(FileConfig::default());
    }

    let raw = std::fs::read_to_string(&path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {}", path.display(), e)))?;

    let config: FileConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("invalid {}: {}", path.display(), e)))?;

    tracing::debug!(path = %path.display(), "Loaded config file");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_db_config_defaults() {
        let config = DbConfig::default();
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn test_http_config_defaults() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_load_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[database]
max_connections = 12

[upstream]
base_url = "https://registry.example/v1"
timeout_secs = 15

[server]
port = 8080
"#
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.db_config().max_connections, 12);
        assert_eq!(config.http_config().timeout, Duration::from_secs(15));
        assert_eq!(
            config.upstream.base_url.as_deref(),
            Some("https://registry.example/v1")
        );
        assert_eq!(config.server.port, Some(8080));
        assert_eq!(config.server.host, None);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nhost = \"127.0.0.1\"").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.db_config().max_connections, 5);
        assert_eq!(config.http_config().timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = load_config(Some(&missing)).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[upstream]\nretries = 3").unwrap();

        let err = load_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("invalid"));
    }
}
