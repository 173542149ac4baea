//! Configuration loading and typed config structures for the blog backend.
//!
//! The canonical configuration lives in `blog-config.yaml`. Every section
//! and field has a default, so an empty file (or no file at all) yields a
//! server on `0.0.0.0:8080` backed by the in-memory store.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid value for {key}: {message}")]
    Env {
        /// The environment variable name.
        key: &'static str,
        /// Why the value was rejected.
        message: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BlogConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseSection,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSection,
}

impl BlogConfig {
    /// Load configuration from a YAML file, then apply environment
    /// overrides:
    /// - `DATABASE_URL` overrides `database.url`
    /// - `BLOG_HOST` overrides `server.host`
    /// - `BLOG_PORT` overrides `server.port`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Env`] if an override is malformed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Build configuration from defaults plus environment overrides, for
    /// when no file is present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] if an override is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse configuration from a YAML string. No overrides are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply overrides from a variable lookup (normally the process
    /// environment).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] if `BLOG_PORT` is not a valid port.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = lookup("BLOG_HOST") {
            self.server.host = val;
        }
        if let Some(val) = lookup("BLOG_PORT") {
            self.server.port = val.parse().map_err(|e| ConfigError::Env {
                key: "BLOG_PORT",
                message: format!("{e}"),
            })?;
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseSection {
    /// `PostgreSQL` connection URL. Empty selects the in-memory store.
    #[serde(default)]
    pub url: String,

    /// Maximum pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Seconds before an idle connection is closed.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// Whether to apply pending migrations at startup.
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

impl DatabaseSection {
    /// Whether a database URL was configured.
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty()
    }

    /// Connection acquire timeout.
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Idle connection timeout.
    pub const fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout_secs(),
            idle_timeout_secs: default_idle_timeout_secs(),
            run_migrations: true,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingSection {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Pretty,
        }
    }
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    8080
}

const fn default_max_connections() -> u32 {
    10
}

const fn default_connect_timeout_secs() -> u64 {
    5
}

const fn default_idle_timeout_secs() -> u64 {
    300
}

const fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    String::from("info")
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn parse_empty_yaml() {
        let config = BlogConfig::parse("").ok();
        assert_eq!(config, Some(BlogConfig::default()));
    }

    #[test]
    fn parse_partial_yaml_keeps_defaults() {
        let yaml = "server:\n  port: 9090\nlogging:\n  format: json\n";
        let config = BlogConfig::parse(yaml).ok().unwrap_or_default();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.database.max_connections, 10);
        assert!(config.database.run_migrations);
        assert!(!config.database.is_configured());
    }

    #[test]
    fn parse_full_database_section() {
        let yaml = "database:\n  url: postgresql://blog@localhost/blog\n  max_connections: 4\n  connect_timeout_secs: 2\n  idle_timeout_secs: 60\n  run_migrations: false\n";
        let config = BlogConfig::parse(yaml).ok().unwrap_or_default();

        assert!(config.database.is_configured());
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.database.connect_timeout(), Duration::from_secs(2));
        assert_eq!(config.database.idle_timeout(), Duration::from_secs(60));
        assert!(!config.database.run_migrations);
    }

    #[test]
    fn invalid_yaml_is_rejected() {
        let result = BlogConfig::parse("server: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn overrides_replace_file_values() {
        let vars: BTreeMap<&str, &str> = [
            ("DATABASE_URL", "postgresql://env@db/blog"),
            ("BLOG_HOST", "127.0.0.1"),
            ("BLOG_PORT", "3000"),
        ]
        .into_iter()
        .collect();

        let mut config = BlogConfig::default();
        let result = config.apply_overrides(|key| vars.get(key).map(|v| (*v).to_owned()));

        assert!(result.is_ok());
        assert_eq!(config.database.url, "postgresql://env@db/blog");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn malformed_port_override_is_rejected() {
        let mut config = BlogConfig::default();
        let result = config.apply_overrides(|key| (key == "BLOG_PORT").then(|| "http".to_owned()));
        assert!(matches!(
            result,
            Err(ConfigError::Env {
                key: "BLOG_PORT",
                ..
            })
        ));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("blog-config.yaml");
        if path.exists() {
            let contents = std::fs::read_to_string(&path).unwrap_or_default();
            let config = BlogConfig::parse(&contents);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
