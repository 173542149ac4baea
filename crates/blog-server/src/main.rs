//! Blog backend server binary.
//!
//! This is the main entry point that wires together configuration,
//! logging, storage, and the REST API. It runs until `Ctrl-C` or
//! `SIGTERM`, then drains in-flight requests and closes the database pool.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `blog-config.yaml` (or `$BLOG_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Open the store: `PostgreSQL` when `database.url` is set, otherwise
//!    in-memory
//! 4. Apply migrations if enabled
//! 5. Serve the REST API
//! 6. Close the pool on shutdown

mod error;

use std::path::PathBuf;
use std::sync::Arc;

use blog_api::{AppState, ServerConfig};
use blog_core::config::{LogFormat, LoggingSection};
use blog_core::{BlogConfig, BlogStore, MemoryStore};
use blog_db::{PostgresConfig, PostgresPool};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "blog-config.yaml";

/// Application entry point for the blog server.
///
/// # Errors
///
/// Returns an error if configuration, the database, or the HTTP server
/// fails.
#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Load configuration.
    let config_path = config_path(|key| std::env::var(key).ok());
    let config = load_config(&config_path)?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!(
        config = %config_path.display(),
        host = config.server.host,
        port = config.server.port,
        "blog-server starting"
    );

    // 3. Open the store.
    let pool = if config.database.is_configured() {
        let pg_config = PostgresConfig::from_section(&config.database);
        let pool = PostgresPool::connect(&pg_config).await?;

        // 4. Apply migrations.
        if config.database.run_migrations {
            pool.run_migrations().await?;
        } else {
            info!("Skipping migrations (database.run_migrations = false)");
        }
        Some(pool)
    } else {
        warn!("No database.url configured, using in-memory store; data is lost on exit");
        None
    };

    let store: Arc<dyn BlogStore> = match &pool {
        Some(pool) => Arc::new(pool.store()),
        None => Arc::new(MemoryStore::new()),
    };

    // 5. Serve the REST API.
    let state = Arc::new(AppState::new(store));
    let server_config = ServerConfig::from(&config.server);
    let served = blog_api::start_server(&server_config, state).await;

    // 6. Close the pool, even if serving failed.
    if let Some(pool) = pool {
        pool.close().await;
    }

    served?;
    info!("blog-server stopped");
    Ok(())
}

/// Resolve the configuration file path: `$BLOG_CONFIG` if set, otherwise
/// [`DEFAULT_CONFIG_PATH`].
fn config_path<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    lookup("BLOG_CONFIG")
        .filter(|path| !path.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

/// Load configuration from `path`, falling back to defaults plus
/// environment overrides when the file does not exist.
fn load_config(path: &std::path::Path) -> Result<BlogConfig, AppError> {
    if path.exists() {
        Ok(BlogConfig::from_file(path)?)
    } else {
        // Logging is not up yet.
        eprintln!("Config file {} not found, using defaults", path.display());
        Ok(BlogConfig::from_env()?)
    }
}

/// Install the global tracing subscriber. `RUST_LOG` wins over the
/// configured level.
fn init_tracing(logging: &LoggingSection) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    match logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn config_path_defaults_to_working_directory_file() {
        assert_eq!(config_path(|_| None), PathBuf::from("blog-config.yaml"));
        assert_eq!(
            config_path(|_| Some(String::new())),
            PathBuf::from("blog-config.yaml")
        );
    }

    #[test]
    fn config_path_honours_override() {
        let path = config_path(|key| (key == "BLOG_CONFIG").then(|| "/etc/blog.yaml".to_owned()));
        assert_eq!(path, PathBuf::from("/etc/blog.yaml"));
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let config = load_config(Path::new("/nonexistent/blog-config.yaml"));
        assert!(config.is_ok());
    }
}
