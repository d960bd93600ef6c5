pub mod app;
pub mod config;
pub mod db;
pub mod errors;
pub mod events;
pub mod fixtures;
pub mod models;
pub mod redaction;
pub mod remote;
pub mod repository;
pub mod services;
pub mod store;

pub use crate::app::AppCore;
pub use crate::config::{AppConfig, BackendConfig, PersistenceMode};
pub use crate::errors::{AppError, AppResult};
pub use crate::events::{DomainEvent, EventBus, Subscription};

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

static LOG_GUARD: std::sync::OnceLock<WorkerGuard> = std::sync::OnceLock::new();

/// Loads configuration, installs logging, and builds the application core.
/// `config_path` points at an optional YAML file; environment variables
/// override its values.
pub fn bootstrap(config_path: Option<&Path>) -> AppResult<std::sync::Arc<AppCore>> {
    let config = AppConfig::load(config_path)?;
    if let Err(error) = init_tracing(&config.log_dir(), &config.log_filter) {
        eprintln!("failed to initialize logging: {}", error);
    }
    AppCore::new(config)
}

pub fn init_tracing(log_dir: &Path, default_filter: &str) -> Result<(), String> {
    std::fs::create_dir_all(log_dir).map_err(|error| error.to_string())?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "zirtually.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .json()
        .with_writer(non_blocking)
        .try_init()
        .map_err(|error| error.to_string())
}
