//! Layered configuration for CoachReserve.
//!
//! Sources, lowest priority first:
//! 1. `config/default.toml`
//! 2. `config/<RUN_ENV>.toml` (RUN_ENV defaults to `debug`)
//! 3. `COACHRESERVE__SECTION__KEY` environment variables
//!
//! A `.env` file is loaded once beforehand, and `"secret_from_env"` markers
//! are resolved afterwards (see [`env_vars`]).

use config::{Config, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub mod env_vars;
pub mod models;

pub use models::*;

/// Errors raised while loading the configuration.
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("failed to read configuration sources: {0}")]
    Source(#[from] config::ConfigError),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Loads the configuration from the directory named by `CONFIG_DIR`
/// (default `config`) for the environment named by `RUN_ENV`.
pub fn load_config() -> Result<AppConfig, ConfigLoadError> {
    ensure_dotenv_loaded();

    let config_dir = env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());

    load_config_from(Path::new(&config_dir), &run_env)
}

/// Loads the configuration from an explicit directory and environment name.
pub fn load_config_from(config_dir: &Path, run_env: &str) -> Result<AppConfig, ConfigLoadError> {
    let default_path: PathBuf = config_dir.join("default");
    let env_path: PathBuf = config_dir.join(run_env);

    debug!(
        "loading config from {} and {}",
        default_path.display(),
        env_path.display()
    );

    let settings = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix(env_vars::DEFAULT_PREFIX)
                .separator(env_vars::CONFIG_SEPARATOR)
                .try_parsing(true),
        )
        .build()?;

    let mut raw: serde_json::Value = settings.try_deserialize()?;
    if env_vars::inject_env_vars(&mut raw) {
        debug!("resolved secret_from_env markers from environment");
    }

    let config: AppConfig = serde_json::from_value(raw)?;
    config.validate().map_err(ConfigLoadError::Invalid)?;
    Ok(config)
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file into the process environment, once.
///
/// The path is taken from `DOTENV_OVERRIDE`, then from a first command line
/// argument starting with `.env`, and defaults to `.env`.
///
/// # Returns
///
/// The dotenv path that was (or would have been) loaded.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
