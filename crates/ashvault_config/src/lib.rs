//! Layered configuration for the Ashvault backend.
//!
//! Sources, later ones winning:
//! 1. `<config dir>/default.{toml,yaml,json}`
//! 2. `<config dir>/<RUN_ENV>.{toml,yaml,json}`
//! 3. environment variables `ASHVAULT__SECTION__KEY`
//!
//! After merging, every `"secret_from_env"` value is replaced from the
//! environment (see [`env_vars`]).

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod env_vars;
pub mod models;

pub use models::*;

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the `.env` file once per process.
///
/// `DOTENV_OVERRIDE` selects another file; a first CLI argument starting with
/// `.env` is honoured too. Returns the path that was tried.
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

/// Directory holding `default.toml` and the per-environment files.
pub fn config_dir() -> PathBuf {
    env::var("ASHVAULT_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"))
}

/// Loads the configuration for the current `RUN_ENV` (default `debug`).
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    load_config_from(&config_dir(), &run_env)
}

/// Loads the configuration from an explicit directory and environment name.
pub fn load_config_from(dir: &Path, run_env: &str) -> Result<AppConfig, ConfigError> {
    let prefix = env_vars::get_config_prefix();
    let default_path = dir.join("default");
    let env_path = dir.join(run_env);

    debug!(
        "Loading config from {} and {}",
        default_path.display(),
        env_path.display()
    );

    let path_str = |p: &Path| {
        p.to_str()
            .map(str::to_string)
            .ok_or_else(|| ConfigError::Message(format!("non UTF-8 config path: {}", p.display())))
    };

    let builder = Config::builder()
        .add_source(File::with_name(&path_str(&default_path)?).required(false))
        .add_source(File::with_name(&path_str(&env_path)?).required(false))
        .add_source(
            Environment::with_prefix(&prefix)
                .separator(env_vars::CONFIG_SEPARATOR)
                .try_parsing(true),
        );

    let mut raw: serde_json::Value = builder.build()?.try_deserialize()?;
    env_vars::inject_env_vars(&mut raw);

    serde_json::from_value(raw)
        .map_err(|err| ConfigError::Message(format!("failed to parse config: {err}")))
}
