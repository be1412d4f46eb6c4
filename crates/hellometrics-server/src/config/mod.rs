//! Service config loader (strict parsing).

pub mod schema;

use std::fs;
use std::io::ErrorKind;

use hellometrics_core::error::{HelloMetricsError, Result};

pub use schema::{AppConfig, MetricsSection, ServerSection};

/// Default config path when neither a CLI argument nor the env var is given.
pub const DEFAULT_CONFIG_PATH: &str = "hellometrics.yaml";
/// Env var naming the config path.
pub const CONFIG_ENV: &str = "HELLOMETRICS_CONFIG";

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| HelloMetricsError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<AppConfig> {
    let cfg: AppConfig = serde_yaml::from_str(s)
        .map_err(|e| HelloMetricsError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Resolve and load the config.
///
/// `explicit` is the CLI argument or env var value; a missing explicit file is
/// an error. Without one, a missing `hellometrics.yaml` falls back to
/// built-in defaults.
pub fn load(explicit: Option<String>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        return load_from_file(&path);
    }
    match fs::read_to_string(DEFAULT_CONFIG_PATH) {
        Ok(s) => load_from_str(&s),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(path = DEFAULT_CONFIG_PATH, "config file not found, using defaults");
            Ok(AppConfig::default())
        }
        Err(e) => Err(HelloMetricsError::Internal(format!(
            "read config failed ({DEFAULT_CONFIG_PATH}): {e}"
        ))),
    }
}
