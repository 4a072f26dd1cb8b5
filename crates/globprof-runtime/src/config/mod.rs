//! Profiler config loader (environment, or strict YAML).

pub mod schema;

use std::fs;

use globprof_core::error::{ProfilerError, Result};

pub use schema::{
    ProfilerConfig, ENV_CONFIG_FILE, ENV_DEBUG, ENV_INTERVAL, ENV_LOG_FORMAT, ENV_LOG_PATH,
};

pub fn load_from_file(path: &str) -> Result<ProfilerConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| ProfilerError::BadConfig(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ProfilerConfig> {
    let cfg: ProfilerConfig = serde_yaml::from_str(s)
        .map_err(|e| ProfilerError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Startup config: the YAML file named by `PROFILER_CONFIG` if set,
/// otherwise the `PROFILER_*` environment variables.
pub fn load() -> Result<ProfilerConfig> {
    match std::env::var(ENV_CONFIG_FILE) {
        Ok(path) if !path.is_empty() => load_from_file(&path),
        _ => {
            let cfg = ProfilerConfig::from_env();
            cfg.validate()?;
            Ok(cfg)
        }
    }
}
