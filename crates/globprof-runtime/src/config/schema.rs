use std::ffi::OsString;
use std::path::PathBuf;

use serde::Deserialize;

use globprof_core::error::{ProfilerError, Result};
use globprof_core::LogFormat;

pub const ENV_INTERVAL: &str = "PROFILER_INTERVAL";
pub const ENV_DEBUG: &str = "DEBUG_PROFILER";
pub const ENV_LOG_PATH: &str = "PROFILER_LOG_PATH";
pub const ENV_LOG_FORMAT: &str = "PROFILER_LOG_FORMAT";
pub const ENV_CONFIG_FILE: &str = "PROFILER_CONFIG";

/// Settings fixed for the lifetime of a profiler.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfilerConfig {
    /// How often callers should invoke `mutate()`. Not consulted by the profiler.
    #[serde(default = "default_interval")]
    pub interval: u32,

    /// Echo every snapshot written by `mutate()` to stdout.
    #[serde(default)]
    pub debug: bool,

    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            debug: false,
            log_path: default_log_path(),
            format: LogFormat::default(),
        }
    }
}

impl ProfilerConfig {
    /// Read the `PROFILER_*` / `DEBUG_PROFILER` environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(|k| std::env::var_os(k))
    }

    /// Same rules as [`ProfilerConfig::from_env`] over an arbitrary lookup.
    ///
    /// Values are raw OS strings: the log path is taken byte for byte, the
    /// other variables are read lossily.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup(ENV_INTERVAL) {
            cfg.interval = parse_interval(&v.to_string_lossy());
        }
        if let Some(v) = lookup(ENV_DEBUG) {
            cfg.debug = v.to_string_lossy().starts_with('1');
        }
        if let Some(v) = lookup(ENV_LOG_PATH) {
            cfg.log_path = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_LOG_FORMAT) {
            let v = v.to_string_lossy();
            match LogFormat::parse(&v) {
                Some(f) => cfg.format = f,
                None => tracing::warn!(value=%v, "unknown PROFILER_LOG_FORMAT, using framed"),
            }
        }
        cfg
    }

    pub fn validate(&self) -> Result<()> {
        if self.log_path.as_os_str().is_empty() {
            return Err(ProfilerError::BadConfig("log_path must not be empty".into()));
        }
        Ok(())
    }
}

/// `atoi` stored into an unsigned: skip leading whitespace, optional sign,
/// leading decimal digits. No digits gives 0, magnitude saturates at
/// `u32::MAX`, and a negative value wraps (`-1` is `u32::MAX`).
fn parse_interval(raw: &str) -> u32 {
    let s = raw.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut n: u32 = 0;
    for d in s.bytes().take_while(u8::is_ascii_digit) {
        n = n.saturating_mul(10).saturating_add(u32::from(d - b'0'));
    }
    if negative {
        n.wrapping_neg()
    } else {
        n
    }
}

fn default_interval() -> u32 {
    10000
}
fn default_log_path() -> PathBuf {
    PathBuf::from("log.json")
}
