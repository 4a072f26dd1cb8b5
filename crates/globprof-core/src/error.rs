//! Shared error type across globprof crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, ProfilerError>;

/// Unified error type used by core and runtime.
#[derive(Debug, Error)]
pub enum ProfilerError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("malformed log at line {line}: {reason}")]
    MalformedLog { line: usize, reason: String },
}

impl ProfilerError {
    /// Stable short name, used in structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ProfilerError::Io(_) => "IO",
            ProfilerError::Json(_) => "JSON",
            ProfilerError::BadConfig(_) => "BAD_CONFIG",
            ProfilerError::MalformedLog { .. } => "MALFORMED_LOG",
        }
    }

    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        ProfilerError::MalformedLog {
            line,
            reason: reason.into(),
        }
    }
}
