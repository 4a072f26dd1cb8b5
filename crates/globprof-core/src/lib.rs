//! globprof core: state representation, snapshot rendering, log framing and errors.
//!
//! This crate defines the on-disk snapshot contract shared by the runtime and
//! by any tooling that reads profiler logs back. It intentionally carries no
//! runtime or configuration dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Observability code must never take the host process down, so all fallible
//! paths surface as `ProfilerError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod logfile;
pub mod state;

/// Shared result type.
pub use error::{ProfilerError, Result};
pub use logfile::LogFormat;
pub use state::{State, INVOCATION_KEY};
