//! globprof runtime library entry.
//!
//! Wires configuration, the mutation/listener registries and the log sink
//! into [`ProcessProfiler`]. Consumed by the `globprof` binary and by
//! integration tests.

pub mod config;
pub mod demo;
pub mod profiler;
pub mod registry;
pub mod sink;

pub use config::ProfilerConfig;
pub use profiler::{ProcessProfiler, ProfilerPhase};
