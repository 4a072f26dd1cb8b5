//! Best-effort log file writer.
//!
//! A sink that failed to open, or whose file stopped accepting writes, is
//! closed: every later write is skipped without an error. Observability must
//! never fail the host process.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use globprof_core::{state, LogFormat, State};

pub struct LogSink {
    path: PathBuf,
    format: LogFormat,
    writer: Option<BufWriter<File>>,
}

impl LogSink {
    /// Create (or truncate) the file at `path`. Failure yields a closed sink.
    pub fn open(path: impl AsRef<Path>, format: LogFormat) -> Self {
        let path = path.as_ref().to_path_buf();
        let writer = match File::create(&path) {
            Ok(f) => Some(BufWriter::new(f)),
            Err(e) => {
                tracing::warn!(path=%path.display(), error=%e, "profiler log unavailable, snapshots will be skipped");
                None
            }
        };
        Self { path, format, writer }
    }

    /// A sink that never writes.
    pub fn closed(format: LogFormat) -> Self {
        Self {
            path: PathBuf::new(),
            format,
            writer: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    pub fn write_header(&mut self) {
        self.write_raw(self.format.header());
    }

    pub fn write_trailer(&mut self) {
        self.write_raw(self.format.trailer());
    }

    /// Append one snapshot of `state`.
    pub fn write_snapshot(&mut self, state: &mut State, invocations: u64) {
        let suffix = self.format.snapshot_suffix();
        let Some(w) = self.writer.as_mut() else {
            return;
        };
        if let Err(e) = state::write_snapshot(w, state, invocations, suffix) {
            self.fail(&e);
        }
    }

    fn write_raw(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let Some(w) = self.writer.as_mut() else {
            return;
        };
        let res = w.write_all(text.as_bytes()).and_then(|_| w.flush());
        if let Err(e) = res {
            self.fail(&e);
        }
    }

    fn fail(&mut self, e: &dyn std::fmt::Display) {
        tracing::warn!(path=%self.path.display(), error=%e, "profiler log write failed, closing log");
        self.writer = None;
    }
}
