//! The profiler context.
//!
//! `ProcessProfiler` owns the state document, the mutation and listener
//! registries, the invocation counter and the log sink. It is constructed
//! explicitly from a [`ProfilerConfig`] and handed to whatever drives
//! `mutate()`; there is no global instance.
//!
//! Lifecycle: `Uninitialized -> Active -> Closed`. `start` opens the log and
//! writes the header, `close` (or drop) writes the trailer once.

use std::io::{self, Write};

use globprof_core::error::Result;
use globprof_core::logfile::SNAPSHOT_SUFFIX;
use globprof_core::{state, State};

use crate::config::ProfilerConfig;
use crate::registry::{ListenerRegistry, MutationRegistry};
use crate::sink::LogSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilerPhase {
    Uninitialized,
    Active,
    Closed,
}

pub struct ProcessProfiler {
    cfg: ProfilerConfig,
    phase: ProfilerPhase,
    state: State,
    invocations: u64,
    mutations: MutationRegistry,
    listeners: ListenerRegistry,
    sink: LogSink,
    debug_out: Box<dyn Write>,
}

impl ProcessProfiler {
    /// Build an `Uninitialized` profiler. The log file is not touched yet.
    pub fn new(cfg: ProfilerConfig) -> Self {
        let sink = LogSink::closed(cfg.format);
        Self {
            cfg,
            phase: ProfilerPhase::Uninitialized,
            state: State::new(),
            invocations: 0,
            mutations: MutationRegistry::new(),
            listeners: ListenerRegistry::new(),
            sink,
            debug_out: Box::new(io::stdout()),
        }
    }

    /// `new` followed by `start`.
    pub fn open(cfg: ProfilerConfig) -> Self {
        let mut p = Self::new(cfg);
        p.start();
        p
    }

    /// Open (truncate) the log file and write the header.
    /// Only acts on an `Uninitialized` profiler.
    pub fn start(&mut self) {
        if self.phase != ProfilerPhase::Uninitialized {
            return;
        }
        self.sink = LogSink::open(&self.cfg.log_path, self.cfg.format);
        self.sink.write_header();
        self.phase = ProfilerPhase::Active;
        tracing::info!(
            path=%self.cfg.log_path.display(),
            format=self.cfg.format.as_str(),
            debug=self.cfg.debug,
            interval=self.cfg.interval,
            log_open=self.sink.is_open(),
            "profiler started"
        );
    }

    /// Write the trailer and release the log file. Later calls are no-ops;
    /// `mutate` keeps updating state but nothing more reaches the log.
    pub fn close(&mut self) {
        if self.phase == ProfilerPhase::Active {
            self.sink.write_trailer();
            tracing::info!(invocations = self.invocations, "profiler closed");
        }
        self.sink = LogSink::closed(self.cfg.format);
        self.phase = ProfilerPhase::Closed;
    }

    /// Redirect debug snapshots (stdout by default). Still gated by `debug`.
    pub fn set_debug_writer(&mut self, w: impl Write + 'static) {
        self.debug_out = Box::new(w);
    }

    pub fn register_mutation<F>(&mut self, f: F)
    where
        F: Fn(State) -> State + 'static,
    {
        self.mutations.register(f);
    }

    /// Listeners are not fired by `mutate`; see [`ProcessProfiler::notify_listeners`].
    pub fn register_listener<F>(&mut self, f: F)
    where
        F: Fn(&State) + 'static,
    {
        self.listeners.register(f);
    }

    /// Call every listener, in registration order, with the current state.
    pub fn notify_listeners(&self) {
        self.listeners.notify(&self.state);
    }

    /// Count the invocation, fold the mutations over the state, then emit the
    /// snapshot to stdout (debug only) and to the log.
    pub fn mutate(&mut self) {
        self.invocations += 1;
        let prev = std::mem::take(&mut self.state);
        self.state = self.mutations.apply(prev);

        if self.cfg.debug {
            if let Err(e) = state::write_snapshot(
                &mut *self.debug_out,
                &mut self.state,
                self.invocations,
                SNAPSHOT_SUFFIX,
            ) {
                tracing::debug!(error=%e, kind=e.kind(), "debug snapshot failed");
            }
        }
        self.log();
    }

    /// Append a snapshot to the log if it is open.
    pub fn log(&mut self) {
        self.sink.write_snapshot(&mut self.state, self.invocations);
    }

    /// Write one snapshot line (`{...},\n`) to `out`.
    pub fn print<W: Write + ?Sized>(&mut self, out: &mut W) -> Result<()> {
        state::write_snapshot(out, &mut self.state, self.invocations, SNAPSHOT_SUFFIX)
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn invocations(&self) -> u64 {
        self.invocations
    }

    pub fn interval(&self) -> u32 {
        self.cfg.interval
    }

    pub fn is_debug(&self) -> bool {
        self.cfg.debug
    }

    pub fn is_log_open(&self) -> bool {
        self.sink.is_open()
    }

    pub fn phase(&self) -> ProfilerPhase {
        self.phase
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.cfg
    }

    pub fn mutation_count(&self) -> usize {
        self.mutations.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Drop for ProcessProfiler {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn unlogged() -> ProfilerConfig {
        ProfilerConfig {
            log_path: "/nonexistent-dir/globprof/log.json".into(),
            ..ProfilerConfig::default()
        }
    }

    #[test]
    fn new_is_uninitialized_until_started() {
        let mut p = ProcessProfiler::new(unlogged());
        assert_eq!(p.phase(), ProfilerPhase::Uninitialized);
        p.start();
        assert_eq!(p.phase(), ProfilerPhase::Active);
        assert!(!p.is_log_open());
        p.close();
        assert_eq!(p.phase(), ProfilerPhase::Closed);
        p.start();
        assert_eq!(p.phase(), ProfilerPhase::Closed);
    }

    #[test]
    fn mutate_without_log_does_not_fail() {
        let mut p = ProcessProfiler::open(unlogged());
        p.register_mutation(|mut s| {
            s.insert("seen".into(), Value::Bool(true));
            s
        });
        p.mutate();
        p.log();
        assert_eq!(p.invocations(), 1);
        assert_eq!(p.state()["seen"], true);
    }

    #[test]
    fn print_injects_and_removes_count() {
        let mut p = ProcessProfiler::new(unlogged());
        p.register_mutation(|mut s| {
            s.insert("a".into(), json!([1, {"b": null}]));
            s
        });
        p.mutate();
        let mut buf = Vec::new();
        p.print(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "{\"a\":[1,{\"b\":null}],\"x\":1},\n");
        assert!(!p.state().contains_key("x"));
    }

    #[test]
    fn listeners_only_fire_on_notify() {
        let hits = Rc::new(RefCell::new(0u32));
        let mut p = ProcessProfiler::new(unlogged());
        let h = Rc::clone(&hits);
        p.register_listener(move |_s: &State| *h.borrow_mut() += 1);
        p.mutate();
        p.mutate();
        assert_eq!(*hits.borrow(), 0);
        p.notify_listeners();
        assert_eq!(*hits.borrow(), 1);
        assert_eq!(p.listener_count(), 1);
    }

    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, b: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(b);
            Ok(b.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn debug_output_is_gated() {
        let quiet = SharedBuf::default();
        let mut p = ProcessProfiler::new(unlogged());
        p.set_debug_writer(quiet.clone());
        p.mutate();
        assert!(quiet.0.borrow().is_empty());

        let loud = SharedBuf::default();
        let mut p = ProcessProfiler::new(ProfilerConfig {
            debug: true,
            ..unlogged()
        });
        p.set_debug_writer(loud.clone());
        p.mutate();
        p.mutate();
        let out = String::from_utf8(loud.0.borrow().clone()).unwrap();
        assert_eq!(out, "{\"x\":1},\n{\"x\":2},\n");
    }

    #[test]
    fn debug_flag_only_changes_stdout() {
        let dir = tempfile::tempdir().unwrap();

        let quiet_path = dir.path().join("quiet.json");
        let quiet = SharedBuf::default();
        let mut p = ProcessProfiler::open(ProfilerConfig {
            log_path: quiet_path.clone(),
            ..ProfilerConfig::default()
        });
        p.set_debug_writer(quiet.clone());
        p.mutate();
        p.close();
        assert!(quiet.0.borrow().is_empty());
        let logged = std::fs::read_to_string(&quiet_path).unwrap();
        assert_eq!(logged, "[\n{\"x\":1},\n\"EOF\"]\n");

        let loud_path = dir.path().join("loud.json");
        let loud = SharedBuf::default();
        let mut p = ProcessProfiler::open(ProfilerConfig {
            debug: true,
            log_path: loud_path.clone(),
            ..ProfilerConfig::default()
        });
        p.set_debug_writer(loud.clone());
        p.register_mutation(|mut s| {
            s.insert("k".into(), json!("v"));
            s
        });
        p.mutate();
        p.close();
        let stdout_line = String::from_utf8(loud.0.borrow().clone()).unwrap();
        let logged = std::fs::read_to_string(&loud_path).unwrap();
        let log_line = logged
            .strip_prefix("[\n")
            .and_then(|rest| rest.strip_suffix("\"EOF\"]\n"))
            .unwrap();
        assert_eq!(stdout_line, "{\"k\":\"v\",\"x\":1},\n");
        assert_eq!(stdout_line, log_line);
    }
}
