//! Sample mutations used by the `globprof` binary and the end-to-end tests.

use std::time::Instant;

use serde_json::Value;

use globprof_core::State;

use crate::profiler::ProcessProfiler;

/// `count := 1` when absent, else `count + 1`.
pub fn count(mut s: State) -> State {
    let next = s.get("count").and_then(Value::as_u64).map_or(1, |c| c.saturating_add(1));
    s.insert("count".into(), Value::from(next));
    s
}

/// `doubled := 2 * count` (0 when `count` is missing).
pub fn doubled(mut s: State) -> State {
    let c = s.get("count").and_then(Value::as_u64).unwrap_or(0);
    s.insert("doubled".into(), Value::from(c.saturating_mul(2)));
    s
}

/// Records milliseconds since `start` under `elapsed_ms`.
pub fn elapsed_since(start: Instant) -> impl Fn(State) -> State {
    move |mut s| {
        let ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        s.insert("elapsed_ms".into(), Value::from(ms));
        s
    }
}

pub fn register_all(p: &mut ProcessProfiler, start: Instant) {
    p.register_mutation(count);
    p.register_mutation(doubled);
    p.register_mutation(elapsed_since(start));
}
