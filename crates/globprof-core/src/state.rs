//! Profiler state document and snapshot rendering.
//!
//! The state is a plain JSON object. Keys render in sorted order, so two
//! snapshots of equal states are byte-identical.

use std::io::Write;

use serde_json::{Map, Value};

use crate::error::Result;

/// The profiler state document.
pub type State = Map<String, Value>;

/// Reserved key holding the invocation count inside a rendered snapshot.
///
/// Only present while a snapshot is being rendered; never stored.
pub const INVOCATION_KEY: &str = "x";

/// Render `state` as a single-line JSON object carrying `invocations` under
/// [`INVOCATION_KEY`].
///
/// The key is injected into `state` for the duration of the call and removed
/// before returning, on both the success and the error path. A value a
/// mutation stored under the same key is overwritten and dropped.
pub fn render_snapshot(state: &mut State, invocations: u64) -> Result<String> {
    state.insert(INVOCATION_KEY.to_string(), Value::from(invocations));
    let rendered = serde_json::to_string(state);
    state.remove(INVOCATION_KEY);
    Ok(rendered?)
}

/// Render a snapshot, write it followed by `suffix`, and flush.
///
/// `state` is left without the injected key whatever the outcome.
pub fn write_snapshot<W: Write + ?Sized>(
    out: &mut W,
    state: &mut State,
    invocations: u64,
    suffix: &str,
) -> Result<()> {
    let line = render_snapshot(state, invocations)?;
    out.write_all(line.as_bytes())?;
    out.write_all(suffix.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Invocation count recorded in a parsed snapshot, if any.
pub fn invocation(snapshot: &State) -> Option<u64> {
    snapshot.get(INVOCATION_KEY).and_then(Value::as_u64)
}

/// Copy of a parsed snapshot without the injected invocation key.
pub fn strip_invocation(snapshot: &State) -> State {
    let mut out = snapshot.clone();
    out.remove(INVOCATION_KEY);
    out
}
