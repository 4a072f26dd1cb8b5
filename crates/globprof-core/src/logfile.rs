//! Snapshot log framing (write-side constants and read-side parsing).
//!
//! Framed layout (the default, kept byte-compatible with existing consumers):
//!
//! ```text
//! [
//! {"count":1,"x":1},
//! {"count":2,"x":2},
//! "EOF"]
//! ```
//!
//! This is *almost* a JSON array: the last snapshot keeps its trailing comma
//! before the sentinel string, so the file must be read line by line rather
//! than handed to a JSON parser as a whole. The JSON-lines layout drops the
//! header, the commas and the sentinel.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ProfilerError, Result};
use crate::state::State;

/// Leading line of a framed log.
pub const HEADER: &str = "[\n";
/// Written after each framed snapshot.
pub const SNAPSHOT_SUFFIX: &str = ",\n";
/// Closing sentinel line of a framed log.
pub const TRAILER: &str = "\"EOF\"]\n";

const HEADER_LINE: &str = "[";
const TRAILER_LINE: &str = "\"EOF\"]";

/// On-disk snapshot layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// `[` header, `{..},` per snapshot, `"EOF"]` trailer.
    #[default]
    Framed,
    /// One JSON object per line.
    Jsonl,
}

impl LogFormat {
    /// Parse the textual name used in configuration.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "framed" => Some(LogFormat::Framed),
            "jsonl" | "json-lines" => Some(LogFormat::Jsonl),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogFormat::Framed => "framed",
            LogFormat::Jsonl => "jsonl",
        }
    }

    /// Text written once when the log is opened.
    pub fn header(self) -> &'static str {
        match self {
            LogFormat::Framed => HEADER,
            LogFormat::Jsonl => "",
        }
    }

    /// Text written after each rendered snapshot.
    pub fn snapshot_suffix(self) -> &'static str {
        match self {
            LogFormat::Framed => SNAPSHOT_SUFFIX,
            LogFormat::Jsonl => "\n",
        }
    }

    /// Text written once when the log is closed.
    pub fn trailer(self) -> &'static str {
        match self {
            LogFormat::Framed => TRAILER,
            LogFormat::Jsonl => "",
        }
    }
}

/// Parse a framed log.
///
/// The header is required. The trailer is optional so that the log of a
/// process that is still running (or died) can be read; nothing but blank
/// lines may follow it.
pub fn parse_framed(text: &str) -> Result<Vec<State>> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));

    if !matches!(lines.next(), Some((_, HEADER_LINE))) {
        return Err(ProfilerError::malformed(1, "missing '[' header"));
    }

    let mut out = Vec::new();
    let mut closed = false;
    for (n, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        if closed {
            return Err(ProfilerError::malformed(n, "content after \"EOF\"] trailer"));
        }
        if line == TRAILER_LINE {
            closed = true;
            continue;
        }
        let body = line
            .strip_suffix(',')
            .ok_or_else(|| ProfilerError::malformed(n, "snapshot missing trailing ','"))?;
        out.push(parse_object(n, body)?);
    }
    Ok(out)
}

/// Parse a JSON-lines log; blank lines are skipped.
pub fn parse_json_lines(text: &str) -> Result<Vec<State>> {
    text.lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| parse_object(i + 1, l))
        .collect()
}

/// Read and parse a log file written in `format`.
pub fn read_snapshots(path: impl AsRef<Path>, format: LogFormat) -> Result<Vec<State>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let snaps = match format {
        LogFormat::Framed => parse_framed(&text)?,
        LogFormat::Jsonl => parse_json_lines(&text)?,
    };
    tracing::debug!(path=%path.display(), format=format.as_str(), snapshots=snaps.len(), "read profiler log");
    Ok(snaps)
}

fn parse_object(line: usize, body: &str) -> Result<State> {
    let v: Value = serde_json::from_str(body)
        .map_err(|e| ProfilerError::malformed(line, format!("invalid json: {e}")))?;
    match v {
        Value::Object(m) => Ok(m),
        other => Err(ProfilerError::malformed(
            line,
            format!("snapshot must be an object, got {}", json_kind(&other)),
        )),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn framed_pieces_concatenate_to_log() {
        let f = LogFormat::Framed;
        let text = format!("{}{{\"x\":1}}{}{}", f.header(), f.snapshot_suffix(), f.trailer());
        assert_eq!(text, "[\n{\"x\":1},\n\"EOF\"]\n");
        assert_eq!(parse_framed(&text).unwrap().len(), 1);
    }

    #[test]
    fn format_names() {
        assert_eq!(LogFormat::parse("framed"), Some(LogFormat::Framed));
        assert_eq!(LogFormat::parse(" JSONL "), Some(LogFormat::Jsonl));
        assert_eq!(LogFormat::parse("xml"), None);
        assert_eq!(LogFormat::default().as_str(), "framed");
    }

    #[test]
    fn non_object_snapshot_is_rejected() {
        let err = parse_framed("[\n[1,2],\n").unwrap_err();
        assert_eq!(err.kind(), "MALFORMED_LOG");
        assert!(err.to_string().contains("line 2"));
    }
}
