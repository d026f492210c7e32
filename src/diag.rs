// src/diag.rs
//! Best-effort capture of malformed AI output for post-hoc inspection.
//! Artifacts are a side channel for diagnosis only and are never surfaced to
//! digest recipients.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

use tracing::warn;

/// Half-width of the context window logged around a parse failure.
const CONTEXT_RADIUS: usize = 80;

pub struct DiagnosticSink {
    dir: PathBuf,
    seq: AtomicU32,
}

impl DiagnosticSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let _ = fs::create_dir_all(&dir); // best-effort
        Self {
            dir,
            seq: AtomicU32::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Record a JSON parse failure: persist the raw response and log the
    /// line/column/byte offset with a bounded context window. Returns the
    /// artifact path when the write succeeded.
    pub fn capture_parse_failure(
        &self,
        stage: &str,
        raw: &str,
        err: &serde_json::Error,
    ) -> Option<PathBuf> {
        let offset = byte_offset(raw, err.line(), err.column());
        let window = context_window(raw, offset, CONTEXT_RADIUS);
        warn!(
            stage,
            line = err.line(),
            column = err.column(),
            byte_offset = offset,
            context = %window,
            error = %err,
            "AI output failed to parse"
        );

        let n = self.seq.fetch_add(1, Ordering::Relaxed);
        let path = self.dir.join(format!("ai_raw_{stage}_{n:03}.txt"));
        match fs::write(&path, raw) {
            Ok(()) => Some(path),
            Err(e) => {
                warn!(stage, error = %e, "could not persist raw AI response");
                None
            }
        }
    }
}

/// serde_json reports 1-based line/column; translate to a byte offset.
fn byte_offset(raw: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let mut offset = 0usize;
    for (i, l) in raw.split('\n').enumerate() {
        if i + 1 == line {
            return offset + column.saturating_sub(1).min(l.len());
        }
        offset += l.len() + 1;
    }
    raw.len()
}

fn context_window(raw: &str, offset: usize, radius: usize) -> String {
    let start = offset.saturating_sub(radius);
    let end = (offset + radius).min(raw.len());
    let mut a = start;
    while a < raw.len() && !raw.is_char_boundary(a) {
        a += 1;
    }
    let mut b = end;
    while b > a && !raw.is_char_boundary(b) {
        b -= 1;
    }
    raw[a..b].replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_from_line_and_column() {
        let raw = "ab\ncdef\ngh";
        // line 2, column 3 -> points at 'e'
        assert_eq!(byte_offset(raw, 2, 3), 5);
        assert_eq!(&raw[5..6], "e");
        // past-the-end lines clamp
        assert_eq!(byte_offset(raw, 9, 1), raw.len());
    }

    #[test]
    fn window_is_bounded_and_single_line() {
        let raw = "x".repeat(500) + "\nBOOM\n" + &"y".repeat(500);
        let off = 502; // inside BOOM
        let w = context_window(&raw, off, 80);
        assert!(w.len() <= 160);
        assert!(w.contains("BOOM"));
        assert!(!w.contains('\n'));
    }

    #[test]
    fn capture_writes_artifact() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DiagnosticSink::new(tmp.path().join("diagnostics"));
        let bad = "{\"a\": }";
        let err = serde_json::from_str::<serde_json::Value>(bad).unwrap_err();
        let path = sink.capture_parse_failure("summarize", bad, &err).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), bad);
    }
}
