//! Tests for the rotating log sink
//!
//! These tests verify:
//! - Level routing and verbosity gating
//! - Line format on console and file
//! - Size-triggered and construction-time rotation
//! - Retention bounded by version_count


use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use acidlog::{LogConfig, RotatingLogSink};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

/// In-memory console stream that can be inspected after logging
#[derive(Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    pub fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn setup_temp_log() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("x").join("log");
    (temp_dir, path)
}

/// Open a sink whose console output is captured
pub fn open_captured(config: LogConfig) -> (RotatingLogSink, Capture, Capture) {
    let out = Capture::default();
    let err = Capture::default();
    let sink = RotatingLogSink::console_only().with_console(out.clone(), err.clone());
    sink.configure(config).unwrap();
    (sink, out, err)
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}
