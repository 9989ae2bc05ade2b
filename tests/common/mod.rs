//! Shared helpers for pdfops integration tests.
//!
//! Tasks are exercised against a fake tool (a small shell script written
//! into a tempdir) instead of a real qpdf, so the orchestrator's terminal
//! states can be tested without PDF fixtures.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use pdfops::request::{PdfOperation, TaskRequest};
use pdfops::sink::{LogSink, ProgressObserver};

/// Captures everything the runner reports during one task.
#[derive(Clone, Default)]
pub struct Recorder {
    lines: Arc<Mutex<Vec<String>>>,
    percents: Arc<Mutex<Vec<u8>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log sink appending into this recorder.
    pub fn sink(&self) -> Arc<dyn LogSink> {
        let lines = Arc::clone(&self.lines);
        Arc::new(move |line: &str| {
            lines.lock().unwrap().push(line.to_string());
        })
    }

    /// A progress observer appending into this recorder.
    pub fn observer(&self) -> Arc<dyn ProgressObserver> {
        let percents = Arc::clone(&self.percents);
        Arc::new(move |percent: u8| {
            percents.lock().unwrap().push(percent);
        })
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn percents(&self) -> Vec<u8> {
        self.percents.lock().unwrap().clone()
    }
}

/// Write an executable `#!/bin/sh` script standing in for qpdf.
#[cfg(unix)]
pub fn fake_tool(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-qpdf.sh");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write fake tool");

    let mut perms = std::fs::metadata(&path).expect("stat fake tool").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("mark fake tool executable");
    path
}

/// A request with sensible defaults for tests.
pub fn request(
    operation: PdfOperation,
    tool: PathBuf,
    inputs: &[&str],
    output_folder: PathBuf,
) -> TaskRequest {
    TaskRequest {
        operation,
        tool_path: tool,
        input_files: inputs.iter().map(PathBuf::from).collect(),
        output_folder,
    }
}
