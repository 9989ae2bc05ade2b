//! Error types for pdfops.
//!
//! Every failure surfaced by this crate is a [`PdfOpsError`]. The variants
//! fall into four groups that callers are expected to tell apart:
//!
//! - **Validation errors**: the request broke an invariant; nothing was
//!   spawned and no files were touched. See [`PdfOpsError::is_validation`].
//! - **Launch errors**: the qpdf executable could not be started at all.
//! - **Tool failures**: qpdf ran and exited nonzero; the exit code is
//!   carried and qpdf's own stderr lines (already forwarded to the log
//!   sink) are the diagnostic detail.
//! - **Cancellation**: the caller triggered the cancellation signal. This
//!   is a first-class outcome, not a fault; front ends should present it
//!   as "stopped", not as an error.

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfops operations.
pub type Result<T> = std::result::Result<T, PdfOpsError>;

/// Main error type for pdfops operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfOpsError {
    /// The qpdf executable path is empty or does not point at a file.
    #[error("qpdf executable not found: {}", .path.display())]
    ToolNotFound {
        /// The path that was checked.
        path: PathBuf,
    },

    /// The request carried no input files.
    #[error("at least one input file is required")]
    NoInputFiles,

    /// The request carried no output folder.
    #[error("an output folder is required")]
    NoOutputFolder,

    /// Rotate angle outside the set accepted by qpdf's `--rotate` flag.
    #[error("rotate angle must be one of 90, 180, 270 or their negatives, got {angle}")]
    InvalidRotateAngle {
        /// The rejected angle.
        angle: i32,
    },

    /// Reorder request without a page-order expression.
    #[error("a page order expression is required for reorder")]
    NoPageOrder,

    /// The output folder could not be created.
    #[error("failed to create output folder: {}", .path.display())]
    OutputFolderCreation {
        /// The folder that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The qpdf process could not be started (missing, not executable,
    /// or an OS-level spawn failure). Distinct from a nonzero exit.
    #[error("failed to start {}: {source}", .tool.display())]
    LaunchFailed {
        /// The executable that failed to start.
        tool: PathBuf,
        /// Underlying spawn error.
        #[source]
        source: io::Error,
    },

    /// qpdf ran and exited unsuccessfully. `code` is `None` when the
    /// process was terminated by a signal instead of exiting.
    #[error("{}", exit_summary(.code))]
    ToolFailed {
        /// The tool's exit code, if it exited normally.
        code: Option<i32>,
    },

    /// The task was cancelled by the caller before the process exited.
    #[error("task cancelled")]
    Cancelled,

    /// Generic I/O error while supervising the process.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

fn exit_summary(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("qpdf exited with code {code}"),
        None => "qpdf was terminated by a signal".to_string(),
    }
}

impl PdfOpsError {
    /// Whether this error was raised by request validation, i.e. before
    /// any process was spawned or any directory created.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ToolNotFound { .. }
                | Self::NoInputFiles
                | Self::NoOutputFolder
                | Self::InvalidRotateAngle { .. }
                | Self::NoPageOrder
        )
    }

    /// Process exit code for the CLI front end.
    ///
    /// Tool failures propagate qpdf's own exit code so scripts wrapping
    /// pdfops see what they would have seen calling qpdf directly.
    pub fn exit_code(&self) -> i32 {
        match self {
            err if err.is_validation() => 2,
            Self::LaunchFailed { .. } => 3,
            Self::ToolFailed { code: Some(code) } => *code,
            Self::ToolFailed { code: None } => 4,
            Self::OutputFolderCreation { .. } | Self::Io(_) => 5,
            Self::Cancelled => 130, // Standard exit code for SIGINT
            _ => 1,
        }
    }
}
