//! Task request model.
//!
//! A [`TaskRequest`] is an immutable description of one qpdf invocation:
//! which operation to perform, which executable to use, which input files
//! to feed it and where the output goes. The request is built by a front
//! end (CLI, GUI, a deserialized JSON file), validated once, consumed by a
//! single [`TaskRunner`](crate::runner::TaskRunner) call and then
//! discarded. The core never mutates it.
//!
//! Operation-specific parameters live on the [`PdfOperation`] variant that
//! needs them, so a request cannot be built with a page order but no
//! reorder, or a rotate angle dangling off a merge.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{PdfOpsError, Result};

/// Rotate angles accepted by qpdf's `--rotate` flag, sign included.
pub const ROTATE_ANGLES: [i32; 6] = [90, 180, 270, -90, -180, -270];

/// One of the four supported document operations.
///
/// Each variant carries exactly the parameters that operation consumes.
/// The enum is closed: argument construction matches exhaustively, so an
/// unhandled operation is a compile error rather than a silent no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation")]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PdfOperation {
    /// Concatenate all input files, in list order, into one document.
    Merge {
        /// File name of the merged document, joined onto the output folder.
        output_file_name: String,
    },

    /// Split the first input file into one output file per page.
    Split {
        /// File name pattern containing qpdf's `%d` page-number
        /// placeholder, joined onto the output folder.
        output_pattern: String,
    },

    /// Rotate every page of the first input file.
    Rotate {
        /// Rotation in degrees; must be one of [`ROTATE_ANGLES`].
        angle: i32,
        /// File name of the rotated document, joined onto the output folder.
        output_file_name: String,
    },

    /// Reorder or select pages of the first input file.
    Reorder {
        /// qpdf page-range expression (e.g. `3,1,2` or `z-1`), passed
        /// through verbatim. Treated as an opaque string by this crate.
        page_order: String,
        /// File name of the reordered document, joined onto the output folder.
        output_file_name: String,
    },
}

impl PdfOperation {
    /// Lowercase operation name, as used by the CLI verbs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Merge { .. } => "merge",
            Self::Split { .. } => "split",
            Self::Rotate { .. } => "rotate",
            Self::Reorder { .. } => "reorder",
        }
    }

    /// Whether the operation reads only the first input file.
    ///
    /// Merge consumes the whole input list; the other three operate on
    /// `input_files[0]` and ignore the rest.
    pub fn single_input(&self) -> bool {
        !matches!(self, Self::Merge { .. })
    }
}

/// Immutable description of one requested qpdf task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    /// The operation to perform, with its parameters.
    #[serde(flatten)]
    pub operation: PdfOperation,

    /// Path to the qpdf executable. Must exist as a file; plain command
    /// names are not resolved against `PATH` here; that is a front-end
    /// concern.
    pub tool_path: PathBuf,

    /// Input documents. Order is significant for merge; single-input
    /// operations use the first entry.
    pub input_files: Vec<PathBuf>,

    /// Directory receiving the output file(s). Created on demand when the
    /// task runs.
    pub output_folder: PathBuf,
}

impl TaskRequest {
    /// Check every request invariant, failing fast with a distinguishable
    /// error and touching nothing on disk beyond reading the tool path's
    /// metadata.
    ///
    /// # Errors
    ///
    /// - [`PdfOpsError::ToolNotFound`]: empty tool path, or no file there
    /// - [`PdfOpsError::NoInputFiles`]: empty input list
    /// - [`PdfOpsError::NoOutputFolder`]: empty output folder
    /// - [`PdfOpsError::InvalidRotateAngle`]: rotate angle outside
    ///   [`ROTATE_ANGLES`]
    /// - [`PdfOpsError::NoPageOrder`]: reorder with a blank page order
    pub fn validate(&self) -> Result<()> {
        if self.tool_path.as_os_str().is_empty() || !self.tool_path.is_file() {
            return Err(PdfOpsError::ToolNotFound {
                path: self.tool_path.clone(),
            });
        }

        if self.input_files.is_empty() {
            return Err(PdfOpsError::NoInputFiles);
        }

        if self.output_folder.as_os_str().is_empty() {
            return Err(PdfOpsError::NoOutputFolder);
        }

        match &self.operation {
            PdfOperation::Rotate { angle, .. } if !ROTATE_ANGLES.contains(angle) => {
                Err(PdfOpsError::InvalidRotateAngle { angle: *angle })
            }
            PdfOperation::Reorder { page_order, .. } if page_order.trim().is_empty() => {
                Err(PdfOpsError::NoPageOrder)
            }
            _ => Ok(()),
        }
    }

    /// Number of input files a single-input operation will ignore.
    ///
    /// Split, rotate and reorder read only `input_files[0]`; extra entries
    /// are reported through the log sink rather than silently dropped.
    pub fn ignored_inputs(&self) -> usize {
        if self.operation.single_input() {
            self.input_files.len().saturating_sub(1)
        } else {
            0
        }
    }
}
