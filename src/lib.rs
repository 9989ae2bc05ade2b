//! pdfops - Merge, split, rotate and reorder PDF documents by driving the
//! qpdf command-line tool.
//!
//! This library never parses or manipulates PDF content itself. It builds
//! the correct qpdf argument vector for one of four document operations,
//! launches qpdf as a child process, streams its output into a
//! caller-supplied log sink, reports coarse progress, and honors
//! cancellation by force-killing the process tree. All document logic
//! belongs to qpdf; this crate owns the supervision.
//!
//! # Examples
//!
//! ```no_run
//! use pdfops::request::{PdfOperation, TaskRequest};
//! use pdfops::runner::TaskRunner;
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> pdfops::Result<()> {
//! let request = TaskRequest {
//!     operation: PdfOperation::Rotate {
//!         angle: 90,
//!         output_file_name: "rotated.pdf".into(),
//!     },
//!     tool_path: PathBuf::from("/usr/bin/qpdf"),
//!     input_files: vec![PathBuf::from("report.pdf")],
//!     output_folder: PathBuf::from("out"),
//! };
//!
//! let cancel = CancellationToken::new();
//! let runner = TaskRunner::new()
//!     .with_log_sink(Arc::new(|line: &str| println!("{line}")))
//!     .with_progress(Arc::new(|percent: u8| eprintln!("{percent}%")));
//!
//! runner.run(&request, cancel).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod args;
pub mod error;
pub mod request;
pub mod runner;
pub mod sink;

// Re-export commonly used types
pub use error::{PdfOpsError, Result};
pub use request::{PdfOperation, TaskRequest};
pub use runner::TaskRunner;
pub use sink::{LogSink, ProgressObserver};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
