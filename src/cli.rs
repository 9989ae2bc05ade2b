//! CLI argument parsing for pdfops.
//!
//! This module is the front-end collaborator of the core: it only collects
//! parameters, resolves the tool path, and builds a [`TaskRequest`]. The
//! verbs mirror the four core operations, plus `run` for a JSON request
//! file and `check` for a qpdf availability probe.

use clap::{Parser, Subcommand};
use std::env;
use std::io;
use std::path::{Path, PathBuf};

use pdfops::error::{PdfOpsError, Result};
use pdfops::request::{PdfOperation, TaskRequest};

/// Merge, split, rotate and reorder PDF documents by driving qpdf.
///
/// pdfops builds the qpdf command line for you, runs qpdf as a child
/// process, shows its output as it arrives, and stops it cleanly on
/// Ctrl-C. It performs no PDF processing itself: qpdf must be installed.
#[derive(Parser, Debug)]
#[command(name = "pdfops")]
#[command(version)]
#[command(about = "Merge, split, rotate and reorder PDFs with qpdf", long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Path to the qpdf executable
    ///
    /// A bare command name is looked up on PATH. Can also be set through
    /// the QPDF environment variable.
    #[arg(long, env = "QPDF", value_name = "PATH", default_value = "qpdf", global = true)]
    pub tool: PathBuf,

    /// Suppress tool output and progress
    ///
    /// Error lines from qpdf are still printed to stderr.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: CommandKind,
}

/// The pdfops subcommands.
#[derive(Subcommand, Debug)]
pub enum CommandKind {
    /// Concatenate input PDFs, in order, into one document
    Merge {
        /// Input PDF files to merge (in order)
        #[arg(required = true, value_name = "FILE")]
        inputs: Vec<PathBuf>,

        /// Directory receiving the merged document (created if absent)
        #[arg(short = 'd', long, value_name = "DIR")]
        output_dir: PathBuf,

        /// File name of the merged document
        #[arg(short = 'o', long, value_name = "NAME", default_value = "output.pdf")]
        output_name: String,
    },

    /// Split a PDF into one output file per page
    Split {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Directory receiving the page files (created if absent)
        #[arg(short = 'd', long, value_name = "DIR")]
        output_dir: PathBuf,

        /// File name pattern; %d is replaced by the page number
        #[arg(long, value_name = "PATTERN", default_value = "output-%d.pdf")]
        pattern: String,
    },

    /// Rotate every page of a PDF
    Rotate {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Directory receiving the rotated document (created if absent)
        #[arg(short = 'd', long, value_name = "DIR")]
        output_dir: PathBuf,

        /// Rotation in degrees: 90, 180, 270 or their negatives
        #[arg(short = 'r', long, value_name = "DEGREES", allow_negative_numbers = true)]
        angle: i32,

        /// File name of the rotated document
        #[arg(short = 'o', long, value_name = "NAME", default_value = "output.pdf")]
        output_name: String,
    },

    /// Reorder or select pages of a PDF
    Reorder {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Directory receiving the reordered document (created if absent)
        #[arg(short = 'd', long, value_name = "DIR")]
        output_dir: PathBuf,

        /// qpdf page order expression, passed through verbatim
        ///
        /// Examples: "3,1,2" picks pages in that order, "z-1" reverses
        /// the document, "1-5,8" selects a range plus one page.
        #[arg(short = 'p', long, value_name = "ORDER")]
        pages: String,

        /// File name of the reordered document
        #[arg(short = 'o', long, value_name = "NAME", default_value = "output.pdf")]
        output_name: String,
    },

    /// Execute a task described by a JSON request file
    ///
    /// The file is a serialized TaskRequest, e.g.:
    ///   {"operation": "merge", "outputFileName": "m.pdf",
    ///    "toolPath": "/usr/bin/qpdf", "inputFiles": ["a.pdf"],
    ///    "outputFolder": "out"}
    Run {
        /// Path to the JSON request file
        #[arg(value_name = "FILE")]
        request: PathBuf,
    },

    /// Probe the qpdf executable by running it with --version
    Check,
}

/// What the front end decided to do after parsing.
#[derive(Debug)]
pub enum Action {
    /// Run a task through the orchestrator.
    Execute(TaskRequest),
    /// Probe the tool and report its version.
    Check {
        /// Resolved tool path to probe.
        tool: PathBuf,
    },
}

impl Cli {
    /// Turn the parsed arguments into an [`Action`].
    ///
    /// # Errors
    ///
    /// Fails when a `run` request file cannot be read or parsed.
    pub fn action(&self) -> Result<Action> {
        let tool = resolve_tool_path(&self.tool);

        let request = match &self.command {
            CommandKind::Check => return Ok(Action::Check { tool }),
            CommandKind::Run { request } => load_request(request)?,
            CommandKind::Merge {
                inputs,
                output_dir,
                output_name,
            } => TaskRequest {
                operation: PdfOperation::Merge {
                    output_file_name: output_name.clone(),
                },
                tool_path: tool,
                input_files: inputs.clone(),
                output_folder: output_dir.clone(),
            },
            CommandKind::Split {
                input,
                output_dir,
                pattern,
            } => TaskRequest {
                operation: PdfOperation::Split {
                    output_pattern: pattern.clone(),
                },
                tool_path: tool,
                input_files: vec![input.clone()],
                output_folder: output_dir.clone(),
            },
            CommandKind::Rotate {
                input,
                output_dir,
                angle,
                output_name,
            } => TaskRequest {
                operation: PdfOperation::Rotate {
                    angle: *angle,
                    output_file_name: output_name.clone(),
                },
                tool_path: tool,
                input_files: vec![input.clone()],
                output_folder: output_dir.clone(),
            },
            CommandKind::Reorder {
                input,
                output_dir,
                pages,
                output_name,
            } => TaskRequest {
                operation: PdfOperation::Reorder {
                    page_order: pages.clone(),
                    output_file_name: output_name.clone(),
                },
                tool_path: tool,
                input_files: vec![input.clone()],
                output_folder: output_dir.clone(),
            },
        };

        Ok(Action::Execute(request))
    }
}

/// Read and parse a serialized [`TaskRequest`].
pub fn load_request(path: &Path) -> Result<TaskRequest> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|err| {
        PdfOpsError::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid request file {}: {err}", path.display()),
        ))
    })
}

/// Resolve a bare command name against `PATH`.
///
/// The core validates that the tool path exists as a file, so a plain
/// `qpdf` has to be resolved before the request is built. Anything with a
/// directory component is returned as given.
pub fn resolve_tool_path(tool: &Path) -> PathBuf {
    if tool.components().count() > 1 {
        return tool.to_path_buf();
    }

    match env::var_os("PATH") {
        Some(paths) => find_on_path(tool, env::split_paths(&paths)),
        None => tool.to_path_buf(),
    }
}

fn find_on_path(tool: &Path, dirs: impl Iterator<Item = PathBuf>) -> PathBuf {
    for dir in dirs {
        let candidate = dir.join(tool);
        if candidate.is_file() {
            return candidate;
        }

        #[cfg(windows)]
        {
            let exe = candidate.with_extension("exe");
            if exe.is_file() {
                return exe;
            }
        }
    }

    tool.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("arguments should parse")
    }

    #[test]
    fn merge_subcommand_builds_merge_request() {
        let cli = parse(&[
            "pdfops",
            "merge",
            "a.pdf",
            "b.pdf",
            "-d",
            "out",
            "-o",
            "merged.pdf",
            "--tool",
            "/usr/bin/qpdf",
        ]);

        let Action::Execute(request) = cli.action().unwrap() else {
            panic!("merge should execute a task");
        };
        assert_eq!(
            request.operation,
            PdfOperation::Merge {
                output_file_name: "merged.pdf".into()
            }
        );
        assert_eq!(request.input_files.len(), 2);
        assert_eq!(request.tool_path, PathBuf::from("/usr/bin/qpdf"));
    }

    #[test]
    fn rotate_accepts_negative_angles() {
        let cli = parse(&[
            "pdfops", "rotate", "in.pdf", "-d", "out", "-r", "-90", "--tool", "/usr/bin/qpdf",
        ]);

        let Action::Execute(request) = cli.action().unwrap() else {
            panic!("rotate should execute a task");
        };
        assert_eq!(
            request.operation,
            PdfOperation::Rotate {
                angle: -90,
                output_file_name: "output.pdf".into()
            }
        );
    }

    #[test]
    fn split_defaults_the_pattern() {
        let cli = parse(&["pdfops", "split", "in.pdf", "-d", "pages"]);
        let Action::Execute(request) = cli.action().unwrap() else {
            panic!("split should execute a task");
        };
        assert_eq!(
            request.operation,
            PdfOperation::Split {
                output_pattern: "output-%d.pdf".into()
            }
        );
    }

    #[test]
    fn check_resolves_tool_without_building_a_request() {
        let cli = parse(&["pdfops", "check", "--tool", "/usr/bin/qpdf"]);
        assert!(matches!(cli.action().unwrap(), Action::Check { .. }));
    }

    #[test]
    fn explicit_tool_paths_are_not_searched() {
        let tool = PathBuf::from("./vendor/qpdf");
        assert_eq!(resolve_tool_path(&tool), tool);
    }

    #[test]
    fn bare_names_are_found_on_the_search_path() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("fakeqpdf");
        fs::write(&tool, b"#!/bin/sh\n").unwrap();

        let found = find_on_path(
            Path::new("fakeqpdf"),
            vec![PathBuf::from("/nonexistent"), dir.path().to_path_buf()].into_iter(),
        );
        assert_eq!(found, tool);
    }

    #[test]
    fn unresolvable_bare_names_are_returned_as_given() {
        let found = find_on_path(
            Path::new("definitely-not-a-real-tool"),
            vec![PathBuf::from("/nonexistent")].into_iter(),
        );
        assert_eq!(found, PathBuf::from("definitely-not-a-real-tool"));
    }

    #[test]
    fn request_file_round_trips_through_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request.json");
        fs::write(
            &path,
            r#"{
                "operation": "split",
                "outputPattern": "page-%d.pdf",
                "toolPath": "/usr/bin/qpdf",
                "inputFiles": ["book.pdf"],
                "outputFolder": "pages"
            }"#,
        )
        .unwrap();

        let request = load_request(&path).unwrap();
        assert_eq!(
            request.operation,
            PdfOperation::Split {
                output_pattern: "page-%d.pdf".into()
            }
        );
    }

    #[test]
    fn malformed_request_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request.json");
        fs::write(&path, "{not json").unwrap();
        assert!(load_request(&path).is_err());
    }
}
