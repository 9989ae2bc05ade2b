//! pdfops - drive qpdf from the command line.
//!
//! The binary is the front-end collaborator of the pdfops library: it
//! collects parameters into a task request, wires Ctrl-C to the
//! cancellation token, prints qpdf's output as it arrives and maps the
//! outcome to an exit code.

mod cli;

use clap::Parser;
use std::path::Path;
use std::process;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::cli::{Action, Cli};
use pdfops::error::PdfOpsError;
use pdfops::runner::{STDERR_TAG, TaskRunner};
use pdfops::sink::{LogSink, ProgressObserver};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => {}
        Err(PdfOpsError::Cancelled) => {
            // Stopped by the user, not a fault.
            eprintln!("Stopped.");
            process::exit(PdfOpsError::Cancelled.exit_code());
        }
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(err.exit_code());
        }
    }
}

/// Main application logic.
async fn run(cli: Cli) -> pdfops::Result<()> {
    let request = match cli.action()? {
        Action::Check { tool } => return check_tool(&tool).await,
        Action::Execute(request) => request,
    };

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Cancelling...");
            trigger.cancel();
        }
    });

    let runner = TaskRunner::new()
        .with_log_sink(Arc::new(ConsoleSink { quiet: cli.quiet }))
        .with_progress(Arc::new(ConsoleProgress { quiet: cli.quiet }));

    runner.run(&request, cancel).await?;

    if !cli.quiet {
        println!("Completed.");
    }
    Ok(())
}

/// Probe the tool with `--version` and print what it reports.
async fn check_tool(tool: &Path) -> pdfops::Result<()> {
    let output = tokio::process::Command::new(tool)
        .arg("--version")
        .output()
        .await
        .map_err(|source| PdfOpsError::LaunchFailed {
            tool: tool.to_path_buf(),
            source,
        })?;

    if !output.status.success() {
        return Err(PdfOpsError::ToolFailed {
            code: output.status.code(),
        });
    }

    let version = String::from_utf8_lossy(&output.stdout);
    println!("{}", version.lines().next().unwrap_or("qpdf"));
    Ok(())
}

/// Prints tool output lines; qpdf's stderr goes to our stderr.
struct ConsoleSink {
    quiet: bool,
}

impl LogSink for ConsoleSink {
    fn write_line(&self, line: &str) {
        if line.starts_with(STDERR_TAG) {
            eprintln!("{line}");
        } else if !self.quiet {
            println!("{line}");
        }
    }
}

/// Prints the two-point progress signal.
struct ConsoleProgress {
    quiet: bool,
}

impl ProgressObserver for ConsoleProgress {
    fn report(&self, percent: u8) {
        if !self.quiet {
            println!("progress: {percent}%");
        }
    }
}
