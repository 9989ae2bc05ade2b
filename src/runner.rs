//! Task orchestration: spawning and supervising one qpdf process.
//!
//! [`TaskRunner::run`] owns the full lifecycle of a single invocation:
//!
//! ```text
//! Created -> Started -> Running -> Succeeded | Failed | Cancelled
//! ```
//!
//! - **Created → Started**: request validated, output directory ensured,
//!   argument vector built and logged, child spawned with piped stdio and
//!   no visible window.
//! - **Started → Running**: both output streams are drained line-by-line
//!   into the log sink from background tasks; progress 0 is reported.
//! - **Running → Succeeded**: exit code 0; progress 100.
//! - **Running → Failed**: nonzero exit; the code is surfaced. Partial
//!   output files are left in place; cleanup is the caller's decision.
//! - **Running → Cancelled**: the cancellation token fired first; the
//!   child's whole process tree is killed and the task reports
//!   [`PdfOpsError::Cancelled`], never a tool failure.
//!
//! A spawn failure moves `Created → Failed` directly with
//! [`PdfOpsError::LaunchFailed`], which is never conflated with a nonzero
//! exit. One call supervises exactly one child process; a single runner
//! value can serve any number of sequential or concurrent calls.

use std::process::Stdio;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;

use crate::args::{build_args, render_command_line};
use crate::error::{PdfOpsError, Result};
use crate::request::TaskRequest;
use crate::sink::{LogSink, ProgressObserver};

/// Prefix attached to lines read from the tool's stderr stream.
pub const STDERR_TAG: &str = "ERR: ";

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Runs [`TaskRequest`]s against the qpdf executable.
///
/// The runner itself holds only the shared collaborators; all per-task
/// state lives inside [`run`](Self::run), so independent requests may run
/// concurrently on clones of (or references to) one runner.
///
/// # Examples
///
/// ```no_run
/// use pdfops::request::{PdfOperation, TaskRequest};
/// use pdfops::runner::TaskRunner;
/// use std::path::PathBuf;
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> pdfops::Result<()> {
/// let request = TaskRequest {
///     operation: PdfOperation::Merge {
///         output_file_name: "merged.pdf".into(),
///     },
///     tool_path: PathBuf::from("/usr/bin/qpdf"),
///     input_files: vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")],
///     output_folder: PathBuf::from("out"),
/// };
///
/// let runner = TaskRunner::new().with_log_sink(Arc::new(|line: &str| {
///     println!("{line}");
/// }));
/// runner.run(&request, CancellationToken::new()).await
/// # }
/// ```
#[derive(Clone, Default)]
pub struct TaskRunner {
    log: Option<Arc<dyn LogSink>>,
    progress: Option<Arc<dyn ProgressObserver>>,
}

impl TaskRunner {
    /// Create a runner with no log sink and no progress observer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a log sink receiving the tool's output lines.
    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.log = Some(sink);
        self
    }

    /// Attach a progress observer receiving the 0/100 progress signal.
    pub fn with_progress(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.progress = Some(observer);
        self
    }

    /// Execute one request to completion, failure or cancellation.
    ///
    /// Suspends until the child exits or is killed. The cancellation
    /// token is observed for the whole duration of the call; once it
    /// fires, the child and its descendants are terminated forcibly and
    /// the call returns [`PdfOpsError::Cancelled`]. Killing a process
    /// that already exited is treated as a benign race.
    ///
    /// # Errors
    ///
    /// Validation errors (see [`TaskRequest::validate`]), then
    /// [`PdfOpsError::OutputFolderCreation`], [`PdfOpsError::LaunchFailed`],
    /// [`PdfOpsError::ToolFailed`] or [`PdfOpsError::Cancelled`].
    pub async fn run(&self, request: &TaskRequest, cancel: CancellationToken) -> Result<()> {
        request.validate()?;

        tokio::fs::create_dir_all(&request.output_folder)
            .await
            .map_err(|source| PdfOpsError::OutputFolderCreation {
                path: request.output_folder.clone(),
                source,
            })?;

        let ignored = request.ignored_inputs();
        if ignored > 0 {
            self.log_line(&format!(
                "WARN: {} reads only the first input file; ignoring {ignored} extra input(s)",
                request.operation.name()
            ));
        }

        let args = build_args(request);
        self.log_line(&format!("qpdf args: {}", render_command_line(&args)));

        let mut command = Command::new(&request.tool_path);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Own process group, so cancellation can take descendants down
        // with the child.
        #[cfg(unix)]
        command.process_group(0);

        #[cfg(windows)]
        command.creation_flags(CREATE_NO_WINDOW);

        self.report_progress(0);

        let mut child = command.spawn().map_err(|source| PdfOpsError::LaunchFailed {
            tool: request.tool_path.clone(),
            source,
        })?;

        let stdout = child.stdout.take().expect("stdout is piped");
        let stderr = child.stderr.take().expect("stderr is piped");
        let out_drain = tokio::spawn(forward_stream(stdout, self.log.clone(), None));
        let err_drain = tokio::spawn(forward_stream(stderr, self.log.clone(), Some(STDERR_TAG)));

        let status = tokio::select! {
            status = child.wait() => status?,
            _ = cancel.cancelled() => {
                kill_process_tree(&mut child).await;
                let _ = out_drain.await;
                let _ = err_drain.await;
                return Err(PdfOpsError::Cancelled);
            }
        };

        // Streams are fully drained once the child is gone; wait for the
        // forwarders so no line arrives after this call returns.
        let _ = out_drain.await;
        let _ = err_drain.await;

        // A token that fired in the window between exit and observation
        // still counts as cancellation.
        if cancel.is_cancelled() {
            return Err(PdfOpsError::Cancelled);
        }

        match status.code() {
            Some(0) => {
                self.report_progress(100);
                Ok(())
            }
            code => Err(PdfOpsError::ToolFailed { code }),
        }
    }

    fn log_line(&self, line: &str) {
        if let Some(log) = &self.log {
            log.write_line(line);
        }
    }

    fn report_progress(&self, percent: u8) {
        if let Some(progress) = &self.progress {
            progress.report(percent);
        }
    }
}

/// Forward one output stream to the sink, line by line.
///
/// Runs until EOF even without a sink installed: the pipe must always be
/// drained or the child could block on a full buffer. Lines are decoded
/// lossily, so undecodable bytes never stall the stream; blank lines are
/// skipped, matching the tool's chatter-free log contract.
async fn forward_stream<R>(reader: R, sink: Option<Arc<dyn LogSink>>, prefix: Option<&'static str>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                let Some(sink) = sink.as_ref() else {
                    continue;
                };
                let decoded = String::from_utf8_lossy(&buf);
                let line = decoded.trim_end_matches(['\r', '\n']);
                if line.trim().is_empty() {
                    continue;
                }
                match prefix {
                    Some(prefix) => sink.write_line(&format!("{prefix}{line}")),
                    None => sink.write_line(line),
                }
            }
        }
    }
}

/// Force-terminate the child and, on Unix, every process in its group.
async fn kill_process_tree(child: &mut Child) {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        // The child was spawned into its own process group; signalling
        // the negative pid reaches every descendant in it.
        unsafe {
            libc::kill(-(pid as libc::pid_t), libc::SIGKILL);
        }
    }

    // Direct kill doubles as the non-Unix path and reaps the child.
    // Failure here means the process is already gone.
    let _ = child.kill().await;
}
