//! Log and progress collaborators.
//!
//! The runner talks to its caller through two narrow capabilities: a
//! [`LogSink`] receiving the tool's output one line at a time, and a
//! [`ProgressObserver`] receiving the coarse two-point progress signal.
//! Both are invoked from background tokio tasks, never from the caller's
//! own context. Implementations that touch non-thread-safe state must
//! marshal themselves.

/// Receives one line of text per call, zero or more times per task.
///
/// Lines from the tool's stderr are prefixed with `ERR: ` so front ends
/// can tell the two streams apart. Within one stream lines arrive in
/// order; between the streams no order is guaranteed.
pub trait LogSink: Send + Sync {
    /// Accept one line, without a trailing newline.
    fn write_line(&self, line: &str);
}

/// Receives the task's progress as a percentage in `0..=100`.
///
/// The external tool exposes no intermediate progress, so the runner
/// reports exactly two points: 0 at launch and 100 on success.
pub trait ProgressObserver: Send + Sync {
    /// Accept a progress value.
    fn report(&self, percent: u8);
}

impl<F> LogSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn write_line(&self, line: &str) {
        self(line);
    }
}

impl<F> ProgressObserver for F
where
    F: Fn(u8) + Send + Sync,
{
    fn report(&self, percent: u8) {
        self(percent);
    }
}
