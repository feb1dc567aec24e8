//! Per-file progress reporting.

/// Sink for batch progress updates.
///
/// `completed` counts every file whose processing has finished (stored,
/// failed or rejected) and `total` is the number of files requested, so a
/// caller's progress indicator advances monotonically even when some files
/// fail.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, completed: usize, total: usize);
}

impl<F> ProgressSink for F
where
    F: Fn(usize, usize) + Send + Sync,
{
    fn on_progress(&self, completed: usize, total: usize) {
        self(completed, total)
    }
}
