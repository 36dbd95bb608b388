//! Progress reporting for long scoring runs.
//!
//! Batch precalculation walks hundreds of slider combinations. The
//! [`ProgressCallback`] trait lets it report progress without knowing
//! whether a terminal progress bar, a log line, or nothing at all is on the
//! other end.

use std::sync::Arc;

/// Receives progress updates from a scoring run.
///
/// Implementations must be `Send + Sync`: updates arrive from `rayon`
/// worker threads.
pub trait ProgressCallback: Send + Sync {
    /// Sets the total number of work units (enables percentage/ETA).
    fn set_total(&self, total: u64);

    /// Advances progress by `delta` units.
    fn inc(&self, delta: u64);

    /// Updates the message shown next to the indicator.
    fn set_message(&self, msg: String);

    /// Marks the run as complete with a final message.
    fn finish(&self, msg: String);
}

/// Ignores all progress updates.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`].
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
