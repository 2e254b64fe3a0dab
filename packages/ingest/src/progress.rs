//! Load progress reporting.
//!
//! The loader only knows byte offsets; how they are rendered (a terminal
//! bar, nothing at all) is up to the caller.

/// Receives byte-offset updates while a dataset is read.
pub trait ProgressCallback: Send + Sync {
    /// Size of the input in bytes, once known.
    fn set_total(&self, bytes: u64);

    /// Absolute byte offset reached so far.
    fn set_position(&self, bytes: u64);

    /// Replaces the status text.
    fn set_message(&self, msg: String);

    /// Marks the load as done.
    fn finish(&self, msg: String);
}

/// Discards every update. Used by tests and library callers that do not
/// render progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _bytes: u64) {}
    fn set_position(&self, _bytes: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}
