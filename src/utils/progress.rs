//! Progress reporting hook for long-running conversions.
//!
//! Adapted from the teacher's global progress-callback pattern
//! (`utils::progress` in the source repo) but expressed as a safe owned
//! closure instead of a raw `extern "C"` function pointer: this crate has no
//! FFI boundary to cross, so the callback can just be `Fn(u64, u64) + Send +
//! Sync` and passed around behind an `Arc`.

use std::sync::Arc;

/// Reports `(frames_written, final_frame_number)` after each frame the
/// writer emits. `final_frame_number` is `None` until the decoder has
/// observed EOF and the total is known.
pub type ProgressCallback = Arc<dyn Fn(u64, Option<u64>) + Send + Sync>;

/// Holds an optional progress callback for a single pipeline run.
#[derive(Clone, Default)]
pub struct ProgressReporter {
    callback: Option<ProgressCallback>,
}

impl ProgressReporter {
    pub fn none() -> Self {
        Self { callback: None }
    }

    pub fn new(callback: ProgressCallback) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    pub fn report(&self, frames_written: u64, final_frame_number: Option<u64>) {
        if let Some(cb) = &self.callback {
            cb(frames_written, final_frame_number);
        }
    }
}
