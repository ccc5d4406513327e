//! Progress reporting during execution

use std::sync::Mutex;

/// Receives a progress update after each task result is recorded
///
/// `percent` is `round(100 * completed / total)`; it never decreases within
/// a run and is exactly 100 after the last task.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, percent: u8, completed: usize, total: usize);
}

/// Observer that ignores all updates
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressObserver for NoopProgress {
    fn on_progress(&self, _percent: u8, _completed: usize, _total: usize) {}
}

/// Observer that keeps every percentage it receives
#[derive(Debug, Default)]
pub struct RecordingProgress {
    seen: Mutex<Vec<u8>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn percentages(&self) -> Vec<u8> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl ProgressObserver for RecordingProgress {
    fn on_progress(&self, percent: u8, _completed: usize, _total: usize) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(percent);
        }
    }
}
