//! Export progress tracking

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Callback receiving a percentage after each completion
pub type ProgressReporter = Box<dyn Fn(u8) + Send + Sync>;

/// Percentage of `completed` over `total`, rounded to the nearest integer
///
/// An empty batch counts as complete.
pub fn percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = (completed as f64 * 100.0 / total as f64).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Counts task completions for one pass over the cards
///
/// Each completion increments the counter atomically and reports the
/// resulting percentage, so concurrent completions never lose an update.
/// Once halted, late completions from detached tasks are no longer reported.
pub struct ProgressTracker {
    total: usize,
    completed: AtomicUsize,
    halted: AtomicBool,
    report: ProgressReporter,
}

impl ProgressTracker {
    /// Creates a tracker that reports through `report`
    pub fn new(total: usize, report: impl Fn(u8) + Send + Sync + 'static) -> Self {
        Self {
            total,
            completed: AtomicUsize::new(0),
            halted: AtomicBool::new(false),
            report: Box::new(report),
        }
    }

    /// Creates a tracker that reports nowhere
    pub fn silent(total: usize) -> Self {
        Self::new(total, |_| {})
    }

    /// Records one completion and returns the new percentage
    pub fn complete_one(&self) -> u8 {
        let done = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        let pct = percent(done, self.total);
        if !self.halted.load(Ordering::SeqCst) {
            (self.report)(pct);
        }
        pct
    }

    /// Stops reporting; the displayed progress freezes at its last value
    pub fn halt(&self) {
        self.halted.store(true, Ordering::SeqCst);
    }

    /// Completions so far
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Number of tasks in this pass
    pub fn total(&self) -> usize {
        self.total
    }
}

impl fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("total", &self.total)
            .field("completed", &self.completed())
            .finish()
    }
}
