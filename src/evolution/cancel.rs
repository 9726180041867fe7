use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cloneable handle for stopping a run from another thread.
///
/// The run checks the token before each generation's stop decision and
/// between individual evaluations. A cancelled run returns the best result
/// found so far with [`TerminationReason::Cancelled`](super::TerminationReason::Cancelled).
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
