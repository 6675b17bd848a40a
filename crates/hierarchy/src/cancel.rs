use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A token checked by a search at the top of every node visit
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

/// Handle to trigger cancellation
///
/// Can be moved to another thread; the search itself stays on the thread that
/// owns the provider.
#[derive(Debug, Clone)]
pub struct CancellationHandle {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new cancellation token and its handle
    pub fn new() -> (Self, CancellationHandle) {
        let flag = Arc::new(AtomicBool::new(false));
        let handle = CancellationHandle { flag: flag.clone() };
        (Self { flag }, handle)
    }

    /// Check if cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

impl CancellationHandle {
    /// Signal cancellation to all associated tokens
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }
}
