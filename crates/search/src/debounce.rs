//! Trailing-edge debounce on a tokio timer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use acta_core::{ActaError, ActaResult};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::trace;

/// Collapses bursts of `schedule` calls into one `on_settle` call carrying
/// the last value. Dropping the debouncer cancels the pending timer.
pub struct Debouncer {
    handle: Handle,
    task: Option<JoinHandle<()>>,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(handle: Handle) -> Self {
        Self { handle, task: None, generation: Arc::new(AtomicU64::new(0)) }
    }

    /// Bind to the runtime of the calling context.
    pub fn current() -> ActaResult<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| ActaError::Runtime(format!("debouncer needs a tokio runtime: {}", e)))
    }

    /// Restart the timer; `on_settle(value)` runs after `delay` unless another
    /// call supersedes this one first.
    pub fn schedule<T, F>(&mut self, value: T, delay: Duration, on_settle: F)
    where
        T: Send + 'static,
        F: FnOnce(T) + Send + 'static,
    {
        let gen = self.bump();
        let current = Arc::clone(&self.generation);
        self.task = Some(self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            // An aborted task may already be past its sleep; only the latest fires.
            if current.load(Ordering::SeqCst) != gen {
                trace!(gen, "debounce: superseded");
                return;
            }
            metrics::counter!("debounce_settled_total", 1u64);
            on_settle(value);
        }));
    }

    /// Drop any pending emission.
    pub fn cancel(&mut self) {
        self.bump();
    }

    pub fn is_pending(&self) -> bool {
        self.task.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }

    fn bump(&mut self) -> u64 {
        if let Some(t) = self.task.take() {
            t.abort();
        }
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
