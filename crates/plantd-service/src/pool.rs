//! Bounded render pool for the asynchronous render path.

use std::sync::Arc;

use tokio::sync::Semaphore;

/// Pool submission failure.
#[derive(Debug, thiserror::Error)]
pub(crate) enum PoolError {
    /// The pool's semaphore was closed.
    #[error("render pool is closed")]
    Closed,
    /// The render task panicked or was cancelled.
    #[error("render task did not complete: {0}")]
    Aborted(String),
}

/// Fixed-capacity pool of render workers.
///
/// Permits are granted in FIFO order, so submissions start in order of
/// arrival relative to pool availability; completions may finish out of
/// order. Used exclusively by the asynchronous render path.
#[derive(Debug)]
pub(crate) struct RenderPool {
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl RenderPool {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Total worker capacity.
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Workers currently idle.
    pub(crate) fn idle(&self) -> usize {
        self.permits.available_permits()
    }

    /// Run a blocking job on the pool, waiting for a free worker first.
    pub(crate) async fn run<T, F>(&self, job: F) -> Result<T, PoolError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| PoolError::Closed)?;

        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            job()
        })
        .await
        .map_err(|err| PoolError::Aborted(err.to_string()))
    }
}
