//! Fixed-size worker pool with fan-out/join.
//!
//! The pool is created once per harness and reused for every invocation.
//! [`WorkerPool::fan_out`] hands the same task to every worker and returns
//! only when all of them have finished, so the caller never observes a
//! partially completed invocation.

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

pub struct WorkerPool {
    pool: ThreadPool,
    workers: usize,
}

impl WorkerPool {
    /// Starts `workers` threads.
    ///
    /// Panics if `workers` is zero.
    pub fn new(workers: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
        assert!(workers > 0, "Worker count must be greater than 0");
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("cache-worker-{i}"))
            .build()?;
        debug!(workers, "worker pool started");
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Runs `task` exactly once on every worker, passing the worker index, and
    /// blocks until every copy has returned. Results are in worker order.
    pub fn fan_out<R, F>(&self, task: F) -> Vec<R>
    where
        F: Fn(usize) -> R + Sync,
        R: Send,
    {
        self.pool.broadcast(|ctx| task(ctx.index()))
    }

    /// Stops the workers. Any fan-out has already joined by the time this can
    /// be called.
    pub fn shutdown(self) {
        debug!(workers = self.workers, "worker pool shut down");
    }
}
