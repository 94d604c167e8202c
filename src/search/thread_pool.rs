//! Fixed-size worker pool for search phases
//!
//! Every parallel phase of a search (per-string pattern generation, partial
//! index merging, per-bucket verification) is a fork-join loop with an
//! implicit barrier at its end. The pool wraps a dedicated rayon
//! `ThreadPool` so a search never competes with unrelated work on rayon's
//! global pool, and so its size is fixed for the whole call.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                  WorkerPool                   │
//! │                                               │
//! │   install(|| corpus.par_chunks(..) ...)       │
//! │          │                                    │
//! │   ┌──────┼─────────────┬─────────────┐        │
//! │   ▼      ▼             ▼             ▼        │
//! │ worker-0 worker-1 ... worker-N  (work-steal)  │
//! │   └──────┴──────┬──────┴─────────────┘        │
//! │                 ▼                             │
//! │              barrier                          │
//! └───────────────────────────────────────────────┘
//! ```

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{SearchError, SearchResult};

/// Number of workers used when the configuration asks for "all cores".
pub fn default_threads() -> usize {
    num_cpus::get().max(1)
}

/// A fixed-size pool of named worker threads.
pub struct WorkerPool {
    pool: ThreadPool,
    num_threads: usize,
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("num_threads", &self.num_threads)
            .finish()
    }
}

impl WorkerPool {
    /// Create a pool with `num_threads` workers (0 = one per logical CPU).
    pub fn new(num_threads: usize) -> SearchResult<Self> {
        let num_threads = if num_threads == 0 {
            default_threads()
        } else {
            num_threads
        };

        let pool = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|id| format!("simsearch-worker-{}", id))
            .build()
            .map_err(|e| SearchError::InvalidConfig(format!("failed to build worker pool: {}", e)))?;

        Ok(Self { pool, num_threads })
    }

    /// Number of worker threads in the pool
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Run `op` inside the pool; rayon parallel iterators used within it
    /// are scheduled on this pool's workers.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn test_pool_size_is_fixed() {
        let pool = WorkerPool::new(3).unwrap();
        assert_eq!(pool.num_threads(), 3);
        assert_eq!(pool.install(rayon::current_num_threads), 3);
    }

    #[test]
    fn test_zero_means_all_cores() {
        let pool = WorkerPool::new(0).unwrap();
        assert_eq!(pool.num_threads(), default_threads());
    }

    #[test]
    fn test_install_runs_parallel_loop() {
        let pool = WorkerPool::new(2).unwrap();
        let sum: usize = pool.install(|| (0..1000usize).into_par_iter().sum());
        assert_eq!(sum, 499_500);
    }

    #[test]
    fn test_workers_are_named() {
        let pool = WorkerPool::new(1).unwrap();
        let name = pool.install(|| std::thread::current().name().map(str::to_string));
        assert_eq!(name.as_deref(), Some("simsearch-worker-0"));
    }
}
