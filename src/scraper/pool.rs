// pool.rs
use std::panic::{self, AssertUnwindSafe};
use std::sync::{mpsc, Mutex};
use std::thread;
use tracing::{debug, error};

pub const DEFAULT_WORKERS: usize = 15;

/// Fixed-size pool of blocking worker threads fed from one job queue.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    size: usize,
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS)
    }
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        Self { size: size.max(1) }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Runs `work` over every item and returns one slot per item, in input order.
    ///
    /// Each thread builds its own state with `init` before taking jobs; a
    /// thread whose `init` returns `None` takes no jobs. A slot is `None` when
    /// its job panicked or no worker was left to run it.
    pub fn map<T, S, R, I, W>(&self, items: Vec<T>, init: I, work: W) -> Vec<Option<R>>
    where
        T: Send,
        R: Send,
        I: Fn() -> Option<S> + Sync,
        W: Fn(&S, T) -> R + Sync,
    {
        let total = items.len();
        if total == 0 {
            return Vec::new();
        }

        let (job_tx, job_rx) = mpsc::channel::<(usize, T)>();
        for job in items.into_iter().enumerate() {
            if job_tx.send(job).is_err() {
                break;
            }
        }
        drop(job_tx);

        let job_rx = Mutex::new(job_rx);
        let (result_tx, result_rx) = mpsc::channel::<(usize, R)>();
        let threads = self.size.min(total);

        thread::scope(|scope| {
            for worker in 0..threads {
                let job_rx = &job_rx;
                let result_tx = result_tx.clone();
                let init = &init;
                let work = &work;

                let spawned = thread::Builder::new()
                    .name(format!("worker-{worker}"))
                    .spawn_scoped(scope, move || {
                        let Some(state) = init() else {
                            return;
                        };

                        loop {
                            let next = match job_rx.lock() {
                                Ok(rx) => rx.recv(),
                                Err(_) => return,
                            };
                            let Ok((index, item)) = next else {
                                return;
                            };

                            match panic::catch_unwind(AssertUnwindSafe(|| work(&state, item))) {
                                Ok(result) => {
                                    let _ = result_tx.send((index, result));
                                }
                                Err(_) => error!(worker, index, "job panicked"),
                            }
                        }
                    });

                if let Err(e) = spawned {
                    error!(worker, error = %e, "could not spawn worker");
                }
            }
        });
        drop(result_tx);

        let mut results: Vec<Option<R>> = (0..total).map(|_| None).collect();
        for (index, result) in result_rx {
            results[index] = Some(result);
        }

        let missing = results.iter().filter(|r| r.is_none()).count();
        debug!(total, missing, threads, "pool drained");
        results
    }
}
