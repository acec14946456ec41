//! Background thread that keeps re-solving the knapsack.
//!
//! The control loop hands the worker immutable [`CatalogSnapshot`]s and polls
//! for results; neither side ever blocks on the other. Results travel through
//! a single-slot channel, so at most one completed solution is waiting at a
//! time and each one is consumed exactly once. While the slot is occupied the
//! worker holds its next result back instead of computing further.

use super::solver::KnapsackSolver;
use crate::catalog::CatalogSnapshot;
use crate::error::{Result, ShopError};
use crate::solution::Solution;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// A completed solve over a catalog snapshot.
#[derive(Debug, Clone)]
pub struct DpOutcome {
    /// Length of the snapshot the solution was computed over.
    pub catalog_len: usize,
    pub solution: Solution,
}

/// Handle to the background knapsack thread.
///
/// Dropping the handle signals the thread to stop and joins it.
pub struct DpWorker {
    snapshots: Option<Sender<CatalogSnapshot>>,
    results: Receiver<DpOutcome>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl DpWorker {
    /// Starts the worker thread.
    pub fn spawn(solver: KnapsackSolver, poll_interval: Duration) -> Result<Self> {
        let (snapshot_tx, snapshot_rx) = mpsc::channel();
        let (result_tx, result_rx) = mpsc::sync_channel(1);
        let stop = Arc::new(AtomicBool::new(false));

        let capacity = solver.capacity();
        let flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("knapsack-dp".into())
            .spawn(move || run(solver, snapshot_rx, result_tx, flag, poll_interval))?;

        info!(capacity, "knapsack worker started");

        Ok(Self {
            snapshots: Some(snapshot_tx),
            results: result_rx,
            stop,
            handle: Some(handle),
        })
    }

    /// Queues a snapshot for the next solve.
    ///
    /// Older snapshots still waiting are superseded by this one.
    pub fn submit(&self, snapshot: CatalogSnapshot) -> Result<()> {
        self.snapshots
            .as_ref()
            .ok_or(ShopError::WorkerUnavailable)?
            .send(snapshot)
            .map_err(|_| ShopError::WorkerUnavailable)
    }

    /// Takes the finished solution, if one is waiting. Never blocks.
    pub fn try_recv(&self) -> Option<DpOutcome> {
        self.results.try_recv().ok()
    }

    /// Whether the worker thread is still alive.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signals the thread to stop and waits for it to exit.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        self.snapshots.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("knapsack worker panicked");
            } else {
                info!("knapsack worker stopped");
            }
        }
    }
}

impl Drop for DpWorker {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

fn run(
    solver: KnapsackSolver,
    snapshots: Receiver<CatalogSnapshot>,
    results: SyncSender<DpOutcome>,
    stop: Arc<AtomicBool>,
    poll_interval: Duration,
) {
    loop {
        if stop.load(Ordering::Relaxed) {
            return;
        }

        let mut latest = match snapshots.recv_timeout(poll_interval) {
            Ok(snapshot) => snapshot,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => return,
        };
        while let Ok(newer) = snapshots.try_recv() {
            latest = newer;
        }

        let solution = match solver.solve(&latest) {
            Ok(solution) => solution,
            Err(e) => {
                warn!(error = %e, "skipping malformed catalog snapshot");
                continue;
            }
        };
        debug!(
            items = latest.len(),
            value = solution.total_value(),
            size = solution.total_size(),
            "knapsack solved"
        );

        let mut pending = DpOutcome {
            catalog_len: latest.len(),
            solution,
        };
        loop {
            match results.try_send(pending) {
                Ok(()) => break,
                Err(TrySendError::Full(back)) => {
                    if stop.load(Ordering::Relaxed) {
                        return;
                    }
                    pending = back;
                    thread::sleep(poll_interval);
                }
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Item};
    use crate::dp::KnapsackBounds;
    use std::time::Instant;

    fn worker(capacity: f64) -> DpWorker {
        let solver = KnapsackSolver::new(capacity, KnapsackBounds::new(1.0, 10.0));
        DpWorker::spawn(solver, Duration::from_millis(1)).unwrap()
    }

    fn wait_for(worker: &DpWorker) -> DpOutcome {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(outcome) = worker.try_recv() {
                return outcome;
            }
            assert!(Instant::now() < deadline, "worker produced no result");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_solves_submitted_snapshot() {
        let mut catalog = Catalog::new();
        catalog.push(Item::new(0, 4.0, 5.0)).unwrap();
        catalog.push(Item::new(1, 6.0, 8.0)).unwrap();

        let worker = worker(10.0);
        worker.submit(catalog.snapshot()).unwrap();
        let outcome = wait_for(&worker);

        assert_eq!(outcome.catalog_len, 2);
        assert_eq!(outcome.solution.counts(), &[1, 1]);
        worker.shutdown();
    }

    #[test]
    fn test_result_consumed_once() {
        let worker = worker(10.0);
        worker
            .submit(CatalogSnapshot::from(vec![Item::new(0, 2.0, 1.0)]))
            .unwrap();
        let _ = wait_for(&worker);
        thread::sleep(Duration::from_millis(20));
        assert!(worker.try_recv().is_none());
    }

    #[test]
    fn test_shutdown_joins_thread() {
        let worker = worker(10.0);
        assert!(worker.is_running());
        worker.shutdown();
    }

    #[test]
    fn test_later_snapshot_supersedes_earlier() {
        let worker = worker(10.0);
        let mut catalog = Catalog::new();
        catalog.push(Item::new(0, 5.0, 1.0)).unwrap();
        worker.submit(catalog.snapshot()).unwrap();
        catalog.push(Item::new(1, 1.0, 9.0)).unwrap();
        worker.submit(catalog.snapshot()).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut last = wait_for(&worker);
        while last.catalog_len < 2 {
            assert!(Instant::now() < deadline);
            if let Some(next) = worker.try_recv() {
                last = next;
            }
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(last.solution.get(1), 10);
    }
}
