//! Thread-backed cluster: one coordinator plus `ranks - 1` worker threads.
//!
//! Each worker rank runs on its own named OS thread and owns its chunk
//! exclusively. The calling thread acts as the coordinator. Threads are
//! joined when the [`Session`] finishes or is dropped.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use halo_core::{Domain, ProtocolError, RunConfig, RunError};

use crate::coordinator::Coordinator;
use crate::link::{links, CoordinatorLink};
use crate::metrics::RunMetrics;
use crate::protocol::Phase;
use crate::worker::{run_worker, WorkerSummary};

/// Rank-count configuration.
#[derive(Clone, Debug, Default)]
pub struct ClusterConfig {
    /// Total ranks including the coordinator. `None` = auto-detect
    /// (`available_parallelism`, clamped to `[2, 64]`).
    pub ranks: Option<usize>,
}

impl ClusterConfig {
    /// Resolve the actual rank count.
    ///
    /// Explicit values are returned as given so that a request for fewer
    /// than two ranks is reported, not silently raised.
    pub fn resolved_ranks(&self) -> usize {
        match self.ranks {
            Some(n) => n,
            None => thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
                .clamp(2, 64),
        }
    }
}

/// Final output of one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    /// The reconstructed domain.
    pub domain: Domain,
    /// Wall-clock time from the first exchange to the end of gather.
    pub elapsed: Duration,
    /// Coordinator metrics.
    pub metrics: RunMetrics,
}

/// A fixed-size set of ranks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cluster {
    ranks: usize,
}

impl Cluster {
    /// Build a cluster from `config`.
    ///
    /// Returns `Err(RunError::InsufficientWorkers)` if fewer than two
    /// ranks are configured.
    pub fn new(config: &ClusterConfig) -> Result<Self, RunError> {
        Self::with_ranks(config.resolved_ranks())
    }

    /// Build a cluster of exactly `ranks` ranks.
    pub fn with_ranks(ranks: usize) -> Result<Self, RunError> {
        if ranks < 2 {
            return Err(RunError::InsufficientWorkers { ranks });
        }
        Ok(Self { ranks })
    }

    /// Total ranks, coordinator included.
    pub fn ranks(&self) -> usize {
        self.ranks
    }

    /// Worker ranks.
    pub fn workers(&self) -> usize {
        self.ranks - 1
    }

    /// Validate, spawn workers, and distribute the initial state.
    ///
    /// Configuration errors are reported before any thread is spawned.
    pub fn launch(&self, config: RunConfig, domain: Domain) -> Result<Session, RunError> {
        config.validate()?;
        if domain.len() != config.cells {
            return Err(RunError::invalid_config(format!(
                "domain has {} cells but config expects {}",
                domain.len(),
                config.cells
            )));
        }

        let (coord_links, worker_links) = links(self.ranks);
        let workers = worker_links
            .into_iter()
            .map(|link| {
                let rank = link.rank();
                let handle = thread::Builder::new()
                    .name(format!("halo-worker-{rank}"))
                    .spawn(move || run_worker(link))
                    .expect("failed to spawn worker thread");
                (rank, handle)
            })
            .collect();

        Session::start(workers, config, domain, coord_links)
    }

    /// Run the configured number of generations and gather the result.
    pub fn run(&self, config: RunConfig, domain: Domain) -> Result<RunReport, RunError> {
        let mut session = self.launch(config, domain)?;
        session.advance(config.generations)?;
        session.finish()
    }
}

/// A launched run whose coordinator lives on the calling thread.
///
/// Dropping a session without calling [`finish()`](Session::finish) hangs
/// up on every worker and joins their threads.
pub struct Session {
    coordinator: Option<Coordinator>,
    workers: Vec<(usize, JoinHandle<Result<WorkerSummary, RunError>>)>,
    started: Option<Instant>,
    aborted_after: u64,
}

impl Session {
    /// Run setup against already-spawned workers. A setup failure joins
    /// the workers before it is reported.
    fn start(
        workers: Vec<(usize, JoinHandle<Result<WorkerSummary, RunError>>)>,
        config: RunConfig,
        domain: Domain,
        links: Vec<CoordinatorLink>,
    ) -> Result<Self, RunError> {
        let mut session = Self {
            coordinator: None,
            workers,
            started: None,
            aborted_after: 0,
        };
        match Coordinator::setup(config, domain, links) {
            Ok(coordinator) => {
                session.coordinator = Some(coordinator);
                Ok(session)
            }
            Err(e) => Err(session.diagnose(e)),
        }
    }

    fn aborted(&self) -> RunError {
        RunError::invalid_config(format!(
            "session aborted after {} generations",
            self.aborted_after
        ))
    }

    fn coordinator_mut(&mut self) -> Result<&mut Coordinator, RunError> {
        let err = self.aborted();
        self.coordinator.as_mut().ok_or(err)
    }

    /// Generations exchanged so far. After an abort, the generations
    /// completed before the failure.
    pub fn generation(&self) -> u64 {
        self.coordinator
            .as_ref()
            .map_or(self.aborted_after, Coordinator::generation)
    }

    /// Current protocol phase. [`Phase::Aborted`] once an exchange has
    /// failed.
    pub fn phase(&self) -> Phase {
        self.coordinator.as_ref().map_or(
            Phase::Aborted {
                completed: self.aborted_after,
            },
            Coordinator::phase,
        )
    }

    /// Run up to `generations` more generations. Returns how many ran.
    pub fn advance(&mut self, generations: u64) -> Result<u64, RunError> {
        self.started.get_or_insert_with(Instant::now);
        let result = self.coordinator_mut()?.advance(generations);
        if result.is_err() {
            self.abort();
        }
        result.map_err(|e| self.diagnose(e))
    }

    /// Gather every chunk, join all workers, and report.
    pub fn finish(mut self) -> Result<RunReport, RunError> {
        let started = *self.started.get_or_insert_with(Instant::now);
        let Some(coordinator) = self.coordinator.take() else {
            return Err(self.aborted());
        };
        let gathered = coordinator.gather();
        let elapsed = started.elapsed();
        let joined = self.join_workers();

        let (domain, metrics) = gathered.map_err(|e| self.diagnose_joined(e, &joined))?;
        for (rank, result) in joined {
            if let Err(e) = result {
                error!(rank, error = %e, "worker failed after gather");
                return Err(e);
            }
        }
        info!(
            generations = metrics.generations,
            elapsed_s = elapsed.as_secs_f64(),
            "halo run complete"
        );
        Ok(RunReport {
            domain,
            elapsed,
            metrics,
        })
    }

    fn abort(&mut self) {
        if let Some(coordinator) = self.coordinator.take() {
            self.aborted_after = coordinator.generation();
        }
    }

    fn diagnose(&mut self, err: RunError) -> RunError {
        let joined = self.join_workers();
        self.diagnose_joined(err, &joined)
    }

    /// A disconnect seen by the coordinator is upgraded to
    /// [`ProtocolError::WorkerPanicked`] when that worker's thread panicked.
    fn diagnose_joined(
        &self,
        err: RunError,
        joined: &[(usize, Result<WorkerSummary, RunError>)],
    ) -> RunError {
        for (rank, result) in joined {
            if let Err(e) = result {
                warn!(rank, error = %e, "worker exited with error");
            }
        }
        match err {
            RunError::CommunicationFailure {
                rank,
                reason: ProtocolError::Disconnected,
            } => {
                let panicked = joined.iter().any(|(r, result)| {
                    *r == rank
                        && matches!(
                            result,
                            Err(RunError::CommunicationFailure {
                                reason: ProtocolError::WorkerPanicked,
                                ..
                            })
                        )
                });
                let reason = if panicked {
                    ProtocolError::WorkerPanicked
                } else {
                    ProtocolError::Disconnected
                };
                error!(rank, %reason, "halo run aborted");
                RunError::CommunicationFailure { rank, reason }
            }
            other => {
                error!(error = %other, "halo run aborted");
                other
            }
        }
    }

    fn join_workers(&mut self) -> Vec<(usize, Result<WorkerSummary, RunError>)> {
        self.workers
            .drain(..)
            .map(|(rank, handle)| {
                let result = handle.join().unwrap_or(Err(RunError::CommunicationFailure {
                    rank,
                    reason: ProtocolError::WorkerPanicked,
                }));
                (rank, result)
            })
            .collect()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // Hang up first so blocked workers observe a disconnect.
        self.coordinator = None;
        for (_, handle) in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}
