//! Coordinator actor: owns the domain and the partition map, drives the
//! per-generation boundary exchange, and gathers the final result.
//!
//! During the exchange loop only the first and last cell of each chunk
//! are kept current in the coordinator's [`Domain`]. Those are the only
//! values any other chunk's halo depends on, so interior cells stay
//! stale until [`gather()`](Coordinator::gather).

use std::time::Instant;

use tracing::{debug, info};

use halo_core::{
    Boundary, BoundaryPair, Chunk, Domain, Partition, ProtocolError, RuleTable, RunConfig,
    RunError,
};

use crate::link::CoordinatorLink;
use crate::metrics::RunMetrics;
use crate::protocol::{Phase, ToWorker, WorkerConfig};

/// Logical neighbours just outside `chunk`.
///
/// Left is the cell before `chunk.start`, or the domain's last cell when
/// periodic, or 0 when fixed. Right is symmetric. Returns `None` if
/// `chunk` does not lie within `domain`.
pub fn halo_for(domain: &Domain, chunk: Chunk, boundary: Boundary) -> Option<BoundaryPair> {
    let end = chunk
        .start
        .checked_add(chunk.len)
        .filter(|&end| end <= domain.len())?;
    let outside = |wrapped: u8| if boundary.is_periodic() { wrapped } else { 0 };
    let left = if chunk.start == 0 {
        outside(domain.last())
    } else {
        domain.get(chunk.start - 1)?
    };
    let right = if end == domain.len() {
        outside(domain.first())
    } else {
        domain.get(end)?
    };
    Some(BoundaryPair::new(left, right))
}

/// The coordinator (rank 0) and its links to every worker.
#[derive(Debug)]
pub struct Coordinator {
    config: RunConfig,
    partition: Partition,
    domain: Domain,
    links: Vec<CoordinatorLink>,
    phase: Phase,
    metrics: RunMetrics,
}

impl Coordinator {
    /// Validate the run, partition the domain, and distribute config and
    /// initial chunks to every worker in rank order.
    ///
    /// `links[i]` must connect to the worker that owns chunk `i`. Nothing
    /// is sent unless validation passes.
    pub fn setup(
        config: RunConfig,
        domain: Domain,
        links: Vec<CoordinatorLink>,
    ) -> Result<Self, RunError> {
        let started = Instant::now();
        let ranks = links.len() + 1;
        if ranks < 2 {
            return Err(RunError::InsufficientWorkers { ranks });
        }
        let table = config.rule_table()?;
        if domain.len() != config.cells {
            return Err(RunError::invalid_config(format!(
                "domain has {} cells but config expects {}",
                domain.len(),
                config.cells
            )));
        }
        let partition = Partition::for_ranks(config.cells, ranks)?;

        let mut coordinator = Self {
            config,
            partition,
            domain,
            links,
            phase: Phase::Setup,
            metrics: RunMetrics {
                workers: ranks - 1,
                ..RunMetrics::default()
            },
        };
        coordinator.distribute(table)?;
        coordinator.metrics.empty_chunks = coordinator.partition.empty_chunks();
        coordinator.metrics.setup_us = started.elapsed().as_micros() as u64;
        coordinator.phase = Phase::Exchange { completed: 0 };

        info!(
            cells = config.cells,
            rule = config.rule,
            generations = config.generations,
            workers = ranks - 1,
            boundary = %config.boundary,
            "halo setup complete"
        );
        Ok(coordinator)
    }

    fn distribute(&mut self, table: RuleTable) -> Result<(), RunError> {
        let worker_config = WorkerConfig {
            cells: self.config.cells,
            rule: table.rule(),
            generations: self.config.generations,
        };
        for (link, chunk) in self.links.iter().zip(self.partition.chunks()) {
            let cells = self.domain.as_slice()[chunk.start..chunk.end()].to_vec();
            link.send(ToWorker::Config(worker_config))?;
            link.send(ToWorker::RuleTable(table))?;
            link.send(ToWorker::ChunkLen(chunk.len))?;
            link.send(ToWorker::Chunk(cells))?;
            self.metrics.messages_sent += 4;
            debug!(rank = link.rank(), start = chunk.start, len = chunk.len, "chunk distributed");
        }
        Ok(())
    }

    /// Current protocol phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Generations exchanged so far.
    pub fn generation(&self) -> u64 {
        match self.phase {
            Phase::Exchange { completed } => completed,
            _ => self.metrics.generations,
        }
    }

    /// Generations still allowed by the configuration.
    pub fn remaining(&self) -> u64 {
        self.config.generations - self.generation()
    }

    /// The partition map.
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// The run configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run one generation: send every worker its halo, then collect every
    /// worker's new edges and patch the domain's boundary cells.
    pub fn step(&mut self) -> Result<(), RunError> {
        let completed = match self.phase {
            Phase::Exchange { completed } if completed < self.config.generations => completed,
            Phase::Exchange { .. } => {
                return Err(RunError::invalid_config(format!(
                    "all {} configured generations already exchanged",
                    self.config.generations
                )))
            }
            phase => {
                return Err(RunError::invalid_config(format!(
                    "cannot exchange boundaries during {phase}"
                )))
            }
        };

        for (link, &chunk) in self.links.iter().zip(self.partition.chunks()) {
            let halo = halo_for(&self.domain, chunk, self.config.boundary).ok_or_else(|| {
                RunError::invalid_config(format!(
                    "chunk of {} cells at {} lies outside the {}-cell domain",
                    chunk.len,
                    chunk.start,
                    self.domain.len()
                ))
            })?;
            link.send(ToWorker::Boundaries(halo))?;
            self.metrics.messages_sent += 1;
        }

        for (link, &chunk) in self.links.iter().zip(self.partition.chunks()) {
            let edges = link.recv_boundaries()?;
            self.metrics.messages_received += 1;
            if chunk.is_empty() {
                continue;
            }
            let invalid = |value| RunError::CommunicationFailure {
                rank: link.rank(),
                reason: ProtocolError::InvalidCell { value },
            };
            self.domain
                .set(chunk.start, edges.left)
                .map_err(|_| invalid(edges.left))?;
            self.domain
                .set(chunk.end() - 1, edges.right)
                .map_err(|_| invalid(edges.right))?;
        }

        let completed = completed + 1;
        self.phase = Phase::Exchange { completed };
        self.metrics.generations = completed;
        debug!(generation = completed, "generation exchanged");
        Ok(())
    }

    /// Run up to `generations` more generations, bounded by the
    /// configured count. Returns how many were run.
    pub fn advance(&mut self, generations: u64) -> Result<u64, RunError> {
        let started = Instant::now();
        let n = generations.min(self.remaining());
        for _ in 0..n {
            self.step()?;
        }
        self.metrics.exchange_us += started.elapsed().as_micros() as u64;
        Ok(n)
    }

    /// Request every worker's chunk and reconstruct the full domain.
    ///
    /// Workers exit after replying, so the coordinator is consumed.
    pub fn gather(mut self) -> Result<(Domain, RunMetrics), RunError> {
        let started = Instant::now();
        self.phase = Phase::Gather;
        for link in &self.links {
            link.send(ToWorker::Gather)?;
            self.metrics.messages_sent += 1;
        }
        for (link, &chunk) in self.links.iter().zip(self.partition.chunks()) {
            let cells = link.recv_chunk(chunk.len)?;
            self.metrics.messages_received += 1;
            if chunk.is_empty() {
                continue;
            }
            self.domain
                .write_range(chunk.start, &cells)
                .map_err(|_| RunError::CommunicationFailure {
                    rank: link.rank(),
                    reason: ProtocolError::InvalidCell {
                        value: cells.iter().copied().find(|&v| v > 1).unwrap_or_default(),
                    },
                })?;
        }
        self.phase = Phase::Done;
        self.metrics.gather_us = started.elapsed().as_micros() as u64;
        debug!(
            workers = self.links.len(),
            cells = self.partition.cell_count(),
            "gather complete"
        );
        Ok((self.domain, self.metrics))
    }
}
