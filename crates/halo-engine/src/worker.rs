//! Worker actor: owns one chunk and advances it one generation per
//! boundary message.
//!
//! The update is in place, single pass, left to right. When cell `i` is
//! rewritten its right neighbour `buf[i + 1]` is still the old value, and
//! its old left neighbour is carried in a local that is refreshed just
//! before `buf[i]` is overwritten. No second buffer is allocated.

use tracing::{debug, trace};

use halo_core::domain::first_invalid_cell;
use halo_core::{BoundaryPair, ProtocolError, RuleTable, RunError};

use crate::link::{unexpected, WorkerLink, COORDINATOR_RANK};
use crate::protocol::{ToCoordinator, ToWorker, WorkerConfig};

/// Advance `buf` one generation in place.
///
/// `halo` supplies the values just outside the chunk. Returns the new
/// `(first, last)` cells. An empty chunk touches nothing and echoes
/// `halo` back unchanged.
pub fn step_chunk(table: &RuleTable, buf: &mut [u8], halo: BoundaryPair) -> BoundaryPair {
    let len = buf.len();
    if len == 0 {
        return halo;
    }
    let mut prev = halo.left;
    for i in 0..len {
        let right = if i + 1 == len { halo.right } else { buf[i + 1] };
        let next = table.apply(prev, buf[i], right);
        prev = buf[i];
        buf[i] = next;
    }
    BoundaryPair::new(buf[0], buf[len - 1])
}

/// One worker's exclusive state after setup.
#[derive(Clone, Debug)]
pub struct Worker {
    rank: usize,
    config: WorkerConfig,
    table: RuleTable,
    chunk: Vec<u8>,
    generation: u64,
}

impl Worker {
    /// Build a worker directly from its setup payload.
    pub fn new(rank: usize, config: WorkerConfig, table: RuleTable, chunk: Vec<u8>) -> Self {
        Self {
            rank,
            config,
            table,
            chunk,
            generation: 0,
        }
    }

    /// Receive the one-time setup sequence from the coordinator:
    /// config, rule table, chunk length, chunk.
    pub fn receive_setup(link: &WorkerLink) -> Result<Self, RunError> {
        let config = match link.recv()? {
            ToWorker::Config(config) => config,
            other => return Err(unexpected("config", &other)),
        };
        let table = match link.recv()? {
            ToWorker::RuleTable(table) => table,
            other => return Err(unexpected("rule-table", &other)),
        };
        if table.rule() != config.rule {
            return Err(RunError::CommunicationFailure {
                rank: COORDINATOR_RANK,
                reason: ProtocolError::RuleMismatch {
                    configured: config.rule,
                    received: table.rule(),
                },
            });
        }
        let len = match link.recv()? {
            ToWorker::ChunkLen(len) => len,
            other => return Err(unexpected("chunk-len", &other)),
        };
        let chunk = match link.recv()? {
            ToWorker::Chunk(cells) => cells,
            other => return Err(unexpected("chunk", &other)),
        };
        if chunk.len() != len {
            return Err(RunError::CommunicationFailure {
                rank: COORDINATOR_RANK,
                reason: ProtocolError::ChunkLengthMismatch {
                    expected: len,
                    got: chunk.len(),
                },
            });
        }
        if let Some((_, value)) = first_invalid_cell(&chunk) {
            return Err(RunError::CommunicationFailure {
                rank: COORDINATOR_RANK,
                reason: ProtocolError::InvalidCell { value },
            });
        }
        debug!(rank = link.rank(), len, "worker setup received");
        Ok(Self::new(link.rank(), config, table, chunk))
    }

    /// This worker's rank.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Generations computed so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current cell values.
    pub fn chunk(&self) -> &[u8] {
        &self.chunk
    }

    /// Compute one generation from the received halo.
    pub fn step(&mut self, halo: BoundaryPair) -> BoundaryPair {
        let edges = step_chunk(&self.table, &mut self.chunk, halo);
        self.generation += 1;
        edges
    }

    /// Serve boundary requests until the coordinator asks for the chunk.
    ///
    /// Returns a summary once the final chunk has been handed to the
    /// coordinator.
    pub fn serve(mut self, link: &WorkerLink) -> Result<WorkerSummary, RunError> {
        loop {
            match link.recv()? {
                ToWorker::Boundaries(halo) => {
                    if self.generation >= self.config.generations {
                        return Err(unexpected("gather", &ToWorker::Boundaries(halo)));
                    }
                    let edges = self.step(halo);
                    trace!(rank = self.rank, generation = self.generation, "generation computed");
                    link.send(ToCoordinator::Boundaries(edges))?;
                }
                ToWorker::Gather => {
                    let summary = WorkerSummary {
                        rank: self.rank,
                        generations: self.generation,
                        cells: self.chunk.len(),
                    };
                    link.send(ToCoordinator::Chunk(self.chunk))?;
                    debug!(rank = summary.rank, generations = summary.generations, "worker done");
                    return Ok(summary);
                }
                other => return Err(unexpected("boundaries", &other)),
            }
        }
    }
}

/// What a worker reports once it has handed its chunk back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerSummary {
    /// Worker rank.
    pub rank: usize,
    /// Generations computed.
    pub generations: u64,
    /// Chunk length.
    pub cells: usize,
}

/// Full worker lifecycle: setup, exchange loop, gather.
pub fn run_worker(link: WorkerLink) -> Result<WorkerSummary, RunError> {
    let worker = Worker::receive_setup(&link)?;
    worker.serve(&link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::link;
    use std::thread;

    fn table(rule: u32) -> RuleTable {
        RuleTable::new(rule).unwrap()
    }

    #[test]
    fn rule_90_single_pass_matches_xor_of_neighbours() {
        let mut buf = vec![0, 0, 0, 1, 0, 0, 0];
        let edges = step_chunk(&table(90), &mut buf, BoundaryPair::new(0, 0));
        assert_eq!(buf, vec![0, 0, 1, 0, 1, 0, 0]);
        assert_eq!(edges, BoundaryPair::new(0, 0));
    }

    #[test]
    fn halo_values_feed_the_edges() {
        // Rule 90: next = left xor right.
        let mut buf = vec![0, 0, 0];
        let edges = step_chunk(&table(90), &mut buf, BoundaryPair::new(1, 1));
        assert_eq!(buf, vec![1, 0, 1]);
        assert_eq!(edges, BoundaryPair::new(1, 1));
    }

    #[test]
    fn in_place_update_uses_old_left_value() {
        // Rule 204 is identity on mid; rule 240 copies left.
        let mut buf = vec![1, 0, 1, 1];
        step_chunk(&table(240), &mut buf, BoundaryPair::new(0, 0));
        // Shifted right by one using the *old* values.
        assert_eq!(buf, vec![0, 1, 0, 1]);

        let mut buf = vec![1, 0, 1, 1];
        step_chunk(&table(204), &mut buf, BoundaryPair::new(1, 1));
        assert_eq!(buf, vec![1, 0, 1, 1]);
    }

    #[test]
    fn single_cell_chunk_sees_both_halo_values() {
        // Rule 170 copies right.
        let mut buf = vec![0];
        let edges = step_chunk(&table(170), &mut buf, BoundaryPair::new(0, 1));
        assert_eq!(buf, vec![1]);
        assert_eq!(edges, BoundaryPair::new(1, 1));
    }

    #[test]
    fn empty_chunk_is_a_no_op() {
        let mut buf: Vec<u8> = vec![];
        let halo = BoundaryPair::new(1, 0);
        assert_eq!(step_chunk(&table(255), &mut buf, halo), halo);
        assert!(buf.is_empty());
    }

    #[test]
    fn worker_counts_generations() {
        let cfg = WorkerConfig {
            cells: 3,
            rule: 255,
            generations: 2,
        };
        let mut w = Worker::new(1, cfg, table(255), vec![0, 0, 0]);
        w.step(BoundaryPair::default());
        assert_eq!(w.generation(), 1);
        assert_eq!(w.chunk(), &[1, 1, 1]);
        assert_eq!(w.rank(), 1);
    }

    fn send_setup(coord: &crate::link::CoordinatorLink, generations: u64, chunk: Vec<u8>) {
        coord
            .send(ToWorker::Config(WorkerConfig {
                cells: chunk.len(),
                rule: 90,
                generations,
            }))
            .unwrap();
        coord.send(ToWorker::RuleTable(table(90))).unwrap();
        coord.send(ToWorker::ChunkLen(chunk.len())).unwrap();
        coord.send(ToWorker::Chunk(chunk)).unwrap();
    }

    #[test]
    fn run_worker_full_lifecycle() {
        let (coord, wlink) = link(1);
        let handle = thread::spawn(move || run_worker(wlink));

        send_setup(&coord, 1, vec![0, 1, 0]);
        coord
            .send(ToWorker::Boundaries(BoundaryPair::new(0, 0)))
            .unwrap();
        assert_eq!(coord.recv_boundaries().unwrap(), BoundaryPair::new(1, 1));
        coord.send(ToWorker::Gather).unwrap();
        assert_eq!(coord.recv_chunk(3).unwrap(), vec![1, 0, 1]);

        let summary = handle.join().unwrap().unwrap();
        assert_eq!(
            summary,
            WorkerSummary {
                rank: 1,
                generations: 1,
                cells: 3,
            }
        );
    }

    #[test]
    fn extra_generation_is_rejected() {
        let (coord, wlink) = link(2);
        let handle = thread::spawn(move || run_worker(wlink));

        send_setup(&coord, 1, vec![1]);
        coord.send(ToWorker::Boundaries(BoundaryPair::default())).unwrap();
        coord.recv_boundaries().unwrap();
        coord.send(ToWorker::Boundaries(BoundaryPair::default())).unwrap();

        let err = handle.join().unwrap().unwrap_err();
        assert_eq!(
            err,
            RunError::CommunicationFailure {
                rank: COORDINATOR_RANK,
                reason: ProtocolError::UnexpectedMessage {
                    expected: "gather",
                    got: "boundaries",
                },
            }
        );
    }

    #[test]
    fn setup_out_of_order_is_rejected() {
        let (coord, wlink) = link(1);
        let handle = thread::spawn(move || run_worker(wlink));
        coord.send(ToWorker::Gather).unwrap();
        let err = handle.join().unwrap().unwrap_err();
        assert!(matches!(
            err,
            RunError::CommunicationFailure {
                reason: ProtocolError::UnexpectedMessage {
                    expected: "config",
                    ..
                },
                ..
            }
        ));
    }

    #[test]
    fn rule_table_must_match_config() {
        let (coord, wlink) = link(1);
        let handle = thread::spawn(move || run_worker(wlink));
        coord
            .send(ToWorker::Config(WorkerConfig {
                cells: 2,
                rule: 90,
                generations: 1,
            }))
            .unwrap();
        coord.send(ToWorker::RuleTable(table(30))).unwrap();
        let err = handle.join().unwrap().unwrap_err();
        assert_eq!(
            err,
            RunError::CommunicationFailure {
                rank: COORDINATOR_RANK,
                reason: ProtocolError::RuleMismatch {
                    configured: 90,
                    received: 30,
                },
            }
        );
    }

    #[test]
    fn announced_length_must_match_payload() {
        let (coord, wlink) = link(1);
        let handle = thread::spawn(move || run_worker(wlink));
        coord
            .send(ToWorker::Config(WorkerConfig {
                cells: 4,
                rule: 90,
                generations: 1,
            }))
            .unwrap();
        coord.send(ToWorker::RuleTable(table(90))).unwrap();
        coord.send(ToWorker::ChunkLen(4)).unwrap();
        coord.send(ToWorker::Chunk(vec![0, 1])).unwrap();
        let err = handle.join().unwrap().unwrap_err();
        assert_eq!(
            err,
            RunError::CommunicationFailure {
                rank: COORDINATOR_RANK,
                reason: ProtocolError::ChunkLengthMismatch {
                    expected: 4,
                    got: 2,
                },
            }
        );
    }

    #[test]
    fn worker_exits_when_coordinator_hangs_up() {
        let (coord, wlink) = link(1);
        let handle = thread::spawn(move || run_worker(wlink));
        drop(coord);
        assert!(matches!(
            handle.join().unwrap(),
            Err(RunError::CommunicationFailure {
                reason: ProtocolError::Disconnected,
                ..
            })
        ));
    }
}
