//! Point-to-point links between the coordinator and one worker.
//!
//! Each link is a pair of zero-capacity crossbeam channels, so every send
//! is a rendezvous: the sender blocks until the peer has taken the
//! message. That gives synchronous-send semantics and implicit
//! backpressure without an explicit barrier. A peer that exits drops its
//! endpoints, which surfaces on the other side as
//! [`ProtocolError::Disconnected`] instead of a hang.

use crossbeam_channel::{Receiver, Sender};
use tracing::trace;

use halo_core::{BoundaryPair, ProtocolError, RunError};

use crate::protocol::{ToCoordinator, ToWorker};

/// Rank of the coordinator.
pub const COORDINATOR_RANK: usize = 0;

/// The coordinator's end of the link to worker `rank`.
#[derive(Debug)]
pub struct CoordinatorLink {
    rank: usize,
    tx: Sender<ToWorker>,
    rx: Receiver<ToCoordinator>,
}

/// A worker's end of its link to the coordinator.
#[derive(Debug)]
pub struct WorkerLink {
    rank: usize,
    tx: Sender<ToCoordinator>,
    rx: Receiver<ToWorker>,
}

/// Create a rendezvous link for worker `rank`.
pub fn link(rank: usize) -> (CoordinatorLink, WorkerLink) {
    let (to_worker_tx, to_worker_rx) = crossbeam_channel::bounded(0);
    let (to_coord_tx, to_coord_rx) = crossbeam_channel::bounded(0);
    (
        CoordinatorLink {
            rank,
            tx: to_worker_tx,
            rx: to_coord_rx,
        },
        WorkerLink {
            rank,
            tx: to_coord_tx,
            rx: to_worker_rx,
        },
    )
}

/// Create links for ranks `1..ranks`.
pub fn links(ranks: usize) -> (Vec<CoordinatorLink>, Vec<WorkerLink>) {
    (1..ranks).map(link).unzip()
}

fn failure(rank: usize, reason: ProtocolError) -> RunError {
    RunError::CommunicationFailure { rank, reason }
}

impl CoordinatorLink {
    /// Rank of the worker at the far end.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Send `msg`, blocking until the worker takes it.
    pub fn send(&self, msg: ToWorker) -> Result<(), RunError> {
        trace!(rank = self.rank, kind = msg.kind(), "coordinator send");
        self.tx
            .send(msg)
            .map_err(|_| failure(self.rank, ProtocolError::Disconnected))
    }

    /// Block until the worker sends a message.
    pub fn recv(&self) -> Result<ToCoordinator, RunError> {
        let msg = self
            .rx
            .recv()
            .map_err(|_| failure(self.rank, ProtocolError::Disconnected))?;
        trace!(rank = self.rank, kind = msg.kind(), "coordinator recv");
        Ok(msg)
    }

    /// Receive a [`ToCoordinator::Boundaries`] message.
    pub fn recv_boundaries(&self) -> Result<BoundaryPair, RunError> {
        match self.recv()? {
            ToCoordinator::Boundaries(pair) => Ok(pair),
            other => Err(failure(
                self.rank,
                ProtocolError::UnexpectedMessage {
                    expected: "boundaries",
                    got: other.kind(),
                },
            )),
        }
    }

    /// Receive a [`ToCoordinator::Chunk`] message of exactly `len` cells.
    pub fn recv_chunk(&self, len: usize) -> Result<Vec<u8>, RunError> {
        match self.recv()? {
            ToCoordinator::Chunk(cells) if cells.len() == len => Ok(cells),
            ToCoordinator::Chunk(cells) => Err(failure(
                self.rank,
                ProtocolError::ChunkLengthMismatch {
                    expected: len,
                    got: cells.len(),
                },
            )),
            other => Err(failure(
                self.rank,
                ProtocolError::UnexpectedMessage {
                    expected: "chunk",
                    got: other.kind(),
                },
            )),
        }
    }
}

impl WorkerLink {
    /// This worker's rank.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Send `msg`, blocking until the coordinator takes it.
    pub fn send(&self, msg: ToCoordinator) -> Result<(), RunError> {
        trace!(rank = self.rank, kind = msg.kind(), "worker send");
        self.tx
            .send(msg)
            .map_err(|_| failure(COORDINATOR_RANK, ProtocolError::Disconnected))
    }

    /// Block until the coordinator sends a message.
    pub fn recv(&self) -> Result<ToWorker, RunError> {
        let msg = self
            .rx
            .recv()
            .map_err(|_| failure(COORDINATOR_RANK, ProtocolError::Disconnected))?;
        trace!(rank = self.rank, kind = msg.kind(), "worker recv");
        Ok(msg)
    }
}

/// Build the error a worker reports for an out-of-phase message.
pub(crate) fn unexpected(expected: &'static str, got: &ToWorker) -> RunError {
    failure(
        COORDINATOR_RANK,
        ProtocolError::UnexpectedMessage {
            expected,
            got: got.kind(),
        },
    )
}
