//! Halo-exchange message contract between the coordinator and workers.
//!
//! The protocol is a closed set of message kinds exchanged over one
//! link per worker:
//!
//! ```text
//! Setup ─► { SendBoundaries ─► ComputeLocal ─► ReturnBoundaries }* ─► Gather ─► Done
//! ```
//!
//! | Phase            | Direction | Message                                  |
//! |------------------|-----------|------------------------------------------|
//! | Setup            | C → W     | [`ToWorker::Config`]                     |
//! | Setup            | C → W     | [`ToWorker::RuleTable`]                  |
//! | Setup            | C → W     | [`ToWorker::ChunkLen`], [`ToWorker::Chunk`] |
//! | SendBoundaries   | C → W     | [`ToWorker::Boundaries`]                 |
//! | ReturnBoundaries | W → C     | [`ToCoordinator::Boundaries`]            |
//! | Gather           | C → W     | [`ToWorker::Gather`]                     |
//! | Gather           | W → C     | [`ToCoordinator::Chunk`]                 |
//!
//! Any message arriving out of phase is reported as
//! [`ProtocolError::UnexpectedMessage`](halo_core::ProtocolError::UnexpectedMessage).

use std::fmt;

use halo_core::{BoundaryPair, RuleTable};

/// Static run parameters delivered once to every worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Total domain size N.
    pub cells: usize,
    /// Rule number the table was built from.
    pub rule: u8,
    /// Upper bound on the number of generations the worker will be asked
    /// to compute.
    pub generations: u64,
}

/// Messages sent by the coordinator to a worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToWorker {
    /// N, rule number, and generation count.
    Config(WorkerConfig),
    /// The transition table.
    RuleTable(RuleTable),
    /// Length of the chunk that follows.
    ChunkLen(usize),
    /// Initial cell values of the worker's chunk.
    Chunk(Vec<u8>),
    /// Logical neighbours outside the chunk for the next generation.
    Boundaries(BoundaryPair),
    /// Request the full chunk; the worker exits after replying.
    Gather,
}

impl ToWorker {
    /// Short name of the message kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::RuleTable(_) => "rule-table",
            Self::ChunkLen(_) => "chunk-len",
            Self::Chunk(_) => "chunk",
            Self::Boundaries(_) => "boundaries",
            Self::Gather => "gather",
        }
    }
}

/// Messages sent by a worker to the coordinator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToCoordinator {
    /// The chunk's new first and last cells after a generation.
    Boundaries(BoundaryPair),
    /// The full chunk, in reply to [`ToWorker::Gather`].
    Chunk(Vec<u8>),
}

impl ToCoordinator {
    /// Short name of the message kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Boundaries(_) => "boundaries",
            Self::Chunk(_) => "chunk",
        }
    }
}

/// Coordinator-side protocol state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Configuration and chunks are being distributed.
    Setup,
    /// Between generations; `completed` generations have been exchanged.
    Exchange {
        /// Generations completed so far.
        completed: u64,
    },
    /// Chunks are being collected.
    Gather,
    /// Every worker has reported its chunk.
    Done,
    /// The run failed and every link was dropped. No result exists.
    Aborted {
        /// Generations fully exchanged before the failure.
        completed: u64,
    },
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Setup => write!(f, "setup"),
            Self::Exchange { completed } => write!(f, "exchange (generation {completed})"),
            Self::Gather => write!(f, "gather"),
            Self::Done => write!(f, "done"),
            Self::Aborted { completed } => {
                write!(f, "aborted after {completed} generations")
            }
        }
    }
}
