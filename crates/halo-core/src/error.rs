//! Error types for the Halo cellular automaton.
//!
//! Organized by subsystem: [`RunError`] is the taxonomy surfaced to the
//! caller of a whole simulation, [`ProtocolError`] describes why a single
//! link between the coordinator and a worker broke.

use std::error::Error;
use std::fmt;

/// Fatal errors from configuring or running a simulation.
///
/// Every variant aborts the run. There is no degraded mode and no
/// partial result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunError {
    /// Fewer than two ranks: a coordinator needs at least one worker.
    InsufficientWorkers {
        /// Total rank count that was requested.
        ranks: usize,
    },
    /// Rule number outside `[0, 255]`.
    InvalidRule {
        /// The rejected rule number.
        rule: u32,
    },
    /// A structural configuration invariant was violated.
    InvalidConfig {
        /// Description of the violated invariant.
        reason: String,
    },
    /// A send or receive on a coordinator/worker link failed.
    CommunicationFailure {
        /// Rank at the far end of the broken link.
        rank: usize,
        /// The underlying link failure.
        reason: ProtocolError,
    },
}

impl RunError {
    /// Shorthand for [`RunError::InvalidConfig`].
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientWorkers { ranks } => {
                write!(f, "need at least 2 ranks (1 coordinator + 1 worker), got {ranks}")
            }
            Self::InvalidRule { rule } => write!(f, "rule {rule} is outside [0, 255]"),
            Self::InvalidConfig { reason } => write!(f, "invalid config: {reason}"),
            Self::CommunicationFailure { rank, reason } => {
                write!(f, "communication with rank {rank} failed: {reason}")
            }
        }
    }
}

impl Error for RunError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CommunicationFailure { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Failures on a single coordinator/worker link.
///
/// Wrapped in [`RunError::CommunicationFailure`] by whichever side
/// observes the failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProtocolError {
    /// The peer hung up: its channel endpoint was dropped.
    Disconnected,
    /// A message of the wrong kind arrived for the current phase.
    UnexpectedMessage {
        /// Message kind the protocol expected.
        expected: &'static str,
        /// Message kind that actually arrived.
        got: &'static str,
    },
    /// A chunk payload did not have the announced length.
    ChunkLengthMismatch {
        /// Announced or partitioned length.
        expected: usize,
        /// Length actually received.
        got: usize,
    },
    /// A chunk payload carried a value other than 0 or 1.
    InvalidCell {
        /// Offending value.
        value: u8,
    },
    /// The rule table delivered at setup was built for a different rule
    /// than the one in the accompanying config.
    RuleMismatch {
        /// Rule number from the config message.
        configured: u8,
        /// Rule number the table was built from.
        received: u8,
    },
    /// The peer's thread panicked instead of exiting cleanly.
    WorkerPanicked,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "peer disconnected"),
            Self::UnexpectedMessage { expected, got } => {
                write!(f, "expected {expected} message, got {got}")
            }
            Self::ChunkLengthMismatch { expected, got } => {
                write!(f, "chunk length mismatch: expected {expected} cells, got {got}")
            }
            Self::InvalidCell { value } => write!(f, "cell value {value} is not 0 or 1"),
            Self::RuleMismatch {
                configured,
                received,
            } => write!(
                f,
                "rule table for rule {received} does not match configured rule {configured}"
            ),
            Self::WorkerPanicked => write!(f, "worker thread panicked"),
        }
    }
}

impl Error for ProtocolError {}
