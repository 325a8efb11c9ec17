//! Core types for the Halo distributed cellular automaton.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! rule table builder, the static domain partitioner, the coordinator's
//! [`Domain`], the run configuration, and the error taxonomy shared by
//! every other crate in the workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod domain;
pub mod error;
pub mod partition;
pub mod rule;

pub use config::{Boundary, RunConfig};
pub use domain::Domain;
pub use error::{ProtocolError, RunError};
pub use partition::{Chunk, Partition};
pub use rule::{neighbourhood_index, RuleTable};

/// A boundary pair: the logical `(left, right)` neighbours just outside a
/// chunk, or a chunk's freshly computed `(first, last)` cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BoundaryPair {
    /// Left value.
    pub left: u8,
    /// Right value.
    pub right: u8,
}

impl BoundaryPair {
    /// Construct a pair.
    pub const fn new(left: u8, right: u8) -> Self {
        Self { left, right }
    }
}
