//! Halo: a distributed one-dimensional cellular automaton.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Halo sub-crates. A coordinator partitions the domain across worker
//! ranks, drives a synchronous halo exchange each generation, and gathers
//! the final state.
//!
//! # Quick start
//!
//! ```rust
//! use halo::prelude::*;
//!
//! let config = RunConfig {
//!     cells: 7,
//!     rule: 90,
//!     generations: 1,
//!     boundary: Boundary::Fixed,
//! };
//! let domain = Domain::single_center(7).unwrap();
//! let report = Cluster::with_ranks(3).unwrap().run(config, domain).unwrap();
//! assert_eq!(report.domain.to_string(), "0 0 1 0 1 0 0");
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `halo-core` | Rule tables, partitioning, domain, config, errors |
//! | [`engine`] | `halo-engine` | Protocol, worker and coordinator actors, cluster |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types (`halo-core`).
pub use halo_core as types;

/// Halo-exchange engine (`halo-engine`).
pub use halo_engine as engine;

/// Common imports for running a simulation.
pub mod prelude {
    pub use halo_core::{
        Boundary, BoundaryPair, Chunk, Domain, Partition, ProtocolError, RuleTable, RunConfig,
        RunError,
    };
    pub use halo_engine::{
        Cluster, ClusterConfig, ElapsedLog, ElapsedSink, RunMetrics, RunReport, Session,
    };
}
