//! Halo-exchange engine for the Halo distributed cellular automaton.
//!
//! A [`Coordinator`] owns the full domain and drives one [`Worker`] per
//! chunk through a synchronous two-phase exchange each generation: send
//! every worker its halo, then collect every worker's new edge cells.
//! [`Cluster`] runs each worker rank on its own thread and returns a
//! [`RunReport`] once all chunks are gathered.
//!
//! ```
//! use halo_core::{Boundary, Domain, RunConfig};
//! use halo_engine::Cluster;
//!
//! let config = RunConfig { cells: 7, rule: 90, generations: 1, boundary: Boundary::Fixed };
//! let domain = Domain::single_center(7).unwrap();
//! let report = Cluster::with_ranks(3).unwrap().run(config, domain).unwrap();
//! assert_eq!(report.domain.as_slice(), &[0, 0, 1, 0, 1, 0, 0]);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cluster;
pub mod coordinator;
pub mod elapsed;
pub mod link;
pub mod metrics;
pub mod protocol;
pub mod worker;

pub use cluster::{Cluster, ClusterConfig, RunReport, Session};
pub use coordinator::{halo_for, Coordinator};
pub use elapsed::{ElapsedLog, ElapsedSink, SinkError};
pub use metrics::RunMetrics;
pub use protocol::{Phase, ToCoordinator, ToWorker, WorkerConfig};
pub use worker::{run_worker, step_chunk, Worker, WorkerSummary};
