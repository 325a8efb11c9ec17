//! Benchmark profiles for the Halo cellular automaton.
//!
//! - [`reference_profile`]: 10K cells, rule 30, periodic, 4 workers
//! - [`stress_profile`]: 1M cells, rule 110, fixed, 8 workers
//! - [`seeded_domain`]: deterministic initial state via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use halo_core::{Boundary, Domain, RunConfig};
use halo_engine::Cluster;

/// A ready-to-run benchmark scenario.
pub struct Profile {
    pub config: RunConfig,
    pub domain: Domain,
    pub cluster: Cluster,
}

/// Deterministic pseudo-random domain of `cells` cells.
pub fn seeded_domain(cells: usize, seed: u64) -> Domain {
    Domain::random(cells, seed).expect("benchmark profiles use non-empty domains")
}

/// 10K cells, rule 30, periodic boundary, 5 ranks, 100 generations.
pub fn reference_profile(seed: u64) -> Profile {
    let cells = 10_000;
    Profile {
        config: RunConfig {
            cells,
            rule: 30,
            generations: 100,
            boundary: Boundary::Periodic,
        },
        domain: seeded_domain(cells, seed),
        cluster: Cluster::with_ranks(5).expect("5 ranks"),
    }
}

/// 1M cells, rule 110, fixed boundary, 9 ranks, 20 generations.
pub fn stress_profile(seed: u64) -> Profile {
    let cells = 1_000_000;
    Profile {
        config: RunConfig {
            cells,
            rule: 110,
            generations: 20,
            boundary: Boundary::Fixed,
        },
        domain: seeded_domain(cells, seed),
        cluster: Cluster::with_ranks(9).expect("9 ranks"),
    }
}
