//! Test utilities for Halo development.
//!
//! Provides a serial, double-buffered reference stepper that the
//! distributed engine is checked against, plus a few standard domains.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use halo_core::{Boundary, Domain, RuleTable};

/// Advance `cells` one generation on a single thread with a fresh
/// output buffer.
///
/// Deliberately independent of the engine's in-place update so the two
/// can be compared.
pub fn reference_step(table: &RuleTable, cells: &[u8], boundary: Boundary) -> Vec<u8> {
    let n = cells.len();
    let outside = |wrapped: u8| if boundary.is_periodic() { wrapped } else { 0 };
    (0..n)
        .map(|i| {
            let left = if i == 0 { outside(cells[n - 1]) } else { cells[i - 1] };
            let right = if i + 1 == n { outside(cells[0]) } else { cells[i + 1] };
            table.apply(left, cells[i], right)
        })
        .collect()
}

/// Advance `domain` `generations` times with [`reference_step`].
pub fn reference_run(rule: u32, domain: &Domain, generations: u64, boundary: Boundary) -> Domain {
    let table = RuleTable::new(rule).expect("reference rule must be in [0, 255]");
    let mut cells = domain.as_slice().to_vec();
    for _ in 0..generations {
        cells = reference_step(&table, &cells, boundary);
    }
    Domain::from_cells(cells).expect("reference step preserves binary cells")
}

/// The seven-cell single-seed domain `0001000`.
pub fn seven_cell_seed() -> Domain {
    Domain::single_center(7).expect("non-empty")
}

/// Alternating `0101...` domain of `len` cells.
pub fn alternating(len: usize) -> Domain {
    Domain::from_cells((0..len).map(|i| (i % 2) as u8).collect()).expect("non-empty")
}

/// All-ones domain of `len` cells.
pub fn ones(len: usize) -> Domain {
    Domain::from_cells(vec![1; len]).expect("non-empty")
}
