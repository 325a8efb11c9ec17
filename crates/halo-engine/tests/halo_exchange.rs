//! Integration test: distributed runs agree with the serial reference.
//!
//! Every run goes through real worker threads and rendezvous links. The
//! result is compared cell for cell against `halo_test_utils`'s
//! double-buffered stepper, across rank counts that leave trailing
//! workers with empty chunks.

use halo_core::{Boundary, Domain, RunConfig};
use halo_engine::{Cluster, ElapsedSink, Phase};
use halo_test_utils::{alternating, ones, reference_run, seven_cell_seed};
use proptest::prelude::*;

fn config(cells: usize, rule: u32, generations: u64, boundary: Boundary) -> RunConfig {
    RunConfig {
        cells,
        rule,
        generations,
        boundary,
    }
}

#[test]
fn rule_90_seven_cells_one_generation() {
    for ranks in 2..=9 {
        let report = Cluster::with_ranks(ranks)
            .unwrap()
            .run(config(7, 90, 1, Boundary::Fixed), seven_cell_seed())
            .unwrap();
        assert_eq!(
            report.domain.as_slice(),
            &[0, 0, 1, 0, 1, 0, 0],
            "ranks = {ranks}"
        );
    }
}

#[test]
fn zero_generations_returns_domain_unchanged() {
    let initial = alternating(11);
    let session = Cluster::with_ranks(4)
        .unwrap()
        .launch(config(11, 30, 5, Boundary::Periodic), initial.clone())
        .unwrap();
    assert_eq!(session.generation(), 0);
    assert_eq!(session.phase(), Phase::Exchange { completed: 0 });
    let report = session.finish().unwrap();
    assert_eq!(report.domain, initial);
    assert_eq!(report.metrics.generations, 0);
}

#[test]
fn rule_0_clears_everything_in_one_generation() {
    for boundary in [Boundary::Fixed, Boundary::Periodic] {
        for initial in [ones(13), alternating(13), Domain::random(13, 99).unwrap()] {
            let report = Cluster::with_ranks(5)
                .unwrap()
                .run(config(13, 0, 1, boundary), initial)
                .unwrap();
            assert_eq!(report.domain.population(), 0);
        }
    }
}

#[test]
fn more_workers_than_cells() {
    // 3 cells over 7 workers: ceil(3/7) = 1, four trailing empty chunks.
    let initial = Domain::from_cells(vec![1, 0, 1]).unwrap();
    let report = Cluster::with_ranks(8)
        .unwrap()
        .run(config(3, 110, 4, Boundary::Periodic), initial.clone())
        .unwrap();
    assert_eq!(report.metrics.empty_chunks, 4);
    assert_eq!(
        report.domain,
        reference_run(110, &initial, 4, Boundary::Periodic)
    );
}

#[test]
fn single_cell_domain() {
    for boundary in [Boundary::Fixed, Boundary::Periodic] {
        let initial = Domain::from_cells(vec![1]).unwrap();
        let report = Cluster::with_ranks(3)
            .unwrap()
            .run(config(1, 150, 3, boundary), initial.clone())
            .unwrap();
        assert_eq!(report.domain, reference_run(150, &initial, 3, boundary));
    }
}

#[test]
fn stepwise_advance_matches_single_run() {
    let initial = Domain::single_center(31).unwrap();
    let cfg = config(31, 30, 10, Boundary::Periodic);
    let cluster = Cluster::with_ranks(5).unwrap();

    let mut session = cluster.launch(cfg, initial.clone()).unwrap();
    for expected in 1..=10 {
        assert_eq!(session.advance(1).unwrap(), 1);
        assert_eq!(session.generation(), expected);
    }
    assert_eq!(session.advance(1).unwrap(), 0);
    let stepwise = session.finish().unwrap();

    let whole = cluster.run(cfg, initial).unwrap();
    assert_eq!(stepwise.domain, whole.domain);
}

#[test]
fn elapsed_time_is_recorded_once_per_run() {
    let report = Cluster::with_ranks(3)
        .unwrap()
        .run(config(16, 30, 8, Boundary::Fixed), Domain::single_center(16).unwrap())
        .unwrap();
    let mut sink: Vec<String> = Vec::new();
    sink.record(report.elapsed).unwrap();
    assert_eq!(sink.len(), 1);
    assert!(sink[0].starts_with("elapsed time: "));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn distributed_matches_reference(
        cells in 1usize..40,
        ranks in 2usize..10,
        rule in 0u32..=255,
        generations in 1u64..12,
        periodic in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let boundary = Boundary::from_periodic(periodic);
        let initial = Domain::random(cells, seed).unwrap();
        let report = Cluster::with_ranks(ranks)
            .unwrap()
            .run(config(cells, rule, generations, boundary), initial.clone())
            .unwrap();
        prop_assert_eq!(report.domain, reference_run(rule, &initial, generations, boundary));
        prop_assert_eq!(report.metrics.generations, generations);
        prop_assert_eq!(report.metrics.workers, ranks - 1);
    }
}
