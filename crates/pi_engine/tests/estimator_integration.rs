//! Integration tests for the estimator loop.
//!
//! # Test Categories
//!
//! 1. **Seeding**: prior run records and clamping at the entry point
//! 2. **Cycle accounting**: exactly N batches per cycle, any arrival order
//! 3. **Convergence**: Δπ shrinks as the total grows
//! 4. **End to end**: full runs stopped from the sink or another thread

use std::thread;
use std::time::{Duration, Instant};

use chrono::Utc;
use crossbeam_channel::bounded;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use pi_engine::ratio::{pi_ratio, to_f64};
use pi_engine::rng::SampleRng;
use pi_engine::worker::SampleWorker;
use pi_engine::{
    Aggregator, EstimatorConfig, EstimatorError, PiEstimator, PriorRun, PriorRunRecord,
    ProgressReport, WriterSink,
};
use proptest::prelude::*;

fn config(sync_every: u64, parallelism: usize, seed: u64) -> EstimatorConfig {
    EstimatorConfig::builder()
        .sync_every(sync_every)
        .parallelism(parallelism)
        .queue_capacity(parallelism * 2)
        .seed(seed)
        .build()
        .unwrap()
}

// ============================================================================
// Seeding
// ============================================================================

#[test]
fn test_empty_record_starts_at_zero() {
    let estimator = PiEstimator::new(config(10, 1, 1), &PriorRunRecord::empty());

    assert_eq!(estimator.seed_counts(), (0, 0));
    assert!(estimator.seed_pi().is_zero());
}

#[test]
fn test_historical_record_seed() {
    let prior = PriorRunRecord::new(vec![
        PriorRun::new(321_228_337_250, 409_000_000_000).with_note("serial"),
        PriorRun::new(4_398_286_571, 5_600_000_000),
        PriorRun::new(13_194_656_076, 16_800_000_000),
    ]);
    let estimator = PiEstimator::new(config(10, 1, 1), &prior);

    assert_eq!(
        estimator.seed_counts(),
        (338_821_279_897, 431_400_000_000)
    );
    approx::assert_relative_eq!(
        to_f64(&estimator.seed_pi()),
        std::f64::consts::PI,
        epsilon = 1e-4
    );
}

#[test]
fn test_negative_entry_point_matches_empty_start() {
    let clamped = PiEstimator::from_counts(config(10, 1, 1), -1, -1);
    assert_eq!(clamped.seed_pi(), pi_ratio(0, 0));
}

// ============================================================================
// Cycle accounting
// ============================================================================

#[test]
fn test_single_cycle_two_workers() {
    let (tx, rx) = bounded(2);
    let mut aggregator = Aggregator::new(1_000, 4_000, 1000, 2, Instant::now());

    tx.send(400).unwrap();
    tx.send(420).unwrap();
    aggregator.collect_cycle(&rx).unwrap();

    let tally = aggregator.tally();
    assert_eq!(tally.total, 6_000);
    assert_eq!(tally.inside, 1_820);
    assert_eq!((tally.run_inside, tally.run_total), (820, 2_000));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_cycle_increment_independent_of_arrival_order(
        parts in prop::collection::vec(0u64..=1000, 1..16),
        rotate in 0usize..16,
        cycles in 1usize..5,
    ) {
        let n = parts.len();
        let (tx, rx) = bounded(n);
        let mut aggregator = Aggregator::new(0, 0, 1000, n, Instant::now());

        let mut order = parts.clone();
        for _ in 0..cycles {
            order.rotate_left(rotate % n);
            for &part in &order {
                tx.send(part).unwrap();
            }
            aggregator.collect_cycle(&rx).unwrap();
        }

        let tally = aggregator.tally();
        let expected_inside: u64 = parts.iter().sum::<u64>() * cycles as u64;
        prop_assert_eq!(tally.total, 1000 * n as u64 * cycles as u64);
        prop_assert_eq!(tally.inside, expected_inside);
        prop_assert_eq!(tally.run_total, tally.total);
    }
}

// ============================================================================
// Convergence
// ============================================================================

#[test]
fn test_delta_shrinks_with_total() {
    // One seeded worker, driven synchronously so the sequence is fixed.
    let sync_every = 10_000;
    let mut worker = SampleWorker::new(0, sync_every, SampleRng::from_seed(31_415));
    let start = Instant::now();
    let mut aggregator = Aggregator::new(0, 0, sync_every, 1, start);

    let mut deltas = Vec::new();
    for cycle in 1..=200u32 {
        aggregator.absorb_cycle(worker.sample_batch());
        let report = aggregator.report(start + Duration::from_millis(cycle.into()), Utc::now());
        assert!(!report.delta.is_negative());

        // |4(i + d)/(t + k) - 4i/t| <= 4k/(t + k) for any batch of k samples.
        let bound = BigRational::new(BigInt::from(4 * sync_every), BigInt::from(report.total));
        assert!(report.delta <= bound, "cycle {cycle}: delta above bound");
        deltas.push(report.delta);
    }

    let early: BigRational = deltas[1..11].iter().cloned().sum();
    let late: BigRational = deltas[190..200].iter().cloned().sum();
    assert!(late < early);
    approx::assert_relative_eq!(to_f64(&aggregator.pi()), std::f64::consts::PI, epsilon = 0.01);
}

// ============================================================================
// End to end
// ============================================================================

#[test]
fn test_run_writes_one_line_per_cycle() {
    let estimator = PiEstimator::from_counts(config(2_000, 3, 9), 0, 0);
    let shutdown = estimator.shutdown_signal();

    let mut sink = WriterSink::new(Vec::new());
    let mut cycles = 0;
    let mut stopping_sink = |report: &ProgressReport| {
        cycles += 1;
        if cycles == 5 {
            shutdown.request();
        }
        pi_engine::ProgressSink::emit(&mut sink, report)
    };

    let summary = estimator.run(&mut stopping_sink).unwrap();
    assert_eq!(summary.cycles, 5);
    assert_eq!(summary.tally.total, 5 * 6_000);

    let text = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[4].contains("in/total (this run): "));
    assert!(lines[4].ends_with("K"));
    assert!(lines[4].contains(&format!("/{}, ", 30_000)));
}

#[test]
fn test_run_resumes_from_prior_runs() {
    let prior = PriorRunRecord::new(vec![PriorRun::new(2, 4), PriorRun::new(1, 4)]);
    let estimator = PiEstimator::new(config(1_000, 2, 5), &prior);
    let shutdown = estimator.shutdown_signal();

    let mut first: Option<ProgressReport> = None;
    let mut sink = |report: &ProgressReport| {
        first.get_or_insert_with(|| report.clone());
        shutdown.request();
        Ok::<(), EstimatorError>(())
    };

    let summary = estimator.run(&mut sink).unwrap();
    let first = first.unwrap();

    assert_eq!(summary.cycles, 1);
    assert_eq!(first.total, 8 + 2_000);
    assert_eq!(first.run_total, 2_000);
    assert_eq!(first.inside - first.run_inside, 3);
    // Delta is measured against the seeded estimate of 3/2.
    let seeded = BigRational::new(BigInt::from(3), BigInt::from(2));
    assert_eq!(first.delta, (&first.pi - &seeded).abs());
}

#[test]
fn test_shutdown_from_another_thread_returns_summary() {
    // A one-slot queue keeps workers parked on send, so the signal often
    // lands while a cycle is only partly collected.
    for round in 0..50u64 {
        let config = EstimatorConfig::builder()
            .sync_every(2_000)
            .parallelism(4)
            .queue_capacity(1)
            .seed(round)
            .build()
            .unwrap();
        let estimator = PiEstimator::from_counts(config, 10, 20);
        let shutdown = estimator.shutdown_signal();

        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_micros(200 + round * 10));
            shutdown.request();
        });

        let mut reported = 0u64;
        let mut sink = |report: &ProgressReport| {
            reported += 1;
            assert_eq!(report.run_total, reported * 8_000);
            Ok::<(), EstimatorError>(())
        };
        let summary = estimator
            .run(&mut sink)
            .unwrap_or_else(|err| panic!("round {round}: {err}"));
        stopper.join().unwrap();

        assert_eq!(summary.cycles, reported);
        assert_eq!(summary.tally.run_total, summary.cycles * 8_000);
        assert_eq!(summary.tally.total, 20 + summary.tally.run_total);
        assert_eq!(summary.tally.inside - summary.tally.run_inside, 10);
    }
}
