/*
 * SPDX-FileCopyrightText: 2026 The cycle-timer developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use cycle_timer::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const TESTS: usize = 10_000;

#[test]
fn test_delta_without_wraparound() {
    let mut rng = SmallRng::seed_from_u64(0);
    for _ in 0..TESTS {
        let start = rng.random::<u64>();
        let end = rng.random_range(start..=u64::MAX);
        let m = Measurement::new(Sample::new(start, 0), Sample::new(end, 0), 1, 1.0);
        assert_eq!(m.cycle_delta, end - start);
    }
}

#[test]
fn test_delta_with_wraparound() {
    let mut rng = SmallRng::seed_from_u64(0);
    for _ in 0..TESTS {
        // start right before the maximum, end right after zero
        let before_max = rng.random_range(0..1_u64 << 32);
        let after_zero = rng.random_range(0..1_u64 << 32);
        let start = u64::MAX - before_max;
        let m = Measurement::new(Sample::new(start, 0), Sample::new(after_zero, 0), 1, 1.0);
        assert_eq!(m.cycle_delta, before_max + after_zero + 1);
    }

    let m = Measurement::new(Sample::new(u64::MAX, 0), Sample::new(0, 0), 1, 1.0);
    assert_eq!(m.cycle_delta, 1);
}

#[test]
fn test_same_core_iff_equal_ids() {
    let mut rng = SmallRng::seed_from_u64(0);
    for _ in 0..TESTS {
        let start_id = rng.random_range(0..8);
        let end_id = rng.random_range(0..8);
        let m = Measurement::new(
            Sample::new(rng.random(), start_id),
            Sample::new(rng.random(), end_id),
            1,
            1.0,
        );
        assert_eq!(m.same_core, start_id == end_id);
        assert_eq!(m.migrated(), start_id != end_id);
    }
}

#[test]
fn test_reporting_arithmetic() {
    let m = Measurement::new(Sample::new(0, 0), Sample::new(2_000_000_000, 0), 1000, 1.0);
    assert_eq!(m.cycle_delta, 2_000_000_000);
    assert_eq!(m.cycles_per_iteration, 2_000_000);
    assert_eq!(m.estimated_ghz, 2.0);
}

#[test]
fn test_same_core_scenario() {
    let start = Sample::new(1_000_000, 3);
    let end = Sample::new(1_500_000, 3);
    let m = Measurement::new(start, end, 100, 0.5);
    assert!(m.same_core);
    assert_eq!(m.cycle_delta, 500_000);
    assert_eq!(m.cycles_per_iteration, 5000);
    // the estimate uses the total delta: 500 000 / (10⁹ · 0.5)
    assert!((m.estimated_ghz - 0.001).abs() < 1E-12);
    assert!(m.to_string().starts_with("proc_id: 3:3 tsc_diff=5000 "));
}

#[test]
fn test_migration_scenario() {
    let mut rng = SmallRng::seed_from_u64(0);
    for _ in 0..100 {
        let m = Measurement::new(
            Sample::new(rng.random(), 1),
            Sample::new(rng.random(), 2),
            rng.random_range(1..1000),
            rng.random_range(0.001..10.0),
        );
        assert!(m.migrated());
        assert!(m.to_string().starts_with("proc_id: 1:2 "));
    }
}
