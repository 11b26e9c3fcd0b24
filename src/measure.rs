/*
 * SPDX-FileCopyrightText: 2026 The cycle-timer developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Timing of a workload, retrying when the thread migrates.

use crate::timer::{self, Measurement};
use crate::tsc::read_cycle_and_core;
use anyhow::{bail, ensure, Result};
use std::time::Instant;

/// Times `iterations` calls to `workload` once.
///
/// The wall clock is started before the first sample and stopped after the
/// last one, so the elapsed time includes the whole region.
#[inline(always)]
fn time_once(iterations: u64, workload: &mut impl FnMut()) -> Measurement {
    let wall = Instant::now();
    let start = timer::start();
    for _ in 0..iterations {
        workload();
    }
    let end = read_cycle_and_core();
    let elapsed_secs = wall.elapsed().as_secs_f64();
    Measurement::new(start, end, iterations, elapsed_secs)
}

/// Runs `region` until it yields a measurement whose samples were read by
/// the same processor, at most `max_attempts` times if given.
///
/// Returns `None` if all attempts migrated.
fn retry_while_migrated(
    max_attempts: Option<usize>,
    mut region: impl FnMut() -> Measurement,
) -> Option<Measurement> {
    let mut attempt = 1_usize;
    loop {
        let measurement = region();
        if measurement.same_core {
            return Some(measurement);
        }
        log::debug!(
            "Attempt {}{} migrated from {} to {}",
            attempt,
            max_attempts.map_or_else(String::new, |m| format!("/{}", m)),
            measurement.start.core_id,
            measurement.end.core_id
        );
        if max_attempts.is_some_and(|m| attempt >= m) {
            return None;
        }
        attempt += 1;
    }
}

/// Times `iterations` calls to `workload`, repeating the whole region until
/// the first and last sample are read by the same processor.
///
/// This function does not return until a valid measurement is obtained; use
/// [`try_measure`] to bound the number of attempts.
///
/// # Panics
///
/// If `iterations` is zero.
pub fn measure(iterations: u64, mut workload: impl FnMut()) -> Measurement {
    assert!(iterations > 0, "The number of iterations must be positive");
    let Some(measurement) = retry_while_migrated(None, || time_once(iterations, &mut workload))
    else {
        unreachable!("unbounded retries always end with a measurement")
    };
    measurement
}

/// Like [`measure`], but gives up after `max_attempts` measurements
/// invalidated by a migration.
pub fn try_measure(
    iterations: u64,
    max_attempts: usize,
    mut workload: impl FnMut(),
) -> Result<Measurement> {
    ensure!(iterations > 0, "The number of iterations must be positive");
    ensure!(max_attempts > 0, "The number of attempts must be positive");
    match retry_while_migrated(Some(max_attempts), || time_once(iterations, &mut workload)) {
        Some(measurement) => Ok(measurement),
        None => bail!(
            "The thread migrated to a different processor in all {} attempts; consider pinning it",
            max_attempts
        ),
    }
}
