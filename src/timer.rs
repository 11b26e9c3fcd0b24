/*
 * SPDX-FileCopyrightText: 2026 The cycle-timer developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Start/end timing of a code region.
//!
//! ```no_run
//! use cycle_timer::timer;
//! use std::time::Instant;
//!
//! let wall = Instant::now();
//! let start = timer::start();
//! // ... the workload, repeated 1000 times ...
//! let measurement = timer::end(start, 1000, wall.elapsed().as_secs_f64());
//! if measurement.same_core {
//!     println!("{}", measurement);
//! }
//! ```

use crate::tsc::{read_cycle_and_core, Sample};
use std::fmt::{Display, Formatter};

/// The cycles elapsed between two [samples](Sample) and the values derived
/// from them.
///
/// The counters of different cores are not guaranteed to be synchronized, so
/// [`cycle_delta`](Measurement::cycle_delta) and the values derived from it
/// are meaningful only if [`same_core`](Measurement::same_core) is true.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub start: Sample,
    pub end: Sample,
    /// Cycles between `start` and `end`, modulo 2⁶⁴.
    pub cycle_delta: u64,
    /// Whether both samples were read by the same processor.
    pub same_core: bool,
    /// `cycle_delta / iterations`, rounded down.
    pub cycles_per_iteration: u64,
    /// Frequency estimate in GHz: `cycle_delta / (10⁹ · elapsed)`.
    pub estimated_ghz: f64,
}

impl Measurement {
    /// Builds a measurement from two samples.
    ///
    /// `iterations` is the number of repetitions of the workload between the
    /// two samples, and `elapsed_secs` the wall-clock duration of the whole
    /// region. Note that the frequency estimate uses the total cycle delta,
    /// not the per-iteration one.
    ///
    /// # Panics
    ///
    /// If `iterations` is zero. An `elapsed_secs` of zero is not checked and
    /// yields an infinite (or NaN) estimate.
    pub fn new(start: Sample, end: Sample, iterations: u64, elapsed_secs: f64) -> Self {
        let cycle_delta = end.cycles.wrapping_sub(start.cycles);
        Self {
            start,
            end,
            cycle_delta,
            same_core: start.core_id == end.core_id,
            cycles_per_iteration: cycle_delta / iterations,
            estimated_ghz: cycle_delta as f64 / (1E9 * elapsed_secs),
        }
    }

    /// Returns true if the thread changed processor between the two samples,
    /// in which case the measurement should be discarded.
    pub fn migrated(&self) -> bool {
        !self.same_core
    }
}

impl Display for Measurement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "proc_id: {}:{} tsc_diff={} tsc_diff/elapsed={:4.2} [GHz]",
            self.start.core_id, self.end.core_id, self.cycles_per_iteration, self.estimated_ghz
        )
    }
}

/// Samples the counter at the beginning of a timed region.
#[inline(always)]
pub fn start() -> Sample {
    read_cycle_and_core()
}

/// Samples the counter at the end of a timed region started with [`start`].
///
/// The caller must check [`Measurement::same_core`] and, if it is false,
/// discard the measurement and time the region again (see
/// [`measure`](crate::measure::measure)).
///
/// # Panics
///
/// If `iterations` is zero.
#[inline(always)]
pub fn end(start: Sample, iterations: u64, elapsed_secs: f64) -> Measurement {
    let end = read_cycle_and_core();
    Measurement::new(start, end, iterations, elapsed_secs)
}
