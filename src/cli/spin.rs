/*
 * SPDX-FileCopyrightText: 2026 The cycle-timer developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::GlobalArgs;
use anyhow::Result;
use clap::Parser;
use std::hint::black_box;

#[derive(Parser, Debug)]
#[command(name = "spin", about = "Measures the cycles of an arithmetic loop.", long_about = None)]
pub struct CliArgs {
    /// The number of iterations of the workload in each measurement.
    #[arg(short = 'n', long, default_value_t = 1000)]
    pub iterations: u64,

    /// The number of additions performed by each iteration.
    #[arg(short, long, default_value_t = 1000)]
    pub work: u64,

    /// The number of measurements.
    #[arg(short = 'R', long, default_value_t = 10)]
    pub repeats: usize,
}

/// One iteration of the workload.
#[inline(never)]
fn spin(work: u64) -> u64 {
    let mut acc = 0_u64;
    for i in 0..black_box(work) {
        acc = black_box(acc.wrapping_add(i));
    }
    acc
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    log::info!(
        "Measuring {} iterations of {} additions, {} times",
        args.iterations,
        args.work,
        args.repeats
    );
    for _ in 0..args.repeats {
        let measurement = global_args.measure(args.iterations, || {
            black_box(spin(args.work));
        })?;
        println!("\t{}", measurement);
    }
    Ok(())
}
