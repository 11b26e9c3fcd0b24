/*
 * SPDX-FileCopyrightText: 2026 The cycle-timer developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::GlobalArgs;
use anyhow::{ensure, Result};
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "sleep",
    about = "Estimates the time-stamp counter frequency over a sleep.",
    long_about = "Estimates the time-stamp counter frequency over a sleep. \
        As the thread is suspended, it is likely to be moved to another \
        processor unless it is pinned."
)]
pub struct CliArgs {
    /// How long to sleep, in milliseconds.
    #[arg(short, long, default_value_t = 100)]
    pub millis: u64,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    ensure!(args.millis > 0, "The sleep duration must be positive");
    let duration = Duration::from_millis(args.millis);
    let measurement = global_args.measure(1, || std::thread::sleep(duration))?;
    log::info!(
        "Time-stamp counter frequency: {:.3} GHz",
        measurement.estimated_ghz
    );
    println!("\t{}", measurement);
    Ok(())
}
