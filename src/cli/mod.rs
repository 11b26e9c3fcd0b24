/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2026 The cycle-timer developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Command-line interface structs, functions, and methods.
//!
//! Each command is implemented as a submodule with a `CliArgs` struct and a
//! `main` function.

use crate::build_info;
use crate::measure::{measure, try_measure};
use crate::timer::Measurement;
use anyhow::{ensure, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::time::{Instant, SystemTime};

pub mod sleep;
pub mod spin;

/// Shared CLI arguments for all commands.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    #[arg(short, long, global = true, display_order = 1000)]
    /// Pin the measuring thread to this logical processor before measuring.
    pub pin: Option<usize>,

    #[arg(short = 'a', long, global = true, display_order = 1000)]
    /// Give up after this many measurements invalidated by a migration to
    /// another processor (by default, retry until a valid one is obtained).
    pub max_attempts: Option<usize>,
}

impl GlobalArgs {
    /// Pins the current thread if requested.
    pub fn setup(&self) -> Result<()> {
        if let Some(core_id) = self.pin {
            #[cfg(target_os = "linux")]
            crate::utils::pin_to_core(core_id)?;
            #[cfg(not(target_os = "linux"))]
            anyhow::bail!("Pinning to core {} is supported only on Linux", core_id);
        }
        Ok(())
    }

    /// Times `iterations` calls to `workload` with the retry policy
    /// specified by the arguments.
    pub fn measure(&self, iterations: u64, workload: impl FnMut()) -> Result<Measurement> {
        ensure!(iterations > 0, "The number of iterations must be positive");
        match self.max_attempts {
            Some(max_attempts) => try_measure(iterations, max_attempts, workload),
            None => Ok(measure(iterations, workload)),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum SubCommands {
    Spin(spin::CliArgs),
    Sleep(sleep::CliArgs),
}

#[derive(Parser, Debug)]
#[command(name = "cycle-timer", version = build_info::version_string())]
/// Measures the CPU cycles spent in a code region using RDTSCP.
///
/// Measurements in which the thread migrated to another processor are
/// discarded and repeated.
///
/// Environment (noteworthy environment variables used):
///
/// RUST_LOG: configuration for env_logger; pass `debug` to see discarded
/// measurements.
pub struct Cli {
    #[command(subcommand)]
    pub command: SubCommands,
    #[clap(flatten)]
    pub args: GlobalArgs,
}

/// Returns the processor running the calling thread, as shown in log lines.
///
/// Migrations are what invalidate measurements, so each line carries the
/// processor instead of the thread.
fn cpu_label() -> String {
    #[cfg(target_os = "linux")]
    if let Some(cpu) = crate::utils::current_cpu() {
        return format!("cpu{}", cpu);
    }
    "cpu?".to_owned()
}

/// Initializes the `env_logger` logger.
///
/// Each line starts with a timestamp, the time elapsed since initialization
/// (in milliseconds), the level, and the [processor](cpu_label) that logged.
/// The default filter is `info`, and can be overridden with `RUST_LOG`.
pub fn init_env_logger() -> Result<()> {
    use jiff::fmt::friendly::{Designator, Spacing, SpanPrinter};
    use jiff::{SignedDuration, Timestamp};

    let start = Instant::now();
    let printer = SpanPrinter::new()
        .spacing(Spacing::None)
        .designator(Designator::Compact);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(move |buf, record| {
            let now = Timestamp::try_from(SystemTime::now()).map_err(std::io::Error::other)?;
            let elapsed = SignedDuration::from_millis(start.elapsed().as_millis() as i64);
            let style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "{} +{} {style}{:<5}{style:#} [{}] {} - {}",
                now.strftime("%F %T%.3f"),
                printer.duration_to_string(&elapsed),
                record.level(),
                cpu_label(),
                record.target(),
                record.args()
            )
        })
        .try_init()?;
    Ok(())
}

/// The entry point of the command-line interface.
pub fn cli_main<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let start = Instant::now();
    let cli = Cli::parse_from(args);

    ensure!(
        crate::tsc::is_supported(),
        "This processor does not support the RDTSCP instruction"
    );
    cli.args.setup()?;

    match cli.command {
        SubCommands::Spin(args) => {
            spin::main(cli.args, args)?;
        }
        SubCommands::Sleep(args) => {
            sleep::main(cli.args, args)?;
        }
    }

    log::info!(
        "The command took {}",
        pretty_print_elapsed(start.elapsed().as_secs_f64())
    );

    Ok(())
}

/// Pretty-prints seconds in a human-readable format.
fn pretty_print_elapsed(elapsed: f64) -> String {
    let mut result = String::new();
    let mut elapsed_seconds = elapsed as u64;
    let hours = elapsed_seconds / (60 * 60);
    elapsed_seconds %= 60 * 60;
    let minutes = elapsed_seconds / 60;

    match hours {
        0 => {}
        1 => result.push_str("1 hour "),
        _ => result.push_str(&format!("{} hours ", hours)),
    }
    match minutes {
        0 => {}
        1 => result.push_str("1 minute "),
        _ => result.push_str(&format!("{} minutes ", minutes)),
    }

    result.push_str(&format!("{:.3} seconds ({}s)", elapsed % 60.0, elapsed));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from(["cycle-timer", "spin", "--pin", "2", "-a", "5"]);
        assert_eq!(cli.args.pin, Some(2));
        assert_eq!(cli.args.max_attempts, Some(5));
        assert!(matches!(cli.command, SubCommands::Spin(_)));
    }

    #[test]
    fn test_cpu_label() {
        let label = cpu_label();
        assert!(label.starts_with("cpu"));
        let id = &label[3..];
        assert!(id == "?" || id.parse::<usize>().is_ok(), "{}", label);
    }

    #[test]
    fn test_pretty_print_elapsed() {
        assert_eq!(pretty_print_elapsed(1.5), "1.500 seconds (1.5s)");
        assert_eq!(
            pretty_print_elapsed(3723.25),
            "1 hour 2 minutes 3.250 seconds (3723.25s)"
        );
    }
}
