/*
 * SPDX-FileCopyrightText: 2026 The cycle-timer developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use cycle_timer::prelude::*;

const READS: usize = 1_000;

fn logger_init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_back_to_back_reads() -> Result<()> {
    logger_init();
    if !is_supported() {
        log::warn!("RDTSCP is not supported, skipping");
        return Ok(());
    }
    #[cfg(target_os = "linux")]
    if let Some(cpu) = current_cpu() {
        pin_to_core(cpu)?;
    }

    let mut same_core = 0;
    for _ in 0..READS {
        let first = read_cycle_and_core();
        let second = read_cycle_and_core();
        if first.core_id == second.core_id {
            same_core += 1;
            assert!(second.cycles >= first.cycles);
        }
    }
    // the scheduler may still move us now and then
    assert!(same_core * 10 >= READS * 9, "{} of {} on the same core", same_core, READS);
    Ok(())
}

#[test]
fn test_measure_stays_on_core() -> Result<()> {
    logger_init();
    if !is_supported() {
        return Ok(());
    }
    let mut acc = 0_u64;
    let m = try_measure(1000, 100, || {
        acc = std::hint::black_box(acc + 1);
    })?;
    assert!(m.same_core);
    assert_eq!(m.start.core_id, m.end.core_id);
    assert!(m.cycle_delta > 0);
    assert_eq!(m.cycles_per_iteration, m.cycle_delta / 1000);
    assert!(m.estimated_ghz > 0.0);

    let m = measure(10, || {});
    assert!(m.same_core);
    Ok(())
}

#[test]
fn test_start_end() {
    if !is_supported() {
        return;
    }
    let wall = std::time::Instant::now();
    let s = start();
    let m = end(s, 1, wall.elapsed().as_secs_f64());
    assert_eq!(m.start, s);
    if m.same_core {
        assert_eq!(m.cycle_delta, m.end.cycles - s.cycles);
    }
}
