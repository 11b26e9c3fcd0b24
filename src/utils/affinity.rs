/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2026 The cycle-timer developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Processor affinity of the calling thread.
//!
//! Pinning the measuring thread to a core reduces the chance that the
//! scheduler moves it between the two samples of a measurement; it does not
//! rule it out (e.g., if the core goes offline).

use anyhow::{ensure, Context, Result};

/// Pins the calling thread to the given logical processor.
#[cfg(target_os = "linux")]
pub fn pin_to_core(core_id: usize) -> Result<()> {
    ensure!(
        core_id < libc::CPU_SETSIZE as usize,
        "Core {} is out of range (at most {} processors are supported)",
        core_id,
        libc::CPU_SETSIZE
    );
    // SAFETY: cpu_set_t is a plain bit mask, for which all zeros is valid
    let mut cpu_set: libc::cpu_set_t = unsafe { core::mem::zeroed() };
    // SAFETY: core_id is within CPU_SETSIZE, and a pid of zero denotes the
    // calling thread
    let res = unsafe {
        libc::CPU_ZERO(&mut cpu_set);
        libc::CPU_SET(core_id, &mut cpu_set);
        libc::sched_setaffinity(0, core::mem::size_of::<libc::cpu_set_t>(), &cpu_set)
    };
    if res == -1 {
        return Err(std::io::Error::last_os_error())
            .with_context(|| format!("Could not pin the current thread to core {}", core_id));
    }
    log::debug!("Pinned thread {:?} to core {}", std::thread::current().id(), core_id);
    Ok(())
}

/// Returns the logical processor executing the calling thread, or `None` if
/// it cannot be determined.
#[cfg(target_os = "linux")]
pub fn current_cpu() -> Option<usize> {
    // SAFETY: sched_getcpu has no preconditions
    let cpu = unsafe { libc::sched_getcpu() };
    usize::try_from(cpu).ok()
}
