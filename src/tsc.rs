/*
 * SPDX-FileCopyrightText: 2026 The cycle-timer developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Access to the time-stamp counter through the `RDTSCP` instruction.
//!
//! `RDTSCP` returns, in a single instruction, the value of the time-stamp
//! counter and the content of the `IA32_TSC_AUX` register, which operating
//! systems initialize with an identifier of the logical processor. The two
//! values are thus always consistent with each other, which is what makes it
//! possible to detect that a thread migrated between two reads.
//!
//! The instruction waits for all previous instructions to execute before
//! reading the counter, so no additional fence is needed before it.

#[cfg(target_arch = "x86")]
use core::arch::x86::{__cpuid, __get_cpuid_max, __rdtscp};
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::{__cpuid, __get_cpuid_max, __rdtscp};

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
compile_error!("The RDTSCP instruction is available only on x86 and x86_64 targets.");

/// Extended CPUID leaf containing the `RDTSCP` feature flag.
const EXT_FEATURES_LEAF: u32 = 0x8000_0001;
/// Bit of `EDX` in [`EXT_FEATURES_LEAF`] signalling `RDTSCP` support.
const RDTSCP_BIT: u32 = 1 << 27;

/// Bits of `IA32_TSC_AUX` used by Linux for the CPU number.
const CPU_BITS: u32 = 12;

/// A value of the time-stamp counter together with the identifier of the
/// logical processor that read it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Sample {
    /// The value of the time-stamp counter.
    pub cycles: u64,
    /// The raw content of `IA32_TSC_AUX` at the time of the read.
    pub core_id: u32,
}

impl Sample {
    pub fn new(cycles: u64, core_id: u32) -> Self {
        Self { cycles, core_id }
    }

    /// Returns the CPU number encoded in the identifier.
    ///
    /// Linux stores `node << 12 | cpu` in `IA32_TSC_AUX`; other operating
    /// systems might use a different layout, in which case the result is
    /// meaningless. Same-core checks always use the raw
    /// [`core_id`](Sample::core_id).
    pub fn cpu(&self) -> u32 {
        self.core_id & ((1 << CPU_BITS) - 1)
    }

    /// Returns the NUMA node encoded in the identifier (see [`Sample::cpu`]).
    pub fn node(&self) -> u32 {
        self.core_id >> CPU_BITS
    }
}

/// Reads the time-stamp counter and the processor identifier with a single
/// `RDTSCP` instruction.
///
/// Support for the instruction is a property of the target: executing it on
/// a processor without `RDTSCP` raises an invalid-opcode exception. Use
/// [`is_supported`] to check beforehand.
#[inline(always)]
pub fn read_cycle_and_core() -> Sample {
    let mut core_id: u32 = 0;
    // SAFETY: RDTSCP only reads the counter and TSC_AUX, and writes the
    // latter through a pointer to a local
    let cycles = unsafe { __rdtscp(&mut core_id) };
    Sample { cycles, core_id }
}

/// Returns whether the current processor supports `RDTSCP`.
pub fn is_supported() -> bool {
    // SAFETY: CPUID is available on every x86_64 processor and on every x86
    // processor able to run Rust code
    unsafe {
        let (max_ext_leaf, _) = __get_cpuid_max(0x8000_0000);
        if max_ext_leaf < EXT_FEATURES_LEAF {
            return false;
        }
        __cpuid(EXT_FEATURES_LEAF).edx & RDTSCP_BIT != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linux_aux_layout() {
        let sample = Sample::new(0, (3 << 12) | 17);
        assert_eq!(sample.cpu(), 17);
        assert_eq!(sample.node(), 3);

        let sample = Sample::new(0, 4095);
        assert_eq!(sample.cpu(), 4095);
        assert_eq!(sample.node(), 0);
    }

    #[test]
    fn test_read_is_monotone() {
        if !is_supported() {
            return;
        }
        let first = read_cycle_and_core();
        let second = read_cycle_and_core();
        if first.core_id == second.core_id {
            assert!(second.cycles >= first.cycles);
        }
    }
}
