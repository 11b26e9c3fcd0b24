/*
 * SPDX-FileCopyrightText: 2026 The cycle-timer developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Miscellaneous utilities for reducing measurement noise.

#[cfg(target_os = "linux")]
mod affinity;
#[cfg(target_os = "linux")]
pub use affinity::*;
