// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `ignore_older` wall-clock filter (spec §4.3 run loop, `Create` row;
//! spec §8 invariant 6).

use std::time::{Duration, SystemTime};

/// Returns true if a file observed with the given `mtime` should be
/// considered "too old to start harvesting" as of `now`.
///
/// `ignore_older` of `None` (or zero) disables the filter entirely.
pub fn is_ignored_older(mtime: SystemTime, now: SystemTime, ignore_older: Option<Duration>) -> bool {
    let Some(threshold) = ignore_older else {
        return false;
    };
    if threshold.is_zero() {
        return false;
    }
    match now.duration_since(mtime) {
        Ok(age) => age > threshold,
        // mtime is in the future relative to `now`: never too old.
        Err(_) => false,
    }
}
