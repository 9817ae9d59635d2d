// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tick value generators and label formatting.

use alloc::string::String;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Returns `n` values spread evenly over `[min, max]`.
///
/// - `n == 0` or `min == max` yields nothing.
/// - `n == 1` yields the midpoint.
/// - Otherwise the endpoints are emitted exactly, with `n - 2` interior values between them.
pub fn evenly_spaced(n: usize, min: f64, max: f64) -> Vec<f64> {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };
    if n == 0 || min == max || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if n == 1 {
        return alloc::vec![min + (max - min) / 2.0];
    }
    let delta = max - min;
    let last = (n - 1) as f64;
    let mut out = Vec::with_capacity(n);
    out.push(min);
    out.extend((1..n - 1).map(|i| min + delta * i as f64 / last));
    out.push(max);
    out
}

/// Returns a round step so that `base` steps cover `range`.
///
/// The step is a multiple of a power of `base`: the smallest power of `base` at least as large
/// as `range` is found first, then shrunk to the smallest multiple of the next lower power
/// that still covers `range`.
///
/// Returns `0.0` for non-positive or non-finite input.
pub fn nice_scale(range: f64, base: f64) -> f64 {
    if !range.is_finite() || range <= 0.0 || !base.is_finite() || base <= 1.0 {
        return 0.0;
    }
    let mut max = base.powf((range.ln() / base.ln()).ceil());
    if max > base {
        max = (range / max * base).ceil() * (max / base);
    }
    max / base
}

/// Returns `count + 1` values starting at `min`, spaced by [`nice_scale`] of the span.
///
/// The last value may overshoot `max`; callers drop ticks outside their range.
pub fn nice_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    let step = nice_scale(max - min, count as f64);
    if count == 0 || step == 0.0 {
        return Vec::new();
    }
    (0..=count).map(|i| min + step * i as f64).collect()
}

/// Formats a tick value for display.
///
/// Uses the shortest representation that round-trips, without a trailing `.0` for integral
/// values and with negative zero printed as `0`.
pub fn format_tick(value: f64) -> String {
    if value == 0.0 {
        return String::from("0");
    }
    alloc::format!("{value}")
}
