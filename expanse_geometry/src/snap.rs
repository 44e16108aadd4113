// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid snapping.
//!
//! `core` has no `f64::floor`/`f64::round` without `std`, so these helpers
//! round through an integer cast the same way the spatial grid maps
//! coordinates to cells.

use kurbo::Point;

/// Rounds toward negative infinity.
///
/// Values beyond the `i64` range saturate.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Truncation is the rounding step; out-of-range values saturate."
)]
#[inline]
#[must_use]
pub fn floor(value: f64) -> f64 {
    let t = value as i64 as f64;
    if t > value { t - 1.0 } else { t }
}

/// Rounds to the nearest integer, halfway cases toward positive infinity.
#[inline]
#[must_use]
pub fn round(value: f64) -> f64 {
    floor(value + 0.5)
}

/// Snaps `value` to the nearest multiple of `step`.
///
/// A non-positive `step` disables snapping.
#[inline]
#[must_use]
pub fn snap(value: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return value;
    }
    round(value / step) * step
}

/// Snaps both coordinates of `point` to multiples of `step`.
#[inline]
#[must_use]
pub fn snap_point(point: Point, step: f64) -> Point {
    Point::new(snap(point.x, step), snap(point.y, step))
}
