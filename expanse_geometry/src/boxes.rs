// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Box arithmetic over `kurbo::Rect`.

use kurbo::{Point, Rect, Size};

/// Which extents of a box collapse to zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Degenerate {
    /// Zero width, positive height (a vertical segment).
    ZeroWidth,
    /// Zero height, positive width (a horizontal segment).
    ZeroHeight,
    /// Zero width and zero height (a point).
    Both,
}

/// Builds a box from a top-left origin and a size.
///
/// Negative sizes are normalized so that the result always has `x0 <= x1`
/// and `y0 <= y1`.
#[inline]
#[must_use]
pub fn rect_from_origin_size(origin: Point, size: Size) -> Rect {
    Rect::from_origin_size(origin, size).abs()
}

/// Returns `true` if the box has zero width and zero height.
#[inline]
#[must_use]
pub fn is_point_rect(rect: Rect) -> bool {
    rect.width() == 0.0 && rect.height() == 0.0
}

/// Classifies the zero extents of a box, or `None` if both extents are positive.
#[must_use]
pub fn degenerate_axis(rect: Rect) -> Option<Degenerate> {
    match (rect.width() == 0.0, rect.height() == 0.0) {
        (true, true) => Some(Degenerate::Both),
        (true, false) => Some(Degenerate::ZeroWidth),
        (false, true) => Some(Degenerate::ZeroHeight),
        (false, false) => None,
    }
}

/// Returns `true` if `point` lies within `rect`, edges included.
///
/// Unlike [`Rect::contains`], the maximum edges count as inside, so a box
/// always contains its own corners.
#[inline]
#[must_use]
pub fn contains_point_inclusive(rect: Rect, point: Point) -> bool {
    let rect = rect.abs();
    rect.x0 <= point.x && point.x <= rect.x1 && rect.y0 <= point.y && point.y <= rect.y1
}

/// Length of the overlap between the ranges `[a0, a1]` and `[b0, b1]`.
///
/// Returns zero for disjoint or touching ranges.
#[inline]
#[must_use]
pub fn overlap_1d(a0: f64, a1: f64, b0: f64, b1: f64) -> f64 {
    (a1.min(b1) - a0.max(b0)).max(0.0)
}

/// Area shared by two boxes (zero when they only touch or are disjoint).
#[inline]
#[must_use]
pub fn overlap_area(a: Rect, b: Rect) -> f64 {
    let (a, b) = (a.abs(), b.abs());
    overlap_1d(a.x0, a.x1, b.x0, b.x1) * overlap_1d(a.y0, a.y1, b.y0, b.y1)
}

/// Smallest box enclosing every box in `rects`, or `None` if there are none.
#[must_use]
pub fn union_all(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
    let mut it = rects.into_iter();
    let first = it.next()?.abs();
    Some(it.fold(first, |acc, r| acc.union(r.abs())))
}

/// Clamps `value` into `[min, max]`.
///
/// Inverted ranges (`min > max`) collapse to their midpoint instead of
/// panicking like [`f64::clamp`].
#[inline]
#[must_use]
pub fn clamp_range(value: f64, min: f64, max: f64) -> f64 {
    if min > max {
        return 0.5 * (min + max);
    }
    value.clamp(min, max)
}

/// Clamps a point into a box, edges included.
#[inline]
#[must_use]
pub fn clamp_point(point: Point, rect: Rect) -> Point {
    let rect = rect.abs();
    Point::new(
        clamp_range(point.x, rect.x0, rect.x1),
        clamp_range(point.y, rect.y0, rect.y1),
    )
}
