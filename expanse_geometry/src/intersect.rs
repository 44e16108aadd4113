// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Exact intersection test used to verify spatial-index candidates.

use kurbo::Rect;

use crate::boxes::{Degenerate, contains_point_inclusive, degenerate_axis, overlap_1d, overlap_area};

/// Exact geometric test between an entity box and a query box.
///
/// `threshold` is the required overlap ratio in `[0, 1)`:
///
/// - A point query (zero width and height) passes iff the point lies on the
///   entity box, edges included. The threshold is ignored.
/// - A point entity passes iff it lies on the query box, edges included.
/// - When exactly one of the two boxes is degenerate along one axis (a
///   zero-width or zero-height hit target such as a connector line), the
///   other box must bracket it along that axis. The overlap along the
///   remaining axis is divided by the smaller of the two extents on that
///   axis, and the test passes if the ratio exceeds `threshold`.
/// - Otherwise the overlap area is divided by the smaller of the two areas,
///   and the test passes if the ratio exceeds `threshold`.
///
/// With `threshold == 0.0` any positive overlap passes; as the threshold
/// approaches one, the smaller box must be almost fully contained in the
/// larger one.
#[must_use]
pub fn intersects(entity: Rect, query: Rect, threshold: f64) -> bool {
    let entity = entity.abs();
    let query = query.abs();

    match (degenerate_axis(query), degenerate_axis(entity)) {
        (Some(Degenerate::Both), _) => contains_point_inclusive(entity, query.origin()),
        (_, Some(Degenerate::Both)) => contains_point_inclusive(query, entity.origin()),
        (_, Some(line)) => bracketed_ratio(entity, line, query).is_some_and(|r| r > threshold),
        (Some(line), None) => bracketed_ratio(query, line, entity).is_some_and(|r| r > threshold),
        (None, None) => {
            let denom = entity.area().min(query.area());
            overlap_area(entity, query) / denom > threshold
        }
    }
}

/// Overlap ratio of a one-axis-degenerate `line` against `other`.
///
/// Returns `None` when `other` does not bracket the line along its
/// degenerate axis. Crossing lines (both degenerate, on opposite axes)
/// report a full overlap when they touch.
fn bracketed_ratio(line: Rect, kind: Degenerate, other: Rect) -> Option<f64> {
    let (pos, a0, a1, b_lo, b_hi, b0, b1) = match kind {
        Degenerate::ZeroWidth => (line.x0, line.y0, line.y1, other.x0, other.x1, other.y0, other.y1),
        Degenerate::ZeroHeight => (line.y0, line.x0, line.x1, other.y0, other.y1, other.x0, other.x1),
        Degenerate::Both => return None,
    };
    if pos < b_lo || pos > b_hi {
        return None;
    }
    let denom = (a1 - a0).min(b1 - b0);
    if denom <= 0.0 {
        // `other` is itself a segment across the line.
        return (a0 <= b1 && b0 <= a1).then_some(1.0);
    }
    Some(overlap_1d(a0, a1, b0, b1) / denom)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTITY: Rect = Rect::new(0.0, 0.0, 100.0, 100.0);

    #[test]
    fn point_query_includes_edges() {
        assert!(intersects(ENTITY, Rect::new(0.0, 0.0, 0.0, 0.0), 0.0));
        assert!(intersects(ENTITY, Rect::new(100.0, 100.0, 100.0, 100.0), 0.0));
        assert!(intersects(ENTITY, Rect::new(50.0, 50.0, 50.0, 50.0), 0.99));
        assert!(!intersects(ENTITY, Rect::new(100.5, 50.0, 100.5, 50.0), 0.0));
    }

    #[test]
    fn threshold_zero_accepts_any_positive_overlap() {
        assert!(intersects(ENTITY, Rect::new(99.0, 99.0, 150.0, 150.0), 0.0));
        // Touching edges share no area.
        assert!(!intersects(ENTITY, Rect::new(100.0, 0.0, 150.0, 100.0), 0.0));
    }

    #[test]
    fn ratio_uses_smaller_area() {
        // Query fully inside the entity: ratio is 1 regardless of size difference.
        assert!(intersects(ENTITY, Rect::new(10.0, 10.0, 20.0, 20.0), 0.99));
        // Entity half covered by a larger query.
        let query = Rect::new(50.0, -100.0, 300.0, 300.0);
        assert!(intersects(ENTITY, query, 0.49));
        assert!(!intersects(ENTITY, query, 0.5));
    }

    #[test]
    fn raising_threshold_shrinks_results() {
        let query = Rect::new(0.0, 0.0, 60.0, 60.0);
        let entities = [
            Rect::new(0.0, 0.0, 50.0, 50.0),
            Rect::new(40.0, 40.0, 90.0, 90.0),
            Rect::new(55.0, 0.0, 105.0, 50.0),
        ];
        let count = |t: f64| entities.iter().filter(|e| intersects(**e, query, t)).count();
        assert_eq!(count(0.0), 3);
        assert_eq!(count(0.5), 1);
        assert!(count(0.95) <= count(0.5));
    }

    #[test]
    fn zero_width_target_requires_bracketing() {
        let line = Rect::new(50.0, 0.0, 50.0, 100.0);
        assert!(intersects(line, Rect::new(40.0, 40.0, 60.0, 60.0), 0.0));
        assert!(!intersects(line, Rect::new(51.0, 0.0, 60.0, 100.0), 0.0));
        // Query covers 20 of the line's 100 units, but it is the smaller extent.
        assert!(intersects(line, Rect::new(40.0, 40.0, 60.0, 60.0), 0.9));
        // Query covers the lower half of the line with a taller box.
        let tall = Rect::new(40.0, 50.0, 60.0, 250.0);
        assert!(intersects(line, tall, 0.49));
        assert!(!intersects(line, tall, 0.5));
    }

    #[test]
    fn zero_height_target_mirrors_zero_width() {
        let line = Rect::new(0.0, 10.0, 100.0, 10.0);
        assert!(intersects(line, Rect::new(90.0, 0.0, 120.0, 20.0), 0.0));
        assert!(!intersects(line, Rect::new(90.0, 11.0, 120.0, 20.0), 0.0));
    }

    #[test]
    fn crossing_lines_touch() {
        let vertical = Rect::new(50.0, 0.0, 50.0, 100.0);
        let horizontal = Rect::new(0.0, 50.0, 100.0, 50.0);
        assert!(intersects(vertical, horizontal, 0.0));
    }

    #[test]
    fn point_entity_inside_query() {
        let point = Rect::new(5.0, 5.0, 5.0, 5.0);
        assert!(intersects(point, Rect::new(0.0, 0.0, 10.0, 10.0), 0.5));
        assert!(!intersects(point, Rect::new(6.0, 0.0, 10.0, 10.0), 0.0));
    }
}
