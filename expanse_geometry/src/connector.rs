// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Connector curves between entities.

use alloc::vec::Vec;

use kurbo::{CubicBez, ParamCurve, ParamCurveExtrema, Point, Rect, Vec2};

/// Minimum distance between a connector endpoint and its control point.
const MIN_CONTROL_OFFSET: f64 = 24.0;

/// The side of an entity a connector leaves from or arrives at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ConnectorSide {
    /// Leaves upward.
    Top,
    /// Leaves to the right.
    #[default]
    Right,
    /// Leaves downward.
    Bottom,
    /// Leaves to the left.
    Left,
}

impl ConnectorSide {
    /// Unit direction pointing away from the entity.
    #[must_use]
    pub fn direction(self) -> Vec2 {
        match self {
            Self::Top => Vec2::new(0.0, -1.0),
            Self::Right => Vec2::new(1.0, 0.0),
            Self::Bottom => Vec2::new(0.0, 1.0),
            Self::Left => Vec2::new(-1.0, 0.0),
        }
    }

    /// Midpoint of this side of `rect`.
    #[must_use]
    pub fn anchor(self, rect: Rect) -> Point {
        let c = rect.center();
        match self {
            Self::Top => Point::new(c.x, rect.y0),
            Self::Right => Point::new(rect.x1, c.y),
            Self::Bottom => Point::new(c.x, rect.y1),
            Self::Left => Point::new(rect.x0, c.y),
        }
    }
}

/// Builds a cubic connector from `from` to `to`.
///
/// Control points extend away from each endpoint along its side's direction
/// by half the larger axis distance between the endpoints.
#[must_use]
pub fn connector_curve(
    from: Point,
    from_side: ConnectorSide,
    to: Point,
    to_side: ConnectorSide,
) -> CubicBez {
    let d = to - from;
    let offset = (d.x.abs().max(d.y.abs()) * 0.5).max(MIN_CONTROL_OFFSET);
    CubicBez::new(
        from,
        from + from_side.direction() * offset,
        to + to_side.direction() * offset,
        to,
    )
}

/// Samples `segments + 1` points along `curve` at evenly spaced parameters.
///
/// A `segments` of zero yields just the start point.
#[must_use]
pub fn sample_curve(curve: &CubicBez, segments: usize) -> Vec<Point> {
    if segments == 0 {
        return alloc::vec![curve.p0];
    }
    #[allow(
        clippy::cast_precision_loss,
        reason = "Segment counts are small; precision loss is irrelevant."
    )]
    let n = segments as f64;
    (0..=segments)
        .map(|i| {
            #[allow(
                clippy::cast_precision_loss,
                reason = "Segment counts are small; precision loss is irrelevant."
            )]
            let t = i as f64 / n;
            curve.eval(t)
        })
        .collect()
}

/// Tight bounding box of a connector curve.
#[must_use]
pub fn curve_bounds(curve: &CubicBez) -> Rect {
    curve.bounding_box()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_starts_and_ends_at_anchors() {
        let from = ConnectorSide::Right.anchor(Rect::new(0.0, 0.0, 100.0, 50.0));
        let to = ConnectorSide::Left.anchor(Rect::new(300.0, 100.0, 400.0, 150.0));
        assert_eq!(from, Point::new(100.0, 25.0));
        assert_eq!(to, Point::new(300.0, 125.0));

        let curve = connector_curve(from, ConnectorSide::Right, to, ConnectorSide::Left);
        let samples = sample_curve(&curve, 8);
        assert_eq!(samples.len(), 9);
        assert_eq!(samples[0], from);
        assert!((samples[8] - to).hypot() < 1e-9);
    }

    #[test]
    fn bounds_contain_samples() {
        let curve = connector_curve(
            Point::new(0.0, 0.0),
            ConnectorSide::Bottom,
            Point::new(10.0, 0.0),
            ConnectorSide::Bottom,
        );
        let bounds = curve_bounds(&curve);
        for p in sample_curve(&curve, 16) {
            assert!(bounds.inflate(1e-9, 1e-9).contains(p));
        }
        // Both control points sit below the endpoints, so the curve dips.
        assert!(bounds.y1 > 0.0);
    }

    #[test]
    fn zero_segments_is_start_point() {
        let curve = connector_curve(
            Point::new(1.0, 2.0),
            ConnectorSide::Top,
            Point::new(3.0, 4.0),
            ConnectorSide::Top,
        );
        assert_eq!(sample_curve(&curve, 0), alloc::vec![Point::new(1.0, 2.0)]);
    }
}
