// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversion and zoom properties over arbitrary camera states.

use expanse_viewport::{ChangeOrigin, PanOptions, Viewport, ZoomLimits, ZoomMin, ZoomOptions};
use kurbo::{Point, Size, Vec2};
use proptest::prelude::*;

fn close(a: Point, b: Point, scale: f64) -> bool {
    (a - b).hypot() <= 1e-9 * scale.max(1.0)
}

fn camera(
    center: (f64, f64),
    zoom: f64,
    offset: (f64, f64),
    size: (f64, f64),
) -> Viewport {
    let mut vp = Viewport::new(Size::new(size.0, size.1));
    vp.set_zoom_limits(ZoomLimits {
        min: ZoomMin::Value(0.05),
        max: 20.0,
    });
    vp.set_element_offset(Vec2::new(offset.0, offset.1));
    vp.move_to(Point::new(center.0, center.1), zoom, PanOptions::default());
    vp
}

proptest! {
    #[test]
    fn conversions_round_trip(
        center in (-1e4..1e4_f64, -1e4..1e4_f64),
        zoom in 0.05..20.0_f64,
        offset in (-500.0..500.0_f64, -500.0..500.0_f64),
        size in (1.0..4000.0_f64, 1.0..4000.0_f64),
        p in (-1e4..1e4_f64, -1e4..1e4_f64),
    ) {
        let vp = camera(center, zoom, offset, size);
        let p = Point::new(p.0, p.1);
        let scale = p.x.abs().max(p.y.abs()).max(center.0.abs()).max(center.1.abs()) * zoom.max(1.0 / zoom);
        prop_assert!(close(vp.viewport_to_world(vp.world_to_viewport(p)), p, scale));
        prop_assert!(close(vp.world_to_viewport(vp.viewport_to_world(p)), p, scale));
    }

    #[test]
    fn zoom_toward_centroid_is_fixed_point(
        center in (-1e3..1e3_f64, -1e3..1e3_f64),
        zoom in 0.05..20.0_f64,
        target in 0.05..20.0_f64,
        centroid in (0.0..1000.0_f64, 0.0..1000.0_f64),
    ) {
        let mut vp = camera(center, zoom, (0.0, 0.0), (1000.0, 1000.0));
        let c = Point::new(centroid.0, centroid.1);
        let before = vp.viewport_to_world(c);
        vp.zoom(target, ZoomOptions::new(ChangeOrigin::Gesture).toward(c));
        let after = vp.viewport_to_world(c);
        let scale = before.x.abs().max(before.y.abs()) + 1000.0 / zoom.min(target);
        prop_assert!(close(after, before, scale));
    }
}

#[test]
fn element_center_is_camera_center() {
    let vp = Viewport::new(Size::new(800.0, 600.0));
    assert_eq!(vp.viewport_to_world(Point::new(400.0, 300.0)), Point::new(0.0, 0.0));
}
