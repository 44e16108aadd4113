// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture routing through a whole canvas.

use expanse_canvas::{Canvas, CanvasConfig, Owner, Target};
use expanse_gesture::{ClaimType, GestureFrame, Modifiers};
use expanse_registry::{EntityData, EntityInit};
use expanse_viewport::ViewportEvent;
use kurbo::{Point, Rect, Size, Vec2};

type TestCanvas = Canvas<u32, ()>;

const EPS: f64 = 1e-9;

fn canvas() -> TestCanvas {
    Canvas::new(Size::new(800.0, 600.0), CanvasConfig::default())
}

fn add(canvas: &mut TestCanvas, id: u32, rect: Rect, data: EntityData<()>) {
    canvas
        .registry_mut()
        .register(id, EntityInit::new(rect.origin(), rect.size()), data)
        .unwrap();
}

/// Screen point showing world `p` at the default camera.
fn screen(p: Point) -> Point {
    p + Vec2::new(400.0, 300.0)
}

#[test]
fn dragging_out_of_a_container_detaches() {
    let mut c = canvas();
    add(&mut c, 1, Rect::new(0.0, 0.0, 100.0, 100.0), EntityData::container());
    add(&mut c, 2, Rect::new(10.0, 10.0, 30.0, 30.0), EntityData::object());
    c.registry_mut().set_parent(2, Some(1)).unwrap();

    let start = GestureFrame::start(screen(Point::new(20.0, 20.0)));
    let claim = c.handle_frame(&start, Target::Entity(2)).unwrap();
    assert_eq!(claim.owner, Owner::Entity(2));
    assert_eq!(claim.claim_type, ClaimType::Object);
    assert_eq!(c.selection().items(), &[2]);

    let mid = start.next(screen(Point::new(520.0, 20.0)));
    c.handle_frame(&mid, Target::Entity(2));
    // Offsets only: the committed position is untouched mid-drag.
    assert_eq!(c.registry().position(2), Some(Point::new(10.0, 10.0)));
    assert_eq!(c.registry().gesture_offset(2), Some(Vec2::new(500.0, 0.0)));
    assert_eq!(c.drop_target(), None);

    c.handle_frame(&mid.end(mid.position), Target::Entity(2));
    assert_eq!(c.registry().parent(2), None);
    assert_eq!(c.registry().world_origin(2), Some(Point::new(510.0, 10.0)));
    assert_eq!(c.registry().gesture_offset(2), Some(Vec2::ZERO));
    assert!(!c.registry().has_pending_index(2));
}

#[test]
fn second_finger_abandons_drag_and_hands_over_to_camera() {
    let mut c = canvas();
    add(&mut c, 1, Rect::new(0.0, 0.0, 40.0, 40.0), EntityData::object());

    let start = GestureFrame::start(screen(Point::new(10.0, 10.0))).with_touches(1);
    c.handle_frame(&start, Target::Entity(1));
    let moved = start.next(screen(Point::new(60.0, 10.0)));
    c.handle_frame(&moved, Target::Entity(1));
    assert_eq!(c.registry().gesture_offset(1), Some(Vec2::new(50.0, 0.0)));

    let pinch = moved.next(moved.position).with_touches(2).with_scale(2.0);
    c.handle_frame(&pinch, Target::Entity(1));
    assert_eq!(c.registry().gesture_offset(1), Some(Vec2::ZERO));
    assert!(c.dragged().is_empty());

    let next = pinch.next(pinch.position).with_scale(2.0);
    let claim = c.handle_frame(&next, Target::Entity(1)).unwrap();
    assert_eq!(claim.owner, Owner::Canvas);
    assert_eq!(claim.claim_type, ClaimType::Surface);
    assert!((c.viewport().zoom_level() - 2.0).abs() < EPS);
    assert_eq!(c.registry().position(1), Some(Point::ZERO));
}

#[test]
fn shift_drag_on_background_box_selects() {
    let mut c = canvas();
    add(&mut c, 1, Rect::new(0.0, 0.0, 20.0, 20.0), EntityData::object());
    add(&mut c, 2, Rect::new(50.0, 50.0, 70.0, 70.0), EntityData::object());
    add(&mut c, 3, Rect::new(300.0, 300.0, 320.0, 320.0), EntityData::object());
    add(&mut c, 9, Rect::new(-1000.0, -1000.0, 1000.0, 1000.0), EntityData::surface());

    let start = GestureFrame::start(screen(Point::new(-10.0, -10.0))).with_modifiers(Modifiers::SHIFT);
    let claim = c.handle_frame(&start, Target::Entity(9)).unwrap();
    assert_eq!(claim.claim_type, ClaimType::Tool);

    let mid = start.next(screen(Point::new(60.0, 60.0)));
    c.handle_frame(&mid, Target::Entity(9));
    assert_eq!(c.marquee(), Some(Rect::new(-10.0, -10.0, 60.0, 60.0)));
    let mut selected = c.selection().items().to_vec();
    selected.sort_unstable();
    assert_eq!(selected, [1, 2]);

    c.handle_frame(&mid.end(mid.position), Target::Entity(9));
    assert_eq!(c.marquee(), None);
    assert_eq!(c.selection().len(), 2);
}

#[test]
fn background_drag_pans_and_settles() {
    let mut c = canvas();
    let start = GestureFrame::start(Point::new(400.0, 300.0));
    c.handle_frame(&start, Target::Surface);
    let end = start.end(Point::new(500.0, 250.0));
    c.handle_frame(&end, Target::Surface);
    assert_eq!(c.viewport().center(), Point::new(-100.0, 50.0));

    let events = c.viewport_mut().drain_events();
    assert!(matches!(events.last(), Some(ViewportEvent::Settled(_))));
}

#[test]
fn wheel_zoom_keeps_the_pointer_anchored() {
    let mut c = canvas();
    let pointer = Point::new(600.0, 100.0);
    let before = c.viewport().viewport_to_world(pointer);
    c.wheel_zoom(pointer, 1.5);
    let after = c.viewport().viewport_to_world(pointer);
    assert!((before - after).hypot() < EPS);
    assert!((c.viewport().zoom_level() - 1.5).abs() < EPS);
}

#[test]
fn fit_all_frames_the_content() {
    let mut c = canvas();
    assert!(!c.fit_all(0.0));
    add(&mut c, 1, Rect::new(0.0, 0.0, 100.0, 100.0), EntityData::object());
    add(&mut c, 2, Rect::new(300.0, 100.0, 400.0, 200.0), EntityData::object());
    assert!(c.fit_all(0.0));
    assert_eq!(c.viewport().center(), Point::new(200.0, 100.0));
    // 400 x 200 world units in 800 x 600 pixels.
    assert!((c.viewport().zoom_level() - 2.0).abs() < EPS);
}

#[test]
fn claim_is_cleared_after_every_gesture() {
    let mut c = canvas();
    add(&mut c, 1, Rect::new(0.0, 0.0, 20.0, 20.0), EntityData::object());
    let start = GestureFrame::start(screen(Point::new(5.0, 5.0)));
    c.handle_frame(&start, Target::Entity(1));
    assert!(c.arbiter().has_claim(ClaimType::Object, Owner::Entity(1)));
    c.handle_frame(&start.end(start.position), Target::Entity(1));
    assert_eq!(c.arbiter().claimed_by(), None);

    // A secondary-button press on the entity falls through to the camera.
    let start = GestureFrame::start(screen(Point::new(5.0, 5.0)))
        .with_buttons(expanse_gesture::PointerButtons::SECONDARY);
    let claim = c.handle_frame(&start, Target::Entity(1)).unwrap();
    assert_eq!(claim.owner, Owner::Canvas);
    c.handle_frame(&start.end(start.position), Target::Entity(1));
    assert_eq!(c.arbiter().claimed_by(), None);
}

#[test]
fn unfinished_gesture_does_not_steal_the_next_press() {
    let mut c = canvas();
    add(&mut c, 1, Rect::new(0.0, 0.0, 40.0, 40.0), EntityData::object());

    // The pointer-up of this drag is never delivered.
    let start = GestureFrame::start(screen(Point::new(10.0, 10.0)));
    c.handle_frame(&start, Target::Entity(1));
    c.handle_frame(&start.next(screen(Point::new(30.0, 10.0))), Target::Entity(1));
    assert_eq!(c.registry().gesture_offset(1), Some(Vec2::new(20.0, 0.0)));

    let again = GestureFrame::start(screen(Point::new(10.0, 10.0)));
    let claim = c.handle_frame(&again, Target::Entity(1)).unwrap();
    assert_eq!(claim.owner, Owner::Entity(1));
    assert_eq!(claim.claim_type, ClaimType::Object);
    // The interrupted drag's offset was discarded, not committed.
    assert_eq!(c.registry().gesture_offset(1), Some(Vec2::ZERO));
    assert_eq!(c.registry().position(1), Some(Point::ZERO));
    assert_eq!(c.dragged(), &[1]);
}

#[test]
fn tapping_an_object_never_reparents_it() {
    let mut c = canvas();
    add(&mut c, 1, Rect::new(0.0, 0.0, 100.0, 100.0), EntityData::container());
    add(&mut c, 2, Rect::new(10.0, 10.0, 30.0, 30.0), EntityData::object());
    assert_eq!(c.drop_target_for(&[2]), Some(1));

    let start = GestureFrame::start(screen(Point::new(20.0, 20.0)));
    c.handle_frame(&start, Target::Entity(2));
    c.handle_frame(&start.end(start.position), Target::Entity(2));
    assert_eq!(c.registry().parent(2), None);
    assert_eq!(c.registry().world_origin(2), Some(Point::new(10.0, 10.0)));
}
