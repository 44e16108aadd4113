// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::fmt::{self, Debug};
use core::hash::Hash;
use core::time::Duration;

use expanse_geometry::union_all;
use expanse_gesture::{
    Candidate, Claim, ClaimMode, ClaimType, DragTracker, GestureArbiter, GestureFrame,
};
use expanse_registry::{EntityData, EntityKind, EntityRegistry};
use expanse_viewport::{ChangeOrigin, PanOptions, Viewport, ZoomOptions};
use kurbo::{Point, Rect, Size, Vec2};

use crate::config::CanvasConfig;
use crate::selection::Selection;

/// What a gesture started on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target<K> {
    /// A registered entity.
    Entity(K),
    /// Empty canvas background.
    Surface,
}

/// Owner of a gesture claim on a [`Canvas`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Owner<K> {
    /// An entity being dragged.
    Entity(K),
    /// The canvas itself: camera gestures and box-select.
    Canvas,
}

#[derive(Debug)]
struct DragSession<K> {
    tracker: DragTracker,
    ids: Vec<K>,
    drop_target: Option<K>,
}

#[derive(Clone, Copy, Debug)]
struct Marquee {
    start: Point,
    rect: Rect,
}

/// An infinite canvas: entities, a camera, a selection and gesture routing.
///
/// Feed gesture frames to [`handle_frame`](Self::handle_frame). The first
/// frame of a gesture decides who owns it:
///
/// - An entity under a primary single-pointer press claims it and drags the
///   selection (or just itself when unselected). On release the dragged
///   entities are committed, reparented into the container they were
///   dropped on (or detached when dropped elsewhere), and indexed.
/// - A shift press on the background claims it for box-select.
/// - Anything else on the background pans the camera; two-finger frames
///   also pinch-zoom around their centroid.
///
/// A drag that turns multi-touch is abandoned: offsets are discarded and
/// the camera takes the rest of the gesture over.
pub struct Canvas<K, M> {
    config: CanvasConfig,
    registry: EntityRegistry<K, M>,
    viewport: Viewport,
    arbiter: GestureArbiter<Owner<K>>,
    selection: Selection<K>,
    drag: Option<DragSession<K>>,
    marquee: Option<Marquee>,
}

impl<K: Debug, M> Debug for Canvas<K, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("viewport", &self.viewport)
            .field("arbiter", &self.arbiter)
            .field("selection", &self.selection)
            .field("drag", &self.drag)
            .field("marquee", &self.marquee)
            .finish()
    }
}

impl<K: Copy + Eq + Hash + Debug, M> Canvas<K, M> {
    /// Creates an empty canvas shown in an element of `element_size` pixels.
    #[must_use]
    pub fn new(element_size: Size, config: CanvasConfig) -> Self {
        Self {
            registry: EntityRegistry::new(config.registry),
            viewport: Viewport::with_config(element_size, config.viewport),
            arbiter: GestureArbiter::new(),
            selection: Selection::new(),
            drag: None,
            marquee: None,
            config,
        }
    }

    /// Configuration in effect.
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// The entity registry.
    pub fn registry(&self) -> &EntityRegistry<K, M> {
        &self.registry
    }

    /// Mutable access to the entity registry, for registration and direct edits.
    pub fn registry_mut(&mut self) -> &mut EntityRegistry<K, M> {
        &mut self.registry
    }

    /// The camera.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Mutable access to the camera.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// The gesture arbiter.
    pub fn arbiter(&self) -> &GestureArbiter<Owner<K>> {
        &self.arbiter
    }

    /// The selection.
    pub fn selection(&self) -> &Selection<K> {
        &self.selection
    }

    /// Mutable access to the selection.
    pub fn selection_mut(&mut self) -> &mut Selection<K> {
        &mut self.selection
    }

    /// World-space box-select rectangle while a box-select is in progress.
    pub fn marquee(&self) -> Option<Rect> {
        self.marquee.map(|m| m.rect)
    }

    /// Entities being dragged.
    pub fn dragged(&self) -> &[K] {
        self.drag.as_ref().map_or(&[], |d| &d.ids)
    }

    /// Container the current drag would drop into.
    pub fn drop_target(&self) -> Option<K> {
        self.drag.as_ref().and_then(|d| d.drop_target)
    }

    /// Advances the registry clock to `now`.
    pub fn advance_to(&mut self, now: Duration) {
        self.registry.advance_to(now);
    }

    /// Advances the registry clock by `dt`.
    pub fn advance_by(&mut self, dt: Duration) {
        self.registry.advance_by(dt);
    }

    /// Routes one gesture frame.
    ///
    /// `target` is only consulted on the first frame. Returns the claim in
    /// effect while handling this frame.
    pub fn handle_frame(&mut self, frame: &GestureFrame, target: Target<K>) -> Option<Claim<Owner<K>>> {
        if let Some(released) = self.arbiter.begin_frame(frame) {
            self.released(released, frame);
        }
        if frame.first {
            self.start_gesture(frame, target);
        }

        match self.arbiter.claim_type() {
            Some(ClaimType::Object | ClaimType::Container) => self.drag_frame(frame),
            Some(ClaimType::Tool) => self.marquee_frame(frame),
            Some(ClaimType::Surface) => self.camera_frame(frame),
            None => {}
        }

        let claim = self.arbiter.current();
        if frame.last {
            self.arbiter.end_gesture();
            self.drag = None;
            self.marquee = None;
        }
        claim
    }

    /// Zooms by `factor` around `screen_point`, as a mouse wheel step.
    pub fn wheel_zoom(&mut self, screen_point: Point, factor: f64) {
        self.viewport.relative_zoom(
            factor,
            ZoomOptions::new(ChangeOrigin::Wheel)
                .toward(screen_point)
                .complete(),
        );
    }

    /// Frames every entity on screen with `margin` pixels to spare.
    ///
    /// Returns `false` (leaving the camera alone) when the canvas is empty.
    pub fn fit_all(&mut self, margin: f64) -> bool {
        let Some(bounds) = self.registry.get_current_container() else {
            return false;
        };
        self.viewport
            .fit_on_screen(bounds, margin, PanOptions::new(ChangeOrigin::Program).complete());
        true
    }

    /// The container that entities `ids` would drop into at their live bounds.
    ///
    /// Candidates are containers overlapping the union of the dragged bounds
    /// by more than the drop threshold, excluding the dragged entities and
    /// their descendants. The deepest candidate wins, then the smallest.
    pub fn drop_target_for(&self, ids: &[K]) -> Option<K> {
        find_drop_target(&self.registry, ids, self.config.drop_threshold)
    }

    fn start_gesture(&mut self, frame: &GestureFrame, target: Target<K>) {
        let registry = &self.registry;
        self.selection.retain(|id| registry.entry(id).is_some());

        let entity = match target {
            Target::Entity(id) => self
                .registry
                .entry(id)
                .map(|e| (id, e.kind()))
                .filter(|(_, kind)| *kind != EntityKind::Surface),
            Target::Surface => None,
        };
        let draggable = |f: &GestureFrame| f.is_primary() && !f.is_multi_touch();
        let box_select = |f: &GestureFrame| f.is_primary() && f.shift() && !f.is_multi_touch();

        let mut candidates = Vec::with_capacity(3);
        if let Some((id, kind)) = entity {
            let claim_type = if kind == EntityKind::Container {
                ClaimType::Container
            } else {
                ClaimType::Object
            };
            candidates.push(Candidate::new(Owner::Entity(id), claim_type).with_filter(&draggable));
        }
        candidates.push(Candidate::new(Owner::Canvas, ClaimType::Tool).with_filter(&box_select));
        candidates.push(Candidate::new(Owner::Canvas, ClaimType::Surface));

        match self.arbiter.arbitrate(frame, candidates) {
            Some(Claim {
                owner: Owner::Entity(id),
                ..
            }) => self.begin_drag(id, frame),
            Some(Claim {
                claim_type: ClaimType::Tool,
                ..
            }) => {
                let start = self.viewport.viewport_to_world(frame.position);
                self.marquee = Some(Marquee {
                    start,
                    rect: Rect::from_points(start, start),
                });
            }
            _ => {}
        }
    }

    fn released(&mut self, released: Claim<Owner<K>>, frame: &GestureFrame) {
        self.marquee = None;
        if !matches!(released.claim_type, ClaimType::Object | ClaimType::Container) {
            return;
        }
        self.cancel_drag();
        // On a first frame the claim is stale and the new gesture arbitrates afresh.
        if !frame.first {
            self.arbiter
                .claim_with(ClaimType::Surface, Owner::Canvas, ClaimMode::Override);
        }
    }

    fn begin_drag(&mut self, id: K, frame: &GestureFrame) {
        if frame.shift() {
            self.selection.add(id);
        } else if !self.selection.contains(id) {
            self.selection.select_only(id);
        }
        // Dragging a parent already moves its children.
        let selected = self.selection.items();
        let ids = selected
            .iter()
            .copied()
            .filter(|&k| {
                !selected
                    .iter()
                    .any(|&other| other != k && self.registry.is_descendant_of(k, other))
            })
            .collect();
        let mut tracker = DragTracker::default();
        tracker.start(frame.position);
        self.drag = Some(DragSession {
            tracker,
            ids,
            drop_target: None,
        });
    }

    fn drag_frame(&mut self, frame: &GestureFrame) {
        if frame.is_multi_touch() {
            if let Some(owner) = self.arbiter.claimed_by() {
                self.arbiter.abandon(owner);
            }
            self.cancel_drag();
            return;
        }
        let Some(session) = self.drag.as_mut() else {
            return;
        };
        session.tracker.update(frame.position);
        let screen = session.tracker.total_offset().unwrap_or(Vec2::ZERO);
        let world = self.viewport.viewport_delta_to_world(screen);
        // Entities removed mid-drag fall out of the session.
        session
            .ids
            .retain(|&id| self.registry.set_gesture_offset(id, world).is_ok());
        session.drop_target =
            find_drop_target(&self.registry, &session.ids, self.config.drop_threshold);

        if !frame.last {
            return;
        }
        let target = session.drop_target;
        // A tap commits nothing and never changes the hierarchy.
        let moved = screen != Vec2::ZERO;
        for &id in &session.ids {
            if self.registry.apply_gesture_offset(id).is_err() {
                continue;
            }
            if moved
                && self.registry.parent(id) != target
                && let Err(_err) = self.registry.set_parent(id, target)
            {
                #[cfg(feature = "tracing")]
                tracing::debug!(id = ?id, error = %_err, "drop reparent rejected");
            }
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(ids = ?session.ids, target = ?target, "drag committed");
        self.registry.settle_all();
    }

    fn cancel_drag(&mut self) {
        if let Some(session) = self.drag.take() {
            for id in session.ids {
                // Already-removed entities have nothing to discard.
                let _ = self.registry.discard_gesture_offset(id);
            }
            #[cfg(feature = "tracing")]
            tracing::debug!("drag abandoned");
        }
    }

    fn marquee_frame(&mut self, frame: &GestureFrame) {
        let Some(marquee) = self.marquee.as_mut() else {
            return;
        };
        let current = self.viewport.viewport_to_world(frame.position);
        marquee.rect = Rect::from_points(marquee.start, current);
        let not_surface = |_: K, data: &EntityData<M>| data.kind != EntityKind::Surface;
        let hits = self.registry.get_intersections(
            marquee.rect,
            self.config.select_threshold,
            Some(&not_surface),
        );
        self.selection.replace_with(hits);
    }

    fn camera_frame(&mut self, frame: &GestureFrame) {
        if frame.is_multi_touch() && frame.scale.is_finite() && frame.scale > 0.0 {
            self.viewport.relative_zoom(
                frame.scale,
                ZoomOptions::new(ChangeOrigin::Gesture).toward(frame.position),
            );
        }
        let mut options = PanOptions::new(ChangeOrigin::Gesture);
        if frame.last {
            options = options.complete();
        }
        self.viewport.pan_by_viewport(frame.delta, options);
    }
}

fn find_drop_target<K: Copy + Eq + Hash + Debug, M>(
    registry: &EntityRegistry<K, M>,
    ids: &[K],
    threshold: f64,
) -> Option<K> {
    let bounds = union_all(ids.iter().filter_map(|&id| registry.get_current_bounds(id)))?;
    let eligible = |id: K, data: &EntityData<M>| {
        data.kind == EntityKind::Container
            && !ids
                .iter()
                .any(|&dragged| dragged == id || registry.is_descendant_of(id, dragged))
    };
    let area = |id: K| registry.get_current_bounds(id).map_or(0.0, |r| r.area());
    registry
        .get_intersections(bounds, threshold, Some(&eligible))
        .into_iter()
        .max_by(|&a, &b| {
            registry
                .depth(a)
                .cmp(&registry.depth(b))
                .then_with(|| area(b).total_cmp(&area(a)))
        })
}
