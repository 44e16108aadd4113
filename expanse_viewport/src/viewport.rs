// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use expanse_geometry::{clamp_point, clamp_range};
use kurbo::{Point, Rect, Size, Vec2};

use crate::modes::{
    ChangeOrigin, FALLBACK_MIN_ZOOM, PanLimitMode, ViewportConfig, ZoomLimits, ZoomMin,
};

/// Camera state carried by a [`ViewportEvent`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportChange {
    /// Camera center after the change.
    pub center: Point,
    /// Zoom after the change.
    pub zoom: f64,
    /// What caused the change.
    pub origin: ChangeOrigin,
}

/// Notification queued by camera changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewportEvent {
    /// Any pan or zoom, including each step of a continuous gesture.
    Changed(ViewportChange),
    /// Emitted after [`Changed`](Self::Changed) when the change completes a gesture.
    Settled(ViewportChange),
}

/// Options for [`Viewport::pan`] and [`Viewport::move_to`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PanOptions {
    /// What caused the change.
    pub origin: ChangeOrigin,
    /// Whether this is the final value of a gesture.
    pub gesture_complete: bool,
}

impl PanOptions {
    /// Options for a change caused by `origin`.
    #[must_use]
    pub fn new(origin: ChangeOrigin) -> Self {
        Self {
            origin,
            gesture_complete: false,
        }
    }

    /// Marks the change as the final value of a gesture.
    #[must_use]
    pub fn complete(mut self) -> Self {
        self.gesture_complete = true;
        self
    }
}

/// Options for [`Viewport::zoom`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ZoomOptions {
    /// What caused the change.
    pub origin: ChangeOrigin,
    /// Screen point whose world point must stay put.
    pub centroid: Option<Point>,
    /// Whether this is the final value of a gesture.
    pub gesture_complete: bool,
}

impl ZoomOptions {
    /// Options for a change caused by `origin`.
    #[must_use]
    pub fn new(origin: ChangeOrigin) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    /// Zooms toward `centroid` (screen space).
    #[must_use]
    pub fn toward(mut self, centroid: Point) -> Self {
        self.centroid = Some(centroid);
        self
    }

    /// Marks the change as the final value of a gesture.
    #[must_use]
    pub fn complete(mut self) -> Self {
        self.gesture_complete = true;
        self
    }

    fn pan(self) -> PanOptions {
        PanOptions {
            origin: self.origin,
            gesture_complete: self.gesture_complete,
        }
    }
}

/// Camera over an infinite world plane, bound to a rectangular screen element.
///
/// `center` is the world point shown at the middle of the element and
/// `zoom` is screen pixels per world unit. Screen coordinates are relative to
/// whatever the element offset is expressed in (usually the window).
///
/// Every pan or zoom queues a [`ViewportEvent::Changed`]; changes flagged as
/// the end of a gesture also queue a [`ViewportEvent::Settled`]. Drain them
/// with [`Viewport::drain_events`].
#[derive(Clone, Debug)]
pub struct Viewport {
    center: Point,
    zoom: f64,
    element_size: Size,
    element_offset: Vec2,
    config: ViewportConfig,
    events: Vec<ViewportEvent>,
}

impl Viewport {
    /// Creates a camera centered on the world origin at zoom `1.0`, with no limits.
    #[must_use]
    pub fn new(element_size: Size) -> Self {
        Self::with_config(element_size, ViewportConfig::default())
    }

    /// Creates a camera with the given limits; the initial state is clamped into them.
    #[must_use]
    pub fn with_config(element_size: Size, mut config: ViewportConfig) -> Self {
        config.pan_limits = config.pan_limits.map(|r| r.abs());
        let mut vp = Self {
            center: Point::ZERO,
            zoom: 1.0,
            element_size,
            element_offset: Vec2::ZERO,
            config,
            events: Vec::new(),
        };
        vp.zoom = vp.clamp_zoom(vp.zoom);
        vp.center = vp.clamp_pan_position(vp.center);
        vp
    }

    /// Current camera center in world space.
    #[must_use]
    pub fn center(&self) -> Point {
        self.center
    }

    /// Current zoom (screen pixels per world unit).
    #[must_use]
    pub fn zoom_level(&self) -> f64 {
        self.zoom
    }

    /// Size of the bound element in screen pixels.
    #[must_use]
    pub fn element_size(&self) -> Size {
        self.element_size
    }

    /// Screen position of the element's top-left corner.
    #[must_use]
    pub fn element_offset(&self) -> Vec2 {
        self.element_offset
    }

    /// Current limits.
    #[must_use]
    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Sets the element size and re-enforces limits.
    pub fn set_element_size(&mut self, size: Size) {
        if self.element_size != size {
            self.element_size = size;
            self.enforce_limits();
        }
    }

    /// Sets the element offset. Conversions shift; the camera does not move.
    pub fn set_element_offset(&mut self, offset: Vec2) {
        self.element_offset = offset;
    }

    /// Sets the pan limits and re-enforces them.
    pub fn set_pan_limits(&mut self, limits: Option<Rect>) {
        let limits = limits.map(|r| r.abs());
        if self.config.pan_limits != limits {
            self.config.pan_limits = limits;
            self.enforce_limits();
        }
    }

    /// Sets the pan limit mode and re-enforces limits.
    pub fn set_pan_limit_mode(&mut self, mode: PanLimitMode) {
        if self.config.pan_limit_mode != mode {
            self.config.pan_limit_mode = mode;
            self.enforce_limits();
        }
    }

    /// Sets the zoom limits and re-enforces them.
    pub fn set_zoom_limits(&mut self, limits: ZoomLimits) {
        if self.config.zoom_limits != limits {
            self.config.zoom_limits = limits;
            self.enforce_limits();
        }
    }

    /// Converts a screen point to world space.
    #[must_use]
    pub fn viewport_to_world(&self, screen: Point) -> Point {
        self.center + (screen.to_vec2() - self.element_offset - self.half_element()) / self.zoom
    }

    /// Converts a world point to screen space. Exact inverse of [`viewport_to_world`](Self::viewport_to_world).
    #[must_use]
    pub fn world_to_viewport(&self, world: Point) -> Point {
        ((world - self.center) * self.zoom + self.element_offset + self.half_element()).to_point()
    }

    /// Converts a screen-space displacement to world space.
    #[must_use]
    pub fn viewport_delta_to_world(&self, delta: Vec2) -> Vec2 {
        delta / self.zoom
    }

    /// Converts a world-space displacement to screen space.
    #[must_use]
    pub fn world_delta_to_viewport(&self, delta: Vec2) -> Vec2 {
        delta * self.zoom
    }

    /// Converts a screen rectangle to world space.
    #[must_use]
    pub fn viewport_to_world_rect(&self, rect: Rect) -> Rect {
        Rect::from_points(
            self.viewport_to_world(rect.origin()),
            self.viewport_to_world(Point::new(rect.x1, rect.y1)),
        )
    }

    /// Converts a world rectangle to screen space.
    #[must_use]
    pub fn world_to_viewport_rect(&self, rect: Rect) -> Rect {
        Rect::from_points(
            self.world_to_viewport(rect.origin()),
            self.world_to_viewport(Point::new(rect.x1, rect.y1)),
        )
    }

    /// World-space rectangle covered by the element.
    #[must_use]
    pub fn visible_world_rect(&self) -> Rect {
        let origin = self.element_offset.to_point();
        self.viewport_to_world_rect(Rect::from_origin_size(origin, self.element_size))
    }

    /// Resolved lower zoom bound.
    ///
    /// [`ZoomMin::Fit`] is the zoom at which the pan limits exactly cover the
    /// view on the tighter axis; zooming out further would show space outside them.
    #[must_use]
    pub fn min_zoom(&self) -> f64 {
        let min = match self.config.zoom_limits.min {
            ZoomMin::Value(v) => v,
            ZoomMin::Fit => self.fit_zoom().unwrap_or(FALLBACK_MIN_ZOOM),
        };
        min.min(self.max_zoom())
    }

    /// Upper zoom bound.
    #[must_use]
    pub fn max_zoom(&self) -> f64 {
        self.config.zoom_limits.max
    }

    /// Clamps a prospective camera center to the pan limits.
    ///
    /// In [`PanLimitMode::Center`] the center is clamped to the limit
    /// rectangle. In [`PanLimitMode::Viewport`] the allowed center range on
    /// each axis is inset by half the visible extent so the view never shows
    /// beyond the content; if the view is wider than the content on an axis,
    /// the range instead widens symmetrically around the content's center.
    #[must_use]
    pub fn clamp_pan_position(&self, center: Point) -> Point {
        self.clamp_center_at(center, self.zoom)
    }

    fn clamp_center_at(&self, center: Point, zoom: f64) -> Point {
        let Some(limits) = self.config.pan_limits else {
            return center;
        };
        match self.config.pan_limit_mode {
            PanLimitMode::Center => clamp_point(center, limits),
            PanLimitMode::Viewport => {
                let half = self.half_element() / zoom;
                Point::new(
                    clamp_axis(center.x, limits.x0, limits.x1, half.x),
                    clamp_axis(center.y, limits.y0, limits.y1, half.y),
                )
            }
        }
    }

    /// Moves the camera center to `target` after clamping.
    ///
    /// Always queues [`ViewportEvent::Changed`]; queues [`ViewportEvent::Settled`]
    /// too when `options.gesture_complete` is set.
    pub fn pan(&mut self, target: Point, options: PanOptions) {
        self.center = self.clamp_pan_position(target);
        self.notify(options);
    }

    /// Pans by a world-space displacement.
    pub fn relative_pan(&mut self, delta: Vec2, options: PanOptions) {
        self.pan(self.center + delta, options);
    }

    /// Pans by a screen-space displacement, moving content with the pointer.
    pub fn pan_by_viewport(&mut self, screen_delta: Vec2, options: PanOptions) {
        self.relative_pan(-self.viewport_delta_to_world(screen_delta), options);
    }

    /// Sets the zoom, clamped to the limits.
    ///
    /// With a `centroid`, the world point under it before the change stays
    /// under it afterwards. Without one, the current center is re-panned so
    /// pan clamping holds at the new zoom. Non-positive or non-finite values
    /// are ignored.
    pub fn zoom(&mut self, value: f64, options: ZoomOptions) {
        if !value.is_finite() || value <= 0.0 {
            return;
        }
        let zoom = self.clamp_zoom(value);
        match options.centroid {
            Some(centroid) => {
                let anchor = self.viewport_to_world(centroid);
                self.zoom = zoom;
                let projected = self.world_to_viewport(anchor);
                let delta = self.viewport_delta_to_world(projected - centroid);
                self.relative_pan(delta, options.pan());
            }
            None => {
                self.zoom = zoom;
                self.pan(self.center, options.pan());
            }
        }
    }

    /// Multiplies the zoom by `factor`.
    pub fn relative_zoom(&mut self, factor: f64, options: ZoomOptions) {
        self.zoom(self.zoom * factor, options);
    }

    /// Sets center and zoom together, emitting a single change.
    pub fn move_to(&mut self, center: Point, zoom: f64, options: PanOptions) {
        if zoom.is_finite() && zoom > 0.0 {
            self.zoom = self.clamp_zoom(zoom);
        }
        self.pan(center, options);
    }

    /// Centers `bounds` and zooms so it fits in the element with `margin`
    /// screen pixels to spare.
    ///
    /// Degenerate bounds keep the current zoom.
    pub fn fit_on_screen(&mut self, bounds: Rect, margin: f64, options: PanOptions) {
        let bounds = bounds.abs();
        let zoom = (self.element_size.width / (bounds.width() + margin))
            .min(self.element_size.height / (bounds.height() + margin));
        let zoom = if zoom.is_finite() && zoom > 0.0 {
            zoom
        } else {
            self.zoom
        };
        self.move_to(bounds.center(), zoom, options);
    }

    /// Suggests a “nice” background grid spacing in world units for the current zoom.
    ///
    /// Lines land roughly 64 pixels apart on a 1‑2‑5 ladder, with `base` as the
    /// minimum spacing.
    #[must_use]
    pub fn suggest_grid_spacing(&self, base: f64) -> f64 {
        let base = base.abs().max(f64::MIN_POSITIVE);
        let desired = (64.0 / self.zoom).max(base);

        let mut unit = 1.0_f64;
        while unit * 10.0 <= desired {
            unit *= 10.0;
        }
        while unit > desired {
            unit /= 10.0;
        }
        loop {
            for m in [1.0_f64, 2.0, 5.0, 10.0] {
                let step = m * unit;
                if step >= desired {
                    return step;
                }
            }
            unit *= 10.0;
        }
    }

    /// Takes the queued notifications.
    pub fn drain_events(&mut self) -> Vec<ViewportEvent> {
        core::mem::take(&mut self.events)
    }

    /// Snapshot of the current state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> ViewportDebugInfo {
        ViewportDebugInfo {
            center: self.center,
            zoom: self.zoom,
            element_size: self.element_size,
            element_offset: self.element_offset,
            visible_world_rect: self.visible_world_rect(),
            min_zoom: self.min_zoom(),
            max_zoom: self.max_zoom(),
            config: self.config,
            pending_events: self.events.len(),
        }
    }

    fn half_element(&self) -> Vec2 {
        self.element_size.to_vec2() * 0.5
    }

    fn fit_zoom(&self) -> Option<f64> {
        let limits = self.config.pan_limits?;
        let (lw, lh) = (limits.width(), limits.height());
        let Size { width, height } = self.element_size;
        if lw <= 0.0 || lh <= 0.0 || width <= 0.0 || height <= 0.0 {
            return None;
        }
        Some((width / lw).max(height / lh))
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        let max = self.max_zoom();
        zoom.max(self.min_zoom()).min(max)
    }

    fn enforce_limits(&mut self) {
        let zoom = self.clamp_zoom(self.zoom);
        let center = self.clamp_center_at(self.center, zoom);
        if zoom != self.zoom || center != self.center {
            self.zoom = zoom;
            self.center = center;
            self.notify(PanOptions::new(ChangeOrigin::Layout));
        }
    }

    fn notify(&mut self, options: PanOptions) {
        let change = ViewportChange {
            center: self.center,
            zoom: self.zoom,
            origin: options.origin,
        };
        self.events.push(ViewportEvent::Changed(change));
        if options.gesture_complete {
            #[cfg(feature = "tracing")]
            tracing::debug!(center = ?change.center, zoom = change.zoom, origin = ?change.origin, "viewport settled");
            self.events.push(ViewportEvent::Settled(change));
        }
    }
}

/// Clamps one axis of the camera center in [`PanLimitMode::Viewport`].
fn clamp_axis(value: f64, lo: f64, hi: f64, half_visible: f64) -> f64 {
    let half_content = (hi - lo) * 0.5;
    if half_content >= half_visible {
        clamp_range(value, lo + half_visible, hi - half_visible)
    } else {
        let mid = lo + half_content;
        let slack = half_visible - half_content;
        clamp_range(value, mid - slack, mid + slack)
    }
}

/// Debug snapshot of a [`Viewport`].
#[derive(Clone, Copy, Debug)]
pub struct ViewportDebugInfo {
    /// Camera center.
    pub center: Point,
    /// Zoom.
    pub zoom: f64,
    /// Element size in screen pixels.
    pub element_size: Size,
    /// Element offset in screen pixels.
    pub element_offset: Vec2,
    /// World-space rectangle currently visible.
    pub visible_world_rect: Rect,
    /// Resolved lower zoom bound.
    pub min_zoom: f64,
    /// Upper zoom bound.
    pub max_zoom: f64,
    /// Limits.
    pub config: ViewportConfig,
    /// Number of undrained events.
    pub pending_events: usize,
}
