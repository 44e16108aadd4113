// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Rect;

/// Zoom used as the lower bound when [`ZoomMin::Fit`] cannot be resolved.
pub const FALLBACK_MIN_ZOOM: f64 = 1e-3;

/// How pan limits constrain the camera center.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PanLimitMode {
    /// The camera center is clamped to the pan-limit rectangle.
    #[default]
    Center,
    /// The visible rectangle's edges may not cross the content boundary.
    ///
    /// On an axis where the view is larger than the content, the center may
    /// move symmetrically around the content's center by the difference.
    Viewport,
}

/// Lower zoom bound.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ZoomMin {
    /// A fixed lower bound.
    Value(f64),
    /// The smallest zoom at which the pan limits still cover the whole view.
    ///
    /// Resolves to [`FALLBACK_MIN_ZOOM`] without pan limits or a sized element.
    Fit,
}

impl Default for ZoomMin {
    fn default() -> Self {
        Self::Value(FALLBACK_MIN_ZOOM)
    }
}

/// Zoom range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomLimits {
    /// Lower bound.
    pub min: ZoomMin,
    /// Upper bound.
    pub max: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: ZoomMin::default(),
            max: 1e3,
        }
    }
}

/// Who caused a camera change.
///
/// Carried on every [`ViewportEvent`](crate::ViewportEvent) so dependents can
/// tell, for example, continuous gesture updates from programmatic moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ChangeOrigin {
    /// Set directly by application code.
    #[default]
    Program,
    /// A pointer or touch gesture (drag pan, pinch).
    Gesture,
    /// A wheel or trackpad scroll.
    Wheel,
    /// Re-clamping after the element or limits changed.
    Layout,
}

/// Camera limits.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportConfig {
    /// World-space rectangle the camera is confined to.
    pub pan_limits: Option<Rect>,
    /// How [`pan_limits`](Self::pan_limits) constrain the center.
    pub pan_limit_mode: PanLimitMode,
    /// Zoom range.
    pub zoom_limits: ZoomLimits,
}

impl ViewportConfig {
    /// Sets the pan limits.
    #[must_use]
    pub fn with_pan_limits(mut self, limits: Option<Rect>) -> Self {
        self.pan_limits = limits;
        self
    }

    /// Sets the pan limit mode.
    #[must_use]
    pub fn with_pan_limit_mode(mut self, mode: PanLimitMode) -> Self {
        self.pan_limit_mode = mode;
        self
    }

    /// Sets the zoom limits.
    #[must_use]
    pub fn with_zoom_limits(mut self, limits: ZoomLimits) -> Self {
        self.zoom_limits = limits;
        self
    }
}
