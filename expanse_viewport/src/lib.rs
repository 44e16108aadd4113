// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expanse Viewport: the camera over an infinite canvas.
//!
//! A [`Viewport`] maps between screen space (pixels relative to the bound
//! element) and world space (the canvas's zoom and pan independent plane):
//!
//! - `viewport_to_world(p) = (p − element_offset − element_size / 2) / zoom + center`
//! - `world_to_viewport` is its exact inverse.
//!
//! On top of the mapping it provides:
//! - Panning with optional limits ([`PanLimitMode::Center`] clamps the center,
//!   [`PanLimitMode::Viewport`] keeps the visible edges inside the content).
//! - Zoom with limits, where the lower bound may be [`ZoomMin::Fit`], and
//!   "zoom toward cursor": with a centroid the world point under it stays put.
//! - [`Viewport::fit_on_screen`] for "show all content".
//! - Queued [`ViewportEvent`]s distinguishing continuous changes from settled ones.
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use expanse_viewport::{ChangeOrigin, Viewport, ZoomOptions};
//!
//! let mut vp = Viewport::new(Size::new(800.0, 600.0));
//! assert_eq!(vp.viewport_to_world(Point::new(400.0, 300.0)), Point::new(0.0, 0.0));
//!
//! let cursor = Point::new(700.0, 100.0);
//! let under_cursor = vp.viewport_to_world(cursor);
//! vp.zoom(2.0, ZoomOptions::new(ChangeOrigin::Wheel).toward(cursor));
//! let after = vp.viewport_to_world(cursor);
//! assert!((after - under_cursor).hypot() < 1e-9);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod modes;
mod viewport;

pub use modes::{ChangeOrigin, FALLBACK_MIN_ZOOM, PanLimitMode, ViewportConfig, ZoomLimits, ZoomMin};
pub use viewport::{
    PanOptions, Viewport, ViewportChange, ViewportDebugInfo, ViewportEvent, ZoomOptions,
};
