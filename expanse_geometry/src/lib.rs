// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expanse Geometry: small, stateless geometry helpers for infinite-canvas engines.
//!
//! Everything here is a pure function over [`kurbo`] types. The crate provides:
//! - Box arithmetic: building boxes from origin + size, overlap areas, unions.
//! - Degeneracy checks for zero-width / zero-height hit targets.
//! - The exact intersection test used after approximate spatial-index pruning
//!   ([`intersects`]).
//! - Clamping and grid snapping.
//! - Connector curves between entities ([`connector_curve`], [`sample_curve`]).
//!
//! ## Exact intersection
//!
//! ```rust
//! use kurbo::Rect;
//! use expanse_geometry::intersects;
//!
//! let entity = Rect::new(0.0, 0.0, 100.0, 100.0);
//!
//! // Any positive overlap passes with a threshold of zero.
//! assert!(intersects(entity, Rect::new(90.0, 90.0, 200.0, 200.0), 0.0));
//! // Near-full containment is required as the threshold approaches one.
//! assert!(!intersects(entity, Rect::new(90.0, 90.0, 200.0, 200.0), 0.9));
//!
//! // A degenerate (point) query passes when the point lies on the box, edges included.
//! assert!(intersects(entity, Rect::new(100.0, 50.0, 100.0, 50.0), 0.0));
//! ```
//!
//! ## Snapping
//!
//! ```rust
//! use kurbo::Point;
//! use expanse_geometry::snap_point;
//!
//! assert_eq!(snap_point(Point::new(23.0, 38.0), 10.0), Point::new(20.0, 40.0));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod boxes;
mod connector;
mod intersect;
mod snap;

pub use boxes::{
    Degenerate, clamp_point, clamp_range, contains_point_inclusive, degenerate_axis,
    is_point_rect, overlap_1d, overlap_area, rect_from_origin_size, union_all,
};
pub use connector::{ConnectorSide, connector_curve, curve_bounds, sample_curve};
pub use intersect::intersects;
pub use snap::{floor, round, snap, snap_point};
