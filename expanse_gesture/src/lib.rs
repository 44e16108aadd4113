// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expanse Gesture: who gets to interpret a pointer gesture.
//!
//! Many interactive regions of a canvas (objects, containers, the background,
//! tools like box-select) watch the same pointer stream. This crate provides:
//!
//! - [`GestureFrame`]: one step of a gesture from the recognition layer, with
//!   [`PointerButtons`] and [`Modifiers`] bitflags, touch count, screen
//!   position and delta, pinch scale and first/last markers.
//! - [`GestureArbiter`]: a single-owner claim protocol. A claim is taken at
//!   most once per gesture, on its first frame, and always released when the
//!   gesture ends. Owners may abandon cooperatively (for example when a drag
//!   turns into a pinch), and a claim may be explicitly overridden.
//! - [`DragTracker`]: per-frame deltas and total offset since the drag began.
//!
//! The arbiter is an explicit value shared by reference among listeners; it
//! does not route events itself.
//!
//! ```rust
//! use kurbo::Point;
//! use expanse_gesture::{Candidate, ClaimType, GestureArbiter, GestureFrame, Modifiers};
//!
//! let box_select = |f: &GestureFrame| f.shift();
//! let mut arbiter = GestureArbiter::new();
//!
//! let first = GestureFrame::start(Point::new(10.0, 10.0)).with_modifiers(Modifiers::SHIFT);
//! arbiter.begin_frame(&first);
//! let claim = arbiter.arbitrate(
//!     &first,
//!     [
//!         Candidate::new("select", ClaimType::Tool).with_filter(&box_select),
//!         Candidate::new("background", ClaimType::Surface),
//!     ],
//! );
//! assert_eq!(claim.map(|c| c.owner), Some("select"));
//!
//! arbiter.end_gesture();
//! assert_eq!(arbiter.claimed_by(), None);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod arbiter;
pub mod drag;
mod frame;

pub use arbiter::{Candidate, Claim, ClaimMode, ClaimType, GestureArbiter};
pub use drag::DragTracker;
pub use frame::{GestureFrame, Modifiers, PointerButtons};
