// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expanse Canvas: the interactive core of an infinite canvas.
//!
//! [`Canvas`] wires the Expanse crates together: gesture frames are arbitrated
//! by an [`expanse_gesture::GestureArbiter`], screen deltas are converted to
//! world space by an [`expanse_viewport::Viewport`], and entity writes go
//! through an [`expanse_registry::EntityRegistry`] whose queries drive
//! box-select and drop-target detection.
//!
//! ```rust
//! use expanse_canvas::{Canvas, CanvasConfig, Target};
//! use expanse_gesture::GestureFrame;
//! use expanse_registry::{EntityData, EntityInit};
//! use kurbo::{Point, Size};
//!
//! let mut canvas: Canvas<u32, ()> = Canvas::new(Size::new(800.0, 600.0), CanvasConfig::default());
//! let registry = canvas.registry_mut();
//! registry
//!     .register(1, EntityInit::new(Point::new(200.0, 0.0), Size::new(300.0, 300.0)), EntityData::container())
//!     .unwrap();
//! registry
//!     .register(2, EntityInit::new(Point::new(0.0, 0.0), Size::new(20.0, 20.0)), EntityData::object())
//!     .unwrap();
//!
//! // Drag entity 2 by 250 screen pixels (zoom 1) into the container.
//! let start = GestureFrame::start(Point::new(410.0, 310.0));
//! canvas.handle_frame(&start, Target::Entity(2));
//! let end = start.end(Point::new(660.0, 360.0));
//! canvas.handle_frame(&end, Target::Entity(2));
//!
//! assert_eq!(canvas.registry().parent(2), Some(1));
//! assert_eq!(canvas.registry().world_origin(2), Some(Point::new(250.0, 50.0)));
//! assert_eq!(canvas.arbiter().claimed_by(), None);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod canvas;
mod config;
mod selection;

pub use canvas::{Canvas, Owner, Target};
pub use config::CanvasConfig;
pub use selection::Selection;
