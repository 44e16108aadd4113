// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expanse Transform: a hierarchical transform graph with memoized world-space derivations.
//!
//! Each node holds a small set of inputs:
//! - `position`: the committed local position, relative to the parent's world origin.
//! - `gesture_offset`: a transient translation layered on top while a drag is in flight.
//! - `size`, and an [`Origin`] mapping from `(position, size)` to the box's top-left corner.
//! - An optional parent.
//!
//! Everything else is derived on read and cached until an input that feeds it changes:
//! - `origin` = origin mapping of `(position, size)` + `gesture_offset`
//! - `world_origin` = `origin` + parent's `world_origin`
//! - `world_position` = `position` + `gesture_offset` + parent's `world_origin`
//! - `bounds` = `world_origin` ⊕ `size`, and its `center`
//!
//! Writes mark the written node and its whole subtree dirty; reads of clean
//! nodes never recompute. Nodes touched by a write are also queued so an owner
//! can re-sync dependent structures (such as a spatial index) via
//! [`TransformGraph::take_invalidated`].
//!
//! Reparenting keeps a node's on-screen position: its local position is
//! renormalized against the new parent's world origin.
//!
//! ```rust
//! use kurbo::{Point, Rect, Size, Vec2};
//! use expanse_transform::{TransformGraph, TransformInit};
//!
//! let mut graph = TransformGraph::new();
//! let card = graph.insert(TransformInit::new(Point::new(10.0, 20.0), Size::new(100.0, 50.0)))?;
//!
//! // Drag it without committing.
//! graph.set_gesture_offset(card, Vec2::new(5.0, 5.0));
//! assert_eq!(graph.bounds(card), Some(Rect::new(15.0, 25.0, 115.0, 75.0)));
//!
//! // Commit on release.
//! graph.apply_gesture_offset(card);
//! assert_eq!(graph.position(card), Some(Point::new(15.0, 25.0)));
//! # Ok::<(), expanse_transform::TransformError>(())
//! ```
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod graph;
mod types;

pub use graph::TransformGraph;
pub use types::{NodeId, Origin, TransformError, TransformInit, TransformUpdate};
