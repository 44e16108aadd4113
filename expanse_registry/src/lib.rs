// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expanse Registry: the entity registry of an infinite canvas.
//!
//! An [`EntityRegistry`] maps caller-chosen ids to entries that own a node in
//! an [`expanse_transform::TransformGraph`], carry an opaque typed payload
//! ([`EntityData`]), and optionally observe a rendered [`Element`] through a
//! weak handle.
//!
//! - Registration is an upsert: registering a present id updates it in place
//!   and keeps its transform node and subscribers.
//! - Deregistration is deferred by a grace window; registering again inside
//!   the window cancels it.
//! - World bounds feed a grid [`expanse_index::SpatialIndex`], updated after a
//!   debounce window. Queries stay exact in the meantime.
//! - Subscribers receive per-id [`Notification`]s.
//!
//! ```rust
//! use core::time::Duration;
//! use expanse_registry::{EntityData, EntityInit, EntityRegistry, RegistryConfig};
//! use kurbo::{Point, Rect, Size};
//!
//! let mut reg: EntityRegistry<u32, ()> = EntityRegistry::new(RegistryConfig::default());
//! reg.register(1, EntityInit::new(Point::new(0.0, 0.0), Size::new(50.0, 50.0)), EntityData::object())
//!     .unwrap();
//! reg.register(2, EntityInit::new(Point::new(90.0, 90.0), Size::new(50.0, 50.0)), EntityData::object())
//!     .unwrap();
//!
//! // Both share the index cell at the origin, but only one overlaps the probe.
//! assert_eq!(reg.get_intersections(Rect::new(95.0, 95.0, 96.0, 96.0), 0.0, None), [2]);
//!
//! // Deregistration waits out the grace window.
//! reg.deregister(2);
//! assert!(reg.is_pending_removal(2));
//! reg.advance_by(Duration::from_millis(100));
//! assert!(!reg.is_pending_removal(2));
//! ```
//!
//! Time is logical: the host drives it with [`EntityRegistry::advance_to`].
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod config;
mod element;
mod error;
mod notify;
mod registry;
mod types;

pub use config::RegistryConfig;
pub use element::{Element, ResizeObserver};
pub use error::RegistryError;
pub use notify::{Notification, SubscriptionId};
pub use registry::EntityRegistry;
pub use types::{EntityData, EntityInit, EntityKind, EntityUpdate, Entry, Lifecycle};
