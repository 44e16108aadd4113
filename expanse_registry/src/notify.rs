// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-entity change notifications.

use alloc::boxed::Box;

use kurbo::{Point, Size};

/// A change delivered to subscribers of one entity id.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Notification<K> {
    /// The world origin (top-left of the bounds) moved.
    OriginChanged {
        /// Entity id.
        id: K,
        /// New world origin.
        origin: Point,
    },
    /// The size changed.
    SizeChanged {
        /// Entity id.
        id: K,
        /// New size.
        size: Size,
    },
    /// The entity was created, or created again after a completed removal.
    EntryReplaced {
        /// Entity id.
        id: K,
    },
    /// An element was attached or detached.
    ElementChanged {
        /// Entity id.
        id: K,
        /// Whether an element is now attached.
        attached: bool,
    },
}

impl<K: Copy> Notification<K> {
    /// The entity this notification concerns.
    pub fn id(&self) -> K {
        match *self {
            Self::OriginChanged { id, .. }
            | Self::SizeChanged { id, .. }
            | Self::EntryReplaced { id }
            | Self::ElementChanged { id, .. } => id,
        }
    }
}

/// Handle returned by [`EntityRegistry::subscribe`](crate::EntityRegistry::subscribe).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

pub(crate) type Callback<K> = Box<dyn FnMut(&Notification<K>)>;
