// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::{Rc, Weak};
use core::fmt;
use core::time::Duration;

use expanse_transform::{NodeId, Origin};
use kurbo::{Point, Size};

use crate::element::Element;

/// Type tag of an entity's payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// An ordinary interactive item.
    Object,
    /// An item other entities can be dropped into.
    Container,
    /// A background surface.
    Surface,
}

/// Opaque payload of an entity: its kind plus domain metadata the engine does not interpret.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityData<M> {
    /// Type tag.
    pub kind: EntityKind,
    /// Domain metadata.
    pub meta: M,
}

impl<M> EntityData<M> {
    /// Payload of kind `kind`.
    pub fn new(kind: EntityKind, meta: M) -> Self {
        Self { kind, meta }
    }
}

impl<M: Default> EntityData<M> {
    /// An [`EntityKind::Object`] with default metadata.
    #[must_use]
    pub fn object() -> Self {
        Self::new(EntityKind::Object, M::default())
    }

    /// An [`EntityKind::Container`] with default metadata.
    #[must_use]
    pub fn container() -> Self {
        Self::new(EntityKind::Container, M::default())
    }

    /// An [`EntityKind::Surface`] with default metadata.
    #[must_use]
    pub fn surface() -> Self {
        Self::new(EntityKind::Surface, M::default())
    }
}

/// Transform inputs for [`EntityRegistry::register`](crate::EntityRegistry::register).
///
/// The parent is named by entity id.
#[derive(Debug)]
pub struct EntityInit<K> {
    /// Local position relative to the parent's world origin.
    pub position: Point,
    /// Size.
    pub size: Size,
    /// Parent entity.
    pub parent: Option<K>,
    /// Origin mapping.
    pub origin: Origin,
}

impl<K> Default for EntityInit<K> {
    fn default() -> Self {
        Self::new(Point::ZERO, Size::ZERO)
    }
}

impl<K> EntityInit<K> {
    /// Inputs at `position` with `size`, no parent and a top-left origin.
    pub fn new(position: Point, size: Size) -> Self {
        Self {
            position,
            size,
            parent: None,
            origin: Origin::TopLeft,
        }
    }

    /// Sets the parent entity.
    #[must_use]
    pub fn with_parent(mut self, parent: K) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the origin mapping.
    #[must_use]
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }
}

/// Atomic transform change for [`EntityRegistry::apply`](crate::EntityRegistry::apply).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityUpdate<K> {
    /// New local position.
    pub position: Option<Point>,
    /// New size.
    pub size: Option<Size>,
    /// New parent (`Some(None)` detaches).
    pub parent: Option<Option<K>>,
}

impl<K> Default for EntityUpdate<K> {
    fn default() -> Self {
        Self {
            position: None,
            size: None,
            parent: None,
        }
    }
}

impl<K> EntityUpdate<K> {
    /// An update that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the new local position.
    #[must_use]
    pub fn position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    /// Sets the new size.
    #[must_use]
    pub fn size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Sets the new parent (`None` detaches).
    #[must_use]
    pub fn parent(mut self, parent: Option<K>) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// Lifecycle of a registry entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// Registered and visible to queries.
    Active,
    /// Deregistered; removed at `deadline` unless registered again first.
    PendingRemoval {
        /// Logical time of removal.
        deadline: Duration,
    },
}

/// A registered entity.
pub struct Entry<K, M> {
    pub(crate) id: K,
    pub(crate) node: NodeId,
    pub(crate) data: EntityData<M>,
    pub(crate) element: Option<Weak<dyn Element>>,
    pub(crate) lifecycle: Lifecycle,
}

impl<K: fmt::Debug, M: fmt::Debug> fmt::Debug for Entry<K, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("id", &self.id)
            .field("node", &self.node)
            .field("data", &self.data)
            .field("attached", &self.is_attached())
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}

impl<K, M> Entry<K, M> {
    /// The observed element, if it is still alive.
    pub fn element(&self) -> Option<Rc<dyn Element>> {
        self.element.as_ref().and_then(Weak::upgrade)
    }

    /// Returns `true` if an element is attached and still alive.
    pub fn is_attached(&self) -> bool {
        self.element.as_ref().is_some_and(|w| w.strong_count() > 0)
    }
}

impl<K: Copy, M> Entry<K, M> {
    pub(crate) fn new(id: K, node: NodeId, data: EntityData<M>) -> Self {
        Self {
            id,
            node,
            data,
            element: None,
            lifecycle: Lifecycle::Active,
        }
    }

    /// Entity id.
    pub fn id(&self) -> K {
        self.id
    }

    /// Transform node owned by this entry.
    ///
    /// Stable across re-registration of a still-present id.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Payload.
    pub fn data(&self) -> &EntityData<M> {
        &self.data
    }

    /// Payload kind.
    pub fn kind(&self) -> EntityKind {
        self.data.kind
    }

    /// Lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Returns `true` unless the entry is pending removal.
    pub fn is_active(&self) -> bool {
        self.lifecycle == Lifecycle::Active
    }
}
