// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the transform graph: handles, origins, inputs, and errors.

use alloc::boxed::Box;
use core::fmt;

use kurbo::{Point, Size};

/// Identifier for a node in a [`TransformGraph`](crate::TransformGraph).
///
/// A small, copyable handle made of a slot index and a generation counter.
/// Removing a node frees its slot; reusing the slot bumps the generation, so
/// a stale `NodeId` never aliases a different live node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// How a node's origin (the top-left corner of its bounds) derives from its
/// local position and size.
#[derive(Default)]
pub enum Origin {
    /// The position is the top-left corner.
    #[default]
    TopLeft,
    /// The position is the center of the box.
    Center,
    /// Any other mapping from `(position, size)` to the top-left corner.
    Custom(Box<dyn Fn(Point, Size) -> Point>),
}

impl Origin {
    /// Resolves the local top-left corner for `position` and `size`.
    #[must_use]
    pub fn resolve(&self, position: Point, size: Size) -> Point {
        match self {
            Self::TopLeft => position,
            Self::Center => position - size.to_vec2() * 0.5,
            Self::Custom(f) => f(position, size),
        }
    }
}

impl fmt::Debug for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TopLeft => f.write_str("TopLeft"),
            Self::Center => f.write_str("Center"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Initial inputs for a new node.
#[derive(Debug, Default)]
pub struct TransformInit {
    /// Local position relative to the parent's world origin.
    pub position: Point,
    /// Size of the node's box.
    pub size: Size,
    /// Optional parent node.
    pub parent: Option<NodeId>,
    /// Origin mapping.
    pub origin: Origin,
}

impl TransformInit {
    /// Inputs for a node at `position` with `size`, no parent and a top-left origin.
    #[must_use]
    pub fn new(position: Point, size: Size) -> Self {
        Self {
            position,
            size,
            ..Self::default()
        }
    }

    /// Sets the parent.
    #[must_use]
    pub fn with_parent(mut self, parent: NodeId) -> Self {
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

/// A batch of input changes applied atomically by
/// [`TransformGraph::apply`](crate::TransformGraph::apply).
///
/// Fields left as `None` are not touched. `parent: Some(None)` detaches the
/// node from its parent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransformUpdate {
    /// New local position.
    pub position: Option<Point>,
    /// New size.
    pub size: Option<Size>,
    /// New parent (`Some(None)` detaches).
    pub parent: Option<Option<NodeId>>,
}

impl TransformUpdate {
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
    pub fn parent(mut self, parent: Option<NodeId>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Returns `true` if this update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.size.is_none() && self.parent.is_none()
    }
}

/// Structural errors raised by the transform graph.
///
/// These indicate a programming error in the caller; they are reported before
/// any input is mutated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    /// A node was assigned as its own parent.
    #[error("node {0:?} cannot be its own parent")]
    SelfParent(NodeId),
    /// The requested parent is a descendant of the node.
    #[error("parenting {node:?} under its descendant {parent:?} would create a cycle")]
    Cycle {
        /// The node being reparented.
        node: NodeId,
        /// The rejected parent.
        parent: NodeId,
    },
    /// The node handle is stale or was never issued.
    #[error("node {0:?} is not alive")]
    UnknownNode(NodeId),
    /// The parent handle is stale or was never issued.
    #[error("parent {0:?} is not alive")]
    UnknownParent(NodeId),
}
