// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core graph implementation: structure, input writes, memoized reads.

use alloc::vec::Vec;
use core::cell::Cell;

use expanse_geometry::rect_from_origin_size;
use kurbo::{Point, Rect, Size, Vec2};
use smallvec::SmallVec;

use crate::types::{NodeId, Origin, TransformError, TransformInit, TransformUpdate};

/// Derived world-space values of a node, cached between reads.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Derived {
    origin: Point,
    world_origin: Point,
    world_position: Point,
}

#[derive(Debug)]
struct Node {
    generation: u32,
    position: Point,
    gesture_offset: Vec2,
    size: Size,
    origin: Origin,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
    cache: Cell<Derived>,
    dirty: Cell<bool>,
    revision: Cell<u64>,
    queued: bool,
}

impl Node {
    fn new(generation: u32, init: TransformInit) -> Self {
        Self {
            generation,
            position: init.position,
            gesture_offset: Vec2::ZERO,
            size: init.size,
            origin: init.origin,
            parent: None,
            children: SmallVec::new(),
            cache: Cell::new(Derived::default()),
            dirty: Cell::new(true),
            revision: Cell::new(0),
            queued: false,
        }
    }
}

/// Arena of transform nodes with memoized world-space derivations.
///
/// Inputs (`position`, `gesture_offset`, `size`, `parent`) are written through
/// `&mut self` methods. Every write that can affect a derived value pushes a
/// dirty bit onto the node and all of its descendants. Reads through `&self`
/// pull: a clean node returns its cached value, a dirty node recomputes from
/// its parent's (recursively pulled) world origin and caches the result.
///
/// Invariants:
/// - The parent relation is acyclic. Self-parenting and parenting under a
///   descendant are rejected before anything is mutated.
/// - A dirty node's descendants are all dirty.
/// - Reparenting preserves `world_position`.
///
/// ## Example
///
/// ```rust
/// use kurbo::{Point, Size};
/// use expanse_transform::{TransformGraph, TransformInit};
///
/// let mut graph = TransformGraph::new();
/// let node = graph.insert(TransformInit::new(Point::new(10.0, 10.0), Size::new(5.0, 5.0)))?;
/// let container = graph.insert(TransformInit::new(Point::new(100.0, 100.0), Size::new(50.0, 50.0)))?;
///
/// graph.set_parent(node, Some(container))?;
///
/// // Local position is renormalized so the node does not move on screen.
/// assert_eq!(graph.position(node), Some(Point::new(-90.0, -90.0)));
/// assert_eq!(graph.world_origin(node), Some(Point::new(10.0, 10.0)));
/// # Ok::<(), expanse_transform::TransformError>(())
/// ```
pub struct TransformGraph {
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    generation: u64,
    recomputes: Cell<u64>,
    invalidated: Vec<NodeId>,
}

impl core::fmt::Debug for TransformGraph {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("TransformGraph")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("generation", &self.generation)
            .field("recomputes", &self.recomputes.get())
            .finish_non_exhaustive()
    }
}

impl Default for TransformGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            generation: 0,
            recomputes: Cell::new(0),
            invalidated: Vec::new(),
        }
    }

    /// Inserts a new node.
    ///
    /// Fails with [`TransformError::UnknownParent`] if `init.parent` is stale.
    pub fn insert(&mut self, mut init: TransformInit) -> Result<NodeId, TransformError> {
        let parent = init.parent.take();
        if let Some(p) = parent
            && !self.is_alive(p)
        {
            return Err(TransformError::UnknownParent(p));
        }
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, init));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, init)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId holds 32-bit slot indices."
        )]
        let id = NodeId::new(idx as u32, generation);
        if let Some(p) = parent {
            self.link(id, p);
        }
        self.bump_generation();
        self.invalidate_subtree(id);
        Ok(id)
    }

    /// Removes a node.
    ///
    /// Children are detached to no parent, keeping their world position: each
    /// child's local position absorbs the removed node's world origin.
    /// Returns `false` if `id` was not alive.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let Some(node) = self.node_opt(id) else {
            return false;
        };
        let children = node.children.clone();
        let parent = node.parent;
        for child in children {
            // Children of a live node are live, and detaching can never form a cycle.
            let _ = self.reparent(child, None);
        }
        if let Some(parent) = parent {
            self.unlink(id, parent);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
        self.invalidated.retain(|n| *n != id);
        self.bump_generation();
        true
    }

    /// Returns `true` if `id` refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        matches!(self.nodes.get(id.idx()), Some(Some(n)) if n.generation == id.1)
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// Returns `true` if the graph has no live nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Applies a batch of input changes atomically.
    ///
    /// The parent change (if any) is validated first; on error nothing is
    /// mutated. A parent change is applied before the position, so an explicit
    /// `position` in the same update is interpreted relative to the new parent.
    pub fn apply(&mut self, id: NodeId, update: TransformUpdate) -> Result<(), TransformError> {
        if !self.is_alive(id) {
            return Err(TransformError::UnknownNode(id));
        }
        if let Some(parent) = update.parent {
            self.validate_parent(id, parent)?;
        }
        if let Some(parent) = update.parent {
            self.reparent(id, parent)?;
        }
        if let Some(position) = update.position {
            self.set_position(id, position);
        }
        if let Some(size) = update.size {
            self.set_size(id, size);
        }
        Ok(())
    }

    /// Sets the committed local position.
    pub fn set_position(&mut self, id: NodeId, position: Point) {
        if let Some(n) = self.node_opt_mut(id)
            && n.position != position
        {
            n.position = position;
            self.bump_generation();
            self.invalidate_subtree(id);
        }
    }

    /// Sets the size.
    pub fn set_size(&mut self, id: NodeId, size: Size) {
        if let Some(n) = self.node_opt_mut(id)
            && n.size != size
        {
            n.size = size;
            self.bump_generation();
            self.invalidate_subtree(id);
        }
    }

    /// Replaces the origin mapping.
    pub fn set_origin(&mut self, id: NodeId, origin: Origin) {
        if let Some(n) = self.node_opt_mut(id) {
            n.origin = origin;
            self.bump_generation();
            self.invalidate_subtree(id);
        }
    }

    /// Sets the transient gesture offset without touching the committed position.
    pub fn set_gesture_offset(&mut self, id: NodeId, offset: Vec2) {
        if let Some(n) = self.node_opt_mut(id)
            && n.gesture_offset != offset
        {
            n.gesture_offset = offset;
            self.bump_generation();
            self.invalidate_subtree(id);
        }
    }

    /// Folds the gesture offset into the committed position and zeroes it.
    pub fn apply_gesture_offset(&mut self, id: NodeId) {
        if let Some(n) = self.node_opt_mut(id)
            && n.gesture_offset != Vec2::ZERO
        {
            n.position += n.gesture_offset;
            n.gesture_offset = Vec2::ZERO;
            self.bump_generation();
            self.invalidate_subtree(id);
        }
    }

    /// Zeroes the gesture offset, leaving the committed position untouched.
    pub fn discard_gesture_offset(&mut self, id: NodeId) {
        self.set_gesture_offset(id, Vec2::ZERO);
    }

    /// Changes the parent, keeping the node's world position.
    ///
    /// The local position is recomputed relative to the new parent's world
    /// origin. An active gesture offset is preserved verbatim.
    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<(), TransformError> {
        if !self.is_alive(id) {
            return Err(TransformError::UnknownNode(id));
        }
        self.validate_parent(id, parent)?;
        self.reparent(id, parent)
    }

    /// Walks the ancestors of `id` (nearest first) and returns `true` if any
    /// satisfies `predicate`.
    pub fn any_parent_is(&self, id: NodeId, predicate: impl FnMut(NodeId) -> bool) -> bool {
        self.ancestors(id).any(predicate)
    }

    /// Iterates over the ancestors of `id`, nearest first.
    ///
    /// Terminates because the parent relation is acyclic.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut next = self.node_opt(id).and_then(|n| n.parent);
        core::iter::from_fn(move || {
            let current = next?;
            next = self.node_opt(current).and_then(|n| n.parent);
            Some(current)
        })
    }

    /// Returns `true` if `ancestor` is a strict ancestor of `id`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Direct children of `id` (empty for stale handles).
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Parent of a live node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Committed local position of a live node.
    #[must_use]
    pub fn position(&self, id: NodeId) -> Option<Point> {
        self.node_opt(id).map(|n| n.position)
    }

    /// Transient gesture offset of a live node.
    #[must_use]
    pub fn gesture_offset(&self, id: NodeId) -> Option<Vec2> {
        self.node_opt(id).map(|n| n.gesture_offset)
    }

    /// Size of a live node.
    #[must_use]
    pub fn size(&self, id: NodeId) -> Option<Size> {
        self.node_opt(id).map(|n| n.size)
    }

    /// Local origin: the origin mapping applied to `(position, size)`, plus the gesture offset.
    #[must_use]
    pub fn origin(&self, id: NodeId) -> Option<Point> {
        self.derived(id).map(|d| d.origin)
    }

    /// World-space origin: the local origin plus the parent's world origin.
    #[must_use]
    pub fn world_origin(&self, id: NodeId) -> Option<Point> {
        self.derived(id).map(|d| d.world_origin)
    }

    /// World-space position: position plus gesture offset plus the parent's world origin.
    #[must_use]
    pub fn world_position(&self, id: NodeId) -> Option<Point> {
        self.derived(id).map(|d| d.world_position)
    }

    /// World-space box: world origin ⊕ size.
    #[must_use]
    pub fn bounds(&self, id: NodeId) -> Option<Rect> {
        let size = self.node_opt(id)?.size;
        self.world_origin(id)
            .map(|origin| rect_from_origin_size(origin, size))
    }

    /// Center of the world-space box.
    #[must_use]
    pub fn center(&self, id: NodeId) -> Option<Point> {
        self.bounds(id).map(|b| b.center())
    }

    /// Revision of a node's derived values.
    ///
    /// Bumped each time a recompute produces values different from the cached
    /// ones, so callers can detect world-space movement without comparing
    /// geometry themselves.
    #[must_use]
    pub fn revision(&self, id: NodeId) -> Option<u64> {
        self.node_opt(id).map(|n| n.revision.get())
    }

    /// Returns `true` if the node's derived values will be recomputed on the next read.
    #[must_use]
    pub fn is_dirty(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some_and(|n| n.dirty.get())
    }

    /// Graph generation, bumped on every input write.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Total number of derived-value recomputes performed so far.
    #[must_use]
    pub fn recompute_count(&self) -> u64 {
        self.recomputes.get()
    }

    /// Drains the nodes invalidated since the last call.
    ///
    /// Each live node appears at most once; removed nodes are skipped.
    pub fn take_invalidated(&mut self) -> Vec<NodeId> {
        let drained = core::mem::take(&mut self.invalidated);
        for id in &drained {
            if let Some(n) = self.node_opt_mut(*id) {
                n.queued = false;
            }
        }
        drained
    }

    fn derived(&self, id: NodeId) -> Option<Derived> {
        let node = self.node_opt(id)?;
        if !node.dirty.get() {
            return Some(node.cache.get());
        }
        // Walk up to the first clean ancestor, then recompute top-down.
        let mut chain: SmallVec<[&Node; 16]> = SmallVec::new();
        let mut parent_origin = Vec2::ZERO;
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if !current.dirty.get() {
                parent_origin = current.cache.get().world_origin.to_vec2();
                break;
            }
            chain.push(current);
            cursor = current.parent.and_then(|p| self.node_opt(p));
        }
        let mut fresh = None;
        for current in chain.into_iter().rev() {
            let derived = self.recompute(current, parent_origin);
            parent_origin = derived.world_origin.to_vec2();
            fresh = Some(derived);
        }
        fresh
    }

    fn recompute(&self, node: &Node, parent_origin: Vec2) -> Derived {
        let origin = node.origin.resolve(node.position, node.size) + node.gesture_offset;
        let fresh = Derived {
            origin,
            world_origin: origin + parent_origin,
            world_position: node.position + node.gesture_offset + parent_origin,
        };
        if fresh != node.cache.get() {
            node.revision.set(node.revision.get().wrapping_add(1));
        }
        node.cache.set(fresh);
        node.dirty.set(false);
        self.recomputes.set(self.recomputes.get().wrapping_add(1));
        fresh
    }

    fn validate_parent(&self, id: NodeId, parent: Option<NodeId>) -> Result<(), TransformError> {
        let Some(parent) = parent else {
            return Ok(());
        };
        if parent == id {
            return Err(TransformError::SelfParent(id));
        }
        if !self.is_alive(parent) {
            return Err(TransformError::UnknownParent(parent));
        }
        if self.is_ancestor(id, parent) {
            return Err(TransformError::Cycle { node: id, parent });
        }
        Ok(())
    }

    /// Reparents a validated node, renormalizing its local position.
    fn reparent(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<(), TransformError> {
        let Some(old_parent) = self.node_opt(id).map(|n| n.parent) else {
            return Err(TransformError::UnknownNode(id));
        };
        if old_parent == parent {
            return Ok(());
        }
        let old_frame = self.frame_origin(old_parent);
        let new_frame = self.frame_origin(parent);

        if let Some(old) = old_parent {
            self.unlink(id, old);
        }
        if let Some(p) = parent {
            self.link(id, p);
        }
        if let Some(node) = self.node_opt_mut(id) {
            node.position += old_frame - new_frame;
        }
        self.bump_generation();
        self.invalidate_subtree(id);
        Ok(())
    }

    /// World origin a child of `parent` is positioned against.
    fn frame_origin(&self, parent: Option<NodeId>) -> Vec2 {
        parent
            .and_then(|p| self.world_origin(p))
            .map_or(Vec2::ZERO, Point::to_vec2)
    }

    fn link(&mut self, child: NodeId, parent: NodeId) {
        if let Some(c) = self.node_opt_mut(child) {
            c.parent = Some(parent);
        }
        if let Some(p) = self.node_opt_mut(parent) {
            p.children.push(child);
        }
    }

    fn unlink(&mut self, child: NodeId, parent: NodeId) {
        if let Some(c) = self.node_opt_mut(child) {
            c.parent = None;
        }
        if let Some(p) = self.node_opt_mut(parent) {
            p.children.retain(|c| *c != child);
        }
    }

    fn invalidate_subtree(&mut self, id: NodeId) {
        let mut stack: SmallVec<[NodeId; 16]> = SmallVec::new();
        stack.push(id);
        while let Some(current) = stack.pop() {
            let Some(n) = self.node_opt_mut(current) else {
                continue;
            };
            n.dirty.set(true);
            let newly_queued = !n.queued;
            n.queued = true;
            stack.extend(n.children.iter().copied());
            if newly_queued {
                self.invalidated.push(current);
            }
        }
    }

    fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.idx())?
            .as_ref()
            .filter(|n| n.generation == id.1)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.idx())?
            .as_mut()
            .filter(|n| n.generation == id.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::boxed::Box;

    fn leaf(graph: &mut TransformGraph, x: f64, y: f64) -> NodeId {
        graph
            .insert(TransformInit::new(Point::new(x, y), Size::new(10.0, 10.0)))
            .unwrap()
    }

    #[test]
    fn root_world_origin_is_position() {
        let mut g = TransformGraph::new();
        let n = leaf(&mut g, 10.0, 10.0);
        assert_eq!(g.world_origin(n), Some(Point::new(10.0, 10.0)));
        assert_eq!(g.bounds(n), Some(Rect::new(10.0, 10.0, 20.0, 20.0)));
        assert_eq!(g.center(n), Some(Point::new(15.0, 15.0)));
    }

    #[test]
    fn reparent_preserves_world_position() {
        let mut g = TransformGraph::new();
        let n = leaf(&mut g, 10.0, 10.0);
        let p = leaf(&mut g, 100.0, 100.0);
        g.set_parent(n, Some(p)).unwrap();
        assert_eq!(g.position(n), Some(Point::new(-90.0, -90.0)));
        assert_eq!(g.world_origin(n), Some(Point::new(10.0, 10.0)));
        assert_eq!(g.children(p), &[n]);

        g.set_parent(n, None).unwrap();
        assert_eq!(g.position(n), Some(Point::new(10.0, 10.0)));
        assert!(g.children(p).is_empty());
    }

    #[test]
    fn self_and_cyclic_parenting_fail_without_mutation() {
        let mut g = TransformGraph::new();
        let a = leaf(&mut g, 0.0, 0.0);
        let b = leaf(&mut g, 5.0, 5.0);
        let c = leaf(&mut g, 7.0, 7.0);
        g.set_parent(b, Some(a)).unwrap();
        g.set_parent(c, Some(b)).unwrap();

        assert_eq!(g.set_parent(a, Some(a)), Err(TransformError::SelfParent(a)));
        assert_eq!(
            g.set_parent(a, Some(c)),
            Err(TransformError::Cycle { node: a, parent: c })
        );

        // An update carrying a bad parent must not apply its other fields.
        let err = g.apply(
            a,
            TransformUpdate::new()
                .position(Point::new(50.0, 50.0))
                .parent(Some(b)),
        );
        assert_eq!(err, Err(TransformError::Cycle { node: a, parent: b }));
        assert_eq!(g.position(a), Some(Point::new(0.0, 0.0)));
        assert_eq!(g.parent(a), None);
    }

    #[test]
    fn custom_origin_under_a_parent() {
        let mut g = TransformGraph::new();
        let p = leaf(&mut g, 100.0, 100.0);
        // Anchored at the top-right corner.
        let top_right = Origin::Custom(Box::new(|pos: Point, size: Size| {
            Point::new(pos.x - size.width, pos.y)
        }));
        let n = g
            .insert(
                TransformInit::new(Point::new(50.0, 20.0), Size::new(30.0, 10.0))
                    .with_parent(p)
                    .with_origin(top_right),
            )
            .unwrap();
        assert_eq!(g.origin(n), Some(Point::new(20.0, 20.0)));
        assert_eq!(g.world_origin(n), Some(Point::new(120.0, 120.0)));
        assert_eq!(g.world_position(n), Some(Point::new(150.0, 120.0)));
        assert_eq!(g.bounds(n), Some(Rect::new(120.0, 120.0, 150.0, 130.0)));

        g.set_parent(n, None).unwrap();
        assert_eq!(g.position(n), Some(Point::new(150.0, 120.0)));
        assert_eq!(g.origin(n), Some(Point::new(120.0, 120.0)));
        assert_eq!(g.world_origin(n), Some(Point::new(120.0, 120.0)));
        assert_eq!(g.bounds(n), Some(Rect::new(120.0, 120.0, 150.0, 130.0)));

        // Resizing moves the left edge, not the anchor.
        g.set_size(n, Size::new(50.0, 10.0));
        assert_eq!(g.bounds(n), Some(Rect::new(100.0, 120.0, 150.0, 130.0)));
    }

    #[test]
    fn very_deep_chains_resolve() {
        let mut g = TransformGraph::new();
        let root = leaf(&mut g, 0.0, 0.0);
        let mut tip = root;
        for _ in 0..100_000 {
            tip = g
                .insert(TransformInit::new(Point::new(1.0, 0.0), Size::ZERO).with_parent(tip))
                .unwrap();
        }
        assert_eq!(g.world_origin(tip), Some(Point::new(100_000.0, 0.0)));

        g.set_position(root, Point::new(0.0, 5.0));
        assert_eq!(g.world_origin(tip), Some(Point::new(100_000.0, 5.0)));
    }

    #[test]
    fn gesture_offset_commit_and_discard() {
        let mut g = TransformGraph::new();
        let n = leaf(&mut g, 10.0, 10.0);

        g.set_gesture_offset(n, Vec2::new(5.0, -5.0));
        assert_eq!(g.position(n), Some(Point::new(10.0, 10.0)));
        assert_eq!(g.world_position(n), Some(Point::new(15.0, 5.0)));

        g.discard_gesture_offset(n);
        assert_eq!(g.world_position(n), Some(Point::new(10.0, 10.0)));

        g.set_gesture_offset(n, Vec2::new(5.0, -5.0));
        g.apply_gesture_offset(n);
        assert_eq!(g.position(n), Some(Point::new(15.0, 5.0)));
        assert_eq!(g.gesture_offset(n), Some(Vec2::ZERO));
        assert_eq!(g.world_position(n), Some(Point::new(15.0, 5.0)));
    }

    #[test]
    fn reparent_during_gesture_keeps_offset() {
        let mut g = TransformGraph::new();
        let n = leaf(&mut g, 10.0, 10.0);
        let p = leaf(&mut g, 100.0, 100.0);
        g.set_gesture_offset(n, Vec2::new(3.0, 4.0));
        let before = g.world_position(n).unwrap();

        g.set_parent(n, Some(p)).unwrap();
        assert_eq!(g.gesture_offset(n), Some(Vec2::new(3.0, 4.0)));
        assert_eq!(g.position(n), Some(Point::new(-90.0, -90.0)));
        assert_eq!(g.world_position(n), Some(before));
    }

    #[test]
    fn reads_are_memoized_until_a_relevant_write() {
        let mut g = TransformGraph::new();
        let p = leaf(&mut g, 100.0, 100.0);
        let c = g
            .insert(TransformInit::new(Point::new(1.0, 1.0), Size::new(1.0, 1.0)).with_parent(p))
            .unwrap();
        let other = leaf(&mut g, 0.0, 0.0);

        let _ = g.world_origin(c);
        let _ = g.world_origin(other);
        let count = g.recompute_count();
        let _ = g.world_origin(c);
        let _ = g.bounds(c);
        assert_eq!(g.recompute_count(), count, "clean reads must not recompute");

        // Writing to an unrelated node leaves `c` clean.
        g.set_position(other, Point::new(3.0, 3.0));
        assert!(!g.is_dirty(c));

        // Writing to the parent dirties the child.
        g.set_position(p, Point::new(200.0, 200.0));
        assert!(g.is_dirty(c));
        assert_eq!(g.world_origin(c), Some(Point::new(201.0, 201.0)));
    }

    #[test]
    fn center_origin_offsets_bounds() {
        let mut g = TransformGraph::new();
        let n = g
            .insert(
                TransformInit::new(Point::new(50.0, 50.0), Size::new(20.0, 10.0))
                    .with_origin(Origin::Center),
            )
            .unwrap();
        assert_eq!(g.bounds(n), Some(Rect::new(40.0, 45.0, 60.0, 55.0)));
        assert_eq!(g.world_position(n), Some(Point::new(50.0, 50.0)));
    }

    #[test]
    fn removing_a_parent_detaches_children_in_place() {
        let mut g = TransformGraph::new();
        let p = leaf(&mut g, 100.0, 100.0);
        let c = g
            .insert(TransformInit::new(Point::new(5.0, 5.0), Size::new(1.0, 1.0)).with_parent(p))
            .unwrap();
        assert!(g.remove(p));
        assert!(!g.is_alive(p));
        assert_eq!(g.parent(c), None);
        assert_eq!(g.world_origin(c), Some(Point::new(105.0, 105.0)));
        // Stale handles read as absent.
        assert_eq!(g.bounds(p), None);
        assert!(!g.remove(p));
    }

    #[test]
    fn stale_handles_do_not_alias_reused_slots() {
        let mut g = TransformGraph::new();
        let a = leaf(&mut g, 0.0, 0.0);
        g.remove(a);
        let b = leaf(&mut g, 1.0, 1.0);
        assert_ne!(a, b);
        assert_eq!(g.position(a), None);
        assert_eq!(
            g.apply(a, TransformUpdate::new().position(Point::ZERO)),
            Err(TransformError::UnknownNode(a))
        );
    }

    #[test]
    fn invalidated_nodes_drain_once() {
        let mut g = TransformGraph::new();
        let p = leaf(&mut g, 0.0, 0.0);
        let c = g
            .insert(TransformInit::new(Point::ZERO, Size::ZERO).with_parent(p))
            .unwrap();
        let _ = g.take_invalidated();

        g.set_position(p, Point::new(1.0, 1.0));
        g.set_position(p, Point::new(2.0, 2.0));
        let drained = g.take_invalidated();
        assert_eq!(drained.len(), 2);
        assert!(drained.contains(&p) && drained.contains(&c));
        assert!(g.take_invalidated().is_empty());
    }

    #[test]
    fn revision_tracks_value_changes() {
        let mut g = TransformGraph::new();
        let n = leaf(&mut g, 0.0, 0.0);
        let _ = g.world_origin(n);
        let r0 = g.revision(n).unwrap();

        // Committing an offset moves nothing in world space.
        g.set_gesture_offset(n, Vec2::new(1.0, 0.0));
        let _ = g.world_origin(n);
        let r1 = g.revision(n).unwrap();
        assert_eq!(r1, r0 + 1);
        g.apply_gesture_offset(n);
        let _ = g.world_origin(n);
        assert_eq!(g.revision(n), Some(r1));
    }
}
