// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The entity registry: lifecycle, transform routing, debounced indexing, queries.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt::{self, Debug};
use core::hash::Hash;
use core::time::Duration;

use expanse_geometry::{intersects, union_all};
use expanse_index::SpatialIndex;
use expanse_timing::TimerQueue;
use expanse_transform::{NodeId, TransformGraph, TransformInit, TransformUpdate};
use hashbrown::{HashMap, HashSet};
use kurbo::{Point, Rect, Size, Vec2};

use crate::config::RegistryConfig;
use crate::element::{Element, ResizeObserver};
use crate::error::RegistryError;
use crate::notify::{Callback, Notification, SubscriptionId};
use crate::types::{EntityData, EntityInit, EntityKind, EntityUpdate, Entry, Lifecycle};

/// Registry of canvas entities keyed by `K`, carrying payloads of metadata `M`.
///
/// Owns one transform node per entity, keeps a grid-hash spatial index of
/// their world bounds, and answers two-phase intersection queries.
///
/// ## Time
///
/// The registry runs on a logical clock advanced by the host with
/// [`advance_to`](Self::advance_to) or [`advance_by`](Self::advance_by).
/// Index updates after a transform change are debounced by
/// [`RegistryConfig::index_debounce`]; removals after
/// [`deregister`](Self::deregister) wait [`RegistryConfig::removal_grace`].
///
/// ## Queries never miss
///
/// An entity whose index entry is waiting on the debounce window is always
/// considered in phase one of [`get_intersections`](Self::get_intersections),
/// and phase two tests its live bounds, so a stale index entry can cost extra
/// work but never a missed result.
pub struct EntityRegistry<K, M> {
    config: RegistryConfig,
    graph: TransformGraph,
    entries: HashMap<K, Entry<K, M>>,
    by_node: HashMap<NodeId, K>,
    index: SpatialIndex<K>,
    index_timers: TimerQueue<K>,
    removal_timers: TimerQueue<K>,
    now: Duration,
    subscribers: HashMap<K, Vec<(SubscriptionId, Callback<K>)>>,
    baselines: HashMap<K, (Point, Size)>,
    pending: Vec<Notification<K>>,
    next_subscription: u64,
    observer: Option<Box<dyn ResizeObserver<K>>>,
}

impl<K: Debug, M> Debug for EntityRegistry<K, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityRegistry")
            .field("config", &self.config)
            .field("entries", &self.entries.len())
            .field("index", &self.index)
            .field("index_timers", &self.index_timers)
            .field("removal_timers", &self.removal_timers)
            .field("now", &self.now)
            .field("subscribed_ids", &self.subscribers.len())
            .field("has_observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Eq + Hash + Debug, M> Default for EntityRegistry<K, M> {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl<K: Copy + Eq + Hash + Debug, M> EntityRegistry<K, M> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            index: SpatialIndex::with_cell_size(config.cell_size),
            config,
            graph: TransformGraph::new(),
            entries: HashMap::new(),
            by_node: HashMap::new(),
            index_timers: TimerQueue::new(),
            removal_timers: TimerQueue::new(),
            now: Duration::ZERO,
            subscribers: HashMap::new(),
            baselines: HashMap::new(),
            pending: Vec::new(),
            next_subscription: 0,
            observer: None,
        }
    }

    /// Configuration in effect.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Installs the resize-observation facility, returning the previous one.
    pub fn set_resize_observer(
        &mut self,
        observer: Option<Box<dyn ResizeObserver<K>>>,
    ) -> Option<Box<dyn ResizeObserver<K>>> {
        core::mem::replace(&mut self.observer, observer)
    }

    // --- Lifecycle -------------------------------------------------------

    /// Registers `id`, or updates it in place if it is already present.
    ///
    /// On an existing id (active or pending removal) the transform inputs and
    /// data are updated, a pending removal is cancelled, and the same entry
    /// (same transform node, same subscribers) is kept. A new id gets a fresh
    /// node, is indexed immediately and emits [`Notification::EntryReplaced`].
    ///
    /// The parent is named by entity id and must be present. Parent errors
    /// leave the registry unchanged.
    pub fn register(
        &mut self,
        id: K,
        init: EntityInit<K>,
        data: EntityData<M>,
    ) -> Result<&Entry<K, M>, RegistryError<K>> {
        let EntityInit {
            position,
            size,
            parent,
            origin,
        } = init;
        let parent = match parent {
            Some(p) => Some(self.node_of_any(p).ok_or(RegistryError::UnknownParent(p))?),
            None => None,
        };

        if let Some(node) = self.entries.get(&id).map(|e| e.node) {
            self.graph.apply(
                node,
                TransformUpdate::new()
                    .parent(parent)
                    .position(position)
                    .size(size),
            )?;
            self.graph.set_origin(node, origin);
            self.removal_timers.cancel(id);
            let revived = if let Some(entry) = self.entries.get_mut(&id) {
                entry.data = data;
                let revived = !entry.is_active();
                entry.lifecycle = Lifecycle::Active;
                revived
            } else {
                false
            };
            #[cfg(feature = "tracing")]
            tracing::debug!(id = ?id, revived, "entity updated in place");
            self.flush();
            if revived {
                self.settle(id);
            }
        } else {
            let mut transform = TransformInit::new(position, size).with_origin(origin);
            if let Some(p) = parent {
                transform = transform.with_parent(p);
            }
            let node = self.graph.insert(transform)?;
            self.entries.insert(id, Entry::new(id, node, data));
            self.by_node.insert(node, id);
            self.pending.push(Notification::EntryReplaced { id });
            #[cfg(feature = "tracing")]
            tracing::debug!(id = ?id, node = ?node, "entity registered");
            self.flush();
            self.settle(id);
        }
        self.entries.get(&id).ok_or(RegistryError::UnknownEntity(id))
    }

    /// Marks `id` for removal after the grace window.
    ///
    /// A [`register`](Self::register) for the same id before the window
    /// elapses cancels the removal. With a zero grace window the entity is
    /// removed immediately. Returns `false` if `id` is not active.
    pub fn deregister(&mut self, id: K) -> bool {
        let grace = self.config.removal_grace;
        let deadline = self.now.saturating_add(grace);
        let Some(entry) = self.entries.get_mut(&id).filter(|e| e.is_active()) else {
            return false;
        };
        if grace.is_zero() {
            self.remove_now(id);
            return true;
        }
        entry.lifecycle = Lifecycle::PendingRemoval { deadline };
        self.removal_timers.schedule(id, deadline);
        #[cfg(feature = "tracing")]
        tracing::debug!(id = ?id, deadline = ?deadline, "entity pending removal");
        true
    }

    fn remove_now(&mut self, id: K) {
        let Some(entry) = self.entries.remove(&id) else {
            return;
        };
        // Children keep their world position and become roots.
        self.graph.remove(entry.node);
        self.by_node.remove(&entry.node);
        self.index.remove(id);
        self.index_timers.cancel(id);
        self.removal_timers.cancel(id);
        self.baselines.remove(&id);
        if entry.element.is_some()
            && let Some(observer) = self.observer.as_mut()
        {
            observer.unobserve(id);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(id = ?id, "entity removed");
        self.flush();
    }

    // --- Time --------------------------------------------------------------

    /// Current logical time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Earliest pending deadline (index debounce or removal), if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        match (
            self.index_timers.next_deadline(),
            self.removal_timers.next_deadline(),
        ) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Advances the logical clock to `now`, firing every due timer in deadline order.
    ///
    /// Time never runs backwards; an earlier `now` is ignored.
    pub fn advance_to(&mut self, now: Duration) {
        if now < self.now {
            return;
        }
        while let Some(deadline) = self.next_deadline().filter(|d| *d <= now) {
            self.now = deadline;
            for id in self.removal_timers.drain_due(deadline) {
                if self.entries.get(&id).is_some_and(|e| !e.is_active()) {
                    self.remove_now(id);
                } else {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(id = ?id, "removal skipped: entity no longer pending");
                }
            }
            for id in self.index_timers.drain_due(deadline) {
                if !self.reindex(id) {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(id = ?id, "index update skipped: entity not active");
                }
            }
            self.flush();
        }
        self.now = now;
    }

    /// Advances the logical clock by `dt`.
    pub fn advance_by(&mut self, dt: Duration) {
        self.advance_to(self.now.saturating_add(dt));
    }

    // --- Transform writes ------------------------------------------------

    /// Applies a batch of transform changes atomically.
    pub fn apply(&mut self, id: K, update: EntityUpdate<K>) -> Result<(), RegistryError<K>> {
        let node = self.active_node(id)?;
        let parent = match update.parent {
            Some(Some(p)) => Some(Some(
                self.node_of_any(p).ok_or(RegistryError::UnknownParent(p))?,
            )),
            Some(None) => Some(None),
            None => None,
        };
        self.graph.apply(
            node,
            TransformUpdate {
                position: update.position,
                size: update.size,
                parent,
            },
        )?;
        self.flush();
        Ok(())
    }

    /// Changes the parent of `id`, preserving its world position.
    pub fn set_parent(&mut self, id: K, parent: Option<K>) -> Result<(), RegistryError<K>> {
        self.apply(id, EntityUpdate::new().parent(parent))
    }

    /// Sets the transient gesture offset of `id`.
    pub fn set_gesture_offset(&mut self, id: K, offset: Vec2) -> Result<(), RegistryError<K>> {
        let node = self.active_node(id)?;
        self.graph.set_gesture_offset(node, offset);
        self.flush();
        Ok(())
    }

    /// Commits the gesture offset of `id` into its position.
    pub fn apply_gesture_offset(&mut self, id: K) -> Result<(), RegistryError<K>> {
        let node = self.active_node(id)?;
        self.graph.apply_gesture_offset(node);
        self.flush();
        Ok(())
    }

    /// Drops the gesture offset of `id`.
    pub fn discard_gesture_offset(&mut self, id: K) -> Result<(), RegistryError<K>> {
        let node = self.active_node(id)?;
        self.graph.discard_gesture_offset(node);
        self.flush();
        Ok(())
    }

    // --- Index -------------------------------------------------------------

    /// Updates the index entry of `id` now, skipping the debounce window.
    ///
    /// Returns `false` if `id` is not active.
    pub fn settle(&mut self, id: K) -> bool {
        self.index_timers.cancel(id);
        let settled = self.reindex(id);
        #[cfg(feature = "tracing")]
        if settled {
            tracing::debug!(id = ?id, "index settled");
        }
        settled
    }

    /// Settles every pending index update.
    pub fn settle_all(&mut self) {
        for id in self.index_timers.drain_due(Duration::MAX) {
            self.reindex(id);
        }
    }

    /// Returns `true` if `id` has an index update waiting on the debounce window.
    pub fn has_pending_index(&self, id: K) -> bool {
        self.index_timers.is_scheduled(id)
    }

    fn reindex(&mut self, id: K) -> bool {
        let Some(bounds) = self
            .entries
            .get(&id)
            .filter(|e| e.is_active())
            .and_then(|e| self.graph.bounds(e.node))
        else {
            return false;
        };
        self.index.replace(id, bounds);
        true
    }

    // --- Elements ----------------------------------------------------------

    /// Attaches `element` to `id` (or detaches with `None`) and starts observing its size.
    ///
    /// The registry keeps only a weak handle. The entity size becomes the
    /// element's measured size, or zero when detached or not yet measured.
    pub fn observe_element(
        &mut self,
        id: K,
        element: Option<&Rc<dyn Element>>,
    ) -> Result<(), RegistryError<K>> {
        let entry = self
            .entries
            .get_mut(&id)
            .filter(|e| e.is_active())
            .ok_or(RegistryError::UnknownEntity(id))?;
        let was_attached = entry.is_attached();
        let had_element = entry.element.is_some();
        let node = entry.node;
        let size = match element {
            Some(element) => {
                entry.element = Some(Rc::downgrade(element));
                element.measured_size().unwrap_or(Size::ZERO)
            }
            None => {
                entry.element = None;
                Size::ZERO
            }
        };
        if let Some(observer) = self.observer.as_mut() {
            if had_element {
                observer.unobserve(id);
            }
            if let Some(element) = element {
                observer.observe(id, element);
            }
        }
        let attached = element.is_some();
        if attached != was_attached {
            self.pending
                .push(Notification::ElementChanged { id, attached });
        }
        self.graph.set_size(node, size);
        self.flush();
        Ok(())
    }

    /// Reports an observed resize for `id`.
    ///
    /// If the observed element has since been dropped it is detached and the
    /// size becomes zero. Returns `false` if `id` is not active.
    pub fn notify_resize(&mut self, id: K, size: Size) -> bool {
        let Some(entry) = self.entries.get(&id).filter(|e| e.is_active()) else {
            return false;
        };
        if entry.element.is_some() && !entry.is_attached() {
            self.detach_dead(id);
        } else {
            let node = entry.node;
            self.graph.set_size(node, size);
        }
        self.flush();
        true
    }

    /// Re-reads every observed element: dropped elements are detached, live
    /// ones have their measured size applied.
    pub fn sync_elements(&mut self) {
        let mut dead = Vec::new();
        let mut sizes = Vec::new();
        for entry in self.entries.values().filter(|e| e.is_active()) {
            match (&entry.element, entry.element()) {
                (Some(_), None) => dead.push(entry.id),
                (_, Some(element)) => {
                    if let Some(size) = element.measured_size() {
                        sizes.push((entry.node, size));
                    }
                }
                (None, None) => {}
            }
        }
        for id in dead {
            self.detach_dead(id);
        }
        for (node, size) in sizes {
            self.graph.set_size(node, size);
        }
        self.flush();
    }

    fn detach_dead(&mut self, id: K) {
        let Some(entry) = self.entries.get_mut(&id) else {
            return;
        };
        entry.element = None;
        let node = entry.node;
        if let Some(observer) = self.observer.as_mut() {
            observer.unobserve(id);
        }
        self.pending.push(Notification::ElementChanged {
            id,
            attached: false,
        });
        self.graph.set_size(node, Size::ZERO);
    }

    // --- Notifications -------------------------------------------------------

    /// Subscribes `callback` to notifications for `id`.
    ///
    /// The subscription is keyed by id, so it survives removal and
    /// re-registration of the entity.
    pub fn subscribe(
        &mut self,
        id: K,
        callback: impl FnMut(&Notification<K>) + 'static,
    ) -> SubscriptionId {
        let sub = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        if let Some(node) = self.entries.get(&id).map(|e| e.node)
            && let (Some(origin), Some(size)) = (self.graph.world_origin(node), self.graph.size(node))
        {
            self.baselines.entry(id).or_insert((origin, size));
        }
        self.subscribers
            .entry(id)
            .or_default()
            .push((sub, Box::new(callback)));
        sub
    }

    /// Cancels a subscription. Returns `false` if it was not found.
    pub fn unsubscribe(&mut self, subscription: SubscriptionId) -> bool {
        let Some(id) = self
            .subscribers
            .iter()
            .find(|(_, subs)| subs.iter().any(|(s, _)| *s == subscription))
            .map(|(id, _)| *id)
        else {
            return false;
        };
        if let Some(subs) = self.subscribers.get_mut(&id) {
            subs.retain(|(s, _)| *s != subscription);
            if subs.is_empty() {
                self.subscribers.remove(&id);
                self.baselines.remove(&id);
            }
        }
        true
    }

    /// Propagates pending graph invalidations: schedules index updates and
    /// delivers notifications.
    fn flush(&mut self) {
        let debounce = self.config.index_debounce;
        for node in self.graph.take_invalidated() {
            let Some(&id) = self.by_node.get(&node) else {
                continue;
            };
            if self.entries.get(&id).is_some_and(|e| e.is_active()) {
                if debounce.is_zero() {
                    self.reindex(id);
                } else {
                    self.index_timers.schedule_after(id, self.now, debounce);
                }
            }
            if self.subscribers.contains_key(&id) {
                self.check_changes(id, node);
            }
        }
        self.dispatch();
    }

    fn check_changes(&mut self, id: K, node: NodeId) {
        let (Some(origin), Some(size)) = (self.graph.world_origin(node), self.graph.size(node))
        else {
            return;
        };
        let Some(baseline) = self.baselines.get_mut(&id) else {
            self.baselines.insert(id, (origin, size));
            return;
        };
        if baseline.0 != origin {
            baseline.0 = origin;
            self.pending.push(Notification::OriginChanged { id, origin });
        }
        if baseline.1 != size {
            baseline.1 = size;
            self.pending.push(Notification::SizeChanged { id, size });
        }
    }

    fn dispatch(&mut self) {
        let pending = core::mem::take(&mut self.pending);
        for notification in &pending {
            if let Some(subs) = self.subscribers.get_mut(&notification.id()) {
                for (_, callback) in subs.iter_mut() {
                    callback(notification);
                }
            }
        }
    }

    // --- Queries -------------------------------------------------------------

    /// Two-phase intersection query.
    ///
    /// Phase one collects candidates from the spatial index (plus every
    /// entity with a pending index update); phase two keeps the active ones
    /// that pass `filter` and whose live bounds pass
    /// [`intersects`](expanse_geometry::intersects) with `threshold`.
    pub fn get_intersections(
        &self,
        query: Rect,
        threshold: f64,
        filter: Option<&dyn Fn(K, &EntityData<M>) -> bool>,
    ) -> Vec<K> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut consider = |id: K| {
            if !seen.insert(id) {
                return;
            }
            let Some(entry) = self.entries.get(&id).filter(|e| e.is_active()) else {
                return;
            };
            if filter.is_some_and(|f| !f(id, &entry.data)) {
                return;
            }
            if let Some(bounds) = self.graph.bounds(entry.node)
                && intersects(bounds, query, threshold)
            {
                out.push(id);
            }
        };
        self.index.visit_rect(query, &mut consider);
        for id in self.index_timers.keys() {
            consider(id);
        }
        out
    }

    /// Entities intersecting the live bounds of `id`, excluding `id` itself.
    ///
    /// Empty if `id` is not active.
    pub fn intersections_of(
        &self,
        id: K,
        threshold: f64,
        filter: Option<&dyn Fn(K, &EntityData<M>) -> bool>,
    ) -> Vec<K> {
        let Some(bounds) = self.get_current_bounds(id) else {
            return Vec::new();
        };
        let mut hits = self.get_intersections(bounds, threshold, filter);
        hits.retain(|hit| *hit != id);
        hits
    }

    /// Entities whose bounds contain `point`, edges included.
    pub fn hit_test(&self, point: Point) -> Vec<K> {
        self.get_intersections(Rect::from_points(point, point), 0.0, None)
    }

    /// Live world bounds of `id`.
    pub fn get_current_bounds(&self, id: K) -> Option<Rect> {
        self.active_node(id)
            .ok()
            .and_then(|node| self.graph.bounds(node))
    }

    /// Bounding box of every active entity, or `None` when there are none.
    pub fn get_current_container(&self) -> Option<Rect> {
        union_all(
            self.entries
                .values()
                .filter(|e| e.is_active())
                .filter_map(|e| self.graph.bounds(e.node)),
        )
    }

    // --- Reads -------------------------------------------------------------

    /// The active entry for `id`.
    pub fn entry(&self, id: K) -> Option<&Entry<K, M>> {
        self.entries.get(&id).filter(|e| e.is_active())
    }

    /// Mutable payload of the active entry for `id`.
    pub fn data_mut(&mut self, id: K) -> Option<&mut EntityData<M>> {
        self.entries
            .get_mut(&id)
            .filter(|e| e.is_active())
            .map(|e| &mut e.data)
    }

    /// Iterates over active entries in arbitrary order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry<K, M>> + '_ {
        self.entries.values().filter(|e| e.is_active())
    }

    /// Ids of active entries of the given kind.
    pub fn ids_of_kind(&self, kind: EntityKind) -> impl Iterator<Item = K> + '_ {
        self.entries()
            .filter(move |e| e.data.kind == kind)
            .map(|e| e.id)
    }

    /// Number of active entries.
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    /// Returns `true` if there are no active entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `id` is deregistered and waiting out its grace window.
    pub fn is_pending_removal(&self, id: K) -> bool {
        self.entries.get(&id).is_some_and(|e| !e.is_active())
    }

    /// Committed local position.
    pub fn position(&self, id: K) -> Option<Point> {
        self.active_node(id).ok().and_then(|n| self.graph.position(n))
    }

    /// Size.
    pub fn size(&self, id: K) -> Option<Size> {
        self.active_node(id).ok().and_then(|n| self.graph.size(n))
    }

    /// Gesture offset.
    pub fn gesture_offset(&self, id: K) -> Option<Vec2> {
        self.active_node(id)
            .ok()
            .and_then(|n| self.graph.gesture_offset(n))
    }

    /// World origin (top-left of the bounds).
    pub fn world_origin(&self, id: K) -> Option<Point> {
        self.active_node(id)
            .ok()
            .and_then(|n| self.graph.world_origin(n))
    }

    /// World position.
    pub fn world_position(&self, id: K) -> Option<Point> {
        self.active_node(id)
            .ok()
            .and_then(|n| self.graph.world_position(n))
    }

    /// Parent entity.
    pub fn parent(&self, id: K) -> Option<K> {
        let node = self.active_node(id).ok()?;
        self.graph
            .parent(node)
            .and_then(|p| self.by_node.get(&p).copied())
    }

    /// Direct children of `id`.
    pub fn children(&self, id: K) -> Vec<K> {
        let Ok(node) = self.active_node(id) else {
            return Vec::new();
        };
        self.graph
            .children(node)
            .iter()
            .filter_map(|c| self.by_node.get(c).copied())
            .collect()
    }

    /// Returns `true` if any ancestor of `id` satisfies `predicate`.
    pub fn any_parent_is(&self, id: K, mut predicate: impl FnMut(K, &EntityData<M>) -> bool) -> bool {
        let Ok(node) = self.active_node(id) else {
            return false;
        };
        self.graph.any_parent_is(node, |ancestor| {
            self.by_node
                .get(&ancestor)
                .and_then(|k| self.entries.get(k))
                .is_some_and(|e| predicate(e.id, &e.data))
        })
    }

    /// Number of ancestors of `id`; zero for roots and unknown ids.
    pub fn depth(&self, id: K) -> usize {
        self.node_of_any(id)
            .map_or(0, |node| self.graph.ancestors(node).count())
    }

    /// Returns `true` if `ancestor` is a strict ancestor of `id`.
    pub fn is_descendant_of(&self, id: K, ancestor: K) -> bool {
        match (self.node_of_any(id), self.node_of_any(ancestor)) {
            (Some(node), Some(ancestor)) => self.graph.is_ancestor(ancestor, node),
            _ => false,
        }
    }

    /// The underlying transform graph.
    pub fn graph(&self) -> &TransformGraph {
        &self.graph
    }

    /// The spatial index. Entries may lag live bounds by the debounce window.
    pub fn index(&self) -> &SpatialIndex<K> {
        &self.index
    }

    fn active_node(&self, id: K) -> Result<NodeId, RegistryError<K>> {
        self.entries
            .get(&id)
            .filter(|e| e.is_active())
            .map(|e| e.node)
            .ok_or(RegistryError::UnknownEntity(id))
    }

    fn node_of_any(&self, id: K) -> Option<NodeId> {
        self.entries.get(&id).map(|e| e.node)
    }
}
