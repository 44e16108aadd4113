// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Seams to the rendering layer.

use alloc::rc::Rc;

use kurbo::Size;

/// A rendered element whose size the registry observes.
///
/// The registry only holds a weak handle; the rendering layer owns the element.
pub trait Element {
    /// Current measured size in world units, or `None` while not laid out.
    fn measured_size(&self) -> Option<Size>;
}

/// Resize-observation facility supplied by the rendering layer.
///
/// After [`observe`](Self::observe), the facility reports size changes back
/// through [`EntityRegistry::notify_resize`](crate::EntityRegistry::notify_resize).
pub trait ResizeObserver<K> {
    /// Starts observing `element` on behalf of entity `id`.
    fn observe(&mut self, id: K, element: &Rc<dyn Element>);
    /// Stops observing whatever element was observed for `id`.
    fn unobserve(&mut self, id: K);
}
