// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag tracking: per-frame deltas and the total screen offset since the gesture began.
//!
//! ## Usage
//!
//! 1) Call [`DragTracker::start`] with the pointer position of the gesture's first frame.
//! 2) On each later frame, call [`DragTracker::update`] to get the delta since the previous frame.
//! 3) Read [`DragTracker::total_offset`] to drive a gesture offset.
//! 4) Call [`DragTracker::end`] on the last frame; it returns the final offset.
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use expanse_gesture::DragTracker;
//!
//! let mut drag = DragTracker::default();
//! drag.start(Point::new(10.0, 20.0));
//! assert_eq!(drag.update(Point::new(15.0, 25.0)), Some(Vec2::new(5.0, 5.0)));
//! assert_eq!(drag.update(Point::new(18.0, 21.0)), Some(Vec2::new(3.0, -4.0)));
//! assert_eq!(drag.total_offset(), Some(Vec2::new(8.0, 1.0)));
//! assert_eq!(drag.end(), Some(Vec2::new(8.0, 1.0)));
//! assert!(!drag.is_dragging());
//! ```

use kurbo::{Point, Vec2};

/// Tracks one drag in screen space.
#[derive(Debug, Clone, Default, Copy)]
pub struct DragTracker {
    /// Pointer position when the drag started.
    pub start_pos: Option<Point>,
    /// Last recorded pointer position.
    pub last_pos: Option<Point>,
}

impl DragTracker {
    /// Start tracking a drag from `pos`.
    pub fn start(&mut self, pos: Point) {
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
    }

    /// Record a new position, returning the movement since the previous one.
    ///
    /// Returns `None` when no drag is active.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        self.start_pos?;
        let delta = self.last_pos.map(|last| pos - last);
        self.last_pos = Some(pos);
        delta
    }

    /// Offset from the start position to the last recorded position.
    #[must_use]
    pub fn total_offset(&self) -> Option<Vec2> {
        Some(self.last_pos? - self.start_pos?)
    }

    /// End the drag, returning its final offset.
    pub fn end(&mut self) -> Option<Vec2> {
        let total = self.total_offset();
        self.start_pos = None;
        self.last_pos = None;
        total
    }

    /// Returns `true` while a drag is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.start_pos.is_some()
    }
}
