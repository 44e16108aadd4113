// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture frames delivered by the recognition layer.

use kurbo::{Point, Vec2};

bitflags::bitflags! {
    /// Pointer buttons held during a frame.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PointerButtons: u8 {
        /// Primary button (usually left), or a single touch contact.
        const PRIMARY   = 0b0000_0001;
        /// Secondary button (usually right).
        const SECONDARY = 0b0000_0010;
        /// Auxiliary button (usually middle).
        const AUXILIARY = 0b0000_0100;
    }
}

bitflags::bitflags! {
    /// Modifier keys held during a frame.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT   = 0b0000_0001;
        /// Control.
        const CONTROL = 0b0000_0010;
        /// Alt / Option.
        const ALT     = 0b0000_0100;
        /// Meta / Command / Super.
        const META    = 0b0000_1000;
    }
}

/// One step of a pointer gesture, in screen space.
///
/// Multi-touch input is one compound gesture: `touches` counts the contacts,
/// `position` is their centroid and `scale` is the pinch factor relative to
/// the previous frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureFrame {
    /// Buttons held.
    pub buttons: PointerButtons,
    /// Modifier keys held.
    pub modifiers: Modifiers,
    /// Number of touch contacts; zero for mouse or pen input.
    pub touches: u8,
    /// Pointer (or touch centroid) position.
    pub position: Point,
    /// Movement since the previous frame.
    pub delta: Vec2,
    /// Pinch scale relative to the previous frame; `1.0` when not pinching.
    pub scale: f64,
    /// First frame of the gesture.
    pub first: bool,
    /// Last frame of the gesture.
    pub last: bool,
}

impl Default for GestureFrame {
    fn default() -> Self {
        Self {
            buttons: PointerButtons::empty(),
            modifiers: Modifiers::empty(),
            touches: 0,
            position: Point::ZERO,
            delta: Vec2::ZERO,
            scale: 1.0,
            first: false,
            last: false,
        }
    }
}

impl GestureFrame {
    /// First frame of a primary-button gesture at `position`.
    #[must_use]
    pub fn start(position: Point) -> Self {
        Self {
            buttons: PointerButtons::PRIMARY,
            position,
            first: true,
            ..Self::default()
        }
    }

    /// The following frame at `position`, carrying over buttons, modifiers and
    /// touches. `delta` is measured from `self`.
    #[must_use]
    pub fn next(&self, position: Point) -> Self {
        Self {
            position,
            delta: position - self.position,
            scale: 1.0,
            first: false,
            last: false,
            ..*self
        }
    }

    /// The final frame, at `position`.
    #[must_use]
    pub fn end(&self, position: Point) -> Self {
        Self {
            last: true,
            ..self.next(position)
        }
    }

    /// Sets the held buttons.
    #[must_use]
    pub fn with_buttons(mut self, buttons: PointerButtons) -> Self {
        self.buttons = buttons;
        self
    }

    /// Sets the held modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Sets the touch count.
    #[must_use]
    pub fn with_touches(mut self, touches: u8) -> Self {
        self.touches = touches;
        self
    }

    /// Sets the pinch scale.
    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Returns `true` if the primary button (or a single touch) is down.
    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.buttons.contains(PointerButtons::PRIMARY)
    }

    /// Returns `true` if two or more touch contacts are active.
    #[must_use]
    pub fn is_multi_touch(&self) -> bool {
        self.touches >= 2
    }

    /// Returns `true` if shift is held.
    #[must_use]
    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}
