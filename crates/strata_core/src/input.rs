//! Pointer input primitives
//!
//! Raw pointer/wheel samples as delivered by the embedding host, before any
//! hit testing or dispatch. Positions are in device pixels; the container
//! converts to logical coordinates with its device pixel ratio.

use crate::geometry::{Point, Vec2};

/// Host-assigned pointer identifier (stable for the lifetime of a contact)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointerId(pub i32);

impl PointerId {
    /// The id hosts conventionally use for the primary mouse pointer
    pub const PRIMARY: PointerId = PointerId(1);
}

/// Keyboard modifier flags
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    bits: u8,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { bits: 0 };
    pub const SHIFT: u8 = 0b0001;
    pub const CTRL: u8 = 0b0010;
    pub const ALT: u8 = 0b0100;
    pub const META: u8 = 0b1000;

    pub const fn new(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Self {
        let mut bits = 0;
        if shift {
            bits |= Self::SHIFT;
        }
        if ctrl {
            bits |= Self::CTRL;
        }
        if alt {
            bits |= Self::ALT;
        }
        if meta {
            bits |= Self::META;
        }
        Self { bits }
    }

    pub const fn from_bits(bits: u8) -> Self {
        Self { bits }
    }

    pub const fn shift(&self) -> bool {
        self.bits & Self::SHIFT != 0
    }

    pub const fn ctrl(&self) -> bool {
        self.bits & Self::CTRL != 0
    }

    pub const fn alt(&self) -> bool {
        self.bits & Self::ALT != 0
    }

    pub const fn meta(&self) -> bool {
        self.bits & Self::META != 0
    }

    pub const fn any(&self) -> bool {
        self.bits != 0
    }
}

/// Kind of a raw pointer sample
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerInputKind {
    Down,
    Move,
    Up,
    Cancel,
    Click,
    Wheel,
}

/// One raw pointer/wheel sample from the host
#[derive(Clone, Copy, Debug)]
pub struct PointerInput {
    pub kind: PointerInputKind,
    pub pointer: PointerId,
    /// Position in device pixels
    pub position: Point,
    /// Pressed-button bitmask (DOM `buttons` semantics)
    pub buttons: u16,
    pub modifiers: Modifiers,
    /// Wheel delta; zero for non-wheel samples
    pub delta: Vec2,
    /// Host timestamp in milliseconds
    pub timestamp: f64,
}

impl PointerInput {
    /// Convenience constructor for a sample with no buttons or modifiers
    pub fn new(kind: PointerInputKind, pointer: PointerId, position: Point) -> Self {
        Self {
            kind,
            pointer,
            position,
            buttons: 0,
            modifiers: Modifiers::NONE,
            delta: Vec2::ZERO,
            timestamp: 0.0,
        }
    }

    pub fn with_buttons(mut self, buttons: u16) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_delta(mut self, delta: Vec2) -> Self {
        self.delta = delta;
        self
    }

    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }
}
