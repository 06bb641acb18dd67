// Copyright 2026 the Causal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input event types shared by the Causal interaction state machines.

use kurbo::Point;

bitflags::bitflags! {
    /// Mouse buttons currently held, as reported by a pointer event.
    ///
    /// Bit assignments follow the conventional `buttons` bitmask: the
    /// primary (usually left) button is bit 0.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Buttons: u8 {
        /// Primary button, usually the left mouse button.
        const PRIMARY   = 0b0000_0001;
        /// Secondary button, usually the right mouse button.
        const SECONDARY = 0b0000_0010;
        /// Auxiliary button, usually the wheel or middle button.
        const AUXILIARY = 0b0000_0100;
        /// Fourth button, typically browser-back.
        const FOURTH    = 0b0000_1000;
        /// Fifth button, typically browser-forward.
        const FIFTH     = 0b0001_0000;
    }
}

/// A key identity, reduced to what the interaction machines care about.
///
/// Everything that is not a recognized special key is [`Key::Other`]; the
/// machines in this family only ever branch on [`Key::Escape`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// The Escape key.
    Escape,
    /// The Enter / Return key.
    Enter,
    /// The Tab key.
    Tab,
    /// Any other key.
    Other,
}

impl Key {
    /// Returns `true` for the Escape key.
    pub const fn is_escape(self) -> bool {
        matches!(self, Self::Escape)
    }
}

/// Pointer event kinds.
///
/// Mouse and touch sequences are unified: a touch-start maps to `Down`, a
/// touch-end to `Up`, and a platform touch-cancel to `Cancel`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Press of a button or start of a touch.
    Down,
    /// Pointer movement.
    Move,
    /// Release of a button or end of a touch.
    Up,
    /// The host cancelled the pointer sequence.
    Cancel,
}

/// Key event kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// Key press.
    Down,
    /// Key release.
    Up,
}

/// Registry key for listeners: the union of pointer and key kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A pointer event of the given kind.
    Pointer(PointerKind),
    /// A key event of the given kind.
    Key(KeyKind),
}

/// A pointer input as fed by the embedder.
///
/// `buttons` is `None` when the source cannot report a button bitmask
/// (touch devices); consumers must treat an unknown bitmask as "still
/// held" rather than as a release.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerInput {
    /// Kind of pointer transition.
    pub kind: PointerKind,
    /// Pointer position in the embedder's coordinate space.
    pub position: Point,
    /// Buttons held at the time of the event, if known.
    pub buttons: Option<Buttons>,
}

impl PointerInput {
    /// Convenience constructor with a known button bitmask.
    pub const fn new(kind: PointerKind, position: Point, buttons: Buttons) -> Self {
        Self {
            kind,
            position,
            buttons: Some(buttons),
        }
    }
}

/// A key input as fed by the embedder.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyInput {
    /// Kind of key transition.
    pub kind: KeyKind,
    /// The key identity.
    pub key: Key,
}

/// What a listener decided about propagation.
///
/// Stopping is an explicit return value rather than a side effect on the
/// event, so dispatch stays deterministic and testable.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Keep delivering the event to later listeners.
    Continue,
    /// Stop propagation (and suppress the default action) without claiming
    /// the event.
    Stop,
    /// Stop propagation and claim the event as consumed.
    StopAndConsume,
}

/// Default same-location tolerance, in device pixels.
pub const SAME_LOCATION_EPSILON: f64 = 3.0;

/// Returns `true` when two positions are at "the same location".
///
/// The comparison is per-axis absolute difference, not Euclidean distance:
/// `|dx| < epsilon && |dy| < epsilon`. Commonly used to decide whether a
/// press-move-release sequence still counts as a click, or whether a drag
/// threshold has been crossed.
pub fn same_location(a: Point, b: Point, epsilon: f64) -> bool {
    let epsilon = if epsilon < 0.0 {
        SAME_LOCATION_EPSILON
    } else {
        epsilon
    };
    (a.x - b.x).abs() < epsilon && (a.y - b.y).abs() < epsilon
}
