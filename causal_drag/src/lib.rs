// Copyright 2026 the Causal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Causal Drag: a deterministic state machine for pointer drag gestures.
//!
//! A [`DragSession`] turns a pointer-down → move → up sequence into a
//! start/drag/end protocol with an explicit early-abort path:
//!
//! - The session is created from the initiating pointer-down position and
//!   starts *armed*: movement within a small same-location tolerance is
//!   ignored, so an imprecise click never becomes a drag.
//! - The first move beyond the tolerance calls
//!   [`DragHandler::on_start`], which may veto the gesture.
//! - Every move while dragging calls [`DragHandler::on_drag`] with the
//!   origin and the total delta; it too may abort the gesture.
//! - Only a genuine pointer release reaches [`DragHandler::on_end`]; veto,
//!   escape, button-loss, and cancel paths abandon the session silently.
//!
//! ## Usage
//!
//! 1) Create the session inside your pointer-down handling with
//!    [`DragSession::new`] (or [`DragSession::with_config`]).
//! 2) Feed pointer moves with [`DragSession::on_move`], the release with
//!    [`DragSession::on_up`], and key transitions with
//!    [`DragSession::on_key_down`] / [`DragSession::on_key_up`].
//! 3) When any feed returns [`SessionStatus::Finished`], remove every
//!    listener you installed for the session — regardless of which exit
//!    path fired.
//!
//! ## Minimal example
//!
//! ```
//! use causal_drag::{DragControl, DragHandler, DragSession, SessionStatus};
//! use causal_events::Buttons;
//! use kurbo::{Point, Vec2};
//!
//! struct Mover {
//!     offset: Vec2,
//! }
//!
//! impl DragHandler for Mover {
//!     fn on_drag(&mut self, _origin: Point, delta: Vec2) -> DragControl {
//!         self.offset = delta;
//!         DragControl::Continue
//!     }
//! }
//!
//! let mut session = DragSession::new(Point::new(10.0, 10.0));
//! let mut mover = Mover { offset: Vec2::ZERO };
//! let held = Some(Buttons::PRIMARY);
//!
//! // A one-pixel jitter stays below the tolerance: no drag yet.
//! session.on_move(Point::new(11.0, 11.0), held, &mut mover);
//! assert_eq!(mover.offset, Vec2::ZERO);
//!
//! // Crossing the tolerance starts the drag and delivers the first delta.
//! session.on_move(Point::new(18.0, 10.0), held, &mut mover);
//! assert_eq!(mover.offset, Vec2::new(8.0, 0.0));
//!
//! let status = session.on_up(Point::new(18.0, 10.0), &mut mover);
//! assert!(matches!(status, SessionStatus::Finished(_)));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

#[cfg(test)]
extern crate alloc;

use causal_events::{Buttons, Key, SAME_LOCATION_EPSILON, same_location};
use kurbo::{Point, Vec2};

/// Configuration for a drag session.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragConfig {
    /// Same-location tolerance in device pixels; movement must exceed it on
    /// some axis before the gesture counts as a drag.
    pub epsilon: f64,
    /// Buttons that must stay held for the gesture to survive; a move event
    /// reporting none of them abandons the session.
    pub required: Buttons,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            epsilon: SAME_LOCATION_EPSILON,
            required: Buttons::PRIMARY,
        }
    }
}

/// What a drag callback decided about the gesture.
///
/// An explicit two-state enum rather than a boolean, so an abort is always
/// spelled out at the call site.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DragControl {
    /// Keep the gesture going.
    Continue,
    /// Abort the gesture; the session is abandoned and `on_end` never runs.
    Abort,
}

/// Why a session was abandoned without reaching `on_end`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AbandonReason {
    /// A move event reported the required button no longer held.
    ButtonReleased,
    /// `on_start` vetoed the gesture.
    StartVetoed,
    /// `on_drag` vetoed the gesture.
    DragVetoed,
    /// Escape was released during the session.
    Escape,
    /// The host cancelled the pointer sequence.
    Cancelled,
}

/// Terminal result of a session.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DragOutcome {
    /// The pointer was released; `on_end` ran. `dragged` records whether
    /// the move threshold was ever crossed.
    Completed {
        /// `true` when the session reached the dragging phase.
        dragged: bool,
    },
    /// The session ended without `on_end`.
    Abandoned(AbandonReason),
}

/// Status returned by every event feed.
///
/// [`SessionStatus::Finished`] obliges the embedder to remove all
/// session-scoped listeners; it is returned again (without further handler
/// calls) if events keep arriving afterwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// The session is still running.
    Active,
    /// The session terminated; tear down its listeners.
    Finished(DragOutcome),
}

/// Externally observable phase of a session.
///
/// "Idle" is represented by the absence of a session: a `DragSession` only
/// exists between pointer-down and one of the exit paths.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DragPhase {
    /// Armed but not yet past the same-location tolerance.
    Armed,
    /// Past the tolerance; `on_start` accepted the gesture.
    Dragging,
    /// Completed via pointer release.
    Ended,
    /// Ended without `on_end`.
    Abandoned,
}

/// Receiver for drag callbacks.
///
/// All methods have default bodies so a handler only implements what it
/// cares about; the defaults accept the gesture and ignore the end.
pub trait DragHandler {
    /// Called once, lazily, on the first move beyond the tolerance.
    ///
    /// Returning [`DragControl::Abort`] abandons the session before it
    /// enters the dragging phase; `on_end` will not run.
    fn on_start(&mut self, position: Point) -> DragControl {
        let _ = position;
        DragControl::Continue
    }

    /// Called on every move while dragging — including the move that
    /// crossed the tolerance — with the session origin and the total delta
    /// from it.
    ///
    /// Returning [`DragControl::Abort`] abandons the session; `on_end`
    /// will not run.
    fn on_drag(&mut self, origin: Point, delta: Vec2) -> DragControl {
        let _ = (origin, delta);
        DragControl::Continue
    }

    /// Called exactly once on a genuine pointer release. `dragged` is
    /// `true` when the tolerance was ever crossed.
    fn on_end(&mut self, position: Point, dragged: bool) {
        let _ = (position, dragged);
    }
}

enum State {
    Armed,
    Dragging,
    Finished(DragOutcome),
}

/// A single drag gesture from pointer-down to one of its exit paths.
///
/// The session stores no callbacks; every event feed takes the handler by
/// `&mut`, keeping the machine inert data between events.
pub struct DragSession {
    origin: Point,
    config: DragConfig,
    state: State,
}

impl core::fmt::Debug for DragSession {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DragSession")
            .field("origin", &self.origin)
            .field("phase", &self.phase())
            .field("config", &self.config)
            .finish()
    }
}

impl DragSession {
    /// Starts an armed session at the initiating pointer-down position.
    pub fn new(origin: Point) -> Self {
        Self::with_config(origin, DragConfig::default())
    }

    /// Starts an armed session with an explicit configuration.
    pub fn with_config(origin: Point, config: DragConfig) -> Self {
        Self {
            origin,
            config,
            state: State::Armed,
        }
    }

    /// The pointer-down position that seeded the session.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Externally observable phase.
    pub fn phase(&self) -> DragPhase {
        match self.state {
            State::Armed => DragPhase::Armed,
            State::Dragging => DragPhase::Dragging,
            State::Finished(DragOutcome::Completed { .. }) => DragPhase::Ended,
            State::Finished(DragOutcome::Abandoned(_)) => DragPhase::Abandoned,
        }
    }

    /// Returns `true` once the session reached a terminal state.
    pub fn is_finished(&self) -> bool {
        matches!(self.state, State::Finished(_))
    }

    fn finished(&self) -> Option<SessionStatus> {
        match self.state {
            State::Finished(outcome) => Some(SessionStatus::Finished(outcome)),
            _ => None,
        }
    }

    fn abandon(&mut self, reason: AbandonReason) -> SessionStatus {
        let outcome = DragOutcome::Abandoned(reason);
        self.state = State::Finished(outcome);
        SessionStatus::Finished(outcome)
    }

    /// Feeds a pointer move.
    ///
    /// `buttons` is the event's button bitmask; `None` means the source
    /// cannot report one (touch) and is treated as "still held". A bitmask
    /// without the required button abandons the session: the release
    /// happened outside our listeners' reach, so there is nothing to end.
    pub fn on_move<H: DragHandler + ?Sized>(
        &mut self,
        position: Point,
        buttons: Option<Buttons>,
        handler: &mut H,
    ) -> SessionStatus {
        if let Some(status) = self.finished() {
            return status;
        }
        if let Some(buttons) = buttons
            && !buttons.intersects(self.config.required)
        {
            return self.abandon(AbandonReason::ButtonReleased);
        }

        if matches!(self.state, State::Armed) {
            if same_location(self.origin, position, self.config.epsilon) {
                // Stationary jitter: not a drag yet.
                return SessionStatus::Active;
            }
            match handler.on_start(position) {
                DragControl::Abort => return self.abandon(AbandonReason::StartVetoed),
                DragControl::Continue => self.state = State::Dragging,
            }
        }

        // The move that crossed the tolerance also delivers the first delta.
        match handler.on_drag(self.origin, position - self.origin) {
            DragControl::Abort => self.abandon(AbandonReason::DragVetoed),
            DragControl::Continue => SessionStatus::Active,
        }
    }

    /// Feeds the pointer release: the only path that reaches
    /// [`DragHandler::on_end`].
    pub fn on_up<H: DragHandler + ?Sized>(&mut self, position: Point, handler: &mut H) -> SessionStatus {
        if let Some(status) = self.finished() {
            return status;
        }
        let dragged = matches!(self.state, State::Dragging);
        let outcome = DragOutcome::Completed { dragged };
        self.state = State::Finished(outcome);
        handler.on_end(position, dragged);
        SessionStatus::Finished(outcome)
    }

    /// Feeds a key press. Swallowed: the embedder should stop propagation
    /// (no page shortcuts mid-drag) but the session continues.
    pub fn on_key_down(&mut self) -> SessionStatus {
        self.finished().unwrap_or(SessionStatus::Active)
    }

    /// Feeds a key release. Escape abandons the session without `on_end`;
    /// every other key is ignored.
    pub fn on_key_up(&mut self, key: Key) -> SessionStatus {
        if let Some(status) = self.finished() {
            return status;
        }
        if key.is_escape() {
            self.abandon(AbandonReason::Escape)
        } else {
            SessionStatus::Active
        }
    }

    /// Feeds a host cancellation of the pointer sequence (the touch-cancel
    /// analogue). Abandons without `on_end`.
    pub fn on_cancel(&mut self) -> SessionStatus {
        if let Some(status) = self.finished() {
            return status;
        }
        self.abandon(AbandonReason::Cancelled)
    }
}
