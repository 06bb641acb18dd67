// Copyright 2026 the Causal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Causal Surface: embedder-side wiring for modal capture and drag.
//!
//! The interaction crates are pure state machines; something still has to
//! play the part of the document — own the listener set, install the
//! process-wide capture listeners when the first modal context opens,
//! install the session listeners when a drag starts, and remove both again
//! on every exit path. [`Surface`] is that something, kept host-agnostic:
//! the embedder translates native events into [`Input`] values and calls
//! [`Surface::dispatch`].
//!
//! ## Listener lifecycle
//!
//! - The first [`Surface::begin_capture`] installs two capturing
//!   listeners (pointer-down, key-down); the pop that empties the capture
//!   stack removes them. No dangling listeners, no double installs.
//! - [`Surface::begin_drag`] installs the session listeners
//!   (pointer-down/move/up/cancel, key-down/up); whichever exit path ends
//!   the session removes all of them.
//! - Listeners added or removed while a dispatch pass is running are
//!   queued and applied after the pass, so the listener set never mutates
//!   under iteration.
//!
//! ## Minimal example
//!
//! ```
//! use causal_capture::ParentLookup;
//! use causal_events::Buttons;
//! use causal_surface::{Input, Surface};
//! use kurbo::Point;
//!
//! // Scene: "panel" is a child of "dialog"; "page" is outside.
//! let tree = ParentLookup(|node: &&str| match *node {
//!     "panel" => Some("dialog"),
//!     _ => None,
//! });
//! let mut surface: Surface<&str, _> = Surface::new(tree);
//!
//! surface.begin_capture("dialog", |_| {});
//! assert_eq!(surface.listener_count(), 2);
//!
//! // A press inside the dialog is left alone.
//! let summary = surface.dispatch(Input::pointer_down(
//!     Point::new(5.0, 5.0),
//!     Buttons::PRIMARY,
//!     Some("panel"),
//! ));
//! assert!(!summary.consumed);
//!
//! // A press outside dismisses it and tears the listeners down.
//! let summary = surface.dispatch(Input::pointer_down(
//!     Point::new(900.0, 5.0),
//!     Buttons::PRIMARY,
//!     Some("page"),
//! ));
//! assert!(summary.consumed);
//! assert_eq!(summary.released, ["dialog"]);
//! assert_eq!(surface.listener_count(), 0);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;

use causal_capture::{CaptureDispatch, CaptureManager, Containment, PopTransition};
use causal_drag::{DragConfig, DragHandler, DragOutcome, DragSession, SessionStatus};
use causal_events::{
    Buttons, EventKind, Key, KeyInput, KeyKind, ListenerRegistry, ListenerToken, Outcome,
    PointerInput, PointerKind,
};
use kurbo::{Point, Vec2};

/// An input event routed through a [`Surface`].
///
/// `target` on pointer events is the node the press resolved to, `None`
/// when the press landed on bare ground — which the capture stack treats
/// as outside every region.
#[derive(Clone, Debug, PartialEq)]
pub enum Input<K> {
    /// A pointer transition, resolved against the scene.
    Pointer {
        /// The raw pointer event.
        input: PointerInput,
        /// Node under the pointer, if any.
        target: Option<K>,
    },
    /// A key transition.
    Key(KeyInput),
}

impl<K> Input<K> {
    /// A pointer press over `target` with a known button bitmask.
    pub fn pointer_down(position: Point, buttons: Buttons, target: Option<K>) -> Self {
        Self::Pointer {
            input: PointerInput::new(PointerKind::Down, position, buttons),
            target,
        }
    }

    /// A pointer move with a known button bitmask.
    pub fn pointer_move(position: Point, buttons: Buttons) -> Self {
        Self::Pointer {
            input: PointerInput::new(PointerKind::Move, position, buttons),
            target: None,
        }
    }

    /// A pointer move from a source without a button bitmask (touch).
    pub fn touch_move(position: Point) -> Self {
        Self::Pointer {
            input: PointerInput {
                kind: PointerKind::Move,
                position,
                buttons: None,
            },
            target: None,
        }
    }

    /// A pointer release.
    pub fn pointer_up(position: Point, target: Option<K>) -> Self {
        Self::Pointer {
            input: PointerInput {
                kind: PointerKind::Up,
                position,
                buttons: None,
            },
            target,
        }
    }

    /// A host cancellation of the pointer sequence.
    pub fn pointer_cancel(position: Point) -> Self {
        Self::Pointer {
            input: PointerInput {
                kind: PointerKind::Cancel,
                position,
                buttons: None,
            },
            target: None,
        }
    }

    /// A key press.
    pub fn key_down(key: Key) -> Self {
        Self::Key(KeyInput {
            kind: KeyKind::Down,
            key,
        })
    }

    /// A key release.
    pub fn key_up(key: Key) -> Self {
        Self::Key(KeyInput {
            kind: KeyKind::Up,
            key,
        })
    }

    /// The registry kind this input dispatches under.
    pub fn event_kind(&self) -> EventKind {
        match self {
            Self::Pointer { input, .. } => EventKind::Pointer(input.kind),
            Self::Key(input) => EventKind::Key(input.kind),
        }
    }
}

/// Everything a dispatch pass did, as data.
#[derive(Debug, PartialEq)]
pub struct DispatchSummary<K> {
    /// A listener claimed the event (stop propagation, suppress default).
    pub consumed: bool,
    /// Capture owners released during the pass, in release order.
    pub released: Vec<K>,
    /// Scroll offset to restore; present at most once per capture episode.
    pub restore_scroll: Option<Vec2>,
    /// Terminal drag outcome, if the pass ended the drag session.
    pub drag_outcome: Option<DragOutcome>,
}

struct ActiveDrag {
    session: DragSession,
    handler: Box<dyn DragHandler>,
}

struct Notes<K> {
    released: Vec<K>,
    restore_scroll: Option<Vec2>,
    drag_outcome: Option<DragOutcome>,
}

impl<K> Default for Notes<K> {
    fn default() -> Self {
        Self {
            released: Vec::new(),
            restore_scroll: None,
            drag_outcome: None,
        }
    }
}

enum PendingOp {
    InstallCapture,
    TeardownCapture,
    InstallDrag,
    TeardownDrag,
}

/// Mutable surface state as seen from inside listeners.
///
/// Registry handlers receive `&mut SurfaceState` as their context, so a
/// widget's own listener can start a drag or open a modal context
/// synchronously; the listener installs implied by that are queued and
/// applied once the dispatch pass finishes.
pub struct SurfaceState<K, C> {
    capture: CaptureManager<K>,
    containment: C,
    drag: Option<ActiveDrag>,
    notes: Notes<K>,
    pending: Vec<PendingOp>,
}

impl<K, C> core::fmt::Debug for SurfaceState<K, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SurfaceState")
            .field("capture_depth", &self.capture.depth())
            .field("drag_active", &self.drag.is_some())
            .finish()
    }
}

impl<K, C> SurfaceState<K, C> {
    fn new(containment: C) -> Self {
        Self {
            capture: CaptureManager::new(),
            containment,
            drag: None,
            notes: Notes::default(),
            pending: Vec::new(),
        }
    }

    /// Pushes a modal capture context. See [`Surface::begin_capture`].
    pub fn begin_capture(&mut self, owner: K, on_release: impl FnMut(&K) + 'static) -> usize {
        let transition = self.capture.push(owner, on_release);
        if transition.became_active {
            self.pending.push(PendingOp::InstallCapture);
        }
        transition.depth
    }

    /// Records the scroll offset to restore when the capture stack
    /// empties.
    pub fn lock_scroll(&mut self, offset: Vec2) {
        self.capture.lock_scroll(offset);
    }

    /// Programmatically releases the top capture context. With `silent`
    /// the release handler is skipped.
    pub fn release_capture(&mut self, silent: bool) -> PopTransition<K> {
        let pop = self.capture.release(silent);
        if pop.became_idle {
            self.pending.push(PendingOp::TeardownCapture);
        }
        pop
    }

    /// Starts a drag session with the default configuration. See
    /// [`Surface::begin_drag`].
    pub fn begin_drag(&mut self, origin: Point, handler: impl DragHandler + 'static) -> bool {
        self.begin_drag_with(DragConfig::default(), origin, handler)
    }

    /// Starts a drag session with an explicit configuration.
    ///
    /// Returns `false` — and changes nothing — while another session is
    /// live: one drag per surface.
    pub fn begin_drag_with(
        &mut self,
        config: DragConfig,
        origin: Point,
        handler: impl DragHandler + 'static,
    ) -> bool {
        if self.drag.is_some() {
            return false;
        }
        self.drag = Some(ActiveDrag {
            session: DragSession::with_config(origin, config),
            handler: Box::new(handler),
        });
        self.pending.push(PendingOp::InstallDrag);
        true
    }

    /// Number of captured modal contexts.
    pub fn capture_depth(&self) -> usize {
        self.capture.depth()
    }

    /// Owner of the active capture context, if any.
    pub fn top_owner(&self) -> Option<&K> {
        self.capture.top_owner()
    }

    /// Returns `true` while a drag session is live.
    pub fn drag_active(&self) -> bool {
        self.drag.is_some()
    }

    /// The containment source the outside-click check consults.
    pub fn containment(&self) -> &C {
        &self.containment
    }

    fn note_dispatch(&mut self, dispatch: CaptureDispatch<K>) {
        match dispatch {
            CaptureDispatch::PoppedTop(pop) | CaptureDispatch::Flushed(pop) => self.note_pop(pop),
            CaptureDispatch::Ignored | CaptureDispatch::Inside => {}
        }
    }

    fn note_pop(&mut self, pop: PopTransition<K>) {
        self.notes.released.extend(pop.released);
        if pop.restore_scroll.is_some() {
            self.notes.restore_scroll = pop.restore_scroll;
        }
        if pop.became_idle {
            self.pending.push(PendingOp::TeardownCapture);
        }
    }

    fn conclude_drag(&mut self, status: SessionStatus) {
        if let SessionStatus::Finished(outcome) = status {
            self.drag = None;
            self.notes.drag_outcome = Some(outcome);
            self.pending.push(PendingOp::TeardownDrag);
        }
    }
}

// The two process-wide capture listeners.
//
// While a drag session is live both swallow their events wholesale, the
// way the session's own window-level listeners shadow the document in a
// browser: a stray press or key press must not dismiss the modal stack
// mid-gesture.

fn capture_pointer_down<K, C: Containment<K>>(
    state: &mut SurfaceState<K, C>,
    input: &Input<K>,
) -> Outcome {
    let Input::Pointer {
        input:
            PointerInput {
                kind: PointerKind::Down,
                ..
            },
        target,
    } = input
    else {
        return Outcome::Continue;
    };
    if state.drag.is_some() {
        return Outcome::Stop;
    }
    let dispatch = match target {
        Some(target) => {
            let SurfaceState {
                capture,
                containment,
                ..
            } = state;
            capture.on_pointer_down(target, containment)
        }
        // Bare ground is outside every region.
        None if state.capture.is_active() => CaptureDispatch::PoppedTop(state.capture.pop(false)),
        None => CaptureDispatch::Ignored,
    };
    let outcome = dispatch.outcome();
    state.note_dispatch(dispatch);
    outcome
}

fn capture_key_down<K, C>(state: &mut SurfaceState<K, C>, input: &Input<K>) -> Outcome {
    let Input::Key(KeyInput {
        kind: KeyKind::Down,
        key,
    }) = input
    else {
        return Outcome::Continue;
    };
    if state.drag.is_some() {
        return Outcome::Stop;
    }
    let dispatch = state.capture.on_key_down(*key);
    let outcome = dispatch.outcome();
    state.note_dispatch(dispatch);
    outcome
}

// The session-scoped drag listeners. Every one of them swallows its event
// while the session is live; a pass that ends the session queues the
// teardown of all of them.

fn drag_pointer_down<K, C>(state: &mut SurfaceState<K, C>, _input: &Input<K>) -> Outcome {
    if state.drag.is_some() {
        Outcome::Stop
    } else {
        Outcome::Continue
    }
}

fn drag_pointer_move<K, C>(state: &mut SurfaceState<K, C>, input: &Input<K>) -> Outcome {
    let Input::Pointer {
        input:
            PointerInput {
                kind: PointerKind::Move,
                position,
                buttons,
            },
        ..
    } = input
    else {
        return Outcome::Continue;
    };
    let Some(active) = state.drag.as_mut() else {
        return Outcome::Continue;
    };
    let ActiveDrag { session, handler } = active;
    let status = session.on_move(*position, *buttons, handler.as_mut());
    state.conclude_drag(status);
    Outcome::Stop
}

fn drag_pointer_up<K, C>(state: &mut SurfaceState<K, C>, input: &Input<K>) -> Outcome {
    let Input::Pointer {
        input:
            PointerInput {
                kind: PointerKind::Up,
                position,
                ..
            },
        ..
    } = input
    else {
        return Outcome::Continue;
    };
    let Some(active) = state.drag.as_mut() else {
        return Outcome::Continue;
    };
    let ActiveDrag { session, handler } = active;
    let status = session.on_up(*position, handler.as_mut());
    state.conclude_drag(status);
    Outcome::Stop
}

fn drag_pointer_cancel<K, C>(state: &mut SurfaceState<K, C>, _input: &Input<K>) -> Outcome {
    let Some(active) = state.drag.as_mut() else {
        return Outcome::Continue;
    };
    let status = active.session.on_cancel();
    state.conclude_drag(status);
    Outcome::Stop
}

fn drag_key_down<K, C>(state: &mut SurfaceState<K, C>, _input: &Input<K>) -> Outcome {
    let Some(active) = state.drag.as_mut() else {
        return Outcome::Continue;
    };
    let status = active.session.on_key_down();
    state.conclude_drag(status);
    Outcome::Stop
}

fn drag_key_up<K, C>(state: &mut SurfaceState<K, C>, input: &Input<K>) -> Outcome {
    let Input::Key(KeyInput {
        kind: KeyKind::Up,
        key,
    }) = input
    else {
        return Outcome::Continue;
    };
    let Some(active) = state.drag.as_mut() else {
        return Outcome::Continue;
    };
    let status = active.session.on_key_up(*key);
    state.conclude_drag(status);
    Outcome::Stop
}

/// An interaction surface: listener registry plus the capture and drag
/// machines, wired the way a document embedder would wire them.
pub struct Surface<K, C> {
    registry: ListenerRegistry<SurfaceState<K, C>, Input<K>>,
    state: SurfaceState<K, C>,
    capture_tokens: Option<[ListenerToken; 2]>,
    drag_tokens: Option<[ListenerToken; 6]>,
}

impl<K, C> core::fmt::Debug for Surface<K, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Surface")
            .field("listeners", &self.registry.len())
            .field("state", &self.state)
            .finish()
    }
}

impl<K: 'static, C: Containment<K> + 'static> Surface<K, C> {
    /// Creates a surface over the given containment source.
    pub fn new(containment: C) -> Self {
        Self {
            registry: ListenerRegistry::new(),
            state: SurfaceState::new(containment),
            capture_tokens: None,
            drag_tokens: None,
        }
    }

    /// Pushes a modal capture context for `owner` and returns the stack
    /// depth.
    ///
    /// The first push of an episode installs the two process-wide
    /// capturing listeners. `on_release` runs exactly once when the
    /// context is popped.
    pub fn begin_capture(&mut self, owner: K, on_release: impl FnMut(&K) + 'static) -> usize {
        let depth = self.state.begin_capture(owner, on_release);
        self.apply_pending();
        depth
    }

    /// Records the scroll offset to restore when the capture stack
    /// empties; only the first call per episode takes effect.
    pub fn lock_scroll(&mut self, offset: Vec2) {
        self.state.lock_scroll(offset);
    }

    /// Programmatically releases the top capture context; with `silent`
    /// the release handler is skipped. Tears the capture listeners down
    /// when this empties the stack.
    pub fn release_capture(&mut self, silent: bool) -> PopTransition<K> {
        let pop = self.state.release_capture(silent);
        self.apply_pending();
        pop
    }

    /// Starts a drag session at `origin` with the default configuration.
    ///
    /// Must be called synchronously while handling the initiating
    /// pointer-down, so `origin` is that event's position. Installs the
    /// session-scoped listeners; whichever exit path ends the session
    /// removes them again. Returns `false` while another session is live.
    pub fn begin_drag(&mut self, origin: Point, handler: impl DragHandler + 'static) -> bool {
        self.begin_drag_with(DragConfig::default(), origin, handler)
    }

    /// Starts a drag session with an explicit configuration.
    pub fn begin_drag_with(
        &mut self,
        config: DragConfig,
        origin: Point,
        handler: impl DragHandler + 'static,
    ) -> bool {
        let started = self.state.begin_drag_with(config, origin, handler);
        self.apply_pending();
        started
    }

    /// Registers an embedder listener. Capturing listeners run before
    /// non-capturing ones for the same event kind.
    pub fn add_listener(
        &mut self,
        kind: EventKind,
        capture: bool,
        handler: impl FnMut(&mut SurfaceState<K, C>, &Input<K>) -> Outcome + 'static,
    ) -> ListenerToken {
        self.registry.add(kind, capture, handler)
    }

    /// Removes an embedder listener by token.
    pub fn remove_listener(&mut self, token: ListenerToken) -> bool {
        self.registry.remove(token)
    }

    /// Total number of registered listeners, the surface's own included.
    pub fn listener_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of captured modal contexts.
    pub fn capture_depth(&self) -> usize {
        self.state.capture_depth()
    }

    /// Owner of the active capture context, if any.
    pub fn top_owner(&self) -> Option<&K> {
        self.state.top_owner()
    }

    /// Returns `true` while a drag session is live.
    pub fn drag_active(&self) -> bool {
        self.state.drag_active()
    }

    /// Routes one input event through the listener set.
    ///
    /// Returns what the pass did: whether the event was consumed, which
    /// capture owners were released, the scroll offset to restore, and
    /// the drag outcome if the session ended. Listener installs and
    /// teardowns requested during the pass are applied before returning.
    pub fn dispatch(&mut self, input: Input<K>) -> DispatchSummary<K> {
        let consumed = self
            .registry
            .dispatch(input.event_kind(), &mut self.state, &input);
        let summary = DispatchSummary {
            consumed,
            released: core::mem::take(&mut self.state.notes.released),
            restore_scroll: self.state.notes.restore_scroll.take(),
            drag_outcome: self.state.notes.drag_outcome.take(),
        };
        self.apply_pending();
        summary
    }

    fn apply_pending(&mut self) {
        for op in core::mem::take(&mut self.state.pending) {
            match op {
                PendingOp::InstallCapture => self.install_capture_listeners(),
                PendingOp::TeardownCapture => self.remove_capture_listeners(),
                PendingOp::InstallDrag => self.install_drag_listeners(),
                PendingOp::TeardownDrag => self.remove_drag_listeners(),
            }
        }
    }

    fn install_capture_listeners(&mut self) {
        if self.capture_tokens.is_some() {
            return;
        }
        let down = self.registry.add(
            EventKind::Pointer(PointerKind::Down),
            true,
            capture_pointer_down,
        );
        let key = self
            .registry
            .add(EventKind::Key(KeyKind::Down), true, capture_key_down);
        self.capture_tokens = Some([down, key]);
    }

    fn remove_capture_listeners(&mut self) {
        if let Some(tokens) = self.capture_tokens.take() {
            for token in tokens {
                self.registry.remove(token);
            }
        }
    }

    fn install_drag_listeners(&mut self) {
        if self.drag_tokens.is_some() {
            return;
        }
        self.drag_tokens = Some([
            self.registry.add(
                EventKind::Pointer(PointerKind::Down),
                true,
                drag_pointer_down,
            ),
            self.registry.add(
                EventKind::Pointer(PointerKind::Move),
                true,
                drag_pointer_move,
            ),
            self.registry
                .add(EventKind::Pointer(PointerKind::Up), true, drag_pointer_up),
            self.registry.add(
                EventKind::Pointer(PointerKind::Cancel),
                true,
                drag_pointer_cancel,
            ),
            self.registry
                .add(EventKind::Key(KeyKind::Down), true, drag_key_down),
            self.registry
                .add(EventKind::Key(KeyKind::Up), true, drag_key_up),
        ]);
    }

    fn remove_drag_listeners(&mut self) {
        if let Some(tokens) = self.drag_tokens.take() {
            for token in tokens {
                self.registry.remove(token);
            }
        }
    }
}
