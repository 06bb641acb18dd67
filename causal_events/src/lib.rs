// Copyright 2026 the Causal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Causal Events: host-agnostic input event model and listener registry.
//!
//! This crate is the shared event-dispatch shim for the Causal interaction
//! crates. It defines the small vocabulary the state machines speak —
//! pointer and key inputs, the mouse-button bitmask, propagation outcomes —
//! plus a token-based listener registry an embedder can dispatch raw events
//! through.
//!
//! ## Design Philosophy
//!
//! Nothing here talks to a windowing system, a DOM, or an event loop. The
//! embedder translates its native events into [`PointerInput`] / [`KeyInput`]
//! values and feeds them in; listeners report what should happen to
//! propagation by returning an [`Outcome`] instead of mutating the event.
//!
//! Listener removal is keyed by the [`ListenerToken`] returned at
//! registration, never by handler identity: tokens are slot + generation
//! handles, so a stale token can never remove a listener that reused its
//! slot.
//!
//! ## Minimal example
//!
//! ```
//! use causal_events::{EventKind, ListenerRegistry, Outcome, PointerKind};
//!
//! // Context threaded through dispatch; here just a counter.
//! let mut registry: ListenerRegistry<u32, &str> = ListenerRegistry::new();
//! let token = registry.add(EventKind::Pointer(PointerKind::Down), true, |hits, _ev| {
//!     *hits += 1;
//!     Outcome::Continue
//! });
//!
//! let mut hits = 0;
//! registry.dispatch(EventKind::Pointer(PointerKind::Down), &mut hits, &"press");
//! assert_eq!(hits, 1);
//!
//! assert!(registry.remove(token));
//! assert!(registry.is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod registry;
pub mod types;

pub use registry::{ListenerRegistry, ListenerToken};
pub use types::{
    Buttons, EventKind, Key, KeyInput, KeyKind, Outcome, PointerInput, PointerKind,
    SAME_LOCATION_EPSILON, same_location,
};
