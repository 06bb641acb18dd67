// Copyright 2026 the Causal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Token-based listener registry: add, remove, and dispatch by event kind.
//!
//! The registry replaces removal-by-handler-identity with explicit handles:
//! [`add`](ListenerRegistry::add) returns a [`ListenerToken`] and
//! [`remove`](ListenerRegistry::remove) takes it back. Tokens are
//! slot + generation pairs, so a token that outlives its listener can never
//! remove an unrelated listener that happened to reuse the slot.
//!
//! ## Dispatch order
//!
//! [`dispatch`](ListenerRegistry::dispatch) delivers an event to every
//! listener registered for its kind: capturing listeners first, then
//! non-capturing ones, each group in slot order. A listener returning
//! [`Outcome::Stop`] or [`Outcome::StopAndConsume`] halts delivery
//! immediately.
//!
//! Handlers receive a `&mut C` context supplied per dispatch. The registry
//! itself is never reachable from inside a handler; embedders that need to
//! add or remove listeners in response to an event queue that work and apply
//! it after the dispatch pass.
//!
//! ## Minimal example
//!
//! ```
//! use causal_events::{EventKind, KeyKind, ListenerRegistry, Outcome};
//!
//! let mut registry: ListenerRegistry<Vec<&str>, ()> = ListenerRegistry::new();
//! registry.add(EventKind::Key(KeyKind::Down), false, |log, _| {
//!     log.push("bubble");
//!     Outcome::Continue
//! });
//! registry.add(EventKind::Key(KeyKind::Down), true, |log, _| {
//!     log.push("capture");
//!     Outcome::Continue
//! });
//!
//! let mut log = Vec::new();
//! registry.dispatch(EventKind::Key(KeyKind::Down), &mut log, &());
//! // Capturing listeners run first regardless of registration order.
//! assert_eq!(log, ["capture", "bubble"]);
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::types::{EventKind, Outcome};

/// Handle to a registered listener.
///
/// Consists of a slot index and a generation counter. The generation
/// increments whenever a slot is reused, so stale tokens fail to resolve
/// instead of aliasing a newer listener.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ListenerToken(u32, u32);

type Handler<C, E> = Box<dyn FnMut(&mut C, &E) -> Outcome>;

struct Entry<C, E> {
    kind: EventKind,
    capture: bool,
    handler: Handler<C, E>,
}

struct Slot<C, E> {
    generation: u32,
    entry: Option<Entry<C, E>>,
}

/// Listener registry dispatching events of kind `EventKind` carrying
/// payloads of type `E` to handlers that mutate a context `C`.
pub struct ListenerRegistry<C, E> {
    slots: Vec<Slot<C, E>>,
    free: Vec<u32>,
    counts: HashMap<EventKind, usize>,
}

impl<C, E> core::fmt::Debug for ListenerRegistry<C, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("len", &self.len())
            .field("slots", &self.slots.len())
            .finish()
    }
}

impl<C, E> Default for ListenerRegistry<C, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, E> ListenerRegistry<C, E> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            counts: HashMap::new(),
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.counts.values().sum()
    }

    /// Returns `true` when no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of listeners registered for the given kind.
    pub fn count(&self, kind: EventKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Returns `true` when the token still refers to a live listener.
    pub fn contains(&self, token: ListenerToken) -> bool {
        self.slots
            .get(token.0 as usize)
            .is_some_and(|slot| slot.generation == token.1 && slot.entry.is_some())
    }

    /// Registers a listener for `kind` and returns its removal token.
    ///
    /// `capture` listeners run before non-capture listeners for the same
    /// kind, mirroring capturing-phase registration on a document.
    pub fn add(
        &mut self,
        kind: EventKind,
        capture: bool,
        handler: impl FnMut(&mut C, &E) -> Outcome + 'static,
    ) -> ListenerToken {
        let entry = Entry {
            kind,
            capture,
            handler: Box::new(handler),
        };
        *self.counts.entry(kind).or_insert(0) += 1;
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation += 1;
            slot.entry = Some(entry);
            ListenerToken(idx, slot.generation)
        } else {
            let idx = u32::try_from(self.slots.len()).expect("listener slot count fits in u32");
            self.slots.push(Slot {
                generation: 1,
                entry: Some(entry),
            });
            ListenerToken(idx, 1)
        }
    }

    /// Removes the listener behind `token`.
    ///
    /// Returns `false` when the token is stale (already removed, or its
    /// slot was reused by a later listener).
    pub fn remove(&mut self, token: ListenerToken) -> bool {
        let Some(slot) = self.slots.get_mut(token.0 as usize) else {
            return false;
        };
        if slot.generation != token.1 {
            return false;
        }
        let Some(entry) = slot.entry.take() else {
            return false;
        };
        if let Some(count) = self.counts.get_mut(&entry.kind) {
            *count -= 1;
        }
        self.free.push(token.0);
        true
    }

    /// Dispatches an event to every listener registered for `kind`.
    ///
    /// Capturing listeners run first, then non-capturing ones, each group
    /// in slot order. Returns `true` when a listener consumed the event
    /// via [`Outcome::StopAndConsume`]; [`Outcome::Stop`] also halts
    /// delivery but reports the event as unconsumed.
    pub fn dispatch(&mut self, kind: EventKind, ctx: &mut C, event: &E) -> bool {
        for capture in [true, false] {
            for i in 0..self.slots.len() {
                let Some(entry) = self.slots[i].entry.as_mut() else {
                    continue;
                };
                if entry.kind != kind || entry.capture != capture {
                    continue;
                }
                match (entry.handler)(ctx, event) {
                    Outcome::Continue => {}
                    Outcome::Stop => return false,
                    Outcome::StopAndConsume => return true,
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{KeyKind, PointerKind};
    use alloc::vec;

    const DOWN: EventKind = EventKind::Pointer(PointerKind::Down);
    const KEY: EventKind = EventKind::Key(KeyKind::Down);

    #[test]
    fn add_dispatch_remove_roundtrip() {
        let mut registry: ListenerRegistry<u32, ()> = ListenerRegistry::new();
        let token = registry.add(DOWN, true, |hits, _| {
            *hits += 1;
            Outcome::Continue
        });
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.count(DOWN), 1);
        assert_eq!(registry.count(KEY), 0);

        let mut hits = 0;
        assert!(!registry.dispatch(DOWN, &mut hits, &()));
        assert_eq!(hits, 1);

        // Wrong kind: nothing runs.
        assert!(!registry.dispatch(KEY, &mut hits, &()));
        assert_eq!(hits, 1);

        assert!(registry.remove(token));
        assert!(registry.is_empty());
        assert!(!registry.dispatch(DOWN, &mut hits, &()));
        assert_eq!(hits, 1);
    }

    #[test]
    fn remove_is_idempotent_and_stale_tokens_fail() {
        let mut registry: ListenerRegistry<(), ()> = ListenerRegistry::new();
        let token = registry.add(DOWN, false, |_, _| Outcome::Continue);
        assert!(registry.remove(token));
        assert!(!registry.remove(token));

        // Slot reuse bumps the generation; the stale token must not remove
        // the new listener.
        let newer = registry.add(DOWN, false, |_, _| Outcome::Continue);
        assert!(!registry.remove(token));
        assert!(registry.contains(newer));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn capture_listeners_run_before_bubble_listeners() {
        let mut registry: ListenerRegistry<Vec<&str>, ()> = ListenerRegistry::new();
        registry.add(DOWN, false, |log, _| {
            log.push("bubble-a");
            Outcome::Continue
        });
        registry.add(DOWN, true, |log, _| {
            log.push("capture");
            Outcome::Continue
        });
        registry.add(DOWN, false, |log, _| {
            log.push("bubble-b");
            Outcome::Continue
        });

        let mut log = Vec::new();
        registry.dispatch(DOWN, &mut log, &());
        assert_eq!(log, vec!["capture", "bubble-a", "bubble-b"]);
    }

    #[test]
    fn stop_halts_delivery_without_consuming() {
        let mut registry: ListenerRegistry<Vec<&str>, ()> = ListenerRegistry::new();
        registry.add(DOWN, true, |log, _| {
            log.push("first");
            Outcome::Stop
        });
        registry.add(DOWN, true, |log, _| {
            log.push("second");
            Outcome::Continue
        });

        let mut log = Vec::new();
        let consumed = registry.dispatch(DOWN, &mut log, &());
        assert!(!consumed);
        assert_eq!(log, vec!["first"]);
    }

    #[test]
    fn stop_and_consume_reports_consumption() {
        let mut registry: ListenerRegistry<(), u8> = ListenerRegistry::new();
        registry.add(KEY, true, |_, ev| {
            if *ev == 27 {
                Outcome::StopAndConsume
            } else {
                Outcome::Continue
            }
        });
        assert!(registry.dispatch(KEY, &mut (), &27));
        assert!(!registry.dispatch(KEY, &mut (), &13));
    }

    #[test]
    fn counts_track_churn_across_slot_reuse() {
        let mut registry: ListenerRegistry<(), ()> = ListenerRegistry::new();
        let a = registry.add(DOWN, true, |_, _| Outcome::Continue);
        let b = registry.add(KEY, true, |_, _| Outcome::Continue);
        assert_eq!(registry.len(), 2);

        registry.remove(a);
        let c = registry.add(KEY, false, |_, _| Outcome::Continue);
        assert_eq!(registry.count(DOWN), 0);
        assert_eq!(registry.count(KEY), 2);

        registry.remove(b);
        registry.remove(c);
        assert!(registry.is_empty());
    }
}
