// Copyright 2026 the Causal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Causal Capture: a LIFO stack of modal capture contexts.
//!
//! Modal widgets — dialogs, menus, inline editors — claim exclusive
//! interpretation of "outside interaction": a press outside the widget's
//! region dismisses it, and Escape dismisses every open modal at once. This
//! crate provides that discipline as an explicitly constructed
//! [`CaptureManager`] rather than ambient global state: build one at
//! application start and thread it through whatever needs modal capture.
//!
//! ## Usage
//!
//! 1) When a widget becomes modal, call [`CaptureManager::push`] with its
//!    region key and a release handler. If the returned transition reports
//!    `became_active`, install your process-wide capturing listeners for
//!    pointer-down and key-down, and record the scroll offset with
//!    [`CaptureManager::lock_scroll`].
//! 2) Route those listener events into
//!    [`CaptureManager::on_pointer_down`] (with a [`Containment`] source)
//!    and [`CaptureManager::on_key_down`].
//! 3) Whenever a returned [`PopTransition`] reports `became_idle`, remove
//!    the two listeners and restore `restore_scroll` if present.
//!
//! ## Minimal example
//!
//! ```
//! use causal_capture::{CaptureDispatch, CaptureManager, ParentLookup};
//!
//! // A two-node scene: 20 is a child of 10; 99 is outside both.
//! let tree = ParentLookup(|node: &u32| match node {
//!     20 => Some(10),
//!     _ => None,
//! });
//!
//! let mut captures: CaptureManager<u32> = CaptureManager::new();
//! let push = captures.push(10, |_owner| {});
//! assert!(push.became_active);
//!
//! // A press inside the owner's subtree propagates normally.
//! assert!(matches!(
//!     captures.on_pointer_down(&20, &tree),
//!     CaptureDispatch::Inside
//! ));
//!
//! // An outside press pops the top context and consumes the event.
//! let CaptureDispatch::PoppedTop(pop) = captures.on_pointer_down(&99, &tree) else {
//!     unreachable!()
//! };
//! assert!(pop.became_idle);
//! assert!(!captures.is_active());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod containment;

pub use containment::{Containment, ParentLookup};

use alloc::boxed::Box;
use alloc::vec::Vec;

use causal_events::{Key, Outcome};
use kurbo::Vec2;
use smallvec::SmallVec;

type ReleaseFn<K> = Box<dyn FnMut(&K)>;

struct CaptureEntry<K> {
    owner: K,
    on_release: ReleaseFn<K>,
}

/// Result of a [`CaptureManager::push`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PushTransition {
    /// Stack depth after the push.
    pub depth: usize,
    /// `true` when the stack went from empty to non-empty: the embedder
    /// must install its process-wide pointer-down and key-down listeners
    /// (exactly once) and may lock the scroll offset.
    pub became_active: bool,
}

/// Result of popping one or more capture contexts.
#[derive(Debug, PartialEq)]
pub struct PopTransition<K> {
    /// Owners of the released contexts, top-first. Empty when the stack
    /// was already empty.
    pub released: SmallVec<[K; 4]>,
    /// `true` when this pop emptied the stack: the embedder must remove
    /// the two process-wide listeners.
    pub became_idle: bool,
    /// Scroll offset to restore, present only on the pop that emptied the
    /// stack and only if one was locked.
    pub restore_scroll: Option<Vec2>,
}

impl<K> PopTransition<K> {
    /// Returns `true` when nothing was popped (the stack was empty).
    pub fn was_empty(&self) -> bool {
        self.released.is_empty()
    }
}

/// How the capture stack handled a routed event.
#[derive(Debug, PartialEq)]
pub enum CaptureDispatch<K> {
    /// Stack empty or event irrelevant: deliver normally.
    Ignored,
    /// The press landed inside the top owner's region: deliver normally.
    Inside,
    /// Outside press: the top context was popped and the event is
    /// consumed (stop propagation, suppress the default action).
    PoppedTop(PopTransition<K>),
    /// Escape: every context was flushed. The key event itself is not
    /// claimed and propagates normally.
    Flushed(PopTransition<K>),
}

impl<K> CaptureDispatch<K> {
    /// Propagation decision for the embedder's listener.
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::PoppedTop(_) => Outcome::StopAndConsume,
            Self::Ignored | Self::Inside | Self::Flushed(_) => Outcome::Continue,
        }
    }

    /// The pop transition, if this dispatch popped anything.
    pub fn transition(&self) -> Option<&PopTransition<K>> {
        match self {
            Self::PoppedTop(t) | Self::Flushed(t) => Some(t),
            Self::Ignored | Self::Inside => None,
        }
    }
}

/// LIFO stack of modal capture contexts.
///
/// The top of the stack is the active context: only it reacts to outside
/// presses, so nested modals dismiss innermost-first. Escape flushes the
/// whole stack top-first. Release handlers run exactly once per context,
/// at the moment their context is popped.
///
/// Double-pushing the same owner is permitted; the stack does not
/// deduplicate, and balancing pushes against pops is the caller's
/// contract.
pub struct CaptureManager<K> {
    stack: Vec<CaptureEntry<K>>,
    scroll_origin: Option<Vec2>,
}

impl<K> core::fmt::Debug for CaptureManager<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CaptureManager")
            .field("depth", &self.stack.len())
            .field("scroll_origin", &self.scroll_origin)
            .finish()
    }
}

impl<K> Default for CaptureManager<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> CaptureManager<K> {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            scroll_origin: None,
        }
    }

    /// Number of captured contexts.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Returns `true` while at least one context is captured.
    pub fn is_active(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Owner of the active (top) context, if any.
    pub fn top_owner(&self) -> Option<&K> {
        self.stack.last().map(|entry| &entry.owner)
    }

    /// Pushes a capture context for `owner`.
    ///
    /// `on_release` runs exactly once, when the context is popped — by an
    /// outside press, an escape flush, or an explicit non-silent
    /// [`release`](Self::release).
    pub fn push(&mut self, owner: K, on_release: impl FnMut(&K) + 'static) -> PushTransition {
        let became_active = self.stack.is_empty();
        self.stack.push(CaptureEntry {
            owner,
            on_release: Box::new(on_release),
        });
        PushTransition {
            depth: self.stack.len(),
            became_active,
        }
    }

    /// Records the scroll offset to restore when the stack empties.
    ///
    /// Only the first call of an active episode takes effect; calls while
    /// idle are ignored. The offset is handed back in
    /// [`PopTransition::restore_scroll`] exactly once.
    pub fn lock_scroll(&mut self, offset: Vec2) {
        if self.is_active() && self.scroll_origin.is_none() {
            self.scroll_origin = Some(offset);
        }
    }

    /// Pops the top context, or every context in LIFO order when `all`.
    ///
    /// Each released context's `on_release` runs with its owner before the
    /// next context is popped. Popping an empty stack is a no-op returning
    /// an empty transition.
    pub fn pop(&mut self, all: bool) -> PopTransition<K> {
        let was_active = self.is_active();
        let mut released = SmallVec::new();
        while let Some(mut entry) = self.stack.pop() {
            (entry.on_release)(&entry.owner);
            released.push(entry.owner);
            if !all {
                break;
            }
        }
        self.pop_transition(was_active, released)
    }

    /// Explicit programmatic release of the top context.
    ///
    /// With `silent` the release handler is skipped — for widgets that
    /// already tore themselves down and only need the stack entry gone.
    /// Without it, this is identical to `pop(false)`.
    pub fn release(&mut self, silent: bool) -> PopTransition<K> {
        if !silent {
            return self.pop(false);
        }
        let was_active = self.is_active();
        let mut released = SmallVec::new();
        if let Some(entry) = self.stack.pop() {
            released.push(entry.owner);
        }
        self.pop_transition(was_active, released)
    }

    /// Routes a pointer-down at `target` through the stack.
    ///
    /// A press outside the top owner's region (per `containment`) pops
    /// exactly the top context and consumes the event; contexts below the
    /// top never react. An owner that is no longer reachable in the
    /// containment source reads as "outside", so a stale context
    /// self-heals on the next press.
    pub fn on_pointer_down<C: Containment<K>>(
        &mut self,
        target: &K,
        containment: &C,
    ) -> CaptureDispatch<K> {
        let Some(top) = self.stack.last() else {
            return CaptureDispatch::Ignored;
        };
        if containment.is_descendant(target, &top.owner) {
            CaptureDispatch::Inside
        } else {
            CaptureDispatch::PoppedTop(self.pop(false))
        }
    }

    /// Routes a key-down through the stack: Escape flushes every context.
    pub fn on_key_down(&mut self, key: Key) -> CaptureDispatch<K> {
        if !self.is_active() || !key.is_escape() {
            return CaptureDispatch::Ignored;
        }
        CaptureDispatch::Flushed(self.pop(true))
    }

    fn pop_transition(&mut self, was_active: bool, released: SmallVec<[K; 4]>) -> PopTransition<K> {
        let became_idle = was_active && self.stack.is_empty();
        let restore_scroll = if became_idle {
            self.scroll_origin.take()
        } else {
            None
        };
        PopTransition {
            released,
            became_idle,
            restore_scroll,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    // Flat scene: every key is its own root; containment is identity.
    struct Flat;
    impl Containment<u32> for Flat {
        fn is_descendant(&self, node: &u32, ancestor: &u32) -> bool {
            node == ancestor
        }
    }

    fn release_log() -> (Rc<RefCell<Vec<u32>>>, impl Fn(u32) -> ReleaseFn<u32>) {
        let log: Rc<RefCell<Vec<u32>>> = Rc::new(RefCell::new(Vec::new()));
        let make = {
            let log = log.clone();
            move |tag: u32| -> ReleaseFn<u32> {
                let log = log.clone();
                Box::new(move |_owner: &u32| log.borrow_mut().push(tag))
            }
        };
        (log, make)
    }

    #[test]
    fn push_reports_activation_only_from_empty() {
        let mut captures: CaptureManager<u32> = CaptureManager::new();
        let first = captures.push(1, |_| {});
        assert_eq!(first.depth, 1);
        assert!(first.became_active);

        let second = captures.push(2, |_| {});
        assert_eq!(second.depth, 2);
        assert!(!second.became_active);
        assert_eq!(captures.top_owner(), Some(&2));
    }

    #[test]
    fn pop_on_empty_stack_is_a_noop() {
        let mut captures: CaptureManager<u32> = CaptureManager::new();
        let pop = captures.pop(false);
        assert!(pop.was_empty());
        assert!(!pop.became_idle);
        assert_eq!(pop.restore_scroll, None);
    }

    #[test]
    fn outside_press_pops_only_the_top() {
        let (log, make) = release_log();
        let mut captures: CaptureManager<u32> = CaptureManager::new();
        captures.push(1, make(1));
        captures.push(2, make(2));

        let dispatch = captures.on_pointer_down(&99, &Flat);
        assert_eq!(dispatch.outcome(), causal_events::Outcome::StopAndConsume);
        let CaptureDispatch::PoppedTop(pop) = dispatch else {
            panic!("expected a top pop");
        };
        assert_eq!(pop.released.as_slice(), &[2]);
        assert!(!pop.became_idle);
        assert_eq!(*log.borrow(), vec![2]);
        assert_eq!(captures.depth(), 1);
    }

    #[test]
    fn press_inside_top_owner_is_left_alone() {
        let mut captures: CaptureManager<u32> = CaptureManager::new();
        captures.push(1, |_| {});
        let dispatch = captures.on_pointer_down(&1, &Flat);
        assert!(matches!(dispatch, CaptureDispatch::Inside));
        assert_eq!(dispatch.outcome(), causal_events::Outcome::Continue);
        assert_eq!(captures.depth(), 1);
    }

    #[test]
    fn escape_flushes_all_contexts_top_first() {
        let (log, make) = release_log();
        let mut captures: CaptureManager<u32> = CaptureManager::new();
        captures.push(1, make(1));
        captures.push(2, make(2));
        captures.push(3, make(3));

        let dispatch = captures.on_key_down(Key::Escape);
        let CaptureDispatch::Flushed(pop) = dispatch else {
            panic!("expected a flush");
        };
        assert_eq!(pop.released.as_slice(), &[3, 2, 1]);
        assert!(pop.became_idle);
        assert_eq!(*log.borrow(), vec![3, 2, 1]);
        assert!(!captures.is_active());
    }

    #[test]
    fn non_escape_keys_are_ignored() {
        let mut captures: CaptureManager<u32> = CaptureManager::new();
        captures.push(1, |_| {});
        assert!(matches!(
            captures.on_key_down(Key::Enter),
            CaptureDispatch::Ignored
        ));
        assert_eq!(captures.depth(), 1);
    }

    #[test]
    fn events_on_an_idle_manager_are_ignored() {
        let mut captures: CaptureManager<u32> = CaptureManager::new();
        assert!(matches!(
            captures.on_pointer_down(&1, &Flat),
            CaptureDispatch::Ignored
        ));
        assert!(matches!(
            captures.on_key_down(Key::Escape),
            CaptureDispatch::Ignored
        ));
    }

    #[test]
    fn silent_release_skips_the_handler() {
        let (log, make) = release_log();
        let mut captures: CaptureManager<u32> = CaptureManager::new();
        captures.push(1, make(1));
        captures.push(2, make(2));

        let pop = captures.release(true);
        assert_eq!(pop.released.as_slice(), &[2]);
        assert!(log.borrow().is_empty());

        let pop = captures.release(false);
        assert_eq!(pop.released.as_slice(), &[1]);
        assert_eq!(*log.borrow(), vec![1]);
        assert!(pop.became_idle);
    }

    #[test]
    fn double_push_of_the_same_owner_is_permitted() {
        let (log, make) = release_log();
        let mut captures: CaptureManager<u32> = CaptureManager::new();
        captures.push(7, make(1));
        captures.push(7, make(2));
        assert_eq!(captures.depth(), 2);

        captures.pop(false);
        captures.pop(false);
        assert_eq!(*log.borrow(), vec![2, 1]);
    }

    #[test]
    fn scroll_lock_is_restored_only_at_the_last_pop() {
        let mut captures: CaptureManager<u32> = CaptureManager::new();
        captures.push(1, |_| {});
        captures.lock_scroll(Vec2::new(0.0, 120.0));
        captures.push(2, |_| {});
        // A later lock in the same episode does not overwrite the origin.
        captures.lock_scroll(Vec2::new(0.0, 500.0));

        let pop = captures.pop(false);
        assert_eq!(pop.restore_scroll, None);
        let pop = captures.pop(false);
        assert!(pop.became_idle);
        assert_eq!(pop.restore_scroll, Some(Vec2::new(0.0, 120.0)));

        // The next episode starts with a fresh origin.
        captures.push(3, |_| {});
        let pop = captures.pop(false);
        assert_eq!(pop.restore_scroll, None);
    }

    #[test]
    fn lock_scroll_while_idle_is_ignored() {
        let mut captures: CaptureManager<u32> = CaptureManager::new();
        captures.lock_scroll(Vec2::new(0.0, 99.0));
        captures.push(1, |_| {});
        let pop = captures.pop(false);
        assert_eq!(pop.restore_scroll, None);
    }
}
