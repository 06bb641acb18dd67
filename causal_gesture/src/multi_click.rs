// Copyright 2026 the Causal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single/double click classification with deferred single delivery.
//!
//! A press inside the double-click window of the previous press is a
//! double click and is reported immediately. A lone press only becomes a
//! single click once the window (plus a small grace delay) has lapsed
//! without a second press — so a double click never also fires the single
//! click action.
//!
//! ## Usage
//!
//! 1) Feed every press with [`MultiClickState::on_click`].
//! 2) Schedule a wakeup for [`MultiClickState::deadline`] and call
//!    [`MultiClickState::poll`] when it matures to collect the deferred
//!    single click.
//! 3) Call [`MultiClickState::cancel`] when something else claims the
//!    interaction (a drag started, focus moved away).
//!
//! ## Minimal example
//!
//! ```
//! use causal_gesture::{ClickKind, ClickResponse, MultiClickState};
//! use kurbo::Point;
//!
//! let mut clicks = MultiClickState::new();
//! let p = Point::new(10.0, 10.0);
//!
//! // A lone press stays pending until its deadline matures.
//! assert_eq!(clicks.on_click(p, 1_000), ClickResponse::Pending);
//! assert!(clicks.poll(1_200).is_none());
//! let single = clicks.poll(1_700).unwrap();
//! assert_eq!(single.kind, ClickKind::Single);
//!
//! // A second press inside the window is a double click, immediately.
//! assert_eq!(clicks.on_click(p, 2_000), ClickResponse::Pending);
//! let ClickResponse::Double(double) = clicks.on_click(p, 2_300) else {
//!     unreachable!()
//! };
//! assert_eq!(double.kind, ClickKind::Double);
//! assert!(clicks.deadline().is_none());
//! ```

use kurbo::Point;

/// Default double-click window, in milliseconds.
pub const DOUBLE_CLICK_MS: u64 = 500;

/// Default grace added to the window before a pending single click fires.
pub const SINGLE_CLICK_GRACE_MS: u64 = 150;

/// Classification of a recognized click.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClickKind {
    /// A press whose double-click window lapsed without a second press.
    Single,
    /// Two presses within the double-click window.
    Double,
}

/// A recognized click.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClickEvent {
    /// Whether this was a single or double click.
    pub kind: ClickKind,
    /// Position of the press that completed the click.
    pub position: Point,
    /// Timestamp of the press that completed the click.
    pub at: u64,
}

/// What [`MultiClickState::on_click`] decided.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ClickResponse {
    /// The press completed a double click.
    Double(ClickEvent),
    /// The press was recorded; poll the deadline to learn whether it
    /// becomes a single click.
    Pending,
    /// A previous press's deadline had lapsed without a poll; its single
    /// click is emitted now and the new press is pending.
    Expired(ClickEvent),
}

#[derive(Copy, Clone, Debug)]
struct Pending {
    position: Point,
    at: u64,
    deadline: u64,
}

/// Click classification state machine.
#[derive(Copy, Clone, Debug)]
pub struct MultiClickState {
    pending: Option<Pending>,
    /// Maximum press-to-press interval that counts as a double click.
    pub window_ms: u64,
    /// Extra delay after the window before a pending single click fires.
    pub grace_ms: u64,
}

impl Default for MultiClickState {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiClickState {
    /// Creates a recognizer with the default 500 ms window and 150 ms
    /// grace.
    pub fn new() -> Self {
        Self::with_window(DOUBLE_CLICK_MS, SINGLE_CLICK_GRACE_MS)
    }

    /// Creates a recognizer with an explicit window and grace.
    pub fn with_window(window_ms: u64, grace_ms: u64) -> Self {
        Self {
            pending: None,
            window_ms,
            grace_ms,
        }
    }

    /// Feeds a press at `position` stamped `now_ms`.
    pub fn on_click(&mut self, position: Point, now_ms: u64) -> ClickResponse {
        let expired = match self.pending.take() {
            Some(pending) if now_ms.saturating_sub(pending.at) < self.window_ms => {
                return ClickResponse::Double(ClickEvent {
                    kind: ClickKind::Double,
                    position,
                    at: now_ms,
                });
            }
            Some(pending) => Some(ClickEvent {
                kind: ClickKind::Single,
                position: pending.position,
                at: pending.at,
            }),
            None => None,
        };

        self.pending = Some(Pending {
            position,
            at: now_ms,
            deadline: now_ms + self.window_ms + self.grace_ms,
        });

        match expired {
            Some(event) => ClickResponse::Expired(event),
            None => ClickResponse::Pending,
        }
    }

    /// Collects a pending single click whose deadline has matured.
    pub fn poll(&mut self, now_ms: u64) -> Option<ClickEvent> {
        let pending = self.pending?;
        if now_ms < pending.deadline {
            return None;
        }
        self.pending = None;
        Some(ClickEvent {
            kind: ClickKind::Single,
            position: pending.position,
            at: pending.at,
        })
    }

    /// Next instant at which [`poll`](Self::poll) can emit, if any.
    pub fn deadline(&self) -> Option<u64> {
        self.pending.map(|p| p.deadline)
    }

    /// Drops any pending press without emitting it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: Point = Point::new(5.0, 5.0);

    #[test]
    fn lone_press_becomes_a_single_click_after_the_deadline() {
        let mut clicks = MultiClickState::new();
        assert_eq!(clicks.on_click(P, 1_000), ClickResponse::Pending);
        assert_eq!(clicks.deadline(), Some(1_650));

        assert!(clicks.poll(1_649).is_none());
        let event = clicks.poll(1_650).expect("deadline matured");
        assert_eq!(event.kind, ClickKind::Single);
        assert_eq!(event.position, P);
        assert_eq!(event.at, 1_000);

        // Nothing left to emit.
        assert!(clicks.poll(5_000).is_none());
        assert!(clicks.deadline().is_none());
    }

    #[test]
    fn second_press_inside_the_window_is_a_double_click() {
        let mut clicks = MultiClickState::new();
        clicks.on_click(P, 1_000);
        let response = clicks.on_click(Point::new(6.0, 5.0), 1_499);
        let ClickResponse::Double(event) = response else {
            panic!("expected a double click");
        };
        assert_eq!(event.kind, ClickKind::Double);
        assert_eq!(event.at, 1_499);
        // The double click consumed the pending press entirely.
        assert!(clicks.poll(10_000).is_none());
    }

    #[test]
    fn second_press_outside_the_window_restarts_the_cycle() {
        let mut clicks = MultiClickState::new();
        clicks.on_click(P, 1_000);
        // Press after the window but before anyone polled: the first
        // press's single click surfaces with the response.
        let response = clicks.on_click(P, 1_600);
        let ClickResponse::Expired(event) = response else {
            panic!("expected the lapsed single click");
        };
        assert_eq!(event.kind, ClickKind::Single);
        assert_eq!(event.at, 1_000);

        // The new press is pending in its own right.
        assert_eq!(clicks.deadline(), Some(2_250));
        assert_eq!(clicks.poll(2_250).unwrap().at, 1_600);
    }

    #[test]
    fn triple_press_is_a_double_then_a_fresh_pending() {
        let mut clicks = MultiClickState::new();
        clicks.on_click(P, 1_000);
        assert!(matches!(
            clicks.on_click(P, 1_200),
            ClickResponse::Double(_)
        ));
        // The third press starts over.
        assert_eq!(clicks.on_click(P, 1_400), ClickResponse::Pending);
        assert_eq!(clicks.poll(2_050).unwrap().kind, ClickKind::Single);
    }

    #[test]
    fn cancel_drops_the_pending_press() {
        let mut clicks = MultiClickState::new();
        clicks.on_click(P, 1_000);
        clicks.cancel();
        assert!(clicks.poll(10_000).is_none());
        // The next press is not a double click.
        assert_eq!(clicks.on_click(P, 1_100), ClickResponse::Pending);
    }

    #[test]
    fn custom_window_changes_the_classification() {
        let mut clicks = MultiClickState::with_window(200, 0);
        clicks.on_click(P, 1_000);
        // 250 ms later: outside a 200 ms window.
        assert!(matches!(
            clicks.on_click(P, 1_250),
            ClickResponse::Expired(_)
        ));
        assert_eq!(clicks.deadline(), Some(1_450));
    }
}
