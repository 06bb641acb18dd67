// Copyright 2026 the Causal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer-stop detection: report when the pointer has come to rest.
//!
//! Every move rearms the machine; once the pointer has not moved for the
//! stop delay, a poll emits one [`PointerStop`] for that rest. Leaving the
//! tracked surface disarms it, so no stop fires over ground the pointer
//! already left.
//!
//! ## Minimal example
//!
//! ```
//! use causal_gesture::PointerStopState;
//! use kurbo::Point;
//!
//! let mut stops = PointerStopState::new();
//! stops.on_move(Point::new(40.0, 8.0), 1_000);
//! stops.on_move(Point::new(42.0, 8.0), 1_300);
//!
//! // Not at rest long enough yet.
//! assert!(stops.poll(2_000).is_none());
//!
//! // 1100 ms after the last move the rest is reported, once.
//! let stop = stops.poll(2_400).unwrap();
//! assert_eq!(stop.position, Point::new(42.0, 8.0));
//! assert!(stops.poll(9_000).is_none());
//! ```

use kurbo::Point;

/// Default rest duration before a stop is reported, in milliseconds.
pub const STOP_DELAY_MS: u64 = 1100;

/// A detected pointer rest.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerStop {
    /// Where the pointer came to rest.
    pub position: Point,
    /// Timestamp of the last move before the rest.
    pub since: u64,
}

#[derive(Copy, Clone, Debug)]
struct Rest {
    position: Point,
    since: u64,
}

/// Pointer-stop state machine.
#[derive(Copy, Clone, Debug)]
pub struct PointerStopState {
    rest: Option<Rest>,
    /// How long the pointer must hold still before a stop is reported.
    pub stop_delay_ms: u64,
}

impl Default for PointerStopState {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerStopState {
    /// Creates a detector with the default 1100 ms rest delay.
    pub fn new() -> Self {
        Self::with_delay(STOP_DELAY_MS)
    }

    /// Creates a detector with an explicit rest delay.
    pub fn with_delay(stop_delay_ms: u64) -> Self {
        Self {
            rest: None,
            stop_delay_ms,
        }
    }

    /// Feeds a pointer move: rearms the detector at the new position.
    pub fn on_move(&mut self, position: Point, now_ms: u64) {
        self.rest = Some(Rest {
            position,
            since: now_ms,
        });
    }

    /// The pointer left the tracked surface: disarm without emitting.
    pub fn on_leave(&mut self) {
        self.rest = None;
    }

    /// Emits the rest once the stop delay has elapsed since the last move.
    ///
    /// At most one stop per rest: after emitting, the machine stays quiet
    /// until the next move rearms it.
    pub fn poll(&mut self, now_ms: u64) -> Option<PointerStop> {
        let rest = self.rest?;
        if now_ms.saturating_sub(rest.since) < self.stop_delay_ms {
            return None;
        }
        self.rest = None;
        Some(PointerStop {
            position: rest.position,
            since: rest.since,
        })
    }

    /// Next instant at which [`poll`](Self::poll) can emit, if armed.
    pub fn deadline(&self) -> Option<u64> {
        self.rest.map(|r| r.since + self.stop_delay_ms)
    }
}
