// Copyright 2026 the Causal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture timing basics: double clicks and pointer stops.
//!
//! Feed the deadline-driven recognizers a scripted event timeline and
//! print what each poll surfaces.
//!
//! Run:
//! - `cargo run -p causal_demos --example gesture_basics`

use causal_gesture::{ClickResponse, MultiClickState, PointerStopState};
use kurbo::Point;

fn main() {
    // A lone click, then a quick pair.
    let mut clicks = MultiClickState::new();
    let at = Point::new(64.0, 32.0);

    println!("click at t=1000: {:?}", clicks.on_click(at, 1_000));
    println!("poll  at t=1400: {:?}", clicks.poll(1_400));
    println!("poll  at t=1700: {:?}", clicks.poll(1_700));

    println!("click at t=3000: {:?}", clicks.on_click(at, 3_000));
    if let ClickResponse::Double(event) = clicks.on_click(at, 3_250) {
        println!("click at t=3250: double click at {:?}", event.position);
    }

    // The pointer wanders, then rests long enough for a tooltip.
    let mut stops = PointerStopState::new();
    for (t, x) in [(4_000, 100.0), (4_200, 130.0), (4_350, 140.0)] {
        stops.on_move(Point::new(x, 80.0), t);
    }
    println!("stop deadline: {:?}", stops.deadline());
    println!("poll at t=5000: {:?}", stops.poll(5_000));
    println!("poll at t=5500: {:?}", stops.poll(5_500));
}
