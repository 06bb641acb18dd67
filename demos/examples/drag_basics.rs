// Copyright 2026 the Causal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag basics: move and resize a dialog frame.
//!
//! Drive a `DragSession` by hand with synthetic pointer events and watch a
//! frame rectangle follow the gesture — first a title-bar move, then a
//! corner resize.
//!
//! Run:
//! - `cargo run -p causal_demos --example drag_basics`

use causal_drag::{DragControl, DragHandler, DragSession};
use causal_events::Buttons;
use kurbo::{Point, Rect, Vec2};

/// Moves the whole frame by the drag delta.
struct FrameMove {
    start: Rect,
    frame: Rect,
}

impl DragHandler for FrameMove {
    fn on_start(&mut self, _position: Point) -> DragControl {
        self.start = self.frame;
        DragControl::Continue
    }

    fn on_drag(&mut self, _origin: Point, delta: Vec2) -> DragControl {
        self.frame = self.start + delta;
        println!("  move    -> {:?}", self.frame);
        DragControl::Continue
    }

    fn on_end(&mut self, _position: Point, dragged: bool) {
        println!("  settled -> {:?} (dragged: {dragged})", self.frame);
    }
}

/// Resizes the frame from one corner; the opposite corner stays put.
///
/// `x_coef`/`y_coef` are -1 for the left/top edges and +1 for the
/// right/bottom edges, matching which corner carries the gripper.
struct CornerResize {
    start: Rect,
    frame: Rect,
    x_coef: f64,
    y_coef: f64,
}

impl DragHandler for CornerResize {
    fn on_start(&mut self, _position: Point) -> DragControl {
        self.start = self.frame;
        DragControl::Continue
    }

    fn on_drag(&mut self, _origin: Point, delta: Vec2) -> DragControl {
        let s = self.start;
        let (x0, x1) = if self.x_coef < 0.0 {
            (s.x0 + delta.x, s.x1)
        } else {
            (s.x0, s.x1 + delta.x)
        };
        let (y0, y1) = if self.y_coef < 0.0 {
            (s.y0 + delta.y, s.y1)
        } else {
            (s.y0, s.y1 + delta.y)
        };
        // Refuse to invert the frame.
        if x1 - x0 < 40.0 || y1 - y0 < 30.0 {
            return DragControl::Abort;
        }
        self.frame = Rect::new(x0, y0, x1, y1);
        println!("  resize  -> {:?}", self.frame);
        DragControl::Continue
    }

    fn on_end(&mut self, _position: Point, dragged: bool) {
        println!("  settled -> {:?} (dragged: {dragged})", self.frame);
    }
}

fn main() {
    let held = Some(Buttons::PRIMARY);
    let frame = Rect::new(100.0, 100.0, 420.0, 340.0);

    // Title-bar move: press at (260, 110), drag right and down.
    println!("title-bar move:");
    let mut mover = FrameMove { start: frame, frame };
    let mut session = DragSession::new(Point::new(260.0, 110.0));
    for position in [
        Point::new(261.0, 111.0), // below the tolerance: ignored
        Point::new(275.0, 118.0),
        Point::new(300.0, 150.0),
    ] {
        session.on_move(position, held, &mut mover);
    }
    session.on_up(Point::new(300.0, 150.0), &mut mover);

    // Bottom-right resize on the moved frame.
    println!("bottom-right resize:");
    let frame = mover.frame;
    let mut resizer = CornerResize {
        start: frame,
        frame,
        x_coef: 1.0,
        y_coef: 1.0,
    };
    let mut session = DragSession::new(Point::new(frame.x1, frame.y1));
    for delta in [Vec2::new(20.0, 10.0), Vec2::new(60.0, 35.0)] {
        session.on_move(Point::new(frame.x1, frame.y1) + delta, held, &mut resizer);
    }
    session.on_up(Point::new(frame.x1 + 60.0, frame.y1 + 35.0), &mut resizer);
}
