// Copyright 2026 the Causal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Modal capture basics.
//!
//! Open a dialog and a nested menu over a tiny page tree, then dismiss
//! them with an outside press and with Escape.
//!
//! Run:
//! - `cargo run -p causal_demos --example dialog_basics`

use causal_demos::PageTree;
use causal_events::{Buttons, Key};
use causal_surface::{Input, Surface};
use kurbo::{Point, Vec2};

fn press(surface: &mut Surface<&'static str, PageTree>, target: &'static str) {
    let summary = surface.dispatch(Input::pointer_down(
        Point::new(0.0, 0.0),
        Buttons::PRIMARY,
        Some(target),
    ));
    println!(
        "press on {target}: consumed={}, released={:?}, depth={}",
        summary.consumed,
        summary.released,
        surface.capture_depth()
    );
}

fn main() {
    let tree = PageTree::new(&[
        ("dialog", "page"),
        ("content", "dialog"),
        ("menu", "page"),
        ("item", "menu"),
    ]);
    let mut surface = Surface::new(tree);

    // Open the dialog: the first capture installs the two document
    // listeners and locks the scroll position.
    surface.begin_capture("dialog", |owner| println!("  -> {owner} dismissed"));
    surface.lock_scroll(Vec2::new(0.0, 180.0));
    println!(
        "dialog open: depth={}, listeners={}",
        surface.capture_depth(),
        surface.listener_count()
    );

    // Presses inside the dialog are the dialog's business.
    press(&mut surface, "content");

    // A menu opens on top; it now owns outside interpretation.
    surface.begin_capture("menu", |owner| println!("  -> {owner} dismissed"));
    println!("menu open: depth={}", surface.capture_depth());

    // A press on the dialog is outside the menu: the menu goes, the
    // dialog stays.
    press(&mut surface, "content");

    // Escape flushes whatever is left and hands the scroll offset back.
    let summary = surface.dispatch(Input::key_down(Key::Escape));
    println!(
        "escape: released={:?}, restore scroll={:?}, listeners={}",
        summary.released,
        summary.restore_scroll,
        surface.listener_count()
    );
}
