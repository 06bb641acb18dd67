// Copyright 2026 the Causal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for the Causal interaction machines.
//!
//! These measure the hot paths an embedder drives per input event: capture
//! stack push/pop episodes, outside-press dispatch against a nested stack,
//! drag move feeds, and listener registry fan-out.

use causal_capture::{CaptureManager, ParentLookup};
use causal_drag::{DragControl, DragHandler, DragSession};
use causal_events::{Buttons, EventKind, ListenerRegistry, Outcome, PointerKind};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Vec2};

fn capture_stack(c: &mut Criterion) {
    let mut group = c.benchmark_group("capture_stack");

    group.bench_function("push_pop_episode_depth8", |b| {
        b.iter(|| {
            let mut captures: CaptureManager<u32> = CaptureManager::new();
            for owner in 0..8_u32 {
                black_box(captures.push(black_box(owner), |_| {}));
            }
            while captures.is_active() {
                black_box(captures.pop(false));
            }
        });
    });

    group.bench_function("escape_flush_depth8", |b| {
        b.iter(|| {
            let mut captures: CaptureManager<u32> = CaptureManager::new();
            for owner in 0..8_u32 {
                captures.push(owner, |_| {});
            }
            black_box(captures.pop(true));
        });
    });

    // Containment walk over a 64-deep parent chain, no pop.
    group.bench_function("inside_press_deep_chain", |b| {
        let tree = ParentLookup(|node: &u32| node.checked_sub(1));
        let mut captures: CaptureManager<u32> = CaptureManager::new();
        captures.push(0, |_| {});
        b.iter(|| black_box(captures.on_pointer_down(black_box(&63), &tree)));
    });

    group.finish();
}

fn drag_feed(c: &mut Criterion) {
    struct Accumulate(Vec2);
    impl DragHandler for Accumulate {
        fn on_drag(&mut self, _origin: Point, delta: Vec2) -> DragControl {
            self.0 = delta;
            DragControl::Continue
        }
    }

    let mut group = c.benchmark_group("drag_feed");
    group.bench_function("moves_256", |b| {
        b.iter(|| {
            let mut session = DragSession::new(Point::ZERO);
            let mut handler = Accumulate(Vec2::ZERO);
            for i in 0..256 {
                let position = Point::new(f64::from(i) + 4.0, 0.0);
                black_box(session.on_move(position, Some(Buttons::PRIMARY), &mut handler));
            }
            session.on_up(Point::new(260.0, 0.0), &mut handler);
            black_box(handler.0)
        });
    });
    group.finish();
}

fn registry_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_dispatch");
    group.bench_function("fan_out_16", |b| {
        let mut registry: ListenerRegistry<u64, ()> = ListenerRegistry::new();
        for _ in 0..16 {
            registry.add(EventKind::Pointer(PointerKind::Move), false, |hits, _| {
                *hits += 1;
                Outcome::Continue
            });
        }
        let mut hits = 0_u64;
        b.iter(|| {
            black_box(registry.dispatch(
                EventKind::Pointer(PointerKind::Move),
                black_box(&mut hits),
                &(),
            ))
        });
    });
    group.finish();
}

fn surface_dispatch(c: &mut Criterion) {
    use causal_surface::{Input, Surface};

    let mut group = c.benchmark_group("surface_dispatch");
    group.bench_function("inside_press_with_modal", |b| {
        let tree = ParentLookup(|node: &u32| node.checked_sub(1));
        let mut surface: Surface<u32, _> = Surface::new(tree);
        surface.begin_capture(0, |_| {});
        b.iter(|| {
            black_box(surface.dispatch(Input::pointer_down(
                Point::ZERO,
                Buttons::PRIMARY,
                Some(black_box(31)),
            )))
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    capture_stack,
    drag_feed,
    registry_dispatch,
    surface_dispatch
);
criterion_main!(benches);
