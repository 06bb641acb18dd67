// Copyright 2026 the Causal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Causal Gesture: deadline-driven pointer gesture recognizers.
//!
//! Two small recognizers for interactions that need a clock as well as
//! events:
//!
//! - [`multi_click::MultiClickState`] classifies presses into single and
//!   double clicks, deferring the single-click decision until the
//!   double-click window has safely lapsed.
//! - [`pointer_stop::PointerStopState`] reports when the pointer has come
//!   to rest — the usual trigger for tooltips and hover cards.
//!
//! ## Host-agnostic timing
//!
//! Neither recognizer owns a timer. Callers stamp every event with a
//! millisecond timestamp, read the recognizer's `deadline()` to schedule a
//! wakeup however their runtime does that, and call `poll(now)` to collect
//! whatever the deadline matured into. The same machine works under a
//! frame loop, a timer wheel, or a test feeding hand-picked clocks.
//!
//! This crate is `no_std`.

#![no_std]

pub mod multi_click;
pub mod pointer_stop;

pub use multi_click::{ClickEvent, ClickKind, ClickResponse, MultiClickState};
pub use pointer_stop::{PointerStop, PointerStopState};
