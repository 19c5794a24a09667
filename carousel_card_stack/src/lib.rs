// Copyright 2025 the Carousel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Carousel Card Stack: a card-stack carousel layout engine.
//!
//! The top card of the stack slides off to the left as the user scrolls, and
//! the cards beneath it move up one step, growing and brightening toward the
//! look of the card above them. Releasing a gesture snaps to a whole card
//! using distance thresholds that favour the swipe direction.
//!
//! The engine plugs into the same [`LayoutHost`](carousel_layout::LayoutHost)
//! boundary as the cover-flow engine in `carousel_layout`, and reuses its
//! attach tracker, error type and settle animation.
//!
//! - [`CardStackConfig`]: stack depth, spacing, scale and alpha tables,
//!   looping and [`SnapThresholds`].
//! - [`card_slots`] and [`StackPosition`]: the pure offset-to-cards mapping.
//! - [`SnapState`]: which card a release settles on.
//! - [`CardStackEngine`]: layout passes, scrolling, snapping and selection.
//!
//! This crate is `no_std` and uses `alloc`. Enable either the `std` (default)
//! or the `libm` feature for floating-point support.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("carousel_card_stack requires either the `std` or `libm` feature");

mod config;
mod engine;
mod slots;
mod snap;

pub use config::{CardStackConfig, FalloffTable, SnapThresholds};
pub use engine::CardStackEngine;
pub use slots::{BOUNDARY_SLACK, CardSize, CardSlot, StackPosition, card_slots};
pub use snap::SnapState;
