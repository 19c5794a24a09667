// Copyright 2025 the Carousel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Carousel Layout: a virtualized cover-flow layout engine.
//!
//! This crate computes where the items of a horizontally scrolling cover-flow
//! carousel go, which of them need a live view, and how the carousel settles
//! on a centered item after a gesture ends. It is renderer-agnostic: a host
//! list component owns data, views and painting, and plugs in through the
//! [`LayoutHost`] trait.
//!
//! The core concepts are:
//!
//! - [`CarouselConfig`]: visual toggles ([`LayoutFlags`]), the geometry
//!   [`Profile`] and the falloff [`Curves`].
//! - [`Metrics`] and [`item_transform`]: a pure mapping from a logical index
//!   and a scroll offset to an [`ItemTransform`] (frame, scale, alpha, grey
//!   level, tilt).
//! - [`FrameCache`]: a bounded cache of world frames.
//! - [`AttachTracker`]: which logical indices have a live view. Under looping
//!   many logical indices share an adapter index, so views are tracked by
//!   logical index.
//! - [`CarouselEngine`]: orchestrates layout passes, clamped or looping
//!   scrolling, and the snap animation in [`settle`].
//! - [`child_drawing_order`]: an optional post-processing step for hosts that
//!   need overlapping items to paint toward the center.
//!
//! ## Minimal example
//!
//! ```rust
//! use carousel_layout::{CarouselConfig, CarouselEngine, LayoutPass, RecordingHost, ScrollPhase};
//! use kurbo::Size;
//!
//! // Five 500×200 items in a 1000×300 viewport; slots are 100 units apart.
//! let mut host = RecordingHost::new(5, Size::new(1000.0, 300.0), Size::new(500.0, 200.0));
//! let mut engine = CarouselEngine::new(CarouselConfig::cover_flow().alpha_fade(true));
//! engine.on_layout_children(&mut host, LayoutPass::Full).unwrap();
//!
//! // A drag moves the offset, then the host reports the gesture ended.
//! engine.on_scroll_state_changed(&mut host, ScrollPhase::Dragging, 0).unwrap();
//! engine.scroll_by(&mut host, 170).unwrap();
//! engine.on_scroll_state_changed(&mut host, ScrollPhase::Idle, 16).unwrap();
//!
//! // Drive frames until the snap finishes on slot 2.
//! let mut now = 16;
//! while engine.on_frame(&mut host, now).unwrap() {
//!     now += 16;
//! }
//! assert_eq!(engine.offset(), 200);
//! assert_eq!(host.selections(), [2]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`. Enable either the `std` (default)
//! or the `libm` feature for floating-point support.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("carousel_layout requires either the `std` or `libm` feature");

mod config;
mod draw_order;
mod engine;
mod error;
mod frame_cache;
mod geometry;
mod host;
mod recording;
pub mod settle;
mod tracker;
mod types;

pub use config::{
    CarouselConfig, Curves, DEFAULT_INTERVAL_RATIO, FLAT_INTERVAL_RATIO, LayoutFlags, Profile,
};
pub use draw_order::child_drawing_order;
pub use engine::CarouselEngine;
pub use error::LayoutError;
pub use frame_cache::FrameCache;
pub use geometry::{
    GreyFilter, Metrics, compute_alpha, compute_grey_level, compute_rotation, compute_scale,
    item_transform,
};
pub use host::LayoutHost;
pub use recording::{HostEvent, RecordingHost, ViewId};
pub use tracker::AttachTracker;
pub use types::{
    AttachAt, ItemFrame, ItemTransform, LayoutPass, ScrollDirection, ScrollPhase, nearest_slot,
    normalize_index,
};
