// Copyright 2025 the Carousel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for the headless demos.
//!
//! Run:
//! - `cargo run -p carousel_demos --example headless_coverflow`
//! - `RUST_LOG=trace cargo run -p carousel_demos --example headless_coverflow`

use carousel_layout::{HostEvent, ItemTransform, RecordingHost};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber filtered by `RUST_LOG`, defaulting to
/// `debug` for the carousel crates.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,carousel_layout=debug,carousel_card_stack=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Logs and forgets every call the host recorded since the last drain.
pub fn drain_events(label: &str, host: &mut RecordingHost) {
    for event in host.events() {
        match *event {
            HostEvent::Attached {
                view,
                adapter_index,
                at,
            } => match host.transform_of(view) {
                Some(transform) => info!(
                    label,
                    view = view.0,
                    adapter_index,
                    ?at,
                    "{}",
                    describe(transform)
                ),
                None => info!(label, view = view.0, adapter_index, ?at, "attached"),
            },
            HostEvent::Recycled(view) => info!(label, view = view.0, "recycled"),
            HostEvent::SelectionChanged(index) => info!(label, index, "selection changed"),
            HostEvent::ScrollTick => {}
        }
    }
    host.clear_events();
}

/// One-line summary of a transform.
pub fn describe(transform: &ItemTransform) -> String {
    let rect = transform.rect();
    format!(
        "x={:.0}..{:.0} scale={:.3} alpha={:.3} grey={:.3} tilt={:.1}",
        rect.x0, rect.x1, transform.scale, transform.alpha, transform.grey_level, transform.rotation_y
    )
}
