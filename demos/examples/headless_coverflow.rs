// Copyright 2025 the Carousel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drives both carousel engines without a UI toolkit.
//!
//! A recording host stands in for the list component. Each step scrolls or
//! releases the carousel, then logs every attach, recycle and selection the
//! engine produced, with the transform it applied.
//!
//! Run:
//! - `cargo run -p carousel_demos --example headless_coverflow`

use carousel_card_stack::{CardStackConfig, CardStackEngine};
use carousel_demos::{describe, drain_events, init_tracing};
use carousel_layout::{
    CarouselConfig, CarouselEngine, LayoutError, LayoutPass, RecordingHost, ScrollPhase,
};
use kurbo::Size;
use tracing::info;

const FRAME_MS: u64 = 16;

fn cover_flow() -> Result<(), LayoutError> {
    let mut host = RecordingHost::new(12, Size::new(1080.0, 480.0), Size::new(540.0, 360.0));
    let config = CarouselConfig::cover_flow()
        .grey_fade(true)
        .alpha_fade(true)
        .tilt(true)
        .looping(true);
    let mut engine = CarouselEngine::new(config);

    engine.scroll_to_position(&mut host, 5)?;
    engine.on_layout_children(&mut host, LayoutPass::Full)?;
    drain_events("cover flow: initial layout", &mut host);

    let mut now = 0;
    engine.on_scroll_state_changed(&mut host, ScrollPhase::Dragging, now)?;
    for _ in 0..6 {
        engine.scroll_by(&mut host, -45)?;
        now += FRAME_MS;
    }
    drain_events("cover flow: drag", &mut host);

    engine.on_scroll_state_changed(&mut host, ScrollPhase::Idle, now)?;
    while engine.on_frame(&mut host, now)? {
        now += FRAME_MS;
    }
    drain_events("cover flow: settle", &mut host);

    for &view in host.children() {
        let Some(transform) = host.transform_of(view) else {
            continue;
        };
        info!(
            logical = ?engine.logical_index_of(view),
            adapter_index = ?host.adapter_index_of(view),
            "{}",
            describe(transform)
        );
    }
    let mut slots: Vec<i64> = engine.tracker().iter().map(|(logical, _)| logical).collect();
    slots.sort_unstable();
    info!(
        ?slots,
        selected = engine.selected_position(),
        first = ?engine.first_visible_position(),
        last = ?engine.last_visible_position(),
        "cover flow at rest"
    );
    Ok(())
}

fn card_stack() -> Result<(), LayoutError> {
    let mut host = RecordingHost::new(5, Size::new(420.0, 300.0), Size::new(360.0, 260.0));
    let mut engine = CardStackEngine::new(CardStackConfig::default());

    engine.on_layout_children(&mut host, LayoutPass::Full)?;
    drain_events("card stack: initial layout", &mut host);

    let mut now = 0;
    for dx in [90, 150, -40] {
        engine.on_scroll_state_changed(&mut host, ScrollPhase::Dragging, now)?;
        engine.scroll_by(&mut host, dx)?;
        engine.on_scroll_state_changed(&mut host, ScrollPhase::Idle, now)?;
        while engine.on_frame(&mut host, now)? {
            now += FRAME_MS;
        }
        drain_events("card stack: swipe", &mut host);
        info!(
            dx,
            offset = engine.offset(),
            top = ?engine.top_position(),
            "card stack at rest"
        );
    }
    Ok(())
}

fn main() -> Result<(), LayoutError> {
    init_tracing();
    cover_flow()?;
    card_stack()
}
