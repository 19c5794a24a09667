// Copyright 2025 the Carousel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Card-stack scenarios driven through a recording host and a manual clock.

use carousel_card_stack::{CardStackConfig, CardStackEngine, SnapThresholds};
use carousel_layout::{LayoutPass, LayoutHost, RecordingHost, ScrollPhase, ViewId};
use kurbo::Size;
use proptest::prelude::*;

fn host(count: usize) -> RecordingHost {
    RecordingHost::new(count, Size::new(360.0, 240.0), Size::new(300.0, 200.0))
}

fn release(engine: &mut CardStackEngine<ViewId>, host: &mut RecordingHost, now_ms: u64) {
    engine
        .on_scroll_state_changed(host, ScrollPhase::Idle, now_ms)
        .unwrap();
    let mut now = now_ms;
    while engine.on_frame(host, now).unwrap() {
        now += 16;
    }
}

fn drag(engine: &mut CardStackEngine<ViewId>, host: &mut RecordingHost, dx: i64) {
    engine
        .on_scroll_state_changed(host, ScrollPhase::Dragging, 0)
        .unwrap();
    engine.scroll_by(host, dx).unwrap();
}

#[test]
fn swiping_through_the_stack_reports_each_card_once() {
    let mut host = host(4);
    let mut engine = CardStackEngine::new(CardStackConfig::default());
    engine.on_layout_children(&mut host, LayoutPass::Full).unwrap();

    for _ in 0..5 {
        drag(&mut engine, &mut host, 120);
        release(&mut engine, &mut host, 0);
    }
    assert_eq!(engine.offset(), 900);
    assert_eq!(host.selections(), [0, 1, 2, 3]);
}

#[test]
fn looping_stack_wraps_selection() {
    let mut host = host(3);
    let mut engine = CardStackEngine::new(CardStackConfig::default().looping(true));
    engine.on_layout_children(&mut host, LayoutPass::Full).unwrap();

    for _ in 0..4 {
        drag(&mut engine, &mut host, 299);
        release(&mut engine, &mut host, 0);
    }
    assert_eq!(engine.offset(), 1_200);
    assert_eq!(host.selections(), [0, 1, 2, 0, 1]);
}

#[test]
fn stricter_swipe_threshold_needs_a_longer_drag() {
    let mut host = host(4);
    let config = CardStackConfig::default().snap(SnapThresholds {
        swipe: 0.5,
        ..SnapThresholds::default()
    });
    let mut engine = CardStackEngine::new(config);
    engine.on_layout_children(&mut host, LayoutPass::Full).unwrap();

    drag(&mut engine, &mut host, 120);
    release(&mut engine, &mut host, 0);
    assert_eq!(engine.offset(), 0);

    drag(&mut engine, &mut host, 160);
    release(&mut engine, &mut host, 0);
    assert_eq!(engine.offset(), 300);
}

#[test]
fn cards_beneath_the_top_are_smaller_and_fainter() {
    let mut host = host(6);
    let mut engine = CardStackEngine::new(CardStackConfig::default());
    engine.on_layout_children(&mut host, LayoutPass::Full).unwrap();
    engine.scroll_by(&mut host, 90).unwrap();

    let mut children = Vec::new();
    host.attached_views(&mut children);
    let transforms: Vec<_> = children
        .iter()
        .map(|&v| *host.transform_of(v).unwrap())
        .collect();
    // Bottom card first, top card last.
    for pair in transforms.windows(2) {
        assert!(pair[0].scale < pair[1].scale);
        assert!(pair[0].alpha < pair[1].alpha);
    }
    let top = transforms.last().unwrap();
    assert_eq!(top.frame.left, -90);
    assert_eq!(top.frame.width(), 300);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn release_always_lands_on_a_card(
        looping in any::<bool>(),
        count in 1_usize..12,
        deltas in prop::collection::vec(-700_i64..700, 1..8),
    ) {
        let mut host = host(count);
        let mut engine = CardStackEngine::new(CardStackConfig::default().looping(looping));
        engine.on_layout_children(&mut host, LayoutPass::Full).unwrap();
        for dx in deltas {
            drag(&mut engine, &mut host, dx);
            prop_assert!(engine.offset() >= 0);
            release(&mut engine, &mut host, 0);
            prop_assert_eq!(engine.offset() % 300, 0);
            prop_assert_eq!(engine.selected_position(), engine.top_position());
            if !looping {
                prop_assert!(engine.offset() <= (count as i64 - 1) * 300);
            }
        }
    }

    #[test]
    fn attached_cards_never_exceed_the_stack(
        looping in any::<bool>(),
        max_count in 0_usize..6,
        count in 1_usize..10,
        offset in 0_i64..4_000,
    ) {
        let mut host = host(count);
        let config = CardStackConfig::default().looping(looping).max_count(max_count);
        let mut engine = CardStackEngine::new(config);
        engine.on_layout_children(&mut host, LayoutPass::Full).unwrap();
        engine.scroll_by(&mut host, offset).unwrap();
        prop_assert!(host.children().len() <= max_count + 1);
        prop_assert!(!host.children().is_empty());
        for &view in host.children() {
            prop_assert!(host.adapter_index_of(view).unwrap() < count);
        }
    }
}
