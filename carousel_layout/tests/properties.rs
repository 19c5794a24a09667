// Copyright 2025 the Carousel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for the geometry, clamping and settling invariants.

use carousel_layout::{
    CarouselConfig, CarouselEngine, LayoutFlags, LayoutPass, Metrics, RecordingHost, ScrollPhase,
    item_transform, nearest_slot, normalize_index,
};
use kurbo::Size;
use proptest::prelude::*;

fn arb_config() -> impl Strategy<Value = CarouselConfig> {
    (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        prop::option::of(0.05_f32..2.0),
    )
        .prop_map(|(flat, grey, alpha, tilt, ratio)| {
            let config = CarouselConfig::cover_flow()
                .flat(flat)
                .grey_fade(grey)
                .alpha_fade(alpha)
                .tilt(tilt);
            match ratio {
                Some(ratio) => config.interval_ratio(ratio),
                None => config,
            }
        })
}

fn laid_out(
    config: CarouselConfig,
    count: usize,
    item_width: f64,
) -> (CarouselEngine<carousel_layout::ViewId>, RecordingHost) {
    let mut host = RecordingHost::new(
        count,
        Size::new(1080.0, 400.0),
        Size::new(item_width, 300.0),
    );
    let mut engine = CarouselEngine::new(config);
    engine
        .on_layout_children(&mut host, LayoutPass::Full)
        .unwrap();
    (engine, host)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn frames_form_an_arithmetic_progression(
        config in arb_config(),
        item_width in 1.0_f64..900.0,
        index in -5_000_i64..5_000,
    ) {
        let metrics = Metrics::resolve(
            &config,
            Size::new(1080.0, 400.0),
            Size::new(item_width, 300.0),
            10,
        )
        .unwrap();
        let a = metrics.frame(index);
        let b = metrics.frame(index + 1);
        prop_assert_eq!(b.left - a.left, metrics.interval);
        prop_assert_eq!(a.width(), metrics.item_width);
    }

    #[test]
    fn transforms_stay_in_range(
        config in arb_config(),
        index in -200_i64..200,
        offset in -20_000_i64..20_000,
    ) {
        let metrics = Metrics::resolve(
            &config,
            Size::new(1080.0, 400.0),
            Size::new(600.0, 300.0),
            50,
        )
        .unwrap();
        let t = item_transform(&metrics, &config, &metrics.frame(index), offset);
        prop_assert!((0.0..=1.0).contains(&t.scale));
        prop_assert!((config.curves.alpha_floor..=1.0).contains(&t.alpha));
        prop_assert!(t.grey_level > 0.0 && t.grey_level <= 1.0);
        let frame = metrics.frame(index);
        if config.flags.contains(LayoutFlags::TILT) && !config.is_flat() {
            let span = metrics.item_count as f64 * metrics.interval as f64;
            let center = (frame.left + frame.right - 2 * offset) as f64 / 2.0;
            let pivot = metrics.start_x as f64 + metrics.item_width as f64 / 2.0;
            let expected = f64::from(config.curves.tilt_max_degrees)
                * ((center - pivot).abs() / span).sqrt();
            let actual = f64::from(t.rotation_y.abs());
            prop_assert!(
                (actual - expected).abs() <= 1e-3 * expected.max(1.0),
                "tilt {actual} differs from {expected}"
            );
            if center > pivot {
                prop_assert!(t.rotation_y <= 0.0);
            } else {
                prop_assert!(t.rotation_y >= 0.0);
            }
        } else {
            prop_assert_eq!(t.rotation_y, 0.0);
        }
        prop_assert_eq!(t.frame.width(), metrics.item_width);
    }

    #[test]
    fn non_looping_offset_stays_clamped(
        count in 1_usize..40,
        deltas in prop::collection::vec(-3_000_i64..3_000, 1..30),
    ) {
        let (mut engine, mut host) = laid_out(CarouselConfig::cover_flow(), count, 600.0);
        let max = engine.metrics().unwrap().max_offset();
        for dx in deltas {
            let before = engine.offset();
            let travel = engine.scroll_by(&mut host, dx).unwrap();
            prop_assert_eq!(engine.offset(), before + travel);
            prop_assert!(engine.offset() >= 0 && engine.offset() <= max);
        }
    }

    #[test]
    fn looping_offset_is_unbounded_and_normalizes(
        count in 1_usize..12,
        deltas in prop::collection::vec(-5_000_i64..5_000, 1..20),
    ) {
        let (mut engine, mut host) =
            laid_out(CarouselConfig::cover_flow().looping(true), count, 600.0);
        let mut expected = 0;
        for dx in deltas {
            prop_assert_eq!(engine.scroll_by(&mut host, dx).unwrap(), dx);
            expected += dx;
            prop_assert_eq!(engine.offset(), expected);
            let center = engine.center_index().unwrap();
            prop_assert!(normalize_index(center, count) < count);
        }
    }

    #[test]
    fn settle_lands_exactly_on_a_slot(
        looping in any::<bool>(),
        count in 2_usize..30,
        dx in -10_000_i64..10_000,
        start_ms in 0_u64..1_000_000,
    ) {
        let config = CarouselConfig::cover_flow().looping(looping);
        let (mut engine, mut host) = laid_out(config, count, 600.0);
        engine
            .on_scroll_state_changed(&mut host, ScrollPhase::Dragging, start_ms)
            .unwrap();
        engine.scroll_by(&mut host, dx).unwrap();
        engine
            .on_scroll_state_changed(&mut host, ScrollPhase::Idle, start_ms)
            .unwrap();
        let mut now = start_ms;
        while engine.on_frame(&mut host, now).unwrap() {
            now += 17;
        }
        let interval = engine.metrics().unwrap().interval;
        let center = engine.center_index().unwrap();
        prop_assert_eq!(center * interval, engine.offset());
        prop_assert_eq!(engine.selected_position(), normalize_index(center, count));
        prop_assert!(host.selections().len() <= 1);
    }

    #[test]
    fn normalization_is_idempotent(logical in any::<i64>(), count in 1_usize..10_000) {
        let once = normalize_index(logical, count);
        prop_assert!(once < count);
        prop_assert_eq!(normalize_index(once as i64, count), once);
    }

    #[test]
    fn nearest_slot_is_within_half_an_interval(
        offset in -1_000_000_i64..1_000_000,
        interval in 1_i64..5_000,
    ) {
        let slot = nearest_slot(offset, interval).unwrap();
        prop_assert!((slot * interval - offset).abs() * 2 <= interval);
    }
}
