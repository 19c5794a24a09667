// Copyright 2025 the Carousel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Offset-to-geometry mapping.
//!
//! [`Metrics`] captures everything derived from a measurement pass: viewport
//! space, uniform item size, start offsets and the interval between slots.
//! [`item_transform`] turns a world frame plus the live scroll offset into an
//! [`ItemTransform`]. Nothing here holds state; every output is a pure function
//! of `(frame, offset, config)`.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Size;

use crate::config::{CarouselConfig, Curves, LayoutFlags, Profile};
use crate::types::{ItemFrame, ItemTransform};

/// Rounds to the nearest integer, with halves rounding toward positive infinity.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Layout coordinates are bounded by viewport and item sizes"
)]
pub(crate) fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Geometry resolved from one measurement pass.
///
/// All lengths are integer world units. The frame of logical index `i` starts
/// at `start_x + i × interval`, computed directly rather than accumulated.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Metrics {
    /// Usable viewport width.
    pub horizontal_space: i64,
    /// Usable viewport height.
    pub vertical_space: i64,
    /// Uniform item width.
    pub item_width: i64,
    /// Uniform item height.
    pub item_height: i64,
    /// Left edge of the slot that is centered at offset zero.
    pub start_x: i64,
    /// Top edge shared by every frame.
    pub start_y: i64,
    /// Distance between consecutive frames.
    pub interval: i64,
    /// Height lost per interval of distance from center (stacked profile only).
    pub interval_height: i64,
    /// Item count captured when the metrics were resolved.
    pub item_count: usize,
    /// Distance from the centered slot at which cover-flow scale reaches zero.
    falloff: f32,
}

impl Metrics {
    /// Resolves metrics for `config` from a viewport and a measured item size.
    ///
    /// Returns `None` when the viewport is empty or the stacked profile leaves
    /// no room for an item.
    #[must_use]
    pub fn resolve(
        config: &CarouselConfig,
        viewport: Size,
        measured: Size,
        item_count: usize,
    ) -> Option<Self> {
        let horizontal_space = round_half_up(viewport.width);
        let vertical_space = round_half_up(viewport.height);
        if horizontal_space <= 0 || vertical_space <= 0 {
            return None;
        }
        match config.profile {
            Profile::CoverFlow => {
                let item_width = round_half_up(measured.width).max(0);
                let item_height = round_half_up(measured.height).max(0);
                let ratio = config.effective_interval_ratio();
                let interval = round_half_up(item_width as f64 * f64::from(ratio));
                let start_x = round_half_up((horizontal_space - item_width) as f64 / 2.0);
                let start_y = round_half_up((vertical_space - item_height) as f64 / 2.0);
                let falloff = (start_x as f32 + item_width as f32 / ratio).abs();
                Some(Self {
                    horizontal_space,
                    vertical_space,
                    item_width,
                    item_height,
                    start_x,
                    start_y,
                    interval,
                    interval_height: 0,
                    item_count,
                    falloff,
                })
            }
            Profile::Stacked {
                interval,
                interval_height,
                max_count,
            } => {
                let item_width = horizontal_space - (max_count - 1) * interval;
                if item_width <= 0 {
                    return None;
                }
                Some(Self {
                    horizontal_space,
                    vertical_space,
                    item_width,
                    item_height: vertical_space,
                    start_x: (max_count / 2) * interval,
                    start_y: 0,
                    interval,
                    interval_height,
                    item_count,
                    falloff: 0.0,
                })
            }
        }
    }

    /// World frame of logical index `index`.
    #[must_use]
    pub const fn frame(&self, index: i64) -> ItemFrame {
        let left = self.start_x.saturating_add(self.interval.saturating_mul(index));
        ItemFrame::new(
            left,
            self.start_y,
            left.saturating_add(self.item_width),
            self.start_y + self.item_height,
        )
    }

    /// Largest offset reachable without looping.
    #[must_use]
    pub fn max_offset(&self) -> i64 {
        let count = i64::try_from(self.item_count).unwrap_or(i64::MAX);
        (count - 1).max(0).saturating_mul(self.interval)
    }

    /// Offset at which logical index `index` is centered.
    #[must_use]
    pub const fn offset_for_position(&self, index: i64) -> i64 {
        self.interval * index
    }

    /// The visible window in world coordinates at `offset`.
    #[must_use]
    pub const fn display_frame(&self, offset: i64) -> ItemFrame {
        ItemFrame::new(
            offset,
            0,
            offset.saturating_add(self.horizontal_space),
            self.vertical_space,
        )
    }

    /// Number of items that fit in the viewport when one is centered.
    ///
    /// Returns `0` when the interval is zero.
    #[must_use]
    pub fn max_visible_count(&self) -> usize {
        if self.interval <= 0 {
            return 0;
        }
        let one_side = (self.horizontal_space - self.start_x) / self.interval;
        usize::try_from(one_side * 2 + 1).unwrap_or(0)
    }

    /// Linear falloff from the centered slot, not clamped. `x` is the
    /// laid-out left edge.
    fn falloff_at(&self, profile: &Profile, x: i64) -> f32 {
        let distance = (x - self.start_x).abs() as f32;
        match profile {
            Profile::CoverFlow => 1.0 - distance / self.falloff,
            Profile::Stacked { .. } => {
                if self.interval == 0 || self.item_height == 0 {
                    return 1.0;
                }
                let lost = distance / self.interval as f32 * self.interval_height as f32;
                let height = self.item_height as f32;
                (height - lost) / height
            }
        }
    }
}

/// Scale at laid-out left edge `x`, in `[0, 1]`.
#[must_use]
pub fn compute_scale(metrics: &Metrics, config: &CarouselConfig, x: i64) -> f32 {
    if config.is_flat() {
        return 1.0;
    }
    metrics.falloff_at(&config.profile, x).clamp(0.0, 1.0)
}

/// Alpha at laid-out left edge `x`, in `[curves.alpha_floor, 1]`.
///
/// Flat mode never fades.
#[must_use]
pub fn compute_alpha(metrics: &Metrics, config: &CarouselConfig, x: i64) -> f32 {
    if config.is_flat() {
        return 1.0;
    }
    let curves = &config.curves;
    let mut alpha = metrics.falloff_at(&config.profile, x);
    if curves.alpha_squared {
        let base = alpha.clamp(0.0, 1.0);
        alpha = base * base;
    }
    alpha.clamp(curves.alpha_floor, 1.0)
}

/// Colour retention at laid-out left edge `x`.
///
/// Falls off with the distance between the item center and the viewport
/// center, floored at `curves.grey_floor` and shaped by `curves.grey_exponent`.
#[must_use]
pub fn compute_grey_level(metrics: &Metrics, curves: &Curves, x: i64) -> f32 {
    let half = metrics.horizontal_space / 2;
    if half == 0 {
        return 1.0;
    }
    let mid = x as f32 + metrics.item_width as f32 / 2.0;
    let distance = (mid - metrics.horizontal_space as f32 / 2.0).abs();
    let value = (1.0 - distance / half as f32).clamp(curves.grey_floor, 1.0);
    value.powf(curves.grey_exponent)
}

/// Tilt for world `frame` at `offset`, in degrees.
///
/// Items right of the centered slot tilt negatively, items left of it
/// positively, growing with the square root of the normalized distance.
#[must_use]
pub fn compute_rotation(metrics: &Metrics, curves: &Curves, frame: &ItemFrame, offset: i64) -> f32 {
    let span = metrics.item_count as f32 * metrics.interval as f32;
    if span == 0.0 {
        return 0.0;
    }
    let center = (frame.left + frame.right - 2 * offset) as f32 / 2.0;
    let pivot = metrics.start_x as f32 + metrics.item_width as f32 / 2.0;
    let value = ((center - pivot) / span).abs().sqrt();
    let sign = if center > pivot { -1.0 } else { 1.0 };
    sign * curves.tilt_max_degrees * value
}

/// Maps world `frame` at scroll `offset` to the transform applied to its view.
///
/// Flat mode disables scale, alpha fade and tilt; grey fade still applies.
#[must_use]
pub fn item_transform(
    metrics: &Metrics,
    config: &CarouselConfig,
    frame: &ItemFrame,
    offset: i64,
) -> ItemTransform {
    let x = frame.left - offset;
    let flags = config.flags;
    let scale = compute_scale(metrics, config, x);
    let mut laid_out = frame.shifted_x(-offset);
    if matches!(config.profile, Profile::Stacked { .. }) {
        let width = frame.width() as f32;
        let height = frame.height() as f32;
        let lost_width = truncate(width - width * scale) / 2;
        let lost_height = truncate(height - height * scale) / 2;
        let dx = if x >= metrics.start_x {
            lost_width
        } else {
            -lost_width
        };
        laid_out = ItemFrame::new(
            laid_out.left + dx,
            laid_out.top + lost_height,
            laid_out.right + dx,
            laid_out.bottom + lost_height,
        );
    }
    ItemTransform {
        frame: laid_out,
        scale,
        alpha: if flags.contains(LayoutFlags::ALPHA_FADE) {
            compute_alpha(metrics, config, x)
        } else {
            1.0
        },
        grey_level: if flags.contains(LayoutFlags::GREY_FADE) {
            compute_grey_level(metrics, &config.curves, x)
        } else {
            1.0
        },
        rotation_y: if flags.contains(LayoutFlags::TILT) && !config.is_flat() {
            compute_rotation(metrics, &config.curves, frame, offset)
        } else {
            0.0
        },
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Values are bounded by item sizes"
)]
fn truncate(value: f32) -> i64 {
    value as i64
}

/// Colour filter derived from a grey level.
///
/// Each colour channel becomes `c × gain + color_bias` and alpha becomes
/// `a + alpha_bias`, pulling the item toward a fixed grey as the level drops.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GreyFilter {
    /// Multiplier applied to each colour channel.
    pub gain: f32,
    /// Constant added to each colour channel.
    pub color_bias: f32,
    /// Constant added to the alpha channel.
    pub alpha_bias: f32,
}

impl GreyFilter {
    /// Builds the filter for `level` using the ink constants in `curves`.
    #[must_use]
    pub fn from_level(level: f32, curves: &Curves) -> Self {
        let loss = 1.0 - level;
        Self {
            gain: level,
            color_bias: curves.grey_ink * loss,
            alpha_bias: curves.grey_alpha_bias * loss,
        }
    }

    /// Returns `true` when the filter leaves colours untouched and the host
    /// can drop its filter layer.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.gain >= 1.0
    }

    /// Row-major 4×5 colour matrix equivalent of this filter.
    #[must_use]
    pub fn matrix(&self) -> [f32; 20] {
        let g = self.gain;
        let b = self.color_bias;
        [
            g, 0.0, 0.0, 0.0, b, //
            0.0, g, 0.0, 0.0, b, //
            0.0, 0.0, g, 0.0, b, //
            0.0, 0.0, 0.0, 1.0, self.alpha_bias,
        ]
    }

    /// Applies the filter to one RGBA pixel.
    #[must_use]
    pub fn apply(&self, rgba: [u8; 4]) -> [u8; 4] {
        let [r, g, b, a] = rgba;
        [
            channel(f32::from(r) * self.gain + self.color_bias),
            channel(f32::from(g) * self.gain + self.color_bias),
            channel(f32::from(b) * self.gain + self.color_bias),
            channel(f32::from(a) + self.alpha_bias),
        ]
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "Clamped to the u8 range first"
)]
fn channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cover_flow(viewport_width: f64) -> (CarouselConfig, Metrics) {
        let config = CarouselConfig::cover_flow();
        let metrics = Metrics::resolve(
            &config,
            Size::new(viewport_width, 300.0),
            Size::new(500.0, 200.0),
            5,
        )
        .unwrap();
        (config, metrics)
    }

    #[test]
    fn cover_flow_metrics_center_the_first_slot() {
        let (_, m) = cover_flow(1000.0);
        assert_eq!(m.interval, 100);
        assert_eq!(m.start_x, 250);
        assert_eq!(m.start_y, 50);
        assert_eq!(m.frame(0), ItemFrame::new(250, 50, 750, 250));
        assert_eq!(m.frame(-3).left, -50);
        assert_eq!(m.max_offset(), 400);
        assert_eq!(m.max_visible_count(), 15);
    }

    #[test]
    fn flat_mode_widens_the_interval() {
        let config = CarouselConfig::cover_flow().flat(true);
        let m = Metrics::resolve(&config, Size::new(1000.0, 300.0), Size::new(500.0, 200.0), 3)
            .unwrap();
        assert_eq!(m.interval, 550);
        assert_eq!(compute_scale(&m, &config, 9999), 1.0);
    }

    #[test]
    fn flat_mode_ignores_alpha_fade_and_tilt() {
        let config = CarouselConfig::cover_flow()
            .flat(true)
            .alpha_fade(true)
            .tilt(true)
            .grey_fade(true);
        let m = Metrics::resolve(&config, Size::new(1000.0, 300.0), Size::new(500.0, 200.0), 10)
            .unwrap();
        assert_eq!(compute_alpha(&m, &config, m.start_x + 2_000), 1.0);
        let t = item_transform(&m, &config, &m.frame(3), 300);
        assert_eq!((t.scale, t.alpha, t.rotation_y), (1.0, 1.0, 0.0));
        let far = item_transform(&m, &config, &m.frame(5), 0);
        assert!(far.grey_level < 1.0);
    }

    #[test]
    fn empty_viewport_resolves_nothing() {
        let config = CarouselConfig::cover_flow();
        assert!(Metrics::resolve(&config, Size::ZERO, Size::new(10.0, 10.0), 3).is_none());
        let stacked = CarouselConfig::stacked();
        assert!(
            Metrics::resolve(&stacked, Size::new(500.0, 300.0), Size::ZERO, 3).is_none(),
            "600 units of spacing leave no width for items"
        );
    }

    #[test]
    fn scale_falls_off_linearly_and_clamps() {
        let (config, m) = cover_flow(1000.0);
        // falloff = 250 + 500 / 0.2 = 2750
        assert_eq!(compute_scale(&m, &config, m.start_x), 1.0);
        let s = compute_scale(&m, &config, m.start_x + 275);
        assert!((s - 0.9).abs() < 1e-6);
        assert_eq!(compute_scale(&m, &config, m.start_x + 10_000), 0.0);
    }

    #[test]
    fn alpha_respects_floor() {
        let config = CarouselConfig::cover_flow().alpha_fade(true);
        let (_, m) = cover_flow(1000.0);
        assert_eq!(compute_alpha(&m, &config, m.start_x), 1.0);
        assert_eq!(compute_alpha(&m, &config, m.start_x + 100_000), 0.3);
    }

    #[test]
    fn grey_level_is_full_at_center_and_floored_at_edges() {
        let (config, m) = cover_flow(1000.0);
        assert_eq!(compute_grey_level(&m, &config.curves, m.start_x), 1.0);
        let far = compute_grey_level(&m, &config.curves, m.start_x + 5_000);
        assert!((far - 0.1_f32.powf(0.8)).abs() < 1e-6);
    }

    #[test]
    fn rotation_tilts_toward_center() {
        let (config, m) = cover_flow(1000.0);
        let center = m.frame(0);
        assert_eq!(compute_rotation(&m, &config.curves, &center, 0), 0.0);
        let right = compute_rotation(&m, &config.curves, &m.frame(2), 0);
        let left = compute_rotation(&m, &config.curves, &m.frame(-2), 0);
        assert!(right < 0.0 && left > 0.0);
        // |200 / 500| → sqrt(0.4) × 50
        assert!((left - 50.0 * 0.4_f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn stacked_profile_shrinks_and_shifts_outward() {
        let config = CarouselConfig::stacked();
        let m = Metrics::resolve(&config, Size::new(1000.0, 300.0), Size::ZERO, 8).unwrap();
        assert_eq!(m.item_width, 400);
        assert_eq!(m.item_height, 300);
        assert_eq!(m.start_x, 300);

        let centered = item_transform(&m, &config, &m.frame(0), 0);
        assert_eq!(centered.scale, 1.0);
        assert_eq!(centered.frame, ItemFrame::new(300, 0, 700, 300));

        // One interval right: 75 of 300 units lost, scale 0.75.
        let right = item_transform(&m, &config, &m.frame(1), 0);
        assert_eq!(right.scale, 0.75);
        assert_eq!(right.frame.left, 450 + 50);
        assert_eq!(right.frame.top, 37);

        let left = item_transform(&m, &config, &m.frame(-1), 0);
        assert_eq!(left.frame.left, 150 - 50);
    }

    #[test]
    fn stacked_alpha_is_squared_scale() {
        let config = CarouselConfig::stacked().alpha_fade(true);
        let m = Metrics::resolve(&config, Size::new(1000.0, 300.0), Size::ZERO, 8).unwrap();
        let t = item_transform(&m, &config, &m.frame(1), 0);
        assert!((t.alpha - 0.5625).abs() < 1e-6);
        let far = item_transform(&m, &config, &m.frame(4), 0);
        assert_eq!(far.alpha, 0.1);
    }

    #[test]
    fn grey_filter_pulls_toward_ink() {
        let curves = Curves::COVER_FLOW;
        assert!(GreyFilter::from_level(1.0, &curves).is_identity());
        let half = GreyFilter::from_level(0.5, &curves);
        assert!(!half.is_identity());
        assert_eq!(half.apply([0, 255, 120, 100]), [60, 188, 120, 225]);
        assert_eq!(half.matrix()[4], 60.0);
        assert_eq!(half.matrix()[19], 125.0);
    }

    #[test]
    fn rounding_matches_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
    }
}
