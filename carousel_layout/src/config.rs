// Copyright 2025 the Carousel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration: feature toggles, geometry profile, and curve constants.

use crate::settle::Easing;

/// Width-to-interval ratio used when no custom ratio is set.
pub const DEFAULT_INTERVAL_RATIO: f32 = 0.2;

/// Width-to-interval ratio used in flat mode when no custom ratio is set.
pub const FLAT_INTERVAL_RATIO: f32 = 1.1;

bitflags::bitflags! {
    /// Visual and behavioural toggles for a [`CarouselConfig`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LayoutFlags: u8 {
        /// Plain side-by-side scrolling: no scaling, and new views always attach at the head.
        const FLAT       = 0b0000_0001;
        /// Desaturate items as they move away from the viewport center.
        const GREY_FADE  = 0b0000_0010;
        /// Fade items out as they move away from the center slot.
        const ALPHA_FADE = 0b0000_0100;
        /// Tilt items about the vertical axis toward the vanishing point.
        const TILT       = 0b0000_1000;
        /// Unbounded offset; logical indices wrap modulo the item count.
        const LOOP       = 0b0001_0000;
    }
}

/// How item size, spacing, and scale falloff are derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile {
    /// Items take their measured size and sit centered in the viewport.
    ///
    /// The interval is `item_width × interval_ratio`, and scale falls off
    /// linearly with distance from the centered slot.
    CoverFlow,
    /// `max_count` overlapping items fill the viewport width.
    ///
    /// Items are `viewport_width − (max_count − 1) × interval` wide and span the
    /// full viewport height. Each interval away from center costs
    /// `interval_height` units of height.
    Stacked {
        /// Fixed spacing between consecutive items.
        interval: i64,
        /// Height lost per interval of distance from center.
        interval_height: i64,
        /// Number of items sharing the viewport.
        max_count: i64,
    },
}

impl Profile {
    /// The stacked profile with the spacing used by the reference design.
    pub const STACKED: Self = Self::Stacked {
        interval: 150,
        interval_height: 75,
        max_count: 5,
    };
}

/// Curve constants for alpha, grey, and tilt falloff.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Curves {
    /// Alpha never drops below this value.
    pub alpha_floor: f32,
    /// Derive alpha as `scale²` instead of `scale`.
    pub alpha_squared: bool,
    /// Grey level never drops below this value before the exponent is applied.
    pub grey_floor: f32,
    /// Exponent (`< 1`) that keeps items near the center closer to full colour.
    pub grey_exponent: f32,
    /// Grey constant each colour channel is pulled toward, in `0..=255`.
    pub grey_ink: f32,
    /// Amount added to the alpha channel at zero grey level, in `0..=255`.
    pub grey_alpha_bias: f32,
    /// Tilt at a normalized distance of one, in degrees.
    pub tilt_max_degrees: f32,
}

impl Curves {
    /// Curves for [`Profile::CoverFlow`].
    pub const COVER_FLOW: Self = Self {
        alpha_floor: 0.3,
        alpha_squared: false,
        grey_floor: 0.1,
        grey_exponent: 0.8,
        grey_ink: 120.0,
        grey_alpha_bias: 250.0,
        tilt_max_degrees: 50.0,
    };

    /// Curves for [`Profile::Stacked`].
    pub const STACKED: Self = Self {
        alpha_floor: 0.1,
        alpha_squared: true,
        ..Self::COVER_FLOW
    };
}

/// Configuration for a [`CarouselEngine`](crate::CarouselEngine).
///
/// Built with chained setters:
///
/// ```rust
/// use carousel_layout::{CarouselConfig, LayoutFlags};
///
/// let config = CarouselConfig::cover_flow()
///     .grey_fade(true)
///     .tilt(true)
///     .looping(true)
///     .interval_ratio(0.5);
/// assert!(config.flags.contains(LayoutFlags::LOOP | LayoutFlags::TILT));
/// assert_eq!(config.effective_interval_ratio(), 0.5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CarouselConfig {
    /// Feature toggles.
    pub flags: LayoutFlags,
    /// Custom interval ratio; `None` falls back to a mode-dependent default.
    pub interval_ratio: Option<f32>,
    /// Geometry profile.
    pub profile: Profile,
    /// Falloff curves.
    pub curves: Curves,
    /// Number of logical indices scanned on each side of the center slot.
    pub scan_radius: i64,
    /// Frames for logical indices `0..frame_cache_bound` are cached.
    pub frame_cache_bound: usize,
    /// Duration of the snap animation.
    pub settle_duration_ms: u64,
    /// Timing curve of the snap animation.
    pub settle_easing: Easing,
}

impl CarouselConfig {
    /// Default cover-flow configuration.
    #[must_use]
    pub const fn cover_flow() -> Self {
        Self {
            flags: LayoutFlags::empty(),
            interval_ratio: None,
            profile: Profile::CoverFlow,
            curves: Curves::COVER_FLOW,
            scan_radius: 20,
            frame_cache_bound: 100,
            settle_duration_ms: 500,
            settle_easing: Easing::Decelerate,
        }
    }

    /// Default stacked configuration.
    #[must_use]
    pub const fn stacked() -> Self {
        Self {
            profile: Profile::STACKED,
            curves: Curves::STACKED,
            scan_radius: 10,
            ..Self::cover_flow()
        }
    }

    /// Toggles [`LayoutFlags::FLAT`]: a wider interval with no scale, alpha
    /// fade or tilt.
    #[must_use]
    pub fn flat(mut self, on: bool) -> Self {
        self.flags.set(LayoutFlags::FLAT, on);
        self
    }

    /// Toggles [`LayoutFlags::GREY_FADE`].
    #[must_use]
    pub fn grey_fade(mut self, on: bool) -> Self {
        self.flags.set(LayoutFlags::GREY_FADE, on);
        self
    }

    /// Toggles [`LayoutFlags::ALPHA_FADE`].
    #[must_use]
    pub fn alpha_fade(mut self, on: bool) -> Self {
        self.flags.set(LayoutFlags::ALPHA_FADE, on);
        self
    }

    /// Toggles [`LayoutFlags::TILT`].
    #[must_use]
    pub fn tilt(mut self, on: bool) -> Self {
        self.flags.set(LayoutFlags::TILT, on);
        self
    }

    /// Toggles [`LayoutFlags::LOOP`].
    #[must_use]
    pub fn looping(mut self, on: bool) -> Self {
        self.flags.set(LayoutFlags::LOOP, on);
        self
    }

    /// Sets a custom interval ratio. Negative ratios clear the custom value.
    #[must_use]
    pub fn interval_ratio(mut self, ratio: f32) -> Self {
        self.interval_ratio = (ratio >= 0.0).then_some(ratio);
        self
    }

    /// Replaces the falloff curves.
    #[must_use]
    pub const fn with_curves(mut self, curves: Curves) -> Self {
        self.curves = curves;
        self
    }

    /// Sets the snap animation duration.
    #[must_use]
    pub const fn with_settle_duration(mut self, duration_ms: u64) -> Self {
        self.settle_duration_ms = duration_ms;
        self
    }

    /// Sets the snap animation timing curve.
    #[must_use]
    pub const fn with_settle_easing(mut self, easing: Easing) -> Self {
        self.settle_easing = easing;
        self
    }

    /// The interval ratio in effect: the custom ratio if set, otherwise the
    /// flat or overlapping default.
    #[must_use]
    pub fn effective_interval_ratio(&self) -> f32 {
        match self.interval_ratio {
            Some(ratio) => ratio,
            None if self.is_flat() => FLAT_INTERVAL_RATIO,
            None => DEFAULT_INTERVAL_RATIO,
        }
    }

    /// Returns `true` if [`LayoutFlags::LOOP`] is set.
    #[must_use]
    pub const fn is_looping(&self) -> bool {
        self.flags.contains(LayoutFlags::LOOP)
    }

    /// Returns `true` if [`LayoutFlags::FLAT`] is set.
    #[must_use]
    pub const fn is_flat(&self) -> bool {
        self.flags.contains(LayoutFlags::FLAT)
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self::cover_flow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_ratio_falls_back_per_mode() {
        assert_eq!(
            CarouselConfig::cover_flow().effective_interval_ratio(),
            DEFAULT_INTERVAL_RATIO
        );
        assert_eq!(
            CarouselConfig::cover_flow()
                .flat(true)
                .effective_interval_ratio(),
            FLAT_INTERVAL_RATIO
        );
        assert_eq!(
            CarouselConfig::cover_flow()
                .flat(true)
                .interval_ratio(0.6)
                .effective_interval_ratio(),
            0.6
        );
        let cleared = CarouselConfig::cover_flow()
            .interval_ratio(0.6)
            .interval_ratio(-1.0);
        assert_eq!(cleared.interval_ratio, None);
    }

    #[test]
    fn toggles_set_and_clear_flags() {
        let config = CarouselConfig::cover_flow().tilt(true).alpha_fade(true);
        assert_eq!(config.flags, LayoutFlags::TILT | LayoutFlags::ALPHA_FADE);
        let config = config.tilt(false);
        assert_eq!(config.flags, LayoutFlags::ALPHA_FADE);
    }

    #[test]
    fn stacked_defaults_use_squared_alpha() {
        let config = CarouselConfig::stacked();
        assert!(config.curves.alpha_squared);
        assert_eq!(config.curves.alpha_floor, 0.1);
        assert_eq!(config.scan_radius, 10);
        assert_eq!(config.profile, Profile::STACKED);
    }
}
