// Copyright 2025 the Carousel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use smallvec::{SmallVec, smallvec};

/// Scale and alpha entries for cards below the top one, nearest first.
pub type FalloffTable = SmallVec<[f32; 4]>;

/// Fractions of a card width that decide where a released gesture snaps.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SnapThresholds {
    /// Above this fraction the next card is taken regardless of direction.
    pub close_high: f64,
    /// Below this fraction the current card is kept regardless of direction.
    pub close_low: f64,
    /// Swipe threshold between the two close bands.
    ///
    /// A forward swipe advances once it passes `1 - swipe` of a card. A
    /// backward swipe returns once it has moved back past `1 - swipe`.
    pub swipe: f64,
}

impl Default for SnapThresholds {
    fn default() -> Self {
        Self {
            close_high: 0.98,
            close_low: 0.02,
            swipe: 0.8,
        }
    }
}

/// Configuration of a [`CardStackEngine`](crate::CardStackEngine).
#[derive(Clone, Debug, PartialEq)]
pub struct CardStackConfig {
    /// Cards shown beneath the top one.
    pub max_count: usize,
    /// Horizontal step between stacked cards, in world units.
    pub item_space: i64,
    /// Base scale of each stacked card. Missing entries repeat the last one.
    pub scales: FalloffTable,
    /// Base alpha of each stacked card. Missing entries repeat the last one.
    pub alphas: FalloffTable,
    /// Wrap past the last card instead of stopping.
    pub looping: bool,
    /// Snap decision thresholds.
    pub snap: SnapThresholds,
    /// Duration of the snap animation.
    pub settle_duration_ms: u64,
}

impl Default for CardStackConfig {
    fn default() -> Self {
        Self {
            max_count: 3,
            item_space: 24,
            scales: smallvec![0.8957, 0.776, 0.625],
            alphas: smallvec![0.5, 0.15, 0.05],
            looping: false,
            snap: SnapThresholds::default(),
            settle_duration_ms: 300,
        }
    }
}

impl CardStackConfig {
    /// Sets how many cards show beneath the top one.
    #[must_use]
    pub fn max_count(mut self, max_count: usize) -> Self {
        self.max_count = max_count;
        self
    }

    /// Sets the step between stacked cards.
    #[must_use]
    pub fn item_space(mut self, item_space: i64) -> Self {
        self.item_space = item_space;
        self
    }

    /// Replaces the scale table.
    #[must_use]
    pub fn scales(mut self, scales: &[f32]) -> Self {
        self.scales = SmallVec::from_slice(scales);
        self
    }

    /// Replaces the alpha table.
    #[must_use]
    pub fn alphas(mut self, alphas: &[f32]) -> Self {
        self.alphas = SmallVec::from_slice(alphas);
        self
    }

    /// Enables or disables wrapping.
    #[must_use]
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Replaces the snap thresholds.
    #[must_use]
    pub fn snap(mut self, snap: SnapThresholds) -> Self {
        self.snap = snap;
        self
    }

    /// Sets the snap animation duration.
    #[must_use]
    pub fn settle_duration(mut self, duration_ms: u64) -> Self {
        self.settle_duration_ms = duration_ms;
        self
    }

    /// Base scale of the card `depth` places below the top (1-based).
    #[must_use]
    pub fn scale_at(&self, depth: usize) -> f32 {
        table_at(&self.scales, depth)
    }

    /// Base alpha of the card `depth` places below the top (1-based).
    #[must_use]
    pub fn alpha_at(&self, depth: usize) -> f32 {
        table_at(&self.alphas, depth)
    }
}

fn table_at(table: &[f32], depth: usize) -> f32 {
    match depth.checked_sub(1) {
        None => 1.0,
        Some(i) => table.get(i).or(table.last()).copied().unwrap_or(1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_zero_is_the_top_card() {
        let config = CardStackConfig::default();
        assert_eq!(config.scale_at(0), 1.0);
        assert_eq!(config.alpha_at(0), 1.0);
        assert_eq!(config.scale_at(1), 0.8957);
        assert_eq!(config.alpha_at(3), 0.05);
    }

    #[test]
    fn short_tables_repeat_the_last_entry() {
        let config = CardStackConfig::default().max_count(5).scales(&[0.9, 0.8]);
        assert_eq!(config.scale_at(2), 0.8);
        assert_eq!(config.scale_at(5), 0.8);
        let empty = CardStackConfig::default().alphas(&[]);
        assert_eq!(empty.alpha_at(2), 1.0);
    }
}
