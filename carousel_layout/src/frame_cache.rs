// Copyright 2025 the Carousel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use hashbrown::HashMap;

use crate::geometry::Metrics;
use crate::types::ItemFrame;

/// Sparse, bounded cache of world frames keyed by logical index.
///
/// Only indices in `0..bound` are stored. Anything outside that range is
/// computed on demand and discarded, so memory stays constant regardless of
/// how far a looping carousel travels.
#[derive(Clone, Debug)]
pub struct FrameCache {
    frames: HashMap<i64, ItemFrame>,
    bound: usize,
}

impl FrameCache {
    /// Creates an empty cache that stores indices `0..bound`.
    #[must_use]
    pub fn new(bound: usize) -> Self {
        Self {
            frames: HashMap::new(),
            bound,
        }
    }

    /// Returns the frame of `index`, computing and storing it on first access
    /// when within the bound.
    pub fn get(&mut self, index: i64, metrics: &Metrics) -> ItemFrame {
        if !self.in_bound(index) {
            return metrics.frame(index);
        }
        *self
            .frames
            .entry(index)
            .or_insert_with(|| metrics.frame(index))
    }

    /// Drops every cached frame.
    pub fn invalidate_all(&mut self) {
        self.frames.clear();
    }

    /// Changes the bound, dropping entries that fall outside it.
    pub fn set_bound(&mut self, bound: usize) {
        self.bound = bound;
        self.frames.retain(|&index, _| {
            usize::try_from(index).is_ok_and(|index| index < bound)
        });
    }

    /// Upper bound (exclusive) on cached indices.
    #[must_use]
    pub const fn bound(&self) -> usize {
        self.bound
    }

    /// Returns `true` if `index` currently has a stored frame.
    #[must_use]
    pub fn is_cached(&self, index: i64) -> bool {
        self.frames.contains_key(&index)
    }

    /// Number of stored frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn in_bound(&self, index: i64) -> bool {
        usize::try_from(index).is_ok_and(|index| index < self.bound)
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Size;

    use super::*;
    use crate::config::CarouselConfig;

    fn metrics() -> Metrics {
        Metrics::resolve(
            &CarouselConfig::cover_flow(),
            Size::new(1000.0, 300.0),
            Size::new(500.0, 200.0),
            1000,
        )
        .unwrap()
    }

    #[test]
    fn stores_only_within_bound() {
        let m = metrics();
        let mut cache = FrameCache::new(4);
        assert_eq!(cache.get(2, &m), m.frame(2));
        assert_eq!(cache.get(7, &m), m.frame(7));
        assert_eq!(cache.get(-1, &m), m.frame(-1));
        assert!(cache.is_cached(2));
        assert!(!cache.is_cached(7));
        assert!(!cache.is_cached(-1));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalidation_forgets_stale_metrics() {
        let m = metrics();
        let mut cache = FrameCache::new(100);
        let _ = cache.get(3, &m);
        cache.invalidate_all();
        assert!(cache.is_empty());

        let wider = Metrics::resolve(
            &CarouselConfig::cover_flow(),
            Size::new(1000.0, 300.0),
            Size::new(1250.0, 200.0),
            1000,
        )
        .unwrap();
        assert_eq!(wider.interval, 250);
        assert_eq!(cache.get(3, &wider).left, wider.start_x + 750);
    }

    #[test]
    fn shrinking_the_bound_evicts() {
        let m = metrics();
        let mut cache = FrameCache::new(10);
        for i in 0..10 {
            let _ = cache.get(i, &m);
        }
        cache.set_bound(3);
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.bound(), 3);
    }
}
