// Copyright 2025 the Carousel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::hash::Hash;

use hashbrown::HashMap;

use crate::error::LayoutError;

/// Bookkeeping of which logical indices currently have an attached view.
///
/// Keyed by logical index rather than adapter index: under looping many
/// logical slots share one adapter index, so the adapter index cannot recover
/// a view's slot. The reverse table plays the role of a tag on the view.
#[derive(Clone, Debug)]
pub struct AttachTracker<V> {
    by_index: HashMap<i64, V>,
    tags: HashMap<V, i64>,
}

impl<V> Default for AttachTracker<V> {
    fn default() -> Self {
        Self {
            by_index: HashMap::new(),
            tags: HashMap::new(),
        }
    }
}

impl<V: Copy + Eq + Hash> AttachTracker<V> {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `view` as attached at `logical`.
    ///
    /// Fails if `view` is already attached at a different logical index.
    /// Re-tagging a view at its own index is a no-op.
    pub fn tag(&mut self, view: V, logical: i64) -> Result<(), LayoutError> {
        if let Some(&existing) = self.tags.get(&view) {
            if existing == logical {
                return Ok(());
            }
            return Err(LayoutError::ViewAlreadyTagged { logical, existing });
        }
        if let Some(previous) = self.by_index.insert(logical, view) {
            self.tags.remove(&previous);
        }
        self.tags.insert(view, logical);
        Ok(())
    }

    /// Logical index `view` is attached at, if the tracker knows it.
    #[must_use]
    pub fn logical_of(&self, view: V) -> Option<i64> {
        self.tags.get(&view).copied()
    }

    /// Returns `true` if some view is attached at `logical`.
    #[must_use]
    pub fn is_attached(&self, logical: i64) -> bool {
        self.by_index.contains_key(&logical)
    }

    /// Forgets `view`, returning the logical index it was attached at.
    pub fn release(&mut self, view: V) -> Option<i64> {
        let logical = self.tags.remove(&view)?;
        self.by_index.remove(&logical);
        Some(logical)
    }

    /// Removes every record.
    pub fn clear(&mut self) {
        self.by_index.clear();
        self.tags.clear();
    }

    /// Number of attached views.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    /// Returns `true` if nothing is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }

    /// Iterates over `(logical index, view)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, V)> + '_ {
        self.by_index.iter().map(|(&logical, &view)| (logical, view))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn tag_and_release_round_trip() {
        let mut tracker = AttachTracker::new();
        tracker.tag(7_u32, -3).unwrap();
        tracker.tag(8_u32, 1).unwrap();
        assert_eq!(tracker.logical_of(7), Some(-3));
        assert_eq!(tracker.logical_of(8), Some(1));
        assert!(tracker.is_attached(-3));

        assert_eq!(tracker.release(7), Some(-3));
        assert!(!tracker.is_attached(-3));
        assert_eq!(tracker.release(7), None);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn same_adapter_view_at_two_slots_is_rejected() {
        let mut tracker = AttachTracker::new();
        tracker.tag(1_u32, 0).unwrap();
        tracker.tag(1_u32, 0).unwrap();
        assert_eq!(
            tracker.tag(1_u32, 4),
            Err(LayoutError::ViewAlreadyTagged {
                logical: 4,
                existing: 0
            })
        );
    }

    #[test]
    fn retagging_a_slot_drops_the_old_view() {
        let mut tracker = AttachTracker::new();
        tracker.tag(1_u32, 5).unwrap();
        tracker.tag(2_u32, 5).unwrap();
        assert_eq!(tracker.logical_of(1), None);
        assert_eq!(tracker.logical_of(2), Some(5));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn iter_and_clear_cover_both_tables() {
        let mut tracker = AttachTracker::new();
        tracker.tag(1_u32, 0).unwrap();
        tracker.tag(2_u32, -1).unwrap();
        let mut pairs: Vec<(i64, u32)> = tracker.iter().collect();
        pairs.sort_unstable();
        assert_eq!(pairs, [(-1, 2), (0, 1)]);

        tracker.clear();
        assert!(tracker.is_empty());
        assert_eq!(tracker.logical_of(1), None);
        assert!(!tracker.is_attached(0));
    }
}
