// Copyright 2025 the Carousel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deciding which card a released gesture settles on.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::config::SnapThresholds;

/// Snap state carried between gestures.
///
/// Remembers the offset the stack last settled at, to tell forward swipes
/// from backward ones, and the target chosen for the gesture in flight so
/// repeated queries during one settle agree.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SnapState {
    last_settled: i64,
    fixed: Option<i64>,
}

impl SnapState {
    /// Creates a state settled at offset zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_settled: 0,
            fixed: None,
        }
    }

    /// Offset the stack last settled at.
    #[must_use]
    pub const fn last_settled(&self) -> i64 {
        self.last_settled
    }

    /// Records that the stack came to rest at `offset`.
    pub fn settled_at(&mut self, offset: i64) {
        self.last_settled = offset;
        self.fixed = None;
    }

    /// Card index the stack should settle on from `offset`.
    ///
    /// An exact card boundary, or a fraction inside one of the close bands,
    /// settles immediately and is recorded. Otherwise the choice depends on
    /// whether the gesture moved forward or backward from the last settled
    /// offset, and is held until the stack settles.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        reason = "Card indices are far below f64 precision"
    )]
    pub fn target_position(&mut self, offset: i64, width: i64, thresholds: &SnapThresholds) -> i64 {
        let base = offset.div_euclid(width);
        let rest = offset.rem_euclid(width);
        let fraction = rest as f64 / width as f64;
        if rest == 0 {
            self.settled_at(offset);
            return base;
        }
        if fraction > thresholds.close_high {
            self.settled_at((base + 1) * width);
            return base + 1;
        }
        if fraction < thresholds.close_low {
            self.settled_at(base * width);
            return base;
        }
        if let Some(fixed) = self.fixed {
            return fixed;
        }
        let fixed = if offset > self.last_settled {
            base + (fraction + thresholds.swipe).floor() as i64
        } else {
            let previous = (self.last_settled.div_euclid(width) - 1).min(base);
            let past_previous = (base - previous) as f64 + fraction;
            if past_previous < thresholds.swipe {
                previous
            } else {
                previous + 1
            }
        };
        self.fixed = Some(fixed);
        fixed
    }

    /// Forgets both the settled offset and any held target.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
