// Copyright 2025 the Carousel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Where each card of the stack goes for a given scroll offset.
//!
//! The top card slides off to the left as the offset grows. Every card below
//! it moves one step toward the top and interpolates its scale and alpha
//! toward the entry of the card above it, so when the top card has fully
//! slid off the stack looks exactly as it did one card earlier.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Size;
use smallvec::SmallVec;

use carousel_layout::{ItemFrame, ItemTransform};

use crate::config::CardStackConfig;

/// Largest gap, in world units, that still counts as "the top card had slid
/// almost all the way off" when the offset lands on a card boundary.
pub const BOUNDARY_SLACK: i64 = 10;

/// Card size resolved from a measurement pass, in integer world units.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CardSize {
    /// Card width; also the scroll distance between two cards.
    pub width: i64,
    /// Card height.
    pub height: i64,
}

impl CardSize {
    /// Rounds a measured size to world units.
    ///
    /// Returns `None` when the card has no width, since nothing could scroll.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Measured sizes are bounded by the viewport"
    )]
    pub fn from_measured(measured: Size) -> Option<Self> {
        let width = (measured.width + 0.5).floor() as i64;
        let height = (measured.height + 0.5).floor() as i64;
        (width > 0).then_some(Self {
            width,
            height: height.max(0),
        })
    }
}

/// Top card index and how far it has slid off.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StackPosition {
    /// Logical index of the top card.
    pub top: i64,
    /// Distance the top card has slid left, in `[0, card width]`.
    pub scrolled: i64,
}

impl StackPosition {
    /// Splits `offset` into a top card and its slide distance.
    ///
    /// `last_scrolled` is the slide distance of the previous pass. When the
    /// offset lands exactly on a boundary right after the previous card had
    /// slid within [`BOUNDARY_SLACK`] of fully off, the previous card is kept
    /// on top at `scrolled == width` so the stack does not jump.
    #[must_use]
    pub fn resolve(offset: i64, width: i64, last_scrolled: i64) -> Self {
        let top = offset.div_euclid(width);
        let scrolled = offset.rem_euclid(width);
        if scrolled == 0
            && top > 0
            && last_scrolled != width
            && (width - last_scrolled).abs() <= BOUNDARY_SLACK
        {
            return Self {
                top: top - 1,
                scrolled: width,
            };
        }
        Self { top, scrolled }
    }

    /// Fraction of the top card that has slid off, in `[0, 1]`.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        reason = "Slide distances are bounded by the card width"
    )]
    pub fn percent(&self, width: i64) -> f32 {
        self.scrolled as f32 / width as f32
    }
}

/// One card of the stack.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CardSlot {
    /// Places below the top card; `0` is the top card.
    pub depth: usize,
    /// Left edge before the scale adjustment.
    pub left: i64,
    /// Uniform scale.
    pub scale: f32,
    /// Opacity.
    pub alpha: f32,
}

impl CardSlot {
    /// Places the card in a viewport whose content starts at `top`.
    ///
    /// The left edge moves right by half the width lost to scaling, so the
    /// scaled card stays anchored at `left` rather than at its center.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        reason = "Card sizes are bounded by the viewport"
    )]
    pub fn transform(&self, size: CardSize, top: i64) -> ItemTransform {
        let scaled_width = (size.width as f32 * self.scale) as i64;
        let left = (size.width - scaled_width) / 2 + self.left;
        ItemTransform {
            scale: self.scale,
            alpha: self.alpha,
            ..ItemTransform::plain(ItemFrame::new(
                left,
                top,
                left + size.width,
                top + size.height,
            ))
        }
    }
}

/// Cards to lay out at `position`, top card first.
///
/// `available` bounds how many cards exist from the top card on; pass `None`
/// when looping.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "Card spacing is a small world-unit step"
)]
pub fn card_slots(
    config: &CardStackConfig,
    position: StackPosition,
    width: i64,
    available: Option<usize>,
) -> SmallVec<[CardSlot; 8]> {
    let percent = position.percent(width);
    let mut slots = SmallVec::new();
    slots.push(CardSlot {
        depth: 0,
        left: -position.scrolled,
        scale: 1.0,
        alpha: 1.0,
    });

    let space = config.item_space;
    let mut last_scale = 1.0_f32;
    let mut last_alpha = 1.0_f32;
    let mut previous_left = 0_i64;
    for depth in 1..=config.max_count {
        if available.is_some_and(|available| depth >= available) {
            break;
        }
        let base_scale = config.scale_at(depth);
        let base_alpha = config.alpha_at(depth);
        let left = previous_left + (space as f32 * (1.0 - percent)) as i64;
        slots.push(CardSlot {
            depth,
            left,
            scale: base_scale + (last_scale - base_scale) * percent,
            alpha: base_alpha + (last_alpha - base_alpha) * percent,
        });
        last_scale = base_scale;
        last_alpha = base_alpha;
        previous_left += space;
    }
    slots
}
