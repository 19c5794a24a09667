// Copyright 2025 the Carousel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Paint order for the child at `child_slot` when overlapping items must
/// stack toward the centered one.
///
/// Children left of `center` paint in child order. Children at or right of it
/// paint in reverse distance order, so the centered item paints last. The
/// result is clamped to `[0, child_count)`.
///
/// Hosts call this from their draw-order hook, passing the logical index of
/// the child (see [`CarouselEngine::drawing_order`](crate::CarouselEngine::drawing_order)).
///
/// ```
/// use carousel_layout::child_drawing_order;
///
/// // Five children laid out for logical indices 3..=7, centered on 5.
/// let order: Vec<usize> = (0..5)
///     .map(|slot| child_drawing_order(5, slot, 5, 3 + slot as i64))
///     .collect();
/// assert_eq!(order, [0, 1, 4, 3, 2]);
/// ```
#[must_use]
pub fn child_drawing_order(child_count: usize, child_slot: usize, center: i64, logical: i64) -> usize {
    let Some(last) = child_count.checked_sub(1) else {
        return 0;
    };
    let last = i64::try_from(last).unwrap_or(i64::MAX);
    let distance = logical - center;
    let order = if distance < 0 {
        i64::try_from(child_slot).unwrap_or(i64::MAX)
    } else {
        last - distance
    };
    usize::try_from(order.clamp(0, last)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn far_right_children_clamp_to_zero() {
        assert_eq!(child_drawing_order(3, 2, 0, 10), 0);
    }

    #[test]
    fn left_children_beyond_count_clamp_to_last() {
        assert_eq!(child_drawing_order(3, 7, 5, 1), 2);
    }

    #[test]
    fn empty_child_list_yields_zero() {
        assert_eq!(child_drawing_order(0, 0, 0, 0), 0);
    }
}
