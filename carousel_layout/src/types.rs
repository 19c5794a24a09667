// Copyright 2025 the Carousel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public value types: world-space frames, per-view transforms, and the small
//! enums that describe scroll direction and host scroll state.

use kurbo::{Affine, Rect};

/// An item rectangle in integer world units.
///
/// Frames are computed as if the scroll offset were zero; the engine shifts
/// them by the live offset when laying out.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ItemFrame {
    /// Left edge (inclusive).
    pub left: i64,
    /// Top edge (inclusive).
    pub top: i64,
    /// Right edge (exclusive).
    pub right: i64,
    /// Bottom edge (exclusive).
    pub bottom: i64,
}

impl ItemFrame {
    /// Creates a frame from its four edges.
    #[must_use]
    pub const fn new(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Horizontal size of the frame.
    #[must_use]
    pub const fn width(&self) -> i64 {
        self.right - self.left
    }

    /// Vertical size of the frame.
    #[must_use]
    pub const fn height(&self) -> i64 {
        self.bottom - self.top
    }

    /// Returns `true` if the two frames share a non-empty area.
    ///
    /// Frames that only touch along an edge do not intersect.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    /// Returns this frame moved horizontally by `dx`.
    #[must_use]
    pub const fn shifted_x(self, dx: i64) -> Self {
        Self {
            left: self.left + dx,
            top: self.top,
            right: self.right + dx,
            bottom: self.bottom,
        }
    }

    /// Converts to a [`kurbo::Rect`] for hosts that position views in floating point.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        reason = "World units stay far below 2^52 for any realistic layout"
    )]
    pub fn to_rect(self) -> Rect {
        Rect::new(
            self.left as f64,
            self.top as f64,
            self.right as f64,
            self.bottom as f64,
        )
    }
}

/// Everything a host needs to place and paint one attached view.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ItemTransform {
    /// Laid-out frame in viewport coordinates (scroll offset already applied).
    pub frame: ItemFrame,
    /// Uniform scale about the frame center, in `[0, 1]`.
    pub scale: f32,
    /// Opacity, in `[0, 1]`.
    pub alpha: f32,
    /// Colour retention for the grey fade; `1.0` means full colour.
    pub grey_level: f32,
    /// Rotation about the vertical axis, in degrees.
    pub rotation_y: f32,
}

impl ItemTransform {
    /// A transform that places the view at `frame` with no visual effects.
    #[must_use]
    pub const fn plain(frame: ItemFrame) -> Self {
        Self {
            frame,
            scale: 1.0,
            alpha: 1.0,
            grey_level: 1.0,
            rotation_y: 0.0,
        }
    }

    /// Laid-out frame as a [`kurbo::Rect`].
    #[must_use]
    pub fn rect(&self) -> Rect {
        self.frame.to_rect()
    }

    /// The 2D part of this transform: a uniform scale about the frame center.
    ///
    /// Tilt (`rotation_y`) is a 3D effect and is not represented here.
    #[must_use]
    pub fn affine(&self) -> Affine {
        let center = self.rect().center().to_vec2();
        Affine::translate(center) * Affine::scale(f64::from(self.scale)) * Affine::translate(-center)
    }
}

/// Where a newly attached view is inserted in the host's child list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AttachAt {
    /// Before all existing children.
    Head,
    /// After all existing children.
    Tail,
}

/// Direction of travel of the scroll offset during a layout pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    /// Offset increasing; items move toward the leading edge.
    Forward,
    /// Offset decreasing; items move toward the trailing edge.
    Backward,
}

impl ScrollDirection {
    /// Direction implied by a signed delta. Zero counts as backward.
    #[must_use]
    pub const fn of_delta(delta: i64) -> Self {
        if delta > 0 {
            Self::Forward
        } else {
            Self::Backward
        }
    }
}

/// Scroll state reported by the host's gesture machinery.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollPhase {
    /// No gesture or fling in progress.
    #[default]
    Idle,
    /// The user is dragging.
    Dragging,
    /// A fling is running after the drag was released.
    Settling,
}

/// Kind of layout pass the host is running.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayoutPass {
    /// A real pass; views are placed.
    #[default]
    Full,
    /// A host-internal measurement pass ahead of an item animation. Engines
    /// treat it as a no-op.
    PreLayout,
}

/// Normalizes a logical index into an adapter index in `[0, item_count)`.
///
/// Returns `0` when `item_count` is zero.
#[must_use]
pub fn normalize_index(logical: i64, item_count: usize) -> usize {
    let Ok(count) = i64::try_from(item_count) else {
        return usize::try_from(logical).unwrap_or(0);
    };
    if count == 0 {
        return 0;
    }
    usize::try_from(logical.rem_euclid(count)).unwrap_or(0)
}

/// Nearest slot to `offset` for slots spaced `interval` apart.
///
/// At exactly half an interval the result rounds away from zero: a positive
/// remainder rounds up and a negative remainder rounds down. Returns `None`
/// when `interval` is not positive.
#[must_use]
pub const fn nearest_slot(offset: i64, interval: i64) -> Option<i64> {
    if interval <= 0 {
        return None;
    }
    let mut slot = offset / interval;
    let more = offset % interval;
    if more.abs() * 2 >= interval {
        if more >= 0 {
            slot += 1;
        } else {
            slot -= 1;
        }
    }
    Some(slot)
}
