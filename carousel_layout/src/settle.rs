// Copyright 2025 the Carousel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Snap-to-slot animation driven by explicit timestamps.
//!
//! Nothing here owns a clock. The host reports scroll-phase changes and frame
//! callbacks with a monotonically increasing `now_ms`, and the controller
//! answers with the offset to lay out at. Tests drive it with hand-picked
//! timestamps.
//!
//! ```
//! use carousel_layout::settle::{SettleAnimation, Easing};
//!
//! let anim = SettleAnimation::new(170, 200, 1_000, 500).with_easing(Easing::Linear);
//! assert_eq!(anim.sample(1_000), 170);
//! assert_eq!(anim.sample(1_250), 185);
//! assert_eq!(anim.sample(1_500), 200);
//! assert!(anim.is_done(1_500));
//! ```

use crate::geometry::round_half_up;
use crate::types::{ScrollDirection, ScrollPhase};

/// Timing curve for a settle animation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Starts fast and slows into the target: `1 − (1 − t)²`.
    #[default]
    Decelerate,
}

impl Easing {
    /// Maps linear progress `t ∈ [0, 1]` through the curve.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Decelerate => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

/// One offset animation from `from` to `to`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SettleAnimation {
    from: i64,
    to: i64,
    start_ms: u64,
    duration_ms: u64,
    easing: Easing,
}

impl SettleAnimation {
    /// Creates a decelerating animation starting at `start_ms`.
    #[must_use]
    pub const fn new(from: i64, to: i64, start_ms: u64, duration_ms: u64) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
            easing: Easing::Decelerate,
        }
    }

    /// Replaces the timing curve.
    #[must_use]
    pub const fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Starting offset.
    #[must_use]
    pub const fn origin(&self) -> i64 {
        self.from
    }

    /// Target offset.
    #[must_use]
    pub const fn target(&self) -> i64 {
        self.to
    }

    /// Direction the offset travels.
    #[must_use]
    pub const fn direction(&self) -> ScrollDirection {
        if self.from < self.to {
            ScrollDirection::Forward
        } else {
            ScrollDirection::Backward
        }
    }

    /// Linear progress in `[0, 1]` at `now_ms`.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        reason = "Animation durations are a few seconds at most"
    )]
    pub fn progress(&self, now_ms: u64) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(self.start_ms);
        (elapsed as f64 / self.duration_ms as f64).min(1.0)
    }

    /// Returns `true` once the duration has elapsed.
    #[must_use]
    pub fn is_done(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.start_ms) >= self.duration_ms
    }

    /// Offset at `now_ms`. Exactly `to` once the animation is done.
    #[must_use]
    pub fn sample(&self, now_ms: u64) -> i64 {
        if self.is_done(now_ms) {
            return self.to;
        }
        let eased = self.easing.apply(self.progress(now_ms));
        let span = (self.to - self.from) as f64;
        round_half_up(self.from as f64 + span * eased)
    }
}

/// Result of sampling the controller on a frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SettleTick {
    /// Offset to lay out at.
    pub offset: i64,
    /// Direction of travel of the running animation.
    pub direction: ScrollDirection,
    /// `true` on the final tick; the animation has been cleared.
    pub finished: bool,
}

/// Scroll-phase tracking plus at most one running settle animation.
///
/// Starting an animation replaces any running one, so two animations never
/// race to write the offset.
#[derive(Clone, Debug, Default)]
pub struct SettleController {
    phase: ScrollPhase,
    animation: Option<SettleAnimation>,
    easing: Easing,
}

impl SettleController {
    /// Creates an idle controller with no animation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `easing` for animations started from now on.
    #[must_use]
    pub const fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Last phase reported by the host.
    #[must_use]
    pub const fn phase(&self) -> ScrollPhase {
        self.phase
    }

    /// The running animation, if any.
    #[must_use]
    pub const fn animation(&self) -> Option<&SettleAnimation> {
        self.animation.as_ref()
    }

    /// Returns `true` while an animation is running.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Records a scroll-phase change.
    ///
    /// Returns `true` when the caller should plan a snap: the phase is
    /// [`ScrollPhase::Idle`] and no animation is already running. A new drag
    /// cancels any running animation.
    pub fn on_phase_changed(&mut self, phase: ScrollPhase) -> bool {
        self.phase = phase;
        match phase {
            ScrollPhase::Dragging => {
                self.cancel();
                false
            }
            ScrollPhase::Settling => false,
            ScrollPhase::Idle => self.animation.is_none(),
        }
    }

    /// Starts animating from `from` to `to`, replacing any running animation.
    pub fn start(&mut self, from: i64, to: i64, now_ms: u64, duration_ms: u64) {
        self.animation =
            Some(SettleAnimation::new(from, to, now_ms, duration_ms).with_easing(self.easing));
    }

    /// Stops the running animation. Returns `true` if one was running.
    pub fn cancel(&mut self) -> bool {
        self.animation.take().is_some()
    }

    /// Samples the running animation at `now_ms`.
    ///
    /// Returns `None` when nothing is running. The tick that reaches the
    /// target carries `finished: true` and clears the animation.
    pub fn sample(&mut self, now_ms: u64) -> Option<SettleTick> {
        let animation = self.animation?;
        let finished = animation.is_done(now_ms);
        if finished {
            self.animation = None;
        }
        Some(SettleTick {
            offset: animation.sample(now_ms),
            direction: animation.direction(),
            finished,
        })
    }

    /// Drops the animation and returns to [`ScrollPhase::Idle`].
    pub fn reset(&mut self) {
        self.animation = None;
        self.phase = ScrollPhase::Idle;
    }
}
