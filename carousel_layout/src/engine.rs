// Copyright 2025 the Carousel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The cover-flow engine: layout passes, scrolling and settling.

use alloc::vec::Vec;
use core::hash::Hash;
use core::mem;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::config::CarouselConfig;
use crate::draw_order::child_drawing_order;
use crate::error::LayoutError;
use crate::frame_cache::FrameCache;
use crate::geometry::{Metrics, item_transform};
use crate::host::LayoutHost;
use crate::settle::SettleController;
use crate::tracker::AttachTracker;
use crate::types::{AttachAt, LayoutPass, ScrollDirection, ScrollPhase, nearest_slot, normalize_index};

/// Virtualized cover-flow layout engine.
///
/// One engine belongs to one host instance and exclusively owns the scroll
/// offset, the attach tracker and the frame cache. The host drives it through
/// the `on_*`, `scroll_*` and `notify_*` entry points and receives attach,
/// recycle and transform calls back through [`LayoutHost`].
///
/// ```rust
/// use carousel_layout::{CarouselConfig, CarouselEngine, LayoutPass, RecordingHost};
/// use kurbo::Size;
///
/// let mut host = RecordingHost::new(5, Size::new(1000.0, 300.0), Size::new(500.0, 200.0));
/// let mut engine = CarouselEngine::new(CarouselConfig::cover_flow());
///
/// engine.scroll_to_position(&mut host, 3).unwrap();
/// engine.on_layout_children(&mut host, LayoutPass::Full).unwrap();
///
/// assert_eq!(engine.offset(), 300);
/// assert_eq!(host.selections(), [3]);
/// ```
#[derive(Debug)]
pub struct CarouselEngine<V> {
    config: CarouselConfig,
    metrics: Option<Metrics>,
    offset: i64,
    frames: FrameCache,
    tracker: AttachTracker<V>,
    settle: SettleController,
    selected: usize,
    last_reported: usize,
    pending_position: Option<usize>,
    scratch: Vec<V>,
}

impl<V: Copy + Eq + Hash> CarouselEngine<V> {
    /// Creates an engine that has not laid anything out yet.
    #[must_use]
    pub fn new(config: CarouselConfig) -> Self {
        Self {
            config,
            metrics: None,
            offset: 0,
            frames: FrameCache::new(config.frame_cache_bound),
            tracker: AttachTracker::new(),
            settle: SettleController::new().with_easing(config.settle_easing),
            selected: 0,
            last_reported: 0,
            pending_position: None,
            scratch: Vec::new(),
        }
    }

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// Replaces the configuration and resets the engine.
    ///
    /// The next full layout pass rebuilds everything from scratch.
    pub fn set_config(&mut self, config: CarouselConfig) {
        self.config = config;
        self.frames.set_bound(config.frame_cache_bound);
        self.reset();
        self.settle = SettleController::new().with_easing(config.settle_easing);
        debug!(flags = ?config.flags, "carousel config replaced");
    }

    /// Forgets all layout state: offset, attached views, cached frames,
    /// selection and any pending scroll request.
    ///
    /// Views that were attached stay in the host until the next full layout
    /// pass recycles them.
    pub fn notify_adapter_reset(&mut self) {
        self.reset();
        debug!("carousel adapter reset");
    }

    fn reset(&mut self) {
        self.metrics = None;
        self.offset = 0;
        self.frames.invalidate_all();
        self.tracker.clear();
        self.settle.reset();
        self.selected = 0;
        self.last_reported = 0;
        self.pending_position = None;
    }

    /// Metrics from the last full layout pass, if any.
    #[must_use]
    pub const fn metrics(&self) -> Option<&Metrics> {
        self.metrics.as_ref()
    }

    /// Accumulated scroll offset in world units.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        self.offset
    }

    /// Returns `true` once a full layout pass has resolved metrics.
    #[must_use]
    pub const fn is_laid_out(&self) -> bool {
        self.metrics.is_some()
    }

    /// Returns `true` while a settle or smooth-scroll animation is running.
    #[must_use]
    pub const fn is_settling(&self) -> bool {
        self.settle.is_animating()
    }

    /// Read access to the attach tracker.
    #[must_use]
    pub const fn tracker(&self) -> &AttachTracker<V> {
        &self.tracker
    }

    /// Read access to the frame cache.
    #[must_use]
    pub const fn frame_cache(&self) -> &FrameCache {
        &self.frames
    }

    /// Handles a host layout request.
    ///
    /// A pre-layout pass lays nothing out and resets the offset to zero. A full
    /// pass recycles every attached child first; with no items it then forgets
    /// the metrics so scrolling stops until items return. Otherwise the item
    /// is re-measured and the visible window is rebuilt. On the first
    /// pass a position recorded by [`scroll_to_position`](Self::scroll_to_position)
    /// becomes the initial centered slot and is reported as the selection.
    pub fn on_layout_children<H>(&mut self, host: &mut H, pass: LayoutPass) -> Result<(), LayoutError>
    where
        H: LayoutHost<View = V>,
    {
        if pass == LayoutPass::PreLayout {
            self.offset = 0;
            return Ok(());
        }
        let item_count = host.item_count();
        let first_layout = self.metrics.is_none();

        self.frames.invalidate_all();
        self.tracker.clear();
        let mut children = mem::take(&mut self.scratch);
        children.clear();
        host.attached_views(&mut children);
        for &view in &children {
            host.detach_and_recycle(view);
        }
        self.scratch = children;

        if item_count == 0 {
            debug!("carousel has no items, layout cleared");
            self.settle.cancel();
            self.metrics = None;
            self.offset = 0;
            return Ok(());
        }

        let measured = host.measure_item();
        let Some(metrics) = Metrics::resolve(&self.config, host.viewport(), measured, item_count)
        else {
            debug!("carousel viewport cannot hold an item, nothing laid out");
            self.metrics = None;
            return Ok(());
        };
        self.metrics = Some(metrics);

        if first_layout
            && let Some(position) = self.pending_position.take()
            && position < item_count
        {
            self.offset = metrics.offset_for_position(to_logical(position));
        }
        if !self.config.is_looping() {
            self.offset = self.offset.clamp(0, metrics.max_offset());
        }
        debug!(
            item_count,
            interval = metrics.interval,
            offset = self.offset,
            "carousel full layout"
        );
        self.layout_items(host, ScrollDirection::Forward)?;
        if first_layout {
            self.dispatch_selection(host);
        }
        Ok(())
    }

    /// Scrolls by `dx` world units and returns the distance actually travelled.
    ///
    /// Without looping the offset is clamped to `[0, max_offset]`; with looping
    /// it saturates at the ends of the `i64` range. Any running
    /// animation is cancelled first. Nothing moves before the first layout.
    pub fn scroll_by<H>(&mut self, host: &mut H, dx: i64) -> Result<i64, LayoutError>
    where
        H: LayoutHost<View = V>,
    {
        self.settle.cancel();
        let Some(metrics) = self.metrics else {
            return Ok(0);
        };
        let travel = if self.config.is_looping() {
            dx
        } else {
            self.offset.saturating_add(dx).clamp(0, metrics.max_offset()) - self.offset
        };
        self.offset = self.offset.saturating_add(travel);
        self.layout_items(host, ScrollDirection::of_delta(dx))?;
        host.on_scroll_tick();
        Ok(travel)
    }

    /// Records a scroll-phase change reported by the host.
    ///
    /// Entering [`ScrollPhase::Idle`] without a running animation starts a
    /// snap to the nearest slot. Entering [`ScrollPhase::Dragging`] cancels
    /// any running animation.
    pub fn on_scroll_state_changed<H>(
        &mut self,
        host: &mut H,
        phase: ScrollPhase,
        now_ms: u64,
    ) -> Result<(), LayoutError>
    where
        H: LayoutHost<View = V>,
    {
        if self.settle.on_phase_changed(phase) {
            let Some(target) = self.fixed_scroll_offset() else {
                debug!("zero interval, settle skipped");
                return Ok(());
            };
            self.start_scroll(host, target, now_ms)?;
        }
        Ok(())
    }

    /// Advances a running animation to `now_ms`.
    ///
    /// Lays out at the sampled offset and, on the final tick, reports the
    /// selection. Returns `true` while more frames are needed.
    pub fn on_frame<H>(&mut self, host: &mut H, now_ms: u64) -> Result<bool, LayoutError>
    where
        H: LayoutHost<View = V>,
    {
        let Some(tick) = self.settle.sample(now_ms) else {
            return Ok(false);
        };
        self.offset = tick.offset;
        self.layout_items(host, tick.direction)?;
        host.on_scroll_tick();
        if tick.finished {
            debug!(offset = self.offset, "carousel settled");
            self.dispatch_selection(host);
        }
        Ok(!tick.finished)
    }

    /// Jumps so `position` is centered.
    ///
    /// Out-of-range positions are ignored. Before the first layout the
    /// position is only recorded and applied by that layout.
    pub fn scroll_to_position<H>(&mut self, host: &mut H, position: usize) -> Result<(), LayoutError>
    where
        H: LayoutHost<View = V>,
    {
        if position >= host.item_count() {
            debug!(position, "scroll to out-of-range position ignored");
            return Ok(());
        }
        self.settle.cancel();
        let Some(metrics) = self.metrics else {
            self.pending_position = Some(position);
            self.selected = position;
            return Ok(());
        };
        let direction = if position > self.selected {
            ScrollDirection::Forward
        } else {
            ScrollDirection::Backward
        };
        self.offset = metrics.offset_for_position(to_logical(position));
        self.layout_items(host, direction)?;
        self.dispatch_selection(host);
        Ok(())
    }

    /// Animates so `position` ends up centered.
    ///
    /// Ignored while looping and for out-of-range positions. Before the first
    /// layout the position is only recorded, as with
    /// [`scroll_to_position`](Self::scroll_to_position).
    pub fn smooth_scroll_to_position<H>(
        &mut self,
        host: &mut H,
        position: usize,
        now_ms: u64,
    ) -> Result<(), LayoutError>
    where
        H: LayoutHost<View = V>,
    {
        if self.config.is_looping() {
            debug!(position, "smooth scroll is not supported while looping");
            return Ok(());
        }
        if position >= host.item_count() {
            debug!(position, "smooth scroll to out-of-range position ignored");
            return Ok(());
        }
        let Some(metrics) = self.metrics else {
            self.pending_position = Some(position);
            self.selected = position;
            return Ok(());
        };
        self.start_scroll(host, metrics.offset_for_position(to_logical(position)), now_ms)
    }

    fn start_scroll<H>(&mut self, host: &mut H, target: i64, now_ms: u64) -> Result<(), LayoutError>
    where
        H: LayoutHost<View = V>,
    {
        if target == self.offset {
            self.settle.cancel();
            self.dispatch_selection(host);
            return Ok(());
        }
        debug!(from = self.offset, to = target, "carousel settle started");
        self.settle
            .start(self.offset, target, now_ms, self.config.settle_duration_ms);
        Ok(())
    }

    /// Reconciles attached views with the window at the current offset.
    fn layout_items<H>(&mut self, host: &mut H, direction: ScrollDirection) -> Result<(), LayoutError>
    where
        H: LayoutHost<View = V>,
    {
        let Some(metrics) = self.metrics else {
            return Ok(());
        };
        let display = metrics.display_frame(self.offset);

        let mut children = mem::take(&mut self.scratch);
        children.clear();
        host.attached_views(&mut children);
        let mut resolved: SmallVec<[(V, i64); 16]> = SmallVec::with_capacity(children.len());
        for (child_index, &view) in children.iter().enumerate() {
            let Some(logical) = self.tracker.logical_of(view) else {
                self.scratch = children;
                return Err(LayoutError::ForeignView { child_index });
            };
            resolved.push((view, logical));
        }
        self.scratch = children;

        for (view, logical) in resolved {
            let frame = self.frames.get(logical, &metrics);
            if frame.intersects(&display) {
                let transform = item_transform(&metrics, &self.config, &frame, self.offset);
                host.apply_transform(view, &transform);
            } else {
                trace!(logical, "recycling view");
                self.tracker.release(view);
                host.detach_and_recycle(view);
            }
        }

        let item_count = metrics.item_count;
        let center = nearest_slot(self.offset, metrics.interval).unwrap_or(0);
        let radius = self.config.scan_radius;
        let (mut min, mut max) = (center - radius, center + radius);
        if !self.config.is_looping() {
            min = min.max(0);
            max = max.min(to_logical(item_count));
        }
        let at = if direction == ScrollDirection::Backward || self.config.is_flat() {
            AttachAt::Head
        } else {
            AttachAt::Tail
        };
        for logical in min..max {
            if self.tracker.is_attached(logical) {
                continue;
            }
            let frame = self.frames.get(logical, &metrics);
            if !frame.intersects(&display) {
                continue;
            }
            let adapter_index = normalize_index(logical, item_count);
            let view = host.attach_view(adapter_index, at);
            self.tracker.tag(view, logical)?;
            trace!(logical, adapter_index, ?at, "attached view");
            let transform = item_transform(&metrics, &self.config, &frame, self.offset);
            host.apply_transform(view, &transform);
        }
        Ok(())
    }

    fn dispatch_selection<H>(&mut self, host: &mut H)
    where
        H: LayoutHost<View = V>,
    {
        let (Some(metrics), Some(center)) = (self.metrics, self.center_index()) else {
            return;
        };
        let selected = normalize_index(center, metrics.item_count);
        self.selected = selected;
        if selected != self.last_reported {
            debug!(selected, "carousel selection changed");
            host.on_selection_changed(selected);
        }
        self.last_reported = selected;
    }

    /// Adapter index most recently settled on, or the recorded position
    /// before the first layout.
    #[must_use]
    pub const fn selected_position(&self) -> usize {
        self.selected
    }

    /// Logical index of the slot nearest the current offset.
    ///
    /// Returns `None` before the first layout or when the interval is zero.
    #[must_use]
    pub fn center_index(&self) -> Option<i64> {
        nearest_slot(self.offset, self.metrics?.interval)
    }

    /// Logical index a settle from the current offset ends on.
    ///
    /// Returns `None` before the first layout or when the interval is zero.
    #[must_use]
    pub fn fixed_scroll_position(&self) -> Option<i64> {
        self.center_index()
    }

    /// Offset of the slot nearest the current offset: where a settle ends.
    #[must_use]
    pub fn fixed_scroll_offset(&self) -> Option<i64> {
        let metrics = self.metrics?;
        Some(self.fixed_scroll_position()? * metrics.interval)
    }

    /// Offset at which `position` is centered, once metrics are known.
    #[must_use]
    pub fn offset_for_position(&self, position: usize) -> Option<i64> {
        Some(self.metrics?.offset_for_position(to_logical(position)))
    }

    /// Logical index `view` is attached at.
    #[must_use]
    pub fn logical_index_of(&self, view: V) -> Option<i64> {
        self.tracker.logical_of(view)
    }

    /// Adapter index of the first item painted inside the viewport.
    ///
    /// The item may be partly covered by its neighbour.
    #[must_use]
    pub fn first_visible_position(&self) -> Option<usize> {
        let metrics = self.metrics?;
        let center = self.center_index()?;
        let reaching = (self.offset - metrics.start_x).div_euclid(metrics.interval);
        Some(self.clamp_visible(reaching.min(center - 1), &metrics))
    }

    /// Adapter index of the last item painted inside the viewport.
    ///
    /// The item may be partly covered by its neighbour.
    #[must_use]
    pub fn last_visible_position(&self) -> Option<usize> {
        let metrics = self.metrics?;
        let center = self.center_index()?;
        let edge = self.offset + metrics.horizontal_space - metrics.start_x - metrics.item_width;
        let reaching = -(-edge).div_euclid(metrics.interval);
        Some(self.clamp_visible(reaching.max(center + 1), &metrics))
    }

    fn clamp_visible(&self, logical: i64, metrics: &Metrics) -> usize {
        if self.config.is_looping() {
            normalize_index(logical, metrics.item_count)
        } else {
            let last = to_logical(metrics.item_count) - 1;
            normalize_index(logical.clamp(0, last.max(0)), metrics.item_count)
        }
    }

    /// Most items that fit in the viewport with one centered.
    #[must_use]
    pub fn max_visible_count(&self) -> usize {
        self.metrics.map_or(0, |m| m.max_visible_count())
    }

    /// Paint order for the child at `child_slot` in the host's child list.
    ///
    /// See [`child_drawing_order`]. Views the engine does not know keep their
    /// child order.
    #[must_use]
    pub fn drawing_order(&self, child_count: usize, child_slot: usize, view: V) -> usize {
        let Some(logical) = self.tracker.logical_of(view) else {
            return child_slot.min(child_count.saturating_sub(1));
        };
        let center = self.center_index().unwrap_or(0);
        child_drawing_order(child_count, child_slot, center, logical)
    }
}

fn to_logical(position: usize) -> i64 {
    i64::try_from(position).unwrap_or(i64::MAX)
}
