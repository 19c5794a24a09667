// Copyright 2025 the Carousel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::hash::Hash;
use core::mem;

use tracing::{debug, trace};

use carousel_layout::settle::SettleController;
use carousel_layout::{
    AttachAt, AttachTracker, LayoutError, LayoutHost, LayoutPass, ScrollPhase, normalize_index,
};

use crate::config::CardStackConfig;
use crate::slots::{CardSize, StackPosition, card_slots};
use crate::snap::SnapState;

/// Card-stack layout engine.
///
/// The offset advances one card width per card. The card at
/// `offset / width` sits on top and slides off to the left as the offset
/// grows, uncovering the stack beneath it. Every layout pass recycles the
/// attached cards and attaches the stack again bottom-up, so the top card is
/// always the last child.
///
/// ```rust
/// use carousel_card_stack::{CardStackConfig, CardStackEngine};
/// use carousel_layout::{LayoutPass, RecordingHost, ScrollPhase};
/// use kurbo::Size;
///
/// let mut host = RecordingHost::new(6, Size::new(480.0, 320.0), Size::new(400.0, 300.0));
/// let mut engine = CardStackEngine::new(CardStackConfig::default());
/// engine.on_layout_children(&mut host, LayoutPass::Full).unwrap();
/// assert_eq!(host.selections(), [0]);
///
/// // Drag the top card a quarter of the way off, then let go.
/// engine.on_scroll_state_changed(&mut host, ScrollPhase::Dragging, 0).unwrap();
/// engine.scroll_by(&mut host, 100).unwrap();
/// engine.on_scroll_state_changed(&mut host, ScrollPhase::Idle, 0).unwrap();
///
/// let mut now = 0;
/// while engine.on_frame(&mut host, now).unwrap() {
///     now += 16;
/// }
/// assert_eq!(engine.offset(), 400);
/// assert_eq!(host.selections(), [0, 1]);
/// ```
#[derive(Debug)]
pub struct CardStackEngine<V> {
    config: CardStackConfig,
    size: Option<CardSize>,
    item_count: usize,
    offset: i64,
    last_scrolled: i64,
    tracker: AttachTracker<V>,
    settle: SettleController,
    snap: SnapState,
    selected: Option<usize>,
    first_layout: bool,
    pending_position: Option<usize>,
    scratch: Vec<V>,
}

impl<V: Copy + Eq + Hash> CardStackEngine<V> {
    /// Creates an engine that has not laid anything out yet.
    #[must_use]
    pub fn new(config: CardStackConfig) -> Self {
        Self {
            config,
            size: None,
            item_count: 0,
            offset: 0,
            last_scrolled: 0,
            tracker: AttachTracker::new(),
            settle: SettleController::new(),
            snap: SnapState::new(),
            selected: None,
            first_layout: true,
            pending_position: None,
            scratch: Vec::new(),
        }
    }

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &CardStackConfig {
        &self.config
    }

    /// Replaces the configuration and resets the engine.
    pub fn set_config(&mut self, config: CardStackConfig) {
        debug!(
            max_count = config.max_count,
            looping = config.looping,
            "card stack config replaced"
        );
        self.config = config;
        self.reset();
    }

    /// Forgets all layout state. The next full layout starts from the first
    /// card and reports it as selected.
    pub fn notify_adapter_reset(&mut self) {
        self.reset();
        debug!("card stack adapter reset");
    }

    fn reset(&mut self) {
        self.size = None;
        self.item_count = 0;
        self.offset = 0;
        self.last_scrolled = 0;
        self.tracker.clear();
        self.settle.reset();
        self.snap.reset();
        self.selected = None;
        self.first_layout = true;
        self.pending_position = None;
    }

    /// Accumulated scroll offset in world units.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        self.offset
    }

    /// Card size from the last full layout pass, if any.
    #[must_use]
    pub const fn card_size(&self) -> Option<CardSize> {
        self.size
    }

    /// Returns `true` once a full layout pass has measured a card.
    #[must_use]
    pub const fn is_laid_out(&self) -> bool {
        self.size.is_some()
    }

    /// Returns `true` while a snap animation is running.
    #[must_use]
    pub const fn is_settling(&self) -> bool {
        self.settle.is_animating()
    }

    /// Read access to the attach tracker.
    #[must_use]
    pub const fn tracker(&self) -> &AttachTracker<V> {
        &self.tracker
    }

    /// Logical index `view` is attached at.
    #[must_use]
    pub fn logical_index_of(&self, view: V) -> Option<i64> {
        self.tracker.logical_of(view)
    }

    /// Adapter index last reported to the selection callback.
    #[must_use]
    pub const fn selected_position(&self) -> Option<usize> {
        self.selected
    }

    /// Adapter index of the card currently on top.
    #[must_use]
    pub fn top_position(&self) -> Option<usize> {
        let size = self.size?;
        Some(normalize_index(
            self.offset.div_euclid(size.width),
            self.item_count,
        ))
    }

    /// Fraction of the top card that has slid off, in `[0, 1)`.
    #[must_use]
    pub fn scroll_percent(&self) -> Option<f32> {
        let size = self.size?;
        let position = StackPosition::resolve(self.offset, size.width, 0);
        Some(position.percent(size.width))
    }

    /// Card index a release at the current offset settles on.
    ///
    /// This consults and updates the swipe state, see
    /// [`SnapState::target_position`](crate::SnapState::target_position).
    pub fn fixed_scroll_position(&mut self) -> Option<i64> {
        let size = self.size?;
        Some(
            self.snap
                .target_position(self.offset, size.width, &self.config.snap),
        )
    }

    /// Signed distance from the current offset to the offset that puts
    /// `position` on top.
    #[must_use]
    pub fn distance_to_position(&self, position: usize) -> Option<i64> {
        let size = self.size?;
        Some(to_logical(position) * size.width - self.offset)
    }

    fn clamp_offset(&self, offset: i64, size: CardSize) -> i64 {
        if self.config.looping {
            offset.max(0)
        } else {
            let last = to_logical(self.item_count.saturating_sub(1));
            offset.clamp(0, last * size.width)
        }
    }

    /// Handles a host layout request.
    ///
    /// A pre-layout pass attaches nothing and rewinds the offset to the first
    /// card. A full pass recycles whatever the host
    /// has attached, measures the card and rebuilds the stack. After the first
    /// pass that attaches a card, the top card is reported as selected.
    pub fn on_layout_children<H>(&mut self, host: &mut H, pass: LayoutPass) -> Result<(), LayoutError>
    where
        H: LayoutHost<View = V>,
    {
        if pass == LayoutPass::PreLayout {
            self.offset = 0;
            self.snap.settled_at(0);
            return Ok(());
        }
        let item_count = host.item_count();
        self.recycle_children(host);
        if item_count == 0 {
            self.size = None;
            self.offset = 0;
            return Ok(());
        }
        let Some(size) = CardSize::from_measured(host.measure_item()) else {
            debug!("card has no width, nothing laid out");
            self.size = None;
            return Ok(());
        };
        self.size = Some(size);
        self.item_count = item_count;
        if let Some(position) = self.pending_position.take()
            && position < item_count
        {
            self.offset = to_logical(position) * size.width;
            self.snap.settled_at(self.offset);
        }
        self.offset = self.clamp_offset(self.offset, size);
        debug!(
            item_count,
            width = size.width,
            offset = self.offset,
            "card stack full layout"
        );
        self.layout_cards(host)?;
        if self.first_layout && !self.tracker.is_empty() {
            self.first_layout = false;
            self.report_selection(host);
        }
        Ok(())
    }

    /// Scrolls by `dx` world units and returns the distance actually travelled.
    ///
    /// The offset never goes below zero, and without looping never past the
    /// last card. Any running snap is cancelled first.
    pub fn scroll_by<H>(&mut self, host: &mut H, dx: i64) -> Result<i64, LayoutError>
    where
        H: LayoutHost<View = V>,
    {
        self.settle.cancel();
        let Some(size) = self.size else {
            return Ok(0);
        };
        let target = self.clamp_offset(self.offset.saturating_add(dx), size);
        let travel = target - self.offset;
        self.offset = target;
        self.layout_cards(host)?;
        host.on_scroll_tick();
        Ok(travel)
    }

    /// Records a scroll-phase change reported by the host.
    ///
    /// Coming to rest exactly on a card reports it as selected. Coming to
    /// rest anywhere else starts a snap toward [`fixed_scroll_position`](Self::fixed_scroll_position).
    pub fn on_scroll_state_changed<H>(
        &mut self,
        host: &mut H,
        phase: ScrollPhase,
        now_ms: u64,
    ) -> Result<(), LayoutError>
    where
        H: LayoutHost<View = V>,
    {
        if !self.settle.on_phase_changed(phase) {
            return Ok(());
        }
        let Some(size) = self.size else {
            return Ok(());
        };
        let position = self
            .snap
            .target_position(self.offset, size.width, &self.config.snap);
        let target = self.clamp_offset(position * size.width, size);
        if target == self.offset {
            self.settled(host);
            return Ok(());
        }
        debug!(from = self.offset, to = target, "card stack snap started");
        self.settle
            .start(self.offset, target, now_ms, self.config.settle_duration_ms);
        Ok(())
    }

    /// Advances a running snap to `now_ms`. Returns `true` while more frames
    /// are needed.
    pub fn on_frame<H>(&mut self, host: &mut H, now_ms: u64) -> Result<bool, LayoutError>
    where
        H: LayoutHost<View = V>,
    {
        let Some(tick) = self.settle.sample(now_ms) else {
            return Ok(false);
        };
        self.offset = tick.offset;
        self.layout_cards(host)?;
        host.on_scroll_tick();
        if tick.finished {
            self.settled(host);
        }
        Ok(!tick.finished)
    }

    /// Jumps so `position` is on top.
    ///
    /// Out-of-range positions are ignored. Before the first layout the
    /// position is only recorded and applied by that layout.
    pub fn scroll_to_position<H>(&mut self, host: &mut H, position: usize) -> Result<(), LayoutError>
    where
        H: LayoutHost<View = V>,
    {
        if position >= host.item_count() {
            debug!(position, "scroll to out-of-range card ignored");
            return Ok(());
        }
        self.settle.cancel();
        let Some(size) = self.size else {
            self.pending_position = Some(position);
            return Ok(());
        };
        self.offset = self.clamp_offset(to_logical(position) * size.width, size);
        self.layout_cards(host)?;
        self.settled(host);
        Ok(())
    }

    fn settled<H>(&mut self, host: &mut H)
    where
        H: LayoutHost<View = V>,
    {
        debug!(offset = self.offset, "card stack settled");
        self.snap.settled_at(self.offset);
        self.report_selection(host);
    }

    fn report_selection<H>(&mut self, host: &mut H)
    where
        H: LayoutHost<View = V>,
    {
        let Some(top) = self.top_position() else {
            return;
        };
        if self.selected != Some(top) {
            debug!(selected = top, "card stack selection changed");
            host.on_selection_changed(top);
            self.selected = Some(top);
        }
    }

    /// Recycles whatever the host has attached, known or not.
    fn recycle_children<H>(&mut self, host: &mut H)
    where
        H: LayoutHost<View = V>,
    {
        let mut children = mem::take(&mut self.scratch);
        children.clear();
        host.attached_views(&mut children);
        for &view in &children {
            host.detach_and_recycle(view);
        }
        self.tracker.clear();
        self.scratch = children;
    }

    /// Recycles every attached card, failing before any recycle if the host
    /// holds a view the engine did not attach.
    fn recycle_cards<H>(&mut self, host: &mut H) -> Result<(), LayoutError>
    where
        H: LayoutHost<View = V>,
    {
        let mut children = mem::take(&mut self.scratch);
        children.clear();
        host.attached_views(&mut children);
        let foreign = children
            .iter()
            .position(|&view| self.tracker.logical_of(view).is_none());
        if let Some(child_index) = foreign {
            self.scratch = children;
            return Err(LayoutError::ForeignView { child_index });
        }
        for &view in &children {
            let logical = self.tracker.release(view);
            trace!(?logical, "recycling card");
            host.detach_and_recycle(view);
        }
        self.scratch = children;
        Ok(())
    }

    /// Recycles every card and attaches the stack for the current offset.
    fn layout_cards<H>(&mut self, host: &mut H) -> Result<(), LayoutError>
    where
        H: LayoutHost<View = V>,
    {
        let Some(size) = self.size else {
            return Ok(());
        };
        self.recycle_cards(host)?;

        let position = StackPosition::resolve(self.offset, size.width, self.last_scrolled);
        self.last_scrolled = position.scrolled;
        let available = (!self.config.looping).then(|| {
            usize::try_from(position.top).map_or(0, |top| self.item_count.saturating_sub(top))
        });
        let slots = card_slots(&self.config, position, size.width, available);
        for slot in slots.iter().rev() {
            let logical = position.top + to_logical(slot.depth);
            let adapter_index = normalize_index(logical, self.item_count);
            let view = host.attach_view(adapter_index, AttachAt::Tail);
            self.tracker.tag(view, logical)?;
            trace!(logical, adapter_index, depth = slot.depth, "attached card");
            host.apply_transform(view, &slot.transform(size, 0));
        }
        Ok(())
    }
}

fn to_logical(position: usize) -> i64 {
    i64::try_from(position).unwrap_or(i64::MAX)
}
