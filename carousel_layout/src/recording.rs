// Copyright 2025 the Carousel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A headless [`LayoutHost`] that records every outbound call.
//!
//! Useful for tests and for driving an engine without a UI toolkit. Views are
//! plain integer handles; recycled handles are reused for later attaches the
//! way a real recycle pool would.

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Size;

use crate::host::LayoutHost;
use crate::types::{AttachAt, ItemTransform};

/// Handle of a view created by [`RecordingHost`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewId(pub u32);

/// One recorded outbound call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HostEvent {
    /// A view was bound to `adapter_index` and inserted at `at`.
    Attached {
        /// Handle handed to the engine.
        view: ViewId,
        /// Adapter index the view was bound to.
        adapter_index: usize,
        /// Where it was inserted in the child list.
        at: AttachAt,
    },
    /// A view was detached and returned to the pool.
    Recycled(ViewId),
    /// The selection callback fired.
    SelectionChanged(usize),
    /// The scroll-tick callback fired.
    ScrollTick,
}

/// In-memory host with a fixed viewport and uniform item size.
#[derive(Clone, Debug)]
pub struct RecordingHost {
    item_count: usize,
    viewport: Size,
    item_size: Size,
    children: Vec<ViewId>,
    pool: Vec<ViewId>,
    next_id: u32,
    bound: HashMap<ViewId, usize>,
    transforms: HashMap<ViewId, ItemTransform>,
    events: Vec<HostEvent>,
}

impl RecordingHost {
    /// Creates a host with `item_count` items of `item_size` in `viewport`.
    #[must_use]
    pub fn new(item_count: usize, viewport: Size, item_size: Size) -> Self {
        Self {
            item_count,
            viewport,
            item_size,
            children: Vec::new(),
            pool: Vec::new(),
            next_id: 0,
            bound: HashMap::new(),
            transforms: HashMap::new(),
            events: Vec::new(),
        }
    }

    /// Changes the item count reported to the engine.
    pub fn set_item_count(&mut self, item_count: usize) {
        self.item_count = item_count;
    }

    /// Changes the viewport reported to the engine.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Attached children, in child order.
    #[must_use]
    pub fn children(&self) -> &[ViewId] {
        &self.children
    }

    /// Every recorded call since creation or the last [`clear_events`](Self::clear_events).
    #[must_use]
    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    /// Forgets recorded calls. Attached children are kept.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Adapter indices passed to the selection callback, in order.
    #[must_use]
    pub fn selections(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|event| match event {
                HostEvent::SelectionChanged(index) => Some(*index),
                _ => None,
            })
            .collect()
    }

    /// Number of recorded recycles.
    #[must_use]
    pub fn recycled_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, HostEvent::Recycled(_)))
            .count()
    }

    /// Last transform applied to `view` while attached.
    #[must_use]
    pub fn transform_of(&self, view: ViewId) -> Option<&ItemTransform> {
        self.transforms.get(&view)
    }

    /// Adapter index `view` is currently bound to.
    #[must_use]
    pub fn adapter_index_of(&self, view: ViewId) -> Option<usize> {
        self.bound.get(&view).copied()
    }

    /// Appends a child the engine never attached, as a host that bypasses the
    /// engine would.
    pub fn inject_foreign_child(&mut self) -> ViewId {
        let view = self.fresh_id();
        self.children.push(view);
        view
    }

    fn fresh_id(&mut self) -> ViewId {
        let view = ViewId(self.next_id);
        self.next_id += 1;
        view
    }
}

impl LayoutHost for RecordingHost {
    type View = ViewId;

    fn item_count(&self) -> usize {
        self.item_count
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn measure_item(&mut self) -> Size {
        self.item_size
    }

    fn attached_views(&self, out: &mut Vec<ViewId>) {
        out.extend_from_slice(&self.children);
    }

    fn attach_view(&mut self, adapter_index: usize, at: AttachAt) -> ViewId {
        let view = match self.pool.pop() {
            Some(view) => view,
            None => self.fresh_id(),
        };
        self.bound.insert(view, adapter_index);
        match at {
            AttachAt::Head => self.children.insert(0, view),
            AttachAt::Tail => self.children.push(view),
        }
        self.events.push(HostEvent::Attached {
            view,
            adapter_index,
            at,
        });
        view
    }

    fn detach_and_recycle(&mut self, view: ViewId) {
        self.children.retain(|&child| child != view);
        self.bound.remove(&view);
        self.transforms.remove(&view);
        self.pool.push(view);
        self.events.push(HostEvent::Recycled(view));
    }

    fn apply_transform(&mut self, view: ViewId, transform: &ItemTransform) {
        self.transforms.insert(view, *transform);
    }

    fn on_selection_changed(&mut self, adapter_index: usize) {
        self.events.push(HostEvent::SelectionChanged(adapter_index));
    }

    fn on_scroll_tick(&mut self) {
        self.events.push(HostEvent::ScrollTick);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ItemFrame;

    #[test]
    fn recycled_views_are_reused() {
        let mut host = RecordingHost::new(3, Size::new(100.0, 100.0), Size::new(10.0, 10.0));
        let a = host.attach_view(0, AttachAt::Tail);
        let b = host.attach_view(1, AttachAt::Head);
        assert_eq!(host.children(), [b, a]);

        host.apply_transform(a, &ItemTransform::plain(ItemFrame::new(0, 0, 10, 10)));
        host.detach_and_recycle(a);
        assert_eq!(host.transform_of(a), None);
        assert_eq!(host.adapter_index_of(a), None);

        let c = host.attach_view(2, AttachAt::Tail);
        assert_eq!(c, a);
        assert_eq!(host.adapter_index_of(c), Some(2));
        assert_eq!(host.recycled_count(), 1);
    }
}
