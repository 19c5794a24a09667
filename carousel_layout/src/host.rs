// Copyright 2025 the Carousel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use kurbo::Size;

use crate::types::{AttachAt, ItemTransform};

/// The list-rendering component an engine lays out into.
///
/// The host owns data, view instances and painting. Engines only ever ask it
/// to attach, recycle and transform views; they never reach into the host's
/// view hierarchy otherwise. All calls happen on the host's UI thread.
pub trait LayoutHost {
    /// Opaque, cheap handle to one attached view.
    type View: Copy + Eq + Hash + Debug;

    /// Number of items in the data source.
    fn item_count(&self) -> usize;

    /// Usable viewport size, after padding.
    fn viewport(&self) -> Size;

    /// Measured size of one item. Every item is assumed to share it.
    fn measure_item(&mut self) -> Size;

    /// Appends the currently attached children to `out`, in child order.
    fn attached_views(&self, out: &mut Vec<Self::View>);

    /// Obtains a view bound to `adapter_index` and inserts it into the child
    /// list at `at`.
    fn attach_view(&mut self, adapter_index: usize, at: AttachAt) -> Self::View;

    /// Removes `view` from the child list and returns it to the recycle pool.
    fn detach_and_recycle(&mut self, view: Self::View);

    /// Places and styles `view`.
    fn apply_transform(&mut self, view: Self::View, transform: &ItemTransform);

    /// The centered item settled on a new adapter index.
    fn on_selection_changed(&mut self, adapter_index: usize) {
        let _ = adapter_index;
    }

    /// A scroll delta or animation tick moved the offset.
    fn on_scroll_tick(&mut self) {}
}
