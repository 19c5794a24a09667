// Copyright 2025 the Carousel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Errors surfaced by the layout engines.
///
/// Both variants indicate a host that broke the ownership contract on view
/// identity. Degenerate inputs (no items, zero interval, empty viewport) are
/// never errors; they lay out nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// An attached child has no identity recorded by the engine.
    ///
    /// The engine owns the association between views and logical indices. A
    /// child it did not attach itself cannot be placed without guessing.
    #[error("child {child_index} carries no identity owned by this layout; views must only be attached by the engine")]
    ForeignView {
        /// Position of the offending child in the host's child list.
        child_index: usize,
    },
    /// The host returned a view handle that is still attached elsewhere.
    #[error("view handed out for logical index {logical} is still attached at logical index {existing}")]
    ViewAlreadyTagged {
        /// Logical index the engine tried to attach.
        logical: i64,
        /// Logical index the handle is currently attached at.
        existing: i64,
    },
}
