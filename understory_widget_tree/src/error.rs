// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by tree mutations.

use thiserror::Error;

use crate::types::WidgetId;

/// Why a mutation of the [`WidgetTree`](crate::WidgetTree) was rejected.
///
/// A rejected mutation leaves the tree exactly as it was.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The handle was destroyed, or was issued by another tree.
    #[error("widget {0:?} is not alive in this tree")]
    StaleWidget(WidgetId),
    /// Reparenting would make a widget its own ancestor.
    #[error("cannot reparent {widget:?} under {parent:?}: it is the widget or one of its descendants")]
    CycleDetected {
        /// The widget being moved.
        widget: WidgetId,
        /// The requested new parent.
        parent: WidgetId,
    },
    /// Growing node storage or a child list failed.
    #[error("allocation failed while growing the widget tree")]
    AllocationFailed,
}
