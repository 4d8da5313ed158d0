// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage summary types returned from [`crate::WidgetTree::take_damage`].

use crate::geometry::Rect;

/// Screen-space regions touched by mutations since the last
/// [`crate::WidgetTree::take_damage`].
///
/// Rectangles are absolute composed geometries, before and after each edit.
/// They may overlap and are not a minimal cover.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Damage {
    /// Absolute rectangles that should be repainted.
    pub dirty_rects: alloc::vec::Vec<Rect>,
}

impl Damage {
    /// Returns the union of all damage rects.
    pub fn union_rect(&self) -> Option<Rect> {
        let mut it = self.dirty_rects.iter().copied();
        let first = it.next()?;
        Some(it.fold(first, Rect::union))
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.dirty_rects.is_empty()
    }

    pub(crate) fn push(&mut self, rect: Rect) {
        if !rect.is_empty() {
            self.dirty_rects.push(rect);
        }
    }
}
