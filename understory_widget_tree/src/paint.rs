// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint traversal and the contexts handed to widget callbacks.

use alloc::vec;
use tracing::{debug, trace};

use crate::error::TreeError;
use crate::geometry::Rect;
use crate::tree::{Arena, WidgetTree};
use crate::types::{TreeId, WidgetFlags, WidgetId, WidgetKind};

/// What a paint callback sees: its widget, read-only, and the tree's renderer.
///
/// The tree itself cannot be mutated from inside a paint callback, so the
/// traversal in progress can never be invalidated.
pub struct PaintCx<'a, R, D> {
    arena: &'a Arena<R, D>,
    renderer: &'a mut R,
    id: WidgetId,
    /// Absolute origin of the parent's local space.
    origin: (i32, i32),
}

impl<R, D> core::fmt::Debug for PaintCx<'_, R, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PaintCx")
            .field("id", &self.id)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

impl<R, D> PaintCx<'_, R, D> {
    /// The widget being painted.
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// The tree the widget belongs to.
    pub fn tree(&self) -> TreeId {
        self.id.tree()
    }

    /// Kind tag of the widget.
    pub fn kind(&self) -> WidgetKind {
        self.arena.node(self.id).kind
    }

    /// Geometry relative to the parent.
    pub fn geometry(&self) -> Rect {
        self.arena.node(self.id).geometry
    }

    /// Geometry in screen space. This is what a widget normally draws into.
    pub fn absolute_geometry(&self) -> Rect {
        self.geometry().translate(self.origin.0, self.origin.1)
    }

    /// Composed geometry relative to the parent.
    pub fn composed_geometry(&self) -> Rect {
        self.arena.node(self.id).composed
    }

    /// The widget's user data.
    pub fn data(&self) -> &D {
        &self.arena.node(self.id).data
    }

    /// The widget's parent, if any.
    pub fn parent(&self) -> Option<WidgetId> {
        self.arena.node(self.id).parent
    }

    /// The widget's children, in the order they will be painted.
    pub fn children(&self) -> &[WidgetId] {
        &self.arena.node(self.id).children
    }

    /// The widget's flags.
    pub fn flags(&self) -> WidgetFlags {
        self.arena.node(self.id).flags
    }

    /// The renderer shared by the whole tree.
    pub fn renderer(&mut self) -> &mut R {
        self.renderer
    }
}

/// What a destroy callback sees: the widget's last state and the renderer.
///
/// The widget is already detached; its user data is dropped right after the
/// callback returns.
pub struct DestroyCx<'a, R, D> {
    pub(crate) id: WidgetId,
    pub(crate) kind: WidgetKind,
    pub(crate) geometry: Rect,
    pub(crate) data: &'a mut D,
    pub(crate) renderer: &'a mut R,
}

impl<R, D> core::fmt::Debug for DestroyCx<'_, R, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DestroyCx")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("geometry", &self.geometry)
            .finish_non_exhaustive()
    }
}

impl<R, D> DestroyCx<'_, R, D> {
    /// The widget being destroyed. Its handle is stale once the callback returns.
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Kind tag of the widget.
    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    /// Last relative geometry of the widget.
    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    /// The widget's user data, for releasing kind-specific resources.
    pub fn data(&mut self) -> &mut D {
        self.data
    }

    /// The renderer shared by the whole tree.
    pub fn renderer(&mut self) -> &mut R {
        self.renderer
    }
}

impl<R, D> WidgetTree<R, D> {
    /// Paint every top-level widget, in insertion order.
    pub fn paint(&mut self) {
        let Self {
            arena, renderer, ..
        } = self;
        let mut painted = 0;
        for &root in &arena.top_level {
            painted += paint_subtree(arena, renderer, root, (0, 0));
        }
        debug!(top_level = arena.top_level.len(), painted, "paint");
    }

    /// Paint `id` and its subtree.
    ///
    /// Each visible widget's paint callback runs before its children's;
    /// siblings run in insertion order, so later siblings end up on top.
    /// A hidden widget is skipped along with its whole subtree. Whether an
    /// ancestor of `id` is hidden is not considered.
    pub fn paint_widget(&mut self, id: WidgetId) -> Result<(), TreeError> {
        self.ensure_alive(id)?;
        let origin = self.arena.origin_of(self.arena.node(id).parent);
        let Self {
            arena, renderer, ..
        } = self;
        let painted = paint_subtree(arena, renderer, id, origin);
        trace!(widget = ?id, painted, "paint widget");
        Ok(())
    }
}

/// Depth-first, pre-order walk starting at `root`, whose parent's local origin
/// sits at `origin` in screen space. Returns the number of callbacks invoked.
fn paint_subtree<R, D>(
    arena: &Arena<R, D>,
    renderer: &mut R,
    root: WidgetId,
    origin: (i32, i32),
) -> usize {
    let mut painted = 0;
    let mut stack = vec![(root, origin)];

    while let Some((id, origin)) = stack.pop() {
        let node = arena.node(id);
        if node.flags.contains(WidgetFlags::HIDDEN) {
            continue;
        }
        if let Some(paint) = node.paint {
            paint(&mut PaintCx {
                arena,
                renderer: &mut *renderer,
                id,
                origin,
            });
            painted += 1;
        }

        let child_origin = (
            origin.0.saturating_add(node.geometry.x),
            origin.1.saturating_add(node.geometry.y),
        );
        // Reversed so children pop in insertion order.
        for &child in node.children.iter().rev() {
            stack.push((child, child_origin));
        }
    }

    painted
}
