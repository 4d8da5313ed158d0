// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, geometry propagation, queries.

use alloc::vec::Vec;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::damage::Damage;
use crate::error::TreeError;
use crate::geometry::Rect;
use crate::paint::DestroyCx;
use crate::types::{
    DestroyFn, LocalWidget, PaintFn, TreeId, WidgetFlags, WidgetId, WidgetKind,
};

/// A retained widget tree sharing one renderer.
///
/// The tree owns every widget reachable from it. Widgets are addressed by
/// generational [`WidgetId`] handles; a handle goes stale when its widget is
/// destroyed, and every later use of it is rejected.
///
/// `R` is the renderer (drawing context) handed to paint and destroy callbacks.
/// `D` is opaque per-widget user data.
///
/// Every edit that can change a bounding box (create, [`set_geometry`],
/// [`reparent`], [`destroy`]) recomputes composed geometry immediately, from
/// the edited widget up to its top-level ancestor.
///
/// Handle policy: queries on a stale or foreign handle return `None`;
/// mutations return [`TreeError::StaleWidget`] and change nothing.
///
/// [`set_geometry`]: WidgetTree::set_geometry
/// [`reparent`]: WidgetTree::reparent
/// [`destroy`]: WidgetTree::destroy
///
/// ## Example
///
/// ```rust
/// use understory_widget_tree::{LocalWidget, Rect, WidgetTree};
///
/// let mut tree: WidgetTree<()> = WidgetTree::new(());
/// let root = tree
///     .create(
///         None,
///         LocalWidget {
///             geometry: Rect::new(10, 10, 150, 150),
///             ..LocalWidget::default()
///         },
///     )
///     .unwrap();
/// let child = tree
///     .create(
///         Some(root),
///         LocalWidget {
///             geometry: Rect::new(0, 20, 70, 90),
///             ..LocalWidget::default()
///         },
///     )
///     .unwrap();
///
/// assert_eq!(tree.parent_of(child), Some(root));
/// assert_eq!(tree.absolute_geometry(child), Some(Rect::new(10, 30, 70, 90)));
/// ```
pub struct WidgetTree<R, D = ()> {
    pub(crate) arena: Arena<R, D>,
    pub(crate) renderer: R,
    damage: Damage,
}

impl<R, D> core::fmt::Debug for WidgetTree<R, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.arena.nodes.len();
        let free = self.arena.free_list.len();
        f.debug_struct("WidgetTree")
            .field("id", &self.arena.tree)
            .field("nodes_total", &total)
            .field("nodes_alive", &(total - free))
            .field("top_level", &self.arena.top_level.len())
            .field("damage", &self.damage.dirty_rects.len())
            .finish_non_exhaustive()
    }
}

pub(crate) struct Node<R, D> {
    generation: u32,
    pub(crate) kind: WidgetKind,
    pub(crate) geometry: Rect,
    pub(crate) composed: Rect,
    pub(crate) parent: Option<WidgetId>,
    pub(crate) children: SmallVec<[WidgetId; 4]>,
    pub(crate) paint: Option<PaintFn<R, D>>,
    destroy: Option<DestroyFn<R, D>>,
    pub(crate) data: D,
    pub(crate) flags: WidgetFlags,
}

impl<R, D> Node<R, D> {
    fn new(generation: u32, parent: Option<WidgetId>, local: LocalWidget<R, D>) -> Self {
        let geometry = local.geometry.normalized();
        Self {
            generation,
            kind: local.kind,
            geometry,
            // A fresh widget has no children, so it composes to itself.
            composed: geometry,
            parent,
            children: SmallVec::new(),
            paint: local.paint,
            destroy: local.destroy,
            data: local.data,
            flags: local.flags,
        }
    }
}

/// Node storage plus the top-level set.
///
/// Split from the renderer so paint traversal can borrow the structure
/// immutably while handing the renderer out mutably.
pub(crate) struct Arena<R, D> {
    tree: TreeId,
    /// slots
    nodes: Vec<Option<Node<R, D>>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    /// top-level widgets in paint order
    pub(crate) top_level: Vec<WidgetId>,
}

impl<R, D> Arena<R, D> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            tree: TreeId::next(),
            nodes: Vec::with_capacity(capacity),
            generations: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            top_level: Vec::new(),
        }
    }

    pub(crate) fn get(&self, id: WidgetId) -> Option<&Node<R, D>> {
        if id.tree() != self.tree {
            return None;
        }
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn get_mut(&mut self, id: WidgetId) -> Option<&mut Node<R, D>> {
        if id.tree() != self.tree {
            return None;
        }
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        (n.generation == id.1).then_some(n)
    }

    /// Access a node; panics if `id` is stale.
    pub(crate) fn node(&self, id: WidgetId) -> &Node<R, D> {
        self.nodes[id.idx()].as_ref().expect("dangling WidgetId")
    }

    /// Access a node mutably; panics if `id` is stale.
    fn node_mut(&mut self, id: WidgetId) -> &mut Node<R, D> {
        self.nodes[id.idx()].as_mut().expect("dangling WidgetId")
    }

    fn alloc(&mut self, parent: Option<WidgetId>, local: LocalWidget<R, D>) -> WidgetId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, parent, local));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "WidgetId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, parent, local)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "WidgetId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        WidgetId::new(idx, generation, self.tree)
    }

    /// Remove a node from its slot and return it. The slot becomes reusable.
    fn take(&mut self, id: WidgetId) -> Node<R, D> {
        let node = self.nodes[id.idx()].take().expect("dangling WidgetId");
        self.free_list.push(id.idx());
        node
    }

    /// Make room for `additional` more entries in `parent`'s child list (or the
    /// top-level set) without touching the tree.
    fn reserve_children(
        &mut self,
        parent: Option<WidgetId>,
        additional: usize,
    ) -> Result<(), TreeError> {
        match parent {
            Some(p) => self
                .node_mut(p)
                .children
                .try_reserve(additional)
                .map_err(|_| TreeError::AllocationFailed),
            None => self
                .top_level
                .try_reserve(additional)
                .map_err(|_| TreeError::AllocationFailed),
        }
    }

    /// Append `id` to `parent`'s children (or the top-level set) and point its
    /// parent link there.
    fn link(&mut self, id: WidgetId, parent: Option<WidgetId>) {
        match parent {
            Some(p) => self.node_mut(p).children.push(id),
            None => self.top_level.push(id),
        }
        self.node_mut(id).parent = parent;
    }

    /// Detach `id` from wherever it hangs and return its former parent.
    fn unlink(&mut self, id: WidgetId) -> Option<WidgetId> {
        let parent = self.node_mut(id).parent.take();
        match parent {
            Some(p) => self.node_mut(p).children.retain(|c| *c != id),
            None => self.top_level.retain(|c| *c != id),
        }
        parent
    }

    pub(crate) fn siblings(&self, parent: Option<WidgetId>) -> &[WidgetId] {
        match parent {
            Some(p) => self.node(p).children.as_slice(),
            None => self.top_level.as_slice(),
        }
    }

    /// Absolute position of the local origin of `parent` (the screen origin for `None`).
    pub(crate) fn origin_of(&self, parent: Option<WidgetId>) -> (i32, i32) {
        let (mut x, mut y) = (0_i32, 0_i32);
        let mut current = parent;
        while let Some(id) = current {
            let node = self.node(id);
            x = x.saturating_add(node.geometry.x);
            y = y.saturating_add(node.geometry.y);
            current = node.parent;
        }
        (x, y)
    }

    fn absolute_composed(&self, id: WidgetId) -> Rect {
        let node = self.node(id);
        let (x, y) = self.origin_of(node.parent);
        node.composed.translate(x, y)
    }

    fn is_ancestor(&self, ancestor: WidgetId, of: WidgetId) -> bool {
        let mut current = self.node(of).parent;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).parent;
        }
        false
    }

    /// Composed geometry of `id` from its own geometry and its children's
    /// (already correct) composed geometry.
    fn recompose_one(&self, id: WidgetId) -> Rect {
        let node = self.node(id);
        node.children
            .iter()
            .map(|&c| self.node(c).composed)
            .fold(node.geometry, Rect::grow_extent_to)
    }

    /// Recompute composed geometry from `start` up to its top-level ancestor.
    ///
    /// Each step re-unions over the current children, so shrinking is handled.
    /// Returns the number of widgets visited.
    fn recompose_upward(&mut self, start: Option<WidgetId>) -> usize {
        let mut visited = 0;
        let mut current = start;
        while let Some(id) = current {
            let composed = self.recompose_one(id);
            let node = self.node_mut(id);
            node.composed = composed;
            current = node.parent;
            visited += 1;
        }
        visited
    }
}

impl<R, D> WidgetTree<R, D> {
    /// Create an empty tree drawing through `renderer`.
    pub fn new(renderer: R) -> Self {
        Self::with_capacity(renderer, 0)
    }

    /// Create an empty tree with room for `capacity` widgets before reallocating.
    pub fn with_capacity(renderer: R, capacity: usize) -> Self {
        let arena = Arena::with_capacity(capacity);
        debug!(tree = ?arena.tree, capacity, "widget tree created");
        Self {
            arena,
            renderer,
            damage: Damage::default(),
        }
    }

    /// This tree's identity. Every handle it issues reports it from [`WidgetId::tree`].
    pub fn id(&self) -> TreeId {
        self.arena.tree
    }

    /// The renderer shared by every widget of this tree.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutable access to the renderer.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// The renderer a widget paints with, or `None` if the handle is not alive here.
    pub fn renderer_for(&self, id: WidgetId) -> Option<&R> {
        self.arena.get(id).map(|_| &self.renderer)
    }

    pub(crate) fn ensure_alive(&self, id: WidgetId) -> Result<(), TreeError> {
        if self.is_alive(id) {
            Ok(())
        } else {
            warn!(widget = ?id, tree = ?self.arena.tree, "rejected stale widget handle");
            Err(TreeError::StaleWidget(id))
        }
    }

    /// Create a widget as the last child of `parent`, or as the last top-level
    /// widget if `parent` is `None`.
    ///
    /// Negative extents in `local.geometry` are clamped to zero. The ancestors'
    /// composed geometry is updated before this returns.
    ///
    /// On error (stale parent, allocation failure) the tree is unchanged.
    pub fn create(
        &mut self,
        parent: Option<WidgetId>,
        local: LocalWidget<R, D>,
    ) -> Result<WidgetId, TreeError> {
        if let Some(p) = parent {
            self.ensure_alive(p)?;
        }
        self.arena.reserve_children(parent, 1)?;
        if self.arena.free_list.is_empty() {
            self.arena
                .nodes
                .try_reserve(1)
                .map_err(|_| TreeError::AllocationFailed)?;
            self.arena
                .generations
                .try_reserve(1)
                .map_err(|_| TreeError::AllocationFailed)?;
        }
        let kind = local.kind;
        let id = self.arena.alloc(parent, local);
        self.arena.link(id, parent);
        let visited = self.arena.recompose_upward(parent);
        self.damage.push(self.arena.absolute_composed(id));
        trace!(widget = ?id, parent = ?parent, ?kind, recomposed = visited, "create");
        Ok(id)
    }

    /// Move `id` to the end of `new_parent`'s children, or to the end of the
    /// top-level set if `new_parent` is `None`.
    ///
    /// The widget keeps its relative geometry, so its absolute position
    /// generally changes; call [`WidgetTree::set_geometry`] afterwards to keep
    /// it in place. Both the old and new ancestor chains are recomposed, which
    /// makes this the most expensive structural edit.
    ///
    /// Moving a widget under itself or one of its descendants is rejected with
    /// [`TreeError::CycleDetected`].
    pub fn reparent(
        &mut self,
        id: WidgetId,
        new_parent: Option<WidgetId>,
    ) -> Result<(), TreeError> {
        self.ensure_alive(id)?;
        if let Some(p) = new_parent {
            self.ensure_alive(p)?;
            if p == id || self.arena.is_ancestor(id, p) {
                warn!(widget = ?id, parent = ?p, "rejected reparent into own subtree");
                return Err(TreeError::CycleDetected {
                    widget: id,
                    parent: p,
                });
            }
        }
        self.arena.reserve_children(new_parent, 1)?;

        let before = self.arena.absolute_composed(id);
        let old_parent = self.arena.unlink(id);
        let mut visited = self.arena.recompose_upward(old_parent);
        self.arena.link(id, new_parent);
        visited += self.arena.recompose_upward(new_parent);
        self.damage.push(before);
        self.damage.push(self.arena.absolute_composed(id));
        trace!(
            widget = ?id,
            from = ?old_parent,
            to = ?new_parent,
            recomposed = visited,
            "reparent"
        );
        Ok(())
    }

    /// Destroy `id`.
    ///
    /// With `destroy_children`, the whole subtree is destroyed post-order:
    /// every descendant's destroy callback runs before its parent's. Without
    /// it, the direct children move to `id`'s parent (or become top-level),
    /// appended in their original order with their relative geometry kept.
    ///
    /// The handle, and with `destroy_children` every descendant handle, is
    /// stale afterwards. The former parent's composed geometry is recomputed,
    /// so it shrinks to what remains.
    pub fn destroy(&mut self, id: WidgetId, destroy_children: bool) -> Result<(), TreeError> {
        self.ensure_alive(id)?;
        let parent = self.arena.node(id).parent;
        let before = self.arena.absolute_composed(id);

        let mut promoted = SmallVec::<[WidgetId; 4]>::new();
        if !destroy_children {
            let count = self.arena.node(id).children.len();
            self.arena.reserve_children(parent, count)?;
            promoted = core::mem::take(&mut self.arena.node_mut(id).children);
            for &child in &promoted {
                self.arena.link(child, parent);
            }
        }

        self.arena.unlink(id);
        let released = self.release(id);
        let visited = self.arena.recompose_upward(parent);
        self.damage.push(before);
        // Promoted children keep their relative geometry, so they land somewhere new.
        for &child in &promoted {
            self.damage.push(self.arena.absolute_composed(child));
        }
        trace!(
            widget = ?id,
            parent = ?parent,
            destroy_children,
            released,
            recomposed = visited,
            "destroy"
        );
        Ok(())
    }

    /// Release an already unlinked subtree post-order, running destroy callbacks.
    /// Returns the number of widgets released.
    fn release(&mut self, id: WidgetId) -> usize {
        let mut released = 0;
        // `true` once the widget's children have been pushed above it.
        let mut stack = Vec::from([(id, false)]);

        while let Some((id, expanded)) = stack.pop() {
            if !expanded {
                stack.push((id, true));
                let children = core::mem::take(&mut self.arena.node_mut(id).children);
                // Reversed so the first child's subtree is released first.
                stack.extend(children.into_iter().rev().map(|child| (child, false)));
                continue;
            }
            let mut node = self.arena.take(id);
            if let Some(destroy) = node.destroy {
                destroy(&mut DestroyCx {
                    id,
                    kind: node.kind,
                    geometry: node.geometry,
                    data: &mut node.data,
                    renderer: &mut self.renderer,
                });
            }
            released += 1;
        }
        released
    }

    /// Destroy every widget, post-order, running destroy callbacks.
    ///
    /// Dropping the tree does the same.
    pub fn clear(&mut self) {
        let roots = core::mem::take(&mut self.arena.top_level);
        let mut released = 0;
        for root in roots {
            self.damage.push(self.arena.node(root).composed);
            released += self.release(root);
        }
        debug!(tree = ?self.arena.tree, released, "widget tree cleared");
    }

    /// Replace the relative geometry of `id`.
    ///
    /// Children keep their relative geometry (and so move with `id`). The
    /// composed geometry of `id` and of every ancestor is recomputed.
    pub fn set_geometry(&mut self, id: WidgetId, geometry: Rect) -> Result<(), TreeError> {
        self.ensure_alive(id)?;
        let before = self.arena.absolute_composed(id);
        self.arena.node_mut(id).geometry = geometry.normalized();
        let visited = self.arena.recompose_upward(Some(id));
        self.damage.push(before);
        self.damage.push(self.arena.absolute_composed(id));
        trace!(widget = ?id, ?geometry, recomposed = visited, "set geometry");
        Ok(())
    }

    /// Set or clear the advisory event-block flag. Children are not affected.
    pub fn set_events_blocked(&mut self, id: WidgetId, blocked: bool) -> Result<(), TreeError> {
        self.set_flag(id, WidgetFlags::EVENTS_BLOCKED, blocked)
    }

    /// Hide or show a widget. Hidden widgets and their subtrees are skipped
    /// when painting but still count toward composed geometry.
    pub fn set_hidden(&mut self, id: WidgetId, hidden: bool) -> Result<(), TreeError> {
        self.set_flag(id, WidgetFlags::HIDDEN, hidden)?;
        if let Some(node) = self.arena.get(id) {
            let (x, y) = self.arena.origin_of(node.parent);
            self.damage.push(node.composed.translate(x, y));
        }
        Ok(())
    }

    fn set_flag(&mut self, id: WidgetId, flag: WidgetFlags, value: bool) -> Result<(), TreeError> {
        self.ensure_alive(id)?;
        self.arena.node_mut(id).flags.set(flag, value);
        Ok(())
    }

    /// Replace the user data of `id`, returning the previous value.
    pub fn set_data(&mut self, id: WidgetId, data: D) -> Result<D, TreeError> {
        self.ensure_alive(id)?;
        Ok(core::mem::replace(&mut self.arena.node_mut(id).data, data))
    }

    /// Take the damage accumulated since the last call.
    pub fn take_damage(&mut self) -> Damage {
        core::mem::take(&mut self.damage)
    }
}

impl<R, D> WidgetTree<R, D> {
    // --- queries ---

    /// Returns true if `id` refers to a live widget of this tree.
    ///
    /// A `WidgetId` is live if it was issued by this tree, its slot exists,
    /// and the slot's generation matches.
    pub fn is_alive(&self, id: WidgetId) -> bool {
        self.arena.get(id).is_some()
    }

    /// Number of live widgets.
    pub fn len(&self) -> usize {
        self.arena.nodes.len() - self.arena.free_list.len()
    }

    /// Returns `true` if the tree holds no widgets.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Top-level widgets in paint order.
    pub fn top_level(&self) -> &[WidgetId] {
        &self.arena.top_level
    }

    /// Returns the parent of a widget, or `None` for top-level widgets and stale ids.
    pub fn parent_of(&self, id: WidgetId) -> Option<WidgetId> {
        self.arena.get(id).and_then(|node| node.parent)
    }

    /// Get the children of a widget in paint order, or an empty slice if stale.
    pub fn children_of(&self, id: WidgetId) -> &[WidgetId] {
        let Some(node) = self.arena.get(id) else {
            return &[];
        };
        &node.children
    }

    /// Returns `true` if `ancestor` is a strict ancestor of `of`.
    pub fn is_ancestor(&self, ancestor: WidgetId, of: WidgetId) -> bool {
        self.is_alive(ancestor) && self.is_alive(of) && self.arena.is_ancestor(ancestor, of)
    }

    /// Returns the kind tag of a live widget.
    pub fn kind(&self, id: WidgetId) -> Option<WidgetKind> {
        self.arena.get(id).map(|node| node.kind)
    }

    /// Returns the user data of a live widget.
    pub fn data(&self, id: WidgetId) -> Option<&D> {
        self.arena.get(id).map(|node| &node.data)
    }

    /// Returns the user data of a live widget mutably.
    pub fn data_mut(&mut self, id: WidgetId) -> Option<&mut D> {
        self.arena.get_mut(id).map(|node| &mut node.data)
    }

    /// Returns the flags of a live widget.
    pub fn flags(&self, id: WidgetId) -> Option<WidgetFlags> {
        self.arena.get(id).map(|node| node.flags)
    }

    /// Returns whether a live widget is hidden.
    pub fn is_hidden(&self, id: WidgetId) -> Option<bool> {
        self.flags(id).map(|f| f.contains(WidgetFlags::HIDDEN))
    }

    /// Returns whether a live widget has its events blocked.
    pub fn events_blocked(&self, id: WidgetId) -> Option<bool> {
        self.flags(id).map(|f| f.contains(WidgetFlags::EVENTS_BLOCKED))
    }

    /// Geometry of a live widget relative to its parent.
    pub fn geometry(&self, id: WidgetId) -> Option<Rect> {
        self.arena.get(id).map(|node| node.geometry)
    }

    /// Geometry of a live widget in screen space.
    ///
    /// Computed on demand by walking the ancestor chain; not cached.
    pub fn absolute_geometry(&self, id: WidgetId) -> Option<Rect> {
        let node = self.arena.get(id)?;
        let (x, y) = self.arena.origin_of(node.parent);
        Some(node.geometry.translate(x, y))
    }

    /// Area covered by a live widget and all its descendants, relative to its
    /// parent.
    ///
    /// The origin always equals [`WidgetTree::geometry`]'s; only the extent grows.
    pub fn composed_geometry(&self, id: WidgetId) -> Option<Rect> {
        self.arena.get(id).map(|node| node.composed)
    }

    /// Get the next widget in paint order (depth-first, parents before children).
    ///
    /// Walks across top-level widgets. Returns `None` at the end or if the
    /// handle is stale. Does not wrap around.
    pub fn next_depth_first(&self, current: WidgetId) -> Option<WidgetId> {
        let node = self.arena.get(current)?;
        if let Some(&first_child) = node.children.first() {
            return Some(first_child);
        }
        let mut id = current;
        loop {
            if let Some(next_sibling) = self.next_sibling(id) {
                return Some(next_sibling);
            }
            id = self.arena.node(id).parent?;
        }
    }

    /// Get the previous widget in paint order.
    ///
    /// Returns `None` at the start or if the handle is stale. Does not wrap around.
    pub fn prev_depth_first(&self, current: WidgetId) -> Option<WidgetId> {
        let node = self.arena.get(current)?;
        match self.prev_sibling(current) {
            Some(prev_sibling) => Some(self.last_in_subtree(prev_sibling)),
            None => node.parent,
        }
    }

    fn next_sibling(&self, id: WidgetId) -> Option<WidgetId> {
        let siblings = self.arena.siblings(self.arena.node(id).parent);
        let pos = siblings.iter().position(|&s| s == id)?;
        siblings.get(pos + 1).copied()
    }

    fn prev_sibling(&self, id: WidgetId) -> Option<WidgetId> {
        let siblings = self.arena.siblings(self.arena.node(id).parent);
        let pos = siblings.iter().position(|&s| s == id)?;
        pos.checked_sub(1).and_then(|p| siblings.get(p).copied())
    }

    fn last_in_subtree(&self, mut id: WidgetId) -> WidgetId {
        while let Some(&last_child) = self.arena.node(id).children.last() {
            id = last_child;
        }
        id
    }
}

impl<R, D> Drop for WidgetTree<R, D> {
    fn drop(&mut self) {
        self.clear();
    }
}
