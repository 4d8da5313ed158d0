// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the widget tree: identifiers, kinds, flags, and creation data.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::geometry::Rect;
use crate::paint::{DestroyCx, PaintCx};

/// Identifier of a [`WidgetTree`](crate::WidgetTree) instance.
///
/// Every tree draws a fresh id at construction; widget handles remember the
/// tree that issued them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TreeId(u32);

impl TreeId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Identifier for a widget in a tree (generational).
///
/// A handle stays valid until its widget is destroyed. After that every
/// operation treats it as stale, even if the slot is reused by a new widget.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct WidgetId(pub(crate) u32, pub(crate) u32, pub(crate) TreeId);

impl WidgetId {
    pub(crate) const fn new(idx: u32, generation: u32, tree: TreeId) -> Self {
        Self(idx, generation, tree)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// The tree that allocated this widget.
    pub const fn tree(self) -> TreeId {
        self.2
    }
}

/// Raw value of the first custom widget kind.
pub const CUSTOM_KIND_BASE: u32 = 0x10_0000;

/// Kind tag of a widget.
///
/// The built-in kinds are the ones the toolkit ships. Anything else uses
/// [`WidgetKind::Custom`]; the range is open and extended by convention, not
/// by registration.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum WidgetKind {
    /// No particular kind.
    #[default]
    None,
    /// A framed container.
    Frame,
    /// A text label.
    Label,
    /// A push button.
    Button,
    /// A caller-defined kind. `Custom(n)` encodes as `CUSTOM_KIND_BASE + n`.
    Custom(u32),
}

impl WidgetKind {
    /// Numeric encoding of this kind.
    ///
    /// Returns `None` for `Custom(n)` when `CUSTOM_KIND_BASE + n` does not fit
    /// in a `u32`; such kinds have no numeric encoding.
    pub const fn raw(self) -> Option<u32> {
        match self {
            Self::None => Some(0),
            Self::Frame => Some(1),
            Self::Label => Some(2),
            Self::Button => Some(3),
            Self::Custom(n) => CUSTOM_KIND_BASE.checked_add(n),
        }
    }

    /// Decode a numeric kind. Values between the built-ins and the custom
    /// range are unassigned and yield `None`.
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::None),
            1 => Some(Self::Frame),
            2 => Some(Self::Label),
            3 => Some(Self::Button),
            r if r >= CUSTOM_KIND_BASE => Some(Self::Custom(r - CUSTOM_KIND_BASE)),
            _ => None,
        }
    }
}

bitflags::bitflags! {
    /// Per-widget state flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct WidgetFlags: u8 {
        /// Widget and its subtree are skipped during paint traversal.
        const HIDDEN         = 0b0000_0001;
        /// Advisory: input dispatch should not deliver events to this widget.
        ///
        /// The tree never reads this flag itself.
        const EVENTS_BLOCKED = 0b0000_0010;
    }
}

impl Default for WidgetFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// Paint callback of a widget kind.
///
/// Invoked with a read-only view of the widget and mutable access to the
/// tree's renderer. Children are painted after their parent returns.
pub type PaintFn<R, D> = fn(&mut PaintCx<'_, R, D>);

/// Destroy callback of a widget kind.
///
/// Invoked exactly once, right before the widget's storage is released.
pub type DestroyFn<R, D> = fn(&mut DestroyCx<'_, R, D>);

/// Creation data for a widget.
///
/// `R` is the renderer type shared by the whole tree, `D` the opaque per-widget
/// user data. The tree stores `data` and hands it back to callbacks, but never
/// inspects it.
pub struct LocalWidget<R, D> {
    /// Kind tag.
    pub kind: WidgetKind,
    /// Geometry relative to the parent (or to the screen for top-level widgets).
    pub geometry: Rect,
    /// Paint callback, if any.
    pub paint: Option<PaintFn<R, D>>,
    /// Destroy callback, if any.
    pub destroy: Option<DestroyFn<R, D>>,
    /// Opaque user data.
    pub data: D,
    /// Initial flags.
    pub flags: WidgetFlags,
}

impl<R, D: Default> Default for LocalWidget<R, D> {
    fn default() -> Self {
        Self {
            kind: WidgetKind::None,
            geometry: Rect::ZERO,
            paint: None,
            destroy: None,
            data: D::default(),
            flags: WidgetFlags::default(),
        }
    }
}

impl<R, D: core::fmt::Debug> core::fmt::Debug for LocalWidget<R, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LocalWidget")
            .field("kind", &self.kind)
            .field("geometry", &self.geometry)
            .field("paint", &self.paint.is_some())
            .field("destroy", &self.destroy.is_some())
            .field("data", &self.data)
            .field("flags", &self.flags)
            .finish()
    }
}
