// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_widget_tree --heading-base-level=0

//! Understory Widget Tree: a retained-mode widget hierarchy with cached geometry.
//!
//! Understory Widget Tree owns the structure of on-screen widgets for a retained-mode toolkit:
//! parent/child links, paint order, per-widget geometry, and the derived geometry that has to stay
//! consistent while widgets are created, moved, resized, and destroyed.
//!
//! - Widgets live in an arena and are addressed by generational [`WidgetId`] handles.
//! - Every widget has a *relative* geometry (in its parent's space), an on-demand *absolute*
//!   geometry (in screen space), and a cached *composed* geometry covering its whole subtree.
//! - Painting walks parents before children and siblings in insertion order, calling each
//!   widget's paint callback with a read-only view of the tree and the shared renderer.
//!
//! ## Where this fits
//!
//! The tree sits between a toolkit's widget implementations and its renderer. Widget kinds supply
//! paint and destroy callbacks; the tree decides when they run and in what order.
//!
//! The renderer is opaque to this crate. It is stored once per tree and handed to paint and
//! destroy callbacks; the tree never issues drawing commands itself.
//!
//! ## Not a layout engine
//!
//! Positions and sizes are whatever callers set. Nothing here measures content or applies flex,
//! grid, or stack policies, and there is no styling, animation, or accessibility model.
//!
//! ## Geometry
//!
//! ```text
//!  (10,10) +------------------------------+
//!          | Root widget                  |
//!  (0,20)  +-------------+                |
//!          | Child       |                |
//!          |     (40,20) +-------------+  |
//!          |             | Grandchild  |  |
//!          |             +-------------+ 80x40
//!          +-------------+ 70x90          |
//!          +------------------------------+ 150x150
//! ```
//!
//! The child sits at `(0, 20)` relative to the root, so its absolute origin is `(10, 30)`; the
//! grandchild's is `(50, 50)`. Moving a widget moves its whole subtree.
//!
//! Composed geometry keeps the widget's own origin and only grows its extent. Width and height
//! grow independently, each only when some child's composed far edge overflows along that axis.
//! Above, the child's composed geometry is `(0, 20, 120, 90)`: the grandchild reaches `40 + 80`
//! horizontally, but only `20 + 40` vertically, which is still inside `90`.
//!
//! ## API overview
//!
//! - [`WidgetTree`]: arena, top-level set, renderer, and every mutation.
//! - [`LocalWidget`]: creation data (kind, geometry, callbacks, user data, flags).
//! - [`WidgetKind`]: built-in kinds plus an open custom range.
//! - [`WidgetFlags`]: hidden and events-blocked state.
//! - [`PaintCx`] / [`DestroyCx`]: what callbacks receive.
//! - [`Rect`]: integer geometry.
//! - [`TreeError`]: why a mutation was rejected.
//! - [`Damage`]: screen regions touched since the last [`WidgetTree::take_damage`].
//!
//! Key operations:
//! - [`WidgetTree::create`] → [`WidgetId`]
//! - [`WidgetTree::reparent`], [`WidgetTree::destroy`], [`WidgetTree::set_geometry`]
//! - [`WidgetTree::geometry`], [`WidgetTree::absolute_geometry`], [`WidgetTree::composed_geometry`]
//! - [`WidgetTree::paint`] / [`WidgetTree::paint_widget`]
//! - [`WidgetTree::set_events_blocked`], [`WidgetTree::set_hidden`]
//!
//! Structural edits recompose eagerly, walking parent links to the top-level widget, so costs are
//! bounded by depth times fan-out. [`WidgetTree::reparent`] walks two chains and is the most
//! expensive edit; avoid it in hot paths.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support in dependencies.
//! - `libm`: `no_std` float support for `kurbo`.
//! - `kurbo`: conversions between [`Rect`] and `kurbo::Rect`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod damage;
mod error;
mod geometry;
mod paint;
mod tree;
mod types;

pub use damage::Damage;
pub use error::TreeError;
pub use geometry::Rect;
pub use paint::{DestroyCx, PaintCx};
pub use tree::WidgetTree;
pub use types::{
    CUSTOM_KIND_BASE, DestroyFn, LocalWidget, PaintFn, TreeId, WidgetFlags, WidgetId, WidgetKind,
};
