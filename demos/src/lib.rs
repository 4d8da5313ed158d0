// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runnable demos for `understory_widget_tree`.
//!
//! - `frame_family`: a chain of nested buttons, composed geometry growth, and teardown.
//! - `paint_order`: paint order, hiding, and reparenting on a small scene.
