// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint order, hiding, and reparenting on a small scene.
//!
//! Builds two top-level frames with labels, paints, then hides one frame,
//! moves a label across, and paints again. Each paint prints the callbacks in
//! the order they ran, which is also bottom-to-top stacking order.
//!
//! Run:
//! - `cargo run -p understory_widget_tree_demos --example paint_order`

use tracing_subscriber::EnvFilter;
use understory_widget_tree::{LocalWidget, PaintCx, Rect, WidgetKind, WidgetTree};

fn record(cx: &mut PaintCx<'_, Vec<String>, &'static str>) {
    let line = format!("{:<8} {:?} at {:?}", cx.data(), cx.kind(), cx.absolute_geometry());
    cx.renderer().push(line);
}

fn widget(
    kind: WidgetKind,
    name: &'static str,
    geometry: Rect,
) -> LocalWidget<Vec<String>, &'static str> {
    LocalWidget {
        kind,
        geometry,
        paint: Some(record),
        data: name,
        ..Default::default()
    }
}

fn flush(tree: &mut WidgetTree<Vec<String>, &'static str>, title: &str) {
    tree.paint();
    println!("-- {title}");
    for line in tree.renderer_mut().drain(..) {
        println!("{line}");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut tree: WidgetTree<Vec<String>, &'static str> = WidgetTree::new(Vec::new());
    let left = tree
        .create(None, widget(WidgetKind::Frame, "left", Rect::new(0, 0, 100, 100)))
        .unwrap();
    let right = tree
        .create(None, widget(WidgetKind::Frame, "right", Rect::new(120, 0, 100, 100)))
        .unwrap();
    let title = tree
        .create(Some(left), widget(WidgetKind::Label, "title", Rect::new(5, 5, 90, 20)))
        .unwrap();
    tree.create(Some(left), widget(WidgetKind::Label, "body", Rect::new(5, 30, 90, 60)))
        .unwrap();
    tree.create(
        Some(right),
        widget(WidgetKind::Custom(7), "gauge", Rect::new(10, 10, 80, 80)),
    )
    .unwrap();

    flush(&mut tree, "initial");

    tree.set_hidden(left, true).unwrap();
    tree.reparent(title, Some(right)).unwrap();
    tree.set_events_blocked(right, true).unwrap();
    flush(&mut tree, "left hidden, title moved right");

    println!(
        "right composed {:?}, events blocked: {:?}",
        tree.composed_geometry(right),
        tree.events_blocked(right)
    );
}
