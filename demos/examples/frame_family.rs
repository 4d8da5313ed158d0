// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ten buttons, each nested inside the previous one.
//!
//! Every button sits at `(10, 10)` relative to its parent, so the chain walks
//! diagonally across the screen while each ancestor's composed geometry grows
//! to cover it. The renderer is a plain command list printed to stdout.
//!
//! Run:
//! - `RUST_LOG=understory_widget_tree=trace cargo run -p understory_widget_tree_demos --example frame_family`

use tracing_subscriber::EnvFilter;
use understory_widget_tree::{
    DestroyCx, LocalWidget, PaintCx, Rect, WidgetId, WidgetKind, WidgetTree,
};

/// Draw commands recorded instead of hitting a real backend.
#[derive(Debug, Default)]
struct CommandList {
    commands: Vec<String>,
}

/// Per-button data: the caption.
type Caption = &'static str;

fn paint_button(cx: &mut PaintCx<'_, CommandList, Caption>) {
    let caption = *cx.data();
    let id = cx.id();
    let rect = cx.absolute_geometry();
    cx.renderer().commands.push(format!(
        "fill_rect {id:?} ({}, {}, {}x{}) caption={caption:?}",
        rect.x, rect.y, rect.w, rect.h
    ));
}

fn destroy_button(cx: &mut DestroyCx<'_, CommandList, Caption>) {
    let id = cx.id();
    cx.renderer().commands.push(format!("release {id:?}"));
}

fn button(caption: Caption, geometry: Rect) -> LocalWidget<CommandList, Caption> {
    LocalWidget {
        kind: WidgetKind::Button,
        geometry,
        paint: Some(paint_button),
        destroy: Some(destroy_button),
        data: caption,
        ..Default::default()
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut gui: WidgetTree<CommandList, Caption> = WidgetTree::new(CommandList::default());
    let geometry = Rect::new(10, 10, 160, 120);

    let mut parent: Option<WidgetId> = None;
    let mut chain = Vec::new();
    for _ in 0..10 {
        let id = gui
            .create(parent, button("Yay", geometry))
            .expect("creating a button under a live parent");
        chain.push(id);
        parent = Some(id);
    }

    tracing::info!(widgets = gui.len(), "button chain built");

    gui.paint();
    for command in gui.renderer_mut().commands.drain(..) {
        println!("{command}");
    }

    let outer = chain[0];
    let innermost = chain[chain.len() - 1];
    println!(
        "outermost composed {:?}, as kurbo {:?}",
        gui.composed_geometry(outer),
        gui.composed_geometry(outer).map(kurbo::Rect::from)
    );
    println!("innermost absolute {:?}", gui.absolute_geometry(innermost));
    if let Some(damage) = gui.take_damage().union_rect() {
        println!("damage since start {damage:?}");
    }

    // Pull the middle of the chain out; its children fall back to its parent.
    gui.destroy(chain[4], false)
        .expect("destroying a live button");
    println!(
        "after unlinking the fifth button, innermost absolute {:?}",
        gui.absolute_geometry(innermost)
    );

    gui.clear();
    for command in gui.renderer_mut().commands.drain(..) {
        println!("{command}");
    }
}
