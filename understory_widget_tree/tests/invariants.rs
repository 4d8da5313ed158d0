// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Randomized edit sequences checked against the tree's structural and geometric invariants.

use proptest::prelude::*;
use understory_widget_tree::{LocalWidget, Rect, TreeError, WidgetId, WidgetTree};

type Tree = WidgetTree<(), u32>;

#[derive(Clone, Debug)]
enum Op {
    Create { parent: Option<usize>, rect: Rect },
    Reparent { widget: usize, parent: Option<usize> },
    SetGeometry { widget: usize, rect: Rect },
    Destroy { widget: usize, children: bool },
}

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (-20_i32..100, -20_i32..100, -5_i32..100, -5_i32..100)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (proptest::option::of(any::<usize>()), rect_strategy())
            .prop_map(|(parent, rect)| Op::Create { parent, rect }),
        2 => (any::<usize>(), proptest::option::of(any::<usize>()))
            .prop_map(|(widget, parent)| Op::Reparent { widget, parent }),
        2 => (any::<usize>(), rect_strategy())
            .prop_map(|(widget, rect)| Op::SetGeometry { widget, rect }),
        1 => (any::<usize>(), any::<bool>())
            .prop_map(|(widget, children)| Op::Destroy { widget, children }),
    ]
}

fn pick(live: &[WidgetId], i: usize) -> Option<WidgetId> {
    (!live.is_empty()).then(|| live[i % live.len()])
}

fn leaf(rect: Rect, tag: u32) -> LocalWidget<(), u32> {
    LocalWidget {
        geometry: rect,
        data: tag,
        ..LocalWidget::default()
    }
}

/// Every widget reachable from the top-level set, in paint order.
fn reachable(tree: &Tree) -> Vec<WidgetId> {
    let mut out = Vec::new();
    let mut next = tree.top_level().first().copied();
    while let Some(id) = next {
        out.push(id);
        next = tree.next_depth_first(id);
    }
    out
}

fn check_invariants(tree: &Tree, live: &[WidgetId]) -> Result<(), TestCaseError> {
    let seen = reachable(tree);
    prop_assert_eq!(seen.len(), live.len(), "every live widget is reachable exactly once");
    prop_assert_eq!(tree.len(), live.len());
    for id in live {
        prop_assert!(seen.contains(id), "{:?} is live but unreachable", id);
    }

    for &t in tree.top_level() {
        prop_assert_eq!(tree.parent_of(t), None);
    }

    for &w in &seen {
        prop_assert_eq!(w.tree(), tree.id(), "single owning tree");

        let geometry = tree.geometry(w).unwrap();
        let composed = tree.composed_geometry(w).unwrap();
        prop_assert!(geometry.w >= 0 && geometry.h >= 0, "extents are clamped");
        prop_assert_eq!(composed.x, geometry.x, "composed origin never shifts");
        prop_assert_eq!(composed.y, geometry.y, "composed origin never shifts");
        prop_assert!(composed.w >= geometry.w);
        prop_assert!(composed.h >= geometry.h);

        let children = tree.children_of(w);
        let mut expected = geometry;
        for (i, &c) in children.iter().enumerate() {
            prop_assert!(!children[..i].contains(&c), "duplicate child {:?}", c);
            prop_assert_eq!(tree.parent_of(c), Some(w), "parent link matches membership");

            let child = tree.composed_geometry(c).unwrap();
            prop_assert!(composed.w >= child.right(), "far edge covered along x");
            prop_assert!(composed.h >= child.bottom(), "far edge covered along y");
            if child.x >= 0 && child.y >= 0 {
                prop_assert!(
                    Rect::new(0, 0, composed.w, composed.h).contains_rect(child),
                    "translated child composed geometry contained"
                );
            }
            expected = Rect::new(
                expected.x,
                expected.y,
                expected.w.max(child.right()),
                expected.h.max(child.bottom()),
            );
        }
        prop_assert_eq!(composed, expected, "composed geometry is exact, not just covering");

        let (mut ax, mut ay) = (geometry.x, geometry.y);
        let mut up = tree.parent_of(w);
        while let Some(p) = up {
            let pg = tree.geometry(p).unwrap();
            ax += pg.x;
            ay += pg.y;
            up = tree.parent_of(p);
        }
        prop_assert_eq!(
            tree.absolute_geometry(w),
            Some(Rect::new(ax, ay, geometry.w, geometry.h))
        );
    }
    Ok(())
}

proptest! {
    #[test]
    fn edits_preserve_invariants(ops in proptest::collection::vec(op_strategy(), 1..60)) {
        let mut tree = Tree::new(());
        let mut live: Vec<WidgetId> = Vec::new();
        let mut next_tag = 0_u32;

        for op in ops {
            match op {
                Op::Create { parent, rect } => {
                    let parent = parent.and_then(|i| pick(&live, i));
                    let id = tree.create(parent, leaf(rect, next_tag)).unwrap();
                    next_tag += 1;
                    prop_assert_eq!(tree.parent_of(id), parent);
                    prop_assert_eq!(tree.composed_geometry(id), Some(rect.normalized()));
                    live.push(id);
                }
                Op::Reparent { widget, parent } => {
                    let Some(w) = pick(&live, widget) else { continue };
                    let parent = parent.and_then(|i| pick(&live, i));
                    let before = tree.parent_of(w);
                    let geometry = tree.geometry(w);
                    match tree.reparent(w, parent) {
                        Ok(()) => {
                            prop_assert_eq!(tree.parent_of(w), parent);
                            prop_assert_eq!(tree.geometry(w), geometry, "relative geometry kept");
                        }
                        Err(TreeError::CycleDetected { .. }) => {
                            let p = parent.unwrap();
                            prop_assert!(p == w || tree.is_ancestor(w, p));
                            prop_assert_eq!(tree.parent_of(w), before, "rejected edit changes nothing");
                        }
                        Err(e) => prop_assert!(false, "unexpected error {:?}", e),
                    }
                }
                Op::SetGeometry { widget, rect } => {
                    let Some(w) = pick(&live, widget) else { continue };
                    tree.set_geometry(w, rect).unwrap();
                    prop_assert_eq!(tree.geometry(w), Some(rect.normalized()));
                }
                Op::Destroy { widget, children } => {
                    let Some(w) = pick(&live, widget) else { continue };
                    let parent = tree.parent_of(w);
                    let orphans: Vec<(WidgetId, Option<Rect>)> = tree
                        .children_of(w)
                        .iter()
                        .map(|&c| (c, tree.geometry(c)))
                        .collect();
                    tree.destroy(w, children).unwrap();
                    prop_assert!(!tree.is_alive(w));
                    if !children {
                        let siblings = match parent {
                            Some(p) => tree.children_of(p),
                            None => tree.top_level(),
                        };
                        let tail = &siblings[siblings.len() - orphans.len()..];
                        for ((c, geometry), &now) in orphans.iter().zip(tail) {
                            prop_assert_eq!(*c, now, "children keep their relative order");
                            prop_assert_eq!(tree.geometry(*c), *geometry);
                            prop_assert_eq!(tree.parent_of(*c), parent);
                        }
                    } else {
                        for (c, _) in &orphans {
                            prop_assert!(!tree.is_alive(*c));
                        }
                    }
                    live.retain(|&id| tree.is_alive(id));
                }
            }
            check_invariants(&tree, &live)?;
        }
    }

    #[test]
    fn set_geometry_is_last_write_wins(
        first in rect_strategy(),
        second in rect_strategy(),
        child in rect_strategy(),
    ) {
        let mut tree = Tree::new(());
        let root = tree.create(None, leaf(Rect::new(0, 0, 10, 10), 0)).unwrap();
        let w = tree.create(Some(root), leaf(child, 1)).unwrap();
        tree.set_geometry(w, first).unwrap();
        tree.set_geometry(w, second).unwrap();
        prop_assert_eq!(tree.geometry(w), Some(second.normalized()));
        let root_composed = tree.composed_geometry(root).unwrap();
        let second = second.normalized();
        prop_assert_eq!(root_composed.w, 10_i32.max(second.right()));
        prop_assert_eq!(root_composed.h, 10_i32.max(second.bottom()));
    }
}
