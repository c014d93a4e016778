//! Property tests for the layout solver and render pass over random panel trees.
//!
//! 1. No two canvases overlap, and all stay inside the root inset.
//! 2. `offset_x` is the summed width of the left tenons (and `offset_y` of the bottom ones).
//! 3. `arrange` keeps a panel and its direct tenons disjoint inside the allotment.

use proptest::prelude::*;
use sunmao_core::geom::{FigureRect, figure_rect, nominal_size, rects_overlap};
use sunmao_core::layout::arrange;
use sunmao_core::{
    AttachPolicy, MemoryFigure, MortiseId, PanelTree, RootOptions, Side, TenonOptions,
    create_memory_root,
};

const EPS: f64 = 1e-9;

fn side_strategy() -> impl Strategy<Value = Side> {
    prop_oneof![
        Just(Side::Top),
        Just(Side::Bottom),
        Just(Side::Left),
        Just(Side::Right),
    ]
}

fn ops_strategy() -> impl Strategy<Value = Vec<(usize, Side, f64)>> {
    proptest::collection::vec((0usize..64, side_strategy(), 0.05f64..2.0), 0..16)
}

fn build(width: f64, height: f64, ops: &[(usize, Side, f64)]) -> PanelTree<MemoryFigure> {
    let mut tree = create_memory_root(RootOptions {
        size: (width, height),
        auto_render: false,
        ..Default::default()
    })
    .unwrap()
    .tree;
    let mut ids = vec![tree.root()];
    for &(pick, side, size) in ops {
        let parent = ids[pick % ids.len()];
        let id = tree
            .attach_with(parent, side, TenonOptions::sized(size), AttachPolicy::Stack)
            .unwrap();
        ids.push(id);
    }
    tree
}

fn within(inner: &FigureRect, outer: &FigureRect) -> bool {
    inner.min_x() >= outer.min_x() - EPS
        && inner.max_x() <= outer.max_x() + EPS
        && inner.min_y() >= outer.min_y() - EPS
        && inner.max_y() <= outer.max_y() + EPS
}

proptest! {
    #[test]
    fn canvases_never_overlap(
        width in 0.5f64..20.0,
        height in 0.5f64..20.0,
        ops in ops_strategy(),
    ) {
        let mut tree = build(width, height, &ops);
        tree.render().unwrap();
        let inset = figure_rect(0.1, 0.1, 0.8, 0.8);
        let rects: Vec<FigureRect> = tree.figure().all_axes().map(|(_, a)| a.rect()).collect();
        prop_assert_eq!(rects.len(), tree.len());
        for (i, a) in rects.iter().enumerate() {
            prop_assert!(within(a, &inset), "{:?} escapes the inset", a);
            for b in &rects[i + 1..] {
                prop_assert!(!rects_overlap(a, b, EPS), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn offsets_are_left_and_bottom_sums(
        width in 0.5f64..20.0,
        height in 0.5f64..20.0,
        ops in ops_strategy(),
    ) {
        let mut tree = build(width, height, &ops);
        let ids: Vec<MortiseId> = tree.iter().collect();
        for id in ids {
            let solution = tree.calculate_layout(id).unwrap();
            let sum = |tree: &PanelTree<MemoryFigure>, side: Side, f: fn(f64, f64) -> f64| {
                tree.children(id, side)
                    .iter()
                    .map(|c| {
                        let s = tree.node(*c).unwrap().size();
                        f(s.width, s.height)
                    })
                    .sum::<f64>()
            };
            let left = sum(&tree, Side::Left, |w, _| w);
            let bottom = sum(&tree, Side::Bottom, |_, h| h);
            prop_assert!((solution.offset_x - left).abs() < EPS);
            prop_assert!((solution.offset_y - bottom).abs() < EPS);
        }
    }

    #[test]
    fn arrangement_is_disjoint_inside_the_allotment(
        own_w in 0.1f64..10.0,
        own_h in 0.1f64..10.0,
        factors in proptest::collection::vec((side_strategy(), 0.05f64..2.0), 0..8),
        x in 0.0f64..0.5,
        y in 0.0f64..0.5,
        w in 0.01f64..0.5,
        h in 0.01f64..0.5,
    ) {
        let tenons: Vec<(Side, _)> = factors
            .iter()
            .map(|&(side, f)| {
                let size = if side.is_vertical_stack() {
                    nominal_size(own_w, own_h * f)
                } else {
                    nominal_size(own_w * f, own_h)
                };
                (side, size)
            })
            .collect();
        let allotted = figure_rect(x, y, w, h);
        let arrangement = arrange(allotted, nominal_size(own_w, own_h), &tenons).unwrap();

        let mut all = vec![arrangement.own];
        all.extend(arrangement.tenons.iter().copied());
        prop_assert_eq!(all.len(), tenons.len() + 1);
        for (i, a) in all.iter().enumerate() {
            prop_assert!(within(a, &allotted));
            for b in &all[i + 1..] {
                prop_assert!(!rects_overlap(a, b, EPS));
            }
        }
    }
}
