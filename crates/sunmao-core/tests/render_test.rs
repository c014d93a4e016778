use sunmao_core::canvas::{ArtistStyle, HAlign, VAlign};
use sunmao_core::geom::{FigureRect, rects_overlap};
use sunmao_core::{
    Axis, AxisSelect, Canvas, Figure, LegendMode, LegendRequest, MemoryFigure, MortiseId,
    PanelTree, RootOptions, Side, TenonOptions, create_memory_root,
};

const EPS: f64 = 1e-9;

fn tree(width: f64, height: f64) -> (PanelTree<MemoryFigure>, MortiseId) {
    let assembly = create_memory_root(RootOptions::default().with_size(width, height)).unwrap();
    (assembly.tree, assembly.root)
}

fn assert_rect(actual: FigureRect, expected: [f64; 4]) {
    let got = [
        actual.origin.x,
        actual.origin.y,
        actual.size.width,
        actual.size.height,
    ];
    for (a, e) in got.iter().zip(expected) {
        assert!((a - e).abs() < EPS, "got {got:?}, expected {expected:?}");
    }
}

#[test]
fn auto_rendered_root_fills_the_inset() {
    let (tree, root) = tree(10.0, 8.0);
    assert!(tree.is_rendered());
    assert_rect(tree.position(root).unwrap(), [0.1, 0.1, 0.8, 0.8]);
    assert_eq!(tree.figure().axes_count(), 1);
}

#[test]
fn top_tenon_sits_directly_above_its_parent() {
    let (mut tree, root) = tree(2.0, 2.0);
    let top = tree.attach(root, Side::Top, TenonOptions::sized(0.5)).unwrap();

    let h = 0.8 / 3.0;
    assert_rect(tree.position(root).unwrap(), [0.1, 0.1, 0.8, 2.0 * h]);
    assert_rect(tree.position(top).unwrap(), [0.1, 0.1 + 2.0 * h, 0.8, h]);
}

#[test]
fn four_sides_tile_around_the_root() {
    let (mut tree, root) = tree(2.0, 2.0);
    let top = tree.attach(root, Side::Top, TenonOptions::sized(0.5)).unwrap();
    let bottom = tree.attach(root, Side::Bottom, TenonOptions::sized(0.5)).unwrap();
    let left = tree.attach(root, Side::Left, TenonOptions::sized(0.5)).unwrap();
    let right = tree.attach(root, Side::Right, TenonOptions::sized(0.5)).unwrap();

    // Envelope is 4 x 4 nominal units inside a 0.8 x 0.8 inset.
    let u = 0.8 / 4.0;
    assert_rect(tree.position(root).unwrap(), [0.1 + u, 0.1 + u, 2.0 * u, 2.0 * u]);
    assert_rect(tree.position(top).unwrap(), [0.1 + u, 0.1 + 3.0 * u, 2.0 * u, u]);
    assert_rect(tree.position(bottom).unwrap(), [0.1 + u, 0.1, 2.0 * u, u]);
    assert_rect(tree.position(left).unwrap(), [0.1, 0.1 + u, u, 2.0 * u]);
    assert_rect(tree.position(right).unwrap(), [0.1 + 3.0 * u, 0.1 + u, u, 2.0 * u]);
}

#[test]
fn grandchildren_are_fitted_inside_their_parents_allotment() {
    let (mut tree, root) = tree(2.0, 2.0);
    let top = tree.attach(root, Side::Top, TenonOptions::sized(0.5)).unwrap();
    let allotment_before = tree.position(top).unwrap();
    let outer = tree.attach(top, Side::Top, TenonOptions::sized(1.0)).unwrap();

    let top_rect = tree.position(top).unwrap();
    let outer_rect = tree.position(outer).unwrap();
    assert!((top_rect.min_y() - allotment_before.min_y()).abs() < EPS);
    assert!((outer_rect.max_y() - allotment_before.max_y()).abs() < EPS);
    assert!((top_rect.size.height - allotment_before.size.height / 2.0).abs() < EPS);
    assert!(!rects_overlap(&top_rect, &outer_rect, EPS));
}

#[test]
fn no_two_canvases_overlap() {
    let (mut tree, root) = tree(6.0, 4.0);
    let top = tree.attach(root, Side::Top, TenonOptions::sized(0.3)).unwrap();
    tree.attach(root, Side::Top, TenonOptions::sized(0.5)).unwrap();
    let left = tree.attach(root, Side::Left, TenonOptions::sized(0.2)).unwrap();
    tree.attach(left, Side::Bottom, TenonOptions::sized(0.4)).unwrap();
    tree.attach(top, Side::Right, TenonOptions::sized(0.3)).unwrap();
    tree.attach(root, Side::Right, TenonOptions::sized(0.1)).unwrap();
    tree.attach(root, Side::Bottom, TenonOptions::sized(0.2)).unwrap();

    let rects: Vec<FigureRect> = tree.figure().all_axes().map(|(_, a)| a.rect()).collect();
    assert_eq!(rects.len(), tree.len());
    for (i, a) in rects.iter().enumerate() {
        assert!(a.min_x() >= 0.1 - EPS && a.max_x() <= 0.9 + EPS);
        assert!(a.min_y() >= 0.1 - EPS && a.max_y() <= 0.9 + EPS);
        for b in &rects[i + 1..] {
            assert!(!rects_overlap(a, b, EPS), "{a:?} overlaps {b:?}");
        }
    }
}

#[test]
fn titles_follow_their_side() {
    let (mut tree, root) = tree(4.0, 4.0);
    let top = tree
        .attach(root, Side::Top, TenonOptions::sized(0.3).with_title("Top"))
        .unwrap();
    let bottom = tree
        .attach(
            root,
            Side::Bottom,
            TenonOptions::sized(0.3)
                .with_title("Below")
                .with_title_side(Side::Bottom),
        )
        .unwrap();
    let left = tree
        .attach(
            root,
            Side::Left,
            TenonOptions::sized(0.3)
                .with_title("Rows")
                .with_title_side(Side::Left),
        )
        .unwrap();

    assert_eq!(tree.canvas(top).unwrap().title(), Some("Top".to_string()));
    assert!(tree.canvas(top).unwrap().texts().is_empty());

    let below = &tree.canvas(bottom).unwrap().texts()[0];
    assert_eq!((below.x, below.y), (0.5, -0.1));
    assert_eq!((below.ha, below.va), (HAlign::Center, VAlign::Top));
    assert_eq!(below.rotation, 0.0);

    let rows = &tree.canvas(left).unwrap().texts()[0];
    assert_eq!((rows.x, rows.y, rows.rotation), (-0.1, 0.5, 90.0));
    assert_eq!(rows.ha, HAlign::Right);
    assert_eq!(rows.text, "Rows");
}

#[test]
fn axis_off_hides_ticks() {
    let (mut tree, root) = tree(4.0, 4.0);
    let strip = tree
        .attach(root, Side::Top, TenonOptions::sized(0.2).with_axis_off(true))
        .unwrap();
    let canvas = tree.canvas(strip).unwrap();
    assert!(canvas.is_axis_off());
    assert!(canvas.effective_ticks(Axis::X).is_empty());
    assert!(!tree.canvas(root).unwrap().is_axis_off());
}

#[test]
fn relayout_restores_decorations_on_new_canvases() {
    let (mut tree, root) = tree(4.0, 4.0);
    {
        let canvas = tree.canvas_mut(root).unwrap();
        canvas.set_title("Main");
        canvas.set_axis_label(Axis::X, "time");
        canvas.set_limits(Axis::X, (0.0, 10.0));
        canvas.set_ticks(Axis::Y, &[0.0, 0.5, 1.0]);
        canvas.set_face_color("#eeeeee");
        canvas.set_grid(true);
    }
    let old_axes = tree.node(root).unwrap().axes().unwrap();

    tree.attach(root, Side::Right, TenonOptions::sized(0.5)).unwrap();

    let new_axes = tree.node(root).unwrap().axes().unwrap();
    assert_ne!(old_axes, new_axes);
    assert!(tree.figure().axes(old_axes).is_none());
    let canvas = tree.canvas(root).unwrap();
    assert_eq!(canvas.title(), Some("Main".to_string()));
    assert_eq!(canvas.axis_label(Axis::X), Some("time".to_string()));
    assert_eq!(canvas.limits(Axis::X), Some((0.0, 10.0)));
    assert_eq!(canvas.ticks(Axis::Y), Some(vec![0.0, 0.5, 1.0]));
    assert_eq!(canvas.face_color(), Some("#eeeeee".to_string()));
    assert!(canvas.is_grid_visible());
    // Untouched axes keep following the data.
    assert_eq!(canvas.autoscaled(Axis::Y), Some(true));
}

#[test]
fn drawn_artists_do_not_survive_a_relayout() {
    let (mut tree, root) = tree(4.0, 4.0);
    tree.canvas_mut(root)
        .unwrap()
        .plot(&[0.0, 1.0], &[0.0, 1.0], &ArtistStyle::labeled("a"));
    tree.attach(root, Side::Top, TenonOptions::sized(0.2)).unwrap();
    assert!(tree.canvas(root).unwrap().artists().is_empty());
}

#[test]
fn new_tenon_takes_the_hosts_explicit_range() {
    let (mut tree, root) = tree(4.0, 4.0);
    tree.canvas_mut(root)
        .unwrap()
        .set_limits(Axis::X, (-3.0, 3.0));

    let top = tree.attach(root, Side::Top, TenonOptions::sized(0.3)).unwrap();
    let right = tree.attach(root, Side::Right, TenonOptions::sized(0.3)).unwrap();
    let plain = tree
        .attach(
            root,
            Side::Bottom,
            TenonOptions::sized(0.3).with_auto_align(false),
        )
        .unwrap();

    assert_eq!(tree.canvas(top).unwrap().limits(Axis::X), Some((-3.0, 3.0)));
    assert_eq!(tree.canvas(right).unwrap().autoscaled(Axis::Y), Some(true));
    assert_eq!(tree.canvas(plain).unwrap().autoscaled(Axis::X), Some(true));
}

#[test]
fn deferred_tree_renders_on_first_canvas_access() {
    let assembly = create_memory_root(RootOptions {
        size: (4.0, 4.0),
        auto_render: false,
        ..Default::default()
    })
    .unwrap();
    let (mut tree, root) = (assembly.tree, assembly.root);
    let top = tree.attach(root, Side::Top, TenonOptions::sized(0.5)).unwrap();
    assert!(!tree.is_rendered());
    assert!(tree.canvas(top).is_none());
    assert_eq!(tree.figure().axes_count(), 0);

    tree.canvas_mut(top).unwrap();
    assert!(tree.is_rendered());
    assert_eq!(tree.figure().axes_count(), 2);
}

#[test]
fn render_twice_keeps_one_canvas_per_panel() {
    let (mut tree, root) = tree(4.0, 4.0);
    tree.attach(root, Side::Left, TenonOptions::sized(0.5)).unwrap();
    tree.canvas_mut(root).unwrap().set_title("kept");
    tree.render().unwrap();
    assert_eq!(tree.figure().axes_count(), 2);
    assert_eq!(
        tree.canvas(root).unwrap().title(),
        Some("kept".to_string())
    );
}

#[test]
fn align_copies_ranges_to_default_neighbours() {
    let (mut tree, root) = tree(4.0, 4.0);
    let top = tree.attach(root, Side::Top, TenonOptions::sized(0.3)).unwrap();
    let left = tree.attach(root, Side::Left, TenonOptions::sized(0.3)).unwrap();
    {
        let canvas = tree.canvas_mut(root).unwrap();
        canvas.set_limits(Axis::X, (1.0, 2.0));
        canvas.set_limits(Axis::Y, (5.0, 6.0));
    }

    tree.align(root, AxisSelect::X, None).unwrap();
    assert_eq!(tree.canvas(top).unwrap().limits(Axis::X), Some((1.0, 2.0)));
    assert_eq!(tree.canvas(left).unwrap().autoscaled(Axis::X), Some(true));

    tree.align(root, AxisSelect::Y, None).unwrap();
    assert_eq!(tree.canvas(left).unwrap().limits(Axis::Y), Some((5.0, 6.0)));
    assert_eq!(tree.canvas(top).unwrap().autoscaled(Axis::Y), Some(true));
}

#[test]
fn align_with_explicit_targets() {
    let (mut tree, root) = tree(4.0, 4.0);
    let top = tree.attach(root, Side::Top, TenonOptions::sized(0.3)).unwrap();
    let outer = tree.attach(top, Side::Top, TenonOptions::sized(0.3)).unwrap();
    tree.canvas_mut(root)
        .unwrap()
        .set_limits(Axis::Y, (0.0, 4.0));

    tree.align(root, AxisSelect::Both, Some(&[outer])).unwrap();
    let canvas = tree.canvas(outer).unwrap();
    assert_eq!(canvas.limits(Axis::Y), Some((0.0, 4.0)));
    assert_eq!(canvas.limits(Axis::X), Some((0.0, 1.0)));
}

#[test]
fn shared_axes_follow_later_changes() {
    let (mut tree, root) = tree(4.0, 4.0);
    let bottom = tree.attach(root, Side::Bottom, TenonOptions::sized(0.3)).unwrap();
    tree.share(root, AxisSelect::X, None).unwrap();

    tree.canvas_mut(bottom)
        .unwrap()
        .set_limits(Axis::X, (-8.0, 8.0));
    assert_eq!(tree.canvas(root).unwrap().limits(Axis::X), Some((-8.0, 8.0)));
    assert_eq!(tree.canvas(root).unwrap().limits(Axis::Y), Some((0.0, 1.0)));
}

#[test]
fn shared_axes_survive_a_relayout() {
    let (mut tree, root) = tree(4.0, 4.0);
    let bottom = tree.attach(root, Side::Bottom, TenonOptions::sized(0.3)).unwrap();
    tree.share(root, AxisSelect::X, None).unwrap();

    tree.attach(root, Side::Right, TenonOptions::sized(0.3)).unwrap();
    tree.canvas_mut(bottom)
        .unwrap()
        .set_limits(Axis::X, (2.0, 4.0));
    assert_eq!(tree.canvas(root).unwrap().limits(Axis::X), Some((2.0, 4.0)));
}

#[test]
fn panel_legend_is_dropped_with_its_artists() {
    let (mut tree, root) = tree(4.0, 4.0);
    tree.canvas_mut(root)
        .unwrap()
        .plot(&[0.0, 1.0], &[0.0, 1.0], &ArtistStyle::labeled("a"));
    tree.create_legend(LegendMode::Local, &LegendRequest::default())
        .unwrap();
    assert_eq!(tree.canvas(root).unwrap().has_legend(), Some(true));

    tree.attach(root, Side::Top, TenonOptions::sized(0.2)).unwrap();
    assert_eq!(tree.canvas(root).unwrap().has_legend(), Some(false));
}
