use roxmltree::{Document, Node};
use sunmao_core::canvas::ArtistStyle;
use sunmao_core::{
    Canvas, LegendMode, LegendRequest, MemoryFigure, MortiseId, PanelTree, RootOptions, Side,
    TenonOptions, create_memory_root,
};
use sunmao_render::{Error, FigureLayout, SvgRenderOptions, render_svg, render_tree_svg};

fn tree(width: f64, height: f64) -> (PanelTree<MemoryFigure>, MortiseId) {
    let assembly = create_memory_root(RootOptions::default().with_size(width, height)).unwrap();
    (assembly.tree, assembly.root)
}

fn svg(tree: &PanelTree<MemoryFigure>) -> String {
    render_svg(tree.figure(), &SvgRenderOptions::default()).unwrap()
}

fn with_class<'a, 'i>(doc: &'a Document<'i>, class: &str) -> Vec<Node<'a, 'i>> {
    doc.descendants()
        .filter(|n| n.attribute("class") == Some(class))
        .collect()
}

fn view_box(doc: &Document<'_>) -> Vec<f64> {
    doc.root_element()
        .attribute("viewBox")
        .unwrap()
        .split_whitespace()
        .map(|v| v.parse().unwrap())
        .collect()
}

#[test]
fn every_canvas_becomes_a_panel_group() {
    let (mut tree, root) = tree(4.0, 3.0);
    tree.attach(root, Side::Top, TenonOptions::sized(0.3)).unwrap();
    tree.attach(root, Side::Right, TenonOptions::sized(0.3)).unwrap();

    let text = svg(&tree);
    let doc = Document::parse(&text).unwrap();
    let panels = with_class(&doc, "panel");
    assert_eq!(panels.len(), 3);
    assert!(panels.iter().all(|p| p.tag_name().name() == "g"));
    assert_eq!(with_class(&doc, "spine").len(), 3);
}

#[test]
fn view_box_is_the_padded_figure_without_outside_legends() {
    let (tree, _) = tree(4.0, 3.0);
    let text = svg(&tree);
    let doc = Document::parse(&text).unwrap();
    assert_eq!(view_box(&doc), vec![-8.0, -8.0, 416.0, 316.0]);
}

#[test]
fn dpi_scales_the_pixel_frame() {
    let (tree, _) = tree(4.0, 3.0);
    let options = SvgRenderOptions {
        dpi: 50.0,
        viewbox_padding: 0.0,
        ..Default::default()
    };
    let text = render_svg(tree.figure(), &options).unwrap();
    let doc = Document::parse(&text).unwrap();
    assert_eq!(view_box(&doc), vec![0.0, 0.0, 200.0, 150.0]);
    // The root canvas sits in the [0.1, 0.1, 0.8, 0.8] inset.
    let face = with_class(&doc, "face")[0];
    assert_eq!(face.attribute("x"), Some("20"));
    assert_eq!(face.attribute("y"), Some("15"));
    assert_eq!(face.attribute("width"), Some("160"));
    assert_eq!(face.attribute("height"), Some("120"));
}

#[test]
fn non_positive_dpi_is_rejected() {
    let (tree, _) = tree(4.0, 3.0);
    let options = SvgRenderOptions {
        dpi: 0.0,
        ..Default::default()
    };
    let err = render_svg(tree.figure(), &options).unwrap_err();
    assert!(matches!(err, Error::InvalidOptions { .. }));
}

#[test]
fn axis_off_panels_have_no_spines_or_ticks() {
    let assembly = create_memory_root(RootOptions {
        axis_off: true,
        ..Default::default()
    })
    .unwrap();
    let (mut tree, root) = (assembly.tree, assembly.root);
    tree.attach(root, Side::Left, TenonOptions::sized(0.2)).unwrap();

    let text = svg(&tree);
    let doc = Document::parse(&text).unwrap();
    assert_eq!(with_class(&doc, "panel").len(), 2);
    assert_eq!(with_class(&doc, "spine").len(), 1);
    assert_eq!(with_class(&doc, "ticks").len(), 1);
}

#[test]
fn titles_are_escaped() {
    let (mut tree, root) = tree(4.0, 3.0);
    tree.attach(
        root,
        Side::Top,
        TenonOptions::sized(0.3).with_title("a < b & c"),
    )
    .unwrap();
    let text = svg(&tree);
    assert!(text.contains("a &lt; b &amp; c"));
    let doc = Document::parse(&text).unwrap();
    let titles: Vec<_> = with_class(&doc, "title")
        .into_iter()
        .filter_map(|n| n.text())
        .collect();
    assert_eq!(titles, vec!["a < b & c"]);
}

#[test]
fn side_titles_are_rotated_text() {
    let (mut tree, root) = tree(4.0, 3.0);
    tree.attach(
        root,
        Side::Left,
        TenonOptions::sized(0.3)
            .with_title("depth")
            .with_title_side(Side::Left),
    )
    .unwrap();
    let text = svg(&tree);
    let doc = Document::parse(&text).unwrap();
    let label = with_class(&doc, "label")
        .into_iter()
        .find(|n| n.text() == Some("depth"))
        .unwrap();
    assert!(label.attribute("transform").unwrap().starts_with("rotate(-90 "));
    assert_eq!(label.attribute("text-anchor"), Some("end"));
}

#[test]
fn artists_are_drawn_inside_their_clip() {
    let (mut tree, root) = tree(4.0, 3.0);
    let canvas = tree.canvas_mut(root).unwrap();
    canvas.plot(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0], &ArtistStyle::labeled("line"));
    canvas.scatter(
        &[0.0, 1.0, f64::NAN],
        &[1.0, 0.0, 1.0],
        &ArtistStyle::default().with_color("#123456"),
    );
    canvas.image(&[vec![0.0, 1.0], vec![2.0, 3.0]], &ArtistStyle::default());

    let text = svg(&tree);
    let doc = Document::parse(&text).unwrap();
    let line = with_class(&doc, "line")[0];
    assert_eq!(line.attribute("stroke"), Some("#1f77b4"));
    assert_eq!(line.attribute("points").unwrap().split(' ').count(), 3);

    let markers = with_class(&doc, "marker");
    assert_eq!(markers.len(), 2);
    assert!(markers.iter().all(|m| m.attribute("fill") == Some("#123456")));

    let cells = with_class(&doc, "cell");
    assert_eq!(cells.len(), 4);
    assert_eq!(cells[0].attribute("fill"), Some("#440154"));
    assert_eq!(cells[3].attribute("fill"), Some("#fde725"));

    let group = with_class(&doc, "artists")[0];
    assert!(group.attribute("clip-path").unwrap().starts_with("url(#clip-axes-"));
}

#[test]
fn local_legends_stay_inside_their_panel() {
    let (mut tree, root) = tree(4.0, 3.0);
    let canvas = tree.canvas_mut(root).unwrap();
    canvas.plot(&[0.0, 1.0], &[0.0, 1.0], &ArtistStyle::labeled("up"));
    canvas.plot(&[0.0, 1.0], &[1.0, 0.0], &ArtistStyle::labeled("down"));
    tree.create_legend(LegendMode::Local, &LegendRequest::default())
        .unwrap();

    let text = svg(&tree);
    let doc = Document::parse(&text).unwrap();
    let legend = with_class(&doc, "axes-legend")[0];
    assert_eq!(legend.parent().unwrap().attribute("class"), Some("panel"));
    let labels: Vec<_> = legend
        .descendants()
        .filter(|n| n.attribute("class") == Some("legend-label"))
        .filter_map(|n| n.text())
        .collect();
    assert_eq!(labels, vec!["up", "down"]);
    assert_eq!(view_box(&doc), vec![-8.0, -8.0, 416.0, 316.0]);
}

#[test]
fn legend_blocks_outside_the_figure_widen_the_view_box() {
    let (mut tree, root) = tree(4.0, 3.0);
    let right = tree
        .attach(root, Side::Right, TenonOptions::sized(0.3).with_title("Side"))
        .unwrap();
    for (id, label) in [(root, "a"), (right, "b")] {
        tree.canvas_mut(id)
            .unwrap()
            .plot(&[0.0, 1.0], &[0.0, 1.0], &ArtistStyle::labeled(label));
    }
    tree.place_legend_blocks(None, None).unwrap();

    let text = svg(&tree);
    let doc = Document::parse(&text).unwrap();
    assert_eq!(with_class(&doc, "figure-legend").len(), 2);
    let vb = view_box(&doc);
    assert_eq!(vb[0], -8.0);
    assert!(vb[2] > 416.0);
    let titles: Vec<_> = with_class(&doc, "legend-title")
        .into_iter()
        .filter_map(|n| n.text())
        .collect();
    assert_eq!(titles, vec!["Side"]);
}

#[test]
fn render_tree_svg_lays_out_a_deferred_tree() {
    let mut tree = create_memory_root(RootOptions {
        auto_render: false,
        ..Default::default()
    })
    .unwrap()
    .tree;
    let root = tree.root();
    tree.attach(root, Side::Bottom, TenonOptions::sized(0.5)).unwrap();
    assert!(!tree.is_rendered());

    let text = render_tree_svg(&mut tree, &SvgRenderOptions::default()).unwrap();
    assert!(tree.is_rendered());
    let doc = Document::parse(&text).unwrap();
    assert_eq!(with_class(&doc, "panel").len(), 2);

    let layout = FigureLayout::from_tree(&tree).unwrap();
    assert_eq!(layout.panels.len(), 2);
    assert_eq!(layout.panels[1].side, Some(Side::Bottom));
}
