use crate::{Error, Result};
use std::fmt::Write as _;
use sunmao_core::canvas::memory::{Artist, ArtistKind};
use sunmao_core::canvas::{HAlign, LegendEntry, TextSpec, VAlign};
use sunmao_core::geom::FigureRect;
use sunmao_core::legend::LegendFrame;
use sunmao_core::{
    ArtistId, Axis, AxesId, Canvas, Figure, LegendLocation, MemoryAxes, MemoryFigure, PanelTree,
};
use tracing::debug;

/// Default color cycle (matplotlib `tab10`), indexed by artist id.
const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];
const IMAGE_LOW: [u8; 3] = [0x44, 0x01, 0x54];
const IMAGE_HIGH: [u8; 3] = [0xfd, 0xe7, 0x25];
const GRID_COLOR: &str = "#b0b0b0";

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Pixels per figure inch.
    pub dpi: f64,
    /// Adds extra space around the computed viewBox.
    pub viewbox_padding: f64,
    /// Figure background; `None` leaves it transparent.
    pub background: Option<String>,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            dpi: 100.0,
            viewbox_padding: 8.0,
            background: Some("white".to_string()),
        }
    }
}

impl SvgRenderOptions {
    fn validate(&self) -> Result<()> {
        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(Error::InvalidOptions {
                message: format!("dpi must be a finite, positive number (got {})", self.dpi),
            });
        }
        if !self.viewbox_padding.is_finite() {
            return Err(Error::InvalidOptions {
                message: "viewbox_padding must be finite".to_string(),
            });
        }
        Ok(())
    }
}

/// Pixel rectangle, y growing downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PxRect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl PxRect {
    fn right(&self) -> f64 {
        self.x + self.width
    }

    fn bottom(&self) -> f64 {
        self.y + self.height
    }

    fn union(&self, other: &PxRect) -> PxRect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        PxRect {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }
}

/// Figure fractions to pixels: `(x, y)` lands on `(x * width, (1 - y) * height)`.
#[derive(Debug, Clone, Copy)]
struct Frame {
    width: f64,
    height: f64,
}

impl Frame {
    fn point(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.width, (1.0 - y) * self.height)
    }

    fn rect(&self, r: &FigureRect) -> PxRect {
        let (x, y) = self.point(r.min_x(), r.max_y());
        PxRect {
            x,
            y,
            width: r.width() * self.width,
            height: r.height() * self.height,
        }
    }
}

/// Text and legend metrics, all proportional to `dpi / 100`.
#[derive(Debug, Clone, Copy)]
struct Metrics {
    scale: f64,
    font: f64,
    row: f64,
    char_width: f64,
    swatch: f64,
    tick: f64,
}

impl Metrics {
    fn new(dpi: f64) -> Self {
        let scale = dpi / 100.0;
        let font = 10.0 * scale;
        Self {
            scale,
            font,
            row: 1.6 * font,
            char_width: 0.6 * font,
            swatch: 18.0 * scale,
            tick: 3.5 * scale,
        }
    }

    fn legend_pad(&self) -> f64 {
        0.5 * self.font
    }
}

/// A laid-out legend box, axes or figure level.
#[derive(Debug, Clone)]
struct LegendBox<'a> {
    rect: PxRect,
    entries: &'a [LegendEntry],
    rows: usize,
    col_width: f64,
    title: Option<&'a str>,
    frame: LegendFrame,
}

impl<'a> LegendBox<'a> {
    fn new(
        m: &Metrics,
        entries: &'a [LegendEntry],
        columns: usize,
        title: Option<&'a str>,
        frame: LegendFrame,
    ) -> Self {
        let cols = columns.clamp(1, entries.len().max(1));
        let rows = entries.len().div_ceil(cols);
        let longest = entries
            .iter()
            .map(|e| e.label.chars().count())
            .max()
            .unwrap_or(0);
        let col_width = m.swatch + 0.4 * m.font + longest as f64 * m.char_width;
        let title_width = title.map_or(0.0, |t| t.chars().count() as f64 * m.char_width);
        let body = cols as f64 * col_width + (cols - 1) as f64 * m.font;
        let width = 2.0 * m.legend_pad() + body.max(title_width);
        let height = 2.0 * m.legend_pad()
            + rows as f64 * m.row
            + if title.is_some() { m.row } else { 0.0 };
        Self {
            rect: PxRect {
                x: 0.0,
                y: 0.0,
                width,
                height,
            },
            entries,
            rows,
            col_width,
            title,
            frame,
        }
    }

    /// Pins the box to `location` inside `reference`, `inset` pixels away from its edges.
    fn placed(mut self, reference: PxRect, location: LegendLocation, inset: f64) -> Self {
        self.rect = place_box(reference, location, inset, self.rect.width, self.rect.height);
        self
    }
}

fn place_box(
    reference: PxRect,
    location: LegendLocation,
    inset: f64,
    width: f64,
    height: f64,
) -> PxRect {
    let (fx, fy) = location.box_fractions();
    let ref_x = reference.x + inset + fx * (reference.width - 2.0 * inset);
    let ref_y = reference.y + inset + (1.0 - fy) * (reference.height - 2.0 * inset);
    PxRect {
        x: ref_x - fx * width,
        y: ref_y - (1.0 - fy) * height,
        width,
        height,
    }
}

/// Maps data coordinates of one canvas into its pixel rectangle.
#[derive(Debug, Clone, Copy)]
struct DataMap {
    px: PxRect,
    x: (f64, f64),
    y: (f64, f64),
}

impl DataMap {
    fn new(axes: &MemoryAxes, px: PxRect) -> Self {
        Self {
            px,
            x: axes.view(Axis::X),
            y: axes.view(Axis::Y),
        }
    }

    fn map(&self, dx: f64, dy: f64) -> (f64, f64) {
        (
            self.px.x + fraction(dx, self.x) * self.px.width,
            self.px.bottom() - fraction(dy, self.y) * self.px.height,
        )
    }
}

fn fraction(v: f64, (lo, hi): (f64, f64)) -> f64 {
    let span = hi - lo;
    if span.abs() < f64::EPSILON {
        0.5
    } else {
        (v - lo) / span
    }
}

fn in_view(v: f64, (lo, hi): (f64, f64)) -> bool {
    v >= lo.min(hi) - 1e-9 && v <= lo.max(hi) + 1e-9
}

/// Renders a rendered tree, laying it out first if that has not happened yet.
pub fn render_tree_svg(
    tree: &mut PanelTree<MemoryFigure>,
    options: &SvgRenderOptions,
) -> Result<String> {
    tree.ensure_rendered()?;
    render_svg(tree.figure(), options)
}

pub fn render_svg(figure: &MemoryFigure, options: &SvgRenderOptions) -> Result<String> {
    options.validate()?;
    let (fig_w, fig_h) = figure.size();
    let frame = Frame {
        width: fig_w * options.dpi,
        height: fig_h * options.dpi,
    };
    let m = Metrics::new(options.dpi);
    let figure_box = PxRect {
        x: 0.0,
        y: 0.0,
        width: frame.width,
        height: frame.height,
    };

    let mut axes_legends: Vec<(AxesId, LegendBox<'_>)> = Vec::new();
    for (id, axes) in figure.all_axes() {
        let Some(spec) = axes.native_legend() else {
            continue;
        };
        if spec.entries.is_empty() {
            continue;
        }
        let panel = frame.rect(&axes.rect());
        let legend = LegendBox::new(&m, &spec.entries, spec.columns, None, LegendFrame::default())
            .placed(panel, spec.location, m.legend_pad());
        axes_legends.push((id, legend));
    }

    let mut figure_legends = Vec::new();
    for (_, spec) in figure.legends() {
        if spec.entries.is_empty() {
            continue;
        }
        let legend = LegendBox::new(
            &m,
            &spec.entries,
            spec.columns,
            spec.title.as_deref(),
            spec.frame.clone(),
        );
        let legend = match spec.anchor {
            Some(anchor) => {
                let (x, y) = frame.point(anchor.x, anchor.y);
                let at = PxRect {
                    x,
                    y,
                    width: 0.0,
                    height: 0.0,
                };
                legend.placed(at, spec.location, 0.0)
            }
            None => legend.placed(figure_box, spec.location, m.legend_pad()),
        };
        figure_legends.push(legend);
    }

    let bounds = axes_legends
        .iter()
        .map(|(_, l)| &l.rect)
        .chain(figure_legends.iter().map(|l| &l.rect))
        .fold(figure_box, |acc, r| acc.union(r));
    let pad = options.viewbox_padding.max(0.0);
    let vb_min_x = bounds.x - pad;
    let vb_min_y = bounds.y - pad;
    let vb_w = (bounds.width + pad * 2.0).max(1.0);
    let vb_h = (bounds.height + pad * 2.0).max(1.0);

    let mut out = String::new();
    let _ = writeln!(
        &mut out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{} {} {} {}">"#,
        fmt(vb_w),
        fmt(vb_h),
        fmt(vb_min_x),
        fmt(vb_min_y),
        fmt(vb_w),
        fmt(vb_h)
    );
    let _ = writeln!(
        &mut out,
        "<style>\ntext {{ font-family: DejaVu Sans, Arial, sans-serif; font-size: {}px; fill: #000000; }}\n</style>",
        fmt(m.font)
    );
    if let Some(bg) = &options.background {
        let _ = writeln!(
            &mut out,
            r#"<rect class="background" x="{}" y="{}" width="{}" height="{}" fill="{}" />"#,
            fmt(vb_min_x),
            fmt(vb_min_y),
            fmt(vb_w),
            fmt(vb_h),
            escape_xml(bg)
        );
    }

    for (id, axes) in figure.all_axes() {
        let legend = axes_legends
            .iter()
            .find(|(owner, _)| *owner == id)
            .map(|(_, l)| l);
        render_axes(&mut out, figure, id, axes, legend, frame, &m);
    }

    for legend in &figure_legends {
        render_legend(&mut out, figure, legend, "figure-legend", &m);
    }

    out.push_str("</svg>\n");
    debug!(
        panels = figure.axes_count(),
        figure_legends = figure_legends.len(),
        "rendered svg"
    );
    Ok(out)
}

fn render_axes(
    out: &mut String,
    figure: &MemoryFigure,
    id: AxesId,
    axes: &MemoryAxes,
    legend: Option<&LegendBox<'_>>,
    frame: Frame,
    m: &Metrics,
) {
    let px = frame.rect(&axes.rect());
    let map = DataMap::new(axes, px);
    let _ = write!(out, r#"<g class="panel" id="{id}">"#);
    let face = axes.face_color().unwrap_or_else(|| "white".to_string());
    let _ = write!(
        out,
        r#"<rect class="face" x="{}" y="{}" width="{}" height="{}" fill="{}" />"#,
        fmt(px.x),
        fmt(px.y),
        fmt(px.width),
        fmt(px.height),
        escape_xml(&face)
    );

    if axes.is_grid_visible() && !axes.is_axis_off() {
        render_grid(out, axes, &map, m);
    }

    let _ = write!(
        out,
        r#"<clipPath id="clip-{id}"><rect x="{}" y="{}" width="{}" height="{}" /></clipPath>"#,
        fmt(px.x),
        fmt(px.y),
        fmt(px.width),
        fmt(px.height)
    );
    let _ = write!(out, r#"<g class="artists" clip-path="url(#clip-{id})">"#);
    for artist in axes.artists() {
        render_artist(out, artist, &map, m);
    }
    out.push_str("</g>");

    if !axes.is_axis_off() {
        let _ = write!(
            out,
            r##"<rect class="spine" x="{}" y="{}" width="{}" height="{}" fill="none" stroke="#000000" stroke-width="{}" />"##,
            fmt(px.x),
            fmt(px.y),
            fmt(px.width),
            fmt(px.height),
            fmt(0.8 * m.scale)
        );
        render_ticks(out, axes, &map, m);
    }

    render_axis_labels(out, axes, px, m);

    if let Some(title) = axes.title().filter(|t| !t.is_empty()) {
        let _ = write!(
            out,
            r#"<text class="title" x="{}" y="{}" text-anchor="middle" font-size="{}">{}</text>"#,
            fmt(px.x + px.width / 2.0),
            fmt(px.y - 0.6 * m.font),
            fmt(1.2 * m.font),
            escape_xml(&title)
        );
    }

    for spec in axes.texts() {
        render_text(out, spec, px);
    }

    if let Some(legend) = legend {
        render_legend(out, figure, legend, "axes-legend", m);
    }
    out.push_str("</g>\n");
}

fn render_grid(out: &mut String, axes: &MemoryAxes, map: &DataMap, m: &Metrics) {
    out.push_str(r#"<g class="grid">"#);
    for t in axes.effective_ticks(Axis::X) {
        if !in_view(t, map.x) {
            continue;
        }
        let (x, _) = map.map(t, map.y.0);
        let _ = write!(
            out,
            r#"<line x1="{x}" y1="{}" x2="{x}" y2="{}" stroke="{GRID_COLOR}" stroke-width="{}" />"#,
            fmt(map.px.y),
            fmt(map.px.bottom()),
            fmt(0.5 * m.scale),
            x = fmt(x)
        );
    }
    for t in axes.effective_ticks(Axis::Y) {
        if !in_view(t, map.y) {
            continue;
        }
        let (_, y) = map.map(map.x.0, t);
        let _ = write!(
            out,
            r#"<line x1="{}" y1="{y}" x2="{}" y2="{y}" stroke="{GRID_COLOR}" stroke-width="{}" />"#,
            fmt(map.px.x),
            fmt(map.px.right()),
            fmt(0.5 * m.scale),
            y = fmt(y)
        );
    }
    out.push_str("</g>");
}

fn tick_label(axes: &MemoryAxes, axis: Axis, index: usize, value: f64) -> String {
    axes.tick_labels(axis)
        .and_then(|labels| labels.get(index))
        .cloned()
        .unwrap_or_else(|| fmt_tick(value))
}

fn render_ticks(out: &mut String, axes: &MemoryAxes, map: &DataMap, m: &Metrics) {
    let stroke = fmt(0.8 * m.scale);
    out.push_str(r#"<g class="ticks">"#);
    let bottom = map.px.bottom();
    for (i, t) in axes.effective_ticks(Axis::X).into_iter().enumerate() {
        if !in_view(t, map.x) {
            continue;
        }
        let (x, _) = map.map(t, map.y.0);
        let _ = write!(
            out,
            r##"<line x1="{x}" y1="{}" x2="{x}" y2="{}" stroke="#000000" stroke-width="{stroke}" />"##,
            fmt(bottom),
            fmt(bottom + m.tick),
            x = fmt(x)
        );
        let _ = write!(
            out,
            r#"<text x="{}" y="{}" text-anchor="middle" dominant-baseline="hanging">{}</text>"#,
            fmt(x),
            fmt(bottom + m.tick + 0.3 * m.font),
            escape_xml(&tick_label(axes, Axis::X, i, t))
        );
    }
    let left = map.px.x;
    for (i, t) in axes.effective_ticks(Axis::Y).into_iter().enumerate() {
        if !in_view(t, map.y) {
            continue;
        }
        let (_, y) = map.map(map.x.0, t);
        let _ = write!(
            out,
            r##"<line x1="{}" y1="{y}" x2="{}" y2="{y}" stroke="#000000" stroke-width="{stroke}" />"##,
            fmt(left - m.tick),
            fmt(left),
            y = fmt(y)
        );
        let _ = write!(
            out,
            r#"<text x="{}" y="{}" text-anchor="end" dominant-baseline="middle">{}</text>"#,
            fmt(left - m.tick - 0.3 * m.font),
            fmt(y),
            escape_xml(&tick_label(axes, Axis::Y, i, t))
        );
    }
    out.push_str("</g>");
}

fn render_axis_labels(out: &mut String, axes: &MemoryAxes, px: PxRect, m: &Metrics) {
    if let Some(label) = axes.axis_label(Axis::X).filter(|l| !l.is_empty()) {
        let _ = write!(
            out,
            r#"<text class="xlabel" x="{}" y="{}" text-anchor="middle" dominant-baseline="hanging">{}</text>"#,
            fmt(px.x + px.width / 2.0),
            fmt(px.bottom() + m.tick + 1.6 * m.font),
            escape_xml(&label)
        );
    }
    if let Some(label) = axes.axis_label(Axis::Y).filter(|l| !l.is_empty()) {
        let x = px.x - m.tick - 0.3 * m.font - 5.0 * m.char_width;
        let y = px.y + px.height / 2.0;
        let _ = write!(
            out,
            r#"<text class="ylabel" x="{x}" y="{y}" text-anchor="middle" transform="rotate(-90 {x} {y})">{}</text>"#,
            escape_xml(&label),
            x = fmt(x),
            y = fmt(y)
        );
    }
}

fn render_text(out: &mut String, spec: &TextSpec, px: PxRect) {
    let x = px.x + spec.x * px.width;
    let y = px.y + (1.0 - spec.y) * px.height;
    let anchor = match spec.ha {
        HAlign::Left => "start",
        HAlign::Center => "middle",
        HAlign::Right => "end",
    };
    let baseline = match spec.va {
        VAlign::Top => "hanging",
        VAlign::Center => "middle",
        VAlign::Bottom => "alphabetic",
    };
    let _ = write!(
        out,
        r#"<text class="label" x="{}" y="{}" text-anchor="{anchor}" dominant-baseline="{baseline}""#,
        fmt(x),
        fmt(y)
    );
    // Counter-clockwise degrees; SVG rotates clockwise.
    if spec.rotation != 0.0 {
        let _ = write!(
            out,
            r#" transform="rotate({} {} {})""#,
            fmt(-spec.rotation),
            fmt(x),
            fmt(y)
        );
    }
    let _ = write!(out, ">{}</text>", escape_xml(&spec.text));
}

fn artist_color(id: ArtistId, artist: Option<&Artist>) -> String {
    artist
        .and_then(|a| a.style.color.clone())
        .unwrap_or_else(|| PALETTE[id.0 % PALETTE.len()].to_string())
}

fn render_artist(out: &mut String, artist: &Artist, map: &DataMap, m: &Metrics) {
    let color = escape_xml(&artist_color(artist.id, Some(artist)));
    match &artist.kind {
        ArtistKind::Line { xs, ys } => {
            let points: Vec<(f64, f64)> = xs
                .iter()
                .zip(ys)
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .map(|(x, y)| map.map(*x, *y))
                .collect();
            if points.len() < 2 {
                return;
            }
            out.push_str(r#"<polyline class="line" points=""#);
            for (idx, (x, y)) in points.iter().enumerate() {
                if idx > 0 {
                    out.push(' ');
                }
                let _ = write!(out, "{},{}", fmt(*x), fmt(*y));
            }
            let width = artist.style.line_width.unwrap_or(1.5) * m.scale;
            let _ = write!(
                out,
                r#"" fill="none" stroke="{color}" stroke-width="{}" />"#,
                fmt(width)
            );
        }
        ArtistKind::Scatter { xs, ys } => {
            let r = artist.style.marker_size.unwrap_or(3.0) * m.scale;
            for (x, y) in xs.iter().zip(ys) {
                if !(x.is_finite() && y.is_finite()) {
                    continue;
                }
                let (cx, cy) = map.map(*x, *y);
                let _ = write!(
                    out,
                    r#"<circle class="marker" cx="{}" cy="{}" r="{}" fill="{color}" />"#,
                    fmt(cx),
                    fmt(cy),
                    fmt(r)
                );
            }
        }
        ArtistKind::Image { rows } => render_image(out, rows, map),
    }
}

fn render_image(out: &mut String, rows: &[Vec<f64>], map: &DataMap) {
    let finite = rows.iter().flatten().copied().filter(|v| v.is_finite());
    let (lo, hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let n_rows = rows.len();
    out.push_str(r#"<g class="image">"#);
    for (r, row) in rows.iter().enumerate() {
        // First row on top.
        let cy = (n_rows - 1 - r) as f64;
        for (c, value) in row.iter().enumerate() {
            if !value.is_finite() {
                continue;
            }
            let cx = c as f64;
            let (x0, y0) = map.map(cx - 0.5, cy + 0.5);
            let (x1, y1) = map.map(cx + 0.5, cy - 0.5);
            let t = if hi > lo { (value - lo) / (hi - lo) } else { 0.5 };
            let _ = write!(
                out,
                r#"<rect class="cell" x="{}" y="{}" width="{}" height="{}" fill="{}" />"#,
                fmt(x0.min(x1)),
                fmt(y0.min(y1)),
                fmt((x1 - x0).abs()),
                fmt((y1 - y0).abs()),
                gradient(t)
            );
        }
    }
    out.push_str("</g>");
}

fn gradient(t: f64) -> String {
    let t = t.clamp(0.0, 1.0);
    let channel = |i: usize| {
        let a = f64::from(IMAGE_LOW[i]);
        let b = f64::from(IMAGE_HIGH[i]);
        (a + (b - a) * t).round() as u8
    };
    format!("#{:02x}{:02x}{:02x}", channel(0), channel(1), channel(2))
}

fn render_legend(
    out: &mut String,
    figure: &MemoryFigure,
    legend: &LegendBox<'_>,
    class: &str,
    m: &Metrics,
) {
    let r = legend.rect;
    let radius = if legend.frame.rounded { 3.0 * m.scale } else { 0.0 };
    let _ = write!(out, r#"<g class="{class}">"#);
    if legend.frame.shadow {
        let _ = write!(
            out,
            r##"<rect class="shadow" x="{}" y="{}" width="{}" height="{}" rx="{}" fill="#000000" fill-opacity="0.2" />"##,
            fmt(r.x + 2.0 * m.scale),
            fmt(r.y + 2.0 * m.scale),
            fmt(r.width),
            fmt(r.height),
            fmt(radius)
        );
    }
    if legend.frame.frame_on {
        let _ = write!(
            out,
            r#"<rect class="frame" x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}" stroke="{}" stroke-width="{}" />"#,
            fmt(r.x),
            fmt(r.y),
            fmt(r.width),
            fmt(r.height),
            fmt(radius),
            escape_xml(&legend.frame.face_color),
            escape_xml(&legend.frame.edge_color),
            fmt(0.8 * m.scale)
        );
    }

    let pad = m.legend_pad();
    let mut top = r.y + pad;
    if let Some(title) = legend.title {
        let _ = write!(
            out,
            r#"<text class="legend-title" x="{}" y="{}" text-anchor="middle" dominant-baseline="middle" font-weight="bold">{}</text>"#,
            fmt(r.x + r.width / 2.0),
            fmt(top + m.row / 2.0),
            escape_xml(title)
        );
        top += m.row;
    }

    // Column-major, like matplotlib's `ncol`.
    for (i, entry) in legend.entries.iter().enumerate() {
        let col = i / legend.rows;
        let row = i % legend.rows;
        let x = r.x + pad + col as f64 * (legend.col_width + m.font);
        let y = top + row as f64 * m.row + m.row / 2.0;
        let artist = figure.find_artist(entry.artist);
        render_swatch(out, entry.artist, artist, x, y, m);
        let _ = write!(
            out,
            r#"<text class="legend-label" x="{}" y="{}" dominant-baseline="middle">{}</text>"#,
            fmt(x + m.swatch + 0.4 * m.font),
            fmt(y),
            escape_xml(&entry.label)
        );
    }
    out.push_str("</g>");
}

fn render_swatch(
    out: &mut String,
    id: ArtistId,
    artist: Option<&Artist>,
    x: f64,
    y: f64,
    m: &Metrics,
) {
    let color = escape_xml(&artist_color(id, artist));
    match artist.map(|a| &a.kind) {
        Some(ArtistKind::Line { .. }) => {
            let _ = write!(
                out,
                r#"<line class="swatch" x1="{}" y1="{y}" x2="{}" y2="{y}" stroke="{color}" stroke-width="{}" />"#,
                fmt(x),
                fmt(x + m.swatch),
                fmt(1.5 * m.scale),
                y = fmt(y)
            );
        }
        Some(ArtistKind::Scatter { .. }) => {
            let _ = write!(
                out,
                r#"<circle class="swatch" cx="{}" cy="{}" r="{}" fill="{color}" />"#,
                fmt(x + m.swatch / 2.0),
                fmt(y),
                fmt(3.0 * m.scale)
            );
        }
        Some(ArtistKind::Image { .. }) | None => {
            let side = 0.7 * m.font;
            let _ = write!(
                out,
                r#"<rect class="swatch" x="{}" y="{}" width="{}" height="{}" fill="{color}" />"#,
                fmt(x + (m.swatch - side) / 2.0),
                fmt(y - side / 2.0),
                fmt(side),
                fmt(side)
            );
        }
    }
}

fn fmt(v: f64) -> String {
    // Avoid `-0` and tiny float noise from our own calculations.
    if !v.is_finite() {
        return "0".to_string();
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    let s = v.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

fn fmt_tick(v: f64) -> String {
    fmt((v * 1000.0).round() / 1000.0)
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
