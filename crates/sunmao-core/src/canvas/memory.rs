//! In-memory figure backend.
//!
//! Records everything drawn on it, answers every introspection query, and is what the SVG
//! writer and the CLI consume. Shared axes hold the same view-range cell, so a change made
//! through either canvas is visible from both.

use super::{
    ArtistId, ArtistStyle, AxesId, AxesLegendSpec, Canvas, Figure, FigureLegendSpec, LegendEntry,
    LegendId, TextSpec,
};
use crate::geom::FigureRect;
use crate::side::Axis;
use indexmap::IndexMap;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Fraction of the data span added on each side when a view range is derived from data.
const AUTOSCALE_MARGIN: f64 = 0.05;
const AUTO_TICK_COUNT: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ArtistKind {
    Line { xs: Vec<f64>, ys: Vec<f64> },
    Scatter { xs: Vec<f64>, ys: Vec<f64> },
    Image { rows: Vec<Vec<f64>> },
}

#[derive(Debug, Clone, Serialize)]
pub struct Artist {
    pub id: ArtistId,
    pub kind: ArtistKind,
    pub style: ArtistStyle,
}

#[derive(Debug, Clone, Copy, Default)]
struct ViewRange {
    explicit: Option<(f64, f64)>,
    data: Option<(f64, f64)>,
}

impl ViewRange {
    fn include(&mut self, values: &[f64]) {
        for &v in values.iter().filter(|v| v.is_finite()) {
            self.data = Some(match self.data {
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                None => (v, v),
            });
        }
    }

    fn current(&self) -> (f64, f64) {
        if let Some(range) = self.explicit {
            return range;
        }
        match self.data {
            Some((lo, hi)) if hi > lo => {
                let pad = (hi - lo) * AUTOSCALE_MARGIN;
                (lo - pad, hi + pad)
            }
            Some((v, _)) => (v - 0.5, v + 0.5),
            None => (0.0, 1.0),
        }
    }
}

type SharedRange = Rc<RefCell<ViewRange>>;

#[derive(Debug, Clone, Default)]
struct AxisState {
    range: SharedRange,
    ticks: Option<Vec<f64>>,
    tick_labels: Option<Vec<String>>,
    label: Option<String>,
}

#[derive(Debug)]
pub struct MemoryAxes {
    rect: FigureRect,
    title: Option<String>,
    texts: Vec<TextSpec>,
    axis_off: bool,
    x: AxisState,
    y: AxisState,
    face_color: String,
    grid: bool,
    artists: Vec<Artist>,
    legend: Option<AxesLegendSpec>,
    next_artist: Rc<Cell<usize>>,
}

impl MemoryAxes {
    fn new(rect: FigureRect, next_artist: Rc<Cell<usize>>) -> Self {
        Self {
            rect,
            title: None,
            texts: Vec::new(),
            axis_off: false,
            x: AxisState::default(),
            y: AxisState::default(),
            face_color: "white".to_string(),
            grid: false,
            artists: Vec::new(),
            legend: None,
            next_artist,
        }
    }

    fn axis(&self, axis: Axis) -> &AxisState {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut AxisState {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        }
    }

    fn push_artist(&mut self, kind: ArtistKind, style: &ArtistStyle) -> ArtistId {
        let id = ArtistId(self.next_artist.get());
        self.next_artist.set(id.0 + 1);
        self.artists.push(Artist {
            id,
            kind,
            style: style.clone(),
        });
        id
    }

    pub fn rect(&self) -> FigureRect {
        self.rect
    }

    pub fn texts(&self) -> &[TextSpec] {
        &self.texts
    }

    pub fn is_axis_off(&self) -> bool {
        self.axis_off
    }

    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    pub fn artist(&self, id: ArtistId) -> Option<&Artist> {
        self.artists.iter().find(|a| a.id == id)
    }

    pub fn native_legend(&self) -> Option<&AxesLegendSpec> {
        self.legend.as_ref()
    }

    pub fn is_grid_visible(&self) -> bool {
        self.grid
    }

    pub fn view(&self, axis: Axis) -> (f64, f64) {
        self.axis(axis).range.borrow().current()
    }

    /// Explicit ticks, or evenly spaced ticks across the current view range.
    pub fn effective_ticks(&self, axis: Axis) -> Vec<f64> {
        if let Some(ticks) = &self.axis(axis).ticks {
            return ticks.clone();
        }
        let (lo, hi) = self.view(axis);
        let step = (hi - lo) / (AUTO_TICK_COUNT - 1) as f64;
        (0..AUTO_TICK_COUNT).map(|i| lo + step * i as f64).collect()
    }

    pub fn tick_labels(&self, axis: Axis) -> Option<&[String]> {
        self.axis(axis).tick_labels.as_deref()
    }
}

impl Canvas for MemoryAxes {
    fn plot(&mut self, xs: &[f64], ys: &[f64], style: &ArtistStyle) -> ArtistId {
        self.x.range.borrow_mut().include(xs);
        self.y.range.borrow_mut().include(ys);
        self.push_artist(
            ArtistKind::Line {
                xs: xs.to_vec(),
                ys: ys.to_vec(),
            },
            style,
        )
    }

    fn scatter(&mut self, xs: &[f64], ys: &[f64], style: &ArtistStyle) -> ArtistId {
        self.x.range.borrow_mut().include(xs);
        self.y.range.borrow_mut().include(ys);
        self.push_artist(
            ArtistKind::Scatter {
                xs: xs.to_vec(),
                ys: ys.to_vec(),
            },
            style,
        )
    }

    fn image(&mut self, rows: &[Vec<f64>], style: &ArtistStyle) -> ArtistId {
        let height = rows.len() as f64;
        let width = rows.iter().map(Vec::len).max().unwrap_or(0) as f64;
        // Pixel centres sit on integer coordinates, like imshow.
        self.x.range.borrow_mut().include(&[-0.5, width - 0.5]);
        self.y.range.borrow_mut().include(&[-0.5, height - 0.5]);
        self.push_artist(
            ArtistKind::Image {
                rows: rows.to_vec(),
            },
            style,
        )
    }

    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    fn text(&mut self, spec: TextSpec) {
        self.texts.push(spec);
    }

    fn set_axis_off(&mut self) {
        self.axis_off = true;
        self.x.ticks = Some(Vec::new());
        self.y.ticks = Some(Vec::new());
    }

    fn set_limits(&mut self, axis: Axis, range: (f64, f64)) {
        self.axis_mut(axis).range.borrow_mut().explicit = Some(range);
    }

    fn set_ticks(&mut self, axis: Axis, ticks: &[f64]) {
        self.axis_mut(axis).ticks = Some(ticks.to_vec());
    }

    fn set_tick_labels(&mut self, axis: Axis, labels: &[String]) {
        self.axis_mut(axis).tick_labels = Some(labels.to_vec());
    }

    fn set_axis_label(&mut self, axis: Axis, label: &str) {
        self.axis_mut(axis).label = Some(label.to_string());
    }

    fn set_face_color(&mut self, color: &str) {
        self.face_color = color.to_string();
    }

    fn set_grid(&mut self, visible: bool) {
        self.grid = visible;
    }

    fn title(&self) -> Option<String> {
        Some(self.title.clone().unwrap_or_default())
    }

    fn limits(&self, axis: Axis) -> Option<(f64, f64)> {
        Some(self.view(axis))
    }

    fn autoscaled(&self, axis: Axis) -> Option<bool> {
        Some(self.axis(axis).range.borrow().explicit.is_none())
    }

    fn ticks(&self, axis: Axis) -> Option<Vec<f64>> {
        self.axis(axis).ticks.clone()
    }

    fn axis_label(&self, axis: Axis) -> Option<String> {
        Some(self.axis(axis).label.clone().unwrap_or_default())
    }

    fn face_color(&self) -> Option<String> {
        Some(self.face_color.clone())
    }

    fn grid(&self) -> Option<bool> {
        Some(self.grid)
    }

    fn has_legend(&self) -> Option<bool> {
        Some(self.legend.is_some())
    }

    fn legend_entries(&self) -> Vec<LegendEntry> {
        self.artists
            .iter()
            .filter_map(|a| {
                let label = a.style.label.as_deref()?;
                if label.is_empty() || label.starts_with('_') {
                    return None;
                }
                Some(LegendEntry::new(a.id, label))
            })
            .collect()
    }

    fn legend(&mut self, spec: AxesLegendSpec) {
        self.legend = Some(spec);
    }

    fn remove_legend(&mut self) -> bool {
        self.legend.take().is_some()
    }
}

/// Headless [`Figure`] that keeps every canvas and legend in memory.
#[derive(Debug)]
pub struct MemoryFigure {
    width: f64,
    height: f64,
    axes: IndexMap<AxesId, MemoryAxes>,
    legends: IndexMap<LegendId, FigureLegendSpec>,
    next_axes: usize,
    next_legend: usize,
    next_artist: Rc<Cell<usize>>,
}

impl MemoryFigure {
    /// A figure of `width` x `height` absolute units (inches).
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            axes: IndexMap::new(),
            legends: IndexMap::new(),
            next_axes: 0,
            next_legend: 0,
            next_artist: Rc::new(Cell::new(0)),
        }
    }

    /// Canvases in allocation order.
    pub fn all_axes(&self) -> impl Iterator<Item = (AxesId, &MemoryAxes)> {
        self.axes.iter().map(|(id, a)| (*id, a))
    }

    pub fn axes_count(&self) -> usize {
        self.axes.len()
    }

    pub fn legends(&self) -> impl Iterator<Item = (LegendId, &FigureLegendSpec)> {
        self.legends.iter().map(|(id, l)| (*id, l))
    }

    pub fn figure_legend(&self, id: LegendId) -> Option<&FigureLegendSpec> {
        self.legends.get(&id)
    }

    /// Looks an artist up across every canvas.
    pub fn find_artist(&self, id: ArtistId) -> Option<&Artist> {
        self.axes.values().find_map(|a| a.artist(id))
    }
}

impl Figure for MemoryFigure {
    type Axes = MemoryAxes;

    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn add_axes(&mut self, rect: FigureRect) -> AxesId {
        // Ids are never reused, so a handle kept across `clear` cannot alias a new canvas.
        let id = AxesId(self.next_axes);
        self.next_axes += 1;
        self.axes
            .insert(id, MemoryAxes::new(rect, Rc::clone(&self.next_artist)));
        id
    }

    fn axes(&self, id: AxesId) -> Option<&MemoryAxes> {
        self.axes.get(&id)
    }

    fn axes_mut(&mut self, id: AxesId) -> Option<&mut MemoryAxes> {
        self.axes.get_mut(&id)
    }

    fn clear(&mut self) {
        self.axes.clear();
        self.legends.clear();
    }

    fn share_axis(&mut self, axis: Axis, leader: AxesId, follower: AxesId) -> bool {
        let Some(shared) = self.axes.get(&leader).map(|a| Rc::clone(&a.axis(axis).range)) else {
            return false;
        };
        let Some(target) = self.axes.get_mut(&follower) else {
            return false;
        };
        target.axis_mut(axis).range = shared;
        true
    }

    fn legend(&mut self, spec: FigureLegendSpec) -> LegendId {
        let id = LegendId(self.next_legend);
        self.next_legend += 1;
        self.legends.insert(id, spec);
        id
    }

    fn remove_legend(&mut self, id: LegendId) -> bool {
        self.legends.shift_remove(&id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::figure_rect;

    #[test]
    fn unlabeled_and_underscore_artists_are_not_legend_entries() {
        let mut fig = MemoryFigure::new(4.0, 3.0);
        let id = fig.add_axes(figure_rect(0.1, 0.1, 0.8, 0.8));
        let axes = fig.axes_mut(id).unwrap();
        let a = axes.plot(&[0.0, 1.0], &[0.0, 1.0], &ArtistStyle::labeled("a"));
        axes.plot(&[0.0, 1.0], &[1.0, 0.0], &ArtistStyle::default());
        axes.plot(&[0.0, 1.0], &[1.0, 1.0], &ArtistStyle::labeled("_hidden"));
        assert_eq!(axes.legend_entries(), vec![LegendEntry::new(a, "a")]);
    }

    #[test]
    fn autoscaled_limits_pad_the_data_span() {
        let mut fig = MemoryFigure::new(4.0, 3.0);
        let id = fig.add_axes(figure_rect(0.0, 0.0, 1.0, 1.0));
        let axes = fig.axes_mut(id).unwrap();
        axes.plot(&[0.0, 10.0], &[-1.0, 1.0], &ArtistStyle::default());
        assert_eq!(axes.limits(Axis::X), Some((-0.5, 10.5)));
        axes.set_limits(Axis::X, (2.0, 3.0));
        assert_eq!(axes.limits(Axis::X), Some((2.0, 3.0)));
    }

    #[test]
    fn shared_axes_see_each_others_limits() {
        let mut fig = MemoryFigure::new(4.0, 3.0);
        let a = fig.add_axes(figure_rect(0.0, 0.0, 0.5, 1.0));
        let b = fig.add_axes(figure_rect(0.5, 0.0, 0.5, 1.0));
        assert!(fig.share_axis(Axis::X, a, b));
        fig.axes_mut(b).unwrap().set_limits(Axis::X, (5.0, 6.0));
        assert_eq!(fig.axes(a).unwrap().limits(Axis::X), Some((5.0, 6.0)));
        assert_eq!(fig.axes(a).unwrap().limits(Axis::Y), Some((0.0, 1.0)));
    }

    #[test]
    fn clear_invalidates_old_handles() {
        let mut fig = MemoryFigure::new(4.0, 3.0);
        let old = fig.add_axes(figure_rect(0.0, 0.0, 1.0, 1.0));
        fig.clear();
        let new = fig.add_axes(figure_rect(0.0, 0.0, 1.0, 1.0));
        assert_ne!(old, new);
        assert!(fig.axes(old).is_none());
        assert_eq!(fig.axes_count(), 1);
    }
}
