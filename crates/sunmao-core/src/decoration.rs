//! Per-panel decoration records carried across a full re-layout.
//!
//! Canvases are destroyed and recreated wholesale whenever the tree's geometry changes, so
//! anything a caller set on a canvas is captured into a [`Decoration`] keyed by panel id and
//! reapplied to the panel's new canvas. Every property is independent: a backend that cannot
//! report one leaves it `None` and it is simply not restored.

use crate::canvas::Canvas;
use crate::side::Axis;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Decoration {
    pub face_color: Option<String>,
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    /// Only captured for explicitly set ranges.
    pub x_limits: Option<(f64, f64)>,
    pub y_limits: Option<(f64, f64)>,
    pub x_ticks: Option<Vec<f64>>,
    pub y_ticks: Option<Vec<f64>>,
    pub grid: Option<bool>,
    /// Recorded only. A native legend lists artists, and artists are not carried over.
    pub legend: Option<bool>,
}

fn explicit_limits<C: Canvas + ?Sized>(canvas: &C, axis: Axis) -> Option<(f64, f64)> {
    // A data-derived range would be meaningless on an empty canvas, so it is not frozen.
    match canvas.autoscaled(axis) {
        Some(true) => None,
        _ => canvas.limits(axis),
    }
}

impl Decoration {
    pub fn capture<C: Canvas + ?Sized>(canvas: &C) -> Self {
        Self {
            face_color: canvas.face_color(),
            title: canvas.title(),
            x_label: canvas.axis_label(Axis::X),
            y_label: canvas.axis_label(Axis::Y),
            x_limits: explicit_limits(canvas, Axis::X),
            y_limits: explicit_limits(canvas, Axis::Y),
            x_ticks: canvas.ticks(Axis::X),
            y_ticks: canvas.ticks(Axis::Y),
            grid: canvas.grid(),
            legend: canvas.has_legend(),
        }
    }

    /// Reapplies what was captured. Empty titles and labels and a hidden grid are left at the
    /// new canvas' defaults.
    pub fn restore<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        if let Some(color) = &self.face_color {
            canvas.set_face_color(color);
        }
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            canvas.set_title(title);
        }
        for (axis, label) in [(Axis::X, &self.x_label), (Axis::Y, &self.y_label)] {
            if let Some(label) = label.as_deref().filter(|l| !l.is_empty()) {
                canvas.set_axis_label(axis, label);
            }
        }
        for (axis, limits) in [(Axis::X, self.x_limits), (Axis::Y, self.y_limits)] {
            if let Some(range) = limits {
                canvas.set_limits(axis, range);
            }
        }
        for (axis, ticks) in [(Axis::X, &self.x_ticks), (Axis::Y, &self.y_ticks)] {
            if let Some(ticks) = ticks {
                canvas.set_ticks(axis, ticks);
            }
        }
        if self.grid == Some(true) {
            canvas.set_grid(true);
        }
        if self.legend == Some(true) {
            warn!("panel legend not restored: its entries referred to artists of the old canvas");
        }
    }
}
