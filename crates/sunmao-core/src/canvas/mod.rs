//! The drawing-surface capabilities the layout needs from a plotting backend.
//!
//! A [`Figure`] is the figure-level context owned by the panel tree; it allocates one
//! [`Canvas`] per panel at a figure-fraction rectangle. Getters that feed the re-render
//! snapshot return `Option`: `None` means "this backend cannot report it", and the snapshot
//! skips that property.

pub mod memory;

use crate::geom::{FigurePoint, FigureRect};
use crate::legend::{LegendFrame, LegendLocation};
use crate::side::Axis;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! handle_id {
    ($name:ident, $prefix:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub usize);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

handle_id!(AxesId, "axes-");
handle_id!(ArtistId, "artist-");
handle_id!(LegendId, "legend-");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Free text anchored in the canvas' own fractional space (`(0, 0)` lower-left, `(1, 1)`
/// upper-right), not the figure's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpec {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub ha: HAlign,
    pub va: VAlign,
    /// Degrees, counter-clockwise.
    pub rotation: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtistStyle {
    /// Only labeled artists take part in legends.
    pub label: Option<String>,
    pub color: Option<String>,
    pub line_width: Option<f64>,
    pub marker_size: Option<f64>,
}

impl ArtistStyle {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LegendEntry {
    pub artist: ArtistId,
    pub label: String,
}

impl LegendEntry {
    pub fn new(artist: ArtistId, label: impl Into<String>) -> Self {
        Self {
            artist,
            label: label.into(),
        }
    }
}

/// A legend scoped to one canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxesLegendSpec {
    pub entries: Vec<LegendEntry>,
    pub location: LegendLocation,
    pub columns: usize,
}

/// A legend placed on the figure as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureLegendSpec {
    pub entries: Vec<LegendEntry>,
    pub location: LegendLocation,
    pub columns: usize,
    /// Figure-fraction point that `location` refers to; `None` means the figure's own box.
    pub anchor: Option<FigurePoint>,
    pub title: Option<String>,
    pub frame: LegendFrame,
}

/// Per-panel drawing surface.
pub trait Canvas {
    fn plot(&mut self, xs: &[f64], ys: &[f64], style: &ArtistStyle) -> ArtistId;
    fn scatter(&mut self, xs: &[f64], ys: &[f64], style: &ArtistStyle) -> ArtistId;
    /// Row-major grid of values, first row drawn at the top.
    fn image(&mut self, rows: &[Vec<f64>], style: &ArtistStyle) -> ArtistId;

    fn set_title(&mut self, title: &str);
    fn text(&mut self, spec: TextSpec);
    /// Hides ticks and all four spines.
    fn set_axis_off(&mut self);

    fn set_limits(&mut self, axis: Axis, range: (f64, f64));
    fn set_ticks(&mut self, axis: Axis, ticks: &[f64]);
    fn set_tick_labels(&mut self, axis: Axis, labels: &[String]);
    fn set_axis_label(&mut self, axis: Axis, label: &str);
    fn set_face_color(&mut self, color: &str);
    fn set_grid(&mut self, visible: bool);

    fn title(&self) -> Option<String> {
        None
    }
    /// Current view range, whether explicit or derived from data.
    fn limits(&self, _axis: Axis) -> Option<(f64, f64)> {
        None
    }
    /// Whether the view range on `axis` still follows the data.
    fn autoscaled(&self, _axis: Axis) -> Option<bool> {
        None
    }
    /// Explicitly set tick positions; `None` also when ticks are automatic.
    fn ticks(&self, _axis: Axis) -> Option<Vec<f64>> {
        None
    }
    fn axis_label(&self, _axis: Axis) -> Option<String> {
        None
    }
    fn face_color(&self) -> Option<String> {
        None
    }
    fn grid(&self) -> Option<bool> {
        None
    }
    fn has_legend(&self) -> Option<bool> {
        None
    }

    /// Labeled artists in draw order.
    fn legend_entries(&self) -> Vec<LegendEntry>;
    /// Creates (or replaces) the canvas-native legend.
    fn legend(&mut self, spec: AxesLegendSpec);
    fn remove_legend(&mut self) -> bool;
}

/// Figure-level context that owns every canvas.
pub trait Figure {
    type Axes: Canvas;

    /// Width and height in absolute units.
    fn size(&self) -> (f64, f64);
    fn add_axes(&mut self, rect: FigureRect) -> AxesId;
    fn axes(&self, id: AxesId) -> Option<&Self::Axes>;
    fn axes_mut(&mut self, id: AxesId) -> Option<&mut Self::Axes>;
    /// Destroys every canvas and figure legend.
    fn clear(&mut self);
    /// Binds `follower`'s view range on `axis` to `leader`'s, so later changes on either
    /// are seen by both. Returns false if either handle is stale.
    fn share_axis(&mut self, axis: Axis, leader: AxesId, follower: AxesId) -> bool;
    fn legend(&mut self, spec: FigureLegendSpec) -> LegendId;
    fn remove_legend(&mut self, id: LegendId) -> bool;
}
