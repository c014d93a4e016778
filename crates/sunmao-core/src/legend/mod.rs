//! Legend aggregation across a panel tree, and placement of legend blocks around the figure.

pub mod manager;
pub mod placement;
pub mod preset;

pub use manager::{LegendManager, LegendRequest};
pub use placement::{BlockAnchor, Corner, LegendPlacement, Orientation, grid_shape, place};
pub use preset::LegendPreset;

use crate::canvas::{ArtistId, LegendId};
use crate::error::{Error, Result};
use crate::panel::MortiseId;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a legend sits relative to its bounding box (matplotlib `loc` names).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LegendLocation {
    #[default]
    Best,
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
    Right,
    CenterLeft,
    CenterRight,
    LowerCenter,
    UpperCenter,
    Center,
}

impl LegendLocation {
    pub const ALL: [LegendLocation; 11] = [
        LegendLocation::Best,
        LegendLocation::UpperRight,
        LegendLocation::UpperLeft,
        LegendLocation::LowerLeft,
        LegendLocation::LowerRight,
        LegendLocation::Right,
        LegendLocation::CenterLeft,
        LegendLocation::CenterRight,
        LegendLocation::LowerCenter,
        LegendLocation::UpperCenter,
        LegendLocation::Center,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LegendLocation::Best => "best",
            LegendLocation::UpperRight => "upper right",
            LegendLocation::UpperLeft => "upper left",
            LegendLocation::LowerLeft => "lower left",
            LegendLocation::LowerRight => "lower right",
            LegendLocation::Right => "right",
            LegendLocation::CenterLeft => "center left",
            LegendLocation::CenterRight => "center right",
            LegendLocation::LowerCenter => "lower center",
            LegendLocation::UpperCenter => "upper center",
            LegendLocation::Center => "center",
        }
    }

    /// Fractional position of the legend's reference corner inside the box it is placed in,
    /// plus which point of the legend box is pinned there. `Best` falls back to upper right.
    pub fn box_fractions(self) -> (f64, f64) {
        match self {
            LegendLocation::Best | LegendLocation::UpperRight => (1.0, 1.0),
            LegendLocation::UpperLeft => (0.0, 1.0),
            LegendLocation::LowerLeft => (0.0, 0.0),
            LegendLocation::LowerRight => (1.0, 0.0),
            LegendLocation::Right | LegendLocation::CenterRight => (1.0, 0.5),
            LegendLocation::CenterLeft => (0.0, 0.5),
            LegendLocation::LowerCenter => (0.5, 0.0),
            LegendLocation::UpperCenter => (0.5, 1.0),
            LegendLocation::Center => (0.5, 0.5),
        }
    }
}

impl fmt::Display for LegendLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LegendLocation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let norm = s.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        LegendLocation::ALL
            .into_iter()
            .find(|loc| loc.as_str() == norm)
            .ok_or_else(|| Error::UnknownLegendLocation {
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for LegendLocation {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<LegendLocation> for String {
    fn from(value: LegendLocation) -> Self {
        value.as_str().to_string()
    }
}

/// How legends are distributed over a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendMode {
    /// One deduplicated legend for the whole figure.
    Global,
    /// One legend per panel, on that panel.
    Local,
    /// Both of the above.
    Mixed,
    /// Pick one of the above from the number of labels and panels.
    #[default]
    Auto,
}

impl LegendMode {
    pub fn as_str(self) -> &'static str {
        match self {
            LegendMode::Global => "global",
            LegendMode::Local => "local",
            LegendMode::Mixed => "mixed",
            LegendMode::Auto => "auto",
        }
    }
}

impl fmt::Display for LegendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LegendMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "global" => Ok(LegendMode::Global),
            "local" => Ok(LegendMode::Local),
            "mixed" => Ok(LegendMode::Mixed),
            "auto" => Ok(LegendMode::Auto),
            _ => Err(Error::UnknownLegendMode {
                value: s.to_string(),
            }),
        }
    }
}

/// Frame styling of a figure legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendFrame {
    pub frame_on: bool,
    pub rounded: bool,
    pub shadow: bool,
    pub edge_color: String,
    pub face_color: String,
}

impl Default for LegendFrame {
    fn default() -> Self {
        Self {
            frame_on: true,
            rounded: true,
            shadow: false,
            edge_color: "#cccccc".to_string(),
            face_color: "white".to_string(),
        }
    }
}

/// Labeled entries of one panel, in draw order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MortiseLegend {
    pub handles: Vec<ArtistId>,
    pub labels: Vec<String>,
}

impl MortiseLegend {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Result of walking every registered panel for labeled artists.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LegendRecord {
    /// All handles, panel by panel, in registration order.
    pub handles: Vec<ArtistId>,
    pub labels: Vec<String>,
    /// Only panels with at least one labeled entry appear.
    pub mortise_legends: IndexMap<MortiseId, MortiseLegend>,
    /// Unique labels in first-seen order.
    pub unique_labels: IndexSet<String>,
}

impl LegendRecord {
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Label to handle, keeping the first handle seen for each label.
    pub fn deduplicated(&self) -> IndexMap<String, ArtistId> {
        let mut by_label: IndexMap<String, ArtistId> = IndexMap::new();
        for (handle, label) in self.handles.iter().zip(&self.labels) {
            by_label.entry(label.clone()).or_insert(*handle);
        }
        by_label
    }
}

/// A canvas-native legend created for one panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocalLegend {
    pub location: LegendLocation,
    pub entries: usize,
}

/// What a legend operation produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum LegendOutcome {
    Global {
        legend: Option<LegendId>,
    },
    Local {
        legends: IndexMap<MortiseId, LocalLegend>,
    },
    Mixed {
        global: Option<LegendId>,
        local: IndexMap<MortiseId, LocalLegend>,
    },
}

impl LegendOutcome {
    pub fn mode(&self) -> LegendMode {
        match self {
            LegendOutcome::Global { .. } => LegendMode::Global,
            LegendOutcome::Local { .. } => LegendMode::Local,
            LegendOutcome::Mixed { .. } => LegendMode::Mixed,
        }
    }

    pub fn global(&self) -> Option<LegendId> {
        match self {
            LegendOutcome::Global { legend } => *legend,
            LegendOutcome::Mixed { global, .. } => *global,
            LegendOutcome::Local { .. } => None,
        }
    }

    pub fn local(&self) -> Option<&IndexMap<MortiseId, LocalLegend>> {
        match self {
            LegendOutcome::Local { legends } => Some(legends),
            LegendOutcome::Mixed { local, .. } => Some(local),
            LegendOutcome::Global { .. } => None,
        }
    }
}
