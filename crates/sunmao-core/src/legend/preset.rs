use crate::error::{Error, Result};
use crate::geom::FigureRect;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Named legend anchor points in figure-fraction space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendPreset {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
    OutsideTop,
    OutsideBottom,
    OutsideLeft,
    OutsideRight,
}

/// Used when a name does not match any preset.
pub const FALLBACK_ANCHOR: (f64, f64) = (0.98, 0.98);

impl LegendPreset {
    pub const ALL: [LegendPreset; 13] = [
        LegendPreset::TopLeft,
        LegendPreset::TopCenter,
        LegendPreset::TopRight,
        LegendPreset::CenterLeft,
        LegendPreset::Center,
        LegendPreset::CenterRight,
        LegendPreset::BottomLeft,
        LegendPreset::BottomCenter,
        LegendPreset::BottomRight,
        LegendPreset::OutsideTop,
        LegendPreset::OutsideBottom,
        LegendPreset::OutsideLeft,
        LegendPreset::OutsideRight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LegendPreset::TopLeft => "top_left",
            LegendPreset::TopCenter => "top_center",
            LegendPreset::TopRight => "top_right",
            LegendPreset::CenterLeft => "center_left",
            LegendPreset::Center => "center",
            LegendPreset::CenterRight => "center_right",
            LegendPreset::BottomLeft => "bottom_left",
            LegendPreset::BottomCenter => "bottom_center",
            LegendPreset::BottomRight => "bottom_right",
            LegendPreset::OutsideTop => "outside_top",
            LegendPreset::OutsideBottom => "outside_bottom",
            LegendPreset::OutsideLeft => "outside_left",
            LegendPreset::OutsideRight => "outside_right",
        }
    }

    pub fn anchor(self) -> (f64, f64) {
        match self {
            LegendPreset::TopLeft => (0.02, 0.98),
            LegendPreset::TopCenter => (0.5, 0.98),
            LegendPreset::TopRight => (0.98, 0.98),
            LegendPreset::CenterLeft => (0.02, 0.5),
            LegendPreset::Center => (0.5, 0.5),
            LegendPreset::CenterRight => (0.98, 0.5),
            LegendPreset::BottomLeft => (0.02, 0.02),
            LegendPreset::BottomCenter => (0.5, 0.02),
            LegendPreset::BottomRight => (0.98, 0.02),
            LegendPreset::OutsideTop => (0.5, 1.05),
            LegendPreset::OutsideBottom => (0.5, -0.05),
            LegendPreset::OutsideLeft => (-0.05, 0.5),
            LegendPreset::OutsideRight => (1.05, 0.5),
        }
    }

    /// Anchor for a preset name, or [`FALLBACK_ANCHOR`] for unknown names.
    pub fn position(name: &str) -> (f64, f64) {
        name.parse::<LegendPreset>()
            .map(LegendPreset::anchor)
            .unwrap_or(FALLBACK_ANCHOR)
    }

    /// Picks a preset away from where the panels are concentrated, judged by the mean centre
    /// of their rectangles.
    pub fn optimal(rects: &[FigureRect]) -> LegendPreset {
        if rects.is_empty() {
            return LegendPreset::TopRight;
        }
        let n = rects.len() as f64;
        let center_x = rects.iter().map(|r| r.center().x).sum::<f64>() / n;
        let center_y = rects.iter().map(|r| r.center().y).sum::<f64>() / n;

        if center_y > 0.7 {
            LegendPreset::BottomCenter
        } else if center_y < 0.3 {
            LegendPreset::TopCenter
        } else if center_x > 0.7 {
            LegendPreset::OutsideLeft
        } else if center_x < 0.3 {
            LegendPreset::OutsideRight
        } else {
            LegendPreset::OutsideTop
        }
    }
}

impl FromStr for LegendPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let norm = s.trim().to_ascii_lowercase();
        LegendPreset::ALL
            .into_iter()
            .find(|p| p.name() == norm)
            .ok_or_else(|| Error::UnknownLegendLocation {
                value: s.to_string(),
            })
    }
}
