//! Placement of legend blocks around the outside of the composed figure.
//!
//! Unlike panel geometry, which is always relative to the parent's allotment, blocks are
//! decorations of the whole figure and are positioned in global figure-fraction space. Each
//! side has its own edge-hugging formula; they are deliberately not one parameterization.

use super::{LegendFrame, LegendLocation};
use crate::error::{Error, Result};
use crate::geom::{FigurePoint, figure_point};
use crate::side::Side;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Nominal footprint of one block in the grid, as a figure fraction.
pub const BLOCK_WIDTH: f64 = 0.08;
pub const BLOCK_HEIGHT: f64 = 0.08;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    #[default]
    Vertical,
    /// Along the edge the blocks are placed on.
    Parallel,
    /// Away from the edge the blocks are placed on.
    Perpendicular,
}

impl Orientation {
    /// Collapses `Parallel`/`Perpendicular` to a concrete direction for `side`.
    pub fn resolve(self, side: Side) -> Orientation {
        let along = if side.is_vertical_stack() {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };
        let across = if along == Orientation::Horizontal {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        };
        match self {
            Orientation::Parallel => along,
            Orientation::Perpendicular => across,
            concrete => concrete,
        }
    }
}

impl FromStr for Orientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" => Ok(Orientation::Horizontal),
            "vertical" => Ok(Orientation::Vertical),
            "parallel" => Ok(Orientation::Parallel),
            "perpendicular" => Ok(Orientation::Perpendicular),
            _ => Err(Error::UnknownOrientation {
                value: s.to_string(),
            }),
        }
    }
}

/// Which corner of a block's own bounding box its anchor refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    UpperLeft,
}

impl From<Corner> for LegendLocation {
    fn from(corner: Corner) -> Self {
        match corner {
            Corner::UpperLeft => LegendLocation::UpperLeft,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlockAnchor {
    pub corner: Corner,
    pub point: FigurePoint,
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendPlacement {
    pub side: Side,
    pub orientation: Orientation,
    /// At most one of `cols` / `rows` may be given; the other is derived.
    pub cols: Option<usize>,
    pub rows: Option<usize>,
    pub h_pad: f64,
    pub v_pad: f64,
    pub gap: f64,
    pub frame: LegendFrame,
}

impl Default for LegendPlacement {
    fn default() -> Self {
        Self {
            side: Side::Right,
            orientation: Orientation::Vertical,
            cols: None,
            rows: None,
            h_pad: 0.01,
            v_pad: 0.01,
            gap: 0.02,
            frame: LegendFrame::default(),
        }
    }
}

impl LegendPlacement {
    pub fn on(side: Side) -> Self {
        Self {
            side,
            ..Default::default()
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_cols(mut self, cols: usize) -> Self {
        self.cols = Some(cols);
        self.rows = None;
        self
    }

    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = Some(rows);
        self.cols = None;
        self
    }
}

/// Resolves `(rows, cols)` for `count` blocks.
pub fn grid_shape(
    count: usize,
    orientation: Orientation,
    cols: Option<usize>,
    rows: Option<usize>,
) -> Result<(usize, usize)> {
    match (cols, rows) {
        (Some(_), Some(_)) => Err(Error::InvalidGrid {
            message: "give either cols or rows, not both".to_string(),
        }),
        (Some(0), None) | (None, Some(0)) => Err(Error::InvalidGrid {
            message: "cols and rows must be at least 1".to_string(),
        }),
        (Some(cols), None) => Ok((count.div_ceil(cols), cols)),
        (None, Some(rows)) => Ok((rows, count.div_ceil(rows))),
        (None, None) => match orientation {
            Orientation::Horizontal => Ok((1, count)),
            _ => Ok((count, 1)),
        },
    }
}

/// Anchors for `count` blocks, in block order (row-major through the grid).
pub fn place(count: usize, placement: &LegendPlacement) -> Result<Vec<BlockAnchor>> {
    let orientation = placement.orientation.resolve(placement.side);
    let (rows, cols) = grid_shape(count, orientation, placement.cols, placement.rows)?;
    if count == 0 {
        return Ok(Vec::new());
    }

    let LegendPlacement {
        h_pad, v_pad, gap, ..
    } = *placement;
    let step_x = BLOCK_WIDTH + gap;
    let step_y = BLOCK_HEIGHT + gap;

    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let (row, col) = (i / cols, i % cols);
        let (r, c) = (row as f64, col as f64);
        let (x, y) = match placement.side {
            Side::Right => (1.0 + h_pad + c * step_x, 1.0 - v_pad - r * step_y),
            Side::Left => {
                let cols_right = (cols - col) as f64;
                let gaps_right = (cols - 1 - col) as f64;
                (
                    -h_pad - cols_right * BLOCK_WIDTH - gaps_right * gap,
                    1.0 - v_pad - r * step_y,
                )
            }
            Side::Top => {
                let rows_below = (rows - row) as f64;
                let gaps_below = (rows.saturating_sub(1 + row)) as f64;
                (
                    h_pad + c * step_x,
                    1.0 + v_pad + rows_below * BLOCK_HEIGHT + gaps_below * gap,
                )
            }
            Side::Bottom => (h_pad + c * step_x, -v_pad - r * step_y),
        };
        out.push(BlockAnchor {
            corner: Corner::UpperLeft,
            point: figure_point(x, y),
            row,
            col,
        });
    }
    Ok(out)
}
