use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four cardinal sides a tenon can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// Traversal order used everywhere a tree is walked (render, snapshot, legend registration).
    pub const ALL: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Bottom => "bottom",
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Side::Top => 0,
            Side::Bottom => 1,
            Side::Left => 2,
            Side::Right => 3,
        }
    }

    pub fn is_vertical_stack(self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Side::Top),
            "bottom" => Ok(Side::Bottom),
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            _ => Err(Error::InvalidSide {
                value: s.to_string(),
            }),
        }
    }
}

/// Which view-range axis an alignment or sharing operation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisSelect {
    X,
    Y,
    #[default]
    Both,
}

impl AxisSelect {
    pub fn includes_x(self) -> bool {
        matches!(self, AxisSelect::X | AxisSelect::Both)
    }

    pub fn includes_y(self) -> bool {
        matches!(self, AxisSelect::Y | AxisSelect::Both)
    }
}

impl FromStr for AxisSelect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(AxisSelect::X),
            "y" => Ok(AxisSelect::Y),
            "both" | "xy" => Ok(AxisSelect::Both),
            _ => Err(Error::InvalidAxis {
                value: s.to_string(),
            }),
        }
    }
}

/// A single data axis of a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sides_case_insensitively() {
        assert_eq!("Top".parse::<Side>().unwrap(), Side::Top);
        assert_eq!(" right ".parse::<Side>().unwrap(), Side::Right);
    }

    #[test]
    fn rejects_unknown_side() {
        let err = "middle".parse::<Side>().unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("middle"));
    }
}
