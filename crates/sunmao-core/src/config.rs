use crate::error::{Error, Result};
use crate::geom::is_positive_finite;
use crate::legend::{LegendLocation, LegendPlacement};
use crate::panel::TenonOptions;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tunables shared by every operation on a panel tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunmaoConfig {
    /// Inset of the root render on every figure edge, as a figure fraction.
    pub margin: f64,
    /// Pad and size of [`TenonOptions`] built by [`SunmaoConfig::tenon_options`].
    pub default_pad: f64,
    pub default_size: f64,
    pub global_legend_location: LegendLocation,
    pub local_legend_location: LegendLocation,
    pub placement: LegendPlacement,
}

impl Default for SunmaoConfig {
    fn default() -> Self {
        Self {
            margin: 0.1,
            default_pad: 0.05,
            default_size: 1.0,
            global_legend_location: LegendLocation::UpperCenter,
            local_legend_location: LegendLocation::UpperRight,
            placement: LegendPlacement::default(),
        }
    }
}

impl SunmaoConfig {
    /// Parses a (possibly partial) JSON object; absent keys keep their defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let cfg: Self = serde_json::from_value(value)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.margin.is_finite() && (0.0..0.5).contains(&self.margin)) {
            return Err(Error::InvalidSize {
                what: "figure margin",
                value: self.margin,
            });
        }
        if !is_positive_finite(self.default_size) {
            return Err(Error::InvalidSize {
                what: "default tenon size",
                value: self.default_size,
            });
        }
        if !(self.default_pad.is_finite() && self.default_pad >= 0.0) {
            return Err(Error::InvalidSize {
                what: "default tenon pad",
                value: self.default_pad,
            });
        }
        Ok(())
    }

    /// Tenon options carrying the configured size and pad.
    pub fn tenon_options(&self) -> TenonOptions {
        TenonOptions {
            size: self.default_size,
            pad: self.default_pad,
            ..Default::default()
        }
    }

    /// The rectangle the root is rendered into: the whole figure minus `margin` on each edge.
    pub fn root_inset(&self) -> [f64; 4] {
        let m = self.margin;
        [m, m, 1.0 - 2.0 * m, 1.0 - 2.0 * m]
    }
}
