#![forbid(unsafe_code)]

//! Mortise/tenon subplot layout (headless).
//!
//! A root panel ("mortise") gets child panels ("tenons") attached on any of its four sides,
//! recursively. The layout solver sizes each panel's envelope from nominal sizes, and the
//! render pass turns the tree into figure-fraction canvases on a [`canvas::Figure`]. Legends
//! drawn on individual panels can be merged into one figure legend, kept per panel, or laid
//! out as blocks around the figure.
//!
//! Design goals:
//! - no plotting backend baked in: the core talks to [`canvas::Canvas`] / [`canvas::Figure`]
//! - deterministic geometry that can be checked without drawing anything

mod align;
pub mod canvas;
pub mod config;
pub mod decoration;
pub mod error;
pub mod geom;
pub mod layout;
pub mod legend;
pub mod panel;
mod render;
pub mod side;

pub use canvas::memory::{MemoryAxes, MemoryFigure};
pub use canvas::{ArtistId, ArtistStyle, AxesId, Canvas, Figure, LegendId};
pub use config::SunmaoConfig;
pub use error::{Error, Result};
pub use layout::LayoutSolution;
pub use legend::{
    LegendLocation, LegendManager, LegendMode, LegendOutcome, LegendPlacement, LegendPreset,
    LegendRequest, Orientation,
};
pub use panel::{
    Assembly, AttachPolicy, Mortise, MortiseId, PanelTree, RootOptions, TenonOptions,
    create_root,
};
pub use side::{Axis, AxisSelect, Side};

/// A tree on a fresh in-memory figure of `options.size` inches.
pub fn create_memory_root(options: RootOptions) -> Result<Assembly<MemoryFigure>> {
    let (width, height) = options.size;
    create_root(MemoryFigure::new(width, height), options)
}
