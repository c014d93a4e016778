#![forbid(unsafe_code)]

//! Headless output for laid-out panel trees: a JSON-friendly geometry dump ([`model`]) and a
//! standalone SVG writer ([`svg`]) for the in-memory backend.

pub mod model;
pub mod svg;

pub use model::{FigureLayout, LegendLayout, PanelLayout};
pub use svg::{SvgRenderOptions, render_svg, render_tree_svg};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] sunmao_core::Error),
    #[error("invalid render options: {message}")]
    InvalidOptions { message: String },
    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
