#![forbid(unsafe_code)]

//! `sunmao` composes a figure out of a root panel and the panels attached to its sides
//! ("mortise" and "tenons"), then merges or places the legends drawn on them.
//!
//! # Features
//!
//! - `render`: enable SVG output and layout dumps (`sunmao::render`)
//! - `raster`: enable PNG output via pure-Rust SVG rasterization

pub use sunmao_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use sunmao_render::model::{FigureLayout, LegendLayout, PanelLayout};
    pub use sunmao_render::svg::{SvgRenderOptions, render_svg};

    use sunmao_core::{MemoryFigure, PanelTree};

    #[cfg(feature = "raster")]
    pub mod raster;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Layout(#[from] sunmao_core::Error),
        #[error(transparent)]
        Render(#[from] sunmao_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Lays the tree out if needed and returns its geometry.
    pub fn layout_tree(tree: &mut PanelTree<MemoryFigure>) -> Result<FigureLayout> {
        tree.ensure_rendered()?;
        Ok(FigureLayout::from_tree(tree)?)
    }

    /// Lays the tree out if needed and writes it as a standalone SVG document.
    pub fn render_tree_svg(
        tree: &mut PanelTree<MemoryFigure>,
        options: &SvgRenderOptions,
    ) -> Result<String> {
        Ok(sunmao_render::svg::render_tree_svg(tree, options)?)
    }

}
