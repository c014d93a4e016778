//! Typed geometry for the two coordinate systems the layout works in.
//!
//! Panel sizes are nominal (absolute units, the root's are the figure size in inches).
//! Everything handed to a canvas is a fraction of the whole figure, `[0, 1] x [0, 1]`,
//! with the origin in the lower-left corner.

/// Absolute panel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nominal;

/// Fraction of the composed figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FigureFraction;

pub type NominalSize = euclid::Size2D<f64, Nominal>;
pub type FigurePoint = euclid::Point2D<f64, FigureFraction>;
pub type FigureSize = euclid::Size2D<f64, FigureFraction>;
pub type FigureRect = euclid::Rect<f64, FigureFraction>;

pub fn nominal_size(width: f64, height: f64) -> NominalSize {
    euclid::size2(width, height)
}

pub fn figure_point(x: f64, y: f64) -> FigurePoint {
    euclid::point2(x, y)
}

pub fn figure_rect(x: f64, y: f64, width: f64, height: f64) -> FigureRect {
    euclid::rect(x, y, width, height)
}

/// `[x, y, width, height]`, the shape canvases and JSON dumps use.
pub fn rect_to_array(rect: &FigureRect) -> [f64; 4] {
    [rect.origin.x, rect.origin.y, rect.size.width, rect.size.height]
}

pub fn is_positive_finite(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/// Overlap test with a tolerance, so rectangles that only share an edge (up to float noise)
/// do not count as overlapping.
pub fn rects_overlap(a: &FigureRect, b: &FigureRect, eps: f64) -> bool {
    a.min_x() < b.max_x() - eps
        && b.min_x() < a.max_x() - eps
        && a.min_y() < b.max_y() - eps
        && b.min_y() < a.max_y() - eps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_rects_do_not_overlap() {
        let a = figure_rect(0.0, 0.0, 0.5, 0.5);
        let b = figure_rect(0.5, 0.0, 0.5, 0.5);
        assert!(!rects_overlap(&a, &b, 1e-9));
    }

    #[test]
    fn nested_rects_overlap() {
        let a = figure_rect(0.0, 0.0, 1.0, 1.0);
        let b = figure_rect(0.25, 0.25, 0.5, 0.5);
        assert!(rects_overlap(&a, &b, 1e-9));
    }
}
