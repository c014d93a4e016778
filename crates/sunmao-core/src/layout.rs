//! Size accounting for one panel and the tenons attached directly to it.
//!
//! Only the tenons' own nominal sizes enter a panel's envelope. A tenon's descendants are
//! fitted later, inside the rectangle the tenon itself is allotted, so a top tenon with its own
//! top tenon does not make its grandparent any taller.

use crate::error::{Error, Result};
use crate::geom::{FigureRect, NominalSize, figure_rect, is_positive_finite, nominal_size};
use crate::side::Side;
use serde::Serialize;

/// Bounding envelope of a panel plus its direct tenons, in nominal units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutSolution {
    pub total_width: f64,
    pub total_height: f64,
    /// Width consumed by left tenons, i.e. where the panel's own rectangle starts.
    pub offset_x: f64,
    /// Height consumed by bottom tenons.
    pub offset_y: f64,
}

fn check(size: NominalSize) -> Result<()> {
    if is_positive_finite(size.width) && is_positive_finite(size.height) {
        Ok(())
    } else {
        Err(Error::DegenerateGeometry {
            width: size.width,
            height: size.height,
        })
    }
}

/// Envelope of a panel of nominal size `own` with the given direct tenons.
pub fn solve(
    own: NominalSize,
    tenons: impl IntoIterator<Item = (Side, NominalSize)>,
) -> Result<LayoutSolution> {
    check(own)?;
    let (mut left, mut right, mut top, mut bottom) = (0.0, 0.0, 0.0, 0.0);
    for (side, size) in tenons {
        check(size)?;
        match side {
            Side::Left => left += size.width,
            Side::Right => right += size.width,
            Side::Top => top += size.height,
            Side::Bottom => bottom += size.height,
        }
    }
    let total = nominal_size(own.width + left + right, own.height + top + bottom);
    check(total)?;
    Ok(LayoutSolution {
        total_width: total.width,
        total_height: total.height,
        offset_x: left,
        offset_y: bottom,
    })
}

/// Figure-fraction rectangles for a panel and its direct tenons inside `allotted`.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrangement {
    pub solution: LayoutSolution,
    pub own: FigureRect,
    /// Allotment of each tenon, in the order the tenons were given.
    pub tenons: Vec<FigureRect>,
}

/// Splits `allotted` between a panel and its tenons.
///
/// Tenons on the same side tile outward from the panel's edge in the order given. Left and
/// right tenons line up with the panel's bottom edge, top and bottom tenons with its left edge.
pub fn arrange(
    allotted: FigureRect,
    own: NominalSize,
    tenons: &[(Side, NominalSize)],
) -> Result<Arrangement> {
    let solution = solve(own, tenons.iter().copied())?;
    let LayoutSolution {
        total_width: tw,
        total_height: th,
        offset_x,
        offset_y,
    } = solution;
    let (x, y) = (allotted.origin.x, allotted.origin.y);
    let (w, h) = (allotted.size.width, allotted.size.height);

    let own_x = x + offset_x / tw * w;
    let own_y = y + offset_y / th * h;
    let own_rect = figure_rect(own_x, own_y, own.width / tw * w, own.height / th * h);

    let mut left_cursor = x;
    let mut right_cursor = x + (offset_x + own.width) / tw * w;
    let mut top_cursor = y + (offset_y + own.height) / th * h;
    let mut bottom_cursor = y;

    let rects = tenons
        .iter()
        .map(|&(side, size)| {
            let cw = size.width / tw * w;
            let ch = size.height / th * h;
            match side {
                Side::Left => {
                    let rect = figure_rect(left_cursor, own_y, cw, ch);
                    left_cursor += cw;
                    rect
                }
                Side::Right => {
                    let rect = figure_rect(right_cursor, own_y, cw, ch);
                    right_cursor += cw;
                    rect
                }
                Side::Top => {
                    let rect = figure_rect(own_x, top_cursor, cw, ch);
                    top_cursor += ch;
                    rect
                }
                Side::Bottom => {
                    let rect = figure_rect(own_x, bottom_cursor, cw, ch);
                    bottom_cursor += ch;
                    rect
                }
            }
        })
        .collect();

    Ok(Arrangement {
        solution,
        own: own_rect,
        tenons: rects,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::nominal_size;

    #[test]
    fn overflowing_envelope_is_degenerate() {
        let wide = nominal_size(1e308, 1.0);
        let err = solve(
            nominal_size(1.0, 1.0),
            [(Side::Left, wide), (Side::Right, wide)],
        )
        .unwrap_err();
        assert!(matches!(err, Error::DegenerateGeometry { .. }));
    }

    #[test]
    fn lone_panel_fills_its_allotment() {
        let a = arrange(
            figure_rect(0.1, 0.1, 0.8, 0.8),
            nominal_size(10.0, 8.0),
            &[],
        )
        .unwrap();
        assert_eq!(a.own, figure_rect(0.1, 0.1, 0.8, 0.8));
        assert_eq!(a.solution.offset_x, 0.0);
        assert_eq!(a.solution.offset_y, 0.0);
    }

    #[test]
    fn zero_width_is_degenerate() {
        let err = solve(nominal_size(0.0, 1.0), []).unwrap_err();
        assert!(matches!(err, Error::DegenerateGeometry { .. }));
    }

    #[test]
    fn nan_tenon_is_degenerate() {
        let err = solve(
            nominal_size(1.0, 1.0),
            [(Side::Top, nominal_size(1.0, f64::NAN))],
        )
        .unwrap_err();
        assert!(matches!(err, Error::DegenerateGeometry { .. }));
    }
}
