use crate::panel::MortiseId;
use crate::side::Side;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid side `{value}`: expected one of top, bottom, left, right")]
    InvalidSide { value: String },

    #[error("unknown legend mode `{value}`: expected one of global, local, mixed, auto")]
    UnknownLegendMode { value: String },

    #[error("unknown legend location `{value}`")]
    UnknownLegendLocation { value: String },

    #[error("unknown axis selection `{value}`: expected x, y or both")]
    InvalidAxis { value: String },

    #[error("unknown legend orientation `{value}`")]
    UnknownOrientation { value: String },

    #[error("invalid {what}: {value} (expected a finite, positive number)")]
    InvalidSize { what: &'static str, value: f64 },

    #[error("invalid legend grid: {message}")]
    InvalidGrid { message: String },

    #[error("side `{side}` already has a tenon; use get_child() to reach the existing one")]
    SideOccupied { side: Side },

    #[error("degenerate panel geometry: {width} x {height}")]
    DegenerateGeometry { width: f64, height: f64 },

    #[error("unknown panel id {id}")]
    UnknownPanel { id: MortiseId },

    #[error("panel {id} has no canvas; render the tree first")]
    NotRendered { id: MortiseId },

    #[error("configuration JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for errors caused by caller-supplied values (bad side, mode, size, ...).
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::InvalidSide { .. }
                | Error::UnknownLegendMode { .. }
                | Error::UnknownLegendLocation { .. }
                | Error::UnknownOrientation { .. }
                | Error::InvalidAxis { .. }
                | Error::InvalidSize { .. }
                | Error::InvalidGrid { .. }
        )
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::SideOccupied { .. })
    }
}
