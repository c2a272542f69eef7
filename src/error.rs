use crate::hour::Hour;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("negative demand {value} at {hour}")]
    NegativeDemand { hour: Hour, value: f64 },

    #[error("demand at {hour} is not a finite number")]
    NonFiniteDemand { hour: Hour },

    /// Demand hours must form a gap-free range.
    #[error("demand hours are not contiguous: expected {expected}, found {found}")]
    NonContiguousHours { expected: Hour, found: Hour },

    #[error("invalid hour range {open}..={close}")]
    InvalidHourRange { open: u8, close: u8 },

    #[error("invalid policy: {0}")]
    InvalidPolicy(String),

    /// The solver failed for a reason other than infeasibility or unboundedness.
    #[error("solver failure: {0}")]
    Backend(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
