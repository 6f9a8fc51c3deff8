use thiserror::Error;

pub type WtResult<T> = Result<T, WtError>;

/// Errors shared by every crate in the simulator. Crate-level error enums
/// convert into this one at the boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WtError {
    #[error("{what} is not a finite number ({value})")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A configuration value outside its physical or calibrated range.
    #[error("{what} = {value} is outside {min}..={max}")]
    OutOfRange {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A model rule was broken, e.g. a train without its influent.
    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
