//! Water chemistry errors.

use thiserror::Error;
use wt_core::WtError;

/// Result type for chemistry operations.
pub type ChemResult<T> = Result<T, ChemError>;

/// Errors raised while building or equilibrating a water state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChemError {
    /// Non-physical values (negative concentration, zero flow, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Shared numeric validation failure.
    #[error(transparent)]
    Core(#[from] WtError),
}

impl From<ChemError> for WtError {
    fn from(err: ChemError) -> Self {
        match err {
            ChemError::NonPhysical { what } => WtError::Invariant { what },
            ChemError::InvalidArg { what } => WtError::InvalidArg { what },
            ChemError::Core(inner) => inner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ChemError::NonPhysical { what: "alkalinity" };
        assert!(err.to_string().contains("alkalinity"));
    }

    #[test]
    fn error_to_core_error() {
        let err: WtError = ChemError::InvalidArg { what: "pH" }.into();
        assert!(matches!(err, WtError::InvalidArg { .. }));
    }
}
