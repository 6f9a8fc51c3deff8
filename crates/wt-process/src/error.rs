//! Process-kernel errors.

use thiserror::Error;
use wt_core::WtError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessError {
    #[error("Invalid basin hydraulics: {what} = {value}")]
    InvalidHydraulics { what: &'static str, value: f64 },

    #[error("Core error: {0}")]
    Core(#[from] WtError),
}

pub type ProcessResult<T> = Result<T, ProcessError>;
