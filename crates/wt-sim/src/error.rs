//! Error types for simulation runs.

use thiserror::Error;
use wt_chem::ChemError;
use wt_core::WtError;
use wt_process::ProcessError;
use wt_train::TrainError;

/// Errors that abort a run. No partial record is produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid train: {0}")]
    Train(#[from] TrainError),

    #[error("Chemistry error: {0}")]
    Chem(#[from] ChemError),

    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    #[error("Core error: {0}")]
    Core(#[from] WtError),
}

pub type SimResult<T> = Result<T, SimError>;
