//! Train construction and validation errors.

use thiserror::Error;
use wt_core::{StageId, WtError};

/// Fatal configuration errors: the run is aborted with no partial results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrainError {
    /// The train has no stages.
    #[error("Train has no stages")]
    Empty,

    /// No influent stage at all.
    #[error("Train does not begin with an influent stage")]
    MissingInfluent,

    /// An influent stage appears somewhere other than the head.
    #[error("Influent stage {stage} at position {position} must be the first and only influent")]
    MisplacedInfluent { stage: StageId, position: usize },

    /// More than one designated plant-effluent sample point.
    #[error("Stage {stage} is a second plant-effluent sample point")]
    DuplicatePlantEffluent { stage: StageId },

    /// A stage configuration value is invalid.
    #[error("Stage {stage} ({kind}): {what}")]
    InvalidConfig {
        stage: StageId,
        kind: &'static str,
        what: &'static str,
    },

    /// A stage id is not present in the train.
    #[error("Stage {stage} not found")]
    StageNotFound { stage: StageId },

    /// An edit position is past the end of the train.
    #[error("Insert position {position} is beyond train length {len}")]
    PositionOutOfBounds { position: usize, len: usize },
}

pub type TrainResult<T> = Result<T, TrainError>;

impl From<TrainError> for WtError {
    fn from(err: TrainError) -> Self {
        match err {
            TrainError::InvalidConfig { what, .. } => WtError::InvalidArg { what },
            TrainError::PositionOutOfBounds { .. } | TrainError::StageNotFound { .. } => {
                WtError::InvalidArg {
                    what: "train edit",
                }
            }
            _ => WtError::Invariant {
                what: "train structure",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_stage() {
        let err = TrainError::MisplacedInfluent {
            stage: StageId::from_index(3),
            position: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("3"));
        assert!(msg.contains("position 2"));
    }

    #[test]
    fn error_conversion() {
        let err: WtError = TrainError::Empty.into();
        assert!(matches!(err, WtError::Invariant { .. }));
    }
}
