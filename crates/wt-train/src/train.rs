//! The validated, immutable treatment train.

use wt_core::StageId;

use crate::builder::TrainBuilder;
use crate::error::TrainResult;
use crate::stage::Stage;
use crate::validate;

/// An ordered sequence of stages that begins with exactly one influent.
#[derive(Debug, Clone)]
pub struct Train {
    pub(crate) stages: Vec<Stage>,
    pub(crate) plant_effluent: Option<usize>,
    pub(crate) next_id: u32,
}

impl Train {
    /// Stages in flow order; index 0 is always the influent.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage(&self, id: StageId) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id == id)
    }

    pub fn position(&self, id: StageId) -> Option<usize> {
        self.stages.iter().position(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always false for a built train.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stage> {
        self.stages.iter()
    }

    pub fn influent(&self) -> &Stage {
        &self.stages[0]
    }

    /// Position of the designated plant-effluent sample point, if any.
    pub fn plant_effluent_index(&self) -> Option<usize> {
        self.plant_effluent
    }

    /// Re-check ordering and configuration.
    pub fn validate(&self) -> TrainResult<()> {
        validate::validate_structure(&self.stages)?;
        self.stages.iter().try_for_each(validate::validate_config)
    }

    /// Reopen the train for editing. Stage IDs are preserved and new stages
    /// continue the ID sequence.
    pub fn into_builder(self) -> TrainBuilder {
        TrainBuilder::from_parts(self.stages, self.next_id)
    }
}

impl<'a> IntoIterator for &'a Train {
    type Item = &'a Stage;
    type IntoIter = std::slice::Iter<'a, Stage>;

    fn into_iter(self) -> Self::IntoIter {
        self.stages.iter()
    }
}
