//! Incremental train builder.

use wt_core::StageId;

use crate::error::{TrainError, TrainResult};
use crate::stage::{Stage, StageKind};
use crate::train::Train;
use crate::validate;

/// Builder for constructing a train stage by stage.
///
/// Stages may be appended, inserted, replaced, or removed in any order;
/// ordering rules are only checked by `build()`, which freezes the
/// builder into an immutable `Train`.
#[derive(Debug, Default)]
pub struct TrainBuilder {
    stages: Vec<Stage>,
    next_id: u32,
}

impl TrainBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> StageId {
        let id = StageId::from_index(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append a stage at the end of the train and return its ID.
    pub fn add_stage(&mut self, name: impl Into<String>, kind: StageKind) -> StageId {
        let id = self.next_id();
        self.stages.push(Stage {
            id,
            name: name.into(),
            kind,
        });
        id
    }

    /// Insert a stage before `position` (or at the end when `position == len`).
    pub fn insert_stage(
        &mut self,
        position: usize,
        name: impl Into<String>,
        kind: StageKind,
    ) -> TrainResult<StageId> {
        if position > self.stages.len() {
            return Err(TrainError::PositionOutOfBounds {
                position,
                len: self.stages.len(),
            });
        }
        let id = self.next_id();
        self.stages.insert(
            position,
            Stage {
                id,
                name: name.into(),
                kind,
            },
        );
        Ok(id)
    }

    /// Remove a stage and return it.
    pub fn remove_stage(&mut self, id: StageId) -> TrainResult<Stage> {
        let pos = self.position(id)?;
        Ok(self.stages.remove(pos))
    }

    /// Swap in a new configuration for an existing stage, keeping its ID and name.
    pub fn replace_kind(&mut self, id: StageId, kind: StageKind) -> TrainResult<StageKind> {
        let pos = self.position(id)?;
        Ok(std::mem::replace(&mut self.stages[pos].kind, kind))
    }

    pub fn rename_stage(&mut self, id: StageId, name: impl Into<String>) -> TrainResult<()> {
        let pos = self.position(id)?;
        self.stages[pos].name = name.into();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    fn position(&self, id: StageId) -> TrainResult<usize> {
        self.stages
            .iter()
            .position(|s| s.id == id)
            .ok_or(TrainError::StageNotFound { stage: id })
    }

    /// Validate ordering and configuration, returning an immutable `Train`.
    pub fn build(self) -> TrainResult<Train> {
        validate::validate_structure(&self.stages)?;
        for stage in &self.stages {
            validate::validate_config(stage)?;
        }
        let plant_effluent = self
            .stages
            .iter()
            .position(|s| matches!(s.kind, StageKind::PlantEffluent));

        Ok(Train {
            stages: self.stages,
            plant_effluent,
            next_id: self.next_id,
        })
    }

    pub(crate) fn from_parts(stages: Vec<Stage>, next_id: u32) -> Self {
        Self { stages, next_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::DoseConfig;

    fn head() -> TrainBuilder {
        let mut b = TrainBuilder::new();
        b.add_stage("Raw", StageKind::Influent);
        b
    }

    #[test]
    fn ids_are_sequential() {
        let mut b = TrainBuilder::new();
        let a = b.add_stage("Raw", StageKind::Influent);
        let c = b.add_stage("Cl2", StageKind::Chlorine(DoseConfig::new(1.0)));
        assert_eq!(a.index(), 0);
        assert_eq!(c.index(), 1);
    }

    #[test]
    fn insert_and_remove() {
        let mut b = head();
        let eff = b.add_stage("Effluent", StageKind::PlantEffluent);
        let cl = b
            .insert_stage(1, "Cl2", StageKind::Chlorine(DoseConfig::new(1.0)))
            .unwrap();
        let train = b.build().unwrap();
        assert_eq!(train.stages()[1].id, cl);
        assert_eq!(train.stages()[2].id, eff);

        let mut b = train.into_builder();
        b.remove_stage(cl).unwrap();
        assert_eq!(b.len(), 2);
        assert!(matches!(
            b.remove_stage(cl),
            Err(TrainError::StageNotFound { .. })
        ));
    }

    #[test]
    fn insert_past_end_fails() {
        let mut b = head();
        let err = b
            .insert_stage(5, "x", StageKind::SamplePoint)
            .unwrap_err();
        assert_eq!(err, TrainError::PositionOutOfBounds { position: 5, len: 1 });
    }

    #[test]
    fn replace_keeps_id() {
        let mut b = head();
        let cl = b.add_stage("Cl2", StageKind::Chlorine(DoseConfig::new(1.0)));
        let old = b
            .replace_kind(cl, StageKind::Chlorine(DoseConfig::new(3.0)))
            .unwrap();
        assert_eq!(old.dose(), Some(1.0));
        let train = b.build().unwrap();
        assert_eq!(train.stage(cl).unwrap().kind.dose(), Some(3.0));
    }
}
