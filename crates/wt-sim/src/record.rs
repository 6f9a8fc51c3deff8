//! Run records and the reporting seam.

use serde::Serialize;
use wt_chem::{OperatingPoint, PerPathogen, WaterQuality};
use wt_core::StageId;

use crate::context::RunContext;

/// Water quality after one stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageRecord {
    pub id: StageId,
    pub name: String,
    pub kind: &'static str,
    pub water: WaterQuality,
}

/// Ordered stage snapshots from one complete pass.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub point: OperatingPoint,
    pub stages: Vec<StageRecord>,
    /// Index into `stages` of the plant-effluent sample point.
    pub plant_effluent: Option<usize>,
    pub context: RunContext,
}

impl RunRecord {
    /// The last stage; its ledger holds the train's final CT ratios.
    pub fn tail(&self) -> Option<&StageRecord> {
        self.stages.last()
    }

    pub fn plant_effluent(&self) -> Option<&StageRecord> {
        self.plant_effluent.and_then(|i| self.stages.get(i))
    }

    pub fn stage(&self, id: StageId) -> Option<&StageRecord> {
        self.stages.iter().find(|s| s.id == id)
    }

    /// Final CT ratios per pathogen (`None` where not applicable).
    pub fn ct_ratios(&self) -> PerPathogen<Option<f64>> {
        self.tail()
            .map(|s| s.water.ledger.ct_ratios())
            .unwrap_or_default()
    }

    pub fn final_water(&self) -> Option<&WaterQuality> {
        self.tail().map(|s| &s.water)
    }
}

/// Receives completed records read-only.
pub trait RunReporter {
    type Error;

    fn report(&mut self, record: &RunRecord) -> Result<(), Self::Error>;
}
