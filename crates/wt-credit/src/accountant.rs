//! Records disinfection steps into the water's ledger.

use wt_chem::{CreditRequirement, Disinfectant, Pathogen, PerPathogen, WaterQuality};
use wt_process::SliceStep;

use crate::ct_tables::{CtConditions, ct_required};

/// Converts CT delivered by the decay engine into credit.
///
/// Each step's CT-required is evaluated at the water's temperature and pH
/// after the step and at the disinfectant's residual, for the full log
/// requirement still owed to that pathogen. The ledger sums the resulting
/// ratios additively across steps and chemistries.
#[derive(Debug, Clone, Copy, Default)]
pub struct CtAccountant;

impl CtAccountant {
    pub fn new() -> Self {
        Self
    }

    /// Record `ct` (mg·min/L) delivered by one disinfectant. Returns the ratio
    /// increment added for each pathogen.
    pub fn record(
        &self,
        water: &mut WaterQuality,
        disinfectant: Disinfectant,
        ct: f64,
    ) -> PerPathogen<f64> {
        let mut added = PerPathogen::default();
        if !(ct > 0.0) {
            return added;
        }
        water.ledger.add_disinfectant_ct(disinfectant, ct);
        let cond = CtConditions {
            temperature_c: water.temperature_c,
            ph: water.ph,
            concentration: water.residual(disinfectant),
        };
        for pathogen in Pathogen::ALL {
            if let CreditRequirement::Remaining(logs) = water.ledger.requirement(pathogen) {
                let required = ct_required(disinfectant, pathogen, &cond, logs);
                *added.get_mut(pathogen) = water.ledger.add_step(pathogen, ct, required);
            }
        }
        added
    }

    /// Record every disinfectant's CT from one decay slice.
    pub fn record_slice(&self, water: &mut WaterQuality, step: &SliceStep) {
        for disinfectant in Disinfectant::ALL {
            self.record(water, disinfectant, step.ct(disinfectant));
        }
    }
}
