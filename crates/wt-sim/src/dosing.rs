//! Chemical-dosing seam and its stoichiometric default.
//!
//! Doses are mg/L of the product as fed, except chlorine (as Cl2) and
//! ammonia (as N). Each chemical adds species and shifts the residual
//! strong-ion charge term by its acid (-) or base (+) equivalents.

use tracing::trace;
use wt_chem::species::{mg_l_to_mol, mol_to_mg_l, mw};
use wt_chem::{Disinfectant, Influent, WaterQuality};
use wt_process::apply_breakpoint;
use wt_process::chlorine_dioxide::dose_chlorine_dioxide;
use wt_train::StageKind;

use crate::context::RunContext;

/// Applies a dosing stage's chemical to the water before dispatch.
///
/// `ctx` has already observed the stage, so its flags include this dose.
pub trait ChemicalDosing {
    fn dose(
        &self,
        kind: &StageKind,
        ctx: &RunContext,
        influent: &Influent,
        water: &mut WaterQuality,
    );
}

/// Stoichiometric dose bookkeeping.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoichiometricDosing;

impl StoichiometricDosing {
    fn add_free_chlorine(water: &mut WaterQuality, dose: f64, base_eq_per_mol: f64) {
        let mol = mg_l_to_mol(dose, mw::CHLORINE);
        water.free_chlorine += dose;
        water.other_ions += base_eq_per_mol * mol;
        water.contact.restart(Disinfectant::FreeChlorine);
        Self::combine(water);
    }

    fn add_ammonia(water: &mut WaterQuality, nitrogen_mg_l: f64) {
        water.ammonia_n += nitrogen_mg_l;
        Self::combine(water);
    }

    fn combine(water: &mut WaterQuality) {
        let shift = apply_breakpoint(water);
        if shift.monochloramine_formed > 0.0 {
            water.contact.restart(Disinfectant::Chloramine);
        }
    }
}

impl ChemicalDosing for StoichiometricDosing {
    fn dose(&self, kind: &StageKind, _: &RunContext, _: &Influent, water: &mut WaterQuality) {
        let Some(dose) = kind.dose().filter(|d| *d > 0.0) else {
            return;
        };
        match kind {
            StageKind::Chlorine(_) => Self::add_free_chlorine(water, dose, -1.0),
            StageKind::Hypochlorite(_) => Self::add_free_chlorine(water, dose, 1.0),
            StageKind::Ammonia(_) => Self::add_ammonia(water, dose),
            StageKind::AmmoniumSulfate(_) => {
                let mol = mg_l_to_mol(dose, mw::AMMONIUM_SULFATE);
                water.other_ions -= 2.0 * mol;
                Self::add_ammonia(water, mol_to_mg_l(2.0 * mol, mw::NITROGEN));
            }
            StageKind::ChlorineDioxide(_) => dose_chlorine_dioxide(water, dose),
            StageKind::Alum(_) => {
                water.other_ions -= 6.0 * mg_l_to_mol(dose, mw::ALUM);
                water.coagulant_dose = dose;
            }
            StageKind::FerricChloride(_) => {
                water.other_ions -= 3.0 * mg_l_to_mol(dose, mw::FERRIC_CHLORIDE);
                water.coagulant_dose = dose;
            }
            StageKind::FerricSulfate(_) => {
                water.other_ions -= 6.0 * mg_l_to_mol(dose, mw::FERRIC_SULFATE);
                water.coagulant_dose = dose;
            }
            StageKind::SulfuricAcid(_) => {
                water.other_ions -= 2.0 * mg_l_to_mol(dose, mw::SULFURIC_ACID);
            }
            StageKind::HydrochloricAcid(_) => {
                water.other_ions -= mg_l_to_mol(dose, mw::HYDROCHLORIC_ACID);
            }
            StageKind::CausticSoda(_) => {
                water.other_ions += mg_l_to_mol(dose, mw::CAUSTIC_SODA);
            }
            StageKind::Lime(_) => {
                let mol = mg_l_to_mol(dose, mw::LIME);
                water.calcium += mol_to_mg_l(mol, mw::CALCIUM);
            }
            StageKind::SodaAsh(_) => {
                let mol = mg_l_to_mol(dose, mw::SODA_ASH);
                water.other_ions += 2.0 * mol;
                water.carbonate_total += mol;
            }
            StageKind::CarbonDioxide(_) => {
                water.carbonate_total += mg_l_to_mol(dose, mw::CARBON_DIOXIDE);
            }
            // KMnO4 is charge-neutral; carbon and polymer add no ions.
            StageKind::Permanganate(_) | StageKind::PowderedCarbon(_) | StageKind::Polymer(_) => {}
            _ => return,
        }
        trace!(stage = kind.label(), dose, "dosed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wt_chem::{EquilibriumSolver, OperatingPoint};
    use wt_train::{DoseConfig, LimeConfig, TrainBuilder};

    fn water() -> WaterQuality {
        let mut solver = EquilibriumSolver::new();
        WaterQuality::from_influent(&Influent::default(), OperatingPoint::Average, &mut solver)
            .unwrap()
    }

    fn dose(kind: &StageKind, water: &mut WaterQuality) {
        let influent = Influent::default();
        let mut b = TrainBuilder::new();
        b.add_stage("Raw", StageKind::Influent);
        let train = b.build().unwrap();
        let ctx = RunContext::new(&train, &influent, OperatingPoint::Average);
        StoichiometricDosing.dose(kind, &ctx, &influent, water);
    }

    #[test]
    fn chlorine_gas_is_acidic_hypochlorite_basic() {
        let mut a = water();
        let mut b = water();
        let base = a.other_ions;
        dose(&StageKind::Chlorine(DoseConfig::new(2.0)), &mut a);
        dose(&StageKind::Hypochlorite(DoseConfig::new(2.0)), &mut b);
        assert_eq!(a.free_chlorine, 2.0);
        assert!(a.other_ions < base);
        assert!(b.other_ions > base);
    }

    #[test]
    fn dose_restarts_clock() {
        let mut w = water();
        w.contact.free_chlorine = 90.0;
        dose(&StageKind::Chlorine(DoseConfig::new(1.0)), &mut w);
        assert_eq!(w.contact.free_chlorine, 0.0);
    }

    #[test]
    fn ammonia_after_chlorine_forms_chloramine() {
        let mut w = water();
        dose(&StageKind::Chlorine(DoseConfig::new(3.0)), &mut w);
        w.contact.chloramine = 15.0;
        dose(&StageKind::Ammonia(DoseConfig::new(1.0)), &mut w);
        assert_eq!(w.free_chlorine, 0.0);
        assert!((w.chloramine - 3.0).abs() < 1e-9);
        assert_eq!(w.contact.chloramine, 0.0);
    }

    #[test]
    fn alum_consumes_base() {
        let mut w = water();
        let base = w.other_ions;
        dose(&StageKind::Alum(DoseConfig::new(59.44)), &mut w);
        assert!((base - w.other_ions - 6.0e-4).abs() < 1e-12);
        assert_eq!(w.coagulant_dose, 59.44);
    }

    #[test]
    fn lime_adds_calcium() {
        let mut w = water();
        let ca = w.calcium;
        let lime = StageKind::Lime(LimeConfig {
            dose: 74.093,
            softening: true,
        });
        dose(&lime, &mut w);
        assert!((w.calcium - ca - 40.078).abs() < 1e-9);
    }

    #[test]
    fn physical_stage_is_ignored() {
        let mut w = water();
        let snapshot = w.clone();
        dose(&StageKind::SamplePoint, &mut w);
        assert_eq!(w, snapshot);
    }
}
