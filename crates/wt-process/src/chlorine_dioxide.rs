//! Chlorine dioxide: a one-shot initial demand per dosing event, then
//! first-order decay in each reactor.

use tracing::trace;
use wt_chem::{Disinfectant, WaterQuality};

use crate::correlations::{DecayInputs, RateModel};

/// Fraction of the ClO2 initial demand that appears as chlorite.
pub const CHLORITE_YIELD: f64 = 0.7;

/// Add a ClO2 dose and arm its initial demand.
pub fn dose_chlorine_dioxide(water: &mut WaterQuality, dose: f64) {
    if !(dose > 0.0) {
        return;
    }
    water.chlorine_dioxide += dose;
    water.clo2_dose = dose;
    water.clo2_demand_pending = true;
    water.contact.restart(Disinfectant::ChlorineDioxide);
}

/// Exert the pending initial demand, if armed. Returns the demand, mg/L.
pub fn exert_initial_demand<R: RateModel + ?Sized>(water: &mut WaterQuality, rates: &R) -> f64 {
    if !water.clo2_demand_pending {
        return 0.0;
    }
    water.clo2_demand_pending = false;
    let inputs = DecayInputs {
        temperature_c: water.temperature_c,
        ph: water.ph,
        toc: water.toc,
        uv254: water.uv254,
        dose: water.clo2_dose,
    };
    let demand = rates
        .clo2_demand(&inputs)
        .clamp(0.0, water.chlorine_dioxide.max(0.0));
    water.chlorine_dioxide -= demand;
    // µg/L
    water.byproducts.chlorite += CHLORITE_YIELD * demand * 1000.0;
    trace!(demand, "ClO2 initial demand");
    demand
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlations::EmpiricalRates;
    use wt_chem::{EquilibriumSolver, Influent, OperatingPoint};

    #[test]
    fn demand_is_exerted_once() {
        let mut solver = EquilibriumSolver::new();
        let mut w =
            WaterQuality::from_influent(&Influent::default(), OperatingPoint::Average, &mut solver)
                .unwrap();
        dose_chlorine_dioxide(&mut w, 1.0);
        let first = exert_initial_demand(&mut w, &EmpiricalRates);
        assert!(first > 0.0 && first <= 1.0);
        assert!(w.byproducts.chlorite > 0.0);
        let after = w.chlorine_dioxide;
        assert_eq!(exert_initial_demand(&mut w, &EmpiricalRates), 0.0);
        assert_eq!(w.chlorine_dioxide, after);
    }
}
