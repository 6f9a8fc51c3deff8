//! Ozone contacting: instantaneous demand, then first-order decay per slice.

use wt_chem::{Disinfectant, WaterQuality};

use crate::correlations::{DecayInputs, RateModel};

/// Apply an ozone dose at a contactor inlet. Returns the demand exerted.
pub fn dose_ozone<R: RateModel + ?Sized>(water: &mut WaterQuality, dose: f64, rates: &R) -> f64 {
    if !(dose > 0.0) {
        return 0.0;
    }
    let inputs = DecayInputs {
        temperature_c: water.temperature_c,
        ph: water.ph,
        toc: water.toc,
        uv254: water.uv254,
        dose,
    };
    let demand = rates.ozone_demand(&inputs).clamp(0.0, dose);
    water.ozone_dose = dose;
    water.ozone += dose - demand;
    water.contact.restart(Disinfectant::Ozone);
    demand
}

/// Outlet of one ideal reactor with first-order decay `k` (1/min).
pub fn first_order_cstr(c_in: f64, k: f64, minutes: f64) -> f64 {
    c_in / (1.0 + k.max(0.0) * minutes.max(0.0))
}

/// Trapezoidal CT over one slice, mg·min/L.
pub fn trapezoid_ct(c_in: f64, c_out: f64, t10_minutes: f64) -> f64 {
    0.5 * (c_in + c_out) * t10_minutes.max(0.0)
}
