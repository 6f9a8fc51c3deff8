//! Disinfectant decay through a discretized basin.
//!
//! Each basin is split into the reactor count given by the cascade chart.
//! Every slice first applies breakpoint chemistry, then decays each
//! disinfectant over the slice's mean residence time:
//!
//! - free chlorine and chloramine: saturation kinetics, closed-form CSTR
//! - chlorine dioxide: pending initial demand, then first-order CSTR
//! - ozone: first-order CSTR with trapezoidal CT
//!
//! Chlorine, chloramine, and ClO2 residuals below the detection limit are
//! set to zero; ozone is carried down to its own residual. A disinfectant's
//! contact clock only runs while its residual is positive.

use tracing::trace;
use wt_chem::{Disinfectant, WaterQuality};

use crate::breakpoint::apply_breakpoint;
use crate::cascade::Cascade;
use crate::chlorine_dioxide::exert_initial_demand;
use crate::correlations::{DecayInputs, RateModel, SaturationRate, WaterMatrix};
use crate::ozone::{first_order_cstr, trapezoid_ct};

/// Residuals below this, mg/L, are reported as zero.
pub const DETECTION_LIMIT: f64 = 0.1;

/// Outlet of one ideal reactor under `dC/dt = -k2 C / (k1 + C)`.
///
/// Positive root of `C^2 + (k1 + tau k2 - Cin) C - Cin k1 = 0`.
pub fn saturation_cstr(c_in: f64, rate: SaturationRate, minutes: f64) -> f64 {
    if !(c_in > 0.0) {
        return 0.0;
    }
    let b = rate.k1 + minutes.max(0.0) * rate.k2 - c_in;
    let c = c_in * rate.k1;
    let disc = (b * b + 4.0 * c).sqrt();
    if b > 0.0 {
        2.0 * c / (b + disc)
    } else {
        (disc - b) / 2.0
    }
}

fn detect(c: f64) -> f64 {
    if c < DETECTION_LIMIT { 0.0 } else { c }
}

/// CT delivered by each disinfectant in one slice, mg·min/L.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SliceStep {
    pub index: usize,
    /// Mean residence of the slice, minutes.
    pub minutes: f64,
    /// T10 contact time of the slice, minutes.
    pub t10_minutes: f64,
    pub free_chlorine_ct: f64,
    pub chloramine_ct: f64,
    pub chlorine_dioxide_ct: f64,
    pub ozone_ct: f64,
}

impl SliceStep {
    pub fn ct(&self, disinfectant: Disinfectant) -> f64 {
        match disinfectant {
            Disinfectant::FreeChlorine => self.free_chlorine_ct,
            Disinfectant::Chloramine => self.chloramine_ct,
            Disinfectant::ChlorineDioxide => self.chlorine_dioxide_ct,
            Disinfectant::Ozone => self.ozone_ct,
        }
    }

    fn slot(&mut self, disinfectant: Disinfectant) -> &mut f64 {
        match disinfectant {
            Disinfectant::FreeChlorine => &mut self.free_chlorine_ct,
            Disinfectant::Chloramine => &mut self.chloramine_ct,
            Disinfectant::ChlorineDioxide => &mut self.chlorine_dioxide_ct,
            Disinfectant::Ozone => &mut self.ozone_ct,
        }
    }
}

/// Summary of one basin pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BasinOutcome {
    pub reactors: usize,
    pub total: SliceStep,
}

/// Slice-by-slice decay of every disinfectant through a basin.
pub struct DecayEngine<'r, R: RateModel + ?Sized> {
    rates: &'r R,
    matrix: WaterMatrix,
}

impl<'r, R: RateModel + ?Sized> DecayEngine<'r, R> {
    pub fn new(rates: &'r R, matrix: WaterMatrix) -> Self {
        Self { rates, matrix }
    }

    /// Run the basin. `on_slice` sees the water after each slice together
    /// with the CT that slice delivered.
    pub fn run_basin<F>(
        &self,
        water: &mut WaterQuality,
        cascade: &Cascade,
        mut on_slice: F,
    ) -> BasinOutcome
    where
        F: FnMut(&mut WaterQuality, &SliceStep),
    {
        let mut outcome = BasinOutcome {
            reactors: cascade.reactors,
            total: SliceStep::default(),
        };
        for index in 0..cascade.reactors {
            let step = self.run_slice(water, index, cascade);
            on_slice(water, &step);
            outcome.total.minutes += step.minutes;
            outcome.total.t10_minutes += step.t10_minutes;
            for d in Disinfectant::ALL {
                *outcome.total.slot(d) += step.ct(d);
            }
        }
        outcome
    }

    fn run_slice(&self, water: &mut WaterQuality, index: usize, cascade: &Cascade) -> SliceStep {
        let tau = cascade.slice_minutes;
        let t10 = cascade.slice_t10_minutes;
        let mut step = SliceStep {
            index,
            minutes: tau,
            t10_minutes: t10,
            ..SliceStep::default()
        };

        if water.free_chlorine > 0.0 {
            let shift = apply_breakpoint(water);
            if shift.monochloramine_formed > 0.0 {
                water.contact.restart(Disinfectant::Chloramine);
            }
        }

        let c = water.free_chlorine;
        if c > 0.0 {
            let rate = self.rates.free_chlorine(self.matrix, &self.inputs(water, c));
            water.free_chlorine = detect(saturation_cstr(c, rate, tau));
            step.free_chlorine_ct = water.free_chlorine * t10;
        }

        let c = water.chloramine;
        if c > 0.0 {
            let rate = self.rates.chloramine(self.matrix, &self.inputs(water, c));
            water.chloramine = detect(saturation_cstr(c, rate, tau));
            step.chloramine_ct = water.chloramine * t10;
        }

        if water.clo2_demand_pending && water.chlorine_dioxide > 0.0 {
            exert_initial_demand(water, self.rates);
        }
        let c = water.chlorine_dioxide;
        if c > 0.0 {
            let k = self.rates.clo2_decay(&self.inputs(water, c));
            water.chlorine_dioxide = detect(first_order_cstr(c, k, tau));
            step.chlorine_dioxide_ct = water.chlorine_dioxide * t10;
        }

        let c = water.ozone;
        if c > 0.0 {
            let k = self.rates.ozone_decay(&self.inputs(water, water.ozone_dose));
            water.ozone = first_order_cstr(c, k, tau);
            step.ozone_ct = trapezoid_ct(c, water.ozone, t10);
        }

        for d in Disinfectant::ALL {
            if water.residual(d) > 0.0 {
                water.contact.advance(d, tau);
            }
        }

        trace!(
            slice = index,
            free_chlorine = water.free_chlorine,
            chloramine = water.chloramine,
            chlorine_dioxide = water.chlorine_dioxide,
            ozone = water.ozone,
            "decay slice"
        );
        step
    }

    fn inputs(&self, water: &WaterQuality, dose: f64) -> DecayInputs {
        DecayInputs {
            temperature_c: water.temperature_c,
            ph: water.ph,
            toc: water.toc,
            uv254: water.uv254,
            dose,
        }
    }
}
