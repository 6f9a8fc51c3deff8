//! Empirical disinfectant rate correlations.
//!
//! Every correlation clamps its inputs to the fitted range before any power
//! or exponential is evaluated, so out-of-range water (0 °C, TOC of zero,
//! negative UV) still produces a finite rate.

/// Water-matrix flag selecting the raw or treated-water fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaterMatrix {
    #[default]
    Raw,
    Treated,
}

/// Water conditions seen by a correlation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayInputs {
    pub temperature_c: f64,
    pub ph: f64,
    pub toc: f64,
    pub uv254: f64,
    /// Applied or inlet concentration of the disinfectant, mg/L.
    pub dose: f64,
}

/// Parameters of `dC/dt = -k2 C / (k1 + C)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturationRate {
    /// Half-saturation concentration, mg/L.
    pub k1: f64,
    /// Maximum decay rate, mg/L/min.
    pub k2: f64,
}

/// Rate models used by the decay engine.
pub trait RateModel {
    fn free_chlorine(&self, matrix: WaterMatrix, inputs: &DecayInputs) -> SaturationRate;

    fn chloramine(&self, matrix: WaterMatrix, inputs: &DecayInputs) -> SaturationRate;

    /// Instantaneous ozone demand, mg/L, never more than the dose.
    fn ozone_demand(&self, inputs: &DecayInputs) -> f64;

    /// First-order ozone decay rate, 1/min.
    fn ozone_decay(&self, inputs: &DecayInputs) -> f64;

    /// Initial ClO2 demand exerted once per dosing event, mg/L.
    fn clo2_demand(&self, inputs: &DecayInputs) -> f64;

    /// First-order ClO2 decay rate after the initial demand, 1/min.
    fn clo2_decay(&self, inputs: &DecayInputs) -> f64;
}

/// Input ranges for the chlorine and chloramine fits.
pub mod chlorine_bounds {
    use wt_core::Bounds;

    pub const TEMPERATURE_C: Bounds = Bounds::new(1.0, 30.0);
    pub const TOC: Bounds = Bounds::new(0.5, 20.0);
    pub const UV254: Bounds = Bounds::new(0.005, 0.5);
    pub const DOSE: Bounds = Bounds::new(0.5, 20.0);
}

/// Input ranges for the ozone fits.
pub mod ozone_bounds {
    use wt_core::Bounds;

    pub const PH: Bounds = Bounds::new(6.0, 9.5);
    pub const TOC: Bounds = Bounds::new(1.0, 10.0);
    pub const TEMPERATURE_C: Bounds = Bounds::new(4.0, 30.0);
}

/// Input ranges for the chlorine dioxide fits.
pub mod clo2_bounds {
    use wt_core::Bounds;

    pub const TEMPERATURE_C: Bounds = Bounds::new(4.3, 30.0);
    pub const UV254: Bounds = Bounds::new(0.01, 0.5);
    pub const TOC: Bounds = Bounds::new(0.5, 20.0);
}

/// Default empirical fits.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmpiricalRates;

fn arrhenius(theta_per_c: f64, temperature_c: f64) -> f64 {
    (theta_per_c * (temperature_c - 20.0)).exp()
}

fn nonneg(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

impl RateModel for EmpiricalRates {
    fn free_chlorine(&self, matrix: WaterMatrix, inputs: &DecayInputs) -> SaturationRate {
        use chlorine_bounds::*;
        let t = TEMPERATURE_C.apply(inputs.temperature_c);
        let toc = TOC.apply(inputs.toc);
        let uv = UV254.apply(inputs.uv254);
        let dose = DOSE.apply(inputs.dose);
        let temp = arrhenius(0.05, t);
        match matrix {
            WaterMatrix::Raw => SaturationRate {
                k1: 1.8 * dose.powf(0.5),
                k2: 0.022 * toc.powf(0.75) * uv.powf(0.25) * temp,
            },
            WaterMatrix::Treated => SaturationRate {
                k1: 2.3 * dose.powf(0.5),
                k2: 0.0125 * toc.powf(0.70) * uv.powf(0.20) * temp,
            },
        }
    }

    fn chloramine(&self, matrix: WaterMatrix, inputs: &DecayInputs) -> SaturationRate {
        use chlorine_bounds::*;
        let t = TEMPERATURE_C.apply(inputs.temperature_c);
        let toc = TOC.apply(inputs.toc);
        let temp = arrhenius(0.04, t);
        match matrix {
            WaterMatrix::Raw => SaturationRate {
                k1: 3.5,
                k2: 0.003 * toc.powf(0.6) * temp,
            },
            WaterMatrix::Treated => SaturationRate {
                k1: 3.5,
                k2: 0.0018 * toc.powf(0.6) * temp,
            },
        }
    }

    fn ozone_demand(&self, inputs: &DecayInputs) -> f64 {
        use ozone_bounds::*;
        let dose = nonneg(inputs.dose);
        if dose == 0.0 {
            return 0.0;
        }
        let toc = TOC.apply(inputs.toc);
        (0.22 * toc.powf(0.65) * dose.powf(0.55)).min(dose)
    }

    fn ozone_decay(&self, inputs: &DecayInputs) -> f64 {
        use ozone_bounds::*;
        let ph = PH.apply(inputs.ph);
        let toc = TOC.apply(inputs.toc);
        let t = TEMPERATURE_C.apply(inputs.temperature_c);
        0.07 * toc.powf(0.6) * arrhenius(0.07, t) * 10f64.powf(0.25 * (ph - 7.5))
    }

    fn clo2_demand(&self, inputs: &DecayInputs) -> f64 {
        use clo2_bounds::*;
        let dose = nonneg(inputs.dose);
        if dose == 0.0 {
            return 0.0;
        }
        let t = TEMPERATURE_C.apply(inputs.temperature_c);
        let uv = UV254.apply(inputs.uv254);
        let toc = TOC.apply(inputs.toc);
        let demand =
            0.36 * dose.powf(0.87) * toc.powf(0.25) * (100.0 * uv).powf(0.1) * arrhenius(0.02, t);
        demand.min(dose)
    }

    fn clo2_decay(&self, inputs: &DecayInputs) -> f64 {
        use clo2_bounds::*;
        let t = TEMPERATURE_C.apply(inputs.temperature_c);
        let toc = TOC.apply(inputs.toc);
        0.0075 * toc.powf(0.4) * arrhenius(0.03, t)
    }
}
