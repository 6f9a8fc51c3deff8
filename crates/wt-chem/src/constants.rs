//! Temperature-dependent equilibrium constants (infinite dilution).

use serde::Serialize;
use wt_core::units::constants::KELVIN_OFFSET;

/// Equilibrium constants at one temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EquilibriumConstants {
    /// Temperature the constants were evaluated at (°C).
    pub temperature_c: f64,
    /// Ion product of water.
    pub kw: f64,
    /// First dissociation constant of carbonic acid.
    pub k1: f64,
    /// Second dissociation constant of carbonic acid.
    pub k2: f64,
    /// Hypochlorous acid dissociation constant.
    pub k_hocl: f64,
    /// Ammonium dissociation constant.
    pub k_nh4: f64,
    /// Calcite solubility product.
    pub ksp_caco3: f64,
    /// Brucite (Mg(OH)2) solubility product.
    pub ksp_mgoh2: f64,
}

impl EquilibriumConstants {
    pub fn at(temperature_c: f64) -> Self {
        let t = temperature_c + KELVIN_OFFSET;
        let log_kw = -4470.99 / t + 6.0875 - 0.01706 * t;
        let log_k1 = -3404.71 / t + 14.8435 - 0.032786 * t;
        let log_k2 = -2902.39 / t + 6.4980 - 0.02379 * t;
        let pk_hocl = 3000.0 / t - 10.0686 + 0.0253 * t;
        let pk_nh4 = 0.09018 + 2729.92 / t;
        let log_ksp_caco3 = -171.9065 - 0.077993 * t + 2839.319 / t + 71.595 * t.log10();
        // van't Hoff from 25 °C with a dissolution enthalpy of -2.5 kJ/mol.
        let log_ksp_mgoh2 = -11.16 + 130.6 * (1.0 / t - 1.0 / 298.15);

        Self {
            temperature_c,
            kw: 10f64.powf(log_kw),
            k1: 10f64.powf(log_k1),
            k2: 10f64.powf(log_k2),
            k_hocl: 10f64.powf(-pk_hocl),
            k_nh4: 10f64.powf(-pk_nh4),
            ksp_caco3: 10f64.powf(log_ksp_caco3),
            ksp_mgoh2: 10f64.powf(log_ksp_mgoh2),
        }
    }

    /// Fractions of total carbonate present as HCO3- and CO3-2.
    #[inline]
    pub fn carbonate_alphas(&self, h: f64) -> (f64, f64) {
        let denom = h * h + self.k1 * h + self.k1 * self.k2;
        (self.k1 * h / denom, self.k1 * self.k2 / denom)
    }

    /// Fraction of free chlorine present as OCl-.
    #[inline]
    pub fn hypochlorite_fraction(&self, h: f64) -> f64 {
        self.k_hocl / (h + self.k_hocl)
    }

    /// Fraction of total ammonia present as NH4+.
    #[inline]
    pub fn ammonium_fraction(&self, h: f64) -> f64 {
        h / (h + self.k_nh4)
    }
}
