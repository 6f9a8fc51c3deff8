//! Physical and sorptive removal of organics, bromide, hardness, and
//! particles.

use wt_chem::WaterQuality;
use wt_chem::species::mw;
use wt_core::Bounds;
use wt_train::{GacConfig, NanofiltrationConfig};

/// Metal-salt coagulants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coagulant {
    /// Al2(SO4)3·14H2O
    Alum,
    /// FeCl3
    FerricChloride,
    /// Fe2(SO4)3
    FerricSulfate,
}

/// Langmuir affinity, L/mg DOC.
const LANGMUIR_B: f64 = 0.147;
const COAGULATION_PH: Bounds = Bounds::new(5.5, 8.5);
const NON_SORBABLE_FRACTION: Bounds = Bounds::new(0.1, 0.9);

impl Coagulant {
    /// Metal added, mmol/L, for a product dose in mg/L.
    pub fn metal_mmol(self, dose: f64) -> f64 {
        let (weight, metal_per_mol) = match self {
            Coagulant::Alum => (mw::ALUM, 2.0),
            Coagulant::FerricChloride => (mw::FERRIC_CHLORIDE, 1.0),
            Coagulant::FerricSulfate => (mw::FERRIC_SULFATE, 2.0),
        };
        dose.max(0.0) / weight * metal_per_mol
    }

    /// Maximum sorption capacity, mg DOC per mmol metal.
    pub fn capacity(self, ph: f64) -> f64 {
        let ph = COAGULATION_PH.apply(ph);
        let a = match self {
            Coagulant::Alum => 4.91 * ph.powi(3) - 74.2 * ph.powi(2) + 284.0 * ph,
            Coagulant::FerricChloride | Coagulant::FerricSulfate => {
                1.91 * ph.powi(3) - 22.2 * ph.powi(2) + 70.1 * ph
            }
        };
        a.max(0.0)
    }
}

/// Enhanced coagulation by Langmuir sorption of the sorbable TOC fraction.
/// UV254 falls in proportion to TOC. Returns the TOC removed, mg/L.
pub fn coagulate(water: &mut WaterQuality, coagulant: Coagulant, dose: f64) -> f64 {
    let toc_in = water.toc;
    let metal = coagulant.metal_mmol(dose);
    if toc_in <= 0.0 || metal <= 0.0 {
        return 0.0;
    }

    let non_sorbable = NON_SORBABLE_FRACTION.apply(0.56 - 0.075 * water.suva);
    let sorbable_in = toc_in * (1.0 - non_sorbable);
    let a = coagulant.capacity(water.ph);

    // b C^2 + (1 + a b M - b C0) C - C0 = 0
    let b = LANGMUIR_B;
    let q = 1.0 + a * b * metal - b * sorbable_in;
    let sorbable_out = (-q + (q * q + 4.0 * b * sorbable_in).sqrt()) / (2.0 * b);
    let sorbable_out = sorbable_out.clamp(0.0, sorbable_in);

    let toc_out = toc_in * non_sorbable + sorbable_out;
    scale_organics(water, toc_out / toc_in);
    toc_in - toc_out
}

/// GAC adsorption with configured removal fractions.
pub fn adsorb_gac(water: &mut WaterQuality, gac: &GacConfig) {
    water.toc *= 1.0 - gac.toc_removal;
    water.uv254 *= 1.0 - gac.uv_removal;
}

/// Nanofiltration rejection of organics, bromide, and hardness.
pub fn nanofilter(water: &mut WaterQuality, nf: &NanofiltrationConfig) {
    scale_organics(water, 1.0 - nf.toc_rejection);
    water.bromide *= 1.0 - nf.bromide_rejection;
    water.calcium *= 1.0 - nf.hardness_rejection;
    water.magnesium *= 1.0 - nf.hardness_rejection;
    water.turbidity = water.turbidity.min(0.05);
}

/// TOC fraction removed by a biologically active filter after ozone.
pub const BIOFILTER_TOC_REMOVAL: f64 = 0.15;
pub const BIOFILTER_UV_REMOVAL: f64 = 0.05;

pub fn biofilter(water: &mut WaterQuality) {
    water.toc *= 1.0 - BIOFILTER_TOC_REMOVAL;
    water.uv254 *= 1.0 - BIOFILTER_UV_REMOVAL;
}

/// TOC removal per mg/L of powdered carbon, capped.
const PAC_REMOVAL_PER_MG: f64 = 0.008;
const PAC_MAX_REMOVAL: f64 = 0.5;

pub fn adsorb_pac(water: &mut WaterQuality, dose: f64) {
    let removal = (PAC_REMOVAL_PER_MG * dose.max(0.0)).min(PAC_MAX_REMOVAL);
    scale_organics(water, 1.0 - removal);
}

/// Turbidity after a clarifier.
pub fn settle(water: &mut WaterQuality, coagulated: bool) {
    water.turbidity *= if coagulated { 0.2 } else { 0.7 };
}

/// Turbidity after granular media filtration.
pub fn filter(water: &mut WaterQuality, coagulated: bool) {
    water.turbidity = if coagulated {
        water.turbidity.min(0.1)
    } else {
        water.turbidity * 0.5
    };
}

/// Membrane filtrate turbidity.
pub fn membrane_filter(water: &mut WaterQuality) {
    water.turbidity = water.turbidity.min(0.05);
}

fn scale_organics(water: &mut WaterQuality, factor: f64) {
    let factor = factor.clamp(0.0, 1.0);
    water.toc *= factor;
    water.uv254 *= factor;
}
