//! Molecular weights and mass/molar conversions for dissolved species.
//!
//! Water-quality fields are kept in plant units (mg/L, mg/L as CaCO3,
//! mg/L as N, µg/L); the equilibrium solver works in mol/L and eq/L.

/// Molecular (or formula) weights in g/mol.
pub mod mw {
    pub const CALCIUM: f64 = 40.078;
    pub const MAGNESIUM: f64 = 24.305;
    pub const NITROGEN: f64 = 14.007;
    pub const CHLORINE: f64 = 70.906;
    pub const CACO3: f64 = 100.087;
    pub const MGOH2: f64 = 58.320;
    pub const ALUM: f64 = 594.4;
    pub const FERRIC_CHLORIDE: f64 = 162.2;
    pub const FERRIC_SULFATE: f64 = 399.9;
    pub const SULFURIC_ACID: f64 = 98.079;
    pub const HYDROCHLORIC_ACID: f64 = 36.461;
    pub const CAUSTIC_SODA: f64 = 39.997;
    pub const LIME: f64 = 74.093;
    pub const SODA_ASH: f64 = 105.989;
    pub const CARBON_DIOXIDE: f64 = 44.010;
    pub const AMMONIUM_SULFATE: f64 = 132.14;
    pub const PERMANGANATE: f64 = 158.034;
}

/// Equivalent weight of CaCO3 (g/eq), used for alkalinity and hardness.
pub const CACO3_EQ_WEIGHT: f64 = mw::CACO3 / 2.0;

#[inline]
pub fn mg_l_to_mol(mg_l: f64, molecular_weight: f64) -> f64 {
    mg_l / (1_000.0 * molecular_weight)
}

#[inline]
pub fn mol_to_mg_l(mol: f64, molecular_weight: f64) -> f64 {
    mol * 1_000.0 * molecular_weight
}

/// mg/L as CaCO3 to eq/L.
#[inline]
pub fn caco3_to_eq(mg_l: f64) -> f64 {
    mg_l / (1_000.0 * CACO3_EQ_WEIGHT)
}

/// eq/L to mg/L as CaCO3.
#[inline]
pub fn eq_to_caco3(eq: f64) -> f64 {
    eq * 1_000.0 * CACO3_EQ_WEIGHT
}

/// Hardness in mg/L as CaCO3 to the cation concentration in mg/L.
#[inline]
pub fn hardness_to_cation_mg_l(hardness_caco3: f64, cation_mw: f64) -> f64 {
    hardness_caco3 * cation_mw / mw::CACO3
}

/// Cation concentration in mg/L to hardness in mg/L as CaCO3.
#[inline]
pub fn cation_mg_l_to_hardness(mg_l: f64, cation_mw: f64) -> f64 {
    mg_l * mw::CACO3 / cation_mw
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alkalinity_round_trip() {
        let eq = caco3_to_eq(100.0);
        assert!((eq - 0.001_998).abs() < 1e-6);
        assert!((eq_to_caco3(eq) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn calcium_hardness_conversion() {
        // 100 mg/L as CaCO3 of calcium hardness is about 40 mg/L Ca.
        let ca = hardness_to_cation_mg_l(100.0, mw::CALCIUM);
        assert!((ca - 40.04).abs() < 0.01);
        assert!((cation_mg_l_to_hardness(ca, mw::CALCIUM) - 100.0).abs() < 1e-9);
    }
}
