//! Water-quality state carried through the train.
//!
//! Each stage receives a copy of the previous stage's state, mutates its own
//! copy, and hands it on. The cumulative parts (contact clock, disinfection
//! ledger, byproducts) only grow.

use crate::equilibrium::{EquilibriumInput, EquilibriumMode, EquilibriumOutcome, EquilibriumSolver};
use crate::error::ChemResult;
use crate::influent::{Influent, OperatingPoint};
use crate::ledger::{Disinfectant, DisinfectionLedger};
use crate::species::{self, mw};
use serde::{Deserialize, Serialize};

/// Minutes elapsed since the last dosing event of each disinfectant, plus
/// cumulative plant residence time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactClock {
    pub free_chlorine: f64,
    pub chloramine: f64,
    pub chlorine_dioxide: f64,
    pub ozone: f64,
    /// Sum of mean residence times, minutes.
    pub residence: f64,
    /// Sum of T10 contact times, minutes.
    pub t10: f64,
}

impl ContactClock {
    pub fn since(&self, disinfectant: Disinfectant) -> f64 {
        match disinfectant {
            Disinfectant::FreeChlorine => self.free_chlorine,
            Disinfectant::Chloramine => self.chloramine,
            Disinfectant::ChlorineDioxide => self.chlorine_dioxide,
            Disinfectant::Ozone => self.ozone,
        }
    }

    pub fn advance(&mut self, disinfectant: Disinfectant, minutes: f64) {
        if minutes > 0.0 {
            *self.slot(disinfectant) += minutes;
        }
    }

    /// Restart a disinfectant's clock at a dosing event.
    pub fn restart(&mut self, disinfectant: Disinfectant) {
        *self.slot(disinfectant) = 0.0;
    }

    fn slot(&mut self, disinfectant: Disinfectant) -> &mut f64 {
        match disinfectant {
            Disinfectant::FreeChlorine => &mut self.free_chlorine,
            Disinfectant::Chloramine => &mut self.chloramine,
            Disinfectant::ChlorineDioxide => &mut self.chlorine_dioxide,
            Disinfectant::Ozone => &mut self.ozone,
        }
    }
}

/// Disinfection byproducts, µg/L.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Byproducts {
    pub tthm: f64,
    pub haa5: f64,
    pub bromate: f64,
    pub chlorite: f64,
    pub chlorate: f64,
}

impl Byproducts {
    /// Add increments; negative increments are ignored.
    pub fn accumulate(&mut self, delta: &Byproducts) {
        self.tthm += delta.tthm.max(0.0);
        self.haa5 += delta.haa5.max(0.0);
        self.bromate += delta.bromate.max(0.0);
        self.chlorite += delta.chlorite.max(0.0);
        self.chlorate += delta.chlorate.max(0.0);
    }
}

/// Water quality after a stage ("effluent" of that stage).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterQuality {
    /// °C.
    pub temperature_c: f64,
    pub ph: f64,
    /// mg/L.
    pub toc: f64,
    /// 1/cm.
    pub uv254: f64,
    /// L/(mg·m), UV254 / TOC × 100.
    pub suva: f64,
    /// mg/L as CaCO3.
    pub alkalinity: f64,
    /// mg/L.
    pub calcium: f64,
    /// mg/L.
    pub magnesium: f64,
    /// mg/L as N.
    pub ammonia_n: f64,
    /// mg/L as Cl2.
    pub free_chlorine: f64,
    /// mg/L as Cl2.
    pub chloramine: f64,
    /// mg/L.
    pub chlorine_dioxide: f64,
    /// mg/L.
    pub ozone: f64,
    /// µg/L.
    pub bromide: f64,
    /// NTU.
    pub turbidity: f64,
    /// Total carbonate, mol/L.
    pub carbonate_total: f64,
    /// Net strong cations minus strong anions, eq/L.
    pub other_ions: f64,
    /// Cumulative precipitated CaCO3, mg/L.
    pub caco3_solids: f64,
    /// Cumulative precipitated Mg(OH)2, mg/L.
    pub mgoh2_solids: f64,
    /// Most recent coagulant dose, mg/L.
    pub coagulant_dose: f64,
    /// Most recent ozone dose, mg/L.
    pub ozone_dose: f64,
    /// ClO2 dosed but its initial demand not yet exerted.
    pub clo2_demand_pending: bool,
    /// ClO2 dose awaiting its initial demand, mg/L.
    pub clo2_dose: f64,
    pub byproducts: Byproducts,
    pub contact: ContactClock,
    pub ledger: DisinfectionLedger,
}

impl WaterQuality {
    /// Build the influent state: derive total carbonate from alkalinity and the
    /// residual charge term from the measured pH.
    pub fn from_influent(
        influent: &Influent,
        point: OperatingPoint,
        solver: &mut EquilibriumSolver,
    ) -> ChemResult<Self> {
        influent.validate()?;
        let temperature_c = influent.temperature_c(point);
        let k = solver.constants(temperature_c);
        let h = 10f64.powf(-influent.ph);
        let oh = k.kw / h;
        let (a1, a2) = k.carbonate_alphas(h);
        let alk_eq = species::caco3_to_eq(influent.alkalinity);
        let carbonate_total = ((alk_eq - oh + h) / (a1 + 2.0 * a2)).max(0.0);

        let mut water = Self {
            temperature_c,
            ph: influent.ph,
            toc: influent.toc,
            uv254: influent.uv254,
            suva: 0.0,
            alkalinity: influent.alkalinity,
            calcium: species::hardness_to_cation_mg_l(influent.calcium_hardness, mw::CALCIUM),
            magnesium: species::hardness_to_cation_mg_l(
                influent.magnesium_hardness(),
                mw::MAGNESIUM,
            ),
            ammonia_n: influent.ammonia_n,
            free_chlorine: 0.0,
            chloramine: 0.0,
            chlorine_dioxide: 0.0,
            ozone: 0.0,
            bromide: influent.bromide,
            turbidity: influent.turbidity,
            carbonate_total,
            other_ions: 0.0,
            caco3_solids: 0.0,
            mgoh2_solids: 0.0,
            coagulant_dose: 0.0,
            ozone_dose: 0.0,
            clo2_demand_pending: false,
            clo2_dose: 0.0,
            byproducts: Byproducts::default(),
            contact: ContactClock::default(),
            ledger: DisinfectionLedger::default(),
        };
        let residual = solver.solve(
            EquilibriumMode::ResidualCharge { ph: influent.ph },
            &water.equilibrium_input(false),
        )?;
        water.other_ions = residual.other_ions;
        water.refresh_derived();
        Ok(water)
    }

    /// Molar view of the species entering the charge balance.
    pub fn equilibrium_input(&self, softening: bool) -> EquilibriumInput {
        EquilibriumInput {
            temperature_c: self.temperature_c,
            calcium: species::mg_l_to_mol(self.calcium, mw::CALCIUM),
            magnesium: species::mg_l_to_mol(self.magnesium, mw::MAGNESIUM),
            carbonate_total: self.carbonate_total,
            ammonia_total: species::mg_l_to_mol(self.ammonia_n, mw::NITROGEN),
            chlorine_total: species::mg_l_to_mol(self.free_chlorine, mw::CHLORINE),
            other_ions: self.other_ions,
            softening,
        }
    }

    /// Write an adjust-pH outcome back. pH is clamped to [1, 14] here, not in
    /// the solver.
    pub fn apply_equilibrium(
        &mut self,
        outcome: &EquilibriumOutcome,
        solver: &mut EquilibriumSolver,
    ) {
        self.ph = outcome.ph.clamp(1.0, 14.0);
        if outcome.caco3_precipitated > 0.0 || outcome.mgoh2_precipitated > 0.0 {
            self.calcium = species::mol_to_mg_l(outcome.calcium, mw::CALCIUM);
            self.magnesium = species::mol_to_mg_l(outcome.magnesium, mw::MAGNESIUM);
            self.carbonate_total = outcome.carbonate_total;
            self.caco3_solids += species::mol_to_mg_l(outcome.caco3_precipitated, mw::CACO3);
            self.mgoh2_solids += species::mol_to_mg_l(outcome.mgoh2_precipitated, mw::MGOH2);
        }
        let k = solver.constants(self.temperature_c);
        let h = 10f64.powf(-self.ph);
        let (a1, a2) = k.carbonate_alphas(h);
        let alk_eq = self.carbonate_total * (a1 + 2.0 * a2) + k.kw / h - h;
        self.alkalinity = species::eq_to_caco3(alk_eq);
    }

    /// Refresh quantities derived from other fields.
    pub fn refresh_derived(&mut self) {
        self.suva = if self.toc > 0.0 {
            self.uv254 / self.toc * 100.0
        } else {
            0.0
        };
    }

    /// Total hardness, mg/L as CaCO3.
    pub fn total_hardness(&self) -> f64 {
        species::cation_mg_l_to_hardness(self.calcium, mw::CALCIUM)
            + species::cation_mg_l_to_hardness(self.magnesium, mw::MAGNESIUM)
    }

    /// Residual of one disinfectant, mg/L.
    pub fn residual(&self, disinfectant: Disinfectant) -> f64 {
        match disinfectant {
            Disinfectant::FreeChlorine => self.free_chlorine,
            Disinfectant::Chloramine => self.chloramine,
            Disinfectant::ChlorineDioxide => self.chlorine_dioxide,
            Disinfectant::Ozone => self.ozone,
        }
    }

    pub fn has_disinfectant(&self) -> bool {
        Disinfectant::ALL.iter().any(|&d| self.residual(d) > 0.0)
    }
}
