//! Disinfection ledger: cumulative CT and inactivation credit per pathogen.
//!
//! The ledger only ever grows during a run. Every mutator adds a
//! non-negative increment; nothing subtracts or resets.

use serde::{Deserialize, Serialize};

/// Regulated pathogen groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pathogen {
    Giardia,
    Virus,
    Cryptosporidium,
}

impl Pathogen {
    pub const ALL: [Pathogen; 3] = [Pathogen::Giardia, Pathogen::Virus, Pathogen::Cryptosporidium];

    pub fn label(self) -> &'static str {
        match self {
            Pathogen::Giardia => "giardia",
            Pathogen::Virus => "virus",
            Pathogen::Cryptosporidium => "crypto",
        }
    }
}

/// Disinfectant chemistries that earn CT credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Disinfectant {
    FreeChlorine,
    Chloramine,
    ChlorineDioxide,
    Ozone,
}

impl Disinfectant {
    pub const ALL: [Disinfectant; 4] = [
        Disinfectant::FreeChlorine,
        Disinfectant::Chloramine,
        Disinfectant::ChlorineDioxide,
        Disinfectant::Ozone,
    ];

    fn slot(self) -> usize {
        match self {
            Disinfectant::FreeChlorine => 0,
            Disinfectant::Chloramine => 1,
            Disinfectant::ChlorineDioxide => 2,
            Disinfectant::Ozone => 3,
        }
    }
}

/// One value per pathogen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerPathogen<T> {
    pub giardia: T,
    pub virus: T,
    pub crypto: T,
}

impl<T> PerPathogen<T> {
    pub fn new(giardia: T, virus: T, crypto: T) -> Self {
        Self {
            giardia,
            virus,
            crypto,
        }
    }

    pub fn get(&self, pathogen: Pathogen) -> &T {
        match pathogen {
            Pathogen::Giardia => &self.giardia,
            Pathogen::Virus => &self.virus,
            Pathogen::Cryptosporidium => &self.crypto,
        }
    }

    pub fn get_mut(&mut self, pathogen: Pathogen) -> &mut T {
        match pathogen {
            Pathogen::Giardia => &mut self.giardia,
            Pathogen::Virus => &mut self.virus,
            Pathogen::Cryptosporidium => &mut self.crypto,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(Pathogen, &T) -> U) -> PerPathogen<U> {
        PerPathogen {
            giardia: f(Pathogen::Giardia, &self.giardia),
            virus: f(Pathogen::Virus, &self.virus),
            crypto: f(Pathogen::Cryptosporidium, &self.crypto),
        }
    }
}

/// How much disinfection a pathogen still needs after non-CT credit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum CreditRequirement {
    /// No disinfection requirement for this pathogen in this source.
    #[default]
    NotApplicable,
    /// Non-CT credit already meets the total requirement.
    MetByNonCt,
    /// Log inactivation still required from disinfectants (> 0).
    Remaining(f64),
}

impl CreditRequirement {
    /// Classify a requirement from the total and the credit earned elsewhere.
    pub fn from_logs(total_required: f64, non_ct_credit: f64) -> Self {
        let remaining = total_required - non_ct_credit;
        if remaining <= 0.0 {
            CreditRequirement::MetByNonCt
        } else {
            CreditRequirement::Remaining(remaining)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
struct PathogenEntry {
    ct_achieved: f64,
    ratio: f64,
    log_achieved: f64,
}

/// Cumulative disinfection accounting carried by every water state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisinfectionLedger {
    requirement: PerPathogen<CreditRequirement>,
    entries: PerPathogen<PathogenEntry>,
    ct_by_disinfectant: [f64; 4],
}

impl DisinfectionLedger {
    pub fn new(requirement: PerPathogen<CreditRequirement>) -> Self {
        Self {
            requirement,
            ..Self::default()
        }
    }

    pub fn requirement(&self, pathogen: Pathogen) -> CreditRequirement {
        *self.requirement.get(pathogen)
    }

    /// Record one disinfection step for one pathogen.
    ///
    /// `ct_required` is the CT needed to deliver the whole remaining log
    /// requirement with this chemistry at the step's conditions. It may be
    /// infinite when the chemistry earns no credit for the pathogen. Returns the
    /// ratio increment actually added.
    pub fn add_step(&mut self, pathogen: Pathogen, ct_achieved: f64, ct_required: f64) -> f64 {
        let remaining = match self.requirement(pathogen) {
            CreditRequirement::Remaining(r) => r,
            CreditRequirement::NotApplicable | CreditRequirement::MetByNonCt => return 0.0,
        };
        if !(ct_achieved > 0.0) || !(ct_required > 0.0) {
            return 0.0;
        }
        let increment = ct_achieved / ct_required;
        if !increment.is_finite() {
            return 0.0;
        }
        let entry = self.entries.get_mut(pathogen);
        entry.ct_achieved += ct_achieved;
        entry.ratio += increment;
        entry.log_achieved += increment * remaining;
        increment
    }

    /// Record CT delivered by a disinfectant, independent of pathogen.
    pub fn add_disinfectant_ct(&mut self, disinfectant: Disinfectant, ct: f64) {
        if ct > 0.0 && ct.is_finite() {
            self.ct_by_disinfectant[disinfectant.slot()] += ct;
        }
    }

    /// CT-achieved / CT-required summed across steps and chemistries.
    ///
    /// `None` when the pathogen is not applicable for the source. Exactly
    /// `1.0` when non-CT credit already meets the requirement.
    pub fn ct_ratio(&self, pathogen: Pathogen) -> Option<f64> {
        match self.requirement(pathogen) {
            CreditRequirement::NotApplicable => None,
            CreditRequirement::MetByNonCt => Some(1.0),
            CreditRequirement::Remaining(_) => Some(self.entries.get(pathogen).ratio),
        }
    }

    pub fn ct_achieved(&self, pathogen: Pathogen) -> f64 {
        self.entries.get(pathogen).ct_achieved
    }

    pub fn log_achieved(&self, pathogen: Pathogen) -> f64 {
        self.entries.get(pathogen).log_achieved
    }

    pub fn ct_by_disinfectant(&self, disinfectant: Disinfectant) -> f64 {
        self.ct_by_disinfectant[disinfectant.slot()]
    }

    pub fn ct_ratios(&self) -> PerPathogen<Option<f64>> {
        PerPathogen::new(
            self.ct_ratio(Pathogen::Giardia),
            self.ct_ratio(Pathogen::Virus),
            self.ct_ratio(Pathogen::Cryptosporidium),
        )
    }
}
