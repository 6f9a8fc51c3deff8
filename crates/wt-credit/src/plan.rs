//! Non-CT pathogen credit.
//!
//! Credit from physical barriers is decided by the stage kinds a train
//! contains and the order they appear in. `CreditTracker` observes stages
//! one at a time; the same tracker drives both the up-front plan and the
//! running tally during a pass, so the two always agree at the tail.

use serde::Serialize;
use tracing::debug;
use wt_chem::{CreditRequirement, Influent, Pathogen, PerPathogen, SourceKind};
use wt_train::{StageKind, Train};

const GIARDIA_TOTAL: f64 = 3.0;
const VIRUS_TOTAL: f64 = 4.0;

/// Giardia, virus, Cryptosporidium logs for a filter preceded by
/// coagulation and settling.
const CONVENTIONAL_FILTRATION: [f64; 3] = [2.5, 2.0, 3.0];
/// Same, coagulation without settling.
const DIRECT_FILTRATION: [f64; 3] = [2.0, 1.0, 2.5];

const WATERSHED_CONTROL_CRYPTO: f64 = 0.5;

/// Log credit 0.5..=4.0 in half-log steps.
const UV_LOGS: [f64; 8] = [0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0];
/// UV dose (mJ/cm2) needed for each entry of `UV_LOGS`.
const UV_CRYPTO: [f64; 8] = [1.6, 2.5, 3.9, 5.8, 8.5, 12.0, 15.0, 22.0];
const UV_GIARDIA: [f64; 8] = [1.5, 2.1, 3.0, 5.2, 7.7, 11.0, 15.0, 22.0];
const UV_VIRUS: [f64; 8] = [39.0, 58.0, 79.0, 100.0, 121.0, 143.0, 163.0, 186.0];

/// Log credit earned by a UV dose. Stepwise: the highest tabulated credit
/// whose dose requirement is met.
pub fn uv_log_credit(pathogen: Pathogen, dose: f64) -> f64 {
    let table = match pathogen {
        Pathogen::Giardia => &UV_GIARDIA,
        Pathogen::Virus => &UV_VIRUS,
        Pathogen::Cryptosporidium => &UV_CRYPTO,
    };
    table
        .iter()
        .zip(UV_LOGS)
        .filter(|(required, _)| dose >= **required)
        .map(|(_, logs)| logs)
        .last()
        .unwrap_or(0.0)
}

/// Total Cryptosporidium requirement from the source concentration
/// (oocysts/L), by bin.
pub fn crypto_total_requirement(concentration: f64) -> f64 {
    if concentration < 0.075 {
        3.0
    } else if concentration < 1.0 {
        4.0
    } else if concentration < 3.0 {
        5.0
    } else {
        5.5
    }
}

/// Bank-filtration Cryptosporidium credit by well setback.
fn bank_filtration_credit(setback_ft: f64) -> f64 {
    if setback_ft >= 50.0 {
        1.0
    } else if setback_ft >= 25.0 {
        0.5
    } else {
        0.0
    }
}

/// Order-dependent observer of non-CT credit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreditTracker {
    coagulated: bool,
    settled: bool,
    filtration_claimed: bool,
    credit: PerPathogen<f64>,
}

impl CreditTracker {
    /// Start a tally for a source; watershed control is credited up front.
    pub fn new(influent: &Influent) -> Self {
        let mut tracker = Self::default();
        if influent.source.is_surface() && influent.watershed_control {
            tracker.credit.crypto += WATERSHED_CONTROL_CRYPTO;
        }
        tracker
    }

    pub fn credit(&self) -> PerPathogen<f64> {
        self.credit
    }

    /// Observe one stage. Returns the credit it added.
    pub fn observe(&mut self, kind: &StageKind) -> PerPathogen<f64> {
        let added = self.credit_for(kind);
        self.credit.giardia += added.giardia;
        self.credit.virus += added.virus;
        self.credit.crypto += added.crypto;
        if added != PerPathogen::default() {
            debug!(
                stage = kind.label(),
                giardia = added.giardia,
                virus = added.virus,
                crypto = added.crypto,
                "non-CT credit"
            );
        }
        added
    }

    fn credit_for(&mut self, kind: &StageKind) -> PerPathogen<f64> {
        let zero = PerPathogen::default();
        match kind {
            k if k.is_coagulant() => {
                self.coagulated = true;
                zero
            }
            StageKind::Lime(lime) if lime.softening => {
                self.coagulated = true;
                zero
            }
            k if k.is_clarifier() => {
                if self.coagulated {
                    self.settled = true;
                }
                zero
            }
            StageKind::Filter(filter) => {
                if !filter.claim_credit || self.filtration_claimed || !self.coagulated {
                    return zero;
                }
                self.filtration_claimed = true;
                let [g, v, c] = if self.settled {
                    CONVENTIONAL_FILTRATION
                } else {
                    DIRECT_FILTRATION
                };
                PerPathogen::new(g, v, c)
            }
            StageKind::Microfiltration(m) | StageKind::Ultrafiltration(m) => {
                PerPathogen::new(m.giardia_log, m.virus_log, m.crypto_log)
            }
            StageKind::Nanofiltration(nf) => {
                PerPathogen::new(nf.credit.giardia_log, nf.credit.virus_log, nf.credit.crypto_log)
            }
            StageKind::UvReactor(uv) => PerPathogen::new(
                uv_log_credit(Pathogen::Giardia, uv.dose),
                uv_log_credit(Pathogen::Virus, uv.dose),
                uv_log_credit(Pathogen::Cryptosporidium, uv.dose),
            ),
            StageKind::BankFiltration(bank) => {
                PerPathogen::new(0.0, 0.0, bank_filtration_credit(bank.setback_ft))
            }
            _ => zero,
        }
    }
}

/// Requirements and non-CT credit for one train and source, decided before
/// the pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditPlan {
    /// Total log requirement; `None` where the pathogen does not apply.
    pub total_required: PerPathogen<Option<f64>>,
    pub non_ct_credit: PerPathogen<f64>,
    pub requirement: PerPathogen<CreditRequirement>,
}

impl CreditPlan {
    pub fn new(train: &Train, influent: &Influent) -> Self {
        let mut tracker = CreditTracker::new(influent);
        for stage in train {
            tracker.observe(&stage.kind);
        }
        let non_ct_credit = tracker.credit();

        let total_required = match influent.source {
            SourceKind::Surface => PerPathogen::new(
                Some(GIARDIA_TOTAL),
                Some(VIRUS_TOTAL),
                Some(crypto_total_requirement(influent.crypto_concentration)),
            ),
            SourceKind::Groundwater {
                virus_disinfection_required: true,
            } => PerPathogen::new(None, Some(VIRUS_TOTAL), None),
            SourceKind::Groundwater {
                virus_disinfection_required: false,
            } => PerPathogen::new(None, None, None),
        };

        let requirement = total_required.map(|p, total| match total {
            Some(total) => CreditRequirement::from_logs(*total, *non_ct_credit.get(p)),
            None => CreditRequirement::NotApplicable,
        });

        Self {
            total_required,
            non_ct_credit,
            requirement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wt_core::units::million_gallons;
    use wt_train::{
        BankFiltrationConfig, BasinConfig, DoseConfig, FilterConfig, MembraneConfig,
        TrainBuilder, UvConfig,
    };

    fn basin() -> BasinConfig {
        BasinConfig::new(million_gallons(0.5), 0.5, 1.0)
    }

    fn filter() -> StageKind {
        StageKind::Filter(FilterConfig {
            basin: basin(),
            biological: false,
            claim_credit: true,
        })
    }

    fn plan(kinds: Vec<StageKind>, influent: &Influent) -> CreditPlan {
        let mut b = TrainBuilder::new();
        b.add_stage("Raw", StageKind::Influent);
        for (i, kind) in kinds.into_iter().enumerate() {
            b.add_stage(format!("s{i}"), kind);
        }
        CreditPlan::new(&b.build().unwrap(), influent)
    }

    #[test]
    fn uv_table_is_stepwise() {
        assert_eq!(uv_log_credit(Pathogen::Cryptosporidium, 1.0), 0.0);
        assert_eq!(uv_log_credit(Pathogen::Cryptosporidium, 1.6), 0.5);
        assert_eq!(uv_log_credit(Pathogen::Cryptosporidium, 12.0), 3.0);
        assert_eq!(uv_log_credit(Pathogen::Cryptosporidium, 40.0), 4.0);
        assert_eq!(uv_log_credit(Pathogen::Virus, 40.0), 0.5);
    }

    #[test]
    fn crypto_bins() {
        assert_eq!(crypto_total_requirement(0.0), 3.0);
        assert_eq!(crypto_total_requirement(0.075), 4.0);
        assert_eq!(crypto_total_requirement(2.0), 5.0);
        assert_eq!(crypto_total_requirement(3.0), 5.5);
    }

    #[test]
    fn conventional_vs_direct_filtration() {
        let influent = Influent::default();
        let conventional = plan(
            vec![
                StageKind::Alum(DoseConfig::new(20.0)),
                StageKind::SettlingBasin(basin()),
                filter(),
            ],
            &influent,
        );
        assert_eq!(conventional.non_ct_credit, PerPathogen::new(2.5, 2.0, 3.0));
        assert_eq!(
            conventional.requirement.giardia,
            CreditRequirement::Remaining(0.5)
        );
        assert_eq!(conventional.requirement.crypto, CreditRequirement::MetByNonCt);

        let direct = plan(vec![StageKind::Alum(DoseConfig::new(20.0)), filter()], &influent);
        assert_eq!(direct.non_ct_credit, PerPathogen::new(2.0, 1.0, 2.5));
    }

    #[test]
    fn settling_before_coagulation_does_not_count() {
        let p = plan(
            vec![
                StageKind::SettlingBasin(basin()),
                StageKind::Alum(DoseConfig::new(20.0)),
                filter(),
            ],
            &Influent::default(),
        );
        assert_eq!(p.non_ct_credit.giardia, 2.0);
    }

    #[test]
    fn uncoagulated_filter_earns_nothing() {
        let p = plan(
            vec![StageKind::SettlingBasin(basin()), filter()],
            &Influent::default(),
        );
        assert_eq!(p.non_ct_credit, PerPathogen::default());
        assert_eq!(p.requirement.giardia, CreditRequirement::Remaining(3.0));
    }

    #[test]
    fn only_first_filter_credited() {
        let p = plan(
            vec![StageKind::Alum(DoseConfig::new(20.0)), filter(), filter()],
            &Influent::default(),
        );
        assert_eq!(p.non_ct_credit.giardia, 2.0);
    }

    #[test]
    fn barriers_and_watershed_stack() {
        let influent = Influent {
            watershed_control: true,
            crypto_concentration: 0.5,
            ..Influent::default()
        };
        let p = plan(
            vec![
                StageKind::BankFiltration(BankFiltrationConfig { setback_ft: 60.0 }),
                StageKind::Ultrafiltration(MembraneConfig {
                    giardia_log: 4.0,
                    virus_log: 0.0,
                    crypto_log: 2.0,
                }),
                StageKind::UvReactor(UvConfig { dose: 5.8 }),
            ],
            &influent,
        );
        assert!((p.non_ct_credit.crypto - 5.5).abs() < 1e-12);
        assert_eq!(p.total_required.crypto, Some(4.0));
        assert_eq!(p.requirement.crypto, CreditRequirement::MetByNonCt);
        assert_eq!(p.requirement.giardia, CreditRequirement::MetByNonCt);
        assert_eq!(p.requirement.virus, CreditRequirement::Remaining(4.0));
    }

    #[test]
    fn groundwater_requirements() {
        let none = Influent {
            source: SourceKind::Groundwater {
                virus_disinfection_required: false,
            },
            ..Influent::default()
        };
        let p = plan(vec![], &none);
        for pathogen in Pathogen::ALL {
            assert_eq!(*p.requirement.get(pathogen), CreditRequirement::NotApplicable);
        }

        let virus = Influent {
            source: SourceKind::Groundwater {
                virus_disinfection_required: true,
            },
            ..Influent::default()
        };
        let p = plan(vec![], &virus);
        assert_eq!(p.requirement.giardia, CreditRequirement::NotApplicable);
        assert_eq!(p.requirement.virus, CreditRequirement::Remaining(4.0));
        assert_eq!(p.requirement.crypto, CreditRequirement::NotApplicable);
    }
}
