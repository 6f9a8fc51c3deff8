//! Run-scoped model-selection state.
//!
//! A `RunContext` is built fresh for every run. Its flags only ever move
//! forward: once raised they stay raised, and the DBP model only changes
//! through the transition table in `RunContext::observe`.

use serde::Serialize;
use tracing::debug;
use wt_chem::{Influent, OperatingPoint, PerPathogen, SourceKind, WaterQuality};
use wt_credit::{CreditPlan, CreditTracker};
use wt_process::WaterMatrix;
use wt_train::{StageKind, Train};

/// Which DBP predictor variant applies to the water.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum DbpModel {
    #[default]
    Raw,
    Ozonated,
    Coagulated,
    Biofiltered,
    Gac,
    Membrane,
}

/// Position of ozonation relative to clarification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum OzonePhase {
    #[default]
    None,
    /// Ozone applied ahead of settling/filtration.
    Pre,
    /// Settling or filtration seen after ozone, or ozone applied after them.
    Post,
}

/// Monotone run flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunFlags {
    pub coagulated: bool,
    pub settled: bool,
    pub filtered: bool,
    pub softened: bool,
    pub chlorinated: bool,
    pub rechlorinated: bool,
    pub chloraminated: bool,
    /// Stages past this point are in distribution and earn no CT credit.
    pub past_plant_effluent: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunContext {
    point: OperatingPoint,
    source: SourceKind,
    dbp_model: DbpModel,
    ozone_phase: OzonePhase,
    flags: RunFlags,
    plan: CreditPlan,
    observed_credit: PerPathogen<f64>,
    #[serde(skip)]
    tracker: CreditTracker,
}

macro_rules! raise {
    ($self:ident . $flag:ident) => {
        if !$self.flags.$flag {
            $self.flags.$flag = true;
            debug!(flag = stringify!($flag), "run flag raised");
        }
    };
}

impl RunContext {
    /// Fresh context for one run: all flags down, credit planned from the
    /// train as a whole.
    pub fn new(train: &Train, influent: &Influent, point: OperatingPoint) -> Self {
        let tracker = CreditTracker::new(influent);
        Self {
            point,
            source: influent.source,
            dbp_model: DbpModel::Raw,
            ozone_phase: OzonePhase::None,
            flags: RunFlags::default(),
            plan: CreditPlan::new(train, influent),
            observed_credit: tracker.credit(),
            tracker,
        }
    }

    pub fn operating_point(&self) -> OperatingPoint {
        self.point
    }

    pub fn source(&self) -> SourceKind {
        self.source
    }

    pub fn is_surface(&self) -> bool {
        self.source.is_surface()
    }

    pub fn is_peak_cold(&self) -> bool {
        self.point.is_peak_cold()
    }

    pub fn dbp_model(&self) -> DbpModel {
        self.dbp_model
    }

    pub fn ozone_phase(&self) -> OzonePhase {
        self.ozone_phase
    }

    pub fn flags(&self) -> RunFlags {
        self.flags
    }

    pub fn plan(&self) -> &CreditPlan {
        &self.plan
    }

    /// Non-CT credit from the stages observed so far.
    pub fn observed_credit(&self) -> PerPathogen<f64> {
        self.observed_credit
    }

    /// Raw-water decay fits apply until organics have been altered.
    pub fn water_matrix(&self) -> WaterMatrix {
        match self.dbp_model {
            DbpModel::Raw => WaterMatrix::Raw,
            _ => WaterMatrix::Treated,
        }
    }

    pub fn earns_ct_credit(&self) -> bool {
        !self.flags.past_plant_effluent
    }

    /// Apply the transition rules for a stage about to run on `water`.
    pub fn observe(&mut self, kind: &StageKind, water: &WaterQuality) {
        self.tracker.observe(kind);
        self.observed_credit = self.tracker.credit();

        match kind {
            k if k.is_coagulant() => {
                raise!(self.coagulated);
                if matches!(self.dbp_model, DbpModel::Raw | DbpModel::Ozonated) {
                    self.transition(DbpModel::Coagulated);
                }
            }
            StageKind::Lime(lime) if lime.softening => {
                raise!(self.softened);
                raise!(self.coagulated);
                if matches!(self.dbp_model, DbpModel::Raw | DbpModel::Ozonated) {
                    self.transition(DbpModel::Coagulated);
                }
            }
            k if k.is_clarifier() => {
                if self.flags.coagulated {
                    raise!(self.settled);
                }
                self.ozone_seen_downstream();
            }
            StageKind::Filter(filter) => {
                raise!(self.filtered);
                self.ozone_seen_downstream();
                if filter.biological
                    && self.ozone_phase != OzonePhase::None
                    && matches!(self.dbp_model, DbpModel::Ozonated | DbpModel::Coagulated)
                {
                    self.transition(DbpModel::Biofiltered);
                }
            }
            StageKind::OzoneContactor(_) => {
                if self.dbp_model == DbpModel::Raw {
                    self.transition(DbpModel::Ozonated);
                }
                if self.ozone_phase == OzonePhase::None {
                    self.ozone_phase = if self.flags.settled || self.flags.filtered {
                        OzonePhase::Post
                    } else {
                        OzonePhase::Pre
                    };
                    debug!(phase = ?self.ozone_phase, "ozonation");
                }
            }
            StageKind::GacContactor(_) => {
                if self.dbp_model != DbpModel::Membrane {
                    self.transition(DbpModel::Gac);
                }
            }
            StageKind::Nanofiltration(_) => self.transition(DbpModel::Membrane),
            StageKind::Microfiltration(_) | StageKind::Ultrafiltration(_) => {}
            StageKind::Chlorine(_) | StageKind::Hypochlorite(_) => {
                if self.flags.chlorinated {
                    raise!(self.rechlorinated);
                }
                raise!(self.chlorinated);
            }
            StageKind::Ammonia(_) | StageKind::AmmoniumSulfate(_) => {
                if water.free_chlorine > 0.0 {
                    raise!(self.chloraminated);
                }
            }
            StageKind::BankFiltration(_) => {
                if self.dbp_model == DbpModel::Raw {
                    self.transition(DbpModel::Coagulated);
                }
            }
            StageKind::PlantEffluent => raise!(self.past_plant_effluent),
            _ => {}
        }
    }

    fn ozone_seen_downstream(&mut self) {
        if self.ozone_phase == OzonePhase::Pre {
            self.ozone_phase = OzonePhase::Post;
            debug!("pre-ozonation became post-ozonation");
        }
    }

    fn transition(&mut self, to: DbpModel) {
        if self.dbp_model != to {
            debug!(from = ?self.dbp_model, to = ?to, "DBP model transition");
            self.dbp_model = to;
        }
    }
}
