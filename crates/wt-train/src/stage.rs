//! Stage kinds and their typed configuration.

use wt_core::StageId;
use wt_core::units::{Time, Volume, VolumeRate, detention_time, to_minutes};

/// Chemical dose in mg/L (of the product as fed, or as Cl2 for chlorine).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoseConfig {
    pub dose: f64,
}

impl DoseConfig {
    pub fn new(dose: f64) -> Self {
        Self { dose }
    }
}

/// A vessel with non-ideal mixing described by tracer ratios.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasinConfig {
    pub volume: Volume,
    /// T10 / theoretical detention time (baffling factor).
    pub t10_ratio: f64,
    /// Mean residence time / theoretical detention time.
    pub tmean_ratio: f64,
}

impl BasinConfig {
    pub fn new(volume: Volume, t10_ratio: f64, tmean_ratio: f64) -> Self {
        Self {
            volume,
            t10_ratio,
            tmean_ratio,
        }
    }
}

/// Granular media filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterConfig {
    pub basin: BasinConfig,
    /// Biologically active (TOC removal when ozone precedes it).
    pub biological: bool,
    /// Claim pathogen-removal credit for this filter.
    pub claim_credit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OzoneContactorConfig {
    /// Applied ozone dose, mg/L.
    pub dose: f64,
    pub basin: BasinConfig,
}

/// Granular activated carbon contactor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GacConfig {
    pub basin: BasinConfig,
    /// Fraction of TOC removed, 0..1.
    pub toc_removal: f64,
    /// Fraction of UV254 removed, 0..1.
    pub uv_removal: f64,
}

/// Demonstrated log-removal credit of a membrane or other barrier.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MembraneConfig {
    pub giardia_log: f64,
    pub virus_log: f64,
    pub crypto_log: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NanofiltrationConfig {
    pub credit: MembraneConfig,
    /// Fractional rejections, 0..1.
    pub toc_rejection: f64,
    pub bromide_rejection: f64,
    pub hardness_rejection: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BankFiltrationConfig {
    /// Distance from the surface water to the well, feet.
    pub setback_ft: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvConfig {
    /// Validated reduction-equivalent dose, mJ/cm2.
    pub dose: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimeConfig {
    pub dose: f64,
    /// Operate as precipitative softening.
    pub softening: bool,
}

/// Distribution-system residence before a sample point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistributionConfig {
    pub residence: Time,
}

/// Residence-time description of a stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hydraulics {
    /// Volume-based vessel; detention time scales with flow.
    Vessel(BasinConfig),
    /// Fixed residence (distribution pipe), treated as plug flow.
    Fixed(Time),
}

impl Hydraulics {
    /// Theoretical detention time at `flow`, minutes.
    pub fn theoretical_minutes(&self, flow: VolumeRate) -> f64 {
        match self {
            Hydraulics::Vessel(basin) => to_minutes(detention_time(basin.volume, flow)),
            Hydraulics::Fixed(t) => to_minutes(*t),
        }
    }

    pub fn t10_ratio(&self) -> f64 {
        match self {
            Hydraulics::Vessel(basin) => basin.t10_ratio,
            Hydraulics::Fixed(_) => 1.0,
        }
    }

    pub fn tmean_ratio(&self) -> f64 {
        match self {
            Hydraulics::Vessel(basin) => basin.tmean_ratio,
            Hydraulics::Fixed(_) => 1.0,
        }
    }
}

/// Coarse grouping of stage kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageClass {
    Influent,
    Physical,
    Dosing,
    Sample,
}

/// Every kind of stage a train may hold.
#[derive(Debug, Clone, PartialEq)]
pub enum StageKind {
    Influent,

    // Physical units
    RapidMix(BasinConfig),
    Flocculation(BasinConfig),
    PresedimentationBasin(BasinConfig),
    SettlingBasin(BasinConfig),
    Filter(FilterConfig),
    Basin(BasinConfig),
    ContactTank(BasinConfig),
    Clearwell(BasinConfig),
    StorageTank(BasinConfig),
    OzoneContactor(OzoneContactorConfig),
    GacContactor(GacConfig),
    Microfiltration(MembraneConfig),
    Ultrafiltration(MembraneConfig),
    Nanofiltration(NanofiltrationConfig),
    BankFiltration(BankFiltrationConfig),
    UvReactor(UvConfig),

    // Chemical addition
    Alum(DoseConfig),
    FerricChloride(DoseConfig),
    FerricSulfate(DoseConfig),
    Chlorine(DoseConfig),
    Hypochlorite(DoseConfig),
    Ammonia(DoseConfig),
    AmmoniumSulfate(DoseConfig),
    ChlorineDioxide(DoseConfig),
    Permanganate(DoseConfig),
    SulfuricAcid(DoseConfig),
    HydrochloricAcid(DoseConfig),
    CausticSoda(DoseConfig),
    Lime(LimeConfig),
    SodaAsh(DoseConfig),
    CarbonDioxide(DoseConfig),
    PowderedCarbon(DoseConfig),
    Polymer(DoseConfig),

    // Sample points
    PlantEffluent,
    AverageTap(DistributionConfig),
    EndOfSystem(DistributionConfig),
    SamplePoint,
}

impl StageKind {
    /// Stable tag used in plant files and reports.
    pub fn label(&self) -> &'static str {
        match self {
            StageKind::Influent => "Influent",
            StageKind::RapidMix(_) => "RapidMix",
            StageKind::Flocculation(_) => "Flocculation",
            StageKind::PresedimentationBasin(_) => "PresedimentationBasin",
            StageKind::SettlingBasin(_) => "SettlingBasin",
            StageKind::Filter(_) => "Filter",
            StageKind::Basin(_) => "Basin",
            StageKind::ContactTank(_) => "ContactTank",
            StageKind::Clearwell(_) => "Clearwell",
            StageKind::StorageTank(_) => "StorageTank",
            StageKind::OzoneContactor(_) => "OzoneContactor",
            StageKind::GacContactor(_) => "GacContactor",
            StageKind::Microfiltration(_) => "Microfiltration",
            StageKind::Ultrafiltration(_) => "Ultrafiltration",
            StageKind::Nanofiltration(_) => "Nanofiltration",
            StageKind::BankFiltration(_) => "BankFiltration",
            StageKind::UvReactor(_) => "UvReactor",
            StageKind::Alum(_) => "Alum",
            StageKind::FerricChloride(_) => "FerricChloride",
            StageKind::FerricSulfate(_) => "FerricSulfate",
            StageKind::Chlorine(_) => "Chlorine",
            StageKind::Hypochlorite(_) => "Hypochlorite",
            StageKind::Ammonia(_) => "Ammonia",
            StageKind::AmmoniumSulfate(_) => "AmmoniumSulfate",
            StageKind::ChlorineDioxide(_) => "ChlorineDioxide",
            StageKind::Permanganate(_) => "Permanganate",
            StageKind::SulfuricAcid(_) => "SulfuricAcid",
            StageKind::HydrochloricAcid(_) => "HydrochloricAcid",
            StageKind::CausticSoda(_) => "CausticSoda",
            StageKind::Lime(_) => "Lime",
            StageKind::SodaAsh(_) => "SodaAsh",
            StageKind::CarbonDioxide(_) => "CarbonDioxide",
            StageKind::PowderedCarbon(_) => "PowderedCarbon",
            StageKind::Polymer(_) => "Polymer",
            StageKind::PlantEffluent => "PlantEffluent",
            StageKind::AverageTap(_) => "AverageTap",
            StageKind::EndOfSystem(_) => "EndOfSystem",
            StageKind::SamplePoint => "SamplePoint",
        }
    }

    pub fn class(&self) -> StageClass {
        match self {
            StageKind::Influent => StageClass::Influent,
            StageKind::PlantEffluent
            | StageKind::AverageTap(_)
            | StageKind::EndOfSystem(_)
            | StageKind::SamplePoint => StageClass::Sample,
            _ if self.dose().is_some() && !matches!(self, StageKind::OzoneContactor(_)) => {
                StageClass::Dosing
            }
            _ => StageClass::Physical,
        }
    }

    pub fn is_influent(&self) -> bool {
        matches!(self, StageKind::Influent)
    }

    pub fn is_dosing(&self) -> bool {
        self.class() == StageClass::Dosing
    }

    /// Applied chemical dose, mg/L, for stages that add a chemical.
    pub fn dose(&self) -> Option<f64> {
        match self {
            StageKind::Alum(d)
            | StageKind::FerricChloride(d)
            | StageKind::FerricSulfate(d)
            | StageKind::Chlorine(d)
            | StageKind::Hypochlorite(d)
            | StageKind::Ammonia(d)
            | StageKind::AmmoniumSulfate(d)
            | StageKind::ChlorineDioxide(d)
            | StageKind::Permanganate(d)
            | StageKind::SulfuricAcid(d)
            | StageKind::HydrochloricAcid(d)
            | StageKind::CausticSoda(d)
            | StageKind::SodaAsh(d)
            | StageKind::CarbonDioxide(d)
            | StageKind::PowderedCarbon(d)
            | StageKind::Polymer(d) => Some(d.dose),
            StageKind::Lime(l) => Some(l.dose),
            StageKind::OzoneContactor(o) => Some(o.dose),
            _ => None,
        }
    }

    /// Coagulant salts that drive enhanced coagulation.
    pub fn is_coagulant(&self) -> bool {
        matches!(
            self,
            StageKind::Alum(_) | StageKind::FerricChloride(_) | StageKind::FerricSulfate(_)
        )
    }

    /// Clarification steps that separate floc.
    pub fn is_clarifier(&self) -> bool {
        matches!(
            self,
            StageKind::SettlingBasin(_) | StageKind::PresedimentationBasin(_)
        )
    }

    /// Residence-time description, for stages that hold water.
    pub fn hydraulics(&self) -> Option<Hydraulics> {
        match self {
            StageKind::RapidMix(b)
            | StageKind::Flocculation(b)
            | StageKind::PresedimentationBasin(b)
            | StageKind::SettlingBasin(b)
            | StageKind::Basin(b)
            | StageKind::ContactTank(b)
            | StageKind::Clearwell(b)
            | StageKind::StorageTank(b) => Some(Hydraulics::Vessel(*b)),
            StageKind::Filter(f) => Some(Hydraulics::Vessel(f.basin)),
            StageKind::OzoneContactor(o) => Some(Hydraulics::Vessel(o.basin)),
            StageKind::GacContactor(g) => Some(Hydraulics::Vessel(g.basin)),
            StageKind::AverageTap(d) | StageKind::EndOfSystem(d) => {
                Some(Hydraulics::Fixed(d.residence))
            }
            _ => None,
        }
    }
}

/// One ordered node of a treatment train.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub id: StageId,
    pub name: String,
    pub kind: StageKind,
}
