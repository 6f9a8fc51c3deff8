//! Plant file schema definitions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlantDef {
    pub version: u32,
    pub name: String,
    pub influent: InfluentDef,
    #[serde(default)]
    pub stages: Vec<StageDef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SourceDef {
    #[default]
    Surface,
    Groundwater,
}

/// Raw-water boundary conditions. Concentrations in mg/L (hardness and
/// alkalinity as CaCO3, bromide in µg/L), flows in MGD.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InfluentDef {
    pub temperature_c: f64,
    pub cold_temperature_c: f64,
    pub ph: f64,
    pub toc: f64,
    pub uv254: f64,
    pub alkalinity: f64,
    pub calcium_hardness: f64,
    #[serde(default)]
    pub magnesium_hardness: f64,
    #[serde(default)]
    pub ammonia_n: f64,
    #[serde(default)]
    pub bromide: f64,
    #[serde(default)]
    pub turbidity: f64,
    pub average_flow_mgd: f64,
    pub peak_flow_mgd: f64,
    #[serde(default)]
    pub source: SourceDef,
    #[serde(default)]
    pub virus_disinfection_required: bool,
    /// Cryptosporidium source concentration, oocysts/L.
    #[serde(default)]
    pub crypto_concentration: f64,
    #[serde(default)]
    pub watershed_control: bool,
}

impl Default for InfluentDef {
    fn default() -> Self {
        Self {
            temperature_c: 15.0,
            cold_temperature_c: 5.0,
            ph: 7.5,
            toc: 3.0,
            uv254: 0.08,
            alkalinity: 80.0,
            calcium_hardness: 80.0,
            magnesium_hardness: 40.0,
            ammonia_n: 0.0,
            bromide: 50.0,
            turbidity: 5.0,
            average_flow_mgd: 10.0,
            peak_flow_mgd: 15.0,
            source: SourceDef::Surface,
            virus_disinfection_required: false,
            crypto_concentration: 0.0,
            watershed_control: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageDef {
    pub id: String,
    pub name: String,
    pub kind: StageKindDef,
}

/// Basin hydraulics. Version 0 files carry a single `baffle_factor` instead
/// of the two ratios.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BasinDef {
    pub volume_mg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t10_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmean_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baffle_factor: Option<f64>,
}

impl BasinDef {
    pub fn new(volume_mg: f64, t10_ratio: f64, tmean_ratio: f64) -> Self {
        Self {
            volume_mg,
            t10_ratio: Some(t10_ratio),
            tmean_ratio: Some(tmean_ratio),
            baffle_factor: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct MembraneDef {
    #[serde(default)]
    pub giardia_log: f64,
    #[serde(default)]
    pub virus_log: f64,
    #[serde(default)]
    pub crypto_log: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum StageKindDef {
    Influent,

    RapidMix {
        basin: BasinDef,
    },
    Flocculation {
        basin: BasinDef,
    },
    PresedimentationBasin {
        basin: BasinDef,
    },
    SettlingBasin {
        basin: BasinDef,
    },
    Filter {
        basin: BasinDef,
        #[serde(default)]
        biological: bool,
        #[serde(default = "default_claim_credit")]
        claim_credit: bool,
    },
    Basin {
        basin: BasinDef,
    },
    ContactTank {
        basin: BasinDef,
    },
    Clearwell {
        basin: BasinDef,
    },
    StorageTank {
        basin: BasinDef,
    },
    OzoneContactor {
        dose_mg_l: f64,
        basin: BasinDef,
    },
    GacContactor {
        basin: BasinDef,
        toc_removal: f64,
        uv_removal: f64,
    },
    Microfiltration {
        #[serde(default)]
        credit: MembraneDef,
    },
    Ultrafiltration {
        #[serde(default)]
        credit: MembraneDef,
    },
    Nanofiltration {
        #[serde(default)]
        credit: MembraneDef,
        toc_rejection: f64,
        bromide_rejection: f64,
        hardness_rejection: f64,
    },
    BankFiltration {
        setback_ft: f64,
    },
    UvReactor {
        dose_mj_cm2: f64,
    },

    Alum {
        dose_mg_l: f64,
    },
    FerricChloride {
        dose_mg_l: f64,
    },
    FerricSulfate {
        dose_mg_l: f64,
    },
    Chlorine {
        dose_mg_l: f64,
    },
    Hypochlorite {
        dose_mg_l: f64,
    },
    Ammonia {
        dose_mg_l: f64,
    },
    AmmoniumSulfate {
        dose_mg_l: f64,
    },
    ChlorineDioxide {
        dose_mg_l: f64,
    },
    Permanganate {
        dose_mg_l: f64,
    },
    SulfuricAcid {
        dose_mg_l: f64,
    },
    HydrochloricAcid {
        dose_mg_l: f64,
    },
    CausticSoda {
        dose_mg_l: f64,
    },
    Lime {
        dose_mg_l: f64,
        #[serde(default)]
        softening: bool,
    },
    SodaAsh {
        dose_mg_l: f64,
    },
    CarbonDioxide {
        dose_mg_l: f64,
    },
    PowderedCarbon {
        dose_mg_l: f64,
    },
    Polymer {
        dose_mg_l: f64,
    },

    PlantEffluent,
    AverageTap {
        residence_min: f64,
    },
    EndOfSystem {
        residence_min: f64,
    },
    SamplePoint,

    /// Any tag this version does not recognize.
    #[serde(other)]
    Unknown,
}

fn default_claim_credit() -> bool {
    true
}

impl StageKindDef {
    pub fn basin(&self) -> Option<&BasinDef> {
        match self {
            StageKindDef::RapidMix { basin }
            | StageKindDef::Flocculation { basin }
            | StageKindDef::PresedimentationBasin { basin }
            | StageKindDef::SettlingBasin { basin }
            | StageKindDef::Filter { basin, .. }
            | StageKindDef::Basin { basin }
            | StageKindDef::ContactTank { basin }
            | StageKindDef::Clearwell { basin }
            | StageKindDef::StorageTank { basin }
            | StageKindDef::OzoneContactor { basin, .. }
            | StageKindDef::GacContactor { basin, .. } => Some(basin),
            _ => None,
        }
    }

    pub fn basin_mut(&mut self) -> Option<&mut BasinDef> {
        match self {
            StageKindDef::RapidMix { basin }
            | StageKindDef::Flocculation { basin }
            | StageKindDef::PresedimentationBasin { basin }
            | StageKindDef::SettlingBasin { basin }
            | StageKindDef::Filter { basin, .. }
            | StageKindDef::Basin { basin }
            | StageKindDef::ContactTank { basin }
            | StageKindDef::Clearwell { basin }
            | StageKindDef::StorageTank { basin }
            | StageKindDef::OzoneContactor { basin, .. }
            | StageKindDef::GacContactor { basin, .. } => Some(basin),
            _ => None,
        }
    }

    /// Chemical dose in mg/L, for dosing stages and the ozone contactor.
    pub fn dose(&self) -> Option<f64> {
        match self {
            StageKindDef::OzoneContactor { dose_mg_l, .. }
            | StageKindDef::Alum { dose_mg_l }
            | StageKindDef::FerricChloride { dose_mg_l }
            | StageKindDef::FerricSulfate { dose_mg_l }
            | StageKindDef::Chlorine { dose_mg_l }
            | StageKindDef::Hypochlorite { dose_mg_l }
            | StageKindDef::Ammonia { dose_mg_l }
            | StageKindDef::AmmoniumSulfate { dose_mg_l }
            | StageKindDef::ChlorineDioxide { dose_mg_l }
            | StageKindDef::Permanganate { dose_mg_l }
            | StageKindDef::SulfuricAcid { dose_mg_l }
            | StageKindDef::HydrochloricAcid { dose_mg_l }
            | StageKindDef::CausticSoda { dose_mg_l }
            | StageKindDef::Lime { dose_mg_l, .. }
            | StageKindDef::SodaAsh { dose_mg_l }
            | StageKindDef::CarbonDioxide { dose_mg_l }
            | StageKindDef::PowderedCarbon { dose_mg_l }
            | StageKindDef::Polymer { dose_mg_l } => Some(*dose_mg_l),
            _ => None,
        }
    }
}
