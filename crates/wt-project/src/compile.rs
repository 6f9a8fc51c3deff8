//! Compile a plant file into the runtime train and influent.

use wt_chem::{Influent, SourceKind};
use wt_core::units::{celsius, mgd, million_gallons, minutes};
use wt_train::{
    BankFiltrationConfig, BasinConfig, DistributionConfig, DoseConfig, FilterConfig, GacConfig,
    LimeConfig, MembraneConfig, NanofiltrationConfig, OzoneContactorConfig, StageKind, Train,
    TrainBuilder, UvConfig,
};

use crate::schema::{BasinDef, InfluentDef, MembraneDef, PlantDef, SourceDef, StageKindDef};
use crate::validate::{ValidationError, validate_plant};
use crate::ProjectResult;

/// Validate `plant` and build the train and influent it describes.
///
/// Stages keep file order, so `train.stages()[i]` corresponds to
/// `plant.stages[i]`.
pub fn compile_plant(plant: &PlantDef) -> ProjectResult<(Train, Influent)> {
    validate_plant(plant)?;

    let influent = compile_influent(&plant.influent);
    influent.validate()?;

    let mut builder = TrainBuilder::new();
    for stage in &plant.stages {
        let kind = compile_kind(&stage.kind).ok_or_else(|| ValidationError::UnknownStageType {
            stage: stage.id.clone(),
        })?;
        builder.add_stage(stage.name.clone(), kind);
    }
    let train = builder.build()?;
    Ok((train, influent))
}

fn compile_influent(def: &InfluentDef) -> Influent {
    let source = match def.source {
        SourceDef::Surface => SourceKind::Surface,
        SourceDef::Groundwater => SourceKind::Groundwater {
            virus_disinfection_required: def.virus_disinfection_required,
        },
    };
    Influent {
        ph: def.ph,
        temperature: celsius(def.temperature_c),
        cold_temperature: celsius(def.cold_temperature_c),
        toc: def.toc,
        uv254: def.uv254,
        alkalinity: def.alkalinity,
        calcium_hardness: def.calcium_hardness,
        total_hardness: def.calcium_hardness + def.magnesium_hardness,
        ammonia_n: def.ammonia_n,
        bromide: def.bromide,
        turbidity: def.turbidity,
        average_flow: mgd(def.average_flow_mgd),
        peak_flow: mgd(def.peak_flow_mgd),
        source,
        crypto_concentration: def.crypto_concentration,
        watershed_control: def.watershed_control,
    }
}

fn basin(def: &BasinDef) -> BasinConfig {
    // Validation guarantees t10_ratio is present after migration.
    let t10 = def.t10_ratio.unwrap_or(1.0);
    BasinConfig::new(
        million_gallons(def.volume_mg),
        t10,
        def.tmean_ratio.unwrap_or(1.0),
    )
}

fn membrane(def: &MembraneDef) -> MembraneConfig {
    MembraneConfig {
        giardia_log: def.giardia_log,
        virus_log: def.virus_log,
        crypto_log: def.crypto_log,
    }
}

fn compile_kind(def: &StageKindDef) -> Option<StageKind> {
    let dose = |d: &f64| DoseConfig::new(*d);
    let kind = match def {
        StageKindDef::Influent => StageKind::Influent,

        StageKindDef::RapidMix { basin: b } => StageKind::RapidMix(basin(b)),
        StageKindDef::Flocculation { basin: b } => StageKind::Flocculation(basin(b)),
        StageKindDef::PresedimentationBasin { basin: b } => {
            StageKind::PresedimentationBasin(basin(b))
        }
        StageKindDef::SettlingBasin { basin: b } => StageKind::SettlingBasin(basin(b)),
        StageKindDef::Filter {
            basin: b,
            biological,
            claim_credit,
        } => StageKind::Filter(FilterConfig {
            basin: basin(b),
            biological: *biological,
            claim_credit: *claim_credit,
        }),
        StageKindDef::Basin { basin: b } => StageKind::Basin(basin(b)),
        StageKindDef::ContactTank { basin: b } => StageKind::ContactTank(basin(b)),
        StageKindDef::Clearwell { basin: b } => StageKind::Clearwell(basin(b)),
        StageKindDef::StorageTank { basin: b } => StageKind::StorageTank(basin(b)),
        StageKindDef::OzoneContactor { dose_mg_l, basin: b } => {
            StageKind::OzoneContactor(OzoneContactorConfig {
                dose: *dose_mg_l,
                basin: basin(b),
            })
        }
        StageKindDef::GacContactor {
            basin: b,
            toc_removal,
            uv_removal,
        } => StageKind::GacContactor(GacConfig {
            basin: basin(b),
            toc_removal: *toc_removal,
            uv_removal: *uv_removal,
        }),
        StageKindDef::Microfiltration { credit } => StageKind::Microfiltration(membrane(credit)),
        StageKindDef::Ultrafiltration { credit } => StageKind::Ultrafiltration(membrane(credit)),
        StageKindDef::Nanofiltration {
            credit,
            toc_rejection,
            bromide_rejection,
            hardness_rejection,
        } => StageKind::Nanofiltration(NanofiltrationConfig {
            credit: membrane(credit),
            toc_rejection: *toc_rejection,
            bromide_rejection: *bromide_rejection,
            hardness_rejection: *hardness_rejection,
        }),
        StageKindDef::BankFiltration { setback_ft } => {
            StageKind::BankFiltration(BankFiltrationConfig {
                setback_ft: *setback_ft,
            })
        }
        StageKindDef::UvReactor { dose_mj_cm2 } => StageKind::UvReactor(UvConfig {
            dose: *dose_mj_cm2,
        }),

        StageKindDef::Alum { dose_mg_l } => StageKind::Alum(dose(dose_mg_l)),
        StageKindDef::FerricChloride { dose_mg_l } => StageKind::FerricChloride(dose(dose_mg_l)),
        StageKindDef::FerricSulfate { dose_mg_l } => StageKind::FerricSulfate(dose(dose_mg_l)),
        StageKindDef::Chlorine { dose_mg_l } => StageKind::Chlorine(dose(dose_mg_l)),
        StageKindDef::Hypochlorite { dose_mg_l } => StageKind::Hypochlorite(dose(dose_mg_l)),
        StageKindDef::Ammonia { dose_mg_l } => StageKind::Ammonia(dose(dose_mg_l)),
        StageKindDef::AmmoniumSulfate { dose_mg_l } => StageKind::AmmoniumSulfate(dose(dose_mg_l)),
        StageKindDef::ChlorineDioxide { dose_mg_l } => StageKind::ChlorineDioxide(dose(dose_mg_l)),
        StageKindDef::Permanganate { dose_mg_l } => StageKind::Permanganate(dose(dose_mg_l)),
        StageKindDef::SulfuricAcid { dose_mg_l } => StageKind::SulfuricAcid(dose(dose_mg_l)),
        StageKindDef::HydrochloricAcid { dose_mg_l } => {
            StageKind::HydrochloricAcid(dose(dose_mg_l))
        }
        StageKindDef::CausticSoda { dose_mg_l } => StageKind::CausticSoda(dose(dose_mg_l)),
        StageKindDef::Lime {
            dose_mg_l,
            softening,
        } => StageKind::Lime(LimeConfig {
            dose: *dose_mg_l,
            softening: *softening,
        }),
        StageKindDef::SodaAsh { dose_mg_l } => StageKind::SodaAsh(dose(dose_mg_l)),
        StageKindDef::CarbonDioxide { dose_mg_l } => StageKind::CarbonDioxide(dose(dose_mg_l)),
        StageKindDef::PowderedCarbon { dose_mg_l } => StageKind::PowderedCarbon(dose(dose_mg_l)),
        StageKindDef::Polymer { dose_mg_l } => StageKind::Polymer(dose(dose_mg_l)),

        StageKindDef::PlantEffluent => StageKind::PlantEffluent,
        StageKindDef::AverageTap { residence_min } => StageKind::AverageTap(DistributionConfig {
            residence: minutes(*residence_min),
        }),
        StageKindDef::EndOfSystem { residence_min } => StageKind::EndOfSystem(DistributionConfig {
            residence: minutes(*residence_min),
        }),
        StageKindDef::SamplePoint => StageKind::SamplePoint,

        StageKindDef::Unknown => return None,
    };
    Some(kind)
}
