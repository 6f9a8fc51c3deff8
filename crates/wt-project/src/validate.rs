//! Plant file validation.

use std::collections::HashSet;

use crate::schema::{BasinDef, InfluentDef, MembraneDef, PlantDef, StageDef, StageKindDef};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate stage ID: {id}")]
    DuplicateId { id: String },

    #[error("Unknown stage type for stage '{stage}'")]
    UnknownStageType { stage: String },

    #[error("Plant has no influent stage")]
    MissingInfluent,

    #[error("Influent stage '{stage}' must be the first and only influent")]
    MisplacedInfluent { stage: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: f64, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(field, value, "must be finite and non-negative"));
    }
    Ok(())
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(field, value, "must be finite and positive"));
    }
    Ok(())
}

fn fraction(field: &str, value: f64) -> Result<(), ValidationError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(field, value, "must be within [0, 1]"));
    }
    Ok(())
}

pub fn validate_plant(plant: &PlantDef) -> Result<(), ValidationError> {
    if plant.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: plant.version,
        });
    }

    validate_influent(&plant.influent)?;

    let mut ids = HashSet::new();
    for (position, stage) in plant.stages.iter().enumerate() {
        if !ids.insert(&stage.id) {
            return Err(ValidationError::DuplicateId {
                id: stage.id.clone(),
            });
        }
        if matches!(stage.kind, StageKindDef::Influent) && position > 0 {
            return Err(ValidationError::MisplacedInfluent {
                stage: stage.id.clone(),
            });
        }
        validate_stage(stage)?;
    }

    match plant.stages.first() {
        Some(first) if matches!(first.kind, StageKindDef::Influent) => Ok(()),
        _ => Err(ValidationError::MissingInfluent),
    }
}

fn validate_influent(influent: &InfluentDef) -> Result<(), ValidationError> {
    if !(1.0..=14.0).contains(&influent.ph) {
        return Err(invalid("influent.ph", influent.ph, "must be within [1, 14]"));
    }
    for (field, value) in [
        ("influent.temperature_c", influent.temperature_c),
        ("influent.cold_temperature_c", influent.cold_temperature_c),
    ] {
        if !value.is_finite() {
            return Err(invalid(field, value, "must be finite"));
        }
    }
    for (field, value) in [
        ("influent.toc", influent.toc),
        ("influent.uv254", influent.uv254),
        ("influent.alkalinity", influent.alkalinity),
        ("influent.calcium_hardness", influent.calcium_hardness),
        ("influent.magnesium_hardness", influent.magnesium_hardness),
        ("influent.ammonia_n", influent.ammonia_n),
        ("influent.bromide", influent.bromide),
        ("influent.turbidity", influent.turbidity),
        ("influent.crypto_concentration", influent.crypto_concentration),
    ] {
        non_negative(field, value)?;
    }
    positive("influent.average_flow_mgd", influent.average_flow_mgd)?;
    positive("influent.peak_flow_mgd", influent.peak_flow_mgd)?;
    Ok(())
}

fn validate_basin(stage: &str, basin: &BasinDef) -> Result<(), ValidationError> {
    positive(&format!("{stage}.volume_mg"), basin.volume_mg)?;
    if let Some(factor) = basin.baffle_factor {
        return Err(invalid(
            format!("{stage}.baffle_factor"),
            factor,
            "version 0 field; use t10_ratio and tmean_ratio",
        ));
    }
    let t10 = basin.t10_ratio.unwrap_or(f64::NAN);
    if !(t10 > 0.0 && t10 <= 1.0) {
        return Err(invalid(format!("{stage}.t10_ratio"), t10, "must be within (0, 1]"));
    }
    if let Some(tmean) = basin.tmean_ratio {
        if !(tmean > 0.0 && tmean <= 2.0) {
            return Err(invalid(
                format!("{stage}.tmean_ratio"),
                tmean,
                "must be within (0, 2]",
            ));
        }
    }
    Ok(())
}

fn validate_membrane(stage: &str, credit: &MembraneDef) -> Result<(), ValidationError> {
    non_negative(&format!("{stage}.credit.giardia_log"), credit.giardia_log)?;
    non_negative(&format!("{stage}.credit.virus_log"), credit.virus_log)?;
    non_negative(&format!("{stage}.credit.crypto_log"), credit.crypto_log)
}

fn validate_stage(stage: &StageDef) -> Result<(), ValidationError> {
    let id = stage.id.as_str();
    if let Some(dose) = stage.kind.dose() {
        non_negative(&format!("{id}.dose_mg_l"), dose)?;
    }
    if let Some(basin) = stage.kind.basin() {
        validate_basin(id, basin)?;
    }
    match &stage.kind {
        StageKindDef::Unknown => {
            return Err(ValidationError::UnknownStageType {
                stage: stage.id.clone(),
            });
        }
        StageKindDef::GacContactor {
            toc_removal,
            uv_removal,
            ..
        } => {
            fraction(&format!("{id}.toc_removal"), *toc_removal)?;
            fraction(&format!("{id}.uv_removal"), *uv_removal)?;
        }
        StageKindDef::Microfiltration { credit } | StageKindDef::Ultrafiltration { credit } => {
            validate_membrane(id, credit)?;
        }
        StageKindDef::Nanofiltration {
            credit,
            toc_rejection,
            bromide_rejection,
            hardness_rejection,
        } => {
            validate_membrane(id, credit)?;
            fraction(&format!("{id}.toc_rejection"), *toc_rejection)?;
            fraction(&format!("{id}.bromide_rejection"), *bromide_rejection)?;
            fraction(&format!("{id}.hardness_rejection"), *hardness_rejection)?;
        }
        StageKindDef::BankFiltration { setback_ft } => {
            non_negative(&format!("{id}.setback_ft"), *setback_ft)?;
        }
        StageKindDef::UvReactor { dose_mj_cm2 } => {
            non_negative(&format!("{id}.dose_mj_cm2"), *dose_mj_cm2)?;
        }
        StageKindDef::AverageTap { residence_min }
        | StageKindDef::EndOfSystem { residence_min } => {
            non_negative(&format!("{id}.residence_min"), *residence_min)?;
        }
        _ => {}
    }
    Ok(())
}
