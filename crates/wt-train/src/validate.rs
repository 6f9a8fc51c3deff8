//! Train structure and configuration checks.

use crate::error::{TrainError, TrainResult};
use crate::stage::{BasinConfig, MembraneConfig, Stage, StageKind};

pub fn validate_structure(stages: &[Stage]) -> TrainResult<()> {
    let first = stages.first().ok_or(TrainError::Empty)?;
    if !first.kind.is_influent() {
        return match stages.iter().position(|s| s.kind.is_influent()) {
            Some(position) => Err(TrainError::MisplacedInfluent {
                stage: stages[position].id,
                position,
            }),
            None => Err(TrainError::MissingInfluent),
        };
    }

    if let Some((position, stage)) = stages
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, s)| s.kind.is_influent())
    {
        return Err(TrainError::MisplacedInfluent {
            stage: stage.id,
            position,
        });
    }

    let mut effluents = stages
        .iter()
        .filter(|s| matches!(s.kind, StageKind::PlantEffluent));
    effluents.next();
    if let Some(second) = effluents.next() {
        return Err(TrainError::DuplicatePlantEffluent { stage: second.id });
    }

    Ok(())
}

pub fn validate_config(stage: &Stage) -> TrainResult<()> {
    let fail = |what: &'static str| TrainError::InvalidConfig {
        stage: stage.id,
        kind: stage.kind.label(),
        what,
    };

    if let Some(dose) = stage.kind.dose() {
        if !dose.is_finite() || dose < 0.0 {
            return Err(fail("dose must be finite and non-negative"));
        }
    }

    if let Some(h) = stage.kind.hydraulics() {
        match h {
            crate::stage::Hydraulics::Vessel(basin) => check_basin(&basin).map_err(fail)?,
            crate::stage::Hydraulics::Fixed(t) => {
                let v = wt_core::units::to_minutes(t);
                if !v.is_finite() || v < 0.0 {
                    return Err(fail("residence time must be finite and non-negative"));
                }
            }
        }
    }

    match &stage.kind {
        StageKind::GacContactor(g) => {
            check_fraction(g.toc_removal).map_err(fail)?;
            check_fraction(g.uv_removal).map_err(fail)?;
        }
        StageKind::Microfiltration(m) | StageKind::Ultrafiltration(m) => {
            check_credit(m).map_err(fail)?
        }
        StageKind::Nanofiltration(nf) => {
            check_credit(&nf.credit).map_err(fail)?;
            check_fraction(nf.toc_rejection).map_err(fail)?;
            check_fraction(nf.bromide_rejection).map_err(fail)?;
            check_fraction(nf.hardness_rejection).map_err(fail)?;
        }
        StageKind::BankFiltration(b) if !(b.setback_ft.is_finite() && b.setback_ft >= 0.0) => {
            return Err(fail("setback must be finite and non-negative"));
        }
        StageKind::UvReactor(uv) if !(uv.dose.is_finite() && uv.dose >= 0.0) => {
            return Err(fail("UV dose must be finite and non-negative"));
        }
        _ => {}
    }

    Ok(())
}

fn check_basin(basin: &BasinConfig) -> Result<(), &'static str> {
    let volume = basin.volume.value;
    if !volume.is_finite() || volume <= 0.0 {
        return Err("volume must be positive");
    }
    if !(basin.t10_ratio > 0.0 && basin.t10_ratio <= 1.0) {
        return Err("T10 ratio must be in (0, 1]");
    }
    if !(basin.tmean_ratio.is_finite() && basin.tmean_ratio >= basin.t10_ratio) {
        return Err("mean residence ratio must be finite and at least the T10 ratio");
    }
    Ok(())
}

fn check_fraction(v: f64) -> Result<(), &'static str> {
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err("removal fraction must be in [0, 1]")
    }
}

fn check_credit(m: &MembraneConfig) -> Result<(), &'static str> {
    let ok = |v: f64| v.is_finite() && v >= 0.0;
    if ok(m.giardia_log) && ok(m.virus_log) && ok(m.crypto_log) {
        Ok(())
    } else {
        Err("log credit must be finite and non-negative")
    }
}
