//! Plant file migration.

use crate::ProjectError;
use crate::schema::PlantDef;

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut plant: PlantDef) -> Result<PlantDef, ProjectError> {
    while plant.version < LATEST_VERSION {
        plant = migrate_one_version(plant)?;
    }
    Ok(plant)
}

fn migrate_one_version(plant: PlantDef) -> Result<PlantDef, ProjectError> {
    match plant.version {
        0 => migrate_v0_to_v1(plant),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// Version 0 stated basin baffling as a single T10 factor; the mean
/// residence ratio defaults to 1.
fn migrate_v0_to_v1(mut plant: PlantDef) -> Result<PlantDef, ProjectError> {
    for stage in &mut plant.stages {
        let Some(basin) = stage.kind.basin_mut() else {
            continue;
        };
        if let Some(factor) = basin.baffle_factor.take() {
            basin.t10_ratio.get_or_insert(factor);
            basin.tmean_ratio.get_or_insert(1.0);
        }
    }
    plant.version = 1;
    Ok(plant)
}
