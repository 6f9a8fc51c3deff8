//! wt-project: plant file format, validation, and compilation.

use std::path::Path;

pub mod compile;
pub mod migrate;
pub mod schema;
pub mod validate;

pub use compile::compile_plant;
pub use migrate::{LATEST_VERSION, migrate_to_latest};
pub use schema::*;
pub use validate::{ValidationError, validate_plant};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("Train error: {0}")]
    Train(#[from] wt_train::TrainError),

    #[error("Influent error: {0}")]
    Chem(#[from] wt_chem::ChemError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn finish_load(plant: PlantDef) -> ProjectResult<PlantDef> {
    let plant = migrate_to_latest(plant)?;
    validate_plant(&plant)?;
    Ok(plant)
}

/// Read, migrate, and validate a YAML plant file.
pub fn load_yaml(path: &Path) -> ProjectResult<PlantDef> {
    let content = std::fs::read_to_string(path)?;
    finish_load(serde_yaml::from_str(&content)?)
}

pub fn save_yaml(path: &Path, plant: &PlantDef) -> ProjectResult<()> {
    validate_plant(plant)?;
    std::fs::write(path, serde_yaml::to_string(plant)?)?;
    Ok(())
}

/// Read, migrate, and validate a JSON plant file.
pub fn load_json(path: &Path) -> ProjectResult<PlantDef> {
    let content = std::fs::read_to_string(path)?;
    finish_load(serde_json::from_str(&content)?)
}

pub fn save_json(path: &Path, plant: &PlantDef) -> ProjectResult<()> {
    validate_plant(plant)?;
    std::fs::write(path, serde_json::to_string_pretty(plant)?)?;
    Ok(())
}

/// Load by extension: `.json` as JSON, anything else as YAML.
pub fn load_plant(path: &Path) -> ProjectResult<PlantDef> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json { load_json(path) } else { load_yaml(path) }
}
