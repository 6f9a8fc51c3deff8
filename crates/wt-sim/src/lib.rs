//! wt-sim: the treatment-train orchestrator.
//!
//! Provides:
//! - `RunContext`, the run-scoped flags and DBP-model transition table
//! - Collaborator seams for chemical dosing and DBP prediction
//! - `Orchestrator` / `run_train`, a single deterministic forward pass
//! - `RunRecord`, the per-stage snapshots handed to reporters
//!
//! # Example
//!
//! ```
//! use wt_chem::{Influent, Pathogen};
//! use wt_core::units::million_gallons;
//! use wt_sim::{RunOptions, run_train};
//! use wt_train::{BasinConfig, DoseConfig, StageKind, TrainBuilder};
//!
//! let mut b = TrainBuilder::new();
//! b.add_stage("Raw water", StageKind::Influent);
//! b.add_stage("Chlorine", StageKind::Chlorine(DoseConfig::new(2.0)));
//! b.add_stage("Clearwell", StageKind::Clearwell(BasinConfig::new(million_gallons(0.5), 0.5, 1.0)));
//! let train = b.build().unwrap();
//!
//! let record = run_train(&train, &Influent::default(), &RunOptions::default()).unwrap();
//! assert!(record.ct_ratios().giardia.unwrap() > 0.0);
//! ```

pub mod context;
pub mod dbp;
pub mod dosing;
pub mod error;
pub mod orchestrator;
pub mod record;

// Re-exports for public API
pub use context::{DbpModel, OzonePhase, RunContext, RunFlags};
pub use dbp::{ContactWindow, DbpPredictor, NullDbpPredictor};
pub use dosing::{ChemicalDosing, StoichiometricDosing};
pub use error::{SimError, SimResult};
pub use orchestrator::{Orchestrator, RunOptions, run_train};
pub use record::{RunRecord, RunReporter, StageRecord};
