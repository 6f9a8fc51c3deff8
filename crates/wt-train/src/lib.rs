//! wt-train: treatment-train data model.
//!
//! Provides:
//! - `StageKind`, one variant per unit process, dosing point, or sample point,
//!   each carrying its own typed configuration
//! - Incremental `TrainBuilder` with validation
//! - The validated, ordered `Train`
//!
//! # Example
//!
//! ```
//! use wt_train::{BasinConfig, DoseConfig, StageKind, TrainBuilder};
//! use wt_core::units::million_gallons;
//!
//! let mut builder = TrainBuilder::new();
//! builder.add_stage("Raw water", StageKind::Influent);
//! builder.add_stage("Chlorine", StageKind::Chlorine(DoseConfig::new(2.0)));
//! builder.add_stage(
//!     "Clearwell",
//!     StageKind::Clearwell(BasinConfig::new(million_gallons(0.5), 0.5, 1.0)),
//! );
//! let train = builder.build().unwrap();
//!
//! assert_eq!(train.len(), 3);
//! assert!(train.stages()[0].kind.is_influent());
//! ```

pub mod builder;
pub mod error;
pub mod stage;
pub mod train;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::TrainBuilder;
pub use error::{TrainError, TrainResult};
pub use stage::{
    BankFiltrationConfig, BasinConfig, DistributionConfig, DoseConfig, FilterConfig, GacConfig,
    Hydraulics, LimeConfig, MembraneConfig, NanofiltrationConfig, OzoneContactorConfig, Stage,
    StageClass, StageKind, UvConfig,
};
pub use train::Train;
