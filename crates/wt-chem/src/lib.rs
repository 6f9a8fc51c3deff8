//! wt-chem: water chemistry for the treatment-train simulator.
//!
//! Provides:
//! - Influent boundary conditions and operating points
//! - The water-quality state carried from stage to stage
//! - The disinfection ledger (CT and log-inactivation accumulators)
//! - Temperature-dependent equilibrium constants
//! - The pH / charge-balance equilibrium solver with optional softening
//!
//! # Example
//!
//! ```
//! use wt_chem::{EquilibriumSolver, Influent, OperatingPoint, WaterQuality};
//!
//! let influent = Influent::default();
//! let mut solver = EquilibriumSolver::new();
//! let water = WaterQuality::from_influent(&influent, OperatingPoint::Average, &mut solver).unwrap();
//! assert!((water.ph - influent.ph).abs() < 1e-9);
//! ```

pub mod constants;
pub mod equilibrium;
pub mod error;
pub mod influent;
pub mod ledger;
pub mod species;
pub mod water;

// Re-exports for ergonomics
pub use constants::EquilibriumConstants;
pub use equilibrium::{
    BisectionConfig, EquilibriumInput, EquilibriumMode, EquilibriumOutcome, EquilibriumSolver,
};
pub use error::{ChemError, ChemResult};
pub use influent::{Influent, OperatingPoint, SourceKind};
pub use ledger::{CreditRequirement, Disinfectant, DisinfectionLedger, Pathogen, PerPathogen};
pub use water::{Byproducts, ContactClock, WaterQuality};
