//! wt-process: unit-process kernels.
//!
//! Provides:
//! - The hydraulic cascade discretizer (T10 ratio to reactor count)
//! - Breakpoint chlorination chemistry
//! - Clamped empirical rate correlations behind the `RateModel` trait
//! - The slice-by-slice decay engine for all four disinfectants
//! - Physical removal units (coagulation, GAC, membranes, biofiltration, PAC)
//!
//! # Example
//!
//! ```
//! use wt_process::reactor_count;
//!
//! assert_eq!(reactor_count(0.186), 1);
//! assert_eq!(reactor_count(0.187), 2);
//! assert_eq!(reactor_count(1.0), 25);
//! ```

pub mod breakpoint;
pub mod cascade;
pub mod chlorine_dioxide;
pub mod correlations;
pub mod decay;
pub mod error;
pub mod ozone;
pub mod removal;

pub use breakpoint::apply_breakpoint;
pub use cascade::{Cascade, MAX_REACTORS, reactor_count};
pub use correlations::{DecayInputs, EmpiricalRates, RateModel, SaturationRate, WaterMatrix};
pub use decay::{BasinOutcome, DecayEngine, SliceStep};
pub use error::{ProcessError, ProcessResult};
pub use removal::Coagulant;
