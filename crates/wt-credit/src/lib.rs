//! wt-credit: pathogen credit accounting.
//!
//! Provides:
//! - CT-required tables and regressions for four disinfectants and three
//!   pathogens
//! - Non-CT credit planning: filtration, membranes, UV, bank filtration,
//!   watershed control, and the source-dependent total requirement
//! - The accountant that records disinfection steps into the ledger
//!
//! # Example
//!
//! ```
//! use wt_chem::{Disinfectant, Pathogen};
//! use wt_credit::{CtConditions, ct_required};
//!
//! let cond = CtConditions { temperature_c: 10.0, ph: 7.0, concentration: 1.0 };
//! let ozone = ct_required(Disinfectant::Ozone, Pathogen::Giardia, &cond, 1.0);
//! let chloramine = ct_required(Disinfectant::Chloramine, Pathogen::Giardia, &cond, 1.0);
//! assert!(ozone < chloramine);
//! ```

pub mod accountant;
pub mod ct_tables;
pub mod plan;

pub use accountant::CtAccountant;
pub use ct_tables::{CtConditions, ct_required};
pub use plan::{CreditPlan, CreditTracker, crypto_total_requirement, uv_log_credit};
