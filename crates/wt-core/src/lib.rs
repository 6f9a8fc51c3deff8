//! wt-core: stable foundation for the treatment-train simulator.
//!
//! Contains:
//! - units (uom SI types + constructors in plant units)
//! - numeric (finite/range checks, correlation input bounds)
//! - ids (stage ids assigned by the train builder)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{WtError, WtResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
