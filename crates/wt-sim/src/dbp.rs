//! Disinfection-byproduct predictor seam.

use wt_chem::{Byproducts, Influent, WaterQuality};

use crate::context::RunContext;

/// Elapsed contact window of one decay slice, minutes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactWindow {
    /// Plant residence time at the start of the window.
    pub start_minutes: f64,
    pub minutes: f64,
}

impl ContactWindow {
    pub fn end_minutes(&self) -> f64 {
        self.start_minutes + self.minutes
    }
}

/// Predicts byproduct formation over a contact window.
///
/// `ctx` selects the sub-model: `ctx.dbp_model()` for the water's treatment
/// history, plus the source kind, operating point, and chlorination flags.
/// The returned deltas are added to the water's cumulative byproducts;
/// negative deltas are ignored.
pub trait DbpPredictor {
    fn predict(
        &self,
        ctx: &RunContext,
        water: &WaterQuality,
        influent: &Influent,
        window: &ContactWindow,
    ) -> Byproducts;
}

/// Predicts no formation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDbpPredictor;

impl DbpPredictor for NullDbpPredictor {
    fn predict(
        &self,
        _: &RunContext,
        _: &WaterQuality,
        _: &Influent,
        _: &ContactWindow,
    ) -> Byproducts {
        Byproducts::default()
    }
}
