//! Hydraulic cascade discretizer.
//!
//! A basin with non-ideal mixing is approximated by N equal ideal
//! continuously-stirred reactors in series. N is read from a fixed design
//! chart keyed on T10 / theoretical detention time. Entry `i` is the largest
//! ratio that maps to `i + 1` reactors; the chart is deliberately stepwise.

use wt_core::ensure_finite;

use crate::error::{ProcessError, ProcessResult};

pub const MAX_REACTORS: usize = 25;

/// Upper ratio bound for 1..=25 reactors. Breakpoints are the midpoints of
/// the T10 ratios of successive tanks-in-series cascades.
const BREAKPOINTS: [f64; MAX_REACTORS] = [
    0.186,
    0.317,
    0.402,
    0.461,
    0.506,
    0.541,
    0.569,
    0.593,
    0.613,
    0.630,
    0.645,
    0.659,
    0.671,
    0.682,
    0.691,
    0.700,
    0.708,
    0.716,
    0.723,
    0.729,
    0.735,
    0.741,
    0.746,
    0.751,
    f64::INFINITY,
];

/// Number of ideal reactors in series for a T10 / theoretical ratio.
///
/// Non-positive and NaN ratios map to a single reactor.
pub fn reactor_count(t10_ratio: f64) -> usize {
    if !(t10_ratio > 0.0) {
        return 1;
    }
    BREAKPOINTS
        .iter()
        .position(|&upper| t10_ratio <= upper)
        .map_or(MAX_REACTORS, |i| i + 1)
}

/// A basin's discretization at one flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cascade {
    pub reactors: usize,
    /// Mean residence of one slice, minutes.
    pub slice_minutes: f64,
    /// T10 contact time of one slice, minutes.
    pub slice_t10_minutes: f64,
    pub theoretical_minutes: f64,
}

impl Cascade {
    /// T10 ratio must lie in (0, 1] and the mean ratio must not be below it.
    pub fn new(
        theoretical_minutes: f64,
        t10_ratio: f64,
        tmean_ratio: f64,
    ) -> ProcessResult<Self> {
        let theoretical_minutes = ensure_finite(theoretical_minutes, "theoretical detention time")?;
        if !(t10_ratio > 0.0 && t10_ratio <= 1.0) {
            return Err(ProcessError::InvalidHydraulics {
                what: "T10 ratio",
                value: t10_ratio,
            });
        }
        if !(tmean_ratio.is_finite() && tmean_ratio >= t10_ratio) {
            return Err(ProcessError::InvalidHydraulics {
                what: "mean residence ratio",
                value: tmean_ratio,
            });
        }
        let reactors = reactor_count(t10_ratio);
        let n = reactors as f64;
        Ok(Self {
            reactors,
            slice_minutes: (tmean_ratio * theoretical_minutes / n).max(0.0),
            slice_t10_minutes: (t10_ratio * theoretical_minutes / n).max(0.0),
            theoretical_minutes,
        })
    }

    pub fn t10_minutes(&self) -> f64 {
        self.slice_t10_minutes * self.reactors as f64
    }

    pub fn mean_minutes(&self) -> f64 {
        self.slice_minutes * self.reactors as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_boundaries() {
        assert_eq!(reactor_count(0.186), 1);
        assert_eq!(reactor_count(0.187), 2);
        assert_eq!(reactor_count(0.5), 5);
        assert_eq!(reactor_count(0.751), 24);
        assert_eq!(reactor_count(0.752), 25);
        assert_eq!(reactor_count(1.0), 25);
    }

    #[test]
    fn degenerate_ratios() {
        assert_eq!(reactor_count(0.0), 1);
        assert_eq!(reactor_count(-0.3), 1);
        assert_eq!(reactor_count(f64::NAN), 1);
    }

    #[test]
    fn breakpoints_strictly_increase() {
        assert!(BREAKPOINTS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn cascade_slices() {
        let c = Cascade::new(60.0, 0.5, 1.0).unwrap();
        assert_eq!(c.reactors, 5);
        assert!((c.slice_minutes - 12.0).abs() < 1e-12);
        assert!((c.t10_minutes() - 30.0).abs() < 1e-12);
        assert!(matches!(
            Cascade::new(f64::NAN, 0.5, 1.0),
            Err(ProcessError::Core(_))
        ));
    }

    #[test]
    fn cascade_rejects_impossible_ratios() {
        assert_eq!(
            Cascade::new(60.0, 0.0, 1.0),
            Err(ProcessError::InvalidHydraulics {
                what: "T10 ratio",
                value: 0.0,
            })
        );
        assert!(matches!(
            Cascade::new(60.0, 0.5, 0.4),
            Err(ProcessError::InvalidHydraulics { what: "mean residence ratio", .. })
        ));
        assert!(Cascade::new(60.0, 1.0, 1.0).is_ok());
    }
}
