use crate::WtError;

pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, WtError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(WtError::NonFinite { what, value: v })
    }
}

pub fn ensure_range(v: f64, min: f64, max: f64, what: &'static str) -> Result<f64, WtError> {
    let v = ensure_finite(v, what)?;
    if v < min || v > max {
        return Err(WtError::OutOfRange {
            what,
            value: v,
            min,
            max,
        });
    }
    Ok(v)
}

/// Documented validity window of an empirical correlation input.
///
/// Correlations raise their inputs to fractional powers; every input goes
/// through `apply` before evaluation so that zero, negative, or out-of-range
/// values land on the edge of the calibrated range instead of producing NaN.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub floor: f64,
    pub ceiling: f64,
}

impl Bounds {
    pub const fn new(floor: f64, ceiling: f64) -> Self {
        Self { floor, ceiling }
    }

    /// Clamp `v` into `[floor, ceiling]`. NaN maps to the floor.
    #[inline]
    pub fn apply(self, v: f64) -> f64 {
        if v.is_nan() {
            return self.floor;
        }
        v.max(self.floor).min(self.ceiling)
    }
}
