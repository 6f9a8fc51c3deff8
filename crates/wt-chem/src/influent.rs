//! Raw-water boundary conditions.

use crate::error::{ChemError, ChemResult};
use serde::{Deserialize, Serialize};
use wt_core::units::{Temperature, VolumeRate, celsius, mgd, to_celsius};
use wt_core::{ensure_finite, ensure_range};

/// Origin of the raw water.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SourceKind {
    Surface,
    Groundwater { virus_disinfection_required: bool },
}

impl SourceKind {
    pub fn is_surface(self) -> bool {
        matches!(self, SourceKind::Surface)
    }
}

/// Hydraulic/thermal condition a run is evaluated at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatingPoint {
    /// Average flow at the nominal temperature.
    #[default]
    Average,
    /// Peak hourly flow at the coldest expected temperature.
    PeakCold,
}

impl OperatingPoint {
    pub fn is_peak_cold(self) -> bool {
        matches!(self, OperatingPoint::PeakCold)
    }
}

/// Influent characteristics. Built once per plant and only read afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Influent {
    pub ph: f64,
    pub temperature: Temperature,
    pub cold_temperature: Temperature,
    /// Total organic carbon, mg/L.
    pub toc: f64,
    /// UV absorbance at 254 nm, 1/cm.
    pub uv254: f64,
    /// mg/L as CaCO3.
    pub alkalinity: f64,
    /// mg/L as CaCO3.
    pub calcium_hardness: f64,
    /// mg/L as CaCO3.
    pub total_hardness: f64,
    /// mg/L as N.
    pub ammonia_n: f64,
    /// µg/L.
    pub bromide: f64,
    /// NTU.
    pub turbidity: f64,
    pub average_flow: VolumeRate,
    pub peak_flow: VolumeRate,
    pub source: SourceKind,
    /// Mean source Cryptosporidium concentration, oocysts/L.
    pub crypto_concentration: f64,
    /// Approved watershed control program in place.
    pub watershed_control: bool,
}

impl Default for Influent {
    fn default() -> Self {
        Self {
            ph: 7.5,
            temperature: celsius(15.0),
            cold_temperature: celsius(5.0),
            toc: 3.0,
            uv254: 0.08,
            alkalinity: 80.0,
            calcium_hardness: 80.0,
            total_hardness: 120.0,
            ammonia_n: 0.0,
            bromide: 50.0,
            turbidity: 5.0,
            average_flow: mgd(10.0),
            peak_flow: mgd(15.0),
            source: SourceKind::Surface,
            crypto_concentration: 0.0,
            watershed_control: false,
        }
    }
}

impl Influent {
    /// Check the boundary conditions are physical.
    pub fn validate(&self) -> ChemResult<()> {
        ensure_range(self.ph, 1.0, 14.0, "influent pH")?;
        ensure_range(to_celsius(self.temperature), -5.0, 45.0, "influent temperature")?;
        ensure_range(
            to_celsius(self.cold_temperature),
            -5.0,
            45.0,
            "influent cold temperature",
        )?;
        for (value, what) in [
            (self.toc, "influent TOC"),
            (self.uv254, "influent UV254"),
            (self.alkalinity, "influent alkalinity"),
            (self.calcium_hardness, "influent calcium hardness"),
            (self.total_hardness, "influent total hardness"),
            (self.ammonia_n, "influent ammonia"),
            (self.bromide, "influent bromide"),
            (self.turbidity, "influent turbidity"),
            (self.crypto_concentration, "influent Cryptosporidium"),
        ] {
            if ensure_finite(value, what)? < 0.0 {
                return Err(ChemError::NonPhysical { what });
            }
        }
        if self.calcium_hardness > self.total_hardness {
            return Err(ChemError::InvalidArg {
                what: "calcium hardness exceeds total hardness",
            });
        }
        if !(self.average_flow.value > 0.0) || !(self.peak_flow.value > 0.0) {
            return Err(ChemError::NonPhysical {
                what: "influent flow must be positive",
            });
        }
        Ok(())
    }

    /// Plant flow at an operating point.
    pub fn flow(&self, point: OperatingPoint) -> VolumeRate {
        match point {
            OperatingPoint::Average => self.average_flow,
            OperatingPoint::PeakCold => self.peak_flow,
        }
    }

    /// Water temperature at an operating point, °C.
    pub fn temperature_c(&self, point: OperatingPoint) -> f64 {
        match point {
            OperatingPoint::Average => to_celsius(self.temperature),
            OperatingPoint::PeakCold => to_celsius(self.cold_temperature),
        }
    }

    /// Magnesium hardness, mg/L as CaCO3.
    pub fn magnesium_hardness(&self) -> f64 {
        (self.total_hardness - self.calcium_hardness).max(0.0)
    }
}
