//! Plant-unit constructors over `uom` SI quantities.
//!
//! Plant data arrives in US customary units (MG, MGD) and °C; kernels work
//! in plain `f64` minutes and mg/L, so conversions live here only.

use uom::si::f64::{
    ThermodynamicTemperature as UomThermodynamicTemperature, Time as UomTime,
    Volume as UomVolume, VolumeRate as UomVolumeRate,
};

pub type Temperature = UomThermodynamicTemperature;
pub type Time = UomTime;
pub type Volume = UomVolume;
pub type VolumeRate = UomVolumeRate;

#[inline]
pub fn celsius(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

#[inline]
pub fn minutes(v: f64) -> Time {
    use uom::si::time::minute;
    Time::new::<minute>(v)
}

#[inline]
pub fn m3(v: f64) -> Volume {
    use uom::si::volume::cubic_meter;
    Volume::new::<cubic_meter>(v)
}

/// Volume in million US gallons.
#[inline]
pub fn million_gallons(v: f64) -> Volume {
    m3(v * constants::M3_PER_MILLION_GALLONS)
}

/// Flow in million US gallons per day.
#[inline]
pub fn mgd(v: f64) -> VolumeRate {
    use uom::si::volume_rate::cubic_meter_per_second;
    VolumeRate::new::<cubic_meter_per_second>(
        v * constants::M3_PER_MILLION_GALLONS / constants::SECONDS_PER_DAY,
    )
}

#[inline]
pub fn to_celsius(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::degree_celsius;
    t.get::<degree_celsius>()
}

#[inline]
pub fn to_minutes(t: Time) -> f64 {
    use uom::si::time::minute;
    t.get::<minute>()
}

#[inline]
pub fn to_mgd(q: VolumeRate) -> f64 {
    use uom::si::volume_rate::cubic_meter_per_second;
    q.get::<cubic_meter_per_second>() * constants::SECONDS_PER_DAY
        / constants::M3_PER_MILLION_GALLONS
}

/// Theoretical detention time of a vessel at a given flow.
#[inline]
pub fn detention_time(volume: Volume, flow: VolumeRate) -> Time {
    volume / flow
}

pub mod constants {
    pub const M3_PER_MILLION_GALLONS: f64 = 3_785.411_784;
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
    pub const KELVIN_OFFSET: f64 = 273.15;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn million_gallons_in_cubic_meters() {
        use uom::si::volume::cubic_meter;
        assert!((million_gallons(1.0).get::<cubic_meter>() - 3_785.411_784).abs() < 1e-6);
        assert!((to_minutes(minutes(90.0)) - 90.0).abs() < 1e-12);
    }

    #[test]
    fn one_day_of_flow_fills_one_day_volume() {
        let t = detention_time(million_gallons(10.0), mgd(10.0));
        assert!((to_minutes(t) - 1440.0).abs() < 1e-9);
    }

    #[test]
    fn flow_round_trip() {
        assert!((to_mgd(mgd(3.25)) - 3.25).abs() < 1e-12);
        assert!((to_celsius(celsius(12.5)) - 12.5).abs() < 1e-9);
    }
}
