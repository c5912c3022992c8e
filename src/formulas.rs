//! Component formulas for the cycling power model
//!
//! Each function computes one physical contribution or one supporting
//! quantity from plain SI scalars. None of them validate their inputs:
//! out-of-domain values (zero radius, equal start and end times, zero air
//! velocity for yaw) produce NaN or infinity rather than an error.
//!
//! # Power components
//!
//! - **Aerodynamic**: drag on rider, bike and rotating spokes
//! - **Rolling resistance**: tire deformation against the road
//! - **Wheel bearing**: empirical bearing friction
//! - **Potential energy**: climbing (or descending) against gravity
//! - **Kinetic energy**: accelerating rider, bike and wheels
//!
//! Directions are compass bearings in degrees and gradients are rise/run
//! ratios (a 5% grade is `0.05`).

use std::f64::consts::PI;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::PhysicalConstants;

fn to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// Power to overcome total aerodynamic drag.
///
/// `va` is the air velocity (ground velocity plus the wind component along
/// the direction of travel) and `vg` the ground velocity.
pub fn aerodynamic_power(rho: f64, cda: f64, fw: f64, va: f64, vg: f64) -> f64 {
    0.5 * rho * (cda + fw) * va.powi(2) * vg
}

/// Power to overcome rolling resistance on a gradient `gr`.
pub fn rolling_resistance_power(vg: f64, gr: f64, crr: f64, mt: f64, g: f64) -> f64 {
    vg * gr.atan().cos() * crr * mt * g
}

/// Power lost to wheel bearing friction.
pub fn wheel_bearing_power(vg: f64) -> f64 {
    vg * (91.0 + 8.7 * vg) * 0.001
}

/// Power associated with changes in potential energy.
pub fn potential_energy_power(vg: f64, mt: f64, g: f64, gr: f64) -> f64 {
    vg * mt * g * gr.atan().sin()
}

/// Power associated with changes in kinetic energy between `(ti, vgi)` and
/// `(tf, vgf)`, including the rotational inertia `i` of wheels of radius `r`.
pub fn kinetic_energy_power(mt: f64, i: f64, r: f64, vgi: f64, vgf: f64, ti: f64, tf: f64) -> f64 {
    0.5 * (mt + i / r.powi(2)) * (vgf.powi(2) - vgi.powi(2)) / (tf - ti)
}

/// Air velocity given ground velocity `vg`, wind speed `vw`, wind direction
/// `dw` and direction of travel `db`.
pub fn air_velocity(vg: f64, vw: f64, dw: f64, db: f64) -> f64 {
    vg + vw * (to_radians(dw) - to_radians(db)).cos()
}

/// Average ground velocity covering `d` metres in `t`.
pub fn ground_velocity(d: f64, t: Duration) -> f64 {
    d / t.as_secs_f64()
}

/// Yaw angle in degrees of the bike and rider relative to the apparent wind.
pub fn yaw(va: f64, vw: f64, dw: f64, db: f64) -> f64 {
    (vw * (to_radians(dw) - to_radians(db)).sin() / va).atan() * 180.0 / PI
}

/// Riding postures with an empirical frontal area model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Posture {
    /// Hands in the drops
    Drops,
    /// Forearms on aerobars
    Aero,
}

impl Posture {
    /// `(a, b)` coefficients of the frontal area regression
    pub fn area_coefficients(self) -> (f64, f64) {
        match self {
            Posture::Drops => (0.0276, 0.1647),
            Posture::Aero => (0.0293, 0.0604),
        }
    }

    /// Typical drag coefficient for the posture
    pub fn drag_coefficient(self) -> f64 {
        match self {
            Posture::Drops => 0.88,
            Posture::Aero => 0.70,
        }
    }
}

/// Frontal area (m²) of a rider of height `h` (m) and mass `m` (kg) at zero
/// yaw, with posture-specific coefficients `a` and `b`.
pub fn frontal_area(h: f64, m: f64, a: f64, b: f64) -> f64 {
    a * h.powf(0.725) * m.powf(0.425) + b
}

/// Frontal area for a given posture.
pub fn posture_area(posture: Posture, h: f64, m: f64) -> f64 {
    let (a, b) = posture.area_coefficients();
    frontal_area(h, m, a, b)
}

/// Estimated CdA for a rider of height `h` and mass `m` in `posture`.
pub fn estimated_cda(posture: Posture, h: f64, m: f64) -> f64 {
    posture.drag_coefficient() * posture_area(posture, h, m)
}

/// Barometric pressure (Pa) at altitude `h` metres where the air
/// temperature is `t` °C.
pub fn air_pressure(h: f64, t: f64, c: &PhysicalConstants) -> f64 {
    c.sea_level_pressure
        * ((-c.gravity * c.molar_mass_air * h) / (c.gas_constant * (t + c.celsius_offset))).exp()
}

/// Air density (kg/m³) at altitude `h` metres under gravity `g`, using the
/// troposphere lapse-rate model and the ideal gas law.
pub fn air_density(h: f64, g: f64, c: &PhysicalConstants) -> f64 {
    let t = c.sea_level_temperature - c.lapse_rate * h;
    let exponent = (g * c.molar_mass_air) / (c.gas_constant * c.lapse_rate);
    let p = c.sea_level_pressure * (1.0 - (c.lapse_rate * h) / c.sea_level_temperature).powf(exponent);
    (p * c.molar_mass_air) / (c.gas_constant * t)
}

/// Sustainable power at altitude `h` metres equivalent to `p` watts at sea
/// level (Clark et al., acute moderate altitude in trained cyclists).
pub fn altitude_adjust(p: f64, h: f64) -> f64 {
    let x = h / 1000.0;
    p * (-0.0092 * x.powi(2) - 0.0323 * x + 1.0)
}
