//! Power aggregation for the cycling power model
//!
//! Combines the component formulas into a [`PowerComponents`] breakdown and
//! a total, each term already corrected for drive chain losses. Two models
//! are provided:
//!
//! - the full model, including kinetic energy changes between two
//!   velocity/time samples ([`PowerComponents::new`], [`total_power`])
//! - the steady-state model used by the solver, where no acceleration is
//!   modelled and the kinetic energy term is excluded
//!   ([`PowerComponents::steady`], [`steady_power`])

use serde::{Deserialize, Serialize};

use crate::constants::{PhysicalConstants, TireWidth};
use crate::formulas::{
    aerodynamic_power, air_velocity, kinetic_energy_power, potential_energy_power,
    rolling_resistance_power, wheel_bearing_power,
};

/// Wind speed and the compass bearing it blows from
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    /// Speed in m/s
    pub speed: f64,
    /// Direction in degrees
    pub direction: f64,
}

impl Wind {
    pub fn calm() -> Self {
        Self::default()
    }
}

/// Rider, bike and environment inputs shared by the aggregator and solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ride {
    /// Air density (kg/m³)
    pub rho: f64,
    /// Drag coefficient times frontal area (m²)
    pub cda: f64,
    /// Coefficient of rolling resistance
    pub crr: f64,
    /// Road gradient as rise/run
    pub gradient: f64,
    /// Total mass of rider and bike (kg)
    pub total_mass: f64,
    pub wind: Wind,
    /// Direction of travel in degrees
    pub heading: f64,
    /// Outside radius of the tire (m)
    pub tire_radius: f64,
}

impl Default for Ride {
    fn default() -> Self {
        Self {
            rho: PhysicalConstants::default().sea_level_rho,
            cda: 0.325,
            crr: crate::constants::DEFAULT_CRR,
            gradient: 0.0,
            total_mass: 75.0,
            wind: Wind::calm(),
            heading: 0.0,
            tire_radius: TireWidth::default().radius(),
        }
    }
}

impl Ride {
    /// Air velocity seen by the rider at ground velocity `vg`
    pub fn air_velocity(&self, vg: f64) -> f64 {
        air_velocity(vg, self.wind.speed, self.wind.direction, self.heading)
    }

    /// Steady-state breakdown at ground velocity `vg`, with air velocity
    /// derived from the ride's wind and heading
    pub fn components_at(&self, vg: f64, c: &PhysicalConstants) -> PowerComponents {
        PowerComponents::steady(self, vg, self.air_velocity(vg), c)
    }

    /// Steady-state total power at ground velocity `vg`
    pub fn power_at(&self, vg: f64, c: &PhysicalConstants) -> f64 {
        self.components_at(vg, c).total()
    }
}

/// Velocity change over an interval, for the kinetic energy term
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Acceleration {
    pub initial_velocity: f64,
    pub final_velocity: f64,
    pub initial_time: f64,
    pub final_time: f64,
}

impl Acceleration {
    /// Constant velocity `vg` held for `duration` seconds. A zero duration
    /// is replaced by a nominal second so the kinetic energy term stays
    /// defined (and zero).
    pub fn steady(vg: f64, duration: f64) -> Self {
        Self {
            initial_velocity: vg,
            final_velocity: vg,
            initial_time: 0.0,
            final_time: if duration == 0.0 { 1.0 } else { duration },
        }
    }
}

/// Breakdown of total power into its physical components
///
/// Every field is already divided by the drive chain efficiency, so the
/// total is their plain sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerComponents {
    /// Aerodynamic drag (AT)
    pub aerodynamic: f64,
    /// Rolling resistance (RR)
    pub rolling_resistance: f64,
    /// Wheel bearing friction (WB)
    pub wheel_bearing: f64,
    /// Potential energy change (PE)
    pub potential_energy: f64,
    /// Kinetic energy change (KE)
    pub kinetic_energy: f64,
}

impl PowerComponents {
    /// Full breakdown at ground velocity `vg` and air velocity `va`,
    /// including the kinetic energy of `accel`
    pub fn new(
        ride: &Ride,
        vg: f64,
        va: f64,
        accel: &Acceleration,
        c: &PhysicalConstants,
    ) -> Self {
        let ec = c.drive_chain_efficiency;
        Self {
            kinetic_energy: kinetic_energy_power(
                ride.total_mass,
                c.wheel_inertia,
                ride.tire_radius,
                accel.initial_velocity,
                accel.final_velocity,
                accel.initial_time,
                accel.final_time,
            ) / ec,
            ..Self::steady(ride, vg, va, c)
        }
    }

    /// Breakdown without the kinetic energy term
    pub fn steady(ride: &Ride, vg: f64, va: f64, c: &PhysicalConstants) -> Self {
        let ec = c.drive_chain_efficiency;
        Self {
            aerodynamic: aerodynamic_power(ride.rho, ride.cda, c.spoke_drag_factor, va, vg) / ec,
            rolling_resistance: rolling_resistance_power(
                vg,
                ride.gradient,
                ride.crr,
                ride.total_mass,
                c.gravity,
            ) / ec,
            wheel_bearing: wheel_bearing_power(vg) / ec,
            potential_energy: potential_energy_power(vg, ride.total_mass, c.gravity, ride.gradient)
                / ec,
            kinetic_energy: 0.0,
        }
    }

    /// Total power: AT + RR + WB + PE + KE
    pub fn total(&self) -> f64 {
        self.aerodynamic
            + self.rolling_resistance
            + self.wheel_bearing
            + self.potential_energy
            + self.kinetic_energy
    }

    /// Total divided by rider mass (W/kg)
    pub fn watts_per_kg(&self, rider_mass: f64) -> f64 {
        self.total() / rider_mass
    }
}

/// Total power under the full model
pub fn total_power(
    ride: &Ride,
    vg: f64,
    va: f64,
    accel: &Acceleration,
    c: &PhysicalConstants,
) -> f64 {
    PowerComponents::new(ride, vg, va, accel, c).total()
}

/// Total power under the steady-state model
pub fn steady_power(ride: &Ride, vg: f64, va: f64, c: &PhysicalConstants) -> f64 {
    PowerComponents::steady(ride, vg, va, c).total()
}
