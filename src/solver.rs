//! Velocity-from-power solver
//!
//! No closed form inverts the steady-state power model once drag, rolling
//! resistance and climbing are combined, so the ground velocity for a
//! target power is found by bisection over `[0, 100]` m/s.
//!
//! The search runs a fixed budget of iterations and always returns its
//! current midpoint. Inputs outside the search domain (a target that needs
//! more than 100 m/s, or a descent steep enough that zero effort exceeds
//! the target) are a caller precondition; the result then sits at a bound
//! with `converged == false`.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::approx::{approx_equal, SOLVER_EPSILON};
use crate::constants::PhysicalConstants;
use crate::power::Ride;

/// Lower bound of the velocity search (m/s)
pub const MIN_VELOCITY: f64 = 0.0;

/// Upper bound of the velocity search (m/s)
pub const MAX_VELOCITY: f64 = 100.0;

/// Iteration budget of the bisection
pub const MAX_ITERATIONS: u32 = 100;

/// Outcome of a velocity search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocitySolution {
    /// Ground velocity estimate (m/s)
    pub velocity: f64,
    /// Model power at `velocity` (W)
    pub power: f64,
    /// Iterations used
    pub iterations: u32,
    /// Whether `power` matched the target within the solver epsilon
    pub converged: bool,
}

impl VelocitySolution {
    /// Difference between the model power at the estimate and the target
    pub fn residual(&self, target_power: f64) -> f64 {
        self.power - target_power
    }
}

/// Find the steady-state ground velocity at which `ride` requires
/// `target_power` watts.
pub fn solve_velocity(target_power: f64, ride: &Ride, c: &PhysicalConstants) -> VelocitySolution {
    let mut low = MIN_VELOCITY;
    let mut high = MAX_VELOCITY;
    let mut mid = (low + high) / 2.0;
    let mut power = f64::NAN;

    for iteration in 0..MAX_ITERATIONS {
        // Air velocity depends on ground velocity, so it is rederived each step.
        power = ride.power_at(mid, c);
        trace!(iteration, low, mid, high, power, "bisection step");

        if approx_equal(power, target_power, SOLVER_EPSILON) {
            debug!(
                target_power,
                velocity = mid,
                iterations = iteration + 1,
                "velocity solver converged"
            );
            return VelocitySolution {
                velocity: mid,
                power,
                iterations: iteration + 1,
                converged: true,
            };
        }

        if power > target_power {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2.0;
    }

    warn!(
        target_power,
        velocity = mid,
        last_power = power,
        "velocity solver exhausted its iteration budget"
    );
    VelocitySolution {
        velocity: mid,
        power: ride.power_at(mid, c),
        iterations: MAX_ITERATIONS,
        converged: false,
    }
}

/// Ground velocity (m/s) sustainable at `target_power` watts.
pub fn velocity_for_power(target_power: f64, ride: &Ride, c: &PhysicalConstants) -> f64 {
    solve_velocity(target_power, ride, c).velocity
}

/// Seconds needed to cover `distance` metres at `power` watts.
pub fn duration_for_distance(power: f64, distance: f64, ride: &Ride, c: &PhysicalConstants) -> f64 {
    distance / velocity_for_power(power, ride, c)
}

/// Metres covered in `duration` seconds at `power` watts.
pub fn distance_for_duration(power: f64, duration: f64, ride: &Ride, c: &PhysicalConstants) -> f64 {
    velocity_for_power(power, ride, c) * duration
}
