// Library interface for velocalc
// The binary and integration tests both go through these modules

pub mod approx;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod formulas;
pub mod logging;
pub mod power;
pub mod solver;

// Re-export commonly used types for convenience
pub use approx::{approx_eq, approx_equal, DEFAULT_EPSILON, SOLVER_EPSILON};
pub use constants::{PhysicalConstants, Position, TireWidth};
pub use error::{Result, VeloCalcError};
pub use formulas::Posture;
pub use power::{Acceleration, PowerComponents, Ride, Wind};
pub use solver::{
    distance_for_duration, duration_for_distance, solve_velocity, velocity_for_power,
    VelocitySolution,
};
