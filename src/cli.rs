//! Command line front end
//!
//! Turns raw flags (plus the rider profile) into a validated, unit-normalized
//! [`Calculation`], runs it against the power model and renders the result.
//! All input validation lives here; the model itself accepts any scalars.

use clap::Args;
use serde::Serialize;
use std::fmt::Write as _;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::approx::approx_eq;
use crate::config::{Profile, RiderSettings};
use crate::constants::{PhysicalConstants, Position, TireWidth};
use crate::error::{Result, VeloCalcError};
use crate::formulas::{air_density, altitude_adjust, ground_velocity};
use crate::power::{Acceleration, PowerComponents, Ride, Wind};
use crate::solver::solve_velocity;

/// 16-point compass rose in degrees
pub const COMPASS: [(&str, f64); 16] = [
    ("N", 0.0),
    ("NNE", 22.5),
    ("NE", 45.0),
    ("ENE", 67.5),
    ("E", 90.0),
    ("ESE", 112.5),
    ("SE", 135.0),
    ("SSE", 157.5),
    ("S", 180.0),
    ("SSW", 202.5),
    ("SW", 225.0),
    ("WSW", 247.5),
    ("W", 270.0),
    ("WNW", 292.5),
    ("NW", 315.0),
    ("NNW", 337.5),
];

/// Parse a compass point (`"NNE"`, case-insensitive) or a bearing in degrees.
pub fn parse_direction(s: &str) -> Result<f64> {
    let upper = s.trim().to_uppercase();
    if let Some((_, degrees)) = COMPASS.iter().find(|(name, _)| *name == upper) {
        return Ok(*degrees);
    }
    upper
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite())
        .ok_or_else(|| VeloCalcError::UnknownDirection(s.to_string()))
}

/// Parse a duration given as unit-suffixed parts (`"12m34s"`, `"1h2m"`,
/// `"90.5s"`), clock notation (`"12:34"`, `"1:02:03"`) or bare seconds.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();
    let invalid = || VeloCalcError::InvalidDuration(s.to_string());

    if s.is_empty() {
        return Err(invalid());
    }

    if let Ok(secs) = s.parse::<f64>() {
        return Duration::try_from_secs_f64(secs).map_err(|_| invalid());
    }

    if s.contains(':') {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() > 3 {
            return Err(invalid());
        }
        let mut secs = 0.0;
        for (i, part) in parts.iter().enumerate() {
            let value: f64 = part.parse().map_err(|_| invalid())?;
            // Every field but the leading one must be below 60.
            if value < 0.0 || (i > 0 && value >= 60.0) {
                return Err(invalid());
            }
            secs = secs * 60.0 + value;
        }
        return Duration::try_from_secs_f64(secs).map_err(|_| invalid());
    }

    let mut secs = 0.0;
    let mut number = String::new();
    for ch in s.chars() {
        if ch.is_ascii_digit() || ch == '.' {
            number.push(ch);
            continue;
        }
        let scale = match ch {
            'h' => 3600.0,
            'm' => 60.0,
            's' => 1.0,
            _ => return Err(invalid()),
        };
        let value: f64 = number.parse().map_err(|_| invalid())?;
        secs += value * scale;
        number.clear();
    }
    if !number.is_empty() {
        return Err(invalid());
    }
    Duration::try_from_secs_f64(secs).map_err(|_| invalid())
}

/// `h:mm:ss`, or `m:ss` under an hour, rounded to the nearest second.
pub fn format_duration(d: Duration) -> String {
    let total = d.as_secs_f64().round() as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

/// Compact unit-suffixed form such as `14m25s`, for piping into scripts.
/// Rounds the same way as [`format_duration`].
pub fn format_duration_compact(d: Duration) -> String {
    let total = d.as_secs_f64().round() as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    let mut out = String::new();
    if h > 0 {
        let _ = write!(out, "{}h", h);
    }
    if h > 0 || m > 0 {
        let _ = write!(out, "{}m", m);
    }
    let _ = write!(out, "{}s", s);
    out
}

/// Raw calculation flags
#[derive(Debug, Clone, Default, Args)]
pub struct CalcArgs {
    /// Air density in kg/m³ [default: sea level]
    #[arg(long)]
    pub rho: Option<f64>,

    /// Coefficient of drag times frontal area in m² [default: profile]
    #[arg(long, conflicts_with = "position")]
    pub cda: Option<f64>,

    /// Riding position to take a typical CdA from (tops, hoods, drops, road-aero, tt-aero)
    #[arg(long)]
    pub position: Option<Position>,

    /// Coefficient of rolling resistance [default: profile]
    #[arg(long)]
    pub crr: Option<f64>,

    /// Mass of the rider in kg [default: profile]
    #[arg(long)]
    pub mr: Option<f64>,

    /// Mass of the bicycle in kg [default: profile]
    #[arg(long)]
    pub mb: Option<f64>,

    /// Tire width in mm (20, 22, 23, 25 or 28) [default: profile]
    #[arg(long)]
    pub tire: Option<u32>,

    /// Wind speed in m/s
    #[arg(long, default_value_t = 0.0)]
    pub vw: f64,

    /// Compass point or bearing the wind originates from
    #[arg(long, default_value = "N", value_parser = parse_direction)]
    pub dw: f64,

    /// Compass point or bearing the bicycle is travelling
    #[arg(long, default_value = "N", value_parser = parse_direction)]
    pub db: f64,

    /// Total elevation gained in m
    #[arg(short = 'e', long = "elevation-gain", default_value_t = 0.0)]
    pub elevation_gain: f64,

    /// Average grade, as rise/run or percent
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub gr: f64,

    /// Median elevation in m, used to derive air density
    #[arg(long, default_value_t = 0.0)]
    pub altitude: f64,

    /// Reduce the given power for the oxygen available at --altitude
    #[arg(long)]
    pub adjust_power: bool,

    /// Distance travelled in m
    #[arg(short = 'd', long)]
    pub distance: f64,

    /// Power in watts; solves for duration
    #[arg(short = 'p', long)]
    pub power: Option<f64>,

    /// Duration ("12m34s", "12:34" or seconds); solves for power
    #[arg(short = 't', long, value_parser = parse_duration)]
    pub duration: Option<Duration>,
}

/// What the calculation solves for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    /// Given power in watts, find the duration
    Duration { power: f64 },
    /// Given a duration, find the power
    Power { duration: Duration },
}

/// Validated, unit-normalized calculation
#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub ride: Ride,
    pub rider_mass: f64,
    pub distance: f64,
    pub target: Target,
    pub constants: PhysicalConstants,
}

fn non_negative(field: &str, value: f64) -> Result<f64> {
    if value < 0.0 || value.is_nan() {
        return Err(VeloCalcError::negative(field, value));
    }
    Ok(value)
}

impl CalcArgs {
    /// Validate the flags, filling gaps from `profile`
    pub fn resolve(&self, profile: &Profile) -> Result<Calculation> {
        let constants = profile.constants;
        constants.validate()?;
        let rider = &profile.rider;

        let cda = match (self.cda, self.position) {
            (Some(cda), _) => cda,
            (None, Some(position)) => position.cda(),
            (None, None) => rider.cda,
        };
        let settings = RiderSettings {
            rider_mass: non_negative("mr", self.mr.unwrap_or(rider.rider_mass))?,
            bike_mass: non_negative("mb", self.mb.unwrap_or(rider.bike_mass))?,
            tire: match self.tire {
                Some(mm) => TireWidth::try_from(mm)?,
                None => rider.tire,
            },
            cda: non_negative("cda", cda)?,
            crr: non_negative("crr", self.crr.unwrap_or(rider.crr))?,
        };
        let wind_speed = non_negative("vw", self.vw)?;
        let altitude = non_negative("altitude", self.altitude)?;

        let mut rho = non_negative("rho", self.rho.unwrap_or(constants.sea_level_rho))?;
        if altitude != 0.0 {
            let derived = air_density(altitude, constants.gravity, &constants);
            if let Some(given) = self.rho {
                if !approx_eq(given, derived) {
                    return Err(VeloCalcError::Conflict(format!(
                        "specified both rho={:.6} and altitude={:.6} but they do not agree",
                        given, altitude
                    )));
                }
            }
            rho = derived;
        }

        // Grades beyond ±1 can only be percentages.
        let mut gradient = self.gr;
        if !(-1.0..=1.0).contains(&gradient) {
            gradient /= 100.0;
        }

        if !(self.distance > 0.0) {
            return Err(VeloCalcError::InvalidInput {
                field: "d".to_string(),
                reason: format!("must be positive but was {:.6}", self.distance),
            });
        }
        let distance = self.distance;

        if self.elevation_gain > 0.0 {
            let derived = self.elevation_gain / distance;
            if gradient > 0.0 && !approx_eq(gradient, derived) {
                return Err(VeloCalcError::Conflict(format!(
                    "specified both e={:.6} and gr={:.6} but they do not agree",
                    self.elevation_gain, gradient
                )));
            }
            gradient = derived;
        }

        let target = match (self.power, self.duration) {
            (Some(_), Some(_)) => {
                return Err(VeloCalcError::Conflict(
                    "t and p can't both be provided".to_string(),
                ))
            }
            (Some(power), None) => {
                let mut power = non_negative("p", power)?;
                if self.adjust_power && altitude != 0.0 {
                    let adjusted = altitude_adjust(power, altitude);
                    info!(power, adjusted, altitude, "adjusted power for altitude");
                    power = adjusted;
                }
                Target::Duration { power }
            }
            (None, Some(duration)) => {
                if duration.is_zero() {
                    return Err(VeloCalcError::InvalidInput {
                        field: "t".to_string(),
                        reason: "must be positive".to_string(),
                    });
                }
                Target::Power { duration }
            }
            (None, None) => {
                return Err(VeloCalcError::InvalidInput {
                    field: "p or t".to_string(),
                    reason: "must be specified".to_string(),
                })
            }
        };

        let calculation = Calculation {
            ride: Ride {
                rho,
                cda: settings.cda,
                crr: settings.crr,
                gradient,
                total_mass: settings.total_mass(),
                wind: Wind {
                    speed: wind_speed,
                    direction: self.dw,
                },
                heading: self.db,
                tire_radius: settings.tire.radius(),
            },
            rider_mass: settings.rider_mass,
            distance,
            target,
            constants,
        };
        debug!(?calculation, "resolved calculation");
        Ok(calculation)
    }
}

/// Result of running a [`Calculation`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "solved_for", rename_all = "snake_case")]
pub enum Outcome {
    Duration {
        power: f64,
        velocity: f64,
        seconds: f64,
        converged: bool,
    },
    Power {
        seconds: f64,
        velocity: f64,
        total: f64,
        components: PowerComponents,
    },
}

impl Calculation {
    pub fn run(&self) -> Outcome {
        match self.target {
            Target::Duration { power } => {
                let solution = solve_velocity(power, &self.ride, &self.constants);
                if !solution.converged {
                    warn!(
                        power,
                        residual = solution.residual(power),
                        "power is outside the reachable velocity range"
                    );
                }
                Outcome::Duration {
                    power,
                    velocity: solution.velocity,
                    seconds: self.distance / solution.velocity,
                    converged: solution.converged,
                }
            }
            Target::Power { duration } => {
                let vg = ground_velocity(self.distance, duration);
                let va = self.ride.air_velocity(vg);
                let accel = Acceleration::steady(vg, duration.as_secs_f64());
                let components = PowerComponents::new(&self.ride, vg, va, &accel, &self.constants);
                Outcome::Power {
                    seconds: duration.as_secs_f64(),
                    velocity: vg,
                    total: components.total(),
                    components,
                }
            }
        }
    }

    /// Render `outcome` for a terminal (`pretty`) or as a bare value
    pub fn render(&self, outcome: &Outcome, pretty: bool) -> String {
        let km = self.distance / 1000.0;
        let grade = self.ride.gradient * 100.0;
        match outcome {
            Outcome::Duration { power, seconds, .. } => {
                let duration = Duration::try_from_secs_f64(*seconds).unwrap_or(Duration::MAX);
                if pretty {
                    format!(
                        "{:.2} km @ {:.2}% @ {:.2} W ({:.2} W/kg) = {}",
                        km,
                        grade,
                        power,
                        power / self.rider_mass,
                        format_duration(duration)
                    )
                } else {
                    format_duration_compact(duration)
                }
            }
            Outcome::Power {
                seconds,
                total,
                components,
                ..
            } => {
                if pretty {
                    let duration = Duration::from_secs_f64(*seconds);
                    format!(
                        "{} ({:.2} km @ {:.2}%) = {:.2} W ({:.2} W/kg) = AT:{:.2} W + RR:{:.2} W + WB:{:.2} W + PE:{:.2} W",
                        format_duration(duration),
                        km,
                        grade,
                        total,
                        components.watts_per_kg(self.rider_mass),
                        components.aerodynamic,
                        components.rolling_resistance,
                        components.wheel_bearing,
                        components.potential_energy
                    )
                } else {
                    format!("{}", total)
                }
            }
        }
    }
}
