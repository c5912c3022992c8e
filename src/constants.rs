//! Physical constants and lookup tables for the power model
//!
//! Everything the formulas need beyond their direct scalar inputs lives in
//! [`PhysicalConstants`], which callers pass explicitly. The tire and
//! riding-position tables back the command line defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, VeloCalcError};

/// Typical coefficient of rolling resistance for road tires on smooth asphalt.
pub const DEFAULT_CRR: f64 = 0.004;

/// Constants table shared by the component formulas, aggregator and solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalConstants {
    /// Acceleration of gravity (m/s²)
    pub gravity: f64,

    /// Drive chain efficiency accounting for frictional losses, in (0, 1]
    pub drive_chain_efficiency: f64,

    /// Incremental drag area of the spokes due to wheel rotation (m²)
    pub spoke_drag_factor: f64,

    /// Moment of inertia of both wheels (kg·m²)
    pub wheel_inertia: f64,

    /// Standard dry air density at sea level (kg/m³)
    pub sea_level_rho: f64,

    /// Sea level standard temperature (K)
    pub sea_level_temperature: f64,

    /// Sea level air pressure (Pa)
    pub sea_level_pressure: f64,

    /// Molar mass of dry air (kg/mol)
    pub molar_mass_air: f64,

    /// Universal gas constant (J/(mol·K))
    pub gas_constant: f64,

    /// Kelvin value of 0 °C
    pub celsius_offset: f64,

    /// Temperature lapse rate in the troposphere (K/m)
    pub lapse_rate: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            gravity: 9.80665,
            drive_chain_efficiency: 0.976,
            spoke_drag_factor: 0.0044,
            wheel_inertia: 0.14,
            sea_level_rho: 1.225,
            sea_level_temperature: 288.15,
            sea_level_pressure: 101_325.0,
            molar_mass_air: 0.0289644,
            gas_constant: 8.31432,
            celsius_offset: 273.15,
            lapse_rate: 0.0065,
        }
    }
}

impl PhysicalConstants {
    /// Check the invariants the formulas rely on
    pub fn validate(&self) -> Result<()> {
        if !(self.drive_chain_efficiency > 0.0 && self.drive_chain_efficiency <= 1.0) {
            return Err(VeloCalcError::InvalidInput {
                field: "drive_chain_efficiency".to_string(),
                reason: format!("must be in (0, 1] but was {}", self.drive_chain_efficiency),
            });
        }
        if !(self.gravity > 0.0) {
            return Err(VeloCalcError::InvalidInput {
                field: "gravity".to_string(),
                reason: format!("must be positive but was {}", self.gravity),
            });
        }
        if !(self.lapse_rate > 0.0) || !(self.sea_level_temperature > 0.0) {
            return Err(VeloCalcError::InvalidInput {
                field: "lapse_rate".to_string(),
                reason: "atmosphere model needs positive lapse rate and temperature".to_string(),
            });
        }
        Ok(())
    }
}

/// Standard 700c road tire widths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum TireWidth {
    W20,
    W22,
    W23,
    W25,
    W28,
}

impl TireWidth {
    pub const ALL: [TireWidth; 5] = [
        TireWidth::W20,
        TireWidth::W22,
        TireWidth::W23,
        TireWidth::W25,
        TireWidth::W28,
    ];

    /// Nominal width in millimetres
    pub fn millimetres(self) -> u32 {
        match self {
            TireWidth::W20 => 20,
            TireWidth::W22 => 22,
            TireWidth::W23 => 23,
            TireWidth::W25 => 25,
            TireWidth::W28 => 28,
        }
    }

    /// Outside radius of the inflated tire in metres
    pub fn radius(self) -> f64 {
        match self {
            TireWidth::W20 => 0.331,
            TireWidth::W22 => 0.333,
            TireWidth::W23 => 0.334,
            TireWidth::W25 => 0.336,
            TireWidth::W28 => 0.339,
        }
    }
}

impl Default for TireWidth {
    fn default() -> Self {
        TireWidth::W23
    }
}

impl TryFrom<u32> for TireWidth {
    type Error = VeloCalcError;

    fn try_from(mm: u32) -> Result<Self> {
        TireWidth::ALL
            .into_iter()
            .find(|w| w.millimetres() == mm)
            .ok_or(VeloCalcError::UnknownTireWidth(mm))
    }
}

impl From<TireWidth> for u32 {
    fn from(width: TireWidth) -> u32 {
        width.millimetres()
    }
}

impl fmt::Display for TireWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "700x{}", self.millimetres())
    }
}

/// Riding positions with typical measured CdA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Tops,
    Hoods,
    Drops,
    RoadAero,
    TtAero,
}

impl Position {
    /// Typical drag area (m²) at zero yaw
    pub fn cda(self) -> f64 {
        match self {
            Position::Tops => 0.400,
            Position::Hoods => 0.350,
            Position::Drops => 0.310,
            Position::RoadAero => 0.290,
            Position::TtAero => 0.270,
        }
    }
}

impl FromStr for Position {
    type Err = VeloCalcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "tops" => Ok(Position::Tops),
            "hoods" => Ok(Position::Hoods),
            "drops" => Ok(Position::Drops),
            "road_aero" | "aero" => Ok(Position::RoadAero),
            "tt_aero" | "tt" => Ok(Position::TtAero),
            _ => Err(VeloCalcError::InvalidInput {
                field: "position".to_string(),
                reason: format!("unknown riding position '{}'", s),
            }),
        }
    }
}
