use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::constants::{PhysicalConstants, TireWidth, DEFAULT_CRR};
use crate::error::{Result, VeloCalcError};

/// Rider profile: defaults for the command line and overrides for the
/// physical constants table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Profile {
    /// Rider and bike defaults
    #[serde(default)]
    pub rider: RiderSettings,

    /// Physical constants used by every calculation
    #[serde(default)]
    pub constants: PhysicalConstants,
}

/// Rider and equipment defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiderSettings {
    /// Mass of the rider in kg
    pub rider_mass: f64,

    /// Mass of the bicycle in kg
    pub bike_mass: f64,

    /// Tire width
    pub tire: TireWidth,

    /// Coefficient of drag times frontal area (m²)
    pub cda: f64,

    /// Coefficient of rolling resistance
    pub crr: f64,
}

impl Default for RiderSettings {
    fn default() -> Self {
        RiderSettings {
            rider_mass: 67.0,
            bike_mass: 8.0,
            tire: TireWidth::W23,
            cda: 0.325,
            crr: DEFAULT_CRR,
        }
    }
}

impl RiderSettings {
    /// Combined mass of rider and bike
    pub fn total_mass(&self) -> f64 {
        self.rider_mass + self.bike_mass
    }
}

impl Profile {
    /// Load a profile from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| VeloCalcError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let profile: Profile = toml::from_str(&content)?;
        profile.validate()?;

        debug!(path = %path.display(), "loaded rider profile");
        Ok(profile)
    }

    /// Save the profile to a TOML file, creating parent directories
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| VeloCalcError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let toml_content = toml::to_string_pretty(self)?;

        fs::write(path, toml_content).map_err(|source| VeloCalcError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(())
    }

    /// Default profile location: `~/.velocalc/profile.toml`
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".velocalc")
            .join("profile.toml")
    }

    /// Load the profile at `path`, or the default location when `None`.
    /// A missing default profile falls back to built-in defaults; an
    /// explicitly requested one must exist.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_path = Self::default_path();
                if !default_path.exists() {
                    return Ok(Self::default());
                }
                match Self::load_from_file(&default_path) {
                    Ok(profile) => Ok(profile),
                    Err(e) => {
                        warn!(path = %default_path.display(), error = %e, "ignoring unreadable profile");
                        Ok(Self::default())
                    }
                }
            }
        }
    }

    /// Check rider values and the constants table
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("rider_mass", self.rider.rider_mass),
            ("bike_mass", self.rider.bike_mass),
            ("cda", self.rider.cda),
            ("crr", self.rider.crr),
        ] {
            if value < 0.0 {
                return Err(VeloCalcError::negative(field, value));
            }
        }
        self.constants
            .validate()
            .map_err(|e| VeloCalcError::Configuration(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_profile_serialization() {
        let profile = Profile::default();
        let toml_str = toml::to_string(&profile).unwrap();
        let deserialized: Profile = toml::from_str(&toml_str).unwrap();

        assert_eq!(profile, deserialized);
        assert!(toml_str.contains("tire = 23"));
    }

    #[test]
    fn test_partial_profile_uses_defaults() {
        let profile: Profile = toml::from_str(
            r#"
            [rider]
            rider_mass = 72.5
            tire = 25

            [constants]
            drive_chain_efficiency = 0.98
            "#,
        )
        .unwrap();

        assert_eq!(profile.rider.rider_mass, 72.5);
        assert_eq!(profile.rider.bike_mass, 8.0);
        assert_eq!(profile.rider.tire, TireWidth::W25);
        assert_eq!(profile.rider.total_mass(), 80.5);
        assert_eq!(profile.constants.drive_chain_efficiency, 0.98);
        assert_eq!(profile.constants.gravity, 9.80665);
    }

    #[test]
    fn test_unknown_tire_width_rejected() {
        let result: std::result::Result<Profile, _> = toml::from_str("[rider]\ntire = 24\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_profile_file_io() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("profile.toml");

        let mut original = Profile::default();
        original.rider.rider_mass = 58.0;
        original.rider.tire = TireWidth::W28;

        original.save_to_file(&path).unwrap();
        let loaded = Profile::load_from_file(&path).unwrap();

        assert_eq!(loaded, original);
        assert_eq!(Profile::load_or_default(Some(&path)).unwrap(), original);
    }

    #[test]
    fn test_invalid_profile_rejected() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("profile.toml");
        fs::write(&path, "[constants]\ndrive_chain_efficiency = 1.5\n").unwrap();

        assert!(matches!(
            Profile::load_from_file(&path),
            Err(VeloCalcError::Configuration(_))
        ));
    }

    #[test]
    fn test_missing_explicit_profile_is_error() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("absent.toml");

        assert!(matches!(
            Profile::load_or_default(Some(&path)),
            Err(VeloCalcError::Io { .. })
        ));
    }
}
