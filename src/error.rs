//! Error type for velocalc
//!
//! The numeric core never returns errors: out-of-domain inputs surface as
//! NaN or infinity. These variants cover the layers around it: validating
//! command line input, lookup tables and the rider profile file.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all velocalc operations
#[derive(Debug, Error)]
pub enum VeloCalcError {
    /// A scalar input outside its physically sensible range
    #[error("{field} {reason}")]
    InvalidInput { field: String, reason: String },

    /// Two inputs were given that describe the same quantity but disagree
    #[error("{0}")]
    Conflict(String),

    /// Tire width with no radius in the lookup table
    #[error("invalid tire width '{0}'")]
    UnknownTireWidth(u32),

    /// Direction that is neither a compass point nor a number of degrees
    #[error("invalid direction '{0}'")]
    UnknownDirection(String),

    /// Duration string that could not be parsed
    #[error("invalid duration '{0}'")]
    InvalidDuration(String),

    /// Profile could not be located or is inconsistent
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML profile
    #[error("Failed to parse profile: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Profile could not be serialized
    #[error("Failed to serialize profile: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Result type alias for velocalc operations
pub type Result<T> = std::result::Result<T, VeloCalcError>;

impl VeloCalcError {
    /// Shorthand for the most common validation failure
    pub fn negative(field: &str, value: f64) -> Self {
        VeloCalcError::InvalidInput {
            field: field.to_string(),
            reason: format!("must be non negative but was {:.6}", value),
        }
    }

    /// Whether the error came from user supplied input (as opposed to the
    /// environment), in which case usage help is worth printing
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            VeloCalcError::InvalidInput { .. }
                | VeloCalcError::Conflict(_)
                | VeloCalcError::UnknownTireWidth(_)
                | VeloCalcError::UnknownDirection(_)
                | VeloCalcError::InvalidDuration(_)
        )
    }

    /// Tracing level the error should be reported at
    pub fn to_tracing_level(&self) -> tracing::Level {
        if self.is_usage_error() {
            tracing::Level::WARN
        } else {
            tracing::Level::ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            VeloCalcError::negative("mr", -1.0).to_string(),
            "mr must be non negative but was -1.000000"
        );
        assert_eq!(
            VeloCalcError::UnknownTireWidth(24).to_string(),
            "invalid tire width '24'"
        );
        assert_eq!(
            VeloCalcError::UnknownDirection("NORTH".to_string()).to_string(),
            "invalid direction 'NORTH'"
        );
    }

    #[test]
    fn test_usage_errors() {
        assert!(VeloCalcError::Conflict("p and t".to_string()).is_usage_error());
        assert_eq!(
            VeloCalcError::InvalidDuration("12x".to_string()).to_tracing_level(),
            tracing::Level::WARN
        );

        let io = VeloCalcError::Io {
            path: PathBuf::from("/nope/profile.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(!io.is_usage_error());
        assert_eq!(io.to_tracing_level(), tracing::Level::ERROR);
    }
}
