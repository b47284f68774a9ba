//! Error type shared by every stage of the storm synthesis.
//!
//! All core failures are caller input-contract violations: the computations are pure,
//! so a failing input fails the same way every time. `Io` and `Config` only come out
//! of scenario loading.

use std::path::PathBuf;
use thiserror::Error;

pub type HydroResult<T> = Result<T, HydroError>;

#[derive(Error, Debug)]
pub enum HydroError {
    /// Out-of-domain numeric input
    #[error("invalid parameter: {name}={value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("series '{name}' is empty")]
    EmptySeries { name: &'static str },

    #[error("length mismatch: {name} expected {expected}, got {actual}")]
    LengthMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("no curve number for soil group '{soil_group}' and land use '{land_use}'")]
    UnknownCover {
        soil_group: String,
        land_use: String,
    },

    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scenario: {0}")]
    Config(#[from] toml::de::Error),
}

impl HydroError {
    pub fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        HydroError::InvalidParameter {
            name,
            value,
            reason,
        }
    }

    /// True for every error raised by a bad numeric or array input.
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(
            self,
            HydroError::InvalidParameter { .. }
                | HydroError::EmptySeries { .. }
                | HydroError::LengthMismatch { .. }
                | HydroError::UnknownCover { .. }
        )
    }
}

// Fails unless `value` is finite and strictly positive
pub(crate) fn require_positive(name: &'static str, value: f64) -> HydroResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(HydroError::invalid(name, value, "must be finite and > 0"))
    }
}

// Fails unless `value` is finite and >= 0
pub(crate) fn require_non_negative(name: &'static str, value: f64) -> HydroResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(HydroError::invalid(name, value, "must be finite and >= 0"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_guard() {
        assert_eq!(require_positive("tc", 1.5).unwrap(), 1.5);
        assert!(require_positive("tc", 0.0).is_err());
        assert!(require_positive("tc", -1.0).is_err());
        assert!(require_positive("tc", f64::NAN).is_err());
        assert!(require_positive("tc", f64::INFINITY).is_err());
    }

    #[test]
    fn non_negative_guard() {
        assert_eq!(require_non_negative("i_min", 0.0).unwrap(), 0.0);
        assert!(require_non_negative("i_min", -0.1).is_err());
    }

    #[test]
    fn message_names_the_parameter() {
        let err = HydroError::invalid("curve_number", 120.0, "must lie in (0, 100]");
        let msg = err.to_string();
        assert!(msg.contains("curve_number"));
        assert!(msg.contains("120"));
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn array_errors_are_input_errors() {
        assert!(HydroError::EmptySeries { name: "effective" }.is_invalid_parameter());
        let err = HydroError::LengthMismatch {
            name: "depths",
            expected: 3,
            actual: 2,
        };
        assert!(err.is_invalid_parameter());
    }
}
