//! Error types for the Tarn toolkit.
//!
//! Failures are split into two classes. [`ModelError`] covers inputs that
//! are rejected before any computation runs. [`Degeneracy`] covers inputs
//! that still produce a well-defined (but trivial) result, such as an empty
//! well field or an elevation grid with no data; these are reported through
//! `degeneracy()` accessors and never through `Err`.

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Errors returned by the numerical operations.
#[derive(Clone, Debug, PartialEq)]
pub enum ModelError {
    /// A scalar parameter is outside its valid range
    /// (non-positive transmissivity or casing radius, zero level step, ...).
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// Which constraint was violated.
        reason: String,
    },
    /// Two inputs that must have matching lengths do not.
    ShapeMismatch {
        /// What was being compared.
        what: &'static str,
        /// The expected length.
        expected: usize,
        /// The actual length.
        found: usize,
    },
    /// An input collection that must be non-empty is empty.
    EmptyInput {
        /// Which input was empty.
        what: &'static str,
    },
    /// The least-squares solve did not converge.
    FitFailed {
        /// Description from the linear algebra backend.
        reason: String,
    },
    /// An isotope name did not match any supported species.
    UnknownIsotope {
        /// The unrecognised name.
        name: String,
    },
    /// A configuration struct failed validation.
    Config(ConfigError),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter {
                name,
                value,
                reason,
            } => write!(f, "invalid parameter '{name}' = {value}: {reason}"),
            Self::ShapeMismatch {
                what,
                expected,
                found,
            } => write!(f, "{what}: expected length {expected}, found {found}"),
            Self::EmptyInput { what } => write!(f, "{what} must not be empty"),
            Self::FitFailed { reason } => write!(f, "polynomial fit failed: {reason}"),
            Self::UnknownIsotope { name } => write!(f, "unknown isotope '{name}'"),
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
        }
    }
}

impl Error for ModelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for ModelError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Errors detected by the `validate()` methods of the configuration structs.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A polynomial degree exceeds [`FitConfig::MAX_DEGREE`](crate::FitConfig::MAX_DEGREE).
    InvalidDegree {
        /// Which fit the degree belongs to (`"area"` or `"volume"`).
        curve: &'static str,
        /// The configured degree.
        degree: usize,
    },
    /// The evaporation pan factor is NaN, infinite, zero or negative.
    InvalidPanFactor {
        /// The invalid value.
        value: f64,
    },
    /// A level sweep cannot produce any levels.
    InvalidSweep {
        /// Description of which invariant was violated.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDegree { curve, degree } => {
                write!(f, "{curve} fit degree {degree} is out of range")
            }
            Self::InvalidPanFactor { value } => {
                write!(f, "pan factor must be finite and > 0, got {value}")
            }
            Self::InvalidSweep { reason } => write!(f, "invalid level sweep: {reason}"),
        }
    }
}

impl Error for ConfigError {}

/// A non-fatal condition under which an operation returns a trivial result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Degeneracy {
    /// The well field has no wells; head is identically zero.
    EmptyWellField,
    /// Every cell of the elevation surface is no data; nothing can flood.
    NoDataSurface,
    /// The surface has data but no candidate level floods any cell.
    ZeroCurve,
}

impl fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyWellField => write!(f, "well field is empty"),
            Self::NoDataSurface => write!(f, "elevation surface contains no data"),
            Self::ZeroCurve => write!(f, "no candidate level floods the surface"),
        }
    }
}
