//! Scalar parameter checks shared by the constructors.

use crate::error::ModelError;

/// Require `value` to be finite.
pub fn finite(name: &'static str, value: f64) -> Result<f64, ModelError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ModelError::InvalidParameter {
            name,
            value,
            reason: "must be finite".into(),
        })
    }
}

/// Require `value` to be finite and strictly positive.
pub fn positive(name: &'static str, value: f64) -> Result<f64, ModelError> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ModelError::InvalidParameter {
            name,
            value,
            reason: "must be > 0".into(),
        })
    }
}

/// Require `value` to be finite and non-zero.
pub fn non_zero(name: &'static str, value: f64) -> Result<f64, ModelError> {
    finite(name, value)?;
    if value != 0.0 {
        Ok(value)
    } else {
        Err(ModelError::InvalidParameter {
            name,
            value,
            reason: "must not be zero".into(),
        })
    }
}

/// Require `value` to lie in the closed interval `[lo, hi]`.
pub fn in_range(name: &'static str, value: f64, lo: f64, hi: f64) -> Result<f64, ModelError> {
    finite(name, value)?;
    if (lo..=hi).contains(&value) {
        Ok(value)
    } else {
        Err(ModelError::InvalidParameter {
            name,
            value,
            reason: format!("must be within [{lo}, {hi}]"),
        })
    }
}

/// Require two slices to have the same length.
pub fn same_len(what: &'static str, expected: usize, found: usize) -> Result<(), ModelError> {
    if expected == found {
        Ok(())
    } else {
        Err(ModelError::ShapeMismatch {
            what,
            expected,
            found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_rejects_zero_negative_and_nan() {
        assert!(positive("t", 0.0).is_err());
        assert!(positive("t", -1.0).is_err());
        assert!(positive("t", f64::NAN).is_err());
        assert!(positive("t", f64::INFINITY).is_err());
        assert_eq!(positive("t", 2.5), Ok(2.5));
    }

    #[test]
    fn non_zero_accepts_negative() {
        assert_eq!(non_zero("step", -0.01), Ok(-0.01));
        assert!(non_zero("step", 0.0).is_err());
        assert!(non_zero("step", -0.0).is_err());
    }

    #[test]
    fn in_range_is_inclusive() {
        assert!(in_range("rh", 0.0, 0.0, 1.0).is_ok());
        assert!(in_range("rh", 1.0, 0.0, 1.0).is_ok());
        assert!(in_range("rh", 1.01, 0.0, 1.0).is_err());
    }

    #[test]
    fn same_len_reports_both_lengths() {
        let err = same_len("query_y", 3, 2).unwrap_err();
        assert_eq!(
            err,
            ModelError::ShapeMismatch {
                what: "query_y",
                expected: 3,
                found: 2
            }
        );
    }
}
