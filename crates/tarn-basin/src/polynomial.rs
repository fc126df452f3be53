//! Dense univariate polynomials and least-squares fitting.

use std::fmt;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tarn_core::{param, ModelError};
use tracing::{debug, warn};

/// Inline capacity covers the default fit degrees without allocating.
type Coeffs = SmallVec<[f64; 8]>;

/// A polynomial `c0 + c1·x + c2·x² + …`.
///
/// Coefficients are stored in ascending power order. Use
/// [`from_highest_first`](Self::from_highest_first) and
/// [`to_highest_first`](Self::to_highest_first) when exchanging
/// coefficient lists written highest power first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polynomial {
    coefficients: Coeffs,
}

impl Polynomial {
    /// Build from ascending-order coefficients. An empty slice is the zero
    /// polynomial.
    pub fn new(coefficients: &[f64]) -> Self {
        Self {
            coefficients: SmallVec::from_slice(coefficients),
        }
    }

    /// The zero polynomial of the given degree (all coefficients zero).
    pub fn zero(degree: usize) -> Self {
        Self {
            coefficients: SmallVec::from_elem(0.0, degree + 1),
        }
    }

    /// Build from coefficients ordered highest power first.
    pub fn from_highest_first(coefficients: &[f64]) -> Self {
        Self {
            coefficients: coefficients.iter().rev().copied().collect(),
        }
    }

    /// Coefficients ordered highest power first.
    pub fn to_highest_first(&self) -> Vec<f64> {
        self.coefficients.iter().rev().copied().collect()
    }

    /// Coefficients in ascending power order.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Nominal degree (number of coefficients minus one).
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Whether every coefficient is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.coefficients.iter().all(|&c| c == 0.0)
    }

    /// Evaluate at `x` with Horner's scheme.
    pub fn eval(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * x + c)
    }

    /// Evaluate at each of `xs`.
    pub fn eval_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }

    /// First derivative.
    pub fn derivative(&self) -> Self {
        if self.coefficients.len() <= 1 {
            return Self::zero(0);
        }
        Self {
            coefficients: self
                .coefficients
                .iter()
                .enumerate()
                .skip(1)
                .map(|(power, &c)| c * power as f64)
                .collect(),
        }
    }

    /// Least-squares fit of a degree-`degree` polynomial to `(x, y)`.
    ///
    /// Solves the column-normalised Vandermonde system by SVD, discarding
    /// singular values below `max(n, degree + 1) · ε · σ_max`. Fewer samples
    /// than coefficients give the minimum-norm solution rather than an
    /// error. Constant-zero `y` yields the zero polynomial.
    ///
    /// # Errors
    ///
    /// - [`ModelError::ShapeMismatch`] if `x` and `y` differ in length.
    /// - [`ModelError::EmptyInput`] if there are no samples.
    /// - [`ModelError::InvalidParameter`] if any sample is not finite.
    /// - [`ModelError::FitFailed`] if the SVD does not converge.
    pub fn fit(x: &[f64], y: &[f64], degree: usize) -> Result<Self, ModelError> {
        param::same_len("fit samples", x.len(), y.len())?;
        if x.is_empty() {
            return Err(ModelError::EmptyInput { what: "fit samples" });
        }
        for (&xi, &yi) in x.iter().zip(y) {
            param::finite("fit abscissa", xi)?;
            param::finite("fit ordinate", yi)?;
        }

        let n = x.len();
        let ncoef = degree + 1;
        if n < ncoef {
            warn!(
                samples = n,
                coefficients = ncoef,
                "fit is underdetermined; returning minimum-norm solution"
            );
        }

        if y.iter().all(|&v| v == 0.0) {
            debug!(degree, "all-zero ordinates, fit is the zero polynomial");
            return Ok(Self::zero(degree));
        }

        let mut a = DMatrix::<f64>::zeros(n, ncoef);
        for (i, &xi) in x.iter().enumerate() {
            let mut p = 1.0;
            for j in 0..ncoef {
                a[(i, j)] = p;
                p *= xi;
            }
        }

        // Normalise columns so high powers do not swamp the SVD.
        let mut scales = Vec::with_capacity(ncoef);
        for j in 0..ncoef {
            let norm = a.column(j).norm();
            let s = if norm > 0.0 { norm } else { 1.0 };
            for i in 0..n {
                a[(i, j)] /= s;
            }
            scales.push(s);
        }

        let b = DVector::from_column_slice(y);
        let svd = a.svd(true, true);
        let sigma_max = svd.singular_values.max();
        let eps = n.max(ncoef) as f64 * f64::EPSILON * sigma_max;
        let solution = svd
            .solve(&b, eps)
            .map_err(|reason| ModelError::FitFailed {
                reason: reason.to_string(),
            })?;

        let coefficients = solution
            .iter()
            .zip(&scales)
            .map(|(c, s)| c / s)
            .collect();
        debug!(degree, samples = n, "polynomial fitted");
        Ok(Self { coefficients })
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.coefficients.is_empty() {
            return write!(f, "0");
        }
        for (power, c) in self.coefficients.iter().enumerate() {
            if power > 0 {
                write!(f, " + ")?;
            }
            match power {
                0 => write!(f, "{c}")?,
                1 => write!(f, "{c}·x")?,
                _ => write!(f, "{c}·x^{power}")?,
            }
        }
        Ok(())
    }
}
