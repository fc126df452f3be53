//! Scattered survey points onto a regular grid.
//!
//! Every grid node is estimated independently from the samples, so the
//! node loop is embarrassingly parallel. Nodes with no usable sample get
//! `NaN` (no data).

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tarn_core::{meshgrid, param, GridAxis, ModelError, ParallelConfig};
use tracing::debug;

use crate::surface::ElevationSurface;

/// Distance below which a node is treated as sitting on a sample.
const COINCIDENT: f64 = 1e-10;

/// Survey samples `(x[i], y[i], z[i])`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScatteredPoints {
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
}

impl ScatteredPoints {
    /// Wrap three parallel coordinate arrays.
    ///
    /// # Errors
    ///
    /// [`ModelError::ShapeMismatch`] if the lengths differ,
    /// [`ModelError::EmptyInput`] if there are no samples.
    pub fn new(x: Vec<f64>, y: Vec<f64>, z: Vec<f64>) -> Result<Self, ModelError> {
        param::same_len("survey y", x.len(), y.len())?;
        param::same_len("survey z", x.len(), z.len())?;
        if x.is_empty() {
            return Err(ModelError::EmptyInput {
                what: "survey points",
            });
        }
        Ok(Self { x, y, z })
    }

    /// Collect `(x, y, z)` triples.
    pub fn from_triples<I>(triples: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (f64, f64, f64)>,
    {
        let mut points = Self::default();
        points.extend(triples);
        Self::new(points.x, points.y, points.z)
    }

    /// Append one sample.
    pub fn push(&mut self, x: f64, y: f64, z: f64) {
        self.x.push(x);
        self.y.push(y);
        self.z.push(z);
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether there are no samples.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Iterate samples as `(x, y, z)`.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.z)
            .map(|((&x, &y), &z)| (x, y, z))
    }

    /// Keep only samples for which `keep(x, y, z)` holds.
    pub fn retain(&mut self, mut keep: impl FnMut(f64, f64, f64) -> bool) {
        let kept: Vec<_> = self.iter().filter(|&(x, y, z)| keep(x, y, z)).collect();
        self.x.clear();
        self.y.clear();
        self.z.clear();
        self.extend(kept);
    }

    /// Multiply every `z` by `factor`.
    pub fn scaled_z(mut self, factor: f64) -> Self {
        for z in &mut self.z {
            *z *= factor;
        }
        self
    }
}

impl Extend<(f64, f64, f64)> for ScatteredPoints {
    fn extend<I: IntoIterator<Item = (f64, f64, f64)>>(&mut self, iter: I) {
        for (x, y, z) in iter {
            self.push(x, y, z);
        }
    }
}

/// Node estimator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum GridMethod {
    /// Value of the closest sample, or no data if it is farther than
    /// `max_distance`.
    Nearest {
        /// Cut-off distance; unlimited when `None`.
        max_distance: Option<f64>,
    },
    /// Weights `1 / d^power` over samples within `search_radius`.
    InverseDistance {
        /// Distance exponent.
        power: f64,
        /// Search radius; unlimited when `None`.
        search_radius: Option<f64>,
    },
}

impl Default for GridMethod {
    fn default() -> Self {
        Self::InverseDistance {
            power: 2.0,
            search_radius: None,
        }
    }
}

impl GridMethod {
    /// Check that exponents and radii are finite and positive.
    pub fn validate(&self) -> Result<(), ModelError> {
        match *self {
            Self::Nearest { max_distance } => {
                if let Some(d) = max_distance {
                    param::positive("max_distance", d)?;
                }
            }
            Self::InverseDistance {
                power,
                search_radius,
            } => {
                param::positive("power", power)?;
                if let Some(r) = search_radius {
                    param::positive("search_radius", r)?;
                }
            }
        }
        Ok(())
    }

    fn estimate(&self, points: &ScatteredPoints, x: f64, y: f64) -> f64 {
        match *self {
            Self::Nearest { max_distance } => nearest(points, x, y, max_distance),
            Self::InverseDistance {
                power,
                search_radius,
            } => inverse_distance(points, x, y, power, search_radius),
        }
    }
}

/// Grid `points` onto the nodes spanned by `x_axis` and `y_axis`.
///
/// # Errors
///
/// [`ModelError::InvalidParameter`] if `method` fails
/// [`validate`](GridMethod::validate).
pub fn grid(
    points: &ScatteredPoints,
    x_axis: &GridAxis,
    y_axis: &GridAxis,
    method: &GridMethod,
) -> Result<ElevationSurface, ModelError> {
    grid_with(points, x_axis, y_axis, method, &ParallelConfig::default())
}

/// [`grid`] with an explicit parallelism policy.
pub fn grid_with(
    points: &ScatteredPoints,
    x_axis: &GridAxis,
    y_axis: &GridAxis,
    method: &GridMethod,
    parallel: &ParallelConfig,
) -> Result<ElevationSurface, ModelError> {
    method.validate()?;
    let (xs, ys) = meshgrid(x_axis, y_axis);

    let work = xs.len().saturating_mul(points.len());
    let run_parallel = parallel.should_parallelize(work);
    debug!(
        nodes = xs.len(),
        samples = points.len(),
        parallel = run_parallel,
        ?method,
        "gridding survey"
    );

    let node = |(&x, &y): (&f64, &f64)| method.estimate(points, x, y);
    let z: Vec<f64> = if run_parallel {
        xs.par_iter().zip(ys.par_iter()).map(node).collect()
    } else {
        xs.iter().zip(ys.iter()).map(node).collect()
    };
    ElevationSurface::new(*x_axis, *y_axis, z)
}

fn nearest(points: &ScatteredPoints, x: f64, y: f64, max_distance: Option<f64>) -> f64 {
    let mut best = f64::INFINITY;
    let mut value = f64::NAN;
    for (px, py, pz) in points.iter() {
        let d2 = (px - x).powi(2) + (py - y).powi(2);
        if d2 < best {
            best = d2;
            value = pz;
        }
    }
    match max_distance {
        Some(limit) if best.sqrt() > limit => f64::NAN,
        _ => value,
    }
}

fn inverse_distance(
    points: &ScatteredPoints,
    x: f64,
    y: f64,
    power: f64,
    search_radius: Option<f64>,
) -> f64 {
    let radius = search_radius.unwrap_or(f64::INFINITY);
    let mut weighted = 0.0;
    let mut total = 0.0;
    for (px, py, pz) in points.iter() {
        let d = ((px - x).powi(2) + (py - y).powi(2)).sqrt();
        if d < COINCIDENT {
            return pz;
        }
        if d > radius {
            continue;
        }
        let w = d.powf(-power);
        weighted += w * pz;
        total += w;
    }
    if total > 0.0 {
        weighted / total
    } else {
        f64::NAN
    }
}
