//! Gridded elevation surfaces.

use serde::{Deserialize, Serialize};
use tarn_core::{param, GridAxis, ModelError};

/// Elevation samples on a regular grid.
///
/// `z` is row-major: row `r` follows `y_axis` node `r` and column `c`
/// follows `x_axis` node `c`, so `z[r * cols + c]` is the elevation at
/// `(x_axis.coordinate(c), y_axis.coordinate(r))`. `NaN` marks a cell with
/// no data (e.g. outside the hull of the survey).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SurfaceRecord", into = "SurfaceRecord")]
pub struct ElevationSurface {
    x_axis: GridAxis,
    y_axis: GridAxis,
    z: Vec<f64>,
}

impl ElevationSurface {
    /// Wrap row-major elevations defined over two axes.
    ///
    /// # Errors
    ///
    /// [`ModelError::ShapeMismatch`] if `z.len() != y_axis.len() * x_axis.len()`.
    pub fn new(x_axis: GridAxis, y_axis: GridAxis, z: Vec<f64>) -> Result<Self, ModelError> {
        param::same_len("elevation grid", x_axis.len() * y_axis.len(), z.len())?;
        Ok(Self { x_axis, y_axis, z })
    }

    /// A `rows × cols` surface with cell sizes `dx`, `dy` and origin at 0.
    pub fn from_cells(
        rows: usize,
        cols: usize,
        dx: f64,
        dy: f64,
        z: Vec<f64>,
    ) -> Result<Self, ModelError> {
        let x_axis = GridAxis::new(0.0, dx, cols)?;
        let y_axis = GridAxis::new(0.0, dy, rows)?;
        Self::new(x_axis, y_axis, z)
    }

    /// Column axis.
    pub fn x_axis(&self) -> &GridAxis {
        &self.x_axis
    }

    /// Row axis.
    pub fn y_axis(&self) -> &GridAxis {
        &self.y_axis
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.y_axis.len()
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.x_axis.len()
    }

    /// Cell width along x.
    pub fn dx(&self) -> f64 {
        self.x_axis.spacing()
    }

    /// Cell height along y.
    pub fn dy(&self) -> f64 {
        self.y_axis.spacing()
    }

    /// Plan area of one cell.
    pub fn cell_area(&self) -> f64 {
        self.dx() * self.dy()
    }

    /// Row-major elevations, `NaN` for no data.
    pub fn elevations(&self) -> &[f64] {
        &self.z
    }

    /// Elevation of cell `(row, col)`; `None` when out of bounds or no data.
    pub fn elevation(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows() || col >= self.cols() {
            return None;
        }
        let z = self.z[row * self.cols() + col];
        (!z.is_nan()).then_some(z)
    }

    /// Number of cells carrying data.
    pub fn valid_cells(&self) -> usize {
        self.z.iter().filter(|z| !z.is_nan()).count()
    }

    /// Whether every cell is no data.
    pub fn is_all_no_data(&self) -> bool {
        self.z.iter().all(|z| z.is_nan())
    }

    /// Lowest elevation, ignoring no data.
    pub fn min_elevation(&self) -> Option<f64> {
        self.z
            .iter()
            .copied()
            .filter(|z| !z.is_nan())
            .reduce(f64::min)
    }

    /// Highest elevation, ignoring no data.
    pub fn max_elevation(&self) -> Option<f64> {
        self.z
            .iter()
            .copied()
            .filter(|z| !z.is_nan())
            .reduce(f64::max)
    }

    /// Multiply every elevation by `factor` (e.g. `0.01` for cm → m).
    pub fn scaled(mut self, factor: f64) -> Self {
        for z in &mut self.z {
            *z *= factor;
        }
        self
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct SurfaceRecord {
    x_axis: GridAxis,
    y_axis: GridAxis,
    z: Vec<Option<f64>>,
}

impl TryFrom<SurfaceRecord> for ElevationSurface {
    type Error = ModelError;

    fn try_from(r: SurfaceRecord) -> Result<Self, Self::Error> {
        let z = r.z.into_iter().map(|z| z.unwrap_or(f64::NAN)).collect();
        ElevationSurface::new(r.x_axis, r.y_axis, z)
    }
}

impl From<ElevationSurface> for SurfaceRecord {
    fn from(s: ElevationSurface) -> Self {
        Self {
            x_axis: s.x_axis,
            y_axis: s.y_axis,
            z: s.z.into_iter().map(|z| (!z.is_nan()).then_some(z)).collect(),
        }
    }
}
