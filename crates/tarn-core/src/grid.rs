//! Regular grid axes.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::param;

/// One axis of a regular grid: `len` nodes starting at `origin`, spaced by
/// a constant positive `spacing`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AxisRecord", into = "AxisRecord")]
pub struct GridAxis {
    origin: f64,
    spacing: f64,
    len: usize,
}

impl GridAxis {
    /// Create an axis of `len` nodes.
    pub fn new(origin: f64, spacing: f64, len: usize) -> Result<Self, ModelError> {
        if len == 0 {
            return Err(ModelError::EmptyInput { what: "grid axis" });
        }
        Ok(Self {
            origin: param::finite("origin", origin)?,
            spacing: param::positive("spacing", spacing)?,
            len,
        })
    }

    /// Nodes from `start` up to (excluding) `stop`, like `arange`.
    pub fn from_range(start: f64, stop: f64, spacing: f64) -> Result<Self, ModelError> {
        let spacing = param::positive("spacing", spacing)?;
        let start = param::finite("start", start)?;
        let stop = param::finite("stop", stop)?;
        let n = ((stop - start) / spacing).ceil();
        if n.is_nan() || n <= 0.0 {
            return Err(ModelError::EmptyInput { what: "grid axis" });
        }
        Self::new(start, spacing, n as usize)
    }

    /// Coordinate of the first node.
    pub fn origin(&self) -> f64 {
        self.origin
    }

    /// Distance between consecutive nodes.
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`; an axis has at least one node.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Coordinate of node `i`.
    pub fn coordinate(&self, i: usize) -> f64 {
        self.origin + i as f64 * self.spacing
    }

    /// Coordinates of every node.
    pub fn coordinates(&self) -> Vec<f64> {
        (0..self.len).map(|i| self.coordinate(i)).collect()
    }

    /// Coordinate of the last node.
    pub fn end(&self) -> f64 {
        self.coordinate(self.len - 1)
    }

    /// Shift the axis by `offset` (e.g. from local to projected coordinates).
    pub fn translated(&self, offset: f64) -> Self {
        Self {
            origin: self.origin + offset,
            ..*self
        }
    }
}

/// Unvalidated serde mirror of [`GridAxis`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct AxisRecord {
    origin: f64,
    spacing: f64,
    len: usize,
}

impl TryFrom<AxisRecord> for GridAxis {
    type Error = ModelError;

    fn try_from(r: AxisRecord) -> Result<Self, Self::Error> {
        GridAxis::new(r.origin, r.spacing, r.len)
    }
}

impl From<GridAxis> for AxisRecord {
    fn from(a: GridAxis) -> Self {
        Self {
            origin: a.origin,
            spacing: a.spacing,
            len: a.len,
        }
    }
}

/// Expand two axes into flattened row-major coordinate arrays.
///
/// Row `r` corresponds to `y_axis` node `r`, column `c` to `x_axis` node `c`;
/// the returned vectors have `y_axis.len() * x_axis.len()` entries.
pub fn meshgrid(x_axis: &GridAxis, y_axis: &GridAxis) -> (Vec<f64>, Vec<f64>) {
    let n = x_axis.len() * y_axis.len();
    let mut xs = Vec::with_capacity(n);
    let mut ys = Vec::with_capacity(n);
    for r in 0..y_axis.len() {
        let y = y_axis.coordinate(r);
        for c in 0..x_axis.len() {
            xs.push(x_axis.coordinate(c));
            ys.push(y);
        }
    }
    (xs, ys)
}
