//! An owned, ordered collection of wells sharing one aquifer.

use std::fmt;

use serde::{Deserialize, Serialize};
use tarn_core::{meshgrid, param, Degeneracy, GridAxis, ModelError, ParallelConfig};

use crate::head::superpose;
use crate::well::{Well, WellKind};

/// Wells in a single confined aquifer of transmissivity `T`.
///
/// The field owns its wells exclusively. Order is preserved and has no
/// effect on the result beyond floating-point summation order.
///
/// ```
/// use tarn_wells::{Well, WellField};
///
/// let wells = vec![
///     Well::new(-100.0, 0.0, 100.0, 0.1).unwrap(),
///     Well::new(100.0, 0.0, 100.0, 0.1).unwrap(),
/// ];
/// let field = WellField::new(wells, 100.0).unwrap();
/// let h = field.head_at(&[0.0, 50.0], &[0.0, 0.0]).unwrap();
/// assert_eq!(h.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FieldRecord", into = "FieldRecord")]
pub struct WellField {
    wells: Vec<Well>,
    transmissivity: f64,
    parallel: ParallelConfig,
}

impl WellField {
    /// Create a field from `wells` and a transmissivity.
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidParameter`] if `transmissivity` is not finite
    /// and `> 0`.
    pub fn new(wells: Vec<Well>, transmissivity: f64) -> Result<Self, ModelError> {
        Ok(Self {
            wells,
            transmissivity: param::positive("transmissivity", transmissivity)?,
            parallel: ParallelConfig::default(),
        })
    }

    /// A field with no wells.
    pub fn empty(transmissivity: f64) -> Result<Self, ModelError> {
        Self::new(Vec::new(), transmissivity)
    }

    /// Replace the parallelism policy used for evaluation.
    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }

    /// Append a well.
    pub fn push(&mut self, well: Well) {
        self.wells.push(well);
    }

    /// The wells in insertion order.
    pub fn wells(&self) -> &[Well] {
        &self.wells
    }

    /// Number of wells.
    pub fn len(&self) -> usize {
        self.wells.len()
    }

    /// Whether the field has no wells.
    pub fn is_empty(&self) -> bool {
        self.wells.is_empty()
    }

    /// Aquifer transmissivity.
    pub fn transmissivity(&self) -> f64 {
        self.transmissivity
    }

    /// Wells of the given kind, in insertion order.
    pub fn wells_of_kind(&self, kind: WellKind) -> impl Iterator<Item = &Well> + '_ {
        self.wells.iter().filter(move |w| w.kind() == kind)
    }

    /// Reports [`Degeneracy::EmptyWellField`] when there are no wells.
    pub fn degeneracy(&self) -> Option<Degeneracy> {
        self.is_empty().then_some(Degeneracy::EmptyWellField)
    }

    /// Head at each `(query_x[i], query_y[i])`.
    ///
    /// # Errors
    ///
    /// [`ModelError::ShapeMismatch`] if the coordinate arrays differ in length.
    pub fn head_at(&self, query_x: &[f64], query_y: &[f64]) -> Result<Vec<f64>, ModelError> {
        param::same_len("query_y", query_x.len(), query_y.len())?;
        Ok(superpose(
            &self.wells,
            self.transmissivity,
            query_x,
            query_y,
            &self.parallel,
        ))
    }

    /// Head at a single point.
    pub fn head_at_point(&self, x: f64, y: f64) -> f64 {
        self.wells
            .iter()
            .map(|w| w.head(x, y, self.transmissivity))
            .sum()
    }

    /// Head at every node of the grid spanned by two axes, row-major
    /// (`y` rows, `x` columns).
    pub fn head_on_grid(&self, x_axis: &GridAxis, y_axis: &GridAxis) -> Vec<f64> {
        let (xs, ys) = meshgrid(x_axis, y_axis);
        superpose(
            &self.wells,
            self.transmissivity,
            &xs,
            &ys,
            &self.parallel,
        )
    }
}

impl Extend<Well> for WellField {
    fn extend<I: IntoIterator<Item = Well>>(&mut self, iter: I) {
        self.wells.extend(iter);
    }
}

impl fmt::Display for WellField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let springs = self.wells_of_kind(WellKind::Spring).count();
        write!(
            f,
            "well field (T = {}): {} wells, {} springs",
            self.transmissivity,
            self.len() - springs,
            springs
        )?;
        for well in &self.wells {
            write!(f, "\n  {well}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct FieldRecord {
    wells: Vec<Well>,
    transmissivity: f64,
    #[serde(default)]
    parallel: ParallelConfig,
}

impl TryFrom<FieldRecord> for WellField {
    type Error = ModelError;

    fn try_from(r: FieldRecord) -> Result<Self, Self::Error> {
        Ok(WellField::new(r.wells, r.transmissivity)?.with_parallel(r.parallel))
    }
}

impl From<WellField> for FieldRecord {
    fn from(f: WellField) -> Self {
        Self {
            wells: f.wells,
            transmissivity: f.transmissivity,
            parallel: f.parallel,
        }
    }
}
