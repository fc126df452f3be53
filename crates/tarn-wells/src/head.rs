//! Superposed head evaluation.

use rayon::prelude::*;
use tarn_core::{param, ModelError, ParallelConfig};
use tracing::{debug, warn};

use crate::well::{Well, WellTerm};

/// Head at each query point due to all `wells`, using the default
/// [`ParallelConfig`].
///
/// `query_x` and `query_y` are flattened coordinate arrays of equal length;
/// the result has the same length and order.
///
/// # Errors
///
/// - [`ModelError::InvalidParameter`] if `transmissivity` is not finite and
///   `> 0`. Checked before any evaluation.
/// - [`ModelError::ShapeMismatch`] if the coordinate arrays differ in length.
///
/// An empty `wells` slice is not an error: the head is zero everywhere.
pub fn head_at(
    wells: &[Well],
    transmissivity: f64,
    query_x: &[f64],
    query_y: &[f64],
) -> Result<Vec<f64>, ModelError> {
    head_at_with(
        wells,
        transmissivity,
        query_x,
        query_y,
        &ParallelConfig::default(),
    )
}

/// [`head_at`] with an explicit parallelism policy.
pub fn head_at_with(
    wells: &[Well],
    transmissivity: f64,
    query_x: &[f64],
    query_y: &[f64],
    parallel: &ParallelConfig,
) -> Result<Vec<f64>, ModelError> {
    let transmissivity = param::positive("transmissivity", transmissivity)?;
    param::same_len("query_y", query_x.len(), query_y.len())?;
    Ok(superpose(wells, transmissivity, query_x, query_y, parallel))
}

/// Evaluate without re-validating; `transmissivity` and the coordinate
/// lengths must already be checked.
pub(crate) fn superpose(
    wells: &[Well],
    transmissivity: f64,
    query_x: &[f64],
    query_y: &[f64],
    parallel: &ParallelConfig,
) -> Vec<f64> {
    if wells.is_empty() {
        warn!(points = query_x.len(), "evaluating head for an empty well field");
        return vec![0.0; query_x.len()];
    }

    let terms: Vec<WellTerm> = wells
        .iter()
        .map(|w| WellTerm::new(w, transmissivity))
        .collect();
    let point_head = |(&x, &y): (&f64, &f64)| terms.iter().map(|t| t.eval(x, y)).sum::<f64>();

    let work = query_x.len().saturating_mul(terms.len());
    let run_parallel = parallel.should_parallelize(work);
    debug!(
        wells = terms.len(),
        points = query_x.len(),
        parallel = run_parallel,
        "superposing well heads"
    );

    if run_parallel {
        query_x
            .par_iter()
            .zip(query_y.par_iter())
            .map(point_head)
            .collect()
    } else {
        query_x.iter().zip(query_y.iter()).map(point_head).collect()
    }
}
