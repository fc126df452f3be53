//! Benchmark profiles for the Tarn toolkit.
//!
//! - [`head_profile`]: seeded well field plus a square query raster
//! - [`sweep_profile`]: bowl surface with a centimetre level sweep
//! - [`survey_profile`]: scattered bowl survey and target axes

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use tarn_basin::{ElevationSurface, ScatteredPoints};
use tarn_core::{meshgrid, GridAxis, LevelSweep};
use tarn_test_utils::{bowl_surface, bowl_survey, random_well_field};
use tarn_wells::WellField;

/// Half-width of the benchmark domain, m.
pub const EXTENT: f64 = 500.0;

/// `wells` random wells and the `side × side` raster covering the domain,
/// flattened row-major.
pub fn head_profile(seed: u64, wells: usize, side: usize) -> (WellField, Vec<f64>, Vec<f64>) {
    let field = random_well_field(seed, wells, EXTENT);
    let spacing = 2.0 * EXTENT / side as f64;
    let axis = GridAxis::new(-EXTENT, spacing, side).unwrap();
    let (xs, ys) = meshgrid(&axis, &axis);
    (field, xs, ys)
}

/// An `n × n` bowl 5 m deep and its sweep from the rim to the floor.
pub fn sweep_profile(n: usize, step: f64) -> (ElevationSurface, LevelSweep) {
    let surface = bowl_surface(n, EXTENT, 5.0);
    let floor = surface.min_elevation().unwrap();
    let sweep = LevelSweep::down_to_floor(0.0, step, floor).unwrap();
    (surface, sweep)
}

/// `samples` survey points of the bowl and an `n`-node axis spanning it.
pub fn survey_profile(seed: u64, samples: usize, n: usize) -> (ScatteredPoints, GridAxis) {
    let points = bowl_survey(seed, samples, EXTENT, 5.0);
    let spacing = 2.0 * EXTENT / n as f64;
    let axis = GridAxis::new(-EXTENT + spacing / 2.0, spacing, n).unwrap();
    (points, axis)
}
