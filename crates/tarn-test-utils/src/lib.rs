//! Deterministic fixtures for Tarn tests and benchmarks.
//!
//! Every random fixture takes an explicit seed and draws from a
//! [`ChaCha8Rng`], so the same seed always yields the same field or
//! surface on every platform.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tarn_basin::{ElevationSurface, ScatteredPoints};
use tarn_core::GridAxis;
use tarn_wells::{Well, WellField, WellKind};

/// Transmissivity used by the square fixture.
pub const SQUARE_TRANSMISSIVITY: f64 = 100.0;

/// Four wells of `Q = 100`, `r_w = 0.1` on the corners of a 200 m square
/// centred on the origin, in a `T = 100` aquifer.
pub fn four_well_square() -> WellField {
    let wells = [(-100.0, -100.0), (100.0, -100.0), (100.0, 100.0), (-100.0, 100.0)]
        .into_iter()
        .map(|(x, y)| Well::new(x, y, 100.0, 0.1).expect("valid casing radius"))
        .collect();
    WellField::new(wells, SQUARE_TRANSMISSIVITY).expect("valid transmissivity")
}

/// `n` wells scattered over `[-extent, extent]²` with mixed signs of `Q`.
/// Roughly one in five is labelled a spring.
pub fn random_well_field(seed: u64, n: usize, extent: f64) -> WellField {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let wells = (0..n)
        .map(|_| {
            let x = rng.random_range(-extent..extent);
            let y = rng.random_range(-extent..extent);
            let q = rng.random_range(-200.0..200.0);
            let rw = rng.random_range(0.05..0.5);
            let kind = if rng.random_bool(0.2) {
                WellKind::Spring
            } else {
                WellKind::Well
            };
            Well::new(x, y, q, rw)
                .expect("positive casing radius")
                .with_kind(kind)
        })
        .collect();
    let t = rng.random_range(10.0..500.0);
    WellField::new(wells, t).expect("positive transmissivity")
}

/// A `rows × cols` surface at constant `elevation` with unit cells.
pub fn flat_surface(rows: usize, cols: usize, elevation: f64) -> ElevationSurface {
    ElevationSurface::from_cells(rows, cols, 1.0, 1.0, vec![elevation; rows * cols])
        .expect("non-empty flat surface")
}

/// Paraboloid bowl `z = depth · (r² / R² - 1)` clipped to the disc of
/// radius `R`, on an `n × n` grid of spacing `2R / n` centred on the origin.
/// Cells outside the disc are no data. The floor is at `-depth`.
pub fn bowl_surface(n: usize, radius: f64, depth: f64) -> ElevationSurface {
    let spacing = 2.0 * radius / n as f64;
    let origin = -radius + spacing / 2.0;
    let axis = GridAxis::new(origin, spacing, n).expect("non-empty bowl axis");
    let mut z = Vec::with_capacity(n * n);
    for row in 0..n {
        let y = axis.coordinate(row);
        for col in 0..n {
            let x = axis.coordinate(col);
            let r2 = x * x + y * y;
            z.push(if r2 <= radius * radius {
                depth * (r2 / (radius * radius) - 1.0)
            } else {
                f64::NAN
            });
        }
    }
    ElevationSurface::new(axis, axis, z).expect("square bowl grid")
}

/// Uniformly rough surface with a fraction `no_data` of cells missing.
pub fn random_surface(seed: u64, rows: usize, cols: usize, no_data: f64) -> ElevationSurface {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let z = (0..rows * cols)
        .map(|_| {
            if rng.random_bool(no_data) {
                f64::NAN
            } else {
                rng.random_range(-3.0..0.5)
            }
        })
        .collect();
    ElevationSurface::from_cells(rows, cols, 0.5, 0.5, z).expect("non-empty random surface")
}

/// Survey points sampled from the bowl of [`bowl_surface`] at random
/// positions inside the disc.
pub fn bowl_survey(seed: u64, n: usize, radius: f64, depth: f64) -> ScatteredPoints {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut points = ScatteredPoints::default();
    while points.len() < n {
        let x = rng.random_range(-radius..radius);
        let y = rng.random_range(-radius..radius);
        let r2 = x * x + y * y;
        if r2 <= radius * radius {
            points.push(x, y, depth * (r2 / (radius * radius) - 1.0));
        }
    }
    points
}
