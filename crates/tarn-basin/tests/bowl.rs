//! Integration test: storage curves of a paraboloid bowl.
//!
//! For `z = D (r²/R² - 1)` inside radius `R`, a level `L` in `(-D, 0)`
//! floods a disc of area `πR² (1 + L/D)` holding `πR² (L + D)² / (2D)`.
//! The gridded sweep must reproduce these within discretisation error,
//! both from a dense raster and from a scattered survey.

use std::f64::consts::PI;

use tarn_basin::{
    calibrate_offset, fill_gaps_linear, grid, GridMethod, LevelVolumeCurve, StageSeries,
};
use tarn_core::{Degeneracy, FitConfig, GridAxis, LevelSweep, ParallelConfig};
use tarn_test_utils::{bowl_surface, bowl_survey, flat_surface, random_surface};

const RADIUS: f64 = 50.0;
const DEPTH: f64 = 5.0;

fn exact_area(level: f64) -> f64 {
    PI * RADIUS * RADIUS * (1.0 + level / DEPTH)
}

fn exact_volume(level: f64) -> f64 {
    PI * RADIUS * RADIUS * (level + DEPTH).powi(2) / (2.0 * DEPTH)
}

fn rel_err(got: f64, want: f64) -> f64 {
    (got - want).abs() / want.abs()
}

fn bowl_curve() -> LevelVolumeCurve {
    let surface = bowl_surface(200, RADIUS, DEPTH);
    let floor = surface.min_elevation().unwrap();
    let sweep = LevelSweep::down_to_floor(0.0, 0.25, floor).unwrap();
    LevelVolumeCurve::build(&surface, &sweep, &FitConfig::default()).unwrap()
}

#[test]
fn raster_bowl_matches_closed_form() {
    let curve = bowl_curve();
    assert_eq!(curve.degeneracy(), None);
    assert_eq!(curve.levels()[0], 0.0);

    let i = curve.levels().iter().position(|&l| l == -2.0).unwrap();
    assert!(rel_err(curve.areas()[i], exact_area(-2.0)) < 0.02);
    assert!(rel_err(curve.volumes()[i], exact_volume(-2.0)) < 0.02);
}

#[test]
fn fitted_curves_track_samples() {
    let curve = bowl_curve();
    for (level, area, volume) in curve.samples() {
        if area > 1000.0 {
            assert!(rel_err(curve.area_of(level), area) < 0.02, "area at {level}");
        }
        if volume > 1000.0 {
            assert!(rel_err(curve.volume_of(level), volume) < 0.02, "volume at {level}");
        }
    }
    let (lo, hi) = curve.level_range();
    assert_eq!(hi, 0.0);
    assert!(lo > -DEPTH);
}

#[test]
fn surveyed_bowl_matches_closed_form() {
    let survey = bowl_survey(2024, 2000, RADIUS, DEPTH);
    let axis = GridAxis::new(-RADIUS + 0.5, 1.0, 100).unwrap();
    let method = GridMethod::Nearest {
        max_distance: Some(3.0),
    };
    let surface = grid(&survey, &axis, &axis, &method).unwrap();
    assert!(surface.valid_cells() < 100 * 100);

    let sweep = LevelSweep::new(-0.5, -4.5, -0.5).unwrap();
    let curve = LevelVolumeCurve::build(&surface, &sweep, &FitConfig::default()).unwrap();
    assert!(rel_err(curve.volume_of(-2.0), exact_volume(-2.0)) < 0.1);
    assert!(rel_err(curve.area_of(-2.0), exact_area(-2.0)) < 0.1);
}

#[test]
fn parallel_and_serial_sweeps_agree() {
    let surface = random_surface(5, 120, 80, 0.1);
    let sweep = LevelSweep::new(0.5, -3.0, -0.05).unwrap();
    let fit = FitConfig::default();
    let a = LevelVolumeCurve::build_with(&surface, &sweep, &fit, &ParallelConfig::serial()).unwrap();
    let b = LevelVolumeCurve::build_with(&surface, &sweep, &fit, &ParallelConfig::always()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn surface_without_data_degenerates() {
    let surface = random_surface(9, 10, 10, 1.0);
    assert!(surface.is_all_no_data());
    let sweep = LevelSweep::new(0.0, -1.0, -0.1).unwrap();
    let curve = LevelVolumeCurve::build(&surface, &sweep, &FitConfig::default()).unwrap();
    assert_eq!(curve.degeneracy(), Some(Degeneracy::NoDataSurface));
    assert!(curve.volumes().iter().all(|&v| v == 0.0));
}

#[test]
fn logger_record_to_storage() {
    // 10 × 10 flat floor at -1 m with 1 m² cells: volume = 100 (L + 1).
    let surface = flat_surface(10, 10, -1.0);
    let sweep = LevelSweep::new(0.0, -0.95, -0.05).unwrap();
    let curve = LevelVolumeCurve::build(&surface, &sweep, &FitConfig::default()).unwrap();

    // Logger reads 0.3 m low and misses two readings.
    let mut logger = vec![-0.8, f64::NAN, -0.6, -0.5, f64::NAN];
    let manual = vec![-0.5, f64::NAN, f64::NAN, -0.2, f64::NAN];
    assert_eq!(fill_gaps_linear(&mut logger), 2);
    let offset = calibrate_offset(&logger, &manual).unwrap().unwrap();
    assert!((offset - 0.3).abs() < 1e-12);
    tarn_basin::apply_offset(&mut logger, offset);

    let stage = StageSeries::convert(&logger, &curve);
    let expected = [50.0, 60.0, 70.0, 80.0, 80.0];
    for (v, e) in stage.volumes.iter().zip(expected) {
        assert!((v - e).abs() < 1e-6, "{v} vs {e}");
    }
}
