//! Level–area–volume curves.
//!
//! For each candidate level `L` every cell with data and `d = L - z > 0` is
//! flooded. Area is the flooded cell count times the cell area; volume is
//! the summed depth times the cell area (flat prisms, no sub-cell
//! interpolation). The sampled pairs are then fitted with least-squares
//! polynomials whose degrees come from [`FitConfig`].

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tarn_core::{param, Degeneracy, FitConfig, LevelSweep, ModelError, ParallelConfig};
use tracing::{debug, trace, warn};

use crate::polynomial::Polynomial;
use crate::surface::ElevationSurface;

/// Sampled and fitted level → area and level → volume relationships.
///
/// Samples are stored in sweep order. The fitted polynomials extrapolate
/// without any guard; use [`level_range`](Self::level_range) to keep
/// queries inside the sampled range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CurveRecord", into = "CurveRecord")]
pub struct LevelVolumeCurve {
    levels: Vec<f64>,
    areas: Vec<f64>,
    volumes: Vec<f64>,
    area_fit: Polynomial,
    volume_fit: Polynomial,
    fit: FitConfig,
    degeneracy: Option<Degeneracy>,
}

impl LevelVolumeCurve {
    /// Sweep `surface` over the levels of `sweep` and fit both curves.
    ///
    /// # Errors
    ///
    /// [`ModelError::Config`] if `fit` fails validation, or an error from
    /// [`Polynomial::fit`].
    pub fn build(
        surface: &ElevationSurface,
        sweep: &LevelSweep,
        fit: &FitConfig,
    ) -> Result<Self, ModelError> {
        Self::build_with(surface, sweep, fit, &ParallelConfig::default())
    }

    /// [`build`](Self::build) with an explicit parallelism policy.
    pub fn build_with(
        surface: &ElevationSurface,
        sweep: &LevelSweep,
        fit: &FitConfig,
        parallel: &ParallelConfig,
    ) -> Result<Self, ModelError> {
        fit.validate()?;
        sweep.validate()?;

        let levels = sweep.levels();
        let (areas, volumes) = sample(surface, &levels, parallel);

        let degeneracy = if surface.is_all_no_data() {
            Some(Degeneracy::NoDataSurface)
        } else if areas.iter().all(|&a| a == 0.0) {
            Some(Degeneracy::ZeroCurve)
        } else {
            None
        };
        if let Some(d) = degeneracy {
            warn!(levels = levels.len(), "degenerate level-volume curve: {d}");
        }

        let area_fit = Polynomial::fit(&levels, &areas, fit.area_degree)?;
        let volume_fit = Polynomial::fit(&levels, &volumes, fit.volume_degree)?;

        Ok(Self {
            levels,
            areas,
            volumes,
            area_fit,
            volume_fit,
            fit: *fit,
            degeneracy,
        })
    }

    /// Candidate levels in sweep order.
    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// Flooded area at each level.
    pub fn areas(&self) -> &[f64] {
        &self.areas
    }

    /// Stored volume at each level.
    pub fn volumes(&self) -> &[f64] {
        &self.volumes
    }

    /// Number of sampled levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always `false` for a built curve.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// `(level, area, volume)` triples in sweep order.
    pub fn samples(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.levels
            .iter()
            .zip(&self.areas)
            .zip(&self.volumes)
            .map(|((&l, &a), &v)| (l, a, v))
    }

    /// Fitted level → area polynomial.
    pub fn area_fit(&self) -> &Polynomial {
        &self.area_fit
    }

    /// Fitted level → volume polynomial.
    pub fn volume_fit(&self) -> &Polynomial {
        &self.volume_fit
    }

    /// Degrees used for the fits.
    pub fn fit_config(&self) -> &FitConfig {
        &self.fit
    }

    /// Fitted area at `level`.
    pub fn area_of(&self, level: f64) -> f64 {
        self.area_fit.eval(level)
    }

    /// Fitted volume at `level`.
    pub fn volume_of(&self, level: f64) -> f64 {
        self.volume_fit.eval(level)
    }

    /// `(lowest, highest)` sampled level.
    pub fn level_range(&self) -> (f64, f64) {
        let lo = self.levels.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = self
            .levels
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        (lo, hi)
    }

    /// Whether `level` lies within the sampled range.
    pub fn contains_level(&self, level: f64) -> bool {
        let (lo, hi) = self.level_range();
        (lo..=hi).contains(&level)
    }

    /// Non-fatal degeneracy detected while building, if any.
    pub fn degeneracy(&self) -> Option<Degeneracy> {
        self.degeneracy
    }
}

/// Unvalidated serde mirror of [`LevelVolumeCurve`].
#[derive(Clone, Debug, Serialize, Deserialize)]
struct CurveRecord {
    levels: Vec<f64>,
    areas: Vec<f64>,
    volumes: Vec<f64>,
    area_fit: Polynomial,
    volume_fit: Polynomial,
    #[serde(default)]
    fit: FitConfig,
    #[serde(default)]
    degeneracy: Option<Degeneracy>,
}

impl TryFrom<CurveRecord> for LevelVolumeCurve {
    type Error = ModelError;

    fn try_from(r: CurveRecord) -> Result<Self, Self::Error> {
        if r.levels.is_empty() {
            return Err(ModelError::EmptyInput {
                what: "curve levels",
            });
        }
        param::same_len("curve areas", r.levels.len(), r.areas.len())?;
        param::same_len("curve volumes", r.levels.len(), r.volumes.len())?;
        r.fit.validate()?;
        Ok(Self {
            levels: r.levels,
            areas: r.areas,
            volumes: r.volumes,
            area_fit: r.area_fit,
            volume_fit: r.volume_fit,
            fit: r.fit,
            degeneracy: r.degeneracy,
        })
    }
}

impl From<LevelVolumeCurve> for CurveRecord {
    fn from(c: LevelVolumeCurve) -> Self {
        Self {
            levels: c.levels,
            areas: c.areas,
            volumes: c.volumes,
            area_fit: c.area_fit,
            volume_fit: c.volume_fit,
            fit: c.fit,
            degeneracy: c.degeneracy,
        }
    }
}

/// Build a curve from a raw row-major elevation grid with default fit degrees.
///
/// `elevation_grid.len()` must be a multiple of `cols`. Levels run from
/// `level_start` toward `level_stop` (excluded) in steps of `level_step`.
///
/// # Errors
///
/// [`ModelError::InvalidParameter`] for a non-positive cell size or a zero
/// or misdirected `level_step`; [`ModelError::ShapeMismatch`] when the grid
/// is not rectangular.
pub fn build(
    elevation_grid: &[f64],
    cols: usize,
    cell_dx: f64,
    cell_dy: f64,
    level_start: f64,
    level_stop: f64,
    level_step: f64,
) -> Result<LevelVolumeCurve, ModelError> {
    if cols == 0 || elevation_grid.is_empty() {
        return Err(ModelError::EmptyInput {
            what: "elevation grid",
        });
    }
    let rows = elevation_grid.len().div_ceil(cols);
    let surface =
        ElevationSurface::from_cells(rows, cols, cell_dx, cell_dy, elevation_grid.to_vec())?;
    let sweep = LevelSweep::new(level_start, level_stop, level_step)?;
    LevelVolumeCurve::build(&surface, &sweep, &FitConfig::default())
}

/// Flooded area and volume at each level.
fn sample(
    surface: &ElevationSurface,
    levels: &[f64],
    parallel: &ParallelConfig,
) -> (Vec<f64>, Vec<f64>) {
    let z = surface.elevations();
    let cell_area = surface.cell_area();
    let work = levels.len().saturating_mul(z.len());
    let run_parallel = parallel.should_parallelize(work);
    debug!(
        levels = levels.len(),
        cells = z.len(),
        parallel = run_parallel,
        "sweeping flood levels"
    );

    let per_level = |&level: &f64| {
        let (area, volume) = flood(z, level, cell_area);
        trace!(level, area, volume, "flooded");
        (area, volume)
    };
    if run_parallel {
        levels.par_iter().map(per_level).unzip()
    } else {
        levels.iter().map(per_level).unzip()
    }
}

/// Area and volume below `level`. NaN cells never compare as flooded.
fn flood(z: &[f64], level: f64, cell_area: f64) -> (f64, f64) {
    let mut wet = 0usize;
    let mut depth = 0.0;
    for &zi in z {
        let d = level - zi;
        if d > 0.0 {
            wet += 1;
            depth += d;
        }
    }
    (wet as f64 * cell_area, depth * cell_area)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn flat(rows: usize, cols: usize, z: f64) -> ElevationSurface {
        ElevationSurface::from_cells(rows, cols, 1.0, 1.0, vec![z; rows * cols]).unwrap()
    }

    #[test]
    fn flat_grid_area_and_volume() {
        let s = flat(10, 10, 0.0);
        let sweep = LevelSweep::new(1.0, -0.5, -0.5).unwrap();
        let c = LevelVolumeCurve::build(&s, &sweep, &FitConfig::default()).unwrap();
        assert_eq!(c.levels(), &[1.0, 0.5, 0.0]);
        assert_eq!(c.areas(), &[100.0, 100.0, 0.0]);
        assert_eq!(c.volumes(), &[100.0, 50.0, 0.0]);
        assert_eq!(c.degeneracy(), None);
    }

    #[test]
    fn no_data_cells_never_flood() {
        let mut z = vec![0.0; 4];
        z[1] = f64::NAN;
        assert_eq!(flood(&z, 2.0, 0.25), (0.75, 1.5));
    }

    #[test]
    fn cell_size_scales_area_and_volume() {
        let s = ElevationSurface::from_cells(2, 2, 0.5, 2.0, vec![-1.0; 4]).unwrap();
        let sweep = LevelSweep::new(0.0, -1.0, -0.5).unwrap();
        let c = LevelVolumeCurve::build(&s, &sweep, &FitConfig::default()).unwrap();
        assert_eq!(c.areas()[0], 4.0);
        assert_eq!(c.volumes()[0], 4.0);
    }

    #[test]
    fn all_no_data_is_degenerate_not_an_error() {
        let s = flat(4, 4, f64::NAN);
        let sweep = LevelSweep::new(1.0, -1.0, -0.1).unwrap();
        let c = LevelVolumeCurve::build(&s, &sweep, &FitConfig::default()).unwrap();
        assert!(c.areas().iter().all(|&a| a == 0.0));
        assert!(c.volumes().iter().all(|&v| v == 0.0));
        assert!(c.area_fit().is_zero());
        assert!(c.volume_fit().is_zero());
        assert_eq!(c.degeneracy(), Some(Degeneracy::NoDataSurface));
        assert_eq!(c.area_of(0.3), 0.0);
    }

    #[test]
    fn sweep_below_floor_is_zero_curve() {
        let s = flat(3, 3, 5.0);
        let sweep = LevelSweep::new(4.0, 0.0, -1.0).unwrap();
        let c = LevelVolumeCurve::build(&s, &sweep, &FitConfig::default()).unwrap();
        assert_eq!(c.degeneracy(), Some(Degeneracy::ZeroCurve));
    }

    #[test]
    fn invalid_fit_config_rejected() {
        let s = flat(2, 2, 0.0);
        let sweep = LevelSweep::new(1.0, 0.0, -0.5).unwrap();
        let fit = FitConfig::default().with_area_degree(99);
        assert!(matches!(
            LevelVolumeCurve::build(&s, &sweep, &fit),
            Err(ModelError::Config(_))
        ));
    }

    #[test]
    fn free_build_checks_parameters() {
        let z = vec![0.0; 100];
        assert!(build(&z, 10, 1.0, 1.0, 1.0, 0.0, 0.0).is_err());
        assert!(build(&z, 10, 0.0, 1.0, 1.0, 0.0, -0.1).is_err());
        assert!(matches!(
            build(&z, 7, 1.0, 1.0, 1.0, 0.0, -0.1),
            Err(ModelError::ShapeMismatch { .. })
        ));
        let c = build(&z, 10, 1.0, 1.0, 1.0, -0.5, -0.5).unwrap();
        assert_eq!(c.areas(), &[100.0, 100.0, 0.0]);
        assert_eq!(c.volumes()[0], 100.0);
    }

    #[test]
    fn linear_volume_is_fitted_exactly() {
        // Flat floor at 0: volume = 100·L for L > 0, a straight line.
        let s = flat(10, 10, 0.0);
        let sweep = LevelSweep::new(2.0, 0.05, -0.25).unwrap();
        let c = LevelVolumeCurve::build(&s, &sweep, &FitConfig::default()).unwrap();
        for (l, _, v) in c.samples() {
            assert!((c.volume_of(l) - v).abs() < 1e-6);
        }
        let (lo, hi) = c.level_range();
        assert_eq!(hi, 2.0);
        assert!(lo > 0.05);
        assert!(c.contains_level(1.0));
        assert!(!c.contains_level(3.0));
    }

    #[test]
    fn parallel_sweep_matches_serial() {
        let z: Vec<f64> = (0..400).map(|i| -((i % 20) as f64 * 0.1)).collect();
        let s = ElevationSurface::from_cells(20, 20, 0.5, 0.5, z).unwrap();
        let sweep = LevelSweep::new(0.0, -2.0, -0.05).unwrap();
        let fit = FitConfig::default();
        let a = LevelVolumeCurve::build_with(&s, &sweep, &fit, &ParallelConfig::serial()).unwrap();
        let b = LevelVolumeCurve::build_with(&s, &sweep, &fit, &ParallelConfig::always()).unwrap();
        assert_eq!(a.areas(), b.areas());
        assert_eq!(a.volumes(), b.volumes());
    }

    #[test]
    fn serde_round_trip_keeps_fits() {
        let s = flat(5, 5, 0.0);
        let sweep = LevelSweep::new(1.0, 0.0, -0.1).unwrap();
        let c = LevelVolumeCurve::build(&s, &sweep, &FitConfig::default()).unwrap();
        let json = serde_json::to_string(&c).unwrap();
        let back: LevelVolumeCurve = serde_json::from_str(&json).unwrap();
        assert_eq!(back.volume_fit(), c.volume_fit());
        assert_eq!(back.levels(), c.levels());
        assert_eq!(back, c);
    }

    #[test]
    fn deserialized_samples_must_line_up() {
        let s = flat(5, 5, 0.0);
        let sweep = LevelSweep::new(1.0, 0.0, -0.1).unwrap();
        let c = LevelVolumeCurve::build(&s, &sweep, &FitConfig::default()).unwrap();
        let mut json = serde_json::to_value(&c).unwrap();
        json["areas"].as_array_mut().unwrap().pop();
        let err = serde_json::from_value::<LevelVolumeCurve>(json).unwrap_err();
        assert!(err.to_string().contains("curve areas"), "{err}");

        let mut json = serde_json::to_value(&c).unwrap();
        json["volumes"].as_array_mut().unwrap().push(0.0.into());
        assert!(serde_json::from_value::<LevelVolumeCurve>(json).is_err());
    }

    #[test]
    fn degenerate_curve_round_trips() {
        let s = ElevationSurface::from_cells(2, 2, 1.0, 1.0, vec![f64::NAN; 4]).unwrap();
        let sweep = LevelSweep::new(1.0, 0.0, -0.5).unwrap();
        let c = LevelVolumeCurve::build(&s, &sweep, &FitConfig::default()).unwrap();
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains("\"no_data_surface\""));
        let back: LevelVolumeCurve = serde_json::from_str(&json).unwrap();
        assert_eq!(back.degeneracy(), Some(Degeneracy::NoDataSurface));
    }

    proptest! {
        #[test]
        fn flooding_is_monotonic_in_level(
            z in prop::collection::vec(-5.0f64..5.0, 1..64),
            step in 0.05f64..1.0,
        ) {
            let cols = z.len();
            let s = ElevationSurface::from_cells(1, cols, 1.0, 1.0, z).unwrap();
            let sweep = LevelSweep::new(6.0, -6.0, -step).unwrap();
            let c = LevelVolumeCurve::build(&s, &sweep, &FitConfig::default()).unwrap();
            // Descending sweep: samples must be non-increasing along the sweep.
            for w in c.areas().windows(2) {
                prop_assert!(w[1] <= w[0]);
            }
            for w in c.volumes().windows(2) {
                prop_assert!(w[1] <= w[0]);
            }
            prop_assert!(c.areas().iter().all(|&a| a >= 0.0));
            prop_assert!(c.volumes().iter().all(|&v| v >= 0.0));
        }
    }
}
