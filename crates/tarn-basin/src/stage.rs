//! Logger water levels to stored volume and wetted area.
//!
//! Pressure loggers drift and drop readings. The usual pipeline is
//! [`fill_gaps_linear`] on the raw record, then [`calibrate_offset`] against
//! occasional manual readings, [`apply_offset`] and finally
//! [`StageSeries::convert`] through a [`LevelVolumeCurve`].

use serde::{Deserialize, Serialize};
use tarn_core::{param, ModelError};
use tracing::debug;

use crate::curve::LevelVolumeCurve;

/// Mean of `manual[i] - logger[i]` over the indices where both readings are
/// finite. `None` when there is no such pair.
///
/// # Errors
///
/// [`ModelError::ShapeMismatch`] if the series differ in length.
pub fn calibrate_offset(logger: &[f64], manual: &[f64]) -> Result<Option<f64>, ModelError> {
    param::same_len("manual readings", logger.len(), manual.len())?;
    let (sum, count) = logger
        .iter()
        .zip(manual)
        .filter(|(l, m)| l.is_finite() && m.is_finite())
        .fold((0.0, 0usize), |(s, n), (l, m)| (s + (m - l), n + 1));
    debug!(pairs = count, "calibrating logger offset");
    Ok((count > 0).then(|| sum / count as f64))
}

/// Add `offset` to every reading in place. NaN stays NaN.
pub fn apply_offset(series: &mut [f64], offset: f64) {
    for v in series {
        *v += offset;
    }
}

/// Fill NaN gaps in place.
///
/// Interior runs are interpolated linearly by index between their
/// neighbours, trailing runs repeat the last valid reading and leading runs
/// are left as NaN. Returns the number of readings filled.
pub fn fill_gaps_linear(series: &mut [f64]) -> usize {
    let mut filled = 0;
    let mut last: Option<usize> = None;
    for i in 0..series.len() {
        if series[i].is_nan() {
            continue;
        }
        if let Some(prev) = last {
            let gap = i - prev;
            if gap > 1 {
                let (a, b) = (series[prev], series[i]);
                for k in 1..gap {
                    series[prev + k] = a + (b - a) * k as f64 / gap as f64;
                }
                filled += gap - 1;
            }
        }
        last = Some(i);
    }
    if let Some(prev) = last {
        let hold = series[prev];
        for v in &mut series[prev + 1..] {
            *v = hold;
            filled += 1;
        }
    }
    filled
}

/// Water levels with the volumes and areas they imply.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StageSeries {
    /// Water levels, as given.
    pub levels: Vec<f64>,
    /// Stored volume at each level.
    pub volumes: Vec<f64>,
    /// Wetted area at each level.
    pub areas: Vec<f64>,
}

impl StageSeries {
    /// Evaluate the fitted curves of `curve` at each level.
    ///
    /// NaN levels give NaN volume and area. Levels outside
    /// [`LevelVolumeCurve::level_range`] are extrapolated and logged.
    pub fn convert(levels: &[f64], curve: &LevelVolumeCurve) -> Self {
        let outside = levels
            .iter()
            .filter(|l| !l.is_nan() && !curve.contains_level(**l))
            .count();
        if outside > 0 {
            debug!(outside, "levels outside the sampled curve range");
        }
        Self {
            levels: levels.to_vec(),
            volumes: curve.volume_fit().eval_many(levels),
            areas: curve.area_fit().eval_many(levels),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether the series is empty.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::ElevationSurface;
    use tarn_core::{FitConfig, LevelSweep};

    #[test]
    fn offset_ignores_missing_pairs() {
        let logger = [1.0, 2.0, f64::NAN, 4.0];
        let manual = [1.5, f64::NAN, 3.0, 4.5];
        assert_eq!(calibrate_offset(&logger, &manual).unwrap(), Some(0.5));
    }

    #[test]
    fn offset_without_pairs_is_none() {
        let logger = [1.0, f64::NAN];
        let manual = [f64::NAN, 2.0];
        assert_eq!(calibrate_offset(&logger, &manual).unwrap(), None);
        assert!(calibrate_offset(&[1.0], &[]).is_err());
    }

    #[test]
    fn gaps_filled_like_forward_interpolation() {
        let mut s = [f64::NAN, 1.0, f64::NAN, f64::NAN, 4.0, 5.0, f64::NAN];
        let n = fill_gaps_linear(&mut s);
        assert_eq!(n, 3);
        assert!(s[0].is_nan());
        assert_eq!(&s[1..], &[1.0, 2.0, 3.0, 4.0, 5.0, 5.0]);
    }

    #[test]
    fn all_missing_stays_missing() {
        let mut s = [f64::NAN; 3];
        assert_eq!(fill_gaps_linear(&mut s), 0);
        assert!(s.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn offset_applies_to_every_reading() {
        let mut s = [-1.0, f64::NAN, 0.5];
        apply_offset(&mut s, 0.25);
        assert_eq!(s[0], -0.75);
        assert!(s[1].is_nan());
        assert_eq!(s[2], 0.75);
    }

    #[test]
    fn convert_uses_fitted_curves() {
        let surface = ElevationSurface::from_cells(4, 5, 2.0, 2.0, vec![0.0; 20]).unwrap();
        let sweep = LevelSweep::new(2.0, 0.05, -0.25).unwrap();
        let curve = LevelVolumeCurve::build(&surface, &sweep, &FitConfig::default()).unwrap();

        let s = StageSeries::convert(&[1.0, f64::NAN, 1.5], &curve);
        assert_eq!(s.len(), 3);
        // Flat floor of 80 m²: volume = 80·L.
        assert!((s.volumes[0] - 80.0).abs() < 1e-6);
        assert!((s.volumes[2] - 120.0).abs() < 1e-6);
        assert!((s.areas[0] - 80.0).abs() < 1e-6);
        assert!(s.volumes[1].is_nan());
        assert!(s.areas[1].is_nan());
    }
}
