//! Configuration structs and their validation.
//!
//! Every struct here is plain data with a [`Default`], `serde` support and a
//! `validate()` method, so callers can load them from any format and check
//! them once before running a computation.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ModelError};
use crate::param;

// ── FitConfig ──────────────────────────────────────────────────────

/// Polynomial degrees used when fitting level–area and level–volume curves.
///
/// The defaults (6 for area, 4 for volume) are empirical: they follow the
/// shape of typical small-basin curves at centimetre level resolution
/// without visible overshoot. Lower them when the level sweep is coarse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Degree of the level → area polynomial. Default: 6.
    pub area_degree: usize,
    /// Degree of the level → volume polynomial. Default: 4.
    pub volume_degree: usize,
}

impl FitConfig {
    /// Default degree of the area polynomial.
    pub const DEFAULT_AREA_DEGREE: usize = 6;

    /// Default degree of the volume polynomial.
    pub const DEFAULT_VOLUME_DEGREE: usize = 4;

    /// Largest accepted degree. Higher orders are numerically meaningless
    /// for a Vandermonde fit in double precision.
    pub const MAX_DEGREE: usize = 16;

    /// Set the area polynomial degree.
    pub fn with_area_degree(mut self, degree: usize) -> Self {
        self.area_degree = degree;
        self
    }

    /// Set the volume polynomial degree.
    pub fn with_volume_degree(mut self, degree: usize) -> Self {
        self.volume_degree = degree;
        self
    }

    /// Check both degrees against [`MAX_DEGREE`](Self::MAX_DEGREE).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.area_degree > Self::MAX_DEGREE {
            return Err(ConfigError::InvalidDegree {
                curve: "area",
                degree: self.area_degree,
            });
        }
        if self.volume_degree > Self::MAX_DEGREE {
            return Err(ConfigError::InvalidDegree {
                curve: "volume",
                degree: self.volume_degree,
            });
        }
        Ok(())
    }
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            area_degree: Self::DEFAULT_AREA_DEGREE,
            volume_degree: Self::DEFAULT_VOLUME_DEGREE,
        }
    }
}

// ── ParallelConfig ─────────────────────────────────────────────────

/// Controls when data-parallel evaluation is used.
///
/// Work is measured in independent kernel evaluations (query points × wells
/// for head, levels × cells for the flooding sweep, nodes × samples for
/// gridding). Below the threshold the serial path is taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Minimum amount of work before switching to `rayon`. Default: 4096.
    pub parallel_threshold: usize,
}

impl ParallelConfig {
    /// Default work threshold.
    pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

    /// A config that always runs serially.
    pub fn serial() -> Self {
        Self {
            parallel_threshold: usize::MAX,
        }
    }

    /// A config that always runs in parallel.
    pub fn always() -> Self {
        Self {
            parallel_threshold: 0,
        }
    }

    /// Whether `work` items should be processed in parallel.
    pub fn should_parallelize(&self, work: usize) -> bool {
        self.parallel_threshold != usize::MAX && work >= self.parallel_threshold
    }
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: Self::DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

// ── BalanceConfig ──────────────────────────────────────────────────

/// Constants of the daily lake water balance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    /// Ratio of pan evaporation to open-water evaporation. Default: 1.2.
    pub pan_factor: f64,
}

impl BalanceConfig {
    /// Default pan factor.
    pub const DEFAULT_PAN_FACTOR: f64 = 1.2;

    /// Set the pan factor.
    pub fn with_pan_factor(mut self, pan_factor: f64) -> Self {
        self.pan_factor = pan_factor;
        self
    }

    /// The pan factor must be finite and `> 0`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pan_factor.is_finite() && self.pan_factor > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidPanFactor {
                value: self.pan_factor,
            })
        }
    }
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            pan_factor: Self::DEFAULT_PAN_FACTOR,
        }
    }
}

// ── LevelSweep ─────────────────────────────────────────────────────

/// A half-open range of candidate water levels.
///
/// Levels are `start + i * step` for `i` in `0..len()`, where
/// `len() = ceil((stop - start) / step)`. `stop` itself is excluded. The
/// sign of `step` gives the direction and must point from `start` toward
/// `stop`; a descending sweep (negative step) is the usual choice.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SweepRecord", into = "SweepRecord")]
pub struct LevelSweep {
    start: f64,
    stop: f64,
    step: f64,
}

impl LevelSweep {
    /// Largest number of levels a sweep may produce.
    pub const MAX_LEVELS: usize = 1_000_000;

    /// Create a sweep, rejecting a zero or misdirected step and steps so
    /// small the sweep would exceed [`MAX_LEVELS`](Self::MAX_LEVELS).
    pub fn new(start: f64, stop: f64, step: f64) -> Result<Self, ModelError> {
        let sweep = Self {
            start: param::finite("level_start", start)?,
            stop: param::finite("level_stop", stop)?,
            step: param::non_zero("level_step", step)?,
        };
        let n = sweep.raw_count();
        if n.is_nan() || n <= 0.0 {
            return Err(ModelError::InvalidParameter {
                name: "level_step",
                value: step,
                reason: format!("does not lead from {start} toward {stop}"),
            });
        }
        if n > Self::MAX_LEVELS as f64 {
            return Err(ModelError::InvalidParameter {
                name: "level_step",
                value: step,
                reason: format!(
                    "yields {n} levels between {start} and {stop}, more than {}",
                    Self::MAX_LEVELS
                ),
            });
        }
        Ok(sweep)
    }

    /// Sweep downward from `start` to a floor elevation.
    ///
    /// The floor is truncated toward zero to centimetre precision, so a basin
    /// bottom at `-2.687` stops the sweep before `-2.68`. `step` is taken
    /// by magnitude.
    pub fn down_to_floor(start: f64, step: f64, floor: f64) -> Result<Self, ModelError> {
        let floor = param::finite("floor", floor)?;
        let stop = (floor * 100.0).trunc() / 100.0;
        Self::new(start, stop, -step.abs())
    }

    /// First level of the sweep.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Exclusive end of the sweep.
    pub fn stop(&self) -> f64 {
        self.stop
    }

    /// Signed increment between consecutive levels.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Whether the sweep runs from high to low levels.
    pub fn is_descending(&self) -> bool {
        self.step < 0.0
    }

    fn raw_count(&self) -> f64 {
        ((self.stop - self.start) / self.step).ceil()
    }

    fn count(&self) -> usize {
        let n = self.raw_count();
        if n.is_finite() && n > 0.0 {
            (n as usize).min(Self::MAX_LEVELS)
        } else {
            0
        }
    }

    /// Number of levels in the sweep.
    pub fn len(&self) -> usize {
        self.count()
    }

    /// Always `false` for a validated sweep.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Materialise the levels in sweep order.
    pub fn levels(&self) -> Vec<f64> {
        (0..self.count())
            .map(|i| self.start + i as f64 * self.step)
            .collect()
    }

    /// Re-check the invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::new(self.start, self.stop, self.step)
            .map(|_| ())
            .map_err(|e| ConfigError::InvalidSweep {
                reason: e.to_string(),
            })
    }
}

/// Unvalidated serde mirror of [`LevelSweep`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct SweepRecord {
    start: f64,
    stop: f64,
    step: f64,
}

impl TryFrom<SweepRecord> for LevelSweep {
    type Error = ModelError;

    fn try_from(r: SweepRecord) -> Result<Self, Self::Error> {
        LevelSweep::new(r.start, r.stop, r.step)
    }
}

impl From<LevelSweep> for SweepRecord {
    fn from(s: LevelSweep) -> Self {
        Self {
            start: s.start,
            stop: s.stop,
            step: s.step,
        }
    }
}
