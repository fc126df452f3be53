//! The [`Well`] value type.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};
use tarn_core::{param, ModelError};

/// Category of an abstraction point.
///
/// Purely descriptive: both kinds contribute to head in the same way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WellKind {
    /// A pumped bore.
    #[default]
    Well,
    /// A natural discharge point.
    Spring,
}

impl fmt::Display for WellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Well => write!(f, "well"),
            Self::Spring => write!(f, "spring"),
        }
    }
}

/// A point well: location, extraction rate `Q` and casing radius `r_w`.
///
/// Immutable once built. The casing radius is validated to be finite and
/// strictly positive, which keeps `ln(r² / r_w²)` defined everywhere.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WellRecord", into = "WellRecord")]
pub struct Well {
    x: f64,
    y: f64,
    extraction_rate: f64,
    casing_radius: f64,
    kind: WellKind,
}

impl Well {
    /// Create a well at `(x, y)`.
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidParameter`] if a coordinate or the rate is not
    /// finite, if `casing_radius` is not finite and `> 0`, or if `r_w²`
    /// leaves the normal float range.
    pub fn new(
        x: f64,
        y: f64,
        extraction_rate: f64,
        casing_radius: f64,
    ) -> Result<Self, ModelError> {
        let casing_radius = param::positive("casing_radius", casing_radius)?;
        if !(casing_radius * casing_radius).is_normal() {
            return Err(ModelError::InvalidParameter {
                name: "casing_radius",
                value: casing_radius,
                reason: "squared radius is not a normal float".into(),
            });
        }
        Ok(Self {
            x: param::finite("x", x)?,
            y: param::finite("y", y)?,
            extraction_rate: param::finite("extraction_rate", extraction_rate)?,
            casing_radius,
            kind: WellKind::Well,
        })
    }

    /// Return a copy tagged with `kind`.
    pub fn with_kind(mut self, kind: WellKind) -> Self {
        self.kind = kind;
        self
    }

    /// `(x, y)` location.
    pub fn location(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Extraction rate `Q`.
    pub fn extraction_rate(&self) -> f64 {
        self.extraction_rate
    }

    /// Casing radius `r_w`.
    pub fn casing_radius(&self) -> f64 {
        self.casing_radius
    }

    /// Well or spring.
    pub fn kind(&self) -> WellKind {
        self.kind
    }

    /// Squared distance from the well to `(x, y)`, clamped at `r_w²`.
    ///
    /// NaN coordinates propagate.
    pub fn clamped_distance_sq(&self, x: f64, y: f64) -> f64 {
        clamped_sq(
            x - self.x,
            y - self.y,
            self.casing_radius * self.casing_radius,
        )
    }

    /// Head contribution of this well alone at `(x, y)`.
    ///
    /// `transmissivity` is assumed validated by the caller.
    pub fn head(&self, x: f64, y: f64, transmissivity: f64) -> f64 {
        WellTerm::new(self, transmissivity).eval(x, y)
    }
}

impl fmt::Display for Well {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at ({}, {}): Q = {}, r_w = {}",
            self.kind, self.x, self.y, self.extraction_rate, self.casing_radius
        )
    }
}

/// Unvalidated serde mirror of [`Well`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct WellRecord {
    x: f64,
    y: f64,
    extraction_rate: f64,
    casing_radius: f64,
    #[serde(default)]
    kind: WellKind,
}

impl TryFrom<WellRecord> for Well {
    type Error = ModelError;

    fn try_from(r: WellRecord) -> Result<Self, Self::Error> {
        Ok(Well::new(r.x, r.y, r.extraction_rate, r.casing_radius)?.with_kind(r.kind))
    }
}

impl From<Well> for WellRecord {
    fn from(w: Well) -> Self {
        Self {
            x: w.x,
            y: w.y,
            extraction_rate: w.extraction_rate,
            casing_radius: w.casing_radius,
            kind: w.kind,
        }
    }
}

/// A well with its transmissivity-dependent constants folded in.
#[derive(Clone, Copy, Debug)]
pub(crate) struct WellTerm {
    x: f64,
    y: f64,
    rw2: f64,
    coeff: f64,
}

impl WellTerm {
    pub(crate) fn new(well: &Well, transmissivity: f64) -> Self {
        Self {
            x: well.x,
            y: well.y,
            rw2: well.casing_radius * well.casing_radius,
            coeff: well.extraction_rate / (4.0 * PI * transmissivity),
        }
    }

    #[inline]
    pub(crate) fn eval(&self, x: f64, y: f64) -> f64 {
        let r2 = clamped_sq(x - self.x, y - self.y, self.rw2);
        self.coeff * (r2 / self.rw2).ln()
    }
}

/// `dx² + dy²`, raised to `rw2` inside the casing. NaN propagates.
#[inline]
fn clamped_sq(dx: f64, dy: f64, rw2: f64) -> f64 {
    let r2 = dx * dx + dy * dy;
    if r2 < rw2 {
        rw2
    } else {
        r2
    }
}
