//! Stable water isotope fractionation during evaporation.
//!
//! All enrichments are in per mil (‰). Relative humidity is a fraction in
//! `[0, 1]` here; the daily records carry it in percent.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tarn_core::ModelError;

/// A stable isotope of water.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Isotope {
    /// ¹⁸O, written `"18O"`.
    #[serde(rename = "18O")]
    Oxygen18,
    /// ²H, written `"2H"`.
    #[serde(rename = "2H")]
    Deuterium,
}

impl Isotope {
    /// Conventional short symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Oxygen18 => "18O",
            Self::Deuterium => "2H",
        }
    }

    /// Kinetic fractionation constant `C_k` in ‰.
    pub fn kinetic_constant(self) -> f64 {
        match self {
            Self::Oxygen18 => 14.2,
            Self::Deuterium => 12.5,
        }
    }

    /// Equilibrium liquid–vapour fractionation factor α at `t_c` °C
    /// (Horita & Wesolowski, 1994).
    pub fn alpha_lv(self, t_c: f64) -> f64 {
        let t = t_c + 273.15;
        let ln_alpha = match self {
            Self::Oxygen18 => {
                0.35041 * (1e6 / t.powi(3)) - 1.6664 * (1e3 / t.powi(2)) + 6.7123 / t - 0.007685
            }
            Self::Deuterium => {
                1.1588 * (t.powi(3) / 1e9) - 1.6201 * (t.powi(2) / 1e6)
                    + 0.79484 * (t / 1e3)
                    + 2.9992 * (1e6 / t.powi(3))
                    - 0.16104
            }
        };
        ln_alpha.exp()
    }

    /// Equilibrium enrichment `ε* = (α - 1) · 1000`.
    pub fn eps_eq(self, t_c: f64) -> f64 {
        (self.alpha_lv(t_c) - 1.0) * 1000.0
    }

    /// Kinetic enrichment `ε_k = (1 - h) · C_k`.
    pub fn eps_k(self, rh: f64) -> f64 {
        (1.0 - rh) * self.kinetic_constant()
    }

    /// Total enrichment `ε* + ε_k`.
    pub fn eps_tot(self, t_c: f64, rh: f64) -> f64 {
        self.eps_eq(t_c) + self.eps_k(rh)
    }

    /// Craig–Gordon composition of the evaporating flux,
    /// `(α δ_w - h δ_a - ε) / (1 - h + ε_k / 1000)`.
    pub fn delta_e(self, t_c: f64, rh: f64, delta_water: f64, delta_atmosphere: f64) -> f64 {
        let num = self.alpha_lv(t_c) * delta_water - rh * delta_atmosphere - self.eps_tot(t_c, rh);
        let den = 1.0 - rh + self.eps_k(rh) / 1000.0;
        num / den
    }
}

impl FromStr for Isotope {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "18O" => Ok(Self::Oxygen18),
            "2H" => Ok(Self::Deuterium),
            _ => Err(ModelError::UnknownIsotope { name: s.to_owned() }),
        }
    }
}

impl fmt::Display for Isotope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
