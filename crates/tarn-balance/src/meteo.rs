//! Vapour pressure from air temperature and relative humidity.
//!
//! Pressures are in kPa, temperature in °C and relative humidity in percent.

/// Saturation vapour pressure `e_s = 0.6108 · exp(17.27 T / (T + 237.3))`.
pub fn saturation_vapour_pressure(t_c: f64) -> f64 {
    0.6108 * ((17.27 * t_c) / (t_c + 237.3)).exp()
}

/// Actual vapour pressure `e_a = (rh / 100) · e_s`.
pub fn actual_vapour_pressure(t_c: f64, rh_pct: f64) -> f64 {
    rh_pct / 100.0 * saturation_vapour_pressure(t_c)
}

/// Vapour pressure deficit `e_s - e_a`.
pub fn vapour_pressure_deficit(t_c: f64, rh_pct: f64) -> f64 {
    saturation_vapour_pressure(t_c) - actual_vapour_pressure(t_c, rh_pct)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_saturation_pressures() {
        assert!((saturation_vapour_pressure(0.0) - 0.6108).abs() < 1e-12);
        assert!((saturation_vapour_pressure(25.0) - 3.1678).abs() < 1e-4);
    }

    #[test]
    fn deficit_bounds() {
        let es = saturation_vapour_pressure(18.0);
        assert_eq!(vapour_pressure_deficit(18.0, 100.0), 0.0);
        assert!((vapour_pressure_deficit(18.0, 0.0) - es).abs() < 1e-12);
        assert!((actual_vapour_pressure(18.0, 40.0) - 0.4 * es).abs() < 1e-12);
    }
}
