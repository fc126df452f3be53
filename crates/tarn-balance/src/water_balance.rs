//! Daily water balance and tracer mass balances.
//!
//! For each interval `i → i+1`:
//!
//! ```text
//! E = A_i · pan_i / (1000 · pan_factor)       open-water evaporation, m³
//! P = A_i · rain_i / 1000                     direct rainfall, m³
//! ΔV = V_{i+1} - V_i
//! I = P - E - ΔV                              residual outflow, m³
//! ```
//!
//! A tracer of concentration `c` then follows
//! `M_{i+1} = M_i + c_rain · P - c_evap · E - c_i · I` with `c_i = M_i / V_i`.

use serde::{Deserialize, Serialize};
use tarn_core::{param, BalanceConfig, ModelError};
use tracing::debug;

use crate::isotope::Isotope;

/// One day of lake state and meteorology.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Wetted area, m².
    pub area: f64,
    /// Stored volume, m³.
    pub volume: f64,
    /// Rainfall, mm.
    pub rain_mm: f64,
    /// Class-A pan evaporation, mm.
    pub pan_evaporation_mm: f64,
    /// Mean air temperature, °C.
    pub temperature_c: f64,
    /// Mean relative humidity, %.
    pub relative_humidity_pct: f64,
}

impl DailyRecord {
    /// Area, volume, rain and pan evaporation must be finite and `>= 0`.
    pub fn validate(&self) -> Result<(), ModelError> {
        param::in_range("area", self.area, 0.0, f64::INFINITY)?;
        param::in_range("volume", self.volume, 0.0, f64::INFINITY)?;
        param::in_range("rain_mm", self.rain_mm, 0.0, f64::INFINITY)?;
        param::in_range(
            "pan_evaporation_mm",
            self.pan_evaporation_mm,
            0.0,
            f64::INFINITY,
        )?;
        Ok(())
    }
}

/// Volumes exchanged over one interval, m³.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyFlux {
    /// Rain falling on the lake surface.
    pub precipitation: f64,
    /// Open-water evaporation.
    pub evaporation: f64,
    /// Change in stored volume.
    pub storage_change: f64,
    /// Residual outflow closing the balance; negative means net inflow.
    pub outflow: f64,
}

/// Close the water balance between consecutive records.
///
/// Returns `records.len() - 1` fluxes.
///
/// # Errors
///
/// - [`ModelError::Config`] for an invalid pan factor.
/// - [`ModelError::EmptyInput`] when there are no records.
/// - [`ModelError::InvalidParameter`] for a negative or non-finite record field.
pub fn water_balance(
    records: &[DailyRecord],
    config: &BalanceConfig,
) -> Result<Vec<DailyFlux>, ModelError> {
    config.validate()?;
    if records.is_empty() {
        return Err(ModelError::EmptyInput {
            what: "daily records",
        });
    }
    for r in records {
        r.validate()?;
    }
    debug!(
        days = records.len(),
        pan_factor = config.pan_factor,
        "closing water balance"
    );

    Ok(records
        .windows(2)
        .map(|w| {
            let (today, tomorrow) = (&w[0], &w[1]);
            let evaporation = today.area * today.pan_evaporation_mm / (1000.0 * config.pan_factor);
            let precipitation = today.area * today.rain_mm / 1000.0;
            let storage_change = tomorrow.volume - today.volume;
            DailyFlux {
                precipitation,
                evaporation,
                storage_change,
                outflow: precipitation - evaporation - storage_change,
            }
        })
        .collect())
}

/// Composition of a solute carried through the water balance.
pub trait Tracer {
    /// Short label, used as a column name.
    fn name(&self) -> &str;

    /// Concentration in the lake on the first day.
    fn initial(&self) -> f64;

    /// Concentration in rain.
    fn rain(&self) -> f64;

    /// Concentration of the evaporating flux given today's record and the
    /// current lake concentration.
    fn evaporate(&self, record: &DailyRecord, lake: f64) -> f64;

    /// Extra per-record requirements of this tracer.
    fn check(&self, _record: &DailyRecord) -> Result<(), ModelError> {
        Ok(())
    }
}

/// Chloride, conservative: evaporation removes no mass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chloride {
    /// Initial lake concentration, g/m³.
    pub initial: f64,
    /// Rain concentration, g/m³.
    pub rain: f64,
}

impl Tracer for Chloride {
    fn name(&self) -> &str {
        "Cl"
    }

    fn initial(&self) -> f64 {
        self.initial
    }

    fn rain(&self) -> f64 {
        self.rain
    }

    fn evaporate(&self, _record: &DailyRecord, _lake: f64) -> f64 {
        0.0
    }
}

/// A stable isotope in δ notation (‰). Evaporation leaves at the
/// Craig–Gordon composition for the day's temperature and humidity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IsotopeTracer {
    /// Species.
    pub isotope: Isotope,
    /// Initial lake δ.
    pub initial_delta: f64,
    /// Rain δ.
    pub rain_delta: f64,
    /// Atmospheric vapour δ.
    pub atmosphere_delta: f64,
}

impl Tracer for IsotopeTracer {
    fn name(&self) -> &str {
        self.isotope.symbol()
    }

    fn initial(&self) -> f64 {
        self.initial_delta
    }

    fn rain(&self) -> f64 {
        self.rain_delta
    }

    fn evaporate(&self, record: &DailyRecord, lake: f64) -> f64 {
        self.isotope.delta_e(
            record.temperature_c,
            record.relative_humidity_pct / 100.0,
            lake,
            self.atmosphere_delta,
        )
    }

    /// Humidity must lie in `[0, 100)` %. Saturated air leaves the
    /// Craig–Gordon denominator at zero.
    fn check(&self, record: &DailyRecord) -> Result<(), ModelError> {
        param::finite("temperature_c", record.temperature_c)?;
        let rh = param::in_range(
            "relative_humidity_pct",
            record.relative_humidity_pct,
            0.0,
            100.0,
        )?;
        if rh >= 100.0 {
            return Err(ModelError::InvalidParameter {
                name: "relative_humidity_pct",
                value: rh,
                reason: "must be < 100 for an evaporating isotope".into(),
            });
        }
        Ok(())
    }
}

/// Daily lake concentration of `tracer`, one value per record.
///
/// `fluxes` must come from [`water_balance`] over the same records.
///
/// # Errors
///
/// - [`ModelError::EmptyInput`] when there are no records.
/// - [`ModelError::ShapeMismatch`] unless `fluxes.len() == records.len() - 1`.
/// - [`ModelError::InvalidParameter`] for a non-positive volume or a record
///   the tracer cannot use.
pub fn tracer_balance<T>(
    records: &[DailyRecord],
    fluxes: &[DailyFlux],
    tracer: &T,
) -> Result<Vec<f64>, ModelError>
where
    T: Tracer + ?Sized,
{
    if records.is_empty() {
        return Err(ModelError::EmptyInput {
            what: "daily records",
        });
    }
    param::same_len("daily fluxes", records.len() - 1, fluxes.len())?;
    for r in records {
        param::positive("volume", r.volume)?;
        tracer.check(r)?;
    }
    debug!(
        tracer = tracer.name(),
        days = records.len(),
        "running tracer mass balance"
    );

    let mut mass = records[0].volume * tracer.initial();
    let mut concentration = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let c = mass / record.volume;
        concentration.push(c);
        if let Some(f) = fluxes.get(i) {
            mass += tracer.rain() * f.precipitation
                - tracer.evaporate(record, c) * f.evaporation
                - c * f.outflow;
        }
    }
    Ok(concentration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn day(area: f64, volume: f64, rain_mm: f64, pan_mm: f64) -> DailyRecord {
        DailyRecord {
            area,
            volume,
            rain_mm,
            pan_evaporation_mm: pan_mm,
            temperature_c: 22.0,
            relative_humidity_pct: 55.0,
        }
    }

    #[test]
    fn fluxes_follow_pan_factor() {
        let records = [day(1000.0, 5000.0, 6.0, 12.0), day(1000.0, 4995.0, 0.0, 0.0)];
        let f = water_balance(&records, &BalanceConfig::default()).unwrap();
        assert_eq!(f.len(), 1);
        assert!((f[0].evaporation - 10.0).abs() < 1e-12);
        assert!((f[0].precipitation - 6.0).abs() < 1e-12);
        assert_eq!(f[0].storage_change, -5.0);
        assert!((f[0].outflow - 1.0).abs() < 1e-12);
    }

    #[test]
    fn single_record_has_no_fluxes() {
        let f = water_balance(&[day(1.0, 1.0, 0.0, 0.0)], &BalanceConfig::default()).unwrap();
        assert!(f.is_empty());
    }

    #[test]
    fn invalid_inputs_rejected() {
        let cfg = BalanceConfig::default();
        assert!(matches!(
            water_balance(&[], &cfg),
            Err(ModelError::EmptyInput { .. })
        ));
        assert!(matches!(
            water_balance(&[day(1.0, 1.0, 0.0, 0.0)], &cfg.with_pan_factor(0.0)),
            Err(ModelError::Config(_))
        ));
        assert!(water_balance(&[day(-1.0, 1.0, 0.0, 0.0)], &cfg).is_err());
        assert!(water_balance(&[day(1.0, 1.0, f64::NAN, 0.0)], &cfg).is_err());
    }

    #[test]
    fn tracer_rejects_dry_lake_and_mismatched_fluxes() {
        let cl = Chloride {
            initial: 20.0,
            rain: 5.0,
        };
        let records = [day(1.0, 10.0, 0.0, 0.0), day(1.0, 0.0, 0.0, 0.0)];
        let fluxes = water_balance(&records, &BalanceConfig::default()).unwrap();
        assert!(matches!(
            tracer_balance(&records, &fluxes, &cl),
            Err(ModelError::InvalidParameter { name: "volume", .. })
        ));
        assert!(matches!(
            tracer_balance(&records[..1], &fluxes, &cl),
            Err(ModelError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            tracer_balance(&[], &[], &cl),
            Err(ModelError::EmptyInput { .. })
        ));
    }

    #[test]
    fn chloride_constant_without_evaporation_when_rain_matches() {
        let records = [
            day(800.0, 4000.0, 10.0, 0.0),
            day(820.0, 4010.0, 0.0, 0.0),
            day(810.0, 3990.0, 25.0, 0.0),
            day(850.0, 4030.0, 0.0, 0.0),
        ];
        let fluxes = water_balance(&records, &BalanceConfig::default()).unwrap();
        let cl = Chloride {
            initial: 15.0,
            rain: 15.0,
        };
        let c = tracer_balance(&records, &fluxes, &cl).unwrap();
        assert_eq!(c.len(), 4);
        for ci in c {
            assert!((ci - 15.0).abs() < 1e-9, "{ci}");
        }
    }

    #[test]
    fn chloride_concentrates_under_pure_evaporation() {
        // 10 m³/day evaporated, nothing else in or out.
        let records = [
            day(1000.0, 1000.0, 0.0, 12.0),
            day(1000.0, 990.0, 0.0, 12.0),
            day(1000.0, 980.0, 0.0, 12.0),
        ];
        let fluxes = water_balance(&records, &BalanceConfig::default()).unwrap();
        assert!(fluxes.iter().all(|f| f.outflow.abs() < 1e-9));
        let cl = Chloride {
            initial: 20.0,
            rain: 5.0,
        };
        let c = tracer_balance(&records, &fluxes, &cl).unwrap();
        assert_eq!(c[0], 20.0);
        assert!((c[2] - 20.0 * 1000.0 / 980.0).abs() < 1e-9);
    }

    #[test]
    fn isotopes_enrich_under_evaporation() {
        let records = [
            day(1000.0, 1000.0, 0.0, 12.0),
            day(1000.0, 990.0, 0.0, 12.0),
            day(1000.0, 980.0, 0.0, 12.0),
        ];
        let fluxes = water_balance(&records, &BalanceConfig::default()).unwrap();
        let tracer = IsotopeTracer {
            isotope: Isotope::Deuterium,
            initial_delta: -17.0,
            rain_delta: -17.0,
            atmosphere_delta: -120.0,
        };
        let d = tracer_balance(&records, &fluxes, &tracer).unwrap();
        assert_eq!(d[0], -17.0);
        assert!(d[1] > d[0]);
        assert!(d[2] > d[1]);
    }

    #[test]
    fn isotope_tracer_needs_humidity_in_percent() {
        let mut r = day(1.0, 1.0, 0.0, 0.0);
        r.relative_humidity_pct = 140.0;
        let tracer = IsotopeTracer {
            isotope: Isotope::Oxygen18,
            initial_delta: -2.0,
            rain_delta: -4.0,
            atmosphere_delta: -12.0,
        };
        assert!(tracer_balance(&[r], &[], &tracer).is_err());
        let dynamic: &dyn Tracer = &tracer;
        r.relative_humidity_pct = 40.0;
        assert_eq!(tracer_balance(&[r], &[], dynamic).unwrap(), vec![-2.0]);
    }

    #[test]
    fn saturated_air_rejected_for_isotopes() {
        let records: Vec<DailyRecord> = (0..3)
            .map(|i| {
                let mut r = day(1000.0, 5000.0 - 10.0 * i as f64, 0.0, 10.0);
                r.relative_humidity_pct = 100.0;
                r
            })
            .collect();
        let fluxes = water_balance(&records, &BalanceConfig::default()).unwrap();
        let tracer = IsotopeTracer {
            isotope: Isotope::Deuterium,
            initial_delta: -17.0,
            rain_delta: -17.0,
            atmosphere_delta: -120.0,
        };
        let err = tracer_balance(&records, &fluxes, &tracer).unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidParameter {
                name: "relative_humidity_pct",
                ..
            }
        ));

        // Chloride does not depend on humidity.
        let cl = Chloride {
            initial: 20.0,
            rain: 5.0,
        };
        let c = tracer_balance(&records, &fluxes, &cl).unwrap();
        assert!(c.iter().all(|v| v.is_finite()));
    }

    fn arb_day() -> impl Strategy<Value = DailyRecord> {
        (
            10.0f64..5000.0,
            100.0f64..50_000.0,
            0.0f64..60.0,
            0.0f64..15.0,
        )
            .prop_map(|(a, v, r, e)| day(a, v, r, e))
    }

    proptest! {
        #[test]
        fn water_balance_closes(
            records in prop::collection::vec(arb_day(), 1..30),
            pan_factor in 0.5f64..2.0,
        ) {
            let cfg = BalanceConfig::default().with_pan_factor(pan_factor);
            let fluxes = water_balance(&records, &cfg).unwrap();
            prop_assert_eq!(fluxes.len(), records.len() - 1);
            for f in &fluxes {
                let residual = f.precipitation - f.evaporation - f.storage_change - f.outflow;
                prop_assert!(residual.abs() <= 1e-9 * (1.0 + f.storage_change.abs()));
            }
        }
    }
}
