//! Daily results gathered as named columns.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tarn_core::{param, BalanceConfig, ModelError};

use crate::water_balance::{tracer_balance, water_balance, DailyFlux, DailyRecord, Tracer};

/// Equal-length `f64` columns in insertion order.
///
/// Serializes as a map from column name to values, preserving order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "IndexMap<String, Vec<f64>>",
    into = "IndexMap<String, Vec<f64>>"
)]
pub struct BalanceTable {
    columns: IndexMap<String, Vec<f64>>,
}

impl BalanceTable {
    /// A table with no columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record columns, water balance fluxes and one column per tracer.
    ///
    /// Flux columns (`P`, `E`, `dV`, `I`) describe the interval starting on
    /// each day, so the last row holds `NaN` for them.
    pub fn from_records(
        records: &[DailyRecord],
        config: &BalanceConfig,
        tracers: &[&dyn Tracer],
    ) -> Result<Self, ModelError> {
        let fluxes = water_balance(records, config)?;
        let mut table = Self::new();

        let record_columns: [(&str, fn(&DailyRecord) -> f64); 6] = [
            ("area", |r| r.area),
            ("volume", |r| r.volume),
            ("rain_mm", |r| r.rain_mm),
            ("pan_evaporation_mm", |r| r.pan_evaporation_mm),
            ("temperature_c", |r| r.temperature_c),
            ("relative_humidity_pct", |r| r.relative_humidity_pct),
        ];
        for (name, get) in record_columns {
            table.insert(name, records.iter().map(get).collect())?;
        }

        let padded = |get: fn(&DailyFlux) -> f64| -> Vec<f64> {
            fluxes
                .iter()
                .map(get)
                .chain(std::iter::once(f64::NAN))
                .collect()
        };
        table.insert("P", padded(|f| f.precipitation))?;
        table.insert("E", padded(|f| f.evaporation))?;
        table.insert("dV", padded(|f| f.storage_change))?;
        table.insert("I", padded(|f| f.outflow))?;

        for tracer in tracers {
            let values = tracer_balance(records, &fluxes, *tracer)?;
            table.insert(tracer.name(), values)?;
        }
        Ok(table)
    }

    /// Add or replace a column, returning the previous values.
    ///
    /// # Errors
    ///
    /// [`ModelError::ShapeMismatch`] if the table already has rows and
    /// `values` differs in length.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<Option<Vec<f64>>, ModelError> {
        if !self.columns.is_empty() {
            param::same_len("table column", self.len(), values.len())?;
        }
        Ok(self.columns.insert(name.into(), values))
    }

    /// Values of the named column.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Column names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.keys().map(String::as_str)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns.values().next().map_or(0, Vec::len)
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Row `i` as `(name, value)` pairs.
    pub fn row(&self, i: usize) -> Option<Vec<(&str, f64)>> {
        (i < self.len()).then(|| {
            self.columns
                .iter()
                .map(|(name, values)| (name.as_str(), values[i]))
                .collect()
        })
    }
}

impl TryFrom<IndexMap<String, Vec<f64>>> for BalanceTable {
    type Error = ModelError;

    fn try_from(columns: IndexMap<String, Vec<f64>>) -> Result<Self, Self::Error> {
        let mut table = Self::new();
        for (name, values) in columns {
            table.insert(name, values)?;
        }
        Ok(table)
    }
}

impl From<BalanceTable> for IndexMap<String, Vec<f64>> {
    fn from(table: BalanceTable) -> Self {
        table.columns
    }
}

/// Tab-separated, header first.
impl fmt::Display for BalanceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header: Vec<&str> = self.names().collect();
        write!(f, "{}", header.join("\t"))?;
        for i in 0..self.len() {
            writeln!(f)?;
            let cells: Vec<String> = self.columns.values().map(|c| c[i].to_string()).collect();
            write!(f, "{}", cells.join("\t"))?;
        }
        Ok(())
    }
}
