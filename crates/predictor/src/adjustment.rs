use std::collections::BTreeMap;

use chrono::NaiveDate;
use common::month::month_start;
use common::{DemandError, ForecastRecord, Result};
use serde::{Deserialize, Serialize};

/// Manual per-month multipliers entered by a planner.
///
/// Months without an explicit factor use 1.0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentFactors {
    factors: BTreeMap<NaiveDate, f64>,
}

impl AdjustmentFactors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the factor for the month containing `month`.
    pub fn set(&mut self, month: NaiveDate, factor: f64) -> Result<()> {
        if !factor.is_finite() || factor < 0.0 {
            return Err(DemandError::InvalidConfig(format!(
                "adjustment factor for {month} must be a non-negative number, got {factor}"
            )));
        }
        self.factors.insert(month_start(month), factor);
        Ok(())
    }

    pub fn with(mut self, month: NaiveDate, factor: f64) -> Result<Self> {
        self.set(month, factor)?;
        Ok(self)
    }

    pub fn factor_for(&self, date: NaiveDate) -> f64 {
        self.factors
            .get(&month_start(date))
            .copied()
            .unwrap_or(1.0)
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

/// Scale `forecast_units` and `forecast_smooth` by each month's factor.
///
/// Returns a new table; applying the result again compounds the factors, so
/// callers must always start from a pristine forecast.
pub fn apply_adjustments(
    forecast: &[ForecastRecord],
    factors: &AdjustmentFactors,
) -> Vec<ForecastRecord> {
    forecast
        .iter()
        .map(|r| {
            let factor = factors.factor_for(r.date);
            ForecastRecord {
                forecast_units: r.forecast_units * factor,
                forecast_smooth: r.forecast_smooth * factor,
                ..r.clone()
            }
        })
        .collect()
}
