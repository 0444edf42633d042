use analyzer::{SeasonalityTable, SkuBaseline};
use chrono::{Datelike, NaiveDate};
use common::month::months_after;
use common::{DemandKey, ForecastRecord, RunWarnings};
use tracing::debug;

/// One series to project: a baseline attached to an output SKU.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineRow {
    /// SKU reported in the output; differs from `key.sku_virtual` for custom SKUs.
    pub sku: String,
    pub key: DemandKey,
    pub category: String,
    pub brand: String,
    pub baseline: f64,
}

impl From<&SkuBaseline> for BaselineRow {
    fn from(b: &SkuBaseline) -> Self {
        Self {
            sku: b.key.sku_virtual.clone(),
            key: b.key.clone(),
            category: b.category.clone(),
            brand: b.brand.clone(),
            baseline: b.baseline,
        }
    }
}

/// Multiply each baseline by its category's seasonal factor for every month
/// in the horizon.
///
/// Months start the month after `last_date`. Missing category/month factors
/// use the table floor and are counted in `seasonality_fallbacks`. Output is
/// ordered by virtual SKU, channel, SKU and date.
pub fn project(
    rows: &[BaselineRow],
    seasonality: &SeasonalityTable,
    last_date: NaiveDate,
    horizon_months: u32,
) -> (Vec<ForecastRecord>, RunWarnings) {
    let mut warnings = RunWarnings::default();
    let months = months_after(last_date, horizon_months);

    let mut ordered: Vec<&BaselineRow> = rows.iter().collect();
    ordered.sort_by(|a, b| (&a.key, &a.sku).cmp(&(&b.key, &b.sku)));

    let mut forecast = Vec::with_capacity(ordered.len() * months.len());
    for row in ordered {
        for &date in &months {
            let (factor, fallback) = seasonality.factor_or_floor(&row.category, date.month());
            if fallback {
                warnings.seasonality_fallbacks += 1;
            }
            let units = (row.baseline * factor).max(0.0);
            forecast.push(ForecastRecord {
                date,
                sku: row.sku.clone(),
                sku_virtual: row.key.sku_virtual.clone(),
                channel: row.key.channel.clone(),
                category: row.category.clone(),
                brand: row.brand.clone(),
                forecast_units: units,
                forecast_smooth: units,
                sellable: true,
            });
        }
    }

    debug!(
        series = rows.len(),
        months = months.len(),
        fallbacks = warnings.seasonality_fallbacks,
        "Projected forecast"
    );
    (forecast, warnings)
}
