//! Monthly unit summaries behind the planner's history and year-over-year views.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use common::metrics::pct_change;
use common::month::{month_start, sub_months};
use common::{ForecastRecord, SalesRecord};
use serde::Serialize;

/// Brand / category selection; `None` means all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub brand: Option<String>,
    pub category: Option<String>,
}

impl HistoryFilter {
    fn accepts(&self, brand: &str, category: &str) -> bool {
        self.brand.as_deref().map_or(true, |b| b == brand)
            && self.category.as_deref().map_or(true, |c| c == category)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyUnits {
    pub month: NaiveDate,
    pub units: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearOverYear {
    pub month: NaiveDate,
    pub units: f64,
    /// Units in the same month one year earlier, when history covers it.
    pub last_year: Option<f64>,
    pub pct_change: Option<f64>,
}

fn sum_by_month(items: impl Iterator<Item = (NaiveDate, f64)>) -> Vec<MonthlyUnits> {
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (date, units) in items {
        *totals.entry(month_start(date)).or_insert(0.0) += units;
    }
    totals
        .into_iter()
        .map(|(month, units)| MonthlyUnits { month, units })
        .collect()
}

/// Units sold per month (unweighted), ordered by month.
pub fn monthly_history(history: &[SalesRecord], filter: &HistoryFilter) -> Vec<MonthlyUnits> {
    sum_by_month(
        history
            .iter()
            .filter(|r| filter.accepts(&r.brand, &r.category))
            .map(|r| (r.date, r.units_sold)),
    )
}

/// Forecast units per month, ordered by month.
pub fn monthly_forecast(forecast: &[ForecastRecord], filter: &HistoryFilter) -> Vec<MonthlyUnits> {
    sum_by_month(
        forecast
            .iter()
            .filter(|r| filter.accepts(&r.brand, &r.category))
            .map(|r| (r.date, r.forecast_units)),
    )
}

fn against_last_year(series: &[MonthlyUnits], reference: &[MonthlyUnits]) -> Vec<YearOverYear> {
    let by_month: BTreeMap<NaiveDate, f64> =
        reference.iter().map(|m| (m.month, m.units)).collect();
    series
        .iter()
        .map(|m| {
            let last_year = sub_months(m.month, 12).and_then(|ly| by_month.get(&ly).copied());
            YearOverYear {
                month: m.month,
                units: m.units,
                last_year,
                pct_change: last_year.and_then(|ly| pct_change(m.units, ly)),
            }
        })
        .collect()
}

/// Each history month next to the same month a year earlier.
pub fn history_vs_last_year(history: &[SalesRecord], filter: &HistoryFilter) -> Vec<YearOverYear> {
    let monthly = monthly_history(history, filter);
    against_last_year(&monthly, &monthly)
}

/// Each forecast month next to actual sales in the same month a year earlier.
pub fn forecast_vs_last_year(
    history: &[SalesRecord],
    forecast: &[ForecastRecord],
    filter: &HistoryFilter,
) -> Vec<YearOverYear> {
    against_last_year(
        &monthly_forecast(forecast, filter),
        &monthly_history(history, filter),
    )
}
