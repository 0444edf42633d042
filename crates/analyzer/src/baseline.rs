use std::collections::BTreeMap;

use chrono::NaiveDate;
use common::month::sub_months;
use common::{DemandKey, RunWarnings};
use normalize::NormalizedHistory;
use serde::Serialize;
use tracing::{debug, warn};

/// Steady-state monthly demand of one key before seasonality.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkuBaseline {
    pub key: DemandKey,
    pub category: String,
    pub brand: String,
    /// Mean monthly weighted sales inside the lookback window.
    pub avg_weighted_sales: f64,
    pub baseline: f64,
}

/// Category control totals over the lookback window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBaseline {
    /// Sum of `avg_weighted_sales` over the category's keys.
    pub total_category_weighted: f64,
    /// Category weighted sales in the window divided by the window length.
    pub monthly_run_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BaselineTable {
    /// Ordered by key.
    pub rows: Vec<SkuBaseline>,
    pub categories: BTreeMap<String, CategoryBaseline>,
}

impl BaselineTable {
    pub fn get(&self, key: &DemandKey) -> Option<&SkuBaseline> {
        self.rows
            .binary_search_by(|row| row.key.cmp(key))
            .ok()
            .map(|idx| &self.rows[idx])
    }
}

/// Share of category demand scaled to the category run-rate.
///
/// `None` when the category total is not positive, i.e. the share is undefined.
pub fn category_share_baseline(avg: f64, category_total: f64, run_rate: f64) -> Option<f64> {
    if category_total.is_nan() || category_total <= 0.0 {
        return None;
    }
    Some((avg / category_total * run_rate).max(0.0))
}

/// Estimate per-key baselines from the `lookback_months` most recent months.
///
/// The window ends at the latest history month and holds `lookback_months`
/// calendar months. Keys without activity in the window are left out unless
/// `include_inactive` is set, in which case they get a zero baseline.
pub fn estimate_baselines(
    history: &NormalizedHistory,
    lookback_months: u32,
    include_inactive: bool,
) -> (BaselineTable, RunWarnings) {
    let mut warnings = RunWarnings::default();
    let window_start = sub_months(history.last_date, lookback_months);
    let in_window = |date: NaiveDate| window_start.map_or(true, |start| date > start);

    // key -> month -> weighted sales; category -> weighted sales
    let mut per_key: BTreeMap<&DemandKey, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
    let mut category_window_sum: BTreeMap<&str, f64> = BTreeMap::new();
    for obs in history.observations.iter().filter(|o| in_window(o.date)) {
        *per_key
            .entry(&obs.key)
            .or_default()
            .entry(obs.date)
            .or_insert(0.0) += obs.weighted_sales;
        *category_window_sum.entry(obs.category.as_str()).or_insert(0.0) += obs.weighted_sales;
    }

    let avg_by_key: BTreeMap<&DemandKey, f64> = per_key
        .iter()
        .map(|(key, months)| {
            let sum: f64 = months.values().sum();
            (*key, sum / months.len() as f64)
        })
        .collect();

    let mut categories: BTreeMap<String, CategoryBaseline> = BTreeMap::new();
    for (key, meta) in &history.keys {
        let emitted = avg_by_key.contains_key(key) || include_inactive;
        if !emitted {
            continue;
        }
        let entry = categories
            .entry(meta.category.clone())
            .or_insert_with(|| CategoryBaseline {
                total_category_weighted: 0.0,
                monthly_run_rate: category_window_sum
                    .get(meta.category.as_str())
                    .copied()
                    .unwrap_or(0.0)
                    / lookback_months as f64,
            });
        entry.total_category_weighted += avg_by_key.get(key).copied().unwrap_or(0.0);
    }

    let mut rows = Vec::with_capacity(history.keys.len());
    for (key, meta) in &history.keys {
        let avg = match avg_by_key.get(key) {
            Some(avg) => *avg,
            None if include_inactive => 0.0,
            None => continue,
        };
        let Some(category) = categories.get(&meta.category) else {
            continue;
        };
        let baseline = match category_share_baseline(
            avg,
            category.total_category_weighted,
            category.monthly_run_rate,
        ) {
            Some(b) => b,
            None => {
                warnings
                    .empty_category_baselines
                    .insert(meta.category.clone());
                0.0
            }
        };
        rows.push(SkuBaseline {
            key: key.clone(),
            category: meta.category.clone(),
            brand: meta.brand.clone(),
            avg_weighted_sales: avg,
            baseline,
        });
    }

    if !warnings.empty_category_baselines.is_empty() {
        warn!(
            categories = ?warnings.empty_category_baselines,
            "Categories with zero recent weighted sales; baselines set to zero"
        );
    }
    debug!(
        keys = rows.len(),
        categories = categories.len(),
        window_start = ?window_start,
        "Estimated baselines"
    );

    (BaselineTable { rows, categories }, warnings)
}

#[cfg(test)]
mod tests;
