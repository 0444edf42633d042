use std::collections::BTreeMap;

use chrono::Datelike;
use common::CategorySeasonalIndex;
use normalize::NormalizedHistory;
use tracing::debug;

/// Category × calendar-month demand index, floored.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalityTable {
    factors: BTreeMap<(String, u32), f64>,
    floor: f64,
}

impl SeasonalityTable {
    pub fn floor(&self) -> f64 {
        self.floor
    }

    /// Observed factor for the category and calendar month (1 = January).
    pub fn factor(&self, category: &str, month: u32) -> Option<f64> {
        self.factors.get(&(category.to_string(), month)).copied()
    }

    /// Observed factor, or the floor when the category never sold in that month.
    /// The flag is `true` when the floor was used.
    pub fn factor_or_floor(&self, category: &str, month: u32) -> (f64, bool) {
        match self.factor(category, month) {
            Some(f) => (f, false),
            None => (self.floor, true),
        }
    }

    /// Flat rows ordered by category then month.
    pub fn indices(&self) -> Vec<CategorySeasonalIndex> {
        self.factors
            .iter()
            .map(|((category, month), factor)| CategorySeasonalIndex {
                category: category.clone(),
                calendar_month: *month,
                factor: *factor,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

/// Seasonal index per category and calendar month over the whole history.
///
/// Each month's total weighted sales is divided by the category's mean
/// monthly total (over the calendar months it sold in), then floored. A ratio
/// that is undefined because the category never sold anything becomes the floor.
pub fn estimate_seasonality(history: &NormalizedHistory, floor: f64) -> SeasonalityTable {
    let mut month_totals: BTreeMap<(String, u32), f64> = BTreeMap::new();
    for obs in &history.observations {
        *month_totals
            .entry((obs.category.clone(), obs.date.month()))
            .or_insert(0.0) += obs.weighted_sales;
    }

    let mut category_sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for ((category, _), total) in &month_totals {
        let entry = category_sums.entry(category.as_str()).or_insert((0.0, 0));
        entry.0 += total;
        entry.1 += 1;
    }
    let category_means: BTreeMap<String, f64> = category_sums
        .into_iter()
        .map(|(category, (sum, n))| (category.to_string(), sum / n as f64))
        .collect();

    let factors: BTreeMap<(String, u32), f64> = month_totals
        .iter()
        .map(|((category, month), total)| {
            let mean = category_means.get(category).copied().unwrap_or(0.0);
            let raw = if mean > 0.0 { total / mean } else { f64::NAN };
            // f64::max ignores NaN
            ((category.clone(), *month), raw.max(floor))
        })
        .collect();

    debug!(
        categories = category_means.len(),
        entries = factors.len(),
        floor = floor,
        "Estimated seasonality"
    );

    SeasonalityTable { factors, floor }
}
