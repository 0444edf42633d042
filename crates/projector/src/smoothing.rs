use std::collections::BTreeMap;

use common::ForecastRecord;
use tracing::debug;

/// Centered moving average with a minimum period of one.
///
/// Edges average over the part of the window that exists, so the first value
/// of a window-3 mean covers positions 0 and 1 only.
pub fn centered_rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    if n == 0 || window == 0 {
        return values.to_vec();
    }
    let half = window / 2;
    (0..n)
        .map(|i| {
            let start = i.saturating_sub(half);
            let end = i.saturating_add(window - half).min(n);
            let segment = &values[start..end];
            segment.iter().sum::<f64>() / segment.len() as f64
        })
        .collect()
}

/// Fill `forecast_smooth` per `(sku_virtual, channel, sku)` series in date order.
///
/// Months outside the SKU's transition window stay at zero.
pub fn smooth_forecast(forecast: &mut [ForecastRecord], window: usize) {
    let mut series: BTreeMap<(&str, &str, &str), Vec<usize>> = BTreeMap::new();
    for (idx, r) in forecast.iter().enumerate() {
        series
            .entry((r.sku_virtual.as_str(), r.channel.as_str(), r.sku.as_str()))
            .or_default()
            .push(idx);
    }
    let groups: Vec<Vec<usize>> = series.into_values().collect();
    let series_count = groups.len();

    for mut indices in groups {
        indices.sort_by_key(|&i| forecast[i].date);
        let values: Vec<f64> = indices.iter().map(|&i| forecast[i].forecast_units).collect();
        let smoothed = centered_rolling_mean(&values, window);
        for (&i, s) in indices.iter().zip(smoothed) {
            let record = &mut forecast[i];
            record.forecast_smooth = if record.sellable { s } else { 0.0 };
        }
    }

    debug!(series = series_count, window = window, "Smoothed forecast");
}
