/// Compute Mean Absolute Error.
pub fn mae(forecast: &[f64], actual: &[f64]) -> f64 {
    assert_eq!(forecast.len(), actual.len());
    if forecast.is_empty() {
        return 0.0;
    }
    forecast
        .iter()
        .zip(actual)
        .map(|(f, a)| (f - a).abs())
        .sum::<f64>()
        / forecast.len() as f64
}

/// Weighted Absolute Percentage Error, in percent.
///
/// Sum of absolute errors over sum of absolute actuals. Infinite when the
/// actuals sum to zero.
pub fn wape(forecast: &[f64], actual: &[f64]) -> f64 {
    assert_eq!(forecast.len(), actual.len());
    let denom: f64 = actual.iter().map(|a| a.abs()).sum();
    if denom < 1e-15 {
        return f64::INFINITY;
    }
    let num: f64 = forecast
        .iter()
        .zip(actual)
        .map(|(f, a)| (f - a).abs())
        .sum();
    num / denom * 100.0
}

/// Percentage change from `previous` to `current`; `None` when `previous` is zero.
pub fn pct_change(current: f64, previous: f64) -> Option<f64> {
    if previous.abs() < 1e-15 {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}
