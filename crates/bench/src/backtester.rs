use std::collections::BTreeMap;

use chrono::NaiveDate;
use common::metrics::{mae, wape};
use common::month::add_months;
use common::ForecastConfig;
use predictor::{forecast_from_records, monthly_forecast, monthly_history, HistoryFilter};
use tracing::{debug, warn};

use crate::data_generator::{start_month, SalesFixture};

/// Months held out from the end of every fixture.
pub const HOLDOUT_MONTHS: u32 = 6;

/// Result of one configuration on one fixture.
#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub fixture_name: String,
    pub config_name: String,
    pub mae: f64,
    pub wape: f64,
    /// Total forecast units per held-out month.
    pub forecast: Vec<f64>,
    /// Total units sold per held-out month.
    pub actual: Vec<f64>,
}

/// Configurations compared by the backtest.
pub fn configurations() -> Vec<(&'static str, ForecastConfig)> {
    let base = ForecastConfig {
        horizon_months: HOLDOUT_MONTHS,
        ..ForecastConfig::default()
    };
    vec![
        ("default", base.clone()),
        (
            "lookback_6",
            ForecastConfig {
                lookback_months: 6,
                ..base.clone()
            },
        ),
        (
            "no_floor",
            ForecastConfig {
                seasonality_floor: 0.0,
                ..base.clone()
            },
        ),
        (
            "unsmoothed",
            ForecastConfig {
                smoothing_window: 1,
                ..base
            },
        ),
    ]
}

/// Train on all but the last `HOLDOUT_MONTHS` and score the monthly totals.
pub fn run_backtest(fixture: &SalesFixture) -> Vec<BacktestResult> {
    let Some(cutoff) = fixture
        .months
        .checked_sub(HOLDOUT_MONTHS)
        .and_then(|m| add_months(start_month(), m))
    else {
        warn!(fixture = %fixture.name, "Fixture shorter than the hold-out period");
        return Vec::new();
    };

    let (train, test): (Vec<_>, Vec<_>) = fixture
        .history
        .iter()
        .cloned()
        .partition(|r| r.date < cutoff);

    let months: Vec<NaiveDate> = (0..HOLDOUT_MONTHS)
        .filter_map(|i| add_months(cutoff, i))
        .collect();
    let actual = align(
        &months,
        monthly_history(&test, &HistoryFilter::default())
            .into_iter()
            .map(|m| (m.month, m.units)),
    );

    let mut results = Vec::new();
    for (name, config) in configurations() {
        let run = match forecast_from_records(&train, &fixture.transitions, &[], &config) {
            Ok(run) => run,
            Err(e) => {
                warn!(config = name, fixture = %fixture.name, error = %e, "Backtest run failed");
                continue;
            }
        };
        let forecast = align(
            &months,
            monthly_forecast(&run.forecast, &HistoryFilter::default())
                .into_iter()
                .map(|m| (m.month, m.units)),
        );
        debug!(config = name, fixture = %fixture.name, "Backtest complete");

        results.push(BacktestResult {
            fixture_name: fixture.name.clone(),
            config_name: name.to_string(),
            mae: mae(&forecast, &actual),
            wape: wape(&forecast, &actual),
            forecast,
            actual: actual.clone(),
        });
    }
    results
}

/// Values for `months` in order, zero where a month is absent.
fn align(months: &[NaiveDate], values: impl Iterator<Item = (NaiveDate, f64)>) -> Vec<f64> {
    let by_month: BTreeMap<NaiveDate, f64> = values.collect();
    months
        .iter()
        .map(|m| by_month.get(m).copied().unwrap_or(0.0))
        .collect()
}

/// Run backtests on all provided fixtures.
pub fn run_all_backtests(fixtures: &[SalesFixture]) -> Vec<BacktestResult> {
    fixtures.iter().flat_map(run_backtest).collect()
}
