//! Demand forecast pipeline and the session layer around it.
//!
//! `run_forecast` turns the uploaded tables into a 13-month per-SKU forecast;
//! `ForecastSession` keeps the inputs and the pristine result together so
//! manual adjustments are always applied to a known-fresh forecast.

mod adjustment;
mod custom;
mod pipeline;
mod report;
mod session;

pub use adjustment::{apply_adjustments, AdjustmentFactors};
pub use custom::{custom_baseline_rows, enrich_custom_skus, ResolvedCustomSku};
pub use pipeline::{forecast_from_records, run_forecast, ForecastInput, ForecastRun};
pub use report::{
    forecast_vs_last_year, history_vs_last_year, monthly_forecast, monthly_history,
    HistoryFilter, MonthlyUnits, YearOverYear,
};
pub use session::{ForecastSession, Freshness};
