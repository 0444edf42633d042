use analyzer::{estimate_baselines, estimate_seasonality, BaselineTable};
use chrono::NaiveDate;
use common::{
    CategorySeasonalIndex, CustomSku, DemandError, ForecastConfig, ForecastRecord, Result,
    RunWarnings, SalesRecord, Stage, TransitionRecord,
};
use ingest::{parse_custom_skus, parse_history, parse_transitions, RawTable};
use normalize::{normalize_demand, resolve_history, SkuResolver};
use projector::{enforce_windows, project, smooth_forecast, BaselineRow};
use serde::Serialize;
use tracing::{info, warn};

use crate::custom::{custom_baseline_rows, enrich_custom_skus};

/// Tables supplied by the presentation shell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForecastInput {
    pub history: RawTable,
    pub transitions: RawTable,
    /// Optional list of SKUs to forecast without history.
    pub custom_skus: Option<RawTable>,
}

/// Full result of one forecast run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRun {
    /// One row per SKU, channel and future month.
    pub forecast: Vec<ForecastRecord>,
    pub seasonality: Vec<CategorySeasonalIndex>,
    pub baselines: BaselineTable,
    /// Latest month of the history the forecast was built from.
    pub last_date: NaiveDate,
    pub warnings: RunWarnings,
}

/// Main entry point: validate and parse the raw tables, then forecast.
pub fn run_forecast(input: &ForecastInput, config: &ForecastConfig) -> Result<ForecastRun> {
    let history = parse_history(&input.history)?;
    let transitions = parse_transitions(&input.transitions)?;
    let custom = input
        .custom_skus
        .as_ref()
        .map(parse_custom_skus)
        .transpose()?
        .unwrap_or_default();

    let mut run = forecast_from_records(
        &history.records,
        &transitions.records,
        &custom.records,
        config,
    )?;

    let mut warnings = history.warnings;
    warnings.merge(transitions.warnings);
    warnings.merge(custom.warnings);
    warnings.merge(run.warnings);
    run.warnings = warnings;
    Ok(run)
}

/// Forecast from already-typed records.
///
/// Pipeline: resolve identity → weight demand → baselines + seasonality →
/// project → transition windows → smooth.
pub fn forecast_from_records(
    history: &[SalesRecord],
    transitions: &[TransitionRecord],
    custom: &[CustomSku],
    config: &ForecastConfig,
) -> Result<ForecastRun> {
    let start = std::time::Instant::now();
    config.validate()?;

    if history.is_empty() {
        return Err(DemandError::EmptyHistory {
            stage: Stage::Normalize,
            reason: "history table has no rows".into(),
        });
    }

    info!(
        history_rows = history.len(),
        transitions = transitions.len(),
        custom_skus = custom.len(),
        horizon_months = config.horizon_months,
        "Starting forecast pipeline"
    );

    let mut warnings = RunWarnings::default();

    // Step 1: Virtual SKU identity
    let (resolver, w) = SkuResolver::from_transitions(transitions, config.chain_resolution);
    warnings.merge(w);
    let resolved = resolve_history(history, &resolver);

    // Step 2: Availability-weighted demand per (sku_virtual, channel)
    let (normalized, w) = normalize_demand(&resolved, config.missing_availability)?;
    warnings.merge(w);

    // Step 3: Share-of-category baselines
    let (baselines, w) = estimate_baselines(
        &normalized,
        config.lookback_months,
        config.include_inactive_keys,
    );
    warnings.merge(w);

    // Step 4: Category seasonality
    let seasonality = estimate_seasonality(&normalized, config.seasonality_floor);

    let mut rows: Vec<BaselineRow> = baselines.rows.iter().map(BaselineRow::from).collect();
    if !custom.is_empty() {
        let (enriched, w) = enrich_custom_skus(custom, history, &resolver);
        warnings.merge(w);
        let (custom_rows, w) = custom_baseline_rows(&enriched, &baselines, &resolver);
        warnings.merge(w);
        rows.extend(custom_rows);
    }

    // Step 5: Project
    let (mut forecast, w) = project(
        &rows,
        &seasonality,
        normalized.last_date,
        config.horizon_months,
    );
    warnings.merge(w);

    // Step 6: Launch / discontinuation windows
    let zeroed = enforce_windows(&mut forecast, transitions);

    // Step 7: Smooth
    smooth_forecast(&mut forecast, config.smoothing_window);

    for message in warnings.messages() {
        warn!("{message}");
    }
    info!(
        rows = forecast.len(),
        series = rows.len(),
        zeroed = zeroed,
        last_date = %normalized.last_date,
        time = format!("{:.3}s", start.elapsed().as_secs_f64()),
        "Forecast pipeline complete"
    );

    Ok(ForecastRun {
        forecast,
        seasonality: seasonality.indices(),
        baselines,
        last_date: normalized.last_date,
        warnings,
    })
}
