use common::{DemandError, ForecastConfig, ForecastRecord, Result};
use tracing::info;

use crate::adjustment::{apply_adjustments, AdjustmentFactors};
use crate::pipeline::{run_forecast, ForecastInput, ForecastRun};

/// Whether the session's forecast is straight out of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Pristine,
    Adjusted,
}

/// Raw inputs and their computed forecast, passed explicitly between the
/// pipeline and interactive adjustment steps.
///
/// Each session owns its tables and results; nothing is shared between
/// sessions.
#[derive(Debug, Clone)]
pub struct ForecastSession {
    input: ForecastInput,
    config: ForecastConfig,
    run: ForecastRun,
    freshness: Freshness,
}

impl ForecastSession {
    /// Run the pipeline on `input` and keep the result.
    pub fn new(input: ForecastInput, config: ForecastConfig) -> Result<Self> {
        let run = run_forecast(&input, &config)?;
        Ok(Self {
            input,
            config,
            run,
            freshness: Freshness::Pristine,
        })
    }

    pub fn input(&self) -> &ForecastInput {
        &self.input
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    pub fn run(&self) -> &ForecastRun {
        &self.run
    }

    pub fn forecast(&self) -> &[ForecastRecord] {
        &self.run.forecast
    }

    pub fn freshness(&self) -> Freshness {
        self.freshness
    }

    /// Adjusted copy of the pristine forecast; the session is unchanged.
    pub fn adjusted_view(&self, factors: &AdjustmentFactors) -> Result<Vec<ForecastRecord>> {
        if self.freshness != Freshness::Pristine {
            return Err(DemandError::StaleForecast);
        }
        Ok(apply_adjustments(&self.run.forecast, factors))
    }

    /// Apply factors in place. Fails if the forecast was already adjusted.
    pub fn adjust(&mut self, factors: &AdjustmentFactors) -> Result<()> {
        let adjusted = self.adjusted_view(factors)?;
        self.run.forecast = adjusted;
        self.freshness = Freshness::Adjusted;
        info!(rows = self.run.forecast.len(), "Applied manual adjustments");
        Ok(())
    }

    /// Recompute the forecast from the stored inputs, restoring a pristine state.
    pub fn regenerate(&mut self) -> Result<()> {
        self.run = run_forecast(&self.input, &self.config)?;
        self.freshness = Freshness::Pristine;
        Ok(())
    }

    /// Replace the configuration and recompute.
    pub fn reconfigure(&mut self, config: ForecastConfig) -> Result<()> {
        let run = run_forecast(&self.input, &config)?;
        self.config = config;
        self.run = run;
        self.freshness = Freshness::Pristine;
        Ok(())
    }
}
