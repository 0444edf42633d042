use serde::{Deserialize, Serialize};

use crate::{DemandError, Result};

/// How `sku_old → sku_new` mappings are followed when resolving identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainResolution {
    /// Look up the mapping once. A→B→C leaves rows tagged A at B.
    #[default]
    SingleHop,
    /// Follow mappings until no further edge exists (A→B→C resolves to C).
    FixedPoint,
}

/// What to do with history rows whose availability is blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingAvailabilityPolicy {
    /// Treat the SKU as fully available (availability = 1.0).
    #[default]
    AssumeFull,
    /// Drop the row before aggregation.
    Exclude,
}

/// Forecast run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    #[serde(default = "default_horizon_months")]
    pub horizon_months: u32,

    #[serde(default = "default_lookback_months")]
    pub lookback_months: u32,

    #[serde(default = "default_seasonality_floor")]
    pub seasonality_floor: f64,

    #[serde(default = "default_smoothing_window")]
    pub smoothing_window: usize,

    #[serde(default)]
    pub chain_resolution: ChainResolution,

    #[serde(default)]
    pub missing_availability: MissingAvailabilityPolicy,

    /// Emit keys that only appear before the lookback window, with a zero baseline.
    #[serde(default)]
    pub include_inactive_keys: bool,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_months: default_horizon_months(),
            lookback_months: default_lookback_months(),
            seasonality_floor: default_seasonality_floor(),
            smoothing_window: default_smoothing_window(),
            chain_resolution: ChainResolution::default(),
            missing_availability: MissingAvailabilityPolicy::default(),
            include_inactive_keys: false,
        }
    }
}

impl ForecastConfig {
    /// Parse a JSON document; absent fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: ForecastConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.horizon_months == 0 {
            return Err(DemandError::InvalidConfig(
                "horizon_months must be at least 1".into(),
            ));
        }
        if self.lookback_months == 0 {
            return Err(DemandError::InvalidConfig(
                "lookback_months must be at least 1".into(),
            ));
        }
        if !self.seasonality_floor.is_finite() || self.seasonality_floor < 0.0 {
            return Err(DemandError::InvalidConfig(format!(
                "seasonality_floor must be a non-negative number, got {}",
                self.seasonality_floor
            )));
        }
        if self.smoothing_window == 0 {
            return Err(DemandError::InvalidConfig(
                "smoothing_window must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn default_horizon_months() -> u32 {
    13
}
fn default_lookback_months() -> u32 {
    3
}
fn default_seasonality_floor() -> f64 {
    0.7
}
fn default_smoothing_window() -> usize {
    3
}
