use std::fmt;

use thiserror::Error;

/// Pipeline stage in which a fatal error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Ingest,
    Identity,
    Normalize,
    Baseline,
    Seasonality,
    Projection,
    Window,
    Smoothing,
    CustomSkus,
    Session,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Ingest => "ingest",
            Stage::Identity => "identity",
            Stage::Normalize => "normalize",
            Stage::Baseline => "baseline",
            Stage::Seasonality => "seasonality",
            Stage::Projection => "projection",
            Stage::Window => "window",
            Stage::Smoothing => "smoothing",
            Stage::CustomSkus => "custom_skus",
            Stage::Session => "session",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum DemandError {
    #[error("[{stage}] table '{table}' is missing required column '{column}'")]
    MissingColumn {
        stage: Stage,
        table: &'static str,
        column: &'static str,
    },

    #[error("[{stage}] no usable history rows: {reason}")]
    EmptyHistory { stage: Stage, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("forecast has already been adjusted; regenerate before applying new factors")]
    StaleForecast,

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl DemandError {
    /// Stage that aborted the run, when the error is tied to one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            DemandError::MissingColumn { stage, .. } | DemandError::EmptyHistory { stage, .. } => {
                Some(*stage)
            }
            DemandError::StaleForecast => Some(Stage::Session),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DemandError>;
