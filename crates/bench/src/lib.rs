//! Synthetic sales fixtures and hold-out backtests for the forecast pipeline.

pub mod backtester;
pub mod data_generator;
pub mod reporter;
