mod baseline;
mod seasonality;

pub use baseline::{
    category_share_baseline, estimate_baselines, BaselineTable, CategoryBaseline, SkuBaseline,
};
pub use seasonality::{estimate_seasonality, SeasonalityTable};
