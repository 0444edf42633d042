mod demand;
mod identity;

pub use demand::{normalize_demand, DemandObservation, KeyMeta, NormalizedHistory};
pub use identity::{resolve_history, ResolvedSale, SkuResolver};
