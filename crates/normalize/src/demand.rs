use std::collections::BTreeMap;

use chrono::NaiveDate;
use common::{DemandError, DemandKey, MissingAvailabilityPolicy, Result, RunWarnings, Stage};
use tracing::{debug, warn};

use crate::identity::ResolvedSale;

/// Availability-weighted demand of one key in one month.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandObservation {
    pub key: DemandKey,
    pub category: String,
    pub date: NaiveDate,
    pub weighted_sales: f64,
}

/// Descriptive attributes of a key, taken from its most recent history row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMeta {
    pub category: String,
    pub brand: String,
    pub last_seen: NaiveDate,
}

/// History reduced to one weighted observation per key, category and month.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedHistory {
    /// Sorted by key, category, then date.
    pub observations: Vec<DemandObservation>,
    pub keys: BTreeMap<DemandKey, KeyMeta>,
    /// Latest month present in the history.
    pub last_date: NaiveDate,
}

/// Weight units by availability and aggregate to `(sku_virtual, channel)`.
///
/// `weighted_sales = units_sold × availability`, with availability clamped to
/// [0, 1]. Rows for the same key and month are summed, so an old SKU and its
/// replacement selling in the same month count as one observation.
pub fn normalize_demand(
    resolved: &[ResolvedSale<'_>],
    policy: MissingAvailabilityPolicy,
) -> Result<(NormalizedHistory, RunWarnings)> {
    let mut warnings = RunWarnings::default();
    let mut totals: BTreeMap<(DemandKey, String, NaiveDate), f64> = BTreeMap::new();
    let mut keys: BTreeMap<DemandKey, KeyMeta> = BTreeMap::new();

    for sale in resolved {
        let record = sale.record;
        let availability = match record.availability {
            Some(a) => a.clamp(0.0, 1.0),
            None => {
                warnings.missing_availability += 1;
                match policy {
                    MissingAvailabilityPolicy::AssumeFull => 1.0,
                    MissingAvailabilityPolicy::Exclude => continue,
                }
            }
        };
        let weighted = record.units_sold * availability;
        let key = DemandKey::new(sale.sku_virtual, record.channel.as_str());

        *totals
            .entry((key.clone(), record.category.clone(), record.date))
            .or_insert(0.0) += weighted;

        // Strictly newer rows replace the metadata; ties keep the first row seen.
        match keys.get_mut(&key) {
            Some(meta) if record.date > meta.last_seen => {
                meta.category = record.category.clone();
                meta.brand = record.brand.clone();
                meta.last_seen = record.date;
            }
            Some(_) => {}
            None => {
                keys.insert(
                    key,
                    KeyMeta {
                        category: record.category.clone(),
                        brand: record.brand.clone(),
                        last_seen: record.date,
                    },
                );
            }
        }
    }

    if warnings.missing_availability > 0 {
        warn!(
            rows = warnings.missing_availability,
            policy = ?policy,
            "History rows without availability"
        );
    }

    if keys.is_empty() {
        return Err(DemandError::EmptyHistory {
            stage: Stage::Normalize,
            reason: "no rows left after availability policy".into(),
        });
    }
    // Taken over every row, including those the availability policy dropped.
    let last_date = resolved
        .iter()
        .map(|sale| sale.record.date)
        .max()
        .ok_or_else(|| DemandError::EmptyHistory {
            stage: Stage::Normalize,
            reason: "history table has no rows".into(),
        })?;

    let observations: Vec<DemandObservation> = totals
        .into_iter()
        .map(|((key, category, date), weighted_sales)| DemandObservation {
            key,
            category,
            date,
            weighted_sales,
        })
        .collect();

    debug!(
        keys = keys.len(),
        observations = observations.len(),
        last_date = %last_date,
        "Normalized demand"
    );

    Ok((
        NormalizedHistory {
            observations,
            keys,
            last_date,
        },
        warnings,
    ))
}

#[cfg(test)]
mod tests;
