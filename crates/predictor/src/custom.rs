use std::collections::BTreeMap;

use analyzer::BaselineTable;
use common::{CustomSku, DemandKey, RunWarnings, SalesRecord};
use normalize::SkuResolver;
use projector::BaselineRow;
use tracing::{debug, warn};

/// A custom SKU with its category and brand settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCustomSku {
    pub sku: String,
    pub category: String,
    pub brand: String,
}

/// Fill in missing category/brand of requested SKUs from existing history.
///
/// A SKU is matched against history rows by its own code or by the virtual
/// SKU of the row; the most recent match wins. SKUs whose category is neither
/// given nor found are reported in `unresolvable_skus`.
pub fn enrich_custom_skus(
    custom: &[CustomSku],
    history: &[SalesRecord],
    resolver: &SkuResolver,
) -> (Vec<ResolvedCustomSku>, RunWarnings) {
    let mut warnings = RunWarnings::default();
    let mut resolved = Vec::with_capacity(custom.len());

    for c in custom {
        let latest = history
            .iter()
            .filter(|r| r.sku == c.sku || resolver.resolve(&r.sku) == c.sku)
            .fold(None::<&SalesRecord>, |best, r| match best {
                Some(b) if b.date >= r.date => Some(b),
                _ => Some(r),
            });

        let category = c
            .category
            .clone()
            .or_else(|| latest.map(|r| r.category.clone()));
        let Some(category) = category else {
            warnings.unresolvable_skus.insert(c.sku.clone());
            continue;
        };
        let brand = c
            .brand
            .clone()
            .or_else(|| latest.map(|r| r.brand.clone()))
            .unwrap_or_default();

        resolved.push(ResolvedCustomSku {
            sku: c.sku.clone(),
            category,
            brand,
        });
    }

    if !warnings.unresolvable_skus.is_empty() {
        warn!(
            skus = ?warnings.unresolvable_skus,
            "Custom SKUs without a resolvable category"
        );
    }
    (resolved, warnings)
}

/// Baseline rows for custom SKUs, borrowed from their category.
///
/// For every channel on which the category has recent demand, the SKU gets
/// the mean baseline of that category's keys on the channel. SKUs already
/// forecast from history are skipped, and SKUs whose category has no recent
/// keys are reported as unresolvable.
pub fn custom_baseline_rows(
    custom: &[ResolvedCustomSku],
    baselines: &BaselineTable,
    resolver: &SkuResolver,
) -> (Vec<BaselineRow>, RunWarnings) {
    let mut warnings = RunWarnings::default();

    // category -> channel -> (sum, count)
    let mut by_category: BTreeMap<&str, BTreeMap<&str, (f64, usize)>> = BTreeMap::new();
    for row in &baselines.rows {
        let entry = by_category
            .entry(row.category.as_str())
            .or_default()
            .entry(row.key.channel.as_str())
            .or_insert((0.0, 0));
        entry.0 += row.baseline;
        entry.1 += 1;
    }

    let mut rows = Vec::new();
    let mut seen: Vec<&str> = Vec::new();
    for c in custom {
        let sku_virtual = resolver.resolve(&c.sku);
        let has_history = baselines
            .rows
            .iter()
            .any(|b| b.key.sku_virtual == sku_virtual);
        if has_history || seen.contains(&c.sku.as_str()) {
            warnings.duplicate_custom_skus.insert(c.sku.clone());
            continue;
        }
        seen.push(c.sku.as_str());

        let Some(channels) = by_category.get(c.category.as_str()) else {
            warnings.unresolvable_skus.insert(c.sku.clone());
            continue;
        };
        for (channel, (sum, n)) in channels {
            rows.push(BaselineRow {
                sku: c.sku.clone(),
                key: DemandKey::new(sku_virtual, *channel),
                category: c.category.clone(),
                brand: c.brand.clone(),
                baseline: sum / *n as f64,
            });
        }
    }

    debug!(
        requested = custom.len(),
        rows = rows.len(),
        "Built custom SKU baselines"
    );
    (rows, warnings)
}

#[cfg(test)]
mod tests;
