use std::collections::BTreeMap;

use chrono::NaiveDate;
use common::{ForecastRecord, TransitionRecord};
use tracing::debug;

/// Months in which a SKU may be sold, bounded by launch and discontinuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionWindow {
    pub date_in: Option<NaiveDate>,
    pub date_out: Option<NaiveDate>,
}

impl TransitionWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.date_in.map_or(true, |start| date >= start)
            && self.date_out.map_or(true, |end| date <= end)
    }
}

/// Zero forecast months that fall outside any transition window of `sku_new`.
///
/// A record is matched on both its SKU and its virtual SKU. When a SKU has
/// several windows every one of them must contain the month. Zeroed records
/// are marked not sellable so the smoother keeps them at zero. Returns the
/// number of records zeroed.
pub fn enforce_windows(
    forecast: &mut [ForecastRecord],
    transitions: &[TransitionRecord],
) -> usize {
    let mut windows: BTreeMap<&str, Vec<TransitionWindow>> = BTreeMap::new();
    for t in transitions
        .iter()
        .filter(|t| t.date_in.is_some() || t.date_out.is_some())
    {
        windows
            .entry(t.sku_new.as_str())
            .or_default()
            .push(TransitionWindow {
                date_in: t.date_in,
                date_out: t.date_out,
            });
    }
    if windows.is_empty() {
        return 0;
    }

    let mut zeroed = 0;
    for record in forecast.iter_mut() {
        let mut skus = vec![record.sku.as_str()];
        if record.sku_virtual != record.sku {
            skus.push(record.sku_virtual.as_str());
        }
        let outside = skus
            .iter()
            .filter_map(|sku| windows.get(sku))
            .flatten()
            .any(|w| !w.contains(record.date));
        if outside {
            record.forecast_units = 0.0;
            record.sellable = false;
            zeroed += 1;
        }
    }

    debug!(skus = windows.len(), zeroed = zeroed, "Applied transition windows");
    zeroed
}
