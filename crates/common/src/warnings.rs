use std::collections::BTreeSet;

use serde::Serialize;

/// Non-fatal data-quality conditions collected over one forecast run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunWarnings {
    /// History rows dropped because `ds` was missing or unparsable.
    pub unparsable_dates: usize,
    /// History rows dropped because `y` was missing or unparsable.
    pub missing_units: usize,
    /// History rows with a blank availability (defaulted or excluded per policy).
    pub missing_availability: usize,
    /// Transition rows dropped for an unknown status or blank SKU.
    pub invalid_transition_rows: usize,
    /// `sku_old` values mapped by more than one NEW transition; first mapping kept.
    pub duplicate_transitions: BTreeSet<String>,
    /// SKUs whose transition chain loops back on itself.
    pub transition_cycles: BTreeSet<String>,
    /// Categories whose recent weighted demand summed to zero.
    pub empty_category_baselines: BTreeSet<String>,
    /// Projection lookups with no observed seasonality for the category/month.
    pub seasonality_fallbacks: usize,
    /// Custom SKUs whose category could not be determined.
    pub unresolvable_skus: BTreeSet<String>,
    /// Custom SKUs skipped because history already forecasts them.
    pub duplicate_custom_skus: BTreeSet<String>,
}

impl RunWarnings {
    pub fn is_empty(&self) -> bool {
        self.messages().is_empty()
    }

    /// Fold another stage's warnings into this one.
    pub fn merge(&mut self, other: RunWarnings) {
        self.unparsable_dates += other.unparsable_dates;
        self.missing_units += other.missing_units;
        self.missing_availability += other.missing_availability;
        self.invalid_transition_rows += other.invalid_transition_rows;
        self.duplicate_transitions.extend(other.duplicate_transitions);
        self.transition_cycles.extend(other.transition_cycles);
        self.empty_category_baselines
            .extend(other.empty_category_baselines);
        self.seasonality_fallbacks += other.seasonality_fallbacks;
        self.unresolvable_skus.extend(other.unresolvable_skus);
        self.duplicate_custom_skus.extend(other.duplicate_custom_skus);
    }

    /// Human-readable summary lines, one per non-empty condition.
    pub fn messages(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.unparsable_dates > 0 {
            out.push(format!(
                "{} rows dropped for unparsable dates",
                self.unparsable_dates
            ));
        }
        if self.missing_units > 0 {
            out.push(format!(
                "{} rows dropped for missing units",
                self.missing_units
            ));
        }
        if self.missing_availability > 0 {
            out.push(format!(
                "{} rows had no availability",
                self.missing_availability
            ));
        }
        if self.invalid_transition_rows > 0 {
            out.push(format!(
                "{} transition rows ignored",
                self.invalid_transition_rows
            ));
        }
        if !self.duplicate_transitions.is_empty() {
            out.push(format!(
                "{} SKUs had conflicting NEW transitions: {}",
                self.duplicate_transitions.len(),
                join(&self.duplicate_transitions)
            ));
        }
        if !self.transition_cycles.is_empty() {
            out.push(format!(
                "{} SKUs sit on a transition cycle: {}",
                self.transition_cycles.len(),
                join(&self.transition_cycles)
            ));
        }
        if !self.empty_category_baselines.is_empty() {
            out.push(format!(
                "{} categories had zero baseline: {}",
                self.empty_category_baselines.len(),
                join(&self.empty_category_baselines)
            ));
        }
        if self.seasonality_fallbacks > 0 {
            out.push(format!(
                "{} forecast months used the seasonality floor for lack of data",
                self.seasonality_fallbacks
            ));
        }
        if !self.unresolvable_skus.is_empty() {
            out.push(format!(
                "{} custom SKUs could not be resolved to a category with recent demand: {}",
                self.unresolvable_skus.len(),
                join(&self.unresolvable_skus)
            ));
        }
        if !self.duplicate_custom_skus.is_empty() {
            out.push(format!(
                "{} custom SKUs already have history: {}",
                self.duplicate_custom_skus.len(),
                join(&self.duplicate_custom_skus)
            ));
        }
        out
    }
}

fn join(set: &BTreeSet<String>) -> String {
    set.iter().cloned().collect::<Vec<_>>().join(", ")
}
