use chrono::{NaiveDate, NaiveDateTime};
use common::month::month_start;
use common::{
    CustomSku, DemandError, Result, RunWarnings, SalesRecord, Stage, TransitionRecord,
    TransitionStatus,
};
use tracing::{debug, warn};

use crate::schema::{CUSTOM_SKU_SCHEMA, HISTORY_SCHEMA, TRANSITION_SCHEMA};
use crate::table::RawTable;

/// Typed rows plus the row-level problems met while parsing them.
#[derive(Debug, Clone)]
pub struct Ingested<T> {
    pub records: Vec<T>,
    pub warnings: RunWarnings,
}

impl<T> Default for Ingested<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            warnings: RunWarnings::default(),
        }
    }
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a date cell and snap it to the first of its month.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let date = DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
        // Bare year-month, e.g. "2024-06"
        .or_else(|| NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").ok())?;
    Some(month_start(date))
}

fn parse_number(s: Option<&str>) -> Option<f64> {
    s.and_then(|v| v.parse::<f64>().ok()).filter(|v| v.is_finite())
}

/// Parse the historical sales table.
///
/// Rows with a missing or unparsable `ds` or `y` are dropped and counted.
pub fn parse_history(table: &RawTable) -> Result<Ingested<SalesRecord>> {
    const SKU: usize = 0;
    const CHANNEL: usize = 1;
    const CATEGORY: usize = 2;
    const BRAND: usize = 3;
    const DS: usize = 4;
    const Y: usize = 5;
    const AVAILABILITY: usize = 6;

    let cols = HISTORY_SCHEMA.resolve(&table.headers)?;
    let mut out = Ingested::default();

    for row in &table.rows {
        let Some(date) = cols.cell(row, DS).and_then(parse_date) else {
            out.warnings.unparsable_dates += 1;
            continue;
        };
        let Some(units_sold) = parse_number(cols.cell(row, Y)) else {
            out.warnings.missing_units += 1;
            continue;
        };
        let text = |c: usize| cols.cell(row, c).unwrap_or_default().to_string();

        out.records.push(SalesRecord {
            sku: text(SKU),
            channel: text(CHANNEL),
            category: text(CATEGORY),
            brand: text(BRAND),
            date,
            units_sold,
            availability: parse_number(cols.cell(row, AVAILABILITY)),
        });
    }

    if out.warnings.unparsable_dates > 0 || out.warnings.missing_units > 0 {
        warn!(
            unparsable_dates = out.warnings.unparsable_dates,
            missing_units = out.warnings.missing_units,
            "Dropped history rows"
        );
    }
    if out.records.is_empty() {
        return Err(DemandError::EmptyHistory {
            stage: Stage::Ingest,
            reason: format!("none of {} rows had a valid ds and y", table.len()),
        });
    }

    debug!(rows = out.records.len(), "Parsed history table");
    Ok(out)
}

/// Parse the SKU transition table. Blank `date_in` / `date_out` become `None`.
pub fn parse_transitions(table: &RawTable) -> Result<Ingested<TransitionRecord>> {
    const SKU_OLD: usize = 0;
    const SKU_NEW: usize = 1;
    const STATUS: usize = 2;
    const DATE_IN: usize = 3;
    const DATE_OUT: usize = 4;

    let cols = TRANSITION_SCHEMA.resolve(&table.headers)?;
    let mut out = Ingested::default();

    for row in &table.rows {
        let parsed = (|| {
            let sku_old = cols.cell(row, SKU_OLD)?;
            let sku_new = cols.cell(row, SKU_NEW)?;
            let status = cols.cell(row, STATUS).and_then(TransitionStatus::parse)?;
            Some(TransitionRecord {
                sku_old: sku_old.to_string(),
                sku_new: sku_new.to_string(),
                status,
                date_in: cols.cell(row, DATE_IN).and_then(parse_date),
                date_out: cols.cell(row, DATE_OUT).and_then(parse_date),
            })
        })();

        match parsed {
            Some(record) => out.records.push(record),
            None => out.warnings.invalid_transition_rows += 1,
        }
    }

    if out.warnings.invalid_transition_rows > 0 {
        warn!(
            ignored = out.warnings.invalid_transition_rows,
            "Ignored transition rows with a blank SKU or unknown status"
        );
    }
    debug!(rows = out.records.len(), "Parsed transition table");
    Ok(out)
}

/// Parse the optional custom SKU list. Blank SKUs are skipped.
pub fn parse_custom_skus(table: &RawTable) -> Result<Ingested<CustomSku>> {
    const SKU: usize = 0;
    const CATEGORY: usize = 1;
    const BRAND: usize = 2;

    let cols = CUSTOM_SKU_SCHEMA.resolve(&table.headers)?;
    let records = table
        .rows
        .iter()
        .filter_map(|row| {
            Some(CustomSku {
                sku: cols.cell(row, SKU)?.to_string(),
                category: cols.cell(row, CATEGORY).map(str::to_string),
                brand: cols.cell(row, BRAND).map(str::to_string),
            })
        })
        .collect();

    Ok(Ingested {
        records,
        warnings: RunWarnings::default(),
    })
}
