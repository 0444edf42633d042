use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One month of sales for a SKU on a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub sku: String,
    pub channel: String,
    pub category: String,
    pub brand: String,
    /// First day of the sales month.
    pub date: NaiveDate,
    pub units_sold: f64,
    /// Fraction of the month the SKU was in stock. `None` when the source left it blank.
    pub availability: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransitionStatus {
    Old,
    New,
}

impl TransitionStatus {
    /// Case-insensitive parse of `OLD` / `NEW`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OLD" => Some(TransitionStatus::Old),
            "NEW" => Some(TransitionStatus::New),
            _ => None,
        }
    }
}

impl fmt::Display for TransitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionStatus::Old => write!(f, "OLD"),
            TransitionStatus::New => write!(f, "NEW"),
        }
    }
}

/// Lifecycle edge: `sku_old` is superseded by `sku_new`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub sku_old: String,
    pub sku_new: String,
    pub status: TransitionStatus,
    /// First month `sku_new` is sellable.
    pub date_in: Option<NaiveDate>,
    /// Last month the SKU is sellable.
    pub date_out: Option<NaiveDate>,
}

/// A SKU requested for forecasting that may have no sales history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomSku {
    pub sku: String,
    pub category: Option<String>,
    pub brand: Option<String>,
}

/// Aggregation key: virtual SKU on a channel.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DemandKey {
    pub sku_virtual: String,
    pub channel: String,
}

impl DemandKey {
    pub fn new(sku_virtual: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            sku_virtual: sku_virtual.into(),
            channel: channel.into(),
        }
    }
}

impl fmt::Display for DemandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.sku_virtual, self.channel)
    }
}

/// One future month of demand for a SKU on a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    #[serde(rename = "ds")]
    pub date: NaiveDate,
    pub sku: String,
    pub sku_virtual: String,
    pub channel: String,
    pub category: String,
    pub brand: String,
    pub forecast_units: f64,
    pub forecast_smooth: f64,
    /// Cleared when the month falls outside the SKU's transition window.
    #[serde(skip)]
    pub sellable: bool,
}

impl ForecastRecord {
    pub fn key(&self) -> DemandKey {
        DemandKey::new(self.sku_virtual.clone(), self.channel.clone())
    }
}

/// Per-category, per-calendar-month seasonal index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySeasonalIndex {
    pub category: String,
    /// 1 = January.
    pub calendar_month: u32,
    pub factor: f64,
}
