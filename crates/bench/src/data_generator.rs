use chrono::NaiveDate;
use common::month::add_months;
use common::{SalesRecord, TransitionRecord, TransitionStatus};

/// A synthetic sales history with the transitions that apply to it.
#[derive(Debug, Clone)]
pub struct SalesFixture {
    pub name: String,
    pub history: Vec<SalesRecord>,
    pub transitions: Vec<TransitionRecord>,
    /// Number of history months.
    pub months: u32,
}

/// First month of every generated history.
pub fn start_month() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default()
}

/// Generate all standard fixtures across history lengths and SKU counts.
pub fn generate_all_fixtures() -> Vec<SalesFixture> {
    let mut fixtures = Vec::new();
    for &(months, skus) in &[(24, 5), (36, 20)] {
        fixtures.push(flat(months, skus));
        fixtures.push(seasonal(months, skus));
        fixtures.push(stockouts(months, skus));
        fixtures.push(growing(months, skus));
        fixtures.push(with_transitions(months, skus));
    }
    fixtures
}

/// Deterministic pseudo-random: simple LCG-based noise in [-amplitude, amplitude].
fn noise(seed: u64, n: usize, amplitude: f64) -> Vec<f64> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            // LCG parameters (Numerical Recipes)
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let frac = ((state >> 33) as f64) / (u32::MAX as f64); // 0..1
            (frac * 2.0 - 1.0) * amplitude
        })
        .collect()
}

const CATEGORIES: [&str; 3] = ["Fridges", "Ovens", "Washers"];
const CHANNELS: [&str; 2] = ["ecommerce", "store"];

fn sku_code(i: usize) -> String {
    format!("SKU-{i:04}")
}

/// One row per SKU and month; `units(sku, month)` and `availability(sku, month)`
/// give the cell values.
fn build(
    months: u32,
    skus: usize,
    units: impl Fn(usize, u32) -> f64,
    availability: impl Fn(usize, u32) -> Option<f64>,
) -> Vec<SalesRecord> {
    let start = start_month();
    let mut rows = Vec::with_capacity(skus * months as usize);
    for s in 0..skus {
        for m in 0..months {
            let Some(date) = add_months(start, m) else {
                continue;
            };
            rows.push(SalesRecord {
                sku: sku_code(s),
                channel: CHANNELS[s % CHANNELS.len()].to_string(),
                category: CATEGORIES[s % CATEGORIES.len()].to_string(),
                brand: if s % 2 == 0 { "Acme" } else { "Zenith" }.to_string(),
                date,
                units_sold: units(s, m).max(0.0),
                availability: availability(s, m),
            });
        }
    }
    rows
}

fn fixture(name: &str, months: u32, skus: usize, history: Vec<SalesRecord>) -> SalesFixture {
    SalesFixture {
        name: format!("{name}_{months}m_{skus}sku"),
        history,
        transitions: Vec::new(),
        months,
    }
}

fn level(sku: usize) -> f64 {
    50.0 + 25.0 * (sku % 4) as f64
}

pub fn flat(months: u32, skus: usize) -> SalesFixture {
    let n = noise(11, skus * months as usize, 5.0);
    let history = build(
        months,
        skus,
        |s, m| level(s) + n[s * months as usize + m as usize],
        |_, _| Some(1.0),
    );
    fixture("flat", months, skus, history)
}

/// Yearly cycle peaking in summer.
pub fn seasonal(months: u32, skus: usize) -> SalesFixture {
    let n = noise(23, skus * months as usize, 5.0);
    let history = build(
        months,
        skus,
        |s, m| {
            let phase = 2.0 * std::f64::consts::PI * (m % 12) as f64 / 12.0;
            level(s) * (1.0 - 0.4 * phase.cos()) + n[s * months as usize + m as usize]
        },
        |_, _| Some(1.0),
    );
    fixture("seasonal", months, skus, history)
}

/// Flat demand with periodic stock-outs and some blank availability cells.
pub fn stockouts(months: u32, skus: usize) -> SalesFixture {
    let history = build(
        months,
        skus,
        |s, m| {
            if (m as usize + s) % 7 == 0 {
                level(s) * 0.3
            } else {
                level(s)
            }
        },
        |s, m| match (m as usize + s) % 7 {
            0 => Some(0.3),
            3 => None,
            _ => Some(1.0),
        },
    );
    fixture("stockouts", months, skus, history)
}

/// Steady growth of 2% per month.
pub fn growing(months: u32, skus: usize) -> SalesFixture {
    let history = build(
        months,
        skus,
        |s, m| level(s) * 1.02_f64.powi(m as i32),
        |_, _| Some(1.0),
    );
    fixture("growing", months, skus, history)
}

/// Flat demand where every third SKU is succeeded by a new code launched in
/// the second forecast month.
pub fn with_transitions(months: u32, skus: usize) -> SalesFixture {
    let mut f = flat(months, skus);
    let launch = add_months(start_month(), months + 1);
    f.transitions = (0..skus)
        .step_by(3)
        .map(|s| TransitionRecord {
            sku_old: sku_code(s),
            sku_new: format!("{}-N", sku_code(s)),
            status: TransitionStatus::New,
            date_in: launch,
            date_out: None,
        })
        .collect();
    f.name = format!("transitions_{months}m_{skus}sku");
    f
}
