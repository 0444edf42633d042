use super::*;
use normalize::{DemandObservation, KeyMeta};

fn d(y: i32, m: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, 1).unwrap()
}

/// Build a normalized history from `(sku, category, month, weighted)` tuples on channel "web".
fn history(rows: &[(&str, &str, NaiveDate, f64)]) -> NormalizedHistory {
    let mut observations: Vec<DemandObservation> = rows
        .iter()
        .map(|(sku, category, date, w)| DemandObservation {
            key: DemandKey::new(*sku, "web"),
            category: category.to_string(),
            date: *date,
            weighted_sales: *w,
        })
        .collect();
    observations.sort_by(|a, b| (&a.key, &a.category, a.date).cmp(&(&b.key, &b.category, b.date)));

    let mut keys = BTreeMap::new();
    for obs in &observations {
        let meta = keys.entry(obs.key.clone()).or_insert(KeyMeta {
            category: obs.category.clone(),
            brand: "Acme".into(),
            last_seen: obs.date,
        });
        if obs.date > meta.last_seen {
            meta.last_seen = obs.date;
        }
    }
    let last_date = observations.iter().map(|o| o.date).max().unwrap();

    NormalizedHistory {
        observations,
        keys,
        last_date,
    }
}

#[test]
fn test_share_of_category_scaling() {
    // 30 and 70 of a 100 total against a run-rate of 50
    let a = category_share_baseline(30.0, 100.0, 50.0).unwrap();
    let b = category_share_baseline(70.0, 100.0, 50.0).unwrap();
    assert!((a - 15.0).abs() < 1e-12, "got {a}");
    assert!((b - 35.0).abs() < 1e-12, "got {b}");
    assert_eq!(category_share_baseline(10.0, 0.0, 50.0), None);
    assert_eq!(category_share_baseline(10.0, f64::NAN, 50.0), None);
}

#[test]
fn test_window_holds_three_months() {
    // Months 1..=6; only 4, 5, 6 fall in the window ending at June.
    let rows: Vec<_> = (1..=6)
        .map(|m| ("A", "Fridges", d(2024, m), m as f64 * 10.0))
        .collect();
    let (table, warnings) = estimate_baselines(&history(&rows), 3, false);

    assert!(warnings.is_empty());
    let a = &table.rows[0];
    assert_eq!(a.avg_weighted_sales, 50.0);
    let cat = &table.categories["Fridges"];
    assert_eq!(cat.total_category_weighted, 50.0);
    assert_eq!(cat.monthly_run_rate, 50.0);
    assert_eq!(a.baseline, 50.0);
}

#[test]
fn test_two_skus_split_category_run_rate() {
    let rows = vec![
        ("A", "Fridges", d(2024, 1), 30.0),
        ("A", "Fridges", d(2024, 2), 30.0),
        ("A", "Fridges", d(2024, 3), 30.0),
        ("B", "Fridges", d(2024, 1), 70.0),
        ("B", "Fridges", d(2024, 2), 70.0),
        ("B", "Fridges", d(2024, 3), 70.0),
    ];
    let (table, _) = estimate_baselines(&history(&rows), 3, false);

    let a = table.get(&DemandKey::new("A", "web")).unwrap();
    let b = table.get(&DemandKey::new("B", "web")).unwrap();
    assert!((a.baseline - 30.0).abs() < 1e-9);
    assert!((b.baseline - 70.0).abs() < 1e-9);
}

#[test]
fn test_partial_activity_averages_observed_months() {
    // B only sold in the last month: its average is that month alone,
    // while the run-rate still divides the category sum by three.
    let rows = vec![
        ("A", "Fridges", d(2024, 1), 60.0),
        ("A", "Fridges", d(2024, 2), 60.0),
        ("A", "Fridges", d(2024, 3), 60.0),
        ("B", "Fridges", d(2024, 3), 30.0),
    ];
    let (table, _) = estimate_baselines(&history(&rows), 3, false);

    let cat = &table.categories["Fridges"];
    assert_eq!(cat.total_category_weighted, 90.0);
    assert_eq!(cat.monthly_run_rate, 70.0);

    let a = table.get(&DemandKey::new("A", "web")).unwrap();
    let b = table.get(&DemandKey::new("B", "web")).unwrap();
    assert!((a.baseline - 60.0 / 90.0 * 70.0).abs() < 1e-9);
    assert!((b.baseline - 30.0 / 90.0 * 70.0).abs() < 1e-9);
}

#[test]
fn test_inactive_keys_excluded_by_default() {
    let rows = vec![
        ("OLD", "Fridges", d(2023, 1), 500.0),
        ("A", "Fridges", d(2024, 3), 10.0),
    ];
    let (table, _) = estimate_baselines(&history(&rows), 3, false);
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].key.sku_virtual, "A");

    let (table, _) = estimate_baselines(&history(&rows), 3, true);
    assert_eq!(table.rows.len(), 2);
    let old = table.get(&DemandKey::new("OLD", "web")).unwrap();
    assert_eq!(old.baseline, 0.0);
    assert_eq!(old.avg_weighted_sales, 0.0);
}

#[test]
fn test_zero_category_total_is_zero_baseline_with_warning() {
    let rows = vec![
        ("A", "Dryers", d(2024, 2), 0.0),
        ("A", "Dryers", d(2024, 3), 0.0),
        ("B", "Fridges", d(2024, 3), 12.0),
    ];
    let (table, warnings) = estimate_baselines(&history(&rows), 3, false);

    let a = table.get(&DemandKey::new("A", "web")).unwrap();
    assert_eq!(a.baseline, 0.0);
    assert!(!a.baseline.is_nan());
    assert!(warnings.empty_category_baselines.contains("Dryers"));
    assert!(!warnings.empty_category_baselines.contains("Fridges"));
}
