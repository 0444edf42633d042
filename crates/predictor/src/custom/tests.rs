use super::*;
use analyzer::SkuBaseline;
use chrono::NaiveDate;
use common::config::ChainResolution;
use common::{TransitionRecord, TransitionStatus};

fn d(y: i32, m: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, 1).unwrap()
}

fn sale(sku: &str, category: &str, brand: &str, date: NaiveDate) -> SalesRecord {
    SalesRecord {
        sku: sku.into(),
        channel: "web".into(),
        category: category.into(),
        brand: brand.into(),
        date,
        units_sold: 10.0,
        availability: Some(1.0),
    }
}

fn custom(sku: &str, category: Option<&str>, brand: Option<&str>) -> CustomSku {
    CustomSku {
        sku: sku.into(),
        category: category.map(Into::into),
        brand: brand.map(Into::into),
    }
}

fn resolver(pairs: &[(&str, &str)]) -> SkuResolver {
    let transitions: Vec<TransitionRecord> = pairs
        .iter()
        .map(|(old, new)| TransitionRecord {
            sku_old: old.to_string(),
            sku_new: new.to_string(),
            status: TransitionStatus::New,
            date_in: None,
            date_out: None,
        })
        .collect();
    SkuResolver::from_transitions(&transitions, ChainResolution::SingleHop).0
}

fn baseline(sku: &str, channel: &str, category: &str, value: f64) -> SkuBaseline {
    SkuBaseline {
        key: DemandKey::new(sku, channel),
        category: category.into(),
        brand: "Acme".into(),
        avg_weighted_sales: value,
        baseline: value,
    }
}

#[test]
fn test_enrich_keeps_given_category() {
    let (out, warnings) = enrich_custom_skus(
        &[custom("N1", Some("Ovens"), Some("Zed"))],
        &[sale("N1", "Fridges", "Acme", d(2024, 1))],
        &resolver(&[]),
    );
    assert!(warnings.is_empty());
    assert_eq!(
        out,
        vec![ResolvedCustomSku {
            sku: "N1".into(),
            category: "Ovens".into(),
            brand: "Zed".into(),
        }]
    );
}

#[test]
fn test_enrich_uses_latest_history_row() {
    let history = vec![
        sale("A", "Fridges", "Acme", d(2024, 1)),
        sale("A", "Freezers", "Acme2", d(2024, 5)),
        sale("A", "Ovens", "Acme3", d(2024, 3)),
    ];
    let (out, _) = enrich_custom_skus(&[custom("A", None, None)], &history, &resolver(&[]));
    assert_eq!(out[0].category, "Freezers");
    assert_eq!(out[0].brand, "Acme2");
}

#[test]
fn test_enrich_matches_through_virtual_sku() {
    let history = vec![sale("OLD", "Fridges", "Acme", d(2024, 1))];
    let (out, warnings) = enrich_custom_skus(
        &[custom("NEW", None, None)],
        &history,
        &resolver(&[("OLD", "NEW")]),
    );
    assert!(warnings.is_empty());
    assert_eq!(out[0].category, "Fridges");
}

#[test]
fn test_enrich_reports_unresolvable() {
    let (out, warnings) = enrich_custom_skus(
        &[custom("Z", None, Some("Acme"))],
        &[sale("A", "Fridges", "Acme", d(2024, 1))],
        &resolver(&[]),
    );
    assert!(out.is_empty());
    assert!(warnings.unresolvable_skus.contains("Z"));
}

#[test]
fn test_custom_rows_take_channel_mean_of_category() {
    let table = BaselineTable {
        rows: vec![
            baseline("A", "store", "Fridges", 30.0),
            baseline("A", "web", "Fridges", 100.0),
            baseline("B", "web", "Fridges", 50.0),
            baseline("C", "web", "Ovens", 999.0),
        ],
        categories: Default::default(),
    };
    let custom = vec![ResolvedCustomSku {
        sku: "N1".into(),
        category: "Fridges".into(),
        brand: "Acme".into(),
    }];

    let (rows, warnings) = custom_baseline_rows(&custom, &table, &resolver(&[]));
    assert!(warnings.is_empty());
    assert_eq!(rows.len(), 2);

    let store = rows.iter().find(|r| r.key.channel == "store").unwrap();
    assert!((store.baseline - 30.0).abs() < 1e-9);
    let web = rows.iter().find(|r| r.key.channel == "web").unwrap();
    assert!((web.baseline - 75.0).abs() < 1e-9);
    assert!(rows.iter().all(|r| r.sku == "N1" && r.key.sku_virtual == "N1"));
}

#[test]
fn test_custom_rows_skip_duplicates_and_empty_categories() {
    let table = BaselineTable {
        rows: vec![baseline("A", "web", "Fridges", 100.0)],
        categories: Default::default(),
    };
    let entry = |sku: &str, category: &str| ResolvedCustomSku {
        sku: sku.into(),
        category: category.into(),
        brand: String::new(),
    };
    let custom = vec![
        entry("A", "Fridges"),
        entry("N1", "Fridges"),
        entry("N1", "Fridges"),
        entry("N2", "Kettles"),
    ];

    let (rows, warnings) = custom_baseline_rows(&custom, &table, &resolver(&[]));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].sku, "N1");
    assert_eq!(
        warnings.duplicate_custom_skus.iter().collect::<Vec<_>>(),
        vec!["A", "N1"]
    );
    assert!(warnings.unresolvable_skus.contains("N2"));
}
