use super::*;
use common::{ChainResolution, SalesRecord, TransitionRecord, TransitionStatus};

use crate::identity::{resolve_history, SkuResolver};

fn d(y: i32, m: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, 1).unwrap()
}

fn sale(sku: &str, date: NaiveDate, units: f64, availability: Option<f64>) -> SalesRecord {
    SalesRecord {
        sku: sku.into(),
        channel: "web".into(),
        category: "Fridges".into(),
        brand: "Acme".into(),
        date,
        units_sold: units,
        availability,
    }
}

fn normalize(
    history: &[SalesRecord],
    transitions: &[TransitionRecord],
    policy: MissingAvailabilityPolicy,
) -> Result<(NormalizedHistory, RunWarnings)> {
    let (resolver, _) = SkuResolver::from_transitions(transitions, ChainResolution::SingleHop);
    let resolved = resolve_history(history, &resolver);
    normalize_demand(&resolved, policy)
}

#[test]
fn test_weighted_sales_discount_stockouts() {
    let history = vec![sale("A", d(2024, 1), 100.0, Some(0.5))];
    let (norm, warnings) =
        normalize(&history, &[], MissingAvailabilityPolicy::AssumeFull).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(norm.observations.len(), 1);
    assert_eq!(norm.observations[0].weighted_sales, 50.0);
    assert_eq!(norm.observations[0].key, DemandKey::new("A", "web"));
    assert_eq!(norm.last_date, d(2024, 1));
}

#[test]
fn test_availability_is_clamped() {
    let history = vec![
        sale("A", d(2024, 1), 100.0, Some(1.5)),
        sale("B", d(2024, 1), 100.0, Some(-0.2)),
    ];
    let (norm, _) = normalize(&history, &[], MissingAvailabilityPolicy::AssumeFull).unwrap();
    assert_eq!(norm.observations[0].weighted_sales, 100.0);
    assert_eq!(norm.observations[1].weighted_sales, 0.0);
}

#[test]
fn test_missing_availability_policies() {
    let history = vec![
        sale("A", d(2024, 1), 100.0, None),
        sale("A", d(2024, 2), 80.0, Some(1.0)),
    ];

    let (full, warnings) =
        normalize(&history, &[], MissingAvailabilityPolicy::AssumeFull).unwrap();
    assert_eq!(warnings.missing_availability, 1);
    assert_eq!(full.observations.len(), 2);
    assert_eq!(full.observations[0].weighted_sales, 100.0);

    let (excluded, warnings) =
        normalize(&history, &[], MissingAvailabilityPolicy::Exclude).unwrap();
    assert_eq!(warnings.missing_availability, 1);
    assert_eq!(excluded.observations.len(), 1);
    assert_eq!(excluded.observations[0].date, d(2024, 2));
}

#[test]
fn test_everything_excluded_is_fatal() {
    let history = vec![sale("A", d(2024, 1), 100.0, None)];
    let err = normalize(&history, &[], MissingAvailabilityPolicy::Exclude).unwrap_err();
    assert!(matches!(
        err,
        DemandError::EmptyHistory {
            stage: Stage::Normalize,
            ..
        }
    ));
}

#[test]
fn test_last_date_counts_excluded_rows() {
    let history = vec![
        sale("A", d(2024, 11), 100.0, Some(1.0)),
        sale("A", d(2024, 12), 100.0, None),
    ];
    let (norm, warnings) =
        normalize(&history, &[], MissingAvailabilityPolicy::Exclude).unwrap();
    assert_eq!(warnings.missing_availability, 1);
    assert_eq!(norm.observations.len(), 1);
    assert_eq!(norm.last_date, d(2024, 12));
}

#[test]
fn test_old_and_new_sku_merge_into_one_key() {
    let history = vec![
        sale("OLD", d(2024, 1), 60.0, Some(1.0)),
        sale("NEW", d(2024, 1), 40.0, Some(1.0)),
        sale("NEW", d(2024, 2), 90.0, Some(1.0)),
    ];
    let transitions = vec![TransitionRecord {
        sku_old: "OLD".into(),
        sku_new: "NEW".into(),
        status: TransitionStatus::New,
        date_in: None,
        date_out: None,
    }];
    let (norm, _) =
        normalize(&history, &transitions, MissingAvailabilityPolicy::AssumeFull).unwrap();

    assert_eq!(norm.keys.len(), 1);
    let weighted: Vec<f64> = norm.observations.iter().map(|o| o.weighted_sales).collect();
    assert_eq!(weighted, vec![100.0, 90.0]);
}

#[test]
fn test_key_meta_comes_from_latest_row() {
    let mut early = sale("A", d(2024, 1), 1.0, Some(1.0));
    early.brand = "OldBrand".into();
    let late = sale("A", d(2024, 3), 1.0, Some(1.0));
    let history = vec![late, early];

    let (norm, _) = normalize(&history, &[], MissingAvailabilityPolicy::AssumeFull).unwrap();
    let meta = &norm.keys[&DemandKey::new("A", "web")];
    assert_eq!(meta.brand, "Acme");
    assert_eq!(meta.last_seen, d(2024, 3));
}
