use std::collections::{BTreeSet, HashMap, HashSet};

use common::{ChainResolution, RunWarnings, SalesRecord, TransitionRecord, TransitionStatus};
use tracing::{debug, warn};

/// Maps historical SKUs to their current ("virtual") identity.
///
/// Built once from the NEW rows of the transition table; every lookup is a
/// single hash probe. With `ChainResolution::FixedPoint` the chains are
/// collapsed at construction time.
#[derive(Debug, Clone, Default)]
pub struct SkuResolver {
    mapping: HashMap<String, String>,
}

/// A history row tagged with its virtual SKU.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedSale<'a> {
    pub record: &'a SalesRecord,
    pub sku_virtual: &'a str,
}

impl SkuResolver {
    pub fn from_transitions(
        transitions: &[TransitionRecord],
        mode: ChainResolution,
    ) -> (Self, RunWarnings) {
        let mut warnings = RunWarnings::default();
        let mut direct: HashMap<String, String> = HashMap::new();

        for t in transitions
            .iter()
            .filter(|t| t.status == TransitionStatus::New)
        {
            match direct.get(&t.sku_old) {
                Some(existing) if existing != &t.sku_new => {
                    warnings.duplicate_transitions.insert(t.sku_old.clone());
                }
                Some(_) => {}
                None => {
                    direct.insert(t.sku_old.clone(), t.sku_new.clone());
                }
            }
        }

        let mapping = match mode {
            ChainResolution::SingleHop => direct,
            ChainResolution::FixedPoint => {
                let (collapsed, cycles) = collapse_chains(&direct);
                warnings.transition_cycles = cycles;
                collapsed
            }
        };

        if !warnings.duplicate_transitions.is_empty() || !warnings.transition_cycles.is_empty() {
            warn!(
                duplicates = warnings.duplicate_transitions.len(),
                cycles = warnings.transition_cycles.len(),
                "Transition table has conflicting or cyclic mappings"
            );
        }
        debug!(mappings = mapping.len(), mode = ?mode, "Built SKU resolver");

        (Self { mapping }, warnings)
    }

    /// Virtual SKU for `sku`; the SKU itself when it never transitioned.
    pub fn resolve<'a>(&'a self, sku: &'a str) -> &'a str {
        self.mapping.get(sku).map(String::as_str).unwrap_or(sku)
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}

/// Follow every chain to its end. A chain that revisits a SKU stops at the
/// last SKU before the repeat; all SKUs on the loop are reported.
fn collapse_chains(
    direct: &HashMap<String, String>,
) -> (HashMap<String, String>, BTreeSet<String>) {
    let mut collapsed = HashMap::with_capacity(direct.len());
    let mut cycles = BTreeSet::new();

    for start in direct.keys() {
        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(start.as_str());
        let mut path: Vec<&str> = vec![start.as_str()];
        let mut current = start.as_str();

        while let Some(next) = direct.get(current) {
            if !seen.insert(next.as_str()) {
                if let Some(pos) = path.iter().position(|s| *s == next.as_str()) {
                    cycles.extend(path[pos..].iter().map(|s| s.to_string()));
                }
                break;
            }
            path.push(next.as_str());
            current = next.as_str();
        }

        if current != start.as_str() {
            collapsed.insert(start.clone(), current.to_string());
        }
    }

    (collapsed, cycles)
}

/// Tag every history row with its virtual SKU. The input is not modified.
pub fn resolve_history<'a>(
    history: &'a [SalesRecord],
    resolver: &'a SkuResolver,
) -> Vec<ResolvedSale<'a>> {
    history
        .iter()
        .map(|record| ResolvedSale {
            record,
            sku_virtual: resolver.resolve(&record.sku),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn transition(old: &str, new: &str, status: TransitionStatus) -> TransitionRecord {
        TransitionRecord {
            sku_old: old.into(),
            sku_new: new.into(),
            status,
            date_in: None,
            date_out: None,
        }
    }

    fn sale(sku: &str) -> SalesRecord {
        SalesRecord {
            sku: sku.into(),
            channel: "web".into(),
            category: "Fridges".into(),
            brand: "Acme".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            units_sold: 1.0,
            availability: Some(1.0),
        }
    }

    #[test]
    fn test_only_new_rows_map() {
        let transitions = vec![
            transition("A", "B", TransitionStatus::New),
            transition("C", "D", TransitionStatus::Old),
        ];
        let (resolver, warnings) =
            SkuResolver::from_transitions(&transitions, ChainResolution::SingleHop);
        assert!(warnings.is_empty());
        assert_eq!(resolver.resolve("A"), "B");
        assert_eq!(resolver.resolve("C"), "C");
        assert_eq!(resolver.resolve("Z"), "Z");
    }

    #[test]
    fn test_single_hop_does_not_follow_chains() {
        let transitions = vec![
            transition("A", "B", TransitionStatus::New),
            transition("B", "C", TransitionStatus::New),
        ];
        let (resolver, _) = SkuResolver::from_transitions(&transitions, ChainResolution::SingleHop);
        assert_eq!(resolver.resolve("A"), "B");
        assert_eq!(resolver.resolve("B"), "C");
    }

    #[test]
    fn test_fixed_point_follows_chains() {
        let transitions = vec![
            transition("A", "B", TransitionStatus::New),
            transition("B", "C", TransitionStatus::New),
            transition("C", "D", TransitionStatus::New),
        ];
        let (resolver, warnings) =
            SkuResolver::from_transitions(&transitions, ChainResolution::FixedPoint);
        assert!(warnings.transition_cycles.is_empty());
        assert_eq!(resolver.resolve("A"), "D");
        assert_eq!(resolver.resolve("B"), "D");
        assert_eq!(resolver.resolve("D"), "D");
    }

    #[test]
    fn test_fixed_point_reports_cycles() {
        let transitions = vec![
            transition("A", "B", TransitionStatus::New),
            transition("B", "A", TransitionStatus::New),
            transition("X", "A", TransitionStatus::New),
        ];
        let (resolver, warnings) =
            SkuResolver::from_transitions(&transitions, ChainResolution::FixedPoint);
        let cycle: Vec<_> = warnings.transition_cycles.iter().cloned().collect();
        assert_eq!(cycle, vec!["A".to_string(), "B".to_string()]);
        // A → B, then B → A repeats; stop at B
        assert_eq!(resolver.resolve("A"), "B");
        assert_eq!(resolver.resolve("X"), "B");
    }

    #[test]
    fn test_conflicting_mapping_keeps_first() {
        let transitions = vec![
            transition("A", "B", TransitionStatus::New),
            transition("A", "C", TransitionStatus::New),
            transition("A", "B", TransitionStatus::New),
        ];
        let (resolver, warnings) =
            SkuResolver::from_transitions(&transitions, ChainResolution::SingleHop);
        assert_eq!(resolver.resolve("A"), "B");
        assert!(warnings.duplicate_transitions.contains("A"));
        assert_eq!(warnings.duplicate_transitions.len(), 1);
    }

    #[test]
    fn test_resolve_history_leaves_input_untouched() {
        let history = vec![sale("A"), sale("Q")];
        let before = history.clone();
        let (resolver, _) = SkuResolver::from_transitions(
            &[transition("A", "B", TransitionStatus::New)],
            ChainResolution::SingleHop,
        );

        let resolved = resolve_history(&history, &resolver);
        assert_eq!(resolved[0].sku_virtual, "B");
        assert_eq!(resolved[0].record.sku, "A");
        assert_eq!(resolved[1].sku_virtual, "Q");
        assert_eq!(history, before);
    }
}
