//! Per-node activity differences between a control and a treatment snapshot.

use std::collections::HashSet;

use serde::Serialize;

use crate::activity::ActivityMap;

/// How report entries are arranged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Most negative change first.
    #[default]
    Ascending,
    Descending,
    /// Exactly this node order.
    Explicit(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaEntry {
    pub name: String,
    pub delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifferentialReport {
    entries: Vec<DeltaEntry>,
    order: SortOrder,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    missing: Vec<String>,
}

/// `treatment - control` for every node of `treatment`; nodes absent from
/// `control` count as 0 there.
///
/// Sorting is stable, so ties keep the treatment's node order. With
/// `SortOrder::Explicit`, names not present in `treatment` are left out and
/// listed in `missing()`; a name repeated in the ordering is reported once,
/// at its first position.
pub fn compare(control: &ActivityMap, treatment: &ActivityMap, order: SortOrder) -> DifferentialReport {
    let deltas: Vec<DeltaEntry> = treatment
        .iter()
        .map(|(name, value)| DeltaEntry {
            name: name.to_string(),
            delta: value - control.get(name).unwrap_or(0.0),
        })
        .collect();

    let mut missing = Vec::new();
    let entries = match &order {
        SortOrder::Ascending => {
            let mut entries = deltas;
            entries.sort_by(|a, b| a.delta.total_cmp(&b.delta));
            entries
        }
        SortOrder::Descending => {
            let mut entries = deltas;
            entries.sort_by(|a, b| b.delta.total_cmp(&a.delta));
            entries
        }
        SortOrder::Explicit(names) => {
            let mut entries = Vec::with_capacity(names.len());
            let mut seen = HashSet::with_capacity(names.len());
            for name in names {
                if !seen.insert(name.as_str()) {
                    continue;
                }
                match deltas.iter().find(|e| &e.name == name) {
                    Some(entry) => entries.push(entry.clone()),
                    None => missing.push(name.clone()),
                }
            }
            entries
        }
    };

    DifferentialReport {
        entries,
        order,
        missing,
    }
}

impl DifferentialReport {
    pub fn entries(&self) -> &[DeltaEntry] {
        &self.entries
    }

    pub fn order(&self) -> &SortOrder {
        &self.order
    }

    /// Names requested by an explicit ordering that the treatment lacked.
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.delta)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Order to reuse when aligning another report to this one.
    pub fn as_explicit(&self) -> SortOrder {
        SortOrder::Explicit(self.names())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, f64)]) -> ActivityMap {
        pairs.iter().copied().collect()
    }

    #[test]
    fn self_comparison_is_zero() {
        let m = map(&[("A", 0.3), ("B", 0.9), ("C", 0.0)]);
        let report = compare(&m, &m, SortOrder::Ascending);
        assert_eq!(report.len(), 3);
        assert!(report.entries().iter().all(|e| e.delta == 0.0));
        // Stable: all ties keep network order.
        assert_eq!(report.names(), vec!["A", "B", "C"]);
    }

    #[test]
    fn ascending_and_descending() {
        let control = map(&[("A", 0.5), ("B", 0.5), ("C", 0.5)]);
        let treat = map(&[("A", 0.2), ("B", 0.9), ("C", 0.5)]);

        let asc = compare(&control, &treat, SortOrder::Ascending);
        assert_eq!(asc.names(), vec!["A", "C", "B"]);
        assert!((asc.get("A").unwrap() + 0.3).abs() < 1e-15);

        let desc = compare(&control, &treat, SortOrder::Descending);
        assert_eq!(desc.names(), vec!["B", "C", "A"]);
    }

    #[test]
    fn absent_control_counts_as_zero() {
        let control = map(&[("A", 0.5)]);
        let treat = map(&[("A", 0.5), ("B", 0.4)]);
        let report = compare(&control, &treat, SortOrder::Ascending);
        assert_eq!(report.get("B"), Some(0.4));
    }

    #[test]
    fn explicit_order_preserved_and_missing_tracked() {
        let control = map(&[("A", 0.0), ("B", 0.0), ("C", 0.0)]);
        let treat = map(&[("A", 0.1), ("B", 0.2), ("C", 0.3)]);
        let order = SortOrder::Explicit(vec!["C".into(), "Q".into(), "A".into()]);
        let report = compare(&control, &treat, order);
        assert_eq!(report.names(), vec!["C", "A"]);
        assert_eq!(report.missing(), ["Q".to_string()]);
    }

    #[test]
    fn explicit_order_reports_each_node_once() {
        let control = map(&[("A", 0.0), ("B", 0.0)]);
        let treat = map(&[("A", 0.1), ("B", 0.2)]);
        let order = SortOrder::Explicit(vec!["B".into(), "A".into(), "B".into(), "Q".into(), "Q".into()]);
        let report = compare(&control, &treat, order);
        assert_eq!(report.names(), vec!["B", "A"]);
        assert_eq!(report.len(), 2);
        assert_eq!(report.missing(), ["Q".to_string()]);
    }

    #[test]
    fn alignment_reuses_first_order() {
        let control = map(&[("A", 0.5), ("B", 0.5)]);
        let first = compare(&control, &map(&[("A", 0.9), ("B", 0.1)]), SortOrder::Ascending);
        let second = compare(&control, &map(&[("A", 0.1), ("B", 0.9)]), first.as_explicit());
        assert_eq!(second.names(), first.names());
        assert_eq!(second.names(), vec!["B", "A"]);
    }
}
