//! Node-name → activity snapshots.

use indexmap::IndexMap;
use serde::Serialize;

use crate::{ResultsError, ResultsResult};

/// Activity per node at one instant, in insertion (network) order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ActivityMap(IndexMap<String, f64>);

impl ActivityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair `names` with `values` position by position.
    pub fn from_state<'a>(
        names: impl ExactSizeIterator<Item = &'a str>,
        values: &[f64],
    ) -> ResultsResult<Self> {
        if names.len() != values.len() {
            return Err(ResultsError::LengthMismatch {
                what: "activity values",
                expected: names.len(),
                actual: values.len(),
            });
        }
        Ok(names.zip(values.iter().copied()).collect())
    }

    /// Insert or overwrite. Overwriting keeps the original position.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, f64)> + '_ {
        self.0.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.0.values().copied()
    }
}

impl<'a> FromIterator<(&'a str, f64)> for ActivityMap {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(name, value)| (name.to_string(), value)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let map: ActivityMap = [("Z", 0.1), ("A", 0.2), ("M", 0.3)].into_iter().collect();
        assert_eq!(map.names().collect::<Vec<_>>(), vec!["Z", "A", "M"]);
        assert_eq!(map.get("A"), Some(0.2));
        assert_eq!(map.get("Q"), None);
    }

    #[test]
    fn overwrite_keeps_position() {
        let mut map = ActivityMap::new();
        map.insert("A", 1.0);
        map.insert("B", 2.0);
        map.insert("A", 3.0);
        assert_eq!(map.iter().collect::<Vec<_>>(), vec![("A", 3.0), ("B", 2.0)]);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn from_state_checks_length() {
        let names = ["A", "B"];
        assert!(ActivityMap::from_state(names.iter().copied(), &[1.0]).is_err());
        let map = ActivityMap::from_state(names.iter().copied(), &[1.0, 0.5]).unwrap();
        assert_eq!(map.get("B"), Some(0.5));
    }

    #[test]
    fn serializes_in_order() {
        let map: ActivityMap = [("b", 1.0), ("a", 0.5)].into_iter().collect();
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"b":1.0,"a":0.5}"#);
    }
}
