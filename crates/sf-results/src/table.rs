//! Result tables: one row per scenario, one column per node.

use std::borrow::Cow;
use std::path::Path;

use serde::Serialize;

use crate::activity::ActivityMap;
use crate::csv::{escape, push_row};
use crate::{ResultsError, ResultsResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub label: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a snapshot whose node names match the table's columns exactly.
    pub fn push_activity(&mut self, label: impl Into<String>, activity: &ActivityMap) -> ResultsResult<()> {
        let label = label.into();
        if !activity.names().eq(self.columns.iter().map(String::as_str)) {
            return Err(ResultsError::ColumnMismatch {
                what: label,
                expected: self.columns.clone(),
                actual: activity.names().map(str::to_string).collect(),
            });
        }
        self.rows.push(ResultRow {
            label,
            values: activity.values().collect(),
        });
        Ok(())
    }

    /// CSV with a leading `label` column.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        push_row(
            &mut out,
            std::iter::once(Cow::Borrowed("label")).chain(self.columns.iter().map(|c| escape(c))),
        );
        for row in &self.rows {
            push_row(
                &mut out,
                std::iter::once(escape(&row.label))
                    .chain(row.values.iter().map(|v| Cow::Owned(v.to_string()))),
            );
        }
        out
    }

    pub fn write_csv(&self, path: &Path) -> ResultsResult<()> {
        std::fs::write(path, self.to_csv())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<String> {
        vec!["A".into(), "B".into()]
    }

    #[test]
    fn renders_csv() {
        let mut table = ResultTable::new(columns());
        let row: ActivityMap = [("A", 0.5), ("B", 1.0)].into_iter().collect();
        table.push_activity("row 0", &row).unwrap();
        table.push_activity("row,2", &row).unwrap();
        assert_eq!(table.to_csv(), "label,A,B\nrow 0,0.5,1\n\"row,2\",0.5,1\n");
    }

    #[test]
    fn writes_csv_file() {
        let mut table = ResultTable::new(columns());
        let row: ActivityMap = [("A", 0.25), ("B", 0.75)].into_iter().collect();
        table.push_activity("row 0", &row).unwrap();
        let path = std::env::temp_dir().join("sf_results_table.csv");
        table.write_csv(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), table.to_csv());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn rejects_misaligned_rows() {
        let mut table = ResultTable::new(columns());
        let swapped: ActivityMap = [("B", 0.5), ("A", 1.0)].into_iter().collect();
        assert!(matches!(
            table.push_activity("x", &swapped),
            Err(ResultsError::ColumnMismatch { .. })
        ));
        assert!(table.is_empty());
    }
}
