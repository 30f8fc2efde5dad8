//! Parameter tables for batch sweeps.
//!
//! Each row carries one full parameter set as comma-separated number lists,
//! keyed by the column names `TAU`, `Y Max`, `Y Init`, `W`, `N`, `EC50`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ProjectResult, format::ProjectFormat};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ParameterRow {
    #[serde(rename = "TAU", default, skip_serializing_if = "Option::is_none")]
    pub tau: Option<String>,
    #[serde(rename = "Y Max", default, skip_serializing_if = "Option::is_none")]
    pub ymax: Option<String>,
    #[serde(rename = "Y Init", default, skip_serializing_if = "Option::is_none")]
    pub y0: Option<String>,
    #[serde(rename = "W", default, skip_serializing_if = "Option::is_none")]
    pub w: Option<String>,
    #[serde(rename = "N", default, skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    #[serde(rename = "EC50", default, skip_serializing_if = "Option::is_none")]
    pub ec50: Option<String>,
}

/// Numeric content of a row.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub tau: Vec<f64>,
    pub ymax: Vec<f64>,
    pub y0: Vec<f64>,
    pub w: Vec<f64>,
    pub n: Vec<f64>,
    pub ec50: Vec<f64>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("missing column {column}")]
    MissingColumn { column: &'static str },

    #[error("column {column}: '{token}' is not a number")]
    BadNumber { column: &'static str, token: String },
}

fn is_blank(cell: &Option<String>) -> bool {
    cell.as_deref().is_none_or(|s| s.trim().is_empty())
}

fn parse_column(cell: &Option<String>, column: &'static str) -> Result<Vec<f64>, RowError> {
    let text = match cell.as_deref() {
        Some(s) if !s.trim().is_empty() => s,
        _ => return Err(RowError::MissingColumn { column }),
    };
    text.split(',')
        .map(|token| {
            let token = token.trim();
            token
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| RowError::BadNumber {
                    column,
                    token: token.to_string(),
                })
        })
        .collect()
}

impl ParameterRow {
    /// `Ok(None)` when the row has no `TAU` data and should be skipped.
    pub fn parse(&self) -> Result<Option<ParsedRow>, RowError> {
        if is_blank(&self.tau) {
            return Ok(None);
        }
        Ok(Some(ParsedRow {
            tau: parse_column(&self.tau, "TAU")?,
            ymax: parse_column(&self.ymax, "Y Max")?,
            y0: parse_column(&self.y0, "Y Init")?,
            w: parse_column(&self.w, "W")?,
            n: parse_column(&self.n, "N")?,
            ec50: parse_column(&self.ec50, "EC50")?,
        }))
    }
}

/// Rows from a YAML or JSON list, picked by file extension.
pub fn load_parameter_rows(path: &Path) -> ProjectResult<Vec<ParameterRow>> {
    let content = std::fs::read_to_string(path)?;
    match ProjectFormat::from_path(path)? {
        ProjectFormat::Yaml => Ok(serde_yaml::from_str(&content)?),
        ProjectFormat::Json => Ok(serde_json::from_str(&content)?),
    }
}
