//! Chart descriptions handed to a renderer.

use serde::Serialize;
use sf_sim::Trajectory;

use crate::differential::DifferentialReport;

pub const DELTA_Y_LABEL: &str = "\u{0394} Activity (KD - Control)";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

/// Activity over time for a set of nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
    /// Series names by descending final activity.
    pub legend: Vec<String>,
}

impl TimeSeriesChart {
    /// Chart the nodes at `columns` (positions into each state vector) of `trajectory`.
    pub fn from_trajectory(
        title: impl Into<String>,
        columns: &[(String, usize)],
        trajectory: &Trajectory,
    ) -> Self {
        let series: Vec<Series> = columns
            .iter()
            .map(|(name, idx)| Series {
                name: name.clone(),
                points: trajectory.component(*idx),
            })
            .collect();
        let finals: Vec<(String, f64)> = series
            .iter()
            .map(|s| (s.name.clone(), s.points.last().map_or(0.0, |p| p.1)))
            .collect();
        Self {
            title: title.into(),
            x_label: "Time".to_string(),
            y_label: "Fractional activation".to_string(),
            legend: legend_order(&finals),
            series,
        }
    }
}

/// Names sorted by descending value; ties keep input order.
pub fn legend_order(finals: &[(String, f64)]) -> Vec<String> {
    let mut sorted: Vec<&(String, f64)> = finals.iter().collect();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1));
    sorted.into_iter().map(|(name, _)| name.clone()).collect()
}

/// Per-node deltas as bars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub y_label: String,
    pub report: DifferentialReport,
}

impl BarChart {
    /// Bar chart for a knockdown comparison, titled like
    /// `Knocked Down Node: ROS; Signaling Context: Baseline`.
    pub fn knockdown(target: &str, context: &str, report: DifferentialReport) -> Self {
        Self {
            title: format!("Knocked Down Node: {target}; Signaling Context: {context}"),
            y_label: DELTA_Y_LABEL.to_string(),
            report,
        }
    }
}
