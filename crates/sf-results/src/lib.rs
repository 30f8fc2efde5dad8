//! sf-results: activity snapshots, differential reports and result tables.

pub mod activity;
pub mod chart;
pub mod csv;
pub mod differential;
pub mod table;

pub use activity::ActivityMap;
pub use chart::{BarChart, DELTA_Y_LABEL, Series, TimeSeriesChart, legend_order};
pub use differential::{DeltaEntry, DifferentialReport, SortOrder, compare};
pub use sf_sim::Trajectory;
pub use table::{ResultRow, ResultTable};

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Column mismatch in {what}: expected {expected:?}, got {actual:?}")]
    ColumnMismatch {
        what: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Length mismatch: {what} (expected {expected}, got {actual})")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}
