//! Shared application service layer for signalflow.
//!
//! Front ends (the CLI today) call into this crate for project compilation,
//! single scenarios, knockdown comparisons, batch sweeps and interactive
//! chart requests.

pub mod compare;
pub mod compile;
pub mod error;
pub mod frontend;
pub mod progress;
pub mod scenario;
pub mod selection;
pub mod sweep;

pub use compare::{Comparison, ComparisonRequest, run_comparison};
pub use compile::compile_network;
pub use error::{AppError, AppResult};
pub use frontend::{FrontEndRequest, FrontEndResponse, handle_request};
pub use progress::{ProgressEvent, ProgressSink, Stage};
pub use scenario::{
    OutputMode, ScenarioOutput, ScenarioRequest, ScenarioResult, ScenarioSettings, activity_at,
    check_time_point, run_scenario, sample_index, simulate, snapshot,
};
pub use selection::{Highlights, MAX_HIGHLIGHTS, SelectionMode, filter_highlights};
pub use sweep::{ProblemKind, RowProblem, SweepOptions, SweepOutcome, SweepRow, run_sweep};

use std::path::Path;

use sf_network::NetworkModel;
use sf_project::schema::Project;

/// Load a project file (YAML or JSON) and compile its network.
pub fn load_project(path: &Path) -> AppResult<(Project, NetworkModel)> {
    let project = sf_project::load(path)?;
    let model = compile_network(&project.network)?;
    Ok((project, model))
}
