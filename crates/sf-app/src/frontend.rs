//! Interactive front-end requests: one mode, one target, a few highlighted nodes.

use sf_network::NetworkModel;
use sf_project::ScenarioConfig;
use sf_results::TimeSeriesChart;
use sf_sim::CancelFlag;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::progress::ProgressSink;
use crate::scenario::{OutputMode, ScenarioOutput, ScenarioRequest, ScenarioSettings, run_scenario};
use crate::selection::{Highlights, SelectionMode, filter_highlights};

#[derive(Debug, Clone, Default)]
pub struct FrontEndRequest {
    pub mode: SelectionMode,
    pub target: Option<String>,
    pub knockdown_fraction: Option<f64>,
    /// Defaults to the configured horizon
    pub horizon: Option<f64>,
    /// Nodes to chart; all nodes when none are valid
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FrontEndResponse {
    pub chart: TimeSeriesChart,
    pub highlights: Highlights,
}

/// Every node of `model` as a chart column, in network order.
pub(crate) fn node_columns(model: &NetworkModel) -> Vec<(String, usize)> {
    model
        .names()
        .enumerate()
        .map(|(i, name)| (name.to_string(), i))
        .collect()
}

pub fn handle_request(
    model: &NetworkModel,
    config: &ScenarioConfig,
    request: &FrontEndRequest,
    cancel: Option<&CancelFlag>,
    progress: ProgressSink<'_>,
) -> AppResult<FrontEndResponse> {
    let target = request.target.as_deref().map(str::trim);
    if let Some(t) = target.filter(|_| request.mode.needs_target()) {
        model.require_node(t)?;
    }
    let perturbation = request
        .mode
        .perturbation(target, request.knockdown_fraction, config)?;
    let highlights = filter_highlights(&request.highlights, model);

    let horizon = request.horizon.unwrap_or(config.horizon);
    let scenario = ScenarioRequest {
        label: "front-end",
        model,
        perturbation: perturbation.as_ref(),
        horizon,
        output: OutputMode::Trajectory,
    };
    let settings = ScenarioSettings::from_config(config);
    let result = run_scenario(&scenario, &settings, cancel, progress)?;
    let ScenarioOutput::Trajectory(trajectory) = result.output else {
        return Err(AppError::InvalidInput(
            "front-end run produced no trajectory".to_string(),
        ));
    };

    let columns: Vec<(String, usize)> = if highlights.valid.is_empty() {
        node_columns(model)
    } else {
        highlights
            .valid
            .iter()
            .filter_map(|name| model.node_id(name).map(|id| (name.clone(), id.pos())))
            .collect()
    };

    let title = request.mode.title(target, config);
    info!(mode = %request.mode, series = columns.len(), "front-end request done");
    Ok(FrontEndResponse {
        chart: TimeSeriesChart::from_trajectory(title, &columns, &trajectory),
        highlights,
    })
}
