//! Knockdown comparison workflow.
//!
//! Four snapshots at the same time point: control, knockdown, stimulus and
//! knockdown + stimulus. The baseline report ranks `knockdown - control`; the
//! high-stimulus report shows `combined - stimulus` in the baseline's order.
//! On request, the same four scenarios are also charted over the whole
//! horizon for every node.

use sf_network::{NetworkModel, PerturbationSpec};
use sf_project::ScenarioConfig;
use sf_results::{ActivityMap, BarChart, SortOrder, TimeSeriesChart, compare};
use sf_sim::CancelFlag;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::frontend::node_columns;
use crate::progress::{ProgressEvent, ProgressSink, Stage, emit};
use crate::scenario::{
    OutputMode, ScenarioOutput, ScenarioRequest, ScenarioSettings, run_scenario, snapshot,
};
use crate::selection::SelectionMode;

#[derive(Debug, Clone)]
pub struct ComparisonRequest<'a> {
    pub target: &'a str,
    pub horizon: f64,
    pub time_point: f64,
    /// Ordering of the baseline report
    pub order: SortOrder,
    /// Also chart all-node trajectories of the four scenarios
    pub extra_charts: bool,
}

#[derive(Debug, Clone)]
pub struct Comparison {
    pub control: ActivityMap,
    pub knockdown: ActivityMap,
    pub stimulus: ActivityMap,
    pub combined: ActivityMap,
    pub baseline: BarChart,
    pub high_stimulus: BarChart,
    /// Regular, knockdown, knockdown + stimulus and stimulus trajectories;
    /// empty unless `extra_charts` was requested.
    pub extra_charts: Vec<TimeSeriesChart>,
}

pub fn run_comparison(
    model: &NetworkModel,
    config: &ScenarioConfig,
    request: &ComparisonRequest<'_>,
    cancel: Option<&CancelFlag>,
    mut progress: ProgressSink<'_>,
) -> AppResult<Comparison> {
    let target = request.target;
    model.require_node(target)?;
    let settings = ScenarioSettings::from_config(config);
    let stim_node = config.stimulus_node.as_str();
    let fraction = config.knockdown_fraction;

    let kd = PerturbationSpec::knockdown(target, fraction);
    let stim = PerturbationSpec::stimulus(stim_node, config.stimulus_level);
    let both = PerturbationSpec::combined(target, fraction, stim_node, config.stimulus_level);

    let mut run = |label: &str, spec: Option<&PerturbationSpec>| -> AppResult<ActivityMap> {
        let map = snapshot(label, model, spec, request.horizon, request.time_point, &settings, cancel)?;
        emit(&mut progress, || ProgressEvent::stage(label, Stage::Completed));
        Ok(map)
    };
    let control = run("control", None)?;
    let knockdown = run("knockdown", Some(&kd))?;
    let stimulus = run("stimulus", Some(&stim))?;
    let combined = run("knockdown+stimulus", Some(&both))?;

    let extra_charts = if request.extra_charts {
        let scenarios = [
            (SelectionMode::Regular, None),
            (SelectionMode::Knockdown, Some(&kd)),
            (SelectionMode::KnockdownStimulus, Some(&both)),
            (SelectionMode::Stimulus, Some(&stim)),
        ];
        let columns = node_columns(model);
        let mut charts = Vec::with_capacity(scenarios.len());
        for (mode, spec) in scenarios {
            let title = mode.title(Some(target), config);
            let scenario = ScenarioRequest {
                label: &title,
                model,
                perturbation: spec,
                horizon: request.horizon,
                output: OutputMode::Trajectory,
            };
            let ScenarioOutput::Trajectory(trajectory) =
                run_scenario(&scenario, &settings, cancel, None)?.output
            else {
                return Err(AppError::InvalidInput(format!(
                    "'{title}' produced no trajectory"
                )));
            };
            emit(&mut progress, || ProgressEvent::stage(&title, Stage::Completed));
            debug!(chart = %title, samples = trajectory.len(), "extra chart ready");
            charts.push(TimeSeriesChart::from_trajectory(title, &columns, &trajectory));
        }
        charts
    } else {
        Vec::new()
    };

    let baseline_report = compare(&control, &knockdown, request.order.clone());
    let high_report = compare(&stimulus, &combined, baseline_report.as_explicit());
    info!(
        target,
        time_point = request.time_point,
        nodes = baseline_report.len(),
        "comparison finished"
    );

    Ok(Comparison {
        baseline: BarChart::knockdown(target, "Baseline", baseline_report),
        high_stimulus: BarChart::knockdown(target, &format!("High {stim_node}"), high_report),
        control,
        knockdown,
        stimulus,
        combined,
        extra_charts,
    })
}
