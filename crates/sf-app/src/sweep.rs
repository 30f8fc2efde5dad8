//! Batch sweep: one snapshot per parameter row over a fixed topology.

use rayon::prelude::*;
use sf_network::{KineticParams, NetworkModel};
use sf_project::{ParameterRow, ParsedRow, ScenarioConfig};
use sf_results::{ActivityMap, ResultTable};
use sf_sim::{CancelFlag, SimError};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::progress::{ProgressEvent, ProgressSink, Stage, emit};
use crate::scenario::{ScenarioSettings, check_time_point, snapshot};

#[derive(Debug, Clone)]
pub struct SweepOptions {
    pub horizon: f64,
    pub time_point: f64,
    pub settings: ScenarioSettings,
    /// Run rows on the rayon thread pool
    pub parallel: bool,
}

impl SweepOptions {
    pub fn from_config(config: &ScenarioConfig) -> Self {
        Self {
            horizon: config.horizon,
            time_point: config.snapshot_time(),
            settings: ScenarioSettings::from_config(config),
            parallel: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SweepRow {
    /// Position of the row in the input table
    pub source_index: usize,
    pub activity: ActivityMap,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProblemKind {
    /// Missing columns, unparsable numbers, or values the network rejects
    MalformedRow(String),
    IntegrationFailure(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowProblem {
    pub source_index: usize,
    pub kind: ProblemKind,
}

#[derive(Debug, Clone, Default)]
pub struct SweepOutcome {
    /// One entry per valid row, in input order
    pub rows: Vec<SweepRow>,
    pub problems: Vec<RowProblem>,
    /// Rows without `TAU` data
    pub skipped: Vec<usize>,
}

impl SweepOutcome {
    /// One table row per result, columns in network order.
    pub fn to_table(&self, model: &NetworkModel) -> AppResult<ResultTable> {
        let mut table = ResultTable::new(model.names().map(str::to_string).collect());
        for row in &self.rows {
            table.push_activity(format!("row {}", row.source_index), &row.activity)?;
        }
        Ok(table)
    }
}

pub fn params_from_row(row: ParsedRow) -> KineticParams {
    KineticParams {
        tau: row.tau,
        ymax: row.ymax,
        y0: row.y0,
        w: row.w,
        n: row.n,
        ec50: row.ec50,
    }
}

enum Prepared {
    Skip,
    Problem(RowProblem),
    Ready(usize, NetworkModel),
}

fn prepare(base: &NetworkModel, source_index: usize, row: &ParameterRow) -> Prepared {
    let malformed = |reason: String| {
        warn!(row = source_index, %reason, "skipping malformed row");
        Prepared::Problem(RowProblem {
            source_index,
            kind: ProblemKind::MalformedRow(reason),
        })
    };
    match row.parse() {
        Ok(None) => {
            debug!(row = source_index, "no TAU data, skipping row");
            Prepared::Skip
        }
        Err(err) => malformed(err.to_string()),
        Ok(Some(parsed)) => match base.with_params(params_from_row(parsed)) {
            Ok(model) => Prepared::Ready(source_index, model),
            Err(err) => malformed(err.to_string()),
        },
    }
}

/// Run every row of `rows` against `base`'s topology.
///
/// Bad rows never abort the sweep; they are reported in `problems`. A time
/// point outside the sampled range fails before any row runs. Cancellation
/// aborts the whole sweep.
pub fn run_sweep(
    base: &NetworkModel,
    rows: &[ParameterRow],
    options: &SweepOptions,
    cancel: Option<&CancelFlag>,
    mut progress: ProgressSink<'_>,
) -> AppResult<SweepOutcome> {
    check_time_point(options.horizon, options.time_point, &options.settings)?;

    let mut outcome = SweepOutcome::default();
    let mut jobs = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        match prepare(base, i, row) {
            Prepared::Skip => outcome.skipped.push(i),
            Prepared::Problem(p) => outcome.problems.push(p),
            Prepared::Ready(i, model) => jobs.push((i, model)),
        }
    }
    info!(
        rows = rows.len(),
        runnable = jobs.len(),
        parallel = options.parallel,
        "starting sweep"
    );

    let run = |(i, model): &(usize, NetworkModel)| {
        let label = format!("row {i}");
        let result = snapshot(
            &label,
            model,
            None,
            options.horizon,
            options.time_point,
            &options.settings,
            cancel,
        );
        (*i, result)
    };
    let results: Vec<(usize, AppResult<ActivityMap>)> = if options.parallel {
        jobs.par_iter().map(run).collect()
    } else {
        jobs.iter().map(run).collect()
    };

    for (source_index, result) in results {
        match result {
            Ok(activity) => outcome.rows.push(SweepRow {
                source_index,
                activity,
            }),
            Err(
                err @ AppError::Simulation(
                    SimError::IntegrationFailure { .. } | SimError::Rhs { .. },
                ),
            ) => {
                warn!(row = source_index, error = %err, "row failed");
                outcome.problems.push(RowProblem {
                    source_index,
                    kind: ProblemKind::IntegrationFailure(err.to_string()),
                });
            }
            Err(err) => return Err(err),
        }
        emit(&mut progress, || {
            ProgressEvent::stage(&format!("row {source_index}"), Stage::Completed)
        });
    }
    outcome.problems.sort_by_key(|p| p.source_index);

    info!(
        completed = outcome.rows.len(),
        problems = outcome.problems.len(),
        skipped = outcome.skipped.len(),
        "sweep finished"
    );
    Ok(outcome)
}
