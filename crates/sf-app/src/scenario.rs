//! Scenario runner: one model, one optional perturbation, one integration.

use sf_core::{Real, Tolerances};
use sf_kinetics::{KineticsOptions, VectorField};
use sf_network::{NetworkModel, PerturbationSpec};
use sf_project::ScenarioConfig;
use sf_results::ActivityMap;
use sf_sim::{CancelFlag, IntegrationStats, IntegratorOptions, Trajectory, integrate_with_progress};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::progress::{ProgressEvent, ProgressSink, Stage, emit};

/// Sampling, kinetics and solver settings for scenario runs.
#[derive(Debug, Clone)]
pub struct ScenarioSettings {
    pub samples_per_unit_time: Real,
    pub max_samples: usize,
    pub kinetics: KineticsOptions,
    pub integrator: IntegratorOptions,
}

impl Default for ScenarioSettings {
    fn default() -> Self {
        Self::from_config(&ScenarioConfig::default())
    }
}

impl ScenarioSettings {
    pub fn from_config(config: &ScenarioConfig) -> Self {
        Self {
            samples_per_unit_time: config.samples_per_unit_time,
            max_samples: config.max_samples,
            kinetics: config.kinetics,
            integrator: IntegratorOptions {
                tolerances: Tolerances {
                    abs: config.atol,
                    rel: config.rtol,
                },
                ..IntegratorOptions::default()
            },
        }
    }

    /// `clamp(ceil(horizon * density), 1, max_samples)`.
    pub fn sample_count(&self, horizon: Real) -> usize {
        let raw = (horizon * self.samples_per_unit_time).ceil();
        if raw.is_finite() && raw >= 1.0 {
            (raw.min(self.max_samples as Real) as usize).max(1)
        } else {
            1
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Trajectory,
    ValueAt(Real),
}

pub struct ScenarioRequest<'a> {
    pub label: &'a str,
    pub model: &'a NetworkModel,
    pub perturbation: Option<&'a PerturbationSpec>,
    pub horizon: Real,
    pub output: OutputMode,
}

#[derive(Debug, Clone)]
pub enum ScenarioOutput {
    Trajectory(Trajectory),
    Activity(ActivityMap),
}

#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub output: ScenarioOutput,
    pub stats: IntegrationStats,
}

/// Integrate `model` over `[0, horizon]` at the configured sampling density.
pub fn simulate(
    model: &NetworkModel,
    horizon: Real,
    settings: &ScenarioSettings,
    cancel: Option<&CancelFlag>,
    progress: &mut ProgressSink<'_>,
    label: &str,
) -> AppResult<(Trajectory, IntegrationStats)> {
    if !(horizon.is_finite() && horizon > 0.0) {
        return Err(AppError::InvalidInput(format!(
            "horizon must be positive, got {horizon}"
        )));
    }
    let samples = settings.sample_count(horizon);
    let field = VectorField::new(model, settings.kinetics);
    debug!(scenario = label, horizon, samples, "integrating");

    let mut forward = |p| {
        emit(progress, || ProgressEvent {
            scenario: label.to_string(),
            stage: Stage::Integrating,
            integration: Some(p),
        })
    };
    let out = integrate_with_progress(
        &field,
        model.y0(),
        0.0,
        horizon,
        samples,
        &settings.integrator,
        cancel,
        Some(&mut forward),
    )?;
    Ok((out.trajectory, out.stats))
}

/// Sample index for time `t`: the last sample at or before `t`.
///
/// Fails with `OutOfRange` when `t` lies outside `[0, horizon]` or before the
/// first step.
pub fn sample_index(trajectory: &Trajectory, horizon: Real, t: Real) -> AppResult<usize> {
    let steps = trajectory.len().saturating_sub(1).max(1);
    let step = horizon / steps as Real;
    let slack = 1e-9 * horizon;
    let out_of_range = || AppError::OutOfRange { t, step, horizon };
    if !t.is_finite() || t < step - slack || t > horizon + slack {
        return Err(out_of_range());
    }
    trajectory
        .index_at_or_before(t, slack)
        .ok_or_else(out_of_range)
}

/// Reject a snapshot time that no trajectory over `[0, horizon]` can serve:
/// `t` must lie in `[step, horizon]` for the configured sampling.
pub fn check_time_point(horizon: Real, t: Real, settings: &ScenarioSettings) -> AppResult<()> {
    if !(horizon.is_finite() && horizon > 0.0) {
        return Err(AppError::InvalidInput(format!(
            "horizon must be positive, got {horizon}"
        )));
    }
    let step = horizon / settings.sample_count(horizon) as Real;
    let slack = 1e-9 * horizon;
    if !t.is_finite() || t < step - slack || t > horizon + slack {
        return Err(AppError::OutOfRange { t, step, horizon });
    }
    Ok(())
}

/// Activity of every node at time `t`.
pub fn activity_at(
    model: &NetworkModel,
    trajectory: &Trajectory,
    horizon: Real,
    t: Real,
) -> AppResult<ActivityMap> {
    let index = sample_index(trajectory, horizon, t)?;
    Ok(ActivityMap::from_state(model.names(), &trajectory.y[index])?)
}

/// Derive the scenario's model, integrate it and shape the output.
pub fn run_scenario(
    request: &ScenarioRequest<'_>,
    settings: &ScenarioSettings,
    cancel: Option<&CancelFlag>,
    mut progress: ProgressSink<'_>,
) -> AppResult<ScenarioResult> {
    let label = request.label;
    emit(&mut progress, || ProgressEvent::stage(label, Stage::Deriving));
    let derived;
    let model = match request.perturbation {
        Some(spec) => {
            derived = spec.apply(request.model)?;
            &derived
        }
        None => request.model,
    };

    if let OutputMode::ValueAt(t) = request.output {
        check_time_point(request.horizon, t, settings)?;
    }

    let (trajectory, stats) = simulate(model, request.horizon, settings, cancel, &mut progress, label)?;

    let output = match request.output {
        OutputMode::Trajectory => ScenarioOutput::Trajectory(trajectory),
        OutputMode::ValueAt(t) => {
            emit(&mut progress, || ProgressEvent::stage(label, Stage::Extracting));
            ScenarioOutput::Activity(activity_at(model, &trajectory, request.horizon, t)?)
        }
    };
    emit(&mut progress, || ProgressEvent::stage(label, Stage::Completed));
    debug!(
        scenario = label,
        accepted = stats.accepted_steps,
        rejected = stats.rejected_steps,
        "scenario finished"
    );
    Ok(ScenarioResult { output, stats })
}

/// Shorthand for an activity snapshot at `t` on `[0, horizon]`.
pub fn snapshot(
    label: &str,
    model: &NetworkModel,
    perturbation: Option<&PerturbationSpec>,
    horizon: Real,
    t: Real,
    settings: &ScenarioSettings,
    cancel: Option<&CancelFlag>,
) -> AppResult<ActivityMap> {
    let request = ScenarioRequest {
        label,
        model,
        perturbation,
        horizon,
        output: OutputMode::ValueAt(t),
    };
    match run_scenario(&request, settings, cancel, None)?.output {
        ScenarioOutput::Activity(map) => Ok(map),
        ScenarioOutput::Trajectory(_) => Err(AppError::InvalidInput(
            "snapshot produced a trajectory".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_count_follows_density_and_clamps() {
        let s = ScenarioSettings::default();
        assert_eq!(s.sample_count(10.0), 150);
        assert_eq!(s.sample_count(100.0), 1500);
        assert_eq!(s.sample_count(0.01), 1);
        assert_eq!(s.sample_count(1e6), 20_000);
        assert_eq!(s.sample_count(0.1), 2);
    }

    #[test]
    fn time_point_must_follow_first_step() {
        let s = ScenarioSettings::default();
        assert!(check_time_point(10.0, 10.0, &s).is_ok());
        assert!(check_time_point(10.0, 10.0 / 150.0, &s).is_ok());
        for t in [0.0, 0.05, 10.5, Real::NAN] {
            assert!(matches!(
                check_time_point(10.0, t, &s),
                Err(AppError::OutOfRange { .. })
            ));
        }
        assert!(matches!(
            check_time_point(-1.0, 0.5, &s),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn sample_index_bounds() {
        let traj = Trajectory {
            t: vec![0.0, 0.5, 1.0],
            y: vec![vec![0.0]; 3],
        };
        assert_eq!(sample_index(&traj, 1.0, 1.0).unwrap(), 2);
        assert_eq!(sample_index(&traj, 1.0, 0.5).unwrap(), 1);
        assert_eq!(sample_index(&traj, 1.0, 0.75).unwrap(), 1);
        assert_eq!(sample_index(&traj, 1.0, 0.5 - 1e-12).unwrap(), 1);
        assert!(matches!(
            sample_index(&traj, 1.0, 0.2),
            Err(AppError::OutOfRange { .. })
        ));
        assert!(sample_index(&traj, 1.0, 1.5).is_err());
        assert!(sample_index(&traj, 1.0, -0.1).is_err());
        assert!(sample_index(&traj, 1.0, Real::NAN).is_err());
    }
}
