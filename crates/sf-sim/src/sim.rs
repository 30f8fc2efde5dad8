//! Integration driver: step-size control, sampling and result recording.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use sf_core::{Real, Tolerances, ensure_all_finite};
use tracing::{debug, trace};

use crate::bdf::{BdfStepper, StepOutcome};
use crate::error::{FailureReason, SimError, SimResult};
use crate::system::OdeSystem;
use crate::trajectory::Trajectory;

/// Largest ratio between consecutive step sizes (keeps variable-step BDF2 stable).
const MAX_STEP_RATIO: Real = 2.0;
/// Smallest factor a rejected step is shrunk by.
const MIN_SHRINK: Real = 0.2;
/// Shrink applied after a corrector failure.
const CORRECTOR_SHRINK: Real = 0.25;

/// Options for integration runs.
#[derive(Clone, Debug)]
pub struct IntegratorOptions {
    /// Step acceptance tolerances (absolute 1e-6, relative 0 by default)
    pub tolerances: Tolerances,
    /// First trial step; estimated from the initial slope when `None`
    pub initial_step: Option<Real>,
    /// Steps smaller than this abort the run
    pub min_step: Real,
    /// Upper bound on the step size
    pub max_step: Option<Real>,
    /// Maximum number of step attempts (safety limit)
    pub max_steps: usize,
    /// Newton iterations per corrector solve
    pub max_newton_iters: usize,
    /// Weighted norm of the Newton update that counts as converged
    pub newton_tol: Real,
    /// Relative perturbation for the finite-difference Jacobian
    pub jacobian_epsilon: Real,
    /// Safety factor for step-size proposals
    pub safety: Real,
}

impl Default for IntegratorOptions {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::default(),
            initial_step: None,
            min_step: 1e-12,
            max_step: None,
            max_steps: 500_000,
            max_newton_iters: 6,
            newton_tol: 0.05,
            jacobian_epsilon: 1.5e-8,
            safety: 0.9,
        }
    }
}

impl IntegratorOptions {
    fn validate(&self) -> SimResult<()> {
        let tol = self.tolerances;
        if !(tol.abs >= 0.0 && tol.rel >= 0.0) || (tol.abs == 0.0 && tol.rel == 0.0) {
            return Err(SimError::InvalidArg {
                what: "tolerances must be non-negative and not both zero",
            });
        }
        if !(self.min_step > 0.0) {
            return Err(SimError::InvalidArg {
                what: "min_step must be positive",
            });
        }
        if self.max_steps == 0 || self.max_newton_iters == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps and max_newton_iters must be positive",
            });
        }
        Ok(())
    }
}

/// Counters collected during a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntegrationStats {
    pub accepted_steps: usize,
    pub rejected_steps: usize,
    pub corrector_failures: usize,
    pub rhs_evals: usize,
    pub jacobian_evals: usize,
}

/// Sampled trajectory plus run counters.
#[derive(Clone, Debug)]
pub struct IntegrationOutput {
    pub trajectory: Trajectory,
    pub stats: IntegrationStats,
}

/// Progress report emitted after each recorded sample.
#[derive(Clone, Debug, Default)]
pub struct SimProgress {
    pub t: Real,
    pub t_end: Real,
    pub fraction_complete: Real,
    pub sample: usize,
    pub samples: usize,
    pub accepted_steps: usize,
}

/// Shared flag checked between steps; set it to stop a running integration.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// `samples + 1` uniformly spaced times covering `[t0, t1]`, both ends exact.
pub fn sample_times(t0: Real, t1: Real, samples: usize) -> Vec<Real> {
    if samples == 0 {
        return vec![t0];
    }
    let dt = (t1 - t0) / samples as Real;
    let mut times: Vec<Real> = (0..=samples).map(|k| t0 + k as Real * dt).collect();
    times[samples] = t1;
    times
}

/// Integrate `system` from `y0` over `[t0, t1]`, recording `samples + 1` points.
pub fn integrate<S: OdeSystem + ?Sized>(
    system: &S,
    y0: &[Real],
    t0: Real,
    t1: Real,
    samples: usize,
    opts: &IntegratorOptions,
    cancel: Option<&CancelFlag>,
) -> SimResult<IntegrationOutput> {
    integrate_with_progress(system, y0, t0, t1, samples, opts, cancel, None)
}

/// Like `integrate`, streaming a `SimProgress` after every recorded sample.
#[allow(clippy::too_many_arguments)]
pub fn integrate_with_progress<S: OdeSystem + ?Sized>(
    system: &S,
    y0: &[Real],
    t0: Real,
    t1: Real,
    samples: usize,
    opts: &IntegratorOptions,
    cancel: Option<&CancelFlag>,
    mut progress: Option<&mut dyn FnMut(SimProgress)>,
) -> SimResult<IntegrationOutput> {
    opts.validate()?;
    if !(t0.is_finite() && t1.is_finite() && t1 > t0) {
        return Err(SimError::InvalidArg {
            what: "time span must be finite with t1 > t0",
        });
    }
    if samples == 0 {
        return Err(SimError::InvalidArg {
            what: "samples must be positive",
        });
    }
    if y0.len() != system.dim() {
        return Err(SimError::InvalidArg {
            what: "initial state length must match system dimension",
        });
    }
    ensure_all_finite(y0, "initial state")?;

    let times = sample_times(t0, t1, samples);
    let mut trajectory = Trajectory::with_capacity(times.len());
    trajectory.push(t0, y0);

    let mut stepper = BdfStepper::new(
        system,
        t0,
        y0,
        opts.tolerances,
        opts.max_newton_iters,
        opts.newton_tol,
        opts.jacobian_epsilon,
    );

    let span = t1 - t0;
    let mut h = match opts.initial_step {
        Some(h0) if h0 > 0.0 => h0,
        _ => initial_step(system, t0, y0, opts.tolerances)?,
    }
    .min(span);
    if let Some(max) = opts.max_step {
        h = h.min(max);
    }
    let eps = 1e-12 * span.max(t1.abs()).max(1.0);

    let fail = |reason: FailureReason,
                stepper: &BdfStepper<'_, S>,
                trajectory: Trajectory|
     -> SimError {
        debug!(%reason, t = stepper.t(), "integration failed");
        SimError::IntegrationFailure {
            reason,
            t_last: stepper.t(),
            y_last: stepper.y().as_slice().to_vec(),
            partial: Box::new(trajectory),
        }
    };

    for (k, &target) in times.iter().enumerate().skip(1) {
        while target - stepper.t() > eps {
            if cancel.is_some_and(CancelFlag::is_cancelled) {
                return Err(SimError::Cancelled {
                    t_last: stepper.t(),
                });
            }
            let attempts = stepper.stats.accepted_steps + stepper.stats.rejected_steps;
            if attempts >= opts.max_steps {
                return Err(fail(FailureReason::MaxSteps, &stepper, trajectory));
            }

            let remaining = target - stepper.t();
            let mut h_try = h;
            if let Some(last) = stepper.last_step() {
                h_try = h_try.min(MAX_STEP_RATIO * last);
            }
            let clipped = h_try * 1.05 >= remaining;
            let t_new = if clipped {
                h_try = remaining;
                target
            } else {
                stepper.t() + h_try
            };

            match stepper.try_step(t_new)? {
                StepOutcome::Accepted { err, order } => {
                    let proposed = h_try * growth_factor(err, order, opts.safety);
                    h = if clipped { h.max(proposed) } else { proposed };
                }
                StepOutcome::Rejected { err, order } => {
                    trace!(t = stepper.t(), h = h_try, err, "step rejected");
                    h = h_try * growth_factor(err, order, opts.safety).min(opts.safety);
                }
                StepOutcome::CorrectorFailed(reason) => {
                    trace!(t = stepper.t(), h = h_try, %reason, "corrector failed");
                    stepper.stats.corrector_failures += 1;
                    h = h_try * CORRECTOR_SHRINK;
                    if h < opts.min_step {
                        return Err(fail(reason, &stepper, trajectory));
                    }
                }
            }
            if let Some(max) = opts.max_step {
                h = h.min(max);
            }
            if h < opts.min_step {
                return Err(fail(FailureReason::StepSizeUnderflow, &stepper, trajectory));
            }
        }

        trajectory.push(target, stepper.y().as_slice());

        if let Some(cb) = progress.as_deref_mut() {
            cb(SimProgress {
                t: target,
                t_end: t1,
                fraction_complete: (target - t0) / span,
                sample: k,
                samples,
                accepted_steps: stepper.stats.accepted_steps,
            });
        }
    }

    let stats = stepper.stats();
    debug!(
        accepted = stats.accepted_steps,
        rejected = stats.rejected_steps,
        rhs_evals = stats.rhs_evals,
        jacobians = stats.jacobian_evals,
        "integration finished"
    );
    Ok(IntegrationOutput { trajectory, stats })
}

fn growth_factor(err: Real, order: usize, safety: Real) -> Real {
    let raw = if err > 0.0 {
        safety * err.powf(-1.0 / (order as Real + 1.0))
    } else {
        MAX_STEP_RATIO
    };
    raw.clamp(MIN_SHRINK, MAX_STEP_RATIO)
}

/// Starting step from the size of the state and its initial slope.
fn initial_step<S: OdeSystem + ?Sized>(
    system: &S,
    t0: Real,
    y0: &[Real],
    tol: Tolerances,
) -> SimResult<Real> {
    let mut f0 = vec![0.0; y0.len()];
    system.rhs(t0, y0, &mut f0)?;
    let norm = |v: &[Real]| {
        v.iter()
            .zip(y0)
            .map(|(vi, yi)| vi.abs() / tol.scale(*yi))
            .fold(0.0, Real::max)
    };
    let d0 = norm(y0);
    let d1 = norm(&f0);
    if d0 < 1e-5 || d1 < 1e-5 || !d1.is_finite() {
        Ok(1e-6)
    } else {
        Ok(0.01 * d0 / d1)
    }
}
