//! Integration tests for the adaptive BDF driver.

use sf_core::Real;
use sf_sim::{
    CancelFlag, FailureReason, IntegratorOptions, OdeSystem, SimError, SimProgress, SimResult,
    integrate, integrate_with_progress,
};

/// dy/dt = (target - y) / tau for each component.
struct Relaxation {
    target: Vec<Real>,
    tau: Vec<Real>,
}

impl OdeSystem for Relaxation {
    fn dim(&self) -> usize {
        self.target.len()
    }

    fn rhs(&self, _t: Real, y: &[Real], dydt: &mut [Real]) -> SimResult<()> {
        for i in 0..y.len() {
            dydt[i] = (self.target[i] - y[i]) / self.tau[i];
        }
        Ok(())
    }
}

struct Exploding;

impl OdeSystem for Exploding {
    fn dim(&self) -> usize {
        1
    }

    fn rhs(&self, _t: Real, y: &[Real], dydt: &mut [Real]) -> SimResult<()> {
        dydt[0] = y[0] * y[0];
        Ok(())
    }
}

#[test]
fn relaxation_matches_exponential() {
    let system = Relaxation {
        target: vec![1.0, 0.0],
        tau: vec![1.0, 2.0],
    };
    let out = integrate(
        &system,
        &[0.0, 1.0],
        0.0,
        5.0,
        75,
        &IntegratorOptions::default(),
        None,
    )
    .expect("relaxation should integrate");

    let traj = &out.trajectory;
    assert_eq!(traj.len(), 76);
    for (t, y) in traj.t.iter().zip(&traj.y) {
        let a = 1.0 - (-t).exp();
        let b = (-t / 2.0).exp();
        assert!((y[0] - a).abs() < 1e-3, "t={t}: {} vs {a}", y[0]);
        assert!((y[1] - b).abs() < 1e-3, "t={t}: {} vs {b}", y[1]);
    }
}

#[test]
fn samples_are_increasing_and_start_at_initial_state() {
    let system = Relaxation {
        target: vec![0.3],
        tau: vec![0.5],
    };
    let out = integrate(&system, &[0.8], 0.0, 2.0, 30, &Default::default(), None)
        .expect("integration should succeed");

    let traj = out.trajectory;
    assert_eq!(traj.t[0], 0.0);
    assert_eq!(traj.y[0], vec![0.8]);
    assert_eq!(traj.final_time(), Some(2.0));
    assert!(traj.t.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn stiff_time_scales_take_few_steps() {
    let system = Relaxation {
        target: vec![1.0, 1.0],
        tau: vec![1e-4, 10.0],
    };
    let out = integrate(
        &system,
        &[0.0, 0.0],
        0.0,
        20.0,
        300,
        &IntegratorOptions::default(),
        None,
    )
    .expect("stiff system should integrate");

    assert!(
        out.stats.accepted_steps < 2000,
        "too many steps: {}",
        out.stats.accepted_steps
    );
    let y = out.trajectory.final_state().expect("non-empty");
    assert!((y[0] - 1.0).abs() < 1e-3);
    assert!((y[1] - (1.0 - (-2.0_f64).exp())).abs() < 1e-3);
}

#[test]
fn progress_reports_every_sample() {
    let system = Relaxation {
        target: vec![1.0],
        tau: vec![1.0],
    };
    let mut seen: Vec<SimProgress> = Vec::new();
    let mut on_progress = |p: SimProgress| seen.push(p);
    integrate_with_progress(
        &system,
        &[0.0],
        0.0,
        1.0,
        10,
        &IntegratorOptions::default(),
        None,
        Some(&mut on_progress),
    )
    .expect("integration should succeed");

    assert_eq!(seen.len(), 10);
    assert_eq!(seen.last().map(|p| p.fraction_complete), Some(1.0));
    assert!(seen.windows(2).all(|w| w[1].t > w[0].t));
}

#[test]
fn cancelled_run_stops() {
    let system = Relaxation {
        target: vec![1.0],
        tau: vec![1.0],
    };
    let flag = CancelFlag::new();
    flag.cancel();
    let err = integrate(
        &system,
        &[0.0],
        0.0,
        1.0,
        10,
        &IntegratorOptions::default(),
        Some(&flag),
    )
    .unwrap_err();
    assert!(matches!(err, SimError::Cancelled { t_last } if t_last == 0.0));
}

#[test]
fn blow_up_reports_partial_trajectory() {
    // y' = y^2 with y(0) = 1 blows up at t = 1.
    let err = integrate(
        &Exploding,
        &[1.0],
        0.0,
        2.0,
        20,
        &IntegratorOptions::default(),
        None,
    )
    .unwrap_err();

    match err {
        SimError::IntegrationFailure {
            reason,
            t_last,
            partial,
            ..
        } => {
            assert_ne!(reason, FailureReason::MaxSteps);
            assert!(t_last < 1.1);
            assert!(!partial.is_empty());
            assert!(partial.final_time().is_some_and(|t| t <= t_last));
        }
        other => panic!("expected integration failure, got {other:?}"),
    }
}

#[test]
fn invalid_arguments_rejected() {
    let system = Relaxation {
        target: vec![1.0],
        tau: vec![1.0],
    };
    let opts = IntegratorOptions::default();
    assert!(matches!(
        integrate(&system, &[0.0], 1.0, 1.0, 10, &opts, None),
        Err(SimError::InvalidArg { .. })
    ));
    assert!(matches!(
        integrate(&system, &[0.0, 1.0], 0.0, 1.0, 10, &opts, None),
        Err(SimError::InvalidArg { .. })
    ));
    assert!(matches!(
        integrate(&system, &[0.0], 0.0, 1.0, 0, &opts, None),
        Err(SimError::InvalidArg { .. })
    ));
    assert!(integrate(&system, &[Real::NAN], 0.0, 1.0, 10, &opts, None).is_err());
}
