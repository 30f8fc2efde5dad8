//! Variable-step BDF stepper (orders 1 and 2).
//!
//! The corrector solves `y - psi - gamma*h*f(t+h, y) = 0` with Newton
//! iterations on `I - gamma*h*J`, `J` a finite-difference Jacobian taken at
//! the predicted state. The local error is estimated from the
//! predictor/corrector difference scaled by `h / (t_{n+1} - t_{n-k})`.

use std::collections::VecDeque;

use nalgebra::{DMatrix, DVector};
use sf_core::{Real, Tolerances};

use crate::error::{FailureReason, SimResult};
use crate::jacobian::finite_difference_jacobian;
use crate::sim::IntegrationStats;
use crate::system::OdeSystem;

/// Points kept for prediction: order 2 needs three.
const HISTORY_LEN: usize = 3;

/// Result of one step attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Step taken; `err` is the weighted error norm (<= 1).
    Accepted { err: Real, order: usize },
    /// Error test failed; state unchanged.
    Rejected { err: Real, order: usize },
    /// Corrector did not converge; state unchanged.
    CorrectorFailed(FailureReason),
}

pub struct BdfStepper<'a, S: OdeSystem + ?Sized> {
    system: &'a S,
    tol: Tolerances,
    max_newton_iters: usize,
    newton_tol: Real,
    jacobian_epsilon: Real,
    history: VecDeque<(Real, DVector<Real>)>,
    f_start: Option<DVector<Real>>,
    pub(crate) stats: IntegrationStats,
}

impl<'a, S: OdeSystem + ?Sized> BdfStepper<'a, S> {
    pub fn new(
        system: &'a S,
        t0: Real,
        y0: &[Real],
        tol: Tolerances,
        max_newton_iters: usize,
        newton_tol: Real,
        jacobian_epsilon: Real,
    ) -> Self {
        let mut history = VecDeque::with_capacity(HISTORY_LEN);
        history.push_back((t0, DVector::from_column_slice(y0)));
        Self {
            system,
            tol,
            max_newton_iters,
            newton_tol,
            jacobian_epsilon,
            history,
            f_start: None,
            stats: IntegrationStats::default(),
        }
    }

    fn newest(&self) -> &(Real, DVector<Real>) {
        // history is never empty: seeded in `new`, only trimmed from the front
        &self.history[self.history.len() - 1]
    }

    pub fn t(&self) -> Real {
        self.newest().0
    }

    pub fn y(&self) -> &DVector<Real> {
        &self.newest().1
    }

    /// Length of the last accepted step.
    pub fn last_step(&self) -> Option<Real> {
        let len = self.history.len();
        (len >= 2).then(|| self.history[len - 1].0 - self.history[len - 2].0)
    }

    /// Order the next step will use.
    pub fn order(&self) -> usize {
        if self.history.len() >= HISTORY_LEN { 2 } else { 1 }
    }

    pub fn stats(&self) -> IntegrationStats {
        self.stats
    }

    /// `max_i |v_i| / (abs + rel*|y_i|)` against the newest accepted state.
    pub fn weighted_norm(&self, v: &DVector<Real>) -> Real {
        v.iter()
            .zip(self.y().iter())
            .map(|(vi, yi)| vi.abs() / self.tol.scale(*yi))
            .fold(0.0, Real::max)
    }

    fn eval(&mut self, t: Real, y: &DVector<Real>, out: &mut DVector<Real>) -> SimResult<()> {
        self.stats.rhs_evals += 1;
        self.system.rhs(t, y.as_slice(), out.as_mut_slice())
    }

    /// Extrapolate the history to `t_new`.
    fn predict(&mut self, t_new: Real) -> SimResult<DVector<Real>> {
        let len = self.history.len();
        let (tn, yn) = self.newest().clone();
        match len {
            1 => {
                let f = match self.f_start.take() {
                    Some(f) => f,
                    None => {
                        let mut f = DVector::zeros(yn.len());
                        self.eval(tn, &yn, &mut f)?;
                        f
                    }
                };
                let yp = &yn + &f * (t_new - tn);
                self.f_start = Some(f);
                Ok(yp)
            }
            2 => {
                let (tm1, ym1) = &self.history[0];
                let ratio = (t_new - tn) / (tn - tm1);
                Ok(&yn + (&yn - ym1) * ratio)
            }
            _ => {
                let (t0, y0) = &self.history[len - 3];
                let (t1, y1) = &self.history[len - 2];
                let t2 = tn;
                let l0 = (t_new - t1) * (t_new - t2) / ((t0 - t1) * (t0 - t2));
                let l1 = (t_new - t0) * (t_new - t2) / ((t1 - t0) * (t1 - t2));
                let l2 = (t_new - t0) * (t_new - t1) / ((t2 - t0) * (t2 - t1));
                Ok(y0 * l0 + y1 * l1 + &yn * l2)
            }
        }
    }

    /// History part `psi` and coefficient `gamma` of the BDF formula.
    fn formula(&self, order: usize, h: Real) -> (DVector<Real>, Real) {
        let len = self.history.len();
        let (tn, yn) = &self.history[len - 1];
        if order < 2 {
            return (yn.clone(), 1.0);
        }
        let (tm1, ym1) = &self.history[len - 2];
        let omega = h / (tn - tm1);
        let denom = 1.0 + 2.0 * omega;
        let psi = (yn * (1.0 + omega).powi(2) - ym1 * omega.powi(2)) / denom;
        (psi, (1.0 + omega) / denom)
    }

    /// Scale applied to `|y_corr - y_pred|` to estimate the local error.
    fn error_factor(&self, t_new: Real) -> Real {
        let len = self.history.len();
        let h = t_new - self.t();
        match len {
            1 => 0.5,
            2 => h / (t_new - self.history[0].0),
            _ => h / (t_new - self.history[len - 3].0),
        }
    }

    /// Attempt a step to `t_new`. Accepted steps advance the history.
    pub fn try_step(&mut self, t_new: Real) -> SimResult<StepOutcome> {
        let order = self.order();
        let h = t_new - self.t();
        let yp = self.predict(t_new)?;
        let (psi, gamma) = self.formula(order, h);
        let n = yp.len();

        let mut y = yp.clone();
        let mut f = DVector::zeros(n);
        self.eval(t_new, &y, &mut f)?;
        if f.iter().any(|v| !v.is_finite()) {
            return Ok(StepOutcome::CorrectorFailed(FailureReason::NonFinite));
        }

        let jac =
            finite_difference_jacobian(self.system, t_new, &y, &f, self.jacobian_epsilon)?;
        self.stats.jacobian_evals += 1;
        self.stats.rhs_evals += n;

        let iteration = DMatrix::identity(n, n) - jac * (gamma * h);
        let lu = iteration.lu();

        let mut converged = false;
        let mut prev_norm = Real::INFINITY;
        for iter in 0..self.max_newton_iters {
            if iter > 0 {
                self.eval(t_new, &y, &mut f)?;
            }
            let residual = &y - &psi - &f * (gamma * h);
            let Some(delta) = lu.solve(&(-residual)) else {
                return Ok(StepOutcome::CorrectorFailed(FailureReason::SingularMatrix));
            };
            y += &delta;
            if y.iter().any(|v| !v.is_finite()) {
                return Ok(StepOutcome::CorrectorFailed(FailureReason::NonFinite));
            }

            let norm = self.weighted_norm(&delta);
            if norm <= self.newton_tol {
                converged = true;
                break;
            }
            if iter > 0 && norm > 2.0 * prev_norm {
                break;
            }
            prev_norm = norm;
        }
        if !converged {
            return Ok(StepOutcome::CorrectorFailed(FailureReason::NewtonDivergence));
        }

        let err = self.error_factor(t_new) * self.weighted_norm(&(&y - &yp));
        if err <= 1.0 {
            self.history.push_back((t_new, y));
            if self.history.len() > HISTORY_LEN {
                self.history.pop_front();
            }
            self.f_start = None;
            self.stats.accepted_steps += 1;
            Ok(StepOutcome::Accepted { err, order })
        } else {
            self.stats.rejected_steps += 1;
            Ok(StepOutcome::Rejected { err, order })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimResult;

    /// dy/dt = -y
    struct Decay;

    impl OdeSystem for Decay {
        fn dim(&self) -> usize {
            1
        }

        fn rhs(&self, _t: Real, y: &[Real], dydt: &mut [Real]) -> SimResult<()> {
            dydt[0] = -y[0];
            Ok(())
        }
    }

    fn stepper(system: &Decay) -> BdfStepper<'_, Decay> {
        BdfStepper::new(system, 0.0, &[1.0], Tolerances::default(), 6, 0.05, 1e-8)
    }

    #[test]
    fn order_rises_after_two_steps() {
        let system = Decay;
        let mut s = stepper(&system);
        assert_eq!(s.order(), 1);
        assert!(matches!(s.try_step(1e-4).unwrap(), StepOutcome::Accepted { order: 1, .. }));
        assert!(matches!(s.try_step(2e-4).unwrap(), StepOutcome::Accepted { order: 1, .. }));
        assert_eq!(s.order(), 2);
        assert!(matches!(s.try_step(3e-4).unwrap(), StepOutcome::Accepted { order: 2, .. }));
        assert!((s.y()[0] - (-3e-4_f64).exp()).abs() < 1e-7);
        assert_eq!(s.last_step().map(|h| (h - 1e-4).abs() < 1e-15), Some(true));
    }

    #[test]
    fn huge_step_is_rejected_without_moving() {
        let system = Decay;
        let mut s = stepper(&system);
        let outcome = s.try_step(1.0).unwrap();
        assert!(matches!(outcome, StepOutcome::Rejected { .. }));
        assert_eq!(s.t(), 0.0);
        assert_eq!(s.y()[0], 1.0);
    }
}
