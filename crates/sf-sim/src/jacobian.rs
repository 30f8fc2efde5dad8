//! Finite difference Jacobian of a right-hand side.

use nalgebra::{DMatrix, DVector};
use sf_core::Real;

use crate::error::SimResult;
use crate::system::OdeSystem;

/// Forward-difference Jacobian `df/dy` at `(t, y)` given `f0 = f(t, y)`.
///
/// For each column j, perturbs y[j] by `epsilon * max(|y[j]|, 1)`.
pub fn finite_difference_jacobian<S: OdeSystem + ?Sized>(
    system: &S,
    t: Real,
    y: &DVector<Real>,
    f0: &DVector<Real>,
    epsilon: Real,
) -> SimResult<DMatrix<Real>> {
    let n = y.len();
    let mut jac = DMatrix::zeros(n, n);
    let mut y_perturbed = y.clone();
    let mut f_perturbed = DVector::zeros(n);

    for j in 0..n {
        let dy = epsilon * y[j].abs().max(1.0);
        y_perturbed[j] = y[j] + dy;
        system.rhs(t, y_perturbed.as_slice(), f_perturbed.as_mut_slice())?;
        y_perturbed[j] = y[j];

        for i in 0..n {
            jac[(i, j)] = (f_perturbed[i] - f0[i]) / dy;
        }
    }

    Ok(jac)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Linear;

    impl OdeSystem for Linear {
        fn dim(&self) -> usize {
            2
        }

        fn rhs(&self, _t: Real, y: &[Real], dydt: &mut [Real]) -> SimResult<()> {
            dydt[0] = -2.0 * y[0] + y[1];
            dydt[1] = 3.0 * y[0];
            Ok(())
        }
    }

    #[test]
    fn jacobian_linear() {
        let y = DVector::from_vec(vec![0.3, 0.7]);
        let mut f0 = DVector::zeros(2);
        Linear.rhs(0.0, y.as_slice(), f0.as_mut_slice()).unwrap();
        let jac = finite_difference_jacobian(&Linear, 0.0, &y, &f0, 1e-8).unwrap();
        assert!((jac[(0, 0)] + 2.0).abs() < 1e-6);
        assert!((jac[(0, 1)] - 1.0).abs() < 1e-6);
        assert!((jac[(1, 0)] - 3.0).abs() < 1e-6);
        assert!(jac[(1, 1)].abs() < 1e-6);
    }
}
