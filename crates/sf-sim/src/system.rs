//! OdeSystem trait for pluggable right-hand sides.

use sf_core::Real;

use crate::error::SimResult;

/// A first-order system `dy/dt = f(t, y)` of fixed dimension.
///
/// `rhs` must be pure: the integrator evaluates it at trial states that may
/// lie outside the physical domain (Newton iterates, Jacobian perturbations).
pub trait OdeSystem {
    /// Number of state variables.
    fn dim(&self) -> usize;

    /// Write `f(t, y)` into `dydt` (same length as `y`).
    fn rhs(&self, t: Real, y: &[Real], dydt: &mut [Real]) -> SimResult<()>;
}

impl<S: OdeSystem + ?Sized> OdeSystem for &S {
    fn dim(&self) -> usize {
        (**self).dim()
    }

    fn rhs(&self, t: Real, y: &[Real], dydt: &mut [Real]) -> SimResult<()> {
        (**self).rhs(t, y, dydt)
    }
}
