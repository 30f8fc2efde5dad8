//! Error types for simulation operations.

use std::fmt;

use sf_core::{Real, SfError};
use thiserror::Error;

use crate::trajectory::Trajectory;

/// Why the integrator could not advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// Step size fell below the configured minimum.
    StepSizeUnderflow,
    /// Newton corrector kept diverging.
    NewtonDivergence,
    /// Iteration matrix could not be factorized.
    SingularMatrix,
    /// Right-hand side or state became NaN/inf.
    NonFinite,
    /// Step budget exhausted.
    MaxSteps,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StepSizeUnderflow => write!(f, "step size underflow"),
            Self::NewtonDivergence => write!(f, "Newton corrector diverged"),
            Self::SingularMatrix => write!(f, "singular iteration matrix"),
            Self::NonFinite => write!(f, "non-finite state"),
            Self::MaxSteps => write!(f, "maximum step count reached"),
        }
    }
}

/// Errors encountered during time integration.
#[derive(Error, Debug, Clone)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// The solver could not advance. Carries the last accepted time/state
    /// and every sample recorded before the failure.
    #[error("Integration failed at t = {t_last}: {reason}")]
    IntegrationFailure {
        reason: FailureReason,
        t_last: Real,
        y_last: Vec<Real>,
        partial: Box<Trajectory>,
    },

    #[error("Integration cancelled at t = {t_last}")]
    Cancelled { t_last: Real },

    #[error("Right-hand side error: {message}")]
    Rhs { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<SfError> for SimError {
    fn from(e: SfError) -> Self {
        SimError::Rhs {
            message: e.to_string(),
        }
    }
}
