//! Error types for the sf-app service layer.

use sf_core::Real;
use sf_network::NetworkError;
use sf_sim::SimError;

/// Unified error for front ends. Network and simulation errors stay typed so
/// callers can react to `UnknownNode` or inspect a partial trajectory.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Network compilation failed: {0}")]
    Compile(String),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Simulation(#[from] SimError),

    #[error("Time {t} is outside the sampled range (step {step}, horizon {horizon})")]
    OutOfRange { t: Real, step: Real, horizon: Real },

    #[error("Results error: {0}")]
    Results(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sf-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<sf_project::ProjectError> for AppError {
    fn from(err: sf_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<sf_project::ValidationError> for AppError {
    fn from(err: sf_project::ValidationError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<sf_results::ResultsError> for AppError {
    fn from(err: sf_results::ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}

impl AppError {
    pub fn is_unknown_node(&self) -> bool {
        matches!(self, AppError::Network(NetworkError::UnknownNode { .. }))
    }
}
