//! Time integration for signalflow networks.
//!
//! Provides:
//! - `OdeSystem` trait for pluggable right-hand sides
//! - Adaptive variable-step BDF integrator (orders 1-2) with Newton corrector
//! - Uniformly sampled `Trajectory` output
//! - Cooperative cancellation and per-sample progress reporting

pub mod bdf;
pub mod error;
pub mod jacobian;
pub mod sim;
pub mod system;
pub mod trajectory;

pub use error::{FailureReason, SimError, SimResult};
pub use sim::{
    CancelFlag, IntegrationOutput, IntegrationStats, IntegratorOptions, SimProgress, integrate,
    integrate_with_progress, sample_times,
};
pub use system::OdeSystem;
pub use trajectory::Trajectory;
