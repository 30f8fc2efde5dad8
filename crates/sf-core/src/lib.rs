//! sf-core: stable foundation for signalflow.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - ids (typed node/reaction positions)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;

pub use error::{SfError, SfResult};
pub use ids::*;
pub use numeric::*;
