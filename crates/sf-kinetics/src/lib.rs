//! sf-kinetics: activation kinetics for signalflow networks.
//!
//! Turns a `NetworkModel` into the vector field
//! `dy_i/dt = (Act_i(y) * ymax_i - y_i) / tau_i`, where `Act_i` combines the
//! Hill responses of node i's producing reactions. The Hill form and the
//! AND/OR combination rule are pluggable.

pub mod field;
pub mod hill;
pub mod logic;

pub use field::{KineticsOptions, VectorField};
pub use hill::{HillCurve, HillForm};
pub use logic::{LogicKind, LogicRule, MinMaxLogic, NetfluxLogic};
