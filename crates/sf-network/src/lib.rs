//! sf-network: network model layer for signalflow.
//!
//! Provides:
//! - Topology (node names + fixed reaction list), built incrementally and validated
//! - Per-node and per-reaction kinetic parameters
//! - Immutable `NetworkModel` pairing the two
//! - Copy-on-derive perturbations (knockdown, stimulus override, combined)
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use sf_network::{KineticParams, NetworkBuilder, NetworkModel, Polarity, perturb};
//!
//! let mut builder = NetworkBuilder::new();
//! let a = builder.add_node("A");
//! let b = builder.add_node("B");
//! builder.add_input(a);
//! builder.add_reaction(&[(a, Polarity::Activating)], b);
//! let topology = Arc::new(builder.build().unwrap());
//!
//! let params = KineticParams::uniform(&topology, 1.0, 1.0, 0.0, 1.0, 1.4, 0.5);
//! let model = NetworkModel::new(topology, params).unwrap();
//! let kd = perturb::knockdown(&model, "A", 1.0).unwrap();
//!
//! assert_eq!(kd.ymax()[a.pos()], 0.0);
//! assert_eq!(model.ymax()[a.pos()], 1.0);
//! ```

pub mod builder;
pub mod error;
pub mod model;
pub mod perturb;
pub mod topology;
pub(crate) mod validate;

pub use builder::NetworkBuilder;
pub use error::{NetworkError, NetworkResult};
pub use model::{KineticParams, NetworkModel};
pub use perturb::{PerturbationKind, PerturbationSpec};
pub use topology::{Node, Polarity, Reactant, Reaction, Topology};
