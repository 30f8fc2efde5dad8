//! Perturbations deriving a new model from a base model.
//!
//! Every operation copies the base parameters, rewrites entries for the
//! targeted node and returns a new `NetworkModel`; the base is never touched.
//! Unknown node names are always an error.

use sf_core::Real;
use tracing::debug;

use crate::error::{NetworkError, NetworkResult};
use crate::model::NetworkModel;

/// Scale the target's `ymax` and `y0` by `1 - fraction`.
///
/// `fraction = 1` pins the node at zero activity, removing its influence on
/// downstream reactions. Outgoing weights are left alone so that a lost
/// inhibitor releases its targets instead of vanishing from the network.
pub fn knockdown(model: &NetworkModel, name: &str, fraction: Real) -> NetworkResult<NetworkModel> {
    if !(0.0..=1.0).contains(&fraction) {
        return Err(NetworkError::InvalidFraction { value: fraction });
    }
    let node = model.require_node(name)?;
    debug!(node = name, fraction, "deriving knockdown");

    model.derive(|_, params| {
        let keep = 1.0 - fraction;
        params.ymax[node.pos()] *= keep;
        params.y0[node.pos()] *= keep;
        Ok(())
    })
}

/// Set the weight of every input reaction producing `name` to `level`.
///
/// `level` must be finite and non-negative.
pub fn stimulus_override(
    model: &NetworkModel,
    name: &str,
    level: Real,
) -> NetworkResult<NetworkModel> {
    if !(level.is_finite() && level >= 0.0) {
        return Err(NetworkError::InvalidLevel { value: level });
    }
    let node = model.require_node(name)?;
    debug!(node = name, level, "deriving stimulus override");

    model.derive(|topology, params| {
        let mut driven = false;
        for reaction in topology.input_reactions(node) {
            params.w[reaction.pos()] = level;
            driven = true;
        }
        if driven {
            Ok(())
        } else {
            Err(NetworkError::NotADriver {
                name: name.to_string(),
            })
        }
    })
}

/// Knockdown followed by stimulus override on the same node.
pub fn combined(
    model: &NetworkModel,
    name: &str,
    fraction: Real,
    level: Real,
) -> NetworkResult<NetworkModel> {
    combined_with(model, name, fraction, name, level)
}

/// Knock down `knockdown_name`, then drive `stimulus_name` at `level`.
///
/// The order is fixed: knockdown first, then stimulus override.
pub fn combined_with(
    model: &NetworkModel,
    knockdown_name: &str,
    fraction: Real,
    stimulus_name: &str,
    level: Real,
) -> NetworkResult<NetworkModel> {
    let knocked = knockdown(model, knockdown_name, fraction)?;
    stimulus_override(&knocked, stimulus_name, level)
}

/// What to do to the target node.
#[derive(Debug, Clone, PartialEq)]
pub enum PerturbationKind {
    Knockdown {
        fraction: Real,
    },
    StimulusOverride {
        level: Real,
    },
    /// Knockdown of the target, then a stimulus on `stimulus_target`
    /// (the target itself when `None`).
    Combined {
        fraction: Real,
        level: Real,
        stimulus_target: Option<String>,
    },
}

/// A named perturbation of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct PerturbationSpec {
    pub target: String,
    pub kind: PerturbationKind,
}

impl PerturbationSpec {
    pub fn knockdown(target: impl Into<String>, fraction: Real) -> Self {
        Self {
            target: target.into(),
            kind: PerturbationKind::Knockdown { fraction },
        }
    }

    pub fn stimulus(target: impl Into<String>, level: Real) -> Self {
        Self {
            target: target.into(),
            kind: PerturbationKind::StimulusOverride { level },
        }
    }

    pub fn combined(
        target: impl Into<String>,
        fraction: Real,
        stimulus_target: impl Into<String>,
        level: Real,
    ) -> Self {
        Self {
            target: target.into(),
            kind: PerturbationKind::Combined {
                fraction,
                level,
                stimulus_target: Some(stimulus_target.into()),
            },
        }
    }

    /// Derive the perturbed model.
    pub fn apply(&self, model: &NetworkModel) -> NetworkResult<NetworkModel> {
        match &self.kind {
            PerturbationKind::Knockdown { fraction } => knockdown(model, &self.target, *fraction),
            PerturbationKind::StimulusOverride { level } => {
                stimulus_override(model, &self.target, *level)
            }
            PerturbationKind::Combined {
                fraction,
                level,
                stimulus_target,
            } => combined_with(
                model,
                &self.target,
                *fraction,
                stimulus_target.as_deref().unwrap_or(&self.target),
                *level,
            ),
        }
    }
}
