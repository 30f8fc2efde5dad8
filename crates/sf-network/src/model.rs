//! Kinetic parameters and the immutable network model.

use std::sync::Arc;

use sf_core::{NodeId, Real, ensure_len};

use crate::error::{NetworkError, NetworkResult};
use crate::topology::{Reaction, Topology};

/// Per-node and per-reaction parameters, index-aligned with a `Topology`.
///
/// Per node: `tau` (time constant), `ymax` (saturation ceiling), `y0`
/// (initial activity). Per reaction: `w` (weight, signed), `n` (Hill
/// coefficient), `ec50` (half-max activity).
#[derive(Debug, Clone, PartialEq)]
pub struct KineticParams {
    pub tau: Vec<Real>,
    pub ymax: Vec<Real>,
    pub y0: Vec<Real>,
    pub w: Vec<Real>,
    pub n: Vec<Real>,
    pub ec50: Vec<Real>,
}

impl KineticParams {
    /// Same value for every node / reaction of `topology`.
    pub fn uniform(
        topology: &Topology,
        tau: Real,
        ymax: Real,
        y0: Real,
        w: Real,
        n: Real,
        ec50: Real,
    ) -> Self {
        let nodes = topology.node_count();
        let reactions = topology.reaction_count();
        Self {
            tau: vec![tau; nodes],
            ymax: vec![ymax; nodes],
            y0: vec![y0; nodes],
            w: vec![w; reactions],
            n: vec![n; reactions],
            ec50: vec![ec50; reactions],
        }
    }

    /// Check lengths and value domains against a topology.
    pub fn validate(&self, topology: &Topology) -> NetworkResult<()> {
        let nodes = topology.node_count();
        let reactions = topology.reaction_count();
        ensure_len(&self.tau, nodes, "tau")?;
        ensure_len(&self.ymax, nodes, "ymax")?;
        ensure_len(&self.y0, nodes, "y0")?;
        ensure_len(&self.w, reactions, "w")?;
        ensure_len(&self.n, reactions, "n")?;
        ensure_len(&self.ec50, reactions, "ec50")?;

        check_each(&self.tau, "tau", |v| v > 0.0, "must be positive")?;
        check_each(&self.ymax, "ymax", |_| true, "")?;
        check_each(&self.y0, "y0", |_| true, "")?;
        check_each(&self.w, "w", |_| true, "")?;
        check_each(&self.n, "n", |v| v > 0.0, "must be positive")?;
        check_each(&self.ec50, "ec50", |v| v > 0.0 && v < 1.0, "must lie in (0, 1)")?;

        // Input drives must be non-negative.
        for (index, reaction) in topology.reactions().iter().enumerate() {
            let value = self.w[index];
            if reaction.is_input() && value < 0.0 {
                return Err(NetworkError::InvalidParameter {
                    what: "w",
                    index,
                    value,
                    reason: "input weight must be non-negative",
                });
            }
        }
        Ok(())
    }
}

fn check_each(
    values: &[Real],
    what: &'static str,
    ok: impl Fn(Real) -> bool,
    reason: &'static str,
) -> NetworkResult<()> {
    for (index, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(NetworkError::InvalidParameter {
                what,
                index,
                value,
                reason: "non-finite",
            });
        }
        if !ok(value) {
            return Err(NetworkError::InvalidParameter {
                what,
                index,
                value,
                reason,
            });
        }
    }
    Ok(())
}

/// A topology paired with a validated parameter set.
///
/// Immutable once constructed: perturbations and batch rows produce new
/// models. The topology is shared, parameters are owned.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkModel {
    topology: Arc<Topology>,
    params: KineticParams,
}

impl NetworkModel {
    pub fn new(topology: Arc<Topology>, params: KineticParams) -> NetworkResult<Self> {
        params.validate(&topology)?;
        Ok(Self { topology, params })
    }

    /// Same topology, different parameters (e.g. one batch row).
    pub fn with_params(&self, params: KineticParams) -> NetworkResult<Self> {
        Self::new(Arc::clone(&self.topology), params)
    }

    /// Copy the parameters, let `edit` rewrite them, and validate the result.
    pub(crate) fn derive(
        &self,
        edit: impl FnOnce(&Topology, &mut KineticParams) -> NetworkResult<()>,
    ) -> NetworkResult<Self> {
        let mut params = self.params.clone();
        edit(&self.topology, &mut params)?;
        self.with_params(params)
    }

    pub fn topology(&self) -> &Arc<Topology> {
        &self.topology
    }

    pub fn params(&self) -> &KineticParams {
        &self.params
    }

    pub fn node_count(&self) -> usize {
        self.topology.node_count()
    }

    pub fn reaction_count(&self) -> usize {
        self.topology.reaction_count()
    }

    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.topology.names()
    }

    pub fn reactions(&self) -> &[Reaction] {
        self.topology.reactions()
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.topology.node_id(name)
    }

    /// Resolve a name or fail with `UnknownNode`.
    pub fn require_node(&self, name: &str) -> NetworkResult<NodeId> {
        self.node_id(name).ok_or_else(|| NetworkError::UnknownNode {
            name: name.to_string(),
        })
    }

    pub fn tau(&self) -> &[Real] {
        &self.params.tau
    }

    pub fn ymax(&self) -> &[Real] {
        &self.params.ymax
    }

    pub fn y0(&self) -> &[Real] {
        &self.params.y0
    }

    pub fn w(&self) -> &[Real] {
        &self.params.w
    }

    pub fn n(&self) -> &[Real] {
        &self.params.n
    }

    pub fn ec50(&self) -> &[Real] {
        &self.params.ec50
    }
}
