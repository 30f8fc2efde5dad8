//! The network vector field.

use sf_core::Real;
use sf_network::{NetworkModel, Polarity};
use sf_sim::{OdeSystem, SimResult};
use tracing::warn;

use crate::hill::{HillCurve, HillForm};
use crate::logic::{LogicKind, LogicRule};

/// Strategy choices for evaluating a model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KineticsOptions {
    pub hill: HillForm,
    pub logic: LogicKind,
}

#[derive(Debug, Clone)]
struct CompiledReaction {
    weight: Real,
    /// Negative weight inverts the reaction's effect on its product.
    inverted: bool,
    curve: HillCurve,
    /// `(node position, inhibiting)` per reactant; empty for input reactions.
    reactants: Vec<(usize, bool)>,
}

/// `dy/dt` of a `NetworkModel`, with per-reaction Hill constants precomputed.
///
/// Pure: evaluation reads only its arguments and the captured parameters.
pub struct VectorField {
    tau: Vec<Real>,
    ymax: Vec<Real>,
    reactions: Vec<CompiledReaction>,
    producer_offsets: Vec<usize>,
    producers: Vec<usize>,
    max_reactants: usize,
    logic: &'static dyn LogicRule,
}

impl VectorField {
    pub fn new(model: &NetworkModel, options: KineticsOptions) -> Self {
        let topology = model.topology();
        let (w, n, ec50) = (model.w(), model.n(), model.ec50());

        let reactions: Vec<CompiledReaction> = model
            .reactions()
            .iter()
            .map(|reaction| {
                let r = reaction.id.pos();
                let curve = HillCurve::new(options.hill, n[r], ec50[r]);
                if curve.form() != options.hill && !reaction.is_input() {
                    warn!(
                        reaction = r,
                        n = n[r],
                        ec50 = ec50[r],
                        "EC50^n >= 0.5, normalized Hill form undefined; using standard form"
                    );
                }
                CompiledReaction {
                    weight: w[r].abs(),
                    inverted: w[r] < 0.0,
                    curve,
                    reactants: reaction
                        .reactants
                        .iter()
                        .map(|re| (re.node.pos(), re.polarity == Polarity::Inhibiting))
                        .collect(),
                }
            })
            .collect();

        let mut producer_offsets = Vec::with_capacity(model.node_count() + 1);
        let mut producers = Vec::with_capacity(reactions.len());
        producer_offsets.push(0);
        for node in topology.nodes() {
            producers.extend(topology.producers(node.id).iter().map(|r| r.pos()));
            producer_offsets.push(producers.len());
        }

        Self {
            tau: model.tau().to_vec(),
            ymax: model.ymax().to_vec(),
            max_reactants: reactions.iter().map(|r| r.reactants.len()).max().unwrap_or(0),
            reactions,
            producer_offsets,
            producers,
            logic: options.logic.rule(),
        }
    }

    fn reaction_value(&self, reaction: &CompiledReaction, y: &[Real], terms: &mut Vec<Real>) -> Real {
        if reaction.reactants.is_empty() {
            return reaction.weight;
        }
        terms.clear();
        terms.extend(reaction.reactants.iter().map(|&(node, inhibiting)| {
            let act = reaction.curve.eval(y[node]);
            if inhibiting { 1.0 - act } else { act }
        }));
        let value = self.logic.and(reaction.weight, terms);
        if reaction.inverted {
            reaction.weight - value
        } else {
            value
        }
    }

    /// Combined activation `Act_i(y)` for every node.
    pub fn activation(&self, y: &[Real], out: &mut [Real]) {
        let mut terms = Vec::with_capacity(self.max_reactants);
        for (i, act) in out.iter_mut().enumerate() {
            let producers = &self.producers[self.producer_offsets[i]..self.producer_offsets[i + 1]];
            *act = producers.iter().fold(0.0, |acc, &r| {
                let value = self.reaction_value(&self.reactions[r], y, &mut terms);
                self.logic.or(acc, value)
            });
        }
    }

    /// Writes `(Act_i * ymax_i - y_i) / tau_i` into `dydt`.
    pub fn derivative(&self, y: &[Real], dydt: &mut [Real]) {
        self.activation(y, dydt);
        for (i, d) in dydt.iter_mut().enumerate() {
            *d = (*d * self.ymax[i] - y[i]) / self.tau[i];
        }
    }
}

impl OdeSystem for VectorField {
    fn dim(&self) -> usize {
        self.tau.len()
    }

    fn rhs(&self, _t: Real, y: &[Real], dydt: &mut [Real]) -> SimResult<()> {
        self.derivative(y, dydt);
        Ok(())
    }
}
