//! Network structure: node names and the fixed reaction list.

use std::collections::HashMap;

use sf_core::{NodeId, ReactionId};

/// How a reactant acts on its reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    /// Activity of the reactant drives the reaction.
    Activating,
    /// Activity of the reactant suppresses the reaction.
    Inhibiting,
}

/// A modeled entity. Its id is also its position in every per-node array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
}

/// One input of a reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reactant {
    pub node: NodeId,
    pub polarity: Polarity,
}

/// A directed influence from zero or more reactants onto a product node.
///
/// Reactants combine with AND. A reaction without reactants is an input
/// reaction whose weight is the external drive level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub id: ReactionId,
    pub reactants: Vec<Reactant>,
    pub product: NodeId,
}

impl Reaction {
    pub fn is_input(&self) -> bool {
        self.reactants.is_empty()
    }
}

/// Validated, immutable network structure.
///
/// Reactions producing the same node combine with OR; the producer lists are
/// stored compactly: node i's reactions are
/// `producers[producer_offsets[i]..producer_offsets[i + 1]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    pub(crate) nodes: Vec<Node>,
    pub(crate) reactions: Vec<Reaction>,
    pub(crate) name_index: HashMap<String, NodeId>,
    pub(crate) producer_offsets: Vec<usize>,
    pub(crate) producers: Vec<ReactionId>,
}

impl Topology {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn reaction_count(&self) -> usize {
        self.reactions.len()
    }

    /// Node names in index order.
    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.nodes.iter().map(|n| n.name.as_str())
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.name_index.get(name).copied()
    }

    /// Reactions whose product is `node`.
    pub fn producers(&self, node: NodeId) -> &[ReactionId] {
        let idx = node.pos();
        if idx + 1 >= self.producer_offsets.len() {
            return &[];
        }
        &self.producers[self.producer_offsets[idx]..self.producer_offsets[idx + 1]]
    }

    /// Input reactions (no reactants) whose product is `node`.
    pub fn input_reactions(&self, node: NodeId) -> impl Iterator<Item = ReactionId> + '_ {
        self.producers(node)
            .iter()
            .copied()
            .filter(|r| self.reactions[r.pos()].is_input())
    }
}
