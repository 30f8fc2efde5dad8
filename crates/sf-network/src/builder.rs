//! Incremental network builder.

use std::collections::HashMap;

use sf_core::{NodeId, ReactionId};

use crate::error::NetworkResult;
use crate::topology::{Node, Polarity, Reactant, Reaction, Topology};
use crate::validate;

/// Builder for constructing a topology incrementally.
///
/// Use `add_node`, `add_input` and `add_reaction` to build up the network,
/// then call `build()` to validate and freeze it into an immutable `Topology`.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    nodes: Vec<Node>,
    reactions: Vec<Reaction>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its ID. Names are checked for uniqueness in `build`.
    pub fn add_node(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId::from_index(self.nodes.len() as u32);
        self.nodes.push(Node {
            id,
            name: name.into(),
        });
        id
    }

    /// Add an input reaction (`=> product`).
    pub fn add_input(&mut self, product: NodeId) -> ReactionId {
        self.add_reaction(&[], product)
    }

    /// Add a reaction `reactants => product`; reactants combine with AND.
    pub fn add_reaction(&mut self, reactants: &[(NodeId, Polarity)], product: NodeId) -> ReactionId {
        let id = ReactionId::from_index(self.reactions.len() as u32);
        self.reactions.push(Reaction {
            id,
            reactants: reactants
                .iter()
                .map(|&(node, polarity)| Reactant { node, polarity })
                .collect(),
            product,
        });
        id
    }

    /// Look up a node added earlier by name.
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.name == name).map(|n| n.id)
    }

    /// Validate and freeze.
    pub fn build(self) -> NetworkResult<Topology> {
        validate::validate_structure(&self.nodes, &self.reactions)?;

        let name_index: HashMap<String, NodeId> =
            self.nodes.iter().map(|n| (n.name.clone(), n.id)).collect();
        let (producer_offsets, producers) = Self::build_producers(&self.nodes, &self.reactions);

        Ok(Topology {
            nodes: self.nodes,
            reactions: self.reactions,
            name_index,
            producer_offsets,
            producers,
        })
    }

    /// Compact product adjacency: for each node, the reactions that produce it.
    fn build_producers(nodes: &[Node], reactions: &[Reaction]) -> (Vec<usize>, Vec<ReactionId>) {
        let mut per_node: Vec<Vec<ReactionId>> = vec![Vec::new(); nodes.len()];
        for reaction in reactions {
            per_node[reaction.product.pos()].push(reaction.id);
        }

        let mut offsets = Vec::with_capacity(nodes.len() + 1);
        let mut flat = Vec::with_capacity(reactions.len());
        offsets.push(0);
        for list in per_node {
            flat.extend(list);
            offsets.push(flat.len());
        }
        (offsets, flat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NetworkError;

    #[test]
    fn builder_basic() {
        let mut builder = NetworkBuilder::new();
        let a = builder.add_node("A");
        let b = builder.add_node("B");
        let r0 = builder.add_input(a);
        let r1 = builder.add_reaction(&[(a, Polarity::Activating)], b);

        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(r0.index(), 0);
        assert_eq!(r1.index(), 1);
        assert_eq!(builder.node_id("B"), Some(b));
    }

    #[test]
    fn build_producer_lists() {
        let mut builder = NetworkBuilder::new();
        let a = builder.add_node("A");
        let b = builder.add_node("B");
        let c = builder.add_node("C");
        let r0 = builder.add_input(a);
        let r1 = builder.add_reaction(&[(a, Polarity::Activating)], c);
        let r2 = builder.add_reaction(&[(b, Polarity::Inhibiting)], c);

        let topo = builder.build().unwrap();
        assert_eq!(topo.producers(a), &[r0]);
        assert!(topo.producers(b).is_empty());
        assert_eq!(topo.producers(c), &[r1, r2]);
        assert_eq!(topo.input_reactions(a).collect::<Vec<_>>(), vec![r0]);
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut builder = NetworkBuilder::new();
        builder.add_node("A");
        builder.add_node("A");
        assert_eq!(
            builder.build().unwrap_err(),
            NetworkError::DuplicateName {
                name: "A".to_string()
            }
        );
    }
}
