//! Structural validation of a topology.

use std::collections::HashSet;

use crate::error::{NetworkError, NetworkResult};
use crate::topology::{Node, Reaction};

pub(crate) fn validate_structure(nodes: &[Node], reactions: &[Reaction]) -> NetworkResult<()> {
    if nodes.is_empty() {
        return Err(NetworkError::Empty);
    }

    let mut names = HashSet::with_capacity(nodes.len());
    for node in nodes {
        if node.name.trim().is_empty() {
            return Err(NetworkError::EmptyName { node: node.id });
        }
        if !names.insert(node.name.as_str()) {
            return Err(NetworkError::DuplicateName {
                name: node.name.clone(),
            });
        }
    }

    for reaction in reactions {
        if reaction.product.pos() >= nodes.len() {
            return Err(NetworkError::InvalidNodeRef {
                reaction: reaction.id,
                node: reaction.product,
            });
        }

        let mut seen = HashSet::new();
        for reactant in &reaction.reactants {
            if reactant.node.pos() >= nodes.len() {
                return Err(NetworkError::InvalidNodeRef {
                    reaction: reaction.id,
                    node: reactant.node,
                });
            }
            if !seen.insert(reactant.node) {
                return Err(NetworkError::DuplicateReactant {
                    reaction: reaction.id,
                    node: reactant.node,
                });
            }
        }
    }

    Ok(())
}
