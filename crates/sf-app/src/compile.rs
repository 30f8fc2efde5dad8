//! Compile a project's network definition into a `NetworkModel`.

use std::collections::HashMap;
use std::sync::Arc;

use sf_network::{KineticParams, NetworkBuilder, NetworkModel, Polarity};
use sf_project::parse_rule;
use sf_project::schema::NetworkDef;
use tracing::debug;

use crate::error::{AppError, AppResult};

pub fn compile_network(def: &NetworkDef) -> AppResult<NetworkModel> {
    let mut builder = NetworkBuilder::new();
    let mut ids = HashMap::new();
    for node in &def.nodes {
        ids.insert(node.name.as_str(), builder.add_node(node.name.as_str()));
    }

    for reaction in &def.reactions {
        let rule = parse_rule(&reaction.rule).map_err(|e| AppError::Compile(e.to_string()))?;
        let lookup = |name: &str| {
            ids.get(name)
                .copied()
                .ok_or_else(|| AppError::Compile(format!("Node not found: {name} in '{}'", reaction.rule)))
        };
        let product = lookup(&rule.product)?;
        let reactants = rule
            .reactants
            .iter()
            .map(|term| {
                let polarity = if term.inhibiting {
                    Polarity::Inhibiting
                } else {
                    Polarity::Activating
                };
                lookup(&term.node).map(|id| (id, polarity))
            })
            .collect::<AppResult<Vec<_>>>()?;
        builder.add_reaction(&reactants, product);
    }

    let topology = Arc::new(builder.build()?);

    let d = def.defaults;
    let params = KineticParams {
        tau: def.nodes.iter().map(|n| n.tau.unwrap_or(d.tau)).collect(),
        ymax: def.nodes.iter().map(|n| n.ymax.unwrap_or(d.ymax)).collect(),
        y0: def.nodes.iter().map(|n| n.y0.unwrap_or(d.y0)).collect(),
        w: def.reactions.iter().map(|r| r.w.unwrap_or(d.w)).collect(),
        n: def.reactions.iter().map(|r| r.n.unwrap_or(d.n)).collect(),
        ec50: def.reactions.iter().map(|r| r.ec50.unwrap_or(d.ec50)).collect(),
    };

    let model = NetworkModel::new(topology, params)?;
    debug!(
        nodes = model.node_count(),
        reactions = model.reaction_count(),
        "compiled network"
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_project::schema::{NodeDef, ParamDefaults, ReactionDef};

    fn def() -> NetworkDef {
        NetworkDef {
            defaults: ParamDefaults::default(),
            nodes: vec![
                NodeDef::named("TGFB"),
                NodeDef {
                    tau: Some(3.0),
                    ..NodeDef::named("smad3")
                },
                NodeDef::named("smad7"),
            ],
            reactions: vec![
                ReactionDef {
                    w: Some(0.25),
                    ..ReactionDef::rule("=> TGFB")
                },
                ReactionDef::rule("TGFB & !smad7 => smad3"),
                ReactionDef::rule("smad3 => smad7"),
            ],
        }
    }

    #[test]
    fn compiles_rules_and_defaults() {
        let model = compile_network(&def()).unwrap();
        assert_eq!(model.names().collect::<Vec<_>>(), vec!["TGFB", "smad3", "smad7"]);
        assert_eq!(model.tau(), &[1.0, 3.0, 1.0]);
        assert_eq!(model.w(), &[0.25, 1.0, 1.0]);
        assert_eq!(model.n(), &[1.4, 1.4, 1.4]);

        let r = &model.reactions()[1];
        assert_eq!(r.reactants.len(), 2);
        assert_eq!(r.reactants[1].polarity, Polarity::Inhibiting);
        assert!(model.reactions()[0].is_input());
    }

    #[test]
    fn unknown_node_in_rule_fails() {
        let mut d = def();
        d.reactions.push(ReactionDef::rule("ghost => smad7"));
        assert!(matches!(compile_network(&d), Err(AppError::Compile(_))));
    }
}
