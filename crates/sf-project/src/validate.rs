//! Project validation logic.

use std::collections::HashSet;

use crate::rule::{RuleError, parse_rule};
use crate::schema::{LATEST_VERSION, NetworkDef, ParamDefaults, Project, ScenarioConfig};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate node name: {name}")]
    DuplicateName { name: String },

    #[error("Missing reference: {name} in {context}")]
    MissingReference { name: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: f64,
        reason: &'static str,
    },

    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error("Network has no nodes")]
    EmptyNetwork,

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn check(
    field: impl FnOnce() -> String,
    value: f64,
    ok: bool,
    reason: &'static str,
) -> Result<(), ValidationError> {
    if value.is_finite() && ok {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: field(),
            value,
            reason,
        })
    }
}

fn check_tau(field: impl FnOnce() -> String, v: f64) -> Result<(), ValidationError> {
    check(field, v, v > 0.0, "must be positive")
}

fn check_n(field: impl FnOnce() -> String, v: f64) -> Result<(), ValidationError> {
    check(field, v, v > 0.0, "must be positive")
}

fn check_ec50(field: impl FnOnce() -> String, v: f64) -> Result<(), ValidationError> {
    check(field, v, v > 0.0 && v < 1.0, "must lie in (0, 1)")
}

fn check_finite(field: impl FnOnce() -> String, v: f64) -> Result<(), ValidationError> {
    check(field, v, true, "must be finite")
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }
    validate_network(&project.network)?;
    validate_scenario(&project.scenario)
}

fn validate_defaults(d: &ParamDefaults) -> Result<(), ValidationError> {
    check_tau(|| "defaults.tau".into(), d.tau)?;
    check_finite(|| "defaults.ymax".into(), d.ymax)?;
    check_finite(|| "defaults.y0".into(), d.y0)?;
    check_finite(|| "defaults.w".into(), d.w)?;
    check_n(|| "defaults.n".into(), d.n)?;
    check_ec50(|| "defaults.ec50".into(), d.ec50)
}

pub fn validate_network(network: &NetworkDef) -> Result<(), ValidationError> {
    if network.nodes.is_empty() {
        return Err(ValidationError::EmptyNetwork);
    }
    validate_defaults(&network.defaults)?;

    let mut names = HashSet::new();
    for node in &network.nodes {
        if !names.insert(node.name.as_str()) {
            return Err(ValidationError::DuplicateName {
                name: node.name.clone(),
            });
        }
        if let Some(tau) = node.tau {
            check_tau(|| format!("{}.tau", node.name), tau)?;
        }
        if let Some(ymax) = node.ymax {
            check_finite(|| format!("{}.ymax", node.name), ymax)?;
        }
        if let Some(y0) = node.y0 {
            check_finite(|| format!("{}.y0", node.name), y0)?;
        }
    }

    for (i, reaction) in network.reactions.iter().enumerate() {
        let rule = parse_rule(&reaction.rule)?;
        let referenced = rule
            .reactants
            .iter()
            .map(|t| t.node.as_str())
            .chain(std::iter::once(rule.product.as_str()));
        for name in referenced {
            if !names.contains(name) {
                return Err(ValidationError::MissingReference {
                    name: name.to_string(),
                    context: format!("reaction {i} ('{}')", reaction.rule),
                });
            }
        }
        if let Some(w) = reaction.w {
            check_finite(|| format!("reaction {i}.w"), w)?;
        }
        if let Some(n) = reaction.n {
            check_n(|| format!("reaction {i}.n"), n)?;
        }
        if let Some(ec50) = reaction.ec50 {
            check_ec50(|| format!("reaction {i}.ec50"), ec50)?;
        }
    }
    Ok(())
}

pub fn validate_scenario(scenario: &ScenarioConfig) -> Result<(), ValidationError> {
    let h = scenario.horizon;
    check(|| "scenario.horizon".into(), h, h > 0.0, "must be positive")?;
    if let Some(t) = scenario.time_point {
        check(|| "scenario.time_point".into(), t, (0.0..=h).contains(&t), "must lie in [0, horizon]")?;
    }
    let s = scenario.samples_per_unit_time;
    check(|| "scenario.samples_per_unit_time".into(), s, s > 0.0, "must be positive")?;
    if scenario.max_samples == 0 {
        return Err(ValidationError::InvalidValue {
            field: "scenario.max_samples".into(),
            value: 0.0,
            reason: "must be positive",
        });
    }
    let f = scenario.knockdown_fraction;
    check(|| "scenario.knockdown_fraction".into(), f, (0.0..=1.0).contains(&f), "must lie in [0, 1]")?;
    let level = scenario.stimulus_level;
    check(|| "scenario.stimulus_level".into(), level, level >= 0.0, "must be non-negative")?;
    let (atol, rtol) = (scenario.atol, scenario.rtol);
    check(|| "scenario.atol".into(), atol, atol >= 0.0, "must be non-negative")?;
    check(|| "scenario.rtol".into(), rtol, rtol >= 0.0, "must be non-negative")?;
    if atol == 0.0 && rtol == 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "scenario.atol".into(),
            value: atol,
            reason: "atol and rtol cannot both be zero",
        });
    }
    Ok(())
}
