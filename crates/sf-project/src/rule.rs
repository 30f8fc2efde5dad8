//! Reaction rule notation: `[reactant (& reactant)*] => product`.
//!
//! A reactant prefixed with `!` is inhibiting. An empty left-hand side
//! declares an input reaction.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTerm {
    pub node: String,
    pub inhibiting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub reactants: Vec<RuleTerm>,
    pub product: String,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid rule '{rule}': {reason}")]
pub struct RuleError {
    pub rule: String,
    pub reason: &'static str,
}

fn is_name(s: &str) -> bool {
    !s.is_empty() && !s.contains(['&', '!', '=', '>']) && !s.contains(char::is_whitespace)
}

pub fn parse_rule(rule: &str) -> Result<Rule, RuleError> {
    let err = |reason| RuleError {
        rule: rule.to_string(),
        reason,
    };

    let (lhs, rhs) = rule.split_once("=>").ok_or_else(|| err("missing '=>'"))?;
    let product = rhs.trim();
    if !is_name(product) {
        return Err(err("product must be a single node name"));
    }

    let lhs = lhs.trim();
    let mut reactants = Vec::new();
    if !lhs.is_empty() {
        for term in lhs.split('&') {
            let term = term.trim();
            let (node, inhibiting) = match term.strip_prefix('!') {
                Some(rest) => (rest.trim(), true),
                None => (term, false),
            };
            if !is_name(node) {
                return Err(err("reactants must be node names joined by '&'"));
            }
            reactants.push(RuleTerm {
                node: node.to_string(),
                inhibiting,
            });
        }
    }

    Ok(Rule {
        reactants,
        product: product.to_string(),
    })
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.reactants.iter().enumerate() {
            if i > 0 {
                write!(f, " & ")?;
            }
            if term.inhibiting {
                write!(f, "!")?;
            }
            write!(f, "{}", term.node)?;
            if i + 1 == self.reactants.len() {
                write!(f, " ")?;
            }
        }
        write!(f, "=> {}", self.product)
    }
}
