//! AND/OR combination rules.

use sf_core::Real;

/// How reactant responses combine within a reaction (AND) and how reactions
/// sharing a product combine (OR).
pub trait LogicRule: Send + Sync {
    /// Combine normalized reactant terms (each in `[0, 1]`) and scale by `weight >= 0`.
    fn and(&self, weight: Real, terms: &[Real]) -> Real;

    /// Fold one more reaction value into the accumulated activation.
    fn or(&self, acc: Real, value: Real) -> Real;

    fn name(&self) -> &'static str;
}

/// Netflux rules: AND multiplies, OR is the probabilistic union `a + b - ab`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetfluxLogic;

impl LogicRule for NetfluxLogic {
    fn and(&self, weight: Real, terms: &[Real]) -> Real {
        weight * terms.iter().product::<Real>()
    }

    fn or(&self, acc: Real, value: Real) -> Real {
        acc + value - acc * value
    }

    fn name(&self) -> &'static str {
        "netflux"
    }
}

/// Fuzzy-logic rules: AND is the minimum, OR the maximum.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinMaxLogic;

impl LogicRule for MinMaxLogic {
    fn and(&self, weight: Real, terms: &[Real]) -> Real {
        weight * terms.iter().copied().fold(1.0, Real::min)
    }

    fn or(&self, acc: Real, value: Real) -> Real {
        acc.max(value)
    }

    fn name(&self) -> &'static str {
        "min_max"
    }
}

/// Selectable rule, for configuration files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LogicKind {
    #[default]
    Netflux,
    MinMax,
}

impl LogicKind {
    pub fn rule(self) -> &'static dyn LogicRule {
        match self {
            Self::Netflux => &NetfluxLogic,
            Self::MinMax => &MinMaxLogic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn netflux_rules() {
        let r = NetfluxLogic;
        assert!((r.and(0.5, &[0.5, 0.4]) - 0.1).abs() < 1e-15);
        assert!((r.or(0.5, 0.5) - 0.75).abs() < 1e-15);
        assert_eq!(r.or(0.0, 0.3), 0.3);
    }

    #[test]
    fn min_max_rules() {
        let r = MinMaxLogic;
        assert_eq!(r.and(1.0, &[0.5, 0.4]), 0.4);
        assert_eq!(r.or(0.2, 0.7), 0.7);
    }

    #[test]
    fn kind_resolves_rule() {
        assert_eq!(LogicKind::default().rule().name(), "netflux");
        assert_eq!(LogicKind::MinMax.rule().name(), "min_max");
    }
}
