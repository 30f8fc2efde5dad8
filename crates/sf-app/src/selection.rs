//! Front-end selections: scenario mode and highlighted nodes.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use sf_network::{NetworkModel, PerturbationSpec};
use sf_project::ScenarioConfig;
use tracing::warn;

use crate::error::{AppError, AppResult};

/// Most nodes a user may highlight in one chart.
pub const MAX_HIGHLIGHTS: usize = 5;

/// Which parameter set a front-end run uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionMode {
    #[default]
    Regular,
    Knockdown,
    /// Knockdown of the target plus the configured stimulus.
    KnockdownStimulus,
    /// The configured stimulus only; the target is ignored.
    Stimulus,
}

impl SelectionMode {
    pub fn needs_target(self) -> bool {
        matches!(self, Self::Knockdown | Self::KnockdownStimulus)
    }

    /// The perturbation this mode applies, with defaults from `config`.
    pub fn perturbation(
        self,
        target: Option<&str>,
        fraction: Option<f64>,
        config: &ScenarioConfig,
    ) -> AppResult<Option<PerturbationSpec>> {
        let fraction = fraction.unwrap_or(config.knockdown_fraction);
        let target = || {
            target.map(str::trim).filter(|t| !t.is_empty()).ok_or_else(|| {
                AppError::InvalidInput(format!("mode '{self}' needs a target node"))
            })
        };
        Ok(match self {
            Self::Regular => None,
            Self::Knockdown => Some(PerturbationSpec::knockdown(target()?, fraction)),
            Self::KnockdownStimulus => Some(PerturbationSpec::combined(
                target()?,
                fraction,
                config.stimulus_node.as_str(),
                config.stimulus_level,
            )),
            Self::Stimulus => Some(PerturbationSpec::stimulus(
                config.stimulus_node.as_str(),
                config.stimulus_level,
            )),
        })
    }

    /// Chart title used for this mode.
    pub fn title(self, target: Option<&str>, config: &ScenarioConfig) -> String {
        let target = target.unwrap_or("?");
        let stim = &config.stimulus_node;
        match self {
            Self::Regular => "Regular Parameters".to_string(),
            Self::Knockdown => format!("Knocked Down {target}"),
            Self::KnockdownStimulus => format!("Knocked Down {target} and High {stim}"),
            Self::Stimulus => format!("High {stim}"),
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Regular => "reg",
            Self::Knockdown => "kd",
            Self::KnockdownStimulus => "kdhigh",
            Self::Stimulus => "high",
        };
        f.write_str(s)
    }
}

impl FromStr for SelectionMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reg" | "regular" | "" => Ok(Self::Regular),
            "kd" | "knockdown" => Ok(Self::Knockdown),
            "kdhigh" | "knockdown-stimulus" => Ok(Self::KnockdownStimulus),
            "high" | "stimulus" => Ok(Self::Stimulus),
            other => Err(AppError::InvalidInput(format!(
                "unknown mode '{other}' (expected reg, kd, kdhigh or high)"
            ))),
        }
    }
}

/// Result of cleaning a highlight list against a network.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlights {
    /// Known names, first occurrence order
    pub valid: Vec<String>,
    /// Names not in the network
    pub unknown: Vec<String>,
    /// Entries beyond `MAX_HIGHLIGHTS` after cleanup
    pub dropped: Vec<String>,
}

/// Trim entries, drop blanks and duplicates, cap at `MAX_HIGHLIGHTS`, then
/// split into known and unknown names.
pub fn filter_highlights<S: AsRef<str>>(entries: &[S], model: &NetworkModel) -> Highlights {
    let mut seen = HashSet::new();
    let mut out = Highlights::default();
    let cleaned = entries
        .iter()
        .map(|e| e.as_ref().trim())
        .filter(|e| !e.is_empty())
        .filter(|e| seen.insert(*e));

    for (i, name) in cleaned.enumerate() {
        if i >= MAX_HIGHLIGHTS {
            out.dropped.push(name.to_string());
        } else if model.node_id(name).is_some() {
            out.valid.push(name.to_string());
        } else {
            out.unknown.push(name.to_string());
        }
    }
    if !out.unknown.is_empty() {
        warn!(unknown = ?out.unknown, "highlighted nodes not in network");
    }
    if !out.dropped.is_empty() {
        warn!(dropped = ?out.dropped, max = MAX_HIGHLIGHTS, "too many highlighted nodes");
    }
    out
}
