//! Project schema definitions.

use serde::{Deserialize, Serialize};
use sf_kinetics::KineticsOptions;

pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    pub network: NetworkDef,
    #[serde(default)]
    pub scenario: ScenarioConfig,
}

/// Nodes, reactions and the parameter values used where an entry leaves one out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkDef {
    #[serde(default)]
    pub defaults: ParamDefaults,
    pub nodes: Vec<NodeDef>,
    #[serde(default)]
    pub reactions: Vec<ReactionDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tau: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ymax: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y0: Option<f64>,
}

impl NodeDef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tau: None,
            ymax: None,
            y0: None,
        }
    }
}

/// One reaction in rule notation, e.g. `"!A & B => C"` or `"=> TGFB"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReactionDef {
    pub rule: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ec50: Option<f64>,
}

impl ReactionDef {
    pub fn rule(rule: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            w: None,
            n: None,
            ec50: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParamDefaults {
    pub tau: f64,
    pub ymax: f64,
    pub y0: f64,
    pub w: f64,
    pub n: f64,
    pub ec50: f64,
}

impl Default for ParamDefaults {
    fn default() -> Self {
        Self {
            tau: 1.0,
            ymax: 1.0,
            y0: 0.0,
            w: 1.0,
            n: 1.4,
            ec50: 0.5,
        }
    }
}

/// Scenario and workflow settings shared by every front end.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScenarioConfig {
    /// End of the simulated interval `[0, horizon]`
    pub horizon: f64,
    /// Time at which activity snapshots are taken (defaults to `horizon`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_point: Option<f64>,
    pub samples_per_unit_time: f64,
    pub max_samples: usize,
    /// Driver node raised by the stimulus modes
    pub stimulus_node: String,
    pub stimulus_level: f64,
    pub knockdown_fraction: f64,
    pub kinetics: KineticsOptions,
    pub atol: f64,
    pub rtol: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            horizon: 100.0,
            time_point: None,
            samples_per_unit_time: 15.0,
            max_samples: 20_000,
            stimulus_node: "TGFB".to_string(),
            stimulus_level: 0.9,
            knockdown_fraction: 1.0,
            kinetics: KineticsOptions::default(),
            atol: 1e-6,
            rtol: 0.0,
        }
    }
}

impl ScenarioConfig {
    pub fn snapshot_time(&self) -> f64 {
        self.time_point.unwrap_or(self.horizon)
    }
}
