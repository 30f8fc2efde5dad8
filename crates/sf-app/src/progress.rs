//! Progress events shared by the scenario, comparison and sweep services.

use sf_sim::SimProgress;

#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Deriving,
    Integrating,
    Extracting,
    Completed,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    /// Scenario label, e.g. `control` or `row 3`
    pub scenario: String,
    pub stage: Stage,
    pub integration: Option<SimProgress>,
}

impl ProgressEvent {
    pub fn stage(scenario: &str, stage: Stage) -> Self {
        Self {
            scenario: scenario.to_string(),
            stage,
            integration: None,
        }
    }
}

pub type ProgressSink<'a> = Option<&'a mut dyn FnMut(ProgressEvent)>;

pub(crate) fn emit(sink: &mut ProgressSink<'_>, event: impl FnOnce() -> ProgressEvent) {
    if let Some(cb) = sink.as_deref_mut() {
        cb(event());
    }
}
