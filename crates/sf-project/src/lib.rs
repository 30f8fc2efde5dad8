//! sf-project: project file format and validation.
//!
//! A project names the network (nodes, reactions in rule notation, default
//! parameters) and the scenario settings. Parameter tables for batch sweeps
//! live in separate files of `ParameterRow`s.

pub mod format;
pub mod rule;
pub mod schema;
pub mod table;
pub mod validate;

pub use format::ProjectFormat;
pub use rule::{Rule, RuleError, RuleTerm, parse_rule};
pub use schema::*;
pub use table::{ParameterRow, ParsedRow, RowError, load_parameter_rows};
pub use validate::{ValidationError, validate_project};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unrecognized file extension: {path} (expected .yaml, .yml or .json)")]
    UnknownFormat { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<Project> {
    let content = std::fs::read_to_string(path)?;
    let project: Project = serde_yaml::from_str(&content)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn save_yaml(path: &std::path::Path, project: &Project) -> ProjectResult<()> {
    validate_project(project)?;
    let content = serde_yaml::to_string(project)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<Project> {
    let content = std::fs::read_to_string(path)?;
    let project: Project = serde_json::from_str(&content)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn save_json(path: &std::path::Path, project: &Project) -> ProjectResult<()> {
    validate_project(project)?;
    let content = serde_json::to_string_pretty(project)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by extension (`.yaml`/`.yml` or `.json`).
pub fn load(path: &std::path::Path) -> ProjectResult<Project> {
    match ProjectFormat::from_path(path)? {
        ProjectFormat::Yaml => load_yaml(path),
        ProjectFormat::Json => load_json(path),
    }
}

pub fn save(path: &std::path::Path, project: &Project) -> ProjectResult<()> {
    match ProjectFormat::from_path(path)? {
        ProjectFormat::Yaml => save_yaml(path, project),
        ProjectFormat::Json => save_json(path, project),
    }
}
