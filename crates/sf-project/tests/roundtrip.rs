use std::path::Path;

use sf_kinetics::{HillForm, KineticsOptions, LogicKind};
use sf_project::schema::*;
use sf_project::{ProjectError, load, load_yaml, save, save_yaml, validate_project};

fn toy() -> Project {
    Project {
        version: LATEST_VERSION,
        name: "Round trip".to_string(),
        network: NetworkDef {
            defaults: ParamDefaults::default(),
            nodes: vec![
                NodeDef::named("TGFB"),
                NodeDef {
                    name: "smad3".to_string(),
                    tau: Some(2.0),
                    ymax: Some(0.8),
                    y0: Some(0.1),
                },
                NodeDef::named("smad7"),
            ],
            reactions: vec![
                ReactionDef {
                    rule: "=> TGFB".to_string(),
                    w: Some(0.25),
                    n: None,
                    ec50: None,
                },
                ReactionDef::rule("TGFB & !smad7 => smad3"),
                ReactionDef::rule("smad3 => smad7"),
            ],
        },
        scenario: ScenarioConfig {
            horizon: 50.0,
            time_point: Some(25.0),
            kinetics: KineticsOptions {
                hill: HillForm::Standard,
                logic: LogicKind::MinMax,
            },
            ..ScenarioConfig::default()
        },
    }
}

#[test]
fn roundtrip_yaml() {
    let project = toy();
    validate_project(&project).unwrap();

    let path = std::env::temp_dir().join("sf_project_roundtrip.yaml");
    save_yaml(&path, &project).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(project, loaded);
}

#[test]
fn roundtrip_json_by_extension() {
    let project = toy();
    let path = std::env::temp_dir().join("sf_project_roundtrip.json");
    save(&path, &project).unwrap();
    let loaded = load(&path).unwrap();

    assert_eq!(project, loaded);
}

#[test]
fn scenario_defaults_fill_missing_fields() {
    let yaml = r#"
version: 1
name: minimal
network:
  nodes:
    - name: A
  reactions:
    - rule: "=> A"
"#;
    let project: Project = serde_yaml::from_str(yaml).unwrap();
    validate_project(&project).unwrap();
    assert_eq!(project.scenario, ScenarioConfig::default());
    assert_eq!(project.scenario.stimulus_node, "TGFB");
    assert_eq!(project.scenario.snapshot_time(), 100.0);
    assert_eq!(project.network.defaults.n, 1.4);
}

#[test]
fn unknown_extension_rejected() {
    let path = Path::new("project.toml");
    assert!(matches!(
        save(path, &toy()),
        Err(ProjectError::UnknownFormat { .. })
    ));
}

#[test]
fn invalid_project_not_saved() {
    let mut project = toy();
    project.network.reactions.push(ReactionDef::rule("ghost => smad3"));
    let path = std::env::temp_dir().join("sf_project_invalid.yaml");
    assert!(matches!(
        save_yaml(&path, &project),
        Err(ProjectError::Validation(_))
    ));
}
