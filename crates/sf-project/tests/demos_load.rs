use std::path::Path;

#[test]
fn demo_projects_load_and_validate() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/projects");
    for name in ["toy_cascade.yaml", "fibroblast_core.yaml"] {
        let path = root.join(name);
        let project = sf_project::load_yaml(&path)
            .unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e));
        sf_project::validate_project(&project)
            .unwrap_or_else(|e| panic!("Failed to validate {}: {}", name, e));
    }
}

#[test]
fn demo_sweep_rows_parse() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/sweeps/toy_rows.yaml");
    let rows = sf_project::load_parameter_rows(&path).unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows[1].parse().unwrap().is_none());
    let parsed = rows[2].parse().unwrap().unwrap();
    assert_eq!(parsed.tau, vec![1.0, 4.0]);
}
