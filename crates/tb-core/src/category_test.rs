use super::*;

const DEFAULTS_YAML: &str = r#"
- name: Rods
  icon: rod
  attributes:
    - key: length
      label: Length (m)
      type: number
    - key: action
      label: Action
      type: picker
      options: [fast, moderate, slow]
- name: Lines
  icon: line
  attributes:
    - key: diameter
      label: Diameter
      type: text
"#;

fn defaults() -> Vec<Category> {
    serde_yaml::from_str(DEFAULTS_YAML).unwrap()
}

#[test]
fn test_parse_defaults() {
    let categories = defaults();
    assert_eq!(categories.len(), 2);
    let rods = &categories[0];
    assert_eq!(rods.attribute("action").unwrap().attr_type, AttributeType::Picker);
    assert_eq!(
        rods.attribute("action").unwrap().options.as_deref(),
        Some(&["fast".to_string(), "moderate".to_string(), "slow".to_string()][..])
    );
    assert!(rods.attribute("weight").is_none());
}

#[test]
fn test_seed_runs_once() {
    let settings = Settings::in_memory();

    let (catalog, seeded) = CategoryCatalog::seed_if_needed(&settings, defaults());
    assert!(seeded);
    assert_eq!(catalog.categories().len(), 2);

    let (again, seeded_again) = CategoryCatalog::seed_if_needed(&settings, Vec::new());
    assert!(!seeded_again);
    assert_eq!(again.categories().len(), 2, "stored presets win over new defaults");
}

#[test]
fn test_load_falls_back_to_defaults() {
    let settings = Settings::in_memory();
    let catalog = CategoryCatalog::load(&settings, defaults());
    assert!(catalog.get("Lines").is_some());
}

#[test]
fn test_defaults_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("categories.yml");
    std::fs::write(&path, DEFAULTS_YAML).unwrap();
    assert_eq!(CategoryCatalog::defaults_from_file(Some(&path)).len(), 2);
}

#[test]
fn test_defaults_from_missing_or_broken_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.yml");
    assert!(CategoryCatalog::defaults_from_file(Some(&missing)).is_empty());
    assert!(CategoryCatalog::defaults_from_file(None).is_empty());

    let broken = dir.path().join("broken.yml");
    std::fs::write(&broken, "- name: [unclosed").unwrap();
    assert!(CategoryCatalog::defaults_from_file(Some(&broken)).is_empty());
}
