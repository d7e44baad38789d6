use super::*;
use tb_core::CategoryCatalog;
use tempfile::tempdir;

fn global(dir: &Path) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        project_dir: dir.display().to_string(),
        config: None,
    }
}

fn args(name: Option<&str>) -> InitArgs {
    InitArgs {
        name: name.map(String::from),
        cloud_dir: None,
        no_categories: false,
    }
}

#[tokio::test]
async fn test_init_writes_loadable_config() {
    let temp_dir = tempdir().unwrap();
    let project = temp_dir.path().join("my_box");

    execute(&args(None), &global(&project)).await.unwrap();

    let config = Config::load_from_dir(&project).unwrap();
    assert_eq!(config.name, "my_box");
    assert_eq!(config.categories_file.as_deref(), Some(CATEGORIES_FILE));
    assert!(config.data_dir_absolute(&project).is_dir());

    let presets =
        CategoryCatalog::defaults_from_file(config.categories_path(&project).as_deref());
    assert_eq!(presets, preset_categories());
}

#[tokio::test]
async fn test_init_with_cloud_dir_and_no_categories() {
    let temp_dir = tempdir().unwrap();
    let init = InitArgs {
        name: Some("Lake house".to_string()),
        cloud_dir: Some("../Dropbox/tacklebox".to_string()),
        no_categories: true,
    };

    execute(&init, &global(temp_dir.path())).await.unwrap();

    let config = Config::load_from_dir(temp_dir.path()).unwrap();
    assert_eq!(config.name, "Lake house");
    assert_eq!(config.cloud_dir.as_deref(), Some("../Dropbox/tacklebox"));
    assert!(config.categories_file.is_none());
    assert!(!temp_dir.path().join(CATEGORIES_FILE).exists());
}

#[tokio::test]
async fn test_init_refuses_existing_config() {
    let temp_dir = tempdir().unwrap();
    execute(&args(Some("first")), &global(temp_dir.path())).await.unwrap();

    let err = execute(&args(Some("second")), &global(temp_dir.path()))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("already exists"));
    assert_eq!(Config::load_from_dir(temp_dir.path()).unwrap().name, "first");
}

#[test]
fn test_preset_pickers_have_options() {
    for category in preset_categories() {
        for attr in &category.attributes {
            if attr.attr_type == AttributeType::Picker {
                assert!(
                    attr.options.as_ref().is_some_and(|o| !o.is_empty()),
                    "{}.{} has no options",
                    category.name,
                    attr.key
                );
            }
        }
    }
}
