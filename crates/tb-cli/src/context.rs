//! Runtime context for CLI commands

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tb_core::{CategoryCatalog, Config, Settings};
use tb_migrate::{builtin_registry, ModelManager, Schemas};
use tb_store::DuckDbStoreFactory;

use crate::cli::GlobalArgs;

/// Loaded configuration, settings, categories, and the opened store
pub(crate) struct RuntimeContext {
    /// Project root that relative config paths resolve against
    pub root: PathBuf,

    pub config: Config,

    pub settings: Arc<Settings>,

    pub categories: CategoryCatalog,

    /// Owner of the active store
    pub manager: ModelManager,
}

impl RuntimeContext {
    /// Load everything a command needs and open the store.
    ///
    /// Fails if no store can be opened or migrated; callers must not
    /// continue without one.
    pub(crate) fn new(args: &GlobalArgs) -> Result<Self> {
        let root = PathBuf::from(&args.project_dir);
        let config = load_config(args)?;

        let settings_path = config.settings_path(&root);
        let settings = Arc::new(
            Settings::load(&settings_path)
                .with_context(|| format!("Failed to load settings: {}", settings_path.display()))?,
        );

        let defaults = CategoryCatalog::defaults_from_file(config.categories_path(&root).as_deref());
        let (categories, seeded) = CategoryCatalog::seed_if_needed(&settings, defaults);
        if seeded {
            log::info!("Seeded {} preset categories", categories.categories().len());
        }

        let factory = Arc::new(DuckDbStoreFactory::new(
            config.data_dir_absolute(&root),
            config.cloud_dir_absolute(&root),
        ));
        let registry = builtin_registry(Arc::clone(&settings))
            .context("Failed to register built-in migrations")?;
        let manager = ModelManager::start(factory, Arc::new(registry), Schemas::default())
            .context("Failed to open the tackle store")?;

        Ok(Self {
            root,
            config,
            settings,
            categories,
            manager,
        })
    }
}

/// Load config from the override path or the project directory.
pub(crate) fn load_config(args: &GlobalArgs) -> Result<Config> {
    match &args.config {
        Some(config_path) => {
            Config::load(Path::new(config_path)).context("Failed to load configuration file")
        }
        None => Config::load_from_dir(Path::new(&args.project_dir))
            .context("Failed to load project configuration"),
    }
}
