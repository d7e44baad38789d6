//! Model manager: owns the active store.
//!
//! On startup the manager opens the current-schema store for the persisted
//! sync mode, falling back to migrating a legacy store into a fresh one. At
//! runtime it switches sync modes by opening the other store, running
//! pending migrations into it, and carrying the active store's records
//! across, rolling back if anything fails.
//!
//! Observers learn about store changes through [`ModelManager::subscribe`].

use crate::error::{ManagerError, ManagerResult};
use crate::registry::MigrationRegistry;
use crate::steps::carry_current_records;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use tb_core::schema::{current, legacy};
use tb_core::settings::keys;
use tb_core::{Schema, Settings, SyncMode};
use tb_store::{Store, StoreFactory};
use tokio::sync::{broadcast, Mutex, OwnedMutexGuard};

/// Capacity of the event channel; slow subscribers see `Lagged`.
const EVENT_CAPACITY: usize = 16;

/// How the active store was obtained at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenPath {
    /// The current-schema store opened directly
    Direct,
    /// A legacy store was migrated into a fresh current-schema store
    Migrated,
}

/// Startup lifecycle of a model manager.
///
/// The state only moves during [`ModelManager::start`]; a constructed
/// manager is always `Opened`. `Fatal` is the terminal state of a failed
/// start: it is logged, and `start` returns [`ManagerError::Fatal`] instead
/// of a manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerState {
    Uninitialized,
    MigratingFromLegacy,
    Opened(OpenPath),
    Fatal,
}

impl ManagerState {
    fn advance(&mut self, next: ManagerState) {
        log::debug!("Model manager: {self} -> {next}");
        *self = next;
    }
}

impl fmt::Display for ManagerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManagerState::Uninitialized => write!(f, "uninitialized"),
            ManagerState::MigratingFromLegacy => write!(f, "migrating from legacy"),
            ManagerState::Opened(OpenPath::Direct) => write!(f, "opened"),
            ManagerState::Opened(OpenPath::Migrated) => write!(f, "opened (migrated)"),
            ManagerState::Fatal => write!(f, "fatal"),
        }
    }
}

/// Notification about the active store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerEvent {
    /// A new store became active
    ContainerChanged {
        sync_mode: SyncMode,
        schema_version: u32,
        path: Option<PathBuf>,
    },
    /// A sync mode switch failed and the previous store stayed active
    SyncSwitchFailed {
        requested: SyncMode,
        active: SyncMode,
        message: String,
    },
}

/// The schema pair the manager works with.
#[derive(Debug, Clone)]
pub struct Schemas {
    pub current: Schema,
    pub legacy: Schema,
}

impl Default for Schemas {
    fn default() -> Self {
        Self {
            current: current(),
            legacy: legacy(),
        }
    }
}

/// Owns the active store and coordinates migrations and sync switches.
pub struct ModelManager {
    factory: Arc<dyn StoreFactory>,
    registry: Arc<MigrationRegistry>,
    schema: Schema,
    active: Arc<RwLock<Arc<Store>>>,
    state: ManagerState,
    switch_lock: Arc<Mutex<()>>,
    events: broadcast::Sender<ContainerEvent>,
}

impl ModelManager {
    /// Open the store for the persisted sync mode, migrating a legacy store
    /// if the current schema cannot be opened.
    ///
    /// Any failure here is [`ManagerError::Fatal`]: there is no usable store
    /// and the caller must stop.
    pub fn start(
        factory: Arc<dyn StoreFactory>,
        registry: Arc<MigrationRegistry>,
        schemas: Schemas,
    ) -> ManagerResult<Self> {
        let mut state = ManagerState::Uninitialized;
        let store = match open_or_migrate(factory.as_ref(), &registry, &schemas, &mut state) {
            Ok(store) => store,
            Err(e) => {
                state.advance(ManagerState::Fatal);
                log::error!("No usable store: {e}");
                return Err(ManagerError::Fatal {
                    source: Box::new(e),
                });
            }
        };

        log::info!(
            "Using {} store ({}) at {}",
            store.schema(),
            store.sync_mode(),
            describe_path(&store)
        );
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            factory,
            registry,
            schema: schemas.current,
            active: Arc::new(RwLock::new(Arc::new(store))),
            state,
            switch_lock: Arc::new(Mutex::new(())),
            events,
        })
    }

    /// The active store.
    pub fn store(&self) -> Arc<Store> {
        current_store(&self.active)
    }

    /// Sync mode of the active store.
    pub fn sync_mode(&self) -> SyncMode {
        self.store().sync_mode()
    }

    pub fn state(&self) -> ManagerState {
        self.state
    }

    pub fn registry(&self) -> &Arc<MigrationRegistry> {
        &self.registry
    }

    /// Receive [`ContainerEvent`]s from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ContainerEvent> {
        self.events.subscribe()
    }

    /// Switch the active store to `mode`.
    ///
    /// Opens the store for `mode`, applies pending migrations from the
    /// active store into it and copies over the active store's records, then
    /// persists the preference and makes it active. On failure the active
    /// store and the persisted preference are left as they were before the
    /// call, and the error is returned.
    ///
    /// The switch runs to completion on a blocking worker even if the
    /// returned future is dropped. Only one switch runs at a time; calls made
    /// while one is running fail with [`ManagerError::SwitchInProgress`].
    pub async fn update_sync_mode(&self, mode: SyncMode) -> ManagerResult<Arc<Store>> {
        let switching = Arc::clone(&self.switch_lock)
            .try_lock_owned()
            .map_err(|_| ManagerError::SwitchInProgress)?;

        let active = self.store();
        if mode == active.sync_mode() {
            log::debug!("Sync mode already {mode}");
            persist_preference(self.settings(), mode)?;
            return Ok(active);
        }

        log::info!("Switching sync mode from {} to {mode}", active.sync_mode());
        let job = SwitchJob {
            factory: Arc::clone(&self.factory),
            registry: Arc::clone(&self.registry),
            schema: self.schema.clone(),
            active: Arc::clone(&self.active),
            events: self.events.clone(),
            source: active,
            target: mode,
            _switching: switching,
        };

        tokio::task::spawn_blocking(move || job.run())
            .await
            .map_err(|e| ManagerError::Task(e.to_string()))?
    }

    /// Switch to the persisted preference if it differs from the active mode.
    ///
    /// Returns the new store when a switch happened.
    pub async fn reconcile_with_preference(&self) -> ManagerResult<Option<Arc<Store>>> {
        let preferred = read_preference(self.settings())?;
        if preferred == self.sync_mode() {
            return Ok(None);
        }
        self.update_sync_mode(preferred).await.map(Some)
    }

    fn settings(&self) -> &Settings {
        self.registry.settings()
    }
}

impl fmt::Debug for ModelManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelManager")
            .field("schema", &self.schema.to_string())
            .field("state", &self.state)
            .field("active", &self.store())
            .finish_non_exhaustive()
    }
}

/// One sync switch, owned by the blocking worker that performs it.
///
/// Holds the switch guard, so no other switch starts until this one has
/// swapped the store or rolled back.
struct SwitchJob {
    factory: Arc<dyn StoreFactory>,
    registry: Arc<MigrationRegistry>,
    schema: Schema,
    active: Arc<RwLock<Arc<Store>>>,
    events: broadcast::Sender<ContainerEvent>,
    source: Arc<Store>,
    target: SyncMode,
    _switching: OwnedMutexGuard<()>,
}

impl SwitchJob {
    fn run(self) -> ManagerResult<Arc<Store>> {
        let active_mode = self.source.sync_mode();
        let settings = self.registry.settings();

        let prepared = self.prepare().and_then(|dest| {
            persist_preference(settings, self.target)?;
            Ok(dest)
        });

        match prepared {
            Ok(dest) => {
                let dest = Arc::new(dest);
                *self.active.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&dest);
                log::info!(
                    "Using {} store ({}) at {}",
                    dest.schema(),
                    self.target,
                    describe_path(&dest)
                );
                self.emit(ContainerEvent::ContainerChanged {
                    sync_mode: self.target,
                    schema_version: dest.schema().version(),
                    path: dest.path().map(PathBuf::from),
                });
                Ok(dest)
            }
            Err(e) => {
                log::warn!("Switch to {} failed, staying on {active_mode}: {e}", self.target);
                if let Err(restore) = persist_preference(settings, active_mode) {
                    log::error!("Could not restore sync preference to {active_mode}: {restore}");
                }
                self.emit(ContainerEvent::SyncSwitchFailed {
                    requested: self.target,
                    active: active_mode,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn prepare(&self) -> ManagerResult<Store> {
        let dest = self.factory.open(&self.schema, self.target)?;
        self.registry.apply_pending(&self.source, &dest)?;
        let carried = carry_current_records(&self.source, &dest)?;
        if carried > 0 {
            log::info!("Carried {carried} record(s) into the {} store", self.target);
        }
        Ok(dest)
    }

    fn emit(&self, event: ContainerEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

fn current_store(active: &RwLock<Arc<Store>>) -> Arc<Store> {
    let active = active.read().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(&active)
}

fn open_or_migrate(
    factory: &dyn StoreFactory,
    registry: &MigrationRegistry,
    schemas: &Schemas,
    state: &mut ManagerState,
) -> ManagerResult<Store> {
    let mode = read_preference(registry.settings())?;

    match factory.open(&schemas.current, mode) {
        Ok(store) => {
            state.advance(ManagerState::Opened(OpenPath::Direct));
            return Ok(store);
        }
        Err(e) => log::warn!(
            "Could not open {} store ({mode}), trying {}: {e}",
            schemas.current,
            schemas.legacy
        ),
    }

    state.advance(ManagerState::MigratingFromLegacy);
    let source = factory.open(&schemas.legacy, mode)?;
    let dest = factory.open_fresh(&schemas.current, mode)?;
    registry.apply_pending(&source, &dest)?;
    drop(source);

    let store = factory.promote(dest)?;
    state.advance(ManagerState::Opened(OpenPath::Migrated));
    Ok(store)
}

fn read_preference(settings: &Settings) -> ManagerResult<SyncMode> {
    Ok(SyncMode::from_cloud_flag(
        settings.get_bool(keys::USE_CLOUD_SYNC)?,
    ))
}

fn persist_preference(settings: &Settings, mode: SyncMode) -> ManagerResult<()> {
    settings.set_bool(keys::USE_CLOUD_SYNC, mode.is_cloud())?;
    Ok(())
}

fn describe_path(store: &Store) -> String {
    store
        .path()
        .map_or_else(|| ":memory:".to_string(), |p| p.display().to_string())
}

#[cfg(test)]
#[path = "manager_test.rs"]
mod tests;
