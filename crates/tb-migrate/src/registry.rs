//! Versioned migration registry.
//!
//! Steps are kept sorted by version and applied in ascending order. After
//! each successful step the history entry and the new last-applied version
//! are written together; the first failing step stops the run.

use crate::error::{MigrationError, MigrationResult};
use crate::history::{self, MigrationEntry};
use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use tb_core::Settings;
use tb_store::Store;

/// Body of a migration step: reads `source`, writes `dest`.
pub type Transform = dyn Fn(&Store, &Store) -> MigrationResult<()> + Send + Sync;

/// A single versioned migration.
pub struct MigrationStep {
    version: u32,
    description: String,
    transform: Box<Transform>,
}

impl MigrationStep {
    /// Create a step. `version` must be positive and unique in its registry.
    pub fn new<F>(version: u32, description: impl Into<String>, transform: F) -> Self
    where
        F: Fn(&Store, &Store) -> MigrationResult<()> + Send + Sync + 'static,
    {
        Self {
            version,
            description: description.into(),
            transform: Box::new(transform),
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Run the step body.
    pub fn run(&self, source: &Store, dest: &Store) -> MigrationResult<()> {
        (self.transform)(source, dest)
    }
}

impl fmt::Debug for MigrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationStep")
            .field("version", &self.version)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Ordered set of migration steps plus their bookkeeping.
#[derive(Debug)]
pub struct MigrationRegistry {
    steps: Vec<MigrationStep>,
    settings: Arc<Settings>,
}

impl MigrationRegistry {
    /// Create an empty registry recording progress in `settings`.
    pub fn new(settings: Arc<Settings>) -> Self {
        Self {
            steps: Vec::new(),
            settings,
        }
    }

    /// Register a step, keeping the list sorted by version.
    pub fn register(&mut self, step: MigrationStep) -> MigrationResult<()> {
        if step.version == 0 {
            return Err(MigrationError::InvalidStep {
                version: 0,
                reason: "versions start at 1".to_string(),
            });
        }
        match self
            .steps
            .binary_search_by_key(&step.version, MigrationStep::version)
        {
            Ok(_) => Err(MigrationError::InvalidStep {
                version: step.version,
                reason: "version already registered".to_string(),
            }),
            Err(pos) => {
                self.steps.insert(pos, step);
                Ok(())
            }
        }
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_step(mut self, step: MigrationStep) -> MigrationResult<Self> {
        self.register(step)?;
        Ok(self)
    }

    /// All steps in ascending version order.
    pub fn steps(&self) -> &[MigrationStep] {
        &self.steps
    }

    /// Settings store holding the bookkeeping.
    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    /// Steps with a version above `last_applied`, ascending.
    pub fn pending_steps(&self, last_applied: u32) -> Vec<&MigrationStep> {
        self.steps
            .iter()
            .filter(|step| step.version > last_applied)
            .collect()
    }

    /// Highest applied version, or 0.
    pub fn last_applied_version(&self) -> MigrationResult<u32> {
        history::last_applied_version(&self.settings)
    }

    /// Applied migrations, oldest first.
    pub fn history(&self) -> MigrationResult<Vec<MigrationEntry>> {
        history::history(&self.settings)
    }

    /// Apply every pending step from `source` into `dest`.
    ///
    /// Returns the entries recorded by this call. On failure, steps before
    /// the failing one stay recorded and the error names the failing step.
    pub fn apply_pending(&self, source: &Store, dest: &Store) -> MigrationResult<Vec<MigrationEntry>> {
        let last = self.last_applied_version()?;
        let pending = self.pending_steps(last);
        if pending.is_empty() {
            log::debug!("No pending migrations (last applied v{last:03})");
            return Ok(Vec::new());
        }

        let mut applied = Vec::with_capacity(pending.len());
        for step in pending {
            log::debug!("Applying migration v{:03}: {}", step.version, step.description);

            step.run(source, dest)
                .map_err(|e| MigrationError::StepFailed {
                    version: step.version,
                    description: step.description.clone(),
                    source: Box::new(e),
                })?;

            let entry = MigrationEntry {
                version: step.version,
                description: step.description.clone(),
                applied_at: Utc::now(),
            };
            history::record_applied(&self.settings, &entry)?;
            applied.push(entry);
        }

        log::info!(
            "Applied {} migration(s), now at v{:03}",
            applied.len(),
            applied.last().map_or(last, |e| e.version)
        );
        Ok(applied)
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
