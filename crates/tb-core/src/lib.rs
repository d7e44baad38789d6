//! tb-core - Core library for TackleBox
//!
//! This crate provides the types shared by the storage and migration
//! layers: the [`Record`] capability, schema declarations, sync modes,
//! equipment and category models, the key-value [`Settings`] store, and
//! `tacklebox.yml` configuration.

pub mod category;
pub mod config;
pub mod equipment;
pub mod error;
pub mod record;
pub mod schema;
pub mod settings;
pub mod sync_mode;

pub use category::{AttributeDefinition, AttributeType, Category, CategoryCatalog};
pub use config::Config;
pub use equipment::{Equipment, LegacyEquipment};
pub use error::{CoreError, CoreResult};
pub use record::{Record, RecordId};
pub use schema::{RecordTypeDescriptor, Schema};
pub use settings::Settings;
pub use sync_mode::SyncMode;
