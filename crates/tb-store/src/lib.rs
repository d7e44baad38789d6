//! tb-store - Storage layer for TackleBox
//!
//! This crate provides the [`StoreFactory`] contract, its DuckDB
//! implementation, and [`Store`], the record-collection API used by the
//! migration layer and the CLI.

pub mod error;
pub mod factory;
pub(crate) mod layout;
pub mod store;

pub use error::{StoreError, StoreOpenError, StoreResult};
pub use factory::{DuckDbStoreFactory, StoreFactory, STAGING_FILE_NAME, STORE_FILE_NAME};
pub use store::{Store, StoreLocation};
