//! CLI command implementations

pub(crate) mod add;
pub(crate) mod categories;
pub(crate) mod common;
pub(crate) mod history;
pub(crate) mod init;
pub(crate) mod ls;
pub(crate) mod rm;
pub(crate) mod status;
pub(crate) mod sync;
