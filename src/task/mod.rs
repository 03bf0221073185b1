//! Build tasks
//!
//! - [`UpdateTask`] - refresh the local NVD copy through an [`Engine`](crate::Engine)
//! - [`PurgeTask`] - delete the local NVD copy
//!
//! Both share [`BaseProperties`] and [`populate_base`] by composition.

mod base;
mod purge;
mod update;

pub use base::{BaseProperties, populate_base};
pub use purge::{PurgeOutcome, PurgeTask};
pub use update::{UpdateProperties, UpdateTask};
