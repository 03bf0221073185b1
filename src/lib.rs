//! # depcheck-task - build-tool tasks for dependency-check
//!
//! Adapters that let a build system drive the dependency-check update engine.
//! A task is a flat set of attributes; running it copies those attributes into
//! an explicit [`Settings`] store, builds an [`Engine`] from the store and asks
//! it to do its work. Settings and engine are always torn down afterwards.
//!
//! ## Features
//!
//! - **Update task**: Refresh the local copy of the NVD, with proxy, database
//!   and feed URL overrides
//! - **Purge task**: Delete the local copy of the NVD
//! - **Typed errors**: Database connectivity failures are reported as
//!   [`Error::DatabaseUnavailable`], everything else passes through
//! - **Attribute derive**: `#[derive(TaskProperties)]` maps struct fields to
//!   settings keys
//! - **Environment overrides**: `DEPCHECK_PROXY_SERVER` and friends
//! - **Task files**: Attributes from JSON, or TOML/YAML with the matching
//!   feature
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use depcheck_task::{Engine, EngineError, EnvironmentHandler, Settings, UpdateTask};
//!
//! struct NvdEngine;
//!
//! impl NvdEngine {
//!     fn open(_settings: &Settings) -> Result<Self, EngineError> {
//!         Ok(Self)
//!     }
//! }
//!
//! impl Engine for NvdEngine {
//!     fn do_updates(&mut self) -> Result<(), EngineError> { Ok(()) }
//!     fn cleanup(&mut self) {}
//! }
//!
//! # fn main() -> depcheck_task::Result<()> {
//! let mut task = UpdateTask::new().with_env(EnvironmentHandler::new("DEPCHECK"));
//! task.set_attribute("proxyServer", "proxy.example.org")?;
//! task.set_attribute("proxyPort", "3128")?;
//! task.set_attribute("dataDirectory", "/var/lib/dependency-check")?;
//!
//! match task.execute(NvdEngine::open) {
//!     Err(e) if e.is_database_unavailable() => eprintln!("{e}"),
//!     other => other?,
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Defining Task Attributes
//!
//! ```rust,no_run
//! use depcheck_task::{TaskProperties, keys};
//!
//! #[derive(Debug, Default, TaskProperties)]
//! struct MirrorProperties {
//!     #[task(key = keys::CVE_SCHEMA_2_0, description = "Base data mirror URL")]
//!     mirror: Option<String>,
//!
//!     #[task(key = keys::PROXY_PASSWORD, secret)]
//!     proxy_password: Option<String>,
//!
//!     #[task(skip)]
//!     scratch: Vec<u8>,
//! }
//! ```
//!
//! Unset (`None`) and empty values are never written, so a settings file or the
//! bundled defaults keep their value for those keys.

// Lets the derive's `::depcheck_task::` paths resolve inside this crate
extern crate self as depcheck_task;

mod docs;
mod engine;
mod error;
mod events;
pub mod properties;
pub mod settings;
pub mod storage;
mod sync;
pub mod task;

pub use docs::{DocsConfig, generate_docs, generate_docs_from_descriptors};
pub use engine::{Engine, EngineFactory};
pub use error::{
    BoxError, DATABASE_UNAVAILABLE_MESSAGE, DatabaseError, EngineError, Error, Result,
};
pub use events::EventManager;
pub use properties::{
    DefaultEnvSource, EnvSource, EnvironmentHandler, FromProperty, PropertyDescriptor,
    PropertyValue, TaskProperties,
};
pub use settings::{Settings, keys};
pub use storage::{JsonStorage, StorageBackend};
pub use task::{
    BaseProperties, PurgeOutcome, PurgeTask, UpdateProperties, UpdateTask, populate_base,
};

#[cfg(feature = "toml")]
pub use storage::TomlStorage;

#[cfg(feature = "yaml")]
pub use storage::YamlStorage;

/// Derive macro for [`TaskProperties`]
///
/// Field options, inside `#[task(...)]`:
///
/// - `key = <expr>` - settings key the value is written under
/// - `name = "attrName"` - attribute name (default: camelCase field name)
/// - `description = "..."` - help text for [`generate_docs`]
/// - `secret` - masked in logs, flagged in docs, env override is opt-in
/// - `skip` - not an attribute
pub use depcheck_task_derive::TaskProperties;
