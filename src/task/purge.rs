//! The purge task: delete the local copy of the NVD

use crate::TaskProperties;
use crate::error::{Error, Result};
use crate::properties::EnvironmentHandler;
use crate::settings::Settings;
use crate::task::base::{BaseProperties, populate_base};

use log::{error, info};
use std::path::PathBuf;

/// What a purge run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurgeOutcome {
    /// The database file was deleted
    Purged(PathBuf),
    /// Nothing was deleted; the reason was logged because `fail_on_error` is off
    Skipped(String),
}

/// Deletes the local vulnerability database so the next update starts fresh
#[derive(Debug, Clone, Default)]
pub struct PurgeTask {
    pub base: BaseProperties,
    env: Option<EnvironmentHandler>,
}

impl PurgeTask {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read overrides for the data directory settings from the environment
    #[must_use]
    pub fn with_env(mut self, env: EnvironmentHandler) -> Self {
        self.env = Some(env);
        self
    }

    /// Assign one attribute by name
    ///
    /// # Errors
    ///
    /// `Error::UnknownAttribute` / `Error::InvalidAttribute`.
    pub fn set_attribute(&mut self, name: &str, value: &str) -> Result<()> {
        self.base.set_attribute(name, value)
    }

    /// Copy the task's attributes into `settings`
    ///
    /// # Errors
    ///
    /// Propagates a settings file failure when `fail_on_error` is set.
    pub fn populate_settings(&self, settings: &mut Settings) -> Result<()> {
        populate_base::<BaseProperties>(&self.base, settings, self.env.as_ref())
    }

    /// Purge against a fresh settings store
    ///
    /// # Errors
    ///
    /// With `fail_on_error` set: `Error::Purge` when the database file is
    /// missing or cannot be deleted, and the settings error itself (e.g.
    /// `Error::FileRead`) when the task settings cannot be loaded.
    pub fn execute(&self) -> Result<PurgeOutcome> {
        let mut settings = Settings::with_defaults()?;
        self.execute_with(&mut settings)
    }

    /// Purge using the caller's settings store, cleaning it up afterwards
    ///
    /// # Errors
    ///
    /// See [`PurgeTask::execute`].
    pub fn execute_with(&self, settings: &mut Settings) -> Result<PurgeOutcome> {
        let result = self.purge(settings);
        settings.cleanup(true);
        result
    }

    fn purge(&self, settings: &mut Settings) -> Result<PurgeOutcome> {
        let db = match self
            .populate_settings(settings)
            .and_then(|()| settings.database_file())
        {
            Ok(db) => db,
            Err(e) => return self.fail_with(e),
        };

        if !db.exists() {
            return self.fail(format!(
                "Unable to purge database; the database file does not exist: {}",
                db.display()
            ));
        }

        match std::fs::remove_file(&db) {
            Ok(()) => {
                info!("Database file purged; local copy of the NVD has been removed");
                Ok(PurgeOutcome::Purged(db))
            }
            Err(e) => {
                log::debug!("remove_file({}) failed: {e}", db.display());
                self.fail(format!(
                    "Unable to delete '{}'; please delete the file manually",
                    db.display()
                ))
            }
        }
    }

    /// Like `fail`, but keeps the typed error when it is returned
    fn fail_with(&self, err: Error) -> Result<PurgeOutcome> {
        if self.base.fail_on_error {
            return Err(err);
        }
        let message = format!("Unable to purge database: {err}");
        error!("{message}");
        Ok(PurgeOutcome::Skipped(message))
    }

    fn fail(&self, message: String) -> Result<PurgeOutcome> {
        if self.base.fail_on_error {
            return Err(Error::Purge(message));
        }
        error!("{message}");
        Ok(PurgeOutcome::Skipped(message))
    }
}
