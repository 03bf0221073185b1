//! The update task: refresh the local copy of the NVD
//!
//! Copies the proxy, database and feed attributes into the settings store,
//! builds the engine from those settings and asks it to update. Settings and
//! engine are torn down exactly once however the run ends.

use crate::TaskProperties;
use crate::engine::{Engine, EngineFactory};
use crate::error::{Error, Result};
use crate::properties::EnvironmentHandler;
use crate::settings::{Settings, keys};
use crate::task::base::{BaseProperties, populate_base};

use log::{debug, info};

/// Attributes of the update task
#[derive(Debug, Clone, Default, PartialEq, Eq, TaskProperties)]
pub struct UpdateProperties {
    #[task(key = keys::PROXY_SERVER, description = "Proxy server host")]
    pub proxy_server: Option<String>,

    #[task(key = keys::PROXY_PORT, description = "Proxy server port")]
    pub proxy_port: Option<String>,

    #[task(key = keys::PROXY_USERNAME, description = "Proxy user name")]
    pub proxy_username: Option<String>,

    #[task(key = keys::PROXY_PASSWORD, secret, description = "Proxy password")]
    pub proxy_password: Option<String>,

    #[task(key = keys::CONNECTION_TIMEOUT, description = "Connection timeout in milliseconds")]
    pub connection_timeout: Option<String>,

    #[task(key = keys::DB_DRIVER_NAME, description = "Database driver name")]
    pub database_driver_name: Option<String>,

    #[task(key = keys::DB_DRIVER_PATH, description = "Path to the database driver when it is not on the default search path")]
    pub database_driver_path: Option<String>,

    #[task(key = keys::DB_CONNECTION_STRING, description = "Database connection string")]
    pub connection_string: Option<String>,

    #[task(key = keys::DB_USER, description = "Database user name")]
    pub database_user: Option<String>,

    #[task(key = keys::DB_PASSWORD, secret, description = "Database password")]
    pub database_password: Option<String>,

    #[task(key = keys::CVE_MODIFIED_12_URL, description = "URL of the modified NVD CVE feed (1.2 schema)")]
    pub cve_url12_modified: Option<String>,

    #[task(key = keys::CVE_MODIFIED_20_URL, description = "URL of the modified NVD CVE feed (2.0 schema)")]
    pub cve_url20_modified: Option<String>,

    #[task(key = keys::CVE_SCHEMA_1_2, description = "Base data mirror URL for CVE 1.2")]
    pub cve_url12_base: Option<String>,

    #[task(key = keys::CVE_SCHEMA_2_0, description = "Base data mirror URL for CVE 2.0")]
    pub cve_url20_base: Option<String>,
}

macro_rules! accessors {
    ($($field:ident, $setter:ident;)*) => {
        impl UpdateProperties {
            $(
                pub fn $field(&self) -> Option<&str> {
                    self.$field.as_deref()
                }

                pub fn $setter(&mut self, value: impl Into<String>) {
                    self.$field = Some(value.into());
                }
            )*
        }
    };
}

accessors! {
    proxy_server, set_proxy_server;
    proxy_port, set_proxy_port;
    proxy_username, set_proxy_username;
    proxy_password, set_proxy_password;
    connection_timeout, set_connection_timeout;
    database_driver_name, set_database_driver_name;
    database_driver_path, set_database_driver_path;
    connection_string, set_connection_string;
    database_user, set_database_user;
    database_password, set_database_password;
    cve_url12_modified, set_cve_url12_modified;
    cve_url20_modified, set_cve_url20_modified;
    cve_url12_base, set_cve_url12_base;
    cve_url20_base, set_cve_url20_base;
}

/// Downloads the latest NVD data into the local database
///
/// # Example
///
/// ```rust,no_run
/// use depcheck_task::{Engine, EngineError, Settings, UpdateTask};
///
/// struct MyEngine;
///
/// impl Engine for MyEngine {
///     fn do_updates(&mut self) -> Result<(), EngineError> { Ok(()) }
///     fn cleanup(&mut self) {}
/// }
///
/// let mut task = UpdateTask::new();
/// task.properties.set_proxy_server("proxy.example.org");
/// task.properties.set_proxy_port("3128");
/// task.execute(|_settings: &Settings| Ok::<_, EngineError>(MyEngine))?;
/// # Ok::<(), depcheck_task::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub base: BaseProperties,
    pub properties: UpdateProperties,
    env: Option<EnvironmentHandler>,
}

impl UpdateTask {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read overrides for the bound settings keys from the environment
    #[must_use]
    pub fn with_env(mut self, env: EnvironmentHandler) -> Self {
        self.env = Some(env);
        self
    }

    /// Assign one attribute by name, base attributes included
    ///
    /// # Errors
    ///
    /// `Error::UnknownAttribute` if neither attribute set knows `name`,
    /// `Error::InvalidAttribute` if the value does not parse.
    pub fn set_attribute(&mut self, name: &str, value: &str) -> Result<()> {
        match self.properties.set_attribute(name, value) {
            Err(Error::UnknownAttribute(_)) => self.base.set_attribute(name, value),
            other => other,
        }
    }

    /// Copy the task's attributes into `settings`
    ///
    /// # Errors
    ///
    /// Propagates a settings file failure when `fail_on_error` is set.
    pub fn populate_settings(&self, settings: &mut Settings) -> Result<()> {
        populate_base::<UpdateProperties>(&self.base, settings, self.env.as_ref())?;
        self.properties.populate_settings(settings);
        settings.log_properties("Update task settings:");
        Ok(())
    }

    /// Run one update cycle against a fresh settings store
    ///
    /// # Errors
    ///
    /// `Error::DatabaseUnavailable` when the engine cannot reach its database,
    /// any other engine failure unchanged.
    pub fn execute<F: EngineFactory>(&self, factory: F) -> Result<()> {
        let mut settings = Settings::with_defaults()?;
        self.execute_with(&mut settings, factory)
    }

    /// Run one update cycle using the caller's settings store
    ///
    /// The store is cleaned up before this returns, on success and failure
    /// alike. The data directory is left to the engine to create.
    ///
    /// # Errors
    ///
    /// See [`UpdateTask::execute`].
    pub fn execute_with<F: EngineFactory>(&self, settings: &mut Settings, factory: F) -> Result<()> {
        let mut session = UpdateSession::new(settings);

        self.populate_settings(session.settings())?;

        let engine = factory.create(session.settings())?;
        debug!("Update engine created");
        session.engine.insert(engine).do_updates()?;

        info!("NVD update complete");
        Ok(())
    }
}

/// Scoped ownership of the settings and engine for one run
///
/// Dropping it cleans up the settings, then the engine if one was built.
struct UpdateSession<'a, E: Engine> {
    settings: &'a mut Settings,
    engine: Option<E>,
}

impl<'a, E: Engine> UpdateSession<'a, E> {
    fn new(settings: &'a mut Settings) -> Self {
        Self {
            settings,
            engine: None,
        }
    }

    fn settings(&mut self) -> &mut Settings {
        self.settings
    }
}

impl<E: Engine> Drop for UpdateSession<'_, E> {
    fn drop(&mut self) {
        self.settings.cleanup(true);
        if let Some(engine) = self.engine.as_mut() {
            engine.cleanup();
        }
    }
}
