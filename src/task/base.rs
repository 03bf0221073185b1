//! Attributes and settings population shared by every task

use crate::TaskProperties;
use crate::error::Result;
use crate::properties::EnvironmentHandler;
use crate::settings::{Settings, keys};

use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Name of the directory under the platform data dir used when neither the
/// task nor the settings give an absolute data directory
const APP_DATA_DIR: &str = "dependency-check";

/// Keys every task reads from the environment, besides those its own
/// attributes bind
const SHARED_ENV_KEYS: &[(&str, bool)] = &[
    (keys::DATA_DIRECTORY, false),
    (keys::DB_FILE_NAME, false),
];

/// Attributes every task accepts
#[derive(Debug, Clone, PartialEq, Eq, TaskProperties)]
pub struct BaseProperties {
    /// Directory holding the local vulnerability database
    #[task(description = "Directory holding the local vulnerability database")]
    pub data_directory: Option<String>,

    /// Abort on recoverable problems instead of logging them
    #[task(description = "Abort the build on recoverable errors (default: true)")]
    pub fail_on_error: bool,

    /// Extra settings merged over the bundled defaults
    #[task(description = "Settings file (JSON, TOML or YAML) merged over the defaults")]
    pub settings_file: Option<PathBuf>,
}

impl Default for BaseProperties {
    fn default() -> Self {
        Self {
            data_directory: None,
            fail_on_error: true,
            settings_file: None,
        }
    }
}

impl BaseProperties {
    pub fn data_directory(&self) -> Option<&str> {
        self.data_directory.as_deref()
    }

    pub fn set_data_directory(&mut self, data_directory: impl Into<String>) {
        self.data_directory = Some(data_directory.into());
    }

    pub fn fail_on_error(&self) -> bool {
        self.fail_on_error
    }

    pub fn set_fail_on_error(&mut self, fail_on_error: bool) {
        self.fail_on_error = fail_on_error;
    }

    pub fn settings_file(&self) -> Option<&Path> {
        self.settings_file.as_deref()
    }

    pub fn set_settings_file(&mut self, settings_file: impl Into<PathBuf>) {
        self.settings_file = Some(settings_file.into());
    }
}

/// Populate the parts of `settings` every task shares
///
/// In order: the optional settings file (a failure aborts only when
/// `fail_on_error` is set, otherwise it is logged), environment overrides for
/// the data directory keys and the keys `P` binds, then `data.directory`.
/// Task-specific attributes are applied afterwards by the caller so they win
/// over both.
///
/// # Errors
///
/// Returns the settings file error when `fail_on_error` is set.
pub fn populate_base<P: TaskProperties>(
    base: &BaseProperties,
    settings: &mut Settings,
    env: Option<&EnvironmentHandler>,
) -> Result<()> {
    if let Some(path) = base.settings_file() {
        if let Err(e) = settings.merge_file(path) {
            if base.fail_on_error {
                return Err(e);
            }
            warn!("Unable to load settings file {}: {e}", path.display());
        }
    }

    if let Some(env) = env {
        for (key, secret) in SHARED_ENV_KEYS.iter().copied().chain(P::bound_keys()) {
            if let Some(value) = env.lookup(key, secret) {
                debug!("Overriding '{key}' from {}", env.var_name(key));
                settings.set_string(key, value);
            }
        }
    }

    let data_directory = match base.data_directory() {
        Some(dir) if !dir.is_empty() => dir.to_string(),
        _ => resolve_default_data_directory(settings)?,
    };
    settings.set_string(keys::DATA_DIRECTORY, data_directory);

    Ok(())
}

/// Anchor a relative `data.directory` under the platform local data dir
fn resolve_default_data_directory(settings: &Settings) -> Result<String> {
    let configured = settings.data_directory()?;
    if configured.is_absolute() {
        return Ok(configured.to_string_lossy().into_owned());
    }

    let base = dirs::data_local_dir()
        .map(|d| d.join(APP_DATA_DIR))
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(base.join(configured).to_string_lossy().into_owned())
}
