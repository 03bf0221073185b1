use crate::error::{Error, Result};
use crate::events::EventManager;
use crate::properties::PropertyValue;
use crate::settings::keys;
use crate::storage::StorageBackend;

use log::{debug, info};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

const BUNDLED_DEFAULTS: &str = include_str!("defaults.json");

/// Key/value settings consumed by the update engine.
///
/// A `Settings` value is owned by whoever runs a task and handed to the
/// engine by reference; there is no process-wide instance. Values are plain
/// strings; typed getters parse on read and never validate on write.
///
/// # Example
///
/// ```rust
/// use depcheck_task::{keys, Settings};
///
/// let mut settings = Settings::new();
/// settings.set_string(keys::PROXY_SERVER, "proxy.example.org");
/// settings.set_if_present(keys::PROXY_PORT, &Some(String::new()));
///
/// assert_eq!(settings.get_string(keys::PROXY_SERVER), Some("proxy.example.org"));
/// assert!(!settings.contains_key(keys::PROXY_PORT));
/// ```
pub struct Settings {
    values: BTreeMap<String, String>,

    /// Event manager for change and cleanup callbacks
    events: Arc<EventManager>,

    /// Per-run scratch directory, created on first use
    temp_dir: Option<TempDir>,
}

impl Settings {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
            events: Arc::new(EventManager::new()),
            temp_dir: None,
        }
    }

    /// Create a store preloaded with the bundled defaults (feed URLs, data
    /// directory, timeouts)
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled defaults fail to parse.
    pub fn with_defaults() -> Result<Self> {
        let mut settings = Self::new();
        settings.merge_str(&crate::storage::JsonStorage, BUNDLED_DEFAULTS)?;
        Ok(settings)
    }

    /// Get the event manager for registering change and cleanup listeners
    pub fn events(&self) -> &Arc<EventManager> {
        &self.events
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    /// Set a value, replacing any previous one
    pub fn set_string(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        let old = self.values.insert(key.to_string(), value.clone());
        if old.as_deref() != Some(value.as_str()) {
            self.events.notify(key, old.as_deref(), Some(&value));
        }
    }

    /// Set a value only if it is present and non-empty
    ///
    /// Returns whether the store was written.
    pub fn set_if_present<V: PropertyValue + ?Sized>(&mut self, key: &str, value: &V) -> bool {
        match value.to_setting() {
            Some(value) => {
                self.set_string(key, value);
                true
            }
            None => false,
        }
    }

    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.set_string(key, value.to_string());
    }

    pub fn set_int(&mut self, key: &str, value: i64) {
        self.set_string(key, value.to_string());
    }

    /// Remove a value, returning it
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let old = self.values.remove(key);
        if let Some(old) = &old {
            self.events.notify(key, Some(old), None);
        }
        old
    }

    /// Copy every pair into the store, later pairs winning
    pub fn merge<I, K, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in values {
            self.set_string(key.as_ref(), value);
        }
    }

    /// Merge a flat map parsed from `content` by `storage`
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be parsed as a flat map of
    /// scalars.
    pub fn merge_str<S: StorageBackend>(&mut self, storage: &S, content: &str) -> Result<()> {
        let values = storage.deserialize_flat(content)?;
        self.merge(values);
        Ok(())
    }

    /// Merge a settings file, picking the format from its extension
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let values = crate::storage::read_flat_file(path)?;
        info!("Merging {} setting(s) from {}", values.len(), path.display());
        self.merge(values);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn get_string_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get_string(key).unwrap_or(default)
    }

    /// Parse a value as an integer
    ///
    /// # Errors
    ///
    /// `Error::InvalidSettingValue` if the value is set but not an integer.
    pub fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get_string(key)
            .map(|raw| {
                raw.trim()
                    .parse::<i64>()
                    .map_err(|e| Error::InvalidSettingValue {
                        key: key.to_string(),
                        reason: format!("'{raw}' is not an integer: {e}"),
                    })
            })
            .transpose()
    }

    /// Parse a value as a boolean (`true`/`false`, case-insensitive)
    ///
    /// # Errors
    ///
    /// `Error::InvalidSettingValue` if the value is set but not a boolean.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        self.get_string(key)
            .map(|raw| match raw.trim() {
                v if v.eq_ignore_ascii_case("true") => Ok(true),
                v if v.eq_ignore_ascii_case("false") => Ok(false),
                _ => Err(Error::InvalidSettingValue {
                    key: key.to_string(),
                    reason: format!("'{raw}' is not a boolean"),
                }),
            })
            .transpose()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over all values in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    // -------------------------------------------------------------------------
    // Paths
    // -------------------------------------------------------------------------

    /// Directory holding the local vulnerability database
    ///
    /// Supports `~` expansion for home directory.
    ///
    /// # Errors
    ///
    /// `Error::Config` if `data.directory` is not set.
    pub fn data_directory(&self) -> Result<PathBuf> {
        let raw = self
            .get_string(keys::DATA_DIRECTORY)
            .ok_or_else(|| Error::Config(format!("'{}' is not set", keys::DATA_DIRECTORY)))?;
        Ok(expand_home(Path::new(raw)))
    }

    /// Path of the local database file inside the data directory
    ///
    /// # Errors
    ///
    /// `Error::Config` if the data directory or file name is not set.
    pub fn database_file(&self) -> Result<PathBuf> {
        let file_name = self
            .get_string(keys::DB_FILE_NAME)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::Config(format!("'{}' is not set", keys::DB_FILE_NAME)))?;
        Ok(self.data_directory()?.join(file_name))
    }

    /// Scratch directory for this run, created on first call
    ///
    /// Lives under `temp.directory` when set, otherwise under the system temp
    /// directory. Removed by `cleanup(true)`.
    ///
    /// # Errors
    ///
    /// `Error::DirectoryCreate` if the directory cannot be created.
    pub fn temp_directory(&mut self) -> Result<&Path> {
        let dir = match self.temp_dir.take() {
            Some(dir) => dir,
            None => {
                let parent = self
                    .get_string(keys::TEMP_DIRECTORY)
                    .map(|p| expand_home(Path::new(p)))
                    .unwrap_or_else(std::env::temp_dir);
                let dir = tempfile::Builder::new()
                    .prefix("dctemp")
                    .tempdir_in(&parent)
                    .map_err(|e| Error::DirectoryCreate {
                        path: parent.clone(),
                        source: e,
                    })?;
                debug!("Created temporary directory {}", dir.path().display());
                dir
            }
        };
        Ok(self.temp_dir.insert(dir).path())
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Log every value at debug level, masking credentials
    pub fn log_properties(&self, header: &str) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }
        let mut out = String::from(header);
        for (key, value) in &self.values {
            let shown = if keys::is_sensitive(key) { "********" } else { value };
            out.push_str(&format!("\n  {key}={shown}"));
        }
        debug!("{out}");
    }

    /// Tear the store down
    ///
    /// Clears every value and, when `delete_temporary` is set, removes the
    /// scratch directory. Cleanup listeners run on every call; calling it
    /// again on a cleared store is harmless.
    pub fn cleanup(&mut self, delete_temporary: bool) {
        if delete_temporary {
            if let Some(dir) = self.temp_dir.take() {
                let path = dir.path().to_path_buf();
                if let Err(e) = dir.close() {
                    log::warn!("Unable to delete temporary directory {}: {e}", path.display());
                }
            }
        }
        self.values.clear();
        self.events.notify_cleanup(delete_temporary);
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let masked: BTreeMap<&str, &str> = self
            .values
            .iter()
            .map(|(k, v)| {
                let shown = if keys::is_sensitive(k) { "********" } else { v.as_str() };
                (k.as_str(), shown)
            })
            .collect();
        f.debug_struct("Settings")
            .field("values", &masked)
            .field("temp_dir", &self.temp_dir.as_ref().map(TempDir::path))
            .finish_non_exhaustive()
    }
}

fn expand_home(path: &Path) -> PathBuf {
    if path.starts_with("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(path.strip_prefix("~").unwrap_or(path));
        }
    }
    path.to_path_buf()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    #[test]
    fn test_defaults_are_loaded() {
        let settings = Settings::with_defaults().unwrap();

        assert_eq!(settings.get_string(keys::DATA_DIRECTORY), Some("data"));
        assert_eq!(settings.get_int(keys::CVE_START_YEAR).unwrap(), Some(2002));
        assert!(
            settings
                .get_string(keys::CVE_SCHEMA_2_0)
                .unwrap()
                .contains("%d")
        );
        assert!(!settings.contains_key(keys::PROXY_SERVER));
    }

    #[test]
    fn test_set_if_present() {
        let mut settings = Settings::new();

        assert!(!settings.set_if_present(keys::PROXY_SERVER, &None::<String>));
        assert!(!settings.set_if_present(keys::PROXY_SERVER, ""));
        assert!(settings.set_if_present(keys::PROXY_SERVER, "proxy.local"));

        assert_eq!(settings.get_string(keys::PROXY_SERVER), Some("proxy.local"));
        assert_eq!(settings.len(), 1);
    }

    #[test]
    fn test_typed_getters() {
        let mut settings = Settings::new();
        settings.set_int(keys::CONNECTION_TIMEOUT, 5000);
        settings.set_bool("analyzer.enabled", true);
        settings.set_string(keys::PROXY_PORT, "eighty");

        assert_eq!(settings.get_int(keys::CONNECTION_TIMEOUT).unwrap(), Some(5000));
        assert_eq!(settings.get_bool("analyzer.enabled").unwrap(), Some(true));
        assert_eq!(settings.get_int("missing").unwrap(), None);
        assert!(matches!(
            settings.get_int(keys::PROXY_PORT),
            Err(Error::InvalidSettingValue { .. })
        ));
        assert_eq!(settings.get_string_or("missing", "fallback"), "fallback");
    }

    #[test]
    fn test_change_events_fire_only_on_change() {
        let mut settings = Settings::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();
        settings.events().on_change(move |_, _, _| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        settings.set_string(keys::DB_USER, "sa");
        settings.set_string(keys::DB_USER, "sa");
        settings.remove(keys::DB_USER);
        settings.remove(keys::DB_USER);

        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_database_file() {
        let mut settings = Settings::new();
        assert!(settings.database_file().is_err());

        settings.set_string(keys::DATA_DIRECTORY, "/var/lib/dc");
        settings.set_string(keys::DB_FILE_NAME, "dc.db");

        assert_eq!(settings.database_file().unwrap(), PathBuf::from("/var/lib/dc/dc.db"));
    }

    #[test]
    fn test_cleanup_removes_temp_directory() {
        let parent = tempdir().unwrap();
        let mut settings = Settings::new();
        settings.set_string(keys::TEMP_DIRECTORY, parent.path().to_string_lossy());

        let temp = settings.temp_directory().unwrap().to_path_buf();
        assert!(temp.exists());
        assert!(temp.starts_with(parent.path()));

        settings.cleanup(true);

        assert!(!temp.exists());
        assert!(settings.is_empty());
    }

    #[test]
    fn test_cleanup_without_delete_keeps_temp_directory() {
        let mut settings = Settings::new();
        let temp = settings.temp_directory().unwrap().to_path_buf();

        settings.cleanup(false);
        assert!(temp.exists());

        settings.cleanup(true);
        assert!(!temp.exists());
    }

    #[test]
    fn test_debug_masks_passwords() {
        let mut settings = Settings::new();
        settings.set_string(keys::DB_PASSWORD, "hunter2");
        settings.set_string(keys::DB_USER, "sa");

        let rendered = format!("{settings:?}");

        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("sa"));
    }
}
