//! Storage backends for settings and task attribute files
//!
//! Files are flat maps from a name (settings key or task attribute) to a
//! scalar value. JSON is always available; TOML and YAML sit behind the
//! `toml` and `yaml` features.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::Path;

/// Trait for storage backend implementations
pub trait StorageBackend {
    /// File extension for this storage format (e.g., "json", "toml")
    fn extension(&self) -> &str;

    /// Whether `path` carries this backend's extension (case-insensitive)
    fn handles(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(self.extension()))
    }

    /// Deserialize data from string
    fn deserialize<T: DeserializeOwned>(&self, content: &str) -> Result<T>;

    /// Read and deserialize from file
    fn read<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.deserialize(&content)
    }

    /// Read a flat map of scalar values, rendering each as a string
    fn read_flat(&self, path: &Path) -> Result<BTreeMap<String, String>> {
        flatten(self.read(path)?)
    }

    /// Parse a flat map of scalar values from a string
    fn deserialize_flat(&self, content: &str) -> Result<BTreeMap<String, String>> {
        flatten(self.deserialize(content)?)
    }
}

fn flatten(raw: BTreeMap<String, serde_json::Value>) -> Result<BTreeMap<String, String>> {
    raw.into_iter()
        .filter_map(|(name, value)| scalar_to_string(&name, value).transpose())
        .collect()
}

/// Render a scalar as the string a task attribute would carry
///
/// `null` drops the entry; nested arrays and objects are rejected.
fn scalar_to_string(name: &str, value: serde_json::Value) -> Result<Option<(String, String)>> {
    use serde_json::Value;

    let rendered = match value {
        Value::Null => return Ok(None),
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => {
            return Err(Error::Parse(format!(
                "'{name}' must be a string, number or boolean"
            )));
        }
    };
    Ok(Some((name.to_string(), rendered)))
}

/// Read a flat map from `path`, choosing the backend from its extension
///
/// Unknown or missing extensions are read as JSON.
pub fn read_flat_file(path: &Path) -> Result<BTreeMap<String, String>> {
    #[cfg(feature = "toml")]
    if TomlStorage.handles(path) {
        return TomlStorage.read_flat(path);
    }
    #[cfg(feature = "yaml")]
    if YamlStorage.handles(path) {
        return YamlStorage.read_flat(path);
    }
    JsonStorage.read_flat(path)
}

// =============================================================================
// JSON Storage Implementation
// =============================================================================

/// JSON storage backend (default)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStorage;

impl StorageBackend for JsonStorage {
    fn extension(&self) -> &str {
        "json"
    }

    fn deserialize<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        serde_json::from_str(content).map_err(Error::from)
    }
}

// =============================================================================
// TOML Storage Implementation
// =============================================================================

/// TOML storage backend
#[cfg(feature = "toml")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlStorage;

#[cfg(feature = "toml")]
impl StorageBackend for TomlStorage {
    fn extension(&self) -> &str {
        "toml"
    }

    fn deserialize<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        toml::from_str(content).map_err(|e| Error::Parse(e.to_string()))
    }
}

// =============================================================================
// YAML Storage Implementation
// =============================================================================

/// YAML storage backend
#[cfg(feature = "yaml")]
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlStorage;

#[cfg(feature = "yaml")]
impl StorageBackend for YamlStorage {
    fn extension(&self) -> &str {
        "yaml"
    }

    fn handles(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
    }

    fn deserialize<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        serde_yaml::from_str(content).map_err(|e| Error::Parse(e.to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================
