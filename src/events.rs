//! Event system for settings changes
//!
//! Lets the host build system (and tests) observe what a task writes into the
//! settings store and when the store is torn down.

use crate::sync::RwLockExt;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;

/// Type alias for a change callback: (`key`, `old_value`, `new_value`)
pub type ChangeCallback = Arc<dyn Fn(&str, Option<&str>, Option<&str>) + Send + Sync>;

/// Type alias for a cleanup callback, receiving the `delete_temporary` flag
pub type CleanupCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Manages event listeners for a [`Settings`](crate::Settings) store
pub struct EventManager {
    /// Global listeners (called for all changes)
    global_listeners: RwLock<Vec<ChangeCallback>>,

    /// Per-key listeners (called only for specific setting changes)
    key_listeners: RwLock<HashMap<String, Vec<ChangeCallback>>>,

    /// Called once per `Settings::cleanup`
    cleanup_listeners: RwLock<Vec<CleanupCallback>>,
}

impl EventManager {
    /// Create a new event manager
    #[must_use]
    pub fn new() -> Self {
        Self {
            global_listeners: RwLock::new(Vec::new()),
            key_listeners: RwLock::new(HashMap::new()),
            cleanup_listeners: RwLock::new(Vec::new()),
        }
    }

    /// Register a global change listener (called for all settings changes)
    ///
    /// # Arguments
    /// * `callback` - Function receiving (`key`, `old_value`, `new_value`)
    pub fn on_change<F>(&self, callback: F)
    where
        F: Fn(&str, Option<&str>, Option<&str>) + Send + Sync + 'static,
    {
        self.global_listeners
            .write_recovered()
            .push(Arc::new(callback));
    }

    /// Register a listener for a specific setting key
    ///
    /// # Arguments
    /// * `key` - The setting key (e.g., "`proxy.server`")
    /// * `callback` - Function receiving (`key`, `old_value`, `new_value`)
    pub fn watch<F>(&self, key: &str, callback: F)
    where
        F: Fn(&str, Option<&str>, Option<&str>) + Send + Sync + 'static,
    {
        self.key_listeners
            .write_recovered()
            .entry(key.to_string())
            .or_default()
            .push(Arc::new(callback));
    }

    /// Register a listener called whenever the store is cleaned up
    pub fn on_cleanup<F>(&self, callback: F)
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.cleanup_listeners
            .write_recovered()
            .push(Arc::new(callback));
    }

    /// Notify all listeners about a change
    ///
    /// `old_value` is `None` when the key was not set before, `new_value` is
    /// `None` when the key was removed.
    pub fn notify(&self, key: &str, old_value: Option<&str>, new_value: Option<&str>) {
        // Snapshot the callbacks so a listener may register others
        let global: Vec<ChangeCallback> = self.global_listeners.read_recovered().clone();
        for callback in &global {
            callback(key, old_value, new_value);
        }

        let keyed: Vec<ChangeCallback> = self
            .key_listeners
            .read_recovered()
            .get(key)
            .cloned()
            .unwrap_or_default();
        for callback in &keyed {
            callback(key, old_value, new_value);
        }
    }

    /// Notify cleanup listeners
    pub fn notify_cleanup(&self, delete_temporary: bool) {
        let listeners: Vec<CleanupCallback> = self.cleanup_listeners.read_recovered().clone();
        for callback in &listeners {
            callback(delete_temporary);
        }
    }

    /// Remove all listeners for a specific key
    pub fn unwatch(&self, key: &str) {
        self.key_listeners.write_recovered().remove(key);
    }

    /// Clear all listeners
    pub fn clear(&self) {
        self.global_listeners.write_recovered().clear();
        self.key_listeners.write_recovered().clear();
        self.cleanup_listeners.write_recovered().clear();
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventManager")
            .field("global_listeners", &self.global_listeners.read_recovered().len())
            .field("key_listeners", &self.key_listeners.read_recovered().len())
            .field("cleanup_listeners", &self.cleanup_listeners.read_recovered().len())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
