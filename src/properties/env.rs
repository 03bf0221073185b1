//! Environment variable overrides for settings keys
//!
//! With prefix `DEPCHECK`, the key `cve.url-2.0.base` is read from
//! `DEPCHECK_CVE_URL_2_0_BASE`.

use std::sync::Arc;

/// Source of environment variables
pub trait EnvSource: Send + Sync {
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEnvSource;

impl EnvSource for DefaultEnvSource {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<F> EnvSource for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn var(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Handles environment variable lookups for settings keys
#[derive(Clone)]
pub struct EnvironmentHandler {
    prefix: String,
    allow_secrets: bool,
    source: Arc<dyn EnvSource>,
}

impl EnvironmentHandler {
    /// Read overrides from the process environment
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::with_source(prefix, Arc::new(DefaultEnvSource))
    }

    pub fn with_source(prefix: impl Into<String>, source: Arc<dyn EnvSource>) -> Self {
        Self {
            prefix: prefix.into(),
            allow_secrets: false,
            source,
        }
    }

    /// Allow overriding password keys from the environment
    ///
    /// Off by default; CI systems that inject credentials through the
    /// environment turn it on.
    #[must_use]
    pub fn allow_secrets(mut self, allow: bool) -> Self {
        self.allow_secrets = allow;
        self
    }

    /// Environment variable name for a settings key
    ///
    /// Format: `{PREFIX}_{KEY}`, upper-cased, with `.` and `-` mapped to `_`
    pub fn var_name(&self, key: &str) -> String {
        let env_key: String = key
            .chars()
            .map(|c| match c {
                '.' | '-' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();
        format!("{}_{}", self.prefix.to_uppercase(), env_key)
    }

    /// Look up the override for a key
    ///
    /// Empty variables count as unset, like empty task attributes.
    pub fn lookup(&self, key: &str, secret: bool) -> Option<String> {
        if secret && !self.allow_secrets {
            return None;
        }
        self.source
            .var(&self.var_name(key))
            .filter(|value| !value.is_empty())
    }
}

impl std::fmt::Debug for EnvironmentHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentHandler")
            .field("prefix", &self.prefix)
            .field("allow_secrets", &self.allow_secrets)
            .finish_non_exhaustive()
    }
}
