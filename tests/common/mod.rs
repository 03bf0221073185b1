//! Common test utilities for depcheck-task integration tests
//!
//! Provides a scripted engine that counts its calls, a fixture with a
//! throwaway data directory, and helpers for the update task's attributes.

#![allow(dead_code)]

use depcheck_task::{
    DatabaseError, Engine, EngineError, EnvironmentHandler, Settings, UpdateTask, keys,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

// =============================================================================
// Scripted Engine
// =============================================================================

/// What `MockEngine::do_updates` should do
#[derive(Debug, Clone)]
pub enum Outcome {
    Succeed,
    DatabaseDown(&'static str),
    Fail(&'static str),
}

/// An engine failure unrelated to the database
#[derive(Debug)]
pub struct FeedError(pub &'static str);

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "feed download failed: {}", self.0)
    }
}

impl std::error::Error for FeedError {}

/// Call counters shared between a test and the engines it hands out
#[derive(Debug, Clone, Default)]
pub struct Calls {
    pub created: Arc<AtomicUsize>,
    pub updates: Arc<AtomicUsize>,
    pub cleanups: Arc<AtomicUsize>,
}

impl Calls {
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn cleanups(&self) -> usize {
        self.cleanups.load(Ordering::SeqCst)
    }
}

pub struct MockEngine {
    outcome: Outcome,
    calls: Calls,
    /// Settings the engine was built from
    pub seen: HashMap<String, String>,
}

impl Engine for MockEngine {
    fn do_updates(&mut self) -> Result<(), EngineError> {
        self.calls.updates.fetch_add(1, Ordering::SeqCst);
        match self.outcome {
            Outcome::Succeed => Ok(()),
            Outcome::DatabaseDown(msg) => Err(DatabaseError::new(msg).into()),
            Outcome::Fail(msg) => Err(EngineError::other(FeedError(msg))),
        }
    }

    fn cleanup(&mut self) {
        self.calls.cleanups.fetch_add(1, Ordering::SeqCst);
    }
}

/// Factory closure producing a `MockEngine` with the given outcome
pub fn engine(
    outcome: Outcome,
    calls: &Calls,
) -> impl FnOnce(&Settings) -> Result<MockEngine, EngineError> {
    let calls = calls.clone();
    move |settings: &Settings| {
        calls.created.fetch_add(1, Ordering::SeqCst);
        Ok(MockEngine {
            outcome,
            calls,
            seen: settings
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        })
    }
}

/// Factory closure that captures the settings the engine would see
pub fn capturing(
    captured: &Arc<std::sync::Mutex<HashMap<String, String>>>,
    calls: &Calls,
) -> impl FnOnce(&Settings) -> Result<MockEngine, EngineError> {
    let captured = Arc::clone(captured);
    let inner = engine(Outcome::Succeed, calls);
    move |settings: &Settings| {
        let engine = inner(settings)?;
        *captured.lock().unwrap() = engine.seen.clone();
        Ok(engine)
    }
}

// =============================================================================
// Test Fixtures
// =============================================================================

/// Test fixture with a temporary data directory and an update task bound to it
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub task: UpdateTask,
    pub calls: Calls,
}

impl TestFixture {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut task = UpdateTask::new();
        task.base
            .set_data_directory(temp_dir.path().join("data").to_string_lossy());

        Self {
            temp_dir,
            task,
            calls: Calls::default(),
        }
    }

    /// Same as `new`, reading overrides from the given variables only
    pub fn with_env(vars: &[(&str, &str)]) -> Self {
        let mut fixture = Self::new();
        fixture.task = fixture.task.clone().with_env(fake_env(vars));
        fixture
    }

    /// A settings store that counts its cleanups
    pub fn counted_settings(&self) -> (Settings, Arc<AtomicUsize>) {
        let settings = Settings::with_defaults().expect("bundled defaults");
        let cleanups = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&cleanups);
        settings.events().on_cleanup(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (settings, cleanups)
    }
}

/// An environment handler backed by a fixed map instead of the process env
pub fn fake_env(vars: &[(&str, &str)]) -> EnvironmentHandler {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    EnvironmentHandler::with_source("DEPCHECK", Arc::new(move |name: &str| vars.get(name).cloned()))
}

// =============================================================================
// Update Task Attributes
// =============================================================================

/// Every update attribute with the key it binds and a sample value
pub const UPDATE_ATTRIBUTES: &[(&str, &str, &str)] = &[
    ("proxyServer", keys::PROXY_SERVER, "proxy.example.org"),
    ("proxyPort", keys::PROXY_PORT, "3128"),
    ("proxyUsername", keys::PROXY_USERNAME, "builder"),
    ("proxyPassword", keys::PROXY_PASSWORD, "hunter2"),
    ("connectionTimeout", keys::CONNECTION_TIMEOUT, "2500"),
    ("databaseDriverName", keys::DB_DRIVER_NAME, "org.h2.Driver"),
    ("databaseDriverPath", keys::DB_DRIVER_PATH, "/opt/h2/h2.jar"),
    ("connectionString", keys::DB_CONNECTION_STRING, "jdbc:h2:file:/tmp/nvd"),
    ("databaseUser", keys::DB_USER, "nvd"),
    ("databasePassword", keys::DB_PASSWORD, "s3cret"),
    ("cveUrl12Modified", keys::CVE_MODIFIED_12_URL, "https://mirror.local/12-modified.xml"),
    ("cveUrl20Modified", keys::CVE_MODIFIED_20_URL, "https://mirror.local/20-modified.xml"),
    ("cveUrl12Base", keys::CVE_SCHEMA_1_2, "https://mirror.local/12-%d.xml"),
    ("cveUrl20Base", keys::CVE_SCHEMA_2_0, "https://mirror.local/20-%d.xml"),
];
