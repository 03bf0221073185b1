//! The seam between a task and the external update engine
//!
//! The engine owns everything that actually talks to the NVD and the local
//! database. A task only builds it from populated [`Settings`], asks it to
//! update, and tears it down.

use crate::error::EngineError;
use crate::settings::Settings;

/// An update engine driven by a task
pub trait Engine {
    /// Download the latest NVD data and store it in the local database
    ///
    /// # Errors
    ///
    /// `EngineError::Database` when the local database cannot be reached;
    /// `EngineError::Other` for anything else.
    fn do_updates(&mut self) -> Result<(), EngineError>;

    /// Release database connections and other engine state
    ///
    /// Must be safe to call more than once.
    fn cleanup(&mut self);
}

/// Builds an [`Engine`] from populated settings
///
/// Implemented for closures, so `|settings: &Settings| MyEngine::open(settings)`
/// can be passed wherever a factory is expected.
pub trait EngineFactory {
    type Engine: Engine;

    /// # Errors
    ///
    /// `EngineError::Database` when the engine cannot open its database.
    fn create(self, settings: &Settings) -> Result<Self::Engine, EngineError>;
}

impl<F, E> EngineFactory for F
where
    F: FnOnce(&Settings) -> Result<E, EngineError>,
    E: Engine,
{
    type Engine = E;

    fn create(self, settings: &Settings) -> Result<E, EngineError> {
        self(settings)
    }
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn do_updates(&mut self) -> Result<(), EngineError> {
        (**self).do_updates()
    }

    fn cleanup(&mut self) {
        (**self).cleanup();
    }
}
