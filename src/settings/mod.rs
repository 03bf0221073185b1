//! The settings store handed to the update engine
//!
//! - [`Settings`] - owned key/value store with change and cleanup events
//! - [`keys`] - the fixed keys the engine reads

pub mod keys;
mod store;

pub use store::Settings;
