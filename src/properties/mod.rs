//! Task attribute structs and their mapping onto settings keys
//!
//! A task's attributes are a flat struct of optional values. Each bound field
//! has a fixed settings key; `populate_settings` copies every present,
//! non-empty value under its key and leaves the rest of the store alone.
//! Implementations are normally generated with `#[derive(TaskProperties)]`.

mod env;
mod value;

pub use env::{DefaultEnvSource, EnvSource, EnvironmentHandler};
pub use value::{FromProperty, PropertyValue};

use crate::error::{Error, Result};
use crate::settings::Settings;
use std::path::Path;

/// Static description of one task attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Attribute name as the host build system spells it (e.g. `proxyServer`)
    pub name: &'static str,
    /// Settings key the value is written under, if the attribute is bound
    pub key: Option<&'static str>,
    /// Never log or document the value
    pub secret: bool,
    pub description: Option<&'static str>,
}

/// A struct of task attributes
pub trait TaskProperties {
    /// All attributes, in declaration order
    fn descriptors() -> Vec<PropertyDescriptor>;

    /// Write every present, non-empty bound value into `settings`
    ///
    /// Unset and empty values leave their key untouched, so calling this twice
    /// yields the same store as calling it once.
    fn populate_settings(&self, settings: &mut Settings);

    /// Assign one attribute by name
    ///
    /// # Errors
    ///
    /// `Error::UnknownAttribute` for a name no field carries,
    /// `Error::InvalidAttribute` when the value does not parse.
    fn set_attribute(&mut self, name: &str, value: &str) -> Result<()>;

    /// Assign several attributes by name, stopping at the first failure
    ///
    /// # Errors
    ///
    /// See [`TaskProperties::set_attribute`].
    fn apply_attributes<I, K, V>(&mut self, attributes: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in attributes {
            self.set_attribute(name.as_ref(), value.as_ref())?;
        }
        Ok(())
    }

    /// Build from a set of named attributes, starting from the defaults
    ///
    /// # Errors
    ///
    /// See [`TaskProperties::set_attribute`].
    fn from_attributes<I, K, V>(attributes: I) -> Result<Self>
    where
        Self: Default + Sized,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut properties = Self::default();
        properties.apply_attributes(attributes)?;
        Ok(properties)
    }

    /// Load attributes from a task file (JSON, or TOML/YAML with features)
    ///
    /// Attributes not present in the file keep their current value.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or carries an
    /// unknown or invalid attribute.
    fn load_attributes(&mut self, path: &Path) -> Result<()> {
        let attributes = crate::storage::read_flat_file(path)?;
        log::debug!(
            "Loaded {} task attribute(s) from {}",
            attributes.len(),
            path.display()
        );
        self.apply_attributes(attributes)
    }

    /// Settings keys bound by this struct, with their secret flag
    fn bound_keys() -> Vec<(&'static str, bool)> {
        Self::descriptors()
            .into_iter()
            .filter_map(|d| d.key.map(|key| (key, d.secret)))
            .collect()
    }
}

/// Parse one attribute value, naming the attribute on failure
///
/// Used by the derive-generated `set_attribute`.
///
/// # Errors
///
/// `Error::InvalidAttribute` with the parser's reason.
pub fn parse_attribute<T: FromProperty>(name: &str, value: &str) -> Result<T> {
    T::from_property(value).map_err(|reason| Error::InvalidAttribute {
        name: name.to_string(),
        reason,
    })
}
