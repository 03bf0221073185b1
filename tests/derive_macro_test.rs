//! Integration tests for depcheck-task-derive
//!
//! Tests the `#[derive(TaskProperties)]` macro with various attribute combinations.

use depcheck_task::{
    DocsConfig, Error, PropertyDescriptor, Settings, TaskProperties, generate_docs,
};
use std::path::PathBuf;

const MIRROR_KEY: &str = "mirror.url";

// =============================================================================
// Basic Derive Tests
// =============================================================================

#[derive(Debug, Default, TaskProperties)]
struct MirrorProperties {
    #[task(key = MIRROR_KEY, description = "Base URL of the mirror")]
    mirror_url: Option<String>,

    #[task(key = "mirror.port")]
    port: Option<u16>,

    #[task(key = "mirror.verify", name = "verifyTls")]
    verify: bool,

    #[task(key = "mirror.token", secret)]
    token: Option<String>,

    #[task(key = "mirror.cache")]
    cache_dir: Option<PathBuf>,

    /// Accepted as an attribute but never written to settings
    #[task(description = "Free-form note")]
    note: Option<String>,

    #[task(skip)]
    scratch: Vec<u8>,
}

#[test]
fn test_descriptors() {
    let descriptors = MirrorProperties::descriptors();

    let names: Vec<_> = descriptors.iter().map(|d| d.name).collect();
    assert_eq!(
        names,
        ["mirrorUrl", "port", "verifyTls", "token", "cacheDir", "note"]
    );
    assert_eq!(
        descriptors[0],
        PropertyDescriptor {
            name: "mirrorUrl",
            key: Some("mirror.url"),
            secret: false,
            description: Some("Base URL of the mirror"),
        }
    );
    assert!(descriptors[3].secret);
    assert_eq!(descriptors[5].key, None);
}

#[test]
fn test_bound_keys_exclude_unbound_fields() {
    let keys = MirrorProperties::bound_keys();

    assert_eq!(keys.len(), 5);
    assert!(keys.contains(&("mirror.token", true)));
    assert!(keys.iter().all(|(key, _)| key.starts_with("mirror.")));
}

// =============================================================================
// Attribute Assignment
// =============================================================================

#[test]
fn test_set_attribute_parses_types() {
    let mut props = MirrorProperties::default();

    props.set_attribute("MIRRORURL", "https://mirror.local").unwrap();
    props.set_attribute("port", "8443").unwrap();
    props.set_attribute("verifytls", "yes").unwrap();
    props.set_attribute("cacheDir", "/var/cache/nvd").unwrap();

    assert_eq!(props.mirror_url.as_deref(), Some("https://mirror.local"));
    assert_eq!(props.port, Some(8443));
    assert!(props.verify);
    assert_eq!(props.cache_dir, Some(PathBuf::from("/var/cache/nvd")));
}

#[test]
fn test_set_attribute_errors() {
    let mut props = MirrorProperties::default();

    let err = props.set_attribute("port", "eighty").unwrap_err();
    assert!(matches!(err, Error::InvalidAttribute { ref name, .. } if name == "port"));

    // Renamed fields only answer to their attribute name
    assert!(matches!(
        props.set_attribute("verify", "true"),
        Err(Error::UnknownAttribute(_))
    ));
    assert!(matches!(
        props.set_attribute("scratch", "x"),
        Err(Error::UnknownAttribute(_))
    ));
}

#[test]
fn test_from_attributes() {
    let props = MirrorProperties::from_attributes([("token", "abc"), ("port", "")]).unwrap();

    assert_eq!(props.token.as_deref(), Some("abc"));
    assert_eq!(props.port, None);
    assert!(props.scratch.is_empty());
}

// =============================================================================
// Settings Population
// =============================================================================

#[test]
fn test_populate_writes_present_values_only() {
    let mut props = MirrorProperties::default();
    props.set_attribute("mirrorUrl", "https://mirror.local").unwrap();
    props.set_attribute("note", "ignored by settings").unwrap();
    props.token = Some(String::new());
    let mut settings = Settings::new();

    props.populate_settings(&mut settings);

    assert_eq!(settings.get_string("mirror.url"), Some("https://mirror.local"));
    assert_eq!(settings.get_string("mirror.verify"), Some("false"));
    assert!(!settings.contains_key("mirror.port"));
    assert!(!settings.contains_key("mirror.token"));
    assert!(!settings.contains_key("mirror.cache"));
    assert_eq!(settings.len(), 2);
    assert_eq!(props.note.as_deref(), Some("ignored by settings"));
}

#[test]
fn test_generated_docs_use_descriptors() {
    let docs = generate_docs::<MirrorProperties>(DocsConfig::new().hide_unbound());

    assert!(docs.contains("| `mirrorUrl` | `mirror.url` | Base URL of the mirror |"));
    assert!(docs.contains("| `token` | `mirror.token` | **Secret** |"));
    assert!(!docs.contains("note"));
}
