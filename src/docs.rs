//! Documentation generator for task attributes
//!
//! Renders a markdown reference from the descriptors a [`TaskProperties`]
//! implementation reports.

use crate::properties::{PropertyDescriptor, TaskProperties};
use std::fmt::Write;

/// Configuration for docs generation
#[derive(Debug, Clone, Default)]
pub struct DocsConfig {
    /// Title for the documentation
    pub title: Option<String>,
    /// Description/introduction text
    pub description: Option<String>,
    /// Whether to list attributes that are not bound to a settings key
    pub show_unbound: bool,
}

impl DocsConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            show_unbound: true,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    #[must_use]
    pub fn hide_unbound(mut self) -> Self {
        self.show_unbound = false;
        self
    }
}

/// Generate markdown documentation for a task's attributes
#[must_use]
pub fn generate_docs<P: TaskProperties>(config: DocsConfig) -> String {
    generate_docs_from_descriptors(&P::descriptors(), config)
}

/// Generate docs from raw descriptors, e.g. when merging several attribute
/// structs into one page
#[must_use]
pub fn generate_docs_from_descriptors(descriptors: &[PropertyDescriptor], config: DocsConfig) -> String {
    let mut output = String::new();

    let title = config
        .title
        .unwrap_or_else(|| "Task Attributes".to_string());
    let _ = writeln!(output, "# {title}\n");

    if let Some(desc) = config.description {
        let _ = writeln!(output, "{desc}\n");
    }

    output.push_str("| Attribute | Settings key | Description |\n");
    output.push_str("|-----------|--------------|-------------|\n");

    for descriptor in descriptors
        .iter()
        .filter(|d| config.show_unbound || d.key.is_some())
    {
        format_row(&mut output, descriptor);
    }

    if descriptors.iter().any(|d| d.secret) {
        output.push_str("\nAttributes marked **Secret** are masked in log output.\n");
    }

    output
}

fn format_row(out: &mut String, descriptor: &PropertyDescriptor) {
    let key = descriptor
        .key
        .map_or_else(|| "-".to_string(), |k| format!("`{k}`"));

    let mut description = escape_cell(descriptor.description.unwrap_or(""));
    if descriptor.secret {
        if description.is_empty() {
            description.push_str("**Secret**");
        } else {
            description.push_str(" (**Secret**)");
        }
    }

    let _ = writeln!(out, "| `{}` | {key} | {description} |", descriptor.name);
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}
