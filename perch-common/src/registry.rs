//! Custom element names
//!
//! Each tag may be defined once per page. The browser enforces the same rule;
//! this registry lets the names be checked before anything touches the DOM.

use std::collections::HashMap;

use crate::error::RegistryError;

/// Tag of the portal element
pub const PORTAL_TAG: &str = "perch-portal";
/// Tag of the shared container element
pub const CONTAINER_TAG: &str = "perch-portal-target";

/// Names HTML reserves even though they contain a hyphen
const RESERVED_NAMES: &[&str] = &[
    "annotation-xml",
    "color-profile",
    "font-face",
    "font-face-src",
    "font-face-uri",
    "font-face-format",
    "font-face-name",
    "missing-glyph",
];

/// What a defined tag renders as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Forwards its children into a proxy node in the shared container
    Portal,
    /// The shared container itself; a plain element
    Container,
}

/// Valid custom element name: starts with a lowercase ASCII letter, contains
/// a hyphen, has no uppercase letters, and isn't reserved.
pub fn is_valid_custom_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_lower = matches!(chars.next(), Some(c) if c.is_ascii_lowercase());
    starts_lower
        && name.contains('-')
        && !name.chars().any(|c| c.is_ascii_uppercase() || c.is_whitespace())
        && !RESERVED_NAMES.contains(&name)
}

#[derive(Debug, Default)]
pub struct ElementRegistry {
    defined: HashMap<String, ElementKind>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, name: &str, kind: ElementKind) -> Result<(), RegistryError> {
        if !is_valid_custom_element_name(name) {
            return Err(RegistryError::InvalidName(name.to_string()));
        }
        if self.defined.contains_key(name) {
            return Err(RegistryError::AlreadyDefined(name.to_string()));
        }
        self.defined.insert(name.to_string(), kind);
        Ok(())
    }

    /// Define the portal and container tags.
    pub fn define_defaults(&mut self) -> Result<(), RegistryError> {
        self.define(PORTAL_TAG, ElementKind::Portal)?;
        self.define(CONTAINER_TAG, ElementKind::Container)
    }

    pub fn get(&self, name: &str) -> Option<ElementKind> {
        self.defined.get(name).copied()
    }
}
