//! Translatable labels of tabs and groups.

use serde::Serialize;
use std::fmt;

/// Catalogue used when a fragment does not name one.
pub const DEFAULT_CATALOGUE: &str = "application";

/// A label as declared by a fragment.
///
/// Translatable labels are a key in a message catalogue and are written as
/// `catalogue:key`. Plain labels are written verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Label {
    pub catalogue: String,
    pub key: String,
    pub i18n: bool,
}

impl Label {
    pub fn new(catalogue: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            catalogue: catalogue.into(),
            key: key.into(),
            i18n: true,
        }
    }

    /// A label that is not looked up in any catalogue.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            catalogue: String::new(),
            key: text.into(),
            i18n: false,
        }
    }

    /// Value of the `label` attribute in the output document.
    pub fn to_attribute(&self) -> String {
        if self.i18n {
            format!("{}:{}", self.catalogue, self.key)
        } else {
            self.key.clone()
        }
    }

    /// Whether `text` designates this label, either by key or written in
    /// full as `catalogue:key`.
    pub fn is_named(&self, text: &str) -> bool {
        self.key == text || (self.i18n && self.to_attribute() == text)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_attribute())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_forms() {
        assert_eq!(Label::new(DEFAULT_CATALOGUE, "HOME").to_attribute(), "application:HOME");
        assert_eq!(Label::plain("Home").to_attribute(), "Home");
    }

    #[test]
    fn test_is_named() {
        let label = Label::new("plugin.cms", "TAB_EDIT");
        assert!(label.is_named("TAB_EDIT"));
        assert!(label.is_named("plugin.cms:TAB_EDIT"));
        assert!(!label.is_named("application:TAB_EDIT"));
        assert!(!Label::plain("a:b").is_named(":a:b"));
    }

    #[test]
    fn test_catalogue_is_part_of_equality() {
        assert_ne!(Label::new("application", "X"), Label::new("plugin.core", "X"));
        assert_ne!(Label::new("", "X"), Label::plain("X"));
    }
}
