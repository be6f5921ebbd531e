//! Client-side elements declared inline by fragments.

use crate::fragment::FragmentNode;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtensionKind {
    Control,
    Tab,
}

/// An extension the host must register before rendering the ribbon.
///
/// Fragments may define a control or a contextual tab in place instead of
/// referencing one that already exists. The definition is kept as written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedExtension {
    pub id: String,
    pub kind: ExtensionKind,
    pub plugin: String,
    pub definition: FragmentNode,
}

/// A fresh id for an inline definition that does not name one.
pub(crate) fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
