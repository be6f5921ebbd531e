//! Configuration fragments contributed by plugins.
//!
//! A fragment is a tree of tags, ordered attributes and text, detached from
//! the XML it was read from but still carrying source locations. Fragments
//! are what exclusions filter and what the builder merges.

use crate::error::RibbonError;
use indexmap::IndexMap;
use ribbon_error_reporting::DiagnosticMessage;
use ribbon_source_map::SourceInfo;
use ribbon_xml::XmlElement;
use serde::Serialize;
use std::fmt;

/// Where a fragment comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Origin {
    pub plugin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Origin {
    pub fn new(plugin: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            ..Default::default()
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "plugin `{}`", self.plugin)?;
        if let Some(extension) = &self.extension {
            write!(f, ", extension `{}`", extension)?;
        }
        if let Some(file) = &self.file {
            write!(f, ", file `{}`", file)?;
        }
        Ok(())
    }
}

/// An attribute value and where it was written.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Attribute {
    pub value: String,
    #[serde(skip)]
    pub source_info: Option<SourceInfo>,
}

/// One node of a fragment tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FragmentNode {
    /// Qualified tag name.
    pub tag: String,
    pub attributes: IndexMap<String, Attribute>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FragmentNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip)]
    pub source_info: Option<SourceInfo>,
}

impl FragmentNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
            text: None,
            source_info: None,
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(
            name.into(),
            Attribute {
                value: value.into(),
                source_info: None,
            },
        );
        self
    }

    pub fn with_child(mut self, child: FragmentNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Convert a parsed XML element, keeping source locations.
    ///
    /// Text is kept only for elements without child elements.
    pub fn from_xml(element: &XmlElement) -> Self {
        let attributes = element
            .attributes
            .iter()
            .map(|attr| {
                (
                    attr.qualified_name(),
                    Attribute {
                        value: attr.value.clone(),
                        source_info: Some(attr.value_source.clone()),
                    },
                )
            })
            .collect();

        let children: Vec<FragmentNode> = element
            .all_children()
            .into_iter()
            .map(FragmentNode::from_xml)
            .collect();

        let text = if children.is_empty() {
            element.text_content()
        } else {
            None
        };

        Self {
            tag: element.qualified_name(),
            attributes,
            children,
            text,
            source_info: Some(element.source_info.clone()),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|a| a.value.as_str())
    }

    pub fn attr_source(&self, name: &str) -> Option<&SourceInfo> {
        self.attributes
            .get(name)
            .and_then(|a| a.source_info.as_ref())
            .or(self.source_info.as_ref())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn child(&self, tag: &str) -> Option<&FragmentNode> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Text content, trimmed; `None` when blank.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    /// Remove every `<control id="...">` with the given id, at any depth.
    ///
    /// Returns the number of nodes removed.
    pub fn remove_controls(&mut self, id: &str) -> usize {
        let before = self.children.len();
        self.children
            .retain(|c| !(c.tag == "control" && c.attr("id") == Some(id)));
        let mut removed = before - self.children.len();
        for child in &mut self.children {
            removed += child.remove_controls(id);
        }
        removed
    }
}

/// What a fragment contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    Tab,
    AppMenu,
    UserMenu,
    Exclusion,
}

impl FragmentKind {
    pub fn of_tag(tag: &str) -> Option<Self> {
        match tag {
            "tab" => Some(FragmentKind::Tab),
            "app-menu" => Some(FragmentKind::AppMenu),
            "user-menu" => Some(FragmentKind::UserMenu),
            t if t.starts_with("exclude-") => Some(FragmentKind::Exclusion),
            _ => None,
        }
    }
}

/// A top-level contribution of one plugin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fragment {
    pub origin: Origin,
    pub root: FragmentNode,
}

impl Fragment {
    pub fn new(origin: Origin, root: FragmentNode) -> Self {
        Self { origin, root }
    }

    pub fn from_xml(element: &XmlElement, origin: Origin) -> Self {
        Self::new(origin, FragmentNode::from_xml(element))
    }

    pub fn kind(&self) -> Option<FragmentKind> {
        FragmentKind::of_tag(&self.root.tag)
    }
}

/// Split a ribbon document into its top-level fragments.
///
/// A document may be a single fragment (`<tab>`, `<app-menu>`, ...) or a
/// `<ribbon>` element holding `<app-menu>`, `<user-menu>`, `<tabs>` and
/// `<exclude>` blocks. Unknown tags are skipped with a diagnostic.
pub fn fragments_from_document(
    root: &XmlElement,
    origin: &Origin,
    diagnostics: &mut Vec<DiagnosticMessage>,
) -> Vec<Fragment> {
    let root_tag = root.qualified_name();
    if FragmentKind::of_tag(&root_tag).is_some() {
        return vec![Fragment::from_xml(root, origin.clone())];
    }

    let mut fragments = Vec::new();
    let unknown = |element: &XmlElement, context: &str, diagnostics: &mut Vec<DiagnosticMessage>| {
        let error = RibbonError::UnknownTag {
            tag: element.qualified_name(),
            context: context.to_string(),
            source_info: Some(element.name_source.clone()),
        };
        tracing::warn!(%origin, "{}", error);
        diagnostics.push(error.to_diagnostic());
    };

    for child in root.all_children() {
        let tag = child.qualified_name();
        match tag.as_str() {
            "app-menu" | "user-menu" => fragments.push(Fragment::from_xml(child, origin.clone())),
            "tabs" => {
                for tab in child.all_children() {
                    if tab.qualified_name() == "tab" {
                        fragments.push(Fragment::from_xml(tab, origin.clone()));
                    } else {
                        unknown(tab, "<tabs>", diagnostics);
                    }
                }
            }
            "exclude" => {
                for exclusion in child.all_children() {
                    if exclusion.qualified_name().starts_with("exclude-") {
                        fragments.push(Fragment::from_xml(exclusion, origin.clone()));
                    } else {
                        unknown(exclusion, "<exclude>", diagnostics);
                    }
                }
            }
            t if t.starts_with("exclude-") => {
                fragments.push(Fragment::from_xml(child, origin.clone()))
            }
            _ => unknown(child, "a ribbon document", diagnostics),
        }
    }

    tracing::debug!(%origin, count = fragments.len(), "split ribbon document");
    fragments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(xml: &str) -> (Vec<Fragment>, Vec<DiagnosticMessage>) {
        let doc = ribbon_xml::parse(xml).unwrap();
        let mut diagnostics = Vec::new();
        let fragments = fragments_from_document(&doc.root, &Origin::new("core"), &mut diagnostics);
        (fragments, diagnostics)
    }

    #[test]
    fn test_split_ribbon_document() {
        let (fragments, diagnostics) = split(
            r#"<ribbon>
  <app-menu><control id="new"/></app-menu>
  <tabs>
    <tab label="HOME"/>
    <tab label="EDIT"/>
  </tabs>
  <exclude>
    <exclude-control id="print"/>
  </exclude>
  <exclude-tab label="VIEW"/>
</ribbon>"#,
        );

        let tags: Vec<&str> = fragments.iter().map(|f| f.root.tag.as_str()).collect();
        assert_eq!(
            tags,
            vec!["app-menu", "tab", "tab", "exclude-control", "exclude-tab"]
        );
        assert!(diagnostics.is_empty());
        assert_eq!(fragments[2].root.attr("label"), Some("EDIT"));
        assert_eq!(fragments[0].origin.plugin, "core");
    }

    #[test]
    fn test_single_fragment_document() {
        let (fragments, _) = split(r#"<tab label="HOME" override="true"/>"#);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].kind(), Some(FragmentKind::Tab));
    }

    #[test]
    fn test_unknown_tags_are_reported() {
        let (fragments, diagnostics) = split(
            r#"<ribbon><menus/><tabs><group label="G"/></tabs></ribbon>"#,
        );
        assert!(fragments.is_empty());
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|d| d.code.as_deref() == Some("R-5-3")));
    }

    #[test]
    fn test_from_xml_keeps_text_and_attribute_order() {
        let doc = ribbon_xml::parse(
            r#"<exclude-control target="id" order="1"> print </exclude-control>"#,
        )
        .unwrap();
        let node = FragmentNode::from_xml(&doc.root);
        let names: Vec<&str> = node.attributes.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["target", "order"]);
        assert_eq!(node.text(), Some("print"));
        assert!(node.attr_source("target").is_some());
    }

    #[test]
    fn test_remove_controls_recursively() {
        let mut node = FragmentNode::new("medium")
            .with_child(FragmentNode::new("control").with_attr("id", "cut"))
            .with_child(
                FragmentNode::new("layout")
                    .with_child(FragmentNode::new("control").with_attr("id", "cut"))
                    .with_child(FragmentNode::new("control").with_attr("id", "copy")),
            );
        assert_eq!(node.remove_controls("cut"), 2);
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].children.len(), 1);
    }
}
