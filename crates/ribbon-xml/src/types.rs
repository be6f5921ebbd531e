//! Core types for source-tracked XML.

use ribbon_source_map::SourceInfo;

/// A parsed XML document with source location tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlWithSourceInfo {
    /// The root element of the document.
    pub root: XmlElement,

    /// Source location of the entire document.
    pub source_info: SourceInfo,
}

/// An XML element with source location tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    /// The local name of the element (without namespace prefix).
    pub name: String,

    /// Source location of the element name.
    pub name_source: SourceInfo,

    /// Namespace prefix, if any (e.g., "i18n" in `i18n:text`).
    pub prefix: Option<String>,

    /// Attributes in document order.
    pub attributes: Vec<XmlAttribute>,

    pub children: XmlChildren,

    /// Source location of the entire element, start tag to end tag.
    pub source_info: SourceInfo,
}

/// An XML attribute with separate source locations for name and value.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlAttribute {
    /// The local name of the attribute (without namespace prefix).
    pub name: String,

    pub name_source: SourceInfo,

    pub prefix: Option<String>,

    /// The attribute value (after unescaping XML entities).
    pub value: String,

    /// Source location of the value, quotes included.
    pub value_source: SourceInfo,
}

/// Children of an XML element.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlChildren {
    /// Element contains only child elements.
    Elements(Vec<XmlElement>),

    /// Element contains only text content.
    Text {
        content: String,
        source_info: SourceInfo,
    },

    /// Element contains text and elements interleaved.
    Mixed(Vec<XmlChild>),

    Empty,
}

/// A single child in mixed content.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlChild {
    Element(XmlElement),
    Text {
        content: String,
        source_info: SourceInfo,
    },
}

impl XmlWithSourceInfo {
    pub fn new(root: XmlElement, source_info: SourceInfo) -> Self {
        Self { root, source_info }
    }
}

impl XmlElement {
    /// Create a new element without children.
    pub fn new(
        name: String,
        name_source: SourceInfo,
        prefix: Option<String>,
        attributes: Vec<XmlAttribute>,
        source_info: SourceInfo,
    ) -> Self {
        Self {
            name,
            name_source,
            prefix,
            attributes,
            children: XmlChildren::Empty,
            source_info,
        }
    }

    /// Qualified name as written in the source (`prefix:name`).
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.name),
            None => self.name.clone(),
        }
    }

    /// Get an attribute value by local name.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Get an attribute by name, returning the full attribute with source info.
    pub fn get_attribute_full(&self, name: &str) -> Option<&XmlAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Check if this element has at least one child element.
    pub fn has_elements(&self) -> bool {
        match &self.children {
            XmlChildren::Elements(e) => !e.is_empty(),
            XmlChildren::Mixed(c) => c.iter().any(|c| matches!(c, XmlChild::Element(_))),
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(&self.children, XmlChildren::Empty)
    }

    /// Get text content, if this element contains only text.
    pub fn text(&self) -> Option<&str> {
        match &self.children {
            XmlChildren::Text { content, .. } => Some(content),
            _ => None,
        }
    }

    /// Concatenated text of this element's direct text children, trimmed.
    ///
    /// Unlike [`XmlElement::text`] this also looks into mixed content, and
    /// returns `None` when the trimmed text is empty.
    pub fn text_content(&self) -> Option<String> {
        let text = match &self.children {
            XmlChildren::Text { content, .. } => content.clone(),
            XmlChildren::Mixed(children) => children
                .iter()
                .filter_map(|c| match c {
                    XmlChild::Text { content, .. } => Some(content.as_str()),
                    XmlChild::Element(_) => None,
                })
                .collect(),
            _ => return None,
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Get child elements by local name.
    pub fn get_children(&self, name: &str) -> Vec<&XmlElement> {
        self.all_children()
            .into_iter()
            .filter(|e| e.name == name)
            .collect()
    }

    /// First child element with the given local name.
    pub fn get_child(&self, name: &str) -> Option<&XmlElement> {
        self.all_children().into_iter().find(|e| e.name == name)
    }

    /// Get all child elements (ignoring text in mixed content).
    pub fn all_children(&self) -> Vec<&XmlElement> {
        match &self.children {
            XmlChildren::Elements(elements) => elements.iter().collect(),
            XmlChildren::Mixed(children) => children
                .iter()
                .filter_map(|c| match c {
                    XmlChild::Element(e) => Some(e),
                    XmlChild::Text { .. } => None,
                })
                .collect(),
            _ => vec![],
        }
    }
}

impl XmlAttribute {
    pub fn new(
        name: String,
        name_source: SourceInfo,
        prefix: Option<String>,
        value: String,
        value_source: SourceInfo,
    ) -> Self {
        Self {
            name,
            name_source,
            prefix,
            value,
            value_source,
        }
    }

    /// Qualified name as written in the source (`prefix:name`).
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.name),
            None => self.name.clone(),
        }
    }
}
