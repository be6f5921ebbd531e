//! Renderable items of a group size variant or a menu.

use crate::error::{Result, RibbonError};
use ribbon_source_map::SourceInfo;
use serde::Serialize;
use std::collections::BTreeSet;

/// Rendering size of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlSize {
    Large,
    Small,
    VerySmall,
}

impl ControlSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlSize::Large => "large",
            ControlSize::Small => "small",
            ControlSize::VerySmall => "very-small",
        }
    }

    pub fn parse(value: &str, source_info: Option<&SourceInfo>) -> Result<Self> {
        match value {
            "large" => Ok(ControlSize::Large),
            "small" => Ok(ControlSize::Small),
            "very-small" => Ok(ControlSize::VerySmall),
            _ => Err(RibbonError::InvalidAttribute {
                tag: "layout".to_string(),
                attribute: "size".to_string(),
                value: value.to_string(),
                expected: "one of `large`, `small`, `very-small`",
                source_info: source_info.cloned(),
            }),
        }
    }
}

/// Vertical alignment of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutAlign {
    Top,
    Middle,
}

impl LayoutAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutAlign::Top => "top",
            LayoutAlign::Middle => "middle",
        }
    }

    pub fn parse(value: &str, source_info: Option<&SourceInfo>) -> Result<Self> {
        match value {
            "top" => Ok(LayoutAlign::Top),
            "middle" => Ok(LayoutAlign::Middle),
            _ => Err(RibbonError::InvalidAttribute {
                tag: "layout".to_string(),
                attribute: "align".to_string(),
                value: value.to_string(),
                expected: "one of `top`, `middle`",
                source_info: source_info.cloned(),
            }),
        }
    }
}

/// Reference to a control by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ControlRef {
    pub id: String,
    pub colspan: u32,
}

impl ControlRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            colspan: 1,
        }
    }

    pub fn with_colspan(mut self, colspan: u32) -> Self {
        self.colspan = colspan;
        self
    }
}

/// Controls arranged in columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Layout {
    pub cols: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<ControlSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<LayoutAlign>,
    pub children: Vec<Element>,
}

impl Layout {
    pub fn new(cols: u32, children: Vec<Element>) -> Self {
        Self {
            cols,
            size: None,
            align: None,
            children,
        }
    }

    pub fn with_size(mut self, size: ControlSize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_align(mut self, align: LayoutAlign) -> Self {
        self.align = Some(align);
        self
    }
}

/// A row of controls rendered without labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Toolbar {
    pub colspan: u32,
    pub children: Vec<ControlRef>,
}

impl Toolbar {
    pub fn new(children: Vec<ControlRef>) -> Self {
        Self {
            colspan: 1,
            children,
        }
    }
}

/// One item of a size variant or a menu.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Element {
    Control(ControlRef),
    Separator,
    Layout(Layout),
    Toolbar(Toolbar),
}

impl Element {
    pub fn control(id: impl Into<String>) -> Self {
        Element::Control(ControlRef::new(id))
    }

    /// Columns occupied in the rendered group.
    pub fn columns(&self) -> u32 {
        match self {
            Element::Control(control) => control.colspan,
            Element::Separator => 0,
            Element::Layout(layout) => layout.cols,
            Element::Toolbar(toolbar) => toolbar.colspan,
        }
    }

    /// Ids of every control reachable from this element.
    pub fn control_ids(&self) -> BTreeSet<&str> {
        let mut ids = BTreeSet::new();
        self.collect_control_ids(&mut ids);
        ids
    }

    pub(crate) fn collect_control_ids<'a>(&'a self, ids: &mut BTreeSet<&'a str>) {
        match self {
            Element::Control(control) => {
                ids.insert(control.id.as_str());
            }
            Element::Separator => {}
            Element::Layout(layout) => {
                for child in &layout.children {
                    child.collect_control_ids(ids);
                }
            }
            Element::Toolbar(toolbar) => {
                ids.extend(toolbar.children.iter().map(|c| c.id.as_str()));
            }
        }
    }

    /// Deep structural equality, children compared position by position.
    pub fn is_equivalent(&self, other: &Element) -> bool {
        self == other
    }

    /// XML tag of this element.
    pub fn tag(&self) -> &'static str {
        match self {
            Element::Control(_) => "control",
            Element::Separator => "separator",
            Element::Layout(_) => "layout",
            Element::Toolbar(_) => "toolbar",
        }
    }
}

/// Whether two element sequences are equivalent element by element.
pub fn sequences_equivalent<'a, 'b>(
    a: impl IntoIterator<Item = &'a Element>,
    b: impl IntoIterator<Item = &'b Element>,
) -> bool {
    let mut a = a.into_iter();
    let mut b = b.into_iter();
    loop {
        match (a.next(), b.next()) {
            (None, None) => return true,
            (Some(x), Some(y)) if x.is_equivalent(y) => {}
            _ => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_layout() -> Element {
        Element::Layout(
            Layout::new(
                2,
                vec![
                    Element::control("bold"),
                    Element::Toolbar(Toolbar::new(vec![
                        ControlRef::new("italic"),
                        ControlRef::new("bold"),
                    ])),
                ],
            )
            .with_size(ControlSize::Small),
        )
    }

    #[test]
    fn test_columns() {
        assert_eq!(Element::control("x").columns(), 1);
        assert_eq!(Element::Control(ControlRef::new("x").with_colspan(3)).columns(), 3);
        assert_eq!(Element::Separator.columns(), 0);
        assert_eq!(sample_layout().columns(), 2);
    }

    #[test]
    fn test_control_ids_are_recursive_and_deduplicated() {
        let layout = sample_layout();
        let ids: Vec<&str> = layout.control_ids().into_iter().collect();
        assert_eq!(ids, vec!["bold", "italic"]);
        assert!(Element::Separator.control_ids().is_empty());
    }

    #[test]
    fn test_equivalence_is_positional() {
        let a = Element::Toolbar(Toolbar::new(vec![ControlRef::new("a"), ControlRef::new("b")]));
        let b = Element::Toolbar(Toolbar::new(vec![ControlRef::new("b"), ControlRef::new("a")]));
        assert!(a.is_equivalent(&a.clone()));
        assert!(!a.is_equivalent(&b));
        assert_eq!(a.control_ids(), b.control_ids());
    }

    #[test]
    fn test_sequences_equivalent() {
        let a = [Element::control("a"), Element::Separator];
        let c = [Element::Separator, Element::control("a")];
        assert!(sequences_equivalent(&a, &a.clone()));
        assert!(!sequences_equivalent(&a, &c));
        assert!(!sequences_equivalent(&a, &a[..1]));
        assert!(sequences_equivalent(Vec::<Element>::new().iter(), &[]));
    }

    #[test]
    fn test_parse_enumerations() {
        assert_eq!(ControlSize::parse("very-small", None).unwrap(), ControlSize::VerySmall);
        assert_eq!(LayoutAlign::parse("middle", None).unwrap(), LayoutAlign::Middle);

        let err = ControlSize::parse("huge", None).unwrap_err();
        assert_eq!(err.code(), "R-5-2");
        assert!(LayoutAlign::parse("bottom", None).is_err());
    }

    #[test]
    fn test_serialize_tagged() {
        let json = serde_json::to_value(sample_layout()).unwrap();
        assert_eq!(json["type"], "layout");
        assert_eq!(json["size"], "small");
        assert!(json.get("align").is_none());
        assert_eq!(json["children"][1]["type"], "toolbar");
        assert_eq!(
            serde_json::to_string(&Element::Separator).unwrap(),
            r#"{"type":"separator"}"#
        );
    }
}
