//! Serialize parsed elements back to XML text.

use crate::{Result, XmlChild, XmlChildren, XmlElement};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;

/// Write `element` and its subtree as an indented XML string.
///
/// Qualified names and attribute order are preserved; source locations are
/// not part of the output.
///
/// ```rust
/// use ribbon_xml::{parse, write_element};
///
/// let xml = parse(r#"<control id="paste"><label>Paste</label></control>"#).unwrap();
/// let text = write_element(&xml.root).unwrap();
/// assert!(text.starts_with(r#"<control id="paste">"#));
/// ```
///
/// # Errors
///
/// Returns an error if the underlying writer fails.
pub fn write_element(element: &XmlElement) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_to(&mut writer, element)?;
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

/// Write `element` into an existing quick-xml writer.
pub fn write_to<W: Write>(writer: &mut Writer<W>, element: &XmlElement) -> Result<()> {
    let name = element.qualified_name();
    let mut start = BytesStart::new(name.as_str());
    for attr in &element.attributes {
        let key = attr.qualified_name();
        start.push_attribute((key.as_str(), attr.value.as_str()));
    }

    if element.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    match &element.children {
        XmlChildren::Elements(children) => {
            for child in children {
                write_to(writer, child)?;
            }
        }
        XmlChildren::Text { content, .. } => {
            writer.write_event(Event::Text(BytesText::new(content)))?;
        }
        XmlChildren::Mixed(children) => {
            for child in children {
                match child {
                    XmlChild::Element(child) => write_to(writer, child)?,
                    XmlChild::Text { content, .. } => {
                        writer.write_event(Event::Text(BytesText::new(content)))?;
                    }
                }
            }
        }
        XmlChildren::Empty => {}
    }
    writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_write_inline_definition() {
        let xml = parse(
            r#"<control id="bold" i18n:attr="label">
  <label>Bold</label>
  <icon size="small">bold.png</icon>
  <action/>
</control>"#,
        )
        .unwrap();

        insta::assert_snapshot!(write_element(&xml.root).unwrap(), @r#"
        <control id="bold" i18n:attr="label">
          <label>Bold</label>
          <icon size="small">bold.png</icon>
          <action/>
        </control>
        "#);
    }

    #[test]
    fn test_write_escapes_values() {
        let xml = parse(r#"<control label="a &amp; b"/>"#).unwrap();
        assert_eq!(
            write_element(&xml.root).unwrap(),
            r#"<control label="a &amp; b"/>"#
        );
    }
}
