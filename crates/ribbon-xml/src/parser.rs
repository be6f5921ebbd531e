//! XML parser that builds XmlWithSourceInfo trees.

use crate::{
    Error, ParseResult, Result, XmlAttribute, XmlChild, XmlChildren, XmlElement, XmlParseContext,
    XmlWithSourceInfo,
};
use quick_xml::Reader;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use ribbon_source_map::{FileId, SourceInfo};

/// Parse XML from a string, producing an XmlWithSourceInfo tree.
///
/// ```rust
/// use ribbon_xml::parse;
///
/// let xml = parse("<ribbon><tabs/></ribbon>").unwrap();
/// assert_eq!(xml.root.name, "ribbon");
/// ```
///
/// # Errors
///
/// Returns an error if the XML is malformed.
pub fn parse(content: &str) -> Result<XmlWithSourceInfo> {
    parse_impl(content, None, FileId(0))
}

/// Parse XML from a string with an associated file ID.
///
/// The file ID ends up in every [`SourceInfo`] of the tree, so diagnostics
/// can be rendered against the file registered in a `SourceContext`.
pub fn parse_with_file_id(content: &str, file_id: FileId) -> Result<XmlWithSourceInfo> {
    parse_impl(content, None, file_id)
}

/// Parse XML that was extracted from a parent document.
///
/// Source locations become substrings of `parent`.
pub fn parse_with_parent(content: &str, parent: SourceInfo) -> Result<XmlWithSourceInfo> {
    let file_id = parent.file_id();
    parse_impl(content, Some(parent), file_id)
}

/// Parse XML with diagnostic collection.
///
/// Errors are returned as R-9-* diagnostics and also recorded in `ctx`.
///
/// # Errors
///
/// Returns the diagnostics describing why parsing failed.
pub fn parse_with_context(
    content: &str,
    ctx: &mut XmlParseContext,
) -> ParseResult<XmlWithSourceInfo> {
    parse_with_context_and_file_id(content, FileId(0), ctx)
}

/// [`parse_with_context`] for a file registered under `file_id`.
pub fn parse_with_context_and_file_id(
    content: &str,
    file_id: FileId,
    ctx: &mut XmlParseContext,
) -> ParseResult<XmlWithSourceInfo> {
    match parse_impl(content, None, file_id) {
        Ok(xml) => Ok(xml),
        Err(err) => {
            let diagnostic = err.to_diagnostic();
            ctx.add_diagnostic(diagnostic.clone());
            Err(vec![diagnostic])
        }
    }
}

fn parse_impl(
    content: &str,
    parent: Option<SourceInfo>,
    file_id: FileId,
) -> Result<XmlWithSourceInfo> {
    let mut parser = XmlParser::new(content, parent, file_id);
    parser.parse()
}

struct XmlParser<'a> {
    source: &'a str,
    reader: Reader<&'a [u8]>,
    parent: Option<SourceInfo>,
    file_id: FileId,
    /// Open elements, innermost last.
    stack: Vec<BuildNode>,
    root: Option<XmlElement>,
}

/// An element whose end tag has not been seen yet.
struct BuildNode {
    name: String,
    name_source: SourceInfo,
    prefix: Option<String>,
    attributes: Vec<XmlAttribute>,
    /// Byte offset of the `<` character.
    start_offset: usize,
    children: Vec<XmlChild>,
}

impl<'a> XmlParser<'a> {
    fn new(source: &'a str, parent: Option<SourceInfo>, file_id: FileId) -> Self {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;

        Self {
            source,
            reader,
            parent,
            file_id,
            stack: Vec::new(),
            root: None,
        }
    }

    fn parse(&mut self) -> Result<XmlWithSourceInfo> {
        loop {
            let event_start = self.reader.buffer_position() as usize;

            match self.reader.read_event() {
                Ok(Event::Start(e)) => self.handle_start(&e, event_start)?,
                Ok(Event::End(e)) => {
                    let element = self.handle_end(&e)?;
                    self.attach(element)?;
                }
                Ok(Event::Empty(e)) => {
                    let element = self.handle_empty(&e, event_start)?;
                    self.attach(element)?;
                }
                Ok(Event::Text(e)) => self.handle_text(&e, event_start)?,
                Ok(Event::CData(e)) => self.handle_cdata(&e, event_start),
                Ok(Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_)) => {}
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlSyntax {
                        message: e.to_string(),
                        position: Some(self.reader.error_position()),
                    });
                }
            }
        }

        if let Some(node) = self.stack.last() {
            return Err(Error::UnexpectedEof {
                expected: format!("closing tag </{}>", node.name),
                location: Some(node.name_source.clone()),
            });
        }

        let root = self.root.take().ok_or(Error::EmptyDocument)?;
        let doc_source_info = self.make_source_info(0, self.source.len());

        Ok(XmlWithSourceInfo::new(root, doc_source_info))
    }

    /// Hand a completed element to its parent, or make it the root.
    fn attach(&mut self, element: XmlElement) -> Result<()> {
        match self.stack.last_mut() {
            Some(parent) => {
                parent.children.push(XmlChild::Element(element));
                Ok(())
            }
            None if self.root.is_some() => Err(Error::MultipleRoots {
                location: Some(element.source_info),
            }),
            None => {
                self.root = Some(element);
                Ok(())
            }
        }
    }

    fn handle_start(&mut self, e: &BytesStart<'_>, event_start: usize) -> Result<()> {
        let (name, prefix) = split_name(e.name().as_ref());
        let name_start = event_start + 1;
        let name_end = name_start + e.name().as_ref().len();
        let name_source = self.make_source_info(name_start, name_end);

        let attributes = self.parse_attributes(e, event_start)?;

        self.stack.push(BuildNode {
            name,
            name_source,
            prefix,
            attributes,
            start_offset: event_start,
            children: Vec::new(),
        });

        Ok(())
    }

    fn handle_end(&mut self, e: &BytesEnd<'_>) -> Result<XmlElement> {
        let (end_local_name, _) = split_name(e.name().as_ref());

        let node = self.stack.pop().ok_or_else(|| Error::InvalidStructure {
            message: format!("Unexpected closing tag </{}>", end_local_name),
            location: None,
        })?;

        if node.name != end_local_name {
            return Err(Error::MismatchedEndTag {
                expected: node.name,
                found: end_local_name,
                location: Some(node.name_source),
            });
        }

        let end_offset = self.reader.buffer_position() as usize;
        let source_info = self.make_source_info(node.start_offset, end_offset);

        Ok(XmlElement {
            name: node.name,
            name_source: node.name_source,
            prefix: node.prefix,
            attributes: node.attributes,
            children: finalize_children(node.children),
            source_info,
        })
    }

    fn handle_empty(&mut self, e: &BytesStart<'_>, event_start: usize) -> Result<XmlElement> {
        let (name, prefix) = split_name(e.name().as_ref());
        let name_start = event_start + 1;
        let name_end = name_start + e.name().as_ref().len();
        let name_source = self.make_source_info(name_start, name_end);

        let attributes = self.parse_attributes(e, event_start)?;

        let end_offset = self.reader.buffer_position() as usize;
        let source_info = self.make_source_info(event_start, end_offset);

        Ok(XmlElement {
            name,
            name_source,
            prefix,
            attributes,
            children: XmlChildren::Empty,
            source_info,
        })
    }

    fn handle_text(&mut self, e: &BytesText<'_>, event_start: usize) -> Result<()> {
        let text = e.unescape().map_err(|err| Error::XmlSyntax {
            message: format!("Invalid text content: {}", err),
            position: Some(event_start as u64),
        })?;

        let end_offset = self.reader.buffer_position() as usize;
        let source_info = self.make_source_info(event_start, end_offset);

        // text outside the root element is ignored
        if let Some(node) = self.stack.last_mut() {
            node.children.push(XmlChild::Text {
                content: text.into_owned(),
                source_info,
            });
        }
        Ok(())
    }

    fn handle_cdata(&mut self, e: &BytesCData<'_>, event_start: usize) {
        let text = String::from_utf8_lossy(e.as_ref()).to_string();
        let end_offset = self.reader.buffer_position() as usize;
        let source_info = self.make_source_info(event_start, end_offset);

        if let Some(node) = self.stack.last_mut() {
            node.children.push(XmlChild::Text {
                content: text,
                source_info,
            });
        }
    }

    fn parse_attributes(&self, e: &BytesStart<'_>, tag_start: usize) -> Result<Vec<XmlAttribute>> {
        let mut attributes = Vec::new();

        let content_start = tag_start + 1;
        let tag_str = String::from_utf8_lossy(e.as_ref());
        // attributes are searched for after the element name
        let mut search_from = e.name().as_ref().len();

        for attr_result in e.attributes() {
            let attr = attr_result?;

            let full_name = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let (name, prefix) = split_name(attr.key.as_ref());

            let value = attr.unescape_value().map_err(|err| Error::XmlSyntax {
                message: format!("Invalid attribute value: {}", err),
                position: Some(tag_start as u64),
            })?;

            let (name_source, value_source, consumed) =
                self.find_attribute_positions(&tag_str, search_from, &full_name, content_start);
            search_from = consumed;

            attributes.push(XmlAttribute {
                name,
                name_source,
                prefix,
                value: value.into_owned(),
                value_source,
            });
        }

        Ok(attributes)
    }

    /// Locate `name="value"` inside the tag, starting at `search_from`.
    ///
    /// Returns the name and value locations plus the offset just past the
    /// value, where the next attribute search starts.
    fn find_attribute_positions(
        &self,
        tag_str: &str,
        search_from: usize,
        attr_name: &str,
        content_start: usize,
    ) -> (SourceInfo, SourceInfo, usize) {
        let search_area = tag_str.get(search_from..).unwrap_or_default();

        let Some(rel_pos) = find_attribute_name(search_area, attr_name) else {
            let fallback = self.make_source_info(content_start, content_start + 1);
            return (fallback.clone(), fallback, search_from);
        };

        let name_start = search_from + rel_pos;
        let name_end = name_start + attr_name.len();
        let name_source = self.make_source_info(content_start + name_start, content_start + name_end);

        // skip whitespace, '=' and whitespace again
        let bytes = tag_str.as_bytes();
        let mut cursor = name_end;
        while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
            cursor += 1;
        }
        if cursor < bytes.len() && bytes[cursor] == b'=' {
            cursor += 1;
        }
        while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
            cursor += 1;
        }

        let value_start = cursor;
        let value_end = match bytes.get(cursor) {
            Some(&quote) if quote == b'"' || quote == b'\'' => tag_str[cursor + 1..]
                .find(quote as char)
                .map_or(cursor + 1, |end| cursor + 1 + end + 1),
            Some(_) => tag_str[cursor..]
                .find(|c: char| c.is_whitespace() || c == '/')
                .map_or(tag_str.len(), |end| cursor + end),
            None => cursor,
        };

        let value_source =
            self.make_source_info(content_start + value_start, content_start + value_end);
        (name_source, value_source, value_end)
    }

    fn make_source_info(&self, start: usize, end: usize) -> SourceInfo {
        match &self.parent {
            Some(parent) => SourceInfo::substring(parent.clone(), start, end),
            None => SourceInfo::from_offsets(self.file_id, start, end),
        }
    }
}

/// Split `prefix:local` into its local name and optional prefix.
fn split_name(raw: &[u8]) -> (String, Option<String>) {
    let full_name = String::from_utf8_lossy(raw).to_string();
    match full_name.split_once(':') {
        Some((prefix, local)) => (local.to_string(), Some(prefix.to_string())),
        None => (full_name, None),
    }
}

/// Find `attr_name` as a whole word followed by `=` or whitespace.
fn find_attribute_name(haystack: &str, attr_name: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(rel) = haystack[from..].find(attr_name) {
        let pos = from + rel;
        let before_ok = pos == 0
            || haystack[..pos]
                .chars()
                .next_back()
                .is_some_and(char::is_whitespace);
        let after = haystack[pos + attr_name.len()..].chars().next();
        let after_ok = matches!(after, Some(c) if c == '=' || c.is_whitespace());
        if before_ok && after_ok {
            return Some(pos);
        }
        from = pos + attr_name.len();
    }
    None
}

fn finalize_children(children: Vec<XmlChild>) -> XmlChildren {
    let has_elements = children.iter().any(|c| matches!(c, XmlChild::Element(_)));

    // formatting whitespace between elements is not content
    let mut children: Vec<XmlChild> = if has_elements {
        children
            .into_iter()
            .filter(|c| match c {
                XmlChild::Text { content, .. } => !content.trim().is_empty(),
                XmlChild::Element(_) => true,
            })
            .collect()
    } else {
        children
    };

    if children.is_empty() {
        return XmlChildren::Empty;
    }

    if children.iter().all(|c| matches!(c, XmlChild::Element(_))) {
        let elements = children
            .into_iter()
            .filter_map(|c| match c {
                XmlChild::Element(e) => Some(e),
                XmlChild::Text { .. } => None,
            })
            .collect();
        return XmlChildren::Elements(elements);
    }

    if children.len() == 1 {
        if let Some(XmlChild::Text {
            content,
            source_info,
        }) = children.pop()
        {
            return XmlChildren::Text {
                content,
                source_info,
            };
        }
        return XmlChildren::Empty;
    }

    // several text events (e.g. text + CDATA) without elements are merged
    if !has_elements {
        let source_info = match (children.first(), children.last()) {
            (
                Some(XmlChild::Text {
                    source_info: first, ..
                }),
                Some(XmlChild::Text {
                    source_info: last, ..
                }),
            ) => SourceInfo::from_offsets(first.file_id(), first.start_offset(), last.end_offset()),
            _ => SourceInfo::default(),
        };
        let content = children
            .into_iter()
            .filter_map(|c| match c {
                XmlChild::Text { content, .. } => Some(content),
                XmlChild::Element(_) => None,
            })
            .collect();
        return XmlChildren::Text {
            content,
            source_info,
        };
    }

    XmlChildren::Mixed(children)
}
