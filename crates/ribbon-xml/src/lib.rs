//! Source-tracked XML parsing for ribbon configuration fragments.
//!
//! Wraps [`quick-xml`] to produce a tree of [`XmlElement`]s where every
//! element, attribute and text node remembers where it came from, so merge
//! diagnostics can point back into the plugin's file.
//!
//! # Example
//!
//! ```rust
//! use ribbon_xml::parse;
//!
//! let xml = parse(r#"<tab label="Home" order="2">
//!   <groups>
//!     <group label="Clipboard"><control id="paste"/></group>
//!   </groups>
//! </tab>"#).unwrap();
//!
//! assert_eq!(xml.root.name, "tab");
//! assert_eq!(xml.root.get_attribute("order"), Some("2"));
//!
//! let groups = xml.root.get_children("groups");
//! assert_eq!(groups[0].get_children("group").len(), 1);
//! ```
//!
//! Parsed elements can be written back with [`write_element`], which is how
//! inline control definitions are handed to the host unchanged.

pub mod context;
pub mod error;
pub mod parser;
pub mod types;
pub mod writer;

pub use context::XmlParseContext;
pub use error::{Error, ParseResult, Result};
pub use parser::{
    parse, parse_with_context, parse_with_context_and_file_id, parse_with_file_id,
    parse_with_parent,
};
pub use ribbon_source_map::SourceInfo;
pub use types::{XmlAttribute, XmlChild, XmlChildren, XmlElement, XmlWithSourceInfo};
pub use writer::write_element;
