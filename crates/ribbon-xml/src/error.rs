//! Error types for XML parsing with source locations.

use ribbon_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder};
use ribbon_source_map::SourceInfo;
use thiserror::Error;

/// Result type alias for ribbon-xml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Result type for parse operations that return diagnostics.
pub type ParseResult<T> = std::result::Result<T, Vec<DiagnosticMessage>>;

/// Errors that can occur during XML parsing.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// XML syntax error reported by quick-xml.
    #[error("XML syntax error: {message}{}", at_byte(.position))]
    XmlSyntax {
        message: String,
        /// Byte offset where the error occurred.
        position: Option<u64>,
    },

    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof {
        expected: String,
        location: Option<SourceInfo>,
    },

    #[error("Mismatched end tag: expected </{expected}>, found </{found}>")]
    MismatchedEndTag {
        expected: String,
        found: String,
        location: Option<SourceInfo>,
    },

    #[error("Invalid XML structure: {message}")]
    InvalidStructure {
        message: String,
        location: Option<SourceInfo>,
    },

    #[error("Empty XML document: no root element found")]
    EmptyDocument,

    #[error("Invalid XML: multiple root elements")]
    MultipleRoots { location: Option<SourceInfo> },
}

fn at_byte(position: &Option<u64>) -> String {
    match position {
        Some(pos) => format!(" at byte {}", pos),
        None => String::new(),
    }
}

impl Error {
    /// Convert this error to a DiagnosticMessage with its R-9-* code.
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        match self {
            Error::XmlSyntax { message, position } => {
                let mut builder = DiagnosticMessageBuilder::error("XML Syntax Error")
                    .with_code("R-9-1")
                    .problem(message.clone());
                if let Some(pos) = position {
                    builder = builder.add_detail(format!("Error at byte offset {}", pos));
                }
                builder.build()
            }

            Error::UnexpectedEof { expected, location } => {
                DiagnosticMessageBuilder::error("Unexpected End of XML Input")
                    .with_code("R-9-2")
                    .problem(format!(
                        "The fragment ended unexpectedly; expected {}",
                        expected
                    ))
                    .with_optional_location(location.clone())
                    .build()
            }

            Error::MismatchedEndTag {
                expected,
                found,
                location,
            } => DiagnosticMessageBuilder::error("Mismatched XML End Tag")
                .with_code("R-9-3")
                .problem(format!(
                    "End tag </{}> does not match start tag <{}>",
                    found, expected
                ))
                .add_detail(format!("Expected: </{}>", expected))
                .add_detail(format!("Found: </{}>", found))
                .add_hint("Check that all opening tags have matching closing tags?")
                .with_optional_location(location.clone())
                .build(),

            Error::InvalidStructure { message, location } => {
                DiagnosticMessageBuilder::error("Invalid XML Structure")
                    .with_code("R-9-4")
                    .problem(message.clone())
                    .with_optional_location(location.clone())
                    .build()
            }

            Error::EmptyDocument => DiagnosticMessageBuilder::error("Empty XML Document")
                .with_code("R-9-5")
                .problem("The fragment file contains no root element")
                .add_hint("Wrap the configuration in a `<ribbon>` element?")
                .build(),

            Error::MultipleRoots { location } => {
                DiagnosticMessageBuilder::error("Multiple XML Root Elements")
                    .with_code("R-9-6")
                    .problem("The fragment file contains multiple root elements")
                    .add_detail("A fragment file must have exactly one root element")
                    .add_hint("Wrap the elements in a single `<ribbon>` element?")
                    .with_optional_location(location.clone())
                    .build()
            }
        }
    }

    /// Source location of the error, when one is known.
    pub fn location(&self) -> Option<&SourceInfo> {
        match self {
            Error::UnexpectedEof { location, .. }
            | Error::MismatchedEndTag { location, .. }
            | Error::InvalidStructure { location, .. }
            | Error::MultipleRoots { location } => location.as_ref(),
            Error::XmlSyntax { .. } | Error::EmptyDocument => None,
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlSyntax {
            message: err.to_string(),
            position: None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::InvalidStructure {
            message: format!("Failed to write XML: {}", err),
            location: None,
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlSyntax {
            message: format!("Attribute error: {}", err),
            position: None,
        }
    }
}
