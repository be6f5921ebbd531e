//! Builder API for diagnostic messages.

use crate::diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage, MessageContent};
use ribbon_source_map::SourceInfo;

/// Builder for creating diagnostic messages following tidyverse guidelines.
///
/// # Example
///
/// ```
/// use ribbon_error_reporting::DiagnosticMessageBuilder;
///
/// let error = DiagnosticMessageBuilder::error("Inconsistent Group Sizes")
///     .with_code("R-2-1")
///     .problem("The small variant of `Clipboard` differs from the medium one")
///     .add_detail("`paste` only appears in the medium variant")
///     .add_hint("Declare the same controls in every size?")
///     .build();
///
/// assert_eq!(error.code, Some("R-2-1".to_string()));
/// assert_eq!(error.details.len(), 1);
/// assert_eq!(error.hints.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DiagnosticMessageBuilder {
    kind: DiagnosticKind,
    title: String,
    code: Option<String>,
    problem: Option<MessageContent>,
    details: Vec<DetailItem>,
    hints: Vec<MessageContent>,
    location: Option<SourceInfo>,
}

impl DiagnosticMessageBuilder {
    /// Create a new builder with the specified kind and title.
    pub fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            code: None,
            problem: None,
            details: Vec::new(),
            hints: Vec::new(),
            location: None,
        }
    }

    /// Create an error diagnostic builder.
    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    /// Create a warning diagnostic builder.
    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, title)
    }

    /// Create an info diagnostic builder.
    pub fn info(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Info, title)
    }

    /// Set the error code (`R-<subsystem>-<number>`).
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set the problem statement.
    pub fn problem(mut self, stmt: impl Into<MessageContent>) -> Self {
        self.problem = Some(stmt.into());
        self
    }

    /// Add an error detail.
    pub fn add_detail(mut self, detail: impl Into<MessageContent>) -> Self {
        self.details.push(DetailItem {
            kind: DetailKind::Error,
            content: detail.into(),
            location: None,
        });
        self
    }

    /// Add an error detail pointing at a source location.
    pub fn add_detail_at(mut self, detail: impl Into<MessageContent>, location: SourceInfo) -> Self {
        self.details.push(DetailItem {
            kind: DetailKind::Error,
            content: detail.into(),
            location: Some(location),
        });
        self
    }

    /// Add an info detail.
    pub fn add_info(mut self, info: impl Into<MessageContent>) -> Self {
        self.details.push(DetailItem {
            kind: DetailKind::Info,
            content: info.into(),
            location: None,
        });
        self
    }

    /// Add a note detail.
    pub fn add_note(mut self, note: impl Into<MessageContent>) -> Self {
        self.details.push(DetailItem {
            kind: DetailKind::Note,
            content: note.into(),
            location: None,
        });
        self
    }

    /// Add a hint for fixing the problem.
    pub fn add_hint(mut self, hint: impl Into<MessageContent>) -> Self {
        self.hints.push(hint.into());
        self
    }

    /// Attach the main source location.
    pub fn with_location(mut self, location: SourceInfo) -> Self {
        self.location = Some(location);
        self
    }

    /// Attach the main source location if one is known.
    pub fn with_optional_location(mut self, location: Option<SourceInfo>) -> Self {
        self.location = location;
        self
    }

    /// Build the diagnostic message.
    pub fn build(self) -> DiagnosticMessage {
        DiagnosticMessage {
            code: self.code,
            title: self.title,
            kind: self.kind,
            problem: self.problem,
            details: self.details,
            hints: self.hints,
            location: self.location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_kinds() {
        assert_eq!(DiagnosticMessageBuilder::error("e").build().kind, DiagnosticKind::Error);
        assert_eq!(DiagnosticMessageBuilder::warning("w").build().kind, DiagnosticKind::Warning);
        assert_eq!(DiagnosticMessageBuilder::info("i").build().kind, DiagnosticKind::Info);
    }

    #[test]
    fn test_builder_detail_kinds() {
        let msg = DiagnosticMessageBuilder::error("Test")
            .add_detail("error detail")
            .add_info("info detail")
            .add_note("note detail")
            .build();

        assert_eq!(msg.details.len(), 3);
        assert_eq!(msg.details[0].kind, DetailKind::Error);
        assert_eq!(msg.details[1].kind, DetailKind::Info);
        assert_eq!(msg.details[2].kind, DetailKind::Note);
    }

    #[test]
    fn test_builder_locations() {
        let loc = SourceInfo::default();
        let msg = DiagnosticMessageBuilder::warning("Test")
            .with_optional_location(Some(loc.clone()))
            .add_detail_at("here", loc.clone())
            .build();

        assert_eq!(msg.location, Some(loc.clone()));
        assert_eq!(msg.details[0].location, Some(loc));
    }
}
