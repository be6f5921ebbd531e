//! Diagnostic collection for XML parsing.

use ribbon_error_reporting::{DiagnosticKind, DiagnosticMessage};

/// Collects diagnostics produced while parsing fragment files.
///
/// One context can be shared across every file of a build, so the caller
/// reports all malformed files at once instead of stopping at the first.
///
/// ```rust
/// use ribbon_xml::{parse_with_context, XmlParseContext};
///
/// let mut ctx = XmlParseContext::new();
/// assert!(parse_with_context("<ribbon/>", &mut ctx).is_ok());
/// assert!(parse_with_context("<ribbon>", &mut ctx).is_err());
/// assert_eq!(ctx.diagnostics().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct XmlParseContext {
    diagnostics: Vec<DiagnosticMessage>,
}

impl XmlParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_diagnostic(&mut self, diagnostic: DiagnosticMessage) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[DiagnosticMessage] {
        &self.diagnostics
    }

    /// Check if any errors (not warnings) have been collected.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::Error)
    }
}
