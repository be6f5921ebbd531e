//! Core diagnostic message types.
//!
//! A diagnostic follows the tidyverse structure: a short title, a problem
//! statement, bulleted details and optional hints.

use ribbon_source_map::{SourceContext, SourceInfo};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// The kind of diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// An error that aborted part of the merge
    Error,
    /// A problem that did not prevent the merge
    Warning,
    /// Informational message
    Info,
    /// A note providing additional context
    Note,
}

/// How detail items should be presented (tidyverse x/i bullet style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetailKind {
    /// Error detail (✖ bullet)
    Error,
    /// Info detail (ℹ bullet)
    Info,
    /// Note detail (plain bullet)
    Note,
}

/// The content of a message or detail item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageContent {
    /// Plain text content
    Plain(String),
    /// Markdown content
    Markdown(String),
}

impl MessageContent {
    /// Get the raw string content for display
    pub fn as_str(&self) -> &str {
        match self {
            MessageContent::Plain(s) => s,
            MessageContent::Markdown(s) => s,
        }
    }

    /// Convert to JSON value with type information
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;
        match self {
            MessageContent::Plain(s) => json!({
                "type": "plain",
                "content": s
            }),
            MessageContent::Markdown(s) => json!({
                "type": "markdown",
                "content": s
            }),
        }
    }
}

impl From<String> for MessageContent {
    fn from(s: String) -> Self {
        MessageContent::Markdown(s)
    }
}

impl From<&str> for MessageContent {
    fn from(s: &str) -> Self {
        MessageContent::Markdown(s.to_string())
    }
}

/// A detail item in a diagnostic message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailItem {
    /// The kind of detail (error, info, note)
    pub kind: DetailKind,
    /// The content of the detail
    pub content: MessageContent,
    /// Optional source location this detail refers to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceInfo>,
}

/// A diagnostic message following tidyverse-style structure.
///
/// 1. **Code**: Optional error code (e.g., "R-1-1")
/// 2. **Title**: Brief error message
/// 3. **Kind**: Error, Warning, Info, Note
/// 4. **Problem**: What went wrong
/// 5. **Details**: Specific information
/// 6. **Hints**: Optional guidance for fixing (ends with ?)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    /// Optional error code (e.g., "R-1-1")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Brief title
    pub title: String,

    /// The kind of diagnostic
    pub kind: DiagnosticKind,

    /// The problem statement
    pub problem: Option<MessageContent>,

    /// Specific details
    pub details: Vec<DetailItem>,

    /// Optional hints for fixing
    pub hints: Vec<MessageContent>,

    /// Where in the fragment files the issue occurred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceInfo>,
}

impl DiagnosticMessage {
    /// Create a new diagnostic message with just a title and kind.
    pub fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            code: None,
            title: title.into(),
            kind,
            problem: None,
            details: Vec::new(),
            hints: Vec::new(),
            location: None,
        }
    }

    /// Create an error diagnostic.
    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    /// Create a warning diagnostic.
    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, title)
    }

    /// Create an info diagnostic.
    pub fn info(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Info, title)
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// True for [`DiagnosticKind::Error`].
    pub fn is_error(&self) -> bool {
        self.kind == DiagnosticKind::Error
    }

    /// Render this diagnostic message as text.
    ///
    /// When a location is known and `ctx` holds the file, an ariadne source
    /// snippet is rendered; otherwise the tidyverse text form is used:
    ///
    /// ```text
    /// Error [R-1-1]: title
    /// Problem statement here
    /// ✖ Error detail
    /// ℹ Info detail
    /// ? Hint
    /// ```
    ///
    /// # Example
    ///
    /// ```
    /// use ribbon_error_reporting::DiagnosticMessageBuilder;
    ///
    /// let msg = DiagnosticMessageBuilder::error("Malformed Order Directive")
    ///     .problem("`2.x` is not a valid order")
    ///     .add_hint("Use `P` or `P.S` with integers?")
    ///     .build();
    /// let text = msg.to_text(None);
    /// assert!(text.contains("Error: Malformed Order Directive"));
    /// assert!(text.contains("`2.x` is not a valid order"));
    /// ```
    pub fn to_text(&self, ctx: Option<&SourceContext>) -> String {
        let mut result = String::new();

        let snippet = match (ctx, self.primary_location()) {
            (Some(ctx), Some(location)) => self.render_ariadne_source_context(location, ctx),
            _ => None,
        };

        match snippet {
            Some(snippet) => {
                // ariadne already shows title, code, problem and located details
                result.push_str(&snippet);
                for detail in self.details.iter().filter(|d| d.location.is_none()) {
                    let _ = writeln!(result, "{} {}", bullet(detail.kind), detail.content.as_str());
                }
            }
            None => {
                let kind_str = match self.kind {
                    DiagnosticKind::Error => "Error",
                    DiagnosticKind::Warning => "Warning",
                    DiagnosticKind::Info => "Info",
                    DiagnosticKind::Note => "Note",
                };
                match &self.code {
                    Some(code) => {
                        let _ = writeln!(result, "{} [{}]: {}", kind_str, code, self.title);
                    }
                    None => {
                        let _ = writeln!(result, "{}: {}", kind_str, self.title);
                    }
                }

                if let Some(problem) = &self.problem {
                    let _ = writeln!(result, "{}", problem.as_str());
                }

                for detail in &self.details {
                    let _ = writeln!(result, "{} {}", bullet(detail.kind), detail.content.as_str());
                }
            }
        }

        for hint in &self.hints {
            let _ = writeln!(result, "? {}", hint.as_str());
        }

        result
    }

    /// Render this diagnostic message as a JSON value.
    ///
    /// # Example
    ///
    /// ```
    /// use ribbon_error_reporting::DiagnosticMessage;
    ///
    /// let msg = DiagnosticMessage::warning("Unknown Tag").with_code("R-5-3");
    /// let json = msg.to_json();
    /// assert_eq!(json["kind"], "warning");
    /// assert_eq!(json["code"], "R-5-3");
    /// ```
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;

        let kind_str = match self.kind {
            DiagnosticKind::Error => "error",
            DiagnosticKind::Warning => "warning",
            DiagnosticKind::Info => "info",
            DiagnosticKind::Note => "note",
        };

        let mut obj = json!({
            "kind": kind_str,
            "title": self.title,
        });

        if let Some(code) = &self.code {
            obj["code"] = json!(code);
        }

        if let Some(problem) = &self.problem {
            obj["problem"] = problem.to_json();
        }

        if !self.details.is_empty() {
            let details: Vec<_> = self
                .details
                .iter()
                .map(|d| {
                    let detail_kind = match d.kind {
                        DetailKind::Error => "error",
                        DetailKind::Info => "info",
                        DetailKind::Note => "note",
                    };
                    let mut detail_obj = json!({
                        "kind": detail_kind,
                        "content": d.content.to_json()
                    });
                    if let Some(location) = &d.location {
                        detail_obj["location"] = json!(location);
                    }
                    detail_obj
                })
                .collect();
            obj["details"] = json!(details);
        }

        if !self.hints.is_empty() {
            let hints: Vec<_> = self.hints.iter().map(|h| h.to_json()).collect();
            obj["hints"] = json!(hints);
        }

        if let Some(location) = &self.location {
            obj["location"] = json!(location);
        }

        obj
    }

    fn primary_location(&self) -> Option<&SourceInfo> {
        self.location
            .as_ref()
            .or_else(|| self.details.iter().find_map(|d| d.location.as_ref()))
    }

    /// Render source context using ariadne.
    fn render_ariadne_source_context(
        &self,
        main_location: &SourceInfo,
        ctx: &SourceContext,
    ) -> Option<String> {
        use ariadne::{Color, Label, Report, ReportKind, Source};

        let file_id = main_location.file_id();
        let file = ctx.get_file(file_id)?;
        let content = file.content.as_deref()?;

        let start_mapped = main_location.map_offset(0, ctx)?;
        let end_mapped = main_location.map_offset(main_location.range.len(), ctx)?;

        let (report_kind, main_color) = match self.kind {
            DiagnosticKind::Error => (ReportKind::Error, Color::Red),
            DiagnosticKind::Warning => (ReportKind::Warning, Color::Yellow),
            DiagnosticKind::Info => (ReportKind::Advice, Color::Cyan),
            DiagnosticKind::Note => (ReportKind::Advice, Color::Blue),
        };

        let mut report = Report::build(report_kind, file.path.clone(), start_mapped.location.offset);

        if let Some(code) = &self.code {
            report = report.with_message(format!("[{}] {}", code, self.title));
        } else {
            report = report.with_message(&self.title);
        }

        let main_span = start_mapped.location.offset..end_mapped.location.offset;
        let main_message = match &self.problem {
            Some(problem) => problem.as_str(),
            None => &self.title,
        };

        report = report.with_label(
            Label::new((file.path.clone(), main_span))
                .with_message(main_message)
                .with_color(main_color),
        );

        for detail in &self.details {
            let Some(detail_loc) = &detail.location else {
                continue;
            };
            if detail_loc.file_id() != file_id {
                continue;
            }
            if let (Some(detail_start), Some(detail_end)) = (
                detail_loc.map_offset(0, ctx),
                detail_loc.map_offset(detail_loc.range.len(), ctx),
            ) {
                let detail_color = match detail.kind {
                    DetailKind::Error => Color::Red,
                    DetailKind::Info => Color::Cyan,
                    DetailKind::Note => Color::Blue,
                };
                report = report.with_label(
                    Label::new((
                        file.path.clone(),
                        detail_start.location.offset..detail_end.location.offset,
                    ))
                    .with_message(detail.content.as_str())
                    .with_color(detail_color),
                );
            }
        }

        let report = report.finish();
        let mut output = Vec::new();
        report
            .write((file.path.clone(), Source::from(content)), &mut output)
            .ok()?;

        String::from_utf8(output).ok()
    }
}

fn bullet(kind: DetailKind) -> &'static str {
    match kind {
        DetailKind::Error => "✖",
        DetailKind::Info => "ℹ",
        DetailKind::Note => "•",
    }
}
