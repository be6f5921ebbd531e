//! State shared by one merge pass.

use crate::builder::BuildOptions;
use crate::error::RibbonError;
use crate::extension::GeneratedExtension;
use crate::fragment::Origin;
use crate::injection::{Injection, Placement};
use crate::order::OrderDirective;
use ribbon_error_reporting::{DetailItem, DetailKind, DiagnosticMessage};
use ribbon_source_map::SourceInfo;

/// Collects diagnostics and generated extensions while fragments are merged.
#[derive(Debug, Default)]
pub struct MergeContext {
    options: BuildOptions,
    origin: Option<Origin>,
    diagnostics: Vec<DiagnosticMessage>,
    extensions: Vec<GeneratedExtension>,
}

impl MergeContext {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Origin of the fragment being merged, if any.
    pub fn origin(&self) -> Option<&Origin> {
        self.origin.as_ref()
    }

    pub(crate) fn set_origin(&mut self, origin: Option<Origin>) {
        self.origin = origin;
    }

    /// Record `error` as a diagnostic and log it.
    pub fn report(&mut self, error: &RibbonError) {
        match &self.origin {
            Some(origin) if error.is_fatal() => {
                tracing::error!(code = error.code(), %origin, "{}", error)
            }
            Some(origin) => tracing::warn!(code = error.code(), %origin, "{}", error),
            None if error.is_fatal() => tracing::error!(code = error.code(), "{}", error),
            None => tracing::warn!(code = error.code(), "{}", error),
        }

        let mut diagnostic = error.to_diagnostic();
        if let Some(origin) = &self.origin {
            diagnostic.details.push(DetailItem {
                kind: DetailKind::Note,
                content: format!("Contributed by {}", origin).into(),
                location: None,
            });
        }
        self.diagnostics.push(diagnostic);
    }

    /// Report an out-of-bound placement, if `injection` is one.
    pub(crate) fn report_injection(
        &mut self,
        injection: &Injection,
        directive: &OrderDirective,
        len: usize,
        source_info: Option<&SourceInfo>,
    ) {
        if injection.placement.is_out_of_bound() {
            self.report(&RibbonError::OutOfBoundOrder {
                directive: directive.to_string(),
                len,
                at_end: injection.placement == Placement::FallbackEnd,
                source_info: source_info.cloned(),
            });
        }
    }

    pub fn diagnostics(&self) -> &[DiagnosticMessage] {
        &self.diagnostics
    }

    pub(crate) fn push_diagnostics(&mut self, diagnostics: impl IntoIterator<Item = DiagnosticMessage>) {
        self.diagnostics.extend(diagnostics);
    }

    pub(crate) fn record_extension(&mut self, extension: GeneratedExtension) {
        tracing::debug!(id = %extension.id, kind = ?extension.kind, "generated extension");
        self.extensions.push(extension);
    }

    pub(crate) fn extension_count(&self) -> usize {
        self.extensions.len()
    }

    /// Forget extensions recorded by a fragment that was later rejected.
    pub(crate) fn truncate_extensions(&mut self, len: usize) {
        self.extensions.truncate(len);
    }

    pub(crate) fn into_parts(self) -> (Vec<DiagnosticMessage>, Vec<GeneratedExtension>) {
        (self.diagnostics, self.extensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ribbon_error_reporting::DiagnosticKind;

    #[test]
    fn test_report_attaches_origin() {
        let mut ctx = MergeContext::default();
        ctx.set_origin(Some(Origin::new("cms").with_file("ribbon.xml")));
        ctx.report(&RibbonError::UnknownTag {
            tag: "button".to_string(),
            context: "<toolbar>".to_string(),
            source_info: None,
        });

        let diagnostic = &ctx.diagnostics()[0];
        assert_eq!(diagnostic.kind, DiagnosticKind::Warning);
        let note = diagnostic.details.last().unwrap();
        assert_eq!(note.kind, DetailKind::Note);
        assert_eq!(
            note.content.as_str(),
            "Contributed by plugin `cms`, file `ribbon.xml`"
        );
    }

    #[test]
    fn test_in_bound_injection_is_silent() {
        let mut list: crate::OrderedList<u8> = vec![1, 2].into();
        let mut engine = crate::OrderingEngine::capture(&list);
        let directive: OrderDirective = "1".parse().unwrap();
        let injection = engine.inject(&mut list, 0, &directive);

        let mut ctx = MergeContext::default();
        ctx.report_injection(&injection, &directive, 2, None);
        assert!(ctx.diagnostics().is_empty());

        let directive: OrderDirective = "7".parse().unwrap();
        let injection = engine.inject(&mut list, 9, &directive);
        ctx.report_injection(&injection, &directive, 2, None);
        assert_eq!(ctx.diagnostics()[0].code.as_deref(), Some("R-1-2"));
    }
}
