//! Errors and non-fatal problems raised while merging fragments.

use ribbon_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder};
use ribbon_source_map::SourceInfo;
use thiserror::Error;

/// Everything that can go wrong while merging ribbon fragments.
///
/// Some variants are fatal for the fragment (or exclusion) that raised them,
/// others only degrade the result. [`RibbonError::is_fatal`] tells them apart.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RibbonError {
    /// An order directive does not follow the `P` / `P.S` grammar.
    #[error("malformed order directive `{value}`")]
    MalformedDirective {
        value: String,
        source_info: Option<SourceInfo>,
    },

    /// An order directive points outside the captured sequence.
    #[error("order `{directive}` is out of bound for {len} element(s), placed at the {}", placement(.at_end))]
    OutOfBoundOrder {
        directive: String,
        len: usize,
        /// True when the element was placed at the end, false for the start.
        at_end: bool,
        source_info: Option<SourceInfo>,
    },

    /// Size variants of a group do not reference the same controls.
    #[error("the {size} configuration of group `{group}` does not have the same elements as the medium one ({})", join_ids(.difference))]
    SizeInconsistency {
        group: String,
        size: &'static str,
        /// Control ids present in exactly one of the two variants.
        difference: Vec<String>,
        source_info: Option<SourceInfo>,
    },

    /// An exclusion does not name exactly one applicable target.
    #[error("ambiguous exclusion `{tag}`: {reason}")]
    AmbiguousExclusion {
        tag: String,
        reason: String,
        source_info: Option<SourceInfo>,
    },

    /// An override found nothing with the same label to merge into.
    #[error("override {kind} `{label}` matches no existing {kind}{}", in_tab(.container))]
    UnmatchedOverride {
        kind: &'static str,
        label: String,
        /// Tab the group override was looked up in.
        container: Option<String>,
        source_info: Option<SourceInfo>,
    },

    #[error("<{tag}> is missing the required `{attribute}` attribute")]
    MissingAttribute {
        tag: String,
        attribute: String,
        source_info: Option<SourceInfo>,
    },

    #[error("invalid value `{value}` for `{attribute}` on <{tag}>, expected {expected}")]
    InvalidAttribute {
        tag: String,
        attribute: String,
        value: String,
        expected: &'static str,
        source_info: Option<SourceInfo>,
    },

    /// A tag that is not allowed where it appears; it is skipped.
    #[error("unknown tag <{tag}> in {context}")]
    UnknownTag {
        tag: String,
        context: String,
        source_info: Option<SourceInfo>,
    },

    /// A tab is ordered relative to a tab label that does not exist.
    #[error("tab `{tab}` is ordered relative to unknown tab `{target}`")]
    UnresolvedTabOrder {
        tab: String,
        target: String,
        source_info: Option<SourceInfo>,
    },
}

fn placement(at_end: &bool) -> &'static str {
    if *at_end { "end" } else { "start" }
}

fn join_ids(ids: &[String]) -> String {
    ids.join(", ")
}

fn in_tab(container: &Option<String>) -> String {
    match container {
        Some(tab) => format!(" in tab `{}`", tab),
        None => String::new(),
    }
}

impl RibbonError {
    /// Whether this error aborts the fragment (or exclusion) that raised it.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RibbonError::MalformedDirective { .. }
                | RibbonError::SizeInconsistency { .. }
                | RibbonError::AmbiguousExclusion { .. }
                | RibbonError::MissingAttribute { .. }
                | RibbonError::InvalidAttribute { .. }
        )
    }

    /// The catalog code of this error.
    pub fn code(&self) -> &'static str {
        match self {
            RibbonError::MalformedDirective { .. } => "R-1-1",
            RibbonError::OutOfBoundOrder { .. } => "R-1-2",
            RibbonError::SizeInconsistency { .. } => "R-2-1",
            RibbonError::AmbiguousExclusion { .. } => "R-3-1",
            RibbonError::UnmatchedOverride { .. } => "R-4-1",
            RibbonError::MissingAttribute { .. } => "R-5-1",
            RibbonError::InvalidAttribute { .. } => "R-5-2",
            RibbonError::UnknownTag { .. } => "R-5-3",
            RibbonError::UnresolvedTabOrder { .. } => "R-6-1",
        }
    }

    pub fn source_info(&self) -> Option<&SourceInfo> {
        match self {
            RibbonError::MalformedDirective { source_info, .. }
            | RibbonError::OutOfBoundOrder { source_info, .. }
            | RibbonError::SizeInconsistency { source_info, .. }
            | RibbonError::AmbiguousExclusion { source_info, .. }
            | RibbonError::UnmatchedOverride { source_info, .. }
            | RibbonError::MissingAttribute { source_info, .. }
            | RibbonError::InvalidAttribute { source_info, .. }
            | RibbonError::UnknownTag { source_info, .. }
            | RibbonError::UnresolvedTabOrder { source_info, .. } => source_info.as_ref(),
        }
    }

    /// Convert to a diagnostic. Fatal errors become errors, the rest warnings.
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        let builder = match self {
            RibbonError::MalformedDirective { value, .. } => {
                DiagnosticMessageBuilder::error("Malformed Order Directive")
                    .problem(format!("`{}` is not a valid order", value))
                    .add_info("An order is `P` or `P.S` where `P` is a signed integer and `S` an unsigned one")
                    .add_hint("Use for example `2`, `-1` or `2.5`?")
            }
            RibbonError::OutOfBoundOrder {
                directive,
                len,
                at_end,
                ..
            } => DiagnosticMessageBuilder::warning("Order Out Of Bound")
                .problem(format!(
                    "Order `{}` does not fit a sequence of {} element(s)",
                    directive, len
                ))
                .add_info(if *at_end {
                    "The element was placed after the last original element"
                } else {
                    "The element was placed before the first original element"
                }),
            RibbonError::SizeInconsistency {
                group,
                size,
                difference,
                ..
            } => {
                let mut builder = DiagnosticMessageBuilder::error("Inconsistent Group Sizes")
                    .problem(format!(
                        "The {} variant of group `{}` does not reference the same controls as the medium one",
                        size, group
                    ));
                for id in difference {
                    builder = builder.add_detail(format!("`{}` appears in only one of the two variants", id));
                }
                builder.add_hint("Declare the same controls in every size variant?")
            }
            RibbonError::AmbiguousExclusion { tag, reason, .. } => {
                DiagnosticMessageBuilder::error("Ambiguous Exclusion")
                    .problem(format!("`<{}>` cannot be applied: {}", tag, reason))
                    .add_hint("Name exactly one target, e.g. `<exclude-control id=\"…\"/>`?")
            }
            RibbonError::UnmatchedOverride {
                kind,
                label,
                container,
                ..
            } => {
                let problem = match container {
                    Some(tab) => format!("No {} labelled `{}` exists in tab `{}`", kind, label, tab),
                    None => format!("No {} labelled `{}` exists", kind, label),
                };
                DiagnosticMessageBuilder::warning("Unmatched Override")
                    .problem(problem)
                    .add_info("The override was dropped")
                    .add_hint("Check the label of the overridden element?")
            }
            RibbonError::MissingAttribute { tag, attribute, .. } => {
                DiagnosticMessageBuilder::error("Missing Attribute")
                    .problem(format!("`<{}>` requires a `{}` attribute", tag, attribute))
            }
            RibbonError::InvalidAttribute {
                tag,
                attribute,
                value,
                expected,
                ..
            } => DiagnosticMessageBuilder::error("Invalid Attribute")
                .problem(format!(
                    "`{}` on `<{}>` has value `{}`",
                    attribute, tag, value
                ))
                .add_detail(format!("Expected {}", expected)),
            RibbonError::UnknownTag { tag, context, .. } => {
                DiagnosticMessageBuilder::warning("Unknown Tag")
                    .problem(format!("`<{}>` is not allowed in {}", tag, context))
                    .add_info("The element was skipped")
            }
            RibbonError::UnresolvedTabOrder { tab, target, .. } => {
                DiagnosticMessageBuilder::warning("Unresolved Tab Order")
                    .problem(format!(
                        "Tab `{}` is ordered relative to `{}`, which matches no tab",
                        tab, target
                    ))
                    .add_info("The tab was placed after all other tabs")
            }
        };

        builder
            .with_code(self.code())
            .with_optional_location(self.source_info().cloned())
            .build()
    }
}

/// Result type for merge operations.
pub type Result<T> = std::result::Result<T, RibbonError>;

#[cfg(test)]
mod tests {
    use super::*;
    use ribbon_error_reporting::DiagnosticKind;

    #[test]
    fn test_fatality_matches_diagnostic_kind() {
        let errors = vec![
            RibbonError::MalformedDirective {
                value: "x".to_string(),
                source_info: None,
            },
            RibbonError::OutOfBoundOrder {
                directive: "5".to_string(),
                len: 3,
                at_end: true,
                source_info: None,
            },
            RibbonError::UnknownTag {
                tag: "button".to_string(),
                context: "a toolbar".to_string(),
                source_info: None,
            },
        ];

        for err in errors {
            let diag = err.to_diagnostic();
            assert_eq!(diag.kind == DiagnosticKind::Error, err.is_fatal());
            assert_eq!(diag.code.as_deref(), Some(err.code()));
            assert!(ribbon_error_reporting::get_error_info(err.code()).is_some());
        }
    }

    #[test]
    fn test_display_messages() {
        let err = RibbonError::SizeInconsistency {
            group: "Clipboard".to_string(),
            size: "small",
            difference: vec!["copy".to_string(), "cut".to_string()],
            source_info: None,
        };
        assert_eq!(
            err.to_string(),
            "the small configuration of group `Clipboard` does not have the same elements as the medium one (copy, cut)"
        );

        let err = RibbonError::UnmatchedOverride {
            kind: "group",
            label: "Clipboard".to_string(),
            container: Some("Home".to_string()),
            source_info: None,
        };
        assert_eq!(
            err.to_string(),
            "override group `Clipboard` matches no existing group in tab `Home`"
        );

        let err = RibbonError::OutOfBoundOrder {
            directive: "-5".to_string(),
            len: 3,
            at_end: false,
            source_info: None,
        };
        assert_eq!(
            err.to_string(),
            "order `-5` is out of bound for 3 element(s), placed at the start"
        );
    }
}
