//! Groups of controls inside a tab.

use crate::context::MergeContext;
use crate::error::{Result, RibbonError};
use crate::group_size::GroupSize;
use crate::label::Label;
use crate::match_key::{Keyed, MatchKey};
use crate::order::OrderDirective;
use ribbon_source_map::SourceInfo;
use serde::Serialize;

/// The three densities a group can be rendered at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeKind {
    Large,
    Medium,
    Small,
}

impl SizeKind {
    pub const ALL: [SizeKind; 3] = [SizeKind::Large, SizeKind::Medium, SizeKind::Small];

    /// Source lookup order when an override lacks the target's own variant.
    const FALLBACK: [SizeKind; 3] = [SizeKind::Medium, SizeKind::Large, SizeKind::Small];

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeKind::Large => "large",
            SizeKind::Medium => "medium",
            SizeKind::Small => "small",
        }
    }
}

/// A named cluster of controls with up to three size variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub label: Label,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub priority: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialog_box_launcher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large: Option<GroupSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<GroupSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small: Option<GroupSize>,
    pub is_override: bool,
    /// Position among the groups of the tab.
    pub order: OrderDirective,
    /// Position of injected controls when this group overrides another.
    pub controls_order: OrderDirective,
    #[serde(skip)]
    pub source_info: Option<SourceInfo>,
}

impl Group {
    pub fn new(label: Label) -> Self {
        Self {
            label,
            icon: None,
            priority: 0,
            dialog_box_launcher: None,
            large: None,
            medium: None,
            small: None,
            is_override: false,
            order: OrderDirective::APPEND,
            controls_order: OrderDirective::APPEND,
            source_info: None,
        }
    }

    pub fn size(&self, kind: SizeKind) -> Option<&GroupSize> {
        match kind {
            SizeKind::Large => self.large.as_ref(),
            SizeKind::Medium => self.medium.as_ref(),
            SizeKind::Small => self.small.as_ref(),
        }
    }

    pub fn size_mut(&mut self, kind: SizeKind) -> Option<&mut GroupSize> {
        match kind {
            SizeKind::Large => self.large.as_mut(),
            SizeKind::Medium => self.medium.as_mut(),
            SizeKind::Small => self.small.as_mut(),
        }
    }

    /// A group is empty when it has no medium variant or that variant
    /// references no control.
    pub fn is_empty(&self) -> bool {
        self.medium.as_ref().is_none_or(|m| m.control_ids().is_empty())
    }

    /// Check that the small and large variants reference the same controls
    /// as the medium one.
    ///
    /// Variants without controls are not compared, and neither is anything
    /// when the medium variant has none.
    pub fn check_size_consistency(&self) -> Result<()> {
        let Some(medium) = &self.medium else {
            return Ok(());
        };
        let medium_ids = medium.control_ids();
        if medium_ids.is_empty() {
            return Ok(());
        }

        for kind in [SizeKind::Small, SizeKind::Large] {
            let Some(variant) = self.size(kind) else {
                continue;
            };
            let ids = variant.control_ids();
            if ids.is_empty() {
                continue;
            }
            let difference: Vec<String> = ids
                .symmetric_difference(&medium_ids)
                .map(|id| id.to_string())
                .collect();
            if !difference.is_empty() {
                return Err(RibbonError::SizeInconsistency {
                    group: self.label.to_string(),
                    size: kind.as_str(),
                    difference,
                    source_info: self.source_info.clone(),
                });
            }
        }
        Ok(())
    }

    /// Variant of `self` whose elements are injected into `target` when
    /// `self` overrides another group.
    ///
    /// The same-size variant is used when present and non-empty, otherwise
    /// the first present non-empty variant among medium, large, small.
    pub fn source_for(&self, target: SizeKind) -> Option<&GroupSize> {
        let usable = |kind: SizeKind| self.size(kind).filter(|s| !s.is_empty());
        usable(target).or_else(|| SizeKind::FALLBACK.into_iter().find_map(usable))
    }

    /// Splice the elements of `source` into every size variant present on
    /// this group, at `source.controls_order`.
    ///
    /// The merged group is checked again afterwards. An inconsistency is
    /// reported but the injected controls stay.
    pub fn inject_override(&mut self, source: &Group, ctx: &mut MergeContext) {
        tracing::debug!(group = %self.label, "overriding group to inject new controls");

        for kind in SizeKind::ALL {
            let Some(elements) = source.source_for(kind) else {
                continue;
            };
            let Some(target) = self.size_mut(kind) else {
                continue;
            };

            let mut out_of_bound = None;
            for element in elements.iter() {
                let injection = target.inject(element.clone(), &source.controls_order);
                if out_of_bound.is_none() && injection.placement.is_out_of_bound() {
                    out_of_bound = Some(injection);
                }
            }
            if let Some(injection) = out_of_bound {
                ctx.report_injection(
                    &injection,
                    &source.controls_order,
                    target.anchor_count(),
                    source.source_info.as_ref(),
                );
            }
        }

        if let Err(err) = self.check_size_consistency() {
            ctx.report(&err);
        }
    }
}

impl Keyed for Group {
    fn match_key(&self) -> MatchKey<'_> {
        MatchKey::Label(&self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;

    fn size(ids: &[&str]) -> GroupSize {
        GroupSize::new(ids.iter().map(|id| Element::control(*id)).collect())
    }

    fn ids(size: Option<&GroupSize>) -> Vec<String> {
        size.map(|s| {
            s.iter()
                .filter_map(|e| match e {
                    Element::Control(c) => Some(c.id.clone()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
    }

    fn group(label: &str) -> Group {
        Group::new(Label::new("application", label))
    }

    #[test]
    fn test_size_consistency() {
        let mut g = group("Clipboard");
        g.medium = Some(size(&["cut", "copy"]));
        g.small = Some(size(&["copy", "cut"]));
        g.large = Some(size(&[]));
        assert!(g.check_size_consistency().is_ok());

        g.small = Some(size(&["copy", "paste"]));
        let err = g.check_size_consistency().unwrap_err();
        assert!(matches!(
            err,
            RibbonError::SizeInconsistency { size: "small", ref difference, .. }
                if difference == &["cut".to_string(), "paste".to_string()]
        ));
    }

    #[test]
    fn test_consistency_skipped_without_medium_controls() {
        let mut g = group("G");
        g.large = Some(size(&["a"]));
        g.small = Some(size(&["b"]));
        assert!(g.check_size_consistency().is_ok());
        assert!(g.is_empty());

        g.medium = Some(GroupSize::new(vec![Element::Separator]));
        assert!(g.check_size_consistency().is_ok());
        assert!(g.is_empty());
    }

    #[test]
    fn test_source_fallback_chain() {
        let mut source = group("G");
        source.large = Some(size(&["l"]));
        source.small = Some(size(&["s"]));
        source.medium = Some(size(&[]));

        assert_eq!(ids(source.source_for(SizeKind::Small)), vec!["s"]);
        // empty medium falls through to large
        assert_eq!(ids(source.source_for(SizeKind::Medium)), vec!["l"]);

        source.large = None;
        assert_eq!(ids(source.source_for(SizeKind::Large)), vec!["s"]);

        source.small = None;
        assert!(source.source_for(SizeKind::Large).is_none());
    }

    #[test]
    fn test_inject_override_into_present_variants() {
        let mut target = group("G");
        target.medium = Some(size(&["a", "b"]));
        target.small = Some(size(&["a", "b"]));

        let mut source = group("G");
        source.is_override = true;
        source.medium = Some(size(&["x", "y"]));
        source.controls_order = "2".parse().unwrap();

        let mut ctx = MergeContext::default();
        target.inject_override(&source, &mut ctx);

        assert_eq!(ids(target.medium.as_ref()), vec!["a", "x", "y", "b"]);
        // small has no counterpart in the source, medium is used
        assert_eq!(ids(target.small.as_ref()), vec!["a", "x", "y", "b"]);
        assert!(target.large.is_none());
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn test_out_of_bound_override_reported_once_per_variant() {
        let mut target = group("G");
        target.medium = Some(size(&["a"]));

        let mut source = group("G");
        source.medium = Some(size(&["x", "y"]));
        source.controls_order = "4".parse().unwrap();

        let mut ctx = MergeContext::default();
        target.inject_override(&source, &mut ctx);
        assert_eq!(ids(target.medium.as_ref()), vec!["a", "x", "y"]);
        assert_eq!(ctx.diagnostics().len(), 1);
    }

    #[test]
    fn test_inconsistent_result_of_override_reported() {
        let mut target = group("G");
        target.medium = Some(size(&["a"]));
        target.small = Some(size(&["a"]));

        let mut source = group("G");
        source.large = Some(size(&["L"]));
        source.small = Some(size(&["S"]));

        let mut ctx = MergeContext::default();
        target.inject_override(&source, &mut ctx);

        assert_eq!(ids(target.medium.as_ref()), vec!["a", "L"]);
        assert_eq!(ids(target.small.as_ref()), vec!["a", "S"]);
        assert_eq!(ctx.diagnostics().len(), 1);
        assert_eq!(ctx.diagnostics()[0].code.as_deref(), Some("R-2-1"));
        assert!(ctx.diagnostics()[0].is_error());
    }
}
