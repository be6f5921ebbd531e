//! Merging fragments into a [`RibbonModel`].

use crate::context::MergeContext;
use crate::convert;
use crate::error::{Result, RibbonError};
use crate::exclusion::{Exclusion, ExclusionSet};
use crate::fragment::{Fragment, FragmentKind};
use crate::group::Group;
use crate::label::DEFAULT_CATALOGUE;
use crate::match_key::Keyed;
use crate::menu::Menu;
use crate::model::RibbonModel;
use crate::tab::Tab;
use crate::tab_order::order_tabs;
use ribbon_error_reporting::DiagnosticMessage;

/// Options of a merge pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Abort the whole build on the first fatal error instead of skipping
    /// the offending fragment.
    pub strict: bool,
    /// Catalogue of labels that do not name one.
    pub default_catalogue: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            strict: false,
            default_catalogue: DEFAULT_CATALOGUE.to_string(),
        }
    }
}

/// A merged model and everything reported while building it.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub model: RibbonModel,
    pub diagnostics: Vec<DiagnosticMessage>,
}

impl BuildOutput {
    /// Whether a fragment or exclusion was rejected.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(DiagnosticMessage::is_error)
    }
}

#[derive(Debug, Default)]
struct MergeState {
    tabs: Vec<Tab>,
    app_menu: Menu,
    user_menu: Menu,
}

/// Collects fragments and exclusions, then merges them in one pass.
///
/// ```
/// use ribbon_config::{BuildOptions, Fragment, FragmentNode, Origin, RibbonBuilder};
///
/// let tab = FragmentNode::new("tab").with_attr("label", "HOME");
/// let mut builder = RibbonBuilder::new(BuildOptions::default());
/// builder.add_fragment(Fragment::new(Origin::new("core"), tab));
///
/// let output = builder.build().unwrap();
/// assert_eq!(output.model.tabs().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct RibbonBuilder {
    options: BuildOptions,
    fragments: Vec<Fragment>,
    exclusions: ExclusionSet,
    diagnostics: Vec<DiagnosticMessage>,
}

impl RibbonBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Add a fragment. Fragments are merged in the order they are added.
    pub fn add_fragment(&mut self, fragment: Fragment) -> &mut Self {
        self.fragments.push(fragment);
        self
    }

    pub fn add_fragments(&mut self, fragments: impl IntoIterator<Item = Fragment>) -> &mut Self {
        self.fragments.extend(fragments);
        self
    }

    /// Add an exclusion that does not come from a fragment.
    pub fn add_exclusion(&mut self, exclusion: Exclusion) -> &mut Self {
        self.exclusions.push(exclusion);
        self
    }

    /// Carry diagnostics raised while reading the fragments into the output.
    pub fn add_diagnostics(&mut self, diagnostics: impl IntoIterator<Item = DiagnosticMessage>) -> &mut Self {
        self.diagnostics.extend(diagnostics);
        self
    }

    /// Merge everything.
    ///
    /// # Errors
    ///
    /// Only in strict mode, with the first fatal error. Otherwise fatal
    /// errors reject the fragment or exclusion that raised them and are
    /// returned as diagnostics.
    pub fn build(self) -> Result<BuildOutput> {
        let strict = self.options.strict;
        let mut ctx = MergeContext::new(self.options);
        ctx.push_diagnostics(self.diagnostics);
        let mut exclusions = self.exclusions;

        let (exclusion_fragments, fragments): (Vec<Fragment>, Vec<Fragment>) = self
            .fragments
            .into_iter()
            .partition(|f| f.kind() == Some(FragmentKind::Exclusion));

        for fragment in &exclusion_fragments {
            ctx.set_origin(Some(fragment.origin.clone()));
            match Exclusion::from_fragment(&fragment.root) {
                Ok(exclusion) => exclusions.push(exclusion),
                Err(err) => {
                    ctx.report(&err);
                    if strict {
                        return Err(err);
                    }
                }
            }
        }
        ctx.set_origin(None);

        let fragments = exclusions.apply(fragments);
        tracing::debug!(
            fragments = fragments.len(),
            exclusions = exclusions.len(),
            "merging ribbon fragments"
        );

        let mut state = MergeState::default();
        for fragment in &fragments {
            ctx.set_origin(Some(fragment.origin.clone()));
            let mark = ctx.extension_count();
            if let Err(err) = merge_fragment(&mut state, fragment, &mut ctx) {
                ctx.truncate_extensions(mark);
                ctx.report(&err);
                if strict {
                    return Err(err);
                }
            }
        }
        ctx.set_origin(None);

        let tabs = order_tabs(state.tabs, &mut ctx);
        let (diagnostics, extensions) = ctx.into_parts();
        tracing::debug!(
            tabs = tabs.len(),
            extensions = extensions.len(),
            diagnostics = diagnostics.len(),
            "ribbon merged"
        );

        Ok(BuildOutput {
            model: RibbonModel::new(tabs, state.app_menu, state.user_menu, extensions),
            diagnostics,
        })
    }
}

/// Merge one fragment. Conversion happens before any mutation, so a fragment
/// that fails leaves the state untouched.
fn merge_fragment(state: &mut MergeState, fragment: &Fragment, ctx: &mut MergeContext) -> Result<()> {
    let root = &fragment.root;
    match fragment.kind() {
        Some(FragmentKind::Tab) => {
            let (tab, groups) = convert::tab(root, ctx)?;
            if tab.is_override {
                merge_tab_override(state, &tab, groups, ctx);
            } else {
                add_tab(state, tab, groups, ctx);
            }
        }
        Some(FragmentKind::AppMenu) => {
            let elements = convert::menu_elements(root, ctx)?;
            let order = convert::menu_order(root)?;
            state
                .app_menu
                .add_elements(elements, order.as_ref(), root.source_info.as_ref(), ctx);
        }
        Some(FragmentKind::UserMenu) => {
            let elements = convert::menu_elements(root, ctx)?;
            let order = convert::menu_order(root)?;
            state
                .user_menu
                .add_elements(elements, order.as_ref(), root.source_info.as_ref(), ctx);
        }
        Some(FragmentKind::Exclusion) | None => {
            ctx.report(&RibbonError::UnknownTag {
                tag: root.tag.clone(),
                context: "the fragment list".to_string(),
                source_info: root.source_info.clone(),
            });
        }
    }
    Ok(())
}

fn add_tab(state: &mut MergeState, mut tab: Tab, groups: Vec<Group>, ctx: &mut MergeContext) {
    tracing::debug!(tab = %tab.label, "new tab");
    let (overrides, own): (Vec<Group>, Vec<Group>) = groups.into_iter().partition(|g| g.is_override);
    for group in own {
        tab.push_group(group);
    }
    tab.inject_groups_override(&overrides, ctx);
    state.tabs.push(tab);
}

fn merge_tab_override(state: &mut MergeState, tab: &Tab, groups: Vec<Group>, ctx: &mut MergeContext) {
    let mut matched = false;
    for existing in state.tabs.iter_mut().filter(|t| t.matches(tab)) {
        tracing::debug!(tab = %existing.label, "overriding tab");
        existing.inject_groups(groups.clone(), ctx);
        existing.inject_groups_override(&groups, ctx);
        matched = true;
    }

    if !matched {
        ctx.report(&RibbonError::UnmatchedOverride {
            kind: "tab",
            label: tab.label.to_string(),
            container: None,
            source_info: tab.source_info.clone(),
        });
    }
}
