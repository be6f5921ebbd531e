//! Rendering-time view of a merged ribbon.
//!
//! Resolution expands control references through a [`ControlResolver`],
//! drops what became empty and fills in the size variants a group does not
//! declare. The merged model is left untouched.

use crate::element::{
    ControlRef, ControlSize, Element, Layout, LayoutAlign, Toolbar, sequences_equivalent,
};
use crate::group::{Group, SizeKind};
use crate::label::Label;
use crate::model::RibbonModel;
use crate::tab::Tab;
use serde::Serialize;
use std::collections::BTreeSet;

/// Maps a control id to the ids actually shown in the current context.
///
/// An empty list hides the control.
pub trait ControlResolver {
    fn resolve(&self, id: &str) -> Vec<String>;
}

impl<F> ControlResolver for F
where
    F: Fn(&str) -> Vec<String>,
{
    fn resolve(&self, id: &str) -> Vec<String> {
        self(id)
    }
}

/// Shows every control as itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityResolver;

impl ControlResolver for IdentityResolver {
    fn resolve(&self, id: &str) -> Vec<String> {
        vec![id.to_string()]
    }
}

/// Shows every control as itself, except a fixed set of hidden ones.
#[derive(Debug, Clone, Default)]
pub struct HidingResolver {
    hidden: BTreeSet<String>,
}

impl HidingResolver {
    pub fn new<I, S>(hidden: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hidden: hidden.into_iter().map(Into::into).collect(),
        }
    }
}

impl ControlResolver for HidingResolver {
    fn resolve(&self, id: &str) -> Vec<String> {
        if self.hidden.contains(id) {
            Vec::new()
        } else {
            vec![id.to_string()]
        }
    }
}

/// A group ready to be rendered.
///
/// The large and small variants are empty when they would repeat the
/// medium one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedGroup {
    pub label: Label,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub priority: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialog_box_launcher: Option<String>,
    pub large: Vec<Element>,
    pub medium: Vec<Element>,
    pub small: Vec<Element>,
}

impl ResolvedGroup {
    pub fn size(&self, kind: SizeKind) -> &[Element] {
        match kind {
            SizeKind::Large => &self.large,
            SizeKind::Medium => &self.medium,
            SizeKind::Small => &self.small,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedTab {
    pub label: Label,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contextual_control_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contextual_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contextual_group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contextual_label: Option<Label>,
    pub groups: Vec<ResolvedGroup>,
}

/// The ribbon as shown in one context.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolvedRibbon {
    pub app_menu: Vec<Element>,
    pub user_menu: Vec<Element>,
    pub tabs: Vec<ResolvedTab>,
}

/// Resolve `model` with `resolver`.
///
/// Groups left without controls and tabs left without groups are dropped.
pub fn resolve<R>(model: &RibbonModel, resolver: &R) -> ResolvedRibbon
where
    R: ControlResolver + ?Sized,
{
    ResolvedRibbon {
        app_menu: expand(model.app_menu().elements(), resolver),
        user_menu: expand(model.user_menu().elements(), resolver),
        tabs: model
            .tabs()
            .iter()
            .filter_map(|tab| resolve_tab(tab, resolver))
            .collect(),
    }
}

fn resolve_tab<R>(tab: &Tab, resolver: &R) -> Option<ResolvedTab>
where
    R: ControlResolver + ?Sized,
{
    let groups: Vec<ResolvedGroup> = tab
        .groups()
        .iter()
        .filter_map(|group| resolve_group(group, resolver))
        .collect();
    if groups.is_empty() {
        tracing::debug!(tab = %tab.label, "tab has no visible group");
        return None;
    }

    Some(ResolvedTab {
        label: tab.label.clone(),
        contextual_control_id: tab.contextual_control_id.clone(),
        contextual_color: tab.contextual_color.clone(),
        contextual_group_id: tab.contextual_group_id.clone(),
        contextual_label: tab.contextual_label.clone(),
        groups,
    })
}

fn resolve_group<R>(group: &Group, resolver: &R) -> Option<ResolvedGroup>
where
    R: ControlResolver + ?Sized,
{
    let mut large = group
        .large
        .as_ref()
        .map(|size| expand(size.iter(), resolver))
        .unwrap_or_default();

    let (medium, mut small) = match &group.medium {
        Some(medium) => (
            expand(medium.iter(), resolver),
            group
                .small
                .as_ref()
                .map(|size| expand(size.iter(), resolver))
                .unwrap_or_default(),
        ),
        None => {
            let mut ids = BTreeSet::new();
            for element in &large {
                element.collect_control_ids(&mut ids);
            }
            let total = ids.len();
            (generate(&large, false, total), generate(&large, true, total))
        }
    };

    if sequences_equivalent(&large, &medium) {
        large.clear();
    }
    if sequences_equivalent(&small, &medium) {
        small.clear();
    }

    if !medium.iter().any(|e| !e.control_ids().is_empty()) {
        tracing::debug!(group = %group.label, "group has no visible control");
        return None;
    }

    Some(ResolvedGroup {
        label: group.label.clone(),
        icon: group.icon.clone(),
        priority: group.priority,
        dialog_box_launcher: group.dialog_box_launcher.clone(),
        large,
        medium,
        small,
    })
}

fn expand_controls<'a, R>(controls: impl IntoIterator<Item = &'a ControlRef>, resolver: &R) -> Vec<ControlRef>
where
    R: ControlResolver + ?Sized,
{
    controls
        .into_iter()
        .flat_map(|control| {
            resolver
                .resolve(&control.id)
                .into_iter()
                .map(move |id| ControlRef::new(id).with_colspan(control.colspan))
        })
        .collect()
}

/// Expand control references and drop containers left empty. Separators
/// are trimmed from both ends.
fn expand<'a, R>(elements: impl IntoIterator<Item = &'a Element>, resolver: &R) -> Vec<Element>
where
    R: ControlResolver + ?Sized,
{
    let mut resolved = Vec::new();
    for element in elements {
        match element {
            Element::Control(control) => {
                resolved.extend(
                    expand_controls([control], resolver)
                        .into_iter()
                        .map(Element::Control),
                );
            }
            Element::Separator => resolved.push(Element::Separator),
            Element::Layout(layout) => {
                let children = expand(&layout.children, resolver);
                if !children.is_empty() {
                    resolved.push(Element::Layout(Layout {
                        cols: layout.cols,
                        size: layout.size,
                        align: layout.align,
                        children,
                    }));
                }
            }
            Element::Toolbar(toolbar) => {
                let children = expand_controls(&toolbar.children, resolver);
                if !children.is_empty() {
                    resolved.push(Element::Toolbar(Toolbar {
                        colspan: toolbar.colspan,
                        children,
                    }));
                }
            }
        }
    }

    let is_separator = |e: &Element| matches!(e, Element::Separator);
    let start = resolved
        .iter()
        .position(|e| !is_separator(e))
        .unwrap_or(resolved.len());
    let end = resolved
        .iter()
        .rposition(|e| !is_separator(e))
        .map_or(start, |i| i + 1);
    resolved.truncate(end);
    resolved.drain(..start);
    resolved
}

/// Derive a denser variant from the large one.
///
/// Runs of controls are batched by three, remainder first. Layouts are
/// copied as very small, toolbars as is. Separators are dropped.
fn generate(large: &[Element], small: bool, total: usize) -> Vec<Element> {
    let mut generated = Vec::new();
    let mut queue = Vec::new();
    for element in large {
        match element {
            Element::Control(control) => queue.push(control.clone()),
            Element::Separator => {}
            Element::Toolbar(_) => {
                flush(&mut queue, &mut generated, small, total);
                generated.push(element.clone());
            }
            Element::Layout(layout) => {
                flush(&mut queue, &mut generated, small, total);
                generated.push(Element::Layout(Layout {
                    size: Some(ControlSize::VerySmall),
                    ..layout.clone()
                }));
            }
        }
    }
    flush(&mut queue, &mut generated, small, total);
    generated
}

fn flush(queue: &mut Vec<ControlRef>, generated: &mut Vec<Element>, small: bool, total: usize) {
    if queue.is_empty() {
        return;
    }
    let first = match queue.len() % 3 {
        0 => 3,
        remainder => remainder,
    };
    let rest = queue.split_off(first);
    let head = std::mem::take(queue);

    if (2..=3).contains(&total) {
        generated.push(column(head, ControlSize::Small));
    } else {
        generated.extend(head.into_iter().map(Element::Control));
    }

    let size = if small {
        ControlSize::VerySmall
    } else {
        ControlSize::Small
    };
    for batch in rest.chunks(3) {
        generated.push(column(batch.to_vec(), size));
    }
}

fn column(controls: Vec<ControlRef>, size: ControlSize) -> Element {
    Element::Layout(
        Layout::new(1, controls.into_iter().map(Element::Control).collect())
            .with_size(size)
            .with_align(LayoutAlign::Top),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group_size::GroupSize;

    fn controls(ids: &[&str]) -> Vec<Element> {
        ids.iter().map(|id| Element::control(*id)).collect()
    }

    fn column_of(ids: &[&str], size: ControlSize) -> Element {
        column(ids.iter().map(|id| ControlRef::new(*id)).collect(), size)
    }

    fn large_only(elements: Vec<Element>) -> Group {
        let mut group = Group::new(Label::new("application", "G"));
        group.large = Some(GroupSize::new(elements));
        group
    }

    #[test]
    fn test_generated_variants_batch_by_three() {
        let group = large_only(controls(&["a", "b", "c", "d", "e"]));
        let resolved = resolve_group(&group, &IdentityResolver).unwrap();

        assert_eq!(resolved.large, controls(&["a", "b", "c", "d", "e"]));
        let mut medium = controls(&["a", "b"]);
        medium.push(column_of(&["c", "d", "e"], ControlSize::Small));
        assert_eq!(resolved.medium, medium);
        let mut small = controls(&["a", "b"]);
        small.push(column_of(&["c", "d", "e"], ControlSize::VerySmall));
        assert_eq!(resolved.small, small);
    }

    #[test]
    fn test_few_controls_become_one_column() {
        let group = large_only(controls(&["a", "b", "c"]));
        let resolved = resolve_group(&group, &IdentityResolver).unwrap();

        assert_eq!(resolved.medium, vec![column_of(&["a", "b", "c"], ControlSize::Small)]);
        assert!(resolved.small.is_empty());
        assert_eq!(resolved.large, controls(&["a", "b", "c"]));
    }

    #[test]
    fn test_variants_equal_to_medium_are_cleared() {
        let group = large_only(controls(&["a"]));
        let resolved = resolve_group(&group, &IdentityResolver).unwrap();
        assert_eq!(resolved.medium, controls(&["a"]));
        assert!(resolved.large.is_empty());
        assert!(resolved.small.is_empty());
    }

    #[test]
    fn test_layouts_and_toolbars_are_copied() {
        let layout = Layout::new(2, controls(&["x", "y"])).with_size(ControlSize::Large);
        let toolbar = Toolbar::new(vec![ControlRef::new("t")]);
        let group = large_only(vec![
            Element::control("a"),
            Element::Separator,
            Element::Layout(layout.clone()),
            Element::Toolbar(toolbar.clone()),
            Element::control("b"),
        ]);
        let resolved = resolve_group(&group, &IdentityResolver).unwrap();

        let expected = vec![
            Element::control("a"),
            Element::Layout(layout.with_size(ControlSize::VerySmall)),
            Element::Toolbar(toolbar),
            Element::control("b"),
        ];
        assert_eq!(resolved.medium, expected);
        // medium and small only differ in later batches, which are absent
        assert!(resolved.small.is_empty());
    }

    #[test]
    fn test_hidden_controls_empty_their_containers() {
        let resolver = HidingResolver::new(["x", "y", "t"]);
        let elements = vec![
            Element::Separator,
            Element::Layout(Layout::new(1, controls(&["x", "y"]))),
            Element::control("a"),
            Element::Separator,
            Element::Toolbar(Toolbar::new(vec![ControlRef::new("t")])),
            Element::Separator,
        ];
        assert_eq!(expand(&elements, &resolver), controls(&["a"]));
    }

    #[test]
    fn test_resolver_may_expand_one_control() {
        let resolver = |id: &str| -> Vec<String> {
            if id == "multi" {
                vec!["multi-1".to_string(), "multi-2".to_string()]
            } else {
                vec![id.to_string()]
            }
        };
        let elements = vec![Element::Control(ControlRef::new("multi").with_colspan(2))];
        assert_eq!(
            expand(&elements, &resolver),
            vec![
                Element::Control(ControlRef::new("multi-1").with_colspan(2)),
                Element::Control(ControlRef::new("multi-2").with_colspan(2)),
            ]
        );
    }

    #[test]
    fn test_empty_groups_and_tabs_are_dropped() {
        let mut visible = Group::new(Label::new("application", "VISIBLE"));
        visible.medium = Some(GroupSize::new(controls(&["a"])));
        let mut hidden = Group::new(Label::new("application", "HIDDEN"));
        hidden.medium = Some(GroupSize::new(controls(&["secret"])));

        let mut home = Tab::new(Label::new("application", "HOME"));
        home.push_group(visible);
        home.push_group(hidden.clone());
        let mut admin = Tab::new(Label::new("application", "ADMIN"));
        admin.push_group(hidden);

        let model = RibbonModel::new(vec![home, admin], Default::default(), Default::default(), Vec::new());
        let resolved = resolve(&model, &HidingResolver::new(["secret"]));

        assert_eq!(resolved.tabs.len(), 1);
        assert_eq!(resolved.tabs[0].label.key, "HOME");
        assert_eq!(resolved.tabs[0].groups.len(), 1);
        assert_eq!(resolved.tabs[0].groups[0].label.key, "VISIBLE");
    }
}
