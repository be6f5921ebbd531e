//! Ribbon tabs.

use crate::context::MergeContext;
use crate::error::RibbonError;
use crate::group::Group;
use crate::injection::OrderingEngine;
use crate::label::Label;
use crate::match_key::{Keyed, MatchKey};
use crate::ordered_list::OrderedList;
use ribbon_source_map::SourceInfo;
use serde::Serialize;

/// Where a tab goes among the other tabs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum TabOrder {
    Position(i32),
    /// Next to the tab with this label.
    Label(String),
    Unspecified,
}

/// A tab and its ordered groups.
#[derive(Debug, Clone, Serialize)]
pub struct Tab {
    pub label: Label,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contextual_control_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contextual_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contextual_group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contextual_label: Option<Label>,
    pub order: TabOrder,
    pub order_before: bool,
    pub is_override: bool,
    groups: OrderedList<Group>,
    #[serde(skip)]
    engine: Option<OrderingEngine>,
    #[serde(skip)]
    pub source_info: Option<SourceInfo>,
}

impl Tab {
    pub fn new(label: Label) -> Self {
        Self {
            label,
            contextual_control_id: None,
            contextual_color: None,
            contextual_group_id: None,
            contextual_label: None,
            order: TabOrder::Unspecified,
            order_before: false,
            is_override: false,
            groups: OrderedList::new(),
            engine: None,
            source_info: None,
        }
    }

    /// Contextual tabs are only shown while their control is active.
    pub fn is_contextual(&self) -> bool {
        self.contextual_control_id.is_some()
    }

    pub fn groups(&self) -> &OrderedList<Group> {
        &self.groups
    }

    pub fn find_group(&self, label: &Label) -> Option<&Group> {
        self.groups.iter().find(|g| &g.label == label)
    }

    /// Append a group declared by the tab itself.
    pub fn push_group(&mut self, group: Group) {
        self.groups.push_back(group);
    }

    /// Inject non-override groups at their `order`.
    ///
    /// The groups present at the first injection are the anchors for every
    /// later one. Override groups are ignored.
    pub fn inject_groups(&mut self, groups: Vec<Group>, ctx: &mut MergeContext) {
        for group in groups.into_iter().filter(|g| !g.is_override) {
            tracing::debug!(group = %group.label, tab = %self.label, "new group injected into tab");

            let engine = self
                .engine
                .get_or_insert_with(|| OrderingEngine::capture(&self.groups));
            let order = group.order;
            let source_info = group.source_info.clone();
            let injection = engine.inject(&mut self.groups, group, &order);
            let len = engine.anchor_len();
            ctx.report_injection(&injection, &order, len, source_info.as_ref());
        }
    }

    /// Merge override groups into every group of this tab with the same
    /// label. Non-override groups are ignored.
    pub fn inject_groups_override(&mut self, groups: &[Group], ctx: &mut MergeContext) {
        for group in groups.iter().filter(|g| g.is_override) {
            let mut matched = false;
            self.groups.for_each_mut(|existing| {
                if existing.matches(group) {
                    existing.inject_override(group, ctx);
                    matched = true;
                }
            });

            if !matched {
                ctx.report(&RibbonError::UnmatchedOverride {
                    kind: "group",
                    label: group.label.to_string(),
                    container: Some(self.label.to_string()),
                    source_info: group.source_info.clone(),
                });
            }
        }
    }
}

impl Keyed for Tab {
    fn match_key(&self) -> MatchKey<'_> {
        MatchKey::Label(&self.label)
    }
}

impl PartialEq for Tab {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
            && self.contextual_control_id == other.contextual_control_id
            && self.contextual_color == other.contextual_color
            && self.contextual_group_id == other.contextual_group_id
            && self.contextual_label == other.contextual_label
            && self.order == other.order
            && self.order_before == other.order_before
            && self.is_override == other.is_override
            && self.groups == other.groups
    }
}
