//! Conversion of fragment trees into typed ribbon entities.
//!
//! Attribute errors are fatal for the fragment being converted. Tags that do
//! not belong where they appear are skipped with a warning.

use crate::context::MergeContext;
use crate::element::{ControlRef, ControlSize, Element, Layout, LayoutAlign, Toolbar};
use crate::error::{Result, RibbonError};
use crate::extension::{ExtensionKind, GeneratedExtension, generate_id};
use crate::fragment::FragmentNode;
use crate::group::Group;
use crate::group_size::GroupSize;
use crate::label::Label;
use crate::order::OrderDirective;
use crate::tab::{Tab, TabOrder};

const SIZE_TAGS: [&str; 3] = ["large", "medium", "small"];

fn missing(node: &FragmentNode, attribute: &str) -> RibbonError {
    RibbonError::MissingAttribute {
        tag: node.tag.clone(),
        attribute: attribute.to_string(),
        source_info: node.source_info.clone(),
    }
}

fn invalid(node: &FragmentNode, attribute: &str, value: &str, expected: &'static str) -> RibbonError {
    RibbonError::InvalidAttribute {
        tag: node.tag.clone(),
        attribute: attribute.to_string(),
        value: value.to_string(),
        expected,
        source_info: node.attr_source(attribute).cloned(),
    }
}

fn required<'a>(node: &'a FragmentNode, attribute: &str) -> Result<&'a str> {
    node.attr(attribute).ok_or_else(|| missing(node, attribute))
}

fn bool_attr(node: &FragmentNode, attribute: &str, default: bool) -> Result<bool> {
    match node.attr(attribute) {
        None => Ok(default),
        Some(v) if v.trim().eq_ignore_ascii_case("true") => Ok(true),
        Some(v) if v.trim().eq_ignore_ascii_case("false") => Ok(false),
        Some(v) => Err(invalid(node, attribute, v, "`true` or `false`")),
    }
}

fn u32_attr(node: &FragmentNode, attribute: &str, default: u32) -> Result<u32> {
    match node.attr(attribute) {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse::<u32>()
            .map_err(|_| invalid(node, attribute, v, "a non-negative integer")),
    }
}

fn i32_attr(node: &FragmentNode, attribute: &str, default: i32) -> Result<i32> {
    match node.attr(attribute) {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse::<i32>()
            .map_err(|_| invalid(node, attribute, v, "an integer")),
    }
}

fn order_attr(node: &FragmentNode, attribute: &str) -> Result<OrderDirective> {
    match node.attr(attribute) {
        None => Ok(OrderDirective::APPEND),
        Some(v) => OrderDirective::parse(v, node.attr_source(attribute)),
    }
}

fn optional(node: &FragmentNode, attribute: &str) -> Option<String> {
    node.attr(attribute)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Build a label from `attribute`, honoring the `catalogue` and `i18n`
/// attributes of the node.
fn label_attr(node: &FragmentNode, attribute: &str, ctx: &MergeContext) -> Result<Label> {
    let key = required(node, attribute)?;
    labelled(node, key, ctx)
}

fn labelled(node: &FragmentNode, key: &str, ctx: &MergeContext) -> Result<Label> {
    if !bool_attr(node, "i18n", true)? {
        return Ok(Label::plain(key));
    }
    let catalogue = node
        .attr("catalogue")
        .unwrap_or(ctx.options().default_catalogue.as_str());
    Ok(Label::new(catalogue, key))
}

fn plugin(ctx: &MergeContext) -> String {
    ctx.origin().map(|o| o.plugin.clone()).unwrap_or_default()
}

fn unknown(ctx: &mut MergeContext, node: &FragmentNode, context: &str) {
    ctx.report(&RibbonError::UnknownTag {
        tag: node.tag.clone(),
        context: context.to_string(),
        source_info: node.source_info.clone(),
    });
}

/// Read a `<control>` reference.
///
/// A control with a `ref-id` attribute or child elements defines the control
/// in place. It is recorded as a generated extension under its `id`, or a
/// fresh one.
pub fn control_ref(node: &FragmentNode, ctx: &mut MergeContext) -> Result<ControlRef> {
    let colspan = u32_attr(node, "colspan", 1)?;

    let id = if node.has_attr("ref-id") || !node.children.is_empty() {
        let id = optional(node, "id").unwrap_or_else(generate_id);
        let plugin = plugin(ctx);
        ctx.record_extension(GeneratedExtension {
            id: id.clone(),
            kind: ExtensionKind::Control,
            plugin,
            definition: node.clone(),
        });
        id
    } else {
        required(node, "id")?.to_string()
    };

    Ok(ControlRef { id, colspan })
}

fn toolbar(node: &FragmentNode, ctx: &mut MergeContext) -> Result<Toolbar> {
    let colspan = u32_attr(node, "colspan", 1)?;
    let mut children = Vec::new();
    for child in &node.children {
        match child.tag.as_str() {
            "control" => children.push(control_ref(child, ctx)?),
            _ => unknown(ctx, child, "<toolbar>"),
        }
    }
    Ok(Toolbar { colspan, children })
}

fn layout(node: &FragmentNode, ctx: &mut MergeContext) -> Result<Layout> {
    let cols = u32_attr(node, "cols", 1)?;
    let size = node
        .attr("size")
        .map(|v| ControlSize::parse(v, node.attr_source("size")))
        .transpose()?;
    let align = node
        .attr("align")
        .map(|v| LayoutAlign::parse(v, node.attr_source("align")))
        .transpose()?;

    let mut children = Vec::new();
    for child in &node.children {
        match child.tag.as_str() {
            "control" => children.push(Element::Control(control_ref(child, ctx)?)),
            "toolbar" => children.push(Element::Toolbar(toolbar(child, ctx)?)),
            _ => unknown(ctx, child, "<layout>"),
        }
    }

    Ok(Layout {
        cols,
        size,
        align,
        children,
    })
}

/// Read the elements of one size variant.
///
/// With `skip_sizes`, nested `<large>`, `<medium>` and `<small>` children are
/// ignored; this is the case when the group element itself is the variant.
pub fn group_size(node: &FragmentNode, skip_sizes: bool, ctx: &mut MergeContext) -> Result<GroupSize> {
    let context = format!("<{}>", node.tag);
    let mut elements = Vec::new();
    for child in &node.children {
        match child.tag.as_str() {
            "control" => elements.push(Element::Control(control_ref(child, ctx)?)),
            "layout" => elements.push(Element::Layout(layout(child, ctx)?)),
            "toolbar" => elements.push(Element::Toolbar(toolbar(child, ctx)?)),
            "separator" => elements.push(Element::Separator),
            tag if skip_sizes && SIZE_TAGS.contains(&tag) => {}
            _ => unknown(ctx, child, &context),
        }
    }
    Ok(GroupSize::new(elements))
}

/// Read the elements of an `<app-menu>` or `<user-menu>`.
pub fn menu_elements(node: &FragmentNode, ctx: &mut MergeContext) -> Result<Vec<Element>> {
    let context = format!("<{}>", node.tag);
    let mut elements = Vec::new();
    for child in &node.children {
        match child.tag.as_str() {
            "control" => elements.push(Element::Control(control_ref(child, ctx)?)),
            "separator" => elements.push(Element::Separator),
            _ => unknown(ctx, child, &context),
        }
    }
    Ok(elements)
}

/// Order directive of a menu contribution, if it has one.
pub fn menu_order(node: &FragmentNode) -> Result<Option<OrderDirective>> {
    if node.has_attr("order") {
        order_attr(node, "order").map(Some)
    } else {
        Ok(None)
    }
}

/// Read a `<group>` and check that its size variants agree.
pub fn group(node: &FragmentNode, ctx: &mut MergeContext) -> Result<Group> {
    let mut group = Group::new(label_attr(node, "label", ctx)?);
    group.icon = optional(node, "icon");
    group.priority = i32_attr(node, "priority", 0)?;
    group.dialog_box_launcher = optional(node, "dialog-box-launcher");
    group.is_override = bool_attr(node, "override", false)?;
    group.order = order_attr(node, "order")?;
    group.controls_order = order_attr(node, "controlsOrder")?;
    group.source_info = node.source_info.clone();

    let medium = node.child("medium").filter(|m| !m.children.is_empty());
    match medium {
        Some(medium) => {
            group.large = node
                .child("large")
                .map(|large| group_size(large, false, ctx))
                .transpose()?;
            group.medium = Some(group_size(medium, false, ctx)?);
        }
        None => {
            group.large = Some(match node.child("large") {
                Some(large) => group_size(large, false, ctx)?,
                None => group_size(node, true, ctx)?,
            });
            group.medium = None;
        }
    }
    group.small = node
        .child("small")
        .map(|small| group_size(small, false, ctx))
        .transpose()?;

    group.check_size_consistency()?;
    Ok(group)
}

fn tab_order(node: &FragmentNode) -> TabOrder {
    match node.attr("order").map(str::trim) {
        None | Some("") => TabOrder::Unspecified,
        Some(v) => match v.parse::<i32>() {
            Ok(position) => TabOrder::Position(position),
            Err(_) => TabOrder::Label(v.to_string()),
        },
    }
}

/// Read a `<tab>` and the groups declared under its `<groups>` child, in
/// document order.
///
/// A tab with a `ref-id` attribute or a `<tab-control>` child defines its
/// contextual control in place.
pub fn tab(node: &FragmentNode, ctx: &mut MergeContext) -> Result<(Tab, Vec<Group>)> {
    let mut tab = Tab::new(label_attr(node, "label", ctx)?);
    tab.is_override = bool_attr(node, "override", false)?;
    tab.order = tab_order(node);
    tab.order_before = bool_attr(node, "order-before", false)?;
    tab.source_info = node.source_info.clone();

    tab.contextual_control_id = optional(node, "controlId");
    tab.contextual_color = optional(node, "contextualColor");
    tab.contextual_group_id = optional(node, "contextualGroup");
    tab.contextual_label = match node.attr("contextualLabel") {
        Some(key) => Some(labelled(node, key, ctx)?),
        None => None,
    };

    if node.has_attr("ref-id") || node.child("tab-control").is_some() {
        let id = tab
            .contextual_control_id
            .get_or_insert_with(generate_id)
            .clone();
        let definition = node
            .child("tab-control")
            .cloned()
            .unwrap_or_else(|| {
                let mut definition = FragmentNode::new("tab-control");
                definition.source_info = node.source_info.clone();
                match node.attr("ref-id") {
                    Some(ref_id) => definition.with_attr("ref-id", ref_id),
                    None => definition,
                }
            });
        let plugin = plugin(ctx);
        ctx.record_extension(GeneratedExtension {
            id,
            kind: ExtensionKind::Tab,
            plugin,
            definition,
        });
    }

    let mut groups = Vec::new();
    if let Some(container) = node.child("groups") {
        for child in &container.children {
            match child.tag.as_str() {
                "group" => groups.push(group(child, ctx)?),
                _ => unknown(ctx, child, "<groups>"),
            }
        }
    }
    for child in &node.children {
        if !matches!(child.tag.as_str(), "groups" | "tab-control") {
            unknown(ctx, child, "<tab>");
        }
    }

    tracing::debug!(tab = %tab.label, groups = groups.len(), "read tab");
    Ok((tab, groups))
}
