//! Output documents for a resolved ribbon.

use crate::element::Element;
use crate::group::SizeKind;
use crate::label::Label;
use crate::resolve::{ResolvedGroup, ResolvedRibbon, ResolvedTab};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use std::io::{self, Write};

/// Namespace of the `i18n:attr` attribute.
pub const I18N_NAMESPACE: &str = "http://apache.org/cocoon/i18n/2.1";

/// Render `ribbon` as an indented XML document.
///
/// Labels are written as `catalogue:key` and listed in `i18n:attr` so the
/// client translates them.
///
/// # Errors
///
/// Returns an error if the underlying writer fails.
pub fn write_xml(ribbon: &ResolvedRibbon) -> Result<String, ribbon_xml::Error> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    let mut root = BytesStart::new("ribbon");
    root.push_attribute(("xmlns:i18n", I18N_NAMESPACE));
    writer.write_event(Event::Start(root))?;

    write_container(&mut writer, BytesStart::new("app-menu"), &ribbon.app_menu)?;
    write_container(&mut writer, BytesStart::new("user-menu"), &ribbon.user_menu)?;

    writer.write_event(Event::Start(BytesStart::new("tabs")))?;
    for tab in &ribbon.tabs {
        write_tab(&mut writer, tab)?;
    }
    writer.write_event(Event::End(BytesEnd::new("tabs")))?;

    writer.write_event(Event::End(BytesEnd::new("ribbon")))?;
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

/// Render `ribbon` as pretty-printed JSON.
pub fn to_json(ribbon: &ResolvedRibbon) -> serde_json::Result<String> {
    serde_json::to_string_pretty(ribbon)
}

fn i18n_attr(translated: &[(&str, &Label)]) -> Option<String> {
    let names: Vec<&str> = translated
        .iter()
        .filter(|(_, label)| label.i18n)
        .map(|(name, _)| *name)
        .collect();
    (!names.is_empty()).then(|| names.join(" "))
}

fn write_tab<W: Write>(writer: &mut Writer<W>, tab: &ResolvedTab) -> io::Result<()> {
    let label = tab.label.to_attribute();
    let mut start = BytesStart::new("tab");
    start.push_attribute(("label", label.as_str()));
    let mut translated = vec![("label", &tab.label)];

    // contextual attributes only mean something on a contextual tab
    if let Some(id) = &tab.contextual_control_id {
        start.push_attribute(("id", id.as_str()));
        if let Some(color) = &tab.contextual_color {
            start.push_attribute(("contextualColor", color.as_str()));
        }
        if let Some(group) = &tab.contextual_group_id {
            start.push_attribute(("contextualGroup", group.as_str()));
        }
        if let Some(contextual_label) = &tab.contextual_label {
            let value = contextual_label.to_attribute();
            start.push_attribute(("contextualLabel", value.as_str()));
            translated.push(("contextualLabel", contextual_label));
        }
    }
    if let Some(attr) = i18n_attr(&translated) {
        start.push_attribute(("i18n:attr", attr.as_str()));
    }

    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Start(BytesStart::new("groups")))?;
    for group in &tab.groups {
        write_group(writer, group)?;
    }
    writer.write_event(Event::End(BytesEnd::new("groups")))?;
    writer.write_event(Event::End(BytesEnd::new("tab")))?;
    Ok(())
}

fn write_group<W: Write>(writer: &mut Writer<W>, group: &ResolvedGroup) -> io::Result<()> {
    let mut start = BytesStart::new("group");
    if let Some(icon) = &group.icon {
        start.push_attribute(("icon", icon.as_str()));
    }
    let priority = group.priority.to_string();
    start.push_attribute(("priority", priority.as_str()));
    let label = group.label.to_attribute();
    start.push_attribute(("label", label.as_str()));
    if let Some(launcher) = &group.dialog_box_launcher {
        start.push_attribute(("dialog-box-launcher", launcher.as_str()));
    }
    if let Some(attr) = i18n_attr(&[("label", &group.label)]) {
        start.push_attribute(("i18n:attr", attr.as_str()));
    }

    writer.write_event(Event::Start(start))?;
    for kind in SizeKind::ALL {
        let elements = group.size(kind);
        let colspan: u32 = elements.iter().map(Element::columns).sum();
        let colspan = colspan.to_string();
        let mut size = BytesStart::new(kind.as_str());
        size.push_attribute(("colspan", colspan.as_str()));
        write_container(writer, size, elements)?;
    }
    writer.write_event(Event::End(BytesEnd::new("group")))?;
    Ok(())
}

/// Write `start` holding `children`, as an empty element when there are none.
fn write_container<W: Write>(
    writer: &mut Writer<W>,
    start: BytesStart<'_>,
    children: &[Element],
) -> io::Result<()> {
    if children.is_empty() {
        return writer.write_event(Event::Empty(start));
    }
    let end = start.to_end().into_owned();
    writer.write_event(Event::Start(start))?;
    for child in children {
        write_element(writer, child)?;
    }
    writer.write_event(Event::End(end))
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> io::Result<()> {
    match element {
        Element::Control(control) => {
            let colspan = control.colspan.to_string();
            let mut start = BytesStart::new("control");
            start.push_attribute(("id", control.id.as_str()));
            start.push_attribute(("colspan", colspan.as_str()));
            writer.write_event(Event::Empty(start))
        }
        Element::Separator => writer.write_event(Event::Empty(BytesStart::new("separator"))),
        Element::Layout(layout) => {
            let mut start = BytesStart::new("layout");
            if let Some(align) = layout.align {
                start.push_attribute(("align", align.as_str()));
            }
            if let Some(size) = layout.size {
                start.push_attribute(("size", size.as_str()));
            }
            let cols = layout.cols.to_string();
            start.push_attribute(("cols", cols.as_str()));
            write_container(writer, start, &layout.children)
        }
        Element::Toolbar(toolbar) => {
            let colspan = toolbar.colspan.to_string();
            let mut start = BytesStart::new("toolbar");
            start.push_attribute(("colspan", colspan.as_str()));
            let children: Vec<Element> = toolbar.children.iter().cloned().map(Element::Control).collect();
            write_container(writer, start, &children)
        }
    }
}
