//! The application and user menus.

use crate::context::MergeContext;
use crate::element::Element;
use crate::injection::OrderingEngine;
use crate::order::OrderDirective;
use crate::ordered_list::OrderedList;
use ribbon_source_map::SourceInfo;
use serde::{Serialize, Serializer};

/// A flat list of controls and separators.
///
/// Menus have no override semantics: contributions are appended, or
/// injected when they carry an order.
#[derive(Debug, Clone, Default)]
pub struct Menu {
    elements: OrderedList<Element>,
    engine: Option<OrderingEngine>,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &OrderedList<Element> {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Add contributed elements.
    ///
    /// Without a directive the elements are appended. With one, they are
    /// injected relative to the menu as it was at the first ordered
    /// contribution.
    pub fn add_elements(
        &mut self,
        elements: Vec<Element>,
        directive: Option<&OrderDirective>,
        source_info: Option<&SourceInfo>,
        ctx: &mut MergeContext,
    ) {
        let Some(directive) = directive else {
            for element in elements {
                self.elements.push_back(element);
            }
            return;
        };

        let engine = self
            .engine
            .get_or_insert_with(|| OrderingEngine::capture(&self.elements));
        let mut reported = false;
        for element in elements {
            let injection = engine.inject(&mut self.elements, element, directive);
            if !reported && injection.placement.is_out_of_bound() {
                ctx.report_injection(&injection, directive, engine.anchor_len(), source_info);
                reported = true;
            }
        }
    }
}

impl PartialEq for Menu {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl Serialize for Menu {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.elements.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(menu: &Menu) -> Vec<String> {
        menu.elements()
            .iter()
            .map(|e| match e {
                Element::Control(c) => c.id.clone(),
                other => other.tag().to_string(),
            })
            .collect()
    }

    #[test]
    fn test_append_then_inject() {
        let mut ctx = MergeContext::default();
        let mut menu = Menu::new();
        menu.add_elements(
            vec![Element::control("new"), Element::control("open"), Element::control("quit")],
            None,
            None,
            &mut ctx,
        );
        menu.add_elements(
            vec![Element::Separator, Element::control("save")],
            Some(&"-1".parse().unwrap()),
            None,
            &mut ctx,
        );
        // appended after the engine captured: not an anchor
        menu.add_elements(vec![Element::control("about")], None, None, &mut ctx);
        menu.add_elements(
            vec![Element::control("print")],
            Some(&"3".parse().unwrap()),
            None,
            &mut ctx,
        );

        assert_eq!(
            ids(&menu),
            vec!["new", "open", "separator", "save", "print", "quit", "about"]
        );
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn test_inject_into_empty_menu() {
        let mut ctx = MergeContext::default();
        let mut menu = Menu::new();
        menu.add_elements(
            vec![Element::control("a")],
            Some(&"0".parse().unwrap()),
            None,
            &mut ctx,
        );
        menu.add_elements(
            vec![Element::control("b")],
            Some(&"1".parse().unwrap()),
            None,
            &mut ctx,
        );
        assert_eq!(ids(&menu), vec!["a", "b"]);
        let codes: Vec<_> = ctx.diagnostics().iter().map(|d| d.code.as_deref()).collect();
        assert_eq!(codes, vec![Some("R-1-2"), Some("R-1-2")]);
    }
}
