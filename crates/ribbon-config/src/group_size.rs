//! One size variant of a group.

use crate::element::Element;
use crate::injection::{Injection, OrderingEngine};
use crate::order::OrderDirective;
use crate::ordered_list::OrderedList;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;

/// Ordered elements rendered for one density (large, medium or small).
///
/// Injections go through an ordering engine that captures the elements
/// present at the first injection and is reused afterwards.
#[derive(Debug, Clone, Default)]
pub struct GroupSize {
    elements: OrderedList<Element>,
    engine: Option<OrderingEngine>,
}

impl GroupSize {
    pub fn new(elements: Vec<Element>) -> Self {
        Self {
            elements: elements.into(),
            engine: None,
        }
    }

    /// The live backing list.
    pub fn list(&self) -> &OrderedList<Element> {
        &self.elements
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn to_vec(&self) -> Vec<Element> {
        self.elements.to_vec()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Ids of every control reachable in this variant.
    pub fn control_ids(&self) -> BTreeSet<&str> {
        let mut ids = BTreeSet::new();
        for element in &self.elements {
            element.collect_control_ids(&mut ids);
        }
        ids
    }

    pub fn has_controls(&self) -> bool {
        self.elements.iter().any(|e| !e.control_ids().is_empty())
    }

    /// Total columns of the variant.
    pub fn columns(&self) -> u32 {
        self.elements.iter().map(Element::columns).sum()
    }

    /// Insert `element` at `directive` relative to the elements present at
    /// the first injection.
    pub fn inject(&mut self, element: Element, directive: &OrderDirective) -> Injection {
        let engine = self
            .engine
            .get_or_insert_with(|| OrderingEngine::capture(&self.elements));
        engine.inject(&mut self.elements, element, directive)
    }

    /// Number of elements the ordering engine anchors on.
    pub(crate) fn anchor_count(&self) -> usize {
        match &self.engine {
            Some(engine) => engine.anchor_len(),
            None => self.elements.len(),
        }
    }
}

impl PartialEq for GroupSize {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl Serialize for GroupSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.elements.serialize(serializer)
    }
}
