//! Injection of foreign elements into an existing ordered sequence.
//!
//! The engine captures the sequence once. Every original element becomes an
//! anchor slot, and each slot keeps the elements injected before and after
//! it so later injections at the same place can be tie-broken by their
//! secondary order.

use crate::order::OrderDirective;
use crate::ordered_list::{NodeId, OrderedList};

/// Where an injected element ended up, relative to the captured anchors.
///
/// Anchor positions are 1-based, as in directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before(usize),
    After(usize),
    /// Positive directive past the end: placed after the last anchor.
    FallbackEnd,
    /// Non-positive directive before the start: placed before the first anchor.
    FallbackStart,
}

impl Placement {
    pub fn is_out_of_bound(&self) -> bool {
        matches!(self, Placement::FallbackEnd | Placement::FallbackStart)
    }
}

/// Result of one injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Injection {
    pub node: NodeId,
    pub placement: Placement,
}

#[derive(Debug, Clone, Copy)]
struct Injected {
    node: NodeId,
    secondary: Option<u32>,
}

#[derive(Debug, Clone, Default)]
struct AnchorSlot {
    /// `None` for the virtual slot standing for an empty sequence.
    anchor: Option<NodeId>,
    before: Vec<Injected>,
    after: Vec<Injected>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Before,
    After,
}

/// Positions foreign elements in a sequence according to order directives.
///
/// ```
/// use ribbon_config::{OrderDirective, OrderedList, OrderingEngine};
///
/// let mut list: OrderedList<&str> = vec!["A", "B", "C"].into();
/// let mut engine = OrderingEngine::capture(&list);
/// engine.inject(&mut list, "X", &"2.5".parse().unwrap());
/// engine.inject(&mut list, "Y", &"2.1".parse().unwrap());
/// assert_eq!(list.to_vec(), vec!["A", "Y", "X", "B", "C"]);
/// ```
#[derive(Debug, Clone)]
pub struct OrderingEngine {
    slots: Vec<AnchorSlot>,
}

impl OrderingEngine {
    /// Capture the current elements of `list` as anchors.
    ///
    /// The engine must only be used with the list it captured.
    pub fn capture<T>(list: &OrderedList<T>) -> Self {
        let mut slots: Vec<AnchorSlot> = list
            .ids()
            .map(|id| AnchorSlot {
                anchor: Some(id),
                ..AnchorSlot::default()
            })
            .collect();
        if slots.is_empty() {
            slots.push(AnchorSlot::default());
        }
        Self { slots }
    }

    /// Number of original elements captured as anchors.
    pub fn anchor_len(&self) -> usize {
        self.slots.iter().filter(|s| s.anchor.is_some()).count()
    }

    /// Insert `value` into `list` at the place described by `directive`.
    pub fn inject<T>(
        &mut self,
        list: &mut OrderedList<T>,
        value: T,
        directive: &OrderDirective,
    ) -> Injection {
        let size = self.anchor_len();
        let primary = directive.primary;

        // an empty capture keeps only the virtual slot, so every directive
        // falls back and lands at one end of the list
        let (slot, side, secondary, placement) = if primary > 0 {
            let position = primary as usize;
            if position > size {
                (size.max(1), Side::After, None, Placement::FallbackEnd)
            } else {
                (position, Side::Before, directive.secondary, Placement::Before(position))
            }
        } else {
            let relative = size as i64 + i64::from(primary);
            if relative < 1 {
                (1, Side::Before, Some(0), Placement::FallbackStart)
            } else {
                let position = relative as usize;
                (position, Side::After, directive.secondary, Placement::After(position))
            }
        };

        let node = self.slots[slot - 1].inject(list, value, side, secondary);

        tracing::debug!(
            directive = %directive,
            slot,
            ?placement,
            "injected element"
        );

        Injection { node, placement }
    }
}

impl AnchorSlot {
    fn inject<T>(
        &mut self,
        list: &mut OrderedList<T>,
        value: T,
        side: Side,
        secondary: Option<u32>,
    ) -> NodeId {
        let anchor = self.anchor;
        let injected = match side {
            Side::Before => &mut self.before,
            Side::After => &mut self.after,
        };

        if injected.is_empty() {
            let node = match (side, anchor) {
                (Side::Before, Some(anchor)) => list.insert_before(anchor, value),
                (Side::After, Some(anchor)) => list.insert_after(anchor, value),
                (Side::Before, None) => list.push_front(value),
                (Side::After, None) => list.push_back(value),
            };
            injected.push(Injected { node, secondary });
            return node;
        }

        let Some(secondary) = secondary else {
            // no secondary order: after everything already on this side
            let last = injected[injected.len() - 1].node;
            let node = list.insert_after(last, value);
            injected.push(Injected { node, secondary: None });
            return node;
        };

        // leading run of ordered elements whose order is <= secondary
        let run = injected
            .iter()
            .take_while(|i| i.secondary.is_some_and(|s| s <= secondary))
            .count();

        let node = if run == 0 {
            list.insert_before(injected[0].node, value)
        } else {
            list.insert_after(injected[run - 1].node, value)
        };
        injected.insert(
            run,
            Injected {
                node,
                secondary: Some(secondary),
            },
        );
        node
    }
}
