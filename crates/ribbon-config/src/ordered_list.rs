//! Arena-backed doubly linked list with stable node handles.
//!
//! Each element lives in an arena slot that never moves, so a [`NodeId`]
//! handed out once stays valid for the lifetime of the list.

use serde::{Serialize, Serializer};
use std::fmt;

/// Stable handle to an element of an [`OrderedList`].
///
/// Only meaningful for the list that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Clone)]
struct Node<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

/// An ordered sequence supporting O(1) insertion next to any known node.
///
/// Nodes are never removed, so the arena has no holes.
#[derive(Clone)]
pub struct OrderedList<T> {
    nodes: Vec<Node<T>>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<T> Default for OrderedList<T> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            head: None,
            tail: None,
        }
    }
}

impl<T> OrderedList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(id.0).map(|n| &n.value)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(id.0).map(|n| &mut n.value)
    }

    pub fn push_back(&mut self, value: T) -> NodeId {
        let id = self.alloc(value, self.tail, None);
        match self.tail {
            Some(tail) => self.nodes[tail].next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        NodeId(id)
    }

    pub fn push_front(&mut self, value: T) -> NodeId {
        let id = self.alloc(value, None, self.head);
        match self.head {
            Some(head) => self.nodes[head].prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        NodeId(id)
    }

    /// Insert `value` immediately before `anchor`.
    pub fn insert_before(&mut self, anchor: NodeId, value: T) -> NodeId {
        let prev = self.nodes[anchor.0].prev;
        let id = self.alloc(value, prev, Some(anchor.0));
        self.nodes[anchor.0].prev = Some(id);
        match prev {
            Some(prev) => self.nodes[prev].next = Some(id),
            None => self.head = Some(id),
        }
        NodeId(id)
    }

    /// Insert `value` immediately after `anchor`.
    pub fn insert_after(&mut self, anchor: NodeId, value: T) -> NodeId {
        let next = self.nodes[anchor.0].next;
        let id = self.alloc(value, Some(anchor.0), next);
        self.nodes[anchor.0].next = Some(id);
        match next {
            Some(next) => self.nodes[next].prev = Some(id),
            None => self.tail = Some(id),
        }
        NodeId(id)
    }

    /// Node handles in list order.
    pub fn ids(&self) -> Ids<'_, T> {
        Ids {
            list: self,
            cursor: self.head,
        }
    }

    /// Values in list order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { ids: self.ids() }
    }

    pub fn first(&self) -> Option<&T> {
        self.head.map(|h| &self.nodes[h].value)
    }

    pub fn last(&self) -> Option<&T> {
        self.tail.map(|t| &self.nodes[t].value)
    }

    /// Apply `f` to every value, in list order.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut T)) {
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            f(&mut self.nodes[idx].value);
            cursor = self.nodes[idx].next;
        }
    }

    /// Consume the list into a `Vec` in list order.
    pub fn into_vec(self) -> Vec<T> {
        let order: Vec<usize> = self.ids().map(|id| id.0).collect();
        let mut slots: Vec<Option<T>> = self.nodes.into_iter().map(|n| Some(n.value)).collect();
        order
            .into_iter()
            .filter_map(|idx| slots[idx].take())
            .collect()
    }

    fn alloc(&mut self, value: T, prev: Option<usize>, next: Option<usize>) -> usize {
        self.nodes.push(Node { value, prev, next });
        self.nodes.len() - 1
    }
}

impl<T: Clone> OrderedList<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T> FromIterator<T> for OrderedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = OrderedList::new();
        for value in iter {
            list.push_back(value);
        }
        list
    }
}

impl<T> From<Vec<T>> for OrderedList<T> {
    fn from(values: Vec<T>) -> Self {
        values.into_iter().collect()
    }
}

impl<'a, T> IntoIterator for &'a OrderedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: PartialEq> PartialEq for OrderedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: fmt::Debug> fmt::Debug for OrderedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Serialize> Serialize for OrderedList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Iterator over node handles in list order.
pub struct Ids<'a, T> {
    list: &'a OrderedList<T>,
    cursor: Option<usize>,
}

impl<T> Iterator for Ids<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let idx = self.cursor?;
        self.cursor = self.list.nodes[idx].next;
        Some(NodeId(idx))
    }
}

/// Iterator over values in list order.
pub struct Iter<'a, T> {
    ids: Ids<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let id = self.ids.next()?;
        Some(&self.ids.list.nodes[id.0].value)
    }
}
