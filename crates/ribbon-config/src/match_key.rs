//! Identity used to match an override against existing entities.

use crate::label::Label;

/// What two entities compare on when an override looks for its target.
///
/// Only labels exist today. A stable id variant can be added here without
/// touching the ordering code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKey<'a> {
    Label(&'a Label),
}

/// Entities that can be the target of an override.
pub trait Keyed {
    fn match_key(&self) -> MatchKey<'_>;

    fn matches<K: Keyed + ?Sized>(&self, other: &K) -> bool {
        self.match_key() == other.match_key()
    }
}
