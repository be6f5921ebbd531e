//! Utility functions for working with source positions

use crate::types::{Location, Range};

/// Line and column of a byte offset.
///
/// Returns None if the offset is past the end of `source` or falls inside a
/// multi-byte character.
pub fn offset_to_location(source: &str, offset: usize) -> Option<Location> {
    let before = source.get(..offset)?;
    let line_start = before.rfind('\n').map_or(0, |newline| newline + 1);
    Some(Location {
        offset,
        row: before.matches('\n').count(),
        column: before[line_start..].chars().count(),
    })
}

/// Create a Range from start and end byte offsets
///
/// Row and column are left at zero.
pub fn range_from_offsets(start: usize, end: usize) -> Range {
    Range {
        start: Location {
            offset: start,
            row: 0,
            column: 0,
        },
        end: Location {
            offset: end,
            row: 0,
            column: 0,
        },
    }
}
