//! Source information with substring tracking

use crate::context::SourceContext;
use crate::types::{FileId, Location, Range};
use crate::utils::{offset_to_location, range_from_offsets};
use serde::{Deserialize, Serialize};

/// Source information tracking a location and how it maps to a file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// The range in the immediate/current text
    pub range: Range,
    /// How this range maps to its source
    pub mapping: SourceMapping,
}

/// Describes how source content relates to the file it was read from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SourceMapping {
    /// Direct position in an original file
    Original { file_id: FileId },
    /// Substring extraction from a parent source
    Substring {
        parent: Box<SourceInfo>,
        offset: usize,
    },
}

/// Result of mapping a position back to an original file
#[derive(Debug, Clone, PartialEq)]
pub struct MappedLocation {
    /// The original file
    pub file_id: FileId,
    /// Location in the original file
    pub location: Location,
}

impl Default for SourceInfo {
    fn default() -> Self {
        SourceInfo::original(FileId(0), Range::default())
    }
}

impl SourceInfo {
    /// Create source info for a position in an original file
    pub fn original(file_id: FileId, range: Range) -> Self {
        SourceInfo {
            range,
            mapping: SourceMapping::Original { file_id },
        }
    }

    /// Create source info for a byte range in an original file.
    ///
    /// Row and column are left at zero; use [`SourceInfo::map_offset`] with a
    /// [`SourceContext`] to recover them.
    pub fn from_offsets(file_id: FileId, start: usize, end: usize) -> Self {
        SourceInfo::original(file_id, range_from_offsets(start, end))
    }

    /// Create source info for a substring extraction
    pub fn substring(parent: SourceInfo, start: usize, end: usize) -> Self {
        SourceInfo {
            range: range_from_offsets(0, end - start),
            mapping: SourceMapping::Substring {
                parent: Box::new(parent),
                offset: start,
            },
        }
    }

    /// Start offset in the immediate text
    pub fn start_offset(&self) -> usize {
        self.range.start.offset
    }

    /// End offset in the immediate text
    pub fn end_offset(&self) -> usize {
        self.range.end.offset
    }

    /// The file this location ultimately belongs to.
    pub fn file_id(&self) -> FileId {
        match &self.mapping {
            SourceMapping::Original { file_id } => *file_id,
            SourceMapping::Substring { parent, .. } => parent.file_id(),
        }
    }

    /// Map an offset in the current text back to the original file
    pub fn map_offset(&self, offset: usize, ctx: &SourceContext) -> Option<MappedLocation> {
        match &self.mapping {
            SourceMapping::Original { file_id } => {
                let file = ctx.get_file(*file_id)?;
                let content = file.content.as_deref()?;
                let location = offset_to_location(content, self.range.start.offset + offset)?;
                Some(MappedLocation {
                    file_id: *file_id,
                    location,
                })
            }
            SourceMapping::Substring {
                parent,
                offset: parent_offset,
            } => parent.map_offset(parent_offset + offset, ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_offsets() {
        let info = SourceInfo::from_offsets(FileId(1), 4, 9);
        assert_eq!(info.start_offset(), 4);
        assert_eq!(info.end_offset(), 9);
        assert_eq!(info.file_id(), FileId(1));
    }

    #[test]
    fn test_map_offset_original() {
        let mut ctx = SourceContext::new();
        let file_id = ctx.add_file("test.xml".to_string(), Some("<a>\n<b/>\n</a>".to_string()));

        let info = SourceInfo::from_offsets(file_id, 0, 13);
        let mapped = info.map_offset(4, &ctx).unwrap();
        assert_eq!(mapped.file_id, file_id);
        assert_eq!(mapped.location.offset, 4);
        assert_eq!(mapped.location.row, 1);
        assert_eq!(mapped.location.column, 0);
    }

    #[test]
    fn test_map_offset_substring() {
        let mut ctx = SourceContext::new();
        let file_id = ctx.add_file("test.xml".to_string(), Some("abc\ndef".to_string()));

        let parent = SourceInfo::from_offsets(file_id, 0, 7);
        let sub = SourceInfo::substring(parent, 4, 7);
        assert_eq!(sub.file_id(), file_id);

        let mapped = sub.map_offset(1, &ctx).unwrap();
        assert_eq!(mapped.location.offset, 5);
        assert_eq!(mapped.location.row, 1);
        assert_eq!(mapped.location.column, 1);
    }

    #[test]
    fn test_map_offset_unknown_file() {
        let ctx = SourceContext::new();
        let info = SourceInfo::from_offsets(FileId(3), 0, 1);
        assert!(info.map_offset(0, &ctx).is_none());
    }
}
