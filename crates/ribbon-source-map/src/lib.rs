//! Source mapping for ribbon configuration fragments
//!
//! Every fragment contributed by a plugin remembers where it came from so that
//! merge errors can point back at the offending XML. This crate provides the
//! location types used by the parser, the merge engine and the diagnostics.
//!
//! # Overview
//!
//! The core types are:
//! - [`SourceInfo`]: A range together with how it maps back to a file
//! - [`SourceContext`]: Registry of the files that fragments were read from
//!
//! # Example
//!
//! ```rust
//! use ribbon_source_map::*;
//!
//! let mut ctx = SourceContext::new();
//! let file_id = ctx.add_file("core-ui/ribbon.xml".into(), Some("<ribbon>\n</ribbon>".into()));
//!
//! let info = SourceInfo::from_offsets(file_id, 9, 18);
//! let mapped = info.map_offset(0, &ctx).unwrap();
//! assert_eq!(mapped.location.row, 1);
//! assert_eq!(mapped.location.column, 0);
//! ```

pub mod context;
pub mod source_info;
pub mod types;
pub mod utils;

pub use context::{SourceContext, SourceFile};
pub use source_info::{MappedLocation, SourceInfo, SourceMapping};
pub use types::{FileId, Location, Range};
pub use utils::{offset_to_location, range_from_offsets};
