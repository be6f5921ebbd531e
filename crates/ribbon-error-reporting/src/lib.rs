//! Error reporting and diagnostic messages for the ribbon merge engine.
//!
//! Merging fragments from many plugins produces two kinds of feedback: fatal
//! configuration errors that abort one fragment, and non-fatal diagnostics
//! (out-of-bound orders, dropped overrides) that still need to reach the
//! plugin author. Both are represented as a [`DiagnosticMessage`].
//!
//! # Structure
//!
//! - [`DiagnosticMessage`]: code, title, problem, details, hints, location
//! - [`DiagnosticMessageBuilder`]: the recommended way to build one
//! - [`catalog`]: the `R-<subsystem>-<number>` error code catalog
//!
//! # Example
//!
//! ```
//! use ribbon_error_reporting::DiagnosticMessageBuilder;
//!
//! let warning = DiagnosticMessageBuilder::warning("Unmatched Override")
//!     .with_code("R-4-1")
//!     .problem("Group `Clipboard` does not exist in tab `Home`")
//!     .add_hint("Check the label of the overridden group?")
//!     .build();
//!
//! assert!(warning.to_text(None).contains("[R-4-1]"));
//! ```

pub mod builder;
pub mod catalog;
pub mod diagnostic;

pub use builder::DiagnosticMessageBuilder;
pub use catalog::{ERROR_CATALOG, ErrorCodeInfo, get_error_info, get_subsystem};
pub use diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage, MessageContent};
