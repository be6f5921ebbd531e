//! Deterministic merging of ribbon configuration fragments.
//!
//! Plugins contribute fragments of a ribbon (tabs, groups of controls, the
//! application and user menus, exclusions). This crate merges them, in
//! arrival order, into one immutable [`RibbonModel`], and resolves that model
//! into the document a client renders.
//!
//! # Key Features
//!
//! - **Positional injection**: an order directive `P` or `P.S` places new
//!   elements relative to the sequence as it was before any injection
//! - **Overrides**: a fragment can add groups to an existing tab and controls
//!   to an existing group, matched by label
//! - **Exclusions**: whole fragments or single controls can be filtered out
//!   before anything is merged
//! - **Diagnostics**: every rejected fragment and every fallback placement is
//!   reported as a [`DiagnosticMessage`] carrying its source location
//!
//! # Architecture
//!
//! - [`OrderedList`] and [`OrderingEngine`]: stable node handles and the
//!   anchor snapshot used by every injection
//! - [`Fragment`]: an untyped tree as contributed by a plugin
//! - [`RibbonBuilder`]: filters, converts and merges fragments
//! - [`RibbonModel`]: the merged tabs, groups and menus
//! - [`resolve`] and [`write_xml`]: the rendering-time view
//!
//! # Example
//!
//! ```rust
//! use ribbon_config::{
//!     BuildOptions, Fragment, IdentityResolver, Origin, RibbonBuilder, resolve, write_xml,
//! };
//!
//! let core = ribbon_xml::parse(
//!     r#"<tab label="HOME"><groups><group label="EDIT"><control id="cut"/><control id="copy"/></group></groups></tab>"#,
//! )?;
//! let plugin = ribbon_xml::parse(
//!     r#"<tab label="HOME" override="true"><groups><group label="EDIT" override="true" controlsOrder="2"><control id="paste"/></group></groups></tab>"#,
//! )?;
//!
//! let mut builder = RibbonBuilder::new(BuildOptions::default());
//! builder.add_fragment(Fragment::from_xml(&core.root, Origin::new("core")));
//! builder.add_fragment(Fragment::from_xml(&plugin.root, Origin::new("clipboard")));
//! let output = builder.build()?;
//!
//! let resolved = resolve(&output.model, &IdentityResolver);
//! let xml = write_xml(&resolved)?;
//! assert!(xml.contains(r#"<control id="paste" colspan="1"/>"#));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod builder;
mod cache;
mod context;
mod convert;
mod element;
mod error;
mod exclusion;
mod extension;
mod fragment;
mod group;
mod group_size;
mod injection;
mod label;
mod match_key;
mod menu;
mod model;
mod order;
mod ordered_list;
mod resolve;
mod tab;
mod tab_order;
mod writer;

pub use builder::{BuildOptions, BuildOutput, RibbonBuilder};

pub use cache::{ModelCache, Validity};

pub use context::MergeContext;

pub use element::{ControlRef, ControlSize, Element, Layout, LayoutAlign, Toolbar};

pub use error::{Result, RibbonError};

pub use exclusion::{Exclusion, ExclusionSet, ExclusionTarget, ExclusionType};

pub use extension::{ExtensionKind, GeneratedExtension};

pub use fragment::{
    Attribute,
    Fragment,
    FragmentKind,
    FragmentNode,
    Origin,
    fragments_from_document,
};

pub use group::{Group, SizeKind};

pub use group_size::GroupSize;

pub use injection::{Injection, OrderingEngine, Placement};

pub use label::{DEFAULT_CATALOGUE, Label};

pub use match_key::{Keyed, MatchKey};

pub use menu::Menu;

pub use model::RibbonModel;

pub use order::OrderDirective;

pub use ordered_list::{NodeId, OrderedList};

pub use resolve::{
    ControlResolver,
    HidingResolver,
    IdentityResolver,
    ResolvedGroup,
    ResolvedRibbon,
    ResolvedTab,
    resolve,
};

pub use tab::{Tab, TabOrder};

pub use tab_order::order_tabs;

pub use writer::{I18N_NAMESPACE, to_json, write_xml};

// Re-export for convenience
pub use ribbon_error_reporting::DiagnosticMessage;
pub use ribbon_source_map::SourceInfo;
