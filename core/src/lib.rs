//! Builder-to-model compilation engine for YANG schema definitions.
//!
//! A parser drives mutable builders while it reads schema sources, then
//! `build()` resolves every `uses` reference and freezes the result into an
//! immutable model:
//!
//! - [`QName`] and [`SchemaPath`]: identity and location of schema nodes.
//! - [`GroupingBuilder`], [`UsesNodeBuilder`], [`RpcDefinitionBuilder`] and
//!   the data node builders: accumulate-only staging objects.
//! - [`GroupingDefinition`], [`UsesNode`], [`RpcDefinition`] and the data
//!   node types: the frozen model, safe to share between threads.
//! - [`ModuleBuilder`] and [`SchemaContextBuilder`]: whole modules and
//!   module sets compiled into a [`SchemaContext`].
//! - [`NodeBuilder`]: one tagged type over every statement-holding builder,
//!   for drivers that dispatch dynamically.
//!
//! `uses` targets are looked up at build time through an explicit
//! [`GroupingLookup`]. Cyclic groupings fail with
//! [`SchemaError::GroupingCycle`] and nesting is bounded by
//! [`BuildOptions::max_depth`].
//!
//! # Example
//!
//! ```
//! use yang_model_core::*;
//!
//! let ns = "urn:example:interfaces";
//! let q = |name: &str| QName::create(ns, "2013-07-01", name).unwrap();
//!
//! // grouping g { leaf x { type string; } }
//! let mut g = GroupingBuilder::new(q("g"));
//! g.add_child_node(LeafSchemaNodeBuilder::new(q("x"), TypeRef::default()))
//!     .unwrap();
//!
//! // grouping h { uses g { augment "." { leaf y { type string; } } } }
//! let mut augment = AugmentationSchemaBuilder::new(SchemaPath::relative(Vec::new()));
//! augment
//!     .add_child_node(LeafSchemaNodeBuilder::new(q("y"), TypeRef::default()))
//!     .unwrap();
//! let mut uses = UsesNodeBuilder::new(q("g"));
//! uses.add_augment(augment);
//! let mut h = GroupingBuilder::new(q("h"));
//! h.add_uses_node(uses);
//!
//! let mut namespace = GroupingNamespace::new();
//! namespace.register(g).unwrap();
//!
//! let h = h.build(&namespace).unwrap();
//! let inlined = &h.uses()[0];
//! assert!(inlined.data_child_by_name("x").is_some());
//! assert!(inlined.data_child_by_name("y").is_some());
//! ```

mod builder;
mod error;
mod model;
mod path;
mod qname;
mod resolve;

pub use builder::*;
pub use error::{Result, SchemaError};
pub use model::*;
pub use path::SchemaPath;
pub use qname::{QName, REVISION_FORMAT, parse_revision};
pub use resolve::{BuildOptions, DEFAULT_MAX_DEPTH, GroupingLookup, GroupingNamespace};
