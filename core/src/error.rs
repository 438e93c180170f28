//! Error types for schema assembly and resolution.

use thiserror::Error;

use crate::{NodeKind, QName, SchemaPath};

/// Errors raised while populating builders or resolving them into a model.
///
/// Structural errors (`UnsupportedStructure`, `DuplicateDefinition`) are
/// raised by the mutator that caused them and leave the builder unchanged.
/// Everything else is raised by `build()`, which never returns a partially
/// resolved graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A QName string does not have the `(namespace?revision=date)name` form.
    #[error("invalid qname: {0}")]
    InvalidQName(String),

    /// A revision is not a `YYYY-MM-DD` calendar date.
    #[error("invalid revision date: {0}")]
    InvalidRevision(String),

    /// A type name is not one of the YANG built-in types.
    #[error("unknown built-in type: {0}")]
    UnknownBuiltinType(String),

    /// A statement was added to a node kind that cannot hold it.
    #[error("cannot add {statement} to {kind} {node}: {kind} definitions may not contain {statement} statements")]
    UnsupportedStructure {
        kind: NodeKind,
        node: String,
        statement: &'static str,
    },

    /// A second definition with the same QName was added to one scope.
    #[error("duplicate {statement} {qname}")]
    DuplicateDefinition {
        statement: &'static str,
        qname: QName,
    },

    /// Two modules with the same name were registered in one context.
    #[error("duplicate module: {0}")]
    DuplicateModule(String),

    /// A `uses` statement names a grouping that is not visible at build time.
    #[error("grouping not found: {0}")]
    UnresolvedGrouping(QName),

    /// A use-site augmentation targets a node that is not a container or list
    /// in the inlined grouping content.
    #[error("augment target {target} not found in grouping {grouping}")]
    UnresolvedAugmentTarget { grouping: QName, target: SchemaPath },

    /// A list key does not name a leaf child of the list.
    #[error("list {list} declares key {key} which is not a leaf child")]
    InvalidListKey { list: QName, key: QName },

    /// An RPC was built before its input was set.
    #[error("rpc {0} has no input")]
    MissingInput(QName),

    /// An RPC was built before its output was set.
    #[error("rpc {0} has no output")]
    MissingOutput(QName),

    /// A grouping reaches itself through nested groupings or `uses`.
    #[error("grouping cycle detected: {0}")]
    GroupingCycle(String),

    /// Nesting exceeded the configured resolution depth.
    #[error("schema nesting exceeds maximum depth of {0}")]
    DepthExceeded(usize),
}

/// Convenience alias for results with [`SchemaError`].
pub type Result<T> = std::result::Result<T, SchemaError>;
