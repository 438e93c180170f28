//! Grouping resolution shared by every `build()`.
//!
//! A build walks the builder graph once. `uses` targets are looked up in the
//! lexically enclosing grouping scopes first, innermost outwards, and then in
//! the namespace passed to `build()`. The walk keeps a stack of groupings in
//! progress, so a grouping that reaches itself fails with
//! [`SchemaError::GroupingCycle`] instead of recursing forever, and it stops
//! at [`BuildOptions::max_depth`] nesting levels.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Result, SchemaError};
use crate::{GroupingBuilder, GroupingDefinition, QName, QNameMap, SchemaNode, SchemaNodeBuilder};

/// Default nesting limit for a single build.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Source of grouping builders visible to `uses` statements.
///
/// Implemented by [`GroupingNamespace`] for standalone fragments and by
/// [`SchemaContextBuilder`](crate::SchemaContextBuilder) for whole module
/// sets.
pub trait GroupingLookup {
    fn lookup_grouping(&self, qname: &QName) -> Option<&GroupingBuilder>;
}

/// Tunables for a build.
///
/// # Examples
///
/// ```
/// use yang_model_core::BuildOptions;
///
/// let options = BuildOptions::default();
/// assert_eq!(options.max_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Maximum nesting of containers, lists and groupings.
    pub max_depth: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Owned QName → grouping builder map.
///
/// # Examples
///
/// ```
/// use yang_model_core::*;
///
/// let g = QName::new("urn:example", None, "g");
/// let mut namespace = GroupingNamespace::new();
/// namespace.register(GroupingBuilder::new(g.clone())).unwrap();
///
/// assert!(namespace.lookup_grouping(&g).is_some());
/// assert!(namespace.register(GroupingBuilder::new(g)).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct GroupingNamespace {
    groupings: QNameMap<GroupingBuilder>,
}

impl GroupingNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a grouping builder under its QName.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateDefinition`] if the QName is taken.
    pub fn register(&mut self, builder: GroupingBuilder) -> Result<()> {
        let qname = builder.qname().clone();
        self.groupings.insert_unique(qname, builder, "grouping")
    }

    pub fn len(&self) -> usize {
        self.groupings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groupings.is_empty()
    }
}

impl GroupingLookup for GroupingNamespace {
    fn lookup_grouping(&self, qname: &QName) -> Option<&GroupingBuilder> {
        self.groupings.get(qname)
    }
}

/// State of one build: scopes, in-progress stack and resolved groupings.
///
/// Resolved groupings are memoized by builder identity, so every use of a
/// grouping within one build shares a single [`GroupingDefinition`]. Each
/// entry records how many levels the grouping spans, and a reuse is charged
/// that many levels at its own site.
pub(crate) struct Resolver<'a> {
    namespace: &'a dyn GroupingLookup,
    scopes: Vec<&'a QNameMap<GroupingBuilder>>,
    in_progress: Vec<QName>,
    resolved: HashMap<*const GroupingBuilder, Resolved>,
    depth: usize,
    /// Deepest level reached since the innermost grouping started resolving.
    peak: usize,
    max_depth: usize,
}

struct Resolved {
    grouping: Arc<GroupingDefinition>,
    height: usize,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(namespace: &'a dyn GroupingLookup, options: &BuildOptions) -> Self {
        Self {
            namespace,
            scopes: Vec::new(),
            in_progress: Vec::new(),
            resolved: HashMap::new(),
            depth: 0,
            peak: 0,
            max_depth: options.max_depth,
        }
    }

    /// Runs `f` one nesting level deeper.
    pub(crate) fn descend<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= self.max_depth {
            return Err(SchemaError::DepthExceeded(self.max_depth));
        }
        self.depth += 1;
        self.peak = self.peak.max(self.depth);
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Runs `f` with `scope` as the innermost grouping scope.
    pub(crate) fn with_scope<T>(
        &mut self,
        scope: &'a QNameMap<GroupingBuilder>,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.scopes.push(scope);
        let result = f(self);
        self.scopes.pop();
        result
    }

    /// Marks `qname` as in progress; fails if it already is.
    pub(crate) fn enter_grouping(&mut self, qname: &QName) -> Result<()> {
        if self.in_progress.contains(qname) {
            return Err(self.cycle(qname));
        }
        self.in_progress.push(qname.clone());
        Ok(())
    }

    pub(crate) fn leave_grouping(&mut self) {
        self.in_progress.pop();
    }

    fn cycle(&self, qname: &QName) -> SchemaError {
        let start = self
            .in_progress
            .iter()
            .position(|entry| entry == qname)
            .unwrap_or(0);
        let chain = self.in_progress[start..]
            .iter()
            .chain(std::iter::once(qname))
            .map(|entry| entry.local_name())
            .collect::<Vec<_>>()
            .join(" -> ");
        SchemaError::GroupingCycle(chain)
    }

    /// Resolves the grouping a `uses` statement names.
    pub(crate) fn resolve_grouping(&mut self, target: &QName) -> Result<Arc<GroupingDefinition>> {
        if self.in_progress.contains(target) {
            return Err(self.cycle(target));
        }

        let scoped = self
            .scopes
            .iter()
            .enumerate()
            .rev()
            .find_map(|(index, scope)| {
                let scope: &'a QNameMap<GroupingBuilder> = *scope;
                scope.get(target).map(|builder| (index, builder))
            });

        let (builder, lexical_depth) = match scoped {
            Some((index, builder)) => (builder, index + 1),
            None => {
                let namespace = self.namespace;
                let builder = namespace
                    .lookup_grouping(target)
                    .ok_or_else(|| SchemaError::UnresolvedGrouping(target.clone()))?;
                (builder, 0)
            }
        };

        self.resolve_in_scope(builder, lexical_depth)
    }

    /// Resolves a grouping defined in the innermost scope.
    pub(crate) fn resolve_definition(
        &mut self,
        builder: &'a GroupingBuilder,
    ) -> Result<Arc<GroupingDefinition>> {
        let lexical_depth = self.scopes.len();
        self.resolve_in_scope(builder, lexical_depth)
    }

    fn resolve_in_scope(
        &mut self,
        builder: &'a GroupingBuilder,
        lexical_depth: usize,
    ) -> Result<Arc<GroupingDefinition>> {
        let key: *const GroupingBuilder = builder;
        if let Some(entry) = self.resolved.get(&key) {
            let reached = self.depth + entry.height;
            if reached > self.max_depth {
                return Err(SchemaError::DepthExceeded(self.max_depth));
            }
            trace!(
                grouping = %builder.qname(),
                height = entry.height,
                "reusing resolved grouping"
            );
            let grouping = Arc::clone(&entry.grouping);
            self.peak = self.peak.max(reached);
            return Ok(grouping);
        }

        // The grouping body sees only the scopes it was defined in.
        let outer = self.scopes.split_off(lexical_depth);
        let outer_peak = std::mem::replace(&mut self.peak, self.depth);
        let result = builder.resolve(self);
        let height = self.peak - self.depth;
        self.peak = outer_peak.max(self.peak);
        self.scopes.extend(outer);

        let grouping = Arc::new(result?);
        debug!(grouping = %grouping.qname(), height, "resolved grouping");
        self.resolved.insert(
            key,
            Resolved {
                grouping: Arc::clone(&grouping),
                height,
            },
        );
        Ok(grouping)
    }
}
