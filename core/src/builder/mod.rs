//! Mutable, accumulate-only builders.
//!
//! A parser creates one builder per statement, fills it in any order, and
//! finally calls `build()` with the namespace that `uses` statements resolve
//! against. Builders are never consumed by `build()`; each call yields a new,
//! independent definition graph.
//!
//! Each builder type only offers the operations that are legal for its
//! statement kind. [`NodeBuilder`] wraps them in one tagged type for drivers
//! that dispatch dynamically; illegal operations there fail with
//! [`SchemaError::UnsupportedStructure`](crate::SchemaError::UnsupportedStructure).

mod dynamic;
mod grouping;
mod module;
mod node;
mod rpc;
mod typedef;
mod uses;

use std::fmt;
use std::sync::Arc;

pub use dynamic::NodeBuilder;
pub use grouping::GroupingBuilder;
pub use module::{ModuleBuilder, SchemaContextBuilder};
pub use node::{
    ContainerSchemaNodeBuilder, DataSchemaNodeBuilder, LeafListSchemaNodeBuilder,
    LeafSchemaNodeBuilder, ListSchemaNodeBuilder,
};
pub use rpc::RpcDefinitionBuilder;
pub use typedef::TypeDefinitionBuilder;
pub use uses::{AugmentationSchemaBuilder, UsesNodeBuilder};

use crate::error::Result;
use crate::model::{NodeMeta, QNameMap, SchemaContent};
use crate::resolve::Resolver;
use crate::{QName, SchemaPath, Status};

/// Statement kinds, as used in structural error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Module,
    Container,
    List,
    Leaf,
    LeafList,
    Grouping,
    Typedef,
    Uses,
    Augment,
    Rpc,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Container => "container",
            Self::List => "list",
            Self::Leaf => "leaf",
            Self::LeafList => "leaf-list",
            Self::Grouping => "grouping",
            Self::Typedef => "typedef",
            Self::Uses => "uses",
            Self::Augment => "augment",
            Self::Rpc => "rpc",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata setters shared by every builder of a named schema node.
pub trait SchemaNodeBuilder {
    #[doc(hidden)]
    fn meta(&self) -> &NodeMeta;

    #[doc(hidden)]
    fn meta_mut(&mut self) -> &mut NodeMeta;

    fn qname(&self) -> &QName {
        &self.meta().qname
    }

    fn path(&self) -> &SchemaPath {
        &self.meta().path
    }

    fn set_path(&mut self, path: SchemaPath) {
        self.meta_mut().path = path;
    }

    fn set_description(&mut self, description: impl Into<String>) {
        self.meta_mut().description = Some(description.into());
    }

    fn set_reference(&mut self, reference: impl Into<String>) {
        self.meta_mut().reference = Some(reference.into());
    }

    fn set_status(&mut self, status: Status) {
        self.meta_mut().status = status;
    }
}

/// Children, groupings, typedefs and `uses` accumulated by a node body.
#[derive(Debug, Clone, Default)]
pub(crate) struct ContentBuilder {
    children: QNameMap<DataSchemaNodeBuilder>,
    groupings: QNameMap<GroupingBuilder>,
    typedefs: QNameMap<TypeDefinitionBuilder>,
    uses: Vec<UsesNodeBuilder>,
}

impl ContentBuilder {
    pub(crate) fn add_child_node(&mut self, child: DataSchemaNodeBuilder) -> Result<()> {
        let qname = child.qname().clone();
        let statement = child.kind().as_str();
        self.children.insert_unique(qname, child, statement)
    }

    pub(crate) fn add_grouping(&mut self, grouping: GroupingBuilder) -> Result<()> {
        let qname = grouping.qname().clone();
        self.groupings.insert_unique(qname, grouping, "grouping")
    }

    pub(crate) fn add_typedef(&mut self, typedef: TypeDefinitionBuilder) -> Result<()> {
        let qname = typedef.qname().clone();
        self.typedefs.insert_unique(qname, typedef, "typedef")
    }

    pub(crate) fn add_uses_node(&mut self, uses: UsesNodeBuilder) {
        self.uses.push(uses);
    }

    pub(crate) fn children(&self) -> &QNameMap<DataSchemaNodeBuilder> {
        &self.children
    }

    pub(crate) fn groupings(&self) -> &QNameMap<GroupingBuilder> {
        &self.groupings
    }

    pub(crate) fn typedefs(&self) -> &QNameMap<TypeDefinitionBuilder> {
        &self.typedefs
    }

    pub(crate) fn uses(&self) -> &[UsesNodeBuilder] {
        &self.uses
    }

    /// Resolves every collection, with this body's groupings in scope.
    pub(crate) fn resolve<'a>(&'a self, resolver: &mut Resolver<'a>) -> Result<SchemaContent> {
        resolver.with_scope(&self.groupings, |resolver| {
            let typedefs = build_typedefs(&self.typedefs)?;
            let groupings = resolve_groupings(&self.groupings, resolver)?;

            let mut children = QNameMap::new();
            for (qname, child) in &self.children {
                let node = child.resolve(resolver)?;
                children.insert_unique(qname.clone(), node, child.kind().as_str())?;
            }

            let uses = self
                .uses
                .iter()
                .map(|uses| uses.resolve(resolver))
                .collect::<Result<Vec<_>>>()?;

            Ok(SchemaContent {
                children,
                groupings,
                typedefs,
                uses,
            })
        })
    }
}

pub(crate) fn build_typedefs(
    builders: &QNameMap<TypeDefinitionBuilder>,
) -> Result<QNameMap<crate::TypeDefinition>> {
    let mut typedefs = QNameMap::new();
    for (qname, builder) in builders {
        typedefs.insert_unique(qname.clone(), builder.build(), "typedef")?;
    }
    Ok(typedefs)
}

pub(crate) fn resolve_groupings<'a>(
    builders: &'a QNameMap<GroupingBuilder>,
    resolver: &mut Resolver<'a>,
) -> Result<QNameMap<crate::GroupingDefinition>> {
    let mut groupings = QNameMap::new();
    for (qname, builder) in builders {
        let grouping = resolver.resolve_definition(builder)?;
        groupings.insert_unique(qname.clone(), Arc::unwrap_or_clone(grouping), "grouping")?;
    }
    Ok(groupings)
}
