use tracing::trace;

use super::{
    ContentBuilder, GroupingBuilder, NodeKind, SchemaNodeBuilder, TypeDefinitionBuilder,
    UsesNodeBuilder,
};
use crate::error::{Result, SchemaError};
use crate::model::{NodeMeta, QNameMap, SchemaContent};
use crate::resolve::{BuildOptions, GroupingLookup, Resolver};
use crate::{
    ContainerSchemaNode, DataSchemaNode, LeafListSchemaNode, LeafSchemaNode, ListSchemaNode,
    QName, TypeRef,
};

/// Builder for a `container` statement.
#[derive(Debug, Clone)]
pub struct ContainerSchemaNodeBuilder {
    meta: NodeMeta,
    presence: bool,
    content: ContentBuilder,
}

impl ContainerSchemaNodeBuilder {
    pub fn new(qname: QName) -> Self {
        Self {
            meta: NodeMeta::new(qname),
            presence: false,
            content: ContentBuilder::default(),
        }
    }

    pub fn set_presence(&mut self, presence: bool) {
        self.presence = presence;
    }

    /// Adds a child data node.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateDefinition`] if a child with the same
    /// QName exists; the builder is left unchanged.
    pub fn add_child_node(&mut self, child: impl Into<DataSchemaNodeBuilder>) -> Result<()> {
        self.content.add_child_node(child.into())
    }

    pub fn add_grouping(&mut self, grouping: GroupingBuilder) -> Result<()> {
        self.content.add_grouping(grouping)
    }

    pub fn add_typedef(&mut self, typedef: TypeDefinitionBuilder) -> Result<()> {
        self.content.add_typedef(typedef)
    }

    pub fn add_uses_node(&mut self, uses: UsesNodeBuilder) {
        self.content.add_uses_node(uses);
    }

    pub fn child_nodes(&self) -> &QNameMap<DataSchemaNodeBuilder> {
        self.content.children()
    }

    pub fn groupings(&self) -> &QNameMap<GroupingBuilder> {
        self.content.groupings()
    }

    pub fn uses_nodes(&self) -> &[UsesNodeBuilder] {
        self.content.uses()
    }

    /// Resolves this container against `namespace`.
    pub fn build(&self, namespace: &dyn GroupingLookup) -> Result<ContainerSchemaNode> {
        self.build_with(namespace, &BuildOptions::default())
    }

    pub fn build_with(
        &self,
        namespace: &dyn GroupingLookup,
        options: &BuildOptions,
    ) -> Result<ContainerSchemaNode> {
        let mut resolver = Resolver::new(namespace, options);
        self.resolve(&mut resolver)
    }

    pub(crate) fn resolve<'a>(&'a self, resolver: &mut Resolver<'a>) -> Result<ContainerSchemaNode> {
        resolver.descend(|resolver| {
            let content = self.content.resolve(resolver)?;
            Ok(ContainerSchemaNode {
                meta: self.meta.clone(),
                presence: self.presence,
                content,
            })
        })
    }
}

impl SchemaNodeBuilder for ContainerSchemaNodeBuilder {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        &mut self.meta
    }
}

/// Builder for a `list` statement.
///
/// Keys are checked at build time: each must name a leaf that is a direct
/// child of the list or is inlined into it by one of its `uses`.
#[derive(Debug, Clone)]
pub struct ListSchemaNodeBuilder {
    meta: NodeMeta,
    keys: Vec<QName>,
    content: ContentBuilder,
}

impl ListSchemaNodeBuilder {
    pub fn new(qname: QName) -> Self {
        Self {
            meta: NodeMeta::new(qname),
            keys: Vec::new(),
            content: ContentBuilder::default(),
        }
    }

    pub fn add_key(&mut self, key: QName) {
        if !self.keys.contains(&key) {
            self.keys.push(key);
        }
    }

    pub fn keys(&self) -> &[QName] {
        &self.keys
    }

    pub fn add_child_node(&mut self, child: impl Into<DataSchemaNodeBuilder>) -> Result<()> {
        self.content.add_child_node(child.into())
    }

    pub fn add_grouping(&mut self, grouping: GroupingBuilder) -> Result<()> {
        self.content.add_grouping(grouping)
    }

    pub fn add_typedef(&mut self, typedef: TypeDefinitionBuilder) -> Result<()> {
        self.content.add_typedef(typedef)
    }

    pub fn add_uses_node(&mut self, uses: UsesNodeBuilder) {
        self.content.add_uses_node(uses);
    }

    pub fn child_nodes(&self) -> &QNameMap<DataSchemaNodeBuilder> {
        self.content.children()
    }

    pub fn build(&self, namespace: &dyn GroupingLookup) -> Result<ListSchemaNode> {
        self.build_with(namespace, &BuildOptions::default())
    }

    pub fn build_with(
        &self,
        namespace: &dyn GroupingLookup,
        options: &BuildOptions,
    ) -> Result<ListSchemaNode> {
        let mut resolver = Resolver::new(namespace, options);
        self.resolve(&mut resolver)
    }

    pub(crate) fn resolve<'a>(&'a self, resolver: &mut Resolver<'a>) -> Result<ListSchemaNode> {
        resolver.descend(|resolver| {
            let content = self.content.resolve(resolver)?;
            let keys = self
                .keys
                .iter()
                .map(|key| {
                    key_leaf(&content, key).ok_or_else(|| SchemaError::InvalidListKey {
                        list: self.meta.qname.clone(),
                        key: key.clone(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(ListSchemaNode {
                meta: self.meta.clone(),
                keys,
                content,
            })
        })
    }
}

/// Returns the QName of the leaf `key` names, direct or inlined by `uses`.
fn key_leaf(content: &SchemaContent, key: &QName) -> Option<QName> {
    let slot = content.locate(key)?;
    content.node(&slot)?.as_leaf()?;
    Some(slot.qname)
}

impl SchemaNodeBuilder for ListSchemaNodeBuilder {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        &mut self.meta
    }
}

/// Builder for a `leaf` statement.
#[derive(Debug, Clone)]
pub struct LeafSchemaNodeBuilder {
    meta: NodeMeta,
    type_ref: TypeRef,
    default_value: Option<String>,
    units: Option<String>,
    mandatory: bool,
}

impl LeafSchemaNodeBuilder {
    pub fn new(qname: QName, type_ref: TypeRef) -> Self {
        Self {
            meta: NodeMeta::new(qname),
            type_ref,
            default_value: None,
            units: None,
            mandatory: false,
        }
    }

    pub fn set_default_value(&mut self, default_value: impl Into<String>) {
        self.default_value = Some(default_value.into());
    }

    pub fn set_units(&mut self, units: impl Into<String>) {
        self.units = Some(units.into());
    }

    pub fn set_mandatory(&mut self, mandatory: bool) {
        self.mandatory = mandatory;
    }

    /// Leaves hold no `uses`, so building one never fails.
    pub fn build(&self) -> LeafSchemaNode {
        LeafSchemaNode {
            meta: self.meta.clone(),
            type_ref: self.type_ref.clone(),
            default_value: self.default_value.clone(),
            units: self.units.clone(),
            mandatory: self.mandatory,
        }
    }
}

impl SchemaNodeBuilder for LeafSchemaNodeBuilder {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        &mut self.meta
    }
}

/// Builder for a `leaf-list` statement.
#[derive(Debug, Clone)]
pub struct LeafListSchemaNodeBuilder {
    meta: NodeMeta,
    type_ref: TypeRef,
    units: Option<String>,
}

impl LeafListSchemaNodeBuilder {
    pub fn new(qname: QName, type_ref: TypeRef) -> Self {
        Self {
            meta: NodeMeta::new(qname),
            type_ref,
            units: None,
        }
    }

    pub fn set_units(&mut self, units: impl Into<String>) {
        self.units = Some(units.into());
    }

    pub fn build(&self) -> LeafListSchemaNode {
        LeafListSchemaNode {
            meta: self.meta.clone(),
            type_ref: self.type_ref.clone(),
            units: self.units.clone(),
        }
    }
}

impl SchemaNodeBuilder for LeafListSchemaNodeBuilder {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        &mut self.meta
    }
}

/// Any data node builder that can be added as a child.
#[derive(Debug, Clone)]
pub enum DataSchemaNodeBuilder {
    Container(ContainerSchemaNodeBuilder),
    List(ListSchemaNodeBuilder),
    Leaf(LeafSchemaNodeBuilder),
    LeafList(LeafListSchemaNodeBuilder),
}

impl DataSchemaNodeBuilder {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Container(_) => NodeKind::Container,
            Self::List(_) => NodeKind::List,
            Self::Leaf(_) => NodeKind::Leaf,
            Self::LeafList(_) => NodeKind::LeafList,
        }
    }

    pub(crate) fn resolve<'a>(&'a self, resolver: &mut Resolver<'a>) -> Result<DataSchemaNode> {
        trace!(node = %self.qname(), kind = %self.kind(), "resolving data node");
        let node = match self {
            Self::Container(container) => DataSchemaNode::Container(container.resolve(resolver)?),
            Self::List(list) => DataSchemaNode::List(list.resolve(resolver)?),
            Self::Leaf(leaf) => DataSchemaNode::Leaf(leaf.build()),
            Self::LeafList(leaf_list) => DataSchemaNode::LeafList(leaf_list.build()),
        };
        Ok(node)
    }
}

impl SchemaNodeBuilder for DataSchemaNodeBuilder {
    fn meta(&self) -> &NodeMeta {
        match self {
            Self::Container(container) => &container.meta,
            Self::List(list) => &list.meta,
            Self::Leaf(leaf) => &leaf.meta,
            Self::LeafList(leaf_list) => &leaf_list.meta,
        }
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        match self {
            Self::Container(container) => &mut container.meta,
            Self::List(list) => &mut list.meta,
            Self::Leaf(leaf) => &mut leaf.meta,
            Self::LeafList(leaf_list) => &mut leaf_list.meta,
        }
    }
}

impl From<ContainerSchemaNodeBuilder> for DataSchemaNodeBuilder {
    fn from(builder: ContainerSchemaNodeBuilder) -> Self {
        Self::Container(builder)
    }
}

impl From<ListSchemaNodeBuilder> for DataSchemaNodeBuilder {
    fn from(builder: ListSchemaNodeBuilder) -> Self {
        Self::List(builder)
    }
}

impl From<LeafSchemaNodeBuilder> for DataSchemaNodeBuilder {
    fn from(builder: LeafSchemaNodeBuilder) -> Self {
        Self::Leaf(builder)
    }
}

impl From<LeafListSchemaNodeBuilder> for DataSchemaNodeBuilder {
    fn from(builder: LeafListSchemaNodeBuilder) -> Self {
        Self::LeafList(builder)
    }
}
