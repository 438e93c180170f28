//! Immutable schema model.
//!
//! Everything in this module is produced by a builder's `build()` and never
//! mutated afterwards. Definitions expose accessors only; the builders in
//! [`crate::builder`] are the sole writers.

mod grouping;
mod module;
mod node;
mod qname_map;
mod rpc;

use serde::{Deserialize, Serialize};

pub use grouping::{AugmentationSchema, GroupingDefinition, UsesNode};
pub use module::{Module, SchemaContext};
pub use node::{
    BuiltinType, ContainerSchemaNode, DataSchemaNode, LeafListSchemaNode, LeafSchemaNode,
    ListSchemaNode, TypeDefinition, TypeRef,
};
pub use qname_map::QNameMap;
pub use rpc::RpcDefinition;

use crate::{QName, SchemaPath};

/// Lifecycle status of a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Current,
    Deprecated,
    Obsolete,
}

/// Identity and documentation shared by every schema node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeMeta {
    pub(crate) qname: QName,
    pub(crate) path: SchemaPath,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) reference: Option<String>,
    pub(crate) status: Status,
}

impl NodeMeta {
    /// Metadata for `qname` located directly under the schema root.
    pub(crate) fn new(qname: QName) -> Self {
        let path = SchemaPath::root().create_child(qname.clone());
        Self {
            qname,
            path,
            description: None,
            reference: None,
            status: Status::Current,
        }
    }
}

/// Read access to the identity and documentation of a schema node.
pub trait SchemaNode {
    fn meta(&self) -> &NodeMeta;

    fn qname(&self) -> &QName {
        &self.meta().qname
    }

    fn path(&self) -> &SchemaPath {
        &self.meta().path
    }

    fn description(&self) -> Option<&str> {
        self.meta().description.as_deref()
    }

    fn reference(&self) -> Option<&str> {
        self.meta().reference.as_deref()
    }

    fn status(&self) -> Status {
        self.meta().status
    }
}

/// Resolved content of a node that holds children, groupings, typedefs and
/// `uses` statements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaContent {
    #[serde(skip_serializing_if = "QNameMap::is_empty")]
    pub(crate) children: QNameMap<DataSchemaNode>,
    #[serde(skip_serializing_if = "QNameMap::is_empty")]
    pub(crate) groupings: QNameMap<GroupingDefinition>,
    #[serde(skip_serializing_if = "QNameMap::is_empty")]
    pub(crate) typedefs: QNameMap<TypeDefinition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) uses: Vec<UsesNode>,
}

/// Where a data node sits inside a [`SchemaContent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NodeSlot {
    /// Index into `uses`, or `None` for the content's own children.
    pub(crate) uses: Option<usize>,
    pub(crate) qname: QName,
}

impl SchemaContent {
    /// Finds the data node `step` names among the own children and then the
    /// children inlined by `uses`.
    ///
    /// An exact QName wins. Otherwise the first node with the same local
    /// name is taken: inlined nodes keep the namespace of the module that
    /// defines the grouping, while a using module names them unprefixed.
    pub(crate) fn locate(&self, step: &QName) -> Option<NodeSlot> {
        self.child_maps()
            .find(|(_, children)| children.contains(step))
            .map(|(uses, _)| NodeSlot {
                uses,
                qname: step.clone(),
            })
            .or_else(|| {
                self.child_maps().find_map(|(uses, children)| {
                    children
                        .key_by_local_name(step.local_name())
                        .map(|qname| NodeSlot {
                            uses,
                            qname: qname.clone(),
                        })
                })
            })
    }

    fn child_maps(&self) -> impl Iterator<Item = (Option<usize>, &QNameMap<DataSchemaNode>)> {
        let inlined = self
            .uses
            .iter()
            .enumerate()
            .map(|(index, uses)| (Some(index), &uses.children));
        std::iter::once((None, &self.children)).chain(inlined)
    }

    pub(crate) fn node(&self, slot: &NodeSlot) -> Option<&DataSchemaNode> {
        match slot.uses {
            None => self.children.get(&slot.qname),
            Some(index) => self.uses.get(index)?.children.get(&slot.qname),
        }
    }

    pub(crate) fn node_mut(&mut self, slot: &NodeSlot) -> Option<&mut DataSchemaNode> {
        match slot.uses {
            None => self.children.get_mut(&slot.qname),
            Some(index) => self.uses.get_mut(index)?.children.get_mut(&slot.qname),
        }
    }
}

/// Queries shared by groupings, containers, lists and modules.
///
/// `data_child_by_qname` is an exact lookup. `data_child_by_name` scans by
/// local name only; when several namespaces define the same local name the
/// first in QName order is returned.
pub trait DataNodeContainer {
    fn content(&self) -> &SchemaContent;

    fn child_nodes(&self) -> &QNameMap<DataSchemaNode> {
        &self.content().children
    }

    fn groupings(&self) -> &QNameMap<GroupingDefinition> {
        &self.content().groupings
    }

    fn typedefs(&self) -> &QNameMap<TypeDefinition> {
        &self.content().typedefs
    }

    fn uses(&self) -> &[UsesNode] {
        &self.content().uses
    }

    fn data_child_by_qname(&self, qname: &QName) -> Option<&DataSchemaNode> {
        self.content().children.get(qname)
    }

    fn data_child_by_name(&self, local_name: &str) -> Option<&DataSchemaNode> {
        self.content().children.find_by_local_name(local_name)
    }
}
