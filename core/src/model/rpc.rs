use serde::Serialize;

use super::{ContainerSchemaNode, GroupingDefinition, NodeMeta, QNameMap, SchemaNode, TypeDefinition};

/// A resolved RPC operation.
///
/// An RPC has exactly one input and one output container plus local
/// typedefs and groupings. It never has direct children or `uses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RpcDefinition {
    #[serde(flatten)]
    pub(crate) meta: NodeMeta,
    pub(crate) input: ContainerSchemaNode,
    pub(crate) output: ContainerSchemaNode,
    #[serde(skip_serializing_if = "QNameMap::is_empty")]
    pub(crate) typedefs: QNameMap<TypeDefinition>,
    #[serde(skip_serializing_if = "QNameMap::is_empty")]
    pub(crate) groupings: QNameMap<GroupingDefinition>,
}

impl RpcDefinition {
    pub fn input(&self) -> &ContainerSchemaNode {
        &self.input
    }

    pub fn output(&self) -> &ContainerSchemaNode {
        &self.output
    }

    pub fn typedefs(&self) -> &QNameMap<TypeDefinition> {
        &self.typedefs
    }

    pub fn groupings(&self) -> &QNameMap<GroupingDefinition> {
        &self.groupings
    }
}

impl SchemaNode for RpcDefinition {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }
}
