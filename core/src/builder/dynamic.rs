use super::{
    AugmentationSchemaBuilder, ContainerSchemaNodeBuilder, DataSchemaNodeBuilder, GroupingBuilder,
    ListSchemaNodeBuilder, ModuleBuilder, NodeKind, RpcDefinitionBuilder, SchemaNodeBuilder,
    TypeDefinitionBuilder, UsesNodeBuilder,
};
use crate::error::{Result, SchemaError};
use crate::Status;

/// Any builder that can hold nested statements.
///
/// Drivers that walk a statement tree without knowing its shape in advance
/// push statements through this type. Operations the wrapped kind cannot
/// hold fail with [`SchemaError::UnsupportedStructure`] and leave the builder
/// as it was.
///
/// # Examples
///
/// ```
/// use yang_model_core::*;
///
/// let get = QName::new("urn:example", None, "get");
/// let mut node = NodeBuilder::from(RpcDefinitionBuilder::new(get.clone()));
///
/// let err = node
///     .add_uses_node(UsesNodeBuilder::new(get.sibling("g")))
///     .unwrap_err();
/// assert!(matches!(err, SchemaError::UnsupportedStructure { kind: NodeKind::Rpc, .. }));
/// ```
#[derive(Debug, Clone)]
pub enum NodeBuilder {
    Module(ModuleBuilder),
    Container(ContainerSchemaNodeBuilder),
    List(ListSchemaNodeBuilder),
    Grouping(GroupingBuilder),
    Rpc(RpcDefinitionBuilder),
    Augment(AugmentationSchemaBuilder),
}

impl NodeBuilder {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Module(_) => NodeKind::Module,
            Self::Container(_) => NodeKind::Container,
            Self::List(_) => NodeKind::List,
            Self::Grouping(_) => NodeKind::Grouping,
            Self::Rpc(_) => NodeKind::Rpc,
            Self::Augment(_) => NodeKind::Augment,
        }
    }

    /// Name used in error messages: the QName, module name or augment target.
    pub fn display_name(&self) -> String {
        match self {
            Self::Module(module) => module.name().to_string(),
            Self::Container(container) => container.qname().to_string(),
            Self::List(list) => list.qname().to_string(),
            Self::Grouping(grouping) => grouping.qname().to_string(),
            Self::Rpc(rpc) => rpc.qname().to_string(),
            Self::Augment(augment) => augment.target_path().to_string(),
        }
    }

    fn unsupported(&self, statement: &'static str) -> SchemaError {
        SchemaError::UnsupportedStructure {
            kind: self.kind(),
            node: self.display_name(),
            statement,
        }
    }

    pub fn add_child_node(&mut self, child: impl Into<DataSchemaNodeBuilder>) -> Result<()> {
        let child = child.into();
        match self {
            Self::Module(module) => module.add_child_node(child),
            Self::Container(container) => container.add_child_node(child),
            Self::List(list) => list.add_child_node(child),
            Self::Grouping(grouping) => grouping.add_child_node(child),
            Self::Augment(augment) => augment.add_child_node(child),
            Self::Rpc(_) => Err(self.unsupported(child.kind().as_str())),
        }
    }

    pub fn add_uses_node(&mut self, uses: UsesNodeBuilder) -> Result<()> {
        match self {
            Self::Module(module) => module.add_uses_node(uses),
            Self::Container(container) => container.add_uses_node(uses),
            Self::List(list) => list.add_uses_node(uses),
            Self::Grouping(grouping) => grouping.add_uses_node(uses),
            Self::Rpc(_) | Self::Augment(_) => return Err(self.unsupported("uses")),
        }
        Ok(())
    }

    pub fn add_grouping(&mut self, grouping: GroupingBuilder) -> Result<()> {
        match self {
            Self::Module(module) => module.add_grouping(grouping),
            Self::Container(container) => container.add_grouping(grouping),
            Self::List(list) => list.add_grouping(grouping),
            Self::Grouping(parent) => parent.add_grouping(grouping),
            Self::Rpc(rpc) => rpc.add_grouping(grouping),
            Self::Augment(_) => Err(self.unsupported("grouping")),
        }
    }

    pub fn add_typedef(&mut self, typedef: TypeDefinitionBuilder) -> Result<()> {
        match self {
            Self::Module(module) => module.add_typedef(typedef),
            Self::Container(container) => container.add_typedef(typedef),
            Self::List(list) => list.add_typedef(typedef),
            Self::Grouping(grouping) => grouping.add_typedef(typedef),
            Self::Rpc(rpc) => rpc.add_typedef(typedef),
            Self::Augment(_) => Err(self.unsupported("typedef")),
        }
    }

    pub fn add_rpc(&mut self, rpc: RpcDefinitionBuilder) -> Result<()> {
        match self {
            Self::Module(module) => module.add_rpc(rpc),
            _ => Err(self.unsupported("rpc")),
        }
    }

    /// Adds a finished container, list, grouping or rpc.
    ///
    /// Modules and augments are never nested and are always rejected.
    pub fn add_node(&mut self, child: NodeBuilder) -> Result<()> {
        match child {
            Self::Container(container) => self.add_child_node(container),
            Self::List(list) => self.add_child_node(list),
            Self::Grouping(grouping) => self.add_grouping(grouping),
            Self::Rpc(rpc) => self.add_rpc(rpc),
            Self::Module(_) => Err(self.unsupported("module")),
            Self::Augment(_) => Err(self.unsupported("augment")),
        }
    }

    pub fn set_input(&mut self, input: ContainerSchemaNodeBuilder) -> Result<()> {
        match self {
            Self::Rpc(rpc) => {
                rpc.set_input(input);
                Ok(())
            }
            _ => Err(self.unsupported("input")),
        }
    }

    pub fn set_output(&mut self, output: ContainerSchemaNodeBuilder) -> Result<()> {
        match self {
            Self::Rpc(rpc) => {
                rpc.set_output(output);
                Ok(())
            }
            _ => Err(self.unsupported("output")),
        }
    }

    pub fn add_key(&mut self, key: crate::QName) -> Result<()> {
        match self {
            Self::List(list) => {
                list.add_key(key);
                Ok(())
            }
            _ => Err(self.unsupported("key")),
        }
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        match self {
            Self::Module(module) => module.set_description(description),
            Self::Container(container) => container.set_description(description),
            Self::List(list) => list.set_description(description),
            Self::Grouping(grouping) => grouping.set_description(description),
            Self::Rpc(rpc) => rpc.set_description(description),
            Self::Augment(augment) => augment.set_description(description),
        }
    }

    /// Sets the reference text. Modules carry no reference and ignore it.
    pub fn set_reference(&mut self, reference: impl Into<String>) {
        match self {
            Self::Module(_) => {}
            Self::Container(container) => container.set_reference(reference),
            Self::List(list) => list.set_reference(reference),
            Self::Grouping(grouping) => grouping.set_reference(reference),
            Self::Rpc(rpc) => rpc.set_reference(reference),
            Self::Augment(augment) => augment.set_reference(reference),
        }
    }

    /// Sets the status. Modules carry no status and ignore it.
    pub fn set_status(&mut self, status: Status) {
        match self {
            Self::Module(_) => {}
            Self::Container(container) => container.set_status(status),
            Self::List(list) => list.set_status(status),
            Self::Grouping(grouping) => grouping.set_status(status),
            Self::Rpc(rpc) => rpc.set_status(status),
            Self::Augment(augment) => augment.set_status(status),
        }
    }

    /// Converts a container or list back into a child builder.
    pub fn into_data_node(self) -> Option<DataSchemaNodeBuilder> {
        match self {
            Self::Container(container) => Some(container.into()),
            Self::List(list) => Some(list.into()),
            _ => None,
        }
    }

    pub fn into_container(self) -> Option<ContainerSchemaNodeBuilder> {
        match self {
            Self::Container(container) => Some(container),
            _ => None,
        }
    }

    pub fn into_grouping(self) -> Option<GroupingBuilder> {
        match self {
            Self::Grouping(grouping) => Some(grouping),
            _ => None,
        }
    }

    pub fn into_rpc(self) -> Option<RpcDefinitionBuilder> {
        match self {
            Self::Rpc(rpc) => Some(rpc),
            _ => None,
        }
    }

    pub fn into_augment(self) -> Option<AugmentationSchemaBuilder> {
        match self {
            Self::Augment(augment) => Some(augment),
            _ => None,
        }
    }

    pub fn into_module(self) -> Option<ModuleBuilder> {
        match self {
            Self::Module(module) => Some(module),
            _ => None,
        }
    }
}

impl From<ModuleBuilder> for NodeBuilder {
    fn from(builder: ModuleBuilder) -> Self {
        Self::Module(builder)
    }
}

impl From<ContainerSchemaNodeBuilder> for NodeBuilder {
    fn from(builder: ContainerSchemaNodeBuilder) -> Self {
        Self::Container(builder)
    }
}

impl From<ListSchemaNodeBuilder> for NodeBuilder {
    fn from(builder: ListSchemaNodeBuilder) -> Self {
        Self::List(builder)
    }
}

impl From<GroupingBuilder> for NodeBuilder {
    fn from(builder: GroupingBuilder) -> Self {
        Self::Grouping(builder)
    }
}

impl From<RpcDefinitionBuilder> for NodeBuilder {
    fn from(builder: RpcDefinitionBuilder) -> Self {
        Self::Rpc(builder)
    }
}

impl From<AugmentationSchemaBuilder> for NodeBuilder {
    fn from(builder: AugmentationSchemaBuilder) -> Self {
        Self::Augment(builder)
    }
}
