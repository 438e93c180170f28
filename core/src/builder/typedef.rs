use super::SchemaNodeBuilder;
use crate::model::NodeMeta;
use crate::{QName, TypeDefinition, TypeRef};

/// Builder for a `typedef` statement.
#[derive(Debug, Clone)]
pub struct TypeDefinitionBuilder {
    meta: NodeMeta,
    base_type: TypeRef,
    units: Option<String>,
    default_value: Option<String>,
}

impl TypeDefinitionBuilder {
    pub fn new(qname: QName, base_type: TypeRef) -> Self {
        Self {
            meta: NodeMeta::new(qname),
            base_type,
            units: None,
            default_value: None,
        }
    }

    pub fn set_units(&mut self, units: impl Into<String>) {
        self.units = Some(units.into());
    }

    pub fn set_default_value(&mut self, default_value: impl Into<String>) {
        self.default_value = Some(default_value.into());
    }

    pub fn build(&self) -> TypeDefinition {
        TypeDefinition {
            meta: self.meta.clone(),
            base_type: self.base_type.clone(),
            units: self.units.clone(),
            default_value: self.default_value.clone(),
        }
    }
}

impl SchemaNodeBuilder for TypeDefinitionBuilder {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        &mut self.meta
    }
}
