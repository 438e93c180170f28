use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::{DataNodeContainer, NodeMeta, SchemaContent, SchemaNode};
use crate::{NodeKind, QName};
use crate::error::SchemaError;

/// YANG built-in types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuiltinType {
    Binary,
    Bits,
    Boolean,
    Decimal64,
    Empty,
    Enumeration,
    Identityref,
    InstanceIdentifier,
    Int8,
    Int16,
    Int32,
    Int64,
    Leafref,
    String,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Union,
}

impl BuiltinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Bits => "bits",
            Self::Boolean => "boolean",
            Self::Decimal64 => "decimal64",
            Self::Empty => "empty",
            Self::Enumeration => "enumeration",
            Self::Identityref => "identityref",
            Self::InstanceIdentifier => "instance-identifier",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Leafref => "leafref",
            Self::String => "string",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Union => "union",
        }
    }
}

impl fmt::Display for BuiltinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuiltinType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let builtin = match s {
            "binary" => Self::Binary,
            "bits" => Self::Bits,
            "boolean" => Self::Boolean,
            "decimal64" => Self::Decimal64,
            "empty" => Self::Empty,
            "enumeration" => Self::Enumeration,
            "identityref" => Self::Identityref,
            "instance-identifier" => Self::InstanceIdentifier,
            "int8" => Self::Int8,
            "int16" => Self::Int16,
            "int32" => Self::Int32,
            "int64" => Self::Int64,
            "leafref" => Self::Leafref,
            "string" => Self::String,
            "uint8" => Self::Uint8,
            "uint16" => Self::Uint16,
            "uint32" => Self::Uint32,
            "uint64" => Self::Uint64,
            "union" => Self::Union,
            other => return Err(SchemaError::UnknownBuiltinType(other.to_string())),
        };
        Ok(builtin)
    }
}

/// Type of a leaf, leaf-list or typedef: a built-in or a named typedef.
///
/// Derived references are kept by name; the model does not chase typedef
/// chains.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeRef {
    Builtin(BuiltinType),
    Derived(QName),
}

impl Default for TypeRef {
    fn default() -> Self {
        Self::Builtin(BuiltinType::String)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(builtin) => builtin.fmt(f),
            Self::Derived(qname) => qname.fmt(f),
        }
    }
}

/// A named, reusable type definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDefinition {
    #[serde(flatten)]
    pub(crate) meta: NodeMeta,
    pub(crate) base_type: TypeRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) default_value: Option<String>,
}

impl TypeDefinition {
    pub fn base_type(&self) -> &TypeRef {
        &self.base_type
    }

    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }
}

impl SchemaNode for TypeDefinition {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }
}

/// A container node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerSchemaNode {
    #[serde(flatten)]
    pub(crate) meta: NodeMeta,
    pub(crate) presence: bool,
    #[serde(flatten)]
    pub(crate) content: SchemaContent,
}

impl ContainerSchemaNode {
    /// Returns `true` for a presence container.
    pub fn is_presence(&self) -> bool {
        self.presence
    }
}

impl SchemaNode for ContainerSchemaNode {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }
}

impl DataNodeContainer for ContainerSchemaNode {
    fn content(&self) -> &SchemaContent {
        &self.content
    }
}

/// A keyed list node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListSchemaNode {
    #[serde(flatten)]
    pub(crate) meta: NodeMeta,
    pub(crate) keys: Vec<QName>,
    #[serde(flatten)]
    pub(crate) content: SchemaContent,
}

impl ListSchemaNode {
    pub fn keys(&self) -> &[QName] {
        &self.keys
    }
}

impl SchemaNode for ListSchemaNode {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }
}

impl DataNodeContainer for ListSchemaNode {
    fn content(&self) -> &SchemaContent {
        &self.content
    }
}

/// A leaf node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeafSchemaNode {
    #[serde(flatten)]
    pub(crate) meta: NodeMeta,
    #[serde(rename = "type")]
    pub(crate) type_ref: TypeRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) default_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) units: Option<String>,
    pub(crate) mandatory: bool,
}

impl LeafSchemaNode {
    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }
}

impl SchemaNode for LeafSchemaNode {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }
}

/// A leaf-list node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeafListSchemaNode {
    #[serde(flatten)]
    pub(crate) meta: NodeMeta,
    #[serde(rename = "type")]
    pub(crate) type_ref: TypeRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) units: Option<String>,
}

impl LeafListSchemaNode {
    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }
}

impl SchemaNode for LeafListSchemaNode {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }
}

/// Any data node that can appear as a child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DataSchemaNode {
    Container(ContainerSchemaNode),
    List(ListSchemaNode),
    Leaf(LeafSchemaNode),
    LeafList(LeafListSchemaNode),
}

impl DataSchemaNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Container(_) => NodeKind::Container,
            Self::List(_) => NodeKind::List,
            Self::Leaf(_) => NodeKind::Leaf,
            Self::LeafList(_) => NodeKind::LeafList,
        }
    }

    pub fn as_container(&self) -> Option<&ContainerSchemaNode> {
        match self {
            Self::Container(container) => Some(container),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListSchemaNode> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafSchemaNode> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    pub fn as_leaf_list(&self) -> Option<&LeafListSchemaNode> {
        match self {
            Self::LeafList(leaf_list) => Some(leaf_list),
            _ => None,
        }
    }

    /// Child content of a container or list.
    pub fn content(&self) -> Option<&SchemaContent> {
        match self {
            Self::Container(container) => Some(&container.content),
            Self::List(list) => Some(&list.content),
            Self::Leaf(_) | Self::LeafList(_) => None,
        }
    }

    pub(crate) fn content_mut(&mut self) -> Option<&mut SchemaContent> {
        match self {
            Self::Container(container) => Some(&mut container.content),
            Self::List(list) => Some(&mut list.content),
            Self::Leaf(_) | Self::LeafList(_) => None,
        }
    }
}

impl SchemaNode for DataSchemaNode {
    fn meta(&self) -> &NodeMeta {
        match self {
            Self::Container(container) => &container.meta,
            Self::List(list) => &list.meta,
            Self::Leaf(leaf) => &leaf.meta,
            Self::LeafList(leaf_list) => &leaf_list.meta,
        }
    }
}
