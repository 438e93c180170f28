use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::{DataNodeContainer, DataSchemaNode, NodeMeta, QNameMap, SchemaContent, SchemaNode};
use crate::{QName, SchemaPath, Status};

/// A named, reusable bundle of schema content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupingDefinition {
    #[serde(flatten)]
    pub(crate) meta: NodeMeta,
    #[serde(flatten)]
    pub(crate) content: SchemaContent,
}

impl SchemaNode for GroupingDefinition {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }
}

impl DataNodeContainer for GroupingDefinition {
    fn content(&self) -> &SchemaContent {
        &self.content
    }
}

/// Content inserted into an inlined grouping at one use site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AugmentationSchema {
    pub(crate) target_path: SchemaPath,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) reference: Option<String>,
    pub(crate) status: Status,
    pub(crate) children: QNameMap<DataSchemaNode>,
}

impl AugmentationSchema {
    /// Target relative to the use site; empty targets the inlined root.
    pub fn target_path(&self) -> &SchemaPath {
        &self.target_path
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn child_nodes(&self) -> &QNameMap<DataSchemaNode> {
        &self.children
    }
}

/// A resolved `uses` statement.
///
/// Holds the target grouping and this use site's augmentations, plus the
/// effective content they produce together: the grouping's children, the
/// children its own `uses` inline, and the augmented nodes. The effective
/// content is owned by this node, so augmentations never leak into other
/// uses of the same grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsesNode {
    #[serde(rename = "grouping", serialize_with = "serialize_grouping_name")]
    pub(crate) grouping: Arc<GroupingDefinition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) augmentations: Vec<AugmentationSchema>,
    pub(crate) children: QNameMap<DataSchemaNode>,
}

fn serialize_grouping_name<S: Serializer>(
    grouping: &Arc<GroupingDefinition>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    grouping.qname().serialize(serializer)
}

impl UsesNode {
    /// QName of the grouping this statement inlines.
    pub fn grouping_qname(&self) -> &QName {
        self.grouping.qname()
    }

    /// The resolved grouping, shared with every other use of it in the same
    /// build.
    pub fn grouping(&self) -> &Arc<GroupingDefinition> {
        &self.grouping
    }

    pub fn augmentations(&self) -> &[AugmentationSchema] {
        &self.augmentations
    }

    /// Effective inlined content at this use site.
    pub fn child_nodes(&self) -> &QNameMap<DataSchemaNode> {
        &self.children
    }

    pub fn data_child_by_qname(&self, qname: &QName) -> Option<&DataSchemaNode> {
        self.children.get(qname)
    }

    pub fn data_child_by_name(&self, local_name: &str) -> Option<&DataSchemaNode> {
        self.children.find_by_local_name(local_name)
    }
}
