use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use super::{DataNodeContainer, GroupingDefinition, QNameMap, RpcDefinition, SchemaContent};
use crate::QName;

/// A compiled schema module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Module {
    pub(crate) name: String,
    pub(crate) prefix: String,
    pub(crate) namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) revision: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
    #[serde(flatten)]
    pub(crate) content: SchemaContent,
    #[serde(skip_serializing_if = "QNameMap::is_empty")]
    pub(crate) rpcs: QNameMap<RpcDefinition>,
}

impl Module {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn revision(&self) -> Option<NaiveDate> {
        self.revision
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// QName of `local_name` in this module's namespace and revision.
    pub fn qname(&self, local_name: &str) -> QName {
        QName::new(self.namespace.clone(), self.revision, local_name)
    }

    pub fn rpcs(&self) -> &QNameMap<RpcDefinition> {
        &self.rpcs
    }

    pub fn rpc(&self, qname: &QName) -> Option<&RpcDefinition> {
        self.rpcs.get(qname)
    }
}

impl DataNodeContainer for Module {
    fn content(&self) -> &SchemaContent {
        &self.content
    }
}

/// The frozen result of compiling a set of modules.
///
/// Modules are shared behind [`Arc`] so the whole context can be handed to
/// any number of reader threads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaContext {
    pub(crate) modules: BTreeMap<String, Arc<Module>>,
}

impl SchemaContext {
    pub fn module(&self, name: &str) -> Option<&Arc<Module>> {
        self.modules.get(name)
    }

    /// Modules in name order.
    pub fn modules(&self) -> impl Iterator<Item = &Arc<Module>> {
        self.modules.values()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    fn module_for(&self, qname: &QName) -> Option<&Arc<Module>> {
        self.modules.values().find(|module| {
            module.namespace == qname.namespace() && module.revision == qname.revision()
        })
    }

    /// Finds a top-level grouping by QName.
    pub fn find_grouping(&self, qname: &QName) -> Option<&GroupingDefinition> {
        self.module_for(qname)?.groupings().get(qname)
    }

    /// Finds an RPC by QName.
    pub fn find_rpc(&self, qname: &QName) -> Option<&RpcDefinition> {
        self.module_for(qname)?.rpc(qname)
    }
}
