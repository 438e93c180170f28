//! Output formatting for compiled schema models.

use serde::Serialize;
use yang_model_core::{
    DataNodeContainer, DataSchemaNode, GroupingDefinition, QNameMap, RpcDefinition, SchemaContext,
    SchemaNode, Status, UsesNode,
};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}

impl OutputFormat {
    /// File extension used when writing this format to disk.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Table => "txt",
        }
    }
}

/// Formats a whole compiled context.
pub fn format_context(context: &SchemaContext, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Table => Ok(context_to_table(context)),
        _ => serialize(context, format),
    }
}

/// Formats one grouping definition.
pub fn format_grouping(
    grouping: &GroupingDefinition,
    format: OutputFormat,
) -> Result<String, String> {
    match format {
        OutputFormat::Table => Ok(grouping_to_table(grouping)),
        _ => serialize(grouping, format),
    }
}

/// Formats one RPC definition.
pub fn format_rpc(rpc: &RpcDefinition, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Table => Ok(rpc_to_table(rpc)),
        _ => serialize(rpc, format),
    }
}

fn serialize<T: Serialize>(value: &T, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Table => Err("table output is not available for this value".to_string()),
    }
}

fn status_name(status: Status) -> &'static str {
    match status {
        Status::Current => "current",
        Status::Deprecated => "deprecated",
        Status::Obsolete => "obsolete",
    }
}

fn context_to_table(context: &SchemaContext) -> String {
    let mut out = String::new();

    for module in context.modules() {
        out.push_str(&format!("Module: {}  Prefix: {}", module.name(), module.prefix()));
        if let Some(revision) = module.revision() {
            out.push_str(&format!("  Revision: {revision}"));
        }
        out.push('\n');
        out.push_str(&format!("  Namespace: {}\n", module.namespace()));
        if let Some(desc) = module.description() {
            out.push_str(&format!("  {desc}\n"));
        }
        out.push_str(&format!(
            "  Data nodes: {}  Groupings: {}  Typedefs: {}  RPCs: {}\n",
            module.child_nodes().len(),
            module.groupings().len(),
            module.typedefs().len(),
            module.rpcs().len()
        ));
    }

    out
}

fn grouping_to_table(grouping: &GroupingDefinition) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Grouping: {}  Path: {}  Status: {}\n",
        grouping.qname().local_name(),
        grouping.path(),
        status_name(grouping.status())
    ));
    if let Some(desc) = grouping.description() {
        out.push_str(&format!("  {desc}\n"));
    }

    if !grouping.child_nodes().is_empty() {
        out.push_str("\nChildren:\n");
        children_to_table(&mut out, grouping.child_nodes(), 1);
    }

    if !grouping.uses().is_empty() {
        out.push_str("\nUses:\n");
        uses_to_table(&mut out, grouping.uses(), 1);
    }

    out
}

fn rpc_to_table(rpc: &RpcDefinition) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "RPC: {}  Path: {}  Status: {}\n",
        rpc.qname().local_name(),
        rpc.path(),
        status_name(rpc.status())
    ));
    if let Some(desc) = rpc.description() {
        out.push_str(&format!("  {desc}\n"));
    }

    for (label, container) in [("Input", rpc.input()), ("Output", rpc.output())] {
        out.push_str(&format!("\n{label}:\n"));
        if container.child_nodes().is_empty() && container.uses().is_empty() {
            out.push_str("  (empty)\n");
            continue;
        }
        children_to_table(&mut out, container.child_nodes(), 1);
        uses_to_table(&mut out, container.uses(), 1);
    }

    out
}

fn children_to_table(out: &mut String, children: &QNameMap<DataSchemaNode>, depth: usize) {
    let indent = "  ".repeat(depth);
    let max_name = children
        .keys()
        .map(|qname| qname.local_name().len())
        .max()
        .unwrap_or(4);

    for child in children.values() {
        let name = child.qname().local_name();
        let detail = match child {
            DataSchemaNode::Leaf(leaf) => leaf.type_ref().to_string(),
            DataSchemaNode::LeafList(leaf_list) => leaf_list.type_ref().to_string(),
            DataSchemaNode::List(list) => {
                let keys: Vec<_> = list.keys().iter().map(|k| k.local_name()).collect();
                format!("key [{}]", keys.join(", "))
            }
            DataSchemaNode::Container(_) => String::new(),
        };
        out.push_str(&format!(
            "{indent}{:<width$}  {:<9}  {detail}\n",
            name,
            child.kind().as_str(),
            width = max_name
        ));
        let nested: Option<&dyn DataNodeContainer> = match child {
            DataSchemaNode::Container(container) => Some(container),
            DataSchemaNode::List(list) => Some(list),
            DataSchemaNode::Leaf(_) | DataSchemaNode::LeafList(_) => None,
        };
        if let Some(nested) = nested {
            children_to_table(out, nested.child_nodes(), depth + 1);
            uses_to_table(out, nested.uses(), depth + 1);
        }
    }
}

fn uses_to_table(out: &mut String, uses: &[UsesNode], depth: usize) {
    let indent = "  ".repeat(depth);
    for node in uses {
        out.push_str(&format!(
            "{indent}uses {}  ({} children, {} augmentations)\n",
            node.grouping_qname(),
            node.child_nodes().len(),
            node.augmentations().len()
        ));
        children_to_table(out, node.child_nodes(), depth + 1);
    }
}
