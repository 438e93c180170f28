//! Statement-tree documents.
//!
//! A document is an already-parsed module: its header plus a tree of
//! statements, stored as JSON or YAML. Names inside a document are local
//! names, or `prefix:name` for definitions imported from another module.
//!
//! # Example YAML
//!
//! ```yaml
//! module: interfaces
//! namespace: "urn:example:interfaces"
//! prefix: if
//! revision: "2013-07-01"
//! imports:
//!   - module: inet-types
//!     prefix: inet
//! body:
//!   - statement: grouping
//!     name: endpoint
//!     body:
//!       - statement: leaf
//!         name: address
//!         type: inet:ip-address
//!   - statement: container
//!     name: server
//!     body:
//!       - statement: uses
//!         grouping: endpoint
//!         augments:
//!           - target: ""
//!             body:
//!               - statement: leaf
//!                 name: port
//!                 type: uint16
//! ```

use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use yang_model_core::Status;

use crate::error::{LoaderError, Result};

/// One module in statement-tree form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDocument {
    /// Module name, unique within a schema context.
    pub module: String,
    /// Namespace URI shared by every definition in the module.
    pub namespace: String,
    /// Prefix that refers to this module inside its own statements.
    pub prefix: String,
    /// Revision date in `YYYY-MM-DD` form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<Import>,
    #[serde(default)]
    pub body: Vec<Statement>,
}

/// An `import` of another module under a local prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    pub module: String,
    pub prefix: String,
}

/// Description, reference and status shared by named statements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

/// A statement in a module or node body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "statement", rename_all = "kebab-case")]
pub enum Statement {
    Container(ContainerStatement),
    List(ListStatement),
    Leaf(LeafStatement),
    LeafList(LeafListStatement),
    Grouping(GroupingStatement),
    Typedef(TypedefStatement),
    Uses(UsesStatement),
    Rpc(RpcStatement),
    Input(BodyStatement),
    Output(BodyStatement),
}

impl Statement {
    /// Statement keyword, as written in documents.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Container(_) => "container",
            Self::List(_) => "list",
            Self::Leaf(_) => "leaf",
            Self::LeafList(_) => "leaf-list",
            Self::Grouping(_) => "grouping",
            Self::Typedef(_) => "typedef",
            Self::Uses(_) => "uses",
            Self::Rpc(_) => "rpc",
            Self::Input(_) => "input",
            Self::Output(_) => "output",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerStatement {
    pub name: String,
    #[serde(default)]
    pub presence: bool,
    #[serde(flatten)]
    pub meta: StatementMeta,
    #[serde(default)]
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListStatement {
    pub name: String,
    /// Key leaf names.
    #[serde(default)]
    pub key: Vec<String>,
    #[serde(flatten)]
    pub meta: StatementMeta,
    #[serde(default)]
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafStatement {
    pub name: String,
    /// Built-in type name or a (possibly prefixed) typedef name.
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(flatten)]
    pub meta: StatementMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafListStatement {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(flatten)]
    pub meta: StatementMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupingStatement {
    pub name: String,
    #[serde(flatten)]
    pub meta: StatementMeta,
    #[serde(default)]
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedefStatement {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(flatten)]
    pub meta: StatementMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsesStatement {
    /// Grouping name, optionally `prefix:name`.
    pub grouping: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub augments: Vec<AugmentStatement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentStatement {
    /// Slash-separated path below the use site; empty for the use site itself.
    #[serde(default)]
    pub target: String,
    #[serde(flatten)]
    pub meta: StatementMeta,
    #[serde(default)]
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcStatement {
    pub name: String,
    #[serde(flatten)]
    pub meta: StatementMeta,
    #[serde(default)]
    pub body: Vec<Statement>,
}

/// Body of an `input` or `output` statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyStatement {
    #[serde(default)]
    pub body: Vec<Statement>,
}

/// Serialization format of a document file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Detects the format from a file extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use yang_model_loader::DocumentFormat;
    ///
    /// assert_eq!(DocumentFormat::from_path("a/b.yml"), Some(DocumentFormat::Yaml));
    /// assert_eq!(DocumentFormat::from_path("a/b.json"), Some(DocumentFormat::Json));
    /// assert_eq!(DocumentFormat::from_path("a/b.yang"), None);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some("json") => Some(Self::Json),
            Some("yaml" | "yml") => Some(Self::Yaml),
            _ => None,
        }
    }
}

impl ModuleDocument {
    /// Reads a document, choosing the format from the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::UnsupportedFormat`] for unknown extensions,
    /// [`LoaderError::IoError`] if the file cannot be read, or a JSON/YAML
    /// error if parsing fails.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = DocumentFormat::from_path(path)
            .ok_or_else(|| LoaderError::UnsupportedFormat(path.to_path_buf()))?;
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let document = match format {
            DocumentFormat::Json => serde_json::from_reader(reader)?,
            DocumentFormat::Yaml => serde_yaml::from_reader(reader)?,
        };
        Ok(document)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
module: interfaces
namespace: "urn:example:interfaces"
prefix: if
revision: "2013-07-01"
imports:
  - module: inet-types
    prefix: inet
body:
  - statement: grouping
    name: endpoint
    description: Address and port
    body:
      - statement: leaf
        name: address
        type: inet:ip-address
        mandatory: true
  - statement: list
    name: server
    key: [name]
    body:
      - statement: leaf
        name: name
        type: string
      - statement: uses
        grouping: endpoint
        augments:
          - target: ""
            body:
              - statement: leaf-list
                name: alias
                type: string
  - statement: rpc
    name: reset
    status: deprecated
    body:
      - statement: input
        body:
          - statement: leaf
            name: delay
            type: uint32
            units: seconds
      - statement: output
"#;

    #[test]
    fn test_deserialize_yaml_document() {
        let document = ModuleDocument::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(document.module, "interfaces");
        assert_eq!(document.revision.as_deref(), Some("2013-07-01"));
        assert_eq!(document.imports[0].prefix, "inet");
        let keywords: Vec<_> = document.body.iter().map(Statement::keyword).collect();
        assert_eq!(keywords, vec!["grouping", "list", "rpc"]);

        let Statement::Grouping(grouping) = &document.body[0] else {
            panic!("expected grouping");
        };
        assert_eq!(grouping.meta.description.as_deref(), Some("Address and port"));
        let Statement::Leaf(leaf) = &grouping.body[0] else {
            panic!("expected leaf");
        };
        assert_eq!(leaf.type_name, "inet:ip-address");
        assert!(leaf.mandatory);

        let Statement::Rpc(rpc) = &document.body[2] else {
            panic!("expected rpc");
        };
        assert_eq!(rpc.meta.status, Some(Status::Deprecated));
        assert_eq!(rpc.body[1], Statement::Output(BodyStatement::default()));
    }

    #[test]
    fn test_json_and_yaml_agree() {
        let from_yaml = ModuleDocument::from_yaml_str(SAMPLE).unwrap();
        let json = serde_json::to_string(&from_yaml).unwrap();
        let from_json = ModuleDocument::from_json_str(&json).unwrap();
        assert_eq!(from_yaml, from_json);
    }

    #[test]
    fn test_unknown_statement_rejected() {
        let yaml = r#"
module: m
namespace: "urn:m"
prefix: m
body:
  - statement: choice
    name: c
"#;
        assert!(matches!(
            ModuleDocument::from_yaml_str(yaml),
            Err(LoaderError::YamlError(_))
        ));
    }
}
