//! Drives core builders from statement-tree documents.
//!
//! The driver walks a document body and forwards each statement to the
//! enclosing [`NodeBuilder`]. It never checks which statements a node kind
//! may hold: the builders reject illegal combinations, so an `rpc` with a
//! direct `leaf` fails with the same
//! [`SchemaError::UnsupportedStructure`] a hand-written parser would see.

use std::collections::HashMap;

use tracing::{debug, trace};
use yang_model_core::{
    AugmentationSchemaBuilder, BuiltinType, ContainerSchemaNodeBuilder, GroupingBuilder,
    LeafListSchemaNodeBuilder, LeafSchemaNodeBuilder, ListSchemaNodeBuilder, ModuleBuilder,
    NodeBuilder, QName, RpcDefinitionBuilder, SchemaError, SchemaNodeBuilder, SchemaPath,
    TypeDefinitionBuilder, TypeRef, UsesNodeBuilder, parse_revision,
};

use crate::document::{AugmentStatement, ModuleDocument, Statement, StatementMeta};
use crate::error::{LoaderError, Result};

/// Namespace and revision of a loaded module, keyed by module name.
pub(crate) type ModuleHeaders = HashMap<String, QName>;

/// Returns a QName with an empty local name that carries the module's
/// namespace and revision.
pub(crate) fn module_header(document: &ModuleDocument) -> Result<QName> {
    let revision = document
        .revision
        .as_deref()
        .map(parse_revision)
        .transpose()
        .map_err(|source| LoaderError::Module {
            module: document.module.clone(),
            source,
        })?;
    Ok(QName::new(document.namespace.clone(), revision, ""))
}

/// Populates a [`ModuleBuilder`] from one document.
pub(crate) struct ModuleDriver<'d> {
    document: &'d ModuleDocument,
    own: QName,
    prefixes: HashMap<&'d str, QName>,
}

impl<'d> ModuleDriver<'d> {
    /// Resolves the document's own prefix and its imports against `headers`.
    pub(crate) fn new(document: &'d ModuleDocument, headers: &ModuleHeaders) -> Result<Self> {
        let own = module_header(document)?;
        let mut prefixes = HashMap::new();
        prefixes.insert(document.prefix.as_str(), own.clone());
        for import in &document.imports {
            let header =
                headers
                    .get(&import.module)
                    .ok_or_else(|| LoaderError::UnknownImport {
                        module: document.module.clone(),
                        import: import.module.clone(),
                    })?;
            prefixes.insert(import.prefix.as_str(), header.clone());
        }
        Ok(Self {
            document,
            own,
            prefixes,
        })
    }

    pub(crate) fn drive(&self) -> Result<ModuleBuilder> {
        let document = self.document;
        let mut module = ModuleBuilder::new(&document.module, &document.namespace, &document.prefix);
        if let Some(revision) = self.own.revision() {
            module.set_revision(revision);
        }
        if let Some(description) = &document.description {
            module.set_description(description);
        }

        let mut node = NodeBuilder::from(module);
        self.fill(&mut node, &document.body, &SchemaPath::root())?;
        debug!(
            module = %document.module,
            statements = document.body.len(),
            "populated module builder"
        );
        self.take(node, "module", NodeBuilder::into_module)
    }

    /// Unwraps the concrete builder a statement was filled into.
    fn take<T>(
        &self,
        node: NodeBuilder,
        statement: &'static str,
        extract: impl FnOnce(NodeBuilder) -> Option<T>,
    ) -> Result<T> {
        let kind = node.kind();
        let name = node.display_name();
        extract(node).ok_or_else(|| {
            self.schema_error(SchemaError::UnsupportedStructure {
                kind,
                node: name,
                statement,
            })
        })
    }

    fn schema_error(&self, source: SchemaError) -> LoaderError {
        LoaderError::Module {
            module: self.document.module.clone(),
            source,
        }
    }

    /// QName of a definition declared in this module.
    fn local(&self, name: &str) -> QName {
        self.own.sibling(name)
    }

    /// Resolves a `prefix:name` or bare reference.
    fn reference(&self, name: &str) -> Result<QName> {
        match name.split_once(':') {
            Some((prefix, local)) => self
                .prefixes
                .get(prefix)
                .map(|header| header.sibling(local))
                .ok_or_else(|| LoaderError::UnknownPrefix {
                    module: self.document.module.clone(),
                    prefix: prefix.to_string(),
                }),
            None => Ok(self.local(name)),
        }
    }

    fn type_ref(&self, type_name: &str) -> Result<TypeRef> {
        if !type_name.contains(':') {
            if let Ok(builtin) = type_name.parse::<BuiltinType>() {
                return Ok(TypeRef::Builtin(builtin));
            }
        }
        Ok(TypeRef::Derived(self.reference(type_name)?))
    }

    fn fill(&self, parent: &mut NodeBuilder, body: &[Statement], path: &SchemaPath) -> Result<()> {
        for statement in body {
            trace!(statement = statement.keyword(), parent = %parent.display_name(), "driving statement");
            self.apply(parent, statement, path)?;
        }
        Ok(())
    }

    fn apply(&self, parent: &mut NodeBuilder, statement: &Statement, path: &SchemaPath) -> Result<()> {
        match statement {
            Statement::Container(container) => {
                let qname = self.local(&container.name);
                let path = path.create_child(qname.clone());
                let mut builder = ContainerSchemaNodeBuilder::new(qname);
                builder.set_path(path.clone());
                builder.set_presence(container.presence);
                let mut node = NodeBuilder::from(builder);
                apply_meta(&mut node, &container.meta);
                self.fill(&mut node, &container.body, &path)?;
                self.attach(parent, node)
            }
            Statement::List(list) => {
                let qname = self.local(&list.name);
                let path = path.create_child(qname.clone());
                let mut builder = ListSchemaNodeBuilder::new(qname);
                builder.set_path(path.clone());
                for key in &list.key {
                    builder.add_key(self.local(key));
                }
                let mut node = NodeBuilder::from(builder);
                apply_meta(&mut node, &list.meta);
                self.fill(&mut node, &list.body, &path)?;
                self.attach(parent, node)
            }
            Statement::Grouping(grouping) => {
                let qname = self.local(&grouping.name);
                let path = path.create_child(qname.clone());
                let mut builder = GroupingBuilder::new(qname);
                builder.set_path(path.clone());
                let mut node = NodeBuilder::from(builder);
                apply_meta(&mut node, &grouping.meta);
                self.fill(&mut node, &grouping.body, &path)?;
                self.attach(parent, node)
            }
            Statement::Rpc(rpc) => {
                let qname = self.local(&rpc.name);
                let path = path.create_child(qname.clone());
                let mut builder = RpcDefinitionBuilder::new(qname);
                builder.set_path(path.clone());
                let mut node = NodeBuilder::from(builder);
                apply_meta(&mut node, &rpc.meta);
                self.fill(&mut node, &rpc.body, &path)?;
                self.attach(parent, node)
            }
            Statement::Leaf(leaf) => {
                let qname = self.local(&leaf.name);
                let mut builder = LeafSchemaNodeBuilder::new(qname.clone(), self.type_ref(&leaf.type_name)?);
                builder.set_path(path.create_child(qname));
                if let Some(default) = &leaf.default {
                    builder.set_default_value(default);
                }
                if let Some(units) = &leaf.units {
                    builder.set_units(units);
                }
                builder.set_mandatory(leaf.mandatory);
                apply_builder_meta(&mut builder, &leaf.meta);
                parent
                    .add_child_node(builder)
                    .map_err(|err| self.schema_error(err))
            }
            Statement::LeafList(leaf_list) => {
                let qname = self.local(&leaf_list.name);
                let mut builder =
                    LeafListSchemaNodeBuilder::new(qname.clone(), self.type_ref(&leaf_list.type_name)?);
                builder.set_path(path.create_child(qname));
                if let Some(units) = &leaf_list.units {
                    builder.set_units(units);
                }
                apply_builder_meta(&mut builder, &leaf_list.meta);
                parent
                    .add_child_node(builder)
                    .map_err(|err| self.schema_error(err))
            }
            Statement::Typedef(typedef) => {
                let qname = self.local(&typedef.name);
                let mut builder =
                    TypeDefinitionBuilder::new(qname.clone(), self.type_ref(&typedef.type_name)?);
                builder.set_path(path.create_child(qname));
                if let Some(default) = &typedef.default {
                    builder.set_default_value(default);
                }
                if let Some(units) = &typedef.units {
                    builder.set_units(units);
                }
                apply_builder_meta(&mut builder, &typedef.meta);
                parent
                    .add_typedef(builder)
                    .map_err(|err| self.schema_error(err))
            }
            Statement::Uses(uses) => {
                let mut builder = UsesNodeBuilder::new(self.reference(&uses.grouping)?);
                for augment in &uses.augments {
                    builder.add_augment(self.augment(augment, path)?);
                }
                parent
                    .add_uses_node(builder)
                    .map_err(|err| self.schema_error(err))
            }
            Statement::Input(body) | Statement::Output(body) => {
                let qname = self.local(statement.keyword());
                let path = path.create_child(qname.clone());
                let mut builder = ContainerSchemaNodeBuilder::new(qname);
                builder.set_path(path.clone());
                let mut node = NodeBuilder::from(builder);
                self.fill(&mut node, &body.body, &path)?;
                let container = self.take(node, statement.keyword(), NodeBuilder::into_container)?;
                let result = match statement {
                    Statement::Input(_) => parent.set_input(container),
                    _ => parent.set_output(container),
                };
                result.map_err(|err| self.schema_error(err))
            }
        }
    }

    /// Adds a finished container, list, grouping or rpc to `parent`.
    fn attach(&self, parent: &mut NodeBuilder, child: NodeBuilder) -> Result<()> {
        parent.add_node(child).map_err(|err| self.schema_error(err))
    }

    fn augment(&self, augment: &AugmentStatement, path: &SchemaPath) -> Result<AugmentationSchemaBuilder> {
        let steps = augment
            .target
            .split('/')
            .filter(|step| !step.is_empty() && *step != ".")
            .map(|step| self.reference(step))
            .collect::<Result<Vec<_>>>()?;
        let mut target_path = path.clone();
        for step in &steps {
            target_path = target_path.create_child(step.clone());
        }

        let mut node = NodeBuilder::from(AugmentationSchemaBuilder::new(SchemaPath::relative(steps)));
        apply_meta(&mut node, &augment.meta);
        self.fill(&mut node, &augment.body, &target_path)?;
        self.take(node, "augment", NodeBuilder::into_augment)
    }
}

fn apply_meta(node: &mut NodeBuilder, meta: &StatementMeta) {
    if let Some(description) = &meta.description {
        node.set_description(description);
    }
    if let Some(reference) = &meta.reference {
        node.set_reference(reference);
    }
    if let Some(status) = meta.status {
        node.set_status(status);
    }
}

fn apply_builder_meta(builder: &mut impl SchemaNodeBuilder, meta: &StatementMeta) {
    if let Some(description) = &meta.description {
        builder.set_description(description);
    }
    if let Some(reference) = &meta.reference {
        builder.set_reference(reference);
    }
    if let Some(status) = meta.status {
        builder.set_status(status);
    }
}
