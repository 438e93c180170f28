use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::{
    ContentBuilder, DataSchemaNodeBuilder, GroupingBuilder, RpcDefinitionBuilder,
    SchemaNodeBuilder, TypeDefinitionBuilder, UsesNodeBuilder,
};
use crate::error::{Result, SchemaError};
use crate::model::QNameMap;
use crate::resolve::{BuildOptions, GroupingLookup, Resolver};
use crate::{Module, QName, SchemaContext};

/// Builder for a `module` statement.
///
/// Top-level groupings are visible to every `uses` in the module, including
/// those inside RPC input and output.
#[derive(Debug, Clone)]
pub struct ModuleBuilder {
    name: String,
    prefix: String,
    namespace: String,
    revision: Option<NaiveDate>,
    description: Option<String>,
    content: ContentBuilder,
    rpcs: QNameMap<RpcDefinitionBuilder>,
}

impl ModuleBuilder {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            namespace: namespace.into(),
            revision: None,
            description: None,
            content: ContentBuilder::default(),
            rpcs: QNameMap::new(),
        }
    }

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

    pub fn set_revision(&mut self, revision: NaiveDate) {
        self.revision = Some(revision);
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    /// QName of `local_name` in this module's namespace and revision.
    pub fn qname(&self, local_name: &str) -> QName {
        QName::new(self.namespace.clone(), self.revision, local_name)
    }

    pub fn add_child_node(&mut self, child: impl Into<DataSchemaNodeBuilder>) -> Result<()> {
        self.content.add_child_node(child.into())
    }

    pub fn add_grouping(&mut self, grouping: GroupingBuilder) -> Result<()> {
        self.content.add_grouping(grouping)
    }

    pub fn add_typedef(&mut self, typedef: TypeDefinitionBuilder) -> Result<()> {
        self.content.add_typedef(typedef)
    }

    pub fn add_uses_node(&mut self, uses: UsesNodeBuilder) {
        self.content.add_uses_node(uses);
    }

    /// Adds an RPC.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateDefinition`] if an RPC builder with
    /// the same QName was already added.
    pub fn add_rpc(&mut self, rpc: RpcDefinitionBuilder) -> Result<()> {
        let qname = rpc.qname().clone();
        self.rpcs.insert_unique(qname, rpc, "rpc")
    }

    pub fn child_nodes(&self) -> &QNameMap<DataSchemaNodeBuilder> {
        self.content.children()
    }

    pub fn groupings(&self) -> &QNameMap<GroupingBuilder> {
        self.content.groupings()
    }

    pub fn rpcs(&self) -> &QNameMap<RpcDefinitionBuilder> {
        &self.rpcs
    }

    /// Compiles this module alone; `uses` outside the module resolve through
    /// `namespace`.
    pub fn build(&self, namespace: &dyn GroupingLookup) -> Result<Module> {
        self.build_with(namespace, &BuildOptions::default())
    }

    pub fn build_with(&self, namespace: &dyn GroupingLookup, options: &BuildOptions) -> Result<Module> {
        let mut resolver = Resolver::new(namespace, options);
        self.resolve(&mut resolver)
    }

    pub(crate) fn resolve<'a>(&'a self, resolver: &mut Resolver<'a>) -> Result<Module> {
        debug!(module = %self.name, "resolving module");
        let content = self.content.resolve(resolver)?;
        let rpcs = resolver.with_scope(self.content.groupings(), |resolver| {
            let mut rpcs = QNameMap::new();
            for (qname, rpc) in &self.rpcs {
                rpcs.insert_unique(qname.clone(), rpc.resolve(resolver)?, "rpc")?;
            }
            Ok(rpcs)
        })?;

        Ok(Module {
            name: self.name.clone(),
            prefix: self.prefix.clone(),
            namespace: self.namespace.clone(),
            revision: self.revision,
            description: self.description.clone(),
            content,
            rpcs,
        })
    }
}

/// Collects module builders and compiles them into a [`SchemaContext`].
///
/// The context is its own [`GroupingLookup`]: a `uses` in any module can
/// reach the top-level groupings of every module in the set.
///
/// # Examples
///
/// ```
/// use yang_model_core::*;
///
/// let mut base = ModuleBuilder::new("base", "urn:example:base", "b");
/// base.add_grouping(GroupingBuilder::new(base.qname("endpoint"))).unwrap();
///
/// let mut app = ModuleBuilder::new("app", "urn:example:app", "a");
/// let mut service = ContainerSchemaNodeBuilder::new(app.qname("service"));
/// service.add_uses_node(UsesNodeBuilder::new(base.qname("endpoint")));
/// app.add_child_node(service).unwrap();
///
/// let mut context = SchemaContextBuilder::new();
/// context.add_module(base).unwrap();
/// context.add_module(app).unwrap();
///
/// let schema = context.build().unwrap();
/// assert_eq!(schema.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaContextBuilder {
    modules: BTreeMap<String, ModuleBuilder>,
}

impl SchemaContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateModule`] if a module with the same
    /// name is already registered.
    pub fn add_module(&mut self, module: ModuleBuilder) -> Result<()> {
        if self.modules.contains_key(module.name()) {
            return Err(SchemaError::DuplicateModule(module.name().to_string()));
        }
        self.modules.insert(module.name().to_string(), module);
        Ok(())
    }

    pub fn module(&self, name: &str) -> Option<&ModuleBuilder> {
        self.modules.get(name)
    }

    pub fn module_mut(&mut self, name: &str) -> Option<&mut ModuleBuilder> {
        self.modules.get_mut(name)
    }

    /// Finds the module that owns `namespace` at `revision`.
    pub fn module_by_namespace(
        &self,
        namespace: &str,
        revision: Option<NaiveDate>,
    ) -> Option<&ModuleBuilder> {
        self.modules
            .values()
            .find(|module| module.namespace == namespace && module.revision == revision)
    }

    pub fn modules(&self) -> impl Iterator<Item = &ModuleBuilder> {
        self.modules.values()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn build(&self) -> Result<SchemaContext> {
        self.build_with(&BuildOptions::default())
    }

    /// Compiles every module with one shared resolver, so each grouping is
    /// resolved once however many modules use it.
    pub fn build_with(&self, options: &BuildOptions) -> Result<SchemaContext> {
        let mut resolver = Resolver::new(self, options);
        let mut modules = BTreeMap::new();
        for (name, builder) in &self.modules {
            let module = builder.resolve(&mut resolver).inspect_err(|err| {
                warn!(module = %name, error = %err, "module failed to compile");
            })?;
            modules.insert(name.clone(), Arc::new(module));
        }
        info!(modules = modules.len(), "compiled schema context");
        Ok(SchemaContext { modules })
    }
}

impl GroupingLookup for SchemaContextBuilder {
    fn lookup_grouping(&self, qname: &QName) -> Option<&GroupingBuilder> {
        self.module_by_namespace(qname.namespace(), qname.revision())?
            .groupings()
            .get(qname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        BuiltinType, ContainerSchemaNodeBuilder, DataNodeContainer, LeafSchemaNodeBuilder,
        TypeRef,
    };

    fn leaf_in(module: &ModuleBuilder, local_name: &str) -> LeafSchemaNodeBuilder {
        LeafSchemaNodeBuilder::new(module.qname(local_name), TypeRef::Builtin(BuiltinType::String))
    }

    #[test]
    fn test_duplicate_module_rejected() {
        let mut context = SchemaContextBuilder::new();
        context
            .add_module(ModuleBuilder::new("m", "urn:m", "m"))
            .unwrap();
        assert_eq!(
            context.add_module(ModuleBuilder::new("m", "urn:other", "o")),
            Err(SchemaError::DuplicateModule("m".to_string()))
        );
        assert_eq!(context.module("m").unwrap().namespace(), "urn:m");
    }

    #[test]
    fn test_duplicate_rpc_rejected() {
        let mut module = ModuleBuilder::new("m", "urn:m", "m");
        module.add_rpc(RpcDefinitionBuilder::new(module.qname("get"))).unwrap();
        let err = module
            .add_rpc(RpcDefinitionBuilder::new(module.qname("get")))
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateDefinition { statement: "rpc", .. }));
        assert_eq!(module.rpcs().len(), 1);
    }

    #[test]
    fn test_cross_module_uses_shares_one_grouping() {
        let mut base = ModuleBuilder::new("base", "urn:base", "b");
        let mut endpoint = GroupingBuilder::new(base.qname("endpoint"));
        endpoint.add_child_node(leaf_in(&base, "address")).unwrap();
        base.add_grouping(endpoint).unwrap();
        let endpoint_qname = base.qname("endpoint");

        let mut app = ModuleBuilder::new("app", "urn:app", "a");
        for name in ["client", "server"] {
            let mut container = ContainerSchemaNodeBuilder::new(app.qname(name));
            container.add_uses_node(UsesNodeBuilder::new(endpoint_qname.clone()));
            app.add_child_node(container).unwrap();
        }

        let mut context = SchemaContextBuilder::new();
        context.add_module(base).unwrap();
        context.add_module(app).unwrap();
        let schema = context.build().unwrap();

        let app = schema.module("app").unwrap();
        let grouping_of = |name: &str| {
            let container = app.data_child_by_name(name).unwrap().as_container().unwrap();
            Arc::clone(container.uses()[0].grouping())
        };
        assert!(Arc::ptr_eq(&grouping_of("client"), &grouping_of("server")));
        assert!(schema.find_grouping(&endpoint_qname).is_some());
    }

    #[test]
    fn test_rpc_sees_module_groupings() {
        let mut module = ModuleBuilder::new("m", "urn:m", "m");
        let mut g = GroupingBuilder::new(module.qname("status"));
        g.add_child_node(leaf_in(&module, "code")).unwrap();
        module.add_grouping(g).unwrap();

        let mut output = ContainerSchemaNodeBuilder::new(module.qname("output"));
        output.add_uses_node(UsesNodeBuilder::new(module.qname("status")));
        let mut rpc = RpcDefinitionBuilder::new(module.qname("ping"));
        rpc.set_input(ContainerSchemaNodeBuilder::new(module.qname("input")));
        rpc.set_output(output);
        module.add_rpc(rpc).unwrap();

        let built = module.build(&SchemaContextBuilder::new()).unwrap();
        let ping = built.rpc(&built.qname("ping")).unwrap();
        assert!(ping.output().uses()[0].data_child_by_name("code").is_some());
    }

    #[test]
    fn test_lookup_respects_revision() {
        let mut module = ModuleBuilder::new("m", "urn:m", "m");
        module.set_revision(NaiveDate::from_ymd_opt(2013, 7, 1).unwrap());
        module.add_grouping(GroupingBuilder::new(module.qname("g"))).unwrap();
        let mut context = SchemaContextBuilder::new();
        context.add_module(module).unwrap();

        let dated = QName::create("urn:m", "2013-07-01", "g").unwrap();
        let undated = QName::new("urn:m", None, "g");
        assert!(context.lookup_grouping(&dated).is_some());
        assert!(context.lookup_grouping(&undated).is_none());
    }
}
