use std::hash::{Hash, Hasher};

use tracing::debug;

use super::{
    ContainerSchemaNodeBuilder, GroupingBuilder, SchemaNodeBuilder, TypeDefinitionBuilder,
    build_typedefs, resolve_groupings,
};
use crate::error::{Result, SchemaError};
use crate::model::{NodeMeta, QNameMap};
use crate::resolve::{BuildOptions, GroupingLookup, Resolver};
use crate::{QName, RpcDefinition};

/// Builder for an `rpc` statement.
///
/// An RPC holds one input and one output container plus local typedefs and
/// groupings. There is no way to add direct children or `uses` to this type;
/// [`NodeBuilder::Rpc`](crate::NodeBuilder::Rpc) rejects them at runtime for
/// drivers that dispatch dynamically.
///
/// Builders compare equal by QName alone, so the same operation collected
/// twice during a multi-pass parse can be de-duplicated before it is built.
///
/// # Examples
///
/// ```
/// use yang_model_core::*;
///
/// let get = QName::new("urn:example", None, "get");
/// let mut rpc = RpcDefinitionBuilder::new(get.clone());
/// rpc.set_input(ContainerSchemaNodeBuilder::new(get.sibling("input")));
///
/// let err = rpc.build(&GroupingNamespace::new()).unwrap_err();
/// assert_eq!(err, SchemaError::MissingOutput(get));
/// ```
#[derive(Debug, Clone)]
pub struct RpcDefinitionBuilder {
    meta: NodeMeta,
    input: Option<ContainerSchemaNodeBuilder>,
    output: Option<ContainerSchemaNodeBuilder>,
    typedefs: QNameMap<TypeDefinitionBuilder>,
    groupings: QNameMap<GroupingBuilder>,
}

impl RpcDefinitionBuilder {
    pub fn new(qname: QName) -> Self {
        Self {
            meta: NodeMeta::new(qname),
            input: None,
            output: None,
            typedefs: QNameMap::new(),
            groupings: QNameMap::new(),
        }
    }

    /// Sets the input container, replacing any earlier one.
    pub fn set_input(&mut self, input: ContainerSchemaNodeBuilder) {
        self.input = Some(input);
    }

    /// Sets the output container, replacing any earlier one.
    pub fn set_output(&mut self, output: ContainerSchemaNodeBuilder) {
        self.output = Some(output);
    }

    pub fn input(&self) -> Option<&ContainerSchemaNodeBuilder> {
        self.input.as_ref()
    }

    pub fn output(&self) -> Option<&ContainerSchemaNodeBuilder> {
        self.output.as_ref()
    }

    pub fn add_typedef(&mut self, typedef: TypeDefinitionBuilder) -> Result<()> {
        let qname = typedef.qname().clone();
        self.typedefs.insert_unique(qname, typedef, "typedef")
    }

    pub fn add_grouping(&mut self, grouping: GroupingBuilder) -> Result<()> {
        let qname = grouping.qname().clone();
        self.groupings.insert_unique(qname, grouping, "grouping")
    }

    pub fn typedefs(&self) -> &QNameMap<TypeDefinitionBuilder> {
        &self.typedefs
    }

    pub fn groupings(&self) -> &QNameMap<GroupingBuilder> {
        &self.groupings
    }

    /// Resolves input, output and local groupings.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingInput`] or [`SchemaError::MissingOutput`]
    /// before resolving anything if either container was never set.
    pub fn build(&self, namespace: &dyn GroupingLookup) -> Result<RpcDefinition> {
        self.build_with(namespace, &BuildOptions::default())
    }

    pub fn build_with(
        &self,
        namespace: &dyn GroupingLookup,
        options: &BuildOptions,
    ) -> Result<RpcDefinition> {
        let mut resolver = Resolver::new(namespace, options);
        self.resolve(&mut resolver)
    }

    pub(crate) fn resolve<'a>(&'a self, resolver: &mut Resolver<'a>) -> Result<RpcDefinition> {
        let qname = &self.meta.qname;
        let input = self
            .input
            .as_ref()
            .ok_or_else(|| SchemaError::MissingInput(qname.clone()))?;
        let output = self
            .output
            .as_ref()
            .ok_or_else(|| SchemaError::MissingOutput(qname.clone()))?;

        debug!(rpc = %qname, "resolving rpc");
        resolver.with_scope(&self.groupings, |resolver| {
            let typedefs = build_typedefs(&self.typedefs)?;
            let groupings = resolve_groupings(&self.groupings, resolver)?;
            let input = input.resolve(resolver)?;
            let output = output.resolve(resolver)?;
            Ok(RpcDefinition {
                meta: self.meta.clone(),
                input,
                output,
                typedefs,
                groupings,
            })
        })
    }
}

impl SchemaNodeBuilder for RpcDefinitionBuilder {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        &mut self.meta
    }
}

impl PartialEq for RpcDefinitionBuilder {
    fn eq(&self, other: &Self) -> bool {
        self.meta.qname == other.meta.qname
    }
}

impl Eq for RpcDefinitionBuilder {}

impl Hash for RpcDefinitionBuilder {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.meta.qname.hash(state);
    }
}
