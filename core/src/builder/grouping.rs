use std::sync::Arc;

use tracing::debug;

use super::{
    ContentBuilder, DataSchemaNodeBuilder, SchemaNodeBuilder, TypeDefinitionBuilder,
    UsesNodeBuilder,
};
use crate::error::Result;
use crate::model::{NodeMeta, QNameMap};
use crate::resolve::{BuildOptions, GroupingLookup, Resolver};
use crate::{GroupingDefinition, QName};

/// Builder for a `grouping` statement.
///
/// A grouping accepts child nodes, nested groupings, typedefs and `uses`
/// statements. Nested groupings are visible to `uses` inside this grouping
/// and take precedence over the namespace passed to [`build`](Self::build).
///
/// # Examples
///
/// ```
/// use yang_model_core::*;
///
/// let ns = "urn:example";
/// let mut g = GroupingBuilder::new(QName::new(ns, None, "g"));
/// g.add_child_node(LeafSchemaNodeBuilder::new(
///     QName::new(ns, None, "x"),
///     TypeRef::Builtin(BuiltinType::String),
/// ))
/// .unwrap();
///
/// let first = g.build(&GroupingNamespace::new()).unwrap();
/// let second = g.build(&GroupingNamespace::new()).unwrap();
/// assert_eq!(first, second);
/// assert!(first.data_child_by_name("x").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct GroupingBuilder {
    meta: NodeMeta,
    content: ContentBuilder,
}

impl GroupingBuilder {
    pub fn new(qname: QName) -> Self {
        Self {
            meta: NodeMeta::new(qname),
            content: ContentBuilder::default(),
        }
    }

    /// Adds a child data node.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateDefinition`](crate::SchemaError::DuplicateDefinition)
    /// if the QName is already used by another child.
    pub fn add_child_node(&mut self, child: impl Into<DataSchemaNodeBuilder>) -> Result<()> {
        self.content.add_child_node(child.into())
    }

    pub fn add_grouping(&mut self, grouping: GroupingBuilder) -> Result<()> {
        self.content.add_grouping(grouping)
    }

    pub fn add_typedef(&mut self, typedef: TypeDefinitionBuilder) -> Result<()> {
        self.content.add_typedef(typedef)
    }

    /// Records a `uses` statement. The target is not looked up until build.
    pub fn add_uses_node(&mut self, uses: UsesNodeBuilder) {
        self.content.add_uses_node(uses);
    }

    pub fn child_nodes(&self) -> &QNameMap<DataSchemaNodeBuilder> {
        self.content.children()
    }

    pub fn groupings(&self) -> &QNameMap<GroupingBuilder> {
        self.content.groupings()
    }

    pub fn typedefs(&self) -> &QNameMap<TypeDefinitionBuilder> {
        self.content.typedefs()
    }

    pub fn uses_nodes(&self) -> &[UsesNodeBuilder] {
        self.content.uses()
    }

    /// Resolves this grouping against `namespace` into a fresh definition.
    ///
    /// The builder is not consumed; later mutations do not affect graphs
    /// that were already built.
    ///
    /// # Errors
    ///
    /// Fails with `UnresolvedGrouping`, `UnresolvedAugmentTarget`,
    /// `GroupingCycle`, `DepthExceeded` or `InvalidListKey`.
    pub fn build(&self, namespace: &dyn GroupingLookup) -> Result<GroupingDefinition> {
        self.build_with(namespace, &BuildOptions::default())
    }

    pub fn build_with(
        &self,
        namespace: &dyn GroupingLookup,
        options: &BuildOptions,
    ) -> Result<GroupingDefinition> {
        let mut resolver = Resolver::new(namespace, options);
        let grouping = resolver.resolve_definition(self)?;
        Ok(Arc::unwrap_or_clone(grouping))
    }

    pub(crate) fn resolve<'a>(&'a self, resolver: &mut Resolver<'a>) -> Result<GroupingDefinition> {
        debug!(grouping = %self.meta.qname, "resolving grouping");
        resolver.descend(|resolver| {
            resolver.enter_grouping(&self.meta.qname)?;
            let content = self.content.resolve(resolver);
            resolver.leave_grouping();
            Ok(GroupingDefinition {
                meta: self.meta.clone(),
                content: content?,
            })
        })
    }
}

impl SchemaNodeBuilder for GroupingBuilder {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        &mut self.meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::test_support::{leaf, q};
    use crate::{
        ContainerSchemaNodeBuilder, DataNodeContainer, GroupingNamespace, SchemaError, SchemaNode,
    };

    #[test]
    fn test_build_twice_yields_independent_equal_graphs() {
        let mut g = GroupingBuilder::new(q("g"));
        g.add_child_node(leaf("x")).unwrap();

        let first = g.build(&GroupingNamespace::new()).unwrap();
        g.add_child_node(leaf("y")).unwrap();
        let second = g.build(&GroupingNamespace::new()).unwrap();

        assert_eq!(first.child_nodes().len(), 1);
        assert_eq!(second.child_nodes().len(), 2);
        assert!(first.data_child_by_name("y").is_none());
    }

    #[test]
    fn test_nested_grouping_shadows_namespace() {
        let mut outer_inner = GroupingBuilder::new(q("inner"));
        outer_inner.add_child_node(leaf("from-namespace")).unwrap();
        let mut namespace = GroupingNamespace::new();
        namespace.register(outer_inner).unwrap();

        let mut local_inner = GroupingBuilder::new(q("inner"));
        local_inner.add_child_node(leaf("from-scope")).unwrap();

        let mut g = GroupingBuilder::new(q("g"));
        g.add_grouping(local_inner).unwrap();
        g.add_uses_node(UsesNodeBuilder::new(q("inner")));

        let built = g.build(&namespace).unwrap();
        let uses = &built.uses()[0];
        assert!(uses.data_child_by_name("from-scope").is_some());
        assert!(uses.data_child_by_name("from-namespace").is_none());
        assert_eq!(built.groupings().len(), 1);
    }

    #[test]
    fn test_nested_grouping_used_inside_child_container() {
        let mut inner = GroupingBuilder::new(q("inner"));
        inner.add_child_node(leaf("x")).unwrap();

        let mut container = ContainerSchemaNodeBuilder::new(q("c"));
        container.add_uses_node(UsesNodeBuilder::new(q("inner")));

        let mut g = GroupingBuilder::new(q("g"));
        g.add_grouping(inner).unwrap();
        g.add_child_node(container).unwrap();

        let built = g.build(&GroupingNamespace::new()).unwrap();
        let c = built.data_child_by_name("c").unwrap().as_container().unwrap();
        assert!(c.uses()[0].data_child_by_name("x").is_some());
        assert_eq!(
            c.uses()[0].grouping().as_ref(),
            built.groupings().get(&q("inner")).unwrap()
        );
    }

    #[test]
    fn test_self_use_is_a_cycle() {
        let mut g = GroupingBuilder::new(q("g"));
        g.add_uses_node(UsesNodeBuilder::new(q("g")));
        let mut namespace = GroupingNamespace::new();
        namespace.register(g.clone()).unwrap();

        assert_eq!(
            g.build(&namespace),
            Err(SchemaError::GroupingCycle("g -> g".to_string()))
        );
    }

    #[test]
    fn test_build_keeps_metadata() {
        let mut g = GroupingBuilder::new(q("g"));
        g.set_description("endpoint fields");
        g.set_status(crate::Status::Deprecated);

        let built = g.build(&GroupingNamespace::new()).unwrap();
        assert_eq!(built.qname(), &q("g"));
        assert_eq!(built.description(), Some("endpoint fields"));
        assert_eq!(built.status(), crate::Status::Deprecated);
    }
}
