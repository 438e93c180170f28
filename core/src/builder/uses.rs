use tracing::debug;

use super::{DataSchemaNodeBuilder, SchemaNodeBuilder};
use crate::error::{Result, SchemaError};
use crate::model::QNameMap;
use crate::resolve::{BuildOptions, GroupingLookup, Resolver};
use crate::{AugmentationSchema, DataSchemaNode, QName, SchemaPath, Status, UsesNode};

/// Builder for a `uses` statement.
///
/// Only the grouping's QName is recorded; the grouping itself is looked up
/// when the statement is built.
#[derive(Debug, Clone)]
pub struct UsesNodeBuilder {
    grouping: QName,
    augmentations: Vec<AugmentationSchemaBuilder>,
}

impl UsesNodeBuilder {
    pub fn new(grouping: QName) -> Self {
        Self {
            grouping,
            augmentations: Vec::new(),
        }
    }

    pub fn grouping_qname(&self) -> &QName {
        &self.grouping
    }

    /// Adds an augmentation applied to the inlined content at this use site.
    ///
    /// The target is not checked until build.
    pub fn add_augment(&mut self, augment: AugmentationSchemaBuilder) {
        self.augmentations.push(augment);
    }

    pub fn augmentations(&self) -> &[AugmentationSchemaBuilder] {
        &self.augmentations
    }

    /// Resolves the referenced grouping in `namespace` and applies this use
    /// site's augmentations.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnresolvedGrouping`] if the grouping is not in
    /// `namespace`, or [`SchemaError::UnresolvedAugmentTarget`] if an
    /// augmentation targets a node that is not a container or list of the
    /// inlined content.
    pub fn build(&self, namespace: &dyn GroupingLookup) -> Result<UsesNode> {
        self.build_with(namespace, &BuildOptions::default())
    }

    pub fn build_with(
        &self,
        namespace: &dyn GroupingLookup,
        options: &BuildOptions,
    ) -> Result<UsesNode> {
        let mut resolver = Resolver::new(namespace, options);
        self.resolve(&mut resolver)
    }

    pub(crate) fn resolve<'a>(&'a self, resolver: &mut Resolver<'a>) -> Result<UsesNode> {
        let grouping = resolver.resolve_grouping(&self.grouping)?;

        // Copy the grouping's effective content so augmentations stay local
        // to this use site.
        let mut children = grouping.content.children.clone();
        for nested in &grouping.content.uses {
            for (qname, child) in &nested.children {
                children.insert_unique(qname.clone(), child.clone(), statement_of(child))?;
            }
        }

        let mut augmentations = Vec::with_capacity(self.augmentations.len());
        for builder in &self.augmentations {
            let augmentation = builder.resolve(resolver)?;
            let target = target_children(&mut children, &augmentation.target_path).ok_or_else(
                || SchemaError::UnresolvedAugmentTarget {
                    grouping: self.grouping.clone(),
                    target: augmentation.target_path.clone(),
                },
            )?;
            for (qname, child) in &augmentation.children {
                target.insert_unique(qname.clone(), child.clone(), statement_of(child))?;
            }
            debug!(
                grouping = %self.grouping,
                target = %augmentation.target_path,
                nodes = augmentation.children.len(),
                "applied use-site augmentation"
            );
            augmentations.push(augmentation);
        }

        Ok(UsesNode {
            grouping,
            augmentations,
            children,
        })
    }
}

/// Walks `target` from the inlined root down to a container or list.
///
/// Each step may land on a node inlined by a nested `uses`, and matches by
/// local name when no node has the exact QName.
fn target_children<'m>(
    children: &'m mut QNameMap<DataSchemaNode>,
    target: &SchemaPath,
) -> Option<&'m mut QNameMap<DataSchemaNode>> {
    let mut steps = target.path().iter();
    let Some(first) = steps.next() else {
        return Some(children);
    };
    let root = if children.contains(first) {
        first.clone()
    } else {
        children.key_by_local_name(first.local_name())?.clone()
    };
    let mut content = children.get_mut(&root)?.content_mut()?;
    for step in steps {
        let slot = content.locate(step)?;
        content = content.node_mut(&slot)?.content_mut()?;
    }
    Some(&mut content.children)
}

fn statement_of(node: &DataSchemaNode) -> &'static str {
    match node {
        DataSchemaNode::Container(_) => "container",
        DataSchemaNode::List(_) => "list",
        DataSchemaNode::Leaf(_) => "leaf",
        DataSchemaNode::LeafList(_) => "leaf-list",
    }
}

/// Builder for an `augment` statement attached to a `uses`.
///
/// The target path is relative to the inlined grouping content; an empty
/// path augments the use site itself.
#[derive(Debug, Clone)]
pub struct AugmentationSchemaBuilder {
    target_path: SchemaPath,
    description: Option<String>,
    reference: Option<String>,
    status: Status,
    children: QNameMap<DataSchemaNodeBuilder>,
}

impl AugmentationSchemaBuilder {
    pub fn new(target_path: SchemaPath) -> Self {
        Self {
            target_path,
            description: None,
            reference: None,
            status: Status::Current,
            children: QNameMap::new(),
        }
    }

    pub fn target_path(&self) -> &SchemaPath {
        &self.target_path
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    pub fn set_reference(&mut self, reference: impl Into<String>) {
        self.reference = Some(reference.into());
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    pub fn add_child_node(&mut self, child: impl Into<DataSchemaNodeBuilder>) -> Result<()> {
        let child = child.into();
        let qname = child.qname().clone();
        let statement = child.kind().as_str();
        self.children.insert_unique(qname, child, statement)
    }

    pub fn child_nodes(&self) -> &QNameMap<DataSchemaNodeBuilder> {
        &self.children
    }

    fn resolve<'a>(&'a self, resolver: &mut Resolver<'a>) -> Result<AugmentationSchema> {
        let mut children = QNameMap::new();
        for (qname, child) in &self.children {
            let node = child.resolve(resolver)?;
            children.insert_unique(qname.clone(), node, child.kind().as_str())?;
        }
        Ok(AugmentationSchema {
            target_path: self.target_path.clone(),
            description: self.description.clone(),
            reference: self.reference.clone(),
            status: self.status,
            children,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::test_support::{leaf, q};
    use crate::{
        ContainerSchemaNodeBuilder, DataNodeContainer, GroupingBuilder, GroupingLookup,
        GroupingNamespace,
    };

    fn namespace_with(groupings: Vec<GroupingBuilder>) -> GroupingNamespace {
        let mut namespace = GroupingNamespace::new();
        for grouping in groupings {
            namespace.register(grouping).unwrap();
        }
        namespace
    }

    #[test]
    fn test_uses_with_augment_exposes_grouping_and_augmented_nodes() {
        let mut g = GroupingBuilder::new(q("g"));
        g.add_child_node(leaf("x")).unwrap();

        let mut augment = AugmentationSchemaBuilder::new(SchemaPath::relative(vec![]));
        augment.add_child_node(leaf("y")).unwrap();
        let mut uses = UsesNodeBuilder::new(q("g"));
        uses.add_augment(augment);

        let mut h = GroupingBuilder::new(q("h"));
        h.add_uses_node(uses);

        let namespace = namespace_with(vec![g.clone()]);
        let h = h.build(&namespace).unwrap();
        let uses = &h.uses()[0];
        assert!(uses.data_child_by_qname(&q("x")).is_some());
        assert!(uses.data_child_by_qname(&q("y")).is_some());
        assert_eq!(uses.grouping_qname(), &q("g"));

        let g = g.build(&namespace).unwrap();
        assert!(g.data_child_by_qname(&q("x")).is_some());
        assert!(g.data_child_by_qname(&q("y")).is_none());
    }

    #[test]
    fn test_augmentations_do_not_leak_between_use_sites() {
        let mut g = GroupingBuilder::new(q("g"));
        g.add_child_node(leaf("x")).unwrap();
        let namespace = namespace_with(vec![g]);

        let mut augment = AugmentationSchemaBuilder::new(SchemaPath::relative(vec![]));
        augment.add_child_node(leaf("y")).unwrap();
        let mut augmented = UsesNodeBuilder::new(q("g"));
        augmented.add_augment(augment);

        let mut first = ContainerSchemaNodeBuilder::new(q("first"));
        first.add_uses_node(augmented);
        let mut second = ContainerSchemaNodeBuilder::new(q("second"));
        second.add_uses_node(UsesNodeBuilder::new(q("g")));
        let mut root = ContainerSchemaNodeBuilder::new(q("root"));
        root.add_child_node(first).unwrap();
        root.add_child_node(second).unwrap();

        let root = root.build(&namespace).unwrap();
        let uses_of = |name: &str| {
            root.data_child_by_name(name)
                .and_then(DataSchemaNode::as_container)
                .map(|container| container.uses()[0].clone())
                .unwrap()
        };
        let first = uses_of("first");
        let second = uses_of("second");
        assert!(first.data_child_by_name("y").is_some());
        assert!(second.data_child_by_name("y").is_none());
        assert!(std::sync::Arc::ptr_eq(first.grouping(), second.grouping()));
    }

    #[test]
    fn test_augment_into_nested_container() {
        let mut settings = ContainerSchemaNodeBuilder::new(q("settings"));
        settings.add_child_node(leaf("mtu")).unwrap();
        let mut g = GroupingBuilder::new(q("g"));
        g.add_child_node(settings).unwrap();
        let namespace = namespace_with(vec![g]);

        let mut augment = AugmentationSchemaBuilder::new(SchemaPath::relative(vec![q("settings")]));
        augment.set_description("vendor extension");
        augment.add_child_node(leaf("jumbo")).unwrap();
        let mut uses = UsesNodeBuilder::new(q("g"));
        uses.add_augment(augment);

        let built = uses.build(&namespace).unwrap();
        let settings = built.data_child_by_name("settings").unwrap().content().unwrap();
        assert_eq!(settings.children.len(), 2);
        assert_eq!(built.augmentations()[0].description(), Some("vendor extension"));
    }

    #[test]
    fn test_augment_through_nested_uses() {
        let mut inner = GroupingBuilder::new(q("inner"));
        inner.add_child_node(ContainerSchemaNodeBuilder::new(q("d"))).unwrap();
        let mut c = ContainerSchemaNodeBuilder::new(q("c"));
        c.add_uses_node(UsesNodeBuilder::new(q("inner")));
        let mut g = GroupingBuilder::new(q("g"));
        g.add_child_node(c).unwrap();
        let namespace = namespace_with(vec![inner, g]);

        let target = SchemaPath::relative(vec![q("c"), q("d")]);
        let mut augment = AugmentationSchemaBuilder::new(target);
        augment.add_child_node(leaf("y")).unwrap();
        let mut uses = UsesNodeBuilder::new(q("g"));
        uses.add_augment(augment);

        let built = uses.build(&namespace).unwrap();
        let c = built.data_child_by_name("c").and_then(DataSchemaNode::as_container).unwrap();
        let d = c.uses()[0]
            .data_child_by_name("d")
            .and_then(DataSchemaNode::as_container)
            .unwrap();
        assert!(d.data_child_by_qname(&q("y")).is_some());

        // The grouping itself is untouched.
        let inner = namespace.lookup_grouping(&q("inner")).unwrap();
        let inner = inner.build(&namespace).unwrap();
        let d = inner.data_child_by_name("d").and_then(DataSchemaNode::as_container).unwrap();
        assert!(d.child_nodes().is_empty());
    }

    #[test]
    fn test_augment_target_matches_inlined_node_by_local_name() {
        let foreign = |name: &str| QName::new("urn:example:base", None, name);
        let mut endpoint = GroupingBuilder::new(foreign("endpoint"));
        endpoint
            .add_child_node(ContainerSchemaNodeBuilder::new(foreign("opts")))
            .unwrap();
        let namespace = namespace_with(vec![endpoint]);

        let mut augment = AugmentationSchemaBuilder::new(SchemaPath::relative(vec![q("opts")]));
        augment.add_child_node(leaf("vrf")).unwrap();
        let mut uses = UsesNodeBuilder::new(foreign("endpoint"));
        uses.add_augment(augment);

        let built = uses.build(&namespace).unwrap();
        let opts = built.data_child_by_qname(&foreign("opts")).unwrap();
        assert!(opts.content().unwrap().children.contains(&q("vrf")));
    }

    #[test]
    fn test_unknown_grouping_fails_at_build_not_at_add_augment() {
        let mut uses = UsesNodeBuilder::new(q("missing"));
        uses.add_augment(AugmentationSchemaBuilder::new(SchemaPath::relative(vec![q("c")])));

        assert_eq!(
            uses.build(&GroupingNamespace::new()).unwrap_err(),
            SchemaError::UnresolvedGrouping(q("missing"))
        );
    }

    #[test]
    fn test_augment_target_must_exist_and_hold_children() {
        let mut g = GroupingBuilder::new(q("g"));
        g.add_child_node(leaf("x")).unwrap();
        let namespace = namespace_with(vec![g]);

        for target in [q("x"), q("nope")] {
            let path = SchemaPath::relative(vec![target]);
            let mut uses = UsesNodeBuilder::new(q("g"));
            uses.add_augment(AugmentationSchemaBuilder::new(path.clone()));
            assert_eq!(
                uses.build(&namespace).unwrap_err(),
                SchemaError::UnresolvedAugmentTarget {
                    grouping: q("g"),
                    target: path
                }
            );
        }
    }

    #[test]
    fn test_augment_colliding_with_grouping_child_is_duplicate() {
        let mut g = GroupingBuilder::new(q("g"));
        g.add_child_node(leaf("x")).unwrap();
        let namespace = namespace_with(vec![g]);

        let mut augment = AugmentationSchemaBuilder::new(SchemaPath::relative(vec![]));
        augment.add_child_node(leaf("x")).unwrap();
        let mut uses = UsesNodeBuilder::new(q("g"));
        uses.add_augment(augment);

        assert!(matches!(
            uses.build(&namespace),
            Err(SchemaError::DuplicateDefinition { statement: "leaf", .. })
        ));
    }

    #[test]
    fn test_nested_uses_children_are_inlined() {
        let mut base = GroupingBuilder::new(q("base"));
        base.add_child_node(leaf("id")).unwrap();
        let mut derived = GroupingBuilder::new(q("derived"));
        derived.add_uses_node(UsesNodeBuilder::new(q("base")));
        derived.add_child_node(leaf("name")).unwrap();
        let namespace = namespace_with(vec![base, derived]);

        let uses = UsesNodeBuilder::new(q("derived")).build(&namespace).unwrap();
        let names: Vec<_> = uses.child_nodes().keys().map(QName::local_name).collect();
        assert_eq!(names, vec!["id", "name"]);
    }
}
