//! Pruning, flattening and lookup over interaction trees.
//!
//! None of these functions modify their input.

use crate::{
    build,
    catalog::PossibleTarget,
    kind::{EventType, TargetType},
    node::{EventDescriptor, TargetDescriptor, TreeNode},
};

/// The collection ids kept by [`detach_single_child_collections`] in practice
/// so that the UI retains consistent grouping labels.
pub const DEFAULT_DETACH_EXCLUDE_IDS: &[&str] =
    &[build::id::WIDGETS, build::id::TRACES, build::id::LAYERS];

/// The key used to select matching targets when pruning.
///
/// The target type is checked first, the event type is only used as a
/// fallback when no target type is given.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TargetQuery {
    pub target_type: Option<TargetType>,
    pub event_type: Option<EventType>,
}

impl TargetQuery {
    /// The target type that matching nodes must declare.
    pub fn desired_target_type(&self) -> Option<&str> {
        let non_empty = |s: &&str| !s.is_empty();
        self.target_type
            .as_ref()
            .map(TargetType::as_str)
            .filter(non_empty)
            .or_else(|| self.event_type.as_ref().map(EventType::as_str).filter(non_empty))
    }
}

impl From<TargetType> for TargetQuery {
    fn from(target_type: TargetType) -> Self {
        TargetQuery {
            target_type: Some(target_type),
            event_type: None,
        }
    }
}

impl From<&TargetDescriptor> for TargetQuery {
    fn from(target: &TargetDescriptor) -> Self {
        target.target_type.clone().into()
    }
}

impl From<&PossibleTarget> for TargetQuery {
    fn from(target: &PossibleTarget) -> Self {
        target.target_type.clone().into()
    }
}

impl From<&EventDescriptor> for TargetQuery {
    fn from(event: &EventDescriptor) -> Self {
        TargetQuery {
            target_type: None,
            event_type: Some(event.event_type.clone()),
        }
    }
}

/// A pruned copy of `tree` holding only the branches that lead to an element
/// declaring a target of the queried type.
///
/// Ancestor collections are kept to preserve the hierarchy. Nodes left
/// without children after pruning carry no children at all. Returns `None` if
/// the query resolves no target type, or if nothing in the tree matches.
pub fn filter_tree_with_target(
    tree: &TreeNode,
    target: impl Into<TargetQuery>,
) -> Option<TreeNode> {
    let query = target.into();
    let desired = query.desired_target_type()?;
    let pruned = prune(tree, desired);
    if pruned.is_none() {
        log::debug!("no node in the tree declares target `{desired}`");
    }
    pruned
}

fn prune(node: &TreeNode, desired: &str) -> Option<TreeNode> {
    let children: Vec<_> = node
        .children
        .iter()
        .filter_map(|child| prune(child, desired))
        .collect();
    let is_match = node.is_element()
        && node
            .targets()
            .iter()
            .any(|t| t.target_type.as_str() == desired);
    if !is_match && children.is_empty() {
        return None;
    }
    let mut pruned = node.clone_shallow();
    pruned.children = children;
    Some(pruned)
}

/// Collapse collections whose only child is itself a collection.
///
/// The intermediate collection is discarded and its children adopted by the
/// parent. Collections whose id is listed in `exclude_ids` are never
/// collapsed away. Applying this more than once has no further effect.
pub fn detach_single_child_collections(tree: &TreeNode, exclude_ids: &[&str]) -> TreeNode {
    let mut node = tree.clone_shallow();
    let mut children: Vec<TreeNode> = tree.children.clone();
    if node.is_collection() {
        loop {
            let collapsible = match &children[..] {
                [only] => {
                    only.is_collection()
                        && !only.id().is_some_and(|id| exclude_ids.contains(&id))
                }
                _ => false,
            };
            if !collapsible {
                break;
            }
            let Some(only) = children.pop() else {
                break;
            };
            log::trace!("detaching single child collection {:?}", only.id);
            children = only.children;
        }
    }
    node.children = children
        .iter()
        .map(|child| detach_single_child_collections(child, exclude_ids))
        .collect();
    node
}

/// The first node, depth-first with children in order, whose id is `node_id`.
pub fn find_node_by_id<'a>(tree: &'a TreeNode, node_id: &str) -> Option<&'a TreeNode> {
    if tree.id.as_deref() == Some(node_id) {
        return Some(tree);
    }
    tree.children
        .iter()
        .find_map(|child| find_node_by_id(child, node_id))
}

/// The first node, depth-first, whose stamped `node_path` is `node_path`.
pub fn find_node_by_path<'a>(tree: &'a TreeNode, node_path: &str) -> Option<&'a TreeNode> {
    if tree.node_path() == Some(node_path) {
        return Some(tree);
    }
    tree.children
        .iter()
        .find_map(|child| find_node_by_path(child, node_path))
}

impl TreeNode {
    /// A copy of this node without its children.
    pub(crate) fn clone_shallow(&self) -> TreeNode {
        TreeNode {
            ty: self.ty,
            id: self.id.clone(),
            title: self.title.clone(),
            icon: self.icon.clone(),
            node_type: self.node_type,
            statically_named_collection: self.statically_named_collection,
            children: vec![],
            interaction_metadata: self.interaction_metadata.clone(),
            node_path: self.node_path.clone(),
        }
    }
}
