//! The nodes that make up an interaction tree.

use crate::{
    Constraints,
    kind::{DataType, EventType, TargetType},
};
use serde::{Deserialize, Serialize};

/// The title given to nodes whose source provides none.
pub const NO_TITLE: &str = "No title";

/// Whether a node is addressable in its own right or only groups others.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// An addressable entity. Only elements may carry interaction metadata.
    Element,
    /// A pure grouping of other nodes.
    Collection,
}

/// What a node represents, for presentation purposes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Layer,
    Trace,
    Chart,
    Table,
    Counter,
    Maps,
    Filter,
    Widget,
}

/// One addressable entity in the interaction hierarchy.
///
/// Children are owned exclusively by their parent. Nodes only refer to their
/// ancestry through the `node_path` string stamped by
/// [`add_node_path_to_tree`](crate::path::add_node_path_to_tree).
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    #[serde(rename = "type")]
    pub ty: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeKind>,
    /// Whether the node's address segment is its literal id, e.g. `widgets`.
    #[serde(default, skip_serializing_if = "is_false")]
    pub statically_named_collection: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_metadata: Option<InteractionMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_path: Option<String>,
}

/// The interactions an element node can take part in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionMetadata {
    /// Signals the node can emit.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<EventDescriptor>,
    /// Capabilities the node exposes for receiving data.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<TargetDescriptor>,
}

/// A signal a widget can emit, e.g. "the filter changed".
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDescriptor {
    pub event_type: EventType,
    pub data_type: DataType,
    /// Constraints on the emitted data, empty unless the event is bound to
    /// e.g. a specific layer.
    #[serde(default, skip_serializing_if = "Constraints::is_empty")]
    pub constraints: Constraints,
}

/// How a target applies the data it receives.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Insert the data, replacing any previous data from the same interaction.
    #[default]
    Upsert,
}

/// A capability a node exposes to receive data.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetDescriptor {
    pub target_type: TargetType,
    pub expected_data_type: DataType,
    #[serde(default)]
    pub constraints: Constraints,
    /// The widget property updated when the target receives data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_property: Option<String>,
    /// The layer attribute updated when the target receives data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_name: Option<String>,
    #[serde(default)]
    pub mode: Mode,
}

impl TreeNode {
    /// An element node with the given id and title.
    ///
    /// A missing or empty title falls back to [`NO_TITLE`].
    pub fn element(id: Option<&str>, title: Option<&str>) -> Self {
        Self::new(NodeType::Element, id, title)
    }

    /// A collection node with the given id and title.
    pub fn collection(id: Option<&str>, title: Option<&str>) -> Self {
        Self::new(NodeType::Collection, id, title)
    }

    /// A collection addressed by its literal id, e.g. `widgets` or `traces`.
    pub fn named_collection(id: &str, title: &str) -> Self {
        let mut node = Self::collection(Some(id), Some(title));
        node.statically_named_collection = true;
        node
    }

    fn new(ty: NodeType, id: Option<&str>, title: Option<&str>) -> Self {
        let title = title.filter(|t| !t.is_empty()).unwrap_or(NO_TITLE);
        TreeNode {
            ty,
            id: id.map(str::to_string),
            title: title.to_string(),
            icon: None,
            node_type: None,
            statically_named_collection: false,
            children: vec![],
            interaction_metadata: None,
            node_path: None,
        }
    }

    /// Builder method for the node's icon.
    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    /// Builder method for the node's kind.
    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.node_type = Some(kind);
        self
    }

    /// Builder method for the node's children.
    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    /// Builder method for the node's interaction metadata.
    ///
    /// Only elements may carry metadata, so this is a no-op on collections.
    pub fn with_metadata(mut self, metadata: InteractionMetadata) -> Self {
        if self.is_element() {
            self.interaction_metadata = Some(metadata);
        } else {
            log::warn!("ignoring interaction metadata on collection {:?}", self.id);
        }
        self
    }

    /// The node's id, treating an empty id as absent.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// The path stamped onto this node, if any.
    pub fn node_path(&self) -> Option<&str> {
        self.node_path.as_deref()
    }

    pub fn is_element(&self) -> bool {
        self.ty == NodeType::Element
    }

    pub fn is_collection(&self) -> bool {
        self.ty == NodeType::Collection
    }

    /// The targets declared by this node, empty if it has no metadata.
    pub fn targets(&self) -> &[TargetDescriptor] {
        self.interaction_metadata
            .as_ref()
            .map(|m| &m.targets[..])
            .unwrap_or(&[])
    }

    /// The events declared by this node, empty if it has no metadata.
    pub fn events(&self) -> &[EventDescriptor] {
        self.interaction_metadata
            .as_ref()
            .map(|m| &m.events[..])
            .unwrap_or(&[])
    }

    /// Visit this node and all descendants depth-first, children in order.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a TreeNode)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }
}

impl TargetDescriptor {
    /// A target accepting the given data type with no constraints.
    pub fn new(target_type: TargetType, expected_data_type: DataType) -> Self {
        Self {
            target_type,
            expected_data_type,
            constraints: Constraints::new(),
            target_property: None,
            attribute_name: None,
            mode: Mode::Upsert,
        }
    }

    /// Builder method for the target's constraints.
    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }
}

impl EventDescriptor {
    /// An unconstrained event of the given type.
    pub fn new(event_type: EventType, data_type: DataType) -> Self {
        Self {
            event_type,
            data_type,
            constraints: Constraints::new(),
        }
    }

    /// Builder method for the event's constraints.
    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}
