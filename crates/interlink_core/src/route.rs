//! Routing of emitted interaction events to plugged targets.

use crate::{
    interaction::{Interaction, Interactions},
    kind::EventType,
    node::TargetDescriptor,
};
use petgraph::{Direction, graphmap::DiGraphMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An event emitted by the node at `source_node_path`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionEvent {
    pub event_type: EventType,
    pub source_node_path: String,
    #[serde(default)]
    pub data: Value,
}

/// The data to deliver to a single plugged target.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetOperation {
    pub interaction_id: String,
    pub target_node_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_data: Option<TargetDescriptor>,
    pub data: Value,
}

/// The plugged interactions as a graph from source path to target path.
///
/// Each edge holds the interaction connecting the pair. As interactions are
/// keyed by their (source, target) pair there is at most one per edge.
pub type RouteGraph<'a> = DiGraphMap<&'a str, &'a Interaction>;

/// Routes events from their source to every plugged target.
#[derive(Debug)]
pub struct Router<'a> {
    graph: RouteGraph<'a>,
}

impl<'a> Router<'a> {
    /// Index the plugged subset of `interactions`.
    pub fn new(interactions: impl IntoIterator<Item = &'a Interaction>) -> Self {
        let mut graph = RouteGraph::new();
        for interaction in interactions.into_iter().filter(|i| i.plugged) {
            let src = interaction.source.node_path.as_str();
            let dst = interaction.target.node_path.as_str();
            if let Some(prev) = graph.add_edge(src, dst, interaction) {
                log::warn!(
                    "interaction {} replaces duplicate {} from `{src}` to `{dst}`",
                    interaction.id,
                    prev.id
                );
            }
        }
        Router { graph }
    }

    /// Index the plugged interactions of every given widget interaction list.
    pub fn from_lists(lists: impl IntoIterator<Item = &'a Interactions>) -> Self {
        Self::new(lists.into_iter().flatten())
    }

    /// The underlying graph.
    pub fn graph(&self) -> &RouteGraph<'a> {
        &self.graph
    }

    /// The plugged interactions whose source is `source_path`.
    pub fn targets(&self, source_path: &str) -> impl Iterator<Item = &'a Interaction> + '_ {
        // Look up the stored key, as the graph is keyed by `&'a str`.
        let node = self.graph.nodes().find(|&n| n == source_path);
        node.into_iter()
            .flat_map(|n| self.graph.edges_directed(n, Direction::Outgoing))
            .map(|(_, _, &interaction)| interaction)
    }

    /// The target operations to execute for `event`.
    ///
    /// When the event data is a list of filters tagged with `filterId`, each
    /// target only receives the filter whose id appears in the interaction's
    /// source path. Targets for which no such filter exists are skipped.
    pub fn route(&self, event: &InteractionEvent) -> Vec<TargetOperation> {
        let ops: Vec<_> = self
            .targets(&event.source_node_path)
            .filter_map(|interaction| {
                let data = select_data(&event.data, &interaction.source.node_path)?;
                Some(TargetOperation {
                    interaction_id: interaction.id.clone(),
                    target_node_path: interaction.target.node_path.clone(),
                    meta_data: interaction.target.meta_data.clone(),
                    data,
                })
            })
            .collect();
        if ops.is_empty() {
            log::debug!(
                "no plugged targets for `{}` from `{}`",
                event.event_type,
                event.source_node_path
            );
        } else {
            log::debug!(
                "routing `{}` from `{}` to {} targets",
                event.event_type,
                event.source_node_path,
                ops.len()
            );
        }
        ops
    }
}

fn select_data(data: &Value, source_path: &str) -> Option<Value> {
    let Some(items) = data.as_array() else {
        return Some(data.clone());
    };
    let tagged = |v: &Value| v.get("filterId").and_then(Value::as_str).map(str::to_string);
    if items.is_empty() || !items.iter().all(|v| tagged(v).is_some()) {
        return Some(data.clone());
    }
    items
        .iter()
        .find(|v| tagged(v).is_some_and(|id| source_path.contains(&id)))
        .cloned()
}
