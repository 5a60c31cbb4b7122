//! Construction of the interaction tree from widgets and map layers.
//!
//! The builder never fails. Missing fields degrade to defaults and widgets
//! without interaction support become inert nodes. For identical inputs the
//! output is identical, including child ordering, which keeps node paths
//! stable across rebuilds.

use crate::{
    Catalog,
    catalog::class,
    node::{InteractionMetadata, NodeKind, TreeNode},
    widget::{Chart, FilterItem, Layer, MapConfig, Trace, Widget, WidgetKind},
};

/// Well known collection ids.
pub mod id {
    pub const ROOT: &str = "root";
    pub const WIDGETS: &str = "widgets";
    pub const MAP: &str = "map";
    pub const MAPS: &str = "maps";
    pub const LAYERS: &str = "layers";
    pub const CHARTS: &str = "charts";
    pub const TRACES: &str = "traces";
    pub const FILTERS: &str = "filters";
}

/// Layer groups whose layers never take part in interactions.
pub const BACKGROUND_GROUP: &str = "background";

/// Constructs interaction trees against a particular [`Catalog`].
#[derive(Clone, Copy, Debug)]
pub struct Builder<'a> {
    catalog: &'a Catalog,
}

impl<'a> Builder<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// The catalog used to populate interaction metadata.
    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Build the root of the tree.
    ///
    /// The root always holds the `widgets` collection. A `map` collection of
    /// layers follows only if any map layers are supplied.
    pub fn root_tree(&self, widgets: &[Widget], map_layers: &[Layer]) -> TreeNode {
        let widget_nodes = widgets.iter().map(|w| self.widget_tree_node(w)).collect();
        let mut children = vec![
            TreeNode::named_collection(id::WIDGETS, "Widgets")
                .with_icon("dashboard")
                .with_children(widget_nodes),
        ];
        if !map_layers.is_empty() {
            let layers = TreeNode::named_collection(id::LAYERS, "Layers")
                .with_icon("1-layer")
                .with_children(self.layers_metadata_tree(map_layers));
            let map = TreeNode::named_collection(id::MAP, "Map")
                .with_icon("1-layer")
                .with_children(vec![layers]);
            children.push(map);
        }
        log::trace!(
            "built root tree from {} widgets and {} map layers",
            widgets.len(),
            map_layers.len()
        );
        TreeNode::collection(Some(id::ROOT), Some("Root")).with_children(children)
    }

    /// Build the node for a single widget, dispatching on its kind.
    pub fn widget_tree_node(&self, widget: &Widget) -> TreeNode {
        match &widget.kind {
            WidgetKind::Chart { charts } => self.chart_widget_tree_node(widget, charts),
            WidgetKind::Table { layer } => {
                self.layer_widget_tree_node(widget, layer.as_ref(), class::TABLE, "features-grid")
                    .with_kind(NodeKind::Table)
            }
            WidgetKind::Counter { layer } => {
                self.layer_widget_tree_node(widget, layer.as_ref(), class::COUNTER, "counter")
                    .with_kind(NodeKind::Counter)
            }
            WidgetKind::Map { maps } => self.map_widget_tree_node(widget, maps.as_deref()),
            WidgetKind::Filter { filters } => self.filter_widget_tree_node(widget, filters),
            WidgetKind::Unknown { widget_type } => {
                log::trace!("widget {:?} of type {widget_type:?} is inert", widget.id);
                TreeNode::element(widget.id.as_deref(), widget.title.as_deref())
                    .with_icon("widget")
                    .with_kind(NodeKind::Widget)
            }
        }
    }

    /// A chart widget.
    ///
    /// A single chart places its `traces` directly under the widget, several
    /// charts are grouped in a `charts` collection.
    fn chart_widget_tree_node(&self, widget: &Widget, charts: &[Chart]) -> TreeNode {
        let node = TreeNode::collection(widget.id.as_deref(), widget.title.as_deref())
            .with_icon("stats")
            .with_kind(NodeKind::Chart);
        match charts {
            [chart] => node.with_children(vec![self.traces_collection(&chart.traces)]),
            charts => {
                let chart_nodes = charts.iter().map(|c| self.chart_tree_node(c)).collect();
                let charts = TreeNode::named_collection(id::CHARTS, "Charts")
                    .with_icon("stats")
                    .with_children(chart_nodes);
                node.with_children(vec![charts])
            }
        }
    }

    fn chart_tree_node(&self, chart: &Chart) -> TreeNode {
        let id = chart.chart_id.as_deref().or(chart.id.as_deref());
        TreeNode::collection(id, chart.name.as_deref())
            .with_icon("stats")
            .with_kind(NodeKind::Chart)
            .with_children(vec![self.traces_collection(&chart.traces)])
    }

    fn traces_collection(&self, traces: &[Trace]) -> TreeNode {
        let traces = traces.iter().map(|t| self.chart_trace_tree_node(t)).collect();
        TreeNode::named_collection(id::TRACES, "Traces").with_children(traces)
    }

    /// A single chart trace, targetable through its bound layer.
    pub fn chart_trace_tree_node(&self, trace: &Trace) -> TreeNode {
        let metadata = InteractionMetadata {
            events: vec![],
            targets: self
                .catalog
                .layer_bound_targets(class::CHART_TRACE, trace.layer.as_ref()),
        };
        TreeNode::element(trace.id.as_deref(), trace.title.as_deref())
            .with_icon(trace_icon(trace.ty.as_deref()))
            .with_kind(NodeKind::Trace)
            .with_metadata(metadata)
    }

    /// Tables and counters, targetable through the widget's layer.
    fn layer_widget_tree_node(
        &self,
        widget: &Widget,
        layer: Option<&Layer>,
        class: &str,
        icon: &str,
    ) -> TreeNode {
        let metadata = InteractionMetadata {
            events: self.catalog.events(class).to_vec(),
            targets: self.catalog.layer_bound_targets(class, layer),
        };
        TreeNode::element(widget.id.as_deref(), widget.title.as_deref())
            .with_icon(icon)
            .with_metadata(metadata)
    }

    fn map_widget_tree_node(&self, widget: &Widget, maps: Option<&[MapConfig]>) -> TreeNode {
        TreeNode::collection(widget.id.as_deref(), widget.title.as_deref())
            .with_icon("map")
            .with_kind(NodeKind::Maps)
            .with_children(vec![self.map_widget_layers_tree(maps.unwrap_or(&[]))])
    }

    /// The `maps` collection of a map widget.
    ///
    /// Holds one collection per map configuration. Configurations without a
    /// layers array, or without any interaction capable layer, are omitted.
    pub fn map_widget_layers_tree(&self, maps: &[MapConfig]) -> TreeNode {
        let map_nodes = maps
            .iter()
            .filter_map(|map| {
                let layers = self.layers_metadata_tree(map.layers.as_deref()?);
                if layers.is_empty() {
                    return None;
                }
                let layers = TreeNode::named_collection(id::LAYERS, "Layers")
                    .with_icon("1-layer")
                    .with_children(layers);
                let node = TreeNode::collection(map.map_id.as_deref(), map.name.as_deref())
                    .with_icon("map")
                    .with_children(vec![layers]);
                Some(node)
            })
            .collect();
        TreeNode::named_collection(id::MAPS, "Maps").with_children(map_nodes)
    }

    fn filter_widget_tree_node(&self, widget: &Widget, filters: &[FilterItem]) -> TreeNode {
        let filter_nodes = filters.iter().map(|f| self.filter_tree_node(f)).collect();
        let filters = TreeNode::named_collection(id::FILTERS, "Filters")
            .with_icon("filter")
            .with_children(filter_nodes);
        TreeNode::collection(widget.id.as_deref(), widget.title.as_deref())
            .with_icon("filter")
            .with_kind(NodeKind::Filter)
            .with_children(vec![filters])
    }

    /// A single filter of a filter widget. Filters only emit events.
    pub fn filter_tree_node(&self, filter: &FilterItem) -> TreeNode {
        let title = filter.label.as_deref().or(filter.title.as_deref());
        let metadata = InteractionMetadata {
            events: self.catalog.events("filter").to_vec(),
            targets: vec![],
        };
        TreeNode::element(filter.id.as_deref(), title)
            .with_icon("filter")
            .with_kind(NodeKind::Filter)
            .with_metadata(metadata)
    }

    /// The element nodes for the interaction capable subset of `layers`.
    pub fn layers_metadata_tree(&self, layers: &[Layer]) -> Vec<TreeNode> {
        layers
            .iter()
            .filter(|l| is_interaction_supported(l))
            .map(|l| self.layer_metadata_tree(l))
            .collect()
    }

    /// The element node for a single layer.
    pub fn layer_metadata_tree(&self, layer: &Layer) -> TreeNode {
        let metadata = InteractionMetadata {
            events: vec![],
            targets: self.catalog.layer_bound_targets(class::LAYER, Some(layer)),
        };
        TreeNode::element(layer.id.as_deref(), layer.title.as_deref())
            .with_icon("1-layer")
            .with_kind(NodeKind::Layer)
            .with_metadata(metadata)
    }
}

impl Default for Builder<'static> {
    fn default() -> Self {
        Self::new(Catalog::standard())
    }
}

/// Whether the layer can take part in interactions.
///
/// Only `wms` and `wfs` layers outside of the background group qualify.
pub fn is_interaction_supported(layer: &Layer) -> bool {
    matches!(layer.ty.as_deref(), Some("wms" | "wfs"))
        && layer.group.as_deref() != Some(BACKGROUND_GROUP)
}

/// Build the root tree using the standard catalog.
pub fn generate_root_tree(widgets: &[Widget], map_layers: &[Layer]) -> TreeNode {
    Builder::default().root_tree(widgets, map_layers)
}

/// Build the node for a single widget using the standard catalog.
pub fn generate_widget_tree_node(widget: &Widget) -> TreeNode {
    Builder::default().widget_tree_node(widget)
}

/// Build the layer elements using the standard catalog.
pub fn generate_layers_metadata_tree(layers: &[Layer]) -> Vec<TreeNode> {
    Builder::default().layers_metadata_tree(layers)
}

fn trace_icon(trace_type: Option<&str>) -> &'static str {
    match trace_type {
        Some("bar") => "stats",
        Some("pie") => "pie-chart",
        Some("line") => "line",
        _ => "bar-chart",
    }
}
