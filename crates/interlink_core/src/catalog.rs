//! The events and targets that each class of widget declares.
//!
//! A [`Catalog`] is passed explicitly to the builder so that hosts can extend
//! or replace the standard tables without touching any shared state.

use crate::{
    Constraints,
    kind::{DataType, EventType, TargetType},
    node::{EventDescriptor, TargetDescriptor},
    widget::Layer,
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::LazyLock};

/// The catalog keys for classes of targets that are not widget types.
pub mod class {
    /// A single trace within a chart widget.
    pub const CHART_TRACE: &str = "chartTrace";
    /// A map layer.
    pub const LAYER: &str = "layer";
    pub const TABLE: &str = "table";
    pub const COUNTER: &str = "counter";
}

/// Descriptor tables keyed by widget type or target class.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Catalog {
    /// The events each widget type can emit.
    pub events_by_widget_type: BTreeMap<String, Vec<EventDescriptor>>,
    /// The targets each widget type or sub-element class exposes.
    pub targets_by_type: BTreeMap<String, Vec<TargetDescriptor>>,
    /// The target types each event typically drives.
    pub event_targets: BTreeMap<EventType, Vec<TargetType>>,
    /// Human readable labels for target types.
    pub target_labels: BTreeMap<TargetType, String>,
    /// Glyph names for target types.
    pub target_glyphs: BTreeMap<TargetType, String>,
    /// The data type each target type expects.
    pub target_data_types: BTreeMap<TargetType, DataType>,
}

/// A target type worth offering in a given editing context.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PossibleTarget {
    pub title: String,
    pub target_type: TargetType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glyph: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    #[serde(default)]
    pub constraints: Constraints,
}

static STANDARD: LazyLock<Catalog> = LazyLock::new(Catalog::default);

impl Catalog {
    /// The read-only standard catalog.
    pub fn standard() -> &'static Catalog {
        &STANDARD
    }

    /// A catalog with no entries at all.
    pub fn empty() -> Self {
        Catalog {
            events_by_widget_type: BTreeMap::new(),
            targets_by_type: BTreeMap::new(),
            event_targets: BTreeMap::new(),
            target_labels: BTreeMap::new(),
            target_glyphs: BTreeMap::new(),
            target_data_types: BTreeMap::new(),
        }
    }

    /// The events declared for the given widget type.
    pub fn events(&self, widget_type: &str) -> &[EventDescriptor] {
        self.events_by_widget_type
            .get(widget_type)
            .map(|v| &v[..])
            .unwrap_or(&[])
    }

    /// The targets declared for the given widget type or target class.
    pub fn targets(&self, class: &str) -> &[TargetDescriptor] {
        self.targets_by_type
            .get(class)
            .map(|v| &v[..])
            .unwrap_or(&[])
    }

    /// The targets of `class`, constrained to the given layer.
    ///
    /// Descriptors whose catalog constraints already name a layer keep them.
    pub fn layer_bound_targets(&self, class: &str, layer: Option<&Layer>) -> Vec<TargetDescriptor> {
        let name = layer.and_then(|l| l.name.as_deref());
        self.targets(class)
            .iter()
            .map(|t| {
                let mut t = t.clone();
                if !t.constraints.has_layer() {
                    t.constraints = Constraints::layer(name);
                }
                t
            })
            .collect()
    }

    /// Collect the target types reachable from the events of `widget_type`.
    ///
    /// Target types are unique and appear in the order they are first
    /// reached. When a layer is given the targets are constrained to it.
    pub fn targets_by_widget_type(
        &self,
        widget_type: &str,
        layer: Option<&Layer>,
    ) -> Vec<PossibleTarget> {
        let mut target_types: Vec<&TargetType> = vec![];
        let reachable = self
            .events(widget_type)
            .iter()
            .filter_map(|ev| self.event_targets.get(&ev.event_type))
            .flatten();
        for tt in reachable {
            if !target_types.contains(&tt) {
                target_types.push(tt);
            }
        }
        let constraints = match layer {
            Some(layer) => Constraints::layer(layer.name.as_deref()),
            None => Constraints::new(),
        };
        target_types
            .into_iter()
            .map(|tt| PossibleTarget {
                title: self
                    .target_labels
                    .get(tt)
                    .cloned()
                    .unwrap_or_else(|| tt.to_string()),
                target_type: tt.clone(),
                glyph: self.target_glyphs.get(tt).cloned(),
                data_type: self.target_data_types.get(tt).cloned(),
                constraints: constraints.clone(),
            })
            .collect()
    }

    /// The target types worth offering while editing a widget of the given
    /// type.
    ///
    /// Only filter widgets are currently supported, anything else yields no
    /// targets.
    pub fn possible_targets_editing_widget(
        &self,
        widget_type: &str,
        layer: Option<&Layer>,
    ) -> Vec<PossibleTarget> {
        match widget_type {
            "filter" => self.targets_by_widget_type(widget_type, layer),
            _ => vec![],
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        let ev = EventDescriptor::new;
        let events_by_widget_type = BTreeMap::from([
            (
                "map".to_string(),
                vec![
                    ev(EventType::VIEWPORT_CHANGE, DataType::BBOX_COORDINATES),
                    ev(EventType::CENTER_CHANGE, DataType::POINT),
                    ev(EventType::ZOOM_CHANGE, DataType::NUMBER),
                    ev(EventType::FEATURE_CLICK, DataType::FEATURE),
                ],
            ),
            (
                "table".to_string(),
                vec![
                    ev(EventType::FILTER_CHANGE, DataType::LAYER_FILTER),
                    ev(EventType::ZOOM_CLICK, DataType::FEATURE),
                ],
            ),
            (
                "filter".to_string(),
                vec![
                    ev(EventType::FILTER_CHANGE, DataType::LAYER_FILTER),
                    ev(EventType::STYLE_CHANGE, DataType::STYLE_NAME),
                ],
            ),
        ]);

        let apply_filter = || TargetDescriptor::new(TargetType::APPLY_FILTER, DataType::LAYER_FILTER);
        let apply_style = || TargetDescriptor::new(TargetType::APPLY_STYLE, DataType::STYLE_NAME);
        let by_viewport =
            || TargetDescriptor::new(TargetType::FILTER_BY_VIEWPORT, DataType::BBOX_COORDINATES);
        let property = |mut t: TargetDescriptor, p: &str| {
            t.target_property = Some(p.to_string());
            t
        };
        let attribute = |mut t: TargetDescriptor, a: &str| {
            t.attribute_name = Some(a.to_string());
            t
        };
        let widget_targets = || {
            vec![
                attribute(apply_filter(), "layerFilter.filters"),
                attribute(by_viewport(), "layerFilter.filters"),
            ]
        };
        let targets_by_type = BTreeMap::from([
            (
                class::CHART_TRACE.to_string(),
                vec![
                    attribute(
                        property(apply_filter(), "dependencies.filters"),
                        "layerFilter.filters",
                    ),
                    attribute(
                        property(by_viewport(), "dependencies.viewports"),
                        "layerFilter.filters",
                    ),
                ],
            ),
            (
                class::LAYER.to_string(),
                vec![
                    attribute(apply_filter(), "layerFilter.filters"),
                    attribute(apply_style(), "layer.style"),
                    attribute(by_viewport(), "layerFilter.filters"),
                ],
            ),
            (class::TABLE.to_string(), widget_targets()),
            (class::COUNTER.to_string(), widget_targets()),
        ]);

        let event_targets = BTreeMap::from([
            (EventType::FILTER_CHANGE, vec![TargetType::APPLY_FILTER]),
            (EventType::STYLE_CHANGE, vec![TargetType::APPLY_STYLE]),
            (EventType::VIEWPORT_CHANGE, vec![TargetType::FILTER_BY_VIEWPORT]),
        ]);
        let target_labels = BTreeMap::from([
            (TargetType::APPLY_FILTER, "Apply filter".to_string()),
            (TargetType::APPLY_STYLE, "Apply style".to_string()),
            (TargetType::FILTER_BY_VIEWPORT, "Filter by viewport".to_string()),
        ]);
        let target_glyphs = BTreeMap::from([
            (TargetType::APPLY_FILTER, "filter".to_string()),
            (TargetType::APPLY_STYLE, "brush".to_string()),
            (TargetType::FILTER_BY_VIEWPORT, "1-map".to_string()),
        ]);
        let target_data_types = BTreeMap::from([
            (TargetType::APPLY_FILTER, DataType::LAYER_FILTER),
            (TargetType::APPLY_STYLE, DataType::STYLE_NAME),
            (TargetType::FILTER_BY_VIEWPORT, DataType::BBOX_COORDINATES),
        ]);

        Catalog {
            events_by_widget_type,
            targets_by_type,
            event_targets,
            target_labels,
            target_glyphs,
            target_data_types,
        }
    }
}
