//! The dashboard widgets and map layers supplied by the host.
//!
//! Widgets arrive as loosely shaped JSON objects tagged by `widgetType`.
//! They are read into [`Widget`], whose [`WidgetKind`] is a closed sum type so
//! that tree construction can match exhaustively on the variant.

use crate::interaction::Interactions;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A map layer as described by the host's map state.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// The layer source type, e.g. `wms`, `wfs` or `vector`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<bool>,
    /// Any other layer properties, e.g. the `layerFilter` updated by
    /// interaction effects. Kept so that layers round-trip unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single series of a chart, bound to a layer.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// The trace type, e.g. `bar`, `pie` or `line`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<Layer>,
}

/// One chart of a chart widget.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub traces: Vec<Trace>,
}

/// One map configuration of a map widget.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `None` when the configuration carries no layers array at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layers: Option<Vec<Layer>>,
}

/// A filter declared by a filter widget.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A dashboard widget.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(from = "RawWidget", into = "RawWidget")]
pub struct Widget {
    pub id: Option<String>,
    pub title: Option<String>,
    pub kind: WidgetKind,
    /// The interactions whose source is this widget.
    pub interactions: Interactions,
}

/// The widget-type specific part of a [`Widget`].
#[derive(Clone, Debug, PartialEq)]
pub enum WidgetKind {
    Chart { charts: Vec<Chart> },
    Table { layer: Option<Layer> },
    Counter { layer: Option<Layer> },
    Map { maps: Option<Vec<MapConfig>> },
    Filter { filters: Vec<FilterItem> },
    /// A widget type without interaction support, kept as an inert node.
    Unknown { widget_type: Option<String> },
}

/// The shape of a widget as it appears in host JSON.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct RawWidget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    widget_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    layer: Option<Layer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    charts: Option<Vec<Chart>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    traces: Option<Vec<Trace>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    filters: Option<Vec<FilterItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    maps: Option<Vec<MapConfig>>,
    #[serde(default, skip_serializing_if = "Interactions::is_empty")]
    interactions: Interactions,
}

impl Widget {
    /// The `widgetType` string of this widget.
    pub fn widget_type(&self) -> Option<&str> {
        self.kind.widget_type()
    }
}

impl WidgetKind {
    /// The `widgetType` string associated with the variant.
    pub fn widget_type(&self) -> Option<&str> {
        match self {
            WidgetKind::Chart { .. } => Some("chart"),
            WidgetKind::Table { .. } => Some("table"),
            WidgetKind::Counter { .. } => Some("counter"),
            WidgetKind::Map { .. } => Some("map"),
            WidgetKind::Filter { .. } => Some("filter"),
            WidgetKind::Unknown { widget_type } => widget_type.as_deref(),
        }
    }
}

impl Default for WidgetKind {
    fn default() -> Self {
        WidgetKind::Unknown { widget_type: None }
    }
}

impl From<RawWidget> for Widget {
    fn from(raw: RawWidget) -> Self {
        let RawWidget {
            id,
            widget_type,
            title,
            layer,
            charts,
            traces,
            filters,
            maps,
            interactions,
        } = raw;
        let kind = match widget_type.as_deref() {
            Some("chart") => {
                let charts = match (charts, traces) {
                    (Some(charts), _) => charts,
                    // A widget carrying traces directly acts as a single chart.
                    (None, Some(traces)) => vec![Chart {
                        traces,
                        ..Default::default()
                    }],
                    (None, None) => vec![],
                };
                WidgetKind::Chart { charts }
            }
            Some("table") => WidgetKind::Table { layer },
            Some("counter") => WidgetKind::Counter { layer },
            Some("map") => WidgetKind::Map { maps },
            Some("filter") => WidgetKind::Filter {
                filters: filters.unwrap_or_default(),
            },
            _ => WidgetKind::Unknown { widget_type },
        };
        Widget {
            id,
            title,
            kind,
            interactions,
        }
    }
}

impl From<Widget> for RawWidget {
    fn from(widget: Widget) -> Self {
        let Widget {
            id,
            title,
            kind,
            interactions,
        } = widget;
        let widget_type = kind.widget_type().map(str::to_string);
        let mut raw = RawWidget {
            id,
            widget_type,
            title,
            interactions,
            ..Default::default()
        };
        match kind {
            WidgetKind::Chart { charts } => raw.charts = Some(charts),
            WidgetKind::Table { layer } | WidgetKind::Counter { layer } => raw.layer = layer,
            WidgetKind::Map { maps } => raw.maps = maps,
            WidgetKind::Filter { filters } => raw.filters = Some(filters),
            WidgetKind::Unknown { .. } => (),
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dispatch_on_widget_type() {
        let w: Widget = serde_json::from_value(json!({
            "id": "t1",
            "widgetType": "table",
            "layer": { "name": "states", "type": "wms" }
        }))
        .unwrap();
        assert_eq!(w.widget_type(), Some("table"));
        match w.kind {
            WidgetKind::Table { layer: Some(layer) } => assert_eq!(layer.name.as_deref(), Some("states")),
            kind => panic!("unexpected kind {kind:?}"),
        }
    }

    #[test]
    fn test_unknown_widget_type_is_kept() {
        let w: Widget = serde_json::from_value(json!({ "id": "x", "widgetType": "text" })).unwrap();
        assert_eq!(w.kind, WidgetKind::Unknown { widget_type: Some("text".into()) });
        let v = serde_json::to_value(&w).unwrap();
        assert_eq!(v, json!({ "id": "x", "widgetType": "text" }));
    }

    #[test]
    fn test_chart_with_bare_traces() {
        let w: Widget = serde_json::from_value(json!({
            "id": "c1",
            "widgetType": "chart",
            "traces": [{ "id": "t1" }]
        }))
        .unwrap();
        let WidgetKind::Chart { charts } = w.kind else {
            panic!("expected a chart");
        };
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].traces[0].id.as_deref(), Some("t1"));
    }

    #[test]
    fn test_layer_keeps_unknown_properties() {
        let v = json!({ "name": "states", "layerFilter": { "filters": [] }, "opacity": 0.5 });
        let layer: Layer = serde_json::from_value(v.clone()).unwrap();
        assert_eq!(layer.name.as_deref(), Some("states"));
        assert!(layer.extra.contains_key("layerFilter"));
        assert_eq!(serde_json::to_value(&layer).unwrap(), v);
    }
}
