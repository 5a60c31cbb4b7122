//! Application of routed target operations to widget configurations.
//!
//! Operations are applied to a copy of the target widget, leaving the host
//! to store the result. Only chart traces are currently supported as targets.

use crate::{
    NodePath, Widget,
    node::Mode,
    route::TargetOperation,
    widget::{Layer, WidgetKind},
};
use serde_json::{Map, Value, json};

/// The layer attribute receiving interaction filters when the operation's
/// target descriptor names none.
pub const LAYER_FILTER_ATTRIBUTE: &str = "layerFilter.filters";

/// Wrap the data delivered by an interaction as a filter owned by it.
///
/// The filter's `id` is the interaction id, so later deliveries from the
/// same interaction replace it.
pub fn interaction_filter(interaction_id: &str, data: &Value) -> Value {
    json!({
        "id": interaction_id,
        "format": "logic",
        "version": "1.0.0",
        "logic": "OR",
        "filters": [data],
    })
}

/// The updated copy of `widget` after applying `op`.
///
/// Returns `None` when the operation doesn't address a trace of this widget.
pub fn apply_target_operation(widget: &Widget, op: &TargetOperation) -> Option<Widget> {
    let path: NodePath = op.target_node_path.parse().ok()?;
    let (widget_id, trace_id) = path.trace_info()?;
    if widget.id.as_deref() != Some(widget_id) {
        return None;
    }
    let attribute = op
        .meta_data
        .as_ref()
        .and_then(|m| m.attribute_name.as_deref())
        .unwrap_or(LAYER_FILTER_ATTRIBUTE);
    let mode = op.meta_data.as_ref().map(|m| m.mode).unwrap_or_default();

    let mut widget = widget.clone();
    let WidgetKind::Chart { charts } = &mut widget.kind else {
        log::debug!("widget `{widget_id}` is not a chart, skipping `{}`", op.target_node_path);
        return None;
    };
    let Some(trace) = charts
        .iter_mut()
        .flat_map(|c| &mut c.traces)
        .find(|t| t.id.as_deref() == Some(trace_id))
    else {
        log::debug!("no trace `{trace_id}` in widget `{widget_id}`");
        return None;
    };
    let layer = trace.layer.get_or_insert_with(Layer::default);
    let filter = interaction_filter(&op.interaction_id, &op.data);
    match mode {
        Mode::Upsert => upsert_layer_attribute(layer, attribute, filter)?,
    }
    log::debug!(
        "applied interaction {} to `{}`",
        op.interaction_id,
        op.target_node_path
    );
    Some(widget)
}

/// Insert `entry` into the list at the dot separated `attribute` of `layer`,
/// replacing any entry with the same `id`.
fn upsert_layer_attribute(layer: &mut Layer, attribute: &str, entry: Value) -> Option<()> {
    let mut value = serde_json::to_value(&*layer).ok()?;
    upsert(&mut value, attribute, entry)?;
    *layer = serde_json::from_value(value).ok()?;
    Some(())
}

fn upsert(target: &mut Value, attribute: &str, entry: Value) -> Option<()> {
    let (parents, last) = match attribute.rsplit_once('.') {
        Some((parents, last)) => (Some(parents), last),
        None => (None, attribute),
    };
    let mut obj = target.as_object_mut()?;
    for key in parents.into_iter().flat_map(|p| p.split('.')) {
        let slot = obj.entry(key).or_insert(Value::Null);
        if slot.is_null() {
            *slot = Value::Object(Map::new());
        }
        obj = slot.as_object_mut()?;
    }
    let list = obj.entry(last).or_insert(Value::Null);
    if list.is_null() {
        *list = Value::Array(vec![]);
    }
    let list = list.as_array_mut()?;
    let id = entry.get("id").cloned();
    match list.iter_mut().find(|e| e.get("id") == id.as_ref()) {
        Some(existing) => *existing = entry,
        None => list.push(entry),
    }
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_creates_missing_parents() {
        let mut v = json!({ "name": "states" });
        upsert(&mut v, "layerFilter.filters", json!({ "id": "a" })).unwrap();
        assert_eq!(v, json!({ "name": "states", "layerFilter": { "filters": [{ "id": "a" }] } }));
    }

    #[test]
    fn test_upsert_rejects_non_list() {
        let mut v = json!({ "layerFilter": { "filters": 3 } });
        assert!(upsert(&mut v, "layerFilter.filters", json!({ "id": "a" })).is_none());
    }
}
