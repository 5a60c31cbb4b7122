//! Tests for routing emitted events to plugged targets.

use interlink_core::{
    Configuration, Interaction, Interactions,
    interaction::build_interaction_object,
    kind::EventType,
    route::{InteractionEvent, Router},
};
use serde_json::json;

fn interaction(id: &str, source: &str, target: &str, plugged: bool) -> Interaction {
    build_interaction_object(Some(id), source, target, None, Configuration::default(), plugged)
}

fn event(source: &str, data: serde_json::Value) -> InteractionEvent {
    InteractionEvent {
        event_type: EventType::FILTER_CHANGE,
        source_node_path: source.to_string(),
        data,
    }
}

#[test]
fn test_only_plugged_interactions_route() {
    let _ = env_logger::builder().is_test(true).try_init();
    let interactions = Interactions::new(vec![
        interaction("a", "widgets[f1].filters[fa]", "widgets[c1].traces[t1]", true),
        interaction("b", "widgets[f1].filters[fa]", "map.layers[l1]", false),
        interaction("c", "widgets[f1].filters[fb]", "map.layers[l1]", true),
    ]);
    let router = Router::from_lists([&interactions]);
    assert_eq!(router.graph().edge_count(), 2);

    let ops = router.route(&event("widgets[f1].filters[fa]", json!({ "op": "=" })));
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].interaction_id, "a");
    assert_eq!(ops[0].target_node_path, "widgets[c1].traces[t1]");
    assert_eq!(ops[0].data, json!({ "op": "=" }));
}

#[test]
fn test_unknown_source_routes_nowhere() {
    let interactions = Interactions::new(vec![interaction("a", "x", "y", true)]);
    let router = Router::new(&interactions);
    assert!(router.route(&event("z", json!(null))).is_empty());
    assert_eq!(router.targets("y").count(), 0);
}

#[test]
fn test_fan_out_to_every_target() {
    let interactions = Interactions::new(vec![
        interaction("a", "src", "t1", true),
        interaction("b", "src", "t2", true),
    ]);
    let router = Router::new(&interactions);
    let mut targets: Vec<_> = router.targets("src").map(|i| i.id.as_str()).collect();
    targets.sort();
    assert_eq!(targets, ["a", "b"]);
}

#[test]
fn test_filter_id_selects_data() {
    let interactions = Interactions::new(vec![
        interaction("a", "widgets[f1].filters[fa]", "t1", true),
    ]);
    let router = Router::new(&interactions);
    let data = json!([
        { "filterId": "fa", "value": 1 },
        { "filterId": "fb", "value": 2 }
    ]);
    let ops = router.route(&event("widgets[f1].filters[fa]", data));
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].data, json!({ "filterId": "fa", "value": 1 }));

    // No filter for this source: the target is skipped.
    let data = json!([{ "filterId": "fz", "value": 3 }]);
    assert!(router.route(&event("widgets[f1].filters[fa]", data)).is_empty());

    // Untagged lists are delivered whole.
    let data = json!([1, 2, 3]);
    let ops = router.route(&event("widgets[f1].filters[fa]", data.clone()));
    assert_eq!(ops[0].data, data);
}
