//! Tests for editing the interaction records of a widget.

use interlink_core::{
    Configuration, Constraints, Interactions, TreeNode, add_node_path_to_tree,
    interaction::{build_interaction_object, matches_interaction},
    kind::{DataType, EventType, TargetType},
    node::{EventDescriptor, InteractionMetadata, TargetDescriptor},
};

const SOURCE: &str = "widgets[f1].filters[fa]";
const TARGET: &str = "widgets[c1].traces[t1]";

fn target_node() -> TreeNode {
    let mut node = TreeNode::element(Some("t1"), None).with_metadata(InteractionMetadata {
        events: vec![],
        targets: vec![
            TargetDescriptor::new(TargetType::APPLY_FILTER, DataType::LAYER_FILTER)
                .with_constraints(Constraints::layer(Some("states"))),
        ],
    });
    node.node_path = Some(TARGET.to_string());
    node
}

fn event(layer: &str) -> EventDescriptor {
    EventDescriptor::new(EventType::FILTER_CHANGE, DataType::LAYER_FILTER)
        .with_constraints(Constraints::layer(Some(layer)))
}

#[test]
fn test_build_interaction_object() {
    let a = build_interaction_object(None, SOURCE, TARGET, None, Configuration::default(), true);
    let b = build_interaction_object(None, SOURCE, TARGET, None, Configuration::default(), true);
    assert_ne!(a.id, b.id);
    assert!(uuid::Uuid::parse_str(&a.id).is_ok());
    assert_eq!(a.source.node_path, SOURCE);
    assert_eq!(a.target.node_path, TARGET);

    let kept = build_interaction_object(Some("i1"), SOURCE, TARGET, None, Configuration::default(), false);
    assert_eq!(kept.id, "i1");
    assert!(!kept.plugged);
}

#[test]
fn test_matches_interaction_ignores_id() {
    let a = build_interaction_object(Some("a"), SOURCE, TARGET, None, Configuration::default(), true);
    assert!(matches_interaction(&a, SOURCE, TARGET));
    assert!(!matches_interaction(&a, TARGET, SOURCE));
    assert!(!matches_interaction(&a, SOURCE, "widgets[c1]"));
}

#[test]
fn test_plug_creates_then_updates() {
    let mut interactions = Interactions::default();
    let node = target_node();
    assert!(interactions.set_plugged(SOURCE, &node, &event("states"), true));
    assert_eq!(interactions.len(), 1);
    let created = interactions.find(SOURCE, TARGET).unwrap();
    assert!(created.plugged);
    let meta = created.target.meta_data.as_ref().unwrap();
    assert_eq!(meta.target_type, TargetType::APPLY_FILTER);
    let id = created.id.clone();

    assert!(!interactions.set_plugged(SOURCE, &node, &event("states"), false));
    assert_eq!(interactions.len(), 1);
    assert!(!interactions.is_plugged(SOURCE, TARGET));

    assert!(interactions.toggle_plugged(SOURCE, &node, &event("states")));
    assert_eq!(interactions.get(&id).map(|i| i.plugged), Some(true));
    assert_eq!(interactions.connected().count(), 1);
}

#[test]
fn test_unmatched_constraints_refuse_plug() {
    let mut interactions = Interactions::default();
    let node = target_node();
    assert!(!interactions.set_plugged(SOURCE, &node, &event("parcels"), true));
    assert!(interactions.is_empty());
}

#[test]
fn test_force_plug_lifecycle() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut interactions = Interactions::default();
    let node = target_node();
    let signal = event("parcels");
    let force = Configuration { force_plug: true };

    interactions.set_configuration(SOURCE, &node, &signal, force);
    assert_eq!(interactions.configuration(SOURCE, TARGET), force);
    assert!(!interactions.is_plugged(SOURCE, TARGET));

    assert!(interactions.set_plugged(SOURCE, &node, &signal, true));
    assert!(interactions.is_plugged(SOURCE, TARGET));

    // Withdrawing the force also withdraws the plug.
    interactions.set_configuration(SOURCE, &node, &signal, Configuration::default());
    assert!(!interactions.is_plugged(SOURCE, TARGET));
    assert!(!interactions.set_plugged(SOURCE, &node, &signal, true));
}

#[test]
fn test_target_without_path_is_ignored() {
    let mut interactions = Interactions::default();
    let mut node = target_node();
    node.node_path = None;
    assert!(!interactions.set_plugged(SOURCE, &node, &event("states"), true));
    assert!(interactions.is_empty());
}

#[test]
fn test_detach() {
    let mut interactions = Interactions::default();
    interactions.set_plugged(SOURCE, &target_node(), &event("states"), true);
    let id = interactions.iter().next().unwrap().id.clone();
    let removed = interactions.detach(&id).unwrap();
    assert_eq!(removed.id, id);
    assert!(interactions.is_empty());
    assert!(interactions.detach(&id).is_none());
}

#[test]
fn test_records_deserialize_from_widget_json() {
    let interactions: Interactions = serde_json::from_str(
        r#"[{
            "id": "i1",
            "source": { "nodePath": "widgets[f1].filters[fa]" },
            "target": { "nodePath": "widgets[c1].traces[t1]" },
            "plugged": true
        }]"#,
    )
    .unwrap();
    let i = interactions.get("i1").unwrap();
    assert!(i.plugged);
    assert!(!i.configuration.force_plug);
    assert!(i.target.meta_data.is_none());
}

#[test]
fn test_plug_all_plugs_only_pluggable_elements() {
    let element = |id: &str, layer: &str| {
        TreeNode::element(Some(id), None).with_metadata(InteractionMetadata {
            events: vec![],
            targets: vec![
                TargetDescriptor::new(TargetType::APPLY_FILTER, DataType::LAYER_FILTER)
                    .with_constraints(Constraints::layer(Some(layer))),
            ],
        })
    };
    let tree = TreeNode::collection(Some("root"), Some("Root")).with_children(vec![
        TreeNode::named_collection("widgets", "Widgets").with_children(vec![
            element("direct", "states"),
            element("forced", "parcels"),
            element("other", "roads"),
            TreeNode::element(Some("inert"), None),
        ]),
    ]);
    let tree = add_node_path_to_tree(&tree);
    let forced = tree.children[0].children[1].clone();
    let signal = event("states");

    let mut interactions = Interactions::default();
    interactions.set_configuration(SOURCE, &forced, &signal, Configuration { force_plug: true });
    assert_eq!(interactions.plug_all(SOURCE, &tree, &signal), 2);
    assert!(interactions.is_plugged(SOURCE, "widgets[direct]"));
    assert!(interactions.is_plugged(SOURCE, "widgets[forced]"));
    assert!(interactions.find(SOURCE, "widgets[other]").is_none());
    assert!(interactions.find(SOURCE, "widgets[inert]").is_none());
    assert_eq!(interactions.len(), 2);

    // Plugging all again changes nothing.
    let before = interactions.clone();
    assert_eq!(interactions.plug_all(SOURCE, &tree, &signal), 2);
    assert_eq!(interactions, before);
}
