//! Tests for stamping and resolving node paths.

use interlink_core::{
    Layer, NodePath, TreeNode, Widget, add_node_path_to_tree, generate_root_tree,
    path::{self, extract_trace_from_widget_by_node_path, node_path_of},
    query::find_node_by_path,
};
use serde_json::json;

fn widgets() -> Vec<Widget> {
    serde_json::from_value(json!([
        {
            "id": "c1", "widgetType": "chart",
            "charts": [{ "traces": [{ "id": "t1", "layer": { "name": "states" } }] }]
        },
        {
            "id": "c2", "widgetType": "chart",
            "charts": [
                { "chartId": "a", "traces": [{ "id": "t2" }] },
                { "chartId": "b", "traces": [{ "id": "t3" }, { "title": "anonymous" }] }
            ]
        },
        { "id": "m1", "widgetType": "map", "maps": [
            { "mapId": "map1", "layers": [{ "id": "l1", "type": "wms" }] }
        ] },
        { "id": "f1", "widgetType": "filter", "filters": [{ "id": "fa" }] },
        { "id": "x", "widgetType": "text" }
    ]))
    .unwrap()
}

fn layers() -> Vec<Layer> {
    serde_json::from_value(json!([{ "id": "l9", "type": "wfs", "name": "parcels" }])).unwrap()
}

fn stamped() -> TreeNode {
    add_node_path_to_tree(&generate_root_tree(&widgets(), &layers()))
}

fn path_of(tree: &TreeNode, id: &str) -> String {
    node_path_of(tree, id).unwrap().to_string()
}

#[test]
fn test_single_chart_trace_path() {
    let tree = stamped();
    assert_eq!(path_of(&tree, "t1"), "widgets[c1].traces[t1]");
    assert_eq!(path_of(&tree, "c1"), "widgets[c1]");
}

#[test]
fn test_paths_by_widget_type() {
    let tree = stamped();
    assert_eq!(tree.node_path(), Some(""));
    assert_eq!(path_of(&tree, "widgets"), "widgets");
    assert_eq!(path_of(&tree, "t3"), "widgets[c2].charts[b].traces[t3]");
    assert_eq!(path_of(&tree, "l1"), "widgets[m1].maps[map1].layers[l1]");
    assert_eq!(path_of(&tree, "fa"), "widgets[f1].filters[fa]");
    assert_eq!(path_of(&tree, "x"), "widgets[x]");
    assert_eq!(path_of(&tree, "l9"), "map.layers[l9]");
}

#[test]
fn test_node_without_id_inherits_parent_path() {
    let tree = stamped();
    let anonymous = find_node_by_title(&tree, "anonymous").unwrap();
    assert_eq!(anonymous.node_path(), Some("widgets[c2].charts[b].traces"));
}

fn find_node_by_title<'a>(tree: &'a TreeNode, title: &str) -> Option<&'a TreeNode> {
    let mut found = None;
    tree.visit(&mut |n| {
        if found.is_none() && n.title == title {
            found = Some(n);
        }
    });
    found
}

#[test]
fn test_every_node_is_stamped_and_parses() {
    let tree = stamped();
    tree.visit(&mut |n| {
        let p = n.node_path().expect("unstamped node");
        let parsed: NodePath = p.parse().unwrap_or_else(|e| panic!("{p}: {e}"));
        assert_eq!(parsed.to_string(), p);
        if n.id.as_deref() != Some("root") {
            assert!(!parsed.is_root(), "{:?} resolved to the root path", n.id);
        }
    });
}

#[test]
fn test_paths_are_stable_across_rebuilds() {
    let a = stamped();
    let b = stamped();
    let mut pa = vec![];
    let mut pb = vec![];
    a.visit(&mut |n| pa.push(n.node_path.clone()));
    b.visit(&mut |n| pb.push(n.node_path.clone()));
    assert_eq!(pa, pb);
    // Stamping twice changes nothing.
    assert_eq!(add_node_path_to_tree(&a), a);
}

#[test]
fn test_child_path() {
    let named = TreeNode::named_collection("traces", "Traces");
    assert_eq!(path::child_path(&named, ""), "traces");
    assert_eq!(path::child_path(&named, "widgets[c1]"), "widgets[c1].traces");
    let element = TreeNode::element(Some("t1"), None);
    assert_eq!(path::child_path(&element, "widgets[c1].traces"), "widgets[c1].traces[t1]");
    let empty_id = TreeNode::element(Some(""), None);
    assert_eq!(path::child_path(&empty_id, "widgets"), "widgets");
}

#[test]
fn test_find_node_by_path() {
    let tree = stamped();
    let node = find_node_by_path(&tree, "widgets[c2].charts[a].traces[t2]").unwrap();
    assert_eq!(node.id.as_deref(), Some("t2"));
    assert!(find_node_by_path(&tree, "widgets[nope]").is_none());
}

#[test]
fn test_extract_trace_from_widget() {
    let widgets = widgets();
    let c2 = &widgets[1];
    let trace = extract_trace_from_widget_by_node_path(c2, "widgets[c2].charts[b].traces[t3]").unwrap();
    assert_eq!(trace.id.as_deref(), Some("t3"));
    assert!(extract_trace_from_widget_by_node_path(c2, "widgets[c2]").is_none());
    assert!(extract_trace_from_widget_by_node_path(c2, "widgets[c2].traces[zz]").is_none());
    assert!(extract_trace_from_widget_by_node_path(&widgets[2], "widgets[m1].traces[t3]").is_none());
}
