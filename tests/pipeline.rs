//! End-to-end pipeline: validate -> graph -> layout -> viewport

use bloodline::{
    ancestors, build_adjacency, build_connector_geometry, cull_nodes, descendants, hit_test_node,
    layout_tree, shortest_path, validate_dataset, world_to_screen, FamilyDataset, LayoutOptions,
    Point, Viewport, ALL_EDGE_TYPES,
};
use serde_json::json;

fn make_fixture_dataset() -> FamilyDataset {
    validate_dataset(&json!({
        "meta": {
            "dataset": "pipeline_fixture",
            "version": "1.0.0",
            "displayName": "House Atlas"
        },
        "people": [
            {
                "id": "p_root",
                "name": "Rakesh I",
                "display": { "styleTitle": "Patriarch" },
                "born": "1954-01-01",
                "died": "2024-01-01",
                "house": "Main Branch",
                "tags": ["founder", "elder"],
                "privacy": { "living": false }
            },
            {
                "id": "p_partner",
                "name": "Mira",
                "display": { "styleTitle": "Matriarch" },
                "house": "Main Branch",
                "tags": ["elder"],
                "privacy": { "living": true }
            },
            {
                "id": "p_child1",
                "name": "Aarav",
                "born": "1980-04-02",
                "house": "Main Branch",
                "tags": ["heir", "main"],
                "privacy": { "living": true }
            },
            {
                "id": "p_child2",
                "name": "Kavya",
                "born": "1984-09-30",
                "house": "Cadet Branch",
                "tags": ["archivist", "main"],
                "privacy": { "living": true }
            },
            {
                "id": "p_grand",
                "name": "Nila",
                "house": "Cadet Branch",
                "privacy": { "living": true }
            }
        ],
        "relationships": [
            { "id": "rel_partner_1", "type": "partner", "from": "p_root", "to": "p_partner", "status": "married" },
            { "id": "rel_parent_1", "type": "parent", "parentId": "p_root", "childId": "p_child1" },
            { "id": "rel_parent_2", "type": "parent", "parentId": "p_partner", "childId": "p_child1" },
            { "id": "rel_parent_3", "type": "parent", "parentId": "p_root", "childId": "p_child2" },
            { "id": "rel_parent_4", "type": "parent", "parentId": "p_child1", "childId": "p_grand" }
        ],
        "ui": {
            "theme": "royal-archive",
            "defaultRootPersonId": "p_root",
            "layout": "descendant"
        }
    }))
    .expect("fixture dataset validates")
}

fn make_viewport() -> Viewport {
    Viewport {
        x: -300.0,
        y: -120.0,
        scale: 1.0,
        width: 900.0,
        height: 640.0,
    }
}

#[test]
fn test_full_pipeline_from_dataset_to_screen() {
    let dataset = make_fixture_dataset();
    let graph = build_adjacency(&dataset);

    assert_eq!(
        descendants(&dataset.ui.default_root_person_id, &graph).len(),
        3
    );
    assert!(ancestors("p_grand", &graph).contains("p_partner"));
    assert_eq!(
        shortest_path("p_partner", "p_grand", &graph, &ALL_EDGE_TYPES),
        Some(vec![
            "p_partner".to_string(),
            "p_child1".to_string(),
            "p_grand".to_string()
        ])
    );

    let layout = layout_tree(
        &dataset.ui.default_root_person_id,
        &dataset,
        &LayoutOptions::default(),
    );
    assert_eq!(layout.nodes.len(), dataset.people.len());
    for edge in &layout.edges {
        assert!(layout.nodes.iter().any(|node| node.id == edge.from));
        assert!(layout.nodes.iter().any(|node| node.id == edge.to));
    }

    let viewport = make_viewport();
    let visible = cull_nodes(&layout, &viewport, 0.0);
    assert_eq!(visible.len(), layout.nodes.len());

    let root = layout
        .nodes
        .iter()
        .find(|node| node.id == "p_root")
        .expect("root positioned");
    let screen = world_to_screen(Point { x: root.x, y: root.y }, &viewport);
    assert_eq!(
        hit_test_node(screen.x, screen.y, &layout, &viewport),
        Some("p_root")
    );
}

#[test]
fn test_layout_is_reproducible_across_calls() {
    let dataset = make_fixture_dataset();
    let options = LayoutOptions {
        seed: Some(1),
        ..LayoutOptions::default()
    };

    let first = layout_tree("p_root", &dataset, &options);
    let second = layout_tree("p_root", &dataset, &options);
    assert_eq!(first, second);

    let first_json = serde_json::to_string(&first).unwrap();
    let second_json = serde_json::to_string(&second).unwrap();
    assert_eq!(first_json, second_json);
}

#[test]
fn test_relationship_order_does_not_change_layout() {
    let dataset = make_fixture_dataset();
    let mut shuffled = make_fixture_dataset();
    shuffled.relationships.reverse();

    let a = layout_tree("p_root", &dataset, &LayoutOptions::default());
    let b = layout_tree("p_root", &shuffled, &LayoutOptions::default());

    assert_eq!(a.nodes, b.nodes);
}

#[test]
fn test_connector_geometry_spans_family_units() {
    let dataset = make_fixture_dataset();
    let layout = layout_tree(
        "p_root",
        &dataset,
        &LayoutOptions {
            x_gap: 240.0,
            y_gap: 260.0,
            ..LayoutOptions::default()
        },
    );

    let geometry = build_connector_geometry(&dataset, &layout.nodes);
    assert!(geometry
        .badges
        .iter()
        .any(|badge| badge.key == "rel_partner_1-badge"));
    assert!(geometry
        .lines
        .iter()
        .any(|line| line.key.ends_with("-trunk")));
    assert!(geometry
        .lines
        .iter()
        .any(|line| line.key.ends_with("p_grand-drop")));
}

#[test]
fn test_invalid_dataset_reports_issues_not_panics() {
    let result = validate_dataset(&json!({
        "meta": { "dataset": "bad", "version": "1", "displayName": "Bad" },
        "people": [
            { "id": "p_a", "name": "A" },
            { "id": "p_a", "name": "A again" }
        ],
        "relationships": [
            { "id": "rel_1", "type": "parent", "parentId": "p_a", "childId": "p_missing" }
        ],
        "ui": { "defaultRootPersonId": "p_nobody" }
    }));

    let issues = result.expect_err("dataset is invalid");
    assert!(issues
        .iter()
        .any(|issue| issue.message == "duplicate person id: p_a"));
    assert!(issues
        .iter()
        .any(|issue| issue.message == "relationship references missing person: p_missing"));
    assert!(issues
        .iter()
        .any(|issue| issue.message == "default root person not found: p_nobody"));
}
