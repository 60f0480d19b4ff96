//! Shortest relationship path between two people
//!
//! Breadth-first search over the unified neighbor lists, filtered by
//! allowed edge types. BFS guarantees a shortest path in edge-count
//! terms; among equally short paths the winner follows neighbor-list
//! order, which is dataset relationship order.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::schema::RelationshipType;

use super::adjacency::AdjacencyGraph;

/// All four traversable edge types, the default filter.
pub const ALL_EDGE_TYPES: [RelationshipType; 4] = [
    RelationshipType::Parent,
    RelationshipType::Partner,
    RelationshipType::Guardian,
    RelationshipType::StepParent,
];

/// Shortest path from `start_id` to `end_id` inclusive, or `None` when
/// unreachable or either id is absent. `start_id == end_id` returns the
/// single-element path without searching.
pub fn shortest_path(
    start_id: &str,
    end_id: &str,
    graph: &AdjacencyGraph,
    allowed_edge_types: &[RelationshipType],
) -> Option<Vec<String>> {
    if start_id == end_id {
        return Some(vec![start_id.to_string()]);
    }
    if !graph.contains(start_id) || !graph.contains(end_id) {
        return None;
    }

    let mut queue: VecDeque<String> = VecDeque::from([start_id.to_string()]);
    let mut visited: HashSet<String> = HashSet::from([start_id.to_string()]);
    let mut previous: HashMap<String, String> = HashMap::new();

    while let Some(current) = queue.pop_front() {
        for neighbor in graph.neighbors_of(&current) {
            if !allowed_edge_types.contains(&neighbor.edge_type) || visited.contains(&neighbor.to) {
                continue;
            }
            visited.insert(neighbor.to.clone());
            previous.insert(neighbor.to.clone(), current.clone());

            if neighbor.to == end_id {
                let mut path = vec![end_id.to_string()];
                let mut cursor = end_id;
                while let Some(prior) = previous.get(cursor) {
                    path.push(prior.clone());
                    cursor = prior;
                }
                path.reverse();
                return Some(path);
            }
            queue.push_back(neighbor.to.clone());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_adjacency;
    use crate::schema::validate_dataset;
    use serde_json::json;

    // Two components: {r — c — g, r ~ q} and {x}. The only link between
    // q and c runs through the parent edge r -> c.
    fn fixture() -> AdjacencyGraph {
        let dataset = validate_dataset(&json!({
            "meta": { "dataset": "t", "version": "1", "displayName": "T" },
            "people": [
                { "id": "p_r", "name": "R" },
                { "id": "p_q", "name": "Q" },
                { "id": "p_c", "name": "C" },
                { "id": "p_g", "name": "G" },
                { "id": "p_x", "name": "X" }
            ],
            "relationships": [
                { "id": "rel_1", "type": "partner", "from": "p_r", "to": "p_q" },
                { "id": "rel_2", "type": "parent", "parentId": "p_r", "childId": "p_c" },
                { "id": "rel_3", "type": "parent", "parentId": "p_c", "childId": "p_g" }
            ],
            "ui": { "defaultRootPersonId": "p_r" }
        }))
        .unwrap();
        build_adjacency(&dataset)
    }

    #[test]
    fn test_same_start_and_end() {
        let graph = fixture();
        assert_eq!(
            shortest_path("p_r", "p_r", &graph, &ALL_EDGE_TYPES),
            Some(vec!["p_r".to_string()])
        );
    }

    #[test]
    fn test_multi_hop_path() {
        let graph = fixture();
        assert_eq!(
            shortest_path("p_q", "p_g", &graph, &ALL_EDGE_TYPES),
            Some(vec![
                "p_q".to_string(),
                "p_r".to_string(),
                "p_c".to_string(),
                "p_g".to_string()
            ])
        );
    }

    #[test]
    fn test_disconnected_components_return_none() {
        let graph = fixture();
        assert_eq!(shortest_path("p_r", "p_x", &graph, &ALL_EDGE_TYPES), None);
    }

    #[test]
    fn test_absent_id_returns_none() {
        let graph = fixture();
        assert_eq!(shortest_path("p_r", "p_ghost", &graph, &ALL_EDGE_TYPES), None);
        assert_eq!(shortest_path("p_ghost", "p_r", &graph, &ALL_EDGE_TYPES), None);
    }

    #[test]
    fn test_edge_type_filter_blocks_parent_only_targets() {
        let graph = fixture();
        // C is only reachable via parent edges; a partner-only search fails.
        assert_eq!(
            shortest_path("p_r", "p_c", &graph, &[RelationshipType::Partner]),
            None
        );
        // But the partner edge itself still works.
        assert_eq!(
            shortest_path("p_r", "p_q", &graph, &[RelationshipType::Partner]),
            Some(vec!["p_r".to_string(), "p_q".to_string()])
        );
    }
}
