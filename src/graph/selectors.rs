//! Ancestor and descendant set computation
//!
//! Iterative BFS over the directional indexes. The start person is never
//! included in their own result; merged lineages are deduplicated.

use std::collections::{BTreeSet, VecDeque};

use super::adjacency::AdjacencyGraph;

/// Every ancestor of a person, any number of parent hops up.
pub fn ancestors(person_id: &str, graph: &AdjacencyGraph) -> BTreeSet<String> {
    let mut result = BTreeSet::new();
    let mut queue: VecDeque<String> = graph.parents_of(person_id).cloned().collect();

    while let Some(current) = queue.pop_front() {
        if !result.insert(current.clone()) {
            continue;
        }
        for parent in graph.parents_of(&current) {
            if !result.contains(parent) {
                queue.push_back(parent.clone());
            }
        }
    }

    result
}

/// Every descendant of a person, any number of child hops down.
pub fn descendants(person_id: &str, graph: &AdjacencyGraph) -> BTreeSet<String> {
    let mut result = BTreeSet::new();
    let mut queue: VecDeque<String> = graph.children_of(person_id).cloned().collect();

    while let Some(current) = queue.pop_front() {
        if !result.insert(current.clone()) {
            continue;
        }
        for child in graph.children_of(&current) {
            if !result.contains(child) {
                queue.push_back(child.clone());
            }
        }
    }

    result
}
