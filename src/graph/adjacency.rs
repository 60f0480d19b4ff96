//! Adjacency graph built from a validated dataset
//!
//! The graph is an immutable derived snapshot: rebuilt in full whenever
//! the dataset changes, never mutated in place. Every person id is
//! pre-seeded into every index so lookups are total functions; a dangling
//! reference simply produces no edge (the validator reports those
//! upstream).

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::schema::{FamilyDataset, Relationship, RelationshipType};

/// One entry in a person's unified neighbor list.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GraphNeighbor {
    pub to: String,
    #[serde(rename = "type")]
    pub edge_type: RelationshipType,
    pub relationship_id: String,
}

/// Directional, partner, and unified relationship indexes over one
/// dataset. Value sets are ordered so traversal order is a total order
/// by id; neighbor lists preserve dataset relationship order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdjacencyGraph {
    pub people: BTreeSet<String>,
    pub children_by_parent: HashMap<String, BTreeSet<String>>,
    pub parents_by_child: HashMap<String, BTreeSet<String>>,
    pub partners_by_person: HashMap<String, BTreeSet<String>>,
    pub neighbors_by_person: HashMap<String, Vec<GraphNeighbor>>,
}

impl AdjacencyGraph {
    pub fn contains(&self, person_id: &str) -> bool {
        self.people.contains(person_id)
    }

    /// Children of a person, in id order. Total: unknown ids yield an
    /// empty iterator.
    pub fn children_of(&self, person_id: &str) -> impl Iterator<Item = &String> {
        self.children_by_parent.get(person_id).into_iter().flatten()
    }

    /// Parents of a person, in id order.
    pub fn parents_of(&self, person_id: &str) -> impl Iterator<Item = &String> {
        self.parents_by_child.get(person_id).into_iter().flatten()
    }

    /// Partners of a person, in id order. Symmetric by construction.
    pub fn partners_of(&self, person_id: &str) -> impl Iterator<Item = &String> {
        self.partners_by_person.get(person_id).into_iter().flatten()
    }

    /// All traversable neighbors, in dataset relationship order.
    pub fn neighbors_of(&self, person_id: &str) -> &[GraphNeighbor] {
        self.neighbors_by_person
            .get(person_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn add_neighbor_pair(&mut self, a: &str, b: &str, relationship: &Relationship) {
        self.neighbors_by_person
            .entry(a.to_string())
            .or_default()
            .push(GraphNeighbor {
                to: b.to_string(),
                edge_type: relationship.rel_type,
                relationship_id: relationship.id.clone(),
            });
        self.neighbors_by_person
            .entry(b.to_string())
            .or_default()
            .push(GraphNeighbor {
                to: a.to_string(),
                edge_type: relationship.rel_type,
                relationship_id: relationship.id.clone(),
            });
    }
}

/// Build the adjacency snapshot for a dataset. Pure and total: never
/// fails, assumes a structurally valid dataset.
pub fn build_adjacency(dataset: &FamilyDataset) -> AdjacencyGraph {
    let mut graph = AdjacencyGraph {
        people: dataset.people.iter().map(|p| p.id.clone()).collect(),
        ..AdjacencyGraph::default()
    };

    for person in &dataset.people {
        graph.children_by_parent.entry(person.id.clone()).or_default();
        graph.parents_by_child.entry(person.id.clone()).or_default();
        graph.partners_by_person.entry(person.id.clone()).or_default();
        graph.neighbors_by_person.entry(person.id.clone()).or_default();
    }

    for relationship in &dataset.relationships {
        match relationship.rel_type {
            RelationshipType::Parent => {
                let (Some(parent), Some(child)) = (
                    relationship.parent_id.as_deref(),
                    relationship.child_id.as_deref(),
                ) else {
                    continue;
                };
                graph
                    .children_by_parent
                    .entry(parent.to_string())
                    .or_default()
                    .insert(child.to_string());
                graph
                    .parents_by_child
                    .entry(child.to_string())
                    .or_default()
                    .insert(parent.to_string());
                graph.add_neighbor_pair(parent, child, relationship);
            }
            RelationshipType::Partner => {
                let (Some(from), Some(to)) =
                    (relationship.from.as_deref(), relationship.to.as_deref())
                else {
                    continue;
                };
                graph
                    .partners_by_person
                    .entry(from.to_string())
                    .or_default()
                    .insert(to.to_string());
                graph
                    .partners_by_person
                    .entry(to.to_string())
                    .or_default()
                    .insert(from.to_string());
                graph.add_neighbor_pair(from, to, relationship);
            }
            RelationshipType::Guardian | RelationshipType::StepParent => {
                // Path-traversable but not lineage edges.
                let (Some(parent), Some(child)) = (
                    relationship.parent_id.as_deref(),
                    relationship.child_id.as_deref(),
                ) else {
                    continue;
                };
                graph.add_neighbor_pair(parent, child, relationship);
            }
        }
    }

    tracing::debug!(
        people = graph.people.len(),
        relationships = dataset.relationships.len(),
        "adjacency graph built"
    );

    graph
}
