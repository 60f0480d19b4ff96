//! Partner adjacency snap
//!
//! Partners at the same depth are presentation-peers: each pair is
//! re-centered around the average of their pre-snap positions and pushed
//! `partner_gap / 2` to either side. Positions are read from the input
//! slice and written to a fresh copy, so overlapping pairs all snap
//! relative to the same reference placement.

use std::collections::HashMap;

use crate::schema::RelationshipType;

use super::tree::{LayoutEdge, LayoutNode};

pub fn snap_partners(
    nodes: &[LayoutNode],
    edges: &[LayoutEdge],
    partner_gap: f64,
) -> Vec<LayoutNode> {
    let mut next: Vec<LayoutNode> = nodes.to_vec();
    let index_by_id: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(index, node)| (node.id.as_str(), index))
        .collect();

    for edge in edges {
        if edge.edge_type != RelationshipType::Partner {
            continue;
        }
        let (Some(&left), Some(&right)) = (
            index_by_id.get(edge.from.as_str()),
            index_by_id.get(edge.to.as_str()),
        ) else {
            continue;
        };
        if nodes[left].depth != nodes[right].depth {
            continue;
        }

        let center = (nodes[left].x + nodes[right].x) / 2.0;
        next[left].x = center - partner_gap / 2.0;
        next[right].x = center + partner_gap / 2.0;
    }

    next
}
