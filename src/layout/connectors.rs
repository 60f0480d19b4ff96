//! Orthogonal connector routing for rendered edges
//!
//! Turns a positioned layout plus the dataset's relationships into
//! straight line segments and partner badges. Partner pairs get a short
//! horizontal bar above the couple; each family unit (children sharing
//! the same parent set and depth) gets a trunk descending from the
//! parent midpoint to a horizontal rail above the children, with drops
//! down to each child. Rails are assigned per-depth lanes greedily so
//! side-by-side families never share a rail, and children far apart
//! horizontally split into clusters with offset branch lanes.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::schema::{FamilyDataset, PartnerStatus, Relationship, RelationshipType};

use super::tree::LayoutNode;

const PARTNER_LINE_RISE: f64 = 38.0;
const PARTNER_LINE_INSET: f64 = 58.0;
const PARTNER_LINE_CLAMP: f64 = 24.0;
const TRUNK_START_DROP: f64 = 96.0;
const CHILD_ANCHOR_RISE: f64 = 96.0;
const RAIL_LANE_STEP: f64 = 18.0;
const RAIL_LANE_REUSE_GAP: f64 = 120.0;
const CHILD_CLUSTER_GAP_THRESHOLD: f64 = 300.0;
const BRANCH_LANE_RISE: f64 = 22.0;
const BRANCH_LANE_STEP: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineVariant {
    Partner,
    Trunk,
    Rail,
    Drop,
}

/// One straight segment in world coordinates. Keys are stable across
/// recomputation so renderers can diff by key.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConnectorLine {
    pub key: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub variant: LineVariant,
}

/// Marker drawn at the midpoint of a partner bar.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PartnerBadge {
    pub key: String,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PartnerStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeVariant {
    Married,
    Divorced,
    Neutral,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ConnectorGeometry {
    pub lines: Vec<ConnectorLine>,
    pub badges: Vec<PartnerBadge>,
}

pub fn partner_badge_variant(status: Option<PartnerStatus>) -> BadgeVariant {
    match status {
        Some(PartnerStatus::Divorced) | Some(PartnerStatus::Separated) => BadgeVariant::Divorced,
        Some(PartnerStatus::Married) | Some(PartnerStatus::Partnered) => BadgeVariant::Married,
        _ => BadgeVariant::Neutral,
    }
}

fn sorted_pair_key(a: &str, b: &str) -> String {
    if a < b {
        format!("{a}|{b}")
    } else {
        format!("{b}|{a}")
    }
}

/// JS-style number rendering for keys: integers drop the decimal point.
fn format_coord(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

struct FamilyGroup<'a> {
    group_key: String,
    child_nodes: Vec<&'a LayoutNode>,
    trunk_x: f64,
    top_parent_y: f64,
    span_start: f64,
    span_end: f64,
}

pub fn build_connector_geometry(
    dataset: &FamilyDataset,
    nodes: &[LayoutNode],
) -> ConnectorGeometry {
    let mut lines = Vec::new();
    let mut badges = Vec::new();

    let nodes_by_id: HashMap<&str, &LayoutNode> =
        nodes.iter().map(|node| (node.id.as_str(), node)).collect();

    // Partner relationships deduplicated by unordered pair, keeping
    // first-seen dataset position but the latest relationship.
    let mut partner_order: Vec<String> = Vec::new();
    let mut partner_by_pair: HashMap<String, &Relationship> = HashMap::new();
    // Child -> distinct parents, both present in the layout.
    let mut parents_by_child: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

    for relationship in &dataset.relationships {
        match relationship.rel_type {
            RelationshipType::Partner => {
                let (Some(from), Some(to)) =
                    (relationship.from.as_deref(), relationship.to.as_deref())
                else {
                    continue;
                };
                if !nodes_by_id.contains_key(from) || !nodes_by_id.contains_key(to) {
                    continue;
                }
                let pair = sorted_pair_key(from, to);
                if partner_by_pair.insert(pair.clone(), relationship).is_none() {
                    partner_order.push(pair);
                }
            }
            RelationshipType::Parent => {
                let (Some(parent), Some(child)) = (
                    relationship.parent_id.as_deref(),
                    relationship.child_id.as_deref(),
                ) else {
                    continue;
                };
                if !nodes_by_id.contains_key(parent) || !nodes_by_id.contains_key(child) {
                    continue;
                }
                let parents = parents_by_child.entry(child).or_default();
                if !parents.contains(&parent) {
                    parents.push(parent);
                }
            }
            RelationshipType::Guardian | RelationshipType::StepParent => {}
        }
    }

    for pair in &partner_order {
        let relationship = partner_by_pair[pair];
        let from = nodes_by_id[relationship.from.as_deref().unwrap_or_default()];
        let to = nodes_by_id[relationship.to.as_deref().unwrap_or_default()];

        let (left, right) = if from.x <= to.x { (from, to) } else { (to, from) };
        let y = (left.y + right.y) / 2.0 - PARTNER_LINE_RISE;

        let x1 = (left.x + PARTNER_LINE_INSET).min(right.x - PARTNER_LINE_CLAMP);
        let x2 = (right.x - PARTNER_LINE_INSET).max(left.x + PARTNER_LINE_CLAMP);

        if x2 - x1 > 8.0 {
            lines.push(ConnectorLine {
                key: relationship.id.clone(),
                x1,
                y1: y,
                x2,
                y2: y,
                variant: LineVariant::Partner,
            });
        }

        badges.push(PartnerBadge {
            key: format!("{}-badge", relationship.id),
            x: (left.x + right.x) / 2.0,
            y,
            status: relationship.status,
        });
    }

    // Family units: children keyed by (depth, x-ordered parent set).
    let mut groups: BTreeMap<String, (Vec<&str>, Vec<&str>)> = BTreeMap::new();
    for (&child, parents) in &parents_by_child {
        let child_node = nodes_by_id[child];
        let mut parent_ids = parents.clone();
        parent_ids.sort_by(|a, b| {
            nodes_by_id[a]
                .x
                .total_cmp(&nodes_by_id[b].x)
                .then_with(|| a.cmp(b))
        });

        let key = format!("{}:{}", child_node.depth, parent_ids.join("|"));
        groups
            .entry(key)
            .or_insert_with(|| (parent_ids, Vec::new()))
            .1
            .push(child);
    }

    let mut groups_by_depth: BTreeMap<i32, Vec<FamilyGroup>> = BTreeMap::new();
    for (group_key, (parent_ids, child_ids)) in groups {
        let parent_nodes: Vec<&LayoutNode> =
            parent_ids.iter().map(|id| nodes_by_id[*id]).collect();
        let mut child_nodes: Vec<&LayoutNode> =
            child_ids.iter().map(|id| nodes_by_id[*id]).collect();
        child_nodes.sort_by(|a, b| a.x.total_cmp(&b.x).then_with(|| a.id.cmp(&b.id)));

        let trunk_x = if parent_nodes.len() >= 2 {
            (parent_nodes[0].x + parent_nodes[parent_nodes.len() - 1].x) / 2.0
        } else {
            parent_nodes[0].x
        };
        let top_parent_y = parent_nodes
            .iter()
            .map(|node| node.y)
            .fold(f64::NEG_INFINITY, f64::max);
        let min_child_x = child_nodes[0].x;
        let max_child_x = child_nodes[child_nodes.len() - 1].x;
        let depth = child_nodes[0].depth;

        groups_by_depth.entry(depth).or_default().push(FamilyGroup {
            group_key,
            child_nodes,
            trunk_x,
            top_parent_y,
            span_start: min_child_x.min(trunk_x),
            span_end: max_child_x.max(trunk_x),
        });
    }

    for depth_groups in groups_by_depth.values_mut() {
        depth_groups.sort_by(|a, b| {
            a.span_start
                .total_cmp(&b.span_start)
                .then_with(|| a.trunk_x.total_cmp(&b.trunk_x))
                .then_with(|| a.group_key.cmp(&b.group_key))
        });

        // Greedy left-to-right lane allocation; a lane is reusable once
        // its last span's right edge plus the reuse gap has cleared.
        let mut lane_end_x: Vec<f64> = Vec::new();

        for group in depth_groups.iter() {
            let mut lane_index = 0;
            while lane_index < lane_end_x.len()
                && group.span_start <= lane_end_x[lane_index] + RAIL_LANE_REUSE_GAP
            {
                lane_index += 1;
            }
            if lane_index == lane_end_x.len() {
                lane_end_x.push(group.span_end);
            } else {
                lane_end_x[lane_index] = group.span_end;
            }

            let trunk_start_y = group.top_parent_y + TRUNK_START_DROP;
            let child_anchor_y = group.child_nodes[0].y - CHILD_ANCHOR_RISE;
            let base_rail_y = if group.child_nodes.len() > 1 {
                child_anchor_y - 20.0
            } else {
                child_anchor_y - 8.0
            };
            let cluster_rail_y = base_rail_y - lane_index as f64 * RAIL_LANE_STEP;

            // Children split into clusters wherever the x-gap to the
            // previous child exceeds the threshold.
            let mut clusters: Vec<Vec<&LayoutNode>> = Vec::new();
            for &child_node in &group.child_nodes {
                let starts_new_cluster = clusters.last().map_or(true, |cluster| {
                    child_node.x - cluster[cluster.len() - 1].x > CHILD_CLUSTER_GAP_THRESHOLD
                });
                if starts_new_cluster {
                    clusters.push(vec![child_node]);
                } else if let Some(cluster) = clusters.last_mut() {
                    cluster.push(child_node);
                }
            }

            let multi_cluster = clusters.len() > 1;
            let branch_lane_base_y = cluster_rail_y - BRANCH_LANE_RISE;
            let branch_lane_ys: Vec<f64> = if multi_cluster {
                (0..clusters.len())
                    .map(|index| branch_lane_base_y - index as f64 * BRANCH_LANE_STEP)
                    .collect()
            } else {
                vec![cluster_rail_y]
            };
            let trunk_end_y = branch_lane_ys
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);

            if trunk_end_y - trunk_start_y > 4.0 {
                lines.push(ConnectorLine {
                    key: format!("{}-trunk", group.group_key),
                    x1: group.trunk_x,
                    y1: trunk_start_y,
                    x2: group.trunk_x,
                    y2: trunk_end_y,
                    variant: LineVariant::Trunk,
                });
            }

            for (cluster_index, cluster) in clusters.iter().enumerate() {
                let branch_lane_y = branch_lane_ys
                    .get(cluster_index)
                    .copied()
                    .unwrap_or(cluster_rail_y);
                let min_x = cluster[0].x;
                let max_x = cluster[cluster.len() - 1].x;
                let center_x = (min_x + max_x) / 2.0;

                if (center_x - group.trunk_x).abs() > 2.0 && !multi_cluster {
                    lines.push(ConnectorLine {
                        key: format!("{}-single-cluster-rail", group.group_key),
                        x1: group.trunk_x,
                        y1: cluster_rail_y,
                        x2: center_x,
                        y2: cluster_rail_y,
                        variant: LineVariant::Rail,
                    });
                } else if multi_cluster {
                    if (center_x - group.trunk_x).abs() > 6.0 {
                        lines.push(ConnectorLine {
                            key: format!("{}-branch-lane-{cluster_index}", group.group_key),
                            x1: group.trunk_x,
                            y1: branch_lane_y,
                            x2: center_x,
                            y2: branch_lane_y,
                            variant: LineVariant::Trunk,
                        });
                    }
                    if cluster_rail_y - branch_lane_y > 2.0 {
                        lines.push(ConnectorLine {
                            key: format!("{}-branch-drop-{cluster_index}", group.group_key),
                            x1: center_x,
                            y1: branch_lane_y,
                            x2: center_x,
                            y2: cluster_rail_y,
                            variant: LineVariant::Trunk,
                        });
                    }
                }

                if max_x - min_x > 6.0 {
                    lines.push(ConnectorLine {
                        key: format!(
                            "{}-cluster-rail-{}",
                            group.group_key,
                            format_coord(center_x)
                        ),
                        x1: min_x,
                        y1: cluster_rail_y,
                        x2: max_x,
                        y2: cluster_rail_y,
                        variant: LineVariant::Rail,
                    });
                }

                for &child_node in cluster {
                    let child_end_y = child_node.y - CHILD_ANCHOR_RISE;
                    if child_node.x == group.trunk_x && cluster_rail_y == child_end_y {
                        continue;
                    }

                    if (child_node.x - group.trunk_x).abs() > 2.0 && group.child_nodes.len() == 1 {
                        lines.push(ConnectorLine {
                            key: format!("{}-{}-elbow", group.group_key, child_node.id),
                            x1: group.trunk_x,
                            y1: cluster_rail_y,
                            x2: child_node.x,
                            y2: cluster_rail_y,
                            variant: LineVariant::Rail,
                        });
                    }

                    if child_end_y - cluster_rail_y > 2.0 {
                        lines.push(ConnectorLine {
                            key: format!("{}-{}-drop", group.group_key, child_node.id),
                            x1: child_node.x,
                            y1: cluster_rail_y,
                            x2: child_node.x,
                            y2: child_end_y,
                            variant: LineVariant::Drop,
                        });
                    }
                }
            }
        }
    }

    ConnectorGeometry { lines, badges }
}
