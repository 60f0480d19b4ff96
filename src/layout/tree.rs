//! Deterministic top-down tree layout
//!
//! Pure function from `(root id, dataset, options)` to positioned nodes
//! and sorted edges. Determinism is load-bearing for the renderer's
//! frame diffing, so every traversal runs in a total order: BFS expands
//! partners and children in id order, levels sort by born date, label,
//! then id, and the final node list sorts by `(depth, id)`.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, VecDeque};

use chrono::NaiveDate;
use serde::Serialize;

use crate::graph::{build_adjacency, AdjacencyGraph};
use crate::schema::{FamilyDataset, LayoutMode, Person, RelationshipType};

use super::partners::snap_partners;

/// One positioned person card. `x`/`y` are the card's top-left corner in
/// world coordinates; `depth` is the generation row.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LayoutNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub depth: i32,
}

/// One renderable relationship edge. Only `parent` and `partner`
/// relationships survive into the layout.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LayoutEdge {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub edge_type: RelationshipType,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct LayoutResult {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
}

/// Layout tuning knobs. `seed` is accepted for API stability; the
/// algorithm has no randomness to seed and ignores it.
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    pub mode: LayoutMode,
    pub seed: Option<u64>,
    pub node_width: f64,
    pub node_height: f64,
    pub x_gap: f64,
    pub y_gap: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            mode: LayoutMode::Descendant,
            seed: None,
            node_width: 160.0,
            node_height: 84.0,
            x_gap: 220.0,
            y_gap: 160.0,
        }
    }
}

/// BFS depth assignment from the root. Partners share their partner's
/// depth; children sit one below, and the minimum depth wins when a
/// child is reachable through parents at different depths.
fn compute_descendant_depths(root_id: &str, graph: &AdjacencyGraph) -> HashMap<String, i32> {
    let mut depths: HashMap<String, i32> = HashMap::from([(root_id.to_string(), 0)]);
    let mut queue: VecDeque<String> = VecDeque::from([root_id.to_string()]);

    while let Some(current) = queue.pop_front() {
        let current_depth = depths.get(&current).copied().unwrap_or(0);

        // partners_of / children_of iterate in id order.
        for partner in graph.partners_of(&current) {
            if !depths.contains_key(partner) {
                depths.insert(partner.clone(), current_depth);
                queue.push_back(partner.clone());
            }
        }
        for child in graph.children_of(&current) {
            let next_depth = current_depth + 1;
            let known = depths.get(child).copied();
            if known.is_none() || next_depth < known.unwrap_or(i32::MAX) {
                depths.insert(child.clone(), next_depth);
                queue.push_back(child.clone());
            }
        }
    }

    depths
}

/// Tolerant born-date parse: full `YYYY-MM-DD`, else `YYYY[-MM]` pinned
/// to the first of the month/year.
fn born_date(born: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(born, "%Y-%m-%d") {
        return Some(date);
    }
    let mut parts = born.splitn(3, '-');
    let year: i32 = parts.next()?.trim().parse().ok()?;
    let month: u32 = parts
        .next()
        .and_then(|part| part.trim().parse().ok())
        .unwrap_or(1);
    NaiveDate::from_ymd_opt(year, month.clamp(1, 12), 1)
}

fn display_label<'a>(person: Option<&'a Person>, id: &'a str) -> &'a str {
    person.map(Person::display_label).unwrap_or(id)
}

/// Strict total order for people within a level: born date ascending,
/// dated before undated, then display label, then id.
fn compare_level_order(a: &str, b: &str, people: &HashMap<&str, &Person>) -> Ordering {
    let person_a = people.get(a).copied();
    let person_b = people.get(b).copied();
    let born_a = person_a.and_then(|p| p.born.as_deref()).and_then(born_date);
    let born_b = person_b.and_then(|p| p.born.as_deref()).and_then(born_date);

    match (born_a, born_b) {
        (Some(date_a), Some(date_b)) => date_a
            .cmp(&date_b)
            .then_with(|| display_label(person_a, a).cmp(display_label(person_b, b)))
            .then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => display_label(person_a, a)
            .cmp(display_label(person_b, b))
            .then_with(|| a.cmp(b)),
    }
}

/// One edge per parent/partner relationship whose endpoints both carry a
/// depth. Anything else is silently excluded; dangling references are
/// the validator's problem, not the layout's.
fn build_layout_edges(dataset: &FamilyDataset, depths: &HashMap<String, i32>) -> Vec<LayoutEdge> {
    let mut edges = Vec::new();

    for relationship in &dataset.relationships {
        match relationship.rel_type {
            RelationshipType::Parent => {
                let (Some(parent), Some(child)) = (
                    relationship.parent_id.as_deref(),
                    relationship.child_id.as_deref(),
                ) else {
                    continue;
                };
                if depths.contains_key(parent) && depths.contains_key(child) {
                    edges.push(LayoutEdge {
                        id: Some(relationship.id.clone()),
                        from: parent.to_string(),
                        to: child.to_string(),
                        edge_type: relationship.rel_type,
                    });
                }
            }
            RelationshipType::Partner => {
                let (Some(from), Some(to)) =
                    (relationship.from.as_deref(), relationship.to.as_deref())
                else {
                    continue;
                };
                if depths.contains_key(from) && depths.contains_key(to) {
                    edges.push(LayoutEdge {
                        id: Some(relationship.id.clone()),
                        from: from.to_string(),
                        to: to.to_string(),
                        edge_type: relationship.rel_type,
                    });
                }
            }
            RelationshipType::Guardian | RelationshipType::StepParent => {}
        }
    }

    edges.sort_by(|a, b| {
        a.edge_type
            .as_str()
            .cmp(b.edge_type.as_str())
            .then_with(|| a.from.cmp(&b.from))
            .then_with(|| a.to.cmp(&b.to))
            .then_with(|| a.id.cmp(&b.id))
    });

    edges
}

/// Place each level left-to-right at `x_gap` spacing, centered on x = 0,
/// rows at `depth * y_gap`.
fn build_level_nodes(levels: &BTreeMap<i32, Vec<String>>, options: &LayoutOptions) -> Vec<LayoutNode> {
    let mut nodes = Vec::new();

    for (&depth, ids) in levels {
        let start_x = -((ids.len() as f64 - 1.0) * options.x_gap) / 2.0;
        for (index, id) in ids.iter().enumerate() {
            nodes.push(LayoutNode {
                id: id.clone(),
                x: start_x + index as f64 * options.x_gap,
                y: depth as f64 * options.y_gap,
                width: options.node_width,
                height: options.node_height,
                depth,
            });
        }
    }

    nodes
}

fn average(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut total = 0.0;
    let mut count = 0usize;
    for value in values {
        total += value;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(total / count as f64)
    }
}

/// Re-order each level (depth > 0) under its anchors: average x of
/// depth-1 parents first, else average x of same-depth partners, else
/// unanchored at the left. Ties fall back to the level comparator.
fn reorder_levels_by_anchors(
    levels: &BTreeMap<i32, Vec<String>>,
    depths: &HashMap<String, i32>,
    graph: &AdjacencyGraph,
    reference_x: &HashMap<String, f64>,
    people: &HashMap<&str, &Person>,
) -> BTreeMap<i32, Vec<String>> {
    let mut next = BTreeMap::new();

    for (&depth, ids) in levels {
        if depth == 0 {
            next.insert(depth, ids.clone());
            continue;
        }

        let mut scored: Vec<(u8, f64, &String)> = ids
            .iter()
            .map(|id| {
                let parent_anchor = average(
                    graph
                        .parents_of(id)
                        .filter(|parent| depths.get(parent.as_str()) == Some(&(depth - 1)))
                        .filter_map(|parent| reference_x.get(parent).copied()),
                );
                let partner_anchor = average(
                    graph
                        .partners_of(id)
                        .filter(|partner| depths.get(partner.as_str()) == Some(&depth))
                        .filter_map(|partner| reference_x.get(partner).copied()),
                );

                match (parent_anchor, partner_anchor) {
                    (Some(score), _) => (0u8, score, id),
                    (None, Some(score)) => (1, score, id),
                    (None, None) => (2, 0.0, id),
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then_with(|| a.1.total_cmp(&b.1))
                .then_with(|| compare_level_order(a.2, b.2, people))
        });

        next.insert(depth, scored.into_iter().map(|(_, _, id)| id.clone()).collect());
    }

    next
}

/// Compute the full layout for a root. Unknown roots degrade to a lone
/// depth-0 node rather than failing.
pub fn layout_tree(root_id: &str, dataset: &FamilyDataset, options: &LayoutOptions) -> LayoutResult {
    if options.mode != LayoutMode::Descendant {
        tracing::warn!(
            mode = ?options.mode,
            "layout mode not implemented, falling back to descendant"
        );
    }

    let graph = build_adjacency(dataset);
    let mut depths = compute_descendant_depths(root_id, &graph);
    depths.entry(root_id.to_string()).or_insert(0);

    let people: HashMap<&str, &Person> = dataset
        .people
        .iter()
        .map(|person| (person.id.as_str(), person))
        .collect();

    let mut levels: BTreeMap<i32, Vec<String>> = BTreeMap::new();
    for (id, &depth) in &depths {
        levels.entry(depth).or_default().push(id.clone());
    }
    for ids in levels.values_mut() {
        ids.sort_by(|a, b| compare_level_order(a, b, &people));
    }

    let edges = build_layout_edges(dataset, &depths);
    let partner_gap = (options.x_gap - 40.0).min(180.0);

    let provisional = snap_partners(&build_level_nodes(&levels, options), &edges, partner_gap);
    let reference_x: HashMap<String, f64> = provisional
        .iter()
        .map(|node| (node.id.clone(), node.x))
        .collect();
    let reordered = reorder_levels_by_anchors(&levels, &depths, &graph, &reference_x, &people);

    let mut nodes = snap_partners(&build_level_nodes(&reordered, options), &edges, partner_gap);
    nodes.sort_by(|a, b| a.depth.cmp(&b.depth).then_with(|| a.id.cmp(&b.id)));

    tracing::debug!(
        root = root_id,
        nodes = nodes.len(),
        edges = edges.len(),
        "layout computed"
    );

    LayoutResult { nodes, edges }
}
