//! Bloodline - family tree graph and layout engine
//!
//! The core behind the genealogy workbench: validate a family dataset,
//! derive its adjacency graph, compute a deterministic top-down layout
//! with routed connectors, and run the viewport math for pan/zoom
//! interaction.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bloodline::{build_adjacency, layout_tree, load_dataset, LayoutOptions};
//!
//! let text = std::fs::read_to_string("royals.json").unwrap();
//! let dataset = load_dataset(&text).unwrap();
//! let graph = build_adjacency(&dataset);
//! let layout = layout_tree(&dataset.ui.default_root_person_id, &dataset, &LayoutOptions::default());
//! assert_eq!(layout.nodes.len(), graph.people.len());
//! ```

pub mod error;
pub mod filters;
pub mod graph;
pub mod layout;
pub mod schema;
pub mod viewport;

pub use error::DatasetError;
pub use filters::{
    collect_filter_options, living_status, matches_filters, matches_search, FilterOptions,
    LivingFilter, LivingStatus, PersonFilters,
};
pub use graph::{
    ancestors, build_adjacency, descendants, shortest_path, AdjacencyGraph, GraphNeighbor,
    ALL_EDGE_TYPES,
};
pub use layout::{
    build_connector_geometry, layout_tree, snap_partners, ConnectorGeometry, ConnectorLine,
    LayoutEdge, LayoutNode, LayoutOptions, LayoutResult, LineVariant, PartnerBadge,
};
pub use schema::{
    load_dataset, validate_dataset, FamilyDataset, IssueCode, Person, Relationship,
    RelationshipType, ValidationIssue,
};
pub use viewport::{
    cull_nodes, hit_test_node, pan_viewport, screen_to_world, world_to_screen, zoom_viewport_at,
    Point, Viewport,
};
