//! Adjacency graph, traversal selectors, and path search
//!
//! Derived, immutable index structures over a validated dataset, plus
//! the ancestor/descendant/shortest-path queries the workbench runs
//! against them.

pub mod adjacency;
pub mod path;
pub mod selectors;

pub use adjacency::{build_adjacency, AdjacencyGraph, GraphNeighbor};
pub use path::{shortest_path, ALL_EDGE_TYPES};
pub use selectors::{ancestors, descendants};
