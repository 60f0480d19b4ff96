//! Deterministic tree layout and connector routing
//!
//! `layout_tree` positions people; `snap_partners` aligns couples;
//! `build_connector_geometry` routes the orthogonal edge segments a
//! renderer draws between them.

pub mod connectors;
pub mod partners;
pub mod tree;

pub use connectors::{
    build_connector_geometry, partner_badge_variant, BadgeVariant, ConnectorGeometry,
    ConnectorLine, LineVariant, PartnerBadge,
};
pub use partners::snap_partners;
pub use tree::{layout_tree, LayoutEdge, LayoutNode, LayoutOptions, LayoutResult};
