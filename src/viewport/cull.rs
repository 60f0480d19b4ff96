//! Visibility culling
//!
//! Axis-aligned bounding-box test of each node against the viewport's
//! world-space rectangle, optionally expanded by a margin so cards just
//! off-screen stay mounted during a pan.

use crate::layout::{LayoutNode, LayoutResult};

use super::transform::Viewport;

pub fn cull_nodes<'a>(
    layout: &'a LayoutResult,
    viewport: &Viewport,
    margin: f64,
) -> Vec<&'a LayoutNode> {
    let left = viewport.x - margin;
    let top = viewport.y - margin;
    let right = viewport.x + viewport.width / viewport.scale + margin;
    let bottom = viewport.y + viewport.height / viewport.scale + margin;

    layout
        .nodes
        .iter()
        .filter(|node| {
            let half_w = node.width / 2.0;
            let half_h = node.height / 2.0;
            node.x + half_w >= left
                && node.x - half_w <= right
                && node.y + half_h >= top
                && node.y - half_h <= bottom
        })
        .collect()
}
