//! Viewport transforms, culling, and hit-testing
//!
//! The pure coordinate math behind pan/zoom interaction. World space is
//! where the layout lives; screen space is pixels.

pub mod cull;
pub mod transform;

pub use cull::cull_nodes;
pub use hit_test::hit_test_node;
pub use transform::{
    pan_viewport, screen_to_world, world_to_screen, zoom_viewport_at, Point, Viewport,
    DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE,
};
