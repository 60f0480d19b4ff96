//! World/screen coordinate transforms
//!
//! The viewport stores its top-left corner in world coordinates plus a
//! uniform scale. All functions are pure; pan and zoom return a new
//! viewport. `zoom_at` keeps the world point under the cursor fixed
//! across the scale change.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_SCALE: f64 = 0.1;
pub const DEFAULT_MAX_SCALE: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub width: f64,
    pub height: f64,
}

pub fn world_to_screen(point: Point, viewport: &Viewport) -> Point {
    Point {
        x: (point.x - viewport.x) * viewport.scale,
        y: (point.y - viewport.y) * viewport.scale,
    }
}

pub fn screen_to_world(point: Point, viewport: &Viewport) -> Point {
    Point {
        x: point.x / viewport.scale + viewport.x,
        y: point.y / viewport.scale + viewport.y,
    }
}

/// Pan by a screen-space delta; the world shift is scale-corrected so a
/// drag moves content 1:1 with the pointer.
pub fn pan_viewport(viewport: &Viewport, dx_screen: f64, dy_screen: f64) -> Viewport {
    Viewport {
        x: viewport.x - dx_screen / viewport.scale,
        y: viewport.y - dy_screen / viewport.scale,
        ..*viewport
    }
}

/// Scale by `factor` (clamped to `[min_scale, max_scale]`) while keeping
/// `screen_point` anchored on the same world position.
pub fn zoom_viewport_at(
    viewport: &Viewport,
    factor: f64,
    screen_point: Point,
    min_scale: f64,
    max_scale: f64,
) -> Viewport {
    let before = screen_to_world(screen_point, viewport);
    let next_scale = (viewport.scale * factor).clamp(min_scale, max_scale);
    let next = Viewport {
        scale: next_scale,
        ..*viewport
    };
    let after = screen_to_world(screen_point, &next);
    Viewport {
        x: next.x + (before.x - after.x),
        y: next.y + (before.y - after.y),
        ..next
    }
}
