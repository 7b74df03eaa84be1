// Small 2D helpers shared by movement, AI and collision systems.

use super::state::WorldBounds;

pub fn length(x: f32, y: f32) -> f32 {
    (x * x + y * y).sqrt()
}

/// Returns the unit vector for (x, y), or (0, 0) for a zero-length input.
pub fn normalize(x: f32, y: f32) -> (f32, f32) {
    let len = length(x, y);
    if len <= f32::EPSILON {
        (0.0, 0.0)
    } else {
        (x / len, y / len)
    }
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Perpendicular (counter-clockwise) of a direction vector.
pub fn perpendicular(x: f32, y: f32) -> (f32, f32) {
    (-y, x)
}

pub fn distance_sq(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    let dx = bx - ax;
    let dy = by - ay;
    dx * dx + dy * dy
}

/// Circle-circle overlap test (touching counts as overlapping).
pub fn circles_overlap(ax: f32, ay: f32, ar: f32, bx: f32, by: f32, br: f32) -> bool {
    let r = ar + br;
    distance_sq(ax, ay, bx, by) <= r * r
}

/// Distance from a point to the segment (x1, y1)-(x2, y2).
///
/// The projection parameter is clamped to [0, 1] so the distance never extends past the
/// segment's endpoints.
pub fn point_segment_distance(px: f32, py: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let sx = x2 - x1;
    let sy = y2 - y1;
    let len_sq = sx * sx + sy * sy;
    if len_sq <= f32::EPSILON {
        return distance_sq(px, py, x1, y1).sqrt();
    }

    let t = (((px - x1) * sx + (py - y1) * sy) / len_sq).clamp(0.0, 1.0);
    let cx = x1 + sx * t;
    let cy = y1 + sy * t;
    distance_sq(px, py, cx, cy).sqrt()
}

pub fn clamp_to_bounds(x: f32, y: f32, bounds: WorldBounds) -> (f32, f32) {
    (x.clamp(0.0, bounds.width), y.clamp(0.0, bounds.height))
}

/// True when the point lies further than `margin` outside the world.
pub fn outside_bounds(x: f32, y: f32, bounds: WorldBounds, margin: f32) -> bool {
    x < -margin || y < -margin || x > bounds.width + margin || y > bounds.height + margin
}
