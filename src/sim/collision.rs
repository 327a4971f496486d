//! Overlap tests between circle and rectangle collision shapes
//!
//! Contacts are detection-only: no normals or penetration response, just
//! whether two shapes at given positions overlap. Fast bodies flagged as
//! precise are swept against the other body's motion so they cannot skip over
//! thin or oncoming targets in a single step.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Collision shape, centered on the entity position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    /// Axis-aligned rectangle
    Rect { size: Vec2 },
}

impl Shape {
    pub fn circle(radius: f32) -> Self {
        Shape::Circle { radius }
    }

    pub fn rect(size: Vec2) -> Self {
        Shape::Rect { size }
    }

    /// Smallest distance from the center to the shape's edge
    pub fn inner_extent(&self) -> f32 {
        match *self {
            Shape::Circle { radius } => radius,
            Shape::Rect { size } => size.x.min(size.y) * 0.5,
        }
    }
}

/// Check whether two shapes overlap. Touching edges do not count.
pub fn shapes_overlap(a_pos: Vec2, a: &Shape, b_pos: Vec2, b: &Shape) -> bool {
    match (*a, *b) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            circle_circle(a_pos, ra, b_pos, rb)
        }
        (Shape::Circle { radius }, Shape::Rect { size }) => circle_rect(a_pos, radius, b_pos, size),
        (Shape::Rect { size }, Shape::Circle { radius }) => circle_rect(b_pos, radius, a_pos, size),
        (Shape::Rect { size: sa }, Shape::Rect { size: sb }) => rect_rect(a_pos, sa, b_pos, sb),
    }
}

#[inline]
pub fn circle_circle(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) < reach * reach
}

/// Circle against an axis-aligned rectangle centered at `rect_center`
pub fn circle_rect(center: Vec2, radius: f32, rect_center: Vec2, size: Vec2) -> bool {
    let half = size * 0.5;
    let local = center - rect_center;
    // Closest point on the rectangle to the circle center
    let closest = local.clamp(-half, half);
    local.distance_squared(closest) < radius * radius
}

pub fn rect_rect(a: Vec2, sa: Vec2, b: Vec2, sb: Vec2) -> bool {
    let reach = (sa + sb) * 0.5;
    let delta = (a - b).abs();
    delta.x < reach.x && delta.y < reach.y
}

/// Swept overlap between two moving shapes over one step.
///
/// Both bodies move linearly from their `from` to their `to` positions. The
/// test runs in `b`'s frame: `a`'s relative path is sampled at intervals no
/// longer than the smaller inner extent, so neither shape can step past the
/// other, even when both are moving.
pub fn swept_overlap(
    a_from: Vec2,
    a_to: Vec2,
    a: &Shape,
    b_from: Vec2,
    b_to: Vec2,
    b: &Shape,
) -> bool {
    let rel_from = a_from - b_from;
    let travel = (a_to - b_to) - rel_from;
    let step = a.inner_extent().min(b.inner_extent()).max(0.5);
    let samples = (travel.length() / step).ceil().max(1.0) as u32;

    (0..=samples).any(|i| {
        let t = i as f32 / samples as f32;
        shapes_overlap(rel_from + travel * t, a, Vec2::ZERO, b)
    })
}
