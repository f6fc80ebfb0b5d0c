//! Separating-axis narrow phase for convex polygons and circles.
//!
//! Axis generation order is fixed so results are reproducible for a given
//! ordered pair: shape_a's edge normals, then shape_b's edge normals, then (for
//! circle/polygon pairs) the axis from the circle center to the nearest
//! polygon vertex. Circle/circle pairs use the single center-to-center axis.
//! Parallel axes are dropped after their first occurrence, and when two axes
//! report the same penetration depth the earlier one wins.

use glam::Vec2;
use hecs::Entity;

use crate::components::{Placed, Shape};
use crate::geometry::{round_to, SEPARATION_PRECISION};

/// Two unit axes count as parallel when their cross product is below this.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Identity of one participant in a collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeRef {
    /// The owning body's entity, if the body lives in a scene.
    pub owner: Option<Entity>,
    pub trigger: bool,
}

impl ShapeRef {
    fn of(placed: &Placed<'_>) -> Self {
        Self {
            owner: placed.hitbox.owner(),
            trigger: placed.hitbox.trigger,
        }
    }
}

/// Result of a positive overlap test.
///
/// `sep` points from shape_a into shape_b and its length is the penetration
/// depth. Moving shape_a by `-sep`, or shape_b by `+sep`, separates them.
/// Components are rounded to 4 decimal places.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    pub shape_a: ShapeRef,
    pub shape_b: ShapeRef,
    pub sep: Vec2,
}

impl CollisionInfo {
    pub fn depth(&self) -> f32 {
        self.sep.length()
    }

    /// Unit direction from shape_a toward shape_b (zero if `sep` rounded away).
    pub fn normal(&self) -> Vec2 {
        self.sep.normalize_or_zero()
    }
}

/// Test two placed hitboxes for overlap and compute the minimum translation.
///
/// Touching shapes (zero-width overlap on some axis) are not overlapping.
/// Both polygons must be convex.
///
/// The push direction comes from the center-to-center vector. When the
/// centers coincide there is none, so the winning axis keeps its generated
/// orientation and `overlap(b, a)` returns the same `sep` as `overlap(a, b)`
/// rather than its negation.
pub fn overlap(a: Placed<'_>, b: Placed<'_>) -> Option<CollisionInfo> {
    let mut best: Option<(Vec2, f32)> = None;

    for axis in candidate_axes(&a, &b) {
        let (min_a, max_a) = a.project(axis);
        let (min_b, max_b) = b.project(axis);
        if max_a <= min_b || max_b <= min_a {
            return None;
        }
        let depth = (max_a - min_b).min(max_b - min_a);
        if best.map_or(true, |(_, least)| depth < least) {
            best = Some((axis, depth));
        }
    }

    let (axis, depth) = best?;
    let toward_b = b.center() - a.center();
    let axis = if toward_b.dot(axis) < 0.0 { -axis } else { axis };

    Some(CollisionInfo {
        shape_a: ShapeRef::of(&a),
        shape_b: ShapeRef::of(&b),
        sep: round_to(axis * depth, SEPARATION_PRECISION),
    })
}

/// Unit axes to test, in generation order, with parallel duplicates removed.
pub fn candidate_axes(a: &Placed<'_>, b: &Placed<'_>) -> Vec<Vec2> {
    let raw = match (a.hitbox.shape(), b.hitbox.shape()) {
        (Shape::Circle { .. }, Shape::Circle { .. }) => {
            vec![(b.center() - a.center()).try_normalize().unwrap_or(Vec2::Y)]
        }
        (Shape::Polygon { .. }, Shape::Polygon { .. }) => {
            let mut axes = a.edge_normals();
            axes.extend(b.edge_normals());
            axes
        }
        (Shape::Circle { .. }, Shape::Polygon { .. }) => circle_polygon_axes(a, b),
        (Shape::Polygon { .. }, Shape::Circle { .. }) => circle_polygon_axes(b, a),
    };

    let mut axes: Vec<Vec2> = Vec::with_capacity(raw.len());
    for axis in raw {
        if !axes
            .iter()
            .any(|kept| kept.perp_dot(axis).abs() < PARALLEL_EPSILON)
        {
            axes.push(axis);
        }
    }
    axes
}

fn circle_polygon_axes(circle: &Placed<'_>, polygon: &Placed<'_>) -> Vec<Vec2> {
    let mut axes = polygon.edge_normals();
    let center = circle.center();
    let nearest = polygon
        .world_vertices()
        .into_iter()
        .min_by(|p, q| p.distance_squared(center).total_cmp(&q.distance_squared(center)));
    // A center sitting exactly on a vertex gives no usable direction.
    if let Some(axis) = nearest.and_then(|v| (v - center).try_normalize()) {
        axes.push(axis);
    }
    axes
}
