use std::f32::consts::TAU;

use glam::Vec2;
use hecs::Entity;

use crate::error::PhysicsError;
use crate::geometry::{Aabb, Pose};

/// Collision shape in body-local coordinates.
///
/// Polygons must be convex. Nothing checks this; SAT results for concave
/// input are meaningless.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    Polygon { vertices: Vec<Vec2> },
}

impl Shape {
    pub fn circle(radius: f32) -> Result<Self, PhysicsError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(PhysicsError::InvalidRadius(radius));
        }
        Ok(Self::Circle { radius })
    }

    /// Convex polygon from an ordered vertex loop (either winding).
    pub fn polygon(vertices: Vec<Vec2>) -> Result<Self, PhysicsError> {
        if vertices.len() < 3 {
            return Err(PhysicsError::DegeneratePolygon {
                vertices: vertices.len(),
            });
        }
        Ok(Self::Polygon { vertices })
    }

    /// Axis-aligned rectangle centered on the body origin.
    pub fn rect(width: f32, height: f32) -> Result<Self, PhysicsError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !(valid(width) && valid(height)) {
            return Err(PhysicsError::InvalidExtent { width, height });
        }
        let (hw, hh) = (width / 2.0, height / 2.0);
        Self::polygon(vec![
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ])
    }

    /// Regular polygon with `sides` vertices on a circle of `radius`,
    /// the first vertex on the +x axis.
    pub fn regular_polygon(sides: usize, radius: f32) -> Result<Self, PhysicsError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(PhysicsError::InvalidRadius(radius));
        }
        let vertices = (0..sides)
            .map(|i| {
                let angle = TAU * i as f32 / sides as f32;
                Vec2::new(angle.cos(), angle.sin()) * radius
            })
            .collect();
        Self::polygon(vertices)
    }
}

/// Shape attached to a rigid body.
///
/// The hitbox never owns or caches its owner's pose. It keeps only the owner's
/// entity handle; world-space geometry is produced by [`Hitbox::at`] from a pose
/// the caller reads off the owner at query time.
#[derive(Debug, Clone, PartialEq)]
pub struct Hitbox {
    shape: Shape,
    /// World-space offset from the owner's position. Not rotated with the body.
    pub offset: Vec2,
    /// Triggers report overlaps but never take part in positional resolution.
    pub trigger: bool,
    /// Draw the outline in debug views.
    pub debug: bool,
    /// RGBA fill used by debug drawing.
    pub color: [u8; 4],
    owner: Option<Entity>,
}

impl Hitbox {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            offset: Vec2::ZERO,
            trigger: false,
            debug: false,
            color: [0, 255, 0, 255],
            owner: None,
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn as_trigger(mut self) -> Self {
        self.trigger = true;
        self
    }

    pub fn with_color(mut self, color: [u8; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Entity of the body this hitbox belongs to, once attached to a scene.
    pub fn owner(&self) -> Option<Entity> {
        self.owner
    }

    pub(crate) fn attach(&mut self, owner: Entity) {
        self.owner = Some(owner);
    }

    /// Bind the hitbox to the owner's current pose for one query.
    pub fn at(&self, pose: Pose) -> Placed<'_> {
        Placed { hitbox: self, pose }
    }
}

/// A hitbox seen through one snapshot of its owner's pose.
///
/// Every accessor recomputes from the local geometry; nothing is stored between
/// calls, so a `Placed` built after a pose change always reflects it.
#[derive(Debug, Clone, Copy)]
pub struct Placed<'a> {
    pub hitbox: &'a Hitbox,
    pub pose: Pose,
}

impl Placed<'_> {
    /// Polygon vertices rotated by the owner's rotation, then translated by the
    /// owner's position plus the offset. Empty for circles.
    pub fn world_vertices(&self) -> Vec<Vec2> {
        match &self.hitbox.shape {
            Shape::Circle { .. } => Vec::new(),
            Shape::Polygon { vertices } => vertices
                .iter()
                .map(|&v| self.pose.transform_point(v) + self.hitbox.offset)
                .collect(),
        }
    }

    /// Circle center, or the vertex average of a polygon.
    pub fn center(&self) -> Vec2 {
        match &self.hitbox.shape {
            Shape::Circle { .. } => self.pose.position + self.hitbox.offset,
            Shape::Polygon { .. } => {
                let verts = self.world_vertices();
                verts.iter().copied().sum::<Vec2>() / verts.len() as f32
            }
        }
    }

    /// Unit normals of each edge, in vertex order. Empty for circles.
    pub fn edge_normals(&self) -> Vec<Vec2> {
        let verts = self.world_vertices();
        (0..verts.len())
            .filter_map(|i| {
                let edge = verts[(i + 1) % verts.len()] - verts[i];
                edge.perp().try_normalize()
            })
            .collect()
    }

    /// Scalar interval `(min, max)` of the shape projected onto a unit `axis`.
    pub fn project(&self, axis: Vec2) -> (f32, f32) {
        match &self.hitbox.shape {
            Shape::Circle { radius } => {
                let c = self.center().dot(axis);
                (c - radius, c + radius)
            }
            Shape::Polygon { .. } => self
                .world_vertices()
                .into_iter()
                .map(|v| v.dot(axis))
                .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), d| {
                    (lo.min(d), hi.max(d))
                }),
        }
    }

    /// Axis-aligned extents of the transformed shape. Drawing and debug only.
    pub fn bounding_box(&self) -> Aabb {
        match &self.hitbox.shape {
            Shape::Circle { radius } => {
                Aabb::from_center_half_extents(self.center(), Vec2::splat(*radius))
            }
            // Polygons always have >= 3 vertices, so the fallback is unreachable.
            Shape::Polygon { .. } => Aabb::from_points(self.world_vertices())
                .unwrap_or_else(|| Aabb::from_center_half_extents(self.center(), Vec2::ZERO)),
        }
    }

    pub fn bounding_box_dimensions(&self) -> Vec2 {
        self.bounding_box().size()
    }
}
