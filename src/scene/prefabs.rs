use glam::Vec2;
use hecs::Entity;

use crate::components::{CollisionType, Hitbox, RigidBody, Shape};
use crate::config::BodyConfig;
use crate::error::PhysicsError;
use crate::scene::BodyWorld;

const WALL_COLOR: [u8; 4] = [128, 0, 0, 255];
const BALL_COLOR: [u8; 4] = [40, 160, 255, 255];
const SENSOR_COLOR: [u8; 4] = [255, 220, 0, 128];

/// Immovable axis-aligned slab.
pub fn spawn_wall(
    world: &mut BodyWorld,
    center: Vec2,
    size: Vec2,
    defaults: &BodyConfig,
) -> Result<Entity, PhysicsError> {
    let config = BodyConfig {
        collision: CollisionType::Static,
        rotation: 0.0,
        ..defaults.clone()
    };
    let hitbox = Hitbox::new(Shape::rect(size.x, size.y)?).with_color(WALL_COLOR);
    Ok(world.spawn(RigidBody::new(hitbox, center, &config)?))
}

pub fn spawn_ball(
    world: &mut BodyWorld,
    center: Vec2,
    radius: f32,
    velocity: Vec2,
    defaults: &BodyConfig,
) -> Result<Entity, PhysicsError> {
    let config = BodyConfig {
        collision: CollisionType::Dynamic,
        ..defaults.clone()
    };
    let hitbox = Hitbox::new(Shape::circle(radius)?).with_color(BALL_COLOR);
    let mut body = RigidBody::new(hitbox, center, &config)?;
    body.velocity = velocity;
    Ok(world.spawn(body))
}

/// Dynamic box, optionally tilted and spinning.
pub fn spawn_crate(
    world: &mut BodyWorld,
    center: Vec2,
    size: Vec2,
    angular_velocity: f32,
    defaults: &BodyConfig,
) -> Result<Entity, PhysicsError> {
    let config = BodyConfig {
        collision: CollisionType::Dynamic,
        ..defaults.clone()
    };
    let hitbox = Hitbox::new(Shape::rect(size.x, size.y)?);
    let mut body = RigidBody::new(hitbox, center, &config)?;
    body.angular_velocity = angular_velocity;
    Ok(world.spawn(body))
}

/// Static trigger volume: reports overlaps, never pushes.
pub fn spawn_sensor(world: &mut BodyWorld, center: Vec2, size: Vec2) -> Result<Entity, PhysicsError> {
    let config = BodyConfig {
        collision: CollisionType::Static,
        ..BodyConfig::default()
    };
    let hitbox = Hitbox::new(Shape::rect(size.x, size.y)?)
        .as_trigger()
        .with_color(SENSOR_COLOR);
    Ok(world.spawn(RigidBody::new(hitbox, center, &config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walls_are_static_whatever_the_defaults() {
        let mut world = BodyWorld::new();
        let wall = spawn_wall(&mut world, Vec2::ZERO, Vec2::new(4.0, 1.0), &BodyConfig::default())
            .unwrap();
        let body = world.body(wall).unwrap();
        assert!(body.is_static());
        assert_eq!(body.placed().bounding_box_dimensions(), Vec2::new(4.0, 1.0));
    }

    #[test]
    fn crate_keeps_its_spin() {
        let mut world = BodyWorld::new();
        let e = spawn_crate(&mut world, Vec2::ZERO, Vec2::ONE, 2.0, &BodyConfig::default()).unwrap();
        world.step(0.5);
        let body = world.body(e).unwrap();
        assert_eq!(body.rotation, 1.0);
        assert_eq!(body.hitbox().owner(), Some(e));
    }

    #[test]
    fn bad_sizes_are_rejected() {
        let mut world = BodyWorld::new();
        assert!(spawn_ball(&mut world, Vec2::ZERO, 0.0, Vec2::ZERO, &BodyConfig::default()).is_err());
        assert!(spawn_sensor(&mut world, Vec2::ZERO, Vec2::new(-1.0, 1.0)).is_err());
        assert!(world.is_empty());
    }
}
