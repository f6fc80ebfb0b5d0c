use std::time::Duration;

use glam::Vec2;
use hecs::Entity;
use serde::{Deserialize, Serialize};

use crate::components::hitbox::{Hitbox, Placed};
use crate::config::BodyConfig;
use crate::engine::time::{Deferred, Timer};
use crate::error::PhysicsError;
use crate::geometry::{clamp_components, Pose};

/// How a body takes part in collision resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionType {
    /// Immovable (infinite mass for collision response). Never integrated.
    Static,
    #[default]
    Dynamic,
}

/// Kinematic state plus the single hitbox a body owns.
///
/// Kinematic fields are public the way other components are, but only the
/// owner's own update should write them; cross-body effects go through the
/// collision responses.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Accumulated force / mass.
    pub acceleration: Vec2,
    /// Radians, counterclockwise.
    pub rotation: f32,
    pub angular_velocity: f32,
    /// Added to acceleration every step. Per body, not global.
    pub gravity: Vec2,
    /// Per-tick velocity multiplier. 1.0 = no damping.
    pub friction: f32,
    /// Coulomb coefficient for impulse resolution.
    pub surface_friction: f32,
    pub min_speed: Vec2,
    pub max_speed: Vec2,
    /// Restitution for impulse resolution.
    pub bounciness: f32,
    pub collision_type: CollisionType,
    /// Set when the latest collision check pushed this body up onto a surface.
    pub grounded: bool,
    mass: f32,
    hitbox: Hitbox,
}

impl RigidBody {
    pub fn new(hitbox: Hitbox, position: Vec2, config: &BodyConfig) -> Result<Self, PhysicsError> {
        check_mass(config.mass)?;
        Ok(Self {
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            rotation: config.rotation,
            angular_velocity: 0.0,
            gravity: config.gravity,
            friction: config.friction,
            surface_friction: config.surface_friction,
            min_speed: config.min_speed,
            max_speed: config.max_speed,
            bounciness: config.bounciness,
            collision_type: config.collision,
            grounded: false,
            mass: config.mass,
            hitbox,
        })
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn set_mass(&mut self, mass: f32) -> Result<(), PhysicsError> {
        check_mass(mass)?;
        self.mass = mass;
        Ok(())
    }

    /// 0 for static bodies, which behave as infinitely heavy.
    pub fn inverse_mass(&self) -> f32 {
        if self.is_static() {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    pub fn is_static(&self) -> bool {
        self.collision_type == CollisionType::Static
    }

    pub fn hitbox(&self) -> &Hitbox {
        &self.hitbox
    }

    pub fn hitbox_mut(&mut self) -> &mut Hitbox {
        &mut self.hitbox
    }

    /// Link the hitbox to the entity this body lives on.
    pub(crate) fn attach(&mut self, owner: Entity) {
        self.hitbox.attach(owner);
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.rotation)
    }

    /// The hitbox at the body's current pose.
    pub fn placed(&self) -> Placed<'_> {
        self.hitbox.at(self.pose())
    }

    /// One fixed-rate integration step of `dt` seconds. Static bodies do not move.
    pub fn physics_step(&mut self, dt: f32) {
        if self.is_static() {
            return;
        }
        self.velocity += (self.acceleration + self.gravity) * dt;
        self.velocity *= self.friction;
        self.velocity = clamp_components(self.velocity, self.min_speed, self.max_speed);

        self.position += self.velocity * dt;
        self.rotation += self.angular_velocity * dt;
    }

    /// Replace the acceleration with `force / mass`.
    pub fn set_force(&mut self, force: Vec2) {
        self.acceleration = force / self.mass;
    }

    /// Accumulate `force / mass` onto the acceleration.
    pub fn add_force(&mut self, force: Vec2) {
        self.acceleration += force / self.mass;
    }

    /// Set `force` now and schedule it to be cleared after `duration`.
    ///
    /// Fire-and-forget: the reset runs on whichever fixed tick first reaches the
    /// deadline. Fails without touching the body if it is not attached to an
    /// entity, since the reset could not find it again.
    pub fn apply_impulse(
        &mut self,
        force: Vec2,
        duration: Duration,
        timer: &mut impl Timer,
    ) -> Result<(), PhysicsError> {
        let owner = self.hitbox.owner().ok_or(PhysicsError::Detached)?;
        self.set_force(force);
        timer.after(duration, Deferred::ClearForce(owner));
        Ok(())
    }
}

fn check_mass(mass: f32) -> Result<(), PhysicsError> {
    if mass.is_finite() && mass > 0.0 {
        Ok(())
    } else {
        Err(PhysicsError::InvalidMass(mass))
    }
}
