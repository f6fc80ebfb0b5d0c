mod hitbox;
mod physics;

pub use hitbox::{Hitbox, Placed, Shape};
pub use physics::{CollisionType, RigidBody};
