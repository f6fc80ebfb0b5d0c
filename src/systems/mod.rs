mod collision;
mod physics;
pub mod sat;

pub use physics::physics_step;
pub use sat::{overlap, CollisionInfo, ShapeRef};
