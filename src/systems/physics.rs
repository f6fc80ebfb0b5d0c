use hecs::World;

use crate::components::RigidBody;

/// Integrate every body in the world by one fixed step of `dt` seconds.
///
/// Runs to completion before any collision response of the same tick, so
/// responses always see post-integration positions.
pub fn physics_step(world: &mut World, dt: f32) {
    for (_entity, body) in world.query_mut::<&mut RigidBody>() {
        body.physics_step(dt);
    }
}
