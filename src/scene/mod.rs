pub mod prefabs;
pub mod test_scene;

use std::time::Duration;

use glam::Vec2;
use hecs::{Entity, Ref, RefMut, World};
use log::{trace, warn};

use crate::components::RigidBody;
use crate::engine::scheduler::Scene;
use crate::engine::time::{Deferred, TimerQueue};
use crate::error::PhysicsError;
use crate::systems::{physics_step, CollisionInfo};

/// Which response a candidate pair gets each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Collide,
    Bounce,
    Overlap,
    Impulse,
}

/// A pair that overlapped during the last fixed tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub a: Entity,
    pub b: Entity,
    pub response: Response,
    pub info: CollisionInfo,
}

/// Reference body container: owns bodies in a hecs world and resolves a
/// caller-chosen list of candidate pairs every tick.
///
/// A tick integrates every body first, then walks the pair list in order.
/// Each pair is resolved completely before the next one is tested, and the
/// next test sees the positions it left behind (same-tick visible), so the
/// pair order is part of the simulation's behaviour.
#[derive(Default)]
pub struct BodyWorld {
    world: World,
    pairs: Vec<(Entity, Entity, Response)>,
    contacts: Vec<Contact>,
}

impl BodyWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `body` into the world and link its hitbox to the new entity.
    pub fn spawn(&mut self, body: RigidBody) -> Entity {
        let entity = self.world.spawn((body,));
        if let Ok(mut body) = self.world.get::<&mut RigidBody>(entity) {
            body.attach(entity);
        }
        entity
    }

    /// Remove a body and every pair that mentions it.
    pub fn despawn(&mut self, entity: Entity) -> Result<RigidBody, PhysicsError> {
        let body = self
            .world
            .remove_one::<RigidBody>(entity)
            .map_err(|_| PhysicsError::MissingBody(entity))?;
        self.world
            .despawn(entity)
            .map_err(|_| PhysicsError::MissingBody(entity))?;
        self.pairs.retain(|&(a, b, _)| a != entity && b != entity);
        Ok(body)
    }

    pub fn body(&self, entity: Entity) -> Result<Ref<'_, RigidBody>, PhysicsError> {
        self.world
            .get::<&RigidBody>(entity)
            .map_err(|_| PhysicsError::MissingBody(entity))
    }

    pub fn body_mut(&self, entity: Entity) -> Result<RefMut<'_, RigidBody>, PhysicsError> {
        self.world
            .get::<&mut RigidBody>(entity)
            .map_err(|_| PhysicsError::MissingBody(entity))
    }

    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.world.len() == 0
    }

    pub fn entities(&self) -> Vec<Entity> {
        self.world
            .query::<&RigidBody>()
            .iter()
            .map(|(entity, _)| entity)
            .collect()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Register a candidate pair. `a` plays the `self` role in the response.
    pub fn add_pair(&mut self, a: Entity, b: Entity, response: Response) {
        self.pairs.push((a, b, response));
    }

    pub fn clear_pairs(&mut self) {
        self.pairs.clear();
    }

    pub fn pairs(&self) -> &[(Entity, Entity, Response)] {
        &self.pairs
    }

    /// Collisions found during the most recent tick, in pair order.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn apply_impulse(
        &mut self,
        entity: Entity,
        force: Vec2,
        duration: Duration,
        timer: &mut TimerQueue,
    ) -> Result<(), PhysicsError> {
        self.body_mut(entity)?.apply_impulse(force, duration, timer)
    }

    /// One fixed tick: integrate everything, then resolve pairs in order.
    pub fn step(&mut self, dt: f32) -> &[Contact] {
        physics_step(&mut self.world, dt);

        self.contacts.clear();
        let pairs = std::mem::take(&mut self.pairs);
        for &(a, b, response) in &pairs {
            match self.resolve_pair(a, b, response) {
                Ok(Some(info)) => self.contacts.push(Contact {
                    a,
                    b,
                    response,
                    info,
                }),
                Ok(None) => {}
                Err(err) => warn!("skipping pair {a:?}/{b:?}: {err}"),
            }
        }
        self.pairs = pairs;
        trace!("tick resolved {} contacts", self.contacts.len());
        &self.contacts
    }

    /// Resolve one pair. `b` is lifted out of the world for the duration so
    /// both bodies can be borrowed mutably, then put back.
    pub fn resolve_pair(
        &mut self,
        a: Entity,
        b: Entity,
        response: Response,
    ) -> Result<Option<CollisionInfo>, PhysicsError> {
        if a == b {
            return Ok(None);
        }
        let mut other = self
            .world
            .remove_one::<RigidBody>(b)
            .map_err(|_| PhysicsError::MissingBody(b))?;

        let result = match self.world.get::<&mut RigidBody>(a) {
            Ok(mut body) => Ok(match response {
                Response::Collide => body.collide(&mut other, |_| {}),
                Response::Bounce => body.bounce(&mut other, |_| {}),
                Response::Overlap => body.overlap(&other, |_| {}),
                Response::Impulse => body.resolve_impulse(&mut other, |_| {}),
            }),
            Err(_) => Err(PhysicsError::MissingBody(a)),
        };

        self.world
            .insert_one(b, other)
            .map_err(|_| PhysicsError::MissingBody(b))?;
        result
    }
}

impl Scene for BodyWorld {
    fn fixed_update(&mut self, dt: f32, _timer: &mut TimerQueue) {
        self.step(dt);
    }

    fn run_deferred(&mut self, task: Deferred) {
        match task {
            Deferred::ClearForce(entity) => match self.body_mut(entity) {
                Ok(mut body) => body.set_force(Vec2::ZERO),
                Err(_) => warn!("deferred force reset for despawned body {entity:?}"),
            },
        }
    }
}
