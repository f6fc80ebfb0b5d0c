//! pivot2d: fixed-timestep 2D rigid bodies with SAT narrow-phase collision.
//!
//! Bodies carry a convex polygon or circle [`Hitbox`] and integrate with
//! semi-implicit Euler on a fixed tick driven by [`Scheduler`]. Pairs are
//! tested with the separating axis theorem ([`systems::overlap`]) and resolved
//! positionally (`collide`, `bounce`), by report only (`overlap`), or with
//! restitution and friction impulses (`resolve_impulse`).
//!
//! Screen coordinates: +x right, +y down. A body pushed upward by a contact is
//! flagged `grounded`.

#[cfg(feature = "sdl")]
pub mod app;
pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod fsm;
pub mod geometry;
pub mod scene;
pub mod systems;

pub use components::{CollisionType, Hitbox, Placed, RigidBody, Shape};
pub use config::{BodyConfig, EngineConfig, TimeConfig};
pub use engine::scheduler::{Host, LoopEvent, RunState, Scene, Scheduler};
pub use engine::time::{Clock, Deferred, ManualClock, SystemClock, Timer, TimerQueue};
pub use error::{ConfigError, PhysicsError};
pub use geometry::{Aabb, Pose};
pub use scene::{BodyWorld, Contact, Response};
pub use systems::{CollisionInfo, ShapeRef};

/// 2D vector type used throughout the crate.
pub type Vector2 = glam::Vec2;
