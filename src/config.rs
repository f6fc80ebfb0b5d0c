use std::path::Path;
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::CollisionType;
use crate::error::{ConfigError, PhysicsError};

/// Top-level engine settings, usually read from a TOML file.
///
/// ```toml
/// [time]
/// fixed_delta_ms = 10
/// fps_cap = 60
///
/// [body]
/// mass = 1.0
/// gravity = [0.0, 980.0]
/// friction = 0.99
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub time: TimeConfig,
    pub body: BodyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Length of one physics tick in milliseconds.
    pub fixed_delta_ms: u64,
    /// Upper bound on rendered frames per second. `None` runs uncapped.
    pub fps_cap: Option<u32>,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            fixed_delta_ms: 10,
            fps_cap: Some(60),
        }
    }
}

impl TimeConfig {
    /// A zero tick would never drain the accumulator.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fixed_delta_ms == 0 {
            return Err(ConfigError::Invalid("time.fixed_delta_ms must be > 0".into()));
        }
        Ok(())
    }

    pub fn fixed_delta(&self) -> Duration {
        Duration::from_millis(self.fixed_delta_ms)
    }

    /// Minimum frame duration implied by `fps_cap`.
    pub fn frame_cap(&self) -> Option<Duration> {
        self.fps_cap
            .filter(|&fps| fps > 0)
            .map(|fps| Duration::from_secs_f64(1.0 / f64::from(fps)))
    }
}

/// Per-body defaults applied by [`RigidBody::new`](crate::components::RigidBody::new).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    pub mass: f32,
    /// Added to the body's acceleration every step.
    pub gravity: Vec2,
    /// Per-tick velocity multiplier. 1.0 means no damping.
    pub friction: f32,
    /// Coulomb coefficient used by impulse resolution. 0.0 = ice.
    pub surface_friction: f32,
    pub min_speed: Vec2,
    pub max_speed: Vec2,
    pub collision: CollisionType,
    /// Restitution used by impulse resolution. 0.0 = no bounce.
    pub bounciness: f32,
    /// Initial rotation in radians.
    pub rotation: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            gravity: Vec2::ZERO,
            friction: 1.0,
            surface_friction: 0.0,
            min_speed: Vec2::splat(f32::NEG_INFINITY),
            max_speed: Vec2::splat(f32::INFINITY),
            collision: CollisionType::Dynamic,
            bounciness: 0.0,
            rotation: 0.0,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::info!("loaded engine config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.time.validate()?;
        if !(self.body.mass.is_finite() && self.body.mass > 0.0) {
            return Err(PhysicsError::InvalidMass(self.body.mass).into());
        }
        if !self.body.gravity.is_finite() || !self.body.friction.is_finite() {
            return Err(ConfigError::Invalid(
                "body.gravity and body.friction must be finite".into(),
            ));
        }
        Ok(())
    }
}
