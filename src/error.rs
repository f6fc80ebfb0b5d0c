use std::path::PathBuf;

use hecs::Entity;
use thiserror::Error;

/// Construction and lookup failures in the physics core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("polygon needs at least 3 vertices, got {vertices}")]
    DegeneratePolygon { vertices: usize },
    #[error("rectangle extents must be positive and finite, got {width}x{height}")]
    InvalidExtent { width: f32, height: f32 },
    #[error("circle radius must be positive and finite, got {0}")]
    InvalidRadius(f32),
    #[error("mass must be positive and finite, got {0}")]
    InvalidMass(f32),
    #[error("body has no owner handle; deferred calls cannot address it")]
    Detached,
    #[error("no rigid body attached to entity {0:?}")]
    MissingBody(Entity),
}

/// Failures while loading or validating an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("invalid body defaults: {0}")]
    Body(#[from] PhysicsError),
}
