use glam::Vec2;
use hecs::Entity;

use crate::config::BodyConfig;
use crate::error::PhysicsError;
use crate::scene::prefabs::{spawn_ball, spawn_sensor, spawn_wall};
use crate::scene::{BodyWorld, Response};

/// Handles into the ball pit, for the host to drive and draw.
pub struct BallPit {
    pub walls: Vec<Entity>,
    pub balls: Vec<Entity>,
    /// Trigger strip across the floor; balls resting there show up as overlaps.
    pub sensor: Entity,
}

/// Four walls around an `arena` sized box and `count` balls in a grid.
///
/// Balls collide with walls (positional), bounce off each other (impulse) and
/// are overlap-tested against the floor sensor. Pairs are registered walls
/// first so ball/ball impulses see wall-corrected positions.
pub fn load_ball_pit(
    world: &mut BodyWorld,
    defaults: &BodyConfig,
    arena: Vec2,
    count: usize,
) -> Result<BallPit, PhysicsError> {
    let (w, h) = (arena.x, arena.y);

    let walls = vec![
        spawn_wall(world, Vec2::new(w / 2.0, -w / 20.0), Vec2::new(w, h / 6.0), defaults)?,
        spawn_wall(world, Vec2::new(w / 2.0, h + w / 20.0), Vec2::new(w, h / 6.0), defaults)?,
        spawn_wall(world, Vec2::new(-w / 20.0, h / 2.0), Vec2::new(w / 6.0, h), defaults)?,
        spawn_wall(world, Vec2::new(w + w / 20.0, h / 2.0), Vec2::new(w / 6.0, h), defaults)?,
    ];

    let sensor = spawn_sensor(world, Vec2::new(w / 2.0, h * 0.95), Vec2::new(w * 0.8, h / 20.0))?;

    let radius = w.min(h) / 40.0;
    let cols = (count as f32).sqrt().ceil().max(1.0) as usize;
    let spacing = (w * 0.6) / cols as f32;
    let mut balls = Vec::with_capacity(count);
    for i in 0..count {
        let (row, col) = (i / cols, i % cols);
        let center = Vec2::new(
            w * 0.2 + (col as f32 + 0.5) * spacing,
            h * 0.2 + (row as f32 + 0.5) * spacing,
        );
        // Deterministic spread of sideways launch speeds.
        let velocity = Vec2::new(((i * 37) % 11) as f32 - 5.0, 0.0) * 20.0;
        balls.push(spawn_ball(world, center, radius, velocity, defaults)?);
    }

    for &ball in &balls {
        for &wall in &walls {
            world.add_pair(ball, wall, Response::Collide);
        }
    }
    for (i, &a) in balls.iter().enumerate() {
        for &b in &balls[i + 1..] {
            world.add_pair(a, b, Response::Impulse);
        }
    }
    for &ball in &balls {
        world.add_pair(ball, sensor, Response::Overlap);
    }

    Ok(BallPit {
        walls,
        balls,
        sensor,
    })
}
