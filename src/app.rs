use std::f32::consts::TAU;
use std::time::Duration;

use anyhow::{anyhow, Result};
use glam::Vec2;
use hecs::Entity;
use log::{info, warn};
use sdl2::keyboard::Scancode;
use sdl2::{EventPump, Sdl};

use crate::components::{Placed, RigidBody, Shape};
use crate::config::EngineConfig;
use crate::engine::input::InputState;
use crate::engine::scheduler::{Host, LoopEvent, Scheduler};
use crate::engine::time::{SystemClock, TimerQueue};
use crate::engine::window::GameWindow;
use crate::geometry::Aabb;
use crate::scene::test_scene::load_ball_pit;
use crate::scene::BodyWorld;

const CIRCLE_SEGMENTS: usize = 16;
const KICK_FORCE: f32 = 50_000.0;
const KICK_DURATION: Duration = Duration::from_millis(200);
const BACKGROUND: (u8, u8, u8) = (18, 18, 24);
const CONTACT_COLOR: [u8; 4] = [255, 80, 80, 255];
const BOUNDS_COLOR: [u8; 4] = [90, 90, 90, 255];

/// Windowed ball-pit demo. Space kicks every ball upward, B toggles
/// bounding boxes, P pauses, Escape quits.
pub struct DemoApp {
    window: GameWindow,
    event_pump: EventPump,
    input: InputState,
    balls: Vec<Entity>,
}

impl DemoApp {
    pub fn new(sdl: &Sdl, balls: Vec<Entity>, width: u32, height: u32) -> Result<Self> {
        let window = GameWindow::new(sdl, "pivot2d", width, height)?;
        let event_pump = sdl
            .event_pump()
            .map_err(|e| anyhow!("failed to get event pump: {e}"))?;
        Ok(Self {
            window,
            event_pump,
            input: InputState::new(),
            balls,
        })
    }

    fn kick(&self, scene: &mut BodyWorld, timer: &mut TimerQueue) {
        for &ball in &self.balls {
            if let Err(err) =
                scene.apply_impulse(ball, Vec2::new(0.0, -KICK_FORCE), KICK_DURATION, timer)
            {
                warn!("kick skipped for {ball:?}: {err}");
            }
        }
    }

    fn toggle_bounds(scene: &mut BodyWorld) {
        for entity in scene.entities() {
            if let Ok(mut body) = scene.body_mut(entity) {
                let hitbox = body.hitbox_mut();
                hitbox.debug = !hitbox.debug;
            }
        }
    }

    fn draw(&mut self, scene: &BodyWorld) -> Result<()> {
        self.window.clear(BACKGROUND);
        let touching: Vec<Entity> = scene
            .contacts()
            .iter()
            .flat_map(|c| [c.a, c.b])
            .collect();

        for (entity, body) in scene.world().query::<&RigidBody>().iter() {
            let hitbox = body.hitbox();
            let color = if touching.contains(&entity) && !hitbox.trigger {
                CONTACT_COLOR
            } else {
                hitbox.color
            };
            let placed = body.placed();
            if hitbox.debug {
                let Aabb { min, max } = placed.bounding_box();
                let corners = [(min.x, min.y), (max.x, min.y), (max.x, max.y), (min.x, max.y)];
                self.window.outline(&corners, BOUNDS_COLOR)?;
            }
            self.window.outline(&outline_points(placed), color)?;
        }
        self.window.present();
        Ok(())
    }
}

impl Host<BodyWorld> for DemoApp {
    fn poll_events(&mut self) -> Vec<LoopEvent> {
        self.input.update(&mut self.event_pump);
        self.input.events.clone()
    }

    fn update(&mut self, scene: &mut BodyWorld, timer: &mut TimerQueue, _dt: f32) {
        if self.input.was_pressed(Scancode::Space) {
            self.kick(scene, timer);
        }
        if self.input.was_pressed(Scancode::B) {
            Self::toggle_bounds(scene);
        }
    }

    fn render(&mut self, scene: &BodyWorld, _alpha: f32) {
        if let Err(err) = self.draw(scene) {
            warn!("render failed: {err}");
        }
    }
}

/// Outline of a placed hitbox; circles become regular polygons.
fn outline_points(placed: Placed<'_>) -> Vec<(f32, f32)> {
    match placed.hitbox.shape() {
        Shape::Circle { radius } => {
            let center = placed.center();
            (0..CIRCLE_SEGMENTS)
                .map(|i| {
                    let angle = TAU * i as f32 / CIRCLE_SEGMENTS as f32 + placed.pose.rotation;
                    let p = center + Vec2::from_angle(angle) * *radius;
                    (p.x, p.y)
                })
                .collect()
        }
        Shape::Polygon { .. } => placed
            .world_vertices()
            .into_iter()
            .map(|v| (v.x, v.y))
            .collect(),
    }
}

/// Open a window and run the ball pit on the wall clock until quit.
pub fn run_windowed(config: &EngineConfig, balls: usize, width: u32, height: u32) -> Result<()> {
    let sdl = sdl2::init().map_err(|e| anyhow!("failed to init SDL2: {e}"))?;

    let mut world = BodyWorld::new();
    let arena = Vec2::new(width as f32, height as f32);
    let pit = load_ball_pit(&mut world, &config.body, arena, balls)?;

    let mut app = DemoApp::new(&sdl, pit.balls, width, height)?;
    let mut scheduler = Scheduler::new(SystemClock::new(), &config.time)?;
    info!(
        "window {width}x{height}, {} bodies, fixed step {:?}",
        world.len(),
        scheduler.fixed_delta()
    );
    scheduler.run(&mut app, &mut world);
    info!(
        "{} frames, {} fixed ticks",
        scheduler.frames(),
        scheduler.fixed_ticks()
    );
    Ok(())
}
