use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use glam::Vec2;
use log::info;

use pivot2d::config::EngineConfig;
use pivot2d::engine::scheduler::{Host, LoopEvent, Scheduler};
use pivot2d::engine::time::{ManualClock, Timer, TimerQueue};
use pivot2d::scene::test_scene::load_ball_pit;
use pivot2d::scene::BodyWorld;

const ARENA_WIDTH: u32 = 800;
const ARENA_HEIGHT: u32 = 600;

#[derive(Parser)]
#[command(name = "pivot-demo", about = "pivot2d ball pit")]
struct Args {
    /// TOML engine config. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of balls to drop into the pit.
    #[arg(long, default_value_t = 20)]
    balls: usize,

    /// Run on simulated time without opening a window.
    #[arg(long)]
    headless: bool,

    /// Frames to simulate in headless mode.
    #[arg(long, default_value_t = 600)]
    frames: u64,
}

/// Stops the loop after a fixed number of frames and tallies contacts.
struct HeadlessHost {
    frames_left: u64,
    contacts: usize,
}

impl Host<BodyWorld> for HeadlessHost {
    fn poll_events(&mut self) -> Vec<LoopEvent> {
        if self.frames_left == 0 {
            return vec![LoopEvent::Quit];
        }
        self.frames_left -= 1;
        Vec::new()
    }

    fn update(&mut self, scene: &mut BodyWorld, _timer: &mut TimerQueue, _dt: f32) {
        self.contacts += scene.contacts().len();
    }
}

fn run_headless(config: &EngineConfig, balls: usize, frames: u64) -> Result<()> {
    let mut world = BodyWorld::new();
    let arena = Vec2::new(ARENA_WIDTH as f32, ARENA_HEIGHT as f32);
    let pit = load_ball_pit(&mut world, &config.body, arena, balls)?;

    let mut host = HeadlessHost {
        frames_left: frames,
        contacts: 0,
    };
    let mut scheduler = Scheduler::new(ManualClock::new(), &config.time)?;
    scheduler.run(&mut host, &mut world);

    let grounded = pit
        .balls
        .iter()
        .filter(|&&ball| world.body(ball).map(|b| b.grounded).unwrap_or(false))
        .count();
    info!(
        "simulated {:?} in {} frames / {} fixed ticks: {} contacts, {grounded}/{} balls grounded",
        scheduler.timer().now(),
        scheduler.frames(),
        scheduler.fixed_ticks(),
        host.contacts,
        pit.balls.len()
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    if args.headless {
        run_headless(&config, args.balls, args.frames)
    } else {
        run_windowed(&config, &args)
    }
}

#[cfg(feature = "sdl")]
fn run_windowed(config: &EngineConfig, args: &Args) -> Result<()> {
    pivot2d::app::run_windowed(config, args.balls, ARENA_WIDTH, ARENA_HEIGHT)
}

#[cfg(not(feature = "sdl"))]
fn run_windowed(config: &EngineConfig, args: &Args) -> Result<()> {
    info!("built without the `sdl` feature, falling back to headless mode");
    run_headless(config, args.balls, args.frames)
}
