use std::time::Duration;

use log::{debug, trace};

use crate::config::TimeConfig;
use crate::error::ConfigError;
use crate::engine::time::{Clock, Deferred, Timer, TimerQueue};
use crate::fsm::StateMachine;

/// Lifecycle of the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Stopped,
    Running,
    Paused,
}

/// Control signals produced by event polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopEvent {
    Quit,
    Pause,
    Resume,
    TogglePause,
}

/// The simulation the loop drives: usually a body container.
pub trait Scene {
    /// Variable-rate update, once per frame while running.
    fn update(&mut self, _dt: f32, _timer: &mut TimerQueue) {}

    /// Replaces `update` and the fixed updates while paused.
    fn paused_update(&mut self, _dt: f32) {}

    /// One fixed-rate physics tick of exactly `dt` seconds.
    fn fixed_update(&mut self, dt: f32, timer: &mut TimerQueue);

    /// A deferred task came due. Runs before that tick's `fixed_update`.
    fn run_deferred(&mut self, _task: Deferred) {}
}

/// Platform side of the loop: events in, pixels out.
pub trait Host<S> {
    /// Drain pending OS/input events without blocking.
    fn poll_events(&mut self) -> Vec<LoopEvent>;

    /// Game-level variable-rate update, once per frame even while paused.
    fn update(&mut self, _scene: &mut S, _timer: &mut TimerQueue, _dt: f32) {}

    /// `alpha` is how far into the next fixed tick this frame falls (0..1).
    fn render(&mut self, _scene: &S, _alpha: f32) {}
}

/// Fixed-timestep frame loop.
///
/// Frame time is measured on a [`Clock`] and fed to an accumulator that runs
/// whole fixed ticks, carrying the fractional remainder to the next frame. The
/// number of physics ticks therefore depends only on elapsed time, never on
/// how often frames are rendered.
pub struct Scheduler<C: Clock> {
    clock: C,
    timer: TimerQueue,
    state: StateMachine<RunState>,
    fixed_delta: Duration,
    frame_cap: Option<Duration>,
    physics_counter: Duration,
    frame_delta: Duration,
    frames: u64,
    fixed_ticks: u64,
}

impl<C: Clock> Scheduler<C> {
    /// Fails if `config` has a zero fixed delta.
    pub fn new(clock: C, config: &TimeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let fixed_delta = config.fixed_delta();
        Ok(Self {
            clock,
            timer: TimerQueue::new(fixed_delta),
            state: StateMachine::new(RunState::Stopped),
            fixed_delta,
            frame_cap: config.frame_cap(),
            physics_counter: Duration::ZERO,
            frame_delta: Duration::ZERO,
            frames: 0,
            fixed_ticks: 0,
        })
    }

    pub fn state(&self) -> RunState {
        self.state.state()
    }

    /// Time spent in the current run state.
    pub fn time_in_state(&self) -> Duration {
        self.state.elapsed()
    }

    pub fn fixed_delta(&self) -> Duration {
        self.fixed_delta
    }

    /// Measured length of the previous frame.
    pub fn frame_delta(&self) -> Duration {
        self.frame_delta
    }

    /// Unconsumed time carried into the next frame. Always below one tick.
    pub fn physics_counter(&self) -> Duration {
        self.physics_counter
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn fixed_ticks(&self) -> u64 {
        self.fixed_ticks
    }

    pub fn timer(&self) -> &TimerQueue {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut TimerQueue {
        &mut self.timer
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    fn transition(&mut self, next: RunState) {
        if self.state.go(next) {
            debug!("loop state {:?} -> {:?}", self.state.previous(), next);
        }
    }

    pub fn start(&mut self) {
        self.transition(RunState::Running);
    }

    /// Takes effect for the rest of the current frame; the frame still completes.
    pub fn stop(&mut self) {
        self.transition(RunState::Stopped);
    }

    pub fn pause(&mut self) {
        if self.state() == RunState::Running {
            self.transition(RunState::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.state() == RunState::Paused {
            self.transition(RunState::Running);
        }
    }

    pub fn handle_event(&mut self, event: LoopEvent) {
        match event {
            LoopEvent::Quit => self.stop(),
            LoopEvent::Pause => self.pause(),
            LoopEvent::Resume => self.resume(),
            LoopEvent::TogglePause => match self.state() {
                RunState::Running => self.pause(),
                RunState::Paused => self.resume(),
                RunState::Stopped => {}
            },
        }
    }

    /// Run frames until something stops the loop.
    pub fn run<S, H>(&mut self, host: &mut H, scene: &mut S)
    where
        S: Scene,
        H: Host<S>,
    {
        self.start();
        while self.state() != RunState::Stopped {
            self.frame(host, scene);
        }
        debug!(
            "loop stopped after {} frames, {} fixed ticks",
            self.frames, self.fixed_ticks
        );
    }

    /// One full iteration: events, updates, fixed ticks, render, frame cap,
    /// delta measurement. Never returns mid-iteration.
    pub fn frame<S, H>(&mut self, host: &mut H, scene: &mut S)
    where
        S: Scene,
        H: Host<S>,
    {
        let frame_start = self.clock.now();

        for event in host.poll_events() {
            self.handle_event(event);
        }

        let dt = self.frame_delta.as_secs_f32();
        host.update(scene, &mut self.timer, dt);

        if self.state() == RunState::Paused {
            scene.paused_update(dt);
        } else {
            scene.update(dt, &mut self.timer);
            self.accumulate(self.frame_delta, scene);
        }

        let alpha = self.physics_counter.as_secs_f32() / self.fixed_delta.as_secs_f32();
        host.render(scene, alpha);

        if let Some(cap) = self.frame_cap {
            let spent = self.clock.now().saturating_sub(frame_start);
            if spent < cap {
                self.clock.sleep(cap - spent);
            }
        }
        // A zero-length frame would stall the accumulator.
        if self.clock.now() == frame_start {
            self.clock.sleep(Duration::from_millis(1));
        }

        self.frame_delta = self.clock.now().saturating_sub(frame_start);
        self.state.tick(self.frame_delta);
        self.frames += 1;
    }

    /// Feed `frame_delta` into the accumulator and run every whole fixed tick
    /// it now covers. Returns the number of ticks run.
    pub fn accumulate<S: Scene>(&mut self, frame_delta: Duration, scene: &mut S) -> u32 {
        self.physics_counter += frame_delta;
        let mut ticks = 0;
        while self.physics_counter >= self.fixed_delta {
            self.fixed_tick(scene);
            self.physics_counter -= self.fixed_delta;
            ticks += 1;
        }
        ticks
    }

    fn fixed_tick<S: Scene>(&mut self, scene: &mut S) {
        self.timer.advance(self.fixed_delta);
        for task in self.timer.drain_due() {
            trace!("deferred task due at {:?}: {:?}", self.timer.now(), task);
            scene.run_deferred(task);
        }
        scene.fixed_update(self.fixed_delta.as_secs_f32(), &mut self.timer);
        self.fixed_ticks += 1;
    }
}
