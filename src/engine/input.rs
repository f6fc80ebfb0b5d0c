use std::collections::HashSet;

use sdl2::event::Event;
use sdl2::keyboard::Scancode;
use sdl2::EventPump;

use crate::engine::scheduler::LoopEvent;

/// Keyboard state and loop-control events gathered from one poll.
pub struct InputState {
    pub keys: HashSet<Scancode>,
    /// Keys that went down during the last poll.
    pub pressed: Vec<Scancode>,
    pub events: Vec<LoopEvent>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys: HashSet::new(),
            pressed: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Drain the SDL queue. Never blocks.
    pub fn update(&mut self, event_pump: &mut EventPump) {
        self.pressed.clear();
        self.events.clear();

        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => self.events.push(LoopEvent::Quit),
                Event::KeyDown {
                    scancode: Some(Scancode::Escape),
                    ..
                } => self.events.push(LoopEvent::Quit),
                Event::KeyDown {
                    scancode: Some(Scancode::P),
                    repeat: false,
                    ..
                } => self.events.push(LoopEvent::TogglePause),
                Event::KeyDown {
                    scancode: Some(sc),
                    repeat,
                    ..
                } => {
                    if !repeat {
                        self.pressed.push(sc);
                    }
                    self.keys.insert(sc);
                }
                Event::KeyUp {
                    scancode: Some(sc), ..
                } => {
                    self.keys.remove(&sc);
                }
                _ => {}
            }
        }
    }

    pub fn is_key_held(&self, sc: Scancode) -> bool {
        self.keys.contains(&sc)
    }

    pub fn was_pressed(&self, sc: Scancode) -> bool {
        self.pressed.contains(&sc)
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
