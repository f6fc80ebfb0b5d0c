use std::time::Duration;

/// Minimal finite-state-machine container.
///
/// `S` is the state type (usually a fieldless enum). The machine tracks the
/// current state, the previous one, and how long it has been in the current
/// state. Which transitions are legal is decided by the owner, not here.
#[derive(Debug, Clone)]
pub struct StateMachine<S: Copy + PartialEq> {
    state: S,
    previous: S,
    elapsed: Duration,
    entered_this_frame: bool,
}

impl<S: Copy + PartialEq> StateMachine<S> {
    /// `just_entered()` is `true` until the first tick.
    pub fn new(initial: S) -> Self {
        Self {
            state: initial,
            previous: initial,
            elapsed: Duration::ZERO,
            entered_this_frame: true,
        }
    }

    pub fn state(&self) -> S {
        self.state
    }

    pub fn previous(&self) -> S {
        self.previous
    }

    /// Time spent in the current state, summed from [`tick`](Self::tick).
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Transition to `next` if it differs from the current state.
    /// Returns whether a transition happened.
    pub fn go(&mut self, next: S) -> bool {
        if self.state == next {
            return false;
        }
        self.previous = std::mem::replace(&mut self.state, next);
        self.elapsed = Duration::ZERO;
        self.entered_this_frame = true;
        true
    }

    /// Advance the time-in-state by one frame and clear `just_entered`.
    pub fn tick(&mut self, dt: Duration) {
        self.elapsed += dt;
        self.entered_this_frame = false;
    }

    /// `true` only until the first tick after entering this state.
    pub fn just_entered(&self) -> bool {
        self.entered_this_frame
    }
}
