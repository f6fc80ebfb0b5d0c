use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use hecs::Entity;

// ---------------------------------------------------------------------------
// Clocks
// ---------------------------------------------------------------------------

/// Monotonic time source driving the frame loop.
pub trait Clock {
    /// Time since an arbitrary fixed origin.
    fn now(&self) -> Duration;
    /// Block for `duration`. Used only for the frame-rate cap.
    fn sleep(&mut self, duration: Duration);
}

/// Wall clock backed by [`Instant`].
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Clock that only moves when told to. Sleeping advances it instantly, so a
/// capped loop on a `ManualClock` sees exactly the cap as its frame delta.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Duration,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, duration: Duration) {
        self.now += duration;
    }
}

// ---------------------------------------------------------------------------
// Deferred calls
// ---------------------------------------------------------------------------

/// Work scheduled to run on a later fixed tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Zero the acceleration of the body on this entity.
    ClearForce(Entity),
}

/// Timing services a body needs from the engine.
pub trait Timer {
    /// Simulated time: the number of fixed ticks run so far times the fixed delta.
    fn now(&self) -> Duration;
    fn fixed_delta(&self) -> Duration;
    /// Run `task` on the first fixed tick at or after `now() + delay`.
    fn after(&mut self, delay: Duration, task: Deferred);
}

/// Deterministic queue of deferred tasks on simulated time.
///
/// Tasks are keyed by `(fire_time, insertion_sequence)`, so tasks due on the
/// same tick run in the order they were scheduled. The queue never looks at
/// the wall clock; the frame loop advances it one fixed delta per tick.
#[derive(Debug, Clone)]
pub struct TimerQueue {
    now: Duration,
    fixed_delta: Duration,
    next_seq: u64,
    pending: BTreeMap<(Duration, u64), Deferred>,
}

impl TimerQueue {
    pub fn new(fixed_delta: Duration) -> Self {
        Self {
            now: Duration::ZERO,
            fixed_delta,
            next_seq: 0,
            pending: BTreeMap::new(),
        }
    }

    /// Move simulated time forward.
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// Remove and return every task due at the current time, in firing order.
    pub fn drain_due(&mut self) -> Vec<Deferred> {
        let mut due = Vec::new();
        while let Some((&(fire_at, _), _)) = self.pending.first_key_value() {
            if fire_at > self.now {
                break;
            }
            if let Some((_, task)) = self.pending.pop_first() {
                due.push(task);
            }
        }
        due
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl Timer for TimerQueue {
    fn now(&self) -> Duration {
        self.now
    }

    fn fixed_delta(&self) -> Duration {
        self.fixed_delta
    }

    fn after(&mut self, delay: Duration, task: Deferred) {
        let key = (self.now + delay, self.next_seq);
        self.next_seq += 1;
        self.pending.insert(key, task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(n: u32) -> Entity {
        let mut world = hecs::World::new();
        let mut last = world.spawn(());
        for _ in 0..n {
            last = world.spawn(());
        }
        last
    }

    #[test]
    fn tasks_fire_once_due() {
        let e = entity(0);
        let mut timer = TimerQueue::new(Duration::from_millis(10));
        timer.after(Duration::from_millis(25), Deferred::ClearForce(e));

        timer.advance(Duration::from_millis(20));
        assert!(timer.drain_due().is_empty());

        timer.advance(Duration::from_millis(10));
        assert_eq!(timer.drain_due(), vec![Deferred::ClearForce(e)]);
        assert_eq!(timer.pending(), 0);
    }

    #[test]
    fn same_tick_tasks_keep_scheduling_order() {
        let (a, b) = (entity(1), entity(2));
        let mut timer = TimerQueue::new(Duration::from_millis(10));
        timer.after(Duration::from_millis(10), Deferred::ClearForce(b));
        timer.after(Duration::from_millis(5), Deferred::ClearForce(a));
        timer.after(Duration::from_millis(10), Deferred::ClearForce(a));

        timer.advance(Duration::from_millis(10));
        assert_eq!(
            timer.drain_due(),
            vec![
                Deferred::ClearForce(a),
                Deferred::ClearForce(b),
                Deferred::ClearForce(a)
            ]
        );
    }

    #[test]
    fn manual_clock_sleep_advances_time() {
        let mut clock = ManualClock::new();
        clock.sleep(Duration::from_millis(16));
        clock.advance(Duration::from_millis(4));
        assert_eq!(clock.now(), Duration::from_millis(20));
    }
}
