#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Named cooldown timers that pace the subsystems of the tick loop.
//!
//! Each timer pairs a last-fire stamp with an interval. A timer reports due at
//! most once per interval and restamps itself to the query time, so a stalled
//! loop never replays a backlog of missed windows.

use std::time::Duration;

use grid_shooter_core::Cooldown;

const TIMER_COUNT: usize = Cooldown::ALL.len();

/// Intervals used to construct the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    intervals: [Duration; TIMER_COUNT],
}

impl Config {
    /// Creates a configuration from the interval of every timer.
    #[must_use]
    pub const fn new(
        bullet_advance: Duration,
        enemy_fire: Duration,
        cursor_move: Duration,
        reload: Duration,
    ) -> Self {
        Self {
            intervals: [bullet_advance, enemy_fire, cursor_move, reload],
        }
    }

    /// Interval configured for `timer`.
    #[must_use]
    pub const fn interval(&self, timer: Cooldown) -> Duration {
        self.intervals[timer.index()]
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(150),
            Duration::from_millis(1_500),
            Duration::from_millis(120),
            Duration::from_millis(450),
        )
    }
}

/// Scheduler owning the last-fire stamp and interval of every timer.
#[derive(Clone, Debug)]
pub struct Cooldowns {
    intervals: [Duration; TIMER_COUNT],
    last_fired: [Duration; TIMER_COUNT],
}

impl Cooldowns {
    /// Creates a scheduler whose timers were all last stamped at time zero.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            intervals: config.intervals,
            last_fired: [Duration::ZERO; TIMER_COUNT],
        }
    }

    /// Reports whether `timer` is due at `now`, restamping it when it is.
    pub fn due(&mut self, timer: Cooldown, now: Duration) -> bool {
        let slot = timer.index();
        let elapsed = now.saturating_sub(self.last_fired[slot]);
        if elapsed < self.intervals[slot] {
            return false;
        }
        self.last_fired[slot] = now;
        true
    }

    /// Stamps every timer with `now`, as required when a session restarts.
    pub fn reset(&mut self, now: Duration) {
        self.last_fired = [now; TIMER_COUNT];
    }

    /// Replaces the interval of `timer` without touching its stamp.
    pub fn set_interval(&mut self, timer: Cooldown, interval: Duration) {
        self.intervals[timer.index()] = interval;
    }

    /// Interval currently applied to `timer`.
    #[must_use]
    pub fn interval(&self, timer: Cooldown) -> Duration {
        self.intervals[timer.index()]
    }
}
