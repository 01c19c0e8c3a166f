#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Progression tracker that advances waves and scales difficulty.
//!
//! The tracker watches the events of each tick. Once the weighted kills of the
//! current wave reach its weighted enemy count it requests the next template,
//! or declares victory when the wave cap has been reached.

use std::time::Duration;

use grid_shooter_core::{Command, Event, RandomSource, TemplateId, WaveProgress};

/// Configuration parameters required to construct the progression tracker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    wave_cap: u32,
    fire_interval_base: Duration,
    fire_interval_step: Duration,
    fire_interval_floor: Duration,
}

impl Config {
    /// Creates a new configuration from the wave cap and the enemy-fire curve.
    #[must_use]
    pub const fn new(
        wave_cap: u32,
        fire_interval_base: Duration,
        fire_interval_step: Duration,
        fire_interval_floor: Duration,
    ) -> Self {
        Self {
            wave_cap,
            fire_interval_base,
            fire_interval_step,
            fire_interval_floor,
        }
    }

    /// Final wave of a session.
    #[must_use]
    pub const fn wave_cap(&self) -> u32 {
        self.wave_cap
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            10,
            Duration::from_millis(1_500),
            Duration::from_millis(100),
            Duration::from_millis(400),
        )
    }
}

/// Pure system that emits wave transitions.
#[derive(Debug)]
pub struct Progression {
    config: Config,
}

impl Progression {
    /// Creates a new tracker using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Enemy-fire interval for `wave`: `max(floor, base - wave * step)`.
    #[must_use]
    pub fn enemy_fire_interval(&self, wave: u32) -> Duration {
        let shrink = self.config.fire_interval_step.saturating_mul(wave);
        self.config
            .fire_interval_base
            .saturating_sub(shrink)
            .max(self.config.fire_interval_floor)
    }

    /// Draws the template that opens a new session.
    pub fn opening_template<R>(&self, catalog_len: u32, rng: &mut R) -> TemplateId
    where
        R: RandomSource + ?Sized,
    {
        draw_template(catalog_len, rng)
    }

    /// Consumes the events of one tick and emits the resulting transition.
    ///
    /// Only ticks that landed a hit are considered, so a wave is never
    /// advanced twice for the same kill budget.
    pub fn handle<R>(
        &self,
        events: &[Event],
        progress: WaveProgress,
        catalog_len: u32,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) where
        R: RandomSource + ?Sized,
    {
        let landed_hit = events
            .iter()
            .any(|event| matches!(event, Event::EnemyHit { .. }));
        let lost = events
            .iter()
            .any(|event| matches!(event, Event::GameLost { .. }));
        if !landed_hit || lost || !progress.is_cleared() {
            return;
        }

        if progress.wave >= self.config.wave_cap {
            out.push(Command::DeclareVictory);
        } else {
            out.push(Command::AdvanceWave {
                template: draw_template(catalog_len, rng),
            });
        }
    }
}

fn draw_template<R>(catalog_len: u32, rng: &mut R) -> TemplateId
where
    R: RandomSource + ?Sized,
{
    TemplateId::new(rng.next_below(catalog_len.max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn interval_shrinks_by_step_until_floor() {
        let progression = Progression::new(Config::default());

        assert_eq!(progression.enemy_fire_interval(0), ms(1_500));
        assert_eq!(progression.enemy_fire_interval(1), ms(1_400));
        assert_eq!(progression.enemy_fire_interval(10), ms(500));
        assert_eq!(progression.enemy_fire_interval(11), ms(400));
        assert_eq!(progression.enemy_fire_interval(u32::MAX), ms(400));
    }

    #[test]
    fn interval_is_non_increasing_in_wave() {
        let progression = Progression::new(Config::new(30, ms(900), ms(70), ms(250)));

        let intervals: Vec<Duration> = (0..30)
            .map(|wave| progression.enemy_fire_interval(wave))
            .collect();

        assert!(intervals.windows(2).all(|pair| pair[0] >= pair[1]));
        assert!(intervals.iter().all(|interval| *interval >= ms(250)));
    }
}
