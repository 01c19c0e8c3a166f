//! Axis input sources and the dead-zone mapping that resolves them to intents.

use grid_shooter_core::{Intent, Lateral};

/// Samples inside this magnitude are treated as a centered stick.
const DEFAULT_DEAD_ZONE: i16 = 8_000;

/// Polls the autopilot holds each direction; enough for eight cursor moves at
/// the default 20 ms pass and 120 ms cursor cooldown, so every sweep reaches the edge.
const DEFAULT_SWEEP_SEGMENT: u32 = 48;

/// Raw two-axis input. Positive `x` points right, positive `y` toward the enemy.
pub(crate) trait InputSource {
    /// Samples both axes.
    fn poll_axes(&mut self) -> (i16, i16);
}

/// Resolves raw axis samples into an [`Intent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct AxisMapping {
    dead_zone: i16,
}

impl AxisMapping {
    pub(crate) fn new(dead_zone: i16) -> Self {
        Self {
            dead_zone: dead_zone.saturating_abs(),
        }
    }

    pub(crate) fn resolve(&self, x: i16, y: i16) -> Intent {
        let lateral = if x < -self.dead_zone {
            Some(Lateral::Left)
        } else if x > self.dead_zone {
            Some(Lateral::Right)
        } else {
            None
        };

        Intent {
            lateral,
            fire: y > self.dead_zone,
        }
    }
}

impl Default for AxisMapping {
    fn default() -> Self {
        Self::new(DEFAULT_DEAD_ZONE)
    }
}

/// Headless input that holds fire while sweeping the stick fully right, then
/// fully left, so the cursor bounces between the edges of the home row.
#[derive(Clone, Debug)]
pub(crate) struct Autopilot {
    segment: u32,
    polls: u32,
}

impl Autopilot {
    pub(crate) fn new(segment: u32) -> Self {
        Self {
            segment: segment.max(1),
            polls: 0,
        }
    }
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(DEFAULT_SWEEP_SEGMENT)
    }
}

impl InputSource for Autopilot {
    fn poll_axes(&mut self) -> (i16, i16) {
        let x = if (self.polls / self.segment) % 2 == 0 {
            i16::MAX
        } else {
            i16::MIN
        };
        self.polls = self.polls.wrapping_add(1);
        (x, i16::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_inside_dead_zone_are_ignored() {
        let mapping = AxisMapping::new(1_000);

        assert_eq!(mapping.resolve(1_000, -1_000), Intent::default());
        assert_eq!(
            mapping.resolve(-1_001, 1_001),
            Intent {
                lateral: Some(Lateral::Left),
                fire: true,
            }
        );
        assert_eq!(mapping.resolve(4_000, 0).lateral, Some(Lateral::Right));
    }

    #[test]
    fn pulling_back_never_fires() {
        let mapping = AxisMapping::default();

        assert!(!mapping.resolve(0, i16::MIN).fire);
    }

    #[test]
    fn negative_dead_zone_is_normalised() {
        assert_eq!(AxisMapping::new(-500), AxisMapping::new(500));
    }

    #[test]
    fn autopilot_sweeps_and_holds_fire() {
        let mut autopilot = Autopilot::new(2);
        let mapping = AxisMapping::default();

        let lateral: Vec<Option<Lateral>> = (0..8)
            .map(|_| {
                let (x, y) = autopilot.poll_axes();
                let intent = mapping.resolve(x, y);
                assert!(intent.fire);
                intent.lateral
            })
            .collect();

        assert_eq!(
            lateral,
            vec![
                Some(Lateral::Right),
                Some(Lateral::Right),
                Some(Lateral::Left),
                Some(Lateral::Left),
                Some(Lateral::Right),
                Some(Lateral::Right),
                Some(Lateral::Left),
                Some(Lateral::Left),
            ]
        );
    }

    #[test]
    fn default_sweep_crosses_the_whole_home_row() {
        let mut autopilot = Autopilot::default();
        let mapping = AxisMapping::default();
        let mut column: i32 = 3;
        let mut visited = [false; 8];
        let mut polls_since_move = 0;

        // One cursor step per six polls: 120 ms cooldown at 20 ms per pass.
        for _ in 0..400 {
            let (x, y) = autopilot.poll_axes();
            polls_since_move += 1;
            if polls_since_move >= 6 {
                polls_since_move = 0;
                column = match mapping.resolve(x, y).lateral {
                    Some(Lateral::Left) => (column - 1).max(0),
                    Some(Lateral::Right) => (column + 1).min(7),
                    None => column,
                };
            }
            visited[column as usize] = true;
        }

        assert_eq!(visited, [true; 8]);
    }
}
