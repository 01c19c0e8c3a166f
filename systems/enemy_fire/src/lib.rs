#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy fire controller that picks which enemies shoot on a due tick.
//!
//! The controller scans the board in row-major order starting at the enemy
//! end and emits [`Command::SpawnEnemyBullet`] for the first shooters that pass
//! every eligibility check. Structural checks run before the random draw so
//! the random stream only advances for shooters that could actually fire.

use grid_shooter_core::{Cell, CellCoord, Command, GridView, RandomSource, ENEMY_BLOCK_ROWS};

const DRAW_BOUND: u32 = 100;

/// Configuration parameters required to construct the enemy fire controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    fire_threshold: u32,
    suppression_depth: u32,
    max_spawns_per_tick: u32,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// A shooter fires when a draw in `0..100` exceeds `fire_threshold`.
    /// `suppression_depth` counts the cells toward the player that must be
    /// free of other enemies inside the enemy block.
    #[must_use]
    pub const fn new(
        fire_threshold: u32,
        suppression_depth: u32,
        max_spawns_per_tick: u32,
    ) -> Self {
        Self {
            fire_threshold,
            suppression_depth,
            max_spawns_per_tick,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(60, 2, 1)
    }
}

/// Pure system that turns the current board into enemy fire commands.
#[derive(Debug)]
pub struct EnemyFire {
    config: Config,
}

impl EnemyFire {
    /// Creates a new controller using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Scans `grid` and emits at most `max_spawns_per_tick` spawn commands.
    ///
    /// Callers invoke this only when the enemy-fire cooldown is due.
    pub fn handle<R>(&self, grid: GridView<'_>, rng: &mut R, out: &mut Vec<Command>)
    where
        R: RandomSource + ?Sized,
    {
        if self.config.max_spawns_per_tick == 0 {
            return;
        }

        let mut spawned = 0;
        for (shooter, cell) in grid.iter() {
            let Some(muzzle) = self.structural_muzzle(grid, shooter, cell) else {
                continue;
            };

            if rng.next_below(DRAW_BOUND) <= self.config.fire_threshold {
                continue;
            }

            out.push(Command::SpawnEnemyBullet { cell: muzzle });
            spawned += 1;
            if spawned >= self.config.max_spawns_per_tick {
                return;
            }
        }
    }

    /// Returns the muzzle cell when `shooter` may fire regardless of chance.
    fn structural_muzzle(
        &self,
        grid: GridView<'_>,
        shooter: CellCoord,
        cell: Cell,
    ) -> Option<CellCoord> {
        let tier = cell.tier()?;
        if !tier.can_fire() {
            return None;
        }

        let muzzle = shooter.toward_player()?;
        if grid.cell(muzzle) != Some(Cell::Empty) {
            return None;
        }

        if self.is_suppressed(grid, shooter) {
            return None;
        }

        Some(muzzle)
    }

    fn is_suppressed(&self, grid: GridView<'_>, shooter: CellCoord) -> bool {
        (1..=self.config.suppression_depth)
            .map(|offset| shooter.row().saturating_add(offset))
            .take_while(|row| *row < ENEMY_BLOCK_ROWS)
            .any(|row| {
                grid.cell(CellCoord::new(shooter.column(), row))
                    .is_some_and(Cell::is_enemy)
            })
    }
}
