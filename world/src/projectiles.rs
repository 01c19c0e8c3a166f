//! Two-pass projectile simulation.
//!
//! Player bullets advance first, scanned from the home row toward the enemy
//! end, and every score and tier mutation lands before enemy bullets are read.
//! Enemy bullets then advance from the enemy end toward the home row. Each pass
//! keeps an [`ArrivalMask`] so a bullet that moved during the pass is never
//! picked up again further along the scan.

use grid_shooter_core::{Cell, CellCoord, Event, HitOutcome, Tier, GRID_COLUMNS, GRID_ROWS};

use crate::{grid::ArrivalMask, World};

impl World {
    pub(crate) fn advance_projectiles(&mut self, out_events: &mut Vec<Event>) {
        self.advance_player_bullets(out_events);
        if self.advance_enemy_bullets(out_events) {
            return;
        }
        self.grid.clear_home_row_enemy_bullets();
    }

    fn advance_player_bullets(&mut self, out_events: &mut Vec<Event>) {
        let mut arrivals = ArrivalMask::default();

        for row in (0..GRID_ROWS).rev() {
            for column in 0..GRID_COLUMNS {
                let origin = CellCoord::new(column, row);
                if arrivals.contains(origin) || self.grid.get(origin) != Some(Cell::PlayerBullet) {
                    continue;
                }

                let Some(destination) = origin.toward_enemy() else {
                    self.grid.set(origin, Cell::Empty);
                    continue;
                };

                match self.grid.get(destination) {
                    Some(Cell::Empty) => {
                        self.grid.set(origin, Cell::Empty);
                        self.grid.set(destination, Cell::PlayerBullet);
                        arrivals.insert(destination);
                    }
                    Some(Cell::EnemyBullet) => {
                        self.grid.set(origin, Cell::Empty);
                        self.grid.set(destination, Cell::Empty);
                        self.award_intercept(destination, out_events);
                    }
                    Some(Cell::Enemy(tier)) => {
                        self.grid.set(origin, Cell::Empty);
                        self.strike_enemy(destination, tier, out_events);
                    }
                    Some(Cell::PlayerBullet) | None => {}
                }
            }
        }
    }

    /// Returns `true` when an enemy bullet struck the cursor.
    fn advance_enemy_bullets(&mut self, out_events: &mut Vec<Event>) -> bool {
        let mut arrivals = ArrivalMask::default();

        for row in 0..GRID_ROWS {
            for column in 0..GRID_COLUMNS {
                let origin = CellCoord::new(column, row);
                if arrivals.contains(origin) || self.grid.get(origin) != Some(Cell::EnemyBullet) {
                    continue;
                }

                self.grid.set(origin, Cell::Empty);
                let Some(destination) = origin.toward_player() else {
                    continue;
                };

                if destination == self.cursor {
                    self.lose(destination, out_events);
                    return true;
                }

                match self.grid.get(destination) {
                    Some(Cell::Empty) => {
                        self.grid.set(destination, Cell::EnemyBullet);
                        arrivals.insert(destination);
                    }
                    Some(Cell::PlayerBullet) => {
                        self.grid.set(destination, Cell::Empty);
                        self.award_intercept(destination, out_events);
                    }
                    // blocked
                    Some(Cell::EnemyBullet | Cell::Enemy(_)) | None => {}
                }
            }
        }

        false
    }

    fn strike_enemy(&mut self, cell: CellCoord, tier: Tier, out_events: &mut Vec<Event>) {
        let outcome = match tier.downgraded() {
            Some(lower) => {
                self.grid.set(cell, Cell::Enemy(lower));
                HitOutcome::Downgraded(lower)
            }
            None => {
                self.grid.set(cell, Cell::Empty);
                HitOutcome::Destroyed
            }
        };

        // Downgrades count toward the wave budget exactly like kills do.
        self.kills = self.kills.saturating_add(1);
        let points = self.scores.hit_points(tier, self.wave);
        self.score = self.score.saturating_add(points);
        out_events.push(Event::EnemyHit {
            cell,
            tier,
            outcome,
            points,
        });
    }

    fn award_intercept(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let points = self.scores.intercept_points(self.wave);
        self.score = self.score.saturating_add(points);
        out_events.push(Event::BulletsIntercepted { cell, points });
    }
}
