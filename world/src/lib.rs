#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Grid Shooter.
//!
//! The [`World`] aggregate owns the board, the cursor, the wave catalog and
//! every session counter. It is mutated exclusively through [`apply`] and read
//! through the functions in [`query`].

mod grid;
mod projectiles;
mod waves;

use grid_shooter_core::{
    Cell, CellCoord, Command, Event, Lateral, ScoreTable, SessionPhase, TemplateId, GRID_COLUMNS,
    HOME_ROW, WELCOME_BANNER,
};

use crate::grid::Grid;

pub use crate::waves::{CatalogError, WaveCatalog};

/// Represents the authoritative Grid Shooter world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: Grid,
    catalog: WaveCatalog,
    scores: ScoreTable,
    cursor: CellCoord,
    phase: SessionPhase,
    wave: u32,
    kills: u32,
    weighted_count: u32,
    score: u32,
    best_score: u32,
}

impl World {
    /// Creates a new world using the built-in catalog and default scoring.
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(WaveCatalog::builtin(), ScoreTable::default())
    }

    /// Creates a new world using the provided catalog and score table.
    #[must_use]
    pub fn with_catalog(catalog: WaveCatalog, scores: ScoreTable) -> Self {
        Self {
            banner: WELCOME_BANNER,
            grid: Grid::new(),
            catalog,
            scores,
            cursor: home_cursor(),
            phase: SessionPhase::Init,
            wave: 0,
            kills: 0,
            weighted_count: 0,
            score: 0,
            best_score: 0,
        }
    }

    fn stamp_wave(&mut self, template: TemplateId, out_events: &mut Vec<Event>) {
        let stamped = self.catalog.template(template);
        self.grid.stamp(stamped);
        self.weighted_count = stamped.weighted_count();
        self.kills = 0;
        self.phase = SessionPhase::Playing;
        tracing::debug!(
            wave = self.wave,
            template = template.get(),
            weighted_count = self.weighted_count,
            "stamped wave"
        );
        out_events.push(Event::WaveStamped {
            wave: self.wave,
            template,
            weighted_count: self.weighted_count,
        });
    }

    fn lose(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        self.phase = SessionPhase::Lost;
        self.best_score = self.best_score.max(self.score);
        tracing::info!(wave = self.wave, score = self.score, "game lost");
        out_events.push(Event::GameLost {
            cell,
            score: self.score,
        });
    }

    fn is_playing(&self) -> bool {
        self.phase == SessionPhase::Playing
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Gameplay commands are ignored unless a session is in play; only
/// [`Command::StartSession`] is accepted in every phase.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartSession { template } => {
            world.grid.clear();
            world.cursor = home_cursor();
            world.score = 0;
            world.wave = 1;
            out_events.push(Event::SessionStarted);
            world.stamp_wave(template, out_events);
        }
        Command::MoveCursor { direction } => {
            if !world.is_playing() {
                return;
            }
            let from = world.cursor;
            let column = match direction {
                Lateral::Left => from.column().saturating_sub(1),
                Lateral::Right => (from.column() + 1).min(GRID_COLUMNS - 1),
            };
            if column == from.column() {
                return;
            }
            let to = CellCoord::new(column, HOME_ROW);
            world.cursor = to;
            out_events.push(Event::CursorMoved { from, to });
        }
        Command::FirePlayerBullet => {
            if !world.is_playing() {
                return;
            }
            let Some(cell) = world.cursor.toward_enemy() else {
                return;
            };
            if world.grid.get(cell) == Some(Cell::Empty) {
                world.grid.set(cell, Cell::PlayerBullet);
                out_events.push(Event::PlayerBulletFired { cell });
            }
        }
        Command::AdvanceProjectiles => {
            if world.is_playing() {
                world.advance_projectiles(out_events);
            }
        }
        Command::SpawnEnemyBullet { cell } => {
            if !world.is_playing() || cell.row() >= HOME_ROW {
                return;
            }
            if world.grid.get(cell) == Some(Cell::Empty) {
                world.grid.set(cell, Cell::EnemyBullet);
                out_events.push(Event::EnemyBulletFired { cell });
            }
        }
        Command::AdvanceWave { template } => {
            if !world.is_playing() || world.kills < world.weighted_count {
                return;
            }
            world.phase = SessionPhase::WaveClear;
            tracing::info!(wave = world.wave, score = world.score, "wave cleared");
            out_events.push(Event::WaveCleared { wave: world.wave });
            world.wave = world.wave.saturating_add(1);
            world.stamp_wave(template, out_events);
        }
        Command::DeclareVictory => {
            if !world.is_playing() {
                return;
            }
            world.phase = SessionPhase::Won;
            world.best_score = world.best_score.max(world.score);
            tracing::info!(wave = world.wave, score = world.score, "game won");
            out_events.push(Event::WaveCleared { wave: world.wave });
            out_events.push(Event::GameWon {
                wave: world.wave,
                score: world.score,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{WaveCatalog, World};
    use grid_shooter_core::{CellCoord, GridView, SessionPhase, WaveProgress};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Exposes a read-only view of the board.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        world.grid.view()
    }

    /// Cell currently occupied by the cursor.
    #[must_use]
    pub fn cursor(world: &World) -> CellCoord {
        world.cursor
    }

    /// Counters that drive wave progression.
    #[must_use]
    pub fn wave_progress(world: &World) -> WaveProgress {
        WaveProgress {
            wave: world.wave,
            kills: world.kills,
            weighted_count: world.weighted_count,
            phase: world.phase,
        }
    }

    /// Lifecycle phase of the current session.
    #[must_use]
    pub fn phase(world: &World) -> SessionPhase {
        world.phase
    }

    /// Score accumulated during the current session.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Highest final score observed since the world was created.
    #[must_use]
    pub fn best_score(world: &World) -> u32 {
        world.best_score
    }

    /// Provides read-only access to the wave catalog.
    #[must_use]
    pub fn catalog(world: &World) -> &WaveCatalog {
        &world.catalog
    }
}

fn home_cursor() -> CellCoord {
    CellCoord::new((GRID_COLUMNS - 1) / 2, HOME_ROW)
}
