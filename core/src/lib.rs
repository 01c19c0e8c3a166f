#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Grid Shooter engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! that systems react to deterministically. Systems read immutable views such
//! as [`GridView`] and [`WaveProgress`] and respond exclusively with new
//! command batches.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Grid Shooter.";

/// Number of cell columns on the board.
pub const GRID_COLUMNS: u32 = 8;

/// Number of cell rows on the board.
pub const GRID_ROWS: u32 = 8;

/// Number of forward rows occupied by a stamped wave template.
pub const ENEMY_BLOCK_ROWS: u32 = 3;

/// Row in which the player's cursor travels.
pub const HOME_ROW: u32 = GRID_ROWS - 1;

const COLUMN_COUNT: usize = GRID_COLUMNS as usize;
const ROW_COUNT: usize = GRID_ROWS as usize;
const TEMPLATE_ROW_COUNT: usize = ENEMY_BLOCK_ROWS as usize;

/// Dense row-major storage backing the board.
pub type GridCells = [[Cell; COLUMN_COUNT]; ROW_COUNT];

/// Dense row-major storage backing a wave template.
pub type TemplateCells = [[Cell; COLUMN_COUNT]; TEMPLATE_ROW_COUNT];

/// Hit-point rank of an enemy. Higher tiers downgrade before disappearing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    /// Weakest enemy; destroyed on the first hit and never fires.
    A,
    /// Destroyed on the first hit.
    B,
    /// Downgrades to [`Tier::B`] when hit.
    C,
    /// Downgrades to [`Tier::C`] when hit.
    D,
}

impl Tier {
    /// Number of hits required to clear the enemy through its downgrade chain.
    #[must_use]
    pub const fn weight(self) -> u32 {
        match self {
            Self::A | Self::B => 1,
            Self::C => 2,
            Self::D => 3,
        }
    }

    /// Tier the enemy becomes after absorbing a hit, or `None` when destroyed.
    #[must_use]
    pub const fn downgraded(self) -> Option<Tier> {
        match self {
            Self::A | Self::B => None,
            Self::C => Some(Self::B),
            Self::D => Some(Self::C),
        }
    }

    /// Reports whether enemies of this tier are allowed to shoot.
    #[must_use]
    pub const fn can_fire(self) -> bool {
        !matches!(self, Self::A)
    }
}

/// Typed marker stored in a single grid position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Nothing occupies the cell.
    #[default]
    Empty,
    /// Projectile travelling toward the enemy end of the board.
    PlayerBullet,
    /// Projectile travelling toward the player's home row.
    EnemyBullet,
    /// Enemy of the provided tier.
    Enemy(Tier),
}

impl Cell {
    /// Reports whether the cell is free for movement and spawning.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the tier of the enemy occupying the cell, if any.
    #[must_use]
    pub const fn tier(self) -> Option<Tier> {
        match self {
            Self::Enemy(tier) => Some(tier),
            _ => None,
        }
    }

    /// Reports whether an enemy occupies the cell.
    #[must_use]
    pub const fn is_enemy(self) -> bool {
        matches!(self, Self::Enemy(_))
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Row zero is the enemy end of the board; [`HOME_ROW`] is the player's end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Reports whether the coordinate lies on the board.
    #[must_use]
    pub const fn is_on_grid(&self) -> bool {
        self.column < GRID_COLUMNS && self.row < GRID_ROWS
    }

    /// Neighbouring cell one step toward the enemy end, if it is on the board.
    #[must_use]
    pub const fn toward_enemy(self) -> Option<CellCoord> {
        if self.row == 0 || !self.is_on_grid() {
            None
        } else {
            Some(Self::new(self.column, self.row - 1))
        }
    }

    /// Neighbouring cell one step toward the player's home row, if it is on the board.
    #[must_use]
    pub const fn toward_player(self) -> Option<CellCoord> {
        if !self.is_on_grid() || self.row + 1 >= GRID_ROWS {
            None
        } else {
            Some(Self::new(self.column, self.row + 1))
        }
    }
}

/// Lateral direction the cursor may travel along the home row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lateral {
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

/// Player intent resolved from raw input for a single loop pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Intent {
    /// Requested cursor movement, if any.
    pub lateral: Option<Lateral>,
    /// Whether the player is holding the fire control.
    pub fire: bool,
}

/// Named cooldown timers that pace the individual subsystems.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cooldown {
    /// Gates projectile advancement.
    BulletAdvance,
    /// Gates enemy fire decisions.
    EnemyFire,
    /// Gates cursor movement.
    CursorMove,
    /// Gates player bullet spawning.
    Reload,
}

impl Cooldown {
    /// Every timer in a fixed order.
    pub const ALL: [Cooldown; 4] = [
        Self::BulletAdvance,
        Self::EnemyFire,
        Self::CursorMove,
        Self::Reload,
    ];

    /// Dense index of the timer inside [`Cooldown::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::BulletAdvance => 0,
            Self::EnemyFire => 1,
            Self::CursorMove => 2,
            Self::Reload => 3,
        }
    }
}

/// Lifecycle phase of a single game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// No session has been started yet.
    Init,
    /// Waves are in play.
    Playing,
    /// The current wave was cleared and the next one is being stamped.
    WaveClear,
    /// An enemy bullet reached the cursor.
    Lost,
    /// The final wave was cleared.
    Won,
}

/// Identifier of a template within the wave catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TemplateId(u32);

impl TemplateId {
    /// Creates a new template identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Enemy layout stamped into the forward rows of the board at wave start.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WaveTemplate {
    cells: TemplateCells,
}

impl WaveTemplate {
    /// Creates a template from explicit cells, rejecting bullets and enemy-free layouts.
    pub fn new(cells: TemplateCells) -> Result<Self, TemplateError> {
        for (row, line) in cells.iter().enumerate() {
            for (column, cell) in line.iter().enumerate() {
                if matches!(cell, Cell::PlayerBullet | Cell::EnemyBullet) {
                    return Err(TemplateError::ProjectileInTemplate {
                        column: column as u32,
                        row: row as u32,
                    });
                }
            }
        }

        let template = Self { cells };
        if template.weighted_count() == 0 {
            return Err(TemplateError::NoEnemies);
        }
        Ok(template)
    }

    /// Parses a template from three rows of eight glyphs.
    ///
    /// `.` marks an empty cell and `A`, `B`, `C`, `D` mark enemies of the
    /// matching tier. Glyphs are case-insensitive.
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, TemplateError> {
        if rows.len() != TEMPLATE_ROW_COUNT {
            return Err(TemplateError::RowCount { found: rows.len() });
        }

        let mut cells = [[Cell::Empty; COLUMN_COUNT]; TEMPLATE_ROW_COUNT];
        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let glyphs: Vec<char> = row.chars().collect();
            if glyphs.len() != COLUMN_COUNT {
                return Err(TemplateError::RowLength {
                    row: row_index as u32,
                    found: glyphs.len(),
                });
            }

            for (column, glyph) in glyphs.into_iter().enumerate() {
                cells[row_index][column] = match glyph.to_ascii_uppercase() {
                    '.' => Cell::Empty,
                    'A' => Cell::Enemy(Tier::A),
                    'B' => Cell::Enemy(Tier::B),
                    'C' => Cell::Enemy(Tier::C),
                    'D' => Cell::Enemy(Tier::D),
                    _ => {
                        return Err(TemplateError::UnknownGlyph {
                            glyph,
                            column: column as u32,
                            row: row_index as u32,
                        })
                    }
                };
            }
        }

        Self::new(cells)
    }

    /// Rows of the template, forward-most first.
    #[must_use]
    pub const fn cells(&self) -> &TemplateCells {
        &self.cells
    }

    /// Hit budget required to fully clear the template.
    #[must_use]
    pub fn weighted_count(&self) -> u32 {
        self.cells
            .iter()
            .flatten()
            .filter_map(|cell| cell.tier())
            .map(Tier::weight)
            .sum()
    }
}

/// Reasons a wave template definition may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// The template did not provide exactly three rows.
    #[error("wave template must have {expected} rows, found {found}", expected = ENEMY_BLOCK_ROWS)]
    RowCount {
        /// Number of rows provided.
        found: usize,
    },
    /// A row did not provide exactly eight glyphs.
    #[error("wave template row {row} must have {expected} cells, found {found}", expected = GRID_COLUMNS)]
    RowLength {
        /// Offending row index.
        row: u32,
        /// Number of glyphs provided.
        found: usize,
    },
    /// A glyph outside the template vocabulary was encountered.
    #[error("unknown glyph `{glyph}` at column {column}, row {row}")]
    UnknownGlyph {
        /// Offending glyph.
        glyph: char,
        /// Column of the glyph.
        column: u32,
        /// Row of the glyph.
        row: u32,
    },
    /// Templates may only describe enemies and empty cells.
    #[error("projectile placed in wave template at column {column}, row {row}")]
    ProjectileInTemplate {
        /// Column of the projectile.
        column: u32,
        /// Row of the projectile.
        row: u32,
    },
    /// The template did not contain a single enemy.
    #[error("wave template contains no enemies")]
    NoEnemies,
}

/// Result of a player bullet striking an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HitOutcome {
    /// The enemy survived at the provided lower tier.
    Downgraded(Tier),
    /// The enemy was removed from the board.
    Destroyed,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Re-initialises the grid, counters and cursor and stamps the opening wave.
    StartSession {
        /// Template stamped as wave one.
        template: TemplateId,
    },
    /// Moves the cursor one column along the home row.
    MoveCursor {
        /// Direction of travel.
        direction: Lateral,
    },
    /// Spawns a player bullet directly in front of the cursor.
    FirePlayerBullet,
    /// Runs both projectile passes once.
    AdvanceProjectiles,
    /// Spawns an enemy bullet at the provided cell.
    SpawnEnemyBullet {
        /// Cell directly toward the player from the firing enemy.
        cell: CellCoord,
    },
    /// Clears the current wave and stamps the provided template as the next one.
    AdvanceWave {
        /// Template stamped for the next wave.
        template: TemplateId,
    },
    /// Ends the session as a win.
    DeclareVictory,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A fresh session began.
    SessionStarted,
    /// A template was stamped into the forward rows.
    WaveStamped {
        /// Wave number the template belongs to.
        wave: u32,
        /// Template that was stamped.
        template: TemplateId,
        /// Hit budget required to clear the wave.
        weighted_count: u32,
    },
    /// The cursor moved along the home row.
    CursorMoved {
        /// Cell the cursor occupied before moving.
        from: CellCoord,
        /// Cell the cursor occupies after moving.
        to: CellCoord,
    },
    /// A player bullet was spawned.
    PlayerBulletFired {
        /// Cell the bullet occupies.
        cell: CellCoord,
    },
    /// A player bullet struck an enemy.
    EnemyHit {
        /// Cell occupied by the enemy.
        cell: CellCoord,
        /// Tier the enemy held before the hit.
        tier: Tier,
        /// Whether the enemy was downgraded or destroyed.
        outcome: HitOutcome,
        /// Points awarded for the hit.
        points: u32,
    },
    /// A player bullet and an enemy bullet annihilated each other.
    BulletsIntercepted {
        /// Cell where the collision resolved.
        cell: CellCoord,
        /// Points awarded for the intercept.
        points: u32,
    },
    /// An enemy bullet was spawned.
    EnemyBulletFired {
        /// Cell the bullet occupies.
        cell: CellCoord,
    },
    /// An enemy bullet reached the cursor.
    GameLost {
        /// Cell where the cursor was struck.
        cell: CellCoord,
        /// Final score of the session.
        score: u32,
    },
    /// The wave's hit budget was exhausted.
    WaveCleared {
        /// Wave number that was cleared.
        wave: u32,
    },
    /// The final wave was cleared.
    GameWon {
        /// Last wave that was cleared.
        wave: u32,
        /// Final score of the session.
        score: u32,
    },
}

/// Snapshot of the counters that drive wave progression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WaveProgress {
    /// Current wave number, starting at one.
    pub wave: u32,
    /// Weighted kills accumulated during the current wave.
    pub kills: u32,
    /// Hit budget required to clear the current wave.
    pub weighted_count: u32,
    /// Phase of the session the counters belong to.
    pub phase: SessionPhase,
}

impl WaveProgress {
    /// Reports whether the current wave's hit budget has been exhausted.
    #[must_use]
    pub const fn is_cleared(&self) -> bool {
        matches!(self.phase, SessionPhase::Playing) && self.kills >= self.weighted_count
    }
}

/// Points awarded per enemy tier and per intercepted bullet, scaled by wave number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoreTable {
    /// Base points for hitting a tier A enemy.
    pub tier_a: u32,
    /// Base points for hitting a tier B enemy.
    pub tier_b: u32,
    /// Base points for hitting a tier C enemy.
    pub tier_c: u32,
    /// Base points for hitting a tier D enemy.
    pub tier_d: u32,
    /// Base points for annihilating an enemy bullet.
    pub intercept: u32,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            tier_a: 10,
            tier_b: 20,
            tier_c: 30,
            tier_d: 40,
            intercept: 5,
        }
    }
}

impl ScoreTable {
    /// Points for hitting an enemy of `tier` during `wave`.
    #[must_use]
    pub const fn hit_points(&self, tier: Tier, wave: u32) -> u32 {
        let base = match tier {
            Tier::A => self.tier_a,
            Tier::B => self.tier_b,
            Tier::C => self.tier_c,
            Tier::D => self.tier_d,
        };
        base.saturating_mul(wave)
    }

    /// Points for intercepting an enemy bullet during `wave`.
    #[must_use]
    pub const fn intercept_points(&self, wave: u32) -> u32 {
        self.intercept.saturating_mul(wave)
    }
}

/// Read-only view into the board.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    cells: &'a GridCells,
}

impl<'a> GridView<'a> {
    /// Captures a new view backed by the provided cells.
    #[must_use]
    pub const fn new(cells: &'a GridCells) -> Self {
        Self { cells }
    }

    /// Returns the marker stored at the provided cell, or `None` off the board.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<Cell> {
        if !coord.is_on_grid() {
            return None;
        }
        Some(self.cells[coord.row() as usize][coord.column() as usize])
    }

    /// Iterates every cell in row-major order, enemy end first.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Cell)> + 'a {
        self.cells.iter().enumerate().flat_map(|(row, line)| {
            line.iter()
                .enumerate()
                .map(move |(column, cell)| (CellCoord::new(column as u32, row as u32), *cell))
        })
    }

    /// Rows of the board, enemy end first.
    #[must_use]
    pub const fn rows(&self) -> &'a GridCells {
        self.cells
    }

    /// Number of cells holding an enemy.
    #[must_use]
    pub fn enemy_count(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| cell.is_enemy()).count()
    }
}

/// Long-lived random stream consumed by the simulation.
///
/// Implementations are seeded once at process start and never reseeded.
pub trait RandomSource {
    /// Returns a uniformly distributed integer in `0..bound`.
    ///
    /// `bound` is always greater than zero.
    fn next_below(&mut self, bound: u32) -> u32;
}
