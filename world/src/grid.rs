use grid_shooter_core::{
    Cell, CellCoord, GridCells, GridView, WaveTemplate, ENEMY_BLOCK_ROWS, GRID_COLUMNS, GRID_ROWS,
    HOME_ROW,
};

/// Dense 8x8 board of cell markers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Grid {
    cells: GridCells,
}

impl Grid {
    pub(crate) fn new() -> Self {
        Self {
            cells: [[Cell::Empty; GRID_COLUMNS as usize]; GRID_ROWS as usize],
        }
    }

    pub(crate) fn clear(&mut self) {
        for row in self.cells.iter_mut() {
            row.fill(Cell::Empty);
        }
    }

    pub(crate) fn get(&self, coord: CellCoord) -> Option<Cell> {
        self.view().cell(coord)
    }

    pub(crate) fn set(&mut self, coord: CellCoord, cell: Cell) {
        if !coord.is_on_grid() {
            return;
        }
        self.cells[coord.row() as usize][coord.column() as usize] = cell;
    }

    /// Clears the whole board and copies the template into the forward rows.
    pub(crate) fn stamp(&mut self, template: &WaveTemplate) {
        self.clear();
        for (row, line) in template.cells().iter().enumerate() {
            self.cells[row] = *line;
        }
        debug_assert!(
            self.view()
                .iter()
                .all(|(coord, cell)| !cell.is_enemy() || coord.row() < ENEMY_BLOCK_ROWS),
            "templates only cover the enemy block"
        );
    }

    /// Removes enemy bullets that came to rest in the player's home row.
    pub(crate) fn clear_home_row_enemy_bullets(&mut self) {
        for cell in self.cells[HOME_ROW as usize].iter_mut() {
            if *cell == Cell::EnemyBullet {
                *cell = Cell::Empty;
            }
        }
    }

    pub(crate) fn view(&self) -> GridView<'_> {
        GridView::new(&self.cells)
    }
}

/// Per-pass record of the cells that received a projectile.
#[derive(Debug, Default)]
pub(crate) struct ArrivalMask {
    cells: [[bool; GRID_COLUMNS as usize]; GRID_ROWS as usize],
}

impl ArrivalMask {
    pub(crate) fn insert(&mut self, coord: CellCoord) {
        if coord.is_on_grid() {
            self.cells[coord.row() as usize][coord.column() as usize] = true;
        }
    }

    pub(crate) fn contains(&self, coord: CellCoord) -> bool {
        coord.is_on_grid() && self.cells[coord.row() as usize][coord.column() as usize]
    }
}
