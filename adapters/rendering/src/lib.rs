#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Grid Shooter adapters.
//!
//! Adapters draw the board through [`Renderer`] once per loop pass and
//! present two-line messages through [`StatusDisplay`]. [`TextRenderer`]
//! implements both on top of any [`Write`] sink.

use anyhow::{Context, Result as AnyResult};
use grid_shooter_core::{Cell, CellCoord, GridView, Tier};
use std::{io::Write, thread, time::Duration};

/// Glyph drawn at the cursor cell.
pub const CURSOR_GLYPH: char = 'A';

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Converts the color channels back to bytes, ignoring alpha.
    #[must_use]
    pub fn to_rgb_u8(self) -> [u8; 3] {
        [
            channel_to_u8(self.red),
            channel_to_u8(self.green),
            channel_to_u8(self.blue),
        ]
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

fn channel_to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

const PLAYER_BULLET_COLOR: Color = Color::from_rgb_u8(0x40, 0xc0, 0xff);

/// LED color shown for the provided cell.
#[must_use]
pub const fn cell_color(cell: Cell) -> Color {
    match cell {
        Cell::Empty => Color::from_rgb_u8(0x00, 0x00, 0x00),
        Cell::PlayerBullet => PLAYER_BULLET_COLOR,
        Cell::EnemyBullet => Color::from_rgb_u8(0xff, 0x50, 0x20),
        Cell::Enemy(Tier::A) => Color::from_rgb_u8(0x2f, 0x95, 0x32),
        Cell::Enemy(Tier::B) => Color::from_rgb_u8(0xff, 0xc1, 0x07),
        Cell::Enemy(Tier::C) => Color::from_rgb_u8(0xff, 0x7a, 0x00),
        Cell::Enemy(Tier::D) => Color::from_rgb_u8(0xc8, 0x2a, 0x36),
    }
}

/// LED color shown at the cursor cell.
#[must_use]
pub fn cursor_color() -> Color {
    PLAYER_BULLET_COLOR.lighten(0.6)
}

/// Text glyph used for the provided cell.
#[must_use]
pub const fn cell_glyph(cell: Cell) -> char {
    match cell {
        Cell::Empty => '.',
        Cell::PlayerBullet => '^',
        Cell::EnemyBullet => 'v',
        Cell::Enemy(Tier::A) => 'a',
        Cell::Enemy(Tier::B) => 'b',
        Cell::Enemy(Tier::C) => 'c',
        Cell::Enemy(Tier::D) => 'd',
    }
}

/// Renders the board as text, one line per row with the enemy end first.
#[must_use]
pub fn render_frame(grid: GridView<'_>, cursor: CellCoord) -> String {
    let mut frame = String::new();
    for (row, cells) in (0u32..).zip(grid.rows()) {
        for (column, cell) in (0u32..).zip(cells) {
            frame.push(if CellCoord::new(column, row) == cursor {
                CURSOR_GLYPH
            } else {
                cell_glyph(*cell)
            });
        }
        frame.push('\n');
    }
    frame
}

/// Presents the board once per loop pass.
pub trait Renderer {
    /// Draws the current board with the cursor overlaid.
    fn render(&mut self, grid: GridView<'_>, cursor: CellCoord) -> AnyResult<()>;
}

/// Two-line status display used by the loss and win sequences.
pub trait StatusDisplay {
    /// Shows the two lines, blocking for the display's hold duration.
    fn show_lines(&mut self, first: &str, second: &str) -> AnyResult<()>;
}

/// Renderer and status display that writes plain or ANSI-colored text.
#[derive(Debug)]
pub struct TextRenderer<W> {
    out: W,
    ansi: bool,
    hold: Duration,
}

impl<W: Write> TextRenderer<W> {
    /// Creates a plain text renderer that never blocks.
    #[must_use]
    pub fn new(out: W) -> Self {
        Self {
            out,
            ansi: false,
            hold: Duration::ZERO,
        }
    }

    /// Enables 24-bit ANSI coloring of cell glyphs.
    #[must_use]
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    /// Sets how long each status screen stays up.
    #[must_use]
    pub fn with_hold(mut self, hold: Duration) -> Self {
        self.hold = hold;
        self
    }

    /// Releases the underlying sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_colored(&mut self, glyph: char, color: Color) -> AnyResult<()> {
        let [red, green, blue] = color.to_rgb_u8();
        write!(self.out, "\x1b[38;2;{red};{green};{blue}m{glyph}\x1b[0m")?;
        Ok(())
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, grid: GridView<'_>, cursor: CellCoord) -> AnyResult<()> {
        if !self.ansi {
            let frame = render_frame(grid, cursor);
            writeln!(self.out, "{frame}").context("failed to write frame")?;
            return self.out.flush().context("failed to flush frame");
        }

        for (coord, cell) in grid.iter() {
            if coord.column() == 0 && coord.row() > 0 {
                writeln!(self.out).context("failed to write frame")?;
            }
            if coord == cursor {
                self.write_colored(CURSOR_GLYPH, cursor_color())?;
            } else {
                self.write_colored(cell_glyph(cell), cell_color(cell))?;
            }
        }
        writeln!(self.out, "\n").context("failed to write frame")?;
        self.out.flush().context("failed to flush frame")
    }
}

impl<W: Write> StatusDisplay for TextRenderer<W> {
    fn show_lines(&mut self, first: &str, second: &str) -> AnyResult<()> {
        writeln!(self.out, "{first}\n{second}").context("failed to write status lines")?;
        self.out.flush().context("failed to flush status lines")?;
        if !self.hold.is_zero() {
            thread::sleep(self.hold);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_shooter_core::{GridCells, HOME_ROW};

    fn sample_cells() -> GridCells {
        let mut cells = GridCells::default();
        cells[0][1] = Cell::Enemy(Tier::D);
        cells[1][2] = Cell::Enemy(Tier::A);
        cells[3][1] = Cell::EnemyBullet;
        cells[6][4] = Cell::PlayerBullet;
        cells
    }

    #[test]
    fn frame_draws_rows_enemy_end_first() {
        let cells = sample_cells();
        let frame = render_frame(GridView::new(&cells), CellCoord::new(4, HOME_ROW));

        assert_eq!(
            frame,
            ".d......\n..a.....\n........\n.v......\n........\n........\n....^...\n....A...\n"
        );
    }

    #[test]
    fn text_renderer_writes_frame_and_status() {
        let cells = sample_cells();
        let mut renderer = TextRenderer::new(Vec::new());

        renderer
            .render(GridView::new(&cells), CellCoord::new(0, HOME_ROW))
            .expect("write to vec");
        renderer
            .show_lines("GAME OVER", "SCORE 120")
            .expect("write to vec");

        let text = String::from_utf8(renderer.into_inner()).expect("utf8");
        assert!(text.starts_with(".d......\n"));
        assert!(text.contains("A.......\n"));
        assert!(text.ends_with("GAME OVER\nSCORE 120\n"));
    }

    #[test]
    fn ansi_renderer_colors_every_cell() {
        let cells = GridCells::default();
        let mut renderer = TextRenderer::new(Vec::new()).with_ansi(true);

        renderer
            .render(GridView::new(&cells), CellCoord::new(3, HOME_ROW))
            .expect("write to vec");

        let text = String::from_utf8(renderer.into_inner()).expect("utf8");
        assert_eq!(text.matches("\x1b[0m").count(), 64);
    }

    #[test]
    fn palette_distinguishes_every_cell_type() {
        let cells = [
            Cell::Empty,
            Cell::PlayerBullet,
            Cell::EnemyBullet,
            Cell::Enemy(Tier::A),
            Cell::Enemy(Tier::B),
            Cell::Enemy(Tier::C),
            Cell::Enemy(Tier::D),
        ];

        for (index, first) in cells.iter().enumerate() {
            for second in &cells[index + 1..] {
                assert_ne!(cell_color(*first), cell_color(*second));
                assert_ne!(cell_glyph(*first), cell_glyph(*second));
            }
        }
        assert_ne!(cursor_color(), cell_color(Cell::PlayerBullet));
    }

    #[test]
    fn color_bytes_survive_conversion() {
        let color = Color::from_rgb_u8(0xc8, 0x2a, 0x36);
        assert_eq!(color.to_rgb_u8(), [0xc8, 0x2a, 0x36]);
        assert_eq!(Color::new(1.0, 0.0, 0.5, 1.0).lighten(1.0).to_rgb_u8(), [255; 3]);
    }
}
