use crate::canvas::{GROWTH_MARKER, SEED_MARKER};
use crate::grid::{CellState, Grid, Origin, Rgba};
use crossterm::style::{Color, Stylize};
use std::io::{self, Write};

/// Braille character rendering for terminal previews of the grid.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Dot positions and their bit values:
/// ```text
/// (0,0)=0x01  (1,0)=0x08
/// (0,1)=0x02  (1,1)=0x10
/// (0,2)=0x04  (1,2)=0x20
/// (0,3)=0x40  (1,3)=0x80
/// ```
///
/// Unicode Braille patterns: U+2800 to U+28FF (256 patterns)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

/// A single rendered Braille cell with its color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrailleCell {
    pub char: char,
    pub color: Option<Color>,
}

fn to_color(rgba: Rgba) -> Color {
    Color::Rgb {
        r: rgba[0],
        g: rgba[1],
        b: rgba[2],
    }
}

/// Render the grid into rows of Braille characters, at most `max_columns` wide.
///
/// Large grids are downsampled so the whole domain fits. A character takes the
/// seed color if any of its dots is a seed, otherwise the growth color.
pub fn render_grid(grid: &Grid, max_columns: u16) -> Vec<Vec<BrailleCell>> {
    let needed_columns = grid.width().div_ceil(2);
    let columns = needed_columns.clamp(1, max_columns.max(1) as usize);

    // Same scale on both axes keeps the aggregate's aspect ratio
    let scale = grid.width() as f32 / (columns * 2) as f32;
    let scale = scale.max(1.0);
    let rows = ((grid.height() as f32 / scale) as usize).div_ceil(4).max(1);

    let mut out = Vec::with_capacity(rows);
    for cy in 0..rows {
        let mut line = Vec::with_capacity(columns);
        for cx in 0..columns {
            let mut pattern: u8 = 0;
            let mut has_seed = false;

            for dx in 0..2 {
                for dy in 0..4 {
                    let sim_x = ((cx * 2 + dx) as f32 * scale) as i32;
                    let sim_y = ((cy * 4 + dy) as f32 * scale) as i32;

                    if let CellState::Occupied { origin, .. } = grid.cell(sim_x, sim_y) {
                        pattern |= BRAILLE_DOTS[dx][dy];
                        has_seed |= origin == Origin::Seed;
                    }
                }
            }

            let color = match (pattern, has_seed) {
                (0, _) => None,
                (_, true) => Some(to_color(SEED_MARKER)),
                (_, false) => Some(to_color(GROWTH_MARKER)),
            };
            line.push(BrailleCell {
                char: char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' '),
                color,
            });
        }
        out.push(line);
    }
    out
}

/// Print a Braille preview of the grid sized to the current terminal
pub fn print_preview(grid: &Grid) -> io::Result<()> {
    let columns = crossterm::terminal::size().map(|(w, _)| w).unwrap_or(80);
    write_preview(&mut io::stdout().lock(), grid, columns)
}

pub fn write_preview<W: Write>(out: &mut W, grid: &Grid, columns: u16) -> io::Result<()> {
    for line in render_grid(grid, columns) {
        for cell in line {
            match cell.color {
                Some(color) => write!(out, "{}", cell.char.with(color))?,
                None => write!(out, " ")?,
            }
        }
        writeln!(out)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_braille_pattern() {
        // Test that single dot patterns work correctly
        assert_eq!(BRAILLE_DOTS[0][0], 0x01); // Top-left
        assert_eq!(BRAILLE_DOTS[1][0], 0x08); // Top-right
        assert_eq!(BRAILLE_DOTS[0][3], 0x40); // Bottom-left
        assert_eq!(BRAILLE_DOTS[1][3], 0x80); // Bottom-right

        // All dots should give 0xFF
        let all_dots: u8 = BRAILLE_DOTS[0].iter().sum::<u8>() + BRAILLE_DOTS[1].iter().sum::<u8>();
        assert_eq!(all_dots, 0xFF);
    }

    #[test]
    fn test_empty_grid_renders_blank() {
        let grid = Grid::new(10, 8).unwrap();
        let rows = render_grid(&grid, 80);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.len() == 5));
        assert!(rows.iter().flatten().all(|c| c.char == '\u{2800}' && c.color.is_none()));
    }

    #[test]
    fn test_seed_and_growth_dots() {
        let mut grid = Grid::new(10, 8).unwrap();
        grid.seed(1, 1).unwrap();
        grid.attach(4, 5, [255, 0, 0, 0]).unwrap();
        let rows = render_grid(&grid, 80);

        // (1, 1): character (0, 0), right column, second row
        assert_eq!(rows[0][0].char, char::from_u32(BRAILLE_BASE + 0x10).unwrap());
        assert_eq!(rows[0][0].color, Some(to_color(SEED_MARKER)));

        // (4, 5): character (2, 1), left column, second row
        assert_eq!(rows[1][2].char, char::from_u32(BRAILLE_BASE + 0x02).unwrap());
        assert_eq!(rows[1][2].color, Some(to_color(GROWTH_MARKER)));
    }

    #[test]
    fn test_wide_grid_is_downsampled() {
        let grid = Grid::new(400, 200).unwrap();
        let rows = render_grid(&grid, 50);
        assert!(rows.iter().all(|r| r.len() == 50));
        assert_eq!(rows.len(), 13);
    }

    #[test]
    fn test_preview_writes_one_line_per_row() {
        let mut grid = Grid::new(12, 12).unwrap();
        grid.seed(6, 6).unwrap();
        let mut buf = Vec::new();
        write_preview(&mut buf, &grid, 80).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 3);
    }
}
