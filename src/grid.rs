use crate::error::DlaError;

/// RGBA color stored per cell and per canvas pixel
pub type Rgba = [u8; 4];

/// Color recorded in the grid for seed cells
pub const SEED_COLOR: Rgba = [255, 255, 255, 0];

/// Largest side length a grid may have; keeps coordinates in range for
/// `i32` walkers, `u32` canvases and `u16` GIF frames
pub const MAX_DIMENSION: usize = u16::MAX as usize;

/// Palette an attaching particle draws its grid color from
pub const AGGREGATE_PALETTE: [Rgba; 3] = [[255, 0, 0, 0], [0, 255, 0, 0], [0, 0, 255, 0]];

/// How an occupied cell came to be part of the aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Seed,
    Aggregate,
}

/// Per-cell occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellState {
    #[default]
    Empty,
    Occupied { origin: Origin, color: Rgba },
}

impl CellState {
    pub fn is_occupied(&self) -> bool {
        matches!(self, CellState::Occupied { .. })
    }
}

/// Occupancy grid for a width x height domain.
///
/// The outer one-cell ring is never occupied: `seed` and `attach` reject it and
/// `is_occupied` always reports it empty, so neighbor scans may probe one cell
/// past any interior position without bounds checks of their own.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
    occupied: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Result<Self, DlaError> {
        if !(3..=MAX_DIMENSION).contains(&width) || !(3..=MAX_DIMENSION).contains(&height) {
            return Err(DlaError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![CellState::Empty; width * height],
            occupied: 0,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// True when (x, y) lies in `[1, width-2] x [1, height-2]`
    pub fn in_interior(&self, x: i32, y: i32) -> bool {
        x >= 1 && y >= 1 && (x as i64) <= self.width as i64 - 2 && (y as i64) <= self.height as i64 - 2
    }

    fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width + x as usize
    }

    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.in_interior(x, y) && self.cells[self.index(x, y)].is_occupied()
    }

    /// Cell state at (x, y); anything outside the interior reads as empty
    pub fn cell(&self, x: i32, y: i32) -> CellState {
        if self.in_interior(x, y) {
            self.cells[self.index(x, y)]
        } else {
            CellState::Empty
        }
    }

    /// Mark (x, y) as a seed. Re-seeding an occupied cell keeps the count unchanged.
    pub fn seed(&mut self, x: i32, y: i32) -> Result<(), DlaError> {
        if !self.in_interior(x, y) {
            return Err(DlaError::OutOfDomain { x, y });
        }
        let idx = self.index(x, y);
        if !self.cells[idx].is_occupied() {
            self.occupied += 1;
        }
        self.cells[idx] = CellState::Occupied {
            origin: Origin::Seed,
            color: SEED_COLOR,
        };
        Ok(())
    }

    /// Attach an aggregate particle at (x, y).
    ///
    /// The emptiness check and the write happen under one `&mut` borrow, so a
    /// cell can only ever be claimed once.
    pub fn attach(&mut self, x: i32, y: i32, color: Rgba) -> Result<(), DlaError> {
        if !self.in_interior(x, y) {
            return Err(DlaError::OutOfDomain { x, y });
        }
        let idx = self.index(x, y);
        if self.cells[idx].is_occupied() {
            return Err(DlaError::AlreadyOccupied { x, y });
        }
        self.cells[idx] = CellState::Occupied {
            origin: Origin::Aggregate,
            color,
        };
        self.occupied += 1;
        Ok(())
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied
    }

    /// Iterate over every occupied cell as (x, y, origin, color)
    #[cfg(test)]
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize, Origin, Rgba)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(idx, cell)| match *cell {
            CellState::Occupied { origin, color } => {
                Some((idx % self.width, idx / self.width, origin, color))
            }
            CellState::Empty => None,
        })
    }
}
