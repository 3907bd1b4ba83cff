use crate::canvas::{Canvas, GROWTH_MARKER};
use crate::error::DlaError;
use crate::grid::{Grid, AGGREGATE_PALETTE};
use rand::Rng;
use tracing::{debug, trace};

/// 3x3 neighborhood in row-major order, the walker's own cell included
const SCAN_OFFSETS: [(i32, i32); 9] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0),  (0, 0),  (1, 0),
    (-1, 1),  (0, 1),  (1, 1),
];

/// How a walk ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    /// Left the interior, or found its own cell already claimed
    NoAttachment,
    /// Became part of the aggregate at (x, y)
    Attached { x: i32, y: i32 },
}

/// A particle on a random walk over the interior domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walker {
    pub x: i32,
    pub y: i32,
}

impl Walker {
    #[cfg(test)]
    pub fn at(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Place a walker uniformly at random inside the interior domain
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, grid: &Grid) -> Self {
        let x = rng.gen_range(1..=grid.width() as i32 - 2);
        let y = rng.gen_range(1..=grid.height() as i32 - 2);
        Self { x, y }
    }

    /// One 8-connected move; each axis independently picks -1, 0 or 1
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let dx = rng.gen_range(-1..=1);
        let dy = rng.gen_range(-1..=1);
        self.advance(dx, dy);
    }

    pub fn advance(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    /// First occupied cell of the 3x3 neighborhood in scan order
    fn first_occupied_neighbor(&self, grid: &Grid) -> Option<(i32, i32)> {
        SCAN_OFFSETS
            .iter()
            .map(|&(dx, dy)| (self.x + dx, self.y + dy))
            .find(|&(nx, ny)| grid.is_occupied(nx, ny))
    }

    /// Termination check after a step.
    ///
    /// Returns `None` while the walk should continue. On contact the walker's own
    /// cell is attached with a palette color and mirrored on the canvas.
    pub fn settle<R, C>(&self, rng: &mut R, grid: &mut Grid, canvas: &mut C) -> Option<WalkOutcome>
    where
        R: Rng + ?Sized,
        C: Canvas + ?Sized,
    {
        if !grid.in_interior(self.x, self.y) {
            trace!(x = self.x, y = self.y, "walker left the interior");
            return Some(WalkOutcome::NoAttachment);
        }

        let (nx, ny) = self.first_occupied_neighbor(grid)?;

        let color = AGGREGATE_PALETTE[rng.gen_range(0..AGGREGATE_PALETTE.len())];
        match grid.attach(self.x, self.y, color) {
            Ok(()) => {
                canvas.set_pixel(self.x as u32, self.y as u32, GROWTH_MARKER);
                debug!(x = self.x, y = self.y, touched_x = nx, touched_y = ny, "walker attached");
                Some(WalkOutcome::Attached { x: self.x, y: self.y })
            }
            Err(DlaError::AlreadyOccupied { x, y }) => {
                debug!(x, y, "walker landed on an occupied cell, discarded");
                Some(WalkOutcome::NoAttachment)
            }
            Err(err) => unreachable!("attach inside the interior failed: {err}"),
        }
    }

    /// Spawn a walker and run it until it leaves the interior or attaches
    pub fn walk<R, C>(rng: &mut R, grid: &mut Grid, canvas: &mut C) -> WalkOutcome
    where
        R: Rng + ?Sized,
        C: Canvas + ?Sized,
    {
        let mut walker = Self::spawn(rng, grid);
        loop {
            walker.step(rng);
            if let Some(outcome) = walker.settle(rng, grid, canvas) {
                return outcome;
            }
        }
    }
}
