use crate::canvas::{Canvas, BACKGROUND_COLOR, SEED_MARKER};
use crate::config::SimulationConfig;
use crate::error::DlaError;
use crate::grid::Grid;
use crate::walker::{WalkOutcome, Walker};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Seed count used by `SeedPlacement::Default`
pub const DEFAULT_SCATTER_COUNT: usize = 20;

/// Where the initial aggregate is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SeedPlacement {
    /// Horizontal line across the middle row
    #[default]
    Center,
    /// Horizontal line along the first interior row
    Top,
    /// Horizontal line along the last interior row
    Bottom,
    /// `n` seeds at independent random interior coordinates
    RandomScatter(usize),
    /// `RandomScatter(DEFAULT_SCATTER_COUNT)`
    Default,
}

impl SeedPlacement {
    pub fn name(&self) -> String {
        match self {
            SeedPlacement::Center => "Center".to_string(),
            SeedPlacement::Top => "Top".to_string(),
            SeedPlacement::Bottom => "Bottom".to_string(),
            SeedPlacement::RandomScatter(n) => format!("Random Scatter ({n})"),
            SeedPlacement::Default => format!("Default ({DEFAULT_SCATTER_COUNT} scattered)"),
        }
    }

    /// Parse a CLI token. Unknown tokens fall back to `Default`.
    pub fn from_token(s: &str) -> SeedPlacement {
        let lower = s.trim().to_lowercase();
        let (head, count) = match lower.split_once(':') {
            Some((head, n)) => (head, n.trim().parse::<usize>().ok()),
            None => (lower.as_str(), None),
        };
        match head {
            "center" | "centre" | "middle" => SeedPlacement::Center,
            "top" => SeedPlacement::Top,
            "bottom" => SeedPlacement::Bottom,
            "scatter" | "random" | "rand" => {
                SeedPlacement::RandomScatter(count.unwrap_or(DEFAULT_SCATTER_COUNT))
            }
            "default" => SeedPlacement::Default,
            _ => {
                warn!(token = s, "unrecognised seed placement, using default");
                SeedPlacement::Default
            }
        }
    }
}

/// Totals reported when a run finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub attempts: usize,
    pub attachments: usize,
    pub frames_written: usize,
    pub occupied: usize,
}

/// Builds `{base}.{index:04}.{ext}` frame paths inside one directory
#[derive(Debug, Clone)]
pub struct FrameNamer {
    dir: PathBuf,
    base_name: String,
    extension: String,
    next_index: usize,
}

impl FrameNamer {
    pub fn new(dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_name: base_name.into(),
            extension: "png".to_string(),
            next_index: 0,
        }
    }

    pub fn path_for(&self, index: usize) -> PathBuf {
        self.dir
            .join(format!("{}.{:04}.{}", self.base_name, index, self.extension))
    }

    /// Path for the next frame; the index only advances on `commit`
    pub fn peek(&self) -> PathBuf {
        self.path_for(self.next_index)
    }

    pub fn commit(&mut self) {
        self.next_index += 1;
    }

    pub fn frames_written(&self) -> usize {
        self.next_index
    }
}

/// Drives seed placement and walker releases over one grid/canvas pair
pub struct Simulation<C: Canvas> {
    grid: Grid,
    canvas: C,
    rng: StdRng,
    config: SimulationConfig,
    attachments: usize,
    /// Copies of each committed frame, kept when an animation is requested
    captured: Option<Vec<Vec<u8>>>,
}

impl<C: Canvas> Simulation<C> {
    /// Build the grid and canvas and place the configured seeds.
    /// `rng_seed` must already be resolved; see `SimulationConfig::resolve_rng_seed`.
    pub fn new(config: SimulationConfig, rng_seed: u64) -> Result<Self, DlaError> {
        config.validate()?;
        let grid = Grid::new(config.width, config.height)?;
        let mut canvas = C::new(config.width as u32, config.height as u32, BACKGROUND_COLOR);
        canvas.clear(BACKGROUND_COLOR);

        let mut sim = Self {
            grid,
            canvas,
            rng: StdRng::seed_from_u64(rng_seed),
            config,
            attachments: 0,
            captured: None,
        };
        sim.place_seeds(sim.config.seed_placement)?;
        Ok(sim)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn attachments(&self) -> usize {
        self.attachments
    }

    /// Retain a copy of every committed frame for later encoding
    pub fn capture_frames(&mut self) {
        self.captured.get_or_insert_with(Vec::new);
    }

    pub fn captured_frames(&self) -> &[Vec<u8>] {
        self.captured.as_deref().unwrap_or(&[])
    }

    /// Seed a single interior cell and mirror it on the canvas.
    /// Re-seeding a cell leaves its pixel alone.
    pub fn seed(&mut self, x: i32, y: i32) -> Result<(), DlaError> {
        self.grid.seed(x, y)?;
        if self.canvas.get_pixel(x as u32, y as u32) != Some(SEED_MARKER) {
            self.canvas.set_pixel(x as u32, y as u32, SEED_MARKER);
        }
        Ok(())
    }

    /// Place seeds according to `placement`
    pub fn place_seeds(&mut self, placement: SeedPlacement) -> Result<(), DlaError> {
        let x_max = self.grid.width() as i32 - 2;
        let y_max = self.grid.height() as i32 - 2;

        match placement {
            SeedPlacement::Center => self.seed_row(self.grid.height() as i32 / 2)?,
            SeedPlacement::Top => self.seed_row(1)?,
            SeedPlacement::Bottom => self.seed_row(y_max)?,
            SeedPlacement::RandomScatter(n) => self.seed_scatter(n, x_max, y_max)?,
            SeedPlacement::Default => self.seed_scatter(DEFAULT_SCATTER_COUNT, x_max, y_max)?,
        }

        info!(
            placement = %placement.name(),
            seeds = self.grid.occupied_count(),
            "placed seeds"
        );
        Ok(())
    }

    /// One seed per interior column
    fn seed_row(&mut self, y: i32) -> Result<(), DlaError> {
        for x in 1..=self.grid.width() as i32 - 2 {
            self.seed(x, y)?;
        }
        Ok(())
    }

    fn seed_scatter(&mut self, n: usize, x_max: i32, y_max: i32) -> Result<(), DlaError> {
        for _ in 0..n {
            let x = self.rng.gen_range(1..=x_max);
            let y = self.rng.gen_range(1..=y_max);
            self.seed(x, y)?;
        }
        Ok(())
    }

    /// Release one walker and run it to completion
    pub fn release_walker(&mut self) -> WalkOutcome {
        let outcome = Walker::walk(&mut self.rng, &mut self.grid, &mut self.canvas);
        if let WalkOutcome::Attached { .. } = outcome {
            self.attachments += 1;
        }
        outcome
    }

    /// Persist the canvas as the next frame
    fn commit_frame(&mut self, frames: &mut FrameNamer) -> Result<(), DlaError> {
        let path = frames.peek();
        self.canvas.save(&path)?;
        if let Some(captured) = self.captured.as_mut() {
            captured.push(self.canvas.to_rgba());
        }
        frames.commit();
        info!(path = %path.display(), attachments = self.attachments, "wrote frame");
        Ok(())
    }

    /// Release walkers until the attempt budget is spent, writing a frame
    /// every `frame_interval` attachments. Frame write failures abort the run.
    pub fn run(&mut self, output_dir: &Path, base_name: &str) -> Result<RunSummary, DlaError> {
        let mut frames = FrameNamer::new(output_dir, base_name);
        let interval = self.config.frame_interval.max(1);

        for _ in 0..self.config.max_attempts {
            if let WalkOutcome::Attached { .. } = self.release_walker() {
                if self.attachments % interval == 0 {
                    self.commit_frame(&mut frames)?;
                }
            }
        }

        let summary = RunSummary {
            attempts: self.config.max_attempts,
            attachments: self.attachments,
            frames_written: frames.frames_written(),
            occupied: self.grid.occupied_count(),
        };
        info!(
            attempts = summary.attempts,
            attachments = summary.attachments,
            frames = summary.frames_written,
            occupied = summary.occupied,
            "simulation finished"
        );
        Ok(summary)
    }
}
