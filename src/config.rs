use crate::error::DlaError;
use crate::grid::MAX_DIMENSION;
use crate::simulation::SeedPlacement;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Parameters of a single simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub width: usize,
    pub height: usize,
    pub seed_placement: SeedPlacement,
    /// Walkers released before the run stops
    pub max_attempts: usize,
    /// Attachments between committed frames
    pub frame_interval: usize,
    /// Fixed RNG seed; drawn from entropy when absent
    pub rng_seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            seed_placement: SeedPlacement::Center,
            max_attempts: 100,
            frame_interval: 10,
            rng_seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), DlaError> {
        let valid = |side: usize| (3..=MAX_DIMENSION).contains(&side);
        if !valid(self.width) || !valid(self.height) {
            return Err(DlaError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// The configured seed, or a fresh one from the OS
    pub fn resolve_rng_seed(&self) -> u64 {
        self.rng_seed.unwrap_or_else(rand::random)
    }
}

/// Complete application configuration for export/import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Version field for future compatibility
    pub version: u32,
    pub simulation: SimulationConfig,
    /// Directory frames are written to
    pub output_dir: PathBuf,
    /// Frame files are named `{base_name}.{index:04}.png`
    pub base_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            simulation: SimulationConfig::default(),
            output_dir: PathBuf::from("./"),
            base_name: "dla".to_string(),
        }
    }
}

impl AppConfig {
    /// Export config to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), DlaError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Import config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, DlaError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Per-user config file, e.g. `~/.config/dla-frames/config.json`
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dla-frames").join("config.json"))
    }

    /// Load the user config if one exists, otherwise the defaults
    pub fn load_user_or_default() -> Result<Self, DlaError> {
        match Self::user_config_path() {
            Some(path) if path.is_file() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }
}
