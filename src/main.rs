mod animation;
mod braille;
mod canvas;
mod config;
mod error;
mod grid;
mod simulation;
mod walker;

use canvas::{Canvas, ImageCanvas};
use clap::Parser;
use config::AppConfig;
use simulation::{SeedPlacement, Simulation};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dla-frames")]
#[command(about = "Diffusion-Limited Aggregation on a bounded grid, saved as image frames")]
struct Args {
    // === Output ===
    /// Output directory (created if missing, defaults to current)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Base name for frame files ({name}.{frame:04}.png)
    #[arg(short = 'n', long)]
    name: Option<String>,

    // === Grid ===
    /// Width of the simulation grid (at least 3)
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the simulation grid (at least 3)
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Seed placement (center, top, bottom, scatter[:N], default)
    #[arg(short = 's', long)]
    seed: Option<String>,

    // === Run ===
    /// Number of walkers to release
    #[arg(short = 'a', long)]
    attempts: Option<usize>,

    /// Write a frame every K attachments
    #[arg(short = 'k', long = "frame-every")]
    frame_every: Option<usize>,

    /// Fixed RNG seed for reproducible runs
    #[arg(long = "rng-seed")]
    rng_seed: Option<u64>,

    // === Config ===
    /// Load settings from a JSON config file instead of the user config
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Write the resolved settings to a JSON config file
    #[arg(long = "export-config")]
    export_config: Option<PathBuf>,

    // === Extras ===
    /// Also assemble the frames into an animated GIF at this path
    #[arg(long)]
    gif: Option<PathBuf>,

    /// Print a Braille preview of the final aggregate
    #[arg(long, default_value = "false")]
    preview: bool,

    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Layer CLI flags over the loaded config
fn apply_args(mut config: AppConfig, args: &Args) -> AppConfig {
    if let Some(output) = &args.output {
        config.output_dir = output.clone();
    }
    if let Some(name) = &args.name {
        config.base_name = name.clone();
    }

    let sim = &mut config.simulation;
    if let Some(width) = args.width {
        sim.width = width;
    }
    if let Some(height) = args.height {
        sim.height = height;
    }
    if let Some(token) = &args.seed {
        sim.seed_placement = SeedPlacement::from_token(token);
    }
    if let Some(attempts) = args.attempts {
        sim.max_attempts = attempts;
    }
    if let Some(every) = args.frame_every {
        sim.frame_interval = every;
    }
    if args.rng_seed.is_some() {
        sim.rng_seed = args.rng_seed;
    }
    sim.frame_interval = sim.frame_interval.max(1);

    config
}

/// Fix the RNG seed in the config so an exported config replays this run
fn pin_rng_seed(config: &mut AppConfig) -> u64 {
    let seed = config.simulation.resolve_rng_seed();
    config.simulation.rng_seed = Some(seed);
    seed
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let base = match &args.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load_user_or_default()?,
    };
    let mut config = apply_args(base, &args);
    config.simulation.validate()?;
    let rng_seed = pin_rng_seed(&mut config);

    if let Some(path) = &args.export_config {
        config.save_to_file(path)?;
        info!(path = %path.display(), "exported config");
    }

    fs::create_dir_all(&config.output_dir)?;

    info!(
        width = config.simulation.width,
        height = config.simulation.height,
        rng_seed,
        "starting simulation"
    );

    let mut sim = Simulation::<ImageCanvas>::new(config.simulation.clone(), rng_seed)?;
    if args.gif.is_some() {
        sim.capture_frames();
    }

    sim.run(&config.output_dir, &config.base_name)?;

    if let Some(path) = &args.gif {
        let (width, height) = sim.canvas().dimensions();
        animation::save_gif(path, width, height, sim.captured_frames())?;
    }

    if args.preview {
        braille::print_preview(sim.grid())?;
    }

    info!(attachments = sim.attachments(), "done");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("dla-frames").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_overrides_config() {
        let args = parse(&[
            "-o", "out", "-n", "coral", "-W", "64", "-H", "32", "-s", "top", "-a", "500", "-k",
            "5", "--rng-seed", "9",
        ]);
        let config = apply_args(AppConfig::default(), &args);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.base_name, "coral");
        assert_eq!(config.simulation.width, 64);
        assert_eq!(config.simulation.height, 32);
        assert_eq!(config.simulation.seed_placement, SeedPlacement::Top);
        assert_eq!(config.simulation.max_attempts, 500);
        assert_eq!(config.simulation.frame_interval, 5);
        assert_eq!(config.simulation.rng_seed, Some(9));
    }

    #[test]
    fn test_unset_flags_keep_config_values() {
        let mut base = AppConfig::default();
        base.simulation.width = 120;
        base.simulation.rng_seed = Some(3);
        base.base_name = "from-file".to_string();

        let config = apply_args(base.clone(), &parse(&[]));
        assert_eq!(config, base);
    }

    #[test]
    fn test_unknown_placement_and_zero_interval() {
        let config = apply_args(AppConfig::default(), &parse(&["-s", "diagonal", "-k", "0"]));
        assert_eq!(config.simulation.seed_placement, SeedPlacement::Default);
        assert_eq!(config.simulation.frame_interval, 1);
    }

    #[test]
    fn test_exported_config_carries_resolved_seed() {
        let mut config = apply_args(AppConfig::default(), &parse(&[]));
        assert_eq!(config.simulation.rng_seed, None);

        let seed = pin_rng_seed(&mut config);
        assert_eq!(config.simulation.rng_seed, Some(seed));

        let file = tempfile::NamedTempFile::new().unwrap();
        config.save_to_file(file.path()).unwrap();
        let loaded = AppConfig::load_from_file(file.path()).unwrap();
        assert_eq!(loaded.simulation.rng_seed, Some(seed));

        // An already fixed seed is kept
        let mut fixed = apply_args(AppConfig::default(), &parse(&["--rng-seed", "42"]));
        assert_eq!(pin_rng_seed(&mut fixed), 42);
    }

    #[test]
    fn test_verbosity_counts() {
        assert_eq!(parse(&["-vv"]).verbose, 2);
        assert!(parse(&["--preview"]).preview);
    }
}
