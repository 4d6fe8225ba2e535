use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use robomaze_core::config::AppConfig;
use robomaze_core::init_logging;
use robomaze_lib::app;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

/// Overrides for the maze section of the configuration.
#[derive(clap::Args, Debug, Clone)]
struct MazeArgs {
    /// Columns
    #[arg(long)]
    width: Option<usize>,
    /// Rows
    #[arg(long)]
    height: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a maze and print it or save its snapshot
    Generate {
        #[command(flatten)]
        maze: MazeArgs,
        /// Snapshot file (`.gz` for compressed)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Run each engine once on the same maze and print a JSON report
    Compare {
        #[command(flatten)]
        maze: MazeArgs,
    },
    /// Run the simulation and print the final per-agent report
    Run {
        #[command(flatten)]
        maze: MazeArgs,
        /// Tick limit
        #[arg(short, long, default_value_t = 1000)]
        ticks: u64,
        /// Pace ticks with the configured interval
        #[arg(long)]
        realtime: bool,
        /// Start from a saved snapshot instead of generating
        #[arg(long)]
        load: Option<PathBuf>,
    },
}

fn load_config(path: &Path, overrides: &MazeArgs) -> Result<AppConfig> {
    let mut config = if path.exists() {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        AppConfig::from_toml(&text).with_context(|| format!("parsing {}", path.display()))?
    } else {
        AppConfig::default()
    };
    if let Some(width) = overrides.width {
        config.maze.width = width;
    }
    if let Some(height) = overrides.height {
        config.maze.height = height;
    }
    if let Some(seed) = overrides.seed {
        config.maze.seed = seed;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    match args.command {
        Command::Generate { maze, out } => {
            let config = load_config(&args.config, &maze)?;
            let prepared = app::prepare_maze(&config)?;
            match out {
                Some(path) => {
                    robomaze_io::save_maze(&prepared.maze, &path)?;
                    println!("Saved maze (seed {}) to {}", prepared.seed, path.display());
                }
                None => print!("{}", prepared.maze.grid().render()),
            }
        }
        Command::Compare { maze } => {
            let config = load_config(&args.config, &maze)?;
            let prepared = app::prepare_maze(&config)?;
            let report = app::compare(&prepared.maze, &config, prepared.seed);
            println!("{}", robomaze_io::to_json_pretty(&report)?);
        }
        Command::Run {
            maze,
            ticks,
            realtime,
            load,
        } => {
            let config = load_config(&args.config, &maze)?;
            let maze = match load {
                Some(path) => robomaze_io::load_maze(&path)?,
                None => app::prepare_maze(&config)?.maze,
            };
            let report = if realtime {
                app::run_realtime(config, maze, ticks).await?
            } else {
                app::run_headless(config, maze, ticks)?
            };
            println!("{}", robomaze_io::to_json_pretty(&report)?);
        }
    }

    Ok(())
}
