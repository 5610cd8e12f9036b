#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line host that runs the snake autopilot to completion.

use std::{fs, path::PathBuf, thread, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::{debug, info};
use snake_autopilot_core::{Heading, RunConfig, RunStatus};
use snake_autopilot_runtime::Session;

/// Command-line arguments accepted by the autopilot host.
#[derive(Debug, Parser)]
#[command(name = "snake-autopilot")]
#[command(version, about = "Self-playing snake driven by a time-aware pathfinder")]
struct Cli {
    /// TOML file providing the run configuration
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of grid columns
    #[arg(long)]
    columns: Option<u32>,

    /// Number of grid rows
    #[arg(long)]
    rows: Option<u32>,

    /// Initial snake length
    #[arg(long)]
    length: Option<u32>,

    /// Initial heading
    #[arg(long, value_enum)]
    heading: Option<HeadingArg>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Delay between ticks in milliseconds
    #[arg(long, default_value_t = 30)]
    tick_ms: u64,

    /// Stop after this many ticks (0 runs until the game is over)
    #[arg(long, default_value_t = 0)]
    max_ticks: u64,

    /// Pause after the game is over, in milliseconds
    #[arg(long, default_value_t = 0)]
    exit_delay_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum HeadingArg {
    North,
    South,
    East,
    West,
}

impl From<HeadingArg> for Heading {
    fn from(value: HeadingArg) -> Self {
        match value {
            HeadingArg::North => Heading::North,
            HeadingArg::South => Heading::South,
            HeadingArg::East => Heading::East,
            HeadingArg::West => Heading::West,
        }
    }
}

impl Cli {
    /// Layers the flags over the TOML file, which is layered over defaults.
    fn run_config(&self) -> Result<RunConfig> {
        let mut config: RunConfig = match &self.config {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("failed reading config {}", path.display()))?;
                toml::from_str(&contents)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => RunConfig::default(),
        };

        if let Some(columns) = self.columns {
            config.columns = columns;
        }
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(length) = self.length {
            config.initial_length = length;
        }
        if let Some(heading) = self.heading {
            config.initial_heading = heading.into();
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }

        Ok(config)
    }
}

/// Entry point for the snake autopilot command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.run_config()?;
    let mut session = Session::new(config).context("rejected run configuration")?;
    let tick_delay = Duration::from_millis(cli.tick_ms);

    while session.status() == RunStatus::Running {
        if cli.max_ticks != 0 && session.stats().ticks >= cli.max_ticks {
            info!("stopping after {} ticks", cli.max_ticks);
            break;
        }

        let _ = session.tick();
        debug!("{:?}", session.render_state());
        if !tick_delay.is_zero() {
            thread::sleep(tick_delay);
        }
    }

    if session.status() == RunStatus::GameOver && cli.exit_delay_ms > 0 {
        thread::sleep(Duration::from_millis(cli.exit_delay_ms));
    }

    let stats = session.stats();
    let outcome = stats
        .end_reason
        .map_or_else(|| "stopped".to_owned(), |reason| reason.to_string());
    println!(
        "{outcome}: {} ticks, {} meals, snake length {}, {} searches, {} cells planned, {} states expanded",
        stats.ticks,
        stats.meals,
        session.body().len(),
        stats.searches,
        stats.total_path_length,
        stats.total_expansions,
    );

    Ok(())
}
