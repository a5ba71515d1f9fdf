#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a scripted Waypoint Defence run headlessly.

mod run;
mod scenario;

use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use waypoint_defence_core::{CellCoord, Difficulty};

use crate::run::{RunPlan, Summary};

/// Plays one run with the given difficulty, towers and obstacles and reports the outcome.
#[derive(Parser, Debug)]
#[command(name = "waypoint-defence")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Difficulty preset of the run
    #[arg(short, long, value_enum, default_value_t = DifficultyArg::Medium)]
    difficulty: DifficultyArg,

    /// TOML file with [rules], [layout] and [wave] overrides
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Tower to place when the run starts, as COL,ROW (repeatable)
    #[arg(long = "tower", value_parser = parse_cell)]
    towers: Vec<CellCoord>,

    /// Cell whose obstacle is toggled when the run starts, as COL,ROW (repeatable)
    #[arg(long = "obstacle", value_parser = parse_cell)]
    obstacles: Vec<CellCoord>,

    /// Stop after this many ticks if the run has not ended
    #[arg(long, default_value_t = 36_000)]
    max_ticks: u64,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

/// Difficulty names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DifficultyArg {
    /// Generous gold and slow waves.
    Easy,
    /// Balanced preset.
    Medium,
    /// Scarce gold and fast waves.
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Easy => Self::Easy,
            DifficultyArg::Medium => Self::Medium,
            DifficultyArg::Hard => Self::Hard,
        }
    }
}

fn parse_cell(value: &str) -> Result<CellCoord, String> {
    let (column, row) = value
        .split_once(',')
        .ok_or_else(|| format!("expected COL,ROW but got `{value}`"))?;
    let column = column
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("invalid column `{column}`: {error}"))?;
    let row = row
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("invalid row `{row}`: {error}"))?;
    Ok(CellCoord::new(column, row))
}

/// Entry point for the Waypoint Defence command-line interface.
fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match execute(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

fn execute(args: Args) -> Result<()> {
    let scenario = match &args.scenario {
        Some(path) => scenario::load(path)?,
        None => scenario::Scenario::default(),
    };
    let plan = RunPlan {
        difficulty: args.difficulty.into(),
        wave: scenario.wave_config()?,
        towers: args.towers,
        obstacles: args.obstacles,
        max_ticks: args.max_ticks,
    };

    let summary = run::play(scenario.rules, scenario.layout, &plan)?;
    print_summary(&summary, args.json)
}

fn print_summary(summary: &Summary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!(
        "{} run ended in {:?} after {} ticks",
        summary.difficulty, summary.outcome, summary.ticks
    );
    println!(
        "kills {}, passes {}, spawned {}, skipped spawns {}",
        summary.kills, summary.passes, summary.spawned, summary.skipped_spawns
    );
    println!(
        "gold {}, towers {}, rejected commands {}",
        summary.gold, summary.towers, summary.rejected_commands
    );
    Ok(())
}
