//! Headless driver that plays a scripted run on the simulation clock.

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use waypoint_defence_core::{
    CellCoord, Command, Difficulty, Event, GameState, Layout, Rules, WaveConfig,
};
use waypoint_defence_system_clock::SimulationClock;

/// Inputs submitted before the first tick of the run.
#[derive(Clone, Debug)]
pub(crate) struct RunPlan {
    pub(crate) difficulty: Difficulty,
    pub(crate) wave: Option<WaveConfig>,
    pub(crate) towers: Vec<CellCoord>,
    pub(crate) obstacles: Vec<CellCoord>,
    pub(crate) max_ticks: u64,
}

/// Outcome of a headless run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct Summary {
    pub(crate) difficulty: Difficulty,
    pub(crate) outcome: GameState,
    pub(crate) ticks: u64,
    pub(crate) gold: u32,
    pub(crate) kills: u32,
    pub(crate) passes: u32,
    pub(crate) spawned: u32,
    pub(crate) towers: usize,
    pub(crate) skipped_spawns: u32,
    pub(crate) rejected_commands: u32,
}

/// Starts a run, applies the planned edits, and ticks until it ends or the
/// tick budget runs out.
pub(crate) fn play(rules: Rules, layout: Layout, plan: &RunPlan) -> Result<Summary> {
    let mut clock =
        SimulationClock::with_config(rules, layout).context("invalid rules or layout")?;

    clock.submit(Command::SelectDifficulty {
        difficulty: plan.difficulty,
    });
    if let Some(config) = plan.wave {
        clock.submit(Command::ConfigureWave { config });
    }
    clock.submit(Command::StartRun);
    for &cell in &plan.obstacles {
        clock.submit(Command::ToggleObstacle { cell });
    }
    for &cell in &plan.towers {
        clock.submit(Command::PlaceTower { cell });
    }

    let mut rejected_commands = 0_u32;
    for _ in 0..plan.max_ticks {
        let rejected = clock
            .tick()
            .iter()
            .filter(|event| is_rejection(event))
            .count();
        rejected_commands =
            rejected_commands.saturating_add(u32::try_from(rejected).unwrap_or(u32::MAX));
        if clock.frame().state.is_terminal() {
            break;
        }
    }

    let frame = clock.frame();
    info!("run finished in {:?} at tick {}", frame.state, frame.tick);
    Ok(Summary {
        difficulty: frame.difficulty,
        outcome: frame.state,
        ticks: frame.tick,
        gold: frame.gold,
        kills: frame.stats.kill_count,
        passes: frame.stats.pass_count,
        spawned: frame.stats.total_spawned,
        towers: frame.towers.len(),
        skipped_spawns: clock.spawner().skipped_spawns(),
        rejected_commands,
    })
}

fn is_rejection(event: &Event) -> bool {
    matches!(
        event,
        Event::DifficultySelectionRejected { .. }
            | Event::RunStartRejected { .. }
            | Event::TowerPlacementRejected { .. }
            | Event::ObstacleToggleRejected { .. }
            | Event::EnemySpawnRejected { .. }
    )
}
