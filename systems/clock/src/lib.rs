#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-tick simulation loop that sequences input, spawning and the world step.

use std::collections::VecDeque;

use log::trace;
use serde::{Deserialize, Serialize};
use waypoint_defence_core::{
    CellCoord, Command, ConfigError, Difficulty, EnemySnapshot, Event, GameState, GameStats,
    Layout, Rules, TowerSnapshot, Walkability,
};
use waypoint_defence_system_spawning::{Config, WaveSpawner};
use waypoint_defence_world::{self as world, query, World};

/// Owns the world and the wave spawner and advances both one tick at a time.
///
/// Every call to [`SimulationClock::tick`] runs the same sequence: queued
/// input commands are applied, the spawner reacts to the resulting events
/// and may request an enemy, and finally the world moves enemies, fires
/// towers, resolves kills and passes, and evaluates the win and lose rules.
#[derive(Debug)]
pub struct SimulationClock {
    world: World,
    spawner: WaveSpawner,
    pending: VecDeque<Command>,
    events: Vec<Event>,
}

impl SimulationClock {
    /// Creates a clock around a world built from the default rules and layout.
    #[must_use]
    pub fn new() -> Self {
        Self::from_world(World::new())
    }

    /// Creates a clock around a world built from validated rules and layout.
    pub fn with_config(rules: Rules, layout: Layout) -> Result<Self, ConfigError> {
        World::with_config(rules, layout).map(Self::from_world)
    }

    fn from_world(world: World) -> Self {
        let spawner = WaveSpawner::new(Config::from_rules(
            query::wave_config(&world),
            query::rules(&world),
        ));
        Self {
            world,
            spawner,
            pending: VecDeque::new(),
            events: Vec::new(),
        }
    }

    /// Queues an input command that is applied at the start of the next tick.
    pub fn submit(&mut self, command: Command) {
        self.pending.push_back(command);
    }

    /// Runs one tick and returns every event it produced.
    pub fn tick(&mut self) -> &[Event] {
        self.events.clear();

        while let Some(command) = self.pending.pop_front() {
            world::apply(&mut self.world, command, &mut self.events);
        }

        let mut commands = Vec::new();
        self.spawner.handle(
            &self.events,
            query::game_state(&self.world),
            query::grid_view(&self.world),
            query::start(&self.world),
            query::goal(&self.world),
            &mut commands,
        );
        for command in commands {
            world::apply(&mut self.world, command, &mut self.events);
        }

        world::apply(&mut self.world, Command::Tick, &mut self.events);
        trace!(
            "tick {} produced {} events",
            query::tick_index(&self.world),
            self.events.len()
        );
        &self.events
    }

    /// Provides read-only access to the simulated world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Provides read-only access to the wave spawner.
    #[must_use]
    pub fn spawner(&self) -> &WaveSpawner {
        &self.spawner
    }

    /// Captures everything a renderer needs to draw the current tick.
    #[must_use]
    pub fn frame(&self) -> Frame {
        let grid = query::grid(&self.world);
        Frame {
            tick: query::tick_index(&self.world),
            state: query::game_state(&self.world),
            difficulty: query::difficulty(&self.world),
            gold: query::gold(&self.world),
            stats: query::stats(&self.world),
            columns: grid.columns(),
            rows: grid.rows(),
            start: grid.start(),
            goal: grid.goal(),
            cells: grid.view().iter().collect(),
            enemies: query::enemy_view(&self.world).into_vec(),
            towers: query::tower_view(&self.world).into_vec(),
        }
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-tick output consumed by renderers and headless reporters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Ticks simulated since the run started.
    pub tick: u64,
    /// Current state of the game state machine.
    pub state: GameState,
    /// Difficulty of the current or next run.
    pub difficulty: Difficulty,
    /// Gold balance.
    pub gold: u32,
    /// Kill, pass and spawn counters.
    pub stats: GameStats,
    /// Number of grid columns.
    pub columns: u32,
    /// Number of grid rows.
    pub rows: u32,
    /// Cell where enemies enter.
    pub start: CellCoord,
    /// Cell enemies try to reach.
    pub goal: CellCoord,
    /// Row-major walkability of every cell.
    pub cells: Vec<Walkability>,
    /// Live enemies ordered by identifier.
    pub enemies: Vec<EnemySnapshot>,
    /// Placed towers ordered by identifier.
    pub towers: Vec<TowerSnapshot>,
}

impl Frame {
    /// Walkability of the cell, if it lies inside the grid.
    #[must_use]
    pub fn walkability(&self, cell: CellCoord) -> Option<Walkability> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        self.cells.get(row * width + column).copied()
    }
}
