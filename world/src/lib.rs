#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Waypoint Defence.
//!
//! The [`World`] owns the grid, the gold balance, every live enemy and tower,
//! and the game state machine. It is only mutated through [`apply`], which
//! reports the outcome of every command as [`Event`] values.

mod economy;
mod enemies;
mod grid;
mod state;
mod towers;

use log::{debug, info};
use waypoint_defence_core::{
    CellCoord, Command, ConfigError, EnemyId, Event, GameState, Layout, ObstacleError, Path,
    PlacementError, Rules, SpawnError, TowerId, Walkability,
};

pub use grid::GridMap;

use economy::Economy;
use enemies::Enemy;
use state::GameStateMachine;
use towers::TowerRegistry;

/// Represents the authoritative Waypoint Defence world state.
#[derive(Debug)]
pub struct World {
    rules: Rules,
    layout: Layout,
    grid: GridMap,
    economy: Economy,
    enemies: Vec<Enemy>,
    towers: TowerRegistry,
    machine: GameStateMachine,
    next_enemy_id: u32,
    tick_index: u64,
}

impl World {
    /// Creates a world in the menu using the default rules and layout.
    #[must_use]
    pub fn new() -> Self {
        Self::build(Rules::default(), Layout::default())
    }

    /// Creates a world in the menu after validating the provided rules and layout.
    pub fn with_config(rules: Rules, layout: Layout) -> Result<Self, ConfigError> {
        rules.validate()?;
        layout.validate()?;
        Ok(Self::build(rules, layout))
    }

    fn build(rules: Rules, layout: Layout) -> Self {
        let machine = GameStateMachine::new();
        Self {
            grid: GridMap::from_layout(&layout),
            economy: Economy::new(machine.config().starting_gold()),
            enemies: Vec::new(),
            towers: TowerRegistry::new(),
            machine,
            next_enemy_id: 0,
            tick_index: 0,
            rules,
            layout,
        }
    }

    /// Restores obstacles, entities and gold to the start-of-run state.
    fn reset_run(&mut self) {
        self.grid.reset(&self.layout);
        self.enemies.clear();
        self.towers.clear();
        self.economy = Economy::new(self.machine.config().starting_gold());
        self.next_enemy_id = 0;
        self.tick_index = 0;
    }

    fn is_playing(&self) -> bool {
        self.machine.state() == GameState::Playing
    }

    fn place_tower(&mut self, cell: CellCoord) -> Result<TowerId, PlacementError> {
        if !self.is_playing() {
            return Err(PlacementError::InvalidState);
        }
        let walkability = self
            .grid
            .walkability(cell)
            .ok_or(PlacementError::OutOfBounds)?;
        if self.grid.is_reserved(cell) {
            return Err(PlacementError::Reserved);
        }
        if walkability == Walkability::Blocked {
            return Err(PlacementError::Blocked);
        }
        if self.towers.is_occupied(cell) {
            return Err(PlacementError::Occupied);
        }
        if let Err(shortfall) = self.economy.spend(self.rules.tower_cost) {
            debug!("tower at {cell} rejected: {shortfall}");
            return Err(PlacementError::InsufficientGold);
        }
        Ok(self.towers.insert(cell, &self.rules))
    }

    fn toggle_obstacle(&mut self, cell: CellCoord) -> Result<Walkability, ObstacleError> {
        if !self.is_playing() {
            return Err(ObstacleError::InvalidState);
        }
        let cost = self.rules.obstacle_cost;
        let towers = &self.towers;
        let economy = &mut self.economy;
        self.grid.toggle_obstacle(
            cell,
            |candidate| towers.is_occupied(candidate),
            |next| match next {
                Walkability::Blocked => economy.spend(cost).map_err(|shortfall| {
                    debug!("obstacle at {cell} rejected: {shortfall}");
                    ObstacleError::InsufficientGold
                }),
                Walkability::Walkable => {
                    economy.earn(cost);
                    Ok(())
                }
            },
        )
    }

    fn spawn_enemy(&mut self, path: Path) -> Result<EnemyId, SpawnError> {
        if !self.is_playing() {
            return Err(SpawnError::InvalidState);
        }
        let connects = path.first() == self.grid.start() && path.last() == self.grid.goal();
        let walkable = path.cells().iter().all(|&cell| self.grid.is_walkable(cell));
        if !connects || !walkable || !path.is_contiguous() {
            return Err(SpawnError::InvalidPath);
        }

        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.saturating_add(1);
        self.enemies.push(Enemy::spawn(
            id,
            path,
            self.rules.enemy_speed_cells_per_tick,
            self.rules.enemy_health,
        ));
        self.machine.record_spawn();
        Ok(id)
    }

    fn advance_tick(&mut self, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });

        for enemy in &mut self.enemies {
            enemy.advance(1);
        }

        for tower in self.towers.iter_mut() {
            tower.update(1);
            if let Some(enemy) = tower.try_fire(&mut self.enemies) {
                out_events.push(Event::TowerFired {
                    tower: tower.id(),
                    enemy,
                    damage: tower.damage(),
                });
            }
        }

        self.resolve_removals(out_events);

        if let Some((from, to)) = self.machine.evaluate() {
            info!(
                "run ended in {to:?} after {} ticks with stats {:?}",
                self.tick_index,
                self.machine.stats()
            );
            out_events.push(Event::GameStateChanged { from, to });
        }
    }

    /// Removes killed and arrived enemies once every tower has fired.
    fn resolve_removals(&mut self, out_events: &mut Vec<Event>) {
        let reward = self.rules.kill_reward;
        let economy = &mut self.economy;
        let machine = &mut self.machine;
        self.enemies.retain(|enemy| {
            if enemy.is_dead() {
                economy.earn(reward);
                machine.record_kill();
                debug!("enemy {:?} killed", enemy.id());
                out_events.push(Event::EnemyKilled {
                    enemy: enemy.id(),
                    reward,
                });
                false
            } else if enemy.has_reached_goal() {
                machine.record_pass();
                debug!("enemy {:?} reached the goal", enemy.id());
                out_events.push(Event::EnemyPassed { enemy: enemy.id() });
                false
            } else {
                true
            }
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SelectDifficulty { difficulty } => {
            match world.machine.select_difficulty(difficulty) {
                Ok(()) => {
                    let config = world.machine.config();
                    world.economy = Economy::new(config.starting_gold());
                    info!("difficulty {difficulty} selected");
                    out_events.push(Event::DifficultySelected { difficulty, config });
                }
                Err(state) => {
                    debug!("difficulty selection ignored in {state:?}");
                    out_events.push(Event::DifficultySelectionRejected { state });
                }
            }
        }
        Command::ConfigureWave { config } => match world.machine.configure_wave(config) {
            Ok(()) => {
                world.economy = Economy::new(config.starting_gold());
                info!("custom wave configuration {config:?} selected");
                out_events.push(Event::WaveConfigured { config });
            }
            Err(state) => {
                debug!("wave configuration ignored in {state:?}");
                out_events.push(Event::DifficultySelectionRejected { state });
            }
        },
        Command::StartRun => match world.machine.start_run() {
            Ok(()) => {
                world.reset_run();
                let difficulty = world.machine.difficulty();
                let config = world.machine.config();
                info!(
                    "run started on {difficulty} with {} gold",
                    config.starting_gold()
                );
                out_events.push(Event::RunStarted { difficulty, config });
                out_events.push(Event::GameStateChanged {
                    from: GameState::Menu,
                    to: GameState::Playing,
                });
            }
            Err(state) => {
                debug!("run start ignored in {state:?}");
                out_events.push(Event::RunStartRejected { state });
            }
        },
        Command::ReturnToMenu => {
            let previous = world.machine.return_to_menu();
            world.reset_run();
            info!("returned to menu from {previous:?}");
            out_events.push(Event::ReturnedToMenu);
            if previous != GameState::Menu {
                out_events.push(Event::GameStateChanged {
                    from: previous,
                    to: GameState::Menu,
                });
            }
        }
        Command::PlaceTower { cell } => match world.place_tower(cell) {
            Ok(tower) => out_events.push(Event::TowerPlaced {
                tower,
                cell,
                cost: world.rules.tower_cost,
            }),
            Err(reason) => {
                debug!("tower placement at {cell} rejected: {reason}");
                out_events.push(Event::TowerPlacementRejected { cell, reason });
            }
        },
        Command::ToggleObstacle { cell } => match world.toggle_obstacle(cell) {
            Ok(state) => out_events.push(Event::ObstacleToggled {
                cell,
                state,
                balance: world.economy.balance(),
            }),
            Err(reason) => {
                debug!("obstacle edit at {cell} rejected: {reason}");
                out_events.push(Event::ObstacleToggleRejected { cell, reason });
            }
        },
        Command::SpawnEnemy { path } => {
            let path_len = path.len();
            match world.spawn_enemy(path) {
                Ok(enemy) => out_events.push(Event::EnemySpawned { enemy, path_len }),
                Err(reason) => {
                    debug!("spawn rejected: {reason}");
                    out_events.push(Event::EnemySpawnRejected { reason });
                }
            }
        }
        Command::Tick => {
            if world.is_playing() {
                world.advance_tick(out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{GridMap, World};
    use waypoint_defence_core::{
        CellCoord, Difficulty, EnemyView, GameState, GameStats, GridView, Layout, Rules,
        TowerId, TowerView, WaveConfig,
    };

    /// Current state of the game state machine.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.machine.state()
    }

    /// Difficulty selected for the current or next run.
    #[must_use]
    pub fn difficulty(world: &World) -> Difficulty {
        world.machine.difficulty()
    }

    /// Wave configuration of the current or next run.
    #[must_use]
    pub fn wave_config(world: &World) -> WaveConfig {
        world.machine.config()
    }

    /// Kill, pass and spawn counters of the current run.
    #[must_use]
    pub fn stats(world: &World) -> GameStats {
        world.machine.stats()
    }

    /// Current gold balance.
    #[must_use]
    pub fn gold(world: &World) -> u32 {
        world.economy.balance()
    }

    /// Provides read-only access to the grid.
    #[must_use]
    pub fn grid(world: &World) -> &GridMap {
        &world.grid
    }

    /// Captures a read-only view of cell walkability.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        world.grid.view()
    }

    /// Cell where enemies enter.
    #[must_use]
    pub fn start(world: &World) -> CellCoord {
        world.grid.start()
    }

    /// Cell enemies try to reach.
    #[must_use]
    pub fn goal(world: &World) -> CellCoord {
        world.grid.goal()
    }

    /// Tuning constants the world was built with.
    #[must_use]
    pub fn rules(world: &World) -> &Rules {
        &world.rules
    }

    /// Layout restored whenever a run starts.
    #[must_use]
    pub fn layout(world: &World) -> &Layout {
        &world.layout
    }

    /// Captures a read-only view of the live enemies, ordered by identifier.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Captures a read-only view of the placed towers, ordered by identifier.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Tower occupying the provided cell, if any.
    #[must_use]
    pub fn tower_at(world: &World, cell: CellCoord) -> Option<TowerId> {
        world.towers.tower_at(cell)
    }

    /// Number of ticks simulated since the run started.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
