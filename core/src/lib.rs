#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Waypoint Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then reports [`Event`] values describing what
//! happened, including rejected actions. Systems consume event streams, query
//! immutable views such as [`GridView`], and respond with new commands.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of fixed simulation ticks that make up one second of simulated time.
pub const TICKS_PER_SECOND: u32 = 60;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Selects the difficulty used by the next run. Only honoured in the menu.
    SelectDifficulty {
        /// Difficulty requested by the player.
        difficulty: Difficulty,
    },
    /// Replaces the wave configuration of the next run with custom values.
    /// Only honoured in the menu.
    ConfigureWave {
        /// Configuration used by the next run.
        config: WaveConfig,
    },
    /// Leaves the menu and starts a fresh run with the selected difficulty.
    StartRun,
    /// Abandons the current run and returns to the menu, resetting the world.
    ReturnToMenu,
    /// Requests placement of a tower on the provided cell.
    PlaceTower {
        /// Cell the tower should occupy.
        cell: CellCoord,
    },
    /// Requests that the walkability of the provided cell is flipped.
    ToggleObstacle {
        /// Cell whose walkability should be flipped.
        cell: CellCoord,
    },
    /// Requests that a new enemy enters the grid following the provided path.
    SpawnEnemy {
        /// Waypoints from the start cell to the goal cell, inclusive.
        path: Path,
    },
    /// Advances the simulation by one fixed tick.
    Tick,
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a difficulty was selected while in the menu.
    DifficultySelected {
        /// Difficulty that became active.
        difficulty: Difficulty,
        /// Wave configuration associated with the difficulty.
        config: WaveConfig,
    },
    /// Reports that a difficulty selection or wave configuration arrived
    /// outside of the menu.
    DifficultySelectionRejected {
        /// State the simulation was in when the request arrived.
        state: GameState,
    },
    /// Confirms that a custom wave configuration replaced the preset.
    WaveConfigured {
        /// Configuration used by the next run.
        config: WaveConfig,
    },
    /// Announces that a new run began with freshly reset world state.
    RunStarted {
        /// Difficulty the run was started with.
        difficulty: Difficulty,
        /// Wave configuration that stays fixed for the whole run.
        config: WaveConfig,
    },
    /// Reports that a run start request arrived outside of the menu.
    RunStartRejected {
        /// State the simulation was in when the request arrived.
        state: GameState,
    },
    /// Announces that the world was reset and the menu is active again.
    ReturnedToMenu,
    /// Announces a transition of the game state machine.
    GameStateChanged {
        /// State that was active before the transition.
        from: GameState,
        /// State that became active.
        to: GameState,
    },
    /// Indicates that the simulation clock advanced by one tick.
    TimeAdvanced {
        /// Index of the tick that was just simulated, starting at one.
        tick: u64,
    },
    /// Confirms that a tower was placed.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Cell occupied by the tower.
        cell: CellCoord,
        /// Gold deducted for the placement.
        cost: u32,
    },
    /// Reports that a tower placement request was rejected without side effects.
    TowerPlacementRejected {
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that an obstacle edit was applied.
    ObstacleToggled {
        /// Cell whose walkability changed.
        cell: CellCoord,
        /// Walkability of the cell after the edit.
        state: Walkability,
        /// Gold balance after the edit was charged or refunded.
        balance: u32,
    },
    /// Reports that an obstacle edit was rejected without side effects.
    ObstacleToggleRejected {
        /// Cell provided in the edit request.
        cell: CellCoord,
        /// Specific reason the edit failed.
        reason: ObstacleError,
    },
    /// Confirms that an enemy entered the grid.
    EnemySpawned {
        /// Identifier assigned to the enemy by the world.
        enemy: EnemyId,
        /// Number of waypoints in the enemy's path.
        path_len: usize,
    },
    /// Reports that a spawn request was rejected.
    EnemySpawnRejected {
        /// Specific reason the spawn failed.
        reason: SpawnError,
    },
    /// Reports that a tower hit an enemy.
    TowerFired {
        /// Tower that fired.
        tower: TowerId,
        /// Enemy that was hit.
        enemy: EnemyId,
        /// Damage applied by the shot.
        damage: u32,
    },
    /// Reports that an enemy was destroyed by tower fire.
    EnemyKilled {
        /// Enemy that was removed.
        enemy: EnemyId,
        /// Gold granted for the kill.
        reward: u32,
    },
    /// Reports that an enemy reached the goal and left the grid.
    EnemyPassed {
        /// Enemy that was removed.
        enemy: EnemyId,
    },
}

/// Walkability state of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Walkability {
    /// Enemies may route through the cell.
    Walkable,
    /// The cell holds an obstacle and is excluded from routing.
    Blocked,
}

impl Walkability {
    /// Returns the opposite walkability state.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Walkable => Self::Blocked,
            Self::Blocked => Self::Walkable,
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Continuous position of the cell's centre measured in cell units.
    #[must_use]
    pub fn center(self) -> CellPoint {
        CellPoint::new(self.column as f32 + 0.5, self.row as f32 + 0.5)
    }

    /// Reports whether the two cells share an edge.
    #[must_use]
    pub fn is_adjacent_to(self, other: CellCoord) -> bool {
        self.manhattan_distance(other) == 1
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Continuous position measured in cell units, where `(0.0, 0.0)` is the
/// upper-left corner of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct CellPoint {
    x: f32,
    y: f32,
}

impl CellPoint {
    /// Creates a new continuous position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal component measured in cells.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component measured in cells.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance to another point measured in cells.
    #[must_use]
    pub fn distance(self, other: CellPoint) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Ordered sequence of cells from a start cell to a goal cell, inclusive.
///
/// A path is immutable once built and always holds at least one cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Path {
    cells: Vec<CellCoord>,
}

impl Path {
    /// Wraps the provided waypoints, returning `None` when no cell is given.
    #[must_use]
    pub fn new(cells: Vec<CellCoord>) -> Option<Self> {
        if cells.is_empty() {
            return None;
        }
        Some(Self { cells })
    }

    /// Waypoints in travel order.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Number of waypoints, including both endpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Retrieves the waypoint stored at the provided index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<CellCoord> {
        self.cells.get(index).copied()
    }

    /// First waypoint of the path.
    #[must_use]
    pub fn first(&self) -> CellCoord {
        self.cells[0]
    }

    /// Final waypoint of the path.
    #[must_use]
    pub fn last(&self) -> CellCoord {
        self.cells[self.cells.len() - 1]
    }

    /// Reports whether every consecutive pair of waypoints shares an edge.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.cells
            .windows(2)
            .all(|pair| pair[0].is_adjacent_to(pair[1]))
    }
}

/// Read-only view into the dense walkability matrix.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    cells: &'a [Walkability],
    columns: u32,
    rows: u32,
}

impl<'a> GridView<'a> {
    /// Captures a new grid view backed by the provided row-major cell slice.
    #[must_use]
    pub fn new(cells: &'a [Walkability], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Reports whether the cell lies inside the grid bounds.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Returns the walkability stored for the cell, if it lies inside the grid.
    #[must_use]
    pub fn walkability(&self, cell: CellCoord) -> Option<Walkability> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Reports whether enemies may route through the cell.
    ///
    /// Cells outside the grid are never walkable.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.walkability(cell) == Some(Walkability::Walkable)
    }

    /// Returns an iterator over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Walkability> + 'a {
        self.cells.iter().copied()
    }

    /// Provides the dimensions of the underlying grid as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Row-major offset of the cell, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

/// Difficulty presets offered by the menu.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// Generous gold and slow waves.
    Easy,
    /// Balanced preset selected when the menu first opens.
    #[default]
    Medium,
    /// Scarce gold and fast waves.
    Hard,
}

impl Difficulty {
    /// Every difficulty in menu order.
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Wave configuration associated with the difficulty.
    #[must_use]
    pub const fn wave_config(self) -> WaveConfig {
        match self {
            Self::Easy => WaveConfig::from_parts(600, 100, 25, 15),
            Self::Medium => WaveConfig::from_parts(450, 80, 20, 10),
            Self::Hard => WaveConfig::from_parts(300, 70, 15, 10),
        }
    }

    /// Display name used by menus and command-line flags.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownDifficulty(trimmed.to_owned()))
    }
}

/// Error produced when a difficulty name does not match any preset.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown difficulty '{0}', expected one of Easy, Medium, Hard")]
pub struct UnknownDifficulty(String);

/// Per-difficulty parameters that stay fixed for the duration of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WaveConfig {
    starting_gold: u32,
    spawn_interval_ticks: u32,
    win_kill_count: u32,
    lose_pass_count: u32,
}

impl WaveConfig {
    /// Creates a validated wave configuration.
    pub fn new(
        starting_gold: u32,
        spawn_interval_ticks: u32,
        win_kill_count: u32,
        lose_pass_count: u32,
    ) -> Result<Self, ConfigError> {
        if spawn_interval_ticks == 0 {
            return Err(ConfigError::InvalidRule {
                name: "spawn_interval_ticks",
            });
        }
        if win_kill_count == 0 {
            return Err(ConfigError::InvalidRule {
                name: "win_kill_count",
            });
        }
        if lose_pass_count == 0 {
            return Err(ConfigError::InvalidRule {
                name: "lose_pass_count",
            });
        }
        Ok(Self::from_parts(
            starting_gold,
            spawn_interval_ticks,
            win_kill_count,
            lose_pass_count,
        ))
    }

    const fn from_parts(
        starting_gold: u32,
        spawn_interval_ticks: u32,
        win_kill_count: u32,
        lose_pass_count: u32,
    ) -> Self {
        Self {
            starting_gold,
            spawn_interval_ticks,
            win_kill_count,
            lose_pass_count,
        }
    }

    /// Gold balance granted when a run starts.
    #[must_use]
    pub const fn starting_gold(&self) -> u32 {
        self.starting_gold
    }

    /// Initial number of ticks between enemy spawns.
    #[must_use]
    pub const fn spawn_interval_ticks(&self) -> u32 {
        self.spawn_interval_ticks
    }

    /// Kills required to win the run.
    #[must_use]
    pub const fn win_kill_count(&self) -> u32 {
        self.win_kill_count
    }

    /// Passes that lose the run.
    #[must_use]
    pub const fn lose_pass_count(&self) -> u32 {
        self.lose_pass_count
    }
}

/// Tuning constants shared by every run regardless of difficulty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Rules {
    /// Gold charged for placing a tower.
    pub tower_cost: u32,
    /// Gold charged for blocking a cell and refunded when it is unblocked.
    pub obstacle_cost: u32,
    /// Gold granted for every enemy destroyed by towers.
    pub kill_reward: u32,
    /// Tower reach measured centre-to-centre in cells.
    pub tower_range_cells: f32,
    /// Health removed from an enemy by a single tower shot.
    pub tower_damage: u32,
    /// Ticks a tower waits after firing before it may fire again.
    pub tower_fire_interval_ticks: u32,
    /// Health every enemy spawns with.
    pub enemy_health: u32,
    /// Distance covered by an enemy in one tick, measured in cells.
    pub enemy_speed_cells_per_tick: f32,
    /// Ticks of simulated time between spawn interval reductions.
    pub ramp_window_ticks: u32,
    /// Ticks removed from the spawn interval at the end of each ramp window.
    pub ramp_decrement_ticks: u32,
    /// Lower bound applied to the spawn interval by the ramp.
    pub min_spawn_interval_ticks: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            tower_cost: 150,
            obstacle_cost: 10,
            kill_reward: 100,
            tower_range_cells: 3.0,
            tower_damage: 20,
            tower_fire_interval_ticks: 60,
            enemy_health: 100,
            enemy_speed_cells_per_tick: 0.05,
            ramp_window_ticks: 10 * TICKS_PER_SECOND,
            ramp_decrement_ticks: 10,
            min_spawn_interval_ticks: 20,
        }
    }
}

impl Rules {
    /// Verifies that the rules describe a runnable simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.enemy_speed_cells_per_tick.is_finite() || self.enemy_speed_cells_per_tick <= 0.0 {
            return Err(ConfigError::InvalidRule {
                name: "enemy_speed_cells_per_tick",
            });
        }
        if !self.tower_range_cells.is_finite() || self.tower_range_cells < 0.0 {
            return Err(ConfigError::InvalidRule {
                name: "tower_range_cells",
            });
        }
        if self.enemy_health == 0 {
            return Err(ConfigError::InvalidRule {
                name: "enemy_health",
            });
        }
        if self.ramp_window_ticks == 0 {
            return Err(ConfigError::InvalidRule {
                name: "ramp_window_ticks",
            });
        }
        if self.min_spawn_interval_ticks == 0 {
            return Err(ConfigError::InvalidRule {
                name: "min_spawn_interval_ticks",
            });
        }
        Ok(())
    }
}

/// Static description of the map a run is played on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Layout {
    /// Number of columns in the grid.
    pub columns: u32,
    /// Number of rows in the grid.
    pub rows: u32,
    /// Cell where enemies enter. Never blocked.
    pub start: CellCoord,
    /// Cell enemies try to reach. Never blocked.
    pub goal: CellCoord,
    /// Cells blocked when a run starts.
    pub obstacles: Vec<CellCoord>,
}

impl Default for Layout {
    fn default() -> Self {
        let columns = 20;
        let rows = 15;
        let obstacle_row = rows / 2 - 1;
        Self {
            columns,
            rows,
            start: CellCoord::new(0, rows / 2),
            goal: CellCoord::new(columns - 1, rows / 2),
            obstacles: (5..10)
                .map(|column| CellCoord::new(column, obstacle_row))
                .collect(),
        }
    }
}

impl Layout {
    /// Verifies that the layout describes a usable grid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(ConfigError::EmptyGrid {
                columns: self.columns,
                rows: self.rows,
            });
        }
        let in_bounds =
            |cell: CellCoord| cell.column() < self.columns && cell.row() < self.rows;
        if !in_bounds(self.start) {
            return Err(ConfigError::OutOfBounds {
                what: "start",
                cell: self.start,
            });
        }
        if !in_bounds(self.goal) {
            return Err(ConfigError::OutOfBounds {
                what: "goal",
                cell: self.goal,
            });
        }
        if self.start == self.goal {
            return Err(ConfigError::StartIsGoal { cell: self.start });
        }
        for &cell in &self.obstacles {
            if !in_bounds(cell) {
                return Err(ConfigError::OutOfBounds {
                    what: "obstacle",
                    cell,
                });
            }
            if cell == self.start || cell == self.goal {
                return Err(ConfigError::ReservedObstacle { cell });
            }
        }
        Ok(())
    }
}

/// Contract violations detected while constructing a simulation.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The grid has no cells.
    #[error("grid must have at least one cell, got {columns}x{rows}")]
    EmptyGrid {
        /// Configured number of columns.
        columns: u32,
        /// Configured number of rows.
        rows: u32,
    },
    /// A configured cell lies outside the grid.
    #[error("{what} cell {cell} lies outside the grid")]
    OutOfBounds {
        /// Name of the offending layout entry.
        what: &'static str,
        /// Cell that was out of bounds.
        cell: CellCoord,
    },
    /// Start and goal coincide.
    #[error("start and goal must differ, both are {cell}")]
    StartIsGoal {
        /// Shared cell.
        cell: CellCoord,
    },
    /// An initial obstacle covers the start or goal.
    #[error("obstacle at {cell} covers the start or goal")]
    ReservedObstacle {
        /// Offending obstacle cell.
        cell: CellCoord,
    },
    /// A numeric parameter is outside its permitted range.
    #[error("rule '{name}' is out of range")]
    InvalidRule {
        /// Name of the offending parameter.
        name: &'static str,
    },
}

/// States of the game state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Difficulty selection; the simulation does not advance.
    #[default]
    Menu,
    /// A run is in progress.
    Playing,
    /// Enough enemies were destroyed. Terminal.
    Win,
    /// Too many enemies reached the goal. Terminal.
    Lose,
}

impl GameState {
    /// Reports whether the state ends the run.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Win | Self::Lose)
    }
}

/// Counters that drive the win and lose transitions of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameStats {
    /// Enemies destroyed by towers.
    pub kill_count: u32,
    /// Enemies that reached the goal.
    pub pass_count: u32,
    /// Enemies that entered the grid.
    pub total_spawned: u32,
}

impl GameStats {
    /// Number of enemies that must still be alive according to the counters.
    #[must_use]
    pub const fn expected_live(&self) -> u32 {
        self.total_spawned
            .saturating_sub(self.kill_count)
            .saturating_sub(self.pass_count)
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// No run is in progress.
    #[error("towers can only be placed during a run")]
    InvalidState,
    /// The requested cell lies outside the grid.
    #[error("cell lies outside the grid")]
    OutOfBounds,
    /// The requested cell holds an obstacle.
    #[error("cell is blocked")]
    Blocked,
    /// The requested cell is the start or the goal.
    #[error("start and goal cells are reserved")]
    Reserved,
    /// Another tower already occupies the cell.
    #[error("cell already holds a tower")]
    Occupied,
    /// The balance does not cover the tower cost.
    #[error("not enough gold")]
    InsufficientGold,
}

/// Reasons an obstacle edit may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum ObstacleError {
    /// No run is in progress.
    #[error("obstacles can only be edited during a run")]
    InvalidState,
    /// The requested cell lies outside the grid.
    #[error("cell lies outside the grid")]
    OutOfBounds,
    /// The requested cell is the start or the goal.
    #[error("start and goal cells are reserved")]
    Reserved,
    /// A tower occupies the cell.
    #[error("cell holds a tower")]
    Occupied,
    /// The balance does not cover the obstacle cost.
    #[error("not enough gold")]
    InsufficientGold,
}

/// Reasons a spawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum SpawnError {
    /// No run is in progress.
    #[error("enemies can only spawn during a run")]
    InvalidState,
    /// The path does not connect start to goal through adjacent cells.
    #[error("path does not connect start to goal")]
    InvalidPath,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Continuous position measured in cells.
    pub position: CellPoint,
    /// Remaining health.
    pub health: u32,
    /// Health the enemy spawned with.
    pub max_health: u32,
    /// Index of the waypoint most recently reached.
    pub waypoint_index: usize,
    /// Number of waypoints in the enemy's path.
    pub path_len: usize,
}

impl EnemySnapshot {
    /// Remaining health as a fraction of the maximum, in `0.0..=1.0`.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemy is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Cell occupied by the tower.
    pub cell: CellCoord,
    /// Centre of the tower measured in cells.
    pub center: CellPoint,
    /// Reach of the tower measured in cells.
    pub range: f32,
    /// Ticks remaining before the tower may fire again.
    pub cooldown: u32,
}

/// Read-only snapshot describing all placed towers.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured towers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no tower has been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CellCoord, ConfigError, Difficulty, GameStats, GridView, Layout, Path, PlacementError,
        Rules, Walkability, WaveConfig,
    };
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn cell_center_sits_half_a_cell_inside() {
        let center = CellCoord::new(3, 7).center();
        assert!((center.x() - 3.5).abs() < f32::EPSILON);
        assert!((center.y() - 7.5).abs() < f32::EPSILON);
    }

    #[test]
    fn empty_path_is_refused() {
        assert!(Path::new(Vec::new()).is_none());
    }

    #[test]
    fn path_contiguity_detects_gaps() {
        let contiguous = Path::new(vec![
            CellCoord::new(0, 0),
            CellCoord::new(1, 0),
            CellCoord::new(1, 1),
        ])
        .expect("non-empty path");
        assert!(contiguous.is_contiguous());
        assert_eq!(contiguous.first(), CellCoord::new(0, 0));
        assert_eq!(contiguous.last(), CellCoord::new(1, 1));

        let diagonal =
            Path::new(vec![CellCoord::new(0, 0), CellCoord::new(1, 1)]).expect("non-empty path");
        assert!(!diagonal.is_contiguous());
    }

    #[test]
    fn grid_view_treats_out_of_bounds_as_blocked() {
        let cells = vec![
            Walkability::Walkable,
            Walkability::Blocked,
            Walkability::Walkable,
            Walkability::Walkable,
        ];
        let view = GridView::new(&cells, 2, 2);

        assert!(view.is_walkable(CellCoord::new(0, 0)));
        assert!(!view.is_walkable(CellCoord::new(1, 0)));
        assert!(view.is_walkable(CellCoord::new(1, 1)));
        assert!(!view.is_walkable(CellCoord::new(2, 0)));
        assert!(!view.is_walkable(CellCoord::new(0, 2)));
        assert_eq!(view.index(CellCoord::new(1, 1)), Some(3));
    }

    #[test]
    fn difficulty_table_matches_menu_presets() {
        let easy = Difficulty::Easy.wave_config();
        assert_eq!(easy.starting_gold(), 600);
        assert_eq!(easy.spawn_interval_ticks(), 100);
        assert_eq!(easy.win_kill_count(), 25);
        assert_eq!(easy.lose_pass_count(), 15);

        let medium = Difficulty::Medium.wave_config();
        assert_eq!(medium.starting_gold(), 450);
        assert_eq!(medium.spawn_interval_ticks(), 80);
        assert_eq!(medium.win_kill_count(), 20);
        assert_eq!(medium.lose_pass_count(), 10);

        let hard = Difficulty::Hard.wave_config();
        assert_eq!(hard.starting_gold(), 300);
        assert_eq!(hard.spawn_interval_ticks(), 70);
        assert_eq!(hard.win_kill_count(), 15);
        assert_eq!(hard.lose_pass_count(), 10);

        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(" Easy ".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert!("nightmare".parse::<Difficulty>().is_err());
    }

    #[test]
    fn wave_config_rejects_zero_thresholds() {
        assert_eq!(
            WaveConfig::new(100, 0, 1, 1),
            Err(ConfigError::InvalidRule {
                name: "spawn_interval_ticks"
            })
        );
        assert!(WaveConfig::new(100, 10, 0, 1).is_err());
        assert!(WaveConfig::new(100, 10, 1, 0).is_err());
        assert!(WaveConfig::new(0, 10, 1, 1).is_ok());
    }

    #[test]
    fn default_layout_matches_reference_map() {
        let layout = Layout::default();
        assert_eq!((layout.columns, layout.rows), (20, 15));
        assert_eq!(layout.start, CellCoord::new(0, 7));
        assert_eq!(layout.goal, CellCoord::new(19, 7));
        assert_eq!(layout.obstacles.len(), 5);
        assert!(layout.obstacles.iter().all(|cell| cell.row() == 6));
        assert_eq!(layout.validate(), Ok(()));
    }

    #[test]
    fn layout_validation_flags_reserved_obstacles() {
        let mut layout = Layout::default();
        layout.obstacles.push(layout.goal);
        assert_eq!(
            layout.validate(),
            Err(ConfigError::ReservedObstacle { cell: layout.goal })
        );

        let mut layout = Layout::default();
        layout.goal = layout.start;
        assert!(matches!(
            layout.validate(),
            Err(ConfigError::StartIsGoal { .. })
        ));
    }

    #[test]
    fn default_rules_are_valid() {
        assert_eq!(Rules::default().validate(), Ok(()));

        let rules = Rules {
            enemy_speed_cells_per_tick: 0.0,
            ..Rules::default()
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn expected_live_subtracts_removals() {
        let stats = GameStats {
            kill_count: 3,
            pass_count: 2,
            total_spawned: 9,
        };
        assert_eq!(stats.expected_live(), 4);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn placement_error_round_trips_through_bincode() {
        assert_round_trip(&PlacementError::InsufficientGold);
    }

    #[test]
    fn wave_config_round_trips_through_bincode() {
        assert_round_trip(&Difficulty::Hard.wave_config());
    }

    #[test]
    fn layout_round_trips_through_bincode() {
        assert_round_trip(&Layout::default());
    }
}
