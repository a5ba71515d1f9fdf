#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave spawning system responsible for emitting enemy spawn commands.

use log::debug;
use waypoint_defence_core::{CellCoord, Command, Event, GameState, GridView, Rules, WaveConfig};
use waypoint_defence_system_pathfinding::PathFinder;

/// Configuration parameters required to construct the wave spawner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    spawn_interval_ticks: u32,
    ramp_window_ticks: u32,
    ramp_decrement_ticks: u32,
    min_spawn_interval_ticks: u32,
}

impl Config {
    /// Creates a new configuration from an initial cadence and its ramp.
    ///
    /// Zero intervals and windows are raised to one tick.
    #[must_use]
    pub fn new(
        spawn_interval_ticks: u32,
        ramp_window_ticks: u32,
        ramp_decrement_ticks: u32,
        min_spawn_interval_ticks: u32,
    ) -> Self {
        Self {
            spawn_interval_ticks: spawn_interval_ticks.max(1),
            ramp_window_ticks: ramp_window_ticks.max(1),
            ramp_decrement_ticks,
            min_spawn_interval_ticks: min_spawn_interval_ticks.max(1),
        }
    }

    /// Combines the cadence of a wave configuration with the ramp rules.
    #[must_use]
    pub fn from_rules(wave: WaveConfig, rules: &Rules) -> Self {
        Self::new(
            wave.spawn_interval_ticks(),
            rules.ramp_window_ticks,
            rules.ramp_decrement_ticks,
            rules.min_spawn_interval_ticks,
        )
    }

    const fn with_interval(self, spawn_interval_ticks: u32) -> Self {
        Self {
            spawn_interval_ticks,
            ..self
        }
    }
}

/// Pure system that requests a new enemy whenever its countdown expires.
///
/// The countdown is reseeded from the current spawn interval after every
/// expiry, and the interval itself shrinks once per ramp window down to the
/// configured minimum. Routes are computed against the grid as it is when the
/// countdown expires; when no route exists the spawn is skipped and the next
/// expiry tries again.
#[derive(Debug)]
pub struct WaveSpawner {
    config: Config,
    path_finder: PathFinder,
    spawn_interval: u32,
    countdown: u32,
    elapsed_ticks: u64,
    skipped: u32,
}

impl WaveSpawner {
    /// Creates a new wave spawner using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            path_finder: PathFinder::new(),
            spawn_interval: config.spawn_interval_ticks,
            countdown: config.spawn_interval_ticks,
            elapsed_ticks: 0,
            skipped: 0,
        }
    }

    /// Current number of ticks between spawns.
    #[must_use]
    pub const fn spawn_interval(&self) -> u32 {
        self.spawn_interval
    }

    /// Ticks left before the next spawn attempt.
    #[must_use]
    pub const fn countdown(&self) -> u32 {
        self.countdown
    }

    /// Spawn attempts skipped because no route reached the goal.
    #[must_use]
    pub const fn skipped_spawns(&self) -> u32 {
        self.skipped
    }

    /// Advances the spawner by one tick and emits spawn commands.
    ///
    /// Run lifecycle events reset the cadence. Nothing advances unless
    /// `game_state` is `Playing`.
    pub fn handle(
        &mut self,
        events: &[Event],
        game_state: GameState,
        grid: GridView<'_>,
        start: CellCoord,
        goal: CellCoord,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::RunStarted { config, .. } => {
                    self.reset(self.config.with_interval(config.spawn_interval_ticks().max(1)));
                }
                Event::ReturnedToMenu => self.reset(self.config),
                _ => {}
            }
        }

        if game_state != GameState::Playing {
            return;
        }

        self.elapsed_ticks += 1;
        if self.elapsed_ticks % u64::from(self.config.ramp_window_ticks) == 0 {
            self.ramp();
        }

        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return;
        }
        self.countdown = self.spawn_interval;

        match self.path_finder.find_path(grid, start, goal) {
            Some(path) => out.push(Command::SpawnEnemy { path }),
            None => {
                self.skipped = self.skipped.saturating_add(1);
                debug!(
                    "no route from {start} to {goal}, skipping spawn at tick {}",
                    self.elapsed_ticks
                );
            }
        }
    }

    fn reset(&mut self, config: Config) {
        self.config = config;
        self.spawn_interval = config.spawn_interval_ticks;
        self.countdown = config.spawn_interval_ticks;
        self.elapsed_ticks = 0;
        self.skipped = 0;
    }

    fn ramp(&mut self) {
        let reduced = self
            .spawn_interval
            .saturating_sub(self.config.ramp_decrement_ticks);
        let next = reduced
            .max(self.config.min_spawn_interval_ticks)
            .min(self.spawn_interval);
        if next != self.spawn_interval {
            debug!(
                "spawn interval shortened from {} to {next} ticks",
                self.spawn_interval
            );
        }
        self.spawn_interval = next;
    }
}
