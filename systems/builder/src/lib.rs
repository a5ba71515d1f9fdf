#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input system that turns pointer and menu actions into world commands.

use waypoint_defence_core::{CellCoord, Command, Difficulty, Event, GameState};

/// Side length of a rendered grid tile in pixels.
pub const TILE_SIZE_PX: f32 = 40.0;

/// Pointer position in window pixels, measured from the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelPosition {
    /// Horizontal offset in pixels.
    pub x: f32,
    /// Vertical offset in pixels.
    pub y: f32,
}

impl PixelPosition {
    /// Creates a new pixel position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BuilderInput {
    /// Position of a primary click this frame; places a tower during a run.
    pub primary_click: Option<PixelPosition>,
    /// Position of a secondary click this frame; toggles an obstacle during a run.
    pub secondary_click: Option<PixelPosition>,
    /// Difficulty chosen in the menu this frame.
    pub difficulty: Option<Difficulty>,
    /// Indicates whether the player pressed start in the menu.
    pub start_action: bool,
    /// Indicates whether the player asked to go back to the menu.
    pub restart_action: bool,
}

/// Input system that tracks the game state and emits the commands it permits.
#[derive(Clone, Debug)]
pub struct Builder {
    game_state: GameState,
    columns: u32,
    rows: u32,
    tile_size: f32,
}

impl Builder {
    /// Creates a builder for a grid of the provided size with the given tile size.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, tile_size: f32) -> Self {
        Self {
            game_state: GameState::Menu,
            columns,
            rows,
            tile_size,
        }
    }

    /// Game state last announced by the world.
    #[must_use]
    pub const fn game_state(&self) -> GameState {
        self.game_state
    }

    /// Maps a pixel position to the grid cell underneath it.
    ///
    /// Positions left of or above the grid, beyond its far edges, or not
    /// finite map to `None`.
    #[must_use]
    pub fn cell_at(&self, position: PixelPosition) -> Option<CellCoord> {
        if !(self.tile_size > 0.0) || !position.x.is_finite() || !position.y.is_finite() {
            return None;
        }
        if position.x < 0.0 || position.y < 0.0 {
            return None;
        }
        let column = (position.x / self.tile_size).floor();
        let row = (position.y / self.tile_size).floor();
        if column >= self.columns as f32 || row >= self.rows as f32 {
            return None;
        }
        Some(CellCoord::new(column as u32, row as u32))
    }

    /// Consumes world events and adapter-derived input to emit commands.
    pub fn handle(&mut self, events: &[Event], input: BuilderInput, out: &mut Vec<Command>) {
        for event in events {
            if let Event::GameStateChanged { to, .. } = event {
                self.game_state = *to;
            }
        }

        match self.game_state {
            GameState::Menu => {
                if let Some(difficulty) = input.difficulty {
                    out.push(Command::SelectDifficulty { difficulty });
                }
                if input.start_action {
                    out.push(Command::StartRun);
                }
            }
            GameState::Playing => {
                if let Some(cell) = input.primary_click.and_then(|click| self.cell_at(click)) {
                    out.push(Command::PlaceTower { cell });
                }
                if let Some(cell) = input.secondary_click.and_then(|click| self.cell_at(click)) {
                    out.push(Command::ToggleObstacle { cell });
                }
                if input.restart_action {
                    out.push(Command::ReturnToMenu);
                }
            }
            GameState::Win | GameState::Lose => {
                if input.restart_action {
                    out.push(Command::ReturnToMenu);
                }
            }
        }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new(20, 15, TILE_SIZE_PX)
    }
}
