//! Menu, run, and terminal state transitions.

use waypoint_defence_core::{Difficulty, GameState, GameStats, WaveConfig};

/// Tracks the lifecycle of a run and the counters that end it.
///
/// `Win` and `Lose` are terminal; only a return to the menu leaves them.
#[derive(Clone, Debug)]
pub(crate) struct GameStateMachine {
    state: GameState,
    difficulty: Difficulty,
    config: WaveConfig,
    stats: GameStats,
}

impl GameStateMachine {
    pub(crate) fn new() -> Self {
        let difficulty = Difficulty::default();
        Self {
            state: GameState::Menu,
            difficulty,
            config: difficulty.wave_config(),
            stats: GameStats::default(),
        }
    }

    pub(crate) const fn state(&self) -> GameState {
        self.state
    }

    pub(crate) const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub(crate) const fn config(&self) -> WaveConfig {
        self.config
    }

    pub(crate) const fn stats(&self) -> GameStats {
        self.stats
    }

    /// Chooses the preset used by the next run. Rejected outside the menu.
    pub(crate) fn select_difficulty(&mut self, difficulty: Difficulty) -> Result<(), GameState> {
        if self.state != GameState::Menu {
            return Err(self.state);
        }
        self.difficulty = difficulty;
        self.config = difficulty.wave_config();
        Ok(())
    }

    /// Overrides the preset with a custom configuration. Rejected outside the menu.
    pub(crate) fn configure_wave(&mut self, config: WaveConfig) -> Result<(), GameState> {
        if self.state != GameState::Menu {
            return Err(self.state);
        }
        self.config = config;
        Ok(())
    }

    /// Leaves the menu, zeroing every counter.
    pub(crate) fn start_run(&mut self) -> Result<(), GameState> {
        if self.state != GameState::Menu {
            return Err(self.state);
        }
        self.stats = GameStats::default();
        self.state = GameState::Playing;
        Ok(())
    }

    /// Returns to the menu from any state, reporting the state that was left.
    pub(crate) fn return_to_menu(&mut self) -> GameState {
        let previous = self.state;
        self.stats = GameStats::default();
        self.state = GameState::Menu;
        previous
    }

    pub(crate) fn record_spawn(&mut self) {
        self.stats.total_spawned = self.stats.total_spawned.saturating_add(1);
    }

    pub(crate) fn record_kill(&mut self) {
        self.stats.kill_count = self.stats.kill_count.saturating_add(1);
    }

    pub(crate) fn record_pass(&mut self) {
        self.stats.pass_count = self.stats.pass_count.saturating_add(1);
    }

    /// Applies the win and lose thresholds while a run is in progress.
    ///
    /// The win threshold is checked first, so a tick that crosses both ends in
    /// `Win`.
    pub(crate) fn evaluate(&mut self) -> Option<(GameState, GameState)> {
        if self.state != GameState::Playing {
            return None;
        }
        let next = if self.stats.kill_count >= self.config.win_kill_count() {
            GameState::Win
        } else if self.stats.pass_count >= self.config.lose_pass_count() {
            GameState::Lose
        } else {
            return None;
        };
        let from = self.state;
        self.state = next;
        Some((from, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing(config: WaveConfig) -> GameStateMachine {
        let mut machine = GameStateMachine::new();
        machine.configure_wave(config).expect("menu accepts configuration");
        machine.start_run().expect("menu starts a run");
        machine
    }

    #[test]
    fn starts_in_menu_with_medium_preset() {
        let machine = GameStateMachine::new();
        assert_eq!(machine.state(), GameState::Menu);
        assert_eq!(machine.difficulty(), Difficulty::Medium);
        assert_eq!(machine.config(), Difficulty::Medium.wave_config());
    }

    #[test]
    fn selection_is_rejected_during_a_run() {
        let mut machine = playing(Difficulty::Easy.wave_config());
        assert_eq!(
            machine.select_difficulty(Difficulty::Hard),
            Err(GameState::Playing)
        );
        assert_eq!(machine.start_run(), Err(GameState::Playing));
    }

    #[test]
    fn win_requires_kill_threshold() {
        let config = WaveConfig::new(0, 60, 2, 5).expect("valid config");
        let mut machine = playing(config);

        machine.record_kill();
        assert_eq!(machine.evaluate(), None);
        machine.record_kill();
        assert_eq!(
            machine.evaluate(),
            Some((GameState::Playing, GameState::Win))
        );
        assert_eq!(machine.evaluate(), None);
        assert_eq!(machine.state(), GameState::Win);
    }

    #[test]
    fn lose_requires_pass_threshold() {
        let config = WaveConfig::new(0, 60, 10, 1).expect("valid config");
        let mut machine = playing(config);

        machine.record_pass();
        assert_eq!(
            machine.evaluate(),
            Some((GameState::Playing, GameState::Lose))
        );
    }

    #[test]
    fn win_takes_precedence_when_both_thresholds_are_met() {
        let config = WaveConfig::new(0, 60, 1, 1).expect("valid config");
        let mut machine = playing(config);

        machine.record_kill();
        machine.record_pass();
        assert_eq!(
            machine.evaluate(),
            Some((GameState::Playing, GameState::Win))
        );
    }

    #[test]
    fn return_to_menu_clears_counters() {
        let mut machine = playing(Difficulty::Easy.wave_config());
        machine.record_spawn();
        machine.record_kill();

        assert_eq!(machine.return_to_menu(), GameState::Playing);
        assert_eq!(machine.state(), GameState::Menu);
        assert_eq!(machine.stats(), GameStats::default());
    }
}
