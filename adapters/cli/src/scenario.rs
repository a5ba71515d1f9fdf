//! TOML scenario files that override the built-in rules and layout.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use waypoint_defence_core::{Layout, Rules, WaveConfig};

/// Rules, layout and an optional wave override loaded from a scenario file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Scenario {
    pub(crate) rules: Rules,
    pub(crate) layout: Layout,
    wave: Option<WaveOverride>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
struct WaveOverride {
    starting_gold: u32,
    spawn_interval_ticks: u32,
    win_kill_count: u32,
    lose_pass_count: u32,
}

impl Scenario {
    /// Custom wave configuration, if the scenario declares one.
    pub(crate) fn wave_config(&self) -> Result<Option<WaveConfig>> {
        let Some(wave) = self.wave else {
            return Ok(None);
        };
        let config = WaveConfig::new(
            wave.starting_gold,
            wave.spawn_interval_ticks,
            wave.win_kill_count,
            wave.lose_pass_count,
        )
        .context("invalid [wave] table")?;
        Ok(Some(config))
    }
}

pub(crate) fn load(path: &Path) -> Result<Scenario> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario at {}", path.display()))?;
    parse(&contents).with_context(|| format!("failed to load scenario {}", path.display()))
}

fn parse(contents: &str) -> Result<Scenario> {
    toml::from_str(contents).context("failed to parse scenario toml contents")
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_defence_core::CellCoord;

    #[test]
    fn empty_scenario_uses_defaults() {
        let scenario = parse("").expect("empty scenario parses");
        assert_eq!(scenario, Scenario::default());
        assert_eq!(scenario.wave_config().expect("no wave"), None);
    }

    #[test]
    fn partial_tables_fill_in_defaults() {
        let scenario = parse(
            r#"
            [rules]
            tower_cost = 90
            tower_range_cells = 2.5

            [layout]
            columns = 8
            rows = 4
            start = { column = 0, row = 1 }
            goal = { column = 7, row = 2 }
            obstacles = [{ column = 3, row = 1 }]

            [wave]
            starting_gold = 500
            spawn_interval_ticks = 30
            win_kill_count = 4
            lose_pass_count = 2
        "#,
        )
        .expect("scenario parses");

        assert_eq!(scenario.rules.tower_cost, 90);
        assert_eq!(scenario.rules.tower_range_cells, 2.5);
        assert_eq!(scenario.rules.kill_reward, Rules::default().kill_reward);
        assert_eq!(scenario.layout.columns, 8);
        assert_eq!(scenario.layout.goal, CellCoord::new(7, 2));
        assert_eq!(scenario.layout.obstacles, vec![CellCoord::new(3, 1)]);
        assert_eq!(
            scenario.wave_config().expect("valid wave"),
            Some(WaveConfig::new(500, 30, 4, 2).expect("valid wave"))
        );
    }

    #[test]
    fn bundled_default_scenario_matches_builtins() {
        let scenario = parse(include_str!("../../../scenarios/default.toml"))
            .expect("bundled scenario parses");
        assert_eq!(scenario.rules, Rules::default());
        assert_eq!(scenario.layout, Layout::default());
        assert_eq!(scenario.wave_config().expect("no wave"), None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse("[rules]\ntower_price = 5\n").is_err());
        assert!(parse("[terrain]\n").is_err());
    }

    #[test]
    fn zero_wave_thresholds_are_rejected() {
        let scenario = parse(
            r#"
            [wave]
            starting_gold = 10
            spawn_interval_ticks = 0
            win_kill_count = 1
            lose_pass_count = 1
        "#,
        )
        .expect("scenario parses");

        assert!(scenario.wave_config().is_err());
    }
}
