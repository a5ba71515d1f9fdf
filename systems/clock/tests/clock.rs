use waypoint_defence_core::{
    CellCoord, Command, Difficulty, Event, GameState, Layout, Rules, TowerId, WaveConfig,
};
use waypoint_defence_system_clock::{Frame, SimulationClock};

fn run_until_terminal(clock: &mut SimulationClock, max_ticks: u32) -> Vec<Vec<Event>> {
    let mut log = Vec::new();
    for _ in 0..max_ticks {
        log.push(clock.tick().to_vec());
        let frame = clock.frame();
        assert_eq!(
            frame.enemies.len() as u32,
            frame.stats.expected_live(),
            "live enemies diverged from counters at tick {}",
            frame.tick
        );
        if frame.state.is_terminal() {
            break;
        }
    }
    log
}

#[test]
fn unguarded_run_is_lost_after_enough_passes() {
    let mut clock = SimulationClock::new();
    clock.submit(Command::StartRun);

    let _ = run_until_terminal(&mut clock, 5_000);

    let frame = clock.frame();
    assert_eq!(frame.state, GameState::Lose);
    assert_eq!(frame.stats.pass_count, 10);
    assert_eq!(frame.stats.kill_count, 0);
    assert_eq!(frame.gold, 450);
}

#[test]
fn overwhelming_tower_wins_on_the_third_kill() {
    let rules = Rules {
        tower_damage: 100,
        tower_fire_interval_ticks: 1,
        ..Rules::default()
    };
    let mut clock = SimulationClock::with_config(rules, Layout::default()).expect("valid config");
    clock.submit(Command::ConfigureWave {
        config: WaveConfig::new(150, 10, 3, 10).expect("valid wave"),
    });
    clock.submit(Command::StartRun);
    clock.submit(Command::PlaceTower {
        cell: CellCoord::new(1, 8),
    });

    let log = run_until_terminal(&mut clock, 100);

    let frame = clock.frame();
    assert_eq!(frame.state, GameState::Win);
    assert_eq!(frame.tick, 30);
    assert_eq!(frame.stats.kill_count, 3);
    assert_eq!(frame.gold, 300);
    let kills: Vec<u64> = log
        .iter()
        .enumerate()
        .filter(|(_, events)| {
            events
                .iter()
                .any(|event| matches!(event, Event::EnemyKilled { .. }))
        })
        .map(|(index, _)| index as u64 + 1)
        .collect();
    assert_eq!(kills, vec![10, 20, 30]);
}

#[test]
fn terminal_state_freezes_the_simulation() {
    let rules = Rules {
        enemy_speed_cells_per_tick: 1.0,
        ..Rules::default()
    };
    let mut clock = SimulationClock::with_config(rules, Layout::default()).expect("valid config");
    clock.submit(Command::ConfigureWave {
        config: WaveConfig::new(450, 5, 20, 1).expect("valid wave"),
    });
    clock.submit(Command::StartRun);

    let _ = run_until_terminal(&mut clock, 200);
    let frozen = clock.frame();
    assert_eq!(frozen.state, GameState::Lose);
    assert_eq!(frozen.stats.pass_count, 1);

    clock.submit(Command::PlaceTower {
        cell: CellCoord::new(3, 3),
    });
    clock.submit(Command::ToggleObstacle {
        cell: CellCoord::new(4, 4),
    });
    for _ in 0..50 {
        let events = clock.tick().to_vec();
        assert!(events
            .iter()
            .all(|event| matches!(event, Event::TowerPlacementRejected { .. }
                | Event::ObstacleToggleRejected { .. })));
    }
    assert_eq!(clock.frame(), frozen);
}

#[test]
fn towers_respect_their_fire_interval() {
    let mut clock = SimulationClock::new();
    clock.submit(Command::SelectDifficulty {
        difficulty: Difficulty::Easy,
    });
    clock.submit(Command::StartRun);
    for column in [3, 4, 10, 11] {
        clock.submit(Command::PlaceTower {
            cell: CellCoord::new(column, 8),
        });
    }

    let log = run_until_terminal(&mut clock, 6_000);

    let mut shots: Vec<(TowerId, u64)> = Vec::new();
    for (index, events) in log.iter().enumerate() {
        for event in events {
            if let Event::TowerFired { tower, .. } = event {
                shots.push((*tower, index as u64 + 1));
            }
        }
    }
    assert!(!shots.is_empty(), "towers next to the route should fire");
    for tower in 0..4 {
        let ticks: Vec<u64> = shots
            .iter()
            .filter(|(id, _)| *id == TowerId::new(tower))
            .map(|(_, tick)| *tick)
            .collect();
        assert!(
            ticks.windows(2).all(|pair| pair[1] - pair[0] >= 60),
            "tower {tower} fired too quickly: {ticks:?}"
        );
    }
}

#[test]
fn sealed_route_skips_spawns_until_reopened() {
    let layout = Layout {
        columns: 5,
        rows: 3,
        start: CellCoord::new(0, 1),
        goal: CellCoord::new(4, 1),
        obstacles: Vec::new(),
    };
    let mut clock = SimulationClock::with_config(Rules::default(), layout).expect("valid config");
    clock.submit(Command::ConfigureWave {
        config: WaveConfig::new(100, 10, 5, 5).expect("valid wave"),
    });
    clock.submit(Command::StartRun);
    for row in 0..3 {
        clock.submit(Command::ToggleObstacle {
            cell: CellCoord::new(2, row),
        });
    }
    for _ in 0..30 {
        let _ = clock.tick();
    }

    assert_eq!(clock.frame().stats.total_spawned, 0);
    assert_eq!(clock.spawner().skipped_spawns(), 3);

    clock.submit(Command::ToggleObstacle {
        cell: CellCoord::new(2, 0),
    });
    for _ in 0..10 {
        let _ = clock.tick();
    }
    let frame = clock.frame();
    assert_eq!(frame.stats.total_spawned, 1);
    assert_eq!(frame.enemies.len(), 1);
    assert_eq!(frame.gold, 100 - 30 + 10);
}

#[test]
fn replays_are_deterministic() {
    fn replay() -> (Vec<Vec<Event>>, Frame) {
        let mut clock = SimulationClock::new();
        clock.submit(Command::SelectDifficulty {
            difficulty: Difficulty::Hard,
        });
        clock.submit(Command::StartRun);
        clock.submit(Command::PlaceTower {
            cell: CellCoord::new(6, 8),
        });
        clock.submit(Command::ToggleObstacle {
            cell: CellCoord::new(12, 7),
        });
        let log = run_until_terminal(&mut clock, 4_000);
        (log, clock.frame())
    }

    let first = replay();
    let second = replay();

    assert_eq!(first.0, second.0);
    assert_eq!(first.1, second.1);
    assert!(first.1.state.is_terminal());
}

#[test]
fn return_to_menu_restores_the_layout() {
    let mut clock = SimulationClock::new();
    clock.submit(Command::StartRun);
    clock.submit(Command::ToggleObstacle {
        cell: CellCoord::new(7, 6),
    });
    for _ in 0..100 {
        let _ = clock.tick();
    }
    assert_eq!(
        clock.frame().walkability(CellCoord::new(7, 6)),
        Some(waypoint_defence_core::Walkability::Walkable)
    );

    clock.submit(Command::ReturnToMenu);
    let events = clock.tick().to_vec();

    assert!(events.contains(&Event::ReturnedToMenu));
    let frame = clock.frame();
    assert_eq!(frame.state, GameState::Menu);
    assert_eq!(frame.tick, 0);
    assert_eq!(frame.gold, 450);
    assert!(frame.enemies.is_empty());
    assert_eq!(
        frame.walkability(CellCoord::new(7, 6)),
        Some(waypoint_defence_core::Walkability::Blocked)
    );
}

#[test]
fn frame_serialises_for_renderers() {
    let mut clock = SimulationClock::new();
    clock.submit(Command::StartRun);
    for _ in 0..100 {
        let _ = clock.tick();
    }

    let frame = clock.frame();
    let json = serde_json::to_value(&frame).expect("frame serialises");

    assert_eq!(json["gold"], 450);
    assert_eq!(json["state"], "Playing");
    assert_eq!(json["cells"].as_array().map(Vec::len), Some(300));
    assert_eq!(json["enemies"].as_array().map(Vec::len), Some(1));
}
