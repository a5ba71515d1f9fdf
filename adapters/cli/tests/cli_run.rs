use std::{fs, process::Command};

fn waypoint_defence() -> Command {
    Command::new(env!("CARGO_BIN_EXE_waypoint-defence"))
}

#[test]
fn json_summary_reports_the_run() {
    let output = waypoint_defence()
        .args(["--difficulty", "easy", "--max-ticks", "150", "--tower", "2,8", "--json"])
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to invoke waypoint-defence binary");

    assert!(output.status.success(), "run should succeed: {output:?}");
    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout holds a JSON summary");
    assert_eq!(summary["difficulty"], "Easy");
    assert_eq!(summary["outcome"], "Playing");
    assert_eq!(summary["ticks"], 150);
    assert_eq!(summary["towers"], 1);
    assert_eq!(summary["gold"], 450);
}

#[test]
fn scenario_file_overrides_the_wave() {
    let path = std::env::temp_dir().join(format!("waypoint-defence-{}.toml", std::process::id()));
    fs::write(
        &path,
        r#"
        [layout]
        columns = 6
        rows = 3
        start = { column = 0, row = 1 }
        goal = { column = 5, row = 1 }
        obstacles = []

        [rules]
        enemy_speed_cells_per_tick = 1.0

        [wave]
        starting_gold = 0
        spawn_interval_ticks = 2
        win_kill_count = 10
        lose_pass_count = 1
        "#,
    )
    .expect("scenario file is writable");

    let output = waypoint_defence()
        .arg("--scenario")
        .arg(&path)
        .arg("--json")
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to invoke waypoint-defence binary");
    let _ = fs::remove_file(&path);

    assert!(output.status.success(), "run should succeed: {output:?}");
    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout holds a JSON summary");
    assert_eq!(summary["outcome"], "Lose");
    assert_eq!(summary["passes"], 1);
    assert_eq!(summary["ticks"], 6);
}

#[test]
fn malformed_cells_are_rejected() {
    let output = waypoint_defence()
        .args(["--tower", "nine"])
        .output()
        .expect("failed to invoke waypoint-defence binary");

    assert!(!output.status.success());
}
