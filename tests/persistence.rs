mod common;

use common::MazeBuilder;
use robomaze_core::config::AppConfig;
use robomaze_core::{AgentPhase, StopReason, Strategy};
use robomaze_data::{Coord, GridError, Maze, MazeSnapshot};
use robomaze_io::IoError;
use robomaze_lib::app::{self, RunReport};

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("robomaze_it_{}_{}", std::process::id(), name))
}

#[test]
fn test_snapshot_json_is_exact() {
    let maze = MazeBuilder::from_ascii(&["S.#", "^..", "..G"]).build_maze();
    let json = robomaze_io::to_json(&maze.snapshot()).unwrap();
    let parsed: MazeSnapshot = robomaze_io::from_json(&json).unwrap();
    assert_eq!(parsed.field, vec![vec![0, 0, 1], vec![2, 0, 0], vec![0, 0, 0]]);
    assert_eq!(parsed.danger_field[1], vec![1, 0, 0]);
    assert_eq!(parsed.safety_field[1], vec![0, 1, 1]);
    assert_eq!(parsed.goal, (2, 2));
    assert_eq!(Maze::from_snapshot(&parsed).unwrap(), maze);
}

#[test]
fn test_snapshot_with_stale_layers_fails_to_load() {
    let maze = MazeBuilder::from_ascii(&["S^.", "...", "..G"]).build_maze();
    let mut snapshot = maze.snapshot();
    // Hazard cleared in the field but still marked in both layers.
    snapshot.field[0][1] = 0;
    let path = temp_path("stale_layers.json");
    robomaze_io::save_snapshot(&snapshot, &path).unwrap();
    let err = robomaze_io::load_maze(&path).unwrap_err();
    std::fs::remove_file(&path).ok();

    match err {
        IoError::Context { source, .. } => assert!(matches!(
            *source,
            IoError::Maze(GridError::MalformedSnapshot(_))
        )),
        other => panic!("unexpected error: {other}"),
    }

    let mut snapshot = maze.snapshot();
    snapshot.safety_field[2][0] = 0;
    assert!(matches!(
        Maze::from_snapshot(&snapshot),
        Err(GridError::MalformedSnapshot(_))
    ));
}

#[test]
fn test_saved_maze_drives_a_run() {
    let maze = MazeBuilder::new(4, 4).with_wall(Coord::new(1, 1)).build_maze();
    let path = temp_path("run.json.gz");
    robomaze_io::save_maze(&maze, &path).unwrap();
    let loaded = robomaze_io::load_maze(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let mut config = AppConfig::default();
    config.simulation.hazard_injection_chance = 0.0;
    config.simulation.seed = Some(3);
    let report = app::run_headless(config, loaded, 100).unwrap();
    assert_eq!(report.agents.len(), 3);
    for agent in &report.agents {
        assert_eq!(agent.phase, AgentPhase::Stopped(StopReason::ReachedGoal));
    }

    let json = robomaze_io::to_json(&report).unwrap();
    let back: RunReport = robomaze_io::from_json(&json).unwrap();
    assert_eq!(back, report);
}

#[test]
fn test_compare_reports_every_engine() {
    let maze = MazeBuilder::from_ascii(&["S...", ".##.", "...G"]).build_maze();
    let mut config = AppConfig::default();
    config.colony.seed = Some(5);
    let report = app::compare(&maze, &config, 5);
    let strategies: Vec<Strategy> = report.results.iter().map(|r| r.strategy).collect();
    assert_eq!(strategies, Strategy::ALL.to_vec());
    let astar = &report.results[0];
    assert!(astar.reached);
    assert_eq!(astar.steps, 5);
    assert!(report.results.iter().all(|r| r.reached));
}

#[test]
fn test_config_from_toml() {
    let config = AppConfig::from_toml(
        r#"
        [maze]
        width = 15
        height = 11

        [colony]
        num_ants = 4
        seed = 9

        [simulation]
        tick_interval_ms = 250
        strategies = ["astar", "fuzzy"]
        "#,
    )
    .unwrap();
    assert_eq!(config.maze.width, 15);
    assert_eq!(config.colony.seed, Some(9));
    assert_eq!(config.simulation.debounce_ticks(), 4);
    assert_eq!(
        config.simulation.strategies,
        vec![Strategy::AStar, Strategy::Fuzzy]
    );

    assert!(AppConfig::from_toml("[agent]\nmin_speed = 4.0").is_err());
    assert!(AppConfig::from_toml("[simulation]\nstrategies = [\"dijkstra\"]").is_err());
}
