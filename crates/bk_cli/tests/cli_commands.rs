use bk_cli::{demo_request, load_config, render_config, run_day, run_game, schema, summary_line, Format};
use bk_core::api::DayRequest;
use bk_core::models::{demo_team, GameInput};
use bk_core::LeagueConfig;
use std::fs;
use tempfile::TempDir;

fn write_demo(dir: &TempDir, seed: u64) -> std::path::PathBuf {
    let path = dir.path().join("game.json");
    fs::write(&path, serde_json::to_string(&demo_request(seed)).unwrap()).unwrap();
    path
}

#[test]
fn test_game_from_file_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let input = write_demo(&dir, 7);

    let a = run_game(&input, None).unwrap();
    let b = run_game(&input, None).unwrap();
    assert_eq!(a.determinism_hash, b.determinism_hash);
    assert_eq!(a.result, b.result);
    assert!(summary_line(&a.result).starts_with("Harbor City "));
}

#[test]
fn test_config_file_overrides_request() {
    let dir = TempDir::new().unwrap();
    let input = write_demo(&dir, 7);

    let yaml = dir.path().join("college.yaml");
    fs::write(&yaml, render_config(&LeagueConfig::college(), Format::Yaml).unwrap()).unwrap();
    let config = load_config(&yaml).unwrap();
    assert_eq!(config, LeagueConfig::college());

    let response = run_game(&input, Some(config)).unwrap();
    let halves = response.result.teams[0].stat.pts_qtrs.len() - response.result.overtimes as usize;
    assert_eq!(halves, 2);
}

#[test]
fn test_json_config_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fiba.json");
    fs::write(&path, render_config(&LeagueConfig::fiba(), Format::Json).unwrap()).unwrap();
    assert_eq!(load_config(&path).unwrap(), LeagueConfig::fiba());
}

#[test]
fn test_invalid_config_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.yaml");
    fs::write(&path, "rules:\n  num_periods: 0\n").unwrap();
    let err = load_config(&path).unwrap_err();
    assert!(format!("{err:#}").contains("num_periods"), "{err:#}");
}

#[test]
fn test_day_file_reports_each_game() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("day.json");
    let request = DayRequest {
        schema_version: 1,
        seed: 11,
        games: vec![
            GameInput::new(1, demo_team(1, "A", 0.5), demo_team(2, "B", 0.5)),
            GameInput::new(2, demo_team(3, "C", 0.6), demo_team(4, "D", 0.45)),
        ],
        config: None,
    };
    fs::write(&path, serde_json::to_string(&request).unwrap()).unwrap();

    let out = run_day(&path, None).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let games = value["games"].as_array().unwrap();
    assert_eq!(games.len(), 2);
    assert!(games.iter().all(|g| g["status"] == "played"));
}

#[test]
fn test_missing_input_has_context() {
    let dir = TempDir::new().unwrap();
    let err = run_game(&dir.path().join("nope.json"), None).unwrap_err();
    assert!(err.to_string().contains("Failed to read request"));
}

#[test]
fn test_schema_output() {
    let game: serde_json::Value = serde_json::from_str(&schema(false).unwrap()).unwrap();
    assert!(game["properties"]["game"].is_object());
    let day: serde_json::Value = serde_json::from_str(&schema(true).unwrap()).unwrap();
    assert!(day["properties"]["games"].is_object());
}
