//! bk_sim command library
//!
//! 파일 입출력과 설정 로딩을 담당하고, 시뮬레이션은 전부 `bk_core`에 맡긴다.

use anyhow::{anyhow, bail, Context, Result};
use bk_core::api::{
    day_request_schema, request_schema, simulate_day_json, simulate_game, DayRequest, GameRequest, GameResponse,
};
use bk_core::models::{demo_team, GameInput, GameResult};
use bk_core::LeagueConfig;
use std::fs;
use std::path::Path;
use tracing::info;

/// Output format for config dumps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Format::Yaml,
            _ => Format::Json,
        }
    }
}

/// Load a league config from a `.json`, `.yaml` or `.yml` file
pub fn load_config(path: &Path) -> Result<LeagueConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config = match Format::from_path(path) {
        Format::Yaml => LeagueConfig::from_yaml_str(&text),
        Format::Json => LeagueConfig::from_json_str(&text),
    }
    .with_context(|| format!("Invalid config: {}", path.display()))?;
    Ok(config)
}

/// Named preset, or an error listing the valid names
pub fn preset(name: &str) -> Result<LeagueConfig> {
    LeagueConfig::preset(name).ok_or_else(|| anyhow!("unknown preset '{name}' (expected pro, fiba, college or exhibition)"))
}

pub fn render_config(config: &LeagueConfig, format: Format) -> Result<String> {
    Ok(match format {
        Format::Json => serde_json::to_string_pretty(config)?,
        Format::Yaml => config.to_yaml_string()?,
    })
}

/// Run the game request in `input`. `config` replaces the request's own config.
pub fn run_game(input: &Path, config: Option<LeagueConfig>) -> Result<GameResponse> {
    let text = fs::read_to_string(input).with_context(|| format!("Failed to read request: {}", input.display()))?;
    let request: GameRequest =
        serde_json::from_str(&text).with_context(|| format!("Invalid game request: {}", input.display()))?;
    if request.schema_version != bk_core::SCHEMA_VERSION {
        bail!("unsupported schema version: {}", request.schema_version);
    }

    let config = config.or(request.config).unwrap_or_default();
    let result = simulate_game(request.seed, &request.game, &config).map_err(|e| anyhow!("{}: {e}", e.code()))?;
    let determinism_hash = result.determinism_hash();
    info!(gid = result.gid, hash = %determinism_hash, "game finished");

    Ok(GameResponse {
        schema_version: bk_core::SCHEMA_VERSION,
        engine_version: bk_core::VERSION.to_string(),
        determinism_hash,
        result,
    })
}

/// Run the day request in `input` and return the response JSON
pub fn run_day(input: &Path, config: Option<LeagueConfig>) -> Result<String> {
    let text = fs::read_to_string(input).with_context(|| format!("Failed to read request: {}", input.display()))?;
    let mut request: DayRequest =
        serde_json::from_str(&text).with_context(|| format!("Invalid day request: {}", input.display()))?;
    if request.games.is_empty() {
        bail!("day request has no games");
    }
    if config.is_some() {
        request.config = config;
    }
    simulate_day_json(&serde_json::to_string(&request)?).map_err(|e| anyhow!(e))
}

pub fn schema(day: bool) -> Result<String> {
    let schema = if day { day_request_schema() } else { request_schema() };
    Ok(serde_json::to_string_pretty(&schema)?)
}

/// Ready-to-run request between two generated teams
pub fn demo_request(seed: u64) -> GameRequest {
    GameRequest {
        schema_version: bk_core::SCHEMA_VERSION,
        seed,
        game: GameInput::new(1, demo_team(1, "Harbor City", 0.55), demo_team(2, "Ridgeview", 0.5)),
        config: None,
    }
}

/// One-line final score, e.g. `Harbor City 104 - 99 Ridgeview (OT)`
pub fn summary_line(result: &GameResult) -> String {
    let [home, away] = &result.teams;
    let mut line = format!("{} {} - {} {}", home.name, home.pts, away.pts, away.name);
    match result.overtimes {
        0 => {}
        1 => line.push_str(" (OT)"),
        n => line.push_str(&format!(" ({n}OT)")),
    }
    if let Some([h, a]) = result.shootout {
        line.push_str(&format!(" [shootout {h}-{a}]"));
    }
    line
}

/// Top scorers per side for the console summary
pub fn box_score_text(result: &GameResult) -> String {
    let mut out = summary_line(result);
    out.push('\n');
    for team in &result.teams {
        let quarters: Vec<String> = team.stat.pts_qtrs.iter().map(|p| p.to_string()).collect();
        out.push_str(&format!("\n{} ({})\n", team.name, quarters.join(" ")));
        let mut players: Vec<_> = team.players.iter().filter(|p| p.stat.min > 0.0).collect();
        players.sort_by(|a, b| b.stat.pts.cmp(&a.stat.pts));
        for p in players.iter().take(5) {
            out.push_str(&format!(
                "  {:<24} {:>5.1} min {:>3} pts {:>3} reb {:>3} ast\n",
                p.name,
                p.stat.min,
                p.stat.pts,
                p.stat.trb(),
                p.stat.ast
            ));
        }
    }
    out
}

/// Write `text` to `out`, or print it when no path is given
pub fn emit(text: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), bytes = text.len(), "output written");
        }
        None => println!("{text}"),
    }
    Ok(())
}
