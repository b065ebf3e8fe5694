//! # JSON API
//!
//! 스케줄러/프론트엔드가 호출하는 JSON 진입점.
//!
//! Errors cross the boundary as `"<CODE>: <message>"` strings so callers in
//! other runtimes can branch on the code prefix.

use crate::engine::config::LeagueConfig;
use crate::engine::game_sim::GameSim;
use crate::engine::rng::{game_seed, SeededSampler};
use crate::error::SimError;
use crate::models::{GameInput, GameResult};
use rayon::prelude::*;
use schemars::schema::RootSchema;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const E_INVALID_JSON: &str = "E_INVALID_JSON";
pub const E_SCHEMA_VERSION: &str = "E_SCHEMA_VERSION";
pub const E_SERIALIZE: &str = "E_SERIALIZE";

fn err_code(code: &str, message: impl std::fmt::Display) -> String {
    format!("{code}: {message}")
}

fn check_schema_version(version: u8) -> Result<(), String> {
    if version == crate::SCHEMA_VERSION {
        Ok(())
    } else {
        Err(err_code(E_SCHEMA_VERSION, format!("unsupported schema version: {version}")))
    }
}

/// One game. `config` falls back to the pro preset.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GameRequest {
    pub schema_version: u8,
    pub seed: u64,
    pub game: GameInput,
    #[serde(default)]
    pub config: Option<LeagueConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GameResponse {
    pub schema_version: u8,
    pub engine_version: String,
    pub determinism_hash: String,
    pub result: GameResult,
}

/// A day of games sharing one league config and one base seed
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DayRequest {
    pub schema_version: u8,
    pub seed: u64,
    pub games: Vec<GameInput>,
    #[serde(default)]
    pub config: Option<LeagueConfig>,
}

/// Per-game entry of a day. A failed game does not stop the others.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum GameOutcome {
    Played {
        determinism_hash: String,
        result: GameResult,
    },
    Failed {
        gid: u32,
        code: String,
        message: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DayResponse {
    pub schema_version: u8,
    pub engine_version: String,
    pub games: Vec<GameOutcome>,
}

/// Play one game with its own seed derived from `seed` and the game id.
///
/// A game simulated here is identical to the same game inside [`simulate_day`].
pub fn simulate_game(seed: u64, game: &GameInput, config: &LeagueConfig) -> Result<GameResult, SimError> {
    let sampler = SeededSampler::new(game_seed(seed, game.gid));
    GameSim::new(game, config.clone(), sampler)?.run()
}

/// Play every game of a day in parallel. Results keep the input order.
pub fn simulate_day(seed: u64, games: &[GameInput], config: &LeagueConfig) -> Vec<Result<GameResult, SimError>> {
    debug!(games = games.len(), seed, "simulating day");
    games
        .par_iter()
        .map(|game| {
            let result = simulate_game(seed, game, config);
            if let Err(e) = &result {
                warn!(gid = game.gid, code = e.code(), error = %e, "game failed");
            }
            result
        })
        .collect()
}

pub fn simulate_game_json(request_json: &str) -> Result<String, String> {
    let request: GameRequest =
        serde_json::from_str(request_json).map_err(|e| err_code(E_INVALID_JSON, e))?;
    check_schema_version(request.schema_version)?;

    let config = request.config.unwrap_or_default();
    let result = simulate_game(request.seed, &request.game, &config).map_err(|e| err_code(e.code(), e))?;
    info!(gid = result.gid, score = ?result.score(), overtimes = result.overtimes, "game simulated");

    let response = GameResponse {
        schema_version: crate::SCHEMA_VERSION,
        engine_version: crate::VERSION.to_string(),
        determinism_hash: result.determinism_hash(),
        result,
    };
    serde_json::to_string(&response).map_err(|e| err_code(E_SERIALIZE, e))
}

pub fn simulate_day_json(request_json: &str) -> Result<String, String> {
    let request: DayRequest = serde_json::from_str(request_json).map_err(|e| err_code(E_INVALID_JSON, e))?;
    check_schema_version(request.schema_version)?;

    let config = request.config.unwrap_or_default();
    let outcomes = simulate_day(request.seed, &request.games, &config);
    let games: Vec<GameOutcome> = request
        .games
        .iter()
        .zip(outcomes)
        .map(|(game, outcome)| match outcome {
            Ok(result) => GameOutcome::Played { determinism_hash: result.determinism_hash(), result },
            Err(e) => GameOutcome::Failed { gid: game.gid, code: e.code().to_string(), message: e.to_string() },
        })
        .collect();

    let failed = games.iter().filter(|g| matches!(g, GameOutcome::Failed { .. })).count();
    info!(games = games.len(), failed, "day simulated");

    let response = DayResponse {
        schema_version: crate::SCHEMA_VERSION,
        engine_version: crate::VERSION.to_string(),
        games,
    };
    serde_json::to_string(&response).map_err(|e| err_code(E_SERIALIZE, e))
}

/// JSON Schema of [`GameRequest`]
pub fn request_schema() -> RootSchema {
    schema_for!(GameRequest)
}

/// JSON Schema of [`DayRequest`]
pub fn day_request_schema() -> RootSchema {
    schema_for!(DayRequest)
}
