pub mod json_api;

pub use json_api::{
    day_request_schema, request_schema, simulate_day, simulate_day_json, simulate_game, simulate_game_json, DayRequest,
    DayResponse, GameOutcome, GameRequest, GameResponse,
};
