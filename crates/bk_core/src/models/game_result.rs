use super::box_score::{StatLine, TeamStatLine};
use super::player::Position;
use crate::engine::events::{GameEvent, ScoringPlay};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PlayerBox {
    pub pid: u32,
    pub name: String,
    pub pos: Position,
    pub stat: StatLine,
    /// Energy left at the final buzzer
    pub energy: f64,
    /// Got hurt during this game
    pub injured: bool,
    pub fouled_out: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TeamBox {
    pub tid: u32,
    pub name: String,
    pub pts: u32,
    pub won: bool,
    pub stat: TeamStatLine,
    pub players: Vec<PlayerBox>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ClutchKind {
    GameTying,
    GameWinner,
}

/// Late, close scoring play worth a notification.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ClutchPlay {
    pub kind: ClutchKind,
    pub text: String,
    pub pids: Vec<u32>,
    pub tids: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct GameResult {
    pub gid: u32,
    pub overtimes: u32,
    /// [home, away]
    pub teams: [TeamBox; 2],
    /// Index into `teams` of the winner
    pub winner: usize,
    /// Shootout makes, when regulation and overtime could not separate the sides
    pub shootout: Option<[u32; 2]>,
    /// Omitted when play-by-play was disabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<GameEvent>>,
    pub scoring_summary: Vec<ScoringPlay>,
    pub clutch_plays: Vec<ClutchPlay>,
}

impl GameResult {
    pub fn score(&self) -> [u32; 2] {
        [self.teams[0].pts, self.teams[1].pts]
    }

    pub fn loser(&self) -> usize {
        1 - self.winner
    }

    /// SHA-256 over the serialized result (box score + events).
    ///
    /// Two runs with the same inputs and seed must hash identically.
    pub fn determinism_hash(&self) -> String {
        let mut hasher = Sha256::new();
        // Serializing plain data structs cannot fail.
        if let Ok(bytes) = serde_json::to_vec(self) {
            hasher.update(&bytes);
        }
        format!("{:x}", hasher.finalize())
    }
}
