use super::team::TeamInput;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One scheduled game as handed over by the scheduler.
///
/// `teams[0]` is the home side.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct GameInput {
    pub gid: u32,
    pub teams: [TeamInput; 2],
    /// 1.0 = normal home court, 0.0 = neutral site
    #[serde(default = "default_home_court_factor")]
    pub home_court_factor: f64,
    /// Exhibition game (no injuries, a little more shooting)
    #[serde(default)]
    pub all_star_game: bool,
    /// Per-player, per-possession injury probability for a 26-year-old
    #[serde(default)]
    pub base_injury_rate: f64,
    /// Record the narrative event log (stats are computed either way)
    #[serde(default = "default_true")]
    pub do_play_by_play: bool,
}

fn default_home_court_factor() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

impl GameInput {
    pub fn new(gid: u32, home: TeamInput, away: TeamInput) -> Self {
        Self {
            gid,
            teams: [home, away],
            home_court_factor: 1.0,
            all_star_game: false,
            base_injury_rate: 0.0,
            do_play_by_play: true,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.home_court_factor.is_finite() || self.home_court_factor < 0.0 {
            return Err(format!("home_court_factor must be >= 0, got {}", self.home_court_factor));
        }
        if !self.base_injury_rate.is_finite() || !(0.0..=1.0).contains(&self.base_injury_rate) {
            return Err(format!("base_injury_rate must be in [0, 1], got {}", self.base_injury_rate));
        }
        if self.teams[0].id == self.teams[1].id {
            return Err(format!("team {} cannot play itself", self.teams[0].id));
        }
        Ok(())
    }
}
