//! Game rules (periods, clock, fouls, overtime)

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 경기 규칙 파라미터
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct RulesConfig {
    /// Regulation periods (기본: 4 quarters)
    pub num_periods: u32,
    /// Regulation period length in seconds (기본: 720 = 12 min)
    pub period_length_secs: f64,
    /// Overtime period length in seconds (기본: 300 = 5 min)
    pub overtime_length_secs: f64,
    /// Shot clock in seconds (기본: 24)
    pub shot_clock_secs: f64,
    /// Players per side on the floor (기본: 5)
    pub num_players_on_court: usize,
    /// Personal fouls that disqualify a player (기본: 6)
    pub fouls_until_foul_out: u32,
    /// Team fouls before the bonus: [regulation period, overtime, last two minutes]
    pub fouls_until_bonus: [u32; 3],
    /// Timeouts per team per game (기본: 7)
    pub timeouts: u32,
    /// Overtime periods before the shootout decides it. `None` = play overtime until untied.
    pub max_overtimes: Option<u32>,
    /// Guaranteed shootout rounds before sudden death (기본: 5)
    pub shootout_rounds: u32,
    /// Late-game window in minutes: fatigue matters less and foul trouble is ignored
    pub late_game_minutes: f64,
    /// Largest deficit at which the trailing defense fouls on purpose (기본: 6)
    pub intentional_foul_max_deficit: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            num_periods: 4,
            period_length_secs: 720.0,
            overtime_length_secs: 300.0,
            shot_clock_secs: 24.0,
            num_players_on_court: 5,
            fouls_until_foul_out: 6,
            fouls_until_bonus: [5, 4, 2],
            timeouts: 7,
            max_overtimes: None,
            shootout_rounds: 5,
            late_game_minutes: 3.0,
            intentional_foul_max_deficit: 6,
        }
    }
}

impl RulesConfig {
    /// FIBA: 4x10 min, penalty after 4 team fouls, foul out on 5
    pub fn fiba() -> Self {
        Self {
            period_length_secs: 600.0,
            fouls_until_foul_out: 5,
            fouls_until_bonus: [4, 4, 4],
            timeouts: 5,
            ..Self::default()
        }
    }

    /// College: 2x20 min halves, 30 s shot clock
    pub fn college() -> Self {
        Self {
            num_periods: 2,
            period_length_secs: 1200.0,
            shot_clock_secs: 30.0,
            fouls_until_foul_out: 5,
            fouls_until_bonus: [6, 6, 6],
            timeouts: 4,
            ..Self::default()
        }
    }

    /// Total regulation length in seconds
    pub fn regulation_secs(&self) -> f64 {
        self.num_periods as f64 * self.period_length_secs
    }
}
