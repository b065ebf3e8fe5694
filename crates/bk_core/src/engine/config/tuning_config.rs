//! League tuning factors
//!
//! Every factor is a plain multiplier with 1.0 as neutral. They are read-only
//! for the duration of a game.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 리그 튜닝 파라미터
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct TuningConfig {
    /// Multiplies non-shooting foul probability and the shooting-foul rates
    pub foul_rate_factor: f64,
    /// Divides the mean possession length (higher = faster game)
    pub pace_factor: f64,
    /// Multiplies the chance a shooter takes a three
    pub three_point_tendency_factor: f64,
    /// Multiplies three-point make probability
    pub three_point_accuracy_factor: f64,
    /// Multiplies two-point make probability
    pub two_point_accuracy_factor: f64,
    /// Multiplies free throw make probability
    pub ft_accuracy_factor: f64,
    /// Multiplies block probability
    pub block_factor: f64,
    /// Divides the defensive rebound odds (higher = more offensive rebounds)
    pub orb_factor: f64,
    /// Multiplies turnover probability
    pub turnover_factor: f64,
    /// Multiplies steal probability on a turnover
    pub steal_factor: f64,
    /// Multiplies assist probability
    pub assist_factor: f64,
    /// Home court rating boost in percent (기본: 1.0)
    pub home_court_advantage: f64,
    /// Weight of lineup synergy in team composite ratings (기본: 0.1)
    pub synergy_factor: f64,
    /// On-court energy drain per minute before endurance (기본: 0.055)
    pub fatigue_factor: f64,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            foul_rate_factor: 1.0,
            pace_factor: 1.0,
            three_point_tendency_factor: 1.0,
            three_point_accuracy_factor: 1.0,
            two_point_accuracy_factor: 1.0,
            ft_accuracy_factor: 1.0,
            block_factor: 1.0,
            orb_factor: 1.0,
            turnover_factor: 1.0,
            steal_factor: 1.0,
            assist_factor: 1.0,
            home_court_advantage: 1.0,
            synergy_factor: 0.1,
            fatigue_factor: 0.055,
        }
    }
}

impl TuningConfig {
    /// (name, value) pairs for validation and reporting
    pub fn factors(&self) -> [(&'static str, f64); 14] {
        [
            ("foul_rate_factor", self.foul_rate_factor),
            ("pace_factor", self.pace_factor),
            ("three_point_tendency_factor", self.three_point_tendency_factor),
            ("three_point_accuracy_factor", self.three_point_accuracy_factor),
            ("two_point_accuracy_factor", self.two_point_accuracy_factor),
            ("ft_accuracy_factor", self.ft_accuracy_factor),
            ("block_factor", self.block_factor),
            ("orb_factor", self.orb_factor),
            ("turnover_factor", self.turnover_factor),
            ("steal_factor", self.steal_factor),
            ("assist_factor", self.assist_factor),
            ("home_court_advantage", self.home_court_advantage),
            ("synergy_factor", self.synergy_factor),
            ("fatigue_factor", self.fatigue_factor),
        ]
    }
}
