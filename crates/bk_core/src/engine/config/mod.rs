//! # League Configuration
//!
//! 모든 리그 규칙과 튜닝 상수를 한 곳에서 관리하는 설정 시스템.
//!
//! The config is an immutable value handed to `GameSim::new`; nothing in the
//! engine reads tuning from global state.
//!
//! ## 사용법
//! ```rust
//! use bk_core::engine::config::LeagueConfig;
//!
//! let pro = LeagueConfig::default();
//! let fiba = LeagueConfig::fiba();
//! assert!(fiba.rules.fouls_until_foul_out < pro.rules.fouls_until_foul_out);
//! ```

mod elam_config;
mod rules_config;
mod tuning_config;

pub use elam_config::ElamConfig;
pub use rules_config::RulesConfig;
pub use tuning_config::TuningConfig;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("config value out of range: {0}")]
    OutOfRange(String),
}

/// Rules + tuning + optional sudden-target ending
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(default)]
pub struct LeagueConfig {
    pub rules: RulesConfig,
    pub tuning: TuningConfig,
    pub elam: ElamConfig,
}

impl LeagueConfig {
    /// Pro rules (기본)
    pub fn pro() -> Self {
        Self::default()
    }

    pub fn fiba() -> Self {
        Self { rules: RulesConfig::fiba(), ..Self::default() }
    }

    pub fn college() -> Self {
        Self { rules: RulesConfig::college(), ..Self::default() }
    }

    /// Exhibition: pro rules, untimed finish to a target score
    pub fn exhibition() -> Self {
        let mut cfg = Self::default();
        cfg.elam.enabled = true;
        cfg.elam.overtime = true;
        cfg.tuning.three_point_tendency_factor = 1.1;
        cfg
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "pro" => Some(Self::pro()),
            "fiba" => Some(Self::fiba()),
            "college" => Some(Self::college()),
            "exhibition" => Some(Self::exhibition()),
            _ => None,
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_yaml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.rules;
        if r.num_periods == 0 {
            return Err(ConfigError::OutOfRange("num_periods must be >= 1".into()));
        }
        for (name, secs) in [
            ("period_length_secs", r.period_length_secs),
            ("overtime_length_secs", r.overtime_length_secs),
            ("shot_clock_secs", r.shot_clock_secs),
        ] {
            if !secs.is_finite() || secs <= 0.0 {
                return Err(ConfigError::OutOfRange(format!("{name} must be > 0, got {secs}")));
            }
        }
        if r.num_players_on_court == 0 {
            return Err(ConfigError::OutOfRange("num_players_on_court must be >= 1".into()));
        }
        if r.fouls_until_foul_out == 0 {
            return Err(ConfigError::OutOfRange("fouls_until_foul_out must be >= 1".into()));
        }
        if !r.late_game_minutes.is_finite() || r.late_game_minutes < 0.0 {
            return Err(ConfigError::OutOfRange("late_game_minutes must be >= 0".into()));
        }
        for (name, value) in self.tuning.factors() {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::OutOfRange(format!("{name} must be >= 0, got {value}")));
            }
        }
        // These two are divisors.
        if self.tuning.pace_factor == 0.0 || self.tuning.orb_factor == 0.0 {
            return Err(ConfigError::OutOfRange("pace_factor and orb_factor must be > 0".into()));
        }
        if self.elam.enabled && (!self.elam.minutes.is_finite() || self.elam.minutes < 0.0) {
            return Err(ConfigError::OutOfRange("elam.minutes must be >= 0".into()));
        }
        Ok(())
    }
}

// ========== Tests ==========
