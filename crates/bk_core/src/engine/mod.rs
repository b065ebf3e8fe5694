pub mod clock;
pub mod config; // LeagueConfig: rules + tuning + elam presets
pub mod events;
pub mod fatigue;
pub mod game_sim;
pub mod ratings; // home court, foul trouble, lineup composites
pub mod rng;
pub mod state;
pub mod synergy;

pub use clock::ClockFactor;
pub use config::{ConfigError, ElamConfig, LeagueConfig, RulesConfig, TuningConfig};
pub use events::{EndOfPeriodReason, EventLog, FoulKind, GameEvent, ScoringPlay, ShotKind};
pub use game_sim::GameSim;
pub use rng::{game_seed, Sampler, ScriptedSampler, SeededSampler};
pub use state::GameState;
