//! Input rosters and output box scores

pub mod box_score;
pub mod game_input;
pub mod game_result;
pub mod player;
pub mod team;

pub use box_score::{StatKind, StatLine, TeamStatLine};
pub use game_input::GameInput;
pub use game_result::{ClutchKind, ClutchPlay, GameResult, PlayerBox, TeamBox};
pub use player::{CompositeRatings, InjuryStatus, PlayerInput, Position, RatingKind};
pub use team::{demo_team, TeamInput};
