use thiserror::Error;

/// Errors raised while setting up or running a single game.
///
/// Contract errors (`InvalidRoster`, `InvalidConfig`) are returned from
/// `GameSim::new` before the first possession. The rest abort only the game
/// that produced them; a batch runner reports them and moves on.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid roster for team {team}: {reason}")]
    InvalidRoster { team: usize, reason: String },

    #[error("invalid league config: {0}")]
    InvalidConfig(String),

    #[error("not enough eligible players on team {team}: need {needed}, found {found}")]
    NotEnoughPlayers { team: usize, needed: usize, found: usize },

    #[error("invalid clock state: {clock} seconds left in period {period}")]
    InvalidClock { clock: f64, period: u32 },

    #[error("invariant violation: {0}")]
    Invariant(String),
}

impl SimError {
    /// True for errors caught by input validation rather than mid-game.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, SimError::InvalidRoster { .. } | SimError::InvalidConfig(_))
    }

    /// Short machine-readable code used by the JSON API.
    pub fn code(&self) -> &'static str {
        match self {
            SimError::InvalidRoster { .. } => "E_INVALID_ROSTER",
            SimError::InvalidConfig(_) => "E_INVALID_CONFIG",
            SimError::NotEnoughPlayers { .. } => "E_NOT_ENOUGH_PLAYERS",
            SimError::InvalidClock { .. } => "E_INVALID_CLOCK",
            SimError::Invariant(_) => "E_INVARIANT",
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_violation_classification() {
        let roster = SimError::InvalidRoster { team: 1, reason: "too few players".into() };
        assert!(roster.is_contract_violation());
        assert!(SimError::InvalidConfig("x".into()).is_contract_violation());
        assert!(!SimError::Invariant("x".into()).is_contract_violation());
        assert!(!SimError::InvalidClock { clock: -1.0, period: 2 }.is_contract_violation());
    }

    #[test]
    fn test_display_includes_context() {
        let err = SimError::NotEnoughPlayers { team: 0, needed: 5, found: 3 };
        assert_eq!(err.to_string(), "not enough eligible players on team 0: need 5, found 3");
        assert_eq!(err.code(), "E_NOT_ENOUGH_PLAYERS");
    }
}
