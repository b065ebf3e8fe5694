//! Game state value
//!
//! 점유권, 시계, 팀 파울, 타임아웃, Elam 타깃을 담는 상태 값.
//! Scores live in the team box scores; everything else about "where are we in
//! the game" lives here.

use super::clock::LAST_TWO_MINUTES_SECS;
use super::events::EndOfPeriodReason;
use crate::engine::config::RulesConfig;
use crate::error::{Result, SimError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElamState {
    pub target: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Offense team index
    pub o: usize,
    /// Defense team index
    pub d: usize,
    pub clock_secs: f64,
    /// 1-based, overtime periods continue the count
    pub period: u32,
    pub overtimes: u32,
    pub fouls_this_period: [u32; 2],
    pub fouls_last_two_minutes: [u32; 2],
    pub timeouts: [u32; 2],
    pub elam: Option<ElamState>,
    pub ball_in_frontcourt: bool,
    /// Team that won the opening jump ball
    pub possession_arrow: usize,
    /// Offense keeps the ball on the next possession (offensive rebound, etc.)
    pub keep_possession: bool,
    /// Set when the current period has ended
    pub end_reason: Option<EndOfPeriodReason>,
}

impl GameState {
    pub fn new(rules: &RulesConfig) -> Self {
        Self {
            o: 0,
            d: 1,
            clock_secs: rules.period_length_secs,
            period: 1,
            overtimes: 0,
            fouls_this_period: [0; 2],
            fouls_last_two_minutes: [0; 2],
            timeouts: [rules.timeouts; 2],
            elam: None,
            ball_in_frontcourt: false,
            possession_arrow: 0,
            keep_possession: false,
            end_reason: None,
        }
    }

    pub fn is_overtime(&self) -> bool {
        self.overtimes > 0
    }

    /// Final regulation period or any overtime
    pub fn is_final_period(&self, num_periods: u32) -> bool {
        self.period >= num_periods
    }

    pub fn in_last_two_minutes(&self) -> bool {
        self.clock_secs <= LAST_TWO_MINUTES_SECS
    }

    pub fn elam_active(&self) -> bool {
        self.elam.is_some()
    }

    /// Give the ball to `t`
    pub fn set_offense(&mut self, t: usize) {
        self.o = t;
        self.d = 1 - t;
    }

    pub fn swap_possession(&mut self) {
        self.set_offense(self.d);
    }

    /// Is team `t` shooting bonus free throws on the next non-shooting foul
    /// against it? Counts are the fouling team's, before the new foul.
    pub fn in_bonus(&self, fouling_team: usize, fouls_until_bonus: [u32; 3]) -> bool {
        let limit = if self.is_overtime() { fouls_until_bonus[1] } else { fouls_until_bonus[0] };
        self.fouls_this_period[fouling_team] >= limit
            || (self.in_last_two_minutes()
                && self.fouls_last_two_minutes[fouling_team] >= fouls_until_bonus[2])
    }

    /// Count a team foul for `fouling_team`
    pub fn record_team_foul(&mut self, fouling_team: usize) {
        self.fouls_this_period[fouling_team] += 1;
        if self.in_last_two_minutes() {
            self.fouls_last_two_minutes[fouling_team] += 1;
        }
    }

    /// Run `secs` off the game clock. Under the sudden-target ending the clock stands still.
    pub fn advance_clock(&mut self, secs: f64) -> Result<f64> {
        if !secs.is_finite() || secs < 0.0 {
            return Err(SimError::InvalidClock { clock: self.clock_secs - secs, period: self.period });
        }
        if self.elam_active() {
            return Ok(0.0);
        }
        let used = secs.min(self.clock_secs);
        self.clock_secs -= used;
        if self.clock_secs < 1e-9 {
            self.clock_secs = 0.0;
        }
        Ok(used)
    }

    /// Reset per-period counters and the clock for the next period
    pub fn start_period(&mut self, period: u32, length_secs: f64, overtime: bool) {
        self.period = period;
        if overtime {
            self.overtimes += 1;
        }
        self.clock_secs = length_secs;
        self.fouls_this_period = [0; 2];
        self.fouls_last_two_minutes = [0; 2];
        self.ball_in_frontcourt = false;
        self.keep_possession = false;
        self.end_reason = None;
    }

    pub fn end_period(&mut self, reason: EndOfPeriodReason) {
        self.clock_secs = 0.0;
        self.end_reason = Some(reason);
    }

    /// Sudden-target score reached; nothing else happens this game
    pub fn target_reached(&self) -> bool {
        self.end_reason == Some(EndOfPeriodReason::ElamTarget)
    }

    pub fn period_over(&self) -> bool {
        self.end_reason.is_some() || (self.clock_secs <= 0.0 && !self.elam_active())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bonus_uses_fouling_team_counts() {
        let rules = RulesConfig::default();
        let mut st = GameState::new(&rules);
        st.fouls_this_period = [5, 1];
        assert!(st.in_bonus(0, rules.fouls_until_bonus));
        assert!(!st.in_bonus(1, rules.fouls_until_bonus));
    }

    #[test]
    fn test_bonus_last_two_minutes() {
        let rules = RulesConfig::default();
        let mut st = GameState::new(&rules);
        st.clock_secs = 100.0;
        st.record_team_foul(1);
        assert!(!st.in_bonus(1, rules.fouls_until_bonus));
        st.record_team_foul(1);
        assert!(st.in_bonus(1, rules.fouls_until_bonus));
        assert_eq!(st.fouls_this_period[1], 2);
    }

    #[test]
    fn test_overtime_bonus_limit() {
        let rules = RulesConfig::default();
        let mut st = GameState::new(&rules);
        st.start_period(5, rules.overtime_length_secs, true);
        st.fouls_this_period = [4, 3];
        assert!(st.in_bonus(0, rules.fouls_until_bonus));
        assert!(!st.in_bonus(1, rules.fouls_until_bonus));
    }

    #[test]
    fn test_advance_clock_floors_at_zero() {
        let mut st = GameState::new(&RulesConfig::default());
        st.clock_secs = 5.0;
        assert_eq!(st.advance_clock(8.0).unwrap(), 5.0);
        assert_eq!(st.clock_secs, 0.0);
        assert!(st.period_over());
        assert!(st.advance_clock(-1.0).is_err());
        assert!(st.advance_clock(f64::NAN).is_err());
    }

    #[test]
    fn test_elam_freezes_clock() {
        let mut st = GameState::new(&RulesConfig::default());
        st.clock_secs = 200.0;
        st.elam = Some(ElamState { target: 100 });
        assert_eq!(st.advance_clock(20.0).unwrap(), 0.0);
        assert_eq!(st.clock_secs, 200.0);
    }

    #[test]
    fn test_start_period_resets_counters() {
        let rules = RulesConfig::default();
        let mut st = GameState::new(&rules);
        st.fouls_this_period = [3, 4];
        st.end_period(EndOfPeriodReason::Clock);
        st.start_period(2, rules.period_length_secs, false);
        assert_eq!(st.fouls_this_period, [0, 0]);
        assert_eq!(st.clock_secs, 720.0);
        assert!(!st.period_over());
        assert_eq!(st.overtimes, 0);
    }
}
