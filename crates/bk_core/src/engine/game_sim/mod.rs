//! # Game Simulation
//!
//! 포제션 단위 경기 시뮬레이터.
//!
//! `GameSim` owns both sides, the [`GameState`], the event log and the
//! sampler. The transitions are split by concern:
//!
//! - `possession.rs`: possession loop, backcourt phase, rebounds
//! - `shot.rs`: shot selection and resolution
//! - `fouls.rs`: fouls, bonus, free throws
//! - `substitutions.rs`: dead-ball lineup updates
//! - `stats.rs`: stat recording, injuries, composites
//! - `clutch.rs`: clutch plays and the shootout
//!
//! ```rust
//! use bk_core::engine::config::LeagueConfig;
//! use bk_core::engine::game_sim::GameSim;
//! use bk_core::engine::rng::SeededSampler;
//! use bk_core::models::{demo_team, GameInput};
//!
//! let input = GameInput::new(1, demo_team(1, "Home", 0.55), demo_team(2, "Away", 0.5));
//! let sim = GameSim::new(&input, LeagueConfig::default(), SeededSampler::new(7)).unwrap();
//! let result = sim.run().unwrap();
//! assert!(result.teams[0].pts != result.teams[1].pts || result.shootout.is_some());
//! ```

mod clutch;
mod fouls;
mod players;
mod possession;
mod shot;
mod stats;
mod substitutions;

#[cfg(test)]
mod invariant_tests;

pub use clutch::ClutchTracker;
pub use players::{PlayerInGame, TeamInGame};
pub use shot::{select_shot, ShotProfile};

use self::substitutions::Stoppage;
use super::clock::{self, MAX_POSSESSIONS_PER_PERIOD};
use super::config::LeagueConfig;
use super::events::{EndOfPeriodReason, EventLog, GameEvent};
use super::fatigue;
use super::ratings::home_court_modifier;
use super::rng::Sampler;
use super::state::{ElamState, GameState};
use crate::error::{Result, SimError};
use crate::models::game_input::GameInput;
use crate::models::game_result::GameResult;
use tracing::{debug, trace};

/// Overtime periods allowed before an unresolved game is reported as broken
const OVERTIME_CEILING: u32 = 100;

pub struct GameSim<S: Sampler> {
    gid: u32,
    config: LeagueConfig,
    teams: [TeamInGame; 2],
    state: GameState,
    log: EventLog,
    sampler: S,
    base_injury_rate: f64,
    all_star_game: bool,
    starters_recorded: bool,
    /// Mean possession length in seconds
    possession_mean: f64,
    clutch: ClutchTracker,
    shootout: Option<[u32; 2]>,
    stoppages: [Stoppage; 2],
}

impl<S: Sampler> GameSim<S> {
    /// Validate inputs and build the per-game sides.
    ///
    /// Contract violations (bad config, invalid rosters) are rejected here,
    /// before the first possession.
    pub fn new(input: &GameInput, config: LeagueConfig, sampler: S) -> Result<Self> {
        config.validate().map_err(|e| SimError::InvalidConfig(e.to_string()))?;
        input.validate().map_err(SimError::InvalidConfig)?;

        let n = config.rules.num_players_on_court;
        for (t, team) in input.teams.iter().enumerate() {
            team.validate(n).map_err(|reason| SimError::InvalidRoster { team: t, reason })?;
        }

        let modifier = home_court_modifier(input.home_court_factor, config.tuning.home_court_advantage);
        let teams = [
            TeamInGame::from_input(&input.teams[0], n, modifier, true),
            TeamInGame::from_input(&input.teams[1], n, modifier, false),
        ];
        let avg_pace = (teams[0].pace + teams[1].pace) / 2.0;
        let possession_mean = clock::mean_possession_secs(avg_pace, config.tuning.pace_factor);

        Ok(Self {
            gid: input.gid,
            state: GameState::new(&config.rules),
            log: EventLog::new(input.do_play_by_play),
            teams,
            sampler,
            base_injury_rate: input.base_injury_rate,
            all_star_game: input.all_star_game,
            starters_recorded: false,
            possession_mean,
            clutch: ClutchTracker::default(),
            shootout: None,
            stoppages: Default::default(),
            config,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn teams(&self) -> &[TeamInGame; 2] {
        &self.teams
    }

    pub fn events(&self) -> &[GameEvent] {
        self.log.events()
    }

    /// Simulate the whole game and build the box score.
    pub fn run(mut self) -> Result<GameResult> {
        debug!(gid = self.gid, home = %self.teams[0].name, away = %self.teams[1].name, "game start");

        let num_periods = self.config.rules.num_periods;
        for period in 1..=num_periods {
            self.begin_regulation_period(period)?;
            self.sim_period()?;
        }
        if self.is_tied() {
            self.record_game_tying_play();
        }

        while self.is_tied() && self.config.rules.max_overtimes.map_or(true, |max| self.state.overtimes < max) {
            if self.state.overtimes >= OVERTIME_CEILING {
                return Err(SimError::Invariant(format!(
                    "game {} still tied after {} overtimes",
                    self.gid, self.state.overtimes
                )));
            }
            self.begin_overtime()?;
            self.sim_period()?;
            if self.is_tied() {
                self.record_game_tying_play();
            }
        }

        if self.is_tied() {
            self.run_shootout()?;
        } else {
            self.record_game_winner();
        }

        let pts = [self.teams[0].pts(), self.teams[1].pts()];
        self.log.push(GameEvent::GameOver { pts, shootout: self.shootout });
        debug!(gid = self.gid, ?pts, overtimes = self.state.overtimes, "game over");

        self.finish()
    }

    fn is_tied(&self) -> bool {
        self.teams[0].pts() == self.teams[1].pts()
    }

    /// Offense minus defense
    fn margin(&self) -> i32 {
        self.teams[self.state.o].pts() as i32 - self.teams[self.state.d].pts() as i32
    }

    fn begin_regulation_period(&mut self, period: u32) -> Result<()> {
        let num_periods = self.config.rules.num_periods;
        if period > 1 {
            self.state.start_period(period, self.config.rules.period_length_secs, false);
        }
        self.open_period_box();
        self.log.push(GameEvent::Period { period, clock: self.state.clock_secs });

        if period == 1 {
            let winner = self.jump_ball();
            self.state.possession_arrow = winner;
        } else {
            let arrow = self.state.possession_arrow;
            let team = if clock::starts_with_possession(period, num_periods) { arrow } else { 1 - arrow };
            self.state.set_offense(team);
        }
        self.state.keep_possession = true;
        self.dead_ball()
    }

    fn begin_overtime(&mut self) -> Result<()> {
        let period = self.state.period + 1;
        self.state.start_period(period, self.config.rules.overtime_length_secs, true);
        self.open_period_box();
        debug!(gid = self.gid, overtime = self.state.overtimes, "overtime");
        self.log.push(GameEvent::Overtime {
            period,
            overtime: self.state.overtimes,
            clock: self.state.clock_secs,
        });

        self.jump_ball();
        self.state.keep_possession = true;
        if self.config.elam.enabled && self.config.elam.overtime {
            self.activate_elam();
        }
        self.dead_ball()
    }

    fn open_period_box(&mut self) {
        for team in &mut self.teams {
            team.stat.pts_qtrs.push(0);
        }
        self.clutch.reset_period();
    }

    /// Opening tip between the best jumpers on the floor. Returns the winner.
    fn jump_ball(&mut self) -> usize {
        let best = |team: &TeamInGame| {
            team.on_court
                .iter()
                .copied()
                .max_by(|&a, &b| {
                    let ra = team.players[a].ratings.jump_ball;
                    let rb = team.players[b].ratings.jump_ball;
                    ra.total_cmp(&rb)
                })
                .unwrap_or(0)
        };
        let jumpers = [best(&self.teams[0]), best(&self.teams[1])];
        let r0 = self.teams[0].players[jumpers[0]].ratings.jump_ball;
        let r1 = self.teams[1].players[jumpers[1]].ratings.jump_ball;
        let p0 = if r0 + r1 > 0.0 { r0 / (r0 + r1) } else { 0.5 };
        let winner = if self.sampler.random() < p0 { 0 } else { 1 };

        self.log.push(GameEvent::JumpBall {
            t: winner,
            pid: self.teams[winner].players[jumpers[winner]].id,
            clock: self.state.clock_secs,
        });
        self.state.set_offense(winner);
        winner
    }

    fn sim_period(&mut self) -> Result<()> {
        let mut possessions = 0;
        while !self.state.period_over() {
            possessions += 1;
            if possessions > MAX_POSSESSIONS_PER_PERIOD {
                return Err(SimError::Invariant(format!(
                    "period {} exceeded {} possessions",
                    self.state.period, MAX_POSSESSIONS_PER_PERIOD
                )));
            }
            self.maybe_activate_elam();
            let before = self.state.clock_secs;
            self.sim_possession()?;
            if self.state.clock_secs > before {
                return Err(SimError::InvalidClock { clock: self.state.clock_secs, period: self.state.period });
            }
        }

        let reason = self.state.end_reason.unwrap_or(EndOfPeriodReason::Clock);
        self.state.end_period(reason);
        self.log.push(GameEvent::EndOfPeriod { period: self.state.period, reason, clock: 0.0 });
        Ok(())
    }

    /// Final regulation period: switch to the target score once the clock
    /// drops into the window.
    fn maybe_activate_elam(&mut self) {
        let elam = &self.config.elam;
        if !elam.enabled || self.state.elam_active() || self.state.is_overtime() {
            return;
        }
        if self.state.period == self.config.rules.num_periods && self.state.clock_secs <= elam.minutes * 60.0 {
            self.activate_elam();
        }
    }

    fn activate_elam(&mut self) {
        let lead = self.teams[0].pts().max(self.teams[1].pts());
        let target = lead + self.config.elam.points;
        debug!(gid = self.gid, target, "sudden-target ending active");
        self.state.elam = Some(ElamState { target });
        self.log.push(GameEvent::ElamActive { target, clock: self.state.clock_secs });
    }

    /// Rating multiplier for a player's current energy, with the late-game blend
    fn fatigue_of(&self, energy: f64) -> f64 {
        fatigue::fatigue(energy, self.late_game_blend())
    }

    fn late_game_blend(&self) -> Option<f64> {
        clock::late_game_blend(
            self.state.period,
            self.config.rules.num_periods,
            self.state.clock_secs,
            self.config.rules.late_game_minutes,
            self.state.elam_active(),
        )
    }

    fn finish(self) -> Result<GameResult> {
        let foul_out = self.config.rules.fouls_until_foul_out;
        for (t, team) in self.teams.iter().enumerate() {
            let from_players: u32 = team.players.iter().map(|p| p.stat.pts).sum();
            let from_periods: u32 = team.stat.pts_qtrs.iter().sum();
            if from_players != team.pts() || from_periods != team.pts() {
                return Err(SimError::Invariant(format!(
                    "team {t} points mismatch: box {} players {from_players} periods {from_periods}",
                    team.pts()
                )));
            }
        }

        let winner = match self.shootout {
            Some(s) if s[0] != s[1] => usize::from(s[1] > s[0]),
            Some(_) => return Err(SimError::Invariant("shootout ended tied".into())),
            None if !self.is_tied() => usize::from(self.teams[1].pts() > self.teams[0].pts()),
            None => return Err(SimError::Invariant("game ended tied".into())),
        };

        let clutch_plays = self.clutch.into_plays();
        let (events, scoring_summary) = self.log.finish();
        let [home, away] = &self.teams;
        Ok(GameResult {
            gid: self.gid,
            overtimes: self.state.overtimes,
            teams: [home.to_box(winner == 0, foul_out), away.to_box(winner == 1, foul_out)],
            winner,
            shootout: self.shootout,
            events,
            scoring_summary,
            clutch_plays,
        })
    }

    fn trace_possession(&self) {
        trace!(
            gid = self.gid,
            period = self.state.period,
            clock = self.state.clock_secs,
            o = self.state.o,
            score = ?[self.teams[0].pts(), self.teams[1].pts()],
            "possession"
        );
    }
}
