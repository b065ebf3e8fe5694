//! Possession loop
//!
//! 한 포제션의 흐름:
//! 1. 공격권 결정 + clock factor
//! 2. 백코트 단계 (턴오버, 아웃오브바운즈, 타임아웃, 파울)
//! 3. 하프코트: 시간 소모 후 슛
//! 4. 리바운드

use super::GameSim;
use crate::engine::clock::{self, ClockFactor, ClockSituation, MIN_SHOT_SECS};
use crate::engine::events::{EndOfPeriodReason, GameEvent};
use crate::engine::fatigue;
use crate::engine::rng::Sampler;
use crate::error::{Result, SimError};
use crate::models::box_score::StatKind;

/// Retained out-of-bounds in the backcourt
const BACKCOURT_OUT_OF_BOUNDS: f64 = 0.02;
/// Loose ball out of bounds after a miss
const REBOUND_OUT_OF_BOUNDS: f64 = 0.04;
/// Nobody is credited with the rebound
const TEAM_REBOUND: f64 = 0.1;
const NON_SHOOTING_FOUL_RATE: f64 = 0.08;

impl<S: Sampler> GameSim<S> {
    pub(crate) fn sim_possession(&mut self) -> Result<()> {
        if self.state.keep_possession {
            self.state.keep_possession = false;
        } else {
            self.state.swap_possession();
            self.state.ball_in_frontcourt = false;
        }
        self.trace_possession();
        self.refresh_composites();

        if !self.state.elam_active() && self.state.clock_secs < MIN_SHOT_SECS {
            self.run_clock(self.state.clock_secs)?;
            self.state.end_period(EndOfPeriodReason::NoShot);
            return Ok(());
        }

        let factor = self.current_clock_factor();
        if factor == ClockFactor::IntentionalFoul {
            self.intentional_foul_possession()?;
        } else {
            let shot_pending = self.state.ball_in_frontcourt || self.backcourt_phase()?;
            if shot_pending {
                self.half_court(factor)?;
            }
        }

        if !self.state.target_reached() && self.check_injuries() {
            self.dead_ball()?;
        }
        Ok(())
    }

    pub(crate) fn current_clock_factor(&self) -> ClockFactor {
        let rules = &self.config.rules;
        let foul_out = rules.fouls_until_foul_out;
        let d = &self.teams[self.state.d];
        let defense_can_foul = d.on_court.iter().any(|&p| d.players[p].stat.pf + 1 < foul_out);
        clock::clock_factor(&ClockSituation {
            clock: self.state.clock_secs,
            shot_clock: rules.shot_clock_secs,
            final_period: self.state.is_final_period(rules.num_periods),
            margin: self.margin(),
            intentional_foul_max_deficit: rules.intentional_foul_max_deficit,
            defense_can_foul,
            elam_active: self.state.elam_active(),
        })
    }

    /// Seconds the offense can use on this trip
    fn available_secs(&self) -> f64 {
        let shot_clock = self.config.rules.shot_clock_secs;
        if self.state.elam_active() {
            shot_clock
        } else {
            self.state.clock_secs.min(shot_clock)
        }
    }

    fn backcourt_secs(&mut self) -> f64 {
        let avail = self.available_secs();
        self.sampler.uniform(1.0, 6.0).min(avail)
    }

    /// Bringing the ball up. Returns true when the offense gets into its
    /// half-court set, false when the possession already ended.
    fn backcourt_phase(&mut self) -> Result<bool> {
        let (o, d) = (self.state.o, self.state.d);
        let tuning = &self.config.tuning;
        let oc = self.teams[o].composite;
        let dc = self.teams[d].composite;
        let handling = oc.dribbling + oc.passing;

        let p_tov = tuning.turnover_factor * 0.13 * (1.0 + dc.defense) / (1.0 + 0.5 * handling);
        let p_foul = NON_SHOOTING_FOUL_RATE * tuning.foul_rate_factor;

        if self.sampler.random() < p_tov {
            let secs = self.backcourt_secs();
            self.run_clock(secs)?;
            self.do_turnover()?;
            return Ok(false);
        }

        if self.sampler.random() < BACKCOURT_OUT_OF_BOUNDS {
            let secs = self.backcourt_secs();
            self.run_clock(secs)?;
            self.out_of_bounds()?;
            return Ok(false);
        }

        let final_period = self.state.is_final_period(self.config.rules.num_periods);
        if clock::wants_advance_timeout(final_period, self.state.clock_secs, self.margin(), self.state.timeouts[o]) {
            self.state.timeouts[o] -= 1;
            self.log.push(GameEvent::Timeout { t: o, advance_ball: true, clock: self.state.clock_secs });
            self.state.ball_in_frontcourt = true;
            self.dead_ball()?;
            return Ok(true);
        }

        if self.sampler.random() < p_foul {
            let secs = self.backcourt_secs();
            self.run_clock(secs)?;
            self.non_shooting_foul(false)?;
            return Ok(false);
        }

        self.state.ball_in_frontcourt = true;
        Ok(true)
    }

    /// Trailing defense fouls as soon as it can
    fn intentional_foul_possession(&mut self) -> Result<()> {
        let mean = self.possession_mean;
        let shot_clock = self.config.rules.shot_clock_secs;
        let clock = self.state.clock_secs;
        let secs = clock::possession_length(&mut self.sampler, ClockFactor::IntentionalFoul, mean, clock, shot_clock, false);
        if secs >= clock {
            self.run_clock(clock)?;
            self.state.end_period(EndOfPeriodReason::IntentionalFoul);
            return Ok(());
        }
        self.run_clock(secs)?;
        self.non_shooting_foul(true)
    }

    fn half_court(&mut self, factor: ClockFactor) -> Result<()> {
        let elam = self.state.elam_active();
        let clock = self.state.clock_secs;
        let shot_clock = self.config.rules.shot_clock_secs;
        let available = self.available_secs();
        if !elam && available < MIN_SHOT_SECS {
            // The backcourt ate the rest of the period.
            let reason = match factor {
                ClockFactor::RunOutClock => EndOfPeriodReason::RunOutClock,
                _ => EndOfPeriodReason::Clock,
            };
            self.run_clock(clock)?;
            self.state.end_period(reason);
            return Ok(());
        }

        let secs = clock::possession_length(&mut self.sampler, factor, self.possession_mean, clock, shot_clock, elam);
        if !elam && factor == ClockFactor::RunOutClock && secs >= clock {
            self.run_clock(clock)?;
            self.state.end_period(EndOfPeriodReason::RunOutClock);
            return Ok(());
        }
        self.run_clock(secs)?;
        self.do_shot(available)
    }

    fn do_turnover(&mut self) -> Result<()> {
        let (o, d) = (self.state.o, self.state.d);
        let blend = self.late_game_blend();
        let oc = self.teams[o].composite;
        let dc = self.teams[d].composite;
        let clock = self.state.clock_secs;

        let loser = self
            .pick_player(o, |p| p.ratings.turnovers * fatigue::fatigue(p.energy, blend), None)
            .ok_or_else(|| SimError::Invariant(format!("team {o} has nobody on the floor")))?;
        let victim = self.teams[o].players[loser].id;
        self.log.push(GameEvent::Tov { t: o, pid: victim, clock });
        self.record_stat(o, Some(loser), StatKind::Tov, 1);

        let handling = (0.5 * (oc.dribbling + oc.passing)).max(0.01);
        let p_steal = self.config.tuning.steal_factor * 0.55 * dc.defense_perimeter / handling;
        if self.sampler.random() < p_steal {
            if let Some(stealer) =
                self.pick_player(d, |p| p.ratings.defense_perimeter * fatigue::fatigue(p.energy, blend), None)
            {
                let pid = self.teams[d].players[stealer].id;
                self.log.push(GameEvent::Stl { t: d, pid, victim, clock });
                self.record_stat(d, Some(stealer), StatKind::Stl, 1);
            }
        }
        self.state.keep_possession = false;
        Ok(())
    }

    /// Offense keeps the ball and inbounds in the frontcourt
    fn out_of_bounds(&mut self) -> Result<()> {
        let o = self.state.o;
        self.log.push(GameEvent::OutOfBounds { t: o, clock: self.state.clock_secs });
        self.state.keep_possession = true;
        self.state.ball_in_frontcourt = true;
        self.dead_ball()
    }

    pub(crate) fn do_rebound(&mut self) -> Result<()> {
        if self.sampler.random() < REBOUND_OUT_OF_BOUNDS {
            return self.out_of_bounds();
        }

        let (o, d) = (self.state.o, self.state.d);
        let oc = self.teams[o].composite;
        let dc = self.teams[d].composite;
        let p_drb = (0.75 * (2.0 + dc.rebounding) / (self.config.tuning.orb_factor * (2.0 + oc.rebounding))).clamp(0.0, 1.0);

        let (t, offensive) = if self.sampler.random() < p_drb { (d, false) } else { (o, true) };
        let rebounder = self.rebounder(t);
        let pid = rebounder.map(|p| self.teams[t].players[p].id);
        self.log.push(GameEvent::Reb { t, pid, offensive, clock: self.state.clock_secs });
        let kind = if offensive { StatKind::Orb } else { StatKind::Drb };
        self.record_stat(t, rebounder, kind, 1);

        self.state.keep_possession = offensive;
        if offensive {
            self.state.ball_in_frontcourt = true;
        }
        Ok(())
    }

    fn rebounder(&mut self, t: usize) -> Option<usize> {
        if self.sampler.random() < TEAM_REBOUND {
            return None;
        }
        let blend = self.late_game_blend();
        let foul_out = self.config.rules.fouls_until_foul_out;
        self.pick_player(
            t,
            |p| {
                crate::engine::ratings::effective_rating(
                    &p.ratings,
                    crate::models::player::RatingKind::Rebounding,
                    p.stat.pf,
                    foul_out,
                ) * fatigue::fatigue(p.energy, blend)
            },
            None,
        )
    }
}
