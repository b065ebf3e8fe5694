//! Stat recording, playing time, injuries and team composites

use super::GameSim;
use crate::engine::events::{EndOfPeriodReason, GameEvent, ScoringPlay, ShotKind};
use crate::engine::fatigue::{self, injury_rate};
use crate::engine::rng::Sampler;
use crate::error::Result;
use crate::models::box_score::StatKind;
use tracing::debug;

impl<S: Sampler> GameSim<S> {
    /// Record a stat delta for team `t` and optionally player `p` (roster index).
    ///
    /// `None` is a team-only stat (team rebounds). Points also update the
    /// period line, plus-minus and the sudden-target check.
    pub(crate) fn record_stat(&mut self, t: usize, p: Option<usize>, kind: StatKind, amount: u32) {
        if amount == 0 {
            return;
        }
        let team = &mut self.teams[t];
        if let Some(p) = p {
            team.players[p].stat.add(kind, amount);
        }
        if kind != StatKind::Gs {
            team.stat.totals.add(kind, amount);
        }
        let pid = p.map(|p| team.players[p].id);

        if kind == StatKind::Pts {
            if let Some(last) = team.stat.pts_qtrs.last_mut() {
                *last += amount;
            }
            let delta = amount as i32;
            for side in 0..2 {
                let sign = if side == t { delta } else { -delta };
                let team = &mut self.teams[side];
                for &i in &team.on_court {
                    team.players[i].stat.pm += sign;
                }
            }
            if let Some(elam) = self.state.elam {
                if self.teams[t].pts() >= elam.target {
                    self.state.end_period(EndOfPeriodReason::ElamTarget);
                }
            }
        }

        self.log.push(GameEvent::Stat { t, pid, stat: kind, amount: amount as i32 });
    }

    /// Points plus the scoring summary entry and clutch tracking
    pub(crate) fn record_points(&mut self, t: usize, p: usize, pts: u32, shot: Option<ShotKind>) {
        // Capture the clock before a sudden-target finish zeroes it.
        let clock = self.state.clock_secs;
        self.record_stat(t, Some(p), StatKind::Pts, pts);
        let play = ScoringPlay {
            period: self.state.period,
            overtime: self.state.overtimes,
            t,
            pid: self.teams[t].players[p].id,
            pts,
            shot,
            clock,
            score: [self.teams[0].pts(), self.teams[1].pts()],
        };
        let late = self.state.is_final_period(self.config.rules.num_periods);
        self.clutch.track(&play, late);
        self.log.record_scoring(play);
    }

    /// Run `secs` of game time: clock, minutes, energy.
    pub(crate) fn run_clock(&mut self, secs: f64) -> Result<()> {
        let used = self.state.advance_clock(secs)?;
        // Under the sudden-target ending the clock stands still but legs still tire.
        let elapsed = if self.state.elam_active() { secs } else { used };
        let fatigue_factor = self.config.tuning.fatigue_factor;

        for team in &mut self.teams {
            for (i, p) in team.players.iter_mut().enumerate() {
                if team.on_court.contains(&i) {
                    p.stat.min += used / 60.0;
                    p.court_time += elapsed / 60.0;
                    p.energy = fatigue::drain(p.energy, elapsed, fatigue_factor, p.ratings.endurance);
                } else {
                    p.bench_time += elapsed / 60.0;
                    p.energy = fatigue::recover(p.energy, elapsed);
                }
            }
            team.stat.totals.min += used / 60.0 * team.on_court.len() as f64;
        }
        Ok(())
    }

    /// Per-possession injury check. Returns true if anyone got hurt.
    pub(crate) fn check_injuries(&mut self) -> bool {
        if self.all_star_game || self.base_injury_rate <= 0.0 {
            return false;
        }
        let mut hurt = false;
        for t in 0..2 {
            for slot in 0..self.teams[t].on_court.len() {
                let p = self.teams[t].on_court[slot];
                let player = &self.teams[t].players[p];
                if player.injured {
                    continue;
                }
                let rate = injury_rate(self.base_injury_rate, player.age, player.playing_through);
                if self.sampler.random() < rate {
                    let player = &mut self.teams[t].players[p];
                    player.injured = true;
                    player.new_injury = true;
                    debug!(gid = self.gid, pid = player.id, "injury");
                    let pid = player.id;
                    self.log.push(GameEvent::Injury { t, pid, clock: self.state.clock_secs });
                    hurt = true;
                }
            }
        }
        hurt
    }

    /// Lineup composites for both sides with current fatigue and score
    pub(crate) fn refresh_composites(&mut self) {
        let blend = self.late_game_blend();
        let synergy_factor = self.config.tuning.synergy_factor;
        let foul_out = self.config.rules.fouls_until_foul_out;
        let pts = [self.teams[0].pts() as i32, self.teams[1].pts() as i32];
        for (t, team) in self.teams.iter_mut().enumerate() {
            let lead = pts[t] - pts[1 - t];
            team.refresh_composite(|p| fatigue::fatigue(p.energy, blend), lead, synergy_factor, foul_out);
        }
    }

    /// Weighted pick among team `t`'s on-court players, skipping `exclude`.
    /// Returns a roster index.
    pub(crate) fn pick_player(
        &mut self,
        t: usize,
        weight: impl Fn(&super::PlayerInGame) -> f64,
        exclude: Option<usize>,
    ) -> Option<usize> {
        let team = &self.teams[t];
        let candidates: Vec<usize> = team.on_court.iter().copied().filter(|&p| Some(p) != exclude).collect();
        let weights: Vec<f64> = candidates.iter().map(|&p| weight(&team.players[p])).collect();
        let idx = self.sampler.choice(&weights)?;
        candidates.get(idx).copied()
    }
}
