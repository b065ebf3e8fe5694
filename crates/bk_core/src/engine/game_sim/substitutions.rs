//! Dead-ball substitutions
//!
//! 데드볼마다 벤치와 코트 위 선수를 가치 점수로 다시 비교한다.
//!
//! ## 규칙
//! - value × fatigue × playing-time setting × U(0.9, 1.1)
//! - 가비지 타임에는 벤치 깊은 선수가 우선
//! - foul trouble: 쿼터별 파울 한도에 걸리면 ×0.75
//! - hysteresis: a healthy player needs 2 minutes on the floor, and the
//!   replacement 2 minutes on the bench, before a swap
//! - 같은 데드볼(같은 시계)에서 이미 교체된 선수는 다시 움직이지 않는다
//! - positional balance (≥2 G or a PG, ≥2 F or a C) unless the outgoing
//!   player is ineligible or exhausted

use super::GameSim;
use crate::engine::clock::{foul_trouble_limit, is_blowout};
use crate::engine::events::GameEvent;
use crate::engine::fatigue::{self, EXHAUSTED_FATIGUE};
use crate::engine::rng::Sampler;
use crate::error::{Result, SimError};
use crate::models::box_score::StatKind;
use crate::models::player::Position;
use tracing::warn;

/// Minutes a player must stay put before the coach reconsiders
const HYSTERESIS_MINUTES: f64 = 2.0;
const FOUL_TROUBLE_PENALTY: f64 = 0.75;

/// Enough guards and bigs for a five-man lineup
pub fn positions_balanced(lineup: &[Position]) -> bool {
    let guards = lineup.iter().filter(|p| p.is_guard()).count();
    let point_guards = lineup.iter().filter(|p| p.is_point_guard()).count();
    let forwards = lineup.iter().filter(|p| p.is_forward()).count();
    let centers = lineup.iter().filter(|p| p.is_center()).count();
    (guards >= 2 || point_guards >= 1) && (forwards >= 2 || centers >= 1)
}

/// Players already moved during the current stoppage
#[derive(Debug, Clone, Default)]
pub(crate) struct Stoppage {
    /// (period, clock bits) of the stoppage
    key: Option<(u32, u64)>,
    moved: Vec<usize>,
}

impl<S: Sampler> GameSim<S> {
    /// Dead ball: both coaches may substitute
    pub(crate) fn dead_ball(&mut self) -> Result<()> {
        self.substitution_window(None)
    }

    /// Dead ball before free throws. The offense's shooter stays on the floor.
    pub(crate) fn dead_ball_with_shooter(&mut self, shooter: usize) -> Result<()> {
        self.substitution_window(Some(shooter))
    }

    fn substitution_window(&mut self, shooter: Option<usize>) -> Result<()> {
        let o = self.state.o;
        for t in 0..2 {
            let keep = if t == o { shooter } else { None };
            self.update_players_on_court(t, keep)?;
        }
        if !self.starters_recorded {
            for t in 0..2 {
                for slot in 0..self.teams[t].on_court.len() {
                    let p = self.teams[t].on_court[slot];
                    self.record_stat(t, Some(p), StatKind::Gs, 1);
                }
            }
            self.starters_recorded = true;
        }
        Ok(())
    }

    /// `keep`: roster index that must stay on the floor (free throw shooter)
    fn update_players_on_court(&mut self, t: usize, keep: Option<usize>) -> Result<()> {
        let n = self.config.rules.num_players_on_court;
        let roster_len = self.teams[t].players.len();
        if roster_len < n {
            return Err(SimError::NotEnoughPlayers { team: t, needed: n, found: roster_len });
        }

        // Elam freezes the clock, so every dead ball there is its own stoppage.
        let key = (self.state.period, self.state.clock_secs.to_bits());
        if self.state.elam_active() || self.stoppages[t].key != Some(key) {
            self.stoppages[t] = Stoppage { key: Some(key), moved: Vec::new() };
        }

        let scores = self.lineup_scores(t);
        let mut changed = false;

        for slot in 0..n {
            let out = self.teams[t].on_court[slot];
            let out_ineligible = scores[out] == f64::NEG_INFINITY;
            if !out_ineligible && (keep == Some(out) || self.stoppages[t].moved.contains(&out)) {
                continue;
            }

            let mut incoming = self.best_replacement(t, out, &scores, out_ineligible, false);
            if incoming.is_none() && out_ineligible {
                incoming = self.best_replacement(t, out, &scores, true, true);
            }
            if let Some(b) = incoming {
                self.substitute(t, slot, b);
                self.stoppages[t].moved.extend([out, b]);
                changed = true;
            }
        }

        if changed {
            self.teams[t].refresh_synergy();
        }
        Ok(())
    }

    /// First bench player, in roster order, worth swapping in for `out`.
    /// Players moved earlier in this stoppage only come back to replace an
    /// ineligible player when nobody else can.
    fn best_replacement(
        &self,
        t: usize,
        out: usize,
        scores: &[f64],
        out_ineligible: bool,
        allow_moved: bool,
    ) -> Option<usize> {
        let n = self.config.rules.num_players_on_court;
        let blend = self.late_game_blend();
        let team = &self.teams[t];
        let settled = team.players[out].court_time >= HYSTERESIS_MINUTES;

        (0..team.players.len()).find(|&b| {
            if team.is_on_court(b) || (!allow_moved && self.stoppages[t].moved.contains(&b)) {
                return false;
            }
            if !out_ineligible && !(settled && team.players[b].bench_time >= HYSTERESIS_MINUTES) {
                return false;
            }
            if scores[b] <= scores[out] {
                return false;
            }
            if n >= 5 && !out_ineligible {
                let exhausted = fatigue::fatigue(team.players[out].energy, blend) <= EXHAUSTED_FATIGUE;
                let lineup: Vec<Position> = team
                    .on_court
                    .iter()
                    .map(|&i| if i == out { team.players[b].pos } else { team.players[i].pos })
                    .collect();
                if !exhausted && !positions_balanced(&lineup) {
                    return false;
                }
            }
            true
        })
    }

    /// Value score per roster index. Ineligible players get `-inf`; if that
    /// leaves fewer than a full lineup, fouled-out players (then injured
    /// ones) are let back in.
    fn lineup_scores(&mut self, t: usize) -> Vec<f64> {
        let rules = &self.config.rules;
        let n = rules.num_players_on_court;
        let foul_out = rules.fouls_until_foul_out;
        let final_regulation = self.state.period == rules.num_periods;
        let late = self.state.period >= rules.num_periods
            && self.state.clock_secs <= rules.late_game_minutes * 60.0;
        let foul_limit = foul_trouble_limit(self.state.period, rules.num_periods, foul_out, late);
        let margin = self.teams[0].pts().abs_diff(self.teams[1].pts());
        let blowout = final_regulation && is_blowout(margin, self.state.clock_secs, rules.period_length_secs);
        let blend = self.late_game_blend();

        let roster_len = self.teams[t].players.len();
        let mut raw = Vec::with_capacity(roster_len);
        for i in 0..roster_len {
            let jitter = self.sampler.uniform(0.9, 1.1);
            let p = &self.teams[t].players[i];
            let mut score = p.value * fatigue::fatigue(p.energy, blend) * p.pt_modifier * jitter;
            if blowout {
                score *= (i + 1) as f64 / roster_len as f64;
            }
            if foul_limit.is_some_and(|limit| p.stat.pf >= limit) {
                score *= FOUL_TROUBLE_PENALTY;
            }
            raw.push(score);
        }

        let players = &self.teams[t].players;
        let mask = |allow_fouled_out: bool, allow_injured: bool| -> Vec<f64> {
            players
                .iter()
                .zip(&raw)
                .map(|(p, &score)| {
                    let blocked = (p.injured && !allow_injured) || (p.fouled_out(foul_out) && !allow_fouled_out);
                    if blocked {
                        f64::NEG_INFINITY
                    } else {
                        score
                    }
                })
                .collect()
        };
        let eligible = |scores: &[f64]| scores.iter().filter(|s| s.is_finite()).count();

        let scores = mask(false, false);
        if eligible(&scores) >= n {
            return scores;
        }
        warn!(gid = self.gid, team = t, "not enough eligible players, ignoring disqualifications");
        let scores = mask(true, false);
        if eligible(&scores) >= n {
            return scores;
        }
        warn!(gid = self.gid, team = t, "not enough healthy players, injured players return");
        mask(true, true)
    }

    fn substitute(&mut self, t: usize, slot: usize, incoming: usize) {
        let outgoing = self.teams[t].on_court[slot];
        let reset_in = self.sampler.uniform(-2.0, 2.0);
        let reset_out = self.sampler.uniform(-2.0, 2.0);

        let team = &mut self.teams[t];
        team.on_court[slot] = incoming;
        team.players[incoming].court_time = reset_in;
        team.players[incoming].bench_time = reset_in;
        team.players[outgoing].court_time = reset_out;
        team.players[outgoing].bench_time = reset_out;
        let (pid_in, pid_out) = (team.players[incoming].id, team.players[outgoing].id);

        self.log.push(GameEvent::Sub { t, pid_in, pid_out, clock: self.state.clock_secs });
    }
}
