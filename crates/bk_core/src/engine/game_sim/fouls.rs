//! Fouls, bonus and free throws

use super::GameSim;
use crate::engine::events::{FoulKind, GameEvent};
use crate::engine::fatigue;
use crate::engine::ratings::effective_rating;
use crate::engine::rng::Sampler;
use crate::error::Result;
use crate::models::box_score::StatKind;
use crate::models::player::RatingKind;
use tracing::debug;

/// Free throw make probability cap
const FT_MAX: f64 = 0.98;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FreeThrowOutcome {
    LastMade,
    LastMissed,
    /// The sudden-target ending was reached mid-trip
    GameDecided,
}

/// Free throw make probability for a shooter
pub fn ft_probability(shooting_ft: f64, ft_accuracy_factor: f64) -> f64 {
    ((0.6 + 0.3 * shooting_ft) * ft_accuracy_factor).clamp(0.0, FT_MAX)
}

impl<S: Sampler> GameSim<S> {
    /// Defender who commits the foul. An intentional foul comes from someone
    /// who is not one foul from disqualification.
    pub(crate) fn pick_fouler(&mut self, t: usize, intentional: bool) -> Option<usize> {
        let foul_out = self.config.rules.fouls_until_foul_out;
        let blend = self.late_game_blend();
        let weight = move |p: &super::PlayerInGame| {
            if intentional && p.stat.pf + 1 >= foul_out {
                return 0.0;
            }
            effective_rating(&p.ratings, RatingKind::Fouling, p.stat.pf, foul_out) * fatigue::fatigue(p.energy, blend)
        };
        self.pick_player(t, weight, None)
    }

    /// Personal + team foul. A disqualified player leaves at the dead ball
    /// every caller opens right after the whistle.
    pub(crate) fn commit_foul(&mut self, t: usize, p: usize, kind: FoulKind) {
        let clock = self.state.clock_secs;
        let pid = self.teams[t].players[p].id;
        self.log.push(GameEvent::Foul { t, pid, kind, clock });
        self.record_stat(t, Some(p), StatKind::Pf, 1);
        self.state.record_team_foul(t);

        let foul_out = self.config.rules.fouls_until_foul_out;
        if self.teams[t].players[p].stat.pf == foul_out {
            debug!(gid = self.gid, pid, "foul out");
            self.log.push(GameEvent::FoulOut { t, pid, clock });
        }
    }

    /// Whistle, then free throws for `shooter` once both benches had their say
    pub(crate) fn foul_to_the_line(
        &mut self,
        fouler: usize,
        kind: FoulKind,
        shooter: usize,
        amount: u32,
    ) -> Result<()> {
        self.commit_foul(self.state.d, fouler, kind);
        self.dead_ball_with_shooter(shooter)?;
        let outcome = self.shoot_free_throws(shooter, amount)?;
        self.after_free_throws(outcome)
    }

    /// Free throws for offense player `p`
    pub(crate) fn shoot_free_throws(&mut self, p: usize, amount: u32) -> Result<FreeThrowOutcome> {
        let o = self.state.o;
        let prob = ft_probability(self.teams[o].players[p].ratings.shooting_ft, self.config.tuning.ft_accuracy_factor);
        let pid = self.teams[o].players[p].id;

        let mut last_made = false;
        for _ in 0..amount {
            if self.state.target_reached() {
                return Ok(FreeThrowOutcome::GameDecided);
            }
            let made = self.sampler.random() < prob;
            self.log.push(GameEvent::Ft { t: o, pid, made, clock: self.state.clock_secs });
            self.record_stat(o, Some(p), StatKind::Fta, 1);
            if made {
                self.record_stat(o, Some(p), StatKind::Ft, 1);
                self.record_points(o, p, 1, None);
            }
            last_made = made;
        }
        if self.state.target_reached() {
            return Ok(FreeThrowOutcome::GameDecided);
        }
        Ok(if last_made { FreeThrowOutcome::LastMade } else { FreeThrowOutcome::LastMissed })
    }

    pub(crate) fn after_free_throws(&mut self, outcome: FreeThrowOutcome) -> Result<()> {
        match outcome {
            FreeThrowOutcome::LastMade => {
                self.state.keep_possession = false;
                self.dead_ball()
            }
            FreeThrowOutcome::LastMissed => self.do_rebound(),
            FreeThrowOutcome::GameDecided => Ok(()),
        }
    }

    /// Away-from-the-ball foul. Two shots in the bonus, otherwise the offense
    /// inbounds in the frontcourt.
    pub(crate) fn non_shooting_foul(&mut self, intentional: bool) -> Result<()> {
        let (o, d) = (self.state.o, self.state.d);
        let Some(fouler) = self.pick_fouler(d, intentional) else {
            return Ok(());
        };
        // Bonus is decided by the fouls committed before this one.
        let bonus = self.state.in_bonus(d, self.config.rules.fouls_until_bonus);
        let kind = if intentional {
            FoulKind::Intentional
        } else if bonus {
            FoulKind::Bonus
        } else {
            FoulKind::NonShooting
        };

        let fouled = if intentional {
            self.worst_free_throw_shooter(o)
        } else {
            self.pick_player(o, |p| p.ratings.usage, None)
        };
        match fouled {
            Some(fouled) if bonus => self.foul_to_the_line(fouler, kind, fouled, 2),
            _ => {
                self.commit_foul(d, fouler, kind);
                self.state.keep_possession = true;
                self.state.ball_in_frontcourt = true;
                self.dead_ball()
            }
        }
    }

    fn worst_free_throw_shooter(&self, t: usize) -> Option<usize> {
        let team = &self.teams[t];
        team.on_court
            .iter()
            .copied()
            .min_by(|&a, &b| team.players[a].ratings.shooting_ft.total_cmp(&team.players[b].ratings.shooting_ft))
    }
}
