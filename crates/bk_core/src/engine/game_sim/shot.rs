//! Shot selection and resolution

use super::GameSim;
use crate::engine::config::TuningConfig;
use crate::engine::events::{FoulKind, GameEvent, ShotKind};
use crate::engine::fatigue;
use crate::engine::rng::Sampler;
use crate::error::{Result, SimError};
use crate::models::box_score::StatKind;
use crate::models::player::CompositeRatings;

/// Shot clock below which shots are rushed
const RUSHED_SECS: f64 = 4.0;
const ASSIST_BONUS: f64 = 0.025;
const ALL_STAR_THREE_BONUS: f64 = 0.02;

/// Chosen shot with its base probabilities (before defense and fatigue)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotProfile {
    pub kind: ShotKind,
    pub prob_make: f64,
    pub prob_and_one: f64,
    pub prob_miss_foul: f64,
}

/// Diminishing returns on elite three-point ratings
fn scaled(x: f64) -> f64 {
    x.min(0.55) + 0.5 * (x - 0.55).max(0.0)
}

/// Pick the shot type for a shooter.
///
/// `synergy_edge` is `synergy_factor * (offense synergy - defense synergy)`;
/// good offensive lineups get more shots at the rim and in the post.
pub fn select_shot(
    sampler: &mut impl Sampler,
    r: &CompositeRatings,
    synergy_edge: f64,
    tuning: &TuningConfig,
    all_star_game: bool,
) -> ShotProfile {
    let three = r.shooting_three_pointer;
    let takes_three =
        three > 0.35 && sampler.random() < 0.67 * scaled(three) * tuning.three_point_tendency_factor;

    let (kind, prob_make, and_one, miss_foul) = if takes_three {
        let mut p = (0.36 + 0.3 * scaled(three)) * tuning.three_point_accuracy_factor;
        if all_star_game {
            p += ALL_STAR_THREE_BONUS;
        }
        (ShotKind::ThreePointer, p, 0.01, 0.02)
    } else {
        let r1 = 0.8 * sampler.random() * r.shooting_mid_range;
        let r2 = sampler.random() * (r.shooting_at_rim + synergy_edge);
        let r3 = sampler.random() * (r.shooting_low_post + synergy_edge);
        let two = tuning.two_point_accuracy_factor;
        if r1 > r2 && r1 > r3 {
            (ShotKind::MidRange, (0.42 + 0.32 * r.shooting_mid_range) * two, 0.05, 0.07)
        } else if r2 > r3 {
            (ShotKind::AtRim, (0.54 + 0.41 * r.shooting_at_rim) * two, 0.25, 0.37)
        } else {
            (ShotKind::LowPost, (0.34 + 0.32 * r.shooting_low_post) * two, 0.15, 0.33)
        }
    };

    let foul_factor = 0.65 * (r.drawing_fouls / 0.5).powi(2) * tuning.foul_rate_factor;
    ShotProfile {
        kind,
        prob_make,
        prob_and_one: and_one * foul_factor,
        prob_miss_foul: miss_foul * foul_factor,
    }
}

/// Late-clock penalty on make probability
pub fn rushed_factor(available_secs: f64) -> f64 {
    if available_secs < RUSHED_SECS {
        1.0 - 0.25 * (1.0 - available_secs.max(0.0) / RUSHED_SECS)
    } else {
        1.0
    }
}

impl<S: Sampler> GameSim<S> {
    /// Half-court shot. `available_secs` is the time the offense had when the
    /// possession started.
    pub(crate) fn do_shot(&mut self, available_secs: f64) -> Result<()> {
        let (o, d) = (self.state.o, self.state.d);
        let blend = self.late_game_blend();
        let tuning = self.config.tuning.clone();

        let shooter = self
            .pick_player(o, |p| p.ratings.usage.powf(1.25) * fatigue::fatigue(p.energy, blend), None)
            .ok_or_else(|| SimError::Invariant(format!("team {o} has nobody on the floor to shoot")))?;

        let oc = self.teams[o].composite;
        let dc = self.teams[d].composite;
        let p_assist = tuning.assist_factor * 0.6 * (2.0 + oc.passing) / (2.0 + dc.defense);
        let passer = if self.sampler.random() < p_assist {
            self.pick_player(o, |p| p.ratings.passing.powi(2), Some(shooter))
        } else {
            None
        };

        let synergy_edge = tuning.synergy_factor * (self.teams[o].synergy.off - self.teams[d].synergy.def);
        let ratings = self.teams[o].players[shooter].ratings.clone();
        let profile = select_shot(&mut self.sampler, &ratings, synergy_edge, &tuning, self.all_star_game);

        let shooter_fatigue = self.fatigue_of(self.teams[o].players[shooter].energy);
        let mut prob_make = (profile.prob_make - 0.25 * dc.defense + synergy_edge) * shooter_fatigue;
        if passer.is_some() {
            prob_make += ASSIST_BONUS;
        }
        prob_make *= rushed_factor(available_secs);

        let p_block = tuning.block_factor * 0.1 * dc.blocking.powi(2);
        if self.sampler.random() < p_block {
            return self.blocked_shot(shooter, profile.kind);
        }
        if self.sampler.random() < prob_make {
            let and_one = self.sampler.random() < profile.prob_and_one;
            return self.made_shot(shooter, passer, profile.kind, and_one);
        }
        if self.sampler.random() < profile.prob_miss_foul {
            return self.fouled_on_miss(shooter, profile.kind);
        }

        let clock = self.state.clock_secs;
        let pid = self.teams[o].players[shooter].id;
        self.log.push(GameEvent::Fga { t: o, pid, shot: profile.kind, clock });
        self.record_attempt(shooter, profile.kind, false);
        self.log.push(GameEvent::Miss { t: o, pid, shot: profile.kind, clock });
        self.do_rebound()
    }

    /// Fga/Fg plus the zone counters
    fn record_attempt(&mut self, shooter: usize, kind: ShotKind, made: bool) {
        let o = self.state.o;
        let (zone_made, zone_att) = kind.zone_stats();
        self.record_stat(o, Some(shooter), StatKind::Fga, 1);
        self.record_stat(o, Some(shooter), zone_att, 1);
        if made {
            self.record_stat(o, Some(shooter), StatKind::Fg, 1);
            self.record_stat(o, Some(shooter), zone_made, 1);
        }
    }

    fn blocked_shot(&mut self, shooter: usize, kind: ShotKind) -> Result<()> {
        let (o, d) = (self.state.o, self.state.d);
        let blend = self.late_game_blend();
        let clock = self.state.clock_secs;
        let shooter_pid = self.teams[o].players[shooter].id;
        self.log.push(GameEvent::Fga { t: o, pid: shooter_pid, shot: kind, clock });
        self.record_attempt(shooter, kind, false);
        self.record_stat(o, Some(shooter), StatKind::Ba, 1);

        if let Some(blocker) =
            self.pick_player(d, |p| p.ratings.blocking.powi(2) * fatigue::fatigue(p.energy, blend), None)
        {
            let pid = self.teams[d].players[blocker].id;
            self.log.push(GameEvent::Blk { t: d, pid, shooter: shooter_pid, shot: kind, clock });
            self.record_stat(d, Some(blocker), StatKind::Blk, 1);
        }
        self.do_rebound()
    }

    fn made_shot(&mut self, shooter: usize, passer: Option<usize>, kind: ShotKind, and_one: bool) -> Result<()> {
        let o = self.state.o;
        let clock = self.state.clock_secs;
        let pid = self.teams[o].players[shooter].id;
        let assist = passer.map(|p| self.teams[o].players[p].id);

        self.log.push(GameEvent::Fga { t: o, pid, shot: kind, clock });
        self.log.push(GameEvent::Fg { t: o, pid, shot: kind, assist, and_one, clock });
        self.record_attempt(shooter, kind, true);
        self.record_points(o, shooter, kind.points(), Some(kind));
        if let Some(passer) = passer {
            self.record_stat(o, Some(passer), StatKind::Ast, 1);
        }

        self.state.keep_possession = false;
        if and_one && !self.state.target_reached() {
            let d = self.state.d;
            if let Some(fouler) = self.pick_fouler(d, false) {
                return self.foul_to_the_line(fouler, FoulKind::AndOne, shooter, 1);
            }
        }
        Ok(())
    }

    fn fouled_on_miss(&mut self, shooter: usize, kind: ShotKind) -> Result<()> {
        let d = self.state.d;
        let foul_kind = match kind {
            ShotKind::ThreePointer => FoulKind::ShootingThree,
            ShotKind::AtRim | ShotKind::LowPost | ShotKind::MidRange => FoulKind::ShootingTwo,
        };
        let Some(fouler) = self.pick_fouler(d, false) else {
            return self.do_rebound();
        };
        self.foul_to_the_line(fouler, foul_kind, shooter, kind.points())
    }
}
