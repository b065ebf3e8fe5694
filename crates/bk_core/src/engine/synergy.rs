//! Lineup synergy
//!
//! 코트 위 다섯 명이 특정 기술 임계값을 동시에 넘을 때 팀 레이팅 보너스.
//! Each player contributes a soft skill indicator (a steep sigmoid around the
//! skill threshold); the team sums them and passes the counts through a
//! second set of sigmoids.

use crate::models::player::CompositeRatings;
use serde::{Deserialize, Serialize};

pub fn sigmoid(x: f64, a: f64, b: f64) -> f64 {
    1.0 / (1.0 + (-a * (x - b)).exp())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Synergy {
    pub off: f64,
    pub def: f64,
    pub reb: f64,
}

/// Soft skill counts summed over the lineup
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SkillCounts {
    pub three: f64,
    pub athlete: f64,
    pub ball_handler: f64,
    pub interior_d: f64,
    pub perimeter_d: f64,
    pub post: f64,
    pub passer: f64,
    pub rebounder: f64,
}

impl SkillCounts {
    pub fn from_lineup<'a>(lineup: impl IntoIterator<Item = &'a CompositeRatings>) -> Self {
        lineup.into_iter().fold(Self::default(), |mut c, r| {
            c.three += sigmoid(r.shooting_three_pointer, 15.0, 0.59);
            c.athlete += sigmoid(r.athleticism, 15.0, 0.63);
            c.ball_handler += sigmoid(r.dribbling, 15.0, 0.68);
            c.interior_d += sigmoid(r.defense_interior, 15.0, 0.57);
            c.perimeter_d += sigmoid(r.defense_perimeter, 15.0, 0.61);
            c.post += sigmoid(r.shooting_low_post, 15.0, 0.61);
            c.passer += sigmoid(r.passing, 15.0, 0.63);
            c.rebounder += sigmoid(r.rebounding, 15.0, 0.61);
            c
        })
    }
}

impl Synergy {
    pub fn from_counts(c: &SkillCounts) -> Self {
        let mut off = 5.0 * sigmoid(c.three, 3.0, 2.0);
        off += 3.0 * sigmoid(c.ball_handler, 15.0, 0.75) + sigmoid(c.ball_handler, 5.0, 1.75);
        off += 3.0 * sigmoid(c.passer, 15.0, 0.75)
            + sigmoid(c.passer, 5.0, 1.75)
            + sigmoid(c.passer, 5.0, 2.75);
        off += sigmoid(c.post, 15.0, 0.75);
        off += sigmoid(c.athlete, 15.0, 1.75) + sigmoid(c.athlete, 5.0, 2.75);
        off /= 17.0;

        // Without enough perimeter skill there is no spacing to exploit.
        let perim = ((1.0 + c.ball_handler + c.passer + c.three).sqrt() - 1.0).clamp(0.0, 2.0) / 2.0;
        off *= perim;

        let def = (sigmoid(c.perimeter_d, 15.0, 0.75)
            + 2.0 * sigmoid(c.interior_d, 15.0, 0.75)
            + sigmoid(c.athlete, 5.0, 2.0)
            + sigmoid(c.athlete, 5.0, 3.25))
            / 6.0;

        let reb = (sigmoid(c.rebounder, 15.0, 0.75) + sigmoid(c.rebounder, 5.0, 1.75)) / 4.0;

        Self { off, def, reb }
    }

    pub fn from_lineup<'a>(lineup: impl IntoIterator<Item = &'a CompositeRatings>) -> Self {
        Self::from_counts(&SkillCounts::from_lineup(lineup))
    }
}
