//! Per-game rating scaling and team composites

use super::synergy::Synergy;
use crate::models::player::{CompositeRatings, RatingKind};

/// Foul-trouble multiplier on defensive ratings
const FOUL_TROUBLE_DEFENSE: f64 = 0.85;
/// Foul-trouble multiplier on the fouling rating
const FOUL_TROUBLE_FOULING: f64 = 0.7;

/// Multiplier for the home side (`1 + hcf * advantage / 100`, at least 0.01).
/// The away side divides by the same value.
pub fn home_court_modifier(home_court_factor: f64, home_court_advantage: f64) -> f64 {
    (1.0 + home_court_factor * home_court_advantage / 100.0).max(0.01)
}

/// Scale a per-game ratings copy. Endurance is never touched.
pub fn apply_home_court(ratings: &mut CompositeRatings, modifier: f64, is_home: bool) {
    for kind in RatingKind::ALL {
        if kind == RatingKind::Endurance {
            continue;
        }
        let r = ratings.get_mut(kind);
        if is_home {
            *r *= modifier;
        } else {
            *r /= modifier;
        }
    }
}

/// Leading teams relax on defense and the glass
pub fn performance_factor(kind: RatingKind, lead: i32) -> f64 {
    let relaxes = matches!(
        kind,
        RatingKind::Defense | RatingKind::DefensePerimeter | RatingKind::Blocking | RatingKind::Rebounding
    );
    if relaxes && lead > 0 {
        1.0 - (0.0025 * lead as f64).min(0.05)
    } else {
        1.0
    }
}

/// One foul from disqualification: defend softer, foul less
pub fn foul_trouble_factor(kind: RatingKind, pf: u32, fouls_until_foul_out: u32) -> f64 {
    if fouls_until_foul_out == 0 || pf + 1 != fouls_until_foul_out {
        return 1.0;
    }
    match kind {
        RatingKind::Defense
        | RatingKind::DefensePerimeter
        | RatingKind::DefenseInterior
        | RatingKind::Blocking => FOUL_TROUBLE_DEFENSE,
        RatingKind::Fouling => FOUL_TROUBLE_FOULING,
        _ => 1.0,
    }
}

/// Player rating with foul trouble applied (no fatigue)
pub fn effective_rating(ratings: &CompositeRatings, kind: RatingKind, pf: u32, fouls_until_foul_out: u32) -> f64 {
    ratings.get(kind) * foul_trouble_factor(kind, pf, fouls_until_foul_out)
}

/// One on-court player's contribution to a team composite
#[derive(Debug, Clone, Copy)]
pub struct LineupSlot<'a> {
    pub ratings: &'a CompositeRatings,
    pub fatigue: f64,
    pub pf: u32,
}

/// Lineup-level composites used in the possession formulas
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TeamComposite {
    pub dribbling: f64,
    pub passing: f64,
    pub rebounding: f64,
    pub defense: f64,
    pub defense_perimeter: f64,
    pub blocking: f64,
}

impl TeamComposite {
    pub fn compute(
        lineup: &[LineupSlot<'_>],
        lead: i32,
        synergy: &Synergy,
        synergy_factor: f64,
        fouls_until_foul_out: u32,
    ) -> Self {
        if lineup.is_empty() {
            return Self::default();
        }
        let avg = |kind: RatingKind| {
            let sum: f64 = lineup
                .iter()
                .map(|s| {
                    effective_rating(s.ratings, kind, s.pf, fouls_until_foul_out)
                        * s.fatigue
                        * performance_factor(kind, lead)
                })
                .sum();
            sum / lineup.len() as f64
        };

        Self {
            dribbling: avg(RatingKind::Dribbling) + synergy_factor * synergy.off,
            passing: avg(RatingKind::Passing) + synergy_factor * synergy.off,
            rebounding: avg(RatingKind::Rebounding) + synergy_factor * synergy.reb,
            defense: avg(RatingKind::Defense) + synergy_factor * synergy.def,
            defense_perimeter: avg(RatingKind::DefensePerimeter) + synergy_factor * synergy.def,
            blocking: avg(RatingKind::Blocking) + synergy_factor * synergy.def,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_court_scales_copy_except_endurance() {
        let m = home_court_modifier(1.0, 1.0);
        assert!((m - 1.01).abs() < 1e-12);

        let mut home = CompositeRatings::uniform(0.5);
        let mut away = CompositeRatings::uniform(0.5);
        apply_home_court(&mut home, m, true);
        apply_home_court(&mut away, m, false);
        assert!((home.passing - 0.505).abs() < 1e-12);
        assert!((away.passing - 0.5 / 1.01).abs() < 1e-12);
        assert_eq!(home.endurance, 0.5);
        assert_eq!(away.endurance, 0.5);
    }

    #[test]
    fn test_home_court_modifier_floor() {
        assert_eq!(home_court_modifier(1.0, -500.0), 0.01);
        assert_eq!(home_court_modifier(0.0, 5.0), 1.0);
    }

    #[test]
    fn test_performance_factor() {
        assert_eq!(performance_factor(RatingKind::Defense, 0), 1.0);
        assert_eq!(performance_factor(RatingKind::Defense, -10), 1.0);
        assert!((performance_factor(RatingKind::Blocking, 8) - 0.98).abs() < 1e-12);
        assert!((performance_factor(RatingKind::Rebounding, 40) - 0.95).abs() < 1e-12);
        assert_eq!(performance_factor(RatingKind::Passing, 40), 1.0);
    }

    #[test]
    fn test_foul_trouble_only_one_foul_from_out() {
        assert_eq!(foul_trouble_factor(RatingKind::Defense, 4, 6), 1.0);
        assert_eq!(foul_trouble_factor(RatingKind::Defense, 5, 6), 0.85);
        assert_eq!(foul_trouble_factor(RatingKind::Fouling, 5, 6), 0.7);
        assert_eq!(foul_trouble_factor(RatingKind::Passing, 5, 6), 1.0);
        assert_eq!(foul_trouble_factor(RatingKind::Blocking, 4, 5), 0.85);
    }

    #[test]
    fn test_team_composite_averages_and_adds_synergy() {
        let a = CompositeRatings::uniform(0.6);
        let b = CompositeRatings::uniform(0.4);
        let lineup = [
            LineupSlot { ratings: &a, fatigue: 1.0, pf: 0 },
            LineupSlot { ratings: &b, fatigue: 1.0, pf: 0 },
        ];
        let syn = Synergy { off: 0.5, def: 0.2, reb: 0.1 };
        let c = TeamComposite::compute(&lineup, 0, &syn, 0.1, 6);
        assert!((c.dribbling - 0.55).abs() < 1e-12);
        assert!((c.defense - 0.52).abs() < 1e-12);
        assert!((c.rebounding - 0.51).abs() < 1e-12);

        // fatigue drags everything down
        let tired = [LineupSlot { ratings: &a, fatigue: 0.5, pf: 0 }];
        let c = TeamComposite::compute(&tired, 0, &Synergy::default(), 0.1, 6);
        assert!((c.passing - 0.3).abs() < 1e-12);
    }
}
