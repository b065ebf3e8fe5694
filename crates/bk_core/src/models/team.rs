use super::player::{CompositeRatings, InjuryStatus, PlayerInput, Position};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TeamInput {
    pub id: u32,
    pub name: String,
    /// Possessions per 48 minutes
    #[serde(default = "default_pace")]
    pub pace: f64,
    /// Depth chart order; the first `num_players_on_court` start.
    pub players: Vec<PlayerInput>,
}

fn default_pace() -> f64 {
    100.0
}

impl TeamInput {
    pub fn validate(&self, num_players_on_court: usize) -> Result<(), String> {
        if self.players.len() < num_players_on_court {
            return Err(format!(
                "team {} needs at least {} players, found {}",
                self.id,
                num_players_on_court,
                self.players.len()
            ));
        }
        if !self.pace.is_finite() || self.pace <= 0.0 {
            return Err(format!("team {} pace must be > 0, got {}", self.id, self.pace));
        }

        let mut seen = HashSet::new();
        for player in &self.players {
            if !seen.insert(player.id) {
                return Err(format!("team {} lists player {} twice", self.id, player.id));
            }
            player.validate()?;
        }

        // A five-man lineup has to be able to field both position groups.
        if num_players_on_court >= 5 {
            let guards = self.players.iter().filter(|p| p.pos.is_guard()).count();
            let bigs = self
                .players
                .iter()
                .filter(|p| p.pos.is_forward() || p.pos.is_center())
                .count();
            if guards == 0 || bigs == 0 {
                return Err(format!(
                    "team {} has an invalid position distribution ({} guards, {} forwards/centers)",
                    self.id, guards, bigs
                ));
            }
        }
        Ok(())
    }
}

/// Deterministic 13-man roster used by the CLI demo, benches and tests.
///
/// `strength` shifts every rating; 0.5 is a league-average team.
pub fn demo_team(id: u32, name: &str, strength: f64) -> TeamInput {
    const POSITIONS: [Position; 13] = [
        Position::PG,
        Position::SG,
        Position::SF,
        Position::PF,
        Position::C,
        Position::G,
        Position::GF,
        Position::F,
        Position::FC,
        Position::PG,
        Position::SG,
        Position::PF,
        Position::C,
    ];

    let players = POSITIONS
        .iter()
        .enumerate()
        .map(|(i, &pos)| {
            // Starters are better than the bench; wobble keeps players distinct.
            let depth = 0.12 * (i as f64 / 12.0);
            let wobble = |k: f64| 0.06 * ((i as f64 + 1.0) * k).sin();
            let base = (strength - depth).clamp(0.05, 0.95);
            let r = |k: f64, bias: f64| (base + bias + wobble(k)).clamp(0.0, 1.0);

            let guard = if pos.is_guard() { 0.1 } else { -0.05 };
            let big = if pos.is_center() || pos == Position::PF || pos == Position::FC {
                0.12
            } else {
                -0.08
            };

            let ratings = CompositeRatings {
                passing: r(1.3, guard),
                rebounding: r(2.1, big),
                defense: r(0.7, 0.0),
                defense_perimeter: r(1.9, guard),
                defense_interior: r(2.7, big),
                blocking: r(3.1, big - 0.05),
                fouling: r(0.9, -0.1),
                drawing_fouls: r(1.7, 0.0),
                turnovers: r(2.3, -0.1),
                usage: r(1.1, if i < 5 { 0.05 } else { -0.05 }),
                dribbling: r(2.9, guard),
                shooting_at_rim: r(0.5, big * 0.5),
                shooting_low_post: r(3.7, big),
                shooting_mid_range: r(1.5, 0.0),
                shooting_three_pointer: r(2.5, guard),
                shooting_ft: r(3.3, 0.1),
                athleticism: r(0.3, 0.0),
                endurance: r(4.1, 0.0),
                jump_ball: r(4.7, big),
            };

            PlayerInput {
                id: id * 100 + i as u32,
                name: format!("{name} {}", i + 1),
                pos,
                age: 21 + (i as u32 * 3) % 14,
                value: 40.0 + 45.0 * base,
                ratings,
                injury: InjuryStatus::default(),
                pt_modifier: 1.0,
            }
        })
        .collect();

    TeamInput { id, name: name.to_string(), pace: 100.0, players }
}
