//! Per-game player and team records
//!
//! 입력 로스터를 복사해서 경기 중 상태(체력, 파울, 부상, 박스스코어)를 붙인다.
//! Ratings here are the home-court scaled copy; the input roster is untouched.

use crate::engine::ratings::{apply_home_court, LineupSlot, TeamComposite};
use crate::engine::synergy::Synergy;
use crate::models::box_score::{StatLine, TeamStatLine};
use crate::models::game_result::{PlayerBox, TeamBox};
use crate::models::player::{CompositeRatings, PlayerInput, Position};
use crate::models::team::TeamInput;

#[derive(Debug, Clone)]
pub struct PlayerInGame {
    pub id: u32,
    pub name: String,
    pub pos: Position,
    pub age: u32,
    pub value: f64,
    pub ratings: CompositeRatings,
    pub playing_through: bool,
    pub pt_modifier: f64,
    pub stat: StatLine,
    /// 1.0 = fresh
    pub energy: f64,
    /// Minutes since the last substitution involving this player
    pub court_time: f64,
    pub bench_time: f64,
    pub injured: bool,
    pub new_injury: bool,
}

impl PlayerInGame {
    pub fn from_input(input: &PlayerInput, home_court_modifier: f64, is_home: bool) -> Self {
        let mut ratings = input.ratings.clone();
        apply_home_court(&mut ratings, home_court_modifier, is_home);
        Self {
            id: input.id,
            name: input.name.clone(),
            pos: input.pos,
            age: input.age,
            value: input.value,
            ratings,
            playing_through: input.injury.playing_through,
            pt_modifier: input.pt_modifier,
            stat: StatLine::default(),
            energy: 1.0,
            court_time: 0.0,
            bench_time: 0.0,
            injured: false,
            new_injury: false,
        }
    }

    pub fn fouled_out(&self, fouls_until_foul_out: u32) -> bool {
        self.stat.pf >= fouls_until_foul_out
    }

    pub fn to_box(&self, fouls_until_foul_out: u32) -> PlayerBox {
        PlayerBox {
            pid: self.id,
            name: self.name.clone(),
            pos: self.pos,
            stat: self.stat.clone(),
            energy: self.energy,
            injured: self.new_injury,
            fouled_out: self.fouled_out(fouls_until_foul_out),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TeamInGame {
    pub id: u32,
    pub name: String,
    pub pace: f64,
    pub players: Vec<PlayerInGame>,
    /// Roster indices of the players on the floor
    pub on_court: Vec<usize>,
    pub stat: TeamStatLine,
    pub synergy: Synergy,
    pub composite: TeamComposite,
}

impl TeamInGame {
    pub fn from_input(input: &TeamInput, num_on_court: usize, home_court_modifier: f64, is_home: bool) -> Self {
        let players: Vec<PlayerInGame> = input
            .players
            .iter()
            .map(|p| PlayerInGame::from_input(p, home_court_modifier, is_home))
            .collect();
        let on_court: Vec<usize> = (0..num_on_court.min(players.len())).collect();
        let synergy = Synergy::from_lineup(on_court.iter().map(|&i| &players[i].ratings));
        Self {
            id: input.id,
            name: input.name.clone(),
            pace: input.pace,
            players,
            on_court,
            stat: TeamStatLine::default(),
            synergy,
            composite: TeamComposite::default(),
        }
    }

    pub fn pts(&self) -> u32 {
        self.stat.totals.pts
    }

    pub fn is_on_court(&self, p: usize) -> bool {
        self.on_court.contains(&p)
    }

    pub fn refresh_synergy(&mut self) {
        let players = &self.players;
        self.synergy = Synergy::from_lineup(self.on_court.iter().map(|&i| &players[i].ratings));
    }

    /// Recompute lineup composites with current fatigue, score and fouls
    pub fn refresh_composite(
        &mut self,
        fatigue: impl Fn(&PlayerInGame) -> f64,
        lead: i32,
        synergy_factor: f64,
        fouls_until_foul_out: u32,
    ) {
        let slots: Vec<LineupSlot<'_>> = self
            .on_court
            .iter()
            .map(|&i| {
                let p = &self.players[i];
                LineupSlot { ratings: &p.ratings, fatigue: fatigue(p), pf: p.stat.pf }
            })
            .collect();
        self.composite = TeamComposite::compute(&slots, lead, &self.synergy, synergy_factor, fouls_until_foul_out);
    }

    pub fn to_box(&self, won: bool, fouls_until_foul_out: u32) -> TeamBox {
        TeamBox {
            tid: self.id,
            name: self.name.clone(),
            pts: self.pts(),
            won,
            stat: self.stat.clone(),
            players: self.players.iter().map(|p| p.to_box(fouls_until_foul_out)).collect(),
        }
    }
}
