//! Clutch plays and the shootout tie-break

use super::GameSim;
use crate::engine::clock::CLUTCH_WINDOW_SECS;
use crate::engine::events::{GameEvent, ScoringPlay};
use crate::engine::rng::Sampler;
use crate::error::{Result, SimError};
use crate::models::game_result::{ClutchKind, ClutchPlay};
use tracing::debug;

/// Final margin at or below which a go-ahead play counts as a game winner
const CLUTCH_MAX_MARGIN: u32 = 3;
/// Sudden-death rounds before the shootout is reported as broken
const SHOOTOUT_ROUND_CEILING: u32 = 1_000;

/// Late scoring plays of the current period plus the clutch plays found so far
#[derive(Debug, Clone, Default)]
pub struct ClutchTracker {
    window: Vec<ScoringPlay>,
    plays: Vec<ClutchPlay>,
}

impl ClutchTracker {
    pub fn reset_period(&mut self) {
        self.window.clear();
    }

    /// Remember a scoring play if it falls in the late-game window
    pub fn track(&mut self, play: &ScoringPlay, final_period: bool) {
        if final_period && play.clock <= CLUTCH_WINDOW_SECS {
            self.window.push(play.clone());
        }
    }

    /// Last tracked play that left the score level
    pub fn last_tying_play(&self) -> Option<&ScoringPlay> {
        self.window.iter().rev().find(|p| p.score[0] == p.score[1])
    }

    pub fn in_window(&self, play: &ScoringPlay) -> bool {
        self.window.iter().any(|p| p == play)
    }

    pub fn push(&mut self, play: ClutchPlay) {
        self.plays.push(play);
    }

    pub fn into_plays(self) -> Vec<ClutchPlay> {
        self.plays
    }
}

/// The play that gave `winner` the lead for good, walking back from the end.
pub fn go_ahead_play(summary: &[ScoringPlay], winner: usize) -> Option<&ScoringPlay> {
    let leads = |score: [u32; 2]| score[winner] > score[1 - winner];
    let mut found = None;
    for play in summary.iter().rev() {
        if !leads(play.score) {
            break;
        }
        found = Some(play);
        let mut before = play.score;
        before[play.t] -= play.pts;
        if !leads(before) {
            break;
        }
    }
    found
}

fn describe(play: &ScoringPlay) -> &'static str {
    play.shot.map_or("free throw", |s| s.label())
}

impl<S: Sampler> GameSim<S> {
    fn player_name(&self, t: usize, pid: u32) -> String {
        self.teams[t]
            .players
            .iter()
            .find(|p| p.id == pid)
            .map_or_else(|| format!("#{pid}"), |p| p.name.clone())
    }

    pub(crate) fn record_game_tying_play(&mut self) {
        let Some(play) = self.clutch.last_tying_play().cloned() else {
            return;
        };
        let text = format!(
            "{} made a game-tying {} with {:.1} seconds remaining",
            self.player_name(play.t, play.pid),
            describe(&play),
            play.clock
        );
        self.clutch.push(ClutchPlay {
            kind: ClutchKind::GameTying,
            text,
            pids: vec![play.pid],
            tids: vec![self.teams[play.t].id],
        });
    }

    pub(crate) fn record_game_winner(&mut self) {
        let pts = [self.teams[0].pts(), self.teams[1].pts()];
        let winner = usize::from(pts[1] > pts[0]);
        if pts[winner] - pts[1 - winner] > CLUTCH_MAX_MARGIN {
            return;
        }
        let Some(play) = go_ahead_play(self.log.scoring_summary(), winner).cloned() else {
            return;
        };
        if !self.clutch.in_window(&play) {
            return;
        }
        let text = format!(
            "{} made the game-winning {} with {:.1} seconds remaining",
            self.player_name(play.t, play.pid),
            describe(&play),
            play.clock
        );
        self.clutch.push(ClutchPlay {
            kind: ClutchKind::GameWinner,
            text,
            pids: vec![play.pid],
            tids: vec![self.teams[play.t].id],
        });
    }

    /// Alternating three-point attempts by each side's best shooter.
    pub(crate) fn run_shootout(&mut self) -> Result<()> {
        let rounds = self.config.rules.shootout_rounds;
        debug!(gid = self.gid, rounds, "shootout");
        self.log.push(GameEvent::ShootoutStart { rounds });

        let shooters = [self.shootout_shooter(0), self.shootout_shooter(1)];
        let mut made = [0u32; 2];
        let mut round = 0;
        while round < rounds || made[0] == made[1] {
            round += 1;
            if round > rounds + SHOOTOUT_ROUND_CEILING {
                return Err(SimError::Invariant(format!("shootout still tied after {round} rounds")));
            }
            for (t, &p) in shooters.iter().enumerate() {
                let player = &self.teams[t].players[p];
                let prob = 0.3 + 0.4 * player.ratings.shooting_three_pointer;
                let pid = player.id;
                let make = self.sampler.random() < prob;
                if make {
                    made[t] += 1;
                }
                self.log.push(GameEvent::ShootoutShot { t, pid, made: make, round });
            }
        }
        self.shootout = Some(made);
        Ok(())
    }

    /// Best three-point shooter still able to play (anyone, if nobody is)
    fn shootout_shooter(&self, t: usize) -> usize {
        let foul_out = self.config.rules.fouls_until_foul_out;
        let players = &self.teams[t].players;
        let best = |healthy_only: bool| {
            players
                .iter()
                .enumerate()
                .filter(|(_, p)| !healthy_only || (!p.injured && !p.fouled_out(foul_out)))
                .max_by(|(_, a), (_, b)| {
                    a.ratings.shooting_three_pointer.total_cmp(&b.ratings.shooting_three_pointer)
                })
                .map(|(i, _)| i)
        };
        best(true).or_else(|| best(false)).unwrap_or(0)
    }
}
