//! # Game Events
//!
//! Append-only play-by-play log. The variant names and field layout are the
//! replay contract for the UI, so every variant serializes as
//! `{"type": "<camelCase>", ...}`.
//!
//! 이벤트는 한 번 기록되면 수정/삭제되지 않는다.

use crate::models::box_score::StatKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ShotKind {
    AtRim,
    LowPost,
    MidRange,
    ThreePointer,
}

impl ShotKind {
    pub fn points(&self) -> u32 {
        match self {
            ShotKind::ThreePointer => 3,
            ShotKind::AtRim | ShotKind::LowPost | ShotKind::MidRange => 2,
        }
    }

    /// (made, attempted) counters for the shot zone
    pub fn zone_stats(&self) -> (StatKind, StatKind) {
        match self {
            ShotKind::AtRim => (StatKind::FgAtRim, StatKind::FgaAtRim),
            ShotKind::LowPost => (StatKind::FgLowPost, StatKind::FgaLowPost),
            ShotKind::MidRange => (StatKind::FgMidRange, StatKind::FgaMidRange),
            ShotKind::ThreePointer => (StatKind::Tp, StatKind::Tpa),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShotKind::AtRim => "layup",
            ShotKind::LowPost => "post shot",
            ShotKind::MidRange => "jumper",
            ShotKind::ThreePointer => "three pointer",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FoulKind {
    NonShooting,
    /// Non-shooting foul with the fouling team in the bonus
    Bonus,
    ShootingTwo,
    ShootingThree,
    AndOne,
    Intentional,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum EndOfPeriodReason {
    Clock,
    RunOutClock,
    NoShot,
    IntentionalFoul,
    ElamTarget,
}

/// One semantic play-by-play entry. `t` is the team index (0 = home).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    JumpBall {
        t: usize,
        pid: u32,
        clock: f64,
    },
    Fga {
        t: usize,
        pid: u32,
        shot: ShotKind,
        clock: f64,
    },
    Fg {
        t: usize,
        pid: u32,
        shot: ShotKind,
        assist: Option<u32>,
        #[serde(rename = "andOne")]
        and_one: bool,
        clock: f64,
    },
    Miss {
        t: usize,
        pid: u32,
        shot: ShotKind,
        clock: f64,
    },
    Blk {
        t: usize,
        pid: u32,
        shooter: u32,
        shot: ShotKind,
        clock: f64,
    },
    Foul {
        t: usize,
        pid: u32,
        kind: FoulKind,
        clock: f64,
    },
    FoulOut {
        t: usize,
        pid: u32,
        clock: f64,
    },
    Ft {
        t: usize,
        pid: u32,
        made: bool,
        clock: f64,
    },
    Tov {
        t: usize,
        pid: u32,
        clock: f64,
    },
    Stl {
        t: usize,
        pid: u32,
        victim: u32,
        clock: f64,
    },
    Reb {
        t: usize,
        pid: Option<u32>,
        offensive: bool,
        clock: f64,
    },
    OutOfBounds {
        t: usize,
        clock: f64,
    },
    Sub {
        t: usize,
        #[serde(rename = "pidIn")]
        pid_in: u32,
        #[serde(rename = "pidOut")]
        pid_out: u32,
        clock: f64,
    },
    Timeout {
        t: usize,
        #[serde(rename = "advanceBall")]
        advance_ball: bool,
        clock: f64,
    },
    Period {
        period: u32,
        clock: f64,
    },
    Overtime {
        period: u32,
        overtime: u32,
        clock: f64,
    },
    Injury {
        t: usize,
        pid: u32,
        clock: f64,
    },
    EndOfPeriod {
        period: u32,
        reason: EndOfPeriodReason,
        clock: f64,
    },
    ElamActive {
        target: u32,
        clock: f64,
    },
    ShootoutStart {
        rounds: u32,
    },
    ShootoutShot {
        t: usize,
        pid: u32,
        made: bool,
        round: u32,
    },
    GameOver {
        pts: [u32; 2],
        shootout: Option<[u32; 2]>,
    },
    Stat {
        t: usize,
        pid: Option<u32>,
        stat: StatKind,
        amount: i32,
    },
}

impl GameEvent {
    /// Game clock carried by the event, if any
    pub fn clock(&self) -> Option<f64> {
        match self {
            GameEvent::JumpBall { clock, .. }
            | GameEvent::Fga { clock, .. }
            | GameEvent::Fg { clock, .. }
            | GameEvent::Miss { clock, .. }
            | GameEvent::Blk { clock, .. }
            | GameEvent::Foul { clock, .. }
            | GameEvent::FoulOut { clock, .. }
            | GameEvent::Ft { clock, .. }
            | GameEvent::Tov { clock, .. }
            | GameEvent::Stl { clock, .. }
            | GameEvent::Reb { clock, .. }
            | GameEvent::OutOfBounds { clock, .. }
            | GameEvent::Sub { clock, .. }
            | GameEvent::Timeout { clock, .. }
            | GameEvent::Period { clock, .. }
            | GameEvent::Overtime { clock, .. }
            | GameEvent::Injury { clock, .. }
            | GameEvent::EndOfPeriod { clock, .. }
            | GameEvent::ElamActive { clock, .. } => Some(*clock),
            GameEvent::ShootoutStart { .. }
            | GameEvent::ShootoutShot { .. }
            | GameEvent::GameOver { .. }
            | GameEvent::Stat { .. } => None,
        }
    }

    /// Starts a new period or overtime (the clock resets here)
    pub fn is_period_start(&self) -> bool {
        matches!(self, GameEvent::Period { .. } | GameEvent::Overtime { .. })
    }
}

/// A scoring play, kept even when the play-by-play log is off.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ScoringPlay {
    pub period: u32,
    /// Overtime number, 0 in regulation
    pub overtime: u32,
    pub t: usize,
    pub pid: u32,
    pub pts: u32,
    /// `None` for a free throw
    pub shot: Option<ShotKind>,
    pub clock: f64,
    /// Score after the play, [home, away]
    pub score: [u32; 2],
}

/// Event sink for one game.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    enabled: bool,
    events: Vec<GameEvent>,
    scoring: Vec<ScoringPlay>,
}

impl EventLog {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, events: Vec::new(), scoring: Vec::new() }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn push(&mut self, event: GameEvent) {
        if self.enabled {
            self.events.push(event);
        }
    }

    pub fn record_scoring(&mut self, play: ScoringPlay) {
        self.scoring.push(play);
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn scoring_summary(&self) -> &[ScoringPlay] {
        &self.scoring
    }

    /// (events, scoring summary); events are `None` when logging was off
    pub fn finish(self) -> (Option<Vec<GameEvent>>, Vec<ScoringPlay>) {
        let events = self.enabled.then_some(self.events);
        (events, self.scoring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_wire_format() {
        let ev = GameEvent::Fg {
            t: 1,
            pid: 104,
            shot: ShotKind::ThreePointer,
            assist: Some(100),
            and_one: false,
            clock: 33.5,
        };
        let value = serde_json::to_value(&ev).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "fg",
                "t": 1,
                "pid": 104,
                "shot": "threePointer",
                "assist": 100,
                "andOne": false,
                "clock": 33.5
            })
        );
    }

    #[test]
    fn test_end_of_period_reason_names() {
        let ev = GameEvent::EndOfPeriod { period: 2, reason: EndOfPeriodReason::NoShot, clock: 0.0 };
        let value = serde_json::to_value(&ev).unwrap();
        assert_eq!(value["type"], "endOfPeriod");
        assert_eq!(value["reason"], "noShot");
    }

    #[test]
    fn test_sub_event_roundtrip() {
        let ev = GameEvent::Sub { t: 0, pid_in: 7, pid_out: 3, clock: 100.0 };
        let s = serde_json::to_string(&ev).unwrap();
        assert!(s.contains("\"pidIn\":7"));
        let back: GameEvent = serde_json::from_str(&s).unwrap();
        assert_eq!(back, ev);
    }

    #[test]
    fn test_disabled_log_keeps_scoring() {
        let mut log = EventLog::new(false);
        log.push(GameEvent::Period { period: 1, clock: 720.0 });
        log.record_scoring(ScoringPlay {
            period: 1,
            overtime: 0,
            t: 0,
            pid: 1,
            pts: 2,
            shot: Some(ShotKind::AtRim),
            clock: 700.0,
            score: [2, 0],
        });
        let (events, scoring) = log.finish();
        assert!(events.is_none());
        assert_eq!(scoring.len(), 1);
    }

    #[test]
    fn test_shot_points() {
        assert_eq!(ShotKind::ThreePointer.points(), 3);
        assert_eq!(ShotKind::LowPost.points(), 2);
        assert_eq!(ShotKind::AtRim.zone_stats(), (StatKind::FgAtRim, StatKind::FgaAtRim));
    }
}
