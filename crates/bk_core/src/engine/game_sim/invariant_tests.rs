//! Whole-game invariants
//!
//! 경기 전체를 돌리면서 매 포제션마다 불변식을 확인한다.

use super::GameSim;
use crate::engine::clock::ClockFactor;
use crate::engine::config::LeagueConfig;
use crate::engine::events::{EndOfPeriodReason, FoulKind, GameEvent, ShotKind};
use crate::engine::rng::{ScriptedSampler, SeededSampler};
use crate::error::SimError;
use crate::models::box_score::StatKind;
use crate::models::game_result::ClutchKind;
use crate::models::{demo_team, GameInput, GameResult};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

fn demo_input(gid: u32) -> GameInput {
    GameInput::new(gid, demo_team(1, "Harbor", 0.55), demo_team(2, "Ridge", 0.5))
}

fn play(config: LeagueConfig, seed: u64) -> GameResult {
    let sim = GameSim::new(&demo_input(1), config, SeededSampler::new(seed)).unwrap();
    sim.run().unwrap()
}

/// Lineup and scoring invariants that must hold between possessions
fn check_between_possessions<S: crate::engine::rng::Sampler>(sim: &GameSim<S>) {
    let n = sim.config.rules.num_players_on_court;
    let foul_out = sim.config.rules.fouls_until_foul_out;
    for team in &sim.teams {
        assert_eq!(team.on_court.len(), n);
        let unique: HashSet<usize> = team.on_court.iter().copied().collect();
        assert_eq!(unique.len(), n, "duplicate player on court");
        for &p in &team.on_court {
            assert!(!team.players[p].fouled_out(foul_out), "fouled-out player {} on court", team.players[p].id);
            assert!(!team.players[p].injured, "injured player {} on court", team.players[p].id);
        }
        let from_players: u32 = team.players.iter().map(|p| p.stat.pts).sum();
        assert_eq!(from_players, team.pts());
        assert_eq!(team.stat.pts_qtrs.iter().sum::<u32>(), team.pts());
    }
    assert!(sim.state.clock_secs >= 0.0);
}

/// Regulation only, checking after every possession
fn run_regulation_checked(seed: u64, base_injury_rate: f64) {
    let mut input = demo_input(3);
    input.base_injury_rate = base_injury_rate;
    let mut sim = GameSim::new(&input, LeagueConfig::default(), SeededSampler::new(seed)).unwrap();
    let num_periods = sim.config.rules.num_periods;

    for period in 1..=num_periods {
        sim.begin_regulation_period(period).unwrap();
        check_between_possessions(&sim);
        let mut last_clock = sim.state.clock_secs;
        let mut score = [sim.teams[0].pts(), sim.teams[1].pts()];
        while !sim.state.period_over() {
            sim.sim_possession().unwrap();
            assert!(sim.state.clock_secs <= last_clock, "clock went up in period {period}");
            let now = [sim.teams[0].pts(), sim.teams[1].pts()];
            assert!(now[0] >= score[0] && now[1] >= score[1], "score went down");
            check_between_possessions(&sim);
            last_clock = sim.state.clock_secs;
            score = now;
        }
    }
}

#[test]
fn test_regulation_invariants_hold_every_possession() {
    for seed in 0..4 {
        run_regulation_checked(seed, 0.0);
    }
    run_regulation_checked(99, 0.0005);
}

#[test]
fn test_short_clock_ends_period_without_shot() {
    let mut sim = GameSim::new(&demo_input(1), LeagueConfig::default(), ScriptedSampler::constant(0.5)).unwrap();
    sim.begin_regulation_period(1).unwrap();
    let before = sim.events().len();
    sim.state.clock_secs = 0.05;
    sim.sim_possession().unwrap();

    assert_eq!(sim.state.end_reason, Some(EndOfPeriodReason::NoShot));
    assert_eq!(sim.state.clock_secs, 0.0);
    let shots = sim.events()[before..].iter().filter(|e| matches!(e, GameEvent::Fga { .. })).count();
    assert_eq!(shots, 0);
}

#[test]
fn test_bonus_foul_awards_two_free_throws() {
    let mut sim = GameSim::new(&demo_input(1), LeagueConfig::default(), ScriptedSampler::constant(0.5)).unwrap();
    sim.begin_regulation_period(1).unwrap();
    sim.state.set_offense(0);
    let d = sim.state.d;
    sim.state.fouls_this_period[d] = 5;
    let before = sim.events().len();

    sim.non_shooting_foul(false).unwrap();

    let new = &sim.events()[before..];
    assert!(new.iter().any(|e| matches!(e, GameEvent::Foul { kind: FoulKind::Bonus, t, .. } if *t == d)));
    let fts = new.iter().filter(|e| matches!(e, GameEvent::Ft { .. })).count();
    assert_eq!(fts, 2);
    // Every demo shooter makes at least 60%; a 0.5 draw always goes in.
    assert_eq!(sim.teams[0].pts(), 2);
    assert_eq!(sim.state.fouls_this_period[d], 6);
    assert!(!sim.state.keep_possession);
}

#[test]
fn test_foul_before_bonus_keeps_ball_in_frontcourt() {
    let mut sim = GameSim::new(&demo_input(1), LeagueConfig::default(), ScriptedSampler::constant(0.5)).unwrap();
    sim.begin_regulation_period(1).unwrap();
    sim.state.set_offense(0);
    sim.state.keep_possession = false;
    let before = sim.events().len();

    sim.non_shooting_foul(false).unwrap();

    let new = &sim.events()[before..];
    assert!(new.iter().any(|e| matches!(e, GameEvent::Foul { kind: FoulKind::NonShooting, .. })));
    assert!(!new.iter().any(|e| matches!(e, GameEvent::Ft { .. })));
    assert!(sim.state.keep_possession);
    assert!(sim.state.ball_in_frontcourt);
}

/// Everyone settled long enough to be moved; the bench far better than the starters
fn loaded_benches<S: crate::engine::rng::Sampler>(sim: &mut GameSim<S>) {
    for team in &mut sim.teams {
        let n = team.on_court.len();
        for (i, p) in team.players.iter_mut().enumerate() {
            p.court_time = 10.0;
            p.bench_time = 10.0;
            if i >= n {
                p.value = 1000.0;
            }
        }
    }
}

#[test]
fn test_bonus_foul_substitutions_come_before_free_throws() {
    // 0.99 misses every free throw, so play continues with a rebound.
    let mut sim = GameSim::new(&demo_input(1), LeagueConfig::default(), ScriptedSampler::constant(0.99)).unwrap();
    sim.begin_regulation_period(1).unwrap();
    sim.state.clock_secs = 600.0;
    sim.state.set_offense(0);
    sim.state.fouls_this_period[1] = 5;
    loaded_benches(&mut sim);
    let before = sim.events().len();

    sim.non_shooting_foul(false).unwrap();

    let new = &sim.events()[before..];
    let first_ft = new.iter().position(|e| matches!(e, GameEvent::Ft { .. })).unwrap();
    let shooter = match &new[first_ft] {
        GameEvent::Ft { pid, made, .. } => {
            assert!(!made);
            *pid
        }
        _ => unreachable!(),
    };
    assert!(new.iter().any(|e| matches!(e, GameEvent::Reb { .. })));

    let subs: Vec<(usize, u32)> = new[..first_ft]
        .iter()
        .filter_map(|e| match e {
            GameEvent::Sub { t, pid_out, .. } => Some((*t, *pid_out)),
            _ => None,
        })
        .collect();
    assert!(subs.iter().any(|&(t, _)| t == 0), "offense never got its substitution window");
    assert!(subs.iter().any(|&(t, _)| t == 1), "defense never got its substitution window");
    assert!(!subs.contains(&(0, shooter)), "free throw shooter was taken off");
    assert!(!new[first_ft..].iter().any(|e| matches!(e, GameEvent::Sub { .. })));
}

#[test]
fn test_no_player_goes_out_and_back_in_at_one_stoppage() {
    let mut total_subs = 0;
    for seed in 0..10 {
        let result = play(LeagueConfig::default(), seed);
        let mut stoppages: HashMap<(usize, u64), (HashSet<u32>, HashSet<u32>)> = HashMap::new();
        let mut period = 0u32;
        for e in result.events.as_ref().unwrap() {
            match e {
                GameEvent::Period { period: p, .. } | GameEvent::Overtime { period: p, .. } => period = *p,
                GameEvent::Sub { t, pid_in, pid_out, clock } => {
                    total_subs += 1;
                    let key = (*t, ((period as u64) << 32) ^ clock.to_bits());
                    let (ins, outs) = stoppages.entry(key).or_default();
                    ins.insert(*pid_in);
                    outs.insert(*pid_out);
                }
                _ => {}
            }
        }
        for ((t, _), (ins, outs)) in &stoppages {
            assert!(ins.is_disjoint(outs), "seed {seed}: team {t} moved a player both ways at one stoppage");
        }
    }
    assert!(total_subs > 0);
}

#[test]
fn test_late_go_ahead_basket_is_a_game_winner() {
    let mut sim = GameSim::new(&demo_input(1), LeagueConfig::default(), ScriptedSampler::constant(0.5)).unwrap();
    sim.begin_regulation_period(1).unwrap();
    sim.state.period = 4;
    sim.state.clock_secs = 300.0;
    let away = sim.teams[1].on_court[0];
    sim.record_points(1, away, 2, Some(ShotKind::AtRim));
    sim.state.clock_secs = 12.0;
    let home = sim.teams[0].on_court[2];
    sim.record_points(0, home, 3, Some(ShotKind::ThreePointer));

    sim.record_game_winner();

    let plays = sim.clutch.clone().into_plays();
    assert_eq!(plays.len(), 1);
    assert_eq!(plays[0].kind, ClutchKind::GameWinner);
    assert_eq!(plays[0].pids, vec![sim.teams[0].players[home].id]);
    assert_eq!(plays[0].tids, vec![sim.teams[0].id]);
    assert!(plays[0].text.contains("game-winning"));
}

#[test]
fn test_go_ahead_basket_needs_late_window_and_close_margin() {
    // Go-ahead basket before the last 25 seconds
    let mut sim = GameSim::new(&demo_input(1), LeagueConfig::default(), ScriptedSampler::constant(0.5)).unwrap();
    sim.begin_regulation_period(1).unwrap();
    sim.state.period = 4;
    sim.state.clock_secs = 40.0;
    sim.record_points(0, sim.teams[0].on_court[0], 2, Some(ShotKind::MidRange));
    sim.record_game_winner();
    assert!(sim.clutch.clone().into_plays().is_empty());

    // Late basket, but the final margin is 4
    let mut sim = GameSim::new(&demo_input(1), LeagueConfig::default(), ScriptedSampler::constant(0.5)).unwrap();
    sim.begin_regulation_period(1).unwrap();
    sim.state.period = 4;
    sim.state.clock_secs = 10.0;
    sim.record_points(1, sim.teams[1].on_court[0], 3, Some(ShotKind::ThreePointer));
    sim.state.clock_secs = 5.0;
    sim.record_points(1, sim.teams[1].on_court[1], 1, None);
    sim.record_game_winner();
    assert!(sim.clutch.clone().into_plays().is_empty());
}

#[test]
fn test_late_equalizer_is_a_game_tying_play() {
    let mut sim = GameSim::new(&demo_input(1), LeagueConfig::default(), ScriptedSampler::constant(0.5)).unwrap();
    sim.begin_regulation_period(1).unwrap();
    sim.state.period = 4;
    sim.state.clock_secs = 200.0;
    sim.record_points(0, sim.teams[0].on_court[0], 2, Some(ShotKind::LowPost));
    sim.state.clock_secs = 3.5;
    let scorer = sim.teams[1].on_court[4];
    sim.record_points(1, scorer, 2, Some(ShotKind::MidRange));

    sim.record_game_tying_play();

    let plays = sim.clutch.clone().into_plays();
    assert_eq!(plays.len(), 1);
    assert_eq!(plays[0].kind, ClutchKind::GameTying);
    assert_eq!(plays[0].pids, vec![sim.teams[1].players[scorer].id]);
    assert_eq!(plays[0].tids, vec![sim.teams[1].id]);
    assert!(plays[0].text.contains("3.5 seconds"));
}

#[test]
fn test_clutch_plays_point_at_late_close_scores() {
    for seed in 0..30 {
        let result = play(LeagueConfig::default(), seed);
        let margin = result.teams[result.winner].pts - result.teams[result.loser()].pts;
        for clutch in &result.clutch_plays {
            let pid = clutch.pids[0];
            let play = result
                .scoring_summary
                .iter()
                .rev()
                .find(|p| p.pid == pid && p.clock <= 25.0)
                .unwrap();
            assert_eq!(clutch.tids, vec![result.teams[play.t].tid]);
            if clutch.kind == ClutchKind::GameWinner {
                assert!(margin <= 3, "seed {seed}: game winner in a {margin}-point game");
                assert_eq!(play.t, result.winner);
            }
        }
    }
}

#[test]
fn test_trailing_defense_fouls_intentionally() {
    let mut sim = GameSim::new(&demo_input(1), LeagueConfig::default(), SeededSampler::new(5)).unwrap();
    sim.begin_regulation_period(1).unwrap();
    sim.state.period = 4;
    sim.state.clock_secs = 30.0;
    sim.state.set_offense(0);
    sim.state.keep_possession = true;
    sim.teams[0].stat.totals.pts = 3;

    assert_eq!(sim.current_clock_factor(), ClockFactor::IntentionalFoul);
    let before = sim.events().len();
    sim.sim_possession().unwrap();

    let fouls: Vec<&GameEvent> = sim.events()[before..]
        .iter()
        .filter(|e| matches!(e, GameEvent::Foul { kind: FoulKind::Intentional, t: 1, .. }))
        .collect();
    assert_eq!(fouls.len(), 1);
    assert!(sim.state.clock_secs <= 29.0 && sim.state.clock_secs >= 26.0);
}

#[test]
fn test_leading_offense_runs_out_the_clock() {
    let mut sim = GameSim::new(&demo_input(1), LeagueConfig::default(), ScriptedSampler::constant(0.99)).unwrap();
    sim.begin_regulation_period(1).unwrap();
    sim.state.period = 4;
    sim.state.clock_secs = 10.0;
    sim.state.set_offense(0);
    sim.state.keep_possession = true;
    // Lead beyond the intentional-foul range
    sim.teams[0].stat.totals.pts = 10;

    assert_eq!(sim.current_clock_factor(), ClockFactor::RunOutClock);
    sim.sim_possession().unwrap();
    assert_eq!(sim.state.end_reason, Some(EndOfPeriodReason::RunOutClock));
    assert_eq!(sim.state.clock_secs, 0.0);
}

#[test]
fn test_trailing_offense_calls_timeout_to_advance() {
    let mut sim = GameSim::new(&demo_input(1), LeagueConfig::default(), ScriptedSampler::constant(0.99)).unwrap();
    sim.begin_regulation_period(1).unwrap();
    sim.state.period = 4;
    sim.state.clock_secs = 10.0;
    sim.state.set_offense(0);
    sim.state.keep_possession = true;
    sim.teams[1].stat.totals.pts = 2;
    let timeouts = sim.state.timeouts[0];
    let before = sim.events().len();

    sim.sim_possession().unwrap();

    assert_eq!(sim.state.timeouts[0], timeouts - 1);
    assert!(sim.events()[before..]
        .iter()
        .any(|e| matches!(e, GameEvent::Timeout { t: 0, advance_ball: true, .. })));
}

#[test]
fn test_same_seed_same_game() {
    let a = play(LeagueConfig::default(), 42);
    let b = play(LeagueConfig::default(), 42);
    assert_eq!(a, b);
    assert_eq!(a.determinism_hash(), b.determinism_hash());

    let c = play(LeagueConfig::default(), 43);
    assert_ne!(a.determinism_hash(), c.determinism_hash());
}

#[test]
fn test_box_score_matches_event_stream() {
    let result = play(LeagueConfig::default(), 11);
    let events = result.events.as_ref().unwrap();

    let mut pts = [0i64; 2];
    for e in events {
        if let GameEvent::Stat { t, stat: StatKind::Pts, amount, .. } = e {
            pts[*t] += *amount as i64;
        }
    }
    assert_eq!(pts[0], result.teams[0].pts as i64);
    assert_eq!(pts[1], result.teams[1].pts as i64);

    let mut prev = [0u32; 2];
    for play in &result.scoring_summary {
        assert!(play.score[0] >= prev[0] && play.score[1] >= prev[1]);
        prev = play.score;
    }
    assert_eq!(prev, result.score());
}

#[test]
fn test_fouled_out_player_never_returns() {
    for seed in 0..6 {
        let mut config = LeagueConfig::default();
        // Earlier disqualifications, still far from emptying the bench
        config.rules.fouls_until_foul_out = 4;
        let result = play(config, seed);
        let events = result.events.as_ref().unwrap();

        let mut gone: HashSet<(usize, u32)> = HashSet::new();
        for e in events {
            match e {
                GameEvent::FoulOut { t, pid, .. } => {
                    gone.insert((*t, *pid));
                }
                GameEvent::Sub { t, pid_in, .. } => {
                    assert!(!gone.contains(&(*t, *pid_in)), "player {pid_in} came back after fouling out");
                }
                _ => {}
            }
        }
    }
}

#[test]
fn test_play_by_play_off_keeps_stats() {
    let mut input = demo_input(8);
    input.do_play_by_play = false;
    let sim = GameSim::new(&input, LeagueConfig::default(), SeededSampler::new(8)).unwrap();
    let result = sim.run().unwrap();
    assert!(result.events.is_none());
    assert!(!result.scoring_summary.is_empty());
    assert!(result.teams[0].pts > 0 && result.teams[1].pts > 0);
}

#[test]
fn test_presets_play_full_games() {
    for (name, periods) in [("pro", 4), ("fiba", 4), ("college", 2)] {
        let config = LeagueConfig::preset(name).unwrap();
        let result = play(config, 21);
        let line = &result.teams[0].stat;
        assert!(result.teams.iter().all(|t| t.pts > 30), "{name}: implausible score");
        assert_eq!(result.events.as_ref().unwrap().iter().filter(|e| matches!(e, GameEvent::Period { .. })).count(), periods);
        assert!(line.totals.fga > 0);
    }
}

#[test]
fn test_sudden_target_ending() {
    for seed in 0..4 {
        let result = play(LeagueConfig::exhibition(), seed);
        let events = result.events.as_ref().unwrap();
        let target = events
            .iter()
            .find_map(|e| match e {
                GameEvent::ElamActive { target, .. } => Some(*target),
                _ => None,
            })
            .unwrap();

        assert_eq!(result.overtimes, 0);
        assert!(result.teams[result.winner].pts >= target);
        assert!(result.teams[result.loser()].pts < target);
        let last_end = events
            .iter()
            .rev()
            .find_map(|e| match e {
                GameEvent::EndOfPeriod { reason, .. } => Some(*reason),
                _ => None,
            })
            .unwrap();
        assert_eq!(last_end, EndOfPeriodReason::ElamTarget);
    }
}

#[test]
fn test_no_overtime_goes_to_shootout() {
    for seed in 0..20 {
        let mut config = LeagueConfig::default();
        config.rules.max_overtimes = Some(0);
        let result = play(config, seed);
        assert_eq!(result.overtimes, 0);
        match result.shootout {
            Some(s) => {
                assert_eq!(result.teams[0].pts, result.teams[1].pts);
                assert_ne!(s[0], s[1]);
                assert_eq!(result.winner, usize::from(s[1] > s[0]));
            }
            None => assert_ne!(result.teams[0].pts, result.teams[1].pts),
        }
    }
}

#[test]
fn test_shootout_always_produces_a_winner() {
    let mut sim = GameSim::new(&demo_input(1), LeagueConfig::default(), SeededSampler::new(3)).unwrap();
    sim.run_shootout().unwrap();
    let s = sim.shootout.unwrap();
    assert_ne!(s[0], s[1]);
    let rounds = sim
        .events()
        .iter()
        .filter(|e| matches!(e, GameEvent::ShootoutShot { t: 0, .. }))
        .count() as u32;
    assert!(rounds >= sim.config.rules.shootout_rounds);
}

#[test]
fn test_input_is_not_mutated() {
    let input = demo_input(4);
    let copy = input.clone();
    let sim = GameSim::new(&input, LeagueConfig::default(), SeededSampler::new(4)).unwrap();
    sim.run().unwrap();
    assert_eq!(input, copy);
}

#[test]
fn test_contract_violations_rejected_up_front() {
    let mut input = demo_input(1);
    input.teams[1].players.truncate(4);
    let err = GameSim::new(&input, LeagueConfig::default(), SeededSampler::new(1)).err().unwrap();
    assert!(matches!(err, SimError::InvalidRoster { team: 1, .. }));
    assert!(err.is_contract_violation());

    let mut config = LeagueConfig::default();
    config.rules.num_periods = 0;
    let err = GameSim::new(&demo_input(1), config, SeededSampler::new(1)).err().unwrap();
    assert!(matches!(err, SimError::InvalidConfig(_)));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn prop_every_game_has_a_winner(seed in any::<u64>(), hcf in 0.0f64..2.0) {
        let mut input = demo_input(9);
        input.home_court_factor = hcf;
        let sim = GameSim::new(&input, LeagueConfig::default(), SeededSampler::new(seed)).unwrap();
        let result = sim.run().unwrap();

        let [home, away] = &result.teams;
        prop_assert!(home.won != away.won);
        if result.shootout.is_none() {
            prop_assert_ne!(home.pts, away.pts);
            prop_assert_eq!(result.teams[result.winner].pts, home.pts.max(away.pts));
        }
        for team in &result.teams {
            let starters = team.players.iter().filter(|p| p.stat.gs == 1).count();
            prop_assert_eq!(starters, 5);
            let minutes: f64 = team.players.iter().map(|p| p.stat.min).sum();
            let expected = 5.0 * (48.0 + 5.0 * result.overtimes as f64);
            prop_assert!((minutes - expected).abs() < 1e-6);
        }
    }
}
