//! End-to-end scenarios: evenly matched teams, a short roster, a
//! cancelled replay.

mod common;

use sportsim_core::{
    config::SimConfig,
    engine::GameEngine,
    error::{ConfigError, RosterError, SimError},
    finalizer::ScoringBias,
    live::{LiveSim, SportState},
    simulate_game,
    snapshot::Position,
    sport::{Basketball, Hockey},
    stats::Stat,
    types::{Side, SportKind},
};

#[test]
fn even_rosters_seed_42_is_reproducible() {
    common::init_logging();
    let (home, away) = common::even_teams(SportKind::Basketball, 42);
    let config = SimConfig::default_for(SportKind::Basketball);
    assert_eq!(config.rules.num_periods, 4);

    let first = simulate_game(&home, &away, &config, 42, None).expect("game");
    let second = simulate_game(&home, &away, &config, 42, None).expect("game");
    assert_eq!(first.winner(), second.winner());
    assert_eq!(first.box_score, second.box_score);

    let mut points = [0u32; 2];
    for event in &first.event_log {
        for delta in event.stats.iter().filter(|d| d.stat == Stat::Points) {
            points[delta.side.index()] += delta.amount;
        }
    }
    assert_eq!(Some(points), first.last_visible_score());
    assert_eq!(points, first.box_score.score());
    assert_eq!(points[Side::Home.index()], first.box_score.team(Side::Home).totals.get(Stat::Points));
}

#[test]
fn missing_mandatory_position_fails_before_any_play() {
    let (mut home, away) = common::teams(SportKind::Basketball);
    home.players.retain(|p| p.position != Position::Center);
    let config = SimConfig::default_for(SportKind::Basketball);

    let err = simulate_game(&home, &away, &config, 42, None).expect_err("no center");
    match err {
        SimError::Roster(RosterError::MissingPosition { position, required, available, .. }) => {
            assert_eq!(position, Position::Center);
            assert_eq!(required, 1);
            assert_eq!(available, 0);
        }
        other => panic!("expected a roster error, got {other}"),
    }

    // The engine never comes into existence, so there is no log to read.
    let engine = GameEngine::<Basketball>::new(&home, &away, &config, 42, ScoringBias::none());
    assert!(engine.is_err());
}

#[test]
fn injured_players_do_not_count_toward_requirements() {
    let (mut home, away) = common::teams(SportKind::Hockey);
    for p in home.players.iter_mut().filter(|p| p.position == Position::Goalie) {
        p.injured = true;
    }
    let config = SimConfig::default_for(SportKind::Hockey);
    let err = simulate_game(&home, &away, &config, 1, None).expect_err("no healthy goalie");
    assert!(matches!(err, SimError::Roster(RosterError::MissingPosition { .. })));
}

#[test]
fn engine_rejects_config_for_another_sport() {
    let (home, away) = common::teams(SportKind::Basketball);
    let config = SimConfig::default_for(SportKind::Basketball);
    let err = GameEngine::<Hockey>::new(&home, &away, &config, 1, ScoringBias::none())
        .err()
        .expect("sport mismatch");
    assert!(matches!(err, SimError::Config(ConfigError::SportMismatch { .. })));
}

#[test]
fn engine_steps_one_play_at_a_time() {
    let (home, away) = common::teams(SportKind::Basketball);
    let config = SimConfig::default_for(SportKind::Basketball);
    let mut engine =
        GameEngine::<Basketball>::new(&home, &away, &config, 4, ScoringBias::none()).expect("engine");
    assert!(engine.log().is_empty());
    let mut steps = 0;
    while !engine.advance() {
        steps += 1;
        assert!(steps < 100_000, "game never ended");
    }
    assert!(engine.is_final());
    assert!(engine.advance(), "advance after final stays final");
    let len = engine.log().len();
    let result = engine.into_result();
    assert_eq!(result.event_log.len(), len);
    assert_eq!(result, simulate_game(&home, &away, &config, 4, None).expect("same game"));
}

#[test]
fn cancelled_replay_then_fresh_replay_agree_at_index_10() {
    let result = common::play(SportKind::Football, 42);
    let sport = result.box_score.sport;
    let log = result.event_log.clone();

    let mut live = LiveSim::from_result(result);
    for _ in 0..10 {
        live.step().expect("event available");
    }
    let at_cancel = live.state().clone();
    live.cancel();
    assert!(live.step().is_none());

    let mut fresh = live.replay();
    for _ in 0..10 {
        fresh.step().expect("event available");
    }
    assert_eq!(fresh.state(), &at_cancel);
    assert_eq!(SportState::at(sport, &log, 10), at_cancel);
    assert_eq!(at_cancel.index, 10);
}
