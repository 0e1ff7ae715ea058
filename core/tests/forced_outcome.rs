//! Commissioner-forced results.

mod common;

use sportsim_core::{
    config::SimConfig,
    error::{ConfigError, SimError},
    finalizer::{ForcedOutcome, Winner},
    simulate_game,
    types::{Side, SportKind},
};

#[test]
fn enough_budget_reaches_the_requested_winner() {
    common::init_logging();
    for sport in SportKind::ALL {
        let (home, away) = common::teams(sport);
        let config = SimConfig::default_for(sport);
        for side in Side::BOTH {
            let target = ForcedOutcome::Win(side);
            let result = simulate_game(&home, &away, &config, 17, Some(target))
                .unwrap_or_else(|e| panic!("{sport} forced {target}: {e}"));
            assert_eq!(result.winner().side(), Some(side), "{sport}");
            let summary = result.box_score.forced.expect("forced summary");
            assert_eq!(summary.target, target);
            assert!(summary.tries >= 1 && summary.tries <= config.forced.max_tries);
            assert_eq!(summary.bonus_granted, summary.tries > config.forced.bonus_after);
        }
    }
}

#[test]
fn first_attempt_is_the_unforced_game_when_it_already_matches() {
    let sport = SportKind::Basketball;
    let natural = common::play(sport, 23);
    let side = natural.winner().side().expect("basketball decides a winner");
    let (home, away) = common::teams(sport);
    let forced = simulate_game(
        &home,
        &away,
        &SimConfig::default_for(sport),
        23,
        Some(ForcedOutcome::Win(side)),
    )
    .expect("forced game");
    let summary = forced.box_score.forced.expect("summary");
    assert_eq!(summary.tries, 1);
    assert_eq!(summary.attempt_seed, 23);
}

#[test]
fn exhausted_budget_reports_the_closest_result() {
    let sport = SportKind::Basketball;
    let natural = common::play(sport, 31);
    let loser = natural.winner().side().expect("decided").other();

    let mut config = SimConfig::default_for(sport);
    config.forced.max_tries = 1;
    config.forced.step = 0.0;
    config.forced.bonus = 0.0;
    let (home, away) = common::teams(sport);
    match simulate_game(&home, &away, &config, 31, Some(ForcedOutcome::Win(loser))) {
        Err(SimError::ForcedOutcomeExhausted { target, tries, closest }) => {
            assert_eq!(target, ForcedOutcome::Win(loser));
            assert_eq!(tries, 1);
            assert_ne!(closest.winner().side(), Some(loser));
        }
        Ok(r) => panic!("expected exhaustion, got {:?}", r.box_score.score()),
        Err(e) => panic!("expected exhaustion, got {e}"),
    }
}

#[test]
fn forced_tie_is_rejected_when_ties_cannot_happen() {
    let sport = SportKind::Hockey;
    let (home, away) = common::teams(sport);
    let err = simulate_game(&home, &away, &SimConfig::default_for(sport), 1, Some(ForcedOutcome::Tie))
        .expect_err("hockey with a shootout cannot tie");
    assert!(matches!(err, SimError::Config(ConfigError::TieNotPossible)));
}

#[test]
fn forced_tie_is_reachable_when_ties_are_allowed() {
    let sport = SportKind::Hockey;
    let mut config = SimConfig::default_for(sport);
    config.rules.ties_allowed = true;
    config.rules.overtime.shootout = false;
    config.rules.period_length = 120;
    let (home, away) = common::teams(sport);
    let result = simulate_game(&home, &away, &config, 9, Some(ForcedOutcome::Tie)).expect("tie");
    assert_eq!(result.winner(), Winner::Tie);
}
