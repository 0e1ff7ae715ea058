//! Regulation ties and what the rules do with them.

mod common;

use sportsim_core::{
    box_score::GameResult,
    config::SimConfig,
    error::{ConfigError, SimError},
    event::kind,
    finalizer::Winner,
    simulate_game,
    types::SportKind,
};

/// Score at the end of the last regulation period.
fn regulation_score(result: &GameResult, num_periods: u32) -> [u32; 2] {
    result
        .event_log
        .iter()
        .find(|e| e.kind == kind::PERIOD_END && e.period == num_periods)
        .map(|e| e.score)
        .expect("regulation end recorded")
}

/// Short hockey periods: goals are rare, so regulation ties are common.
fn short_hockey() -> SimConfig {
    let mut config = SimConfig::default_for(SportKind::Hockey);
    config.rules.period_length = 60;
    config.rules.overtime.length = 60;
    config
}

#[test]
fn regulation_tie_goes_to_overtime_when_ties_are_disallowed() {
    common::init_logging();
    let config = short_hockey();
    let mut ties = 0;
    for seed in 0..30u64 {
        let result = common::play_with(&config, seed);
        let [home, away] = regulation_score(&result, config.rules.num_periods);
        if home == away {
            ties += 1;
            assert!(result.box_score.overtimes >= 1, "seed {seed}: tie without overtime");
            assert_ne!(result.winner(), Winner::Tie, "seed {seed}: shootout must decide");
        } else {
            assert_eq!(result.box_score.overtimes, 0, "seed {seed}: overtime after a decided game");
        }
    }
    assert!(ties > 0, "no regulation tie in 30 short games");
}

#[test]
fn shootout_without_any_overtime_is_rejected() {
    let mut config = short_hockey();
    config.rules.overtime.max_overtimes = Some(0);
    let (home, away) = common::teams(SportKind::Hockey);
    let err = simulate_game(&home, &away, &config, 0, None).err().expect("config rejected");
    assert!(matches!(
        err,
        SimError::Config(ConfigError::InvalidRule { name: "overtime.max_overtimes", .. })
    ));

    config.rules.overtime.max_overtimes = Some(1);
    for seed in 0..30u64 {
        let result = common::play_with(&config, seed);
        let [home, away] = regulation_score(&result, config.rules.num_periods);
        if home == away {
            assert_eq!(result.box_score.overtimes, 1, "seed {seed}: tie skipped overtime");
        }
    }
}

#[test]
fn ties_allowed_never_plays_overtime() {
    let mut config = short_hockey();
    config.rules.ties_allowed = true;
    config.rules.overtime.shootout = false;
    let mut ties = 0;
    for seed in 0..30u64 {
        let result = common::play_with(&config, seed);
        assert_eq!(result.box_score.overtimes, 0);
        assert_eq!(result.box_score.periods, config.rules.num_periods);
        if result.winner() == Winner::Tie {
            ties += 1;
        }
    }
    assert!(ties > 0, "no tie in 30 short games with ties allowed");
}

#[test]
fn shootout_only_follows_a_tied_overtime() {
    let config = short_hockey();
    for seed in 0..30u64 {
        let result = common::play_with(&config, seed);
        let shootout = result.event_log.iter().any(|e| e.kind == "shootout_attempt");
        if shootout {
            assert_eq!(result.box_score.overtimes, 1);
            let after_ot = result
                .event_log
                .iter()
                .rev()
                .find(|e| e.kind == kind::PERIOD_END)
                .map(|e| e.score)
                .expect("overtime end");
            assert_eq!(after_ot[0], after_ot[1], "seed {seed}: shootout after a decided overtime");
        }
    }
}

#[test]
fn capped_overtime_without_shootout_can_end_level() {
    let mut config = SimConfig::default_for(SportKind::Basketball);
    config.rules.period_length = 60;
    config.rules.overtime.length = 30;
    config.rules.overtime.max_overtimes = Some(2);
    for seed in 0..40u64 {
        let result = common::play_with(&config, seed);
        assert!(result.box_score.overtimes <= 2);
        if result.winner() == Winner::Tie {
            assert_eq!(result.box_score.overtimes, 2, "seed {seed}: tie before the cap");
        }
    }
}

#[test]
fn extra_innings_only_when_tied_after_nine() {
    for seed in 0..20u64 {
        let result = common::play(SportKind::Baseball, seed);
        let [home, away] = regulation_score(&result, 9);
        if result.box_score.periods > 9 {
            assert_eq!(home, away, "seed {seed}: extra innings after a decided ninth");
        }
        assert_ne!(result.winner(), Winner::Tie);
    }
}
