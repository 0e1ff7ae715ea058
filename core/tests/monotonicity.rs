//! Counters never decrease; clock and period never regress.

mod common;

use proptest::prelude::*;
use sportsim_core::{
    stats::StatAccumulator,
    types::{Side, SportKind},
};

fn check_monotone(sport: SportKind, seed: u64) -> Result<(), TestCaseError> {
    let result = common::play(sport, seed);
    let mut acc = StatAccumulator::new();
    let mut prev_key = (0u32, i64::MIN);
    let mut prev_score = [0u32; 2];

    for event in &result.event_log {
        let before = [acc.team(Side::Home).clone(), acc.team(Side::Away).clone()];
        acc.apply_event(event);
        for side in Side::BOTH {
            prop_assert!(before[side.index()].dominated_by(acc.team(side)));
        }

        // Within a period the clock only counts down.
        let key = if sport.clocked() {
            (event.period, -i64::from(event.clock))
        } else {
            (event.period, 0)
        };
        prop_assert!(key >= prev_key, "{sport} seed {seed}: {key:?} after {prev_key:?}");
        prev_key = key;

        prop_assert!(event.score[0] >= prev_score[0] && event.score[1] >= prev_score[1]);
        prev_score = event.score;
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn basketball_never_regresses(seed in any::<u64>()) {
        check_monotone(SportKind::Basketball, seed)?;
    }

    #[test]
    fn football_never_regresses(seed in any::<u64>()) {
        check_monotone(SportKind::Football, seed)?;
    }

    #[test]
    fn hockey_never_regresses(seed in any::<u64>()) {
        check_monotone(SportKind::Hockey, seed)?;
    }

    #[test]
    fn baseball_never_regresses(seed in any::<u64>()) {
        check_monotone(SportKind::Baseball, seed)?;
    }
}
