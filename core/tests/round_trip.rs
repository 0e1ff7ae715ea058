//! Folding the accumulator over the log reproduces the box score.

mod common;

use sportsim_core::{
    event::kind,
    stats::{Stat, StatAccumulator},
    types::{Side, SportKind},
};

#[test]
fn folded_log_matches_box_score() {
    for sport in SportKind::ALL {
        for seed in 0..6u64 {
            let result = common::play(sport, seed);
            let folded = StatAccumulator::fold(&result.event_log);
            assert!(
                result.box_score.agrees_with(&folded),
                "{sport} seed {seed}: fold disagrees with box score"
            );
        }
    }
}

#[test]
fn team_points_equal_the_score_after_every_event() {
    for sport in SportKind::ALL {
        let result = common::play(sport, 11);
        let mut acc = StatAccumulator::new();
        for event in &result.event_log {
            acc.apply_event(event);
            let folded = [acc.score(Side::Home), acc.score(Side::Away)];
            assert_eq!(folded, event.score, "{sport}: score drift at event {}", event.seq);
        }
        assert_eq!(acc.team(Side::Home).get(Stat::Points), result.box_score.team(Side::Home).score);
    }
}

#[test]
fn last_event_is_a_visible_final() {
    for sport in SportKind::ALL {
        let result = common::play(sport, 5);
        let last = result.event_log.last().expect("non-empty log");
        assert_eq!(last.kind, kind::GAME_END);
        assert!(!last.hide);
        assert!(last.text.starts_with("Final"));
        assert_eq!(result.last_visible_score(), Some(result.box_score.score()));
    }
}

#[test]
fn player_lines_sum_to_attributed_team_totals() {
    // Player deltas always count toward the team line, so no player can
    // exceed the team on any counter.
    for sport in SportKind::ALL {
        let result = common::play(sport, 21);
        for team in &result.box_score.teams {
            for player in &team.players {
                for (stat, value) in player.stats.iter() {
                    assert!(
                        value <= team.totals.get(stat),
                        "{sport}: {} {stat:?} {value} > team {}",
                        player.name,
                        team.totals.get(stat)
                    );
                }
            }
        }
    }
}
