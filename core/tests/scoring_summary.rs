//! Scoring summaries skip bookkeeping rows.

mod common;

use sportsim_core::{event::kind, types::SportKind};

#[test]
fn summary_rows_point_at_visible_scoring_events() {
    for sport in SportKind::ALL {
        let result = common::play(sport, 13);
        let summary = result.scoring_summary();
        let visible_scoring = result
            .event_log
            .iter()
            .filter(|e| !e.hide && e.is_scoring())
            .count();
        assert_eq!(summary.len(), visible_scoring, "{sport}");
        for row in &summary {
            let event = &result.event_log[row.seq as usize];
            assert!(!event.hide, "{sport}: summary row from a hidden event");
            assert!(event.is_scoring());
        }
    }
}

#[test]
fn touchdown_rows_absorb_the_conversion() {
    let mut checked = 0;
    for seed in 0..5u64 {
        let result = common::play(SportKind::Football, seed);
        let summary = result.scoring_summary();
        for row in &summary {
            let next = result.event_log.get(row.seq as usize + 1);
            if let Some(next) = next.filter(|e| e.kind == kind::CONVERSION) {
                assert!(row.text.ends_with(&format!("({})", next.text)));
                assert_eq!(row.score, next.score);
                checked += 1;
            }
        }
    }
    assert!(checked > 0, "no touchdown in five football games");
}
