//! Play-by-play logger.
//!
//! RULE: `record` appends. Nothing is ever edited or removed, so every
//! prefix of the log is a valid partial game.

use crate::{
    event::{kind, PlayByPlayEvent},
    types::{Seconds, Side},
};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayByPlayLog {
    events: Vec<PlayByPlayEvent>,
}

/// One row of the scoring summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoringPlay {
    pub seq:    u32,
    pub side:   Side,
    pub period: u32,
    pub clock:  Seconds,
    pub text:   String,
    pub score:  [u32; 2],
}

impl PlayByPlayLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence number the next recorded event must carry.
    pub fn next_seq(&self) -> u32 {
        self.events.len() as u32
    }

    pub fn record(&mut self, event: PlayByPlayEvent) {
        debug_assert_eq!(event.seq, self.next_seq(), "events are recorded in order");
        self.events.push(event);
    }

    pub fn events(&self) -> &[PlayByPlayEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_events(self) -> Vec<PlayByPlayEvent> {
        self.events
    }

    pub fn scoring_summary(&self) -> Vec<ScoringPlay> {
        scoring_summary(&self.events)
    }
}

/// Visible scoring plays in order, each under the side that scored. A
/// conversion following a summary row (the kick after a touchdown) is
/// folded into that row's text and score instead of getting a row of
/// its own. Injury and substitution notices in between do not break
/// the fold.
pub fn scoring_summary(events: &[PlayByPlayEvent]) -> Vec<ScoringPlay> {
    let mut rows: Vec<ScoringPlay> = Vec::new();
    let mut tail_seq: Option<u32> = None;
    for event in events {
        if event.hide {
            if let (Some(row), Some(tail)) = (rows.last_mut(), tail_seq) {
                if event.seq == tail + 1 && event.kind == kind::CONVERSION {
                    row.text.push_str(&format!(" ({})", event.text));
                    row.score = event.score;
                    tail_seq = Some(event.seq);
                }
            }
            continue;
        }
        if event.is_scoring() {
            rows.push(ScoringPlay {
                seq: event.seq,
                side: event.scoring_side().unwrap_or(event.side),
                period: event.period,
                clock: event.clock,
                text: event.text.clone(),
                score: event.score,
            });
            tail_seq = Some(event.seq);
        } else if event.is_roster_notice() && tail_seq.map_or(false, |t| event.seq == t + 1) {
            tail_seq = Some(event.seq);
        } else {
            tail_seq = None;
        }
    }
    rows
}
