//! Play-by-play events, the append-only record of a game.
//!
//! RULE: an event is never mutated once recorded. Each event carries
//! the stat deltas of its play and a situation snapshot, so any prefix
//! of the log is enough to rebuild the score, the box score and the
//! live display up to that point.

use crate::{
    sport::{
        baseball::BaseballView,
        basketball::BasketballSituation,
        football::FootballSituation,
        hockey::HockeySituation,
    },
    stats::{Stat, StatDelta},
    types::{Seconds, Side},
};
use serde::{Deserialize, Serialize};

/// Event kinds recorded by the state machine itself. Play kinds come
/// from each sport's resolver.
pub mod kind {
    pub const PERIOD_START: &str = "period_start";
    pub const PERIOD_END:   &str = "period_end";
    pub const SUBSTITUTION: &str = "substitution";
    pub const INJURY:       &str = "injury";
    pub const GAME_END:     &str = "game_end";
    /// Try after a touchdown; folded into the touchdown's summary row.
    pub const CONVERSION:   &str = "point_after";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayByPlayEvent {
    pub seq:       u32,
    /// Side the event belongs to (the offense for plays).
    #[serde(rename = "t")]
    pub side:      Side,
    pub period:    u32,
    /// Seconds left in the period after the event.
    pub clock:     Seconds,
    #[serde(rename = "type")]
    pub kind:      String,
    pub text:      String,
    /// Bookkeeping rows: counted in stats and score, kept out of the
    /// scoring summary and live display.
    #[serde(default)]
    pub hide:      bool,
    /// [home, away] after the event.
    pub score:     [u32; 2],
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stats:     Vec<StatDelta>,
    pub situation: Situation,
}

impl PlayByPlayEvent {
    /// Points recorded by this event.
    pub fn points(&self) -> u32 {
        self.stats
            .iter()
            .filter(|d| d.stat == Stat::Points)
            .map(|d| d.amount)
            .sum()
    }

    pub fn is_scoring(&self) -> bool {
        self.points() > 0
    }

    /// Side whose score went up. Differs from `side` on defensive scores.
    pub fn scoring_side(&self) -> Option<Side> {
        self.stats
            .iter()
            .find(|d| d.stat == Stat::Points && d.amount > 0)
            .map(|d| d.side)
    }

    /// Roster bookkeeping that may sit between a play and its follow-up.
    pub fn is_roster_notice(&self) -> bool {
        self.kind == kind::INJURY || self.kind == kind::SUBSTITUTION
    }

    pub fn is_period_end(&self) -> bool {
        self.kind == kind::PERIOD_END
    }
}

/// Serialisable situational state at the time of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "sport", rename_all = "snake_case")]
pub enum Situation {
    Pregame,
    Basketball(BasketballSituation),
    Football(FootballSituation),
    Hockey(HockeySituation),
    Baseball(BaseballView),
}

impl Situation {
    /// Short scoreboard annotation ("2nd & 7 at OPP 35", "2 outs, 1-2").
    pub fn describe(&self) -> String {
        match self {
            Situation::Pregame => String::new(),
            Situation::Basketball(s) => s.describe(),
            Situation::Football(s) => s.describe(),
            Situation::Hockey(s) => s.describe(),
            Situation::Baseball(s) => s.describe(),
        }
    }
}
