//! Per-sport rules behind one trait.
//!
//! RULE: the state machine in `engine.rs` never matches on a sport.
//! Everything that differs between sports (situational state, period
//! rules, lineups, play resolution, overtime hooks) lives behind `Sport`
//! and is chosen once, at game setup, by static dispatch.

pub mod baseball;
pub mod basketball;
pub mod football;
pub mod hockey;

pub use baseball::Baseball;
pub use basketball::Basketball;
pub use football::Football;
pub use hockey::Hockey;

use crate::{
    clock::GameClock,
    config::{GameRules, RatingRange, SimConfig},
    event::Situation,
    outcome::PlayOutcome,
    player::TeamGameState,
    resolver::PlayContext,
    rng::GameRng,
    snapshot::{Position, RosterRequirements},
    types::{Seconds, Side, SportKind},
};
use std::fmt::Debug;

pub trait Sport: Debug + Clone + Copy + Default + Send + Sync + 'static {
    const KIND: SportKind;
    /// On-field players accrue `SecondsPlayed` as the clock runs.
    const TRACKS_TIME: bool;

    type Situation: Debug + Clone;
    type Delta: Debug + Clone;

    fn requirements() -> RosterRequirements;

    fn new_situation(teams: &[TeamGameState; 2], range: RatingRange) -> Self::Situation;

    /// Serialisable view of the situation for the event log.
    fn snapshot(state: &GameState<Self>) -> Situation;

    /// Reset situational state for a period whose clock the engine has
    /// already started. Returns the text of the period-start event.
    fn start_period(
        state: &mut GameState<Self>,
        teams: &[TeamGameState; 2],
        config: &SimConfig,
        rng: &mut GameRng,
    ) -> String;

    /// Choose lineups before a play. Returns bookkeeping notices
    /// (pitching changes) to record ahead of the play.
    fn prepare(
        state: &mut GameState<Self>,
        teams: &mut [TeamGameState; 2],
        range: RatingRange,
    ) -> Vec<Notice>;

    /// Resolve exactly one play. Never mutates anything.
    fn resolve(ctx: &PlayContext<'_, Self>, rng: &mut GameRng) -> PlayOutcome<Self::Delta>;

    /// Apply a play's situational delta and possession change. The score
    /// has already been updated by the engine.
    fn apply(state: &mut GameState<Self>, outcome: &PlayOutcome<Self::Delta>);

    fn period_over(state: &GameState<Self>, _rules: &GameRules) -> bool {
        state.clock.expired()
    }

    /// Energy lost by an on-field player at `position` over one play.
    fn drain(elapsed: Seconds, position: Position) -> f64;

    /// Energy regained by a bench player over one play.
    fn recovery(elapsed: Seconds) -> f64;

    /// Tie-break after the last overtime, for rules that allow one.
    fn shootout(
        _state: &GameState<Self>,
        _teams: &[TeamGameState; 2],
        _config: &SimConfig,
        _rng: &mut GameRng,
    ) -> Vec<PlayOutcome<Self::Delta>> {
        Vec::new()
    }
}

/// Clock, score, possession and the sport's situation.
#[derive(Debug, Clone)]
pub struct GameState<S: Sport> {
    pub clock:      GameClock,
    /// [home, away].
    pub score:      [u32; 2],
    /// Side on offense (batting side in baseball).
    pub possession: Side,
    pub overtimes:  u32,
    pub situation:  S::Situation,
}

impl<S: Sport> GameState<S> {
    pub fn new(teams: &[TeamGameState; 2], range: RatingRange) -> Self {
        Self {
            clock: GameClock::pregame(),
            score: [0, 0],
            possession: Side::Home,
            overtimes: 0,
            situation: S::new_situation(teams, range),
        }
    }

    pub fn score_of(&self, side: Side) -> u32 {
        self.score[side.index()]
    }

    /// Points `side` leads by (negative when trailing).
    pub fn margin(&self, side: Side) -> i64 {
        i64::from(self.score_of(side)) - i64::from(self.score_of(side.other()))
    }

    pub fn tied(&self) -> bool {
        self.score[0] == self.score[1]
    }

    pub fn in_overtime(&self, rules: &GameRules) -> bool {
        self.clock.period > rules.num_periods
    }
}

/// A bookkeeping row the state machine records outside of a play.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub side: Side,
    pub kind: &'static str,
    pub text: String,
    pub hide: bool,
}

impl Notice {
    pub fn new(side: Side, kind: &'static str, text: impl Into<String>) -> Self {
        Self { side, kind, text: text.into(), hide: false }
    }
}

/// Play length scaled by the pace factor, never zero.
pub(crate) fn paced(seconds: u32, pace: f64) -> Seconds {
    let pace = if pace > 0.0 { pace } else { 1.0 };
    ((f64::from(seconds) / pace).round() as u32).max(1)
}

/// Clamp a probability into a range that keeps every branch reachable.
pub(crate) fn prob(p: f64) -> f64 {
    if p.is_nan() {
        return 0.5;
    }
    p.clamp(0.01, 0.97)
}
