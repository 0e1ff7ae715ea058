//! Stat accumulator: the single writer of box-score numbers.
//!
//! RULE: totals are additive counters and only ever increase. Anything
//! that can go negative (net yards) is stored as separate gain and loss
//! counters; percentages are derived at read time from the counts.
//!
//! Every delta the accumulator sees is also carried on the play's
//! `PlayByPlayEvent`, so folding the event log from empty reproduces
//! the same totals.

use crate::{
    event::PlayByPlayEvent,
    outcome::PlayOutcome,
    types::{PlayerId, Side},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counting stats across all four sports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    /// The scoring unit of every sport: points, goals, runs.
    Points,
    SecondsPlayed,

    // ── Basketball ─────────────────────────────────
    FieldGoalsMade,
    FieldGoalsAttempted,
    ThreesMade,
    ThreesAttempted,
    FreeThrowsMade,
    FreeThrowsAttempted,
    OffensiveRebounds,
    DefensiveRebounds,
    Assists,
    Steals,
    Blocks,
    Turnovers,
    Fouls,

    // ── Football ───────────────────────────────────
    PassAttempts,
    PassCompletions,
    PassYards,
    PassTouchdowns,
    InterceptionsThrown,
    Sacked,
    SackYardsLost,
    RushAttempts,
    RushYards,
    RushYardsLost,
    RushTouchdowns,
    Receptions,
    ReceivingYards,
    ReceivingTouchdowns,
    Fumbles,
    FumblesLost,
    Tackles,
    Sacks,
    Interceptions,
    FumbleRecoveries,
    KicksMade,
    KicksAttempted,
    ExtraPointsMade,
    ExtraPointsAttempted,
    Punts,
    PuntYards,
    KickReturns,
    KickReturnYards,
    ReturnTouchdowns,
    Penalties,
    PenaltyYards,
    FirstDowns,
    Safeties,

    // ── Hockey ─────────────────────────────────────
    Goals,
    Shots,
    ShotsAgainst,
    Saves,
    GoalsAgainst,
    BodyChecks,
    FaceoffsWon,
    FaceoffsLost,
    PenaltyMinutes,
    PowerPlayGoals,
    ShootoutAttempts,
    ShootoutGoals,

    // ── Baseball ───────────────────────────────────
    PlateAppearances,
    AtBats,
    Hits,
    Doubles,
    Triples,
    HomeRuns,
    RunsBattedIn,
    Walks,
    Strikeouts,
    HitByPitch,
    SacrificeFlies,
    PitchesThrown,
    OutsRecorded,
    HitsAllowed,
    RunsAllowed,
    WalksAllowed,
    StrikeoutsPitched,
    HomeRunsAllowed,
    Errors,
    DoublePlays,
}

/// One additive change: `amount` of `stat` for a side and, optionally,
/// a player. Team-only deltas (safeties, shootout winner) have no player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatDelta {
    pub side:   Side,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerId>,
    pub stat:   Stat,
    pub amount: u32,
}

impl StatDelta {
    pub fn player(side: Side, player: PlayerId, stat: Stat, amount: u32) -> Self {
        Self { side, player: Some(player), stat, amount }
    }

    pub fn team(side: Side, stat: Stat, amount: u32) -> Self {
        Self { side, player: None, stat, amount }
    }
}

/// A bag of counters with derived rates computed on read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatLine(BTreeMap<Stat, u32>);

impl StatLine {
    pub fn get(&self, stat: Stat) -> u32 {
        self.0.get(&stat).copied().unwrap_or(0)
    }

    pub fn add(&mut self, stat: Stat, amount: u32) {
        if amount == 0 {
            return;
        }
        *self.0.entry(stat).or_insert(0) += amount;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stat, u32)> + '_ {
        self.0.iter().map(|(s, v)| (*s, *v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every counter in `self` is <= its counterpart in `later`.
    pub fn dominated_by(&self, later: &StatLine) -> bool {
        self.iter().all(|(stat, v)| later.get(stat) >= v)
    }

    // ── Derived rates ──────────────────────────────────────────────

    pub fn field_goal_pct(&self) -> Option<f64> {
        ratio(self.get(Stat::FieldGoalsMade), self.get(Stat::FieldGoalsAttempted))
    }

    pub fn three_point_pct(&self) -> Option<f64> {
        ratio(self.get(Stat::ThreesMade), self.get(Stat::ThreesAttempted))
    }

    pub fn free_throw_pct(&self) -> Option<f64> {
        ratio(self.get(Stat::FreeThrowsMade), self.get(Stat::FreeThrowsAttempted))
    }

    pub fn rebounds(&self) -> u32 {
        self.get(Stat::OffensiveRebounds) + self.get(Stat::DefensiveRebounds)
    }

    pub fn completion_pct(&self) -> Option<f64> {
        ratio(self.get(Stat::PassCompletions), self.get(Stat::PassAttempts))
    }

    pub fn net_rush_yards(&self) -> i64 {
        i64::from(self.get(Stat::RushYards)) - i64::from(self.get(Stat::RushYardsLost))
    }

    pub fn net_pass_yards(&self) -> i64 {
        i64::from(self.get(Stat::PassYards)) - i64::from(self.get(Stat::SackYardsLost))
    }

    pub fn save_pct(&self) -> Option<f64> {
        ratio(self.get(Stat::Saves), self.get(Stat::ShotsAgainst))
    }

    pub fn faceoff_pct(&self) -> Option<f64> {
        let won = self.get(Stat::FaceoffsWon);
        ratio(won, won + self.get(Stat::FaceoffsLost))
    }

    pub fn batting_average(&self) -> Option<f64> {
        ratio(self.get(Stat::Hits), self.get(Stat::AtBats))
    }

    pub fn on_base_pct(&self) -> Option<f64> {
        let on = self.get(Stat::Hits) + self.get(Stat::Walks) + self.get(Stat::HitByPitch);
        let chances = self.get(Stat::AtBats)
            + self.get(Stat::Walks)
            + self.get(Stat::HitByPitch)
            + self.get(Stat::SacrificeFlies);
        ratio(on, chances)
    }

    /// Runs allowed per nine innings.
    pub fn run_average(&self) -> Option<f64> {
        ratio(self.get(Stat::RunsAllowed) * 27, self.get(Stat::OutsRecorded))
    }
}

fn ratio(num: u32, den: u32) -> Option<f64> {
    (den > 0).then(|| f64::from(num) / f64::from(den))
}

/// Running per-team and per-player totals for one game.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatAccumulator {
    teams:   [StatLine; 2],
    players: BTreeMap<(Side, PlayerId), StatLine>,
}

impl StatAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a list of deltas in order. Player deltas also count toward
    /// the player's team.
    pub fn apply(&mut self, deltas: &[StatDelta]) {
        for d in deltas {
            self.teams[d.side.index()].add(d.stat, d.amount);
            if let Some(player) = d.player {
                self.players
                    .entry((d.side, player))
                    .or_default()
                    .add(d.stat, d.amount);
            }
        }
    }

    pub fn apply_outcome<D>(&mut self, outcome: &PlayOutcome<D>) {
        self.apply(&outcome.stats);
    }

    pub fn apply_event(&mut self, event: &PlayByPlayEvent) {
        self.apply(&event.stats);
    }

    /// Rebuild totals from an event log.
    pub fn fold<'a>(events: impl IntoIterator<Item = &'a PlayByPlayEvent>) -> Self {
        let mut acc = Self::new();
        for event in events {
            acc.apply_event(event);
        }
        acc
    }

    pub fn team(&self, side: Side) -> &StatLine {
        &self.teams[side.index()]
    }

    pub fn player(&self, side: Side, player: PlayerId) -> Option<&StatLine> {
        self.players.get(&(side, player))
    }

    /// A side's score is its team `Points` total.
    pub fn score(&self, side: Side) -> u32 {
        self.team(side).get(Stat::Points)
    }
}
