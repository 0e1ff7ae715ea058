//! The immutable result of resolving one play.

use crate::{
    stats::{Stat, StatDelta},
    types::{PlayerId, Seconds, Side},
};

/// What one play did. Built by a sport's resolver, consumed once by the
/// state machine, the accumulator and the logger.
///
/// RULE: every point awarded through `score` is mirrored by a `Points`
/// stat delta, so the score always equals the team `Points` total.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayOutcome<D> {
    pub kind:              &'static str,
    pub offense:           Side,
    pub elapsed:           Seconds,
    pub participants:      Vec<(Side, PlayerId)>,
    pub points:            u32,
    pub scoring_side:      Option<Side>,
    pub stats:             Vec<StatDelta>,
    pub possession_change: bool,
    pub injury:            Option<(Side, PlayerId)>,
    pub text:              String,
    pub hide:              bool,
    /// Sport-specific situational change.
    pub delta:             D,
}

impl<D> PlayOutcome<D> {
    pub fn new(kind: &'static str, offense: Side, delta: D) -> Self {
        Self {
            kind,
            offense,
            elapsed: 0,
            participants: Vec::new(),
            points: 0,
            scoring_side: None,
            stats: Vec::new(),
            possession_change: false,
            injury: None,
            text: String::new(),
            hide: false,
            delta,
        }
    }

    pub fn kind_of(mut self, kind: &'static str) -> Self {
        self.kind = kind;
        self
    }

    pub fn elapsed(mut self, seconds: Seconds) -> Self {
        self.elapsed = seconds;
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hide = true;
        self
    }

    pub fn turnover(mut self) -> Self {
        self.possession_change = true;
        self
    }

    pub fn involve(&mut self, side: Side, player: PlayerId) {
        if !self.participants.contains(&(side, player)) {
            self.participants.push((side, player));
        }
    }

    /// Credit a player stat; the player counts as a participant.
    pub fn credit(&mut self, side: Side, player: PlayerId, stat: Stat, amount: u32) {
        self.involve(side, player);
        if amount > 0 {
            self.stats.push(StatDelta::player(side, player, stat, amount));
        }
    }

    pub fn credit_team(&mut self, side: Side, stat: Stat, amount: u32) {
        if amount > 0 {
            self.stats.push(StatDelta::team(side, stat, amount));
        }
    }

    /// Award points to `side`, credited to `player` when there is one.
    pub fn score(&mut self, side: Side, player: Option<PlayerId>, points: u32) {
        if points == 0 {
            return;
        }
        debug_assert!(
            self.scoring_side.map_or(true, |s| s == side),
            "one play scores for one side"
        );
        self.scoring_side = Some(side);
        self.points += points;
        match player {
            Some(id) => self.credit(side, id, Stat::Points, points),
            None => self.credit_team(side, Stat::Points, points),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_are_mirrored_as_stats() {
        let mut o = PlayOutcome::new("shot", Side::Away, ());
        o.score(Side::Away, Some(9), 3);
        o.score(Side::Away, None, 1);
        assert_eq!(o.points, 4);
        let mirrored: u32 = o
            .stats
            .iter()
            .filter(|d| d.stat == Stat::Points)
            .map(|d| d.amount)
            .sum();
        assert_eq!(mirrored, 4);
        assert_eq!(o.participants, vec![(Side::Away, 9)]);
    }
}
