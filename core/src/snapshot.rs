//! Ratings snapshots: the immutable view of a roster at game start.
//!
//! RULE: nothing in the simulation mutates a snapshot. In-game fatigue
//! and injuries live on `PlayerGameState`; the snapshot is shared by
//! handle and only ever read.

use crate::{
    config::RatingRange,
    error::RosterError,
    types::PlayerId,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Roster positions across all four sports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    // ── Basketball ─────────────────────────────────
    Guard,
    Forward,
    /// Basketball center and hockey center.
    Center,

    // ── Football ───────────────────────────────────
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    OffensiveLine,
    DefensiveLine,
    Linebacker,
    DefensiveBack,
    Kicker,
    Punter,

    // ── Hockey ─────────────────────────────────────
    Winger,
    Defenseman,
    Goalie,

    // ── Baseball ───────────────────────────────────
    Pitcher,
    Catcher,
    Infielder,
    Outfielder,
    DesignatedHitter,
}

impl Position {
    pub fn abbrev(&self) -> &'static str {
        match self {
            Self::Guard => "G",
            Self::Forward => "F",
            Self::Center => "C",
            Self::Quarterback => "QB",
            Self::RunningBack => "RB",
            Self::WideReceiver => "WR",
            Self::TightEnd => "TE",
            Self::OffensiveLine => "OL",
            Self::DefensiveLine => "DL",
            Self::Linebacker => "LB",
            Self::DefensiveBack => "DB",
            Self::Kicker => "K",
            Self::Punter => "P",
            Self::Winger => "W",
            Self::Defenseman => "D",
            Self::Goalie => "GK",
            Self::Pitcher => "SP",
            Self::Catcher => "CA",
            Self::Infielder => "IF",
            Self::Outfielder => "OF",
            Self::DesignatedHitter => "DH",
        }
    }
}

/// Rating keys across all four sports. A snapshot only carries the
/// ratings relevant to its sport; missing keys read as the range midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    // Shared athletic ratings
    Speed,
    Strength,
    Endurance,
    Passing,
    Defense,

    // Basketball
    InsideScoring,
    MidRange,
    ThreePoint,
    FreeThrow,
    Rebounding,
    BallHandling,
    Blocking,

    // Football
    ThrowAccuracy,
    ThrowPower,
    Elusiveness,
    Catching,
    RunBlocking,
    PassBlocking,
    PassRush,
    RunStopping,
    Coverage,
    Tackling,
    KickPower,
    KickAccuracy,

    // Hockey
    Shooting,
    Stickhandling,
    Checking,
    Faceoffs,
    Goalkeeping,

    // Baseball
    Contact,
    Power,
    Eye,
    Fielding,
    Arm,
    Control,
    Stuff,
}

/// One player's ratings and condition at game start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingsSnapshot {
    pub player_id: PlayerId,
    pub name:      String,
    pub position:  Position,
    pub ratings:   BTreeMap<Rating, f64>,
    /// Carried-over fatigue in [0, 1]; 0 is fully rested.
    #[serde(default)]
    pub fatigue:   f64,
    /// Already injured before the game; never eligible to play.
    #[serde(default)]
    pub injured:   bool,
}

impl RatingsSnapshot {
    pub fn new(player_id: PlayerId, name: impl Into<String>, position: Position) -> Self {
        Self {
            player_id,
            name: name.into(),
            position,
            ratings: BTreeMap::new(),
            fatigue: 0.0,
            injured: false,
        }
    }

    pub fn with_rating(mut self, rating: Rating, value: f64) -> Self {
        self.ratings.insert(rating, value);
        self
    }

    /// The rating clamped into `range`. Out-of-range input is clamped,
    /// never rejected; a missing rating reads as the midpoint.
    pub fn rating(&self, rating: Rating, range: RatingRange) -> f64 {
        self.ratings
            .get(&rating)
            .map(|v| range.clamp(*v))
            .unwrap_or_else(|| range.mid())
    }

    /// Mean of every carried rating, clamped. Used for lineup ordering.
    pub fn overall(&self, range: RatingRange) -> f64 {
        if self.ratings.is_empty() {
            return range.mid();
        }
        let sum: f64 = self.ratings.values().map(|v| range.clamp(*v)).sum();
        sum / self.ratings.len() as f64
    }

    /// Energy at tip-off in [0, 1].
    pub fn starting_energy(&self) -> f64 {
        let fatigue = if self.fatigue.is_finite() { self.fatigue } else { 0.0 };
        (1.0 - fatigue).clamp(0.0, 1.0)
    }
}

/// A team's roster, in depth-chart order (earlier = preferred).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSnapshot {
    pub team_id: String,
    pub name:    String,
    pub players: Vec<RatingsSnapshot>,
}

/// Minimum eligible players a sport needs before a game may start.
#[derive(Debug, Clone, Copy)]
pub struct RosterRequirements {
    pub positions:   &'static [(Position, usize)],
    pub min_players: usize,
}

impl TeamSnapshot {
    pub fn eligible(&self) -> impl Iterator<Item = &RatingsSnapshot> {
        self.players.iter().filter(|p| !p.injured)
    }

    /// Fail fast when the roster cannot field the required positions.
    pub fn check(&self, requirements: &RosterRequirements) -> Result<(), RosterError> {
        let mut seen = BTreeSet::new();
        for p in &self.players {
            if !seen.insert(p.player_id) {
                return Err(RosterError::DuplicatePlayer {
                    team: self.name.clone(),
                    player_id: p.player_id,
                });
            }
        }

        for &(position, required) in requirements.positions {
            let available = self.eligible().filter(|p| p.position == position).count();
            if available < required {
                return Err(RosterError::MissingPosition {
                    team: self.name.clone(),
                    position,
                    required,
                    available,
                });
            }
        }

        let available = self.eligible().count();
        if available < requirements.min_players {
            return Err(RosterError::TooFewPlayers {
                team: self.name.clone(),
                required: requirements.min_players,
                available,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQS: RosterRequirements = RosterRequirements {
        positions: &[(Position::Center, 1)],
        min_players: 2,
    };

    fn team(players: Vec<RatingsSnapshot>) -> TeamSnapshot {
        TeamSnapshot { team_id: "t".into(), name: "Testers".into(), players }
    }

    #[test]
    fn ratings_are_clamped_not_rejected() {
        let range = RatingRange { min: 0.0, max: 100.0 };
        let p = RatingsSnapshot::new(1, "A", Position::Guard)
            .with_rating(Rating::Speed, 140.0)
            .with_rating(Rating::Strength, -5.0);
        assert_eq!(p.rating(Rating::Speed, range), 100.0);
        assert_eq!(p.rating(Rating::Strength, range), 0.0);
        assert_eq!(p.rating(Rating::Passing, range), 50.0);
        assert_eq!(p.overall(range), 50.0);
    }

    #[test]
    fn injured_players_do_not_count() {
        let mut c = RatingsSnapshot::new(1, "C", Position::Center);
        c.injured = true;
        let g = RatingsSnapshot::new(2, "G", Position::Guard);
        let g2 = RatingsSnapshot::new(3, "G2", Position::Guard);
        let err = team(vec![c, g, g2]).check(&REQS).unwrap_err();
        assert!(matches!(err, RosterError::MissingPosition { available: 0, .. }));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let a = RatingsSnapshot::new(1, "A", Position::Center);
        let b = RatingsSnapshot::new(1, "B", Position::Guard);
        let err = team(vec![a, b]).check(&REQS).unwrap_err();
        assert!(matches!(err, RosterError::DuplicatePlayer { player_id: 1, .. }));
    }

    #[test]
    fn too_few_players() {
        let a = RatingsSnapshot::new(1, "A", Position::Center);
        let err = team(vec![a]).check(&REQS).unwrap_err();
        assert!(matches!(err, RosterError::TooFewPlayers { required: 2, available: 1, .. }));
    }
}
