//! The packaged result of a finished game.

use crate::{
    event::PlayByPlayEvent,
    finalizer::{ForcedSummary, Winner},
    play_log::{self, ScoringPlay},
    player::TeamGameState,
    snapshot::Position,
    stats::{StatAccumulator, StatLine},
    types::{PlayerId, Side, SportKind},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerBox {
    pub player_id: PlayerId,
    pub name:      String,
    pub position:  Position,
    pub stats:     StatLine,
    /// Injured before or during the game.
    pub injured:   bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamBox {
    pub side:    Side,
    pub team_id: String,
    pub name:    String,
    pub score:   u32,
    pub totals:  StatLine,
    /// Every rostered player, in roster order, whether they played or not.
    pub players: Vec<PlayerBox>,
}

impl TeamBox {
    pub fn player(&self, id: PlayerId) -> Option<&PlayerBox> {
        self.players.iter().find(|p| p.player_id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxScore {
    pub sport:     SportKind,
    pub seed:      u64,
    /// [home, away].
    pub teams:     [TeamBox; 2],
    pub winner:    Winner,
    pub overtimes: u32,
    pub periods:   u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forced:    Option<ForcedSummary>,
}

impl BoxScore {
    pub(crate) fn build(
        sport: SportKind,
        seed: u64,
        teams: &[TeamGameState; 2],
        stats: &StatAccumulator,
        overtimes: u32,
        periods: u32,
    ) -> Self {
        let team_box = |team: &TeamGameState| TeamBox {
            side: team.side,
            team_id: team.team_id.clone(),
            name: team.name.clone(),
            score: stats.score(team.side),
            totals: stats.team(team.side).clone(),
            players: team
                .players
                .iter()
                .map(|p| PlayerBox {
                    player_id: p.id(),
                    name: p.name().to_string(),
                    position: p.position(),
                    stats: stats.player(team.side, p.id()).cloned().unwrap_or_default(),
                    injured: p.injured,
                })
                .collect(),
        };
        let teams = [team_box(&teams[0]), team_box(&teams[1])];
        let winner = Winner::from_score([teams[0].score, teams[1].score]);
        Self { sport, seed, teams, winner, overtimes, periods, forced: None }
    }

    pub fn team(&self, side: Side) -> &TeamBox {
        &self.teams[side.index()]
    }

    /// [home, away].
    pub fn score(&self) -> [u32; 2] {
        [self.teams[0].score, self.teams[1].score]
    }

    /// True when the box score equals the fold of `acc`, team and player.
    pub fn agrees_with(&self, acc: &StatAccumulator) -> bool {
        self.teams.iter().all(|t| {
            t.totals == *acc.team(t.side)
                && t.score == acc.score(t.side)
                && t.players.iter().all(|p| {
                    let folded = acc.player(t.side, p.player_id).cloned().unwrap_or_default();
                    p.stats == folded
                })
        })
    }
}

/// What `simulate_game` hands back: the box score plus the full log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameResult {
    pub box_score: BoxScore,
    pub event_log: Vec<PlayByPlayEvent>,
}

impl GameResult {
    pub fn winner(&self) -> Winner {
        self.box_score.winner
    }

    pub fn scoring_summary(&self) -> Vec<ScoringPlay> {
        play_log::scoring_summary(&self.event_log)
    }

    /// Score shown by the last visible event.
    pub fn last_visible_score(&self) -> Option<[u32; 2]> {
        self.event_log.iter().rev().find(|e| !e.hide).map(|e| e.score)
    }
}
