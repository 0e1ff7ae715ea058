//! Box score queries.

use super::{key, GameStore, StoreResult};
use crate::{
    box_score::BoxScore,
    error::PersistenceError,
    stats::Stat,
    types::{PlayerId, Side},
};
use rusqlite::{params, OptionalExtension};

impl GameStore {
    pub fn load_box_score(&self, game_id: &str) -> StoreResult<Option<BoxScore>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT box_score_json FROM game WHERE game_id = ?1",
                params![game_id],
                |r| r.get(0),
            )
            .optional()?;
        Ok(json.map(|j| serde_json::from_str(&j)).transpose()?)
    }

    pub fn game_seed(&self, game_id: &str) -> StoreResult<Option<u64>> {
        let text: Option<String> = self
            .conn
            .query_row("SELECT seed FROM game WHERE game_id = ?1", params![game_id], |r| r.get(0))
            .optional()?;
        text.map(|t| t.parse().map_err(|_| PersistenceError::BadColumn { column: "seed", value: t }))
            .transpose()
    }

    pub fn final_score(&self, game_id: &str) -> StoreResult<Option<[u32; 2]>> {
        Ok(self
            .conn
            .query_row(
                "SELECT home_score, away_score FROM game WHERE game_id = ?1",
                params![game_id],
                |r| Ok([r.get(0)?, r.get(1)?]),
            )
            .optional()?)
    }

    pub fn team_stat(&self, game_id: &str, side: Side, stat: Stat) -> StoreResult<u32> {
        let value: Option<u32> = self
            .conn
            .query_row(
                "SELECT value FROM team_game_stat WHERE game_id = ?1 AND side = ?2 AND stat = ?3",
                params![game_id, side.label(), key(&stat)?],
                |r| r.get(0),
            )
            .optional()?;
        Ok(value.unwrap_or(0))
    }

    /// One stat for a player across every saved game.
    pub fn career_total(&self, player_id: PlayerId, stat: Stat) -> StoreResult<u64> {
        let total: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(value), 0) FROM player_game_stat
             WHERE player_id = ?1 AND stat = ?2",
            params![player_id, key(&stat)?],
            |r| r.get(0),
        )?;
        Ok(total as u64)
    }
}
