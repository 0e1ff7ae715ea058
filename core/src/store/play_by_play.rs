//! Play-by-play queries.

use super::{GameStore, StoreResult};
use crate::event::PlayByPlayEvent;
use rusqlite::params;

impl GameStore {
    /// The saved log in sequence order.
    pub fn load_play_by_play(&self, game_id: &str) -> StoreResult<Vec<PlayByPlayEvent>> {
        let mut stmt = self.conn.prepare(
            "SELECT payload_json FROM play_by_play WHERE game_id = ?1 ORDER BY seq ASC",
        )?;
        let rows = stmt
            .query_map(params![game_id], |r| r.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        let mut events = Vec::with_capacity(rows.len());
        for json in rows {
            events.push(serde_json::from_str(&json)?);
        }
        Ok(events)
    }

    /// Visible rows only, as (seq, text).
    pub fn visible_plays(&self, game_id: &str) -> StoreResult<Vec<(u32, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT seq, text FROM play_by_play
             WHERE game_id = ?1 AND hide = 0
             ORDER BY seq ASC",
        )?;
        let rows = stmt
            .query_map(params![game_id], |r| Ok((r.get(0)?, r.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
