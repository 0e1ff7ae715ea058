//! SQLite persistence for finished games.
//!
//! RULE: only the store talks to the database. A game is saved in one
//! transaction: either every row lands or none does, so a failed save
//! can simply be retried with the same `GameResult`.

use crate::{
    box_score::BoxScore,
    error::PersistenceError,
    event::PlayByPlayEvent,
};
use log::{debug, warn};
use rusqlite::{params, Connection, Transaction};
use serde::Serialize;

mod box_score;
mod play_by_play;

pub type StoreResult<T> = Result<T, PersistenceError>;

/// Anything that can persist a finished game.
pub trait ResultSink {
    fn save_game_result(
        &mut self,
        game_id: &str,
        box_score: &BoxScore,
        event_log: &[PlayByPlayEvent],
    ) -> StoreResult<()>;
}

pub struct GameStore {
    conn: Connection,
    path: Option<String>, // None for :memory:
}

impl GameStore {
    pub fn open(path: &str) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        // WAL is ignored for anything but real files.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: Some(path.to_string()) })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> StoreResult<()> {
        self.conn.execute_batch(include_str!("../../../migrations/001_games.sql"))?;
        Ok(())
    }

    pub fn game_count(&self) -> StoreResult<i64> {
        Ok(self.conn.query_row("SELECT COUNT(*) FROM game", [], |r| r.get(0))?)
    }

    /// Rows across every table for one game. Zero after a failed save.
    pub fn row_count(&self, game_id: &str) -> StoreResult<i64> {
        let mut total = 0;
        for table in ["game", "team_game_stat", "player_game_stat", "play_by_play"] {
            let n: i64 = self.conn.query_row(
                &format!("SELECT COUNT(*) FROM {table} WHERE game_id = ?1"),
                params![game_id],
                |r| r.get(0),
            )?;
            total += n;
        }
        Ok(total)
    }
}

impl ResultSink for GameStore {
    fn save_game_result(
        &mut self,
        game_id: &str,
        box_score: &BoxScore,
        event_log: &[PlayByPlayEvent],
    ) -> StoreResult<()> {
        let tx = self.conn.transaction()?;
        let saved = write_game(&tx, game_id, box_score, event_log);
        match saved {
            Ok(()) => {
                tx.commit()?;
                debug!("saved game {game_id}: {} events", event_log.len());
                Ok(())
            }
            Err(e) => {
                warn!("save of game {game_id} failed, rolled back: {e}");
                // Dropping the transaction rolls it back.
                drop(tx);
                Err(e)
            }
        }
    }
}

fn write_game(
    tx: &Transaction<'_>,
    game_id: &str,
    box_score: &BoxScore,
    event_log: &[PlayByPlayEvent],
) -> StoreResult<()> {
    let [home, away] = &box_score.teams;
    let forced_json = box_score.forced.as_ref().map(serde_json::to_string).transpose()?;
    tx.execute(
        "INSERT INTO game (game_id, sport, seed, home_team_id, away_team_id, home_score,
                           away_score, winner, overtimes, periods, forced_json,
                           box_score_json, saved_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            game_id,
            box_score.sport.name(),
            box_score.seed.to_string(),
            home.team_id,
            away.team_id,
            home.score,
            away.score,
            box_score.winner.to_string(),
            box_score.overtimes,
            box_score.periods,
            forced_json,
            serde_json::to_string(box_score)?,
            chrono::Utc::now().to_rfc3339(),
        ],
    )?;

    for team in &box_score.teams {
        let side = team.side.label();
        for (stat, value) in team.totals.iter() {
            tx.execute(
                "INSERT INTO team_game_stat (game_id, side, team_id, stat, value)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![game_id, side, team.team_id, key(&stat)?, value],
            )?;
        }
        for player in &team.players {
            for (stat, value) in player.stats.iter() {
                tx.execute(
                    "INSERT INTO player_game_stat (game_id, side, player_id, stat, value)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![game_id, side, player.player_id, key(&stat)?, value],
                )?;
            }
        }
    }

    let mut insert = tx.prepare(
        "INSERT INTO play_by_play (game_id, seq, side, period, clock, event_type, text, hide,
                                   home_score, away_score, payload_json)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )?;
    for event in event_log {
        insert.execute(params![
            game_id,
            event.seq,
            event.side.label(),
            event.period,
            event.clock,
            event.kind,
            event.text,
            event.hide,
            event.score[0],
            event.score[1],
            serde_json::to_string(event)?,
        ])?;
    }
    Ok(())
}

/// The serde name of a unit enum variant ("field_goals_made").
fn key<T: Serialize>(value: &T) -> StoreResult<String> {
    let json = serde_json::to_value(value)?;
    Ok(match json {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}
