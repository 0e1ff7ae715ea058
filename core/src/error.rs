use crate::{
    box_score::GameResult,
    finalizer::ForcedOutcome,
    snapshot::Position,
    types::PlayerId,
};
use thiserror::Error;

/// A roster cannot field the sport's required positions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RosterError {
    #[error("{team}: {available} eligible {position:?} (need {required})")]
    MissingPosition {
        team: String,
        position: Position,
        required: usize,
        available: usize,
    },

    #[error("{team}: {available} eligible players (need {required})")]
    TooFewPlayers {
        team: String,
        required: usize,
        available: usize,
    },

    #[error("{team}: player id {player_id} appears more than once")]
    DuplicatePlayer { team: String, player_id: PlayerId },
}

/// A tuning factor or rule is outside its valid range.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("factor '{name}' = {value} outside [{min}, {max}]")]
    FactorOutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("unknown factor '{name}'")]
    UnknownFactor { name: String },

    #[error("rule '{name}': {reason}")]
    InvalidRule { name: &'static str, reason: String },

    #[error("engine built for {engine} but config is for {config}")]
    SportMismatch { engine: String, config: String },

    #[error("a forced tie is impossible under these rules")]
    TieNotPossible,
}

/// Saving a finished game failed. The in-memory result is still valid.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Bad value in column {column}: '{value}'")]
    BadColumn { column: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// The retry budget ran out. `closest` is the attempt that came
    /// nearest to the requested outcome; the caller decides what to do.
    #[error("forced outcome '{target}' not reached after {tries} tries")]
    ForcedOutcomeExhausted {
        target: ForcedOutcome,
        tries: u32,
        closest: Box<GameResult>,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
