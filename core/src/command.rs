use serde::{Deserialize, Serialize};

/// Where a fast-forward stops.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkipTo {
    /// Through the next visible event that changes the score.
    NextScore,
    /// Through the next end-of-period row.
    EndOfPeriod,
    /// Through the last event.
    EndOfGame,
}

/// Viewer controls for a live replay.
/// Variants are only ever appended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum LiveCommand {
    // ── Transport ─────────────────────────────────
    Play,
    Pause,
    Next,
    FastForward { to: SkipTo },

    // ── Pacing ────────────────────────────────────
    SetSpeed { speed: crate::clock::ReplaySpeed },

    Cancel,
}
