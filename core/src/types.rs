//! Shared primitive types used across the entire simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stable identifier for a rostered player.
pub type PlayerId = u32;

/// Caller-assigned identifier for a scheduled game.
pub type GameId = String;

/// Game clock seconds.
pub type Seconds = u32;

/// Which bench a team sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Home, Side::Away];

    /// Index into `[home, away]` arrays.
    pub fn index(self) -> usize {
        match self {
            Self::Home => 0,
            Self::Away => 1,
        }
    }

    pub fn other(self) -> Side {
        match self {
            Self::Home => Self::Away,
            Self::Away => Self::Home,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Away => "away",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The four sport variants the engine can simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SportKind {
    Basketball,
    Football,
    Hockey,
    Baseball,
}

impl SportKind {
    pub const ALL: [SportKind; 4] = [
        SportKind::Basketball,
        SportKind::Football,
        SportKind::Hockey,
        SportKind::Baseball,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Basketball => "basketball",
            Self::Football => "football",
            Self::Hockey => "hockey",
            Self::Baseball => "baseball",
        }
    }

    /// Whether periods are bounded by a game clock.
    pub fn clocked(&self) -> bool {
        !matches!(self, Self::Baseball)
    }

    /// Human label for a period, e.g. "2nd quarter", "OT", "10th inning".
    pub fn period_label(&self, period: u32, regulation: u32) -> String {
        if period > regulation && *self != Self::Baseball {
            let ot = period - regulation;
            return if ot == 1 { "OT".to_string() } else { format!("{ot}OT") };
        }
        let unit = match self {
            Self::Basketball | Self::Football => "quarter",
            Self::Hockey => "period",
            Self::Baseball => "inning",
        };
        format!("{} {unit}", ordinal(period))
    }
}

impl std::str::FromStr for SportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown sport '{s}'"))
    }
}

impl fmt::Display for SportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 1 -> "1st", 2 -> "2nd", 11 -> "11th", 23 -> "23rd".
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// Format clock seconds as `m:ss`.
pub fn format_clock(seconds: Seconds) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(22), "22nd");
    }

    #[test]
    fn period_labels() {
        assert_eq!(SportKind::Basketball.period_label(2, 4), "2nd quarter");
        assert_eq!(SportKind::Basketball.period_label(5, 4), "OT");
        assert_eq!(SportKind::Hockey.period_label(6, 3), "3OT");
        assert_eq!(SportKind::Baseball.period_label(10, 9), "10th inning");
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(725), "12:05");
        assert_eq!(format_clock(9), "0:09");
    }
}
