//! Game configuration: structural rules, tuning factors, rating range
//! and the forced-outcome retry budget.
//!
//! RULE: every config is validated before a game starts. Invalid values
//! fail with `ConfigError`; the engine never simulates with them.

use crate::{
    error::ConfigError,
    types::{Seconds, SportKind},
};
use serde::{Deserialize, Serialize};

/// Hard cap on overtime periods, whatever the policy says.
pub const OVERTIME_CEILING: u32 = 20;

const MULTIPLIER_MIN: f64 = 0.0;
const MULTIPLIER_MAX: f64 = 5.0;

// ── Tuning factors ─────────────────────────────────────────────────

/// One knob per modeled event category. Multipliers default to 1.0;
/// `injury_rate` is an absolute per-participant, per-play probability
/// and `home_advantage` an additive edge on scoring success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningFactors {
    pub pace:           f64,
    pub turnover:       f64,
    pub foul:           f64,
    pub three_point:    f64,
    pub sack:           f64,
    pub interception:   f64,
    pub fumble:         f64,
    pub penalty:        f64,
    pub field_goal:     f64,
    pub shot_quality:   f64,
    pub walk:           f64,
    pub strikeout:      f64,
    pub home_run:       f64,
    pub error:          f64,
    pub fatigue:        f64,
    pub injury_rate:    f64,
    pub home_advantage: f64,
}

impl Default for TuningFactors {
    fn default() -> Self {
        Self {
            pace:           1.0,
            turnover:       1.0,
            foul:           1.0,
            three_point:    1.0,
            sack:           1.0,
            interception:   1.0,
            fumble:         1.0,
            penalty:        1.0,
            field_goal:     1.0,
            shot_quality:   1.0,
            walk:           1.0,
            strikeout:      1.0,
            home_run:       1.0,
            error:          1.0,
            fatigue:        1.0,
            injury_rate:    0.0002,
            home_advantage: 0.01,
        }
    }
}

impl TuningFactors {
    /// Factor names in a stable order.
    pub const NAMES: [&'static str; 17] = [
        "pace", "turnover", "foul", "three_point", "sack", "interception", "fumble",
        "penalty", "field_goal", "shot_quality", "walk", "strikeout", "home_run",
        "error", "fatigue", "injury_rate", "home_advantage",
    ];

    fn slot(&mut self, name: &str) -> Option<&mut f64> {
        Some(match name {
            "pace" => &mut self.pace,
            "turnover" => &mut self.turnover,
            "foul" => &mut self.foul,
            "three_point" => &mut self.three_point,
            "sack" => &mut self.sack,
            "interception" => &mut self.interception,
            "fumble" => &mut self.fumble,
            "penalty" => &mut self.penalty,
            "field_goal" => &mut self.field_goal,
            "shot_quality" => &mut self.shot_quality,
            "walk" => &mut self.walk,
            "strikeout" => &mut self.strikeout,
            "home_run" => &mut self.home_run,
            "error" => &mut self.error,
            "fatigue" => &mut self.fatigue,
            "injury_rate" => &mut self.injury_rate,
            "home_advantage" => &mut self.home_advantage,
            _ => return None,
        })
    }

    /// Read a factor by name, as in a flat knob table.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.table().into_iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Set a factor by name. The value is range-checked immediately.
    pub fn set(&mut self, name: &str, value: f64) -> Result<(), ConfigError> {
        let key = Self::NAMES
            .iter()
            .copied()
            .find(|n| *n == name)
            .ok_or_else(|| ConfigError::UnknownFactor { name: name.to_string() })?;
        check_factor(key, value)?;
        if let Some(slot) = self.slot(key) {
            *slot = value;
        }
        Ok(())
    }

    /// The flat `(name, value)` table.
    pub fn table(&self) -> [(&'static str, f64); 17] {
        [
            ("pace", self.pace),
            ("turnover", self.turnover),
            ("foul", self.foul),
            ("three_point", self.three_point),
            ("sack", self.sack),
            ("interception", self.interception),
            ("fumble", self.fumble),
            ("penalty", self.penalty),
            ("field_goal", self.field_goal),
            ("shot_quality", self.shot_quality),
            ("walk", self.walk),
            ("strikeout", self.strikeout),
            ("home_run", self.home_run),
            ("error", self.error),
            ("fatigue", self.fatigue),
            ("injury_rate", self.injury_rate),
            ("home_advantage", self.home_advantage),
        ]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.table()
            .into_iter()
            .try_for_each(|(name, value)| check_factor(name, value))
    }
}

fn factor_bounds(name: &str) -> (f64, f64) {
    match name {
        "injury_rate" => (0.0, 0.05),
        "home_advantage" => (0.0, 0.25),
        // Zero pace would stall the clock.
        "pace" => (0.25, MULTIPLIER_MAX),
        _ => (MULTIPLIER_MIN, MULTIPLIER_MAX),
    }
}

fn check_factor(name: &'static str, value: f64) -> Result<(), ConfigError> {
    let (min, max) = factor_bounds(name);
    if !value.is_finite() || value < min || value > max {
        return Err(ConfigError::FactorOutOfRange { name, value, min, max });
    }
    Ok(())
}

// ── Structural rules ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvertimePolicy {
    /// Overtime period length; ignored for unclocked sports.
    pub length:        Seconds,
    /// First score ends the overtime period.
    pub sudden_death:  bool,
    /// Overtime periods before giving up. `None` plays until the tie
    /// breaks, subject to `OVERTIME_CEILING`.
    pub max_overtimes: Option<u32>,
    /// Settle a tie left after the last overtime with a shootout (hockey).
    #[serde(default)]
    pub shootout:      bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRules {
    pub num_periods:   u32,
    /// Period length; ignored for unclocked sports.
    pub period_length: Seconds,
    pub overtime:      OvertimePolicy,
    /// A regulation tie ends the game instead of going to overtime.
    pub ties_allowed:  bool,
}

impl GameRules {
    pub fn overtime_limit(&self) -> u32 {
        self.overtime
            .max_overtimes
            .unwrap_or(OVERTIME_CEILING)
            .min(OVERTIME_CEILING)
    }

    /// Whether a game under these rules can end level.
    pub fn tie_possible(&self) -> bool {
        self.ties_allowed || (!self.overtime.shootout && self.overtime.max_overtimes.is_some())
    }
}

/// Valid numeric range for ratings. Inputs outside it are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingRange {
    pub min: f64,
    pub max: f64,
}

impl Default for RatingRange {
    fn default() -> Self {
        Self { min: 0.0, max: 100.0 }
    }
}

impl RatingRange {
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.mid();
        }
        value.clamp(self.min, self.max)
    }

    pub fn mid(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Map a rating onto [0, 1].
    pub fn normalize(&self, value: f64) -> f64 {
        (self.clamp(value) - self.min) / (self.max - self.min)
    }
}

/// Retry budget for commissioner-forced outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForcedConfig {
    pub max_tries:   u32,
    /// Attempts after this one also get the bonus bias.
    pub bonus_after: u32,
    /// Scoring-weight boost added per retry.
    pub step:        f64,
    /// Extra boost once past `bonus_after`.
    pub bonus:       f64,
}

impl Default for ForcedConfig {
    fn default() -> Self {
        Self {
            max_tries:   100,
            bonus_after: 20,
            step:        0.05,
            bonus:       0.5,
        }
    }
}

// ── Top-level config ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub sport:        SportKind,
    pub rules:        GameRules,
    #[serde(default)]
    pub factors:      TuningFactors,
    #[serde(default)]
    pub rating_range: RatingRange,
    #[serde(default)]
    pub forced:       ForcedConfig,
}

impl SimConfig {
    /// League-standard rules for a sport with default factors.
    pub fn default_for(sport: SportKind) -> Self {
        let rules = match sport {
            SportKind::Basketball => GameRules {
                num_periods: 4,
                period_length: 12 * 60,
                overtime: OvertimePolicy {
                    length: 5 * 60,
                    sudden_death: false,
                    max_overtimes: None,
                    shootout: false,
                },
                ties_allowed: false,
            },
            SportKind::Football => GameRules {
                num_periods: 4,
                period_length: 15 * 60,
                overtime: OvertimePolicy {
                    length: 10 * 60,
                    sudden_death: true,
                    max_overtimes: Some(1),
                    shootout: false,
                },
                ties_allowed: false,
            },
            SportKind::Hockey => GameRules {
                num_periods: 3,
                period_length: 20 * 60,
                overtime: OvertimePolicy {
                    length: 5 * 60,
                    sudden_death: true,
                    max_overtimes: Some(1),
                    shootout: true,
                },
                ties_allowed: false,
            },
            SportKind::Baseball => GameRules {
                num_periods: 9,
                period_length: 0,
                overtime: OvertimePolicy {
                    length: 0,
                    sudden_death: false,
                    max_overtimes: None,
                    shootout: false,
                },
                ties_allowed: false,
            },
        };
        Self {
            sport,
            rules,
            factors: TuningFactors::default(),
            rating_range: RatingRange::default(),
            forced: ForcedConfig::default(),
        }
    }

    /// Load a JSON config file. The result is validated before return.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: SimConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.factors.validate()?;

        let rules = &self.rules;
        if !(1..=20).contains(&rules.num_periods) {
            return Err(invalid("num_periods", format!("{} not in 1..=20", rules.num_periods)));
        }
        if self.sport.clocked() {
            if !(60..=3600).contains(&rules.period_length) {
                return Err(invalid(
                    "period_length",
                    format!("{}s not in 60..=3600", rules.period_length),
                ));
            }
            if !rules.ties_allowed && !(30..=3600).contains(&rules.overtime.length) {
                return Err(invalid(
                    "overtime.length",
                    format!("{}s not in 30..=3600", rules.overtime.length),
                ));
            }
        }
        if let Some(max) = rules.overtime.max_overtimes {
            if max > OVERTIME_CEILING {
                return Err(invalid(
                    "overtime.max_overtimes",
                    format!("{max} exceeds {OVERTIME_CEILING}"),
                ));
            }
            if max == 0 && !rules.ties_allowed {
                return Err(invalid(
                    "overtime.max_overtimes",
                    "a regulation tie must play at least one overtime".to_string(),
                ));
            }
        }
        if rules.overtime.shootout && self.sport != SportKind::Hockey {
            return Err(invalid(
                "overtime.shootout",
                format!("{} has no shootout", self.sport),
            ));
        }

        let range = self.rating_range;
        if !range.min.is_finite() || !range.max.is_finite() || range.min >= range.max {
            return Err(invalid(
                "rating_range",
                format!("[{}, {}] is not a valid range", range.min, range.max),
            ));
        }

        let forced = &self.forced;
        if !(1..=10_000).contains(&forced.max_tries) {
            return Err(invalid("forced.max_tries", format!("{} not in 1..=10000", forced.max_tries)));
        }
        if !forced.step.is_finite() || !(0.0..=1.0).contains(&forced.step) {
            return Err(invalid("forced.step", format!("{} not in [0, 1]", forced.step)));
        }
        if !forced.bonus.is_finite() || !(0.0..=5.0).contains(&forced.bonus) {
            return Err(invalid("forced.bonus", format!("{} not in [0, 5]", forced.bonus)));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, reason: String) -> ConfigError {
    ConfigError::InvalidRule { name, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate_for_every_sport() {
        for sport in SportKind::ALL {
            SimConfig::default_for(sport)
                .validate()
                .unwrap_or_else(|e| panic!("{sport} defaults invalid: {e}"));
        }
    }

    #[test]
    fn factor_table_round_trips_by_name() {
        let mut f = TuningFactors::default();
        f.set("sack", 2.5).unwrap();
        assert_eq!(f.get("sack"), Some(2.5));
        assert_eq!(f.sack, 2.5);
        assert_eq!(f.table().len(), TuningFactors::NAMES.len());
    }

    #[test]
    fn out_of_range_factor_rejected() {
        let mut f = TuningFactors::default();
        assert!(matches!(
            f.set("turnover", 9.0),
            Err(ConfigError::FactorOutOfRange { name: "turnover", .. })
        ));
        assert!(matches!(
            f.set("warp", 1.0),
            Err(ConfigError::UnknownFactor { .. })
        ));
        f.injury_rate = f64::NAN;
        assert!(f.validate().is_err());
    }

    #[test]
    fn shootout_only_for_hockey() {
        let mut cfg = SimConfig::default_for(SportKind::Basketball);
        cfg.rules.overtime.shootout = true;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidRule { name: "overtime.shootout", .. })
        ));
    }

    #[test]
    fn zero_overtimes_rejected_unless_ties_allowed() {
        let mut cfg = SimConfig::default_for(SportKind::Hockey);
        cfg.rules.overtime.max_overtimes = Some(0);
        assert!(cfg.rules.overtime.shootout);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidRule { name: "overtime.max_overtimes", .. })
        ));
        cfg.rules.ties_allowed = true;
        cfg.validate().unwrap();
    }

    #[test]
    fn clocked_sport_needs_period_length() {
        let mut cfg = SimConfig::default_for(SportKind::Hockey);
        cfg.rules.period_length = 0;
        assert!(cfg.validate().is_err());
        // Baseball ignores lengths.
        SimConfig::default_for(SportKind::Baseball).validate().unwrap();
    }

    #[test]
    fn tie_possibility() {
        assert!(!SimConfig::default_for(SportKind::Basketball).rules.tie_possible());
        assert!(SimConfig::default_for(SportKind::Football).rules.tie_possible());
        assert!(!SimConfig::default_for(SportKind::Hockey).rules.tie_possible());
    }

    #[test]
    fn config_parses_from_json_with_default_factors() {
        let json = r#"{
            "sport": "hockey",
            "rules": {
                "num_periods": 3,
                "period_length": 1200,
                "overtime": { "length": 300, "sudden_death": true, "max_overtimes": 1 },
                "ties_allowed": true
            },
            "factors": { "shot_quality": 1.3 }
        }"#;
        let cfg: SimConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.factors.shot_quality, 1.3);
        assert_eq!(cfg.factors.turnover, 1.0);
        assert!(!cfg.rules.overtime.shootout);
        cfg.validate().unwrap();
    }
}
