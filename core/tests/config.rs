//! Configuration loading and validation.

use sportsim_core::{
    config::SimConfig,
    error::ConfigError,
    types::SportKind,
};

#[test]
fn out_of_range_factors_are_rejected() {
    let mut config = SimConfig::default_for(SportKind::Football);
    config.factors.pace = 0.0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::FactorOutOfRange { name: "pace", .. })
    ));

    let mut config = SimConfig::default_for(SportKind::Football);
    config.factors.injury_rate = 0.5;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::FactorOutOfRange { name: "injury_rate", .. })
    ));

    let mut config = SimConfig::default_for(SportKind::Football);
    config.factors.sack = f64::NAN;
    assert!(config.validate().is_err());
}

#[test]
fn named_factor_access_checks_names_and_ranges() {
    let mut config = SimConfig::default_for(SportKind::Basketball);
    config.factors.set("three_point", 1.4).expect("valid knob");
    assert_eq!(config.factors.get("three_point"), Some(1.4));
    assert!(matches!(
        config.factors.set("dunk_rate", 1.0),
        Err(ConfigError::UnknownFactor { .. })
    ));
    assert!(config.factors.set("turnover", -1.0).is_err());
    assert_eq!(config.factors.get("turnover"), Some(1.0));
}

#[test]
fn structural_rules_are_checked() {
    let mut config = SimConfig::default_for(SportKind::Hockey);
    config.rules.num_periods = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidRule { name: "num_periods", .. })
    ));

    let mut config = SimConfig::default_for(SportKind::Basketball);
    config.rules.overtime.shootout = true;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidRule { name: "overtime.shootout", .. })
    ));

    let mut config = SimConfig::default_for(SportKind::Baseball);
    config.rating_range.min = 100.0;
    assert!(config.validate().is_err());
}

#[test]
fn partial_json_fills_in_default_factors() {
    let path = std::env::temp_dir().join(format!("sportsim-config-{}.json", std::process::id()));
    let mut value = serde_json::to_value(SimConfig::default_for(SportKind::Hockey)).expect("json");
    value["factors"] = serde_json::json!({ "pace": 1.2 });
    std::fs::write(&path, value.to_string()).expect("write config");

    let config = SimConfig::load(path.to_str().expect("utf-8 path")).expect("load");
    assert_eq!(config.factors.pace, 1.2);
    assert_eq!(config.factors.turnover, 1.0);
    assert_eq!(config.sport, SportKind::Hockey);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn invalid_json_config_fails_to_load() {
    let path = std::env::temp_dir().join(format!("sportsim-bad-{}.json", std::process::id()));
    let mut value = serde_json::to_value(SimConfig::default_for(SportKind::Hockey)).expect("json");
    value["factors"] = serde_json::json!({ "home_advantage": 3.0 });
    std::fs::write(&path, value.to_string()).expect("write config");
    assert!(SimConfig::load(path.to_str().expect("utf-8 path")).is_err());
    let _ = std::fs::remove_file(&path);
}
