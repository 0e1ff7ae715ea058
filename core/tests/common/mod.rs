#![allow(dead_code)]

use sportsim_core::{
    box_score::GameResult,
    config::SimConfig,
    fixtures::demo_team,
    simulate_game,
    snapshot::TeamSnapshot,
    types::SportKind,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Two demo rosters built from different seeds.
pub fn teams(sport: SportKind) -> (TeamSnapshot, TeamSnapshot) {
    (demo_team(sport, "HOM", "Home", 101), demo_team(sport, "AWY", "Away", 202))
}

/// Identical ratings on both sides.
pub fn even_teams(sport: SportKind, seed: u64) -> (TeamSnapshot, TeamSnapshot) {
    (demo_team(sport, "HOM", "Home", seed), demo_team(sport, "AWY", "Away", seed))
}

pub fn play(sport: SportKind, seed: u64) -> GameResult {
    let (home, away) = teams(sport);
    simulate_game(&home, &away, &SimConfig::default_for(sport), seed, None).expect("game runs")
}

pub fn play_with(config: &SimConfig, seed: u64) -> GameResult {
    let (home, away) = teams(config.sport);
    simulate_game(&home, &away, config, seed, None).expect("game runs")
}
