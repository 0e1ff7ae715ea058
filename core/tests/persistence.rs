//! Saving finished games. All-or-nothing per game.

mod common;

use sportsim_core::{
    config::SimConfig,
    simulate_game,
    stats::Stat,
    store::{GameStore, ResultSink},
    types::{Side, SportKind},
};

fn store() -> GameStore {
    let store = GameStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

#[test]
fn saved_game_reloads_identically() {
    common::init_logging();
    let mut store = store();
    let result = common::play(SportKind::Hockey, 8);
    store
        .save_game_result("g-1", &result.box_score, &result.event_log)
        .expect("save");

    assert_eq!(store.game_count().expect("count"), 1);
    assert_eq!(store.load_box_score("g-1").expect("load"), Some(result.box_score.clone()));
    assert_eq!(store.load_play_by_play("g-1").expect("load"), result.event_log);
    assert_eq!(store.final_score("g-1").expect("score"), Some(result.box_score.score()));
    assert_eq!(
        store.team_stat("g-1", Side::Home, Stat::Points).expect("stat"),
        result.box_score.team(Side::Home).score
    );
    let visible = store.visible_plays("g-1").expect("visible");
    assert_eq!(visible.len(), result.event_log.iter().filter(|e| !e.hide).count());
}

#[test]
fn full_range_seed_survives_a_save() {
    let mut store = store();
    let (home, away) = common::teams(SportKind::Basketball);
    let config = SimConfig::default_for(SportKind::Basketball);
    let result = simulate_game(&home, &away, &config, u64::MAX, None).expect("game runs");
    store
        .save_game_result("g-max", &result.box_score, &result.event_log)
        .expect("save");
    assert_eq!(store.game_seed("g-max").expect("seed"), Some(u64::MAX));
    assert_eq!(store.game_seed("missing").expect("seed"), None);
}

#[test]
fn failed_save_leaves_no_rows_and_can_be_retried() {
    let mut store = store();
    let result = common::play(SportKind::Basketball, 2);

    // A repeated sequence number violates UNIQUE(game_id, seq) after the
    // game and stat rows are already written.
    let mut broken = result.event_log.clone();
    let dup = broken[1].clone();
    broken.push(dup);
    assert!(store.save_game_result("g-2", &result.box_score, &broken).is_err());
    assert_eq!(store.row_count("g-2").expect("rows"), 0);
    assert_eq!(store.game_count().expect("count"), 0);

    store
        .save_game_result("g-2", &result.box_score, &result.event_log)
        .expect("retry with the same result");
    assert!(store.row_count("g-2").expect("rows") > 0);
}

#[test]
fn saving_the_same_game_twice_keeps_the_first_copy() {
    let mut store = store();
    let result = common::play(SportKind::Baseball, 4);
    store.save_game_result("g-3", &result.box_score, &result.event_log).expect("save");
    let rows = store.row_count("g-3").expect("rows");
    assert!(store.save_game_result("g-3", &result.box_score, &result.event_log).is_err());
    assert_eq!(store.row_count("g-3").expect("rows"), rows);
}

#[test]
fn career_totals_span_games() {
    let mut store = store();
    let a = common::play(SportKind::Basketball, 10);
    let b = common::play(SportKind::Basketball, 11);
    store.save_game_result("a", &a.box_score, &a.event_log).expect("save");
    store.save_game_result("b", &b.box_score, &b.event_log).expect("save");

    let player = &a.box_score.team(Side::Away).players[0];
    let expected: u64 = [&a, &b]
        .iter()
        .flat_map(|r| r.box_score.teams.iter())
        .flat_map(|t| t.players.iter())
        .filter(|p| p.player_id == player.player_id)
        .map(|p| u64::from(p.stats.get(Stat::Points)))
        .sum();
    assert_eq!(store.career_total(player.player_id, Stat::Points).expect("total"), expected);
}
