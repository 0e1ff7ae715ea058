//! In-game injuries and fatigue.

mod common;

use std::collections::HashMap;

use sportsim_core::{
    config::SimConfig,
    engine::GameEngine,
    event::{kind, PlayByPlayEvent},
    finalizer::ScoringBias,
    player::TeamGameState,
    sport::{Baseball, Basketball, Football, Hockey, Sport},
    types::PlayerId,
};

/// (side index, player id) -> seq of the injury notice.
type Injured = HashMap<(usize, PlayerId), u32>;

/// Play one game a step at a time with a raised injury rate. Checks
/// that nobody injured before a step is on the field after it, then
/// returns the injury cutoffs and the event log.
fn play_injured<S: Sport>(seed: u64) -> (Injured, Vec<PlayByPlayEvent>) {
    let mut config = SimConfig::default_for(S::KIND);
    config.factors.injury_rate = 0.01;
    let (home, away) = common::teams(S::KIND);
    let mut engine =
        GameEngine::<S>::new(&home, &away, &config, seed, ScoringBias::none()).expect("engine");

    let mut injured = Injured::new();
    loop {
        let done = engine.advance();
        for team in engine.teams() {
            for p in team.on_field_players() {
                assert!(
                    !injured.contains_key(&(team.side.index(), p.id())),
                    "{} seed {seed}: injured #{} back on the field",
                    S::KIND,
                    p.id()
                );
            }
        }
        let last_injury = engine
            .log()
            .events()
            .iter()
            .rev()
            .find(|e| e.kind == kind::INJURY)
            .map(|e| e.seq);
        for team in engine.teams() {
            for p in team.players.iter().filter(|p| p.injured) {
                let key = (team.side.index(), p.id());
                if !injured.contains_key(&key) {
                    injured.insert(key, last_injury.expect("injury notice recorded"));
                }
            }
        }
        if done {
            break;
        }
    }
    (injured, engine.into_result().event_log)
}

fn injured_players_stay_out<S: Sport>() {
    common::init_logging();
    let mut total = 0;
    for seed in 0..10u64 {
        let (injured, log) = play_injured::<S>(seed);
        total += injured.len();
        for event in &log {
            for d in &event.stats {
                let Some(id) = d.player else { continue };
                if let Some(&cutoff) = injured.get(&(d.side.index(), id)) {
                    assert!(
                        event.seq < cutoff,
                        "{} seed {seed} seq {}: injured #{id} credited {:?} in '{}'",
                        S::KIND,
                        event.seq,
                        d.stat,
                        event.text
                    );
                }
            }
        }
    }
    assert!(total > 0, "{}: no injuries in ten games", S::KIND);
}

#[test]
fn basketball_injured_players_stay_out() {
    injured_players_stay_out::<Basketball>();
}

#[test]
fn football_injured_players_stay_out() {
    injured_players_stay_out::<Football>();
}

#[test]
fn hockey_injured_players_stay_out() {
    injured_players_stay_out::<Hockey>();
}

#[test]
fn baseball_injured_runners_never_score() {
    injured_players_stay_out::<Baseball>();
}

fn mean_energy<'a>(players: impl Iterator<Item = &'a f64>) -> f64 {
    let all: Vec<f64> = players.copied().collect();
    all.iter().sum::<f64>() / all.len().max(1) as f64
}

fn field_and_bench(team: &TeamGameState) -> (f64, f64) {
    let field = mean_energy(team.on_field_players().map(|p| &p.energy));
    let bench = mean_energy(
        team.players
            .iter()
            .enumerate()
            .filter(|(i, _)| !team.on_field.contains(i))
            .map(|(_, p)| &p.energy),
    );
    (field, bench)
}

fn players_on_the_field_tire<S: Sport>() {
    let config = SimConfig::default_for(S::KIND);
    let (home, away) = common::teams(S::KIND);
    let mut engine =
        GameEngine::<S>::new(&home, &away, &config, 5, ScoringBias::none()).expect("engine");
    for _ in 0..10 {
        assert!(!engine.advance());
    }
    for team in engine.teams() {
        let (field, bench) = field_and_bench(team);
        assert!(field < bench, "{} {}: field {field:.3} vs bench {bench:.3}", S::KIND, team.name);
    }
}

#[test]
fn basketball_players_on_the_floor_tire() {
    players_on_the_field_tire::<Basketball>();
}

#[test]
fn hockey_skaters_on_the_ice_tire() {
    players_on_the_field_tire::<Hockey>();
}
