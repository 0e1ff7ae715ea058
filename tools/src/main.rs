//! sim-runner: headless game runner for sportsim.
//!
//! Usage:
//!   sim-runner --sport hockey --seed 42
//!   sim-runner --sport football --games 16 --parallel --db season.db
//!   sim-runner --sport basketball --live --speed fast
//!   sim-runner --sport baseball --force home --config tuned.json --json

use anyhow::{anyhow, Result};
use log::{info, warn};
use sportsim_core::{
    box_score::{BoxScore, GameResult},
    bulk::{simulate_slate_parallel, ScheduledGame, SlateGame, SlateSimulator},
    clock::ReplaySpeed,
    command::LiveCommand,
    config::SimConfig,
    error::SimError,
    finalizer::ForcedOutcome,
    fixtures::demo_team,
    live::{LiveMessage, LiveSim},
    store::{GameStore, ResultSink},
    types::{Side, SportKind},
    viewer::spawn_viewer,
};
use std::{env, sync::Arc};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let sport: SportKind = flag(&args, "--sport")
        .unwrap_or("basketball")
        .parse()
        .map_err(|e: String| anyhow!(e))?;
    let seed = parse_arg(&args, "--seed", 42u64);
    let games = parse_arg(&args, "--games", 1usize).max(1);
    let parallel = args.iter().any(|a| a == "--parallel");
    let live = args.iter().any(|a| a == "--live");
    let json = args.iter().any(|a| a == "--json");
    let speed: ReplaySpeed = flag(&args, "--speed")
        .map(str::parse)
        .transpose()
        .map_err(|e: String| anyhow!(e))?
        .unwrap_or(ReplaySpeed::Normal);
    let forced: Option<ForcedOutcome> = flag(&args, "--force")
        .map(str::parse)
        .transpose()
        .map_err(|e: String| anyhow!(e))?;

    let config = match flag(&args, "--config") {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default_for(sport),
    };
    if config.sport != sport {
        return Err(anyhow!("config is for {} but --sport is {sport}", config.sport));
    }

    let mut store = match flag(&args, "--db") {
        Some(path) => {
            let store = GameStore::open(path)?;
            store.migrate()?;
            Some(store)
        }
        None => None,
    };

    println!("sportsim sim-runner");
    println!("  sport:  {sport}");
    println!("  seed:   {seed}");
    println!("  games:  {games}");
    if let Some(target) = forced {
        println!("  force:  {target}");
    }
    println!();

    let home = Arc::new(demo_team(sport, "HOM", "Harbor City", seed));
    let away = Arc::new(demo_team(sport, "AWY", "Summit Valley", seed.wrapping_add(1)));
    let schedule: Vec<ScheduledGame> = (0..games)
        .map(|_| {
            let game = ScheduledGame::new(
                uuid::Uuid::new_v4().to_string(),
                Arc::clone(&home),
                Arc::clone(&away),
            );
            match forced {
                Some(target) => game.forced(target),
                None => game,
            }
        })
        .collect();

    let finished: Vec<SlateGame> = if parallel {
        simulate_slate_parallel(&schedule, &config, seed)
    } else {
        SlateSimulator::new(&schedule, &config, seed).collect()
    };

    let mut first: Option<GameResult> = None;
    for game in finished {
        let result = match game.result {
            Ok(result) => result,
            Err(SimError::ForcedOutcomeExhausted { tries, closest, .. }) => {
                warn!("game {}: forced outcome missed after {tries} tries", game.game_id);
                *closest
            }
            Err(e) => return Err(e.into()),
        };
        print_line(&game.game_id, &result.box_score);
        if let Some(store) = store.as_mut() {
            if let Err(e) = store.save_game_result(&game.game_id, &result.box_score, &result.event_log) {
                warn!("game {} not saved: {e}", game.game_id);
            }
        }
        if first.is_none() {
            first = Some(result);
        }
    }

    if let Some(result) = first {
        if json {
            println!("{}", serde_json::to_string_pretty(&result.box_score)?);
        } else if live {
            watch(result, speed)?;
        } else if games == 1 {
            print_summary(&result);
        }
    }
    Ok(())
}

fn watch(result: GameResult, speed: ReplaySpeed) -> Result<()> {
    let handle = spawn_viewer(LiveSim::from_result(result));
    handle.send(LiveCommand::SetSpeed { speed })?;
    handle.send(LiveCommand::Play)?;
    for message in handle.messages.iter() {
        match message {
            LiveMessage::Play { state, event } => {
                println!("{:<40} {}", state.summary_line(), event.text);
            }
            LiveMessage::Final { box_score } => {
                println!();
                print_box(&box_score);
            }
        }
    }
    handle.join().map_err(|_| anyhow!("viewer thread panicked"))?;
    Ok(())
}

fn print_line(game_id: &str, box_score: &BoxScore) {
    let away = box_score.team(Side::Away);
    let home = box_score.team(Side::Home);
    let ot = match box_score.overtimes {
        0 => String::new(),
        n => format!(" ({n} OT)"),
    };
    let forced = box_score
        .forced
        .map(|f| format!(" [forced {} in {} tries]", f.target, f.tries))
        .unwrap_or_default();
    println!(
        "{game_id}  {} {} @ {} {}{ot}{forced}",
        away.name, away.score, home.name, home.score
    );
}

fn print_summary(result: &GameResult) {
    println!();
    println!("=== Scoring ===");
    for play in result.scoring_summary() {
        println!(
            "  P{} {:>5}  [{}-{}]  {}",
            play.period,
            sportsim_core::types::format_clock(play.clock),
            play.score[1],
            play.score[0],
            play.text
        );
    }
    println!();
    print_box(&result.box_score);
    info!("{} events", result.event_log.len());
}

fn print_box(box_score: &BoxScore) {
    println!("=== Box score ({}) ===", box_score.sport);
    for side in [Side::Away, Side::Home] {
        let team = box_score.team(side);
        println!("{} {}", team.name, team.score);
        for (stat, value) in team.totals.iter() {
            println!("  {stat:?}: {value}");
        }
    }
    println!("Winner: {}", box_score.winner);
}

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == name).map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
