//! Hockey: zone-to-zone puck possession, faceoffs and power plays.
//!
//! RULE: `zone` is always seen from the side in possession. Losing the
//! puck mirrors the zone for the new offense. A minor penalty puts the
//! other side on a two-minute power play; a power-play goal ends it.

use super::{paced, prob, GameState, Notice, Sport};
use crate::{
    config::{RatingRange, SimConfig},
    event::Situation,
    lineup::{self, Slot},
    outcome::PlayOutcome,
    player::{PlayerGameState, TeamGameState},
    resolver::PlayContext,
    rng::GameRng,
    snapshot::{Position, Rating, RosterRequirements},
    stats::Stat,
    types::{format_clock, Seconds, Side, SportKind},
};
use serde::{Deserialize, Serialize};

use Position::{Center, Defenseman, Goalie, Winger};

const SKATERS: &[Position] = &[Center, Winger, Defenseman];

const FULL_STRENGTH: &[Slot] = &[
    Slot::new(&[Center], 1),
    Slot::new(&[Winger], 2),
    Slot::new(&[Defenseman], 2),
    Slot::new(&[Goalie], 1),
];

const SHORT_HANDED: &[Slot] = &[
    Slot::new(&[Center], 1),
    Slot::new(&[Winger], 1),
    Slot::new(&[Defenseman], 2),
    Slot::new(&[Goalie], 1),
];

const MINOR_PENALTY: Seconds = 120;
const SHOOTOUT_ROUNDS: u32 = 3;
const SHOOTOUT_EXTRA_ROUNDS: u32 = 10;

#[derive(Debug, Clone, Copy, Default)]
pub struct Hockey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Defensive,
    Neutral,
    Offensive,
}

impl Zone {
    /// The same ice seen from the other bench.
    pub fn mirror(self) -> Zone {
        match self {
            Zone::Defensive => Zone::Offensive,
            Zone::Neutral => Zone::Neutral,
            Zone::Offensive => Zone::Defensive,
        }
    }

    pub fn forward(self) -> Zone {
        match self {
            Zone::Defensive => Zone::Neutral,
            Zone::Neutral | Zone::Offensive => Zone::Offensive,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Zone::Defensive => "defensive zone",
            Zone::Neutral => "neutral zone",
            Zone::Offensive => "offensive zone",
        }
    }

    /// Scoring chance multiplier for shots from this zone.
    fn danger(self) -> f64 {
        match self {
            Zone::Defensive => 0.3,
            Zone::Neutral => 0.5,
            Zone::Offensive => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerPlay {
    /// The penalised side, playing a skater down.
    pub short_side:   Side,
    pub seconds_left: Seconds,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HockeySituation {
    pub zone:       Zone,
    pub faceoff:    bool,
    pub power_play: Option<PowerPlay>,
}

impl HockeySituation {
    pub fn describe(&self) -> String {
        let mut out = self.zone.label().to_string();
        if self.faceoff {
            out.push_str(", faceoff");
        }
        if let Some(pp) = self.power_play {
            out.push_str(&format!(
                ", {} power play {}",
                pp.short_side.other(),
                format_clock(pp.seconds_left)
            ));
        }
        out
    }

    /// True when `side` has the extra skater.
    pub fn on_power_play(&self, side: Side) -> bool {
        self.power_play.is_some_and(|pp| pp.short_side == side.other())
    }
}

/// Next situation, zone seen from the next side in possession.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HockeyDelta {
    pub zone:       Zone,
    pub faceoff:    bool,
    pub penalty_on: Option<Side>,
    pub goal:       bool,
}

impl HockeyDelta {
    fn play_on(zone: Zone) -> Self {
        Self { zone, faceoff: false, penalty_on: None, goal: false }
    }

    fn draw(zone: Zone) -> Self {
        Self { zone, faceoff: true, penalty_on: None, goal: false }
    }
}

type Outcome = PlayOutcome<HockeyDelta>;

impl Sport for Hockey {
    const KIND: SportKind = SportKind::Hockey;
    const TRACKS_TIME: bool = true;

    type Situation = HockeySituation;
    type Delta = HockeyDelta;

    fn requirements() -> RosterRequirements {
        RosterRequirements {
            positions: &[(Center, 2), (Winger, 4), (Defenseman, 4), (Goalie, 1)],
            min_players: 12,
        }
    }

    fn new_situation(_teams: &[TeamGameState; 2], _range: RatingRange) -> HockeySituation {
        HockeySituation { zone: Zone::Neutral, faceoff: true, power_play: None }
    }

    fn snapshot(state: &GameState<Self>) -> Situation {
        Situation::Hockey(state.situation.clone())
    }

    fn start_period(
        state: &mut GameState<Self>,
        _teams: &[TeamGameState; 2],
        config: &SimConfig,
        _rng: &mut GameRng,
    ) -> String {
        let rules = &config.rules;
        let period = state.clock.period;
        state.situation.zone = Zone::Neutral;
        state.situation.faceoff = true;
        // Nominal only; the opening faceoff decides possession.
        state.possession = if period % 2 == 1 { Side::Home } else { Side::Away };
        format!("Start of {}.", Self::KIND.period_label(period, rules.num_periods))
    }

    fn prepare(
        state: &mut GameState<Self>,
        teams: &mut [TeamGameState; 2],
        range: RatingRange,
    ) -> Vec<Notice> {
        let pp = state.situation.power_play;
        for team in teams.iter_mut() {
            let short = pp.is_some_and(|pp| pp.short_side == team.side);
            let slots = if short { SHORT_HANDED } else { FULL_STRENGTH };
            team.on_field = lineup::select(team, slots, range);
        }
        Vec::new()
    }

    fn resolve(ctx: &PlayContext<'_, Self>, rng: &mut GameRng) -> Outcome {
        let sit = &ctx.state.situation;
        if sit.faceoff {
            return faceoff(ctx, rng);
        }
        let f = ctx.factors();
        let man_up = sit.on_power_play(ctx.offense());
        let mut weights = match sit.zone {
            Zone::Defensive => [0.60, 0.02, 0.14, 0.20 * f.turnover, 0.04 * f.penalty],
            Zone::Neutral => [0.55, 0.05, 0.16, 0.20 * f.turnover, 0.04 * f.penalty],
            Zone::Offensive => [0.20, 0.42 * f.shot_quality, 0.14, 0.20 * f.turnover, 0.04 * f.penalty],
        };
        if man_up {
            weights[1] *= 1.4;
            weights[3] *= 0.7;
        }
        match rng.weighted_index(&weights) {
            0 => carry(ctx, rng),
            1 => shot(ctx, rng),
            2 => hit(ctx, rng),
            3 => giveaway(ctx, rng),
            _ => penalty(ctx, rng),
        }
    }

    fn apply(state: &mut GameState<Self>, outcome: &Outcome) {
        let d = outcome.delta;
        let sit = &mut state.situation;
        if let Some(pp) = sit.power_play.as_mut() {
            pp.seconds_left = pp.seconds_left.saturating_sub(outcome.elapsed);
        }
        let pp_goal = d.goal
            && sit
                .power_play
                .is_some_and(|pp| outcome.scoring_side == Some(pp.short_side.other()));
        if pp_goal || sit.power_play.is_some_and(|pp| pp.seconds_left == 0) {
            sit.power_play = None;
        }
        if let Some(side) = d.penalty_on {
            sit.power_play = Some(PowerPlay { short_side: side, seconds_left: MINOR_PENALTY });
        }
        sit.zone = d.zone;
        sit.faceoff = d.faceoff;
        if outcome.possession_change {
            state.possession = state.possession.other();
        }
    }

    fn drain(elapsed: Seconds, position: Position) -> f64 {
        let rate = if position == Goalie { 0.00005 } else { 0.0012 };
        f64::from(elapsed) * rate
    }

    fn recovery(elapsed: Seconds) -> f64 {
        f64::from(elapsed) * 0.002
    }

    /// Three rounds, then sudden-death rounds, then a coin flip. The
    /// winner is awarded one team goal.
    fn shootout(
        _state: &GameState<Self>,
        teams: &[TeamGameState; 2],
        config: &SimConfig,
        rng: &mut GameRng,
    ) -> Vec<Outcome> {
        let range = config.rating_range;
        let shooters = |side: Side| {
            let mut list: Vec<&PlayerGameState> = teams[side.index()]
                .players
                .iter()
                .filter(|p| p.available() && p.position() != Goalie)
                .collect();
            if list.is_empty() {
                list = teams[side.index()].players.iter().collect();
            }
            list.sort_by(|a, b| {
                b.skill(Rating::Shooting, range).total_cmp(&a.skill(Rating::Shooting, range))
            });
            list
        };
        let lists = [shooters(Side::Home), shooters(Side::Away)];
        let keeper = |side: Side| {
            teams[side.index()]
                .best_available(&[Goalie], Rating::Goalkeeping, range)
                .map(|g| g.skill(Rating::Goalkeeping, range))
                .unwrap_or(0.3)
        };
        let keepers = [keeper(Side::Home), keeper(Side::Away)];

        let mut out = Vec::new();
        let mut goals = [0u32; 2];
        for round in 0..SHOOTOUT_ROUNDS + SHOOTOUT_EXTRA_ROUNDS {
            for side in [Side::Away, Side::Home] {
                let list = &lists[side.index()];
                let Some(shooter) = list.get(round as usize % list.len().max(1)) else {
                    continue;
                };
                let gk = keepers[side.other().index()];
                let p = prob(0.33 * (0.7 + 0.6 * shooter.skill(Rating::Shooting, range)) * (1.3 - 0.6 * gk));
                let mut o = PlayOutcome::new("shootout_attempt", side, HockeyDelta::draw(Zone::Neutral));
                o.credit(side, shooter.id(), Stat::ShootoutAttempts, 1);
                let text = if rng.chance(p) {
                    goals[side.index()] += 1;
                    o.credit(side, shooter.id(), Stat::ShootoutGoals, 1);
                    format!("Shootout: {} scores", shooter.name())
                } else {
                    format!("Shootout: {} is stopped", shooter.name())
                };
                out.push(o.text(text));
            }
            if round + 1 >= SHOOTOUT_ROUNDS && goals[0] != goals[1] {
                break;
            }
        }

        let (winner, how) = match goals[0].cmp(&goals[1]) {
            std::cmp::Ordering::Greater => (Side::Home, ""),
            std::cmp::Ordering::Less => (Side::Away, ""),
            std::cmp::Ordering::Equal => {
                let side = if rng.chance(0.5) { Side::Home } else { Side::Away };
                (side, " on a coin flip")
            }
        };
        let mut o = PlayOutcome::new("shootout", winner, HockeyDelta::draw(Zone::Neutral));
        o.score(winner, None, 1);
        out.push(o.text(format!(
            "{} win the shootout {}-{}{how}",
            teams[winner.index()].name,
            goals[winner.index()],
            goals[winner.other().index()]
        )));
        out
    }
}

fn whistle(ctx: &PlayContext<'_, Hockey>) -> Outcome {
    PlayOutcome::new("whistle", ctx.offense(), HockeyDelta::draw(ctx.state.situation.zone))
        .elapsed(5)
        .text("Whistle, the puck is frozen")
}

fn faceoff(ctx: &PlayContext<'_, Hockey>, rng: &mut GameRng) -> Outcome {
    let (off, def, range) = (ctx.offense(), ctx.defense(), ctx.range());
    let zone = ctx.state.situation.zone;
    let oc = ctx.off_team().pick_best(&[Center], Rating::Faceoffs, range);
    let dc = ctx.def_team().pick_best(&[Center], Rating::Faceoffs, range);
    let (Some(oc), Some(dc)) = (oc, dc) else {
        return whistle(ctx).kind_of("faceoff");
    };
    let p = prob(0.5 + 0.4 * (oc.skill(Rating::Faceoffs, range) - dc.skill(Rating::Faceoffs, range)));
    let mut o = PlayOutcome::new("faceoff", off, HockeyDelta::play_on(zone))
        .elapsed(paced(rng.range_u32(2, 6), ctx.factors().pace));
    let (winner, loser) = if rng.chance(p) {
        o.credit(off, oc.id(), Stat::FaceoffsWon, 1);
        o.credit(def, dc.id(), Stat::FaceoffsLost, 1);
        (oc, dc)
    } else {
        o.credit(def, dc.id(), Stat::FaceoffsWon, 1);
        o.credit(off, oc.id(), Stat::FaceoffsLost, 1);
        o.possession_change = true;
        o.delta.zone = zone.mirror();
        (dc, oc)
    };
    o.text(format!("{} wins the faceoff against {}", winner.name(), loser.name()))
}

fn carry(ctx: &PlayContext<'_, Hockey>, rng: &mut GameRng) -> Outcome {
    let (off, def, range) = (ctx.offense(), ctx.defense(), ctx.range());
    let zone = ctx.state.situation.zone;
    let Some(carrier) = ctx.off_team().pick_weighted(SKATERS, Rating::Stickhandling, range, rng) else {
        return whistle(ctx);
    };
    let elapsed = paced(rng.range_u32(6, 16), ctx.factors().pace);
    let hands = 0.5 * (carrier.skill(Rating::Stickhandling, range) + carrier.skill(Rating::Speed, range));
    let checker = ctx.def_team().pick_weighted(SKATERS, Rating::Checking, range, rng);
    let check = checker.map(|c| c.skill(Rating::Checking, range)).unwrap_or(0.5);

    let mut o = PlayOutcome::new("carry", off, HockeyDelta::play_on(zone.forward())).elapsed(elapsed);
    o.involve(off, carrier.id());
    if rng.chance(prob(0.62 + 0.4 * (hands - check))) {
        let text = if zone == Zone::Offensive {
            format!("{} cycles the puck low", carrier.name())
        } else {
            format!("{} carries into the {}", carrier.name(), zone.forward().label())
        };
        return o.text(text);
    }
    o.possession_change = true;
    o.delta = HockeyDelta::play_on(zone.mirror());
    match checker {
        Some(c) => {
            o.credit(def, c.id(), Stat::Steals, 1);
            o.text(format!("{} strips {}", c.name(), carrier.name()))
        }
        None => o.text(format!("{} loses the puck", carrier.name())),
    }
}

fn shot(ctx: &PlayContext<'_, Hockey>, rng: &mut GameRng) -> Outcome {
    let (off, def, range) = (ctx.offense(), ctx.defense(), ctx.range());
    let sit = &ctx.state.situation;
    let zone = sit.zone;
    let man_up = sit.on_power_play(off);
    let Some(shooter) = ctx.off_team().pick_weighted(SKATERS, Rating::Shooting, range, rng) else {
        return whistle(ctx);
    };
    let mut o = PlayOutcome::new("shot", off, HockeyDelta::play_on(zone))
        .elapsed(paced(rng.range_u32(4, 12), ctx.factors().pace));
    o.involve(off, shooter.id());

    let blocker = ctx.def_team().pick_weighted(&[Defenseman], Rating::Defense, range, rng);
    if let Some(b) = blocker {
        if rng.chance(0.15 * (0.5 + b.skill(Rating::Defense, range))) {
            o.credit(def, b.id(), Stat::Blocks, 1);
            if rng.chance(0.5) {
                o.possession_change = true;
                o.delta.zone = zone.mirror();
            }
            return o.kind_of("blocked_shot").text(format!("{}'s shot is blocked by {}", shooter.name(), b.name()));
        }
    }
    if rng.chance(0.25) {
        if rng.chance(0.4) {
            o.possession_change = true;
            o.delta.zone = zone.mirror();
        }
        return o.kind_of("missed_shot").text(format!("{} shoots wide", shooter.name()));
    }

    o.credit(off, shooter.id(), Stat::Shots, 1);
    let goalie = ctx.def_team().pick_best(&[Goalie], Rating::Goalkeeping, range);
    let keeping = goalie.map(|g| g.skill(Rating::Goalkeeping, range)).unwrap_or(0.3);
    if let Some(g) = goalie {
        o.credit(def, g.id(), Stat::ShotsAgainst, 1);
    }
    let p = prob(
        0.095
            * zone.danger()
            * (0.7 + 0.6 * shooter.skill(Rating::Shooting, range))
            * (1.3 - 0.6 * keeping)
            * ctx.factors().shot_quality
            * ctx.tilt(off)
            * if man_up { 1.5 } else { 1.0 },
    );

    if rng.chance(p) {
        o.credit(off, shooter.id(), Stat::Goals, 1);
        o.score(off, Some(shooter.id()), 1);
        if man_up {
            o.credit(off, shooter.id(), Stat::PowerPlayGoals, 1);
        }
        if let Some(g) = goalie {
            o.credit(def, g.id(), Stat::GoalsAgainst, 1);
        }
        o.delta = HockeyDelta { goal: true, ..HockeyDelta::draw(Zone::Neutral) };
        let mut helpers = Vec::new();
        let mut exclude = shooter.id();
        for chance in [0.85, 0.6] {
            if !rng.chance(chance) {
                break;
            }
            let Some(a) = ctx.off_team().pick_other(SKATERS, Rating::Passing, range, exclude, rng) else {
                break;
            };
            if helpers.contains(&a.name()) {
                break;
            }
            o.credit(off, a.id(), Stat::Assists, 1);
            helpers.push(a.name());
            exclude = a.id();
        }
        let mut text = format!("GOAL! {} scores", shooter.name());
        if man_up {
            text.push_str(" on the power play");
        }
        if !helpers.is_empty() {
            text.push_str(&format!(" (assists: {})", helpers.join(", ")));
        }
        return o.kind_of("goal").text(text);
    }

    let gname = goalie.map(|g| g.name().to_string()).unwrap_or_else(|| "the defense".into());
    if let Some(g) = goalie {
        o.credit(def, g.id(), Stat::Saves, 1);
    }
    if rng.chance(0.45) {
        o.delta = HockeyDelta::draw(zone);
        return o.text(format!("{} stops {} and freezes the puck", gname, shooter.name()));
    }
    if rng.chance(0.6) {
        o.possession_change = true;
        o.delta.zone = zone.mirror();
        return o.text(format!("{} stops {}, rebound cleared", gname, shooter.name()));
    }
    o.text(format!("{} stops {}, the rebound stays in play", gname, shooter.name()))
}

fn hit(ctx: &PlayContext<'_, Hockey>, rng: &mut GameRng) -> Outcome {
    let (off, def, range) = (ctx.offense(), ctx.defense(), ctx.range());
    let zone = ctx.state.situation.zone;
    let hitter = ctx.def_team().pick_weighted(SKATERS, Rating::Checking, range, rng);
    let target = ctx.off_team().pick_weighted(SKATERS, Rating::Strength, range, rng);
    let (Some(hitter), Some(target)) = (hitter, target) else {
        return whistle(ctx);
    };
    let mut o = PlayOutcome::new("hit", off, HockeyDelta::play_on(zone))
        .elapsed(paced(rng.range_u32(4, 10), ctx.factors().pace));
    o.credit(def, hitter.id(), Stat::BodyChecks, 1);
    o.involve(off, target.id());
    if rng.chance(0.4 * (0.5 + hitter.skill(Rating::Checking, range))) {
        o.possession_change = true;
        o.delta.zone = zone.mirror();
        return o.text(format!("{} lays out {} and takes the puck", hitter.name(), target.name()));
    }
    o.text(format!("{} hits {}", hitter.name(), target.name()))
}

fn giveaway(ctx: &PlayContext<'_, Hockey>, rng: &mut GameRng) -> Outcome {
    let (off, def, range) = (ctx.offense(), ctx.defense(), ctx.range());
    let zone = ctx.state.situation.zone;
    let Some(loser) = ctx.off_team().pick_weighted(SKATERS, Rating::Passing, range, rng) else {
        return whistle(ctx);
    };
    let mut o = PlayOutcome::new("giveaway", off, HockeyDelta::play_on(zone.mirror()))
        .elapsed(paced(rng.range_u32(5, 14), ctx.factors().pace))
        .turnover();
    o.credit(off, loser.id(), Stat::Turnovers, 1);
    match ctx.def_team().pick_weighted(SKATERS, Rating::Defense, range, rng) {
        Some(t) => {
            o.credit(def, t.id(), Stat::Steals, 1);
            o.text(format!("{} picks off a pass from {}", t.name(), loser.name()))
        }
        None => o.text(format!("{} gives the puck away", loser.name())),
    }
}

fn penalty(ctx: &PlayContext<'_, Hockey>, rng: &mut GameRng) -> Outcome {
    let (off, def, range) = (ctx.offense(), ctx.defense(), ctx.range());
    let on_defense = rng.chance(0.6);
    let (side, team) = if on_defense { (def, ctx.def_team()) } else { (off, ctx.off_team()) };
    let Some(p) = team.pick_weighted(SKATERS, Rating::Strength, range, rng) else {
        return whistle(ctx);
    };
    let mut o = PlayOutcome::new(
        "penalty",
        off,
        HockeyDelta { penalty_on: Some(side), ..HockeyDelta::draw(Zone::Offensive) },
    )
    .elapsed(paced(rng.range_u32(3, 8), ctx.factors().pace));
    o.credit(side, p.id(), Stat::PenaltyMinutes, 2);
    o.possession_change = side == off;
    let infraction = ["hooking", "tripping", "slashing", "holding", "interference"]
        [rng.next_u64_below(5) as usize];
    o.text(format!("{} ({}) two minutes for {infraction}", p.name(), team.name))
}
