//! American football: downs, field position and the kicking game.
//!
//! RULE: `spot` is always measured in yards from the offense's own goal
//! line (0 = own goal line, 100 = the end zone being attacked). Every
//! delta describes the next situation from the point of view of the
//! team that will have the ball.

use super::{paced, prob, GameState, Notice, Sport};
use crate::{
    config::{GameRules, RatingRange, SimConfig},
    event::{kind, Situation},
    lineup::{self, Slot},
    outcome::PlayOutcome,
    player::TeamGameState,
    resolver::PlayContext,
    rng::GameRng,
    snapshot::{Position, Rating, RosterRequirements},
    stats::Stat,
    types::{Seconds, Side, SportKind},
};
use serde::{Deserialize, Serialize};

use Position::{
    DefensiveBack, DefensiveLine, Kicker, Linebacker, OffensiveLine, Punter, Quarterback,
    RunningBack, TightEnd, WideReceiver,
};

const OFFENSE: &[Slot] = &[
    Slot::new(&[Quarterback], 1),
    Slot::new(&[RunningBack], 1),
    Slot::new(&[WideReceiver], 3),
    Slot::new(&[TightEnd, WideReceiver], 1),
    Slot::new(&[OffensiveLine], 5),
    Slot::new(&[Kicker], 1),
    Slot::new(&[Punter], 1),
];

const DEFENSE: &[Slot] = &[
    Slot::new(&[DefensiveLine], 4),
    Slot::new(&[Linebacker], 3),
    Slot::new(&[DefensiveBack], 4),
];

const RETURNERS: &[Position] = &[DefensiveBack, WideReceiver, RunningBack];
const RUSHERS: &[Position] = &[DefensiveLine, Linebacker];
const TARGETS: &[Position] = &[WideReceiver, TightEnd, RunningBack];

const KICKOFF_SPOT: u32 = 35;
const TOUCHBACK_SPOT: u32 = 25;
const PUNT_TOUCHBACK_SPOT: u32 = 20;
/// Longest field goal a coach will try.
const FIELD_GOAL_RANGE: u32 = 55;
/// Final-quarter seconds in which a trailing team plays to catch up.
const LATE_WINDOW: Seconds = 300;

#[derive(Debug, Clone, Copy, Default)]
pub struct Football;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FootballPhase {
    Kickoff,
    Scrimmage,
    PointAfter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FootballSituation {
    pub phase:            FootballPhase,
    pub down:             u8,
    pub to_go:            u32,
    pub spot:             u32,
    /// Receiving team of the opening kickoff; kicks off the second half.
    pub opening_receiver: Option<Side>,
}

impl FootballSituation {
    pub fn describe(&self) -> String {
        match self.phase {
            FootballPhase::Kickoff => "kickoff".to_string(),
            FootballPhase::PointAfter => "point after".to_string(),
            FootballPhase::Scrimmage => {
                let field = if self.spot <= 50 {
                    format!("own {}", self.spot)
                } else {
                    format!("opp {}", 100 - self.spot)
                };
                let to_go = if self.spot + self.to_go >= 100 {
                    "goal".to_string()
                } else {
                    self.to_go.to_string()
                };
                format!("{} & {to_go} at {field}", crate::types::ordinal(u32::from(self.down)))
            }
        }
    }
}

/// The situation after a play, from the next offense's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FootballDelta {
    pub phase: FootballPhase,
    pub down:  u8,
    pub to_go: u32,
    pub spot:  u32,
}

impl FootballDelta {
    fn first_down(spot: u32) -> Self {
        let spot = spot.clamp(1, 99);
        Self { phase: FootballPhase::Scrimmage, down: 1, to_go: 10.min(100 - spot), spot }
    }

    fn kickoff() -> Self {
        Self { phase: FootballPhase::Kickoff, down: 1, to_go: 10, spot: KICKOFF_SPOT }
    }

    fn point_after() -> Self {
        Self { phase: FootballPhase::PointAfter, down: 1, to_go: 2, spot: 98 }
    }
}

type Outcome = PlayOutcome<FootballDelta>;

/// Where a gain of `yards` from scrimmage leaves the drive.
enum Gain {
    Touchdown,
    Safety,
    FirstDown(u32),
    NextDown { down: u8, to_go: u32, spot: u32 },
    OnDowns(u32),
}

fn gain(sit: &FootballSituation, yards: i32) -> Gain {
    let new = sit.spot as i32 + yards;
    if new >= 100 {
        return Gain::Touchdown;
    }
    if new <= 0 {
        return Gain::Safety;
    }
    let new = new as u32;
    if yards >= sit.to_go as i32 {
        Gain::FirstDown(new)
    } else if sit.down >= 4 {
        Gain::OnDowns(100 - new)
    } else {
        Gain::NextDown {
            down: sit.down + 1,
            to_go: (sit.to_go as i32 - yards).max(1) as u32,
            spot: new,
        }
    }
}

impl Sport for Football {
    const KIND: SportKind = SportKind::Football;
    const TRACKS_TIME: bool = false;

    type Situation = FootballSituation;
    type Delta = FootballDelta;

    fn requirements() -> RosterRequirements {
        RosterRequirements {
            positions: &[
                (Quarterback, 1),
                (RunningBack, 1),
                (WideReceiver, 2),
                (OffensiveLine, 5),
                (DefensiveLine, 3),
                (Linebacker, 2),
                (DefensiveBack, 3),
                (Kicker, 1),
                (Punter, 1),
            ],
            min_players: 19,
        }
    }

    fn new_situation(_teams: &[TeamGameState; 2], _range: RatingRange) -> FootballSituation {
        FootballSituation {
            phase: FootballPhase::Kickoff,
            down: 1,
            to_go: 10,
            spot: KICKOFF_SPOT,
            opening_receiver: None,
        }
    }

    fn snapshot(state: &GameState<Self>) -> Situation {
        Situation::Football(state.situation.clone())
    }

    fn start_period(
        state: &mut GameState<Self>,
        teams: &[TeamGameState; 2],
        config: &SimConfig,
        rng: &mut GameRng,
    ) -> String {
        let rules = &config.rules;
        let period = state.clock.period;
        let label = Self::KIND.period_label(period, rules.num_periods);
        let second_half = rules.num_periods >= 2 && period == rules.num_periods / 2 + 1;

        let kicking = if period == 1 || period > rules.num_periods {
            let receiver = if rng.chance(0.5) { Side::Home } else { Side::Away };
            if period == 1 {
                state.situation.opening_receiver = Some(receiver);
            }
            receiver.other()
        } else if second_half {
            state.situation.opening_receiver.unwrap_or(Side::Home)
        } else {
            return format!("Start of {label}.");
        };

        state.possession = kicking;
        let d = FootballDelta::kickoff();
        let sit = &mut state.situation;
        sit.phase = d.phase;
        sit.down = d.down;
        sit.to_go = d.to_go;
        sit.spot = d.spot;
        format!(
            "Start of {label}. {} kick off to {}.",
            teams[kicking.index()].name,
            teams[kicking.other().index()].name
        )
    }

    fn prepare(
        state: &mut GameState<Self>,
        teams: &mut [TeamGameState; 2],
        range: RatingRange,
    ) -> Vec<Notice> {
        let off = state.possession;
        for team in teams.iter_mut() {
            let slots = if team.side == off { OFFENSE } else { DEFENSE };
            team.on_field = lineup::select(team, slots, range);
        }
        Vec::new()
    }

    fn resolve(ctx: &PlayContext<'_, Self>, rng: &mut GameRng) -> Outcome {
        match ctx.state.situation.phase {
            FootballPhase::Kickoff => kickoff(ctx, rng),
            FootballPhase::PointAfter => point_after(ctx, rng),
            FootballPhase::Scrimmage => scrimmage(ctx, rng),
        }
    }

    fn apply(state: &mut GameState<Self>, outcome: &Outcome) {
        let d = outcome.delta;
        let sit = &mut state.situation;
        sit.phase = d.phase;
        sit.down = d.down;
        sit.to_go = d.to_go;
        sit.spot = d.spot;
        if outcome.possession_change {
            state.possession = state.possession.other();
        }
    }

    /// A touchdown on the last snap still gets its point-after try.
    fn period_over(state: &GameState<Self>, _rules: &GameRules) -> bool {
        state.clock.expired() && state.situation.phase != FootballPhase::PointAfter
    }

    fn drain(elapsed: Seconds, _position: Position) -> f64 {
        0.012 + f64::from(elapsed) * 0.0001
    }

    fn recovery(elapsed: Seconds) -> f64 {
        0.02 + f64::from(elapsed) * 0.0002
    }
}

fn no_play(ctx: &PlayContext<'_, Football>) -> Outcome {
    let sit = &ctx.state.situation;
    PlayOutcome::new(
        "no_play",
        ctx.offense(),
        FootballDelta { phase: sit.phase, down: sit.down, to_go: sit.to_go, spot: sit.spot },
    )
    .elapsed(5)
    .text(format!("{} burn a timeout", ctx.off_team().name))
}

fn kickoff(ctx: &PlayContext<'_, Football>, rng: &mut GameRng) -> Outcome {
    let (off, def, range) = (ctx.offense(), ctx.defense(), ctx.range());
    let Some(kicker) = ctx.off_team().pick_best(&[Kicker], Rating::KickPower, range) else {
        return no_play(ctx);
    };
    let power = kicker.skill(Rating::KickPower, range);
    let mut o = PlayOutcome::new("kickoff", off, FootballDelta::first_down(TOUCHBACK_SPOT)).turnover();
    o.involve(off, kicker.id());

    if rng.chance(prob(0.35 + 0.4 * power)) {
        return o.text(format!("{} kicks into the end zone for a touchback", kicker.name()));
    }

    let Some(returner) = ctx.def_team().pick_best(RETURNERS, Rating::Speed, range) else {
        return o.text(format!("{} kicks off", kicker.name()));
    };
    let speed = returner.skill(Rating::Speed, range);
    o.elapsed = paced(rng.range_u32(5, 8), ctx.factors().pace);
    o.credit(def, returner.id(), Stat::KickReturns, 1);

    if rng.chance(0.006 * ctx.tilt(def)) {
        o.credit(def, returner.id(), Stat::KickReturnYards, 100);
        o.credit(def, returner.id(), Stat::ReturnTouchdowns, 1);
        o.score(def, Some(returner.id()), 6);
        o.delta = FootballDelta::point_after();
        return o.text(format!(
            "{} returns the kick 100 yards for a touchdown!",
            returner.name()
        ));
    }

    let yards = rng.normal(20.0 + 10.0 * speed, 7.0).round().clamp(1.0, 99.0) as u32;
    o.credit(def, returner.id(), Stat::KickReturnYards, yards);
    if let Some(t) = ctx.off_team().pick_weighted(&[], Rating::Tackling, range, rng) {
        o.credit(off, t.id(), Stat::Tackles, 1);
    }
    o.delta = FootballDelta::first_down(yards);
    o.text(format!("{} kicks off, {} returns it {yards} yards", kicker.name(), returner.name()))
}

fn point_after(ctx: &PlayContext<'_, Football>, rng: &mut GameRng) -> Outcome {
    let (off, range) = (ctx.offense(), ctx.range());
    let mut o = PlayOutcome::new(kind::CONVERSION, off, FootballDelta::kickoff()).hidden();
    let Some(kicker) = ctx.off_team().pick_best(&[Kicker], Rating::KickAccuracy, range) else {
        return o.text("no try");
    };
    o.credit(off, kicker.id(), Stat::ExtraPointsAttempted, 1);
    let p = prob(0.90 + 0.08 * kicker.skill(Rating::KickAccuracy, range));
    if rng.chance(p) {
        o.credit(off, kicker.id(), Stat::ExtraPointsMade, 1);
        o.score(off, Some(kicker.id()), 1);
        o.text(format!("{} kick good", kicker.name()))
    } else {
        o.text(format!("{} kick no good", kicker.name()))
    }
}

fn scrimmage(ctx: &PlayContext<'_, Football>, rng: &mut GameRng) -> Outcome {
    let sit = &ctx.state.situation;
    let f = ctx.factors();
    let off = ctx.offense();
    let late = ctx.late_game(LATE_WINDOW);
    let margin = ctx.margin(off);

    if sit.down >= 4 {
        let kick_distance = 100 - sit.spot + 17;
        let desperate = late && margin < -3;
        let go_for_it = (sit.to_go <= 1 && sit.spot >= 45) || (late && margin < 0);
        if kick_distance <= FIELD_GOAL_RANGE && !(desperate && sit.to_go <= 3) {
            return field_goal(ctx, rng);
        }
        if !go_for_it {
            return punt(ctx, rng);
        }
    }

    if rng.chance(0.05 * f.penalty) {
        return penalty(ctx, rng);
    }

    let mut pass_share = 0.55;
    if sit.down >= 2 && sit.to_go >= 8 {
        pass_share = 0.72;
    }
    if late && margin < 0 {
        pass_share = 0.8;
    } else if late && margin > 0 {
        pass_share = 0.3;
    }
    if rng.chance(pass_share) {
        pass(ctx, rng)
    } else {
        run(ctx, rng)
    }
}

/// Turn a gain into the next situation, crediting touchdowns, safeties
/// and first downs. Returns the text suffix.
fn settle_gain(
    ctx: &PlayContext<'_, Football>,
    o: &mut Outcome,
    yards: i32,
    scorer: Option<u32>,
) -> &'static str {
    let (off, def) = (ctx.offense(), ctx.defense());
    match gain(&ctx.state.situation, yards) {
        Gain::Touchdown => {
            o.score(off, scorer, 6);
            o.delta = FootballDelta::point_after();
            " TOUCHDOWN!"
        }
        Gain::Safety => {
            o.credit_team(def, Stat::Safeties, 1);
            o.score(def, None, 2);
            o.delta = FootballDelta { spot: 20, ..FootballDelta::kickoff() };
            " Safety."
        }
        Gain::FirstDown(spot) => {
            o.credit_team(off, Stat::FirstDowns, 1);
            o.delta = FootballDelta::first_down(spot);
            " First down."
        }
        Gain::NextDown { down, to_go, spot } => {
            o.delta = FootballDelta { phase: FootballPhase::Scrimmage, down, to_go, spot };
            ""
        }
        Gain::OnDowns(spot) => {
            o.possession_change = true;
            o.delta = FootballDelta::first_down(spot);
            " Turnover on downs."
        }
    }
}

fn run(ctx: &PlayContext<'_, Football>, rng: &mut GameRng) -> Outcome {
    let (off, def, range) = (ctx.offense(), ctx.defense(), ctx.range());
    let sit = &ctx.state.situation;
    let f = ctx.factors();
    let ball_carrier = if rng.chance(0.88) { RunningBack } else { Quarterback };
    let Some(runner) = ctx.off_team().pick_weighted(&[ball_carrier], Rating::Elusiveness, range, rng)
    else {
        return no_play(ctx);
    };

    let block = ctx.off_team().mean_skill(&[OffensiveLine], Rating::RunBlocking, range);
    let stop = ctx.def_team().mean_skill(RUSHERS, Rating::RunStopping, range);
    let mean = 4.2 + 4.0 * (block - stop) + 2.0 * (runner.skill(Rating::Elusiveness, range) - 0.5);
    let mut yards = rng.normal(mean * ctx.tilt(off), 4.5).round().clamp(-8.0, 99.0) as i32;
    if rng.chance(0.03) {
        yards += rng.range_u32(10, 60) as i32;
    }
    yards = yards.min(100 - sit.spot as i32);

    let mut o = PlayOutcome::new("run", off, FootballDelta::first_down(sit.spot))
        .elapsed(paced(rng.range_u32(25, 40), f.pace));
    o.credit(off, runner.id(), Stat::RushAttempts, 1);
    if yards > 0 {
        o.credit(off, runner.id(), Stat::RushYards, yards as u32);
    } else if yards < 0 {
        o.credit(off, runner.id(), Stat::RushYardsLost, yards.unsigned_abs());
    }
    let mut text = format!("{} runs for {yards} yards.", runner.name());

    let tackler = ctx.def_team().pick_weighted(RUSHERS, Rating::Tackling, range, rng);
    let end = sit.spot as i32 + yards;
    let fumble = 0.012 * f.fumble * (1.5 - 0.5 * runner.energy);
    if end > 0 && end < 100 && rng.chance(fumble) {
        o.credit(off, runner.id(), Stat::Fumbles, 1);
        if rng.chance(0.5) {
            o.credit(off, runner.id(), Stat::FumblesLost, 1);
            if let Some(t) = tackler {
                o.credit(def, t.id(), Stat::FumbleRecoveries, 1);
            }
            o.possession_change = true;
            o.delta = FootballDelta::first_down(100 - end as u32);
            text.push_str(" FUMBLE, recovered by the defense.");
            return o.text(text);
        }
        text.push_str(" Fumble, recovered by the offense.");
    }

    text.push_str(settle_gain(ctx, &mut o, yards, Some(runner.id())));
    if o.points == 0 || o.scoring_side == Some(def) {
        if let Some(t) = tackler {
            o.credit(def, t.id(), Stat::Tackles, 1);
        }
    }
    if o.scoring_side == Some(off) {
        o.credit(off, runner.id(), Stat::RushTouchdowns, 1);
    }
    o.text(text)
}

fn pass(ctx: &PlayContext<'_, Football>, rng: &mut GameRng) -> Outcome {
    let (off, def, range) = (ctx.offense(), ctx.defense(), ctx.range());
    let sit = &ctx.state.situation;
    let f = ctx.factors();
    let Some(qb) = ctx.off_team().pick_best(&[Quarterback], Rating::ThrowAccuracy, range) else {
        return no_play(ctx);
    };
    let accuracy = qb.skill(Rating::ThrowAccuracy, range);
    let coverage = ctx.def_team().mean_skill(&[DefensiveBack], Rating::Coverage, range);
    let mut o = PlayOutcome::new("pass", off, FootballDelta::first_down(sit.spot))
        .elapsed(paced(rng.range_u32(25, 40), f.pace));
    o.involve(off, qb.id());

    let rush = ctx.def_team().mean_skill(RUSHERS, Rating::PassRush, range);
    let protect = ctx.off_team().mean_skill(&[OffensiveLine], Rating::PassBlocking, range);
    if rng.chance(prob(0.065 * f.sack * (1.0 + rush - protect))) {
        let loss = rng.range_u32(3, 10).min(sit.spot);
        o.credit(off, qb.id(), Stat::Sacked, 1);
        o.credit(off, qb.id(), Stat::SackYardsLost, loss);
        let mut text = format!("{} sacked for a loss of {loss}.", qb.name());
        if let Some(r) = ctx.def_team().pick_weighted(RUSHERS, Rating::PassRush, range, rng) {
            o.credit(def, r.id(), Stat::Sacks, 1);
            text = format!("{} sacked by {} for a loss of {loss}.", qb.name(), r.name());
        }
        text.push_str(settle_gain(ctx, &mut o, -(loss as i32), None));
        return o.kind_of("sack").text(text);
    }

    o.credit(off, qb.id(), Stat::PassAttempts, 1);
    let pick = 0.025 * f.interception * (1.0 + coverage - accuracy).max(0.2);
    if rng.chance(pick) {
        return interception(ctx, o, qb.name(), rng);
    }

    let Some(receiver) = ctx.off_team().pick_weighted(TARGETS, Rating::Catching, range, rng) else {
        return o.text(format!("{} throws it away", qb.name()));
    };
    let p = prob(0.62 * (1.0 + 0.5 * (accuracy - coverage)) * ctx.tilt(off).sqrt());
    if !rng.chance(p) {
        o.elapsed = paced(rng.range_u32(5, 8), f.pace);
        let text = format!("{} pass incomplete intended for {}.", qb.name(), receiver.name());
        let suffix = settle_gain(ctx, &mut o, 0, None);
        return o.text(format!("{text}{suffix}"));
    }

    let burst = receiver.skill(Rating::Speed, range);
    let mut yards = rng.normal(7.0 + 6.0 * (burst - 0.5), 7.0).round().clamp(0.0, 99.0) as i32;
    if rng.chance(0.05 * ctx.tilt(off)) {
        yards += rng.range_u32(15, 50) as i32;
    }
    yards = yards.min(100 - sit.spot as i32);

    o.credit(off, qb.id(), Stat::PassCompletions, 1);
    o.credit(off, receiver.id(), Stat::Receptions, 1);
    if yards > 0 {
        o.credit(off, qb.id(), Stat::PassYards, yards as u32);
        o.credit(off, receiver.id(), Stat::ReceivingYards, yards as u32);
    }
    let mut text = format!("{} pass complete to {} for {yards} yards.", qb.name(), receiver.name());
    text.push_str(settle_gain(ctx, &mut o, yards, Some(receiver.id())));
    if o.scoring_side == Some(off) {
        o.credit(off, qb.id(), Stat::PassTouchdowns, 1);
        o.credit(off, receiver.id(), Stat::ReceivingTouchdowns, 1);
    } else if let Some(t) = ctx.def_team().pick_weighted(&[DefensiveBack, Linebacker], Rating::Tackling, range, rng) {
        o.credit(def, t.id(), Stat::Tackles, 1);
    }
    o.text(text)
}

fn interception(
    ctx: &PlayContext<'_, Football>,
    mut o: Outcome,
    passer: &str,
    rng: &mut GameRng,
) -> Outcome {
    let (off, def, range) = (ctx.offense(), ctx.defense(), ctx.range());
    let sit = &ctx.state.situation;
    let qb = o.participants.first().map(|(_, id)| *id);
    if let Some(id) = qb {
        o.credit(off, id, Stat::InterceptionsThrown, 1);
    }
    o.possession_change = true;
    let air = rng.range_u32(5, 30);
    let caught_at = 100u32.saturating_sub((sit.spot + air).min(99)).max(1);
    let ret = rng.range_u32(0, 25);
    let spot = caught_at + ret;

    let Some(db) = ctx.def_team().pick_weighted(&[DefensiveBack, Linebacker], Rating::Coverage, range, rng)
    else {
        o.delta = FootballDelta::first_down(spot);
        return o.kind_of("interception").text(format!("{passer} intercepted"));
    };
    o.credit(def, db.id(), Stat::Interceptions, 1);
    if spot >= 100 || rng.chance(0.004 * ctx.tilt(def)) {
        o.credit(def, db.id(), Stat::ReturnTouchdowns, 1);
        o.score(def, Some(db.id()), 6);
        o.delta = FootballDelta::point_after();
        return o
            .kind_of("interception")
            .text(format!("{passer} intercepted by {}, returned for a TOUCHDOWN!", db.name()));
    }
    o.delta = FootballDelta::first_down(spot);
    o.kind_of("interception")
        .text(format!("{passer} intercepted by {}, returned {ret} yards.", db.name()))
}

fn punt(ctx: &PlayContext<'_, Football>, rng: &mut GameRng) -> Outcome {
    let (off, def, range) = (ctx.offense(), ctx.defense(), ctx.range());
    let sit = &ctx.state.situation;
    let Some(punter) = ctx.off_team().pick_best(&[Punter], Rating::KickPower, range) else {
        return no_play(ctx);
    };
    let power = punter.skill(Rating::KickPower, range);
    let distance = rng.normal(40.0 + 10.0 * power, 6.0).round().clamp(20.0, 70.0) as u32;
    let mut o = PlayOutcome::new("punt", off, FootballDelta::first_down(PUNT_TOUCHBACK_SPOT))
        .elapsed(paced(rng.range_u32(8, 12), ctx.factors().pace))
        .turnover();
    o.credit(off, punter.id(), Stat::Punts, 1);
    o.credit(off, punter.id(), Stat::PuntYards, distance);

    let landing = sit.spot + distance;
    if landing >= 100 {
        return o.text(format!("{} punts {distance} yards into the end zone, touchback", punter.name()));
    }
    let ret = rng.normal(8.0, 5.0).round().clamp(0.0, 40.0) as u32;
    let spot = (100 - landing + ret).clamp(1, 99);
    o.delta = FootballDelta::first_down(spot);
    match ctx.def_team().pick_best(RETURNERS, Rating::Speed, range) {
        Some(r) => {
            o.credit(def, r.id(), Stat::KickReturns, 1);
            o.credit(def, r.id(), Stat::KickReturnYards, ret);
            o.text(format!("{} punts {distance} yards, {} returns it {ret}", punter.name(), r.name()))
        }
        None => o.text(format!("{} punts {distance} yards", punter.name())),
    }
}

fn field_goal(ctx: &PlayContext<'_, Football>, rng: &mut GameRng) -> Outcome {
    let (off, range) = (ctx.offense(), ctx.range());
    let sit = &ctx.state.situation;
    let Some(kicker) = ctx.off_team().pick_best(&[Kicker], Rating::KickAccuracy, range) else {
        return no_play(ctx);
    };
    let distance = 100 - sit.spot + 17;
    let accuracy = kicker.skill(Rating::KickAccuracy, range);
    let p = prob(
        (0.98 - 0.012 * (f64::from(distance) - 20.0).max(0.0))
            * (0.85 + 0.3 * accuracy)
            * ctx.factors().field_goal
            * ctx.tilt(off),
    );
    let mut o = PlayOutcome::new("field_goal", off, FootballDelta::kickoff())
        .elapsed(paced(rng.range_u32(4, 6), ctx.factors().pace));
    o.credit(off, kicker.id(), Stat::KicksAttempted, 1);
    if rng.chance(p) {
        o.credit(off, kicker.id(), Stat::KicksMade, 1);
        o.score(off, Some(kicker.id()), 3);
        return o.text(format!("{} {distance}-yard field goal is GOOD", kicker.name()));
    }
    o.possession_change = true;
    o.delta = FootballDelta::first_down((107 - sit.spot).clamp(20, 99));
    o.text(format!("{} {distance}-yard field goal is no good", kicker.name()))
}

fn penalty(ctx: &PlayContext<'_, Football>, rng: &mut GameRng) -> Outcome {
    let (off, def, range) = (ctx.offense(), ctx.defense(), ctx.range());
    let sit = &ctx.state.situation;
    let on_offense = rng.chance(0.45);
    let (side, team) = if on_offense { (off, ctx.off_team()) } else { (def, ctx.def_team()) };
    let yards = match (on_offense, rng.chance(0.3)) {
        (true, true) => 10,
        (false, true) => 15,
        _ => 5,
    };
    let mut o = PlayOutcome::new("penalty", off, FootballDelta::first_down(sit.spot));
    if let Some(p) = team.pick_weighted(&[], Rating::Strength, range, rng) {
        o.credit(side, p.id(), Stat::Penalties, 1);
        o.credit(side, p.id(), Stat::PenaltyYards, yards);
    } else {
        o.credit_team(side, Stat::Penalties, 1);
        o.credit_team(side, Stat::PenaltyYards, yards);
    }

    let name = &team.name;
    if on_offense {
        // Half the distance to the goal when the full walk-off would cross it.
        let back = if yards >= sit.spot { sit.spot / 2 } else { yards };
        let spot = (sit.spot - back).max(1);
        o.delta = FootballDelta {
            phase: FootballPhase::Scrimmage,
            down: sit.down,
            to_go: sit.to_go + (sit.spot - spot),
            spot,
        };
        return o.text(format!("Penalty on {name}, {back} yards"));
    }
    let room = 100 - sit.spot;
    let forward = if yards >= room { room / 2 } else { yards };
    let spot = (sit.spot + forward).min(99);
    o.delta = if forward >= sit.to_go {
        o.credit_team(off, Stat::FirstDowns, 1);
        FootballDelta::first_down(spot)
    } else {
        FootballDelta {
            phase: FootballPhase::Scrimmage,
            down: sit.down,
            to_go: sit.to_go - forward,
            spot,
        }
    };
    o.text(format!("Penalty on {name}, {forward} yards"))
}
