//! Basketball: possessions on a running clock.
//!
//! One play is one possession segment: a turnover, a foul, or a shot
//! with its rebound. Team fouls reset each period and put the opponent
//! in the bonus past the limit. A jump ball opens the game and every
//! overtime; the possession arrow alternates the other periods.

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
    types::{Seconds, Side, SportKind},
};
use serde::{Deserialize, Serialize};

use Position::{Center, Forward, Guard};

const SLOTS: &[Slot] = &[
    Slot::new(&[Guard], 2),
    Slot::new(&[Forward], 2),
    Slot::new(&[Center], 1),
];

const BONUS_LIMIT: u32 = 5;
const OVERTIME_BONUS_LIMIT: u32 = 4;

/// Seconds left in the final period when a team down three hunts a three.
const LATE_THREE_WINDOW: Seconds = 120;

#[derive(Debug, Clone, Copy, Default)]
pub struct Basketball;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketballSituation {
    /// [home, away] team fouls this period.
    pub team_fouls:  [u32; 2],
    /// Side awarded the next alternating possession.
    pub arrow:       Side,
    pub bonus_limit: u32,
}

impl BasketballSituation {
    pub fn in_bonus(&self, fouling_side: Side) -> bool {
        self.team_fouls[fouling_side.index()] >= self.bonus_limit
    }

    pub fn describe(&self) -> String {
        format!(
            "team fouls {}-{}, arrow {}",
            self.team_fouls[0], self.team_fouls[1], self.arrow
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct BasketballDelta {
    /// Team charged with a foul on this play.
    pub foul_on: Option<Side>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShotKind {
    Rim,
    Mid,
    Three,
}

impl ShotKind {
    fn rating(self) -> Rating {
        match self {
            Self::Rim => Rating::InsideScoring,
            Self::Mid => Rating::MidRange,
            Self::Three => Rating::ThreePoint,
        }
    }

    fn base_rate(self) -> f64 {
        match self {
            Self::Rim => 0.62,
            Self::Mid => 0.41,
            Self::Three => 0.355,
        }
    }

    fn points(self) -> u32 {
        if self == Self::Three { 3 } else { 2 }
    }

    fn kind(self) -> &'static str {
        match self {
            Self::Rim => "shot_rim",
            Self::Mid => "shot_mid",
            Self::Three => "shot_three",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Rim => "layup",
            Self::Mid => "jumper",
            Self::Three => "three-pointer",
        }
    }

    fn assist_rate(self) -> f64 {
        match self {
            Self::Rim => 0.55,
            Self::Mid => 0.45,
            Self::Three => 0.8,
        }
    }

    fn block_rate(self) -> f64 {
        match self {
            Self::Rim => 0.16,
            Self::Mid => 0.06,
            Self::Three => 0.03,
        }
    }
}

type Outcome = PlayOutcome<BasketballDelta>;

impl Sport for Basketball {
    const KIND: SportKind = SportKind::Basketball;
    const TRACKS_TIME: bool = true;

    type Situation = BasketballSituation;
    type Delta = BasketballDelta;

    fn requirements() -> RosterRequirements {
        RosterRequirements {
            positions: &[(Guard, 1), (Forward, 1), (Center, 1)],
            min_players: 5,
        }
    }

    fn new_situation(_teams: &[TeamGameState; 2], _range: RatingRange) -> BasketballSituation {
        BasketballSituation {
            team_fouls: [0, 0],
            arrow: Side::Home,
            bonus_limit: BONUS_LIMIT,
        }
    }

    fn snapshot(state: &GameState<Self>) -> Situation {
        Situation::Basketball(state.situation.clone())
    }

    fn start_period(
        state: &mut GameState<Self>,
        teams: &[TeamGameState; 2],
        config: &SimConfig,
        rng: &mut GameRng,
    ) -> String {
        let rules = &config.rules;
        let period = state.clock.period;
        let overtime = period > rules.num_periods;
        let label = Self::KIND.period_label(period, rules.num_periods);

        let sit = &mut state.situation;
        sit.team_fouls = [0, 0];
        sit.bonus_limit = if overtime { OVERTIME_BONUS_LIMIT } else { BONUS_LIMIT };

        if period == 1 || overtime {
            let range = config.rating_range;
            let reach = |side: Side| {
                teams[side.index()]
                    .best_available(&[Center], Rating::Rebounding, range)
                    .map(|p| p.skill(Rating::Rebounding, range))
                    .unwrap_or(0.5)
            };
            let p_home = prob(0.5 + 0.3 * (reach(Side::Home) - reach(Side::Away)));
            let winner = if rng.chance(p_home) { Side::Home } else { Side::Away };
            state.possession = winner;
            sit.arrow = winner.other();
            format!("Start of {label}. {} win the jump ball.", teams[winner.index()].name)
        } else {
            state.possession = sit.arrow;
            sit.arrow = sit.arrow.other();
            format!(
                "Start of {label}. {} ball on the possession arrow.",
                teams[state.possession.index()].name
            )
        }
    }

    fn prepare(
        _state: &mut GameState<Self>,
        teams: &mut [TeamGameState; 2],
        range: RatingRange,
    ) -> Vec<Notice> {
        for team in teams.iter_mut() {
            team.on_field = lineup::select(team, SLOTS, range);
        }
        Vec::new()
    }

    fn resolve(ctx: &PlayContext<'_, Self>, rng: &mut GameRng) -> Outcome {
        let f = ctx.factors();
        let range = ctx.range();
        let elapsed = paced(rng.range_u32(8, 22), f.pace);

        let handling = ctx.off_team().mean_skill(&[], Rating::BallHandling, range);
        let pressure = ctx.def_team().mean_skill(&[], Rating::Defense, range);
        let energy = mean_energy(ctx.off_team());

        let mut three = 0.27 * f.three_point;
        if ctx.late_game(LATE_THREE_WINDOW) && ctx.margin(ctx.offense()) == -3 {
            three *= 3.0;
        }
        let weights = [
            0.13 * f.turnover * (1.0 + pressure - handling).max(0.1) * (1.5 - 0.5 * energy),
            0.05 * f.foul,
            0.06 * f.foul,
            0.27,
            0.22,
            three,
        ];
        match rng.weighted_index(&weights) {
            0 => turnover(ctx, elapsed, rng),
            1 => common_foul(ctx, rng),
            2 => shooting_foul(ctx, elapsed, rng),
            3 => shot(ctx, ShotKind::Rim, elapsed, rng),
            4 => shot(ctx, ShotKind::Mid, elapsed, rng),
            _ => shot(ctx, ShotKind::Three, elapsed, rng),
        }
    }

    fn apply(state: &mut GameState<Self>, outcome: &Outcome) {
        if let Some(side) = outcome.delta.foul_on {
            state.situation.team_fouls[side.index()] += 1;
        }
        if outcome.possession_change {
            state.possession = state.possession.other();
        }
    }

    fn drain(elapsed: Seconds, _position: Position) -> f64 {
        f64::from(elapsed) * 0.00035
    }

    fn recovery(elapsed: Seconds) -> f64 {
        f64::from(elapsed) * 0.0007
    }
}

fn mean_energy(team: &TeamGameState) -> f64 {
    let (sum, n) = team
        .on_field_players()
        .fold((0.0, 0usize), |(s, n), p| (s + p.energy, n + 1));
    if n == 0 { 1.0 } else { sum / n as f64 }
}

fn dead_ball(ctx: &PlayContext<'_, Basketball>, elapsed: Seconds) -> Outcome {
    PlayOutcome::new("turnover", ctx.offense(), BasketballDelta::default())
        .elapsed(elapsed)
        .text(format!("{} shot clock violation", ctx.off_team().name))
        .turnover()
}

fn turnover(ctx: &PlayContext<'_, Basketball>, elapsed: Seconds, rng: &mut GameRng) -> Outcome {
    let (off, def, range) = (ctx.offense(), ctx.defense(), ctx.range());
    let Some(handler) = ctx.off_team().pick_weighted(&[Guard], Rating::BallHandling, range, rng)
    else {
        return dead_ball(ctx, elapsed);
    };
    let mut o = PlayOutcome::new("turnover", off, BasketballDelta::default())
        .elapsed(elapsed)
        .turnover();
    o.credit(off, handler.id(), Stat::Turnovers, 1);

    let stealer = ctx.def_team().pick_weighted(&[], Rating::Defense, range, rng);
    match stealer {
        Some(s) if rng.chance(0.5 * (0.5 + s.skill(Rating::Defense, range))) => {
            o.credit(def, s.id(), Stat::Steals, 1);
            o.text(format!("{} steals the ball from {}", s.name(), handler.name()))
        }
        _ => o.text(format!("{} turns it over", handler.name())),
    }
}

fn common_foul(ctx: &PlayContext<'_, Basketball>, rng: &mut GameRng) -> Outcome {
    let (off, def, range) = (ctx.offense(), ctx.defense(), ctx.range());
    let elapsed = paced(rng.range_u32(3, 10), ctx.factors().pace);
    let fouler = ctx.def_team().pick_weighted(&[], Rating::Strength, range, rng);
    let fouled = ctx.off_team().pick_weighted(&[], Rating::BallHandling, range, rng);
    let (Some(fouler), Some(fouled)) = (fouler, fouled) else {
        return dead_ball(ctx, elapsed);
    };

    let mut o = PlayOutcome::new("foul", off, BasketballDelta { foul_on: Some(def) })
        .elapsed(elapsed);
    o.credit(def, fouler.id(), Stat::Fouls, 1);
    o.involve(off, fouled.id());

    if ctx.state.situation.in_bonus(def) {
        let line = free_throws(ctx, &mut o, fouled, 2, rng);
        o.text(format!("Foul on {} (bonus). {line}", fouler.name()))
    } else {
        o.text(format!("Foul on {}", fouler.name()))
    }
}

fn shooting_foul(ctx: &PlayContext<'_, Basketball>, elapsed: Seconds, rng: &mut GameRng) -> Outcome {
    let (off, def, range) = (ctx.offense(), ctx.defense(), ctx.range());
    let shooter = ctx.off_team().pick_weighted(&[], Rating::InsideScoring, range, rng);
    let fouler = ctx.def_team().pick_weighted(&[], Rating::Defense, range, rng);
    let (Some(shooter), Some(fouler)) = (shooter, fouler) else {
        return dead_ball(ctx, elapsed);
    };
    let attempts = if rng.chance(0.12) { 3 } else { 2 };

    let mut o = PlayOutcome::new("shooting_foul", off, BasketballDelta { foul_on: Some(def) })
        .elapsed(elapsed);
    o.credit(def, fouler.id(), Stat::Fouls, 1);
    let line = free_throws(ctx, &mut o, shooter, attempts, rng);
    o.text(format!("Shooting foul on {}. {line}", fouler.name()))
}

/// Shoot `n` free throws; a miss on the last one is rebounded.
fn free_throws(
    ctx: &PlayContext<'_, Basketball>,
    o: &mut Outcome,
    shooter: &PlayerGameState,
    n: u32,
    rng: &mut GameRng,
) -> String {
    let off = ctx.offense();
    let p = prob((0.55 + 0.4 * shooter.skill(Rating::FreeThrow, ctx.range())) * ctx.tilt(off).sqrt());
    let mut made = 0;
    let mut last_made = false;
    for _ in 0..n {
        o.credit(off, shooter.id(), Stat::FreeThrowsAttempted, 1);
        last_made = rng.chance(p);
        if last_made {
            made += 1;
            o.credit(off, shooter.id(), Stat::FreeThrowsMade, 1);
            o.score(off, Some(shooter.id()), 1);
        }
    }
    let mut line = format!("{} makes {made} of {n} free throws.", shooter.name());
    if last_made {
        o.possession_change = true;
    } else {
        line.push_str(&rebound(ctx, o, rng));
    }
    line
}

fn shot(
    ctx: &PlayContext<'_, Basketball>,
    kind: ShotKind,
    elapsed: Seconds,
    rng: &mut GameRng,
) -> Outcome {
    let (off, def, range) = (ctx.offense(), ctx.defense(), ctx.range());
    let Some(shooter) = ctx.off_team().pick_weighted(&[], kind.rating(), range, rng) else {
        return dead_ball(ctx, elapsed);
    };
    let contest = ctx
        .def_team()
        .pick_best(&[], Rating::Defense, range)
        .map(|d| d.skill(Rating::Defense, range))
        .unwrap_or(0.5);
    let f = ctx.factors();
    let p = prob(
        kind.base_rate()
            * (1.0 + 0.6 * (shooter.skill(kind.rating(), range) - contest))
            * f.shot_quality
            * ctx.tilt(off),
    );

    let mut o = PlayOutcome::new(kind.kind(), off, BasketballDelta::default()).elapsed(elapsed);
    o.credit(off, shooter.id(), Stat::FieldGoalsAttempted, 1);
    if kind == ShotKind::Three {
        o.credit(off, shooter.id(), Stat::ThreesAttempted, 1);
    }

    if rng.chance(p) {
        o.credit(off, shooter.id(), Stat::FieldGoalsMade, 1);
        if kind == ShotKind::Three {
            o.credit(off, shooter.id(), Stat::ThreesMade, 1);
        }
        o.score(off, Some(shooter.id()), kind.points());
        o.possession_change = true;
        let mut text = format!("{} makes a {}", shooter.name(), kind.label());
        if rng.chance(kind.assist_rate()) {
            if let Some(a) = ctx.off_team().pick_other(&[], Rating::Passing, range, shooter.id(), rng) {
                o.credit(off, a.id(), Stat::Assists, 1);
                text.push_str(&format!(" (assist: {})", a.name()));
            }
        }
        return o.text(text);
    }

    let blocker = ctx.def_team().pick_best(&[], Rating::Blocking, range);
    let mut text = match blocker {
        Some(b) if rng.chance(kind.block_rate() * (0.5 + b.skill(Rating::Blocking, range))) => {
            o.credit(def, b.id(), Stat::Blocks, 1);
            format!("{} blocks {}'s {}.", b.name(), shooter.name(), kind.label())
        }
        _ => format!("{} misses a {}.", shooter.name(), kind.label()),
    };
    text.push_str(&rebound(ctx, &mut o, rng));
    o.text(text)
}

fn rebound(ctx: &PlayContext<'_, Basketball>, o: &mut Outcome, rng: &mut GameRng) -> String {
    let (off, def, range) = (ctx.offense(), ctx.defense(), ctx.range());
    let crash = ctx.off_team().mean_skill(&[], Rating::Rebounding, range);
    let box_out = ctx.def_team().mean_skill(&[], Rating::Rebounding, range);
    if rng.chance(prob(0.27 * (1.0 + crash - box_out))) {
        if let Some(r) = ctx.off_team().pick_weighted(&[], Rating::Rebounding, range, rng) {
            o.credit(off, r.id(), Stat::OffensiveRebounds, 1);
            return format!(" Offensive rebound by {}.", r.name());
        }
    }
    o.possession_change = true;
    match ctx.def_team().pick_weighted(&[], Rating::Rebounding, range, rng) {
        Some(r) => {
            o.credit(def, r.id(), Stat::DefensiveRebounds, 1);
            format!(" Rebound {}.", r.name())
        }
        None => String::new(),
    }
}
